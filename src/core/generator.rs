/// Sequence generation: a bounded random walk over a trained chain.

use rand::Rng;
use std::fmt;
use tracing::{debug, trace};

use crate::core::chain::{Chain, MarkovError};
use crate::core::corpus::check_end_marker;
use crate::core::prefix::Prefix;

/// Appended when output is cut off by the word budget.
pub const DEFAULT_TRUNCATION_MARKER: &str = "[...]";

/// Source of uniform index draws.
///
/// Every `rand::Rng` is a sampler, so a seeded `StdRng` gives reproducible
/// output for a fixed chain.
pub trait Sampler {
    /// An index in `0..len`. Only called with `len >= 1`.
    fn pick(&mut self, len: usize) -> usize;
}

impl<R: Rng> Sampler for R {
    fn pick(&mut self, len: usize) -> usize {
        self.gen_range(0..len)
    }
}

/// How a walk starts and when it may stop early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminationMode {
    /// Start from the all-empty prefix and run until the chain or the budget
    /// runs out.
    Unconditional,
    /// Start at a random unit boundary and stop before emitting the marker.
    SingleUnit { end_marker: String },
}

/// Why a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The current prefix had no recorded followers.
    Exhausted,
    /// The next word carried the end-of-unit marker.
    Sentinel,
    /// The word budget ran out; the truncation marker was appended.
    Truncated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub max_words: usize,
    pub mode: TerminationMode,
    pub truncation_marker: String,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_words: 2000,
            mode: TerminationMode::Unconditional,
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
        }
    }
}

/// Output of one walk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Emitted words; ends with the truncation marker iff `stop` is `Truncated`.
    pub words: Vec<String>,
    pub stop: StopReason,
}

impl Generated {
    /// Words joined by single spaces.
    pub fn text(&self) -> String {
        self.words.join(" ")
    }

    pub fn is_truncated(&self) -> bool {
        self.stop == StopReason::Truncated
    }

    /// Number of generated words, not counting the truncation marker.
    pub fn word_count(&self) -> usize {
        if self.is_truncated() {
            self.words.len().saturating_sub(1)
        } else {
            self.words.len()
        }
    }
}

impl fmt::Display for Generated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}

/// A validated walk configuration bound to a chain.
///
/// The chain is only read, so any number of generators may share it across
/// threads; each `run` owns its cursor and output.
#[derive(Debug, Clone, Copy)]
pub struct Generator<'a> {
    chain: &'a Chain,
    options: &'a GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(chain: &'a Chain, options: &'a GenerateOptions) -> Result<Self, MarkovError> {
        if options.max_words == 0 {
            return Err(MarkovError::ZeroWordBudget);
        }
        if let TerminationMode::SingleUnit { end_marker } = &options.mode {
            check_end_marker(end_marker)?;
        }
        Ok(Self { chain, options })
    }

    fn end_marker(&self) -> Option<&'a str> {
        match &self.options.mode {
            TerminationMode::Unconditional => None,
            TerminationMode::SingleUnit { end_marker } => Some(end_marker.as_str()),
        }
    }

    /// Pick the starting cursor and any words it contributes to the output.
    ///
    /// In single-unit mode the cursor comes from a key that begins with the
    /// marker, drawn uniformly from all such keys. Marker words in that key
    /// are not emitted. Without any such key the walk starts from the
    /// all-empty prefix.
    fn start<S: Sampler + ?Sized>(&self, sampler: &mut S) -> (Prefix, Vec<String>) {
        let prefix_len = self.chain.prefix_len();
        if let Some(marker) = self.end_marker() {
            let mut starts: Vec<&str> = self
                .chain
                .keys()
                .filter(|key| key.starts_with(marker))
                .collect();
            if !starts.is_empty() {
                starts.sort_unstable();
                let key = starts[sampler.pick(starts.len())];
                let words = key
                    .split(' ')
                    .filter(|w| !w.is_empty() && !w.contains(marker))
                    .map(str::to_string)
                    .collect();
                debug!(key, candidates = starts.len(), "starting at unit boundary");
                return (Prefix::from_key(key, prefix_len), words);
            }
            debug!("no unit boundary in chain, starting from the empty prefix");
        }
        (Prefix::empty(prefix_len), Vec::new())
    }

    /// Walk the chain until it runs out, hits the marker, or fills the budget.
    pub fn run<S: Sampler + ?Sized>(&self, sampler: &mut S) -> Generated {
        let max_words = self.options.max_words;
        let marker = self.end_marker();
        let (mut cursor, mut words) = self.start(sampler);

        if words.len() >= max_words {
            words.truncate(max_words);
            return self.truncated(words);
        }

        loop {
            let key = cursor.key();
            let choices = match self.chain.suffixes(&key) {
                Some(choices) if !choices.is_empty() => choices,
                _ => {
                    debug!(words = words.len(), "no followers, stopping");
                    return Generated {
                        words,
                        stop: StopReason::Exhausted,
                    };
                }
            };
            let next = &choices[sampler.pick(choices.len())];
            trace!(key = %key, next = %next, "step");

            if marker.is_some_and(|m| next.contains(m)) {
                debug!(words = words.len(), "end of unit, stopping");
                return Generated {
                    words,
                    stop: StopReason::Sentinel,
                };
            }

            words.push(next.clone());
            if words.len() == max_words {
                return self.truncated(words);
            }
            cursor.shift(next);
        }
    }

    fn truncated(&self, mut words: Vec<String>) -> Generated {
        debug!(words = words.len(), "word budget reached, stopping");
        words.push(self.options.truncation_marker.clone());
        Generated {
            words,
            stop: StopReason::Truncated,
        }
    }
}

/// Generate one bounded sequence from `chain`.
pub fn generate<S: Sampler + ?Sized>(
    chain: &Chain,
    options: &GenerateOptions,
    sampler: &mut S,
) -> Result<Generated, MarkovError> {
    Ok(Generator::new(chain, options)?.run(sampler))
}
