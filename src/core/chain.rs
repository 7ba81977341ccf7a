/// Markov chain table and corpus ingestion.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::corpus::CorpusBuilder;
use crate::core::prefix::Prefix;

#[derive(Debug, Error)]
pub enum MarkovError {
    #[error("prefix length must be at least 1 (got {0})")]
    InvalidPrefixLength(usize),
    #[error("word budget must be at least 1")]
    ZeroWordBudget,
    #[error("end-of-unit marker must not be blank")]
    EmptyEndMarker,
    #[error("end-of-unit marker must be a single token (got {0:?})")]
    InvalidEndMarker(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("RON serialization error: {0}")]
    RonSerialize(#[from] ron::Error),
}

/// A trained prefix → suffix table.
///
/// Keys are prefixes joined by single spaces. Each suffix list keeps every
/// observed follower in insertion order, duplicates included, so sampling an
/// index uniformly reproduces corpus frequencies. Lists are never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chain {
    prefix_len: usize,
    table: FxHashMap<String, Vec<String>>,
}

impl Chain {
    /// An empty chain with prefixes of `prefix_len` words.
    pub fn new(prefix_len: usize) -> Result<Self, MarkovError> {
        if prefix_len == 0 {
            return Err(MarkovError::InvalidPrefixLength(prefix_len));
        }
        Ok(Self {
            prefix_len,
            table: FxHashMap::default(),
        })
    }

    /// Fold every whitespace-delimited token from `reader` into the table.
    ///
    /// Each pass starts from the all-empty prefix. A read failure ends the
    /// pass; whatever was read before it stays in the table. Returns the
    /// number of tokens ingested.
    pub fn build<R: BufRead>(&mut self, reader: R) -> usize {
        let mut prefix = Prefix::empty(self.prefix_len);
        let mut count = 0;
        for token in Tokens::new(reader) {
            self.table.entry(prefix.key()).or_default().push(token.clone());
            prefix.shift(&token);
            count += 1;
        }
        debug!(
            tokens = count,
            prefixes = self.table.len(),
            prefix_len = self.prefix_len,
            "chain built"
        );
        count
    }

    /// Ingest a set of logical units, each followed by `end_marker`.
    pub fn build_units<I, S>(&mut self, units: I, end_marker: &str) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut corpus = CorpusBuilder::new(end_marker);
        corpus.extend(units);
        self.build(corpus.render().as_bytes())
    }

    /// Words per prefix key.
    pub fn prefix_len(&self) -> usize {
        self.prefix_len
    }

    /// Number of distinct prefix keys.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// True until the first token is ingested.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Total number of recorded transitions.
    pub fn transition_count(&self) -> usize {
        self.table.values().map(Vec::len).sum()
    }

    /// Recorded followers of `key`, if any.
    pub fn suffixes(&self, key: &str) -> Option<&[String]> {
        self.table.get(key).map(Vec::as_slice)
    }

    /// Whether `key` has been seen as a prefix.
    pub fn contains_key(&self, key: &str) -> bool {
        self.table.contains_key(key)
    }

    /// All prefix keys, in no particular order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.table.keys().map(String::as_str)
    }
}

/// Build a fresh chain from `reader` in one call.
pub fn build_chain<R: BufRead>(reader: R, prefix_len: usize) -> Result<Chain, MarkovError> {
    let mut chain = Chain::new(prefix_len)?;
    chain.build(reader);
    Ok(chain)
}

/// Lazy whitespace tokenizer over a buffered reader.
///
/// Runs of non-whitespace are tokens; all whitespace, newlines included, only
/// separates. Bytes that are not valid UTF-8 become U+FFFD and tokenizing
/// carries on. Stops at end of input or at the first read error.
pub struct Tokens<R> {
    reader: R,
    line: Vec<u8>,
    pending: std::vec::IntoIter<String>,
    done: bool,
}

impl<R: BufRead> Tokens<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: Vec::new(),
            pending: Vec::new().into_iter(),
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for Tokens<R> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            if let Some(token) = self.pending.next() {
                return Some(token);
            }
            if self.done {
                return None;
            }
            self.line.clear();
            match self.reader.read_until(b'\n', &mut self.line) {
                Ok(0) => self.done = true,
                Ok(_) => {
                    self.pending = String::from_utf8_lossy(&self.line)
                        .split_whitespace()
                        .map(str::to_string)
                        .collect::<Vec<_>>()
                        .into_iter();
                }
                Err(e) => {
                    warn!(error = %e, "read failed, keeping partial corpus");
                    self.done = true;
                }
            }
        }
    }
}

/// Save a chain to a RON file.
pub fn save_chain(chain: &Chain, path: &Path) -> Result<(), MarkovError> {
    let serialized = ron::ser::to_string_pretty(chain, ron::ser::PrettyConfig::default())?;
    std::fs::write(path, serialized)?;
    Ok(())
}

/// Load a chain from a RON file.
pub fn load_chain(path: &Path) -> Result<Chain, MarkovError> {
    let contents = std::fs::read_to_string(path)?;
    let chain: Chain = ron::from_str(&contents)?;
    if chain.prefix_len == 0 {
        return Err(MarkovError::InvalidPrefixLength(0));
    }
    Ok(chain)
}
