/// Fixed-length word window used as the chain lookup key.

/// An ordered window of the last `k` words seen.
///
/// Starts out as `k` empty strings, so the first key of any pass is a run of
/// `k - 1` spaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefix {
    words: Vec<String>,
}

impl Prefix {
    /// A prefix of `len` empty slots.
    pub fn empty(len: usize) -> Self {
        Self {
            words: vec![String::new(); len],
        }
    }

    /// A prefix seeded from an existing key, padded or cut to `len` words.
    pub fn from_key(key: &str, len: usize) -> Self {
        let mut words: Vec<String> = key.split(' ').map(str::to_string).collect();
        words.resize(len, String::new());
        Self { words }
    }

    /// The map key: words joined by single spaces.
    pub fn key(&self) -> String {
        self.words.join(" ")
    }

    /// Drop the first word and append `word` at the end.
    pub fn shift(&mut self, word: &str) {
        if self.words.is_empty() {
            return;
        }
        self.words.rotate_left(1);
        if let Some(last) = self.words.last_mut() {
            last.clear();
            last.push_str(word);
        }
    }

    /// The words in order, oldest first.
    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
