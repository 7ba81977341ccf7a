/// Engine configuration — defaults, RON loading, validation.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::chain::MarkovError;
use crate::core::corpus::{check_end_marker, DEFAULT_END_MARKER};
use crate::core::generator::{GenerateOptions, TerminationMode, DEFAULT_TRUNCATION_MARKER};

pub const DEFAULT_PREFIX_LEN: usize = 2;
pub const DEFAULT_MAX_WORDS: usize = 2000;

/// Settings shared by the trainer and the generator.
///
/// Every field has a default, so a RON file only needs the fields it changes:
///
/// ```text
/// (prefix_len: 3, single_unit: false)
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Words per prefix key.
    pub prefix_len: usize,
    /// Upper bound on generated words.
    pub max_words: usize,
    /// Token appended after each logical unit of the corpus.
    pub end_marker: String,
    /// Token appended when generation hits `max_words`.
    pub truncation_marker: String,
    /// Start at a unit boundary and stop at the next one.
    pub single_unit: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            prefix_len: DEFAULT_PREFIX_LEN,
            max_words: DEFAULT_MAX_WORDS,
            end_marker: DEFAULT_END_MARKER.to_string(),
            truncation_marker: DEFAULT_TRUNCATION_MARKER.to_string(),
            single_unit: true,
        }
    }
}

impl EngineConfig {
    /// Parse a config from RON text and validate it.
    pub fn from_ron_str(contents: &str) -> Result<Self, MarkovError> {
        let config: EngineConfig = ron::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a RON file.
    pub fn load_from_ron(path: &Path) -> Result<Self, MarkovError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron_str(&contents)
    }

    pub fn validate(&self) -> Result<(), MarkovError> {
        if self.prefix_len == 0 {
            return Err(MarkovError::InvalidPrefixLength(self.prefix_len));
        }
        if self.max_words == 0 {
            return Err(MarkovError::ZeroWordBudget);
        }
        check_end_marker(&self.end_marker)
    }

    pub fn mode(&self) -> TerminationMode {
        if self.single_unit {
            TerminationMode::SingleUnit {
                end_marker: self.end_marker.clone(),
            }
        } else {
            TerminationMode::Unconditional
        }
    }

    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            max_words: self.max_words,
            mode: self.mode(),
            truncation_marker: self.truncation_marker.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.prefix_len, 2);
        assert_eq!(config.max_words, 2000);
        assert_eq!(config.end_marker, "<end/>");
        assert_eq!(config.truncation_marker, "[...]");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_ron_keeps_defaults() {
        let config = EngineConfig::from_ron_str("(prefix_len: 3, single_unit: false)").unwrap();
        assert_eq!(config.prefix_len, 3);
        assert_eq!(config.max_words, DEFAULT_MAX_WORDS);
        assert_eq!(config.mode(), TerminationMode::Unconditional);
    }

    #[test]
    fn zero_prefix_len_is_a_config_error() {
        assert!(matches!(
            EngineConfig::from_ron_str("(prefix_len: 0)"),
            Err(MarkovError::InvalidPrefixLength(0))
        ));
    }

    #[test]
    fn zero_budget_and_blank_marker_rejected() {
        assert!(matches!(
            EngineConfig::from_ron_str("(max_words: 0)"),
            Err(MarkovError::ZeroWordBudget)
        ));
        assert!(matches!(
            EngineConfig::from_ron_str(r#"(end_marker: "")"#),
            Err(MarkovError::EmptyEndMarker)
        ));
        assert!(matches!(
            EngineConfig::from_ron_str(r#"(end_marker: "x y")"#),
            Err(MarkovError::InvalidEndMarker(_))
        ));
    }

    #[test]
    fn malformed_ron_is_reported() {
        assert!(matches!(
            EngineConfig::from_ron_str("(prefix_len: \"two\")"),
            Err(MarkovError::Ron(_))
        ));
    }

    #[test]
    fn options_follow_config() {
        let config = EngineConfig {
            max_words: 40,
            truncation_marker: "...".to_string(),
            ..EngineConfig::default()
        };
        let options = config.generate_options();
        assert_eq!(options.max_words, 40);
        assert_eq!(options.truncation_marker, "...");
        assert_eq!(
            options.mode,
            TerminationMode::SingleUnit {
                end_marker: "<end/>".to_string()
            }
        );
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.ron");
        std::fs::write(&path, "(max_words: 12, truncation_marker: \"~\")").unwrap();
        let config = EngineConfig::load_from_ron(&path).unwrap();
        assert_eq!(config.max_words, 12);
        assert_eq!(config.truncation_marker, "~");
    }
}
