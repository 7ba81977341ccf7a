/// Corpus preparation: tag stripping and end-of-unit marking.
///
/// Sources such as article bodies arrive as separate documents, often with
/// markup. Before ingestion they are flattened into one text where every
/// document is followed by an end-of-unit marker token, which is what lets
/// the generator recognise where a unit starts and stops.

use regex_lite::Regex;
use std::sync::OnceLock;

use crate::core::chain::MarkovError;

/// Default end-of-unit marker.
pub const DEFAULT_END_MARKER: &str = "<end/>";

fn tag_pattern() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]*>").expect("tag pattern is valid"))
}

/// Check that `marker` survives tokenizing as exactly one token.
pub fn check_end_marker(marker: &str) -> Result<(), MarkovError> {
    if marker.trim().is_empty() {
        return Err(MarkovError::EmptyEndMarker);
    }
    if marker.chars().any(char::is_whitespace) {
        return Err(MarkovError::InvalidEndMarker(marker.to_string()));
    }
    Ok(())
}

/// Replace every `<...>` tag with a single space.
pub fn strip_tags(text: &str) -> String {
    tag_pattern().replace_all(text, " ").into_owned()
}

/// Accumulates logical units into a single marked corpus.
#[derive(Debug, Clone)]
pub struct CorpusBuilder {
    end_marker: String,
    strip_tags: bool,
    units: Vec<String>,
}

impl CorpusBuilder {
    pub fn new(end_marker: impl Into<String>) -> Self {
        Self {
            end_marker: end_marker.into(),
            strip_tags: false,
            units: Vec::new(),
        }
    }

    /// Strip markup from every unit pushed after this call.
    pub fn strip_tags(mut self, enabled: bool) -> Self {
        self.strip_tags = enabled;
        self
    }

    /// Add one unit. Whitespace-only units are skipped.
    pub fn push(&mut self, unit: &str) {
        let unit = if self.strip_tags {
            strip_tags(unit)
        } else {
            unit.to_string()
        };
        if unit.trim().is_empty() {
            return;
        }
        self.units.push(unit);
    }

    pub fn extend<I, S>(&mut self, units: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for unit in units {
            self.push(unit.as_ref());
        }
    }

    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The flattened corpus, one marker after each unit.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for unit in &self.units {
            out.push_str(unit.trim());
            out.push(' ');
            out.push_str(&self.end_marker);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn end_marker_must_be_one_token() {
        assert!(check_end_marker("<end/>").is_ok());
        assert!(matches!(
            check_end_marker(" <end/>\n"),
            Err(MarkovError::InvalidEndMarker(_))
        ));
        assert!(matches!(check_end_marker(" \t"), Err(MarkovError::EmptyEndMarker)));
        assert!(matches!(
            check_end_marker("x y"),
            Err(MarkovError::InvalidEndMarker(m)) if m == "x y"
        ));
    }

    #[test]
    fn strips_tags_to_spaces() {
        assert_eq!(strip_tags("<p>Hello<br/>world</p>"), " Hello world ");
        assert_eq!(strip_tags("no markup"), "no markup");
    }

    #[test]
    fn strip_keeps_words_apart() {
        let stripped = strip_tags("one<b>two</b>three");
        let words: Vec<&str> = stripped.split_whitespace().collect();
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn render_marks_each_unit() {
        let mut corpus = CorpusBuilder::new("<end>");
        corpus.extend(["x y", "  p q  "]);
        assert_eq!(corpus.render(), "x y <end>\np q <end>\n");
    }

    #[test]
    fn blank_units_are_skipped() {
        let mut corpus = CorpusBuilder::new(DEFAULT_END_MARKER).strip_tags(true);
        corpus.push("   ");
        corpus.push("<div></div>");
        assert!(corpus.is_empty());
        corpus.push("<p>kept</p>");
        assert_eq!(corpus.len(), 1);
        assert_eq!(
            corpus.render().split_whitespace().collect::<Vec<_>>(),
            vec!["kept", "<end/>"]
        );
    }

    #[test]
    fn markers_survive_when_stripping_is_off() {
        let mut corpus = CorpusBuilder::new(DEFAULT_END_MARKER);
        corpus.push("<em>raw</em>");
        assert_eq!(corpus.render(), "<em>raw</em> <end/>\n");
    }
}
