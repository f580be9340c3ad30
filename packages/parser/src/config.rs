//! Configuration constants and validation functions for the parser.

use regex::Regex;
use std::sync::LazyLock;

use crate::error::{ParseError, Result};

/// Upper bound on text handed to the grammar analyzer, in characters.
///
/// Grammar analysis of pathologically long accumulated texts is both slow
/// and useless; leaves above this bound are skipped entirely.
pub const MAX_ANALYZED_TEXT_LEN: usize = 10_000;

/// Substrings that signal a text may contain references.
///
/// A leaf containing none of these is skipped without invoking the grammar
/// analyzer: a closing parenthesis (paragraph or point citations), the
/// legal section mark, and the truncated stem of "törvény" which also
/// matches its inflected forms.
pub const REFERENCE_SIGNAL_SUBSTRINGS: [&str; 3] = [")", "§", "törvén"];

/// Opening quote characters counted by the quote-level tracker.
pub const QUOTE_OPEN_CHARS: [char; 2] = ['„', '“'];

/// Closing quote character counted by the quote-level tracker.
pub const QUOTE_CLOSE_CHAR: char = '”';

/// Act identifier pattern: "2012. évi CXVI. törvény".
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ACT_IDENTIFIER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}\. évi [IVXLCDM]+\. törvény$").expect("valid regex"));

/// Whether a string is a canonical act identifier.
///
/// Used to tell full act identifiers apart from abbreviations when
/// resolving citation targets.
///
/// # Examples
/// ```
/// use torvenytar_parser::config::is_act_identifier;
///
/// assert!(is_act_identifier("2012. évi CXVI. törvény"));
/// assert!(!is_act_identifier("Ptk."));
/// ```
#[must_use]
pub fn is_act_identifier(value: &str) -> bool {
    ACT_IDENTIFIER_PATTERN.is_match(value)
}

/// Validate an act identifier.
///
/// # Errors
///
/// Returns [`ParseError::InvalidActIdentifier`] when the identifier does
/// not match the "YYYY. évi N. törvény" form.
///
/// # Examples
/// ```
/// use torvenytar_parser::config::validate_act_identifier;
///
/// assert!(validate_act_identifier("2012. évi I. törvény").is_ok());
/// assert!(validate_act_identifier("INVALID").is_err());
/// ```
pub fn validate_act_identifier(identifier: &str) -> Result<()> {
    if is_act_identifier(identifier) {
        Ok(())
    } else {
        Err(ParseError::InvalidActIdentifier(identifier.to_string()))
    }
}

/// Canonical display form of an act identifier from its parts.
///
/// # Examples
/// ```
/// use torvenytar_parser::config::act_identifier;
///
/// assert_eq!(act_identifier(2012, "CXVI"), "2012. évi CXVI. törvény");
/// ```
#[must_use]
pub fn act_identifier(year: u16, number: &str) -> String {
    format!("{year}. évi {number}. törvény")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_act_identifier() {
        assert!(is_act_identifier("2012. évi CXVI. törvény"));
        assert!(is_act_identifier("1959. évi IV. törvény"));
        assert!(!is_act_identifier("Ptk."));
        assert!(!is_act_identifier("2012. évi CXVI. törvény "));
        assert!(!is_act_identifier("12. évi I. törvény"));
    }

    #[test]
    fn test_validate_act_identifier() {
        assert!(validate_act_identifier("2012. évi I. törvény").is_ok());
        assert!(validate_act_identifier("").is_err());
        assert!(validate_act_identifier("Kódex").is_err());
    }

    #[test]
    fn test_act_identifier_round_trips_validation() {
        assert!(validate_act_identifier(&act_identifier(1997, "CXLI")).is_ok());
    }
}
