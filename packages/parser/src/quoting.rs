//! Quote-level tracking over line runs.
//!
//! Amendments embed verbatim text between „ and ” marks, possibly spanning
//! many lines and nesting further quotes. Structural decisions (header
//! detection, heading recognition) must only happen at quote level 0, so a
//! run is always walked together with the quote level at the start of each
//! line.

use torvenytar_structure::IndentedLine;

use crate::config::{QUOTE_CLOSE_CHAR, QUOTE_OPEN_CHARS};
use crate::error::{ParseError, Result};

/// Net quote-level change of a string: opening marks minus closing marks.
#[must_use]
pub fn quote_level_diff(text: &str) -> i64 {
    text.chars()
        .map(|c| {
            if QUOTE_OPEN_CHARS.contains(&c) {
                1
            } else if c == QUOTE_CLOSE_CHAR {
                -1
            } else {
                0
            }
        })
        .sum()
}

/// Pair every line with the quote level at its start.
///
/// # Errors
///
/// Returns [`ParseError::QuoteImbalance`] when the run does not return to
/// level 0 at the end; downstream quoted-block detection depends on
/// correctly delimited quotes, so the imbalance is fatal for the run.
pub fn with_quote_levels(lines: &[IndentedLine]) -> Result<Vec<(i64, &IndentedLine)>> {
    let mut level = 0i64;
    let mut result = Vec::with_capacity(lines.len());
    for line in lines {
        result.push((level, line));
        level += quote_level_diff(line.content());
    }
    if level != 0 {
        return Err(ParseError::QuoteImbalance { level });
    }
    Ok(result)
}

/// Indentation comparison with the extractor's jitter tolerance.
#[must_use]
pub fn similar_indent(a: f64, b: f64) -> bool {
    (a - b).abs() < 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use torvenytar_structure::LinePart;

    fn line(text: &str) -> IndentedLine {
        IndentedLine::from_parts(
            text.chars()
                .enumerate()
                .map(|(i, c)| LinePart::new(5.0 + i as f64 * 5.0, c.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_quote_level_diff() {
        assert_eq!(quote_level_diff("nincs idézet"), 0);
        assert_eq!(quote_level_diff("„nyitva"), 1);
        assert_eq!(quote_level_diff("„zárva”"), 0);
        assert_eq!(quote_level_diff("“alternatív” és „rendes”"), 0);
        assert_eq!(quote_level_diff("vége”"), -1);
    }

    #[test]
    fn test_with_quote_levels() {
        let lines = vec![line("intro"), line("„idézet"), line("vége” után")];
        let leveled = with_quote_levels(&lines).unwrap();
        let levels: Vec<i64> = leveled.iter().map(|(l, _)| *l).collect();
        assert_eq!(levels, vec![0, 0, 1]);
    }

    #[test]
    fn test_quote_imbalance_is_fatal() {
        let lines = vec![line("„sosem zárul be")];
        assert!(matches!(
            with_quote_levels(&lines),
            Err(ParseError::QuoteImbalance { level: 1 })
        ));
    }

    #[test]
    fn test_similar_indent() {
        assert!(similar_indent(10.0, 10.5));
        assert!(!similar_indent(10.0, 15.0));
    }
}
