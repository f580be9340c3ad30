//! Article parsing.
//!
//! An article starts with a "§" numbering header ("17. §", "3:116. §",
//! "212/A. §"), optionally followed by a bracketed non-standard title, and
//! contains either a single unnumbered paragraph or a run of numbered
//! paragraphs.

use regex::Regex;
use std::sync::LazyLock;

use torvenytar_structure::{Article, IndentedLine};

use crate::error::{ParseError, Result};
use crate::subarticle::{extract_multiple, ElementParser, ParagraphParser};

/// Article numbering header; supports plain, "book:number" and
/// "number/letter" identifier shapes.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static ARTICLE_HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+:)?([0-9]+(?:/[A-Z])?)\. ?§ *(.*)$").expect("valid regex"));

/// Parser for "§"-numbered articles.
pub struct ArticleParser;

impl ArticleParser {
    /// Whether a line carries an article numbering header.
    #[must_use]
    pub fn is_header(line: &IndentedLine) -> bool {
        ARTICLE_HEADER_RE.is_match(line.content())
    }

    /// Whether a line is the header of the article with a known identifier.
    #[must_use]
    pub fn is_header_with_identifier(line: &IndentedLine, identifier: &str) -> bool {
        line.content().starts_with(&format!("{identifier}. §"))
            || line.content().starts_with(&format!("{identifier}.§"))
    }

    /// Parse an article from its line run (header line included).
    ///
    /// # Errors
    ///
    /// Fails when the header is malformed or the body violates the article
    /// contract (junk around paragraph runs, malformed sub-elements).
    pub fn parse(lines: &[IndentedLine]) -> Result<Article> {
        Self::parse_impl(lines, None)
    }

    /// Parse an article whose identifier is dictated by the context, as in
    /// block amendment bodies.
    pub(crate) fn parse_with_expected_identifier(
        lines: &[IndentedLine],
        expected: &str,
    ) -> Result<Article> {
        Self::parse_impl(lines, Some(expected))
    }

    fn parse_impl(lines: &[IndentedLine], expected: Option<&str>) -> Result<Article> {
        let first = lines
            .first()
            .ok_or_else(|| ParseError::Structural("empty article run".to_string()))?;
        let captures = ARTICLE_HEADER_RE.captures(first.content()).ok_or_else(|| {
            ParseError::Structural(format!("'{}' is not an article header", first.content()))
        })?;

        let identifier = match captures.get(1) {
            // The book prefix group already includes the ":".
            Some(book) => format!("{}{}", book.as_str(), &captures[2]),
            None => captures[2].to_string(),
        };
        if let Some(expected) = expected {
            if expected != identifier {
                return Err(ParseError::Structural(format!(
                    "expected article {expected}, found {identifier}"
                )));
            }
        }

        let rest = captures
            .get(3)
            .ok_or_else(|| ParseError::Structural("article header without body".to_string()))?;
        // Regex offsets are bytes; line slicing works in characters.
        let start = first.content()[..rest.start()].chars().count();
        let end = start + rest.as_str().chars().count();
        let truncated_first = first.slice(start as isize, Some(end as isize))?;

        let mut body_lines = vec![truncated_first];
        body_lines.extend_from_slice(&lines[1..]);
        Self::parse_body(&identifier, &body_lines).map_err(|err| ParseError::Article {
            identifier,
            source: Box::new(err),
        })
    }

    fn parse_body(identifier: &str, lines: &[IndentedLine]) -> Result<Article> {
        let mut title = None;
        let mut rest = lines;

        // Nonstandard, but a de facto convention: articles may carry a
        // bracketed title, e.g. "3:116. § [A társaság képviselete]",
        // possibly broken to a second line.
        let first_content = rest[0].content();
        if first_content.starts_with('[') {
            if first_content.ends_with(']') {
                title = Some(first_content[1..first_content.len() - 1].to_string());
                rest = &rest[1..];
            } else if rest.len() > 1 && rest[1].content().ends_with(']') {
                let second = rest[1].content();
                title = Some(format!(
                    "{} {}",
                    &first_content[1..],
                    &second[..second.len() - 1]
                ));
                rest = &rest[2..];
            } else {
                return Err(ParseError::Structural(
                    "article titles over two lines are not supported".to_string(),
                ));
            }
        }

        // Tolerate a single separator line between the title and the body;
        // happens in rare amendment texts.
        if rest.first().is_some_and(IndentedLine::is_empty) {
            rest = &rest[1..];
        }
        if rest.is_empty() {
            return Err(ParseError::Structural("article has no body".to_string()));
        }

        let parser = ParagraphParser;
        let children = if parser.is_header(&rest[0], &parser.first_identifier()) {
            let run = extract_multiple(&parser, rest)?;
            if run.intro.is_some() {
                return Err(ParseError::Structural(
                    "junk detected in article before first paragraph".to_string(),
                ));
            }
            if run.wrap_up.is_some() {
                return Err(ParseError::Structural(
                    "junk detected in article after last paragraph".to_string(),
                ));
            }
            run.elements
        } else {
            vec![parser.parse_any(rest, None)?]
        };

        Ok(Article::new(identifier, title, children)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use torvenytar_structure::LinePart;

    fn line_at(indent: f64, text: &str) -> IndentedLine {
        IndentedLine::from_parts(
            text.chars()
                .enumerate()
                .map(|(i, c)| LinePart::new(indent + i as f64 * 5.0, c.to_string()))
                .collect(),
        )
    }

    fn line(text: &str) -> IndentedLine {
        line_at(5.0, text)
    }

    #[test]
    fn test_is_header_shapes() {
        assert!(ArticleParser::is_header(&line("17. § Valami szöveg")));
        assert!(ArticleParser::is_header(&line("3:116. §  [Cím]")));
        assert!(ArticleParser::is_header(&line("212/A. § (1) Szöveg")));
        assert!(ArticleParser::is_header(&line("1.§ Szorosan szedve")));
        assert!(!ArticleParser::is_header(&line("(1) bekezdés")));
        assert!(!ArticleParser::is_header(&line("a) pont")));
    }

    #[test]
    fn test_parse_single_unnamed_paragraph() {
        let article =
            ArticleParser::parse(&[line("2. § Ez a törvény a kihirdetését követő napon lép hatályba.")])
                .unwrap();
        assert_eq!(article.identifier, "2");
        assert_eq!(article.children.len(), 1);
        assert_eq!(article.children[0].identifier, None);
        assert_eq!(
            article.children[0].body.text(),
            Some("Ez a törvény a kihirdetését követő napon lép hatályba.")
        );
    }

    #[test]
    fn test_parse_numbered_paragraphs() {
        let article = ArticleParser::parse(&[
            line("5. § (1) Az első bekezdés szövege."),
            line("(2) A második bekezdés szövege."),
        ])
        .unwrap();
        assert_eq!(article.identifier, "5");
        assert_eq!(article.children.len(), 2);
        assert_eq!(article.children[1].identifier.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_book_prefixed_identifier() {
        let article = ArticleParser::parse(&[line("3:116. § A társaságot a vezető képviseli.")])
            .unwrap();
        assert_eq!(article.identifier, "3:116");
    }

    #[test]
    fn test_parse_bracketed_title() {
        let article = ArticleParser::parse(&[
            line("3:116. § [A társaság képviselete]"),
            line("(1) A társaságot a vezető tisztségviselő képviseli."),
        ])
        .unwrap();
        assert_eq!(article.title.as_deref(), Some("A társaság képviselete"));
        assert_eq!(article.children[0].identifier.as_deref(), Some("1"));
    }

    #[test]
    fn test_parse_two_line_title() {
        let article = ArticleParser::parse(&[
            line("294. § [Egyes rendelkezések"),
            line("hatályon kívül helyezése]"),
            line("(1) Hatályát veszti a korábbi szabályozás."),
        ])
        .unwrap();
        assert_eq!(
            article.title.as_deref(),
            Some("Egyes rendelkezések hatályon kívül helyezése")
        );
    }

    #[test]
    fn test_expected_identifier_mismatch() {
        let result =
            ArticleParser::parse_with_expected_identifier(&[line("7. § Szöveg.")], "8");
        assert!(result.is_err());
    }
}
