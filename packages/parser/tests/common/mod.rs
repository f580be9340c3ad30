//! Shared helpers for integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use std::collections::HashMap;

use torvenytar_parser::grammar::{GrammarError, GrammarParser, ParseTree, Span};
use torvenytar_structure::{IndentedLine, LinePart};

/// Build input lines from plain text, one part per character.
///
/// Leading spaces become indentation, interior space runs collapse to a
/// single space, blank lines become the empty separator line.
pub fn lines_of(text: &str) -> Vec<IndentedLine> {
    text.lines().map(line_from).collect()
}

fn line_from(raw: &str) -> IndentedLine {
    let mut parts: Vec<LinePart> = Vec::new();
    let mut pending_space: Option<usize> = None;
    for (column, c) in raw.chars().enumerate() {
        if c == ' ' {
            if !parts.is_empty() && pending_space.is_none() {
                pending_space = Some(column);
            }
            continue;
        }
        if let Some(space_column) = pending_space.take() {
            parts.push(LinePart::new(5.0 * (space_column as f64 + 1.0), " "));
        }
        parts.push(LinePart::new(5.0 * (column as f64 + 1.0), c.to_string()));
    }
    IndentedLine::from_parts(parts)
}

/// Character span of `needle` within `haystack`.
pub fn span_of(haystack: &str, needle: &str) -> Span {
    let byte_start = haystack.find(needle).expect("needle present in haystack");
    let start = haystack[..byte_start].chars().count();
    Span::new(start, start + needle.chars().count())
}

/// Grammar parser stub with canned responses keyed by exact input text.
pub struct StubGrammar {
    responses: HashMap<String, ParseTree>,
}

impl StubGrammar {
    pub fn new(responses: impl IntoIterator<Item = (String, ParseTree)>) -> Self {
        Self {
            responses: responses.into_iter().collect(),
        }
    }
}

impl GrammarParser for StubGrammar {
    fn parse(&self, text: &str) -> Result<ParseTree, GrammarError> {
        self.responses
            .get(text)
            .cloned()
            .ok_or_else(|| GrammarError(format!("no parse for '{text}'")))
    }
}
