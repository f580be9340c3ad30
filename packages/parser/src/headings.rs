//! Structural heading recognition.
//!
//! Books, parts, titles, chapters and subtitles are recognized from their
//! heading lines: each kind knows its own "first" heading and the expected
//! heading of the next sibling given the previous one. Numbering restarts
//! are allowed per level, since acts are not assumed well-formed; headings
//! are only kept as titles and never used as containers.

use std::collections::HashMap;

use torvenytar_structure::numbering::{int_to_ordinal_hun, int_to_roman, is_uppercase_hun};
use torvenytar_structure::{IndentedLine, StructuralElement, StructuralElementKind};

/// The special part sequence of certain codes, in place of ordinal naming.
const SPECIAL_PART_HEADERS: [&str; 3] = ["ÁLTALÁNOS RÉSZ", "KÜLÖNÖS RÉSZ", "ZÁRÓ RÉSZ"];

/// Kinds in recognition order, finest to coarsest, so nested headings are
/// not misclassified as outer ones.
const RECOGNITION_ORDER: [StructuralElementKind; 5] = [
    StructuralElementKind::Subtitle,
    StructuralElementKind::Chapter,
    StructuralElementKind::Title,
    StructuralElementKind::Part,
    StructuralElementKind::Book,
];

/// Last recognized heading of one kind; knows what its successor looks like.
#[derive(Debug, Clone)]
struct HeadingState {
    kind: StructuralElementKind,
    number: u32,
    /// Whether this part run uses the general/special/closing sequence.
    special_part: bool,
}

impl HeadingState {
    fn first(kind: StructuralElementKind, first_line: &IndentedLine) -> Self {
        let special_part = kind == StructuralElementKind::Part
            && first_line.content() == SPECIAL_PART_HEADERS[0];
        Self {
            kind,
            number: 1,
            special_part,
        }
    }

    fn successor(&self) -> Self {
        Self {
            kind: self.kind,
            number: self.number + 1,
            special_part: self.special_part,
        }
    }

    fn matches_next(&self, line: &IndentedLine) -> bool {
        match self.kind {
            StructuralElementKind::Book => ordinal_header(self.number + 1, "KÖNYV")
                .is_some_and(|expected| line.content() == expected),
            StructuralElementKind::Part => {
                if self.special_part {
                    SPECIAL_PART_HEADERS
                        .get(self.number as usize)
                        .is_some_and(|expected| line.content() == *expected)
                } else {
                    ordinal_header(self.number + 1, "RÉSZ")
                        .is_some_and(|expected| line.content() == expected)
                }
            }
            StructuralElementKind::Title => {
                line.content() == format!("{}. CÍM", int_to_roman(self.number + 1))
            }
            StructuralElementKind::Chapter => {
                line.content().to_uppercase() == format!("{}. FEJEZET", int_to_roman(self.number + 1))
            }
            StructuralElementKind::Subtitle => {
                is_subtitle_header(&format!("{}. ", self.number + 1), line)
            }
        }
    }

    fn to_element(&self, lines: &[IndentedLine]) -> StructuralElement {
        let title = if self.kind == StructuralElementKind::Subtitle {
            // The subtitle number shares the line with the title text.
            let prefix = format!("{}. ", self.number);
            let full: Vec<&str> = lines.iter().map(IndentedLine::content).collect();
            let full = full.join(" ");
            full.split_once(&prefix)
                .map_or(String::new(), |(_, rest)| rest.to_string())
        } else {
            let rest: Vec<&str> = lines[1..].iter().map(IndentedLine::content).collect();
            rest.join(" ")
        };
        StructuralElement {
            kind: self.kind,
            identifier: self.number.to_string(),
            title,
        }
    }
}

fn ordinal_header(number: u32, suffix: &str) -> Option<String> {
    int_to_ordinal_hun(number).map(|ordinal| format!("{} {suffix}", ordinal.to_uppercase()))
}

fn is_subtitle_header(prefix: &str, line: &IndentedLine) -> bool {
    line.content()
        .strip_prefix(prefix)
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| is_uppercase_hun(&c.to_string()))
}

fn is_first_header(kind: StructuralElementKind, line: &IndentedLine) -> bool {
    match kind {
        StructuralElementKind::Book => line.content() == "ELSŐ KÖNYV",
        StructuralElementKind::Part => {
            line.content() == "ELSŐ RÉSZ" || line.content() == SPECIAL_PART_HEADERS[0]
        }
        StructuralElementKind::Title => line.content() == "I. CÍM",
        StructuralElementKind::Chapter => line.content().to_uppercase() == "I. FEJEZET",
        StructuralElementKind::Subtitle => is_subtitle_header("1. ", line),
    }
}

/// Recognizes structural headings, tracking the last seen heading per kind.
///
/// A candidate line run is a heading when it is some kind's first heading,
/// or the successor of that kind's previously recognized heading. "Is
/// first" wins over "is next" so restarted numbering begins a new run.
#[derive(Debug, Default)]
pub struct HeadingRecognizer {
    last: HashMap<StructuralElementKind, HeadingState>,
}

impl HeadingRecognizer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Try to recognize `lines` as a structural heading.
    ///
    /// The first line is the heading proper, the rest is title text. On
    /// success the recognizer records the heading as the new last sibling
    /// of its kind.
    pub fn recognize(&mut self, lines: &[IndentedLine]) -> Option<StructuralElement> {
        let first_line = lines.first()?;
        for kind in RECOGNITION_ORDER {
            let state = if is_first_header(kind, first_line) {
                HeadingState::first(kind, first_line)
            } else if let Some(prev) = self.last.get(&kind) {
                if !prev.matches_next(first_line) {
                    continue;
                }
                prev.successor()
            } else {
                continue;
            };
            let element = state.to_element(lines);
            self.last.insert(kind, state);
            return Some(element);
        }
        None
    }
}
