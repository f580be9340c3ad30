//! Sub-article tree building.
//!
//! A paragraph, point or subpoint run is split by scanning for the element
//! kind's header prefix applied to successive identifiers, starting from
//! the kind's first valid identifier. Lines before the first header become
//! the intro; trailing lines at header indentation become the wrap-up.
//! Each parent kind tries its allowed child kinds in a fixed order and
//! falls back to literal text when none of them is found, driven by the
//! [`ParseError::ElementNotFound`] signal.

use torvenytar_structure::{
    AlphabeticPoint, AlphabeticPointChildren, AlphabeticSubpoint, ElementBody, IndentedLine,
    NumericPoint, NumericPointChildren, NumericSubpoint, Paragraph, ParagraphChildren,
    QuotedBlock,
};

use crate::error::{ParseError, Result};
use crate::quoting::{quote_level_diff, similar_indent, with_quote_levels};

/// Join line contents with single spaces.
pub(crate) fn join_lines(lines: &[IndentedLine]) -> String {
    let contents: Vec<&str> = lines.iter().map(IndentedLine::content).collect();
    contents.join(" ")
}

/// Join non-empty line contents with single spaces.
pub(crate) fn join_nonempty(lines: &[IndentedLine]) -> String {
    let contents: Vec<&str> = lines
        .iter()
        .filter(|l| !l.is_empty())
        .map(IndentedLine::content)
        .collect();
    contents.join(" ")
}

/// One sub-article element kind's parsing behavior.
pub(crate) trait ElementParser {
    type Element;

    /// Kind name used in diagnostics.
    const KIND: &'static str;
    /// Whether the parent must have intro text before the first element.
    const MUST_HAVE_INTRO: bool;
    /// Whether a single element of this kind is not a valid run.
    const MUST_HAVE_MULTIPLE: bool;
    /// Whether trailing parent wrap-up text may follow the last element.
    const CAN_HAVE_WRAP_UP: bool;

    fn first_identifier(&self) -> String;

    /// Successor identifier; `None` when the numbering scheme has no
    /// successor, in which case no further headers can match.
    fn next_identifier(&self, identifier: &str) -> Option<String>;

    fn header_prefix(&self, identifier: &str) -> String;

    fn is_header(&self, line: &IndentedLine, identifier: &str) -> bool {
        line.content().starts_with(&self.header_prefix(identifier))
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<Self::Element>;
}

/// Strip the element header prefix off the first line of a run.
fn strip_header<P: ElementParser>(
    parser: &P,
    lines: &[IndentedLine],
    identifier: &str,
) -> Result<Vec<IndentedLine>> {
    let prefix = parser.header_prefix(identifier);
    let first = lines.first().ok_or_else(|| ParseError::InvalidHeader {
        element_kind: P::KIND,
        line: String::new(),
        prefix: prefix.clone(),
    })?;
    if !first.content().starts_with(&prefix) {
        return Err(ParseError::InvalidHeader {
            element_kind: P::KIND,
            line: first.content().to_string(),
            prefix,
        });
    }
    let mut result = vec![first.slice(prefix.chars().count() as isize, None)?];
    result.extend_from_slice(&lines[1..]);
    Ok(result)
}

/// The result of splitting a run into elements of one kind.
#[derive(Debug)]
pub(crate) struct ExtractedRun<E> {
    pub intro: Option<String>,
    pub elements: Vec<E>,
    pub wrap_up: Option<String>,
}

/// Split a line run into intro, elements and wrap-up.
///
/// Headers are only recognized at quote level 0, and only at or left of
/// the established header indentation (paragraph numbers are left-aligned,
/// so "(10)" starts slightly left of "(9)"). Fails with
/// [`ParseError::ElementNotFound`] when the run does not satisfy the
/// kind's intro/multiplicity requirements; callers fall back to a plainer
/// representation on that error.
pub(crate) fn extract_multiple<P: ElementParser>(
    parser: &P,
    lines: &[IndentedLine],
) -> Result<ExtractedRun<P::Element>> {
    let leveled = with_quote_levels(lines)?;

    let mut intro: Option<String> = None;
    let mut elements: Vec<P::Element> = Vec::new();
    let mut wrap_up: Option<String> = None;
    let mut current_identifier: Option<String> = None;
    let mut upcoming_identifier: Option<String> = Some(parser.first_identifier());
    let mut current_lines: Vec<IndentedLine> = Vec::new();
    let mut header_indent: Option<f64> = None;

    for (quote_level, line) in leveled {
        let indent_allows_header = header_indent
            .is_none_or(|h| similar_indent(h, line.indent()) || line.indent() < h);
        let matched_identifier = if quote_level == 0 && indent_allows_header {
            upcoming_identifier
                .as_ref()
                .filter(|id| parser.is_header(line, id))
                .cloned()
        } else {
            None
        };
        if let Some(identifier) = matched_identifier {
            match current_identifier.take() {
                None => {
                    if !current_lines.is_empty() {
                        intro = Some(join_lines(&current_lines));
                    }
                }
                Some(previous) => {
                    elements.push(parser.parse(&current_lines, &previous)?);
                }
            }
            header_indent = Some(line.indent());
            upcoming_identifier = parser.next_identifier(&identifier);
            current_identifier = Some(identifier);
            current_lines.clear();
        }
        current_lines.push(line.clone());
    }

    let Some(identifier) = current_identifier else {
        return Err(ParseError::ElementNotFound {
            element_kind: P::KIND,
        });
    };
    if elements.is_empty() && P::MUST_HAVE_MULTIPLE {
        return Err(ParseError::ElementNotFound {
            element_kind: P::KIND,
        });
    }
    if intro.is_none() && P::MUST_HAVE_INTRO {
        return Err(ParseError::ElementNotFound {
            element_kind: P::KIND,
        });
    }

    if P::CAN_HAVE_WRAP_UP {
        // Heuristic: line-broken elements are indented deeper than their
        // headers, while the wrap-up returns to header indentation.
        let last_header_indent = current_lines[0].indent();
        let mut collected: Vec<String> = Vec::new();
        while current_lines.len() > 1
            && current_lines
                .last()
                .is_some_and(|l| similar_indent(l.indent(), last_header_indent))
        {
            if let Some(line) = current_lines.pop() {
                collected.push(line.content().to_string());
            }
        }
        if !collected.is_empty() {
            collected.reverse();
            wrap_up = Some(collected.join(" "));
        }
    }

    elements.push(parser.parse(&current_lines, &identifier)?);
    Ok(ExtractedRun {
        intro,
        elements,
        wrap_up,
    })
}

/// A successfully detected quoted-block run.
#[derive(Debug)]
pub(crate) struct QuotedRun {
    pub intro: String,
    pub blocks: Vec<QuotedBlock>,
    pub wrap_up: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QuoteParseState {
    Start,
    Intro,
    QuotedBlock,
    WrapUpMaybe,
    WrapUp,
}

fn starts_with_open_quote(line: &IndentedLine) -> bool {
    line.content()
        .chars()
        .next()
        .is_some_and(|c| crate::config::QUOTE_OPEN_CHARS.contains(&c))
}

fn ends_with_close_quote(line: &IndentedLine) -> bool {
    line.content().ends_with('”')
}

/// Detect an intro + quoted blocks + wrap-up run.
///
/// Empty lines are kept inside quoted blocks verbatim but are transparent
/// everywhere else. Fails with [`ParseError::ElementNotFound`] when the
/// run is not of this shape at all.
pub(crate) fn try_parse_quoted_blocks(lines: &[IndentedLine]) -> Result<QuotedRun> {
    let leveled = with_quote_levels(lines)?;

    let mut state = QuoteParseState::Start;
    let mut intro = String::new();
    let mut blocks: Vec<QuotedBlock> = Vec::new();
    let mut quoted_lines: Vec<IndentedLine> = Vec::new();
    let mut wrap_up = String::new();

    for (quote_level, line) in leveled {
        match state {
            QuoteParseState::Start => {
                if !line.is_empty() {
                    intro = line.content().to_string();
                    state = QuoteParseState::Intro;
                }
            }
            QuoteParseState::Intro => {
                if !line.is_empty() {
                    if starts_with_open_quote(line) && quote_level == 0 {
                        if ends_with_close_quote(line) {
                            blocks.push(QuotedBlock {
                                lines: vec![line.slice(1, Some(-1))?],
                            });
                            state = QuoteParseState::WrapUpMaybe;
                        } else {
                            quoted_lines.push(line.slice(1, None)?);
                            state = QuoteParseState::QuotedBlock;
                        }
                    } else {
                        intro.push(' ');
                        intro.push_str(line.content());
                    }
                }
            }
            QuoteParseState::QuotedBlock => {
                let level_at_line_end = quote_level + quote_level_diff(line.content());
                if !line.is_empty() && ends_with_close_quote(line) && level_at_line_end == 0 {
                    quoted_lines.push(line.slice(0, Some(-1))?);
                    blocks.push(QuotedBlock {
                        lines: std::mem::take(&mut quoted_lines),
                    });
                    state = QuoteParseState::WrapUpMaybe;
                } else {
                    // Empty lines inside the quote are kept as-is.
                    quoted_lines.push(line.clone());
                }
            }
            QuoteParseState::WrapUpMaybe => {
                if !line.is_empty() {
                    if starts_with_open_quote(line) && quote_level == 0 {
                        if ends_with_close_quote(line) {
                            blocks.push(QuotedBlock {
                                lines: vec![line.slice(1, Some(-1))?],
                            });
                        } else {
                            quoted_lines.push(line.slice(1, None)?);
                            state = QuoteParseState::QuotedBlock;
                        }
                    } else {
                        wrap_up = line.content().to_string();
                        state = QuoteParseState::WrapUp;
                    }
                }
            }
            QuoteParseState::WrapUp => {
                if !line.is_empty() {
                    wrap_up.push(' ');
                    wrap_up.push_str(line.content());
                }
            }
        }
    }

    match state {
        QuoteParseState::WrapUpMaybe => Ok(QuotedRun {
            intro,
            blocks,
            wrap_up: None,
        }),
        QuoteParseState::WrapUp => Ok(QuotedRun {
            intro,
            blocks,
            wrap_up: Some(wrap_up),
        }),
        _ => Err(ParseError::ElementNotFound {
            element_kind: "quoted block",
        }),
    }
}

/// Parser for alphabetic subpoints, e.g. "c)".
///
/// Subpoints of an alphabetic point carry the parent point's letter as an
/// identifier prefix ("ac)" under point "a)"); the prefix is threaded in
/// explicitly and is empty under numeric points.
pub(crate) struct AlphabeticSubpointParser {
    pub prefix: String,
}

impl ElementParser for AlphabeticSubpointParser {
    type Element = AlphabeticSubpoint;

    const KIND: &'static str = "alphabetic subpoint";
    const MUST_HAVE_INTRO: bool = true;
    const MUST_HAVE_MULTIPLE: bool = true;
    const CAN_HAVE_WRAP_UP: bool = true;

    fn first_identifier(&self) -> String {
        format!("{}a", self.prefix)
    }

    fn next_identifier(&self, identifier: &str) -> Option<String> {
        AlphabeticSubpoint::next_identifier(identifier)
    }

    fn header_prefix(&self, identifier: &str) -> String {
        AlphabeticSubpoint::header_prefix(identifier)
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<AlphabeticSubpoint> {
        // Subpoints have no further subdivisions.
        let body = strip_header(self, lines, identifier)?;
        Ok(AlphabeticSubpoint {
            identifier: identifier.to_string(),
            text: join_nonempty(&body),
        })
    }
}

/// Parser for numeric subpoints, e.g. "1." below a point.
pub(crate) struct NumericSubpointParser;

impl ElementParser for NumericSubpointParser {
    type Element = NumericSubpoint;

    const KIND: &'static str = "numeric subpoint";
    const MUST_HAVE_INTRO: bool = true;
    const MUST_HAVE_MULTIPLE: bool = true;
    const CAN_HAVE_WRAP_UP: bool = false;

    fn first_identifier(&self) -> String {
        "1".to_string()
    }

    fn next_identifier(&self, identifier: &str) -> Option<String> {
        NumericSubpoint::next_identifier(identifier)
    }

    fn header_prefix(&self, identifier: &str) -> String {
        NumericSubpoint::header_prefix(identifier)
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<NumericSubpoint> {
        let body = strip_header(self, lines, identifier)?;
        Ok(NumericSubpoint {
            identifier: identifier.to_string(),
            text: join_nonempty(&body),
        })
    }
}

/// Parser for numeric points, e.g. "12." or "3a.".
pub(crate) struct NumericPointParser;

impl ElementParser for NumericPointParser {
    type Element = NumericPoint;

    const KIND: &'static str = "numeric point";
    const MUST_HAVE_INTRO: bool = true;
    const MUST_HAVE_MULTIPLE: bool = true;
    // Numbered lists are usually not well-indented, so the wrap-up
    // heuristic would eat continuation lines of the last point.
    const CAN_HAVE_WRAP_UP: bool = false;

    fn first_identifier(&self) -> String {
        "1".to_string()
    }

    fn next_identifier(&self, identifier: &str) -> Option<String> {
        NumericPoint::next_identifier(identifier)
    }

    fn header_prefix(&self, identifier: &str) -> String {
        NumericPoint::header_prefix(identifier)
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<NumericPoint> {
        let body_lines = strip_header(self, lines, identifier)?;
        // Numeric points may only have alphabetic subpoints.
        let subpoint_parser = AlphabeticSubpointParser {
            prefix: String::new(),
        };
        let body = match extract_multiple(&subpoint_parser, &body_lines) {
            Ok(run) => ElementBody::Children {
                intro: run.intro,
                children: NumericPointChildren::AlphabeticSubpoints(run.elements),
                wrap_up: run.wrap_up,
            },
            Err(err) if err.is_element_not_found() => {
                ElementBody::Text(join_nonempty(&body_lines))
            }
            Err(err) => return Err(err),
        };
        Ok(NumericPoint {
            identifier: identifier.to_string(),
            body,
        })
    }
}

/// Parser for alphabetic points, e.g. "a)".
pub(crate) struct AlphabeticPointParser;

impl ElementParser for AlphabeticPointParser {
    type Element = AlphabeticPoint;

    const KIND: &'static str = "alphabetic point";
    const MUST_HAVE_INTRO: bool = true;
    const MUST_HAVE_MULTIPLE: bool = true;
    const CAN_HAVE_WRAP_UP: bool = true;

    fn first_identifier(&self) -> String {
        "a".to_string()
    }

    fn next_identifier(&self, identifier: &str) -> Option<String> {
        AlphabeticPoint::next_identifier(identifier)
    }

    fn header_prefix(&self, identifier: &str) -> String {
        AlphabeticPoint::header_prefix(identifier)
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<AlphabeticPoint> {
        let body_lines = strip_header(self, lines, identifier)?;
        let prefixed_parser = AlphabeticSubpointParser {
            prefix: identifier.to_string(),
        };
        let body = match extract_multiple(&prefixed_parser, &body_lines) {
            Ok(run) => ElementBody::Children {
                intro: run.intro,
                children: AlphabeticPointChildren::AlphabeticSubpoints(run.elements),
                wrap_up: run.wrap_up,
            },
            Err(err) if err.is_element_not_found() => {
                match extract_multiple(&NumericSubpointParser, &body_lines) {
                    Ok(run) => ElementBody::Children {
                        intro: run.intro,
                        children: AlphabeticPointChildren::NumericSubpoints(run.elements),
                        wrap_up: run.wrap_up,
                    },
                    Err(err) if err.is_element_not_found() => {
                        ElementBody::Text(join_nonempty(&body_lines))
                    }
                    Err(err) => return Err(err),
                }
            }
            Err(err) => return Err(err),
        };
        Ok(AlphabeticPoint {
            identifier: identifier.to_string(),
            body,
        })
    }
}

/// Parser for paragraphs, e.g. "(1)".
pub(crate) struct ParagraphParser;

impl ParagraphParser {
    /// Parse a paragraph run, `None` meaning the unnumbered single
    /// paragraph of a header-less article.
    pub fn parse_any(
        &self,
        lines: &[IndentedLine],
        identifier: Option<&str>,
    ) -> Result<Paragraph> {
        let prefix = Paragraph::header_prefix(identifier);
        let first = lines.first().ok_or_else(|| ParseError::InvalidHeader {
            element_kind: Self::KIND,
            line: String::new(),
            prefix: prefix.clone(),
        })?;
        if !first.content().starts_with(&prefix) {
            return Err(ParseError::InvalidHeader {
                element_kind: Self::KIND,
                line: first.content().to_string(),
                prefix,
            });
        }
        let mut body_lines = vec![first.slice(prefix.chars().count() as isize, None)?];
        body_lines.extend_from_slice(&lines[1..]);

        let body = self.parse_body(&body_lines)?;
        Ok(Paragraph {
            identifier: identifier.map(str::to_string),
            body,
        })
    }

    fn parse_body(&self, lines: &[IndentedLine]) -> Result<ElementBody<ParagraphChildren>> {
        // Quoted blocks are looked for at paragraph level only: amendments
        // and international agreements appear here, and articles always
        // parse into paragraphs first.
        match try_parse_quoted_blocks(lines) {
            Ok(run) => {
                return Ok(ElementBody::Children {
                    intro: Some(run.intro),
                    children: ParagraphChildren::QuotedBlocks(run.blocks),
                    wrap_up: run.wrap_up,
                })
            }
            Err(err) if err.is_element_not_found() => {}
            Err(err) => return Err(err),
        }

        // Empty lines are only needed for structural detection; from here
        // on they would just confuse header scanning.
        let lines: Vec<IndentedLine> = lines.iter().filter(|l| !l.is_empty()).cloned().collect();

        match extract_multiple(&NumericPointParser, &lines) {
            Ok(run) => {
                return Ok(ElementBody::Children {
                    intro: run.intro,
                    children: ParagraphChildren::NumericPoints(run.elements),
                    wrap_up: run.wrap_up,
                })
            }
            Err(err) if err.is_element_not_found() => {}
            Err(err) => return Err(err),
        }

        match extract_multiple(&AlphabeticPointParser, &lines) {
            Ok(run) => {
                return Ok(ElementBody::Children {
                    intro: run.intro,
                    children: ParagraphChildren::AlphabeticPoints(run.elements),
                    wrap_up: run.wrap_up,
                })
            }
            Err(err) if err.is_element_not_found() => {}
            Err(err) => return Err(err),
        }

        Ok(ElementBody::Text(join_nonempty(&lines)))
    }
}

impl ElementParser for ParagraphParser {
    type Element = Paragraph;

    const KIND: &'static str = "paragraph";
    const MUST_HAVE_INTRO: bool = false;
    const MUST_HAVE_MULTIPLE: bool = false;
    const CAN_HAVE_WRAP_UP: bool = false;

    fn first_identifier(&self) -> String {
        "1".to_string()
    }

    fn next_identifier(&self, identifier: &str) -> Option<String> {
        Paragraph::next_identifier(identifier)
    }

    fn header_prefix(&self, identifier: &str) -> String {
        Paragraph::header_prefix(Some(identifier))
    }

    fn parse(&self, lines: &[IndentedLine], identifier: &str) -> Result<Paragraph> {
        self.parse_any(lines, Some(identifier))
    }
}
