//! Act-level structural parsing.
//!
//! The act body is split at left-justified article headers found at quote
//! level 0. The first block becomes the preamble; every further block is an
//! article, possibly followed by structural headings. Headings sit at the
//! end of a block, separated by empty lines, so they are recognized by
//! walking backwards over the trailing empty-line-delimited groups.

use torvenytar_structure::{Act, ActChild, IndentedLine, StructuralElement};

use crate::article::ArticleParser;
use crate::error::{ParseError, Result};
use crate::headings::HeadingRecognizer;
use crate::quoting::{quote_level_diff, similar_indent, with_quote_levels};
use crate::subarticle::join_nonempty;

/// Parser for whole acts.
pub struct ActParser;

impl ActParser {
    /// Build the document tree of an act from its cleaned line sequence.
    ///
    /// # Errors
    ///
    /// Unlike lower levels, the act root has no fallback: any structural
    /// error in a top-level run is fatal and is reported with the act
    /// identifier attached.
    pub fn parse(identifier: &str, subject: &str, lines: &[IndentedLine]) -> Result<Act> {
        let (preamble, children) =
            Self::parse_text(lines).map_err(|err| ParseError::Act {
                identifier: identifier.to_string(),
                source: Box::new(err),
            })?;
        Ok(Act {
            identifier: identifier.to_string(),
            subject: subject.to_string(),
            preamble,
            children,
            abbreviations: None,
            outgoing_references: None,
        })
    }

    fn parse_text(lines: &[IndentedLine]) -> Result<(String, Vec<ActChild>)> {
        let leveled = with_quote_levels(lines)?;

        let mut recognizer = HeadingRecognizer::new();
        let mut current_lines: Vec<IndentedLine> = Vec::new();
        let mut article_header_indent: Option<f64> = None;
        let mut preamble: Option<String> = None;
        let mut children: Vec<ActChild> = Vec::new();

        for (quote_level, line) in leveled {
            if quote_level == 0 && ArticleParser::is_header(line) {
                // Article numbers are left-justified; anything further
                // right is quoted or continuation material.
                let reference_indent = *article_header_indent.get_or_insert(line.indent());
                if similar_indent(line.indent(), reference_indent) {
                    Self::parse_block(&current_lines, &mut preamble, &mut children, &mut recognizer)?;
                    current_lines.clear();
                }
            }
            current_lines.push(line.clone());
        }
        Self::parse_block(&current_lines, &mut preamble, &mut children, &mut recognizer)?;

        Ok((preamble.unwrap_or_default(), children))
    }

    fn parse_block(
        lines: &[IndentedLine],
        preamble: &mut Option<String>,
        children: &mut Vec<ActChild>,
        recognizer: &mut HeadingRecognizer,
    ) -> Result<()> {
        let (body, headings) = Self::split_trailing_headings(lines.to_vec(), recognizer);
        if preamble.is_none() {
            *preamble = Some(join_nonempty(&body));
        } else {
            children.push(ActChild::Article(ArticleParser::parse(&body)?));
        }
        children.extend(headings.into_iter().map(ActChild::Structural));
        Ok(())
    }

    /// Peel structural headings off the end of a block.
    ///
    /// Heading groups are the trailing runs delimited by empty lines.
    /// Groups with unbalanced quoting are left alone, since they are most
    /// probably part of a quoted text that happens to look like a heading.
    fn split_trailing_headings(
        mut lines: Vec<IndentedLine>,
        recognizer: &mut HeadingRecognizer,
    ) -> (Vec<IndentedLine>, Vec<StructuralElement>) {
        let mut headings: Vec<StructuralElement> = Vec::new();
        while lines.last().is_some_and(IndentedLine::is_empty) {
            lines.pop();
            let Some(last_empty) = lines.iter().rposition(IndentedLine::is_empty) else {
                break;
            };
            let candidate_start = last_empty + 1;
            if candidate_start >= lines.len() {
                continue;
            }
            let candidate = &lines[candidate_start..];
            let candidate_text: Vec<&str> =
                candidate.iter().map(IndentedLine::content).collect();
            if quote_level_diff(&candidate_text.join(" ")) != 0 {
                break;
            }
            match recognizer.recognize(candidate) {
                None => break,
                Some(element) => {
                    headings.insert(0, element);
                    lines.truncate(candidate_start);
                }
            }
        }
        (lines, headings)
    }
}
