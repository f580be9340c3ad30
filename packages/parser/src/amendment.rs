//! Block amendment extraction.
//!
//! A paragraph whose sole child is a quoted block and whose intro is an
//! amendment-introducing sentence ("... helyébe a következő rendelkezés
//! lép:") gets its quoted text re-parsed as a structural fragment of the
//! amended act. The root element kind of that fragment is inferred from
//! the deepest level of the target reference. Every failure along the way
//! is non-fatal: the paragraph is left as an ordinary quoted block and the
//! reason is logged.

use regex::Regex;
use std::sync::LazyLock;

use torvenytar_structure::{
    Act, ActChild, Article, BlockAmendment, BlockAmendmentChildren, BlockAmendmentMetadata,
    ElementBody, IndentedLine, Paragraph, ParagraphChildren, Reference, ReferredKind,
};

use crate::article::ArticleParser;
use crate::config::MAX_ANALYZED_TEXT_LEN;
use crate::error::Result;
use crate::grammar::{BlockAmendmentNode, GrammarParser, ParseTree};
use crate::quoting::with_quote_levels;
use crate::semantic::convert_reference_node;
use crate::subarticle::{
    AlphabeticPointParser, AlphabeticSubpointParser, ElementParser, NumericPointParser,
    NumericSubpointParser, ParagraphParser,
};

/// Amendment intros end with ":", optionally followed by parenthesized or
/// bracketed context that belongs to the quoted text, not the lead-in.
#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
static CONTEXT_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.*:) ?(\(.*\)|\[.*\])$").expect("valid regex"));

/// Rewrite amendment paragraphs of an act into parsed block amendments.
///
/// Returns a new act; paragraphs that are not amendments, or whose quoted
/// content cannot be parsed, are carried over unchanged.
#[must_use]
pub fn extract_block_amendments(act: &Act, grammar: &dyn GrammarParser) -> Act {
    let children = act
        .children
        .iter()
        .map(|child| match child {
            ActChild::Article(article) => ActChild::Article(extract_in_article(article, grammar)),
            structural => structural.clone(),
        })
        .collect();
    Act {
        children,
        ..act.clone()
    }
}

fn extract_in_article(article: &Article, grammar: &dyn GrammarParser) -> Article {
    Article {
        children: article
            .children
            .iter()
            .map(|paragraph| extract_in_paragraph(paragraph, grammar))
            .collect(),
        ..article.clone()
    }
}

fn extract_in_paragraph(paragraph: &Paragraph, grammar: &dyn GrammarParser) -> Paragraph {
    let ElementBody::Children {
        intro: Some(intro),
        children: ParagraphChildren::QuotedBlocks(blocks),
        wrap_up,
    } = &paragraph.body
    else {
        return paragraph.clone();
    };
    if intro.chars().count() > MAX_ANALYZED_TEXT_LEN {
        return paragraph.clone();
    }

    let (lead_in, context_intro) = match CONTEXT_SUFFIX_RE.captures(intro) {
        Some(captures) => (
            captures[1].to_string(),
            Some(strip_outer_chars(&captures[2])),
        ),
        None => (intro.clone(), None),
    };
    let context_wrap_up = if context_intro.is_some() {
        wrap_up.as_deref().map(strip_outer_chars)
    } else {
        None
    };

    // Not parsing as an amendment sentence just means this is an ordinary
    // quoted block (e.g. an international agreement).
    let Ok(ParseTree::BlockAmendment(node)) = grammar.parse(&lead_in) else {
        return paragraph.clone();
    };
    let Some(metadata) = amendment_metadata(&node) else {
        tracing::warn!(
            intro = %lead_in,
            "block amendment target is not a single contiguous reference, keeping quoted block"
        );
        return paragraph.clone();
    };

    let Some(target) = metadata
        .amended_reference
        .as_ref()
        .or(metadata.inserted_reference.as_ref())
    else {
        return paragraph.clone();
    };
    let Some((part, kind)) = target.last_component() else {
        tracing::warn!("block amendment target has no structural component, keeping quoted block");
        return paragraph.clone();
    };
    let expected_first = part.first().to_string();
    if kind == ReferredKind::AlphabeticSubpoint && expected_first.chars().count() != 1 {
        // Would need the parent point's letter threaded in as a prefix.
        tracing::warn!(
            identifier = %expected_first,
            "prefixed subpoint amendments are not supported, keeping quoted block"
        );
        return paragraph.clone();
    }
    let [block] = blocks.as_slice() else {
        tracing::warn!(
            count = blocks.len(),
            "amendment paragraph with multiple quoted blocks, keeping them"
        );
        return paragraph.clone();
    };

    let children = match parse_amendment_children(kind, &expected_first, &block.lines) {
        Ok(children) => children,
        Err(err) => {
            tracing::warn!(
                error = %err,
                "quoted block could not be parsed as amendment body, keeping quoted block"
            );
            return paragraph.clone();
        }
    };

    Paragraph {
        identifier: paragraph.identifier.clone(),
        body: ElementBody::Children {
            intro: Some(lead_in),
            children: ParagraphChildren::BlockAmendment(Box::new(BlockAmendment {
                intro: context_intro,
                children,
                wrap_up: context_wrap_up,
            })),
            wrap_up: None,
        },
    }
}

/// Convert a grammar amendment node into target metadata.
///
/// Both the amended and the inserted expression must collapse to exactly
/// one reference: block amendments target a single contiguous range, never
/// a list. Returns `None` otherwise, which callers treat the same as a
/// grammar-level misparse.
fn amendment_metadata(node: &BlockAmendmentNode) -> Option<BlockAmendmentMetadata> {
    let act = node.act_reference.act_string()?;

    let single_target = |reference| {
        let converted = convert_reference_node(Some(act.clone()), reference);
        match converted.as_slice() {
            [only] => Some(only.reference.clone()),
            _ => None,
        }
    };

    let amended = match &node.amended_reference {
        Some(reference) => Some(single_target(reference)?),
        None => None,
    };
    let inserted = match &node.inserted_reference {
        Some(reference) => Some(single_target(reference)?),
        None => None,
    };

    let inserted = match (&amended, inserted) {
        (Some(amended), Some(inserted)) => {
            // The act has to be cut off first, or relative_to is a no-op.
            let relative = Reference {
                act: None,
                ..inserted
            };
            Some(relative.relative_to(amended))
        }
        (_, inserted) => inserted,
    };

    BlockAmendmentMetadata::new(amended, inserted).ok()
}

fn parse_amendment_children(
    kind: ReferredKind,
    first_identifier: &str,
    lines: &[IndentedLine],
) -> Result<BlockAmendmentChildren> {
    match kind {
        ReferredKind::Article => {
            split_article_blocks(first_identifier, lines).map(BlockAmendmentChildren::Articles)
        }
        ReferredKind::Paragraph => split_blocks(&ParagraphParser, first_identifier, lines)
            .map(BlockAmendmentChildren::Paragraphs),
        ReferredKind::AlphabeticPoint => {
            split_blocks(&AlphabeticPointParser, first_identifier, lines)
                .map(BlockAmendmentChildren::AlphabeticPoints)
        }
        ReferredKind::NumericPoint => split_blocks(&NumericPointParser, first_identifier, lines)
            .map(BlockAmendmentChildren::NumericPoints),
        ReferredKind::AlphabeticSubpoint => {
            let parser = AlphabeticSubpointParser {
                prefix: String::new(),
            };
            split_blocks(&parser, first_identifier, lines)
                .map(BlockAmendmentChildren::AlphabeticSubpoints)
        }
        ReferredKind::NumericSubpoint => {
            split_blocks(&NumericSubpointParser, first_identifier, lines)
                .map(BlockAmendmentChildren::NumericSubpoints)
        }
    }
}

/// Split the quoted lines at successive expected element headers and parse
/// each block.
fn split_blocks<P: ElementParser>(
    parser: &P,
    first_identifier: &str,
    lines: &[IndentedLine],
) -> Result<Vec<P::Element>> {
    let leveled = with_quote_levels(lines)?;
    let mut current_identifier = first_identifier.to_string();
    let mut upcoming_identifier = parser.next_identifier(&current_identifier);
    let mut current: Vec<IndentedLine> = Vec::new();
    let mut elements: Vec<P::Element> = Vec::new();
    for (quote_level, line) in leveled {
        let next_header = !current.is_empty()
            && quote_level == 0
            && upcoming_identifier
                .as_deref()
                .is_some_and(|id| parser.is_header(line, id));
        if next_header {
            elements.push(parser.parse(&current, &current_identifier)?);
            if let Some(next) = upcoming_identifier.take() {
                upcoming_identifier = parser.next_identifier(&next);
                current_identifier = next;
            }
            current.clear();
        }
        current.push(line.clone());
    }
    elements.push(parser.parse(&current, &current_identifier)?);
    Ok(elements)
}

fn split_article_blocks(first_identifier: &str, lines: &[IndentedLine]) -> Result<Vec<Article>> {
    let leveled = with_quote_levels(lines)?;
    let mut current_identifier = first_identifier.to_string();
    let mut upcoming_identifier = Article::next_identifier(&current_identifier);
    let mut current: Vec<IndentedLine> = Vec::new();
    let mut elements: Vec<Article> = Vec::new();
    for (quote_level, line) in leveled {
        let next_header = !current.is_empty()
            && quote_level == 0
            && upcoming_identifier
                .as_deref()
                .is_some_and(|id| ArticleParser::is_header_with_identifier(line, id));
        if next_header {
            elements.push(ArticleParser::parse_with_expected_identifier(
                &current,
                &current_identifier,
            )?);
            if let Some(next) = upcoming_identifier.take() {
                upcoming_identifier = Article::next_identifier(&next);
                current_identifier = next;
            }
            current.clear();
        }
        current.push(line.clone());
    }
    elements.push(ArticleParser::parse_with_expected_identifier(
        &current,
        &current_identifier,
    )?);
    Ok(elements)
}

fn strip_outer_chars(text: &str) -> String {
    let mut chars = text.chars();
    chars.next();
    chars.next_back();
    chars.as_str().to_string()
}
