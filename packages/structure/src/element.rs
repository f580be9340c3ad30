//! The typed document hierarchy of a legal act.
//!
//! An [`Act`] contains structural headings and articles; articles contain
//! paragraphs; paragraphs contain points, quoted blocks or a block
//! amendment; points contain subpoints. Each element either holds literal
//! `text` or an `intro`/`children`/`wrap_up` triple, and all children of an
//! element share one concrete type. Both rules are encoded in the types:
//! [`ElementBody`] forces the exactly-one-of choice, and the per-parent
//! children enums ([`ParagraphChildren`], [`AlphabeticPointChildren`], ...)
//! are closed over the allowed child types, so a mixed or out-of-place
//! child list cannot be constructed at all.
//!
//! All structures are built once, bottom-up, and are immutable afterwards;
//! later passes rebuild affected nodes instead of mutating them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StructureError};
use crate::line::IndentedLine;
use crate::numbering::{
    int_to_ordinal_hun, int_to_roman, next_alphabetic_point_identifier,
    next_alphabetic_subpoint_identifier, next_article_identifier, next_numeric_identifier,
};
use crate::reference::{ActIdAbbreviation, OutgoingReference, RefPart, Reference};

/// The non-addressable heading levels, finest to coarsest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralElementKind {
    Subtitle,
    Chapter,
    Title,
    Part,
    Book,
}

impl StructuralElementKind {
    /// Human-readable kind name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Subtitle => "subtitle",
            Self::Chapter => "chapter",
            Self::Title => "title",
            Self::Part => "part",
            Self::Book => "book",
        }
    }
}

/// A structural heading: book, part, title, chapter or subtitle.
///
/// Headings group articles for organization only; they are not addressable
/// by references. The identifier is the decimal sequence number within the
/// level (numbering may restart, acts are not assumed well-formed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuralElement {
    pub kind: StructuralElementKind,
    pub identifier: String,
    pub title: String,
}

impl StructuralElement {
    /// The identifier as it would appear in a heading line.
    ///
    /// Books and parts use uppercase Hungarian ordinals ("NYOLCADIK KÖNYV"),
    /// titles and chapters roman numerals ("XXI. CÍM"), subtitles the plain
    /// number ("17.").
    #[must_use]
    pub fn formatted_identifier(&self) -> String {
        let ordinal = || {
            self.identifier
                .parse::<u32>()
                .ok()
                .and_then(int_to_ordinal_hun)
                .map_or_else(|| self.identifier.clone(), |o| o.to_uppercase())
        };
        let roman = || {
            self.identifier
                .parse::<u32>()
                .ok()
                .map_or_else(|| self.identifier.clone(), int_to_roman)
        };
        match self.kind {
            StructuralElementKind::Book => format!("{} KÖNYV", ordinal()),
            StructuralElementKind::Part => format!("{} RÉSZ", ordinal()),
            StructuralElementKind::Title => format!("{}. CÍM", roman()),
            StructuralElementKind::Chapter => format!("{}. FEJEZET", roman()),
            StructuralElementKind::Subtitle => {
                if self.identifier.is_empty() {
                    String::new()
                } else {
                    format!("{}.", self.identifier)
                }
            }
        }
    }
}

/// Verbatim line run embedded in a paragraph, the payload of quotes and
/// amendments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuotedBlock {
    pub lines: Vec<IndentedLine>,
}

/// Body of a sub-article element: literal text, or an intro/children/wrap-up
/// triple. Exactly one of the two, by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementBody<C> {
    Text(String),
    Children {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intro: Option<String>,
        children: C,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        wrap_up: Option<String>,
    },
}

impl<C> ElementBody<C> {
    /// The literal text, if this is a text body.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Children { .. } => None,
        }
    }

    /// The intro of a children body.
    #[must_use]
    pub fn intro(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Children { intro, .. } => intro.as_deref(),
        }
    }

    /// The wrap-up of a children body.
    #[must_use]
    pub fn wrap_up(&self) -> Option<&str> {
        match self {
            Self::Text(_) => None,
            Self::Children { wrap_up, .. } => wrap_up.as_deref(),
        }
    }
}

/// An alphabetic subpoint, e.g. "c)" or the point-prefixed "ac)".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabeticSubpoint {
    pub identifier: String,
    pub text: String,
}

impl AlphabeticSubpoint {
    /// The textual marker of a subpoint header, e.g. `"ac) "`.
    #[must_use]
    pub fn header_prefix(identifier: &str) -> String {
        format!("{identifier}) ")
    }

    /// Successor in the subpoint numbering scheme.
    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_alphabetic_subpoint_identifier(identifier)
    }

    /// Address of this subpoint relative to its parent.
    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            subpoint: Some(RefPart::single(&self.identifier)),
            ..Reference::default()
        }
    }
}

/// A numeric subpoint, e.g. "1." below a point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericSubpoint {
    pub identifier: String,
    pub text: String,
}

impl NumericSubpoint {
    #[must_use]
    pub fn header_prefix(identifier: &str) -> String {
        format!("{identifier}. ")
    }

    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_numeric_identifier(identifier)
    }

    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            subpoint: Some(RefPart::single(&self.identifier)),
            ..Reference::default()
        }
    }
}

/// Allowed children of an alphabetic point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlphabeticPointChildren {
    AlphabeticSubpoints(Vec<AlphabeticSubpoint>),
    NumericSubpoints(Vec<NumericSubpoint>),
}

/// An alphabetic point, e.g. "a)". Steps over the Hungarian digraphs when
/// numbering ("ny)" is followed by "o)").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlphabeticPoint {
    pub identifier: String,
    pub body: ElementBody<AlphabeticPointChildren>,
}

impl AlphabeticPoint {
    #[must_use]
    pub fn header_prefix(identifier: &str) -> String {
        format!("{identifier}) ")
    }

    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_alphabetic_point_identifier(identifier)
    }

    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            point: Some(RefPart::single(&self.identifier)),
            ..Reference::default()
        }
    }
}

/// Allowed children of a numeric point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NumericPointChildren {
    AlphabeticSubpoints(Vec<AlphabeticSubpoint>),
}

/// A numeric point, e.g. "12." or "3a.".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumericPoint {
    pub identifier: String,
    pub body: ElementBody<NumericPointChildren>,
}

impl NumericPoint {
    #[must_use]
    pub fn header_prefix(identifier: &str) -> String {
        format!("{identifier}. ")
    }

    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_numeric_identifier(identifier)
    }

    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            point: Some(RefPart::single(&self.identifier)),
            ..Reference::default()
        }
    }
}

/// Allowed children of a block amendment: one homogeneous run of any
/// addressable element kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BlockAmendmentChildren {
    Articles(Vec<Article>),
    Paragraphs(Vec<Paragraph>),
    AlphabeticPoints(Vec<AlphabeticPoint>),
    NumericPoints(Vec<NumericPoint>),
    AlphabeticSubpoints(Vec<AlphabeticSubpoint>),
    NumericSubpoints(Vec<NumericSubpoint>),
}

/// A quoted block re-parsed as a structural fragment, because the enclosing
/// sentence states it replaces or inserts addressed content elsewhere.
///
/// `intro` and `wrap_up` hold the extra sentence context around the quote
/// (the parenthesized part of the amending sentence), not operative text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockAmendment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub children: BlockAmendmentChildren,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wrap_up: Option<String>,
}

/// Allowed children of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParagraphChildren {
    AlphabeticPoints(Vec<AlphabeticPoint>),
    NumericPoints(Vec<NumericPoint>),
    QuotedBlocks(Vec<QuotedBlock>),
    BlockAmendment(Box<BlockAmendment>),
}

/// A numbered subdivision of an article, e.g. "(1)".
///
/// The identifier is absent for the single unnumbered paragraph of an
/// article without paragraph headers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub body: ElementBody<ParagraphChildren>,
}

impl Paragraph {
    /// The textual marker of a paragraph header, e.g. `"(1) "`.
    ///
    /// Unnumbered paragraphs have no header.
    #[must_use]
    pub fn header_prefix(identifier: Option<&str>) -> String {
        match identifier {
            Some(id) => format!("({id}) "),
            None => String::new(),
        }
    }

    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_numeric_identifier(identifier)
    }

    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            paragraph: self.identifier.as_deref().map(RefPart::single),
            ..Reference::default()
        }
    }

    /// The sole block amendment of this paragraph, if it has one.
    #[must_use]
    pub fn block_amendment(&self) -> Option<&BlockAmendment> {
        match &self.body {
            ElementBody::Children {
                children: ParagraphChildren::BlockAmendment(amendment),
                ..
            } => Some(amendment),
            _ => None,
        }
    }

    /// The quoted blocks of this paragraph, if it holds any.
    #[must_use]
    pub fn quoted_blocks(&self) -> Option<&[QuotedBlock]> {
        match &self.body {
            ElementBody::Children {
                children: ParagraphChildren::QuotedBlocks(blocks),
                ..
            } => Some(blocks),
            _ => None,
        }
    }
}

/// A "§"-numbered provision.
///
/// Invariant: an article with an unnumbered paragraph has exactly that one
/// paragraph, enforced by [`Article::new`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub identifier: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub children: Vec<Paragraph>,
}

impl Article {
    /// Create an article, checking the unnamed-paragraph invariant.
    ///
    /// # Errors
    ///
    /// Returns [`StructureError::UnnamedParagraphWithSiblings`] when an
    /// identifier-less paragraph is not the only child.
    pub fn new(
        identifier: impl Into<String>,
        title: Option<String>,
        children: Vec<Paragraph>,
    ) -> Result<Self> {
        let identifier = identifier.into();
        if children.len() > 1 && children.iter().any(|p| p.identifier.is_none()) {
            return Err(StructureError::UnnamedParagraphWithSiblings { identifier });
        }
        Ok(Self {
            identifier,
            title,
            children,
        })
    }

    /// All paragraphs of the article.
    #[must_use]
    pub fn paragraphs(&self) -> &[Paragraph] {
        &self.children
    }

    /// Look up a paragraph by identifier; `None` finds the unnumbered one.
    #[must_use]
    pub fn paragraph(&self, identifier: Option<&str>) -> Option<&Paragraph> {
        self.children
            .iter()
            .find(|p| p.identifier.as_deref() == identifier)
    }

    /// Successor in the article numbering scheme; handles plain,
    /// "book:number" and "number/letter" identifiers.
    #[must_use]
    pub fn next_identifier(identifier: &str) -> Option<String> {
        next_article_identifier(identifier)
    }

    #[must_use]
    pub fn relative_reference(&self) -> Reference {
        Reference {
            article: Some(RefPart::single(&self.identifier)),
            ..Reference::default()
        }
    }
}

/// A direct child of an act: structural heading or article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ActChild {
    Structural(StructuralElement),
    Article(Article),
}

/// A whole legal enactment, the root of the document tree.
///
/// `abbreviations` and `outgoing_references` are `None` until semantic
/// resolution has run; resolution rebuilds the act with them populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Act {
    pub identifier: String,
    pub subject: String,
    pub preamble: String,
    pub children: Vec<ActChild>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviations: Option<Vec<ActIdAbbreviation>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outgoing_references: Option<Vec<OutgoingReference>>,
}

impl Act {
    /// All articles of the act, in document order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.children.iter().filter_map(|child| match child {
            ActChild::Article(article) => Some(article),
            ActChild::Structural(_) => None,
        })
    }

    /// Look up an article by identifier.
    #[must_use]
    pub fn article(&self, identifier: &str) -> Option<&Article> {
        self.articles().find(|a| a.identifier == identifier)
    }
}
