//! Parse-tree contract of the external sentence grammar.
//!
//! Citation recognition itself lives outside this crate: an external
//! grammar parses one sentence worth of text and returns a typed tree with
//! position-tagged reference fragments. Only that output contract is
//! defined here, as the [`GrammarParser`] trait and its node types. All
//! positions are character offsets into the analyzed text, `start..end`
//! half-open.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use torvenytar_structure::ReferredKind;

use crate::config::act_identifier;

/// Failure of the external grammar to parse a text.
///
/// Caught per leaf and treated as "no structured data extracted"; it never
/// aborts a document walk.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Grammar parse failed: {0}")]
pub struct GrammarError(pub String);

/// The external grammar parser.
///
/// A pure function from sentence text to parse tree; implementations hold
/// no per-document state.
pub trait GrammarParser {
    /// Parse one sentence worth of text.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarError`] when the text does not match the grammar.
    fn parse(&self, text: &str) -> Result<ParseTree, GrammarError>;
}

/// A half-open character span in the analyzed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// An act cited by year and number, e.g. "2012. évi CXVI. törvény".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActIdNode {
    pub year: u16,
    /// Roman numeral part of the identifier.
    pub number: String,
    pub span: Span,
}

/// An act cited by a previously introduced abbreviation, e.g. "Ptk.".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbbreviationNode {
    pub text: String,
    pub span: Span,
}

/// A mention of an act, by identifier or abbreviation.
///
/// `from_now_on` is the "(a továbbiakban: ...)" marker introducing a new
/// abbreviation for the act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActReferenceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_id: Option<ActIdNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<AbbreviationNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_now_on: Option<String>,
}

impl ActReferenceNode {
    /// The act string this mention refers to: the canonical identifier for
    /// explicit citations, the abbreviation text otherwise.
    #[must_use]
    pub fn act_string(&self) -> Option<String> {
        if let Some(act_id) = &self.act_id {
            return Some(act_identifier(act_id.year, &act_id.number));
        }
        self.abbreviation.as_ref().map(|a| a.text.clone())
    }

    /// The span of the identifying token (abbreviation wins over act id).
    #[must_use]
    pub fn span(&self) -> Option<Span> {
        if let Some(abbreviation) = &self.abbreviation {
            return Some(abbreviation.span);
        }
        self.act_id.as_ref().map(|a| a.span)
    }
}

/// A single identifier fragment, e.g. the "5" of "5. §".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdNode {
    pub id: String,
    pub span: Span,
}

/// An identifier range fragment, e.g. "19–20" of "19–20. pontja".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeNode {
    pub start_id: String,
    pub end_id: String,
    pub span: Span,
}

/// All fragments of one address level inside a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePartNode {
    pub kind: ReferredKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub singles: Vec<IdNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ranges: Vec<RangeNode>,
}

/// One structural reference, an ordered list of level parts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceNode {
    pub parts: Vec<ReferencePartNode>,
    pub span: Span,
}

/// A compound citation: an optional act mention plus its references.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompoundReferenceNode {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub act_reference: Option<ActReferenceNode>,
    pub references: Vec<ReferenceNode>,
}

/// An amendment-introducing sentence: the amended act, the replaced
/// position and/or the inserted position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAmendmentNode {
    pub act_reference: ActReferenceNode,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amended_reference: Option<ReferenceNode>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inserted_reference: Option<ReferenceNode>,
}

/// An ordinary sentence's recognized citation content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceNode {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub compound_references: Vec<CompoundReferenceNode>,

    /// Act mentions not attached to any compound reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standalone_act_references: Vec<ActReferenceNode>,

    /// Bare references not covered by any compound reference.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub standalone_references: Vec<ReferenceNode>,
}

/// Root of the grammar output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParseTree {
    Sentence(SentenceNode),
    BlockAmendment(BlockAmendmentNode),
}

impl ParseTree {
    /// All act mentions anywhere in the tree, in document order.
    pub fn act_references(&self) -> Vec<&ActReferenceNode> {
        match self {
            Self::Sentence(sentence) => sentence
                .compound_references
                .iter()
                .filter_map(|c| c.act_reference.as_ref())
                .chain(sentence.standalone_act_references.iter())
                .collect(),
            Self::BlockAmendment(amendment) => vec![&amendment.act_reference],
        }
    }
}
