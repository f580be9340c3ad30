//! Törvénytár document model - typed structure of Hungarian legal acts.
//!
//! This crate holds the immutable data model shared by the parsing
//! pipeline: indentation-tagged input lines, the typed document hierarchy
//! (act → structural headings → article → paragraph → point → subpoint,
//! plus quoted blocks and block amendments), and the five-level reference
//! addresses used for citations.
//!
//! # Example
//!
//! ```
//! use torvenytar_structure::{RefPart, Reference};
//!
//! let relative = Reference {
//!     paragraph: Some(RefPart::single("2")),
//!     ..Reference::default()
//! };
//! let context = Reference {
//!     act: Some("2012. évi I. törvény".to_string()),
//!     article: Some(RefPart::single("5")),
//!     ..Reference::default()
//! };
//! assert!(!relative.relative_to(&context).is_relative());
//! ```
//!
//! # Architecture
//!
//! - [`line`]: indentation-tagged input lines
//! - [`numbering`]: ordinal/roman tables and identifier successor rules
//! - [`reference`]: reference addresses and address algebra
//! - [`element`]: the document hierarchy
//! - [`error`]: error types and Result alias

pub mod element;
pub mod error;
pub mod line;
pub mod numbering;
pub mod reference;

// Re-export commonly used items
pub use element::{
    Act, ActChild, AlphabeticPoint, AlphabeticPointChildren, AlphabeticSubpoint, Article,
    BlockAmendment, BlockAmendmentChildren, ElementBody, NumericPoint, NumericPointChildren,
    NumericSubpoint, Paragraph, ParagraphChildren, QuotedBlock, StructuralElement,
    StructuralElementKind,
};
pub use error::{Result, StructureError};
pub use line::{IndentedLine, LinePart};
pub use reference::{
    ActIdAbbreviation, BlockAmendmentMetadata, InTextReference, OutgoingReference, RefPart,
    Reference, ReferenceLevel, ReferredKind,
};
