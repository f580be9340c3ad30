//! Error types for the document model.
//!
//! The model is built once, bottom-up, and its constructors enforce the
//! invariants that cannot be expressed in the type system directly.

use thiserror::Error;

/// Main error type for document model construction.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    /// A line slice boundary fell inside a multi-character part.
    #[error("Cannot slice line at character {index}: position falls inside a multi-character part")]
    UnalignedSlice { index: usize },

    /// An article contained an unnamed paragraph next to other paragraphs.
    #[error("Unnamed paragraphs cannot have siblings (article {identifier})")]
    UnnamedParagraphWithSiblings { identifier: String },

    /// Block amendment metadata with neither an amended nor an inserted position.
    #[error("Block amendment metadata needs an amended or an inserted position")]
    EmptyBlockAmendmentMetadata,
}

/// Result type alias for document model operations.
pub type Result<T> = std::result::Result<T, StructureError>;
