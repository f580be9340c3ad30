//! Error types for the parser.
//!
//! [`ParseError::ElementNotFound`] doubles as control flow: the sub-article
//! splitter reports it when a required element run is missing, and callers
//! fall back to a coarser representation (plain text or quoted block)
//! instead of failing. Every other variant is a genuine error that
//! propagates up; at the act root any error is fatal.

use thiserror::Error;

use torvenytar_structure::StructureError;

/// Main error type for the parser library.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A required sub-element run could not be split from the text.
    ///
    /// Not fatal: callers use this to fall back to a plainer element.
    #[error("Not enough {element_kind} elements found in text run")]
    ElementNotFound { element_kind: &'static str },

    /// A line did not carry the expected element header.
    #[error("Invalid {element_kind} header: '{line}' does not start with '{prefix}'")]
    InvalidHeader {
        element_kind: &'static str,
        line: String,
        prefix: String,
    },

    /// Mismatched opening/closing quotation marks across a line run.
    #[error("Mismatched quotation marks in line run (final quote level {level})")]
    QuoteImbalance { level: i64 },

    /// Act identifier did not match the expected "YYYY. évi N. törvény" form.
    #[error("Invalid act identifier: '{0}'")]
    InvalidActIdentifier(String),

    /// Structural mismatch not covered by a more specific variant.
    #[error("Structural mismatch: {0}")]
    Structural(String),

    /// Error while parsing an article body.
    #[error("Error in article {identifier}: {source}")]
    Article {
        identifier: String,
        #[source]
        source: Box<ParseError>,
    },

    /// Error while parsing the act body; fatal at the root.
    #[error("Error in act {identifier}: {source}")]
    Act {
        identifier: String,
        #[source]
        source: Box<ParseError>,
    },

    /// Document model invariant violation.
    #[error(transparent)]
    Structure(#[from] StructureError),
}

impl ParseError {
    /// Whether this is the fall-back-to-plainer-element signal.
    #[must_use]
    pub fn is_element_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound { .. })
    }
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParseError>;
