//! Törvénytár parser - structural and semantic parsing of Hungarian legal
//! acts.
//!
//! Input is an ordered sequence of indentation-tagged lines, already
//! stripped of page artifacts by the upstream extractor. Parsing runs in
//! three passes, each producing a new tree:
//!
//! 1. [`ActParser`] builds the typed document tree (structural headings,
//!    articles, paragraphs, points, subpoints, quoted blocks).
//! 2. [`extract_block_amendments`] re-parses amendment paragraphs' quoted
//!    text into nested structural fragments.
//! 3. [`resolve_semantics`] walks the tree, feeds leaf texts to the
//!    external grammar parser and attaches abbreviations and outgoing
//!    references.
//!
//! The sentence grammar itself is an external collaborator; this crate
//! only defines its output contract in [`grammar`].
//!
//! # Example
//!
//! ```
//! use torvenytar_parser::config::validate_act_identifier;
//!
//! assert!(validate_act_identifier("2012. évi CXVI. törvény").is_ok());
//! assert!(validate_act_identifier("nem törvény").is_err());
//! ```
//!
//! # Architecture
//!
//! - [`config`]: constants and validation
//! - [`error`]: error types and Result alias
//! - [`quoting`]: quote-level tracking over line runs
//! - [`headings`]: structural heading recognition
//! - [`subarticle`]: paragraph/point/subpoint tree building
//! - [`article`]: article parsing
//! - [`act`]: act-level parsing
//! - [`grammar`]: the external grammar's parse-tree contract
//! - [`collector`]: reference fragment merging
//! - [`semantic`]: the semantic resolution walker
//! - [`amendment`]: block amendment extraction

pub mod act;
pub mod amendment;
pub mod article;
pub mod collector;
pub mod config;
pub mod error;
pub mod grammar;
pub mod headings;
pub mod quoting;
pub mod semantic;
mod subarticle;

// Re-export the pipeline entry points
pub use act::ActParser;
pub use amendment::extract_block_amendments;
pub use article::ArticleParser;
pub use collector::ReferenceCollector;
pub use error::{ParseError, Result};
pub use grammar::{GrammarError, GrammarParser, ParseTree};
pub use semantic::resolve_semantics;
