//! Block-level parser for Org text.
//!
//! The block parser is line-oriented and handles:
//! - Headings with TODO keywords and tags
//! - Source, example and quote blocks
//! - In-buffer settings, comments and drawers
//! - Horizontal rules and fixed-width lines
//! - Tables
//! - Plain, ordered and description lists
//! - Paragraphs

mod line;
mod parser;

pub use parser::BlockParser;
