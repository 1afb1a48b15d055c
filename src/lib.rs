//! orgmark: Org-mode to HTML converter
//!
//! This crate parses Org text into a document tree and renders that tree
//! as an HTML fragment.
//!
//! # Design Principles
//! - Parsing never fails on text: malformed markup degrades to literal text
//! - No regex: pure byte-level scanning
//! - Bounded nesting: fixed limits in [`limits`] cap recursion
//! - Escaping at the writer: every literal byte goes through [`escape`]
//!
//! # Example
//! ```
//! let html = orgmark::to_html("* Title\nHello *world*");
//! assert_eq!(html, "<h1>Title</h1>\n<p>Hello <b>world</b></p>\n");
//! ```

pub mod ast;
pub mod block;
pub mod cursor;
pub mod error;
pub mod escape;
pub mod html;
pub mod inline;
pub mod limits;
pub mod render;

use std::path::Path;

use log::debug;

// Re-export primary types
pub use ast::{Block, Document, Inline};
pub use block::BlockParser;
pub use error::{Error, ParseError, Result};
pub use html::render;
pub use inline::InlineParser;
pub use render::HtmlWriter;

/// Parse Org text into a document tree.
///
/// # Example
/// ```
/// use orgmark::Block;
///
/// let doc = orgmark::parse("#+TITLE: Notes\n\n- one\n- two\n");
/// assert_eq!(doc.title(), Some("Notes"));
/// assert!(matches!(doc.blocks[0], Block::List(_)));
/// ```
pub fn parse(input: &str) -> Document {
    BlockParser::new(input).parse()
}

/// Parse raw bytes, failing only when they are not valid UTF-8.
///
/// # Example
/// ```
/// let err = orgmark::parse_bytes(b"ok\n\xff").unwrap_err();
/// assert_eq!((err.line, err.column), (2, 1));
/// ```
pub fn parse_bytes(input: &[u8]) -> std::result::Result<Document, ParseError> {
    match std::str::from_utf8(input) {
        Ok(text) => Ok(parse(text)),
        Err(e) => Err(ParseError::at(input, e.valid_up_to())),
    }
}

/// Convert Org text to HTML.
///
/// This is the primary API for simple use cases.
pub fn to_html(input: &str) -> String {
    let doc = parse(input);
    let mut writer = HtmlWriter::with_capacity_for(input.len());
    html::render_into(&doc, &mut writer);
    writer.into_string()
}

/// Read an Org file and convert it to HTML.
pub fn convert_file(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("read {} bytes from {}", bytes.len(), path.display());

    let doc = parse_bytes(&bytes).map_err(|source| Error::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = HtmlWriter::with_capacity_for(bytes.len());
    html::render_into(&doc, &mut writer);
    Ok(writer.into_string())
}
