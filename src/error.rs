//! Error types.

use std::path::PathBuf;

use thiserror::Error;

/// Input that cannot be turned into a document at all.
///
/// Unusual or malformed Org markup is never an error; it degrades to
/// literal text. Only input that is not text fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid UTF-8 at line {line}, column {column} (byte offset {offset})")]
pub struct ParseError {
    /// 1-based line of the offending byte.
    pub line: usize,
    /// 1-based byte column within that line.
    pub column: usize,
    /// Byte offset from the start of input.
    pub offset: usize,
}

impl ParseError {
    /// Locate a byte offset within `input`.
    pub(crate) fn at(input: &[u8], offset: usize) -> Self {
        let before = &input[..offset.min(input.len())];
        let line = memchr::memchr_iter(b'\n', before).count() + 1;
        let line_start = memchr::memrchr(b'\n', before).map_or(0, |p| p + 1);
        Self {
            line,
            column: offset - line_start + 1,
            offset,
        }
    }
}

/// Error for a full file conversion.
#[derive(Error, Debug)]
pub enum Error {
    /// The input file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file contents could not be parsed.
    #[error("cannot parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

/// Result type alias for conversions.
pub type Result<T> = std::result::Result<T, Error>;
