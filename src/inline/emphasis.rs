//! Emphasis marker classification and closer matching.
//!
//! Org emphasis is resolved left to right: an opener pairs with the
//! first valid closer after it. Whether a marker can open or close is
//! decided by its neighbouring characters only, so closer positions are
//! indexed once per text and looked up by binary search.

use crate::limits;

/// Emphasis marker characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `*`
    Bold,
    /// `/`
    Italic,
    /// `_`
    Underline,
    /// `+`
    StrikeThrough,
    /// `=`
    Verbatim,
    /// `~`
    Code,
}

impl Marker {
    /// Marker for a delimiter byte.
    #[inline]
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            b'*' => Some(Self::Bold),
            b'/' => Some(Self::Italic),
            b'_' => Some(Self::Underline),
            b'+' => Some(Self::StrikeThrough),
            b'=' => Some(Self::Verbatim),
            b'~' => Some(Self::Code),
            _ => None,
        }
    }

    /// Content between literal markers is not parsed further.
    #[inline]
    pub fn is_literal(self) -> bool {
        matches!(self, Self::Verbatim | Self::Code)
    }

    #[inline]
    fn index(self) -> usize {
        self as usize
    }
}

const MARKER_COUNT: usize = 6;

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n')
}

/// Characters allowed right before an opening marker.
#[inline]
fn is_pre(b: u8) -> bool {
    is_space(b) || matches!(b, b'-' | b'(' | b'{' | b'\'' | b'"')
}

/// Characters allowed right after a closing marker.
#[inline]
fn is_post(b: u8) -> bool {
    is_space(b)
        || matches!(
            b,
            b'-' | b'.' | b',' | b';' | b':' | b'!' | b'?' | b'\'' | b')' | b'}' | b'[' | b'"' | b'\\'
        )
}

/// Check if the marker at `pos` can open an emphasized span.
#[inline]
pub fn can_open(text: &[u8], pos: usize) -> bool {
    let before_ok = pos == 0 || is_pre(text[pos - 1]);
    let after_ok = text.get(pos + 1).is_some_and(|&b| !is_space(b));
    before_ok && after_ok
}

/// Check if the marker at `pos` can close an emphasized span.
#[inline]
fn can_close(text: &[u8], pos: usize) -> bool {
    let before_ok = pos > 0 && !is_space(text[pos - 1]);
    let after_ok = text.get(pos + 1).is_none_or(|&b| is_post(b));
    before_ok && after_ok
}

/// Closing marker and newline positions of one text.
#[derive(Debug, Default)]
pub struct Closers {
    /// Positions where each marker can close, ascending.
    by_marker: [Vec<usize>; MARKER_COUNT],
    /// Newline positions, ascending.
    newlines: Vec<usize>,
}

impl Closers {
    /// Index every valid closer in `text`.
    pub fn new(text: &[u8]) -> Self {
        let mut closers = Self::default();
        for (pos, &b) in text.iter().enumerate() {
            if b == b'\n' {
                closers.newlines.push(pos);
            } else if let Some(marker) = Marker::from_byte(b) {
                if can_close(text, pos) {
                    closers.by_marker[marker.index()].push(pos);
                }
            }
        }
        closers
    }

    /// Find the closer matching the opener at `open`.
    ///
    /// Returns the position of the first valid closing marker, or `None` if
    /// the opener is invalid or never closed. Content must be non-empty and
    /// may span at most [`limits::MAX_EMPHASIS_NEWLINES`] newlines.
    pub fn find_closer(&self, text: &[u8], open: usize) -> Option<usize> {
        let marker = Marker::from_byte(*text.get(open)?)?;
        if !can_open(text, open) {
            return None;
        }

        let candidates = &self.by_marker[marker.index()];
        let close = *candidates.get(candidates.partition_point(|&p| p < open + 2))?;

        let newlines = self.newlines.partition_point(|&p| p < close)
            - self.newlines.partition_point(|&p| p < open);
        (newlines <= limits::MAX_EMPHASIS_NEWLINES).then_some(close)
    }
}
