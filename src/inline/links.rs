//! Bracket link parsing.
//!
//! Handles:
//! - Described links: `[[target][label]]`
//! - Plain links: `[[target]]`

use memchr::{memchr, memmem};

/// A bracket link found in text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkSpan<'a> {
    /// Raw link target.
    pub target: &'a str,
    /// Raw label text, if present.
    pub label: Option<&'a str>,
    /// Position just past the closing `]]`.
    pub end: usize,
}

/// Parse a bracket link starting at `start` (which must point at `[[`).
///
/// Returns `None` when the brackets are not a complete link; the caller
/// keeps them as literal text.
pub fn parse_link(text: &str, start: usize) -> Option<LinkSpan<'_>> {
    let bytes = text.as_bytes();
    if bytes.get(start..start + 2)? != b"[[" {
        return None;
    }

    let target_start = start + 2;
    let target_len = memchr(b']', &bytes[target_start..])?;
    let target_end = target_start + target_len;
    let target = &text[target_start..target_end];
    if target.trim().is_empty() || target.contains(['[', '\n']) {
        return None;
    }

    match bytes.get(target_end + 1)? {
        b']' => Some(LinkSpan {
            target,
            label: None,
            end: target_end + 2,
        }),
        b'[' => {
            let label_start = target_end + 2;
            let label_len = memmem::find(&bytes[label_start..], b"]]")?;
            let label_end = label_start + label_len;
            let label = &text[label_start..label_end];
            if label.is_empty() {
                return None;
            }
            Some(LinkSpan {
                target,
                label: Some(label),
                end: label_end + 2,
            })
        }
        _ => None,
    }
}

/// Normalize a link target for use as an `href`.
///
/// `file:` prefixes are dropped; other targets are kept verbatim.
pub fn normalize_target(target: &str) -> &str {
    let target = target.trim();
    target.strip_prefix("file:").unwrap_or(target)
}

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "svg", "webp", "bmp"];

/// Check if a link target points at an image file.
pub fn is_image(target: &str) -> bool {
    target
        .rsplit_once('.')
        .is_some_and(|(_, ext)| IMAGE_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}
