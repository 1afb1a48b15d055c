//! Inline parser for Org text.
//!
//! Scans left to right for marker bytes. At each marker the parser tries,
//! in order, a bracket link and an emphasis span; on success the span's
//! content is parsed recursively, otherwise the marker stays literal text.
//! Because nested content is parsed in isolation, spans never overlap.

mod emphasis;
pub mod links;

pub use emphasis::{Closers, Marker};

use crate::ast::Inline;
use crate::limits;

/// Bytes that may start an inline construct.
const SPECIAL_TABLE: [bool; 256] = {
    let mut table = [false; 256];
    table[b'*' as usize] = true;
    table[b'/' as usize] = true;
    table[b'_' as usize] = true;
    table[b'+' as usize] = true;
    table[b'=' as usize] = true;
    table[b'~' as usize] = true;
    table[b'[' as usize] = true;
    table
};

/// Inline parser state.
#[derive(Debug, Default)]
pub struct InlineParser {
    /// Current nesting depth of emphasis and link labels.
    depth: usize,
}

impl InlineParser {
    /// Create a new inline parser.
    pub fn new() -> Self {
        Self { depth: 0 }
    }

    /// Parse inline content into spans.
    ///
    /// Never fails: unterminated or invalid markers are kept as text.
    ///
    /// # Example
    /// ```
    /// use orgmark::ast::Inline;
    /// use orgmark::inline::InlineParser;
    ///
    /// let spans = InlineParser::new().parse("Hello *world*");
    /// assert_eq!(
    ///     spans,
    ///     vec![
    ///         Inline::Text("Hello ".into()),
    ///         Inline::Bold(vec![Inline::Text("world".into())]),
    ///     ]
    /// );
    /// ```
    pub fn parse(&mut self, text: &str) -> Vec<Inline> {
        let bytes = text.as_bytes();
        let mut spans = Vec::new();
        let mut closers = None;
        let mut text_start = 0;
        let mut pos = 0;

        while pos < bytes.len() {
            if !SPECIAL_TABLE[bytes[pos] as usize] {
                pos += 1;
                continue;
            }

            match self.try_span(text, pos, &mut closers) {
                Some((span, end)) => {
                    push_text(&mut spans, &text[text_start..pos]);
                    spans.push(span);
                    pos = end;
                    text_start = end;
                }
                None => pos += 1,
            }
        }

        push_text(&mut spans, &text[text_start..]);
        spans
    }

    /// Try to parse a span starting at `pos`. Returns the span and the
    /// position just past it.
    ///
    /// The closer index for `text` is built on the first emphasis marker.
    fn try_span(
        &mut self,
        text: &str,
        pos: usize,
        closers: &mut Option<Closers>,
    ) -> Option<(Inline, usize)> {
        let bytes = text.as_bytes();

        if bytes[pos] == b'[' {
            let link = links::parse_link(text, pos)?;
            let label = link.label.map(|l| self.parse_nested(l));
            let span = Inline::Link {
                target: links::normalize_target(link.target).to_string(),
                label,
            };
            return Some((span, link.end));
        }

        let marker = Marker::from_byte(bytes[pos])?;
        if !marker.is_literal() && self.depth >= limits::MAX_INLINE_NESTING {
            return None;
        }

        let close = closers
            .get_or_insert_with(|| Closers::new(bytes))
            .find_closer(bytes, pos)?;
        let content = &text[pos + 1..close];
        let span = match marker {
            Marker::Bold => Inline::Bold(self.parse_nested(content)),
            Marker::Italic => Inline::Italic(self.parse_nested(content)),
            Marker::Underline => Inline::Underline(self.parse_nested(content)),
            Marker::StrikeThrough => Inline::StrikeThrough(self.parse_nested(content)),
            Marker::Verbatim => Inline::Verbatim(content.to_string()),
            Marker::Code => Inline::Code(content.to_string()),
        };
        Some((span, close + 1))
    }

    fn parse_nested(&mut self, content: &str) -> Vec<Inline> {
        if self.depth >= limits::MAX_INLINE_NESTING {
            return vec![Inline::Text(content.to_string())];
        }
        self.depth += 1;
        let spans = self.parse(content);
        self.depth -= 1;
        spans
    }
}

/// Parse inline content with a fresh parser.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    InlineParser::new().parse(text)
}

fn push_text(spans: &mut Vec<Inline>, text: &str) {
    if !text.is_empty() {
        spans.push(Inline::Text(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(parse_inlines("just words"), vec![text("just words")]);
    }

    #[test]
    fn test_empty() {
        assert!(parse_inlines("").is_empty());
    }

    #[test]
    fn test_all_markers() {
        let spans = parse_inlines("*b* /i/ _u_ +s+ =v= ~c~");
        assert_eq!(
            spans,
            vec![
                Inline::Bold(vec![text("b")]),
                text(" "),
                Inline::Italic(vec![text("i")]),
                text(" "),
                Inline::Underline(vec![text("u")]),
                text(" "),
                Inline::StrikeThrough(vec![text("s")]),
                text(" "),
                Inline::Verbatim("v".into()),
                text(" "),
                Inline::Code("c".into()),
            ]
        );
    }

    #[test]
    fn test_nested_emphasis() {
        let spans = parse_inlines("*bold /and italic/*");
        assert_eq!(
            spans,
            vec![Inline::Bold(vec![
                text("bold "),
                Inline::Italic(vec![text("and italic")]),
            ])]
        );
    }

    #[test]
    fn test_code_content_is_literal() {
        assert_eq!(
            parse_inlines("~*not bold*~"),
            vec![Inline::Code("*not bold*".into())]
        );
    }

    #[test]
    fn test_unterminated_is_literal() {
        assert_eq!(parse_inlines("an *open span"), vec![text("an *open span")]);
    }

    #[test]
    fn test_intraword_markers_are_literal() {
        assert_eq!(
            parse_inlines("snake_case_name and a/b/c"),
            vec![text("snake_case_name and a/b/c")]
        );
    }

    #[test]
    fn test_arithmetic_is_literal() {
        assert_eq!(parse_inlines("1 + 2 + 3"), vec![text("1 + 2 + 3")]);
    }

    #[test]
    fn test_link_with_label() {
        let spans = parse_inlines("see [[https://orgmode.org][the *Org* site]]");
        assert_eq!(
            spans,
            vec![
                text("see "),
                Inline::Link {
                    target: "https://orgmode.org".into(),
                    label: Some(vec![
                        text("the "),
                        Inline::Bold(vec![text("Org")]),
                        text(" site"),
                    ]),
                },
            ]
        );
    }

    #[test]
    fn test_plain_link_file_prefix() {
        assert_eq!(
            parse_inlines("[[file:notes.org]]"),
            vec![Inline::Link {
                target: "notes.org".into(),
                label: None,
            }]
        );
    }

    #[test]
    fn test_emphasis_across_newline() {
        assert_eq!(
            parse_inlines("/one\ntwo/"),
            vec![Inline::Italic(vec![text("one\ntwo")])]
        );
    }

    #[test]
    fn test_deep_nesting_is_bounded() {
        let depth = limits::MAX_INLINE_NESTING + 8;
        let input = format!("{}x{}", "(*".repeat(depth), "*)".repeat(depth));
        let spans = parse_inlines(&input);
        assert!(!spans.is_empty());
    }
}
