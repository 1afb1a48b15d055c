//! Byte cursor for scanning line content.
//!
//! All Org syntax markers are ASCII, so scanning works on bytes and only
//! ever splits the underlying `str` at ASCII positions.

/// A cursor for byte-by-byte scanning of a `str`.
///
/// # Example
/// ```
/// use orgmark::cursor::Cursor;
///
/// let mut cursor = Cursor::new("** Heading");
/// assert_eq!(cursor.skip_while(|b| b == b'*'), 2);
/// assert!(cursor.at(b' '));
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a new cursor at the start of `input`.
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Current offset from the start of input.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// Check if cursor is at end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Peek the current byte without advancing.
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Advance by n bytes, stopping at end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.input.len());
    }

    /// Advance by 1 byte.
    #[inline]
    pub fn bump(&mut self) {
        self.advance(1);
    }

    /// Check if current position matches a byte.
    #[inline]
    pub fn at(&self, b: u8) -> bool {
        self.peek() == Some(b)
    }

    /// Check if the remaining input starts with `prefix`, ignoring ASCII case.
    #[inline]
    pub fn at_ignore_case(&self, prefix: &str) -> bool {
        self.rest()
            .as_bytes()
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix.as_bytes()))
    }

    /// Check if the cursor is at a space, tab or end of input.
    #[inline]
    pub fn at_blank_or_eof(&self) -> bool {
        matches!(self.peek(), None | Some(b' ') | Some(b'\t'))
    }

    /// Skip while predicate is true. Returns the number of bytes skipped.
    #[inline]
    pub fn skip_while<F>(&mut self, mut predicate: F) -> usize
    where
        F: FnMut(u8) -> bool,
    {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if !predicate(b) {
                break;
            }
            self.pos += 1;
        }
        self.pos - start
    }

    /// Skip whitespace (space and tab).
    #[inline]
    pub fn skip_whitespace(&mut self) -> usize {
        self.skip_while(|b| b == b' ' || b == b'\t')
    }

    /// Consume a specific byte if present.
    #[inline]
    pub fn eat(&mut self, b: u8) -> bool {
        if self.at(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Remaining input.
    #[inline]
    pub fn rest(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or("")
    }

    /// Input between `start` and the current position.
    #[inline]
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_basic() {
        let mut cursor = Cursor::new("abc");
        assert_eq!(cursor.peek(), Some(b'a'));
        cursor.bump();
        assert_eq!(cursor.peek(), Some(b'b'));
        assert_eq!(cursor.offset(), 1);
        assert_eq!(cursor.rest(), "bc");
    }

    #[test]
    fn test_cursor_eof() {
        let mut cursor = Cursor::new("a");
        assert!(!cursor.is_eof());
        cursor.bump();
        assert!(cursor.is_eof());
        assert_eq!(cursor.peek(), None);
        cursor.bump();
        assert_eq!(cursor.offset(), 1);
    }

    #[test]
    fn test_cursor_eat_and_rest() {
        let mut cursor = Cursor::new("12. item");
        let start = cursor.offset();
        cursor.skip_while(|b| b.is_ascii_digit());
        assert_eq!(cursor.slice_from(start), "12");
        assert!(cursor.eat(b'.'));
        assert!(!cursor.eat(b'.'));
        assert!(cursor.at_blank_or_eof());
        cursor.skip_whitespace();
        assert_eq!(cursor.rest(), "item");
    }

    #[test]
    fn test_cursor_ignore_case() {
        let cursor = Cursor::new("#+begin_src rust");
        assert!(cursor.at_ignore_case("#+BEGIN_SRC"));
        assert!(!cursor.at_ignore_case("#+BEGIN_EXAMPLE"));
    }
}
