//! Line splitting and line classification.

use memchr::memchr_iter;

use crate::cursor::Cursor;
use crate::limits;

/// One logical input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// 1-based line number in the input.
    pub number: usize,
    /// Width of the leading whitespace, tabs expanded.
    pub indent: usize,
    /// Line text without leading and trailing whitespace.
    pub content: &'a str,
}

impl<'a> Line<'a> {
    /// Build a line from raw text (no newline).
    pub fn new(number: usize, raw: &'a str) -> Self {
        let mut indent = 0;
        let mut start = 0;
        for b in raw.bytes() {
            match b {
                b' ' => indent += 1,
                b'\t' => indent += limits::TAB_WIDTH - indent % limits::TAB_WIDTH,
                _ => break,
            }
            start += 1;
        }
        Self {
            number,
            indent,
            content: raw[start..].trim_end(),
        }
    }

    /// Check if the line holds only whitespace.
    #[inline]
    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }
}

/// Split input into lines.
///
/// Handles `\n` and `\r\n` endings and skips a leading byte order mark.
/// A final newline does not produce an extra empty line.
pub fn split_lines(input: &str) -> Vec<Line<'_>> {
    let input = input.strip_prefix('\u{feff}').unwrap_or(input);
    let mut lines = Vec::with_capacity(input.len() / 32 + 1);
    let mut start = 0;

    for end in memchr_iter(b'\n', input.as_bytes()) {
        let raw = &input[start..end];
        lines.push(Line::new(lines.len() + 1, raw.strip_suffix('\r').unwrap_or(raw)));
        start = end + 1;
    }
    if start < input.len() {
        let raw = &input[start..];
        lines.push(Line::new(lines.len() + 1, raw.strip_suffix('\r').unwrap_or(raw)));
    }
    lines
}

/// Kind of a `#+BEGIN_...` region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GreaterBlock {
    Src,
    Example,
    Quote,
}

impl GreaterBlock {
    fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("SRC") {
            Some(Self::Src)
        } else if name.eq_ignore_ascii_case("EXAMPLE") {
            Some(Self::Example)
        } else if name.eq_ignore_ascii_case("QUOTE") {
            Some(Self::Quote)
        } else {
            None
        }
    }

    /// Line that closes this region.
    pub fn end_marker(self) -> &'static str {
        match self {
            Self::Src => "#+END_SRC",
            Self::Example => "#+END_EXAMPLE",
            Self::Quote => "#+END_QUOTE",
        }
    }
}

/// A list bullet or ordered marker at the start of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet<'a> {
    /// Item number for ordered markers.
    pub number: Option<u32>,
    /// Bytes taken by the marker and the whitespace after it.
    pub width: usize,
    /// Item text after the marker.
    pub rest: &'a str,
}

/// What a line starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    Blank,
    /// `*` run at column 0.
    Heading { level: usize, rest: &'a str },
    /// `#+BEGIN_NAME args`
    BlockBegin { block: GreaterBlock, args: &'a str },
    /// `#+KEY: value`
    Setting { key: &'a str, value: &'a str },
    /// `# text`
    Comment,
    /// `:NAME:` opening a drawer.
    Drawer,
    /// Five or more dashes.
    Rule,
    /// `: text`
    FixedWidth(&'a str),
    /// `| cells |`
    TableRow,
    /// List bullet.
    ListItem(Bullet<'a>),
    /// Anything else.
    Text,
}

/// Classify a line by its leading markers.
pub fn classify<'a>(line: &Line<'a>) -> LineKind<'a> {
    let content = line.content;
    let Some(&first) = content.as_bytes().first() else {
        return LineKind::Blank;
    };

    match first {
        b'*' if line.indent == 0 => match heading(content) {
            Some(kind) => kind,
            None => LineKind::Text,
        },
        b'#' => hash_line(content),
        b':' => colon_line(content),
        b'|' => LineKind::TableRow,
        b'-' if content.len() >= 5 && content.bytes().all(|b| b == b'-') => LineKind::Rule,
        _ => match bullet(content, line.indent) {
            Some(b) => LineKind::ListItem(b),
            None => LineKind::Text,
        },
    }
}

fn heading(content: &str) -> Option<LineKind<'_>> {
    let mut cursor = Cursor::new(content);
    let level = cursor.skip_while(|b| b == b'*');
    if !cursor.at_blank_or_eof() {
        return None;
    }
    cursor.skip_whitespace();
    Some(LineKind::Heading {
        level,
        rest: cursor.rest(),
    })
}

fn hash_line(content: &str) -> LineKind<'_> {
    let mut cursor = Cursor::new(content);
    cursor.bump();

    if cursor.at_blank_or_eof() {
        return LineKind::Comment;
    }
    if !cursor.eat(b'+') {
        return LineKind::Text;
    }

    if cursor.at_ignore_case("BEGIN_") {
        cursor.advance("BEGIN_".len());
        let name_start = cursor.offset();
        cursor.skip_while(|b| b != b' ' && b != b'\t');
        if let Some(block) = GreaterBlock::from_name(cursor.slice_from(name_start)) {
            cursor.skip_whitespace();
            return LineKind::BlockBegin {
                block,
                args: cursor.rest(),
            };
        }
        return LineKind::Text;
    }

    let key_start = cursor.offset();
    cursor.skip_while(|b| b != b':' && b != b' ' && b != b'\t');
    let key = cursor.slice_from(key_start);
    if key.is_empty() || !cursor.eat(b':') {
        return LineKind::Text;
    }
    LineKind::Setting {
        key,
        value: cursor.rest().trim(),
    }
}

fn colon_line(content: &str) -> LineKind<'_> {
    let mut cursor = Cursor::new(content);
    cursor.bump();

    if cursor.is_eof() {
        return LineKind::FixedWidth("");
    }
    if cursor.eat(b' ') {
        return LineKind::FixedWidth(cursor.rest());
    }

    let name_len = cursor.skip_while(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
    if name_len > 0 && cursor.eat(b':') && cursor.is_eof() {
        return LineKind::Drawer;
    }
    LineKind::Text
}

fn bullet(content: &str, indent: usize) -> Option<Bullet<'_>> {
    let mut cursor = Cursor::new(content);
    let number = match cursor.peek()? {
        b'-' | b'+' => {
            cursor.bump();
            None
        }
        // A `*` bullet at column 0 would be a heading.
        b'*' if indent > 0 => {
            cursor.bump();
            None
        }
        b'0'..=b'9' => {
            let digits = cursor.skip_while(|b| b.is_ascii_digit());
            if digits > limits::MAX_LIST_MARKER_DIGITS {
                return None;
            }
            let number = cursor.slice_from(0).parse::<u32>().ok()?;
            if !(cursor.eat(b'.') || cursor.eat(b')')) {
                return None;
            }
            Some(number)
        }
        _ => return None,
    };

    if !cursor.at_blank_or_eof() {
        return None;
    }
    cursor.skip_whitespace();
    Some(Bullet {
        number,
        width: cursor.offset(),
        rest: cursor.rest(),
    })
}

/// Check if a line closes a greater block.
pub fn is_block_end(line: &Line<'_>, block: GreaterBlock) -> bool {
    line.content.eq_ignore_ascii_case(block.end_marker())
}

/// Check if a line closes a drawer.
pub fn is_drawer_end(line: &Line<'_>) -> bool {
    line.content.eq_ignore_ascii_case(":END:")
}
