//! Document tree produced by the parser and consumed by the renderer.
//!
//! The tree owns all of its text. Every block has exactly one parent
//! (the [`Document`] or an enclosing block), so it is finite and acyclic.

use rustc_hash::FxHashMap;

/// A parsed Org document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in source order.
    pub blocks: Vec<Block>,
    /// In-buffer settings from `#+KEY: value` lines, keyed by upper-cased key.
    pub settings: FxHashMap<String, String>,
}

impl Document {
    /// Look up an in-buffer setting (`#+TITLE:` and friends).
    ///
    /// Keys are matched case-insensitively.
    pub fn setting(&self, key: &str) -> Option<&str> {
        self.settings
            .get(&key.to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Document title from `#+TITLE:`, if set and non-empty.
    pub fn title(&self) -> Option<&str> {
        self.setting("TITLE").filter(|t| !t.is_empty())
    }

    /// Check if the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// A structural unit of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Outline heading (`* Title`).
    Heading(Heading),
    /// Run of text lines.
    Paragraph(Vec<Inline>),
    /// Plain, ordered or description list.
    List(List),
    /// Entry of a [`List`]. Never appears outside one.
    ListItem(ListItem),
    /// Literal source or example text.
    CodeBlock(CodeBlock),
    /// Pipe table.
    Table(Table),
    /// `-----`
    HorizontalRule,
    /// `#+BEGIN_QUOTE` region.
    Quote(Vec<Block>),
}

/// TODO keyword on a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoKeyword {
    Todo,
    Done,
}

impl TodoKeyword {
    /// Keyword as written in the source.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "TODO",
            Self::Done => "DONE",
        }
    }

    pub(crate) fn from_word(word: &str) -> Option<Self> {
        match word {
            "TODO" => Some(Self::Todo),
            "DONE" => Some(Self::Done),
            _ => None,
        }
    }
}

/// Outline heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Number of leading stars (1 or more, unbounded).
    pub level: usize,
    /// TODO keyword, if the title starts with one.
    pub keyword: Option<TodoKeyword>,
    /// Title text.
    pub title: Vec<Inline>,
    /// Trailing `:tag:` names, in source order.
    pub tags: Vec<String>,
}

/// Type of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// `-`, `+` or indented `*` bullets.
    Unordered,
    /// `1.` or `1)` markers.
    Ordered {
        /// Number of the first item.
        start: u32,
    },
    /// Bullets with `term :: description`.
    Description,
}

/// A list. `items` holds [`Block::ListItem`] entries only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<Block>,
}

/// A list entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Term of a description item.
    pub term: Option<Vec<Inline>>,
    /// Item body: text paragraphs, nested lists, blocks.
    pub children: Vec<Block>,
}

/// Kind of literal block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeKind {
    /// `#+BEGIN_SRC lang`
    Source {
        /// Language name following `#+BEGIN_SRC`.
        language: Option<String>,
    },
    /// `#+BEGIN_EXAMPLE` or `: ` fixed-width lines.
    Example,
}

/// Literal block; the body is never inline-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    pub kind: CodeKind,
    /// Body lines joined with `\n`, with a trailing newline when non-empty.
    pub body: String,
}

/// Pipe table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Number of columns of the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

/// Table row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableRow {
    /// Row sits above the first separator line.
    pub header: bool,
    pub cells: Vec<Vec<Inline>>,
}

/// Character-level formatting inside block text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Literal text (may contain `\n` between paragraph lines).
    Text(String),
    /// `*bold*`
    Bold(Vec<Inline>),
    /// `/italic/`
    Italic(Vec<Inline>),
    /// `_underline_`
    Underline(Vec<Inline>),
    /// `+strike-through+`
    StrikeThrough(Vec<Inline>),
    /// `~code~`
    Code(String),
    /// `=verbatim=`
    Verbatim(String),
    /// `[[target][label]]` or `[[target]]`.
    Link {
        target: String,
        label: Option<Vec<Inline>>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setting_lookup_is_case_insensitive() {
        let mut doc = Document::default();
        doc.settings.insert("TITLE".into(), "Notes".into());
        assert_eq!(doc.setting("title"), Some("Notes"));
        assert_eq!(doc.title(), Some("Notes"));
        assert_eq!(doc.setting("author"), None);
    }

    #[test]
    fn test_empty_title_is_none() {
        let mut doc = Document::default();
        doc.settings.insert("TITLE".into(), String::new());
        assert_eq!(doc.title(), None);
    }

    #[test]
    fn test_column_count() {
        let table = Table {
            rows: vec![
                TableRow { header: false, cells: vec![vec![]; 2] },
                TableRow { header: false, cells: vec![vec![]; 3] },
            ],
        };
        assert_eq!(table.column_count(), 3);
        assert_eq!(Table::default().column_count(), 0);
    }
}
