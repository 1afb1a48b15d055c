//! Block parser implementation.

use log::{debug, trace};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::ast::{
    Block, CodeBlock, CodeKind, Document, Heading, List, ListItem, ListKind, Table, TableRow,
    TodoKeyword,
};
use crate::inline::InlineParser;
use crate::limits;

use super::line::{self, Bullet, GreaterBlock, Line, LineKind};

/// Block parser state.
pub struct BlockParser<'a> {
    /// Input lines. The first line of a list item is rewritten in place
    /// to the text after its bullet.
    lines: Vec<Line<'a>>,
    /// Index of the current line.
    pos: usize,
    /// Current container nesting depth (list items, quote blocks).
    depth: usize,
    /// Collected `#+KEY: value` settings.
    settings: FxHashMap<String, String>,
    /// Last failed search per closing line and container indent.
    dead_ends: FxHashMap<(Closing, usize), DeadEnd>,
    inline: InlineParser,
}

/// The closing line a block or drawer search looks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Closing {
    Block(GreaterBlock),
    Drawer,
}

impl Closing {
    fn matches(self, line: &Line<'_>) -> bool {
        match self {
            Closing::Block(block) => line::is_block_end(line, block),
            Closing::Drawer => line::is_drawer_end(line),
        }
    }
}

/// Lines `from..=stop` hold no closing line before the search stopped.
#[derive(Debug, Clone, Copy)]
struct DeadEnd {
    from: usize,
    stop: usize,
}

impl<'a> BlockParser<'a> {
    /// Create a new block parser.
    pub fn new(input: &'a str) -> Self {
        Self::from_lines(line::split_lines(input), 0)
    }

    fn from_lines(lines: Vec<Line<'a>>, depth: usize) -> Self {
        Self {
            lines,
            pos: 0,
            depth,
            settings: FxHashMap::default(),
            dead_ends: FxHashMap::default(),
            inline: InlineParser::new(),
        }
    }

    /// Parse all blocks into a document.
    pub fn parse(mut self) -> Document {
        let blocks = self.parse_blocks(0);
        trace!(
            "parsed {} top-level blocks from {} lines",
            blocks.len(),
            self.lines.len()
        );
        Document {
            blocks,
            settings: self.settings,
        }
    }

    #[inline]
    fn current(&self) -> Option<Line<'a>> {
        self.lines.get(self.pos).copied()
    }

    /// Count blank lines at the current position and return the line after them.
    fn blank_run(&self) -> (usize, Option<Line<'a>>) {
        let blanks = self.lines[self.pos..]
            .iter()
            .take_while(|l| l.is_blank())
            .count();
        (blanks, self.lines.get(self.pos + blanks).copied())
    }

    /// Parse blocks until a non-blank line indented less than `min_indent`.
    ///
    /// With `min_indent > 0` (list item bodies) two blank lines, or blank
    /// lines followed by a shallower line, also end the container.
    fn parse_blocks(&mut self, min_indent: usize) -> Vec<Block> {
        let mut blocks = Vec::new();

        while let Some(line) = self.current() {
            if line.is_blank() {
                if min_indent > 0 {
                    match self.blank_run() {
                        (blanks, Some(next)) if blanks < 2 && next.indent >= min_indent => {}
                        _ => break,
                    }
                }
                self.pos += 1;
                continue;
            }

            if line.indent < min_indent {
                break;
            }

            match line::classify(&line) {
                LineKind::Blank | LineKind::Comment => self.pos += 1,
                LineKind::Heading { level, rest } => {
                    self.pos += 1;
                    blocks.push(Block::Heading(self.parse_heading(level, rest)));
                }
                LineKind::BlockBegin { block, args } => {
                    match self.parse_greater_block(block, args, min_indent) {
                        Some(parsed) => blocks.push(parsed),
                        None => blocks.push(self.parse_paragraph(min_indent)),
                    }
                }
                LineKind::Setting { key, value } => {
                    self.settings
                        .insert(key.to_ascii_uppercase(), value.to_string());
                    self.pos += 1;
                }
                LineKind::Drawer => {
                    if !self.skip_drawer(min_indent) {
                        blocks.push(self.parse_paragraph(min_indent));
                    }
                }
                LineKind::Rule => {
                    self.pos += 1;
                    blocks.push(Block::HorizontalRule);
                }
                LineKind::FixedWidth(_) => blocks.push(self.parse_fixed_width(min_indent)),
                LineKind::TableRow => blocks.extend(self.parse_table(min_indent)),
                LineKind::ListItem(bullet) if self.depth < limits::MAX_BLOCK_NESTING => {
                    blocks.push(self.parse_list(bullet, line.indent));
                }
                LineKind::ListItem(_) | LineKind::Text => {
                    blocks.push(self.parse_paragraph(min_indent));
                }
            }
        }

        blocks
    }

    /// Check if a line ends a running paragraph.
    fn starts_block(&self, line: &Line<'_>) -> bool {
        match line::classify(line) {
            LineKind::Text => false,
            LineKind::ListItem(_) => self.depth < limits::MAX_BLOCK_NESTING,
            _ => true,
        }
    }

    /// Find the first closing line from `from` without leaving the current
    /// container or crossing a heading.
    ///
    /// A failed search is remembered, so later openers in the same range
    /// fail without rescanning.
    fn find_end(&mut self, from: usize, min_indent: usize, closing: Closing) -> Option<usize> {
        let key = (closing, min_indent);
        if let Some(dead) = self.dead_ends.get(&key) {
            if (dead.from..=dead.stop).contains(&from) {
                return None;
            }
        }

        let mut stop = self.lines.len();
        for (i, line) in self.lines.iter().enumerate().skip(from) {
            if !line.is_blank() && line.indent < min_indent {
                stop = i;
                break;
            }
            if is_heading(line) {
                stop = i;
                break;
            }
            if closing.matches(line) {
                return Some(i);
            }
        }

        self.dead_ends.insert(key, DeadEnd { from, stop });
        None
    }

    fn parse_heading(&mut self, level: usize, rest: &str) -> Heading {
        let (first_word, after) = match rest.find([' ', '\t']) {
            Some(i) => (&rest[..i], rest[i..].trim_start()),
            None => (rest, ""),
        };
        let (keyword, title) = match TodoKeyword::from_word(first_word) {
            Some(keyword) => (Some(keyword), after),
            None => (None, rest),
        };
        let (title, tags) = split_tags(title);

        Heading {
            level,
            keyword,
            title: self.inline.parse(title),
            tags,
        }
    }

    /// Parse a `#+BEGIN_...` region. Returns `None` when it is never
    /// closed, leaving the opening line to be read as text.
    fn parse_greater_block(
        &mut self,
        block: GreaterBlock,
        args: &str,
        min_indent: usize,
    ) -> Option<Block> {
        let start = self.pos;
        if block == GreaterBlock::Quote && self.depth >= limits::MAX_BLOCK_NESTING {
            return None;
        }

        let Some(end) = self.find_end(start + 1, min_indent, Closing::Block(block))
        else {
            debug!(
                "unterminated {} at line {}, kept as text",
                block.end_marker(),
                self.lines[start].number
            );
            return None;
        };

        let body: Vec<Line<'a>> = self.lines[start + 1..end].to_vec();
        self.pos = end + 1;

        let parsed = match block {
            GreaterBlock::Src => Block::CodeBlock(CodeBlock {
                kind: CodeKind::Source {
                    language: args.split_whitespace().next().map(str::to_string),
                },
                body: literal_body(&body),
            }),
            GreaterBlock::Example => Block::CodeBlock(CodeBlock {
                kind: CodeKind::Example,
                body: literal_body(&body),
            }),
            GreaterBlock::Quote => Block::Quote(self.parse_nested(body)),
        };
        Some(parsed)
    }

    /// Parse lines as an independent container one level deeper.
    fn parse_nested(&mut self, lines: Vec<Line<'a>>) -> Vec<Block> {
        let mut nested = BlockParser::from_lines(lines, self.depth + 1);
        let blocks = nested.parse_blocks(0);
        self.settings.extend(nested.settings);
        blocks
    }

    /// Skip a `:NAME:` ... `:END:` drawer. Returns false if it is never closed.
    fn skip_drawer(&mut self, min_indent: usize) -> bool {
        match self.find_end(self.pos + 1, min_indent, Closing::Drawer) {
            Some(end) => {
                self.pos = end + 1;
                true
            }
            None => {
                debug!(
                    "unterminated drawer at line {}, kept as text",
                    self.lines[self.pos].number
                );
                false
            }
        }
    }

    fn parse_fixed_width(&mut self, min_indent: usize) -> Block {
        let mut body = String::new();
        while let Some(line) = self.current() {
            if line.is_blank() || line.indent < min_indent {
                break;
            }
            let LineKind::FixedWidth(text) = line::classify(&line) else {
                break;
            };
            body.push_str(text);
            body.push('\n');
            self.pos += 1;
        }
        Block::CodeBlock(CodeBlock {
            kind: CodeKind::Example,
            body,
        })
    }

    /// Parse consecutive table lines. A table made only of separators
    /// produces no block.
    fn parse_table(&mut self, min_indent: usize) -> Option<Block> {
        let first = self.pos;
        let mut rows = Vec::new();
        let mut rows_before_separator = None;

        while let Some(line) = self.current() {
            if line.is_blank()
                || line.indent < min_indent
                || line::classify(&line) != LineKind::TableRow
            {
                break;
            }
            if line.content.starts_with("|-") {
                rows_before_separator.get_or_insert(rows.len());
            } else {
                rows.push(self.parse_table_row(line.content));
            }
            self.pos += 1;
        }

        if rows.is_empty() {
            debug!(
                "table without rows at line {}, dropped",
                self.lines[first].number
            );
            return None;
        }

        let mut table = Table { rows };
        let columns = table.column_count();
        for row in &mut table.rows {
            row.cells.resize_with(columns, Vec::new);
        }
        // Rows above the first separator form the header, if a body follows.
        if let Some(n) = rows_before_separator.filter(|&n| n > 0 && n < table.rows.len()) {
            table.rows[..n].iter_mut().for_each(|row| row.header = true);
        }

        Some(Block::Table(table))
    }

    fn parse_table_row(&mut self, content: &str) -> TableRow {
        let inner = content.strip_prefix('|').unwrap_or(content);
        let inner = inner.strip_suffix('|').unwrap_or(inner);
        let cells: SmallVec<[&str; 8]> = inner
            .split('|')
            .map(str::trim)
            .take(limits::MAX_TABLE_COLUMNS)
            .collect();

        TableRow {
            header: false,
            cells: cells.iter().map(|cell| self.inline.parse(cell)).collect(),
        }
    }

    fn parse_list(&mut self, first: Bullet<'_>, list_indent: usize) -> Block {
        let kind = match first.number {
            Some(start) => ListKind::Ordered { start },
            None if split_term(first.rest).is_some() => ListKind::Description,
            None => ListKind::Unordered,
        };
        let ordered = matches!(kind, ListKind::Ordered { .. });
        let same_list = |line: &Line<'_>| {
            line.indent == list_indent
                && matches!(line::classify(line), LineKind::ListItem(b) if b.number.is_some() == ordered)
        };

        let mut items = Vec::new();
        while let Some(line) = self.current() {
            if line.is_blank() {
                match self.blank_run() {
                    (blanks, Some(next)) if blanks < 2 && same_list(&next) => {
                        self.pos += blanks;
                        continue;
                    }
                    _ => break,
                }
            }
            if !same_list(&line) {
                break;
            }
            let LineKind::ListItem(bullet) = line::classify(&line) else {
                break;
            };
            items.push(Block::ListItem(self.parse_item(line, bullet, kind)));
        }

        Block::List(List { kind, items })
    }

    fn parse_item(&mut self, line: Line<'a>, bullet: Bullet<'a>, kind: ListKind) -> ListItem {
        let (term, text) = match kind {
            ListKind::Description => match split_term(bullet.rest) {
                Some((term, text)) => (Some(self.inline.parse(term)), text),
                None => (None, bullet.rest),
            },
            _ => (None, bullet.rest),
        };

        // The item body starts with the text after the bullet.
        if text.is_empty() {
            self.pos += 1;
        } else {
            self.lines[self.pos] = Line {
                number: line.number,
                indent: line.indent + bullet.width,
                content: text,
            };
        }

        self.depth += 1;
        let children = self.parse_blocks(line.indent + 1);
        self.depth -= 1;

        ListItem { term, children }
    }

    fn parse_paragraph(&mut self, min_indent: usize) -> Block {
        let mut text = String::from(self.lines[self.pos].content);
        self.pos += 1;

        while let Some(line) = self.current() {
            if line.is_blank() || line.indent < min_indent || self.starts_block(&line) {
                break;
            }
            text.push('\n');
            text.push_str(line.content);
            self.pos += 1;
        }

        Block::Paragraph(self.inline.parse(&text))
    }
}

/// Headings close every open block and drawer.
fn is_heading(line: &Line<'_>) -> bool {
    line.indent == 0
        && line.content.starts_with('*')
        && matches!(line::classify(line), LineKind::Heading { .. })
}

/// Split trailing `:tag1:tag2:` off a heading title.
fn split_tags(title: &str) -> (&str, Vec<String>) {
    let start = title.rfind([' ', '\t']).map_or(0, |i| i + 1);
    let candidate = &title[start..];
    let is_tag_char = |c: char| c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '%');

    let valid = candidate.len() >= 3
        && candidate.starts_with(':')
        && candidate.ends_with(':')
        && candidate[1..candidate.len() - 1]
            .split(':')
            .all(|tag| !tag.is_empty() && tag.chars().all(is_tag_char));
    if !valid {
        return (title, Vec::new());
    }

    let tags = candidate
        .split(':')
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect();
    (title[..start].trim_end(), tags)
}

/// Split `term :: description` list item text.
fn split_term(text: &str) -> Option<(&str, &str)> {
    let (term, rest) = match text.find(" :: ") {
        Some(i) => (&text[..i], &text[i + 4..]),
        None => (text.strip_suffix(" ::")?, ""),
    };
    let term = term.trim();
    (!term.is_empty()).then_some((term, rest.trim()))
}

/// Body of a literal block: common indentation removed, comma escapes
/// (`,*` and `,#+`) undone, each line terminated by `\n`.
fn literal_body(lines: &[Line<'_>]) -> String {
    let common = lines
        .iter()
        .filter(|l| !l.is_blank())
        .map(|l| l.indent)
        .min()
        .unwrap_or(0);

    let mut body = String::new();
    for line in lines {
        if !line.is_blank() {
            body.extend(std::iter::repeat_n(' ', line.indent - common));
            let content = line.content;
            let content = if content.starts_with(",*") || content.starts_with(",#+") {
                &content[1..]
            } else {
                content
            };
            body.push_str(content);
        }
        body.push('\n');
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Inline;

    fn parse(input: &str) -> Document {
        BlockParser::new(input).parse()
    }

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_empty_input() {
        assert!(parse("").is_empty());
        assert!(parse("\n\n  \n").is_empty());
    }

    #[test]
    fn test_heading_and_paragraph() {
        let doc = parse("* Title\nHello *world*");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Heading(Heading {
                    level: 1,
                    keyword: None,
                    title: vec![text("Title")],
                    tags: vec![],
                }),
                Block::Paragraph(vec![
                    text("Hello "),
                    Inline::Bold(vec![text("world")]),
                ]),
            ]
        );
    }

    #[test]
    fn test_heading_keyword_and_tags() {
        let doc = parse("** TODO Write report :work:urgent:");
        let Block::Heading(heading) = &doc.blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.level, 2);
        assert_eq!(heading.keyword, Some(TodoKeyword::Todo));
        assert_eq!(heading.title, vec![text("Write report")]);
        assert_eq!(heading.tags, vec!["work".to_string(), "urgent".to_string()]);
    }

    #[test]
    fn test_heading_keyword_must_be_whole_word() {
        let doc = parse("* TODOS are fun");
        let Block::Heading(heading) = &doc.blocks[0] else {
            panic!("expected heading");
        };
        assert_eq!(heading.keyword, None);
        assert_eq!(heading.title, vec![text("TODOS are fun")]);
    }

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("Title :a:b:"), ("Title", vec!["a".into(), "b".into()]));
        assert_eq!(split_tags("Ratio 1:2:"), ("Ratio 1:2:", vec![]));
        assert_eq!(split_tags("Empty ::"), ("Empty ::", vec![]));
    }

    #[test]
    fn test_paragraph_lines_join() {
        let doc = parse("one\n  two\n\nthree");
        assert_eq!(
            doc.blocks,
            vec![
                Block::Paragraph(vec![text("one\ntwo")]),
                Block::Paragraph(vec![text("three")]),
            ]
        );
    }

    #[test]
    fn test_settings_and_comments() {
        let doc = parse("#+TITLE: Notes\n#+author: Me\n# hidden\ntext");
        assert_eq!(doc.title(), Some("Notes"));
        assert_eq!(doc.setting("AUTHOR"), Some("Me"));
        assert_eq!(doc.blocks, vec![Block::Paragraph(vec![text("text")])]);
    }

    #[test]
    fn test_src_block() {
        let doc = parse("#+BEGIN_SRC rust\n  fn main() {\n      run();\n  }\n#+END_SRC");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock(CodeBlock {
                kind: CodeKind::Source {
                    language: Some("rust".into())
                },
                body: "fn main() {\n    run();\n}\n".into(),
            })]
        );
    }

    #[test]
    fn test_src_block_comma_escape() {
        let doc = parse("#+begin_example\n,* not a heading\n,#+END_EXAMPLE\n#+end_example");
        assert_eq!(
            doc.blocks,
            vec![Block::CodeBlock(CodeBlock {
                kind: CodeKind::Example,
                body: "* not a heading\n#+END_EXAMPLE\n".into(),
            })]
        );
    }

    #[test]
    fn test_unterminated_block_is_text() {
        let doc = parse("#+BEGIN_SRC sh\necho hi");
        assert_eq!(
            doc.blocks,
            vec![Block::Paragraph(vec![text("#+BEGIN_SRC sh\necho hi")])]
        );
    }

    #[test]
    fn test_quote_block() {
        let doc = parse("#+BEGIN_QUOTE\nWise /words/.\n#+END_QUOTE");
        assert_eq!(
            doc.blocks,
            vec![Block::Quote(vec![Block::Paragraph(vec![
                text("Wise "),
                Inline::Italic(vec![text("words")]),
                text("."),
            ])])]
        );
    }

    #[test]
    fn test_drawer_skipped() {
        let doc = parse("* H\n:PROPERTIES:\n:ID: 42\n:END:\nBody");
        assert_eq!(doc.blocks.len(), 2);
        assert_eq!(doc.blocks[1], Block::Paragraph(vec![text("Body")]));
    }

    #[test]
    fn test_fixed_width() {
        let doc = parse(": one\n:\n: three\nafter");
        assert_eq!(
            doc.blocks[0],
            Block::CodeBlock(CodeBlock {
                kind: CodeKind::Example,
                body: "one\n\nthree\n".into(),
            })
        );
        assert_eq!(doc.blocks[1], Block::Paragraph(vec![text("after")]));
    }

    #[test]
    fn test_rule() {
        let doc = parse("above\n-----\nbelow");
        assert_eq!(doc.blocks[1], Block::HorizontalRule);
        assert_eq!(doc.blocks.len(), 3);
    }

    #[test]
    fn test_table_header() {
        let doc = parse("| a | b |\n|---+---|\n| 1 | 2 |\n| 3 |");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert_eq!(table.rows.len(), 3);
        assert!(table.rows[0].header);
        assert!(!table.rows[1].header);
        assert_eq!(table.rows[0].cells[1], vec![text("b")]);
        // Short rows are padded.
        assert_eq!(table.rows[2].cells, vec![vec![text("3")], vec![]]);
    }

    #[test]
    fn test_table_without_separator_has_no_header() {
        let doc = parse("| a |\n| b |");
        let Block::Table(table) = &doc.blocks[0] else {
            panic!("expected table");
        };
        assert!(table.rows.iter().all(|r| !r.header));
    }

    #[test]
    fn test_unordered_list() {
        let doc = parse("- one\n- two\n  continued\n\nafter");
        assert_eq!(
            doc.blocks,
            vec![
                Block::List(List {
                    kind: ListKind::Unordered,
                    items: vec![
                        Block::ListItem(ListItem {
                            term: None,
                            children: vec![Block::Paragraph(vec![text("one")])],
                        }),
                        Block::ListItem(ListItem {
                            term: None,
                            children: vec![Block::Paragraph(vec![text("two\ncontinued")])],
                        }),
                    ],
                }),
                Block::Paragraph(vec![text("after")]),
            ]
        );
    }

    #[test]
    fn test_nested_list() {
        let doc = parse("1. outer\n   - inner\n2. next");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.kind, ListKind::Ordered { start: 1 });
        assert_eq!(list.items.len(), 2);
        let Block::ListItem(first) = &list.items[0] else {
            panic!("expected item");
        };
        assert_eq!(first.children.len(), 2);
        assert!(matches!(
            &first.children[1],
            Block::List(List { kind: ListKind::Unordered, .. })
        ));
    }

    #[test]
    fn test_list_survives_single_blank_line() {
        let doc = parse("- a\n\n- b");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items.len(), 2);
    }

    #[test]
    fn test_two_blank_lines_end_list() {
        let doc = parse("- a\n\n\n- b");
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_ordered_after_unordered_is_new_list() {
        let doc = parse("- a\n1. b");
        assert_eq!(doc.blocks.len(), 2);
    }

    #[test]
    fn test_description_list() {
        let doc = parse("- Rust :: a language\n- Org :: a format");
        let Block::List(list) = &doc.blocks[0] else {
            panic!("expected list");
        };
        assert_eq!(list.kind, ListKind::Description);
        let Block::ListItem(item) = &list.items[1] else {
            panic!("expected item");
        };
        assert_eq!(item.term, Some(vec![text("Org")]));
        assert_eq!(item.children, vec![Block::Paragraph(vec![text("a format")])]);
    }

    #[test]
    fn test_split_term() {
        assert_eq!(split_term("a :: b"), Some(("a", "b")));
        assert_eq!(split_term("a ::"), Some(("a", "")));
        assert_eq!(split_term(" :: b"), None);
        assert_eq!(split_term("a::b"), None);
    }

    #[test]
    fn test_heading_ends_list() {
        let doc = parse("- item\n* Next");
        assert!(matches!(doc.blocks[1], Block::Heading(_)));
    }

    #[test]
    fn test_paragraph_then_list() {
        let doc = parse("Intro:\n- a");
        assert!(matches!(doc.blocks[0], Block::Paragraph(_)));
        assert!(matches!(doc.blocks[1], Block::List(_)));
    }

    #[test]
    fn test_deep_list_nesting_is_bounded() {
        let input: String = (0..limits::MAX_BLOCK_NESTING + 10)
            .map(|depth| format!("{}- level\n", " ".repeat(depth * 2)))
            .collect();
        let doc = parse(&input);
        assert_eq!(doc.blocks.len(), 1);
    }
}
