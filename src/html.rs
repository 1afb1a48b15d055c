//! Document tree to HTML.
//!
//! Rendering is a pure walk over the tree: equal documents always produce
//! byte-identical output. All literal text goes through the escaping
//! writer, so no input byte reaches the output unescaped.

use crate::ast::{
    Block, CodeBlock, CodeKind, Document, Heading, Inline, List, ListItem, ListKind, Table,
};
use crate::inline::{self, links};
use crate::render::HtmlWriter;

/// Render a document to an HTML string.
///
/// # Example
/// ```
/// let doc = orgmark::parse("* Title\nHello *world*");
/// assert_eq!(
///     orgmark::render(&doc),
///     "<h1>Title</h1>\n<p>Hello <b>world</b></p>\n"
/// );
/// ```
pub fn render(doc: &Document) -> String {
    let mut writer = HtmlWriter::new();
    render_into(doc, &mut writer);
    writer.into_string()
}

/// Render a document, appending to an existing writer.
pub fn render_into(doc: &Document, writer: &mut HtmlWriter) {
    if let Some(title) = doc.title() {
        writer.title_start();
        render_inlines(&inline::parse_inlines(title), writer);
        writer.paragraph_end();
    }
    render_blocks(&doc.blocks, writer);
}

fn render_blocks(blocks: &[Block], writer: &mut HtmlWriter) {
    for block in blocks {
        render_block(block, writer);
    }
}

fn render_block(block: &Block, writer: &mut HtmlWriter) {
    match block {
        Block::Heading(heading) => render_heading(heading, writer),
        Block::Paragraph(spans) => {
            writer.paragraph_start();
            render_inlines(spans, writer);
            writer.paragraph_end();
        }
        Block::List(list) => render_list(list, writer),
        // Items are rendered by their list; a stray one still gets a `<li>`.
        Block::ListItem(item) => render_item(item, writer),
        Block::CodeBlock(code) => render_code(code, writer),
        Block::Table(table) => render_table(table, writer),
        Block::HorizontalRule => writer.thematic_break(),
        Block::Quote(children) => {
            writer.blockquote_start();
            render_blocks(children, writer);
            writer.blockquote_end();
        }
    }
}

fn render_heading(heading: &Heading, writer: &mut HtmlWriter) {
    writer.heading_start(heading.level);
    if let Some(keyword) = heading.keyword {
        writer.todo_keyword(keyword.as_str());
    }
    render_inlines(&heading.title, writer);
    for tag in &heading.tags {
        writer.tag(tag);
    }
    writer.heading_end(heading.level);
}

fn render_list(list: &List, writer: &mut HtmlWriter) {
    match list.kind {
        ListKind::Unordered => writer.ul_start(),
        ListKind::Ordered { start } => writer.ol_start(start),
        ListKind::Description => writer.dl_start(),
    }

    for block in &list.items {
        match (list.kind, block) {
            (ListKind::Description, Block::ListItem(item)) => render_description(item, writer),
            (_, Block::ListItem(item)) => render_item(item, writer),
            (_, other) => render_block(other, writer),
        }
    }

    match list.kind {
        ListKind::Unordered => writer.ul_end(),
        ListKind::Ordered { .. } => writer.ol_end(),
        ListKind::Description => writer.dl_end(),
    }
}

fn render_item(item: &ListItem, writer: &mut HtmlWriter) {
    writer.li_start();
    render_item_body(&item.children, writer);
    writer.li_end();
}

fn render_description(item: &ListItem, writer: &mut HtmlWriter) {
    writer.dt_start();
    if let Some(term) = &item.term {
        render_inlines(term, writer);
    }
    writer.dt_end();
    writer.dd_start();
    render_item_body(&item.children, writer);
    writer.dd_end();
}

/// Render list item children.
///
/// A leading paragraph that is the item's only paragraph is written bare,
/// so `- text` becomes `<li>text</li>`.
fn render_item_body(children: &[Block], writer: &mut HtmlWriter) {
    let tight = matches!(children.first(), Some(Block::Paragraph(_)))
        && children
            .iter()
            .filter(|b| matches!(b, Block::Paragraph(_)))
            .count()
            == 1;

    let rest = match children {
        [Block::Paragraph(spans), rest @ ..] if tight => {
            render_inlines(spans, writer);
            rest
        }
        _ => children,
    };

    if !rest.is_empty() {
        writer.newline();
        render_blocks(rest, writer);
    }
}

fn render_code(code: &CodeBlock, writer: &mut HtmlWriter) {
    match &code.kind {
        CodeKind::Source { language } => {
            writer.code_block_start(language.as_deref());
            writer.write_escaped_text(&code.body);
            writer.code_block_end();
        }
        CodeKind::Example => {
            writer.example_start();
            writer.write_escaped_text(&code.body);
            writer.example_end();
        }
    }
}

fn render_table(table: &Table, writer: &mut HtmlWriter) {
    writer.table_start();

    let header_rows = table.rows.iter().take_while(|r| r.header).count();
    let (head, body) = table.rows.split_at(header_rows);

    if !head.is_empty() {
        writer.thead_start();
        for row in head {
            render_row(&row.cells, true, writer);
        }
        writer.thead_end();
    }
    if !body.is_empty() {
        writer.tbody_start();
        for row in body {
            render_row(&row.cells, row.header, writer);
        }
        writer.tbody_end();
    }

    writer.table_end();
}

fn render_row(cells: &[Vec<Inline>], header: bool, writer: &mut HtmlWriter) {
    writer.tr_start();
    for cell in cells {
        writer.cell_start(header);
        render_inlines(cell, writer);
        writer.cell_end(header);
    }
    writer.tr_end();
}

fn render_inlines(spans: &[Inline], writer: &mut HtmlWriter) {
    for span in spans {
        render_inline(span, writer);
    }
}

fn render_inline(span: &Inline, writer: &mut HtmlWriter) {
    match span {
        Inline::Text(text) => writer.write_escaped_text(text),
        Inline::Bold(children) => {
            writer.write_str("<b>");
            render_inlines(children, writer);
            writer.write_str("</b>");
        }
        Inline::Italic(children) => {
            writer.write_str("<i>");
            render_inlines(children, writer);
            writer.write_str("</i>");
        }
        Inline::Underline(children) => {
            writer.write_str("<span style=\"text-decoration:underline;\">");
            render_inlines(children, writer);
            writer.write_str("</span>");
        }
        Inline::StrikeThrough(children) => {
            writer.write_str("<del>");
            render_inlines(children, writer);
            writer.write_str("</del>");
        }
        Inline::Code(text) | Inline::Verbatim(text) => writer.inline_code(text),
        Inline::Link { target, label } => match label {
            None if links::is_image(target) => writer.image(target, target),
            None => {
                writer.link_start(target);
                writer.write_escaped_text(target);
                writer.link_end();
            }
            Some(label) => {
                writer.link_start(target);
                render_inlines(label, writer);
                writer.link_end();
            }
        },
    }
}
