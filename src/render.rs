//! HTML output writer with optimized buffer management.

use crate::escape;
use crate::limits;

/// HTML output writer with pre-allocated, reusable buffer.
///
/// Every write takes `str` input and escaping only inserts ASCII, so the
/// buffer always holds valid UTF-8.
///
/// # Example
/// ```
/// use orgmark::HtmlWriter;
///
/// let mut writer = HtmlWriter::with_capacity_for(1000);
/// writer.write_str("<p>");
/// writer.write_escaped_text("Hello <World>");
/// writer.write_str("</p>");
///
/// let html = writer.into_string();
/// assert_eq!(html, "<p>Hello &lt;World&gt;</p>");
/// ```
pub struct HtmlWriter {
    out: Vec<u8>,
}

impl HtmlWriter {
    /// Create a new writer with default capacity.
    #[inline]
    pub fn new() -> Self {
        Self {
            out: Vec::with_capacity(1024),
        }
    }

    /// Create with pre-allocated capacity based on expected input size.
    ///
    /// Typical HTML is ~1.25x input size; we reserve extra for safety.
    #[inline]
    pub fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: Vec::with_capacity(input_len + input_len / 4),
        }
    }

    /// Write a static string (compile-time known).
    #[inline]
    pub fn write_str(&mut self, s: &'static str) {
        self.out.extend_from_slice(s.as_bytes());
    }

    /// Write text with HTML escaping (for text content).
    #[inline]
    pub fn write_escaped_text(&mut self, text: &str) {
        escape::escape_text_into(&mut self.out, text.as_bytes());
    }

    /// Write attribute value escaped for double quotes.
    #[inline]
    pub fn write_escaped_attr(&mut self, attr: &str) {
        escape::escape_attr_into(&mut self.out, attr);
    }

    /// Write a newline.
    #[inline]
    pub fn newline(&mut self) {
        self.out.push(b'\n');
    }

    /// Clear output for reuse (keeps capacity).
    #[inline]
    pub fn clear(&mut self) {
        self.out.clear();
    }

    /// Get output as str.
    #[inline]
    pub fn as_str(&self) -> &str {
        // SAFETY: only UTF-8 input and ASCII escapes are ever written
        unsafe { std::str::from_utf8_unchecked(&self.out) }
    }

    /// Take ownership as String.
    #[inline]
    pub fn into_string(self) -> String {
        // SAFETY: only UTF-8 input and ASCII escapes are ever written
        unsafe { String::from_utf8_unchecked(self.out) }
    }

    // --- Block Elements ---

    /// Write document title start: `<p class="title">`
    #[inline]
    pub fn title_start(&mut self) {
        self.write_str("<p class=\"title\">");
    }

    /// Write paragraph start: `<p>`
    #[inline]
    pub fn paragraph_start(&mut self) {
        self.write_str("<p>");
    }

    /// Write paragraph end: `</p>\n`
    #[inline]
    pub fn paragraph_end(&mut self) {
        self.write_str("</p>\n");
    }

    /// Write heading start: `<hN>`, N clamped to the deepest HTML level.
    #[inline]
    pub fn heading_start(&mut self, level: usize) {
        self.write_str("<h");
        self.write_level(level);
        self.out.push(b'>');
    }

    /// Write heading end: `</hN>\n`
    #[inline]
    pub fn heading_end(&mut self, level: usize) {
        self.write_str("</h");
        self.write_level(level);
        self.write_str(">\n");
    }

    fn write_level(&mut self, level: usize) {
        let level = level.clamp(1, limits::MAX_HEADING_LEVEL);
        self.out.push(b'0' + level as u8);
    }

    /// Write TODO keyword: `<span class="todo-keyword TODO">TODO</span> `
    #[inline]
    pub fn todo_keyword(&mut self, keyword: &str) {
        self.write_str("<span class=\"todo-keyword ");
        self.write_escaped_attr(keyword);
        self.write_str("\">");
        self.write_escaped_text(keyword);
        self.write_str("</span> ");
    }

    /// Write a heading tag: ` <span class="tag">name</span>`
    #[inline]
    pub fn tag(&mut self, tag: &str) {
        self.write_str(" <span class=\"tag\">");
        self.write_escaped_text(tag);
        self.write_str("</span>");
    }

    /// Write code block start with optional language class.
    #[inline]
    pub fn code_block_start(&mut self, lang: Option<&str>) {
        match lang {
            Some(l) if !l.is_empty() => {
                self.write_str("<pre><code class=\"language-");
                self.write_escaped_attr(l);
                self.write_str("\">");
            }
            _ => {
                self.write_str("<pre><code>");
            }
        }
    }

    /// Write code block end: `</code></pre>\n`
    #[inline]
    pub fn code_block_end(&mut self) {
        self.write_str("</code></pre>\n");
    }

    /// Write example block start: `<pre class="example">`
    #[inline]
    pub fn example_start(&mut self) {
        self.write_str("<pre class=\"example\">");
    }

    /// Write example block end: `</pre>\n`
    #[inline]
    pub fn example_end(&mut self) {
        self.write_str("</pre>\n");
    }

    /// Write horizontal rule: `<hr />\n`
    #[inline]
    pub fn thematic_break(&mut self) {
        self.write_str("<hr />\n");
    }

    /// Write blockquote start: `<blockquote>\n`
    #[inline]
    pub fn blockquote_start(&mut self) {
        self.write_str("<blockquote>\n");
    }

    /// Write blockquote end: `</blockquote>\n`
    #[inline]
    pub fn blockquote_end(&mut self) {
        self.write_str("</blockquote>\n");
    }

    /// Write list start (unordered): `<ul>\n`
    #[inline]
    pub fn ul_start(&mut self) {
        self.write_str("<ul>\n");
    }

    /// Write list end (unordered): `</ul>\n`
    #[inline]
    pub fn ul_end(&mut self) {
        self.write_str("</ul>\n");
    }

    /// Write list start (ordered): `<ol>\n` or `<ol start="N">\n`
    #[inline]
    pub fn ol_start(&mut self, start: u32) {
        if start == 1 {
            self.write_str("<ol>\n");
        } else {
            self.write_str("<ol start=\"");
            self.write_u32(start);
            self.write_str("\">\n");
        }
    }

    /// Write list end (ordered): `</ol>\n`
    #[inline]
    pub fn ol_end(&mut self) {
        self.write_str("</ol>\n");
    }

    /// Write description list start: `<dl>\n`
    #[inline]
    pub fn dl_start(&mut self) {
        self.write_str("<dl>\n");
    }

    /// Write description list end: `</dl>\n`
    #[inline]
    pub fn dl_end(&mut self) {
        self.write_str("</dl>\n");
    }

    /// Write list item start: `<li>`
    #[inline]
    pub fn li_start(&mut self) {
        self.write_str("<li>");
    }

    /// Write list item end: `</li>\n`
    #[inline]
    pub fn li_end(&mut self) {
        self.write_str("</li>\n");
    }

    /// Write description term start: `<dt>`
    #[inline]
    pub fn dt_start(&mut self) {
        self.write_str("<dt>");
    }

    /// Write description term end: `</dt>\n`
    #[inline]
    pub fn dt_end(&mut self) {
        self.write_str("</dt>\n");
    }

    /// Write description details start: `<dd>`
    #[inline]
    pub fn dd_start(&mut self) {
        self.write_str("<dd>");
    }

    /// Write description details end: `</dd>\n`
    #[inline]
    pub fn dd_end(&mut self) {
        self.write_str("</dd>\n");
    }

    // --- Tables ---

    #[inline]
    pub fn table_start(&mut self) {
        self.write_str("<table>\n");
    }

    #[inline]
    pub fn table_end(&mut self) {
        self.write_str("</table>\n");
    }

    #[inline]
    pub fn thead_start(&mut self) {
        self.write_str("<thead>\n");
    }

    #[inline]
    pub fn thead_end(&mut self) {
        self.write_str("</thead>\n");
    }

    #[inline]
    pub fn tbody_start(&mut self) {
        self.write_str("<tbody>\n");
    }

    #[inline]
    pub fn tbody_end(&mut self) {
        self.write_str("</tbody>\n");
    }

    #[inline]
    pub fn tr_start(&mut self) {
        self.write_str("<tr>\n");
    }

    #[inline]
    pub fn tr_end(&mut self) {
        self.write_str("</tr>\n");
    }

    /// Write cell start: `<th>` for header rows, `<td>` otherwise.
    #[inline]
    pub fn cell_start(&mut self, header: bool) {
        self.write_str(if header { "<th>" } else { "<td>" });
    }

    /// Write cell end: `</th>\n` or `</td>\n`
    #[inline]
    pub fn cell_end(&mut self, header: bool) {
        self.write_str(if header { "</th>\n" } else { "</td>\n" });
    }

    // --- Inline Elements ---

    /// Write inline code: `<code>escaped_content</code>`
    #[inline]
    pub fn inline_code(&mut self, content: &str) {
        self.write_str("<code>");
        self.write_escaped_text(content);
        self.write_str("</code>");
    }

    /// Write link start: `<a href="url">`
    #[inline]
    pub fn link_start(&mut self, url: &str) {
        self.write_str("<a href=\"");
        self.write_escaped_attr(url);
        self.write_str("\">");
    }

    /// Write link end: `</a>`
    #[inline]
    pub fn link_end(&mut self) {
        self.write_str("</a>");
    }

    /// Write image: `<img src="url" alt="alt" />`
    #[inline]
    pub fn image(&mut self, url: &str, alt: &str) {
        self.write_str("<img src=\"");
        self.write_escaped_attr(url);
        self.write_str("\" alt=\"");
        self.write_escaped_attr(alt);
        self.write_str("\" />");
    }

    /// Write a u32 as decimal.
    fn write_u32(&mut self, mut n: u32) {
        if n == 0 {
            self.out.push(b'0');
            return;
        }

        let mut buf = [0u8; 10]; // Max digits for u32
        let mut i = buf.len();

        while n > 0 {
            i -= 1;
            buf[i] = b'0' + (n % 10) as u8;
            n /= 10;
        }

        self.out.extend_from_slice(&buf[i..]);
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writer_new() {
        let writer = HtmlWriter::new();
        assert_eq!(writer.as_str(), "");
    }

    #[test]
    fn test_writer_capacity() {
        let writer = HtmlWriter::with_capacity_for(1000);
        assert!(writer.out.capacity() >= 1250);
    }

    #[test]
    fn test_writer_escaped_text() {
        let mut writer = HtmlWriter::new();
        writer.write_escaped_text("<script>");
        assert_eq!(writer.as_str(), "&lt;script&gt;");
    }

    #[test]
    fn test_writer_paragraph() {
        let mut writer = HtmlWriter::new();
        writer.paragraph_start();
        writer.write_escaped_text("Hello");
        writer.paragraph_end();
        assert_eq!(writer.as_str(), "<p>Hello</p>\n");
    }

    #[test]
    fn test_writer_heading_levels() {
        for level in 1..=6 {
            let mut writer = HtmlWriter::new();
            writer.heading_start(level);
            writer.heading_end(level);
            let expected = format!("<h{level}></h{level}>\n");
            assert_eq!(writer.as_str(), expected);
        }
    }

    #[test]
    fn test_writer_heading_clamps() {
        let mut writer = HtmlWriter::new();
        writer.heading_start(9);
        writer.heading_end(9);
        assert_eq!(writer.as_str(), "<h6></h6>\n");
    }

    #[test]
    fn test_writer_code_block() {
        let mut writer = HtmlWriter::new();
        writer.code_block_start(Some("rust"));
        writer.write_escaped_text("fn main() {}");
        writer.code_block_end();
        assert_eq!(
            writer.as_str(),
            "<pre><code class=\"language-rust\">fn main() {}</code></pre>\n"
        );
    }

    #[test]
    fn test_writer_code_block_no_lang() {
        let mut writer = HtmlWriter::new();
        writer.code_block_start(None);
        writer.write_escaped_text("code");
        writer.code_block_end();
        assert_eq!(writer.as_str(), "<pre><code>code</code></pre>\n");
    }

    #[test]
    fn test_writer_link_escape_url() {
        let mut writer = HtmlWriter::new();
        writer.link_start("https://example.com?a=1&b=2");
        writer.link_end();
        assert_eq!(
            writer.as_str(),
            "<a href=\"https://example.com?a=1&amp;b=2\"></a>"
        );
    }

    #[test]
    fn test_writer_image() {
        let mut writer = HtmlWriter::new();
        writer.image("cat.png", "cat.png");
        assert_eq!(writer.as_str(), "<img src=\"cat.png\" alt=\"cat.png\" />");
    }

    #[test]
    fn test_writer_todo_and_tag() {
        let mut writer = HtmlWriter::new();
        writer.todo_keyword("DONE");
        writer.tag("home");
        assert_eq!(
            writer.as_str(),
            "<span class=\"todo-keyword DONE\">DONE</span>  <span class=\"tag\">home</span>"
        );
    }

    #[test]
    fn test_writer_ol_start() {
        let mut writer = HtmlWriter::new();
        writer.ol_start(5);
        writer.ol_end();
        assert_eq!(writer.as_str(), "<ol start=\"5\">\n</ol>\n");

        writer.clear();
        writer.ol_start(1);
        assert_eq!(writer.as_str(), "<ol>\n");
    }

    #[test]
    fn test_write_u32() {
        let mut writer = HtmlWriter::new();
        writer.write_u32(0);
        assert_eq!(writer.as_str(), "0");

        writer.clear();
        writer.write_u32(1234567890);
        assert_eq!(writer.as_str(), "1234567890");
    }
}
