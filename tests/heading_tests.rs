//! Heading tests: levels, TODO keywords and tags.

use orgmark::to_html;

#[test]
fn heading_then_paragraph() {
    assert_eq!(
        to_html("* Title\nHello *world*"),
        "<h1>Title</h1>\n<p>Hello <b>world</b></p>\n"
    );
}

#[test]
fn heading_levels_map_to_tags() {
    for level in 1..=6 {
        let input = format!("{} Level", "*".repeat(level));
        assert_eq!(to_html(&input), format!("<h{level}>Level</h{level}>\n"));
    }
}

#[test]
fn deep_headings_clamp_to_h6() {
    assert_eq!(to_html("******* Seven"), "<h6>Seven</h6>\n");
    assert_eq!(to_html("************ Twelve"), "<h6>Twelve</h6>\n");
}

#[test]
fn heading_needs_space_after_stars() {
    assert_eq!(to_html("*bold* start"), "<p><b>bold</b> start</p>\n");
}

#[test]
fn indented_star_is_not_a_heading() {
    assert_eq!(to_html("  * item"), "<ul>\n<li>item</li>\n</ul>\n");
}

#[test]
fn empty_heading() {
    assert_eq!(to_html("*"), "<h1></h1>\n");
}

#[test]
fn todo_keyword() {
    assert_eq!(
        to_html("** TODO Write tests"),
        "<h2><span class=\"todo-keyword TODO\">TODO</span> Write tests</h2>\n"
    );
    assert_eq!(
        to_html("* DONE Ship it"),
        "<h1><span class=\"todo-keyword DONE\">DONE</span> Ship it</h1>\n"
    );
}

#[test]
fn keyword_must_be_whole_word() {
    assert_eq!(to_html("* TODOS are fun"), "<h1>TODOS are fun</h1>\n");
    assert_eq!(to_html("* todo lowercase"), "<h1>todo lowercase</h1>\n");
}

#[test]
fn tags_are_split_off() {
    assert_eq!(
        to_html("* TODO Buy milk :home:errand:"),
        "<h1><span class=\"todo-keyword TODO\">TODO</span> Buy milk \
         <span class=\"tag\">home</span> <span class=\"tag\">errand</span></h1>\n"
    );
}

#[test]
fn colon_text_is_not_tags() {
    assert_eq!(to_html("* Ratio 1:2:"), "<h1>Ratio 1:2:</h1>\n");
    assert_eq!(to_html("* Time :: later"), "<h1>Time :: later</h1>\n");
}

#[test]
fn heading_title_inline_markup() {
    assert_eq!(
        to_html("* A /very/ =important= heading"),
        "<h1>A <i>very</i> <code>important</code> heading</h1>\n"
    );
}

#[test]
fn heading_ends_paragraph() {
    assert_eq!(
        to_html("text\n* Next"),
        "<p>text</p>\n<h1>Next</h1>\n"
    );
}
