//! Plain-text rendering of HTML article bodies.

use scraper::{Html, Node};
use tracing::debug;

/// Elements that start on a new line when rendered as text.
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "dd", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr", "li",
    "main", "nav", "ol", "p", "pre", "section", "table", "tr", "ul",
];

/// Elements whose text content is never rendered.
const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "head", "title", "template"];

/// Whether `text` appears to contain markup tags.
///
/// Looks for a `<` immediately followed by a tag name, closing slash or `!`,
/// with a `>` somewhere after it.
pub fn looks_like_html(text: &str) -> bool {
    text.match_indices('<').any(|(idx, _)| {
        let rest = &text[idx + 1..];
        let starts_tag = rest
            .chars()
            .next()
            .map(|c| c.is_ascii_alphabetic() || c == '/' || c == '!')
            .unwrap_or(false);
        starts_tag && rest.contains('>')
    })
}

/// Render an HTML fragment as plain text.
///
/// Block elements and `<br>` become line breaks, whitespace runs collapse to
/// a single space, and character references are decoded by the parser.
pub fn html_to_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let mut raw = String::with_capacity(html.len());

    for node in fragment.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                    Node::Element(el) => HIDDEN_ELEMENTS.contains(&el.name()),
                    _ => false,
                });
                if !hidden {
                    raw.extend(text.chars().map(|c| if c.is_whitespace() { ' ' } else { c }));
                }
            }
            Node::Element(el) => {
                let name = el.name();
                if name == "br" || BLOCK_ELEMENTS.contains(&name) {
                    raw.push('\n');
                }
            }
            _ => {}
        }
    }

    let text = normalize_lines(&raw);

    debug!(
        html_length = html.len(),
        text_length = text.len(),
        "html_rendered_as_text"
    );

    text
}

/// Collapse spaces within lines and runs of blank lines into one blank line.
fn normalize_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut blank_run = 0;

    for line in raw.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");

        if collapsed.is_empty() {
            blank_run += 1;
            continue;
        }

        if !out.is_empty() {
            out.push('\n');
            if blank_run > 0 {
                out.push('\n');
            }
        }
        out.push_str(&collapsed);
        blank_run = 0;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_looks_like_html() {
        assert!(looks_like_html("<p>hello</p>"));
        assert!(looks_like_html("line one<br/>line two"));
        assert!(looks_like_html("<!-- note -->text"));

        assert!(!looks_like_html("plain text"));
        assert!(!looks_like_html("a < b and c > d"));
        assert!(!looks_like_html("5 <3"));
    }

    #[test]
    fn test_html_to_text_paragraphs() {
        let html = "<div>Hello <b>there</b></div><div>second line</div>";
        assert_eq!(html_to_text(html), "Hello there\nsecond line");
    }

    #[test]
    fn test_html_to_text_line_breaks() {
        assert_eq!(html_to_text("one<br>two<br/>three"), "one\ntwo\nthree");
    }

    #[test]
    fn test_html_to_text_double_break_is_blank_line() {
        assert_eq!(html_to_text("a<br><br>b"), "a\n\nb");
    }

    #[test]
    fn test_html_to_text_collapses_whitespace() {
        let html = "<p>  lots   of\n   space  </p>";
        assert_eq!(html_to_text(html), "lots of space");
    }

    #[test]
    fn test_html_to_text_keeps_one_blank_line() {
        let html = "<p>first</p><br><br><br><p>second</p>";
        assert_eq!(html_to_text(html), "first\n\nsecond");
    }

    #[test]
    fn test_html_to_text_decodes_entities() {
        assert_eq!(html_to_text("<p>Tom &amp; Jerry &lt;3</p>"), "Tom & Jerry <3");
    }

    #[test]
    fn test_html_to_text_skips_scripts() {
        let html = "<p>visible</p><script>alert('x')</script><style>p{}</style>";
        assert_eq!(html_to_text(html), "visible");
    }

    #[test]
    fn test_html_to_text_malformed_markup() {
        let html = "<div><p>unclosed <b>bold</div> tail";
        assert_eq!(html_to_text(html), "unclosed bold tail");
    }
}
