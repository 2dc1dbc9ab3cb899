//! Markup minification for registered template strings.
//!
//! `minify` is a pure function of the markup and a policy record. The
//! policy is deliberately conservative: whitespace runs in text collapse to
//! a single space (never across element content verbatim regions such as
//! scripts), comments are stripped, and embedded `<style>` text is
//! compacted. The final result is trimmed, so a whitespace-only document
//! minifies to the empty string.

use html_parser::{parse, Node};

/// Controls which minification steps are applied.
#[derive(Debug, Clone, Copy)]
pub struct MinifyPolicy {
    /// Collapse whitespace runs in text nodes to a single space.
    pub collapse_whitespace: bool,
    /// Drop `<!-- -->` comments.
    pub remove_comments: bool,
    /// Compact the text content of `<style>` elements.
    pub minify_css: bool,
}

impl Default for MinifyPolicy {
    fn default() -> Self {
        Self {
            collapse_whitespace: true,
            remove_comments: true,
            minify_css: true,
        }
    }
}

/// Minifies serialized markup according to the policy.
pub fn minify(html: &str, policy: &MinifyPolicy) -> String {
    let mut document = parse(html).document;
    clean_nodes(&mut document.nodes, policy);
    document.serialize().trim().to_string()
}

fn clean_nodes(nodes: &mut Vec<Node>, policy: &MinifyPolicy) {
    if policy.remove_comments {
        nodes.retain(|node| !matches!(node, Node::Comment(_)));
    }

    for node in nodes.iter_mut() {
        match node {
            Node::Text(text) if policy.collapse_whitespace => {
                text.content = collapse_whitespace(&text.content);
            }
            Node::Element(el) => match el.name.as_str() {
                "style" if policy.minify_css => {
                    for child in el.children.iter_mut() {
                        if let Node::Text(text) = child {
                            text.content = minify_css(&text.content);
                        }
                    }
                }
                // Script content is verbatim source text.
                "script" => {}
                _ => clean_nodes(&mut el.children, policy),
            },
            _ => {}
        }
    }
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending = false;
    for c in text.chars() {
        if c.is_whitespace() {
            pending = true;
        } else {
            if pending && !out.is_empty() {
                out.push(' ');
            }
            pending = false;
            out.push(c);
        }
    }
    if pending && !out.is_empty() {
        out.push(' ');
    } else if out.is_empty() && !text.is_empty() {
        // A pure-whitespace run collapses to one space; the document-level
        // trim removes it at the edges.
        out.push(' ');
    }
    out
}

fn minify_css(css: &str) -> String {
    let mut out = String::with_capacity(css.len());
    let mut chars = css.chars().peekable();
    let mut in_string: Option<char> = None;
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        if let Some(quote) = in_string {
            out.push(c);
            if c == quote {
                in_string = None;
            }
            continue;
        }

        if c == '/' && chars.peek() == Some(&'*') {
            chars.next();
            let mut prev = ' ';
            for c in chars.by_ref() {
                if prev == '*' && c == '/' {
                    break;
                }
                prev = c;
            }
            continue;
        }

        if c.is_whitespace() {
            pending_space = true;
            continue;
        }

        let boundary = matches!(c, '{' | '}' | ';' | ':' | ',' | '>');
        let after_boundary = matches!(
            out.chars().last(),
            Some('{' | '}' | ';' | ':' | ',' | '>')
        );
        if pending_space && !out.is_empty() && !boundary && !after_boundary {
            out.push(' ');
        }
        pending_space = false;

        out.push(c);
        if matches!(c, '"' | '\'') {
            in_string = Some(c);
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(html: &str) -> String {
        minify(html, &MinifyPolicy::default())
    }

    #[test]
    fn test_whitespace_only_document_minifies_to_empty() {
        assert_eq!(run("   \n\t  "), "");
        assert_eq!(run(""), "");
    }

    #[test]
    fn test_comment_only_document_minifies_to_empty() {
        assert_eq!(run("<!-- nothing here -->"), "");
    }

    #[test]
    fn test_collapses_text_whitespace() {
        assert_eq!(run("<p>hello   \n   world</p>"), "<p>hello world</p>");
    }

    #[test]
    fn test_preserves_single_inner_space() {
        assert_eq!(run("<p><b>a</b> <i>b</i></p>"), "<p><b>a</b> <i>b</i></p>");
    }

    #[test]
    fn test_strips_comments_inside_elements() {
        assert_eq!(run("<div><!-- note --><p>x</p></div>"), "<div><p>x</p></div>");
    }

    #[test]
    fn test_minifies_style_text() {
        assert_eq!(
            run("<style>\np {\n  color: red;\n}\n</style>"),
            "<style>p{color:red;}</style>"
        );
    }

    #[test]
    fn test_style_comment_is_stripped() {
        assert_eq!(
            run("<style>/* theme */ p { color: red; }</style>"),
            "<style>p{color:red;}</style>"
        );
    }

    #[test]
    fn test_script_text_is_untouched() {
        assert_eq!(
            run("<script>var  a   = 1;</script>"),
            "<script>var  a   = 1;</script>"
        );
    }

    #[test]
    fn test_css_string_content_preserved() {
        assert_eq!(
            run("<style>p{background:url('a  b.png');}</style>"),
            "<style>p{background:url('a  b.png');}</style>"
        );
    }
}
