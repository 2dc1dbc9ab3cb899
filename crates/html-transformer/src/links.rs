//! Link extraction: `<link href>` elements become module imports.

use crate::options::TransformOptions;
use crate::transform::OutputFragment;
use camino::Utf8Path;
use html_parser::{Document, Element};

/// Emits one import per eligible link node, in document order.
///
/// Links with an empty or missing `href` cost nothing. Each emitted import
/// is framed by newlines and adds two generated lines. This pass only reads
/// the document.
pub(crate) fn links(
    document: &Document,
    options: &TransformOptions,
    current_file_path: &str,
    is_link: fn(&Element) -> bool,
) -> OutputFragment {
    let mut text = String::new();
    let mut line_count = 0;

    for link in document.query_elements(is_link) {
        let href = match link.attr("href") {
            Some(href) if !href.is_empty() => href,
            _ => continue,
        };

        let path = if options.keeps_literal_path(href) {
            href.to_string()
        } else {
            resolve_relative(current_file_path, href)
        };

        if options.should_ignore(href) {
            continue;
        }

        text.push_str("\nimport '");
        text.push_str(&path);
        text.push_str("';\n");
        line_count += 2;
    }

    OutputFragment { text, line_count }
}

/// Joins a target path onto the directory of the current file.
///
/// Purely syntactic: no normalization, no filesystem access.
pub(crate) fn resolve_relative(current_file_path: &str, target: &str) -> String {
    match Utf8Path::new(current_file_path).parent() {
        Some(dir) => dir.join(target).into_string(),
        None => target.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use html_parser::parse;
    use pretty_assertions::assert_eq;

    fn is_link(el: &Element) -> bool {
        el.name == "link"
    }

    fn run(source: &str, options: &TransformOptions) -> OutputFragment {
        links(&parse(source).document, options, "/proj/src/foo.html", is_link)
    }

    #[test]
    fn test_resolves_against_current_file() {
        let fragment = run(
            r#"<link rel="import" href="x/y.html">"#,
            &TransformOptions::default(),
        );
        assert_eq!(fragment.text, "\nimport '/proj/src/x/y.html';\n");
        assert_eq!(fragment.line_count, 2);
    }

    #[test]
    fn test_multiple_links_in_document_order() {
        let fragment = run(
            r#"<link href="a.html"><div><link href="b.html"></div>"#,
            &TransformOptions::default(),
        );
        assert_eq!(
            fragment.text,
            "\nimport '/proj/src/a.html';\n\nimport '/proj/src/b.html';\n"
        );
        assert_eq!(fragment.line_count, 4);
    }

    #[test]
    fn test_empty_href_is_skipped() {
        let fragment = run(r#"<link href=""><link>"#, &TransformOptions::default());
        assert_eq!(fragment.text, "");
        assert_eq!(fragment.line_count, 0);
    }

    #[test]
    fn test_ignore_links_exact_match() {
        let options = TransformOptions {
            ignore_links: ["x/y.html".to_string()].into_iter().collect(),
            ..Default::default()
        };
        let fragment = run(r#"<link href="x/y.html">"#, &options);
        assert_eq!(fragment.text, "");
        assert_eq!(fragment.line_count, 0);
    }

    #[test]
    fn test_ignore_links_partial_match() {
        let options = TransformOptions {
            ignore_links_from_partial_matches: vec!["y.htm".to_string()],
            ..Default::default()
        };
        let fragment = run(r#"<link href="x/y.html">"#, &options);
        assert_eq!(fragment.text, "");
    }

    #[test]
    fn test_path_rewrite_keeps_literal_href() {
        let options = TransformOptions {
            ignore_path_re_write: vec!["x/".to_string()],
            ..Default::default()
        };
        let fragment = run(r#"<link href="x/y.html">"#, &options);
        assert_eq!(fragment.text, "\nimport 'x/y.html';\n");
    }

    #[test]
    fn test_resolve_relative_plain() {
        assert_eq!(
            resolve_relative("/proj/src/foo.html", "x/y.html"),
            "/proj/src/x/y.html"
        );
    }
}
