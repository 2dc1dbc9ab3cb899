//! The three-pass document transformer.

use crate::dom_module::dom_module;
use crate::error::TransformError;
use crate::links::links;
use crate::options::TransformOptions;
use crate::scripts::scripts;
use html_parser::{parse, Element};
use source_map::SourceMap;

/// The unit threaded between passes: emitted text plus the number of
/// generated lines it accounts for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputFragment {
    /// The emitted module text.
    pub text: String,
    /// Generated lines this fragment contributes to the line offset.
    pub line_count: u32,
}

/// The result of transforming one document.
#[derive(Debug)]
pub struct TransformResult {
    /// The generated JavaScript module text.
    pub code: String,
    /// The source map, present iff the document had at least one inline
    /// script.
    pub source_map: Option<SourceMap>,
}

fn is_link(el: &Element) -> bool {
    el.name == "link"
}

fn is_script(el: &Element) -> bool {
    el.name == "script"
}

fn is_component(el: &Element) -> bool {
    el.name == "dom-module"
}

/// Transforms one HTML component document into a JavaScript module.
///
/// The three passes run in fixed order — links, body, scripts — each over a
/// fresh parse of the source, so the body pass's node removal cannot leak
/// into the other traversals. Line counts thread through as explicit
/// accumulator values, keeping the whole function pure: equal inputs yield
/// equal outputs, and concurrent calls share nothing.
pub fn process(
    source: &str,
    current_file_path: &str,
    options: &TransformOptions,
) -> Result<TransformResult, TransformError> {
    let link_fragment = links(&parse(source).document, options, current_file_path, is_link);
    let body_fragment = dom_module(parse(source).document, is_component, is_link, is_script);

    let mut prior_text = link_fragment.text;
    prior_text.push_str(&body_fragment.text);
    let prior_line_count = link_fragment.line_count + body_fragment.line_count;

    let output = scripts(
        &parse(source).document,
        source,
        current_file_path,
        prior_text,
        prior_line_count,
        is_script,
    )?;

    Ok(TransformResult {
        code: output.text,
        source_map: output.source_map,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_document() {
        let result = process("", "/p/f.html", &TransformOptions::default()).unwrap();
        assert_eq!(result.code, "");
        assert!(result.source_map.is_none());
    }

    #[test]
    fn test_document_without_inline_scripts_has_no_map() {
        let result = process(
            r#"<link href="a.html"><dom-module id="x"></dom-module>"#,
            "/p/f.html",
            &TransformOptions::default(),
        )
        .unwrap();
        assert!(result.source_map.is_none());
        assert!(result.code.contains("import '/p/a.html';"));
        assert!(result.code.contains("RegisterHtmlTemplate.register("));
    }

    #[test]
    fn test_pass_order_is_links_body_scripts() {
        let result = process(
            r#"<script>var a=1;</script><dom-module id="x"></dom-module><link href="a.html">"#,
            "/p/f.html",
            &TransformOptions::default(),
        )
        .unwrap();

        let import_at = result.code.find("import").unwrap();
        let register_at = result.code.find("RegisterHtmlTemplate").unwrap();
        let script_at = result.code.find("var a=1;").unwrap();
        assert!(import_at < register_at);
        assert!(register_at < script_at);
    }

    #[test]
    fn test_process_is_deterministic() {
        let source = r#"<link href="a.html"><script>var a=1;</script>"#;
        let first = process(source, "/p/f.html", &TransformOptions::default()).unwrap();
        let second = process(source, "/p/f.html", &TransformOptions::default()).unwrap();
        assert_eq!(first.code, second.code);
        assert_eq!(
            first.source_map.map(|m| m.mappings),
            second.source_map.map(|m| m.mappings)
        );
    }
}
