//! Script emission: imports for local scripts, verbatim re-emission plus
//! source map entries for inline scripts.

use crate::error::TransformError;
use crate::links::resolve_relative;
use html_parser::{Document, Element};
use source_map::{LineIndex, SourceMap, SourceMapBuilder, Span};
use swc_common::{sync::Lrc, FileName, SourceMap as SwcSourceMap};
use swc_ecma_ast::EsVersion;
use swc_ecma_parser::lexer::Lexer;
use swc_ecma_parser::token::{Token, Word};
use swc_ecma_parser::{StringInput, Syntax, Tokens};

/// How a script node participates in the output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ScriptKind {
    /// `src` is an absolute URL; the script stays in the registered markup.
    External,
    /// `src` is a relative or otherwise non-absolute path; becomes an import.
    Local,
    /// No `src`; the inline text is re-emitted and tokenized.
    Inline,
}

/// Classifies a script node. The classification is a pure function of the
/// node's `src` attribute.
pub(crate) fn classify(el: &Element) -> ScriptKind {
    match el.attr("src") {
        Some(src) if !src.is_empty() => {
            if is_absolute_url(src) {
                ScriptKind::External
            } else {
                ScriptKind::Local
            }
        }
        _ => ScriptKind::Inline,
    }
}

/// Returns true if the value has both a URL scheme and the `//` authority
/// marker.
fn is_absolute_url(value: &str) -> bool {
    match value.split_once("://") {
        Some((scheme, _)) => {
            let mut chars = scheme.chars();
            match chars.next() {
                Some(first) if first.is_ascii_alphabetic() => {
                    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
                }
                _ => false,
            }
        }
        None => false,
    }
}

/// The script pass result: the full module text and the source map, present
/// iff at least one inline script was encountered.
pub(crate) struct ScriptsOutput {
    pub text: String,
    pub source_map: Option<SourceMap>,
}

/// Runs the script pass, seeded with the text and generated line count of
/// the prior passes.
pub(crate) fn scripts(
    document: &Document,
    source: &str,
    current_file_path: &str,
    prior_text: String,
    prior_line_count: u32,
    is_script: fn(&Element) -> bool,
) -> Result<ScriptsOutput, TransformError> {
    let line_index = LineIndex::new(source);
    let mut text = prior_text;
    let mut line_offset = prior_line_count;
    let mut builder: Option<SourceMapBuilder> = None;

    for script in document.query_elements(is_script) {
        match classify(script) {
            ScriptKind::External => {}
            ScriptKind::Local => {
                let src = script.attr("src").unwrap_or_default();
                text.push_str("\nimport '");
                text.push_str(&resolve_relative(current_file_path, src));
                text.push_str("';\n");
                line_offset += 2;
            }
            ScriptKind::Inline => {
                let content = script.inline_text().unwrap_or_default();
                let content_span = script
                    .inline_text_span()
                    .unwrap_or_else(|| Span::empty(script.start_tag_span.end));

                let builder =
                    builder.get_or_insert_with(|| SourceMapBuilder::new(current_file_path));

                emit_inline_mappings(
                    builder,
                    content,
                    content_span,
                    &line_index,
                    line_offset,
                    current_file_path,
                )?;

                text.push('\n');
                text.push_str(content);
                text.push('\n');

                line_offset += 2 + tag_line_span(script, &line_index);
            }
        }
    }

    let source_map = builder.map(|mut builder| {
        builder.set_source_content(source);
        builder.build()
    });

    Ok(ScriptsOutput { text, source_map })
}

/// Tokenizes one inline script and records a mapping per token.
///
/// Original positions shift by the content's start line in the document;
/// tokens on the content's first line additionally shift by its start
/// column, since only that line shares the `<script>` tag's line. Generated
/// positions shift by the running line offset only.
fn emit_inline_mappings(
    builder: &mut SourceMapBuilder,
    content: &str,
    content_span: Span,
    line_index: &LineIndex,
    line_offset: u32,
    current_file_path: &str,
) -> Result<(), TransformError> {
    let content_start = line_index.line_col(content_span.start).unwrap_or_default();
    let content_start_line = content_start.line + 1;
    let content_start_col = content_start.col;

    let tokens = tokenize_module(content).map_err(|message| TransformError::ScriptSyntax {
        path: current_file_path.to_string(),
        message,
    })?;

    let content_index = LineIndex::new(content);
    for token in tokens {
        let position = match content_index.line_col(token.offset.into()) {
            Some(position) => position,
            None => continue,
        };
        let token_line = position.line + 1;
        let token_col = position.col;

        let original_line = token_line + content_start_line - 1;
        let original_col = token_col + if token_line == 1 { content_start_col } else { 0 };
        let generated_line = token_line + line_offset;

        let name = token
            .identifier
            .then(|| &content[token.offset as usize..(token.offset + token.len) as usize]);

        builder.add_mapping(generated_line, token_col, original_line, original_col, name);
    }

    Ok(())
}

/// Number of physical lines spanned by the script's tags in the original
/// document (end tag line minus start tag line).
fn tag_line_span(script: &Element, line_index: &LineIndex) -> u32 {
    let start_line = line_index
        .line_col(script.start_tag_span.start)
        .map(|p| p.line)
        .unwrap_or(0);
    let end_line = script
        .end_tag_span
        .and_then(|span| line_index.line_col(span.start))
        .map(|p| p.line)
        .unwrap_or(start_line);
    end_line.saturating_sub(start_line)
}

/// A token of an inline script, reduced to what mapping emission needs.
struct ScriptToken {
    /// Byte offset into the script text.
    offset: u32,
    /// Byte length of the token.
    len: u32,
    /// Whether the token is an identifier (contributes a mapping name).
    identifier: bool,
}

/// Tokenizes module-level ECMAScript text, failing on the first lexer error.
fn tokenize_module(content: &str) -> Result<Vec<ScriptToken>, String> {
    let cm: Lrc<SwcSourceMap> = Default::default();
    let fm = cm.new_source_file(FileName::Anon, content.to_string());

    let mut lexer = Lexer::new(
        Syntax::Es(Default::default()),
        EsVersion::latest(),
        StringInput::from(&*fm),
        None,
    );

    let mut tokens = Vec::new();
    for token_and_span in &mut lexer {
        if let Token::Error(error) = &token_and_span.token {
            return Err(error.kind().msg().to_string());
        }

        let identifier = matches!(&token_and_span.token, Token::Word(Word::Ident(_)));
        let offset = token_and_span.span.lo.0.saturating_sub(fm.start_pos.0);
        let end = token_and_span.span.hi.0.saturating_sub(fm.start_pos.0);

        tokens.push(ScriptToken {
            offset,
            len: end.saturating_sub(offset),
            identifier,
        });
    }

    if let Some(error) = lexer.take_errors().into_iter().next() {
        return Err(error.kind().msg().to_string());
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use html_parser::parse;
    use pretty_assertions::assert_eq;

    fn is_script(el: &Element) -> bool {
        el.name == "script"
    }

    fn run(source: &str) -> ScriptsOutput {
        scripts(
            &parse(source).document,
            source,
            "/p/f.html",
            String::new(),
            0,
            is_script,
        )
        .unwrap()
    }

    #[test]
    fn test_classification_is_stable() {
        let doc = parse(
            r#"<script src="https://cdn.example.com/a.js"></script><script src="a.js"></script><script>x</script>"#,
        )
        .document;
        let scripts = doc.query_elements(is_script);
        let kinds: Vec<ScriptKind> = scripts.iter().map(|s| classify(s)).collect();
        assert_eq!(
            kinds,
            vec![ScriptKind::External, ScriptKind::Local, ScriptKind::Inline]
        );
        // Re-classification yields the same categories.
        let again: Vec<ScriptKind> = scripts.iter().map(|s| classify(s)).collect();
        assert_eq!(kinds, again);
    }

    #[test]
    fn test_is_absolute_url() {
        assert!(is_absolute_url("https://cdn.example.com/a.js"));
        assert!(is_absolute_url("custom+scheme://x"));
        assert!(!is_absolute_url("a.js"));
        assert!(!is_absolute_url("../a.js"));
        assert!(!is_absolute_url("//cdn.example.com/a.js"));
        assert!(!is_absolute_url("mailto:x@example.com"));
        assert!(!is_absolute_url("1bad://x"));
    }

    #[test]
    fn test_external_script_produces_no_output() {
        let output = run(r#"<script src="https://cdn.example.com/a.js"></script>"#);
        assert_eq!(output.text, "");
        assert!(output.source_map.is_none());
    }

    #[test]
    fn test_local_script_becomes_import() {
        let output = run(r#"<script src="util.js"></script>"#);
        assert_eq!(output.text, "\nimport '/p/util.js';\n");
        assert!(output.source_map.is_none());
    }

    #[test]
    fn test_inline_script_is_reemitted_verbatim() {
        let output = run("<script>var a=1;</script>");
        assert_eq!(output.text, "\nvar a=1;\n");
        let map = output.source_map.expect("inline script builds a map");
        // var, a, =, 1, ;
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_identifier_mapping_carries_name() {
        let output = run("<script>var a=1;</script>");
        let map = output.source_map.unwrap();
        // `a` sits at generated (1, 4); content starts at column 8 of line 1.
        let mapping = map.original_position(1, 4).unwrap();
        assert_eq!(mapping.original_line, 1);
        assert_eq!(mapping.original_column, 12);
        assert_eq!(map.name(mapping), Some("a"));
    }

    #[test]
    fn test_first_line_column_shift_only_applies_to_first_line() {
        let source = "<script>var a = 1;\nvar bb = 2;</script>";
        let output = run(source);
        let map = output.source_map.unwrap();

        // `var` on content line 1 shifts by the content start column (8).
        let first = map.original_position(1, 0).unwrap();
        assert_eq!(first.original_line, 1);
        assert_eq!(first.original_column, 8);

        // `var` on content line 2 keeps its raw column.
        let second = map.original_position(2, 0).unwrap();
        assert_eq!(second.original_line, 2);
        assert_eq!(second.original_column, 0);
    }

    #[test]
    fn test_prior_line_count_offsets_generated_lines() {
        let output = scripts(
            &parse("<script>var a=1;</script>").document,
            "<script>var a=1;</script>",
            "/p/f.html",
            "\nimport '/p/a.html';\n".to_string(),
            2,
            is_script,
        )
        .unwrap();
        let map = output.source_map.unwrap();
        let mapping = map.original_position(3, 0).unwrap();
        assert_eq!(mapping.original_line, 1);
    }

    #[test]
    fn test_source_content_is_embedded() {
        let source = "<script>var a=1;</script>";
        let output = run(source);
        let map = output.source_map.unwrap();
        assert_eq!(map.sources, vec!["/p/f.html".to_string()]);
        assert_eq!(map.sources_content, vec![Some(source.to_string())]);
    }

    #[test]
    fn test_syntax_error_is_fatal() {
        let result = scripts(
            &parse("<script>var s = 'unterminated;</script>").document,
            "<script>var s = 'unterminated;</script>",
            "/p/f.html",
            String::new(),
            0,
            is_script,
        );
        assert!(matches!(
            result,
            Err(TransformError::ScriptSyntax { .. })
        ));
    }

    #[test]
    fn test_multiline_tag_span_advances_offset() {
        // Two inline scripts; the second one's generated lines account for
        // the first one's original tag span.
        let source = "<script>\nvar a = 1;\n</script>\n<script>var b = 2;</script>";
        let output = run(source);
        let map = output.source_map.unwrap();

        // First script: content line 2 holds `var a = 1;` at generated line 2.
        let first = map.original_position(2, 4).unwrap();
        assert_eq!(first.original_line, 2);
        assert_eq!(map.name(first), Some("a"));

        // Offset after first script: 2 + (2 - 0) = 4. Second script's tokens
        // are on its content line 1, so generated line 5.
        let second = map.original_position(5, 4).unwrap();
        assert_eq!(second.original_line, 4);
        assert_eq!(map.name(second), Some("b"));
    }
}
