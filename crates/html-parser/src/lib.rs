//! Tolerant HTML parser for polymer-loader-rs.
//!
//! This crate provides the tree layer the transformer passes are built on:
//! - Lexer (tokenizer) using `logos`
//! - Recursive descent tree builder with tag-soup recovery
//! - A mutable tree with per-node byte spans, predicate queries in document
//!   order, predicate-based node removal, and serialization back to markup
//!
//! Parsing never fails: malformed markup degrades into a best-effort tree
//! plus a list of recoverable errors. Missing attributes, unclosed tags and
//! stray closing tags are all representable states.
//!
//! # Example
//!
//! ```
//! use html_parser::parse;
//!
//! let result = parse("<dom-module id=\"x\"><script>var a = 1;</script></dom-module>");
//! assert!(result.errors.is_empty());
//! assert_eq!(result.document.nodes.len(), 1);
//! ```

mod ast;
mod error;
mod lexer;
mod parser;
mod serialize;

pub use ast::{
    Attribute, AttributeValue, Comment, Doctype, Document, Element, Node, ParentRef, Text,
    TextValue,
};
pub use error::{ParseError, ParseErrorKind};
pub use lexer::{Lexer, Token, TokenKind};
pub use source_map::Span;

/// HTML void elements, which never have closing tags.
/// See: https://developer.mozilla.org/en-US/docs/Glossary/Void_element
pub const HTML_VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Returns true if the given element name is an HTML void element.
pub fn is_void_element(name: &str) -> bool {
    HTML_VOID_ELEMENTS.contains(&name.to_lowercase().as_str())
}

/// The result of parsing an HTML document.
#[derive(Debug)]
pub struct ParseResult {
    /// The parsed tree.
    pub document: Document,
    /// Recoverable errors encountered during parsing.
    pub errors: Vec<ParseError>,
}

/// Parses HTML source into a document tree.
///
/// Parsing always produces a tree; malformed markup is recovered from and
/// reported through [`ParseResult::errors`].
pub fn parse(source: &str) -> ParseResult {
    parser::Parser::new(source).parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty() {
        let result = parse("");
        assert!(result.errors.is_empty());
        assert!(result.document.nodes.is_empty());
    }

    #[test]
    fn test_parse_simple_element() {
        let result = parse("<div>hello</div>");
        assert!(result.errors.is_empty());
        assert_eq!(result.document.nodes.len(), 1);
    }

    #[test]
    fn test_parse_with_script() {
        let result = parse("<script>let x = 1;</script>");
        assert!(result.errors.is_empty());
        let script = result.document.first_element(|el| el.name == "script").unwrap();
        assert_eq!(script.inline_text(), Some("let x = 1;"));
    }
}
