//! Parse error types.
//!
//! All errors are recoverable: the parser reports them and keeps building
//! the tree.

use source_map::Span;
use thiserror::Error;

/// An error that occurred during parsing.
#[derive(Debug, Clone, Error)]
#[error("{kind}")]
pub struct ParseError {
    /// The kind of error.
    pub kind: ParseErrorKind,
    /// The location in the source where the error occurred.
    pub span: Span,
}

impl ParseError {
    /// Creates a new parse error.
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of parse error.
#[derive(Debug, Clone, Error)]
pub enum ParseErrorKind {
    /// An unclosed tag was found.
    #[error("unclosed tag: <{tag_name}>")]
    UnclosedTag {
        /// The name of the unclosed tag.
        tag_name: String,
    },

    /// A mismatched closing tag was found.
    #[error("mismatched closing tag: expected </{expected}>, found </{found}>")]
    MismatchedClosingTag {
        /// The expected tag name.
        expected: String,
        /// The found tag name.
        found: String,
    },

    /// A closing tag with no matching open element.
    #[error("stray closing tag: </{tag_name}>")]
    StrayClosingTag {
        /// The name of the stray closing tag.
        tag_name: String,
    },

    /// A start tag that ended without `>`.
    #[error("malformed start tag: <{tag_name}>")]
    MalformedStartTag {
        /// The name of the malformed tag.
        tag_name: String,
    },

    /// A comment without a closing `-->`.
    #[error("unterminated comment")]
    UnterminatedComment,

    /// A markup declaration without a closing `>`.
    #[error("unterminated markup declaration")]
    UnterminatedDeclaration,
}
