//! Transformation error types.

use thiserror::Error;

/// A fatal error during a single-file transformation.
///
/// Malformed markup and unresolvable paths are not errors (the parser
/// recovers, path joining is purely syntactic); the only fatal condition is
/// inline script text the ECMAScript tokenizer rejects.
#[derive(Debug, Error)]
pub enum TransformError {
    /// An inline script failed to tokenize.
    #[error("syntax error in inline script of {path}: {message}")]
    ScriptSyntax {
        /// The file being transformed.
        path: String,
        /// The tokenizer's diagnostic message.
        message: String,
    },
}
