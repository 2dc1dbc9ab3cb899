//! HTML component to JavaScript module transformation.
//!
//! This crate turns one Polymer-style HTML component document into an
//! executable JavaScript module plus a line/column accurate source map for
//! its inline script fragments. It runs three passes over fresh parses of
//! the document:
//! - link extraction: `<link href>` becomes module imports
//! - body extraction: the `<dom-module>` markup (scripts and links stripped)
//!   is minified and emitted as a single registration statement
//! - script emission: external scripts stay in the markup, local scripts
//!   become imports, inline scripts are re-emitted verbatim with token-level
//!   source map entries
//!
//! # Example
//!
//! ```
//! use html_transformer::{process, TransformOptions};
//!
//! let source = "<link rel=\"import\" href=\"a.html\"><script>var a = 1;</script>";
//! let result = process(source, "/app/component.html", &TransformOptions::default()).unwrap();
//! assert!(result.code.contains("import '/app/a.html';"));
//! assert!(result.source_map.is_some());
//! ```

mod dom_module;
mod error;
mod links;
mod minify;
mod options;
mod scripts;
mod transform;

pub use error::TransformError;
pub use minify::{minify, MinifyPolicy};
pub use options::TransformOptions;
pub use transform::{process, OutputFragment, TransformResult};
