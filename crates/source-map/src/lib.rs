//! Source position tracking and source map generation for polymer-loader-rs.
//!
//! This crate provides the position plumbing shared by the parser and the
//! transformer: byte spans, offset ↔ line/column conversion, and a builder
//! for standard source map (v3) records that map generated module text back
//! to the original HTML document.

mod builder;
mod line_index;
mod span;
mod vlq;

pub use builder::{Mapping, SourceMap, SourceMapBuilder};
pub use line_index::{LineCol, LineIndex};
pub use span::{ByteOffset, Span};
