//! Incremental builder for standard source map (v3) records.

use crate::vlq;
use std::collections::HashMap;

/// A single token-level mapping from a generated position to an original one.
///
/// Lines are 1-indexed, columns 0-indexed, matching how positions flow out of
/// tokenizers and into source map consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// 1-indexed line in the generated output.
    pub generated_line: u32,
    /// 0-indexed column in the generated output.
    pub generated_column: u32,
    /// 1-indexed line in the original source.
    pub original_line: u32,
    /// 0-indexed column in the original source.
    pub original_column: u32,
    /// Index into the map's `names` table, if this mapping carries a symbol.
    pub name: Option<u32>,
}

/// A finished source map record.
///
/// Serializes (with the `serde` feature) to the standard v3 JSON shape:
/// `version`, `file`, `sources`, `sourcesContent`, `names`, `mappings`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SourceMap {
    /// Always 3.
    pub version: u32,
    /// The generated file this map describes, if known.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub file: Option<String>,
    /// Original source paths.
    pub sources: Vec<String>,
    /// Embedded original source text, parallel to `sources`.
    #[cfg_attr(feature = "serde", serde(rename = "sourcesContent"))]
    pub sources_content: Vec<Option<String>>,
    /// Symbol names referenced by mappings.
    pub names: Vec<String>,
    /// Base64 VLQ encoded mappings.
    pub mappings: String,
    /// The structured mappings the VLQ string was encoded from, kept for
    /// position lookups. Not part of the serialized record.
    #[cfg_attr(feature = "serde", serde(skip))]
    tokens: Vec<Mapping>,
}

impl SourceMap {
    /// Returns an iterator over all token mappings, ordered by generated
    /// position.
    pub fn mappings(&self) -> impl Iterator<Item = &Mapping> {
        self.tokens.iter()
    }

    /// Returns the number of token mappings.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if this map has no mappings.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finds the mapping covering a generated position: the last mapping on
    /// the given generated line whose column is at or before `column`.
    pub fn original_position(&self, line: u32, column: u32) -> Option<&Mapping> {
        self.tokens
            .iter()
            .filter(|m| m.generated_line == line && m.generated_column <= column)
            .next_back()
    }

    /// Resolves a mapping's name index against the `names` table.
    pub fn name(&self, mapping: &Mapping) -> Option<&str> {
        mapping.name.map(|id| self.names[id as usize].as_str())
    }
}

/// A builder for constructing a source map while generating output.
///
/// The builder tracks a single original source (the file being transformed);
/// mappings are added incrementally and encoded on `build`.
#[derive(Debug)]
pub struct SourceMapBuilder {
    source: String,
    source_content: Option<String>,
    file: Option<String>,
    names: Vec<String>,
    name_ids: HashMap<String, u32>,
    tokens: Vec<Mapping>,
}

impl SourceMapBuilder {
    /// Creates a builder mapping back to the given original source path.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            source_content: None,
            file: None,
            names: Vec::new(),
            name_ids: HashMap::new(),
            tokens: Vec::new(),
        }
    }

    /// Sets the generated file name recorded in the map.
    pub fn set_file(&mut self, file: impl Into<String>) {
        self.file = Some(file.into());
    }

    /// Embeds the original source text into the map.
    pub fn set_source_content(&mut self, content: impl Into<String>) {
        self.source_content = Some(content.into());
    }

    /// Adds a mapping from a generated position to an original position,
    /// optionally carrying a symbol name (lines 1-indexed, columns 0-indexed).
    pub fn add_mapping(
        &mut self,
        generated_line: u32,
        generated_column: u32,
        original_line: u32,
        original_column: u32,
        name: Option<&str>,
    ) {
        let name = name.map(|n| self.name_id(n));
        self.tokens.push(Mapping {
            generated_line,
            generated_column,
            original_line,
            original_column,
            name,
        });
    }

    /// Returns the number of mappings added so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Returns true if no mappings have been added.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Finalizes the map, sorting mappings by generated position and encoding
    /// the VLQ `mappings` string.
    pub fn build(mut self) -> SourceMap {
        self.tokens
            .sort_by_key(|m| (m.generated_line, m.generated_column));

        let mappings = encode_mappings(&self.tokens);

        SourceMap {
            version: 3,
            file: self.file,
            sources: vec![self.source],
            sources_content: vec![self.source_content],
            names: self.names,
            mappings,
            tokens: self.tokens,
        }
    }

    fn name_id(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.name_ids.get(name) {
            return id;
        }
        let id = self.names.len() as u32;
        self.names.push(name.to_string());
        self.name_ids.insert(name.to_string(), id);
        id
    }
}

fn encode_mappings(tokens: &[Mapping]) -> String {
    let mut out = String::new();

    let mut line = 1u32;
    let mut prev_generated_column = 0i64;
    let mut prev_original_line = 0i64;
    let mut prev_original_column = 0i64;
    let mut prev_name = 0i64;
    let mut prev_source = 0i64;
    let mut first_on_line = true;

    for token in tokens {
        while line < token.generated_line {
            out.push(';');
            line += 1;
            prev_generated_column = 0;
            first_on_line = true;
        }
        if !first_on_line {
            out.push(',');
        }
        first_on_line = false;

        vlq::encode(token.generated_column as i64 - prev_generated_column, &mut out);
        prev_generated_column = token.generated_column as i64;

        // Source index; a single original source, so the delta is 0 after the
        // first segment.
        vlq::encode(0 - prev_source, &mut out);
        prev_source = 0;

        vlq::encode(
            (token.original_line as i64 - 1) - prev_original_line,
            &mut out,
        );
        prev_original_line = token.original_line as i64 - 1;

        vlq::encode(token.original_column as i64 - prev_original_column, &mut out);
        prev_original_column = token.original_column as i64;

        if let Some(name) = token.name {
            vlq::encode(name as i64 - prev_name, &mut out);
            prev_name = name as i64;
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_map() {
        let map = SourceMapBuilder::new("a.html").build();
        assert!(map.is_empty());
        assert_eq!(map.version, 3);
        assert_eq!(map.sources, vec!["a.html".to_string()]);
        assert_eq!(map.mappings, "");
    }

    #[test]
    fn test_single_mapping() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(1, 0, 1, 0, None);
        let map = builder.build();
        assert_eq!(map.mappings, "AAAA");
    }

    #[test]
    fn test_mapping_with_name() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(1, 0, 1, 0, Some("x"));
        let map = builder.build();
        assert_eq!(map.mappings, "AAAAA");
        assert_eq!(map.names, vec!["x".to_string()]);
    }

    #[test]
    fn test_segments_on_one_line() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(1, 0, 1, 0, None);
        builder.add_mapping(1, 4, 1, 4, None);
        let map = builder.build();
        assert_eq!(map.mappings, "AAAA,IAAI");
    }

    #[test]
    fn test_line_separators() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(1, 0, 1, 0, None);
        builder.add_mapping(2, 0, 2, 0, None);
        let map = builder.build();
        assert_eq!(map.mappings, "AAAA;AACA");
    }

    #[test]
    fn test_skipped_generated_lines() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(3, 0, 1, 0, None);
        let map = builder.build();
        assert_eq!(map.mappings, ";;AAAA");
    }

    #[test]
    fn test_names_are_interned() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(1, 0, 1, 0, Some("a"));
        builder.add_mapping(1, 4, 1, 4, Some("b"));
        builder.add_mapping(1, 8, 1, 8, Some("a"));
        let map = builder.build();
        assert_eq!(map.names, vec!["a".to_string(), "b".to_string()]);
        // Name deltas: 0, +1, -1
        assert_eq!(map.mappings, "AAAAA,IAAIC,IAAID");
    }

    #[test]
    fn test_original_position_lookup() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(6, 0, 1, 8, Some("a"));
        builder.add_mapping(6, 4, 1, 12, None);
        let map = builder.build();

        let m = map.original_position(6, 2).unwrap();
        assert_eq!(m.original_line, 1);
        assert_eq!(m.original_column, 8);
        assert_eq!(map.name(m), Some("a"));

        let m = map.original_position(6, 4).unwrap();
        assert_eq!(m.original_column, 12);

        assert!(map.original_position(5, 0).is_none());
    }

    #[test]
    fn test_mappings_sorted_on_build() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.add_mapping(2, 0, 2, 0, None);
        builder.add_mapping(1, 0, 1, 0, None);
        let map = builder.build();
        let lines: Vec<u32> = map.mappings().map(|m| m.generated_line).collect();
        assert_eq!(lines, vec![1, 2]);
    }

    #[test]
    fn test_source_content_embedding() {
        let mut builder = SourceMapBuilder::new("a.html");
        builder.set_source_content("<div></div>");
        let map = builder.build();
        assert_eq!(
            map.sources_content,
            vec![Some("<div></div>".to_string())]
        );
    }
}
