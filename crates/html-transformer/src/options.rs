//! Per-run transform configuration.

use serde::Deserialize;
use std::collections::HashSet;

/// Options controlling link handling for one transformation run.
///
/// The host passes these as a loosely-typed dictionary (camelCase JSON);
/// missing fields default to empty sets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TransformOptions {
    /// Hrefs to drop entirely (exact match).
    pub ignore_links: HashSet<String>,
    /// Substrings; any href containing one is dropped.
    pub ignore_links_from_partial_matches: Vec<String>,
    /// Substrings; any href containing one is imported by its literal text
    /// instead of being resolved against the current file.
    pub ignore_path_re_write: Vec<String>,
}

impl TransformOptions {
    /// Returns true if a link with this href produces no output at all.
    pub(crate) fn should_ignore(&self, href: &str) -> bool {
        self.ignore_links.contains(href)
            || self
                .ignore_links_from_partial_matches
                .iter()
                .any(|pattern| href.contains(pattern))
    }

    /// Returns true if this href is imported verbatim rather than resolved.
    pub(crate) fn keeps_literal_path(&self, href: &str) -> bool {
        self.ignore_path_re_write
            .iter()
            .any(|pattern| href.contains(pattern))
    }
}
