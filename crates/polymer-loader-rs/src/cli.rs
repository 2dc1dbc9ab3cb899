//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Transforms Polymer-style HTML component files into JavaScript modules
/// with source maps.
#[derive(Debug, Parser)]
#[command(name = "polymer-loader-rs")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Files or directories to transform (directories are walked for *.html)
    #[arg(required = true)]
    pub paths: Vec<Utf8PathBuf>,

    /// Directory to write generated modules into
    #[arg(long = "out-dir")]
    pub out_dir: Option<Utf8PathBuf>,

    /// Path to a JSON options file (ignoreLinks,
    /// ignoreLinksFromPartialMatches, ignorePathReWrite)
    #[arg(long)]
    pub config: Option<Utf8PathBuf>,

    /// Href to drop entirely (exact match; repeatable)
    #[arg(long = "ignore-links")]
    pub ignore_links: Vec<String>,

    /// Href substring to drop on partial match (repeatable)
    #[arg(long = "ignore-links-partial")]
    pub ignore_links_partial: Vec<String>,

    /// Href substring imported verbatim instead of being resolved
    /// (repeatable)
    #[arg(long = "ignore-path-rewrite")]
    pub ignore_path_rewrite: Vec<String>,

    /// Glob patterns to skip while walking directories
    #[arg(long)]
    pub ignore: Vec<String>,

    /// Do not write .js.map files or sourceMappingURL footers
    #[arg(long = "no-source-maps")]
    pub no_source_maps: bool,

    /// Output format for the run summary
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["polymer-loader-rs", "comp.html"]);
        assert_eq!(args.paths, vec![Utf8PathBuf::from("comp.html")]);
        assert!(args.out_dir.is_none());
        assert!(!args.no_source_maps);
        assert_eq!(args.output, OutputFormat::Human);
    }

    #[test]
    fn test_requires_at_least_one_path() {
        assert!(Args::try_parse_from(["polymer-loader-rs"]).is_err());
    }

    #[test]
    fn test_repeatable_ignore_flags() {
        let args = Args::parse_from([
            "polymer-loader-rs",
            "--ignore-links",
            "a.html",
            "--ignore-links",
            "b.html",
            "--ignore-links-partial",
            "shared/",
            "--ignore-path-rewrite",
            "bower_components/",
            "comp.html",
        ]);
        assert_eq!(args.ignore_links, vec!["a.html", "b.html"]);
        assert_eq!(args.ignore_links_partial, vec!["shared/"]);
        assert_eq!(args.ignore_path_rewrite, vec!["bower_components/"]);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["polymer-loader-rs", "--output", "json", "comp.html"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_no_source_maps_flag() {
        let args = Args::parse_from(["polymer-loader-rs", "--no-source-maps", "comp.html"]);
        assert!(args.no_source_maps);
    }
}
