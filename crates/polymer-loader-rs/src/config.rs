//! Loader option resolution: JSON config file merged with CLI flags.

use crate::cli::Args;
use camino::{Utf8Path, Utf8PathBuf};
use html_transformer::TransformOptions;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// The config file path.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The config file is not valid options JSON.
    #[error("invalid config file {path}: {source}")]
    Parse {
        /// The config file path.
        path: Utf8PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

/// Resolves the transform options for this run.
///
/// The JSON config file (if any) is read first; repeatable CLI flags are
/// merged on top of it.
pub fn load_options(args: &Args) -> Result<TransformOptions, ConfigError> {
    let mut options = match &args.config {
        Some(path) => read_config(path)?,
        None => TransformOptions::default(),
    };

    options.ignore_links.extend(args.ignore_links.iter().cloned());
    options
        .ignore_links_from_partial_matches
        .extend(args.ignore_links_partial.iter().cloned());
    options
        .ignore_path_re_write
        .extend(args.ignore_path_rewrite.iter().cloned());

    Ok(options)
}

fn read_config(path: &Utf8Path) -> Result<TransformOptions, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_owned(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
        path: path.to_owned(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;

    #[test]
    fn test_flags_without_config_file() {
        let args = Args::parse_from([
            "polymer-loader-rs",
            "--ignore-links",
            "a.html",
            "comp.html",
        ]);
        let options = load_options(&args).unwrap();
        assert!(options.ignore_links.contains("a.html"));
    }

    #[test]
    fn test_config_file_and_flags_merge() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"ignoreLinks": ["from-config.html"], "ignorePathReWrite": ["bower_components/"]}}"#
        )
        .unwrap();

        let args = Args::parse_from([
            "polymer-loader-rs",
            "--config",
            file.path().to_str().unwrap(),
            "--ignore-links",
            "from-flag.html",
            "comp.html",
        ]);
        let options = load_options(&args).unwrap();
        assert!(options.ignore_links.contains("from-config.html"));
        assert!(options.ignore_links.contains("from-flag.html"));
        assert_eq!(options.ignore_path_re_write, vec!["bower_components/"]);
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let args = Args::parse_from([
            "polymer-loader-rs",
            "--config",
            file.path().to_str().unwrap(),
            "comp.html",
        ]);
        assert!(matches!(
            load_options(&args),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_missing_config_is_an_error() {
        let args = Args::parse_from([
            "polymer-loader-rs",
            "--config",
            "/does/not/exist.json",
            "comp.html",
        ]);
        assert!(matches!(load_options(&args), Err(ConfigError::Read { .. })));
    }
}
