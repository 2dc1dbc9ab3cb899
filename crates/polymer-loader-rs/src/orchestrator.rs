//! File discovery and parallel transformation.

use crate::cli::Args;
use crate::config::{self, ConfigError};
use crate::output::{self, FileOutcome, RunSummary};
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use html_transformer::{process, TransformError, TransformOptions};
use rayon::prelude::*;
use thiserror::Error;
use walkdir::WalkDir;

/// Run-level errors that abort the whole invocation.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An `--ignore` pattern is not a valid glob.
    #[error("invalid ignore pattern {pattern}: {source}")]
    InvalidGlob {
        /// The offending pattern.
        pattern: String,
        /// The underlying glob error.
        source: globset::Error,
    },

    /// Directory walking failed.
    #[error("failed to walk inputs: {0}")]
    Walk(#[from] walkdir::Error),

    /// A discovered path is not valid UTF-8.
    #[error("non UTF-8 path: {0}")]
    NonUtf8Path(String),

    /// Nothing to transform.
    #[error("no input files found")]
    NoInputs,

    /// The output directory could not be created.
    #[error("failed to create output directory {path}: {source}")]
    CreateOutDir {
        /// The output directory.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Per-file errors; they fail that file's outcome without stopping the run.
#[derive(Debug, Error)]
enum FileError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error("failed to serialize source map for {path}: {source}")]
    Map {
        path: Utf8PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: Utf8PathBuf,
        source: std::io::Error,
    },
}

/// Runs one invocation: discover files, transform each in parallel, write
/// outputs, report.
pub fn run(args: &Args) -> Result<RunSummary, LoaderError> {
    let options = config::load_options(args)?;
    let ignore = build_ignore_set(&args.ignore)?;
    let files = discover_files(&args.paths, &ignore)?;

    if files.is_empty() {
        return Err(LoaderError::NoInputs);
    }

    if let Some(out_dir) = &args.out_dir {
        std::fs::create_dir_all(out_dir).map_err(|source| LoaderError::CreateOutDir {
            path: out_dir.clone(),
            source,
        })?;
    }

    // Each transformation is a pure function of its file; the files are
    // independent, so the whole batch fans out across the thread pool.
    let outcomes: Vec<FileOutcome> = files
        .par_iter()
        .map(|file| transform_file(file, args, &options))
        .collect();

    Ok(output::report(args.output, &outcomes))
}

fn build_ignore_set(patterns: &[String]) -> Result<GlobSet, LoaderError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| LoaderError::InvalidGlob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| LoaderError::InvalidGlob {
        pattern: patterns.join(", "),
        source,
    })
}

fn discover_files(paths: &[Utf8PathBuf], ignore: &GlobSet) -> Result<Vec<Utf8PathBuf>, LoaderError> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path) {
                let entry = entry?;
                if !entry.file_type().is_file() {
                    continue;
                }
                let entry_path = Utf8PathBuf::from_path_buf(entry.into_path())
                    .map_err(|p| LoaderError::NonUtf8Path(p.display().to_string()))?;
                if entry_path.extension() == Some("html") && !ignore.is_match(entry_path.as_str())
                {
                    files.push(entry_path);
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    Ok(files)
}

fn transform_file(file: &Utf8Path, args: &Args, options: &TransformOptions) -> FileOutcome {
    match try_transform_file(file, args, options) {
        Ok(generated) => FileOutcome {
            file: file.to_owned(),
            generated: Some(generated),
            error: None,
        },
        Err(error) => FileOutcome {
            file: file.to_owned(),
            generated: None,
            error: Some(error.to_string()),
        },
    }
}

fn try_transform_file(
    file: &Utf8Path,
    args: &Args,
    options: &TransformOptions,
) -> Result<Utf8PathBuf, FileError> {
    let source = std::fs::read_to_string(file).map_err(|source| FileError::Read {
        path: file.to_owned(),
        source,
    })?;

    // The transform resolves hrefs against the file's directory, so it needs
    // the file's absolute location.
    let result = process(&source, absolute_path(file).as_str(), options)?;

    let out_path = output_path(file, args.out_dir.as_deref());
    let mut code = result.code;

    if let Some(mut map) = result.source_map.filter(|_| !args.no_source_maps) {
        let out_name = out_path.file_name().unwrap_or("module.js").to_string();
        let map_name = format!("{out_name}.map");
        let map_path = out_path
            .parent()
            .map(|dir| dir.join(&map_name))
            .unwrap_or_else(|| Utf8PathBuf::from(&map_name));

        map.file = Some(out_name);
        code.push_str(&format!("\n//# sourceMappingURL={map_name}\n"));

        let json = serde_json::to_string(&map).map_err(|source| FileError::Map {
            path: map_path.clone(),
            source,
        })?;
        std::fs::write(&map_path, json).map_err(|source| FileError::Write {
            path: map_path.clone(),
            source,
        })?;
    }

    std::fs::write(&out_path, code).map_err(|source| FileError::Write {
        path: out_path.clone(),
        source,
    })?;

    Ok(out_path)
}

fn absolute_path(file: &Utf8Path) -> Utf8PathBuf {
    if file.is_absolute() {
        return file.to_owned();
    }
    std::env::current_dir()
        .ok()
        .and_then(|cwd| Utf8PathBuf::try_from(cwd).ok())
        .map(|cwd| cwd.join(file))
        .unwrap_or_else(|| file.to_owned())
}

fn output_path(file: &Utf8Path, out_dir: Option<&Utf8Path>) -> Utf8PathBuf {
    let name = format!("{}.js", file.file_name().unwrap_or("module"));
    match out_dir {
        Some(dir) => dir.join(name),
        None => file
            .parent()
            .map(|dir| dir.join(&name))
            .unwrap_or_else(|| Utf8PathBuf::from(name)),
    }
}
