//! Tag normalization: rewrite every occurrence of one element into `<Element />`.
//!
//! Enumerates files matching the configured glob, runs the stage pipeline
//! over each file's full content, and writes the result back only when it
//! differs from what was read. The first read or write error stops the run.

mod stages;
pub mod tags;

pub use stages::{
    canonical, MultilineStage, Normalized, PairStage, Pipeline, SelfClosingStage, Stage,
    StageOutput,
};

use crate::config::RewriteConfig;
use crate::error::{Error, Result};
use crate::local_files::FileSystem;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// What happened to one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileOutcome {
    #[serde(skip)]
    pub path: PathBuf,
    /// File path relative to root.
    pub file: String,
    pub changed: bool,
    /// Occurrences rewritten (already-canonical ones excluded).
    pub replacements: usize,
}

/// The full result of a run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RewriteSummary {
    pub element: String,
    pub root: String,
    pub pattern: String,
    pub dry_run: bool,
    pub files_scanned: usize,
    pub files_changed: usize,
    pub replacements: usize,
    /// Changed files, relative to root, in processing order.
    pub changed: Vec<String>,
}

/// Normalize a single string.
pub fn normalize(content: &str, element: &str) -> String {
    Pipeline::for_element(element).apply(content).content
}

/// All regular files matching `config.pattern` under the configured root.
pub fn collect_files(config: &RewriteConfig) -> Result<Vec<PathBuf>> {
    let root = config.root_dir();
    if !root.is_dir() {
        return Err(Error::validation_invalid_argument(
            "root",
            format!("Directory not found: {}", root.display()),
            Some(config.root.clone()),
        ));
    }

    let pattern = if Path::new(&config.pattern).is_absolute() {
        config.pattern.clone()
    } else {
        format!(
            "{}/{}",
            glob::Pattern::escape(&root.to_string_lossy()),
            config.pattern
        )
    };

    let entries = glob::glob(&pattern).map_err(|e| {
        Error::validation_invalid_argument(
            "pattern",
            format!("Invalid glob pattern '{}': {}", config.pattern, e),
            Some(config.pattern.clone()),
        )
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| {
            Error::internal_io(e.error().to_string(), Some(format!("scan {}", e.path().display())))
        })?;

        if path.is_file() {
            files.push(path);
        } else {
            log_status!("rewrite", "Skipping non-file match {}", path.display());
        }
    }

    Ok(files)
}

/// Read, normalize and (unless `dry_run`) write back one file.
pub fn rewrite_file(
    fs: &dyn FileSystem,
    pipeline: &Pipeline,
    path: &Path,
    root: &Path,
    dry_run: bool,
) -> Result<FileOutcome> {
    let original = fs.read(path)?;
    let normalized = pipeline.apply(&original);
    let changed = normalized.content != original;

    if changed && !dry_run {
        fs.write(path, &normalized.content)?;
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        file: relative_display(path, root),
        changed,
        replacements: normalized.replacements,
    })
}

/// Run the rewrite over every matching file.
///
/// `on_changed` is called as soon as each changed file has been handled,
/// before the next file is read.
pub fn run(
    config: &RewriteConfig,
    fs: &dyn FileSystem,
    mut on_changed: impl FnMut(&FileOutcome),
) -> Result<RewriteSummary> {
    let pipeline = Pipeline::for_element(&config.element);
    let root = config.root_dir();
    let files = collect_files(config)?;

    log_status!(
        "rewrite",
        "Scanning {} file(s) matching {} for <{}>",
        files.len(),
        config.pattern,
        pipeline.element()
    );
    if config.dry_run {
        log_status!("rewrite", "Dry run: no files will be written");
    }

    let mut summary = RewriteSummary {
        element: config.element.clone(),
        root: config.root.clone(),
        pattern: config.pattern.clone(),
        dry_run: config.dry_run,
        files_scanned: files.len(),
        files_changed: 0,
        replacements: 0,
        changed: Vec::new(),
    };

    for path in &files {
        let outcome = rewrite_file(fs, &pipeline, path, &root, config.dry_run)?;
        if outcome.changed {
            on_changed(&outcome);
            summary.files_changed += 1;
            summary.replacements += outcome.replacements;
            summary.changed.push(outcome.file);
        }
    }

    Ok(summary)
}

fn relative_display(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string()
}
