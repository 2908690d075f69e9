//! Outline engine module
//!
//! This module loads JavaScript files from disk and runs the outline scanner
//! over them, one file at a time or across a whole directory tree.

use crate::config::{is_javascript, EntryFilter, IgnoreFilter, ScanConfig};
use crate::models::{FileOutline, OutlineEntry, OutlineMap, ScanMetadata, ScanStats};
use crate::parser::{parse, ParseError};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;
use thiserror::Error;
use walkdir::WalkDir;

/// Scanner errors
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] crate::config::ConfigError),

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("Not a JavaScript file: {}", .0.display())]
    UnsupportedFile(PathBuf),

    #[error("Thread pool error: {0}")]
    ThreadPoolError(String),
}

/// Outline source text and apply `filter` to the result
pub fn outline_source(source: &str, filter: &EntryFilter) -> Result<Vec<OutlineEntry>, ParseError> {
    parse(source).map(|entries| filter.apply(entries))
}

/// Directory scanner
pub struct OutlineScanner {
    config: ScanConfig,
    ignore_filter: IgnoreFilter,
}

impl OutlineScanner {
    /// Create a new scanner with the given configuration
    pub fn new(config: ScanConfig) -> Result<Self, ScanError> {
        let ignore_filter = IgnoreFilter::new(&config)?;
        Ok(Self {
            config,
            ignore_filter,
        })
    }

    /// Scan the configured root and return outline map.
    ///
    /// A file with a syntax error shows up with `error` set and no entries;
    /// it does not stop the scan.
    pub fn scan(&self) -> Result<OutlineMap, ScanError> {
        let start = Instant::now();

        let source_files = self.find_source_files();
        tracing::debug!(
            root = %self.config.root.display(),
            files = source_files.len(),
            "collected source files"
        );

        let files: Vec<FileOutline> = if self.config.threads == 1 {
            source_files
                .iter()
                .filter_map(|path| self.scan_path(path))
                .collect()
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| ScanError::ThreadPoolError(e.to_string()))?;

            pool.install(|| {
                source_files
                    .par_iter()
                    .filter_map(|path| self.scan_path(path))
                    .collect()
            })
        };

        let stats = ScanStats::from_files(&files);

        let duration = start.elapsed();
        let file_count = files.len();
        let metadata = ScanMetadata {
            scan_duration_ms: duration.as_millis() as u64,
            files_per_second: if duration.as_secs_f64() > 0.0 {
                file_count as f64 / duration.as_secs_f64()
            } else {
                file_count as f64
            },
            timestamp: chrono::Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        };

        Ok(OutlineMap {
            root: self.config.root.clone(),
            files,
            stats,
            metadata,
        })
    }

    /// Find all JavaScript files under the root, in path order
    fn find_source_files(&self) -> Vec<PathBuf> {
        let mut files = Vec::new();

        let walker = WalkDir::new(&self.config.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| {
                // the root itself is scanned even when its name looks hidden
                if e.depth() == 0 || !e.file_type().is_dir() {
                    return true;
                }
                !self.ignore_filter.should_ignore(e.path(), true)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(error = %err, "skipping unreadable entry");
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                continue;
            }

            let path = entry.path();
            if !is_javascript(path) {
                continue;
            }
            if entry.depth() > 0 && self.ignore_filter.should_ignore(path, false) {
                tracing::trace!(path = %path.display(), "ignored");
                continue;
            }

            if let Ok(metadata) = entry.metadata() {
                if metadata.len() as usize > self.config.max_file_size {
                    tracing::debug!(
                        path = %path.display(),
                        size = metadata.len(),
                        "skipping file over size limit"
                    );
                    continue;
                }
            }

            files.push(path.to_path_buf());
        }

        files
    }

    /// Scan one discovered file; unreadable files are left out of the map
    fn scan_path(&self, path: &Path) -> Option<FileOutline> {
        let source = match fs::read_to_string(path) {
            Ok(s) => s,
            Err(err) => {
                tracing::debug!(path = %path.display(), error = %err, "skipping unreadable file");
                return None;
            }
        };

        let relative_path = path
            .strip_prefix(&self.config.root)
            .ok()
            .filter(|p| !p.as_os_str().is_empty())
            .or_else(|| path.file_name().map(Path::new))
            .unwrap_or(path)
            .to_path_buf();

        let outline = match outline_source(&source, &self.config.entry_filter) {
            Ok(entries) => build_outline(relative_path, path, &source, entries, None),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "could not outline file");
                build_outline(relative_path, path, &source, Vec::new(), Some(err.to_string()))
            }
        };
        tracing::debug!(
            path = %outline.path.display(),
            entries = outline.total_entries(),
            "scanned file"
        );
        Some(outline)
    }
}

/// Scan a single file and return its outline
pub fn scan_file(path: &Path, config: &ScanConfig) -> Result<FileOutline, ScanError> {
    if !is_javascript(path) {
        return Err(ScanError::UnsupportedFile(path.to_path_buf()));
    }

    let source = fs::read_to_string(path)?;
    let entries = outline_source(&source, &config.entry_filter).map_err(|err| ScanError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;

    Ok(build_outline(path.to_path_buf(), path, &source, entries, None))
}

fn build_outline(
    relative_path: PathBuf,
    path: &Path,
    source: &str,
    entries: Vec<OutlineEntry>,
    error: Option<String>,
) -> FileOutline {
    FileOutline {
        path: relative_path,
        absolute_path: path.canonicalize().unwrap_or_else(|_| path.to_path_buf()),
        total_lines: source.lines().count(),
        entries,
        error,
    }
}
