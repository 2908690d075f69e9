//! Configuration module for the outline scanner
//!
//! This module provides the scan configuration, the entry filter applied to
//! each file's outline, and the ignore logic that decides which files under
//! the root get scanned at all.

use crate::models::OutlineEntry;
use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::gitignore::{Gitignore, GitignoreBuilder};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File extensions scanned as JavaScript
pub const JS_EXTENSIONS: &[&str] = &["js", "mjs", "cjs", "jsx"];

/// Patterns that are never scanned
const DEFAULT_IGNORES: &[&str] = &[
    "**/node_modules/**",
    "**/.git/**",
    "**/bower_components/**",
    "**/jspm_packages/**",
    "**/dist/**",
    "**/build/**",
    "**/out/**",
    "**/coverage/**",
    "**/.next/**",
    "**/.nuxt/**",
    "**/.cache/**",
    "**/vendor/**",
    "**/*.min.js",
    "**/*.bundle.js",
    "**/*.chunk.js",
];

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid glob pattern: {0}")]
    InvalidGlob(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Filter applied to every file's entries after scanning
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EntryFilter {
    /// Drop entries nested deeper than this level
    pub max_level: Option<usize>,

    /// Drop private entries
    pub public_only: bool,
}

impl EntryFilter {
    /// Create a filter with max level
    pub fn with_max_level(level: usize) -> Self {
        Self {
            max_level: Some(level),
            ..Default::default()
        }
    }

    /// Create a filter that hides private entries
    pub fn public_only() -> Self {
        Self {
            public_only: true,
            ..Default::default()
        }
    }

    /// Check if the filter keeps everything
    pub fn is_noop(&self) -> bool {
        self.max_level.is_none() && !self.public_only
    }

    /// Check if an entry passes the filter
    pub fn accepts(&self, entry: &OutlineEntry) -> bool {
        if self.max_level.is_some_and(|max| entry.level > max) {
            return false;
        }
        !(self.public_only && entry.entry_type.is_private())
    }

    /// Keep the entries that pass, in order
    pub fn apply(&self, entries: Vec<OutlineEntry>) -> Vec<OutlineEntry> {
        if self.is_noop() {
            return entries;
        }
        entries.into_iter().filter(|e| self.accepts(e)).collect()
    }
}

/// Configuration for the outline scanner
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Root directory (or single file) to scan
    pub root: PathBuf,

    /// Custom ignore patterns
    pub ignore_patterns: Vec<String>,

    /// Path to custom ignore file
    pub ignore_file: Option<PathBuf>,

    /// Number of threads for parallel processing
    pub threads: usize,

    /// Maximum file size to process (bytes)
    pub max_file_size: usize,

    /// Entry filter configuration
    #[serde(rename = "filter")]
    pub entry_filter: EntryFilter,

    /// Whether to follow symlinks
    pub follow_symlinks: bool,

    /// Whether to include hidden files
    pub include_hidden: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            ignore_patterns: Vec::new(),
            ignore_file: None,
            threads: num_cpus(),
            max_file_size: 10 * 1024 * 1024, // 10 MB
            entry_filter: EntryFilter::default(),
            follow_symlinks: false,
            include_hidden: false,
        }
    }
}

impl ScanConfig {
    /// Create new config with root directory
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            ..Default::default()
        }
    }

    /// Load config from a TOML file such as `jsoutline.toml`.
    ///
    /// Keys left out keep their defaults; a relative `root` is resolved
    /// against the file's directory.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        if config.root.is_relative() {
            if let Some(dir) = path.parent() {
                config.root = dir.join(&config.root);
            }
        }
        Ok(config)
    }

    /// Parse config from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        if config.threads == 0 {
            return Err(ConfigError::InvalidConfig(
                "threads must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// Set root (builder pattern)
    pub fn with_root(mut self, root: PathBuf) -> Self {
        self.root = root;
        self
    }

    /// Set ignore patterns (builder pattern)
    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Set ignore file path (builder pattern)
    pub fn with_ignore_file(mut self, path: PathBuf) -> Self {
        self.ignore_file = Some(path);
        self
    }

    /// Set number of threads (builder pattern)
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set max file size (builder pattern)
    pub fn with_max_file_size(mut self, size: usize) -> Self {
        self.max_file_size = size;
        self
    }

    /// Set entry filter (builder pattern)
    pub fn with_entry_filter(mut self, filter: EntryFilter) -> Self {
        self.entry_filter = filter;
        self
    }

    /// Set follow symlinks (builder pattern)
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set include hidden files (builder pattern)
    pub fn with_include_hidden(mut self, include: bool) -> Self {
        self.include_hidden = include;
        self
    }
}

/// Get number of available CPUs
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|p| p.get())
        .unwrap_or(4)
}

/// Check if a path has a JavaScript extension
pub fn is_javascript(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| JS_EXTENSIONS.contains(&ext.as_str()))
}

/// Filter for ignoring files and directories
pub struct IgnoreFilter {
    /// Scan root; globs match paths relative to it
    root: PathBuf,

    /// Rules from `.gitignore` and the custom ignore file
    gitignore: Option<Gitignore>,

    /// Custom glob patterns
    custom_globs: GlobSet,

    /// Default ignore patterns
    default_ignores: GlobSet,

    /// Whether to include hidden files
    include_hidden: bool,
}

impl IgnoreFilter {
    /// Create a new ignore filter from config
    pub fn new(config: &ScanConfig) -> Result<Self, ConfigError> {
        let gitignore = Self::build_gitignore(&config.root, config.ignore_file.as_deref())?;
        let custom_globs = Self::build_globset(&config.ignore_patterns)?;
        let default_ignores = Self::build_globset(DEFAULT_IGNORES)?;

        Ok(Self {
            root: config.root.clone(),
            gitignore,
            custom_globs,
            default_ignores,
            include_hidden: config.include_hidden,
        })
    }

    /// Build gitignore rules from the root's `.gitignore` plus an explicit
    /// ignore file
    fn build_gitignore(
        root: &Path,
        ignore_file: Option<&Path>,
    ) -> Result<Option<Gitignore>, ConfigError> {
        let gitignore_path = root.join(".gitignore");
        let mut sources: Vec<&Path> = Vec::new();
        if gitignore_path.is_file() {
            sources.push(&gitignore_path);
        }
        if let Some(path) = ignore_file {
            if !path.is_file() {
                return Err(ConfigError::InvalidConfig(format!(
                    "ignore file not found: {}",
                    path.display()
                )));
            }
            sources.push(path);
        }
        if sources.is_empty() {
            return Ok(None);
        }

        let mut builder = GitignoreBuilder::new(root);
        for source in sources {
            if let Some(err) = builder.add(source) {
                tracing::warn!(path = %source.display(), error = %err, "skipping unreadable ignore rules");
            }
        }

        match builder.build() {
            Ok(gi) => Ok(Some(gi)),
            Err(err) => {
                tracing::warn!(error = %err, "ignoring invalid ignore rules");
                Ok(None)
            }
        }
    }

    /// Build a globset from patterns
    fn build_globset<S: AsRef<str>>(patterns: &[S]) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern.as_ref())
                .map_err(|e| ConfigError::InvalidGlob(e.to_string()))?;
            builder.add(glob);
        }
        builder
            .build()
            .map_err(|e| ConfigError::InvalidGlob(e.to_string()))
    }

    /// Check if a path should be ignored
    pub fn should_ignore(&self, path: &Path, is_dir: bool) -> bool {
        // directories above the root never take part in matching
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        let path_str = relative.to_string_lossy();

        if !self.include_hidden {
            if let Some(name) = path.file_name() {
                if name.to_string_lossy().starts_with('.') {
                    return true;
                }
            }
        }

        if self.default_ignores.is_match(&*path_str) {
            return true;
        }

        if self.custom_globs.is_match(&*path_str) {
            return true;
        }

        if let Some(ref gi) = self.gitignore {
            if gi.matched(path, is_dir).is_ignore() {
                return true;
            }
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntryType;
    use tempfile::TempDir;

    #[test]
    fn test_config_builder() {
        let config = ScanConfig::new(PathBuf::from("/test"))
            .with_threads(4)
            .with_max_file_size(1024)
            .with_entry_filter(EntryFilter::with_max_level(1));

        assert_eq!(config.threads, 4);
        assert_eq!(config.max_file_size, 1024);
        assert_eq!(config.entry_filter.max_level, Some(1));
    }

    #[test]
    fn test_is_javascript() {
        assert!(is_javascript(Path::new("app.js")));
        assert!(is_javascript(Path::new("lib/index.MJS")));
        assert!(is_javascript(Path::new("view.jsx")));
        assert!(!is_javascript(Path::new("main.ts")));
        assert!(!is_javascript(Path::new("Makefile")));
    }

    #[test]
    fn test_entry_filter() {
        let entries = vec![
            OutlineEntry::new(EntryType::Class, "A", Vec::new(), 0, 1),
            OutlineEntry::new(EntryType::Private, "_m", Vec::new(), 1, 2),
            OutlineEntry::new(EntryType::Public, "deep", Vec::new(), 2, 3),
        ];

        let shallow = EntryFilter::with_max_level(1).apply(entries.clone());
        assert_eq!(shallow.len(), 2);

        let public = EntryFilter::public_only().apply(entries.clone());
        let names: Vec<&str> = public.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["A", "deep"]);

        assert_eq!(EntryFilter::default().apply(entries.clone()), entries);
    }

    #[test]
    fn test_default_ignores() {
        let config = ScanConfig::new(PathBuf::from("."));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.should_ignore(Path::new("./node_modules/react/index.js"), false));
        assert!(filter.should_ignore(Path::new("./public/app.min.js"), false));
        assert!(filter.should_ignore(Path::new("./.eslintrc.js"), false));
        assert!(!filter.should_ignore(Path::new("./src/app.js"), false));
    }

    #[test]
    fn test_custom_patterns() {
        let config = ScanConfig::new(PathBuf::from("."))
            .with_ignore_patterns(vec!["**/fixtures/**".to_string()]);
        let filter = IgnoreFilter::new(&config).unwrap();
        assert!(filter.should_ignore(Path::new("./test/fixtures/a.js"), false));

        let bad = ScanConfig::new(PathBuf::from(".")).with_ignore_patterns(vec!["[".to_string()]);
        assert!(matches!(
            IgnoreFilter::new(&bad),
            Err(ConfigError::InvalidGlob(_))
        ));
    }

    #[test]
    fn test_globs_match_below_the_root_only() {
        let config = ScanConfig::new(PathBuf::from("/work/build/app"));
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(!filter.should_ignore(Path::new("/work/build/app/src/main.js"), false));
        assert!(!filter.should_ignore(Path::new("/work/build/app/src"), true));
        assert!(filter.should_ignore(Path::new("/work/build/app/dist/app.js"), false));
        assert!(filter.should_ignore(Path::new("/work/build/app/src/out/gen.js"), false));
    }

    #[test]
    fn test_gitignore_rules() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "generated/\n").unwrap();
        let config = ScanConfig::new(dir.path().to_path_buf());
        let filter = IgnoreFilter::new(&config).unwrap();

        assert!(filter.should_ignore(&dir.path().join("generated"), true));
        assert!(!filter.should_ignore(&dir.path().join("src"), true));
    }

    #[test]
    fn test_from_toml() {
        let config = ScanConfig::from_toml_str(
            r#"
root = "web"
ignore_patterns = ["**/legacy/**"]
threads = 2

[filter]
max_level = 1
public_only = true
"#,
        )
        .unwrap();

        assert_eq!(config.root, PathBuf::from("web"));
        assert_eq!(config.threads, 2);
        assert_eq!(config.ignore_patterns, vec!["**/legacy/**"]);
        assert_eq!(
            config.entry_filter,
            EntryFilter {
                max_level: Some(1),
                public_only: true
            }
        );
        assert_eq!(config.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_from_toml_file_resolves_root() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jsoutline.toml");
        std::fs::write(&path, "root = \"src\"\n").unwrap();

        let config = ScanConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.root, dir.path().join("src"));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            ScanConfig::from_toml_str("threads = \"many\""),
            Err(ConfigError::Toml(_))
        ));
        assert!(matches!(
            ScanConfig::from_toml_str("threads = 0"),
            Err(ConfigError::InvalidConfig(_))
        ));
    }
}
