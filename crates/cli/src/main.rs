//! jsoutline CLI
//!
//! Prints the outline (functions, classes, methods and fields with their
//! nesting levels) of a JavaScript file or of every JavaScript file under a
//! directory.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use jsoutline_core::{
    format_file, format_output, scan_file, EntryFilter, OutlineScanner, OutputFormat, ScanConfig,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Outline JavaScript sources
#[derive(Parser)]
#[command(name = "jsoutline")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Outline JavaScript files - functions, classes, methods and fields")]
#[command(long_about = r#"
jsoutline: lexical outlines for JavaScript

Lists every function, class, method and field of a JavaScript file with its
parameters, line and nesting level. Comments and string, template and regex
literals are never mistaken for code. Files with unbalanced delimiters or
unterminated literals are reported as SyntaxError.

Scanned extensions: .js, .mjs, .cjs, .jsx

Output formats:
  - JSON (default) - Structured JSON for programmatic use
  - YAML - Human-readable YAML format
  - ANSI - Colored, indented terminal outline
  - Summary - Plain text

Examples:
  jsoutline src/app.js                 # Outline one file
  jsoutline . --format ansi            # Colored outline of a project
  jsoutline lib --max-level 0          # Top-level declarations only
  jsoutline . --public-only -o out.json
  jsoutline --config jsoutline.toml
"#)]
pub struct Args {
    /// File or directory to outline (default: current directory)
    pub path: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Output file (default: stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Load scan settings from a TOML file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Drop entries nested deeper than this level
    #[arg(long)]
    pub max_level: Option<usize>,

    /// Drop private (`_name`, `#name`) entries
    #[arg(long)]
    pub public_only: bool,

    /// Ignore patterns (can be specified multiple times)
    #[arg(long, action = clap::ArgAction::Append)]
    pub ignore: Vec<String>,

    /// Number of threads for parallel processing (default: auto)
    #[arg(long)]
    pub threads: Option<usize>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format argument
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Ansi,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Ansi => OutputFormat::Ansi,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    tracing::debug!(root = %config.root.display(), threads = config.threads, "starting");

    if config.root.is_file() {
        run_file(&config, &args)
    } else if config.root.is_dir() {
        run_scan(config, &args)
    } else {
        anyhow::bail!("Path does not exist: {}", config.root.display());
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "jsoutline=debug,jsoutline_core=debug"
    } else {
        "jsoutline=info,jsoutline_core=warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(atty::Stream::Stderr))
        .init();
}

/// Build configuration from the optional config file, then the flags
fn build_config(args: &Args) -> Result<ScanConfig> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_toml_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    if let Some(path) = &args.path {
        config = config.with_root(path.clone());
    }
    if !args.ignore.is_empty() {
        let mut patterns = config.ignore_patterns.clone();
        patterns.extend(args.ignore.iter().cloned());
        config = config.with_ignore_patterns(patterns);
    }
    if let Some(threads) = args.threads {
        config = config.with_threads(threads.max(1));
    }
    if args.hidden {
        config = config.with_include_hidden(true);
    }
    if args.follow_symlinks {
        config = config.with_follow_symlinks(true);
    }

    let mut filter: EntryFilter = config.entry_filter.clone();
    if args.max_level.is_some() {
        filter.max_level = args.max_level;
    }
    if args.public_only {
        filter.public_only = true;
    }

    Ok(config.with_entry_filter(filter))
}

fn run_file(config: &ScanConfig, args: &Args) -> Result<()> {
    let outline = scan_file(&config.root, config)
        .with_context(|| format!("Failed to outline {}", config.root.display()))?;

    let output = format_file(&outline, args.format.into())?;
    write_output(&output, args.output.as_deref())
}

fn run_scan(config: ScanConfig, args: &Args) -> Result<()> {
    let spinner = if atty::is(atty::Stream::Stderr) {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .context("Invalid spinner template")?,
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message("Scanning JavaScript files...");
        Some(pb)
    } else {
        None
    };

    let scanner = OutlineScanner::new(config).context("Failed to create scanner")?;
    let result = scanner.scan().context("Failed to scan directory")?;

    if let Some(ref pb) = spinner {
        pb.finish_and_clear();
    }
    tracing::info!(
        files = result.stats.total_files,
        entries = result.stats.total_entries,
        errors = result.stats.files_with_errors,
        duration_ms = result.metadata.scan_duration_ms,
        "scan complete"
    );

    let output = format_output(&result, args.format.into())?;
    write_output(&output, args.output.as_deref())
}

fn write_output(output: &str, path: Option<&Path>) -> Result<()> {
    if let Some(path) = path {
        fs::write(path, output)
            .with_context(|| format!("Failed to write output file {}", path.display()))?;
        tracing::debug!(path = %path.display(), bytes = output.len(), "wrote output");
    } else {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = Args::parse_from([
            "jsoutline",
            "src",
            "--max-level",
            "1",
            "--public-only",
            "--ignore",
            "**/legacy/**",
            "--threads",
            "2",
        ]);
        let config = build_config(&args).unwrap();

        assert_eq!(config.root, PathBuf::from("src"));
        assert_eq!(config.threads, 2);
        assert_eq!(config.ignore_patterns, vec!["**/legacy/**"]);
        assert_eq!(config.entry_filter.max_level, Some(1));
        assert!(config.entry_filter.public_only);
    }

    #[test]
    fn test_format_flag() {
        let args = Args::parse_from(["jsoutline", "--format", "summary"]);
        assert!(matches!(
            OutputFormat::from(args.format),
            OutputFormat::Summary
        ));
        assert!(args.path.is_none());
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["jsoutline", "--config", "/nonexistent/jsoutline.toml"]);
        assert!(build_config(&args).is_err());
    }
}
