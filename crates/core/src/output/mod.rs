//! Output formatting module
//!
//! This module provides formatters for JSON, YAML, ANSI and plain-text
//! summary output of outline data structures.

pub mod ansi;
mod json;
mod yaml;

pub use ansi::{format_ansi, format_file_ansi};
pub use json::{format_file_json, format_json};
pub use yaml::{format_file_yaml, format_yaml};

use crate::models::{FileOutline, OutlineMap};
use std::fmt::Write as _;
use std::str::FromStr;
use thiserror::Error;

/// Output format errors
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML serialization error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Unknown output format: {0}")]
    UnknownFormat(String),
}

/// Available output formats
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format
    #[default]
    Json,
    /// YAML format
    Yaml,
    /// ANSI colored text
    Ansi,
    /// Plain text summary
    Summary,
}

impl FromStr for OutputFormat {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "ansi" => Ok(OutputFormat::Ansi),
            "summary" | "text" => Ok(OutputFormat::Summary),
            other => Err(FormatError::UnknownFormat(other.to_string())),
        }
    }
}

/// Format outline data in the specified format
pub fn format_output(data: &OutlineMap, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_json(data),
        OutputFormat::Yaml => format_yaml(data),
        OutputFormat::Ansi => Ok(format_ansi(data)),
        OutputFormat::Summary => Ok(format_summary(data)),
    }
}

/// Format one file's outline in the specified format
pub fn format_file(file: &FileOutline, format: OutputFormat) -> Result<String, FormatError> {
    match format {
        OutputFormat::Json => format_file_json(file),
        OutputFormat::Yaml => format_file_yaml(file),
        OutputFormat::Ansi => Ok(format_file_ansi(file)),
        OutputFormat::Summary => Ok(format_file_summary(file)),
    }
}

/// Format as plain text summary
fn format_summary(data: &OutlineMap) -> String {
    let stats = &data.stats;
    let mut output = String::new();

    output.push_str("JavaScript Outline Results\n");
    output.push_str("==========================\n\n");
    let _ = writeln!(output, "Root: {}", data.root.display());
    let _ = writeln!(output, "Total Files: {}", stats.total_files);
    let _ = writeln!(output, "Total Lines: {}", stats.total_lines);
    let _ = writeln!(output, "Total Entries: {}", stats.total_entries);
    output.push_str("\nEntry Breakdown:\n");
    let _ = writeln!(output, "  Classes: {}", stats.classes);
    let _ = writeln!(output, "  Functions: {} ({} private)", stats.functions, stats.private);
    let _ = writeln!(output, "  Generators: {}", stats.generators);
    let _ = writeln!(output, "  Unnamed: {}", stats.unnamed);

    if stats.files_with_errors > 0 {
        let _ = writeln!(output, "\nFiles with syntax errors: {}", stats.files_with_errors);
        for file in data.files.iter().filter(|f| f.has_error()) {
            let _ = writeln!(
                output,
                "  {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or_default()
            );
        }
    }

    let _ = writeln!(output, "\nScan Duration: {}ms", data.metadata.scan_duration_ms);
    let _ = writeln!(
        output,
        "Processing Speed: {:.2} files/sec",
        data.metadata.files_per_second
    );

    output
}

/// Format one file as a plain outline, one entry per line
fn format_file_summary(file: &FileOutline) -> String {
    let mut output = String::new();

    let _ = writeln!(
        output,
        "{} ({} lines, {} entries)",
        file.path.display(),
        file.total_lines,
        file.total_entries()
    );
    if let Some(ref error) = file.error {
        let _ = writeln!(output, "  {}", error);
    }
    for entry in &file.entries {
        let _ = writeln!(
            output,
            "{:>6}  {}{} [{}]",
            entry.line,
            "  ".repeat(entry.level),
            entry.signature(),
            entry.entry_type.as_str()
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EntryType, OutlineEntry, ScanMetadata, ScanStats};
    use std::path::PathBuf;

    pub fn sample_map() -> OutlineMap {
        let view = FileOutline {
            path: PathBuf::from("src/view.js"),
            absolute_path: PathBuf::from("/project/src/view.js"),
            total_lines: 20,
            entries: vec![
                OutlineEntry::new(
                    EntryType::Class,
                    "View",
                    vec!["Component".to_string()],
                    0,
                    1,
                ),
                OutlineEntry::new(EntryType::Public, "render", vec!["props".to_string()], 1, 4),
                OutlineEntry::new(EntryType::Private, "_bind", Vec::new(), 1, 9),
                OutlineEntry::new(EntryType::Generator, "items", Vec::new(), 0, 15),
            ],
            error: None,
        };
        let broken = FileOutline {
            path: PathBuf::from("src/broken.js"),
            absolute_path: PathBuf::from("/project/src/broken.js"),
            total_lines: 3,
            entries: Vec::new(),
            error: Some("SyntaxError: unexpected '}' (line 3)".to_string()),
        };
        let files = vec![view, broken];

        OutlineMap {
            root: PathBuf::from("/project"),
            stats: ScanStats::from_files(&files),
            files,
            metadata: ScanMetadata {
                scan_duration_ms: 100,
                files_per_second: 20.0,
                timestamp: "2024-01-01T00:00:00Z".to_string(),
                tool_version: "0.1.0".to_string(),
            },
        }
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!("yml".parse::<OutputFormat>().unwrap(), OutputFormat::Yaml);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_format_summary() {
        let output = format_output(&sample_map(), OutputFormat::Summary).unwrap();
        assert!(output.contains("Total Entries: 4"));
        assert!(output.contains("Functions: 2 (1 private)"));
        assert!(output.contains("src/broken.js: SyntaxError"));
    }

    #[test]
    fn test_format_file_summary_indents_by_level() {
        let data = sample_map();
        let output = format_file(&data.files[0], OutputFormat::Summary).unwrap();
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "src/view.js (20 lines, 4 entries)");
        assert_eq!(lines[1], "     1  View extends Component [class]");
        assert_eq!(lines[2], "     4    render(props) [public]");
        assert_eq!(lines[4], "    15  *items() [generator]");
    }

    #[test]
    fn test_every_format_renders() {
        let data = sample_map();
        for format in [
            OutputFormat::Json,
            OutputFormat::Yaml,
            OutputFormat::Ansi,
            OutputFormat::Summary,
        ] {
            let output = format_output(&data, format).unwrap();
            assert!(output.contains("render"), "{format:?}");
        }
    }
}
