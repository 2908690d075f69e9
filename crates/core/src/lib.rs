//! jsoutline_core - Core library for JavaScript outlines
//!
//! This crate scans JavaScript source text and produces a flat, ordered
//! outline of its functions, classes, methods and fields, each tagged with a
//! nesting level. The scanner is lexical: it never builds a syntax tree, it
//! only recognizes declaration patterns over a token window.
//!
//! # Features
//!
//! - **Tolerant scanning**: constructs outside the recognized forms are
//!   skipped, while a broken delimiter structure fails with a `SyntaxError`.
//! - **Literal-safe**: braces and keywords inside comments, strings,
//!   templates and regular expressions never count.
//! - **Directory scans**: parallel scanning of whole trees with gitignore and
//!   glob filtering.
//! - **Multiple Output Formats**: JSON, YAML, ANSI-colored terminal output and
//!   a plain-text summary.
//!
//! # Example
//!
//! ```rust
//! use jsoutline_core::{parse, EntryType};
//!
//! let entries = parse("class A extends B {\n  run(x = 1) {}\n}\n").unwrap();
//! assert_eq!(entries[0].entry_type, EntryType::Class);
//! assert_eq!(entries[0].args, vec!["B"]);
//! assert_eq!(entries[1].name, "run");
//! assert_eq!(entries[1].level, 1);
//! ```

pub mod config;
pub mod engine;
pub mod models;
pub mod output;
pub mod parser;

// Re-exports for convenience
pub use config::{EntryFilter, ScanConfig};
pub use engine::{outline_source, scan_file, OutlineScanner, ScanError};
pub use models::{
    build_tree, EntryType, FileOutline, OutlineEntry, OutlineMap, OutlineNode, ScanMetadata,
    ScanStats,
};
pub use output::{format_file, format_output, FormatError, OutputFormat};
pub use parser::{parse, ParseError, ARG_DEFAULT_PLACEHOLDER};
