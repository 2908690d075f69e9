//! Data models for JavaScript outlines
//!
//! This module defines the outline entry produced by the scanner, the tree view
//! rebuilt from entry levels, and the per-file and per-scan result structures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Classification tag of an outline entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Public,
    Private,
    Class,
    Unnamed,
    Generator,
}

impl EntryType {
    /// Classify a function-like member by its name
    pub fn for_name(name: &str) -> Self {
        if name.starts_with('_') || name.starts_with('#') {
            EntryType::Private
        } else {
            EntryType::Public
        }
    }

    /// Get the serialized tag
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryType::Public => "public",
            EntryType::Private => "private",
            EntryType::Class => "class",
            EntryType::Unnamed => "unnamed",
            EntryType::Generator => "generator",
        }
    }

    /// Check if this entry is hidden from a public-only outline
    pub fn is_private(&self) -> bool {
        matches!(self, EntryType::Private)
    }
}

/// One recognized declaration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Classification tag
    #[serde(rename = "type")]
    pub entry_type: EntryType,

    /// Identifier text, or `"function"` for an unnamed function expression
    pub name: String,

    /// Parameter descriptors in source order (superclass for classes)
    pub args: Vec<String>,

    /// Number of enclosing function and class bodies
    pub level: usize,

    /// Line on which the declaration begins (1-indexed)
    pub line: usize,
}

impl OutlineEntry {
    pub fn new(
        entry_type: EntryType,
        name: impl Into<String>,
        args: Vec<String>,
        level: usize,
        line: usize,
    ) -> Self {
        Self {
            entry_type,
            name: name.into(),
            args,
            level,
            line,
        }
    }

    /// Signature text, e.g. `withDefaults(a=1, b)` or `Sub extends Super`
    pub fn signature(&self) -> String {
        match self.entry_type {
            EntryType::Class => match self.args.first() {
                Some(parent) => format!("{} extends {}", self.name, parent),
                None => self.name.clone(),
            },
            EntryType::Generator => format!("*{}({})", self.name, self.args.join(", ")),
            _ => format!("{}({})", self.name, self.args.join(", ")),
        }
    }
}

/// Tree view of outline entries, rebuilt from their levels
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineNode {
    /// The entry this node stands for
    pub entry: OutlineEntry,

    /// Entries nested directly inside this one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    pub fn new(entry: OutlineEntry) -> Self {
        Self {
            entry,
            children: Vec::new(),
        }
    }

    /// Flatten the tree back into entries in source order
    pub fn flatten(&self) -> Vec<&OutlineEntry> {
        let mut result = vec![&self.entry];
        for child in &self.children {
            result.extend(child.flatten());
        }
        result
    }

    /// Count total nodes in this subtree
    pub fn total_nodes(&self) -> usize {
        1 + self.children.iter().map(|c| c.total_nodes()).sum::<usize>()
    }
}

/// Rebuild the containment tree from a flat, level-annotated entry list.
///
/// An entry becomes a child of the closest preceding entry with a smaller
/// level. Entries whose level skips ahead (their enclosing scope was not an
/// outline entry, e.g. an arrow callback) attach to that closest entry too.
pub fn build_tree(entries: &[OutlineEntry]) -> Vec<OutlineNode> {
    let mut roots: Vec<OutlineNode> = Vec::new();
    // Open path from a root down to the most recent node.
    let mut path: Vec<OutlineNode> = Vec::new();

    for entry in entries {
        while path
            .last()
            .is_some_and(|open| open.entry.level >= entry.level)
        {
            close_last(&mut path, &mut roots);
        }
        path.push(OutlineNode::new(entry.clone()));
    }
    while !path.is_empty() {
        close_last(&mut path, &mut roots);
    }

    roots
}

fn close_last(path: &mut Vec<OutlineNode>, roots: &mut Vec<OutlineNode>) {
    if let Some(node) = path.pop() {
        match path.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }
}

/// Complete outline for a source file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutline {
    /// Path to the source file
    pub path: PathBuf,

    /// Absolute path to the source file
    pub absolute_path: PathBuf,

    /// Total number of lines in the file
    pub total_lines: usize,

    /// Outline entries in source order
    pub entries: Vec<OutlineEntry>,

    /// Syntax error message when the file could not be scanned
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutline {
    /// Get total number of entries
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Check if the file failed to scan
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }

    /// Tree view of the entries
    pub fn tree(&self) -> Vec<OutlineNode> {
        build_tree(&self.entries)
    }

    /// Count entries of one type
    pub fn count_type(&self, entry_type: EntryType) -> usize {
        self.entries
            .iter()
            .filter(|e| e.entry_type == entry_type)
            .count()
    }
}

/// Flat output structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutlineMap {
    /// Project root directory
    pub root: PathBuf,

    /// All scanned files
    pub files: Vec<FileOutline>,

    /// Summary statistics
    pub stats: ScanStats,

    /// Scan metadata
    pub metadata: ScanMetadata,
}

/// Summary statistics for a scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Total files scanned
    pub total_files: usize,

    /// Total lines across all files
    pub total_lines: usize,

    /// Total outline entries found
    pub total_entries: usize,

    /// Class entries
    pub classes: usize,

    /// Public and private function, method and field entries
    pub functions: usize,

    /// Private entries
    pub private: usize,

    /// Unnamed function entries
    pub unnamed: usize,

    /// Generator entries
    pub generators: usize,

    /// Files that failed with a syntax error
    pub files_with_errors: usize,
}

impl ScanStats {
    /// Compute statistics over scanned files
    pub fn from_files(files: &[FileOutline]) -> Self {
        let mut stats = ScanStats {
            total_files: files.len(),
            ..Default::default()
        };

        for file in files {
            stats.total_lines += file.total_lines;
            stats.total_entries += file.total_entries();
            if file.has_error() {
                stats.files_with_errors += 1;
            }
            for entry in &file.entries {
                match entry.entry_type {
                    EntryType::Class => stats.classes += 1,
                    EntryType::Public => stats.functions += 1,
                    EntryType::Private => {
                        stats.functions += 1;
                        stats.private += 1;
                    }
                    EntryType::Unnamed => stats.unnamed += 1,
                    EntryType::Generator => stats.generators += 1,
                }
            }
        }

        stats
    }
}

/// Metadata about the scan operation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanMetadata {
    /// Duration of scan in milliseconds
    pub scan_duration_ms: u64,

    /// Files processed per second
    pub files_per_second: f64,

    /// ISO timestamp of scan
    pub timestamp: String,

    /// Tool version
    pub tool_version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(entry_type: EntryType, name: &str, level: usize, line: usize) -> OutlineEntry {
        OutlineEntry::new(entry_type, name, Vec::new(), level, line)
    }

    #[test]
    fn test_entry_serializes_with_type_tag() {
        let e = OutlineEntry::new(
            EntryType::Public,
            "method",
            vec!["argument".to_string()],
            1,
            2,
        );
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "type": "public",
                "name": "method",
                "args": ["argument"],
                "level": 1,
                "line": 2
            })
        );
    }

    #[test]
    fn test_visibility_by_name() {
        assert_eq!(EntryType::for_name("getString"), EntryType::Public);
        assert_eq!(EntryType::for_name("_getPrivateString"), EntryType::Private);
        assert_eq!(EntryType::for_name("#secret"), EntryType::Private);
    }

    #[test]
    fn test_signature() {
        let class = OutlineEntry::new(
            EntryType::Class,
            "SubClass",
            vec!["SuperClass".to_string()],
            0,
            7,
        );
        assert_eq!(class.signature(), "SubClass extends SuperClass");

        let gen = OutlineEntry::new(EntryType::Generator, "gen", vec!["a".into()], 0, 1);
        assert_eq!(gen.signature(), "*gen(a)");
    }

    #[test]
    fn test_build_tree_nests_by_level() {
        let entries = vec![
            entry(EntryType::Class, "A", 0, 1),
            entry(EntryType::Public, "m", 1, 2),
            entry(EntryType::Public, "inner", 2, 3),
            entry(EntryType::Public, "n", 1, 5),
            entry(EntryType::Public, "f", 0, 8),
        ];

        let tree = build_tree(&entries);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].entry.name, "A");
        assert_eq!(tree[0].children.len(), 2);
        assert_eq!(tree[0].children[0].children[0].entry.name, "inner");
        assert_eq!(tree[0].total_nodes(), 4);

        let flat: Vec<&OutlineEntry> = tree.iter().flat_map(|n| n.flatten()).collect();
        assert_eq!(flat.len(), entries.len());
        assert!(flat.iter().zip(&entries).all(|(a, b)| *a == b));
    }

    #[test]
    fn test_build_tree_with_skipped_level() {
        // `c` sits two levels below `a` because an undetected scope sits between.
        let entries = vec![
            entry(EntryType::Public, "a", 0, 1),
            entry(EntryType::Public, "c", 2, 3),
        ];
        let tree = build_tree(&entries);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree[0].children[0].entry.name, "c");
    }

    #[test]
    fn test_stats_from_files() {
        let file = FileOutline {
            path: PathBuf::from("a.js"),
            absolute_path: PathBuf::from("/p/a.js"),
            total_lines: 12,
            entries: vec![
                entry(EntryType::Class, "A", 0, 1),
                entry(EntryType::Private, "_m", 1, 2),
                entry(EntryType::Generator, "g", 0, 4),
                entry(EntryType::Unnamed, "function", 0, 6),
            ],
            error: None,
        };
        let broken = FileOutline {
            path: PathBuf::from("b.js"),
            absolute_path: PathBuf::from("/p/b.js"),
            total_lines: 3,
            entries: Vec::new(),
            error: Some("SyntaxError: unterminated string literal (line 1)".to_string()),
        };

        let stats = ScanStats::from_files(&[file, broken]);
        assert_eq!(stats.total_files, 2);
        assert_eq!(stats.total_lines, 15);
        assert_eq!(stats.total_entries, 4);
        assert_eq!(stats.classes, 1);
        assert_eq!(stats.functions, 1);
        assert_eq!(stats.private, 1);
        assert_eq!(stats.generators, 1);
        assert_eq!(stats.unnamed, 1);
        assert_eq!(stats.files_with_errors, 1);
    }
}
