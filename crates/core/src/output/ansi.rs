//! ANSI colored output formatter
//!
//! Renders outlines as an indented, colored tree for the terminal.

use crate::models::{EntryType, FileOutline, OutlineMap, OutlineNode};
use colored::{ColoredString, Colorize};

/// Color an entry's type label
fn type_label(entry_type: EntryType) -> ColoredString {
    let label = format!("{:<9}", entry_type.as_str());
    match entry_type {
        EntryType::Class => label.bright_yellow().bold(),
        EntryType::Public => label.bright_cyan(),
        EntryType::Private => label.magenta(),
        EntryType::Generator => label.bright_green(),
        EntryType::Unnamed => label.dimmed(),
    }
}

/// Format outline data as ANSI colored text
pub fn format_ansi(data: &OutlineMap) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "\n{}\n\n",
        "  JavaScript Outline  ".bold().on_blue()
    ));
    output.push_str(&format!("{} {}\n\n", "Root:".bold(), data.root.display()));
    output.push_str(&format!(
        "{} {}  {} {}  {} {}\n\n",
        "Files:".bold(),
        data.stats.total_files,
        "Lines:".bold(),
        data.stats.total_lines,
        "Entries:".bold(),
        data.stats.total_entries
    ));

    for file in &data.files {
        output.push_str(&format_file_ansi(file));
    }

    output.push_str(&format!(
        "\n{}\n",
        format!(
            "Scan completed in {}ms ({:.2} files/sec)",
            data.metadata.scan_duration_ms, data.metadata.files_per_second
        )
        .dimmed()
    ));

    output
}

/// Format a single file's outline
pub fn format_file_ansi(file: &FileOutline) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "{} {}\n",
        file.path.display().to_string().bright_green().bold(),
        format!("({} lines)", file.total_lines).dimmed()
    ));

    if let Some(ref error) = file.error {
        output.push_str(&format!("   {}\n", error.bright_red()));
    }

    for node in file.tree() {
        format_node_ansi(&node, &mut output);
    }

    output.push('\n');
    output
}

/// Format a node and its children, indented by level
fn format_node_ansi(node: &OutlineNode, output: &mut String) {
    let entry = &node.entry;
    let indent = "   ".repeat(entry.level + 1);

    output.push_str(&format!(
        "{}{} {} {}\n",
        indent,
        type_label(entry.entry_type),
        entry.signature().bold(),
        format!(":{}", entry.line).dimmed()
    ));

    for child in &node.children {
        format_node_ansi(child, output);
    }
}
