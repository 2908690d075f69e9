//! JSON output formatter

use crate::models::{FileOutline, OutlineMap};
use crate::output::FormatError;

/// Format outline data as pretty JSON
pub fn format_json(data: &OutlineMap) -> Result<String, FormatError> {
    serde_json::to_string_pretty(data).map_err(FormatError::from)
}

/// Format one file's outline as pretty JSON
pub fn format_file_json(file: &FileOutline) -> Result<String, FormatError> {
    serde_json::to_string_pretty(file).map_err(FormatError::from)
}
