//! YAML output formatter

use crate::models::{FileOutline, OutlineMap};
use crate::output::FormatError;

/// Format outline data as YAML
pub fn format_yaml(data: &OutlineMap) -> Result<String, FormatError> {
    serde_yaml::to_string(data).map_err(FormatError::from)
}

/// Format one file's outline as YAML
pub fn format_file_yaml(file: &FileOutline) -> Result<String, FormatError> {
    serde_yaml::to_string(file).map_err(FormatError::from)
}
