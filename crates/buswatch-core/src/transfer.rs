// SPDX-License-Identifier: AGPL-3.0
// Buswatch Core - Import and export
//
// Export is full-fidelity (arrivals included, asymmetric with persistence);
// import accepts any document whose top level is an array and replaces the
// collection wholesale.

use crate::types::{AppError, Group};
use serde_json::Value;

/// Suggested download name for exported collections
pub const EXPORT_FILE_NAME: &str = "bus_shortcuts.json";

/// Serialize the entire canonical collection as indented JSON
pub fn export_json(groups: &[Group]) -> Result<String, AppError> {
    serde_json::to_string_pretty(groups)
        .map_err(|e| AppError::Serialization(format!("Failed to serialize shortcuts: {}", e)))
}

/// Parse an uploaded document into a replacement collection.
///
/// The top level must be a JSON array; anything else leaves the caller's
/// state untouched. Entries deserialize leniently: missing ids are
/// regenerated and missing arrivals come back unknown.
pub fn import_json(document: &str) -> Result<Vec<Group>, AppError> {
    let value: Value = serde_json::from_str(document)
        .map_err(|e| AppError::ImportFormat(format!("Error parsing the file: {}", e)))?;

    if !value.is_array() {
        return Err(AppError::ImportFormat(
            "Invalid file format. Please import a valid JSON file.".to_string(),
        ));
    }

    serde_json::from_value(value)
        .map_err(|e| AppError::ImportFormat(format!("Unrecognized group entries: {}", e)))
}
