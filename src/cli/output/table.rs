//! Table builder wrapper around comfy-table for settings display.

use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use serde_json::Value;

use crate::domain::models::SettingsDocument;

/// Create a standard list table with the given headers.
///
/// Uses the NOTHING preset (no borders) for a clean CLI aesthetic.
pub fn list_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            headers
                .iter()
                .map(|h| Cell::new(h.to_uppercase()).set_alignment(CellAlignment::Left)),
        );
    table
}

/// Key/value table of a settings document, in document order.
pub fn settings_table(document: &SettingsDocument) -> Table {
    let mut table = list_table(&["key", "value"]);
    for (key, value) in document.iter() {
        table.add_row(vec![Cell::new(key), Cell::new(display_value(value))]);
    }
    table
}

/// Strings without quotes, everything else as compact JSON
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
