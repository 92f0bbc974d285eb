pub mod fields;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A single record of a remote sheet: column name -> cell value.
///
/// There is no fixed schema beyond convention. Every category of sheet
/// has an expected column set, but lookups must go through
/// [`fields::row_value`] which tolerates header variants.
pub type SheetRow = HashMap<String, String>;

/// A named remote table fetched through the gateway.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetData {
    #[serde(default)]
    pub headers: Vec<String>,
    #[serde(default)]
    pub rows: Vec<SheetRow>,
    /// Link to the human-viewable spreadsheet file backing this sheet.
    /// Sheets can live in different backing files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl SheetData {
    pub fn new(headers: Vec<String>, rows: Vec<SheetRow>) -> Self {
        Self {
            headers,
            rows,
            file_url: None,
        }
    }
}
