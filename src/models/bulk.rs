use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// BulkExport: One entry of the Scryfall bulk-data listing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkExport {
    #[serde(rename = "type")]
    pub type_field: String,
    pub download_uri: String,
    pub name: Option<String>,
    pub updated_at: Option<String>,
    pub size: Option<u64>,
}

/// The bulk-data metadata document: `{ "data": [BulkExport, ...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkCatalog {
    #[serde(default)]
    pub data: Vec<BulkExport>,
}

impl BulkCatalog {
    /// Find the export whose `type` equals `export_type`.
    pub fn find(&self, export_type: &str) -> Option<&BulkExport> {
        self.data.iter().find(|e| e.type_field == export_type)
    }
}
