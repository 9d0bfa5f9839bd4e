use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// ---------------------------------------------------------------------------
// CardRecord: One Scryfall card document plus its projected columns
// ---------------------------------------------------------------------------

/// A card from the bulk snapshot.
///
/// The full Scryfall document is kept verbatim in `document`; the remaining
/// fields are projections used as table columns.
#[derive(Debug, Clone, Serialize)]
pub struct CardRecord {
    pub id: String,
    pub name: Option<String>,
    pub mana_cost: Option<String>,
    pub type_line: Option<String>,
    pub oracle_text: Option<String>,
    pub set_code: Option<String>,
    pub rarity: Option<String>,
    pub colors: Option<Vec<String>>,
    pub image_uri: Option<String>,
    pub document: Value,
}

#[derive(Deserialize)]
struct CardFields {
    id: String,
    name: Option<String>,
    mana_cost: Option<String>,
    type_line: Option<String>,
    oracle_text: Option<String>,
    #[serde(rename = "set")]
    set_code: Option<String>,
    rarity: Option<String>,
    colors: Option<Vec<String>>,
    image_uris: Option<ImageUris>,
}

#[derive(Deserialize)]
struct ImageUris {
    normal: Option<String>,
}

impl CardRecord {
    /// Project a raw card document. Fails only when `id` is missing or not a
    /// string, or a projected field has the wrong shape.
    pub fn from_document(document: Value) -> Result<Self> {
        let fields = CardFields::deserialize(&document)?;
        Ok(Self {
            id: fields.id,
            name: fields.name,
            mana_cost: fields.mana_cost,
            type_line: fields.type_line,
            oracle_text: fields.oracle_text,
            set_code: fields.set_code,
            rarity: fields.rarity,
            colors: fields.colors,
            image_uri: fields.image_uris.and_then(|u| u.normal),
            document,
        })
    }

    /// Colors as JSON text, e.g. `["U","R"]`.
    pub fn colors_json(&self) -> Option<String> {
        self.colors
            .as_ref()
            .and_then(|c| serde_json::to_string(c).ok())
    }
}
