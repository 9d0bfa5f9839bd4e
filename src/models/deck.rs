use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// DeckSummary: One entry of a Moxfield listing page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckSummary {
    pub public_id: String,
    pub name: Option<String>,
    pub format: Option<String>,
    pub created_at_utc: Option<String>,
    #[serde(alias = "updatedAtUtc")]
    pub last_updated_at_utc: Option<String>,
    /// Either a bare user name or a `{ "userName": ... }` object.
    pub created_by_user: Option<Value>,
    pub hub_names: Option<Vec<String>>,
}

impl DeckSummary {
    /// Minimal summary carrying only an identifier.
    pub fn new(public_id: &str) -> Self {
        Self {
            public_id: public_id.to_string(),
            name: None,
            format: None,
            created_at_utc: None,
            last_updated_at_utc: None,
            created_by_user: None,
            hub_names: None,
        }
    }
}

// ---------------------------------------------------------------------------
// ListingPage: One page of a paginated listing (not persisted)
// ---------------------------------------------------------------------------

/// A page of deck summaries and the listing's total, when reported.
///
/// The total is read from `meta.total`, falling back to Moxfield's
/// `totalResults`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "RawListingPage")]
pub struct ListingPage {
    pub data: Vec<DeckSummary>,
    pub total: Option<u64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawListingPage {
    data: Option<Vec<DeckSummary>>,
    meta: Option<PageMeta>,
    total_results: Option<u64>,
}

#[derive(Deserialize)]
struct PageMeta {
    total: Option<u64>,
}

impl From<RawListingPage> for ListingPage {
    fn from(raw: RawListingPage) -> Self {
        Self {
            data: raw.data.unwrap_or_default(),
            total: raw.meta.and_then(|m| m.total).or(raw.total_results),
        }
    }
}

// ---------------------------------------------------------------------------
// DeckRecord: A fetched deck ready to be stored
// ---------------------------------------------------------------------------

/// A deck detail document plus the projected columns stored next to it.
#[derive(Debug, Clone, Serialize)]
pub struct DeckRecord {
    pub id: String,
    /// Label of the listing the deck was observed in.
    pub source: String,
    pub name: Option<String>,
    pub format: Option<String>,
    pub created: Option<String>,
    pub updated: Option<String>,
    /// Never empty; falls back to a fixed label when no creator is known.
    pub owner: String,
    pub hub_names: Vec<String>,
    pub document: Value,
}

impl DeckRecord {
    /// Combine a listing summary with its detail document.
    ///
    /// Detail fields win over summary fields.
    pub fn from_detail(
        summary: &DeckSummary,
        source: &str,
        document: Value,
        fallback_owner: &str,
    ) -> Self {
        let owner = document
            .get("createdByUser")
            .and_then(creator_name)
            .or_else(|| summary.created_by_user.as_ref().and_then(creator_name))
            .unwrap_or_else(|| fallback_owner.to_string());

        let mut hub_names = summary.hub_names.clone().unwrap_or_default();
        if let Some(hubs) = document.get("hubs").and_then(Value::as_array) {
            for hub in hubs {
                if let Some(name) = hub.get("name").and_then(Value::as_str) {
                    if !hub_names.iter().any(|h| h == name) {
                        hub_names.push(name.to_string());
                    }
                }
            }
        }

        Self {
            id: summary.public_id.clone(),
            source: source.to_string(),
            name: string_field(&document, &["name"]).or_else(|| summary.name.clone()),
            format: string_field(&document, &["format"]).or_else(|| summary.format.clone()),
            created: string_field(&document, &["createdAtUtc"])
                .or_else(|| summary.created_at_utc.clone()),
            updated: string_field(&document, &["lastUpdatedAtUtc", "updatedAtUtc"])
                .or_else(|| summary.last_updated_at_utc.clone()),
            owner,
            hub_names,
            document,
        }
    }

    /// True when the document's `legalities` map marks the declared format as
    /// legal (`true` or `"legal"`). A deck without a format is never legal.
    pub fn is_legal_in_declared_format(&self) -> bool {
        let Some(format) = self.format.as_deref() else {
            return false;
        };
        match self.document.get("legalities").and_then(|l| l.get(format)) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => s.eq_ignore_ascii_case("legal"),
            _ => false,
        }
    }
}

fn creator_name(value: &Value) -> Option<String> {
    let name = match value {
        Value::String(s) => Some(s.as_str()),
        Value::Object(map) => ["userName", "username", "displayName"]
            .iter()
            .find_map(|k| map.get(*k).and_then(Value::as_str)),
        _ => None,
    }?;
    let name = name.trim();
    (!name.is_empty()).then(|| name.to_string())
}

fn string_field(doc: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| doc.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn listing_total_prefers_meta() {
        let page: ListingPage = serde_json::from_value(json!({
            "data": [{"publicId": "a"}],
            "meta": {"total": 7},
            "totalResults": 9
        }))
        .unwrap();
        assert_eq!(page.total, Some(7));
        assert_eq!(page.data[0].public_id, "a");
    }

    #[test]
    fn listing_without_data_is_empty() {
        let page: ListingPage = serde_json::from_value(json!({"totalResults": 3})).unwrap();
        assert!(page.data.is_empty());
        assert_eq!(page.total, Some(3));
    }

    #[test]
    fn owner_comes_from_detail_object() {
        let summary = DeckSummary::new("d1");
        let deck = DeckRecord::from_detail(
            &summary,
            "alice",
            json!({"createdByUser": {"userName": "alice"}}),
            "Fallback",
        );
        assert_eq!(deck.owner, "alice");
    }

    #[test]
    fn owner_falls_back_to_summary_then_label() {
        let mut summary = DeckSummary::new("d1");
        summary.created_by_user = Some(json!("bob"));
        let deck = DeckRecord::from_detail(&summary, "s", json!({}), "Fallback");
        assert_eq!(deck.owner, "bob");

        let deck = DeckRecord::from_detail(
            &DeckSummary::new("d2"),
            "s",
            json!({"createdByUser": null}),
            "Fallback",
        );
        assert_eq!(deck.owner, "Fallback");
    }

    #[test]
    fn hub_names_are_merged() {
        let mut summary = DeckSummary::new("d1");
        summary.hub_names = Some(vec!["Commander Precons".into()]);
        let deck = DeckRecord::from_detail(
            &summary,
            "s",
            json!({"hubs": [{"name": "Commander Precons"}, {"name": "Budget"}]}),
            "F",
        );
        assert_eq!(deck.hub_names, vec!["Commander Precons", "Budget"]);
    }

    #[test]
    fn legality_checks_declared_format() {
        let summary = DeckSummary::new("d1");
        let legal = DeckRecord::from_detail(
            &summary,
            "s",
            json!({"format": "commander", "legalities": {"commander": "legal"}}),
            "F",
        );
        assert!(legal.is_legal_in_declared_format());

        let flagged = DeckRecord::from_detail(
            &summary,
            "s",
            json!({"format": "modern", "legalities": {"modern": false}}),
            "F",
        );
        assert!(!flagged.is_legal_in_declared_format());

        let absent = DeckRecord::from_detail(
            &summary,
            "s",
            json!({"format": "pauper", "legalities": {"modern": true}}),
            "F",
        );
        assert!(!absent.is_legal_in_declared_format());
    }
}
