//! Snipe-IT API types.
//!
//! Only the fields reconciliation reads are modelled; everything else in the
//! (large) Snipe-IT payloads is ignored.
//!
//! Snipe-IT HTML-escapes every string it returns (`R&D` comes back as
//! `R&amp;D`), so text fields are unescaped while deserializing.

use serde::{Deserialize, Deserializer, Serialize};

use crate::config::CategoryType;

/// A `{ "id": .., "name": .. }` reference embedded in other records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NamedRef {
    /// Referenced record id.
    pub id: u64,
    /// Referenced record name.
    #[serde(default, deserialize_with = "unescaped_opt")]
    pub name: Option<String>,
}

/// A category record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    /// Server-assigned id.
    pub id: u64,
    /// Category name.
    #[serde(deserialize_with = "unescaped")]
    pub name: String,
    /// Category type as reported by the API (e.g. "Asset").
    #[serde(default)]
    pub category_type: Option<String>,
}

/// An asset model record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Model {
    /// Server-assigned id.
    pub id: u64,
    /// Model name.
    #[serde(deserialize_with = "unescaped")]
    pub name: String,
    /// Owning category.
    #[serde(default)]
    pub category: Option<NamedRef>,
    /// Manufacturer.
    #[serde(default)]
    pub manufacturer: Option<NamedRef>,
    /// Model number.
    #[serde(default, deserialize_with = "unescaped_opt")]
    pub model_number: Option<String>,
}

/// A hardware asset record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Asset {
    /// Server-assigned id.
    pub id: u64,
    /// Asset tag.
    #[serde(deserialize_with = "unescaped")]
    pub asset_tag: String,
    /// Display name.
    #[serde(default, deserialize_with = "unescaped_opt")]
    pub name: Option<String>,
    /// Serial number.
    #[serde(default, deserialize_with = "unescaped_opt")]
    pub serial: Option<String>,
    /// Model the asset is an instance of.
    #[serde(default)]
    pub model: Option<NamedRef>,
    /// Current status label.
    #[serde(default)]
    pub status_label: Option<NamedRef>,
}

/// Paged list response: `{ "total": n, "rows": [...] }`.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    /// Total number of matches on the server.
    pub total: u64,
    /// Returned rows.
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

/// Envelope returned by write endpoints.
#[derive(Debug, Deserialize)]
pub struct WriteResponse {
    /// "success" or "error".
    pub status: String,
    /// Human-readable message(s): a string or a field → messages map.
    #[serde(default)]
    pub messages: serde_json::Value,
    /// The written record, when there is one.
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl WriteResponse {
    /// Returns true if the envelope reports success.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status.eq_ignore_ascii_case("success")
    }

    /// Returns the id of the written record, if the payload carries one.
    #[must_use]
    pub fn payload_id(&self) -> Option<u64> {
        self.payload
            .as_ref()
            .and_then(|p| p.get("id"))
            .and_then(serde_json::Value::as_u64)
    }
}

/// Request body for creating a category.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewCategory {
    /// Category name.
    pub name: String,
    /// Category type.
    pub category_type: CategoryType,
}

/// Request body for creating a model.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewModel {
    /// Model name.
    pub name: String,
    /// Owning category id.
    pub category_id: u64,
    /// Manufacturer id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<u64>,
    /// Model number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_number: Option<String>,
}

/// Request body for creating a hardware asset.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NewAsset {
    /// Asset tag.
    pub asset_tag: String,
    /// Status label id.
    pub status_id: u64,
    /// Model id.
    pub model_id: u64,
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Serial number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
}

/// Partial update body: only the fields that change.
pub type FieldPatch = serde_json::Map<String, serde_json::Value>;

/// Flattens Snipe-IT `messages` into a single line.
///
/// Validation failures come back as `{"field": ["msg", ..], ..}`, other
/// failures as a plain string.
#[must_use]
pub fn render_messages(messages: &serde_json::Value) -> String {
    use serde_json::Value;

    match messages {
        Value::Null => String::from("no message"),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render_messages).collect::<Vec<_>>().join(", "),
        Value::Object(map) => map
            .iter()
            .map(|(field, msgs)| format!("{field}: {}", render_messages(msgs)))
            .collect::<Vec<_>>()
            .join("; "),
        other => other.to_string(),
    }
}

/// Reverses the HTML escaping Snipe-IT applies to returned strings.
#[must_use]
pub fn unescape_html(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    // `&amp;` last, so `&amp;lt;` stays a literal `&lt;`.
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn unescaped<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|s| unescape_html(&s))
}

fn unescaped_opt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<String>::deserialize(deserializer).map(|s| s.map(|s| unescape_html(&s)))
}
