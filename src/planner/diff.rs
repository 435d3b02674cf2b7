//! Field-level diff between desired and remote state.
//!
//! Only attributes the caller actually supplied are compared. An omitted
//! optional argument means "don't care", never "clear it".

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{EntrySpec, ModelSpec};
use crate::snipeit::{Asset, FieldPatch, Model, NamedRef};

/// Engine for computing field diffs.
#[derive(Debug, Default)]
pub struct DiffEngine;

/// A single attribute that differs.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldChange {
    /// API field name, as sent in the update body.
    pub field: String,
    /// Value currently held by Snipe-IT (`null` if unset).
    pub current: Value,
    /// Value the caller asked for.
    pub desired: Value,
}

impl DiffEngine {
    /// Creates a new diff engine.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Compares an existing model against the desired state.
    ///
    /// `category_id` is the id the desired category name resolved to.
    #[must_use]
    pub fn diff_model(&self, existing: &Model, desired: &ModelSpec, category_id: u64) -> Vec<FieldChange> {
        let mut changes = Vec::new();

        compare(
            &mut changes,
            "category_id",
            ref_id(existing.category.as_ref()),
            Some(Value::from(category_id)),
        );
        compare(
            &mut changes,
            "manufacturer_id",
            ref_id(existing.manufacturer.as_ref()),
            desired.manufacturer_id.map(Value::from),
        );
        compare(
            &mut changes,
            "model_number",
            existing.model_number.clone().map(Value::from),
            desired.model_number.clone().map(Value::from),
        );

        debug!("Model '{}': {} field(s) differ", existing.name, changes.len());
        changes
    }

    /// Compares an existing asset against the desired state.
    ///
    /// `model_id` is the id the desired model name resolved to.
    #[must_use]
    pub fn diff_asset(&self, existing: &Asset, desired: &EntrySpec, model_id: u64) -> Vec<FieldChange> {
        let mut changes = Vec::new();

        compare(
            &mut changes,
            "model_id",
            ref_id(existing.model.as_ref()),
            Some(Value::from(model_id)),
        );
        compare(
            &mut changes,
            "status_id",
            ref_id(existing.status_label.as_ref()),
            Some(Value::from(desired.status_id)),
        );
        compare(
            &mut changes,
            "name",
            existing.name.clone().map(Value::from),
            desired.name.clone().map(Value::from),
        );
        compare(
            &mut changes,
            "serial",
            existing.serial.clone().map(Value::from),
            desired.serial.clone().map(Value::from),
        );

        debug!("Entry '{}': {} field(s) differ", existing.asset_tag, changes.len());
        changes
    }

    /// Builds the partial update body for a set of changes.
    #[must_use]
    pub fn to_patch(&self, changes: &[FieldChange]) -> FieldPatch {
        changes
            .iter()
            .map(|c| (c.field.clone(), c.desired.clone()))
            .collect()
    }
}

fn ref_id(reference: Option<&NamedRef>) -> Option<Value> {
    reference.map(|r| Value::from(r.id))
}

fn compare(changes: &mut Vec<FieldChange>, field: &str, current: Option<Value>, desired: Option<Value>) {
    let Some(desired) = desired else {
        return;
    };

    if current.as_ref() != Some(&desired) {
        changes.push(FieldChange {
            field: field.to_string(),
            current: current.unwrap_or(Value::Null),
            desired,
        });
    }
}
