//! Reconciler for Snipe-IT resources.
//!
//! This module looks a resource up by its natural key, decides the one
//! action that brings it in line with the desired state, and carries it
//! out. Running it twice with the same input changes nothing the second
//! time.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::{
    CategorySpec, CategoryType, EntrySpec, ModelSpec, ResourceSpec, ResourceState,
};
use crate::error::{ConfigError, ReconcileError, Result, SnipeError};
use crate::planner::{
    ActionType, DiffEngine, FieldChange, PlanExecutor, PlannedAction, ReconcilePlan, ResourceKind,
};
use crate::snipeit::{Asset, Category, InventoryApi, Model, NewAsset, NewCategory, NewModel};

/// Reconciler for Snipe-IT resources.
pub struct Reconciler<'a, A: InventoryApi + ?Sized> {
    /// Inventory API.
    api: &'a A,
    /// Diff engine.
    diff_engine: DiffEngine,
    /// Look up but never write.
    check_mode: bool,
}

/// Result of a reconciliation run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ReconciliationResult {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Natural key of the resource.
    pub key: String,
    /// Whether the remote system was (or in check mode would have been) changed.
    pub changed: bool,
    /// Id of the resource afterwards, if it exists.
    pub id: Option<u64>,
    /// Action taken.
    pub action: ActionType,
    /// Fields updated.
    pub changes: Vec<FieldChange>,
    /// Whether this was a check-mode run.
    pub check_mode: bool,
    /// When reconciliation finished.
    pub completed_at: DateTime<Utc>,
}

impl<'a, A: InventoryApi + ?Sized> Reconciler<'a, A> {
    /// Creates a new reconciler.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            diff_engine: DiffEngine::new(),
            check_mode: false,
        }
    }

    /// Enables or disables check mode.
    #[must_use]
    pub const fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Brings the remote resource in line with `spec`.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup or write fails, if the natural key is
    /// ambiguous, or if a referenced parent does not exist.
    pub async fn reconcile(&self, spec: &ResourceSpec) -> Result<ReconciliationResult> {
        info!("Reconciling {} (state: {:?})", spec.natural_key(), spec.state());

        let plan = self.plan(spec).await?;

        let executor = PlanExecutor::new(self.api).with_check_mode(self.check_mode);
        let outcome = executor.execute(&plan).await?;

        Ok(ReconciliationResult {
            kind: plan.kind,
            key: plan.key.clone(),
            changed: outcome.changed,
            id: outcome.id,
            action: plan.action_type(),
            changes: plan.changes().to_vec(),
            check_mode: self.check_mode,
            completed_at: Utc::now(),
        })
    }

    /// Computes the plan for `spec` without writing anything.
    ///
    /// # Errors
    ///
    /// Returns an error if a lookup fails, if the natural key is ambiguous,
    /// or if a referenced parent does not exist.
    pub async fn plan(&self, spec: &ResourceSpec) -> Result<ReconcilePlan> {
        let plan = match spec {
            ResourceSpec::Category(category) => self.plan_category(category).await?,
            ResourceSpec::Model(model) => self.plan_model(model).await?,
            ResourceSpec::Entry(entry) => self.plan_entry(entry).await?,
        };

        debug!("Planned: {plan}");
        Ok(plan)
    }

    async fn plan_category(&self, spec: &CategorySpec) -> Result<ReconcilePlan> {
        let existing = self.find_category(&spec.name, spec.category_type).await?;

        // Name and type are the whole attribute set, so a match never needs an update.
        let action = match (spec.state, existing) {
            (ResourceState::Present, Some(category)) => PlannedAction::NoChange {
                id: Some(category.id),
            },
            (ResourceState::Present, None) => PlannedAction::CreateCategory(NewCategory {
                name: spec.name.clone(),
                category_type: spec.category_type,
            }),
            (ResourceState::Absent, Some(category)) => PlannedAction::Delete { id: category.id },
            (ResourceState::Absent, None) => PlannedAction::NoChange { id: None },
        };

        Ok(ReconcilePlan::new(
            ResourceKind::Category,
            format!("{}/{}", spec.category_type, spec.name),
            action,
        ))
    }

    async fn plan_model(&self, spec: &ModelSpec) -> Result<ReconcilePlan> {
        let existing = self.find_model(&spec.name).await?;

        if spec.state == ResourceState::Absent {
            return Ok(ReconcilePlan::new(
                ResourceKind::Model,
                spec.name.clone(),
                absent_action(existing.map(|m| m.id)),
            ));
        }

        let category_name = spec.category.as_deref().ok_or_else(|| {
            ConfigError::validation("category is required when state is present", "category")
        })?;

        // Models can only belong to asset categories.
        let category = self
            .find_category(category_name, CategoryType::Asset)
            .await?
            .ok_or_else(|| ReconcileError::ParentNotFound {
                kind: String::from("Category"),
                name: category_name.to_string(),
            })?;

        let action = match existing {
            None => PlannedAction::CreateModel(NewModel {
                name: spec.name.clone(),
                category_id: category.id,
                manufacturer_id: spec.manufacturer_id,
                model_number: spec.model_number.clone(),
            }),
            Some(model) => {
                let changes = self.diff_engine.diff_model(&model, spec, category.id);
                update_or_keep(model.id, changes)
            }
        };

        Ok(ReconcilePlan::new(ResourceKind::Model, spec.name.clone(), action))
    }

    async fn plan_entry(&self, spec: &EntrySpec) -> Result<ReconcilePlan> {
        let existing: Option<Asset> = self.api.find_asset_by_tag(&spec.asset_tag).await?;

        if spec.state == ResourceState::Absent {
            return Ok(ReconcilePlan::new(
                ResourceKind::Entry,
                spec.asset_tag.clone(),
                absent_action(existing.map(|a| a.id)),
            ));
        }

        let model_name = spec.model_name.as_deref().ok_or_else(|| {
            ConfigError::validation("model_name is required when state is present", "model_name")
        })?;

        let model = self
            .find_model(model_name)
            .await?
            .ok_or_else(|| ReconcileError::ParentNotFound {
                kind: String::from("Model"),
                name: model_name.to_string(),
            })?;

        let action = match existing {
            None => PlannedAction::CreateAsset(NewAsset {
                asset_tag: spec.asset_tag.clone(),
                status_id: spec.status_id,
                model_id: model.id,
                name: spec.name.clone(),
                serial: spec.serial.clone(),
            }),
            Some(asset) => {
                let changes = self.diff_engine.diff_asset(&asset, spec, model.id);
                update_or_keep(asset.id, changes)
            }
        };

        Ok(ReconcilePlan::new(ResourceKind::Entry, spec.asset_tag.clone(), action))
    }

    /// Finds the category with exactly this name and type.
    async fn find_category(&self, name: &str, category_type: CategoryType) -> Result<Option<Category>> {
        let rows = self.api.find_categories(name, category_type).await?;

        let matches: Vec<Category> = rows
            .into_iter()
            .filter(|c| same_name(&c.name, name))
            .filter(|c| c.category_type.as_deref().is_none_or(|t| category_type.matches(t)))
            .collect();

        single(ResourceKind::Category, &format!("{category_type}/{name}"), matches)
    }

    /// Finds the model with exactly this name.
    async fn find_model(&self, name: &str) -> Result<Option<Model>> {
        let rows = self.api.find_models(name).await?;

        let matches: Vec<Model> = rows
            .into_iter()
            .filter(|m| same_name(&m.name, name))
            .collect();

        single(ResourceKind::Model, name, matches)
    }
}

/// Snipe-IT stores names under a case-insensitive collation.
fn same_name(remote: &str, desired: &str) -> bool {
    remote.trim().eq_ignore_ascii_case(desired.trim())
}

fn single<T>(kind: ResourceKind, key: &str, mut matches: Vec<T>) -> Result<Option<T>> {
    match matches.len() {
        0 | 1 => Ok(matches.pop()),
        count => Err(SnipeError::Reconcile(ReconcileError::AmbiguousLookup {
            kind: kind.to_string(),
            key: key.to_string(),
            count,
        })),
    }
}

const fn absent_action(existing_id: Option<u64>) -> PlannedAction {
    match existing_id {
        Some(id) => PlannedAction::Delete { id },
        None => PlannedAction::NoChange { id: None },
    }
}

fn update_or_keep(id: u64, changes: Vec<FieldChange>) -> PlannedAction {
    if changes.is_empty() {
        PlannedAction::NoChange { id: Some(id) }
    } else {
        PlannedAction::Update { id, changes }
    }
}

impl std::fmt::Display for ReconciliationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.changed { "changed" } else { "ok" };
        write!(f, "{status}: {} {} '{}'", self.action, self.kind, self.key)?;

        if let Some(id) = self.id {
            write!(f, " (id {id})")?;
        }
        if self.check_mode {
            write!(f, " [check mode]")?;
        }

        Ok(())
    }
}
