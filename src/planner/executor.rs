//! Plan executor.
//!
//! Carries out a reconciliation plan with at most one write call. In check
//! mode nothing is written and the would-be outcome is reported instead.

use tracing::{debug, info};

use crate::error::{Result, SnipeError};
use crate::snipeit::InventoryApi;

use super::diff::DiffEngine;
use super::plan::{PlannedAction, ReconcilePlan, ResourceKind};

/// Executor for reconciliation plans.
pub struct PlanExecutor<'a, A: InventoryApi + ?Sized> {
    /// Inventory API.
    api: &'a A,
    /// Skip writes.
    check_mode: bool,
    /// Builds update bodies.
    diff_engine: DiffEngine,
}

/// Outcome of executing a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Whether the remote system was (or would have been) changed.
    pub changed: bool,
    /// Id of the resource after execution, if it exists.
    pub id: Option<u64>,
    /// Whether a write call was issued.
    pub wrote: bool,
}

impl<'a, A: InventoryApi + ?Sized> PlanExecutor<'a, A> {
    /// Creates a new executor.
    #[must_use]
    pub const fn new(api: &'a A) -> Self {
        Self {
            api,
            check_mode: false,
            diff_engine: DiffEngine::new(),
        }
    }

    /// Enables or disables check mode.
    #[must_use]
    pub const fn with_check_mode(mut self, check_mode: bool) -> Self {
        self.check_mode = check_mode;
        self
    }

    /// Executes a plan.
    ///
    /// # Errors
    ///
    /// Returns an error if the write call fails.
    pub async fn execute(&self, plan: &ReconcilePlan) -> Result<ExecutionResult> {
        if !plan.is_change() {
            debug!("Nothing to do for {} '{}'", plan.kind, plan.key);
            return Ok(ExecutionResult {
                changed: false,
                id: plan.existing_id(),
                wrote: false,
            });
        }

        if self.check_mode {
            info!("Check mode, skipping: {plan}");
            let id = match plan.action {
                PlannedAction::Update { id, .. } => Some(id),
                _ => None,
            };
            return Ok(ExecutionResult {
                changed: true,
                id,
                wrote: false,
            });
        }

        info!("Executing: {plan}");

        let id = match &plan.action {
            PlannedAction::CreateCategory(request) => Some(self.api.create_category(request).await?),
            PlannedAction::CreateModel(request) => Some(self.api.create_model(request).await?),
            PlannedAction::CreateAsset(request) => Some(self.api.create_asset(request).await?),
            PlannedAction::Update { id, changes } => {
                let patch = self.diff_engine.to_patch(changes);
                match plan.kind {
                    ResourceKind::Model => self.api.update_model(*id, &patch).await?,
                    ResourceKind::Entry => self.api.update_asset(*id, &patch).await?,
                    ResourceKind::Category => {
                        return Err(SnipeError::internal("categories have no updatable fields"));
                    }
                }
                Some(*id)
            }
            PlannedAction::Delete { id } => {
                match plan.kind {
                    ResourceKind::Category => self.api.delete_category(*id).await?,
                    ResourceKind::Model => self.api.delete_model(*id).await?,
                    ResourceKind::Entry => self.api.delete_asset(*id).await?,
                }
                None
            }
            PlannedAction::NoChange { id } => *id,
        };

        if let Some(id) = id {
            info!("{} '{}' is now id {id}", plan.kind, plan.key);
        } else {
            info!("{} '{}' removed", plan.kind, plan.key);
        }

        Ok(ExecutionResult {
            changed: true,
            id,
            wrote: true,
        })
    }
}
