//! Planning module for reconciliation.
//!
//! This module handles:
//! - Field-level diffs between desired and remote state
//! - The single action needed for one resource
//! - Carrying that action out against the inventory API

mod diff;
mod plan;
mod executor;

pub use diff::{DiffEngine, FieldChange};
pub use plan::{ActionType, PlannedAction, ReconcilePlan, ResourceKind};
pub use executor::{ExecutionResult, PlanExecutor};
