//! Reconciliation plans.
//!
//! A plan is the single action needed to bring one remote resource in line
//! with its desired state, decided from lookups alone.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

use crate::snipeit::{NewAsset, NewCategory, NewModel};

use super::diff::FieldChange;

/// Kind of Snipe-IT resource being reconciled.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// A category.
    Category,
    /// An asset model.
    Model,
    /// An inventory entry (hardware asset).
    Entry,
}

impl ResourceKind {
    /// Key under which the resulting id is reported to the caller.
    #[must_use]
    pub const fn id_field(self) -> &'static str {
        match self {
            Self::Category => "category_id",
            Self::Model => "model_id",
            Self::Entry => "asset_id",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "category"),
            Self::Model => write!(f, "model"),
            Self::Entry => write!(f, "entry"),
        }
    }
}

/// Type of action.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Create a new resource.
    Create,
    /// Update differing fields of an existing resource.
    Update,
    /// Delete an existing resource.
    Delete,
    /// Nothing to do.
    NoChange,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Create => write!(f, "CREATE"),
            Self::Update => write!(f, "UPDATE"),
            Self::Delete => write!(f, "DELETE"),
            Self::NoChange => write!(f, "NO CHANGE"),
        }
    }
}

/// The action a plan will carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannedAction {
    /// Create a category.
    CreateCategory(NewCategory),
    /// Create a model.
    CreateModel(NewModel),
    /// Create a hardware asset.
    CreateAsset(NewAsset),
    /// Patch the differing fields of an existing resource.
    Update {
        /// Remote id.
        id: u64,
        /// Fields that differ.
        changes: Vec<FieldChange>,
    },
    /// Delete an existing resource.
    Delete {
        /// Remote id.
        id: u64,
    },
    /// Leave things as they are.
    NoChange {
        /// Remote id, if the resource exists.
        id: Option<u64>,
    },
}

/// A reconciliation plan for one resource.
#[derive(Debug, Clone)]
pub struct ReconcilePlan {
    /// Resource kind.
    pub kind: ResourceKind,
    /// Natural key that was looked up.
    pub key: String,
    /// What to do.
    pub action: PlannedAction,
    /// When the plan was computed.
    pub created_at: DateTime<Utc>,
}

impl ReconcilePlan {
    /// Creates a new plan.
    #[must_use]
    pub fn new(kind: ResourceKind, key: impl Into<String>, action: PlannedAction) -> Self {
        Self {
            kind,
            key: key.into(),
            action,
            created_at: Utc::now(),
        }
    }

    /// Returns the type of the planned action.
    #[must_use]
    pub const fn action_type(&self) -> ActionType {
        match &self.action {
            PlannedAction::CreateCategory(_)
            | PlannedAction::CreateModel(_)
            | PlannedAction::CreateAsset(_) => ActionType::Create,
            PlannedAction::Update { .. } => ActionType::Update,
            PlannedAction::Delete { .. } => ActionType::Delete,
            PlannedAction::NoChange { .. } => ActionType::NoChange,
        }
    }

    /// Returns true if carrying out the plan changes the remote system.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self.action, PlannedAction::NoChange { .. })
    }

    /// Returns the id of the remote resource the plan acts on, if it exists.
    #[must_use]
    pub const fn existing_id(&self) -> Option<u64> {
        match &self.action {
            PlannedAction::Update { id, .. } | PlannedAction::Delete { id } => Some(*id),
            PlannedAction::NoChange { id } => *id,
            _ => None,
        }
    }

    /// Returns the field changes of an update plan.
    #[must_use]
    pub fn changes(&self) -> &[FieldChange] {
        match &self.action {
            PlannedAction::Update { changes, .. } => changes,
            _ => &[],
        }
    }
}

impl fmt::Display for ReconcilePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} '{}'", self.action_type(), self.kind, self.key)?;
        if let Some(id) = self.existing_id() {
            write!(f, " (id {id})")?;
        }
        Ok(())
    }
}
