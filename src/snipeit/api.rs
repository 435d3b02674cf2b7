//! The inventory API seam.
//!
//! Reconciliation only talks to Snipe-IT through this trait, so it can run
//! against a fake in tests.

use async_trait::async_trait;

use crate::config::CategoryType;
use crate::error::Result;

use super::types::{Asset, Category, FieldPatch, Model, NewAsset, NewCategory, NewModel};

/// Operations on Snipe-IT resource collections.
///
/// Lookups return the rows the server considered a match. Callers narrow
/// them to exact natural-key matches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InventoryApi: Send + Sync {
    /// Lists categories matching a name within a category type.
    async fn find_categories(&self, name: &str, category_type: CategoryType) -> Result<Vec<Category>>;

    /// Lists models matching a name.
    async fn find_models(&self, name: &str) -> Result<Vec<Model>>;

    /// Fetches the asset with the given tag, if it exists.
    async fn find_asset_by_tag(&self, asset_tag: &str) -> Result<Option<Asset>>;

    /// Creates a category and returns its id.
    async fn create_category(&self, request: &NewCategory) -> Result<u64>;

    /// Creates a model and returns its id.
    async fn create_model(&self, request: &NewModel) -> Result<u64>;

    /// Creates a hardware asset and returns its id.
    async fn create_asset(&self, request: &NewAsset) -> Result<u64>;

    /// Applies a partial update to a model.
    async fn update_model(&self, id: u64, patch: &FieldPatch) -> Result<()>;

    /// Applies a partial update to a hardware asset.
    async fn update_asset(&self, id: u64, patch: &FieldPatch) -> Result<()>;

    /// Deletes a category.
    async fn delete_category(&self, id: u64) -> Result<()>;

    /// Deletes a model.
    async fn delete_model(&self, id: u64) -> Result<()>;

    /// Deletes a hardware asset.
    async fn delete_asset(&self, id: u64) -> Result<()>;
}
