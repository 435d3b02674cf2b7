//! In-memory Snipe-IT used by reconciliation tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::config::CategoryType;
use crate::error::{ApiError, Result};

use super::api::InventoryApi;
use super::types::{Asset, Category, FieldPatch, Model, NamedRef, NewAsset, NewCategory, NewModel};

#[derive(Debug, Default)]
struct Store {
    next_id: u64,
    categories: Vec<Category>,
    models: Vec<Model>,
    assets: Vec<Asset>,
    writes: usize,
}

impl Store {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.writes += 1;
        self.next_id
    }
}

/// A stateful fake that behaves like a small Snipe-IT instance.
#[derive(Debug, Default)]
pub struct FakeInventory {
    store: Mutex<Store>,
}

impl FakeInventory {
    /// Creates an empty inventory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a category. Seeding does not count as a write.
    pub fn with_category(self, name: &str, category_type: CategoryType) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            let id = store.allocate();
            store.writes = 0;
            store.categories.push(Category {
                id,
                name: name.to_string(),
                category_type: Some(capitalize(category_type.as_str())),
            });
        }
        self
    }

    /// Seeds a model in the given category.
    pub fn with_model(self, name: &str, category_id: u64) -> Self {
        {
            let mut store = self.store.lock().unwrap();
            let id = store.allocate();
            store.writes = 0;
            store.models.push(Model {
                id,
                name: name.to_string(),
                category: Some(NamedRef { id: category_id, name: None }),
                manufacturer: None,
                model_number: None,
            });
        }
        self
    }

    /// Number of create/update/delete calls served so far.
    pub fn writes(&self) -> usize {
        self.store.lock().unwrap().writes
    }

    /// Returns the stored asset with this tag.
    pub fn asset(&self, asset_tag: &str) -> Option<Asset> {
        self.store
            .lock()
            .unwrap()
            .assets
            .iter()
            .find(|a| a.asset_tag == asset_tag)
            .cloned()
    }

    /// Returns the id of the category with this exact name.
    pub fn category_id(&self, name: &str) -> Option<u64> {
        self.store
            .lock()
            .unwrap()
            .categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    chars
        .next()
        .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
        .unwrap_or_default()
}

fn not_found(what: &str, id: u64) -> crate::error::SnipeError {
    ApiError::validation(format!("updating {what}"), format!("{what} {id} not found")).into()
}

#[async_trait]
impl InventoryApi for FakeInventory {
    async fn find_categories(&self, name: &str, category_type: CategoryType) -> Result<Vec<Category>> {
        let store = self.store.lock().unwrap();
        // Like the real server, the name filter is a substring match.
        Ok(store
            .categories
            .iter()
            .filter(|c| c.name.contains(name))
            .filter(|c| c.category_type.as_deref().is_some_and(|t| category_type.matches(t)))
            .cloned()
            .collect())
    }

    async fn find_models(&self, name: &str) -> Result<Vec<Model>> {
        let store = self.store.lock().unwrap();
        Ok(store.models.iter().filter(|m| m.name.contains(name)).cloned().collect())
    }

    async fn find_asset_by_tag(&self, asset_tag: &str) -> Result<Option<Asset>> {
        Ok(self.asset(asset_tag))
    }

    async fn create_category(&self, request: &NewCategory) -> Result<u64> {
        let mut store = self.store.lock().unwrap();
        let id = store.allocate();
        store.categories.push(Category {
            id,
            name: request.name.clone(),
            category_type: Some(capitalize(request.category_type.as_str())),
        });
        Ok(id)
    }

    async fn create_model(&self, request: &NewModel) -> Result<u64> {
        let mut store = self.store.lock().unwrap();
        let id = store.allocate();
        store.models.push(Model {
            id,
            name: request.name.clone(),
            category: Some(NamedRef { id: request.category_id, name: None }),
            manufacturer: request.manufacturer_id.map(|id| NamedRef { id, name: None }),
            model_number: request.model_number.clone(),
        });
        Ok(id)
    }

    async fn create_asset(&self, request: &NewAsset) -> Result<u64> {
        let mut store = self.store.lock().unwrap();
        let id = store.allocate();
        store.assets.push(Asset {
            id,
            asset_tag: request.asset_tag.clone(),
            name: request.name.clone(),
            serial: request.serial.clone(),
            model: Some(NamedRef { id: request.model_id, name: None }),
            status_label: Some(NamedRef { id: request.status_id, name: None }),
        });
        Ok(id)
    }

    async fn update_model(&self, id: u64, patch: &FieldPatch) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.writes += 1;
        let model = store
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| not_found("model", id))?;

        for (field, value) in patch {
            match field.as_str() {
                "category_id" => model.category = value.as_u64().map(|id| NamedRef { id, name: None }),
                "manufacturer_id" => {
                    model.manufacturer = value.as_u64().map(|id| NamedRef { id, name: None });
                }
                "model_number" => model.model_number = value.as_str().map(String::from),
                _ => {}
            }
        }
        Ok(())
    }

    async fn update_asset(&self, id: u64, patch: &FieldPatch) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.writes += 1;
        let asset = store
            .assets
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| not_found("entry", id))?;

        for (field, value) in patch {
            match field.as_str() {
                "model_id" => asset.model = value.as_u64().map(|id| NamedRef { id, name: None }),
                "status_id" => asset.status_label = value.as_u64().map(|id| NamedRef { id, name: None }),
                "name" => asset.name = value.as_str().map(String::from),
                "serial" => asset.serial = value.as_str().map(String::from),
                _ => {}
            }
        }
        Ok(())
    }

    async fn delete_category(&self, id: u64) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.writes += 1;
        store.categories.retain(|c| c.id != id);
        Ok(())
    }

    async fn delete_model(&self, id: u64) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.writes += 1;
        store.models.retain(|m| m.id != id);
        Ok(())
    }

    async fn delete_asset(&self, id: u64) -> Result<()> {
        let mut store = self.store.lock().unwrap();
        store.writes += 1;
        store.assets.retain(|a| a.id != id);
        Ok(())
    }
}
