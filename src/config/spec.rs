//! Module argument types.
//!
//! These structs map the key/value arguments an orchestration engine hands
//! to a module (usually as a JSON args file) onto the desired state of one
//! Snipe-IT resource.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Default status label for new assets ("Ready to Deploy" on a fresh instance).
pub const DEFAULT_STATUS_ID: u64 = 2;

/// Arguments for a single module invocation.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModuleArgs<T> {
    /// Connection settings (may be completed from the environment).
    #[serde(flatten)]
    pub connection: ConnectionArgs,
    /// Desired state of the resource.
    #[serde(flatten)]
    pub resource: T,
    /// Look things up but never write.
    #[serde(default)]
    pub check_mode: Option<bool>,
    /// Check-mode flag set by the orchestration engine on every invocation.
    #[serde(default, rename = "_ansible_check_mode")]
    pub engine_check_mode: Option<bool>,
    /// Module-level alias of `check_mode`.
    #[serde(default)]
    pub dry_run: Option<bool>,
}

impl<T> ModuleArgs<T> {
    /// Returns true if any of the check-mode flags is set.
    #[must_use]
    pub fn is_check_mode(&self) -> bool {
        [self.check_mode, self.engine_check_mode, self.dry_run]
            .into_iter()
            .any(|flag| flag == Some(true))
    }
}

/// Connection settings as supplied by the caller.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ConnectionArgs {
    /// Base URL of the Snipe-IT instance.
    #[serde(default)]
    pub snipe_url: Option<String>,
    /// API token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Request timeout in seconds.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Fully resolved connection settings.
#[derive(Clone, PartialEq, Eq)]
pub struct Connection {
    /// Base URL of the Snipe-IT instance.
    pub snipe_url: String,
    /// API token.
    pub api_key: String,
    /// Request timeout in seconds, if overridden.
    pub timeout_secs: Option<u64>,
}

// The token must never end up in logs.
impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("snipe_url", &self.snipe_url)
            .field("api_key", &"********")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Whether the resource should exist.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    /// Ensure the resource exists and matches.
    #[default]
    Present,
    /// Ensure the resource does not exist.
    Absent,
}

impl std::str::FromStr for ResourceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "present" => Ok(Self::Present),
            "absent" => Ok(Self::Absent),
            other => Err(format!("value of state must be one of: present, absent, got: {other}")),
        }
    }
}

/// Category types known to Snipe-IT.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CategoryType {
    /// Hardware assets.
    Asset,
    /// Accessories.
    Accessory,
    /// Consumables.
    Consumable,
    /// Components.
    Component,
}

impl CategoryType {
    /// Returns the lowercase API name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asset => "asset",
            Self::Accessory => "accessory",
            Self::Consumable => "consumable",
            Self::Component => "component",
        }
    }

    /// Checks a value reported by the API. Snipe-IT capitalizes it in
    /// responses ("Asset") while accepting lowercase on input.
    #[must_use]
    pub fn matches(self, reported: &str) -> bool {
        reported.eq_ignore_ascii_case(self.as_str())
    }
}

impl fmt::Display for CategoryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asset" => Ok(Self::Asset),
            "accessory" => Ok(Self::Accessory),
            "consumable" => Ok(Self::Consumable),
            "component" => Ok(Self::Component),
            other => Err(format!(
                "value of category_type must be one of: asset, accessory, consumable, component, got: {other}"
            )),
        }
    }
}

/// Desired state of a category. `(name, category_type)` is the natural key.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CategorySpec {
    /// Category name, unique within its type.
    pub name: String,
    /// Category type.
    pub category_type: CategoryType,
    /// Present or absent.
    #[serde(default)]
    pub state: ResourceState,
}

/// Desired state of an asset model. `name` is the natural key.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ModelSpec {
    /// Model name.
    pub name: String,
    /// Name of the asset-type category the model belongs to.
    #[serde(default)]
    pub category: Option<String>,
    /// Manufacturer id.
    #[serde(default)]
    pub manufacturer_id: Option<u64>,
    /// Model number.
    #[serde(default)]
    pub model_number: Option<String>,
    /// Present or absent.
    #[serde(default)]
    pub state: ResourceState,
}

/// Desired state of an inventory entry (hardware asset). `asset_tag` is the
/// natural key.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EntrySpec {
    /// Asset tag.
    pub asset_tag: String,
    /// Status label id.
    #[serde(default = "default_status_id")]
    pub status_id: u64,
    /// Name of the model the asset is an instance of.
    #[serde(default)]
    pub model_name: Option<String>,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Optional serial number.
    #[serde(default)]
    pub serial: Option<String>,
    /// Present or absent.
    #[serde(default)]
    pub state: ResourceState,
}

/// Desired state of any supported resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceSpec {
    /// A category.
    Category(CategorySpec),
    /// An asset model.
    Model(ModelSpec),
    /// An inventory entry.
    Entry(EntrySpec),
}

impl ResourceSpec {
    /// Returns the natural key used for lookups.
    #[must_use]
    pub fn natural_key(&self) -> String {
        match self {
            Self::Category(c) => format!("{}/{}", c.category_type, c.name),
            Self::Model(m) => m.name.clone(),
            Self::Entry(e) => e.asset_tag.clone(),
        }
    }

    /// Returns the requested state.
    #[must_use]
    pub const fn state(&self) -> ResourceState {
        match self {
            Self::Category(c) => c.state,
            Self::Model(m) => m.state,
            Self::Entry(e) => e.state,
        }
    }
}

impl From<CategorySpec> for ResourceSpec {
    fn from(spec: CategorySpec) -> Self {
        Self::Category(spec)
    }
}

impl From<ModelSpec> for ResourceSpec {
    fn from(spec: ModelSpec) -> Self {
        Self::Model(spec)
    }
}

impl From<EntrySpec> for ResourceSpec {
    fn from(spec: EntrySpec) -> Self {
        Self::Entry(spec)
    }
}

const fn default_status_id() -> u64 {
    DEFAULT_STATUS_ID
}
