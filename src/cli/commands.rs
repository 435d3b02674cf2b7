//! CLI command definitions.
//!
//! Each subcommand is one module: it takes an args file (the way an
//! orchestration engine invokes binary modules) and/or inline flags.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{
    CategorySpec, CategoryType, ConnectionArgs, DEFAULT_STATUS_ID, EntrySpec, ModelSpec,
    ResourceState,
};
use crate::error::{ConfigError, Result, SnipeError};

/// snipeit - Idempotent Snipe-IT resource modules.
#[derive(Parser, Debug)]
#[command(name = "snipeit")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose logging (to stderr).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (json, text).
    #[arg(long, global = true, default_value = "json")]
    pub output: OutputFormat,

    /// Look everything up but do not write; report what would change.
    #[arg(long, global = true)]
    pub check: bool,

    /// Connection settings.
    #[command(flatten)]
    pub connection: ConnectionFlags,

    /// Module to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection flags. Unset values fall back to the args file, then the
/// environment.
#[derive(Args, Debug, Default)]
pub struct ConnectionFlags {
    /// Base URL of the Snipe-IT instance.
    #[arg(long, global = true)]
    pub snipe_url: Option<String>,

    /// API token.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,
}

/// Available modules.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure a category exists (or does not).
    Category(CategoryFlags),

    /// Ensure an asset model exists (or does not).
    Model(ModelFlags),

    /// Ensure an inventory entry exists with the given model and status (or does not).
    Entry(EntryFlags),
}

/// Arguments of the category module.
#[derive(Args, Debug, Default)]
pub struct CategoryFlags {
    /// Module arguments file (JSON or YAML).
    pub args_file: Option<PathBuf>,

    /// Category name.
    #[arg(long)]
    pub name: Option<String>,

    /// Category type (asset, accessory, consumable, component).
    #[arg(long)]
    pub category_type: Option<CategoryType>,

    /// present or absent.
    #[arg(long)]
    pub state: Option<ResourceState>,
}

/// Arguments of the model module.
#[derive(Args, Debug, Default)]
pub struct ModelFlags {
    /// Module arguments file (JSON or YAML).
    pub args_file: Option<PathBuf>,

    /// Model name.
    #[arg(long)]
    pub name: Option<String>,

    /// Name of the asset category the model belongs to.
    #[arg(long)]
    pub category: Option<String>,

    /// Manufacturer id.
    #[arg(long)]
    pub manufacturer_id: Option<u64>,

    /// Model number.
    #[arg(long)]
    pub model_number: Option<String>,

    /// present or absent.
    #[arg(long)]
    pub state: Option<ResourceState>,
}

/// Arguments of the entry module.
#[derive(Args, Debug, Default)]
pub struct EntryFlags {
    /// Module arguments file (JSON or YAML).
    pub args_file: Option<PathBuf>,

    /// Asset tag.
    #[arg(long)]
    pub asset_tag: Option<String>,

    /// Status label id (defaults to 2, "Ready to Deploy").
    #[arg(long)]
    pub status_id: Option<u64>,

    /// Name of the model the entry is an instance of.
    #[arg(long)]
    pub model_name: Option<String>,

    /// Display name.
    #[arg(long)]
    pub name: Option<String>,

    /// Serial number.
    #[arg(long)]
    pub serial: Option<String>,

    /// present or absent.
    #[arg(long)]
    pub state: Option<ResourceState>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// One JSON result object, as modules are expected to print.
    #[default]
    Json,
    /// Human-readable text output.
    Text,
}

impl ConnectionFlags {
    /// Layers these flags over settings from an args file.
    #[must_use]
    pub fn over(self, base: ConnectionArgs) -> ConnectionArgs {
        ConnectionArgs {
            snipe_url: self.snipe_url.or(base.snipe_url),
            api_key: self.api_key.or(base.api_key),
            timeout_secs: self.timeout_secs.or(base.timeout_secs),
        }
    }
}

impl CategoryFlags {
    /// Builds the desired state, layering flags over an args-file `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing everywhere.
    pub fn into_spec(self, base: Option<CategorySpec>) -> Result<CategorySpec> {
        Ok(match base {
            Some(base) => CategorySpec {
                name: self.name.unwrap_or(base.name),
                category_type: self.category_type.unwrap_or(base.category_type),
                state: self.state.unwrap_or(base.state),
            },
            None => CategorySpec {
                name: required(self.name, "name")?,
                category_type: required(self.category_type, "category_type")?,
                state: self.state.unwrap_or_default(),
            },
        })
    }
}

impl ModelFlags {
    /// Builds the desired state, layering flags over an args-file `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing everywhere.
    pub fn into_spec(self, base: Option<ModelSpec>) -> Result<ModelSpec> {
        Ok(match base {
            Some(base) => ModelSpec {
                name: self.name.unwrap_or(base.name),
                category: self.category.or(base.category),
                manufacturer_id: self.manufacturer_id.or(base.manufacturer_id),
                model_number: self.model_number.or(base.model_number),
                state: self.state.unwrap_or(base.state),
            },
            None => ModelSpec {
                name: required(self.name, "name")?,
                category: self.category,
                manufacturer_id: self.manufacturer_id,
                model_number: self.model_number,
                state: self.state.unwrap_or_default(),
            },
        })
    }
}

impl EntryFlags {
    /// Builds the desired state, layering flags over an args-file `base`.
    ///
    /// # Errors
    ///
    /// Returns an error if a required argument is missing everywhere.
    pub fn into_spec(self, base: Option<EntrySpec>) -> Result<EntrySpec> {
        Ok(match base {
            Some(base) => EntrySpec {
                asset_tag: self.asset_tag.unwrap_or(base.asset_tag),
                status_id: self.status_id.unwrap_or(base.status_id),
                model_name: self.model_name.or(base.model_name),
                name: self.name.or(base.name),
                serial: self.serial.or(base.serial),
                state: self.state.unwrap_or(base.state),
            },
            None => EntrySpec {
                asset_tag: required(self.asset_tag, "asset_tag")?,
                status_id: self.status_id.unwrap_or(DEFAULT_STATUS_ID),
                model_name: self.model_name,
                name: self.name,
                serial: self.serial,
                state: self.state.unwrap_or_default(),
            },
        })
    }
}

fn required<T>(value: Option<T>, field: &str) -> Result<T> {
    value.ok_or_else(|| {
        SnipeError::Config(ConfigError::validation(
            format!("missing required argument: {field}"),
            field,
        ))
    })
}
