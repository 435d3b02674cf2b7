//! Snipe-IT API integration module.
//!
//! This module provides the `InventoryApi` seam used by reconciliation and
//! its HTTP implementation for the Snipe-IT REST API.

mod api;
mod client;
mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use api::InventoryApi;
#[cfg(test)]
pub(crate) use api::MockInventoryApi;
pub use client::SnipeItClient;
pub use types::{
    Asset, Category, FieldPatch, ListResponse, Model, NamedRef, NewAsset, NewCategory, NewModel,
    WriteResponse, render_messages, unescape_html,
};
