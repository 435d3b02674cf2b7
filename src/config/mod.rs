//! Module argument handling.
//!
//! This module handles everything about the caller's input:
//! - Types describing the desired state of each resource kind
//! - Loading arguments from JSON/YAML files and the environment
//! - Validation the type system cannot express

mod spec;
mod parser;
mod validator;

pub use spec::{
    CategorySpec, CategoryType, Connection, ConnectionArgs, DEFAULT_STATUS_ID, EntrySpec,
    ModelSpec, ModuleArgs, ResourceSpec, ResourceState,
};
pub use parser::{ArgsParser, ENV_API_KEY, ENV_SNIPE_URL, ENV_TIMEOUT_SECS};
pub use validator::ArgsValidator;
