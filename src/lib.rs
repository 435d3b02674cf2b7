// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// Tests may unwrap and panic freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Snipe-IT Reconcile
//!
//! Idempotent, declarative management of Snipe-IT inventory resources.
//!
//! ## Overview
//!
//! Each module takes the desired state of one resource and makes the
//! Snipe-IT instance match it:
//!
//! - **Categories**, keyed by name and category type
//! - **Models**, keyed by name, belonging to an asset category
//! - **Entries** (hardware assets), keyed by asset tag, instances of a model
//!
//! Running a module twice with the same arguments reports `changed: true`
//! the first time and `changed: false` the second.
//!
//! ## Architecture
//!
//! 1. **Desired State**: module arguments (args file or flags)
//! 2. **Observed State**: looked up by natural key through the REST API
//! 3. **Reconciler**: plans the single create, update or delete and runs it
//!
//! ## Modules
//!
//! - [`config`]: Module arguments, parsing and validation
//! - [`snipeit`]: Snipe-IT REST client and the [`snipeit::InventoryApi`] seam
//! - [`planner`]: Field diffs, plans and plan execution
//! - [`reconciler`]: Reconciliation engine
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```json
//! {
//!   "snipe_url": "http://localhost:8080",
//!   "api_key": "…",
//!   "asset_tag": "example_asset001",
//!   "model_name": "server",
//!   "status_id": 2,
//!   "state": "present"
//! }
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod snipeit;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ArgsParser, ArgsValidator, ResourceSpec};
pub use error::{Result, SnipeError};
pub use planner::{DiffEngine, PlanExecutor, ReconcilePlan};
pub use reconciler::{ReconciliationResult, Reconciler};
pub use snipeit::{InventoryApi, SnipeItClient};
