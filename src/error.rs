//! Error types for Snipe-IT reconciliation.
//!
//! Errors are grouped by where they originate: reading module arguments,
//! talking to the Snipe-IT API, and reconciling desired against remote state.
//! Nothing in this crate retries; callers decide what to do with a failure.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the crate.
#[derive(Debug, Error)]
pub enum SnipeError {
    /// Module argument errors.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Snipe-IT API errors.
    #[error("Snipe-IT API error: {0}")]
    Api(#[from] ApiError),

    /// Reconciliation errors.
    #[error("Reconciliation error: {0}")]
    Reconcile(#[from] ReconcileError),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Module argument errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The arguments file was not found.
    #[error("Arguments file not found: {path}")]
    FileNotFound {
        /// Path to the missing file.
        path: PathBuf,
    },

    /// The arguments could not be parsed.
    #[error("Failed to parse arguments: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Optional source location.
        location: Option<String>,
    },

    /// An argument failed validation.
    #[error("{message}")]
    ValidationError {
        /// Description of the validation error.
        message: String,
        /// Argument that failed validation.
        field: Option<String>,
    },

    /// A required value was neither supplied nor found in the environment.
    #[error("Missing {field}: pass it as an argument or set {env_var}")]
    MissingValue {
        /// Argument name.
        field: String,
        /// Environment variable consulted as a fallback.
        env_var: String,
    },
}

/// Snipe-IT API errors.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The connection could not be established or was interrupted.
    #[error("Network error communicating with Snipe-IT: {message}")]
    Network {
        /// Description of the network error.
        message: String,
    },

    /// The API token was rejected.
    #[error("Snipe-IT authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of the auth failure.
        message: String,
    },

    /// The server answered with a non-success status.
    #[error("Snipe-IT request failed: {status} - {message}")]
    RequestFailed {
        /// HTTP status code.
        status: u16,
        /// Response body or message.
        message: String,
    },

    /// The server rejected the request with an error envelope.
    #[error("Error {action}: {messages}")]
    Validation {
        /// What was being attempted (e.g. "creating category").
        action: String,
        /// Messages reported by Snipe-IT.
        messages: String,
    },

    /// The response body could not be understood.
    #[error("Invalid response from Snipe-IT: {message}")]
    InvalidResponse {
        /// Description of the response issue.
        message: String,
    },
}

/// Reconciliation errors.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// More than one remote resource matched the natural key.
    #[error("Found {count} {kind} resources matching '{key}', refusing to pick one")]
    AmbiguousLookup {
        /// Resource kind.
        kind: String,
        /// Natural key that was looked up.
        key: String,
        /// Number of exact matches.
        count: usize,
    },

    /// A referenced parent resource does not exist.
    #[error("{kind} {name} does not exist")]
    ParentNotFound {
        /// Kind of the missing parent.
        kind: String,
        /// Name of the missing parent.
        name: String,
    },
}

/// Result type alias for reconciliation operations.
pub type Result<T> = std::result::Result<T, SnipeError>;

impl SnipeError {
    /// Creates a new internal error with the given message.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if the failure happened in transport or on the server
    /// side (5xx) rather than in the request itself. Useful for callers that
    /// apply their own retry policy.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        match self {
            Self::Api(ApiError::Network { .. }) => true,
            Self::Api(ApiError::RequestFailed { status, .. }) => *status >= 500,
            _ => false,
        }
    }
}

impl ConfigError {
    /// Creates a validation error for a specific field.
    #[must_use]
    pub fn validation(message: impl Into<String>, field: impl Into<String>) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }
}

impl ApiError {
    /// Creates a network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates an invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// Creates an error from a Snipe-IT error envelope.
    #[must_use]
    pub fn validation(action: impl Into<String>, messages: impl Into<String>) -> Self {
        Self::Validation {
            action: action.into(),
            messages: messages.into(),
        }
    }
}
