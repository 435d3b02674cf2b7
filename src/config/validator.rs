//! Validation of module arguments.
//!
//! Serde already enforces types and enum choices. This covers what it
//! cannot: empty strings, arguments required only for some states, and the
//! shape of the base URL.

use crate::error::{ConfigError, Result, SnipeError};
use tracing::debug;

use super::spec::{CategorySpec, Connection, EntrySpec, ModelSpec, ResourceSpec, ResourceState};

/// Validator for module arguments.
#[derive(Debug, Default)]
pub struct ArgsValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The argument that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ValidationResult {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.errors.push(ValidationError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    fn into_result(self) -> Result<()> {
        if self.errors.is_empty() {
            debug!("Module arguments passed validation");
            return Ok(());
        }

        let fields: Vec<&str> = self.errors.iter().map(|e| e.field.as_str()).collect();
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();

        Err(SnipeError::Config(ConfigError::validation(
            messages.join("; "),
            fields.join(", "),
        )))
    }
}

impl ArgsValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates connection settings.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate_connection(&self, connection: &Connection) -> Result<()> {
        let mut result = ValidationResult::default();

        let url = connection.snipe_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            result.push(
                "snipe_url",
                format!("snipe_url must start with http:// or https://, got '{url}'"),
            );
        }

        if connection.api_key.trim().is_empty() {
            result.push("api_key", "api_key cannot be empty");
        }

        if connection.timeout_secs == Some(0) {
            result.push("timeout_secs", "timeout_secs must be greater than zero");
        }

        result.into_result()
    }

    /// Validates the desired state of a resource.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self, spec: &ResourceSpec) -> Result<()> {
        let mut result = ValidationResult::default();

        match spec {
            ResourceSpec::Category(category) => Self::validate_category(category, &mut result),
            ResourceSpec::Model(model) => Self::validate_model(model, &mut result),
            ResourceSpec::Entry(entry) => Self::validate_entry(entry, &mut result),
        }

        result.into_result()
    }

    fn validate_category(category: &CategorySpec, result: &mut ValidationResult) {
        require_non_empty("name", &category.name, result);
    }

    fn validate_model(model: &ModelSpec, result: &mut ValidationResult) {
        require_non_empty("name", &model.name, result);

        if model.state == ResourceState::Present {
            match model.category.as_deref() {
                Some(category) => require_non_empty("category", category, result),
                None => result.push("category", "category is required when state is present"),
            }
        }

        if let Some(number) = &model.model_number {
            require_non_empty("model_number", number, result);
        }
    }

    fn validate_entry(entry: &EntrySpec, result: &mut ValidationResult) {
        require_non_empty("asset_tag", &entry.asset_tag, result);

        if entry.state == ResourceState::Present {
            match entry.model_name.as_deref() {
                Some(model) => require_non_empty("model_name", model, result),
                None => result.push("model_name", "model_name is required when state is present"),
            }

            if entry.status_id == 0 {
                result.push("status_id", "status_id must be a positive id");
            }
        }
    }
}

fn require_non_empty(field: &str, value: &str, result: &mut ValidationResult) {
    if value.trim().is_empty() {
        result.push(field, format!("{field} cannot be empty"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::spec::{CategoryType, DEFAULT_STATUS_ID};

    fn entry(state: ResourceState, model_name: Option<&str>) -> ResourceSpec {
        ResourceSpec::Entry(EntrySpec {
            asset_tag: String::from("example_asset001"),
            status_id: DEFAULT_STATUS_ID,
            model_name: model_name.map(String::from),
            name: None,
            serial: None,
            state,
        })
    }

    #[test]
    fn test_entry_present_requires_model_name() {
        let err = ArgsValidator::new()
            .validate(&entry(ResourceState::Present, None))
            .unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: model_name is required when state is present");
    }

    #[test]
    fn test_entry_absent_without_model_name_is_valid() {
        assert!(ArgsValidator::new().validate(&entry(ResourceState::Absent, None)).is_ok());
    }

    #[test]
    fn test_empty_category_name_rejected() {
        let spec = ResourceSpec::Category(CategorySpec {
            name: String::from("  "),
            category_type: CategoryType::Asset,
            state: ResourceState::Present,
        });
        assert!(ArgsValidator::new().validate(&spec).is_err());
    }

    #[test]
    fn test_model_absent_needs_no_category() {
        let spec = ResourceSpec::Model(ModelSpec {
            name: String::from("Laptop"),
            category: None,
            manufacturer_id: None,
            model_number: None,
            state: ResourceState::Absent,
        });
        assert!(ArgsValidator::new().validate(&spec).is_ok());
    }

    #[test]
    fn test_connection_requires_http_scheme() {
        let conn = Connection {
            snipe_url: String::from("localhost:8080"),
            api_key: String::from("token"),
            timeout_secs: None,
        };
        assert!(ArgsValidator::new().validate_connection(&conn).is_err());

        let conn = Connection {
            snipe_url: String::from("https://snipeit.example.com"),
            ..conn
        };
        assert!(ArgsValidator::new().validate_connection(&conn).is_ok());
    }

    #[test]
    fn test_all_errors_are_reported() {
        let spec = ResourceSpec::Entry(EntrySpec {
            asset_tag: String::from(" "),
            status_id: 0,
            model_name: None,
            name: None,
            serial: None,
            state: ResourceState::Present,
        });

        let err = ArgsValidator::new().validate(&spec).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: asset_tag cannot be empty; \
             model_name is required when state is present; \
             status_id must be a positive id"
        );
        assert!(matches!(
            err,
            SnipeError::Config(ConfigError::ValidationError { field: Some(ref f), .. })
                if f == "asset_tag, model_name, status_id"
        ));
    }
}
