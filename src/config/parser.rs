//! Loading module arguments.
//!
//! Arguments come from an args file (JSON or YAML) or from CLI flags. Any
//! connection setting left unset is taken from the environment, after an
//! optional `.env` file has been loaded.

use crate::error::{ConfigError, Result, SnipeError};
use serde::de::DeserializeOwned;
use std::path::Path;
use tracing::{debug, info};

use super::spec::{Connection, ConnectionArgs, ModuleArgs};

/// Environment variable holding the Snipe-IT base URL.
pub const ENV_SNIPE_URL: &str = "SNIPEIT_URL";

/// Environment variable holding the API token.
pub const ENV_API_KEY: &str = "SNIPEIT_API_KEY";

/// Environment variable holding the request timeout.
pub const ENV_TIMEOUT_SECS: &str = "SNIPEIT_TIMEOUT_SECS";

/// Parser for module arguments.
#[derive(Debug, Default)]
pub struct ArgsParser {
    /// Directory searched for `.env`.
    base_path: Option<std::path::PathBuf>,
}

impl ArgsParser {
    /// Creates a new arguments parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the directory searched for `.env`.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads module arguments from a file.
    ///
    /// `.yaml`/`.yml` files are read as YAML, everything else as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file<T: DeserializeOwned>(&self, path: impl AsRef<Path>) -> Result<ModuleArgs<T>> {
        let path = path.as_ref();
        info!("Loading module arguments from: {}", path.display());

        if !path.exists() {
            return Err(SnipeError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            SnipeError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        let is_yaml = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

        if is_yaml {
            self.parse_yaml(&content, Some(path))
        } else {
            self.parse_json(&content, Some(path))
        }
    }

    /// Parses module arguments from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or does not match the resource.
    pub fn parse_json<T: DeserializeOwned>(
        &self,
        content: &str,
        source: Option<&Path>,
    ) -> Result<ModuleArgs<T>> {
        debug!("Parsing JSON module arguments");

        serde_json::from_str(content).map_err(|e| {
            SnipeError::Config(ConfigError::ParseError {
                message: format!("JSON parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Parses module arguments from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or does not match the resource.
    pub fn parse_yaml<T: DeserializeOwned>(
        &self,
        content: &str,
        source: Option<&Path>,
    ) -> Result<ModuleArgs<T>> {
        debug!("Parsing YAML module arguments");

        serde_yaml::from_str(content).map_err(|e| {
            SnipeError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location: source.map(|p| p.display().to_string()),
            })
        })
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| std::path::PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                SnipeError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Resolves connection settings against the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or token is missing everywhere.
    pub fn resolve_connection(args: &ConnectionArgs) -> Result<Connection> {
        Self::resolve_connection_with(args, |name| std::env::var(name).ok())
    }

    /// Resolves connection settings, consulting `lookup` for anything unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL or token is missing everywhere, or if the
    /// timeout from the environment is not a number.
    pub fn resolve_connection_with<F>(args: &ConnectionArgs, lookup: F) -> Result<Connection>
    where
        F: Fn(&str) -> Option<String>,
    {
        let snipe_url = Self::resolve_value(args.snipe_url.as_deref(), "snipe_url", ENV_SNIPE_URL, &lookup)?;
        let api_key = Self::resolve_value(args.api_key.as_deref(), "api_key", ENV_API_KEY, &lookup)?;

        let timeout_secs = match args.timeout_secs {
            Some(secs) => Some(secs),
            None => lookup(ENV_TIMEOUT_SECS)
                .map(|raw| {
                    raw.trim().parse::<u64>().map_err(|_| {
                        SnipeError::Config(ConfigError::validation(
                            format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"),
                            "timeout_secs",
                        ))
                    })
                })
                .transpose()?,
        };

        Ok(Connection {
            snipe_url,
            api_key,
            timeout_secs,
        })
    }

    fn resolve_value<F>(supplied: Option<&str>, field: &str, env_var: &str, lookup: &F) -> Result<String>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = supplied.filter(|v| !v.is_empty()) {
            return Ok(value.to_string());
        }

        match lookup(env_var).filter(|v| !v.is_empty()) {
            Some(value) => {
                debug!("Using {field} from {env_var}");
                Ok(value)
            }
            None => Err(SnipeError::Config(ConfigError::MissingValue {
                field: field.to_string(),
                env_var: env_var.to_string(),
            })),
        }
    }
}
