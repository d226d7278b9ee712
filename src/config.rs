//! Configuration for the Google Analytics client.
//!
//! All values come from the process environment and are read once, up front,
//! into a [`Config`] that is then passed by reference to the services.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ConfigError;

pub const ENV_SCOPES: &str = "GA_API_SCOPES";
pub const ENV_API_NAME: &str = "GA_API_NAME";
pub const ENV_API_VERSION: &str = "GA_API_VERSION";
pub const ENV_CREDENTIALS: &str = "GA_API_CREDS";
pub const ENV_ACCOUNT_ID: &str = "GA_ACCOUNT_ID";
pub const ENV_PROPERTY_ID: &str = "GA_PROPERTY_ID";
pub const ENV_TIMEOUT: &str = "GA_API_TIMEOUT_SECONDS";
pub const ENV_REPORTING_ROOT_URL: &str = "GA_REPORTING_ROOT_URL";
pub const ENV_MANAGEMENT_ROOT_URL: &str = "GA_MANAGEMENT_ROOT_URL";

/// Root URL of the discovery-based Google APIs (management and uploads).
const GOOGLEAPIS_ROOT_URL: &str = "https://www.googleapis.com";

/// The management API only exists in the legacy version.
pub const MANAGEMENT_API_NAME: &str = "analytics";
pub const MANAGEMENT_API_VERSION: &str = "v3";

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// OAuth scopes requested for the service account
    pub scopes: Vec<String>,

    /// Reporting API name (e.g., "analyticsreporting")
    pub api_name: String,

    /// Reporting API version (e.g., "v4")
    pub api_version: String,

    /// Path to the service account JSON key file
    pub credentials_path: PathBuf,

    /// Management account id, needed for custom data source uploads only
    pub account_id: Option<String>,

    /// Web property id, needed for custom data source uploads only
    pub property_id: Option<String>,

    /// HTTP request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    /// Buffer before token expiration to refresh (seconds)
    #[serde(default = "default_token_buffer")]
    pub token_refresh_buffer_seconds: u64,

    /// Override for the reporting API root (e.g., a local test server)
    #[serde(default)]
    pub reporting_root_url: Option<String>,

    /// Override for the management and upload API root
    #[serde(default)]
    pub management_root_url: Option<String>,
}

fn default_timeout() -> u64 {
    30
}

fn default_token_buffer() -> u64 {
    60
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &str| get(key).ok_or_else(|| ConfigError::MissingVar(key.into()));

        let scopes: Vec<String> = require(ENV_SCOPES)?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let timeout_seconds = match get(ENV_TIMEOUT) {
            Some(raw) => raw.trim().parse().map_err(|_| {
                ConfigError::Invalid(format!("{} must be a whole number, got '{}'", ENV_TIMEOUT, raw))
            })?,
            None => default_timeout(),
        };

        let config = Config {
            scopes,
            api_name: require(ENV_API_NAME)?,
            api_version: require(ENV_API_VERSION)?,
            credentials_path: PathBuf::from(require(ENV_CREDENTIALS)?),
            account_id: get(ENV_ACCOUNT_ID),
            property_id: get(ENV_PROPERTY_ID),
            timeout_seconds,
            token_refresh_buffer_seconds: default_token_buffer(),
            reporting_root_url: get(ENV_REPORTING_ROOT_URL),
            management_root_url: get(ENV_MANAGEMENT_ROOT_URL),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.scopes.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "{} must list at least one scope",
                ENV_SCOPES
            )));
        }
        if self.timeout_seconds == 0 {
            return Err(ConfigError::Invalid(format!(
                "{} must be greater than zero",
                ENV_TIMEOUT
            )));
        }
        Ok(())
    }

    /// Account and property ids, required by the upload operations.
    pub fn upload_target(&self) -> Result<(&str, &str), ConfigError> {
        let account_id = self
            .account_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar(ENV_ACCOUNT_ID.into()))?;
        let property_id = self
            .property_id
            .as_deref()
            .ok_or_else(|| ConfigError::MissingVar(ENV_PROPERTY_ID.into()))?;
        Ok((account_id, property_id))
    }

    /// Get the reporting API base URL, e.g. `https://analyticsreporting.googleapis.com/v4`.
    pub fn reporting_api_url(&self) -> String {
        let root = match &self.reporting_root_url {
            Some(root) => root.trim_end_matches('/').to_string(),
            None => format!("https://{}.googleapis.com", self.api_name),
        };
        format!("{}/{}", root, self.api_version)
    }

    fn management_root(&self) -> &str {
        self.management_root_url
            .as_deref()
            .unwrap_or(GOOGLEAPIS_ROOT_URL)
            .trim_end_matches('/')
    }

    /// Get the management API base URL.
    pub fn management_api_url(&self) -> String {
        format!(
            "{}/{}/{}",
            self.management_root(),
            MANAGEMENT_API_NAME,
            MANAGEMENT_API_VERSION
        )
    }

    /// Get the media upload base URL for the management API.
    pub fn upload_api_url(&self) -> String {
        format!(
            "{}/upload/{}/{}",
            self.management_root(),
            MANAGEMENT_API_NAME,
            MANAGEMENT_API_VERSION
        )
    }

    /// Get timeout as Duration.
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }

    /// Get token refresh buffer as chrono Duration.
    pub fn token_buffer(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_refresh_buffer_seconds as i64)
    }
}
