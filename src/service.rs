//! Builds authorized API handles from a [`Config`].

use std::sync::Arc;

use crate::api::{CustomDataSource, ManagementService, ReportingService};
use crate::auth::{ServiceAccountCredentials, TokenSource};
use crate::config::Config;
use crate::error::Result;
use crate::http::GoogleHttpClient;
use crate::uploads::DataSourceAdmin;

/// Shares one credential provider between the reporting and management
/// handles.
#[derive(Clone)]
pub struct ServiceFactory {
    config: Config,
    token_source: Arc<dyn TokenSource>,
}

impl ServiceFactory {
    /// Load the service account key named by the configuration.
    ///
    /// Fails with an authentication error when the key file is missing or
    /// malformed. Tokens are only requested on the first API call.
    pub fn new(config: &Config) -> Result<Self> {
        let credentials = ServiceAccountCredentials::from_config(config)?;
        tracing::debug!(
            client_email = %credentials.client_email(),
            scopes = ?config.scopes,
            "Service account credentials loaded"
        );
        Ok(Self::with_token_source(config, Arc::new(credentials)))
    }

    /// Use an existing token source instead of the configured key file.
    pub fn with_token_source(config: &Config, token_source: Arc<dyn TokenSource>) -> Self {
        Self {
            config: config.clone(),
            token_source,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn http_client(&self) -> Result<GoogleHttpClient> {
        Ok(GoogleHttpClient::new(
            self.token_source.clone(),
            self.config.timeout(),
        )?)
    }

    /// Handle on the configured reporting API (name and version from config).
    pub fn reporting(&self) -> Result<ReportingService> {
        Ok(ReportingService::new(
            self.config.reporting_api_url(),
            self.http_client()?,
        ))
    }

    /// Handle on the management API, always v3.
    pub fn management(&self) -> Result<ManagementService> {
        Ok(ManagementService::new(
            self.config.management_api_url(),
            self.config.upload_api_url(),
            self.http_client()?,
        ))
    }

    /// Administrator for a custom data source of the configured account and
    /// property.
    pub fn data_source_admin(
        &self,
        data_source_id: impl Into<String>,
    ) -> Result<DataSourceAdmin<ManagementService>> {
        let (account_id, property_id) = self.config.upload_target()?;
        let source = CustomDataSource::new(account_id, property_id, data_source_id);
        Ok(DataSourceAdmin::new(self.management()?, source))
    }
}

impl std::fmt::Debug for ServiceFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceFactory")
            .field("api_name", &self.config.api_name)
            .field("api_version", &self.config.api_version)
            .finish()
    }
}
