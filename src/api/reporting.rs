//! Reporting API client (v4) - `reports:batchGet`.

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::GoogleHttpClient;
use crate::payload::ReportPayload;
use crate::report::BatchGetResponse;

/// The report-fetch endpoint.
#[async_trait]
pub trait ReportsApi: Send + Sync {
    async fn batch_get(&self, payload: &ReportPayload) -> Result<BatchGetResponse, ApiError>;
}

/// Reporting API client.
#[derive(Clone)]
pub struct ReportingService {
    base_url: String,
    client: GoogleHttpClient,
}

impl ReportingService {
    pub fn new(base_url: String, client: GoogleHttpClient) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn batch_get_url(&self) -> String {
        format!("{}/reports:batchGet", self.base_url)
    }
}

#[async_trait]
impl ReportsApi for ReportingService {
    async fn batch_get(&self, payload: &ReportPayload) -> Result<BatchGetResponse, ApiError> {
        self.client.post_json(&self.batch_get_url(), payload).await
    }
}

impl std::fmt::Debug for ReportingService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportingService")
            .field("base_url", &self.base_url)
            .finish()
    }
}
