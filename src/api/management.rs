//! Management API client (v3) - accounts, web properties, profiles and
//! custom data source uploads.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::ApiError;
use crate::http::GoogleHttpClient;

/// Envelope of every management list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    pub total_results: Option<i64>,
    pub next_link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebProperty {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub account_id: Option<String>,
    pub website_url: Option<String>,
}

/// A view, called "profile" by the v3 API.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub web_property_id: Option<String>,
    pub timezone: Option<String>,
}

/// Processing state of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadStatus {
    Pending,
    Completed,
    Failed,
    Deleting,
    Other(String),
}

impl UploadStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "PENDING" => Self::Pending,
            "COMPLETED" => Self::Completed,
            "FAILED" => Self::Failed,
            "DELETING" => Self::Deleting,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A file uploaded to a custom data source.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Upload {
    pub id: String,
    pub account_id: Option<String>,
    pub custom_data_source_id: Option<String>,
    #[serde(default)]
    pub status: String,
    pub upload_time: Option<String>,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl Upload {
    pub fn status(&self) -> UploadStatus {
        UploadStatus::parse(&self.status)
    }
}

/// Identifies one custom data source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDataSource {
    pub account_id: String,
    pub web_property_id: String,
    pub data_source_id: String,
}

impl CustomDataSource {
    pub fn new(
        account_id: impl Into<String>,
        web_property_id: impl Into<String>,
        data_source_id: impl Into<String>,
    ) -> Self {
        Self {
            account_id: account_id.into(),
            web_property_id: web_property_id.into(),
            data_source_id: data_source_id.into(),
        }
    }

    /// Path below the API root, without leading slash.
    fn path(&self) -> String {
        format!(
            "management/accounts/{}/webproperties/{}/customDataSources/{}",
            urlencoding::encode(&self.account_id),
            urlencoding::encode(&self.web_property_id),
            urlencoding::encode(&self.data_source_id)
        )
    }
}

/// The account hierarchy list endpoints.
#[async_trait]
pub trait ManagementApi: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError>;

    /// First page only; `nextLink` is not followed.
    async fn list_web_properties(&self, account_id: &str) -> Result<Vec<WebProperty>, ApiError>;

    /// First page only; `nextLink` is not followed.
    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> Result<Vec<Profile>, ApiError>;
}

/// The custom data source upload endpoints.
#[async_trait]
pub trait UploadsApi: Send + Sync {
    async fn get_upload(&self, source: &CustomDataSource, upload_id: &str) -> Result<Upload, ApiError>;

    async fn list_uploads(&self, source: &CustomDataSource) -> Result<Vec<Upload>, ApiError>;

    async fn delete_upload_data(
        &self,
        source: &CustomDataSource,
        upload_ids: &[String],
    ) -> Result<(), ApiError>;

    /// Non-resumable media upload of a whole file.
    async fn upload_data(&self, source: &CustomDataSource, data: Vec<u8>) -> Result<Upload, ApiError>;
}

/// Management API client.
#[derive(Clone)]
pub struct ManagementService {
    base_url: String,
    upload_url: String,
    client: GoogleHttpClient,
}

impl ManagementService {
    pub fn new(base_url: String, upload_url: String, client: GoogleHttpClient) -> Self {
        Self {
            base_url,
            upload_url,
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn accounts_url(&self) -> String {
        format!("{}/management/accounts", self.base_url)
    }

    fn web_properties_url(&self, account_id: &str) -> String {
        format!(
            "{}/management/accounts/{}/webproperties",
            self.base_url,
            urlencoding::encode(account_id)
        )
    }

    fn profiles_url(&self, account_id: &str, web_property_id: &str) -> String {
        format!(
            "{}/management/accounts/{}/webproperties/{}/profiles",
            self.base_url,
            urlencoding::encode(account_id),
            urlencoding::encode(web_property_id)
        )
    }

    fn uploads_url(&self, source: &CustomDataSource) -> String {
        format!("{}/{}/uploads", self.base_url, source.path())
    }

    fn upload_url(&self, source: &CustomDataSource, upload_id: &str) -> String {
        format!(
            "{}/{}",
            self.uploads_url(source),
            urlencoding::encode(upload_id)
        )
    }

    fn delete_upload_data_url(&self, source: &CustomDataSource) -> String {
        format!("{}/{}/deleteUploadData", self.base_url, source.path())
    }

    fn media_upload_url(&self, source: &CustomDataSource) -> String {
        format!("{}/{}/uploads?uploadType=media", self.upload_url, source.path())
    }
}

#[async_trait]
impl ManagementApi for ManagementService {
    async fn list_accounts(&self) -> Result<Vec<Account>, ApiError> {
        let list: ListResponse<Account> = self.client.get_json(&self.accounts_url()).await?;
        Ok(list.items)
    }

    async fn list_web_properties(&self, account_id: &str) -> Result<Vec<WebProperty>, ApiError> {
        let list: ListResponse<WebProperty> = self
            .client
            .get_json(&self.web_properties_url(account_id))
            .await?;
        Ok(list.items)
    }

    async fn list_profiles(
        &self,
        account_id: &str,
        web_property_id: &str,
    ) -> Result<Vec<Profile>, ApiError> {
        let list: ListResponse<Profile> = self
            .client
            .get_json(&self.profiles_url(account_id, web_property_id))
            .await?;
        Ok(list.items)
    }
}

#[async_trait]
impl UploadsApi for ManagementService {
    async fn get_upload(&self, source: &CustomDataSource, upload_id: &str) -> Result<Upload, ApiError> {
        self.client.get_json(&self.upload_url(source, upload_id)).await
    }

    async fn list_uploads(&self, source: &CustomDataSource) -> Result<Vec<Upload>, ApiError> {
        let list: ListResponse<Upload> = self.client.get_json(&self.uploads_url(source)).await?;
        Ok(list.items)
    }

    async fn delete_upload_data(
        &self,
        source: &CustomDataSource,
        upload_ids: &[String],
    ) -> Result<(), ApiError> {
        let body = json!({ "customDataFileIds": upload_ids });
        self.client
            .post_json_no_content(&self.delete_upload_data_url(source), &body)
            .await
    }

    async fn upload_data(&self, source: &CustomDataSource, data: Vec<u8>) -> Result<Upload, ApiError> {
        self.client
            .post_bytes(&self.media_upload_url(source), data, "application/octet-stream")
            .await
    }
}

impl std::fmt::Debug for ManagementService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManagementService")
            .field("base_url", &self.base_url)
            .finish()
    }
}
