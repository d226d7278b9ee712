//! Administration of one custom data source: upload status, listing,
//! deletion and file upload.
//!
//! Every operation here reports failure as an [`AdminFailure`] value instead
//! of a [`GaError`](crate::error::GaError). Callers receive either the result
//! or a description of what went wrong.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use thiserror::Error;

use crate::api::{CustomDataSource, Upload, UploadStatus, UploadsApi};
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminFailureKind {
    /// The arguments were malformed; nothing was sent.
    Query,
    /// The API rejected or failed the call.
    Remote,
    /// An upload was still pending when polling gave up.
    Timeout,
}

impl fmt::Display for AdminFailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Query => write!(f, "query error"),
            Self::Remote => write!(f, "remote service error"),
            Self::Timeout => write!(f, "timeout"),
        }
    }
}

/// Description of a failed administration call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct AdminFailure {
    pub kind: AdminFailureKind,
    pub message: String,
}

impl AdminFailure {
    fn query(message: impl Into<String>) -> Self {
        Self {
            kind: AdminFailureKind::Query,
            message: message.into(),
        }
    }

    fn remote(operation: &str, error: ApiError) -> Self {
        tracing::warn!(operation, error = %error, "Custom data source call failed");
        Self {
            kind: AdminFailureKind::Remote,
            message: format!("{} failed: {}", operation, error),
        }
    }
}

pub type AdminResult<T> = Result<T, AdminFailure>;

/// How long `upload_data` waits for an upload to leave `PENDING`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

/// Outcome of a processed upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub upload_id: String,
    pub status: String,
    pub succeeded: bool,
    pub errors: Vec<String>,
}

impl UploadReport {
    fn from_upload(upload: Upload) -> Self {
        let succeeded = upload.status() != UploadStatus::Failed;
        Self {
            upload_id: upload.id,
            status: upload.status,
            succeeded,
            errors: upload.errors,
        }
    }

    /// Human-readable summary.
    pub fn detail(&self) -> String {
        if self.succeeded {
            format!("upload {} finished with status {}", self.upload_id, self.status)
        } else {
            format!(
                "upload {} failed: {}",
                self.upload_id,
                self.errors.join("; ")
            )
        }
    }
}

/// Administrator of one custom data source.
#[derive(Debug, Clone)]
pub struct DataSourceAdmin<U> {
    api: U,
    source: CustomDataSource,
    poll: PollPolicy,
}

impl<U: UploadsApi> DataSourceAdmin<U> {
    pub fn new(api: U, source: CustomDataSource) -> Self {
        Self {
            api,
            source,
            poll: PollPolicy::default(),
        }
    }

    pub fn with_poll_policy(mut self, poll: PollPolicy) -> Self {
        self.poll = poll;
        self
    }

    pub fn source(&self) -> &CustomDataSource {
        &self.source
    }

    pub fn api(&self) -> &U {
        &self.api
    }

    /// Current state of one upload.
    pub async fn get_upload_status(&self, upload_id: &str) -> AdminResult<Upload> {
        if upload_id.trim().is_empty() {
            return Err(AdminFailure::query("upload id cannot be empty"));
        }
        self.api
            .get_upload(&self.source, upload_id)
            .await
            .map_err(|e| AdminFailure::remote("get upload status", e))
    }

    /// Ids of the uploads present on the data source, in API order.
    pub async fn list_uploads(&self) -> AdminResult<Vec<String>> {
        let uploads = self
            .api
            .list_uploads(&self.source)
            .await
            .map_err(|e| AdminFailure::remote("list uploads", e))?;
        Ok(uploads.into_iter().map(|upload| upload.id).collect())
    }

    /// Remove the named uploads.
    pub async fn delete_uploads<S: AsRef<str>>(&self, upload_ids: &[S]) -> AdminResult<()> {
        if upload_ids.is_empty() {
            return Err(AdminFailure::query("no upload ids given"));
        }
        let ids: Vec<String> = upload_ids.iter().map(|id| id.as_ref().to_string()).collect();
        if ids.iter().any(|id| id.trim().is_empty()) {
            return Err(AdminFailure::query("upload ids cannot be empty"));
        }

        self.api
            .delete_upload_data(&self.source, &ids)
            .await
            .map_err(|e| AdminFailure::remote("delete uploads", e))?;
        tracing::info!(count = ids.len(), data_source = %self.source.data_source_id, "Uploads deleted");
        Ok(())
    }

    /// Upload a file and wait until the API has processed it.
    ///
    /// A `FAILED` upload is still `Ok`, with `succeeded == false` and the
    /// API's error detail in the report.
    pub async fn upload_data<P: AsRef<Path>>(&self, file_path: P) -> AdminResult<UploadReport> {
        let file_path = file_path.as_ref();
        let data = tokio::fs::read(file_path).await.map_err(|e| {
            AdminFailure::query(format!("cannot read {}: {}", file_path.display(), e))
        })?;

        let upload = self
            .api
            .upload_data(&self.source, data)
            .await
            .map_err(|e| AdminFailure::remote("upload data", e))?;
        tracing::info!(upload_id = %upload.id, file = %file_path.display(), "File submitted");

        self.wait_for_upload(&upload.id).await
    }

    async fn wait_for_upload(&self, upload_id: &str) -> AdminResult<UploadReport> {
        let max_attempts = self.poll.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            let upload = self.get_upload_status(upload_id).await?;
            match upload.status() {
                UploadStatus::Pending => {
                    tracing::debug!(upload_id, attempt, "Upload pending");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.poll.interval).await;
                    }
                }
                UploadStatus::Failed => {
                    let report = UploadReport::from_upload(upload);
                    tracing::warn!(upload_id, detail = %report.detail(), "Upload failed");
                    return Ok(report);
                }
                _ => return Ok(UploadReport::from_upload(upload)),
            }
        }

        Err(AdminFailure {
            kind: AdminFailureKind::Timeout,
            message: format!(
                "upload {} still pending after {} status checks",
                upload_id, max_attempts
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use reqwest::StatusCode;
    use std::collections::VecDeque;
    use std::io::Write;
    use std::sync::Mutex;

    #[derive(Default)]
    struct UploadStub {
        statuses: Mutex<VecDeque<&'static str>>,
        status_checks: Mutex<usize>,
        deleted: Mutex<Vec<String>>,
        uploaded: Mutex<Vec<Vec<u8>>>,
        fail: bool,
    }

    impl UploadStub {
        fn with_statuses(statuses: &[&'static str]) -> Self {
            Self {
                statuses: Mutex::new(statuses.iter().copied().collect()),
                ..Default::default()
            }
        }

        fn failing() -> Self {
            Self {
                fail: true,
                ..Default::default()
            }
        }

        fn fault() -> ApiError {
            ApiError::Google {
                status: StatusCode::FORBIDDEN,
                code: 403,
                message: "Insufficient permissions".to_string(),
            }
        }

        fn upload(id: &str, status: &str) -> Upload {
            Upload {
                id: id.to_string(),
                account_id: Some("123".to_string()),
                custom_data_source_id: Some("ds".to_string()),
                status: status.to_string(),
                upload_time: None,
                errors: if status == "FAILED" {
                    vec!["Column ga:foo is unknown".to_string()]
                } else {
                    vec![]
                },
            }
        }
    }

    #[async_trait]
    impl UploadsApi for UploadStub {
        async fn get_upload(&self, _source: &CustomDataSource, upload_id: &str) -> Result<Upload, ApiError> {
            if self.fail {
                return Err(UploadStub::fault());
            }
            *self.status_checks.lock().unwrap() += 1;
            let status = self.statuses.lock().unwrap().pop_front().unwrap_or("COMPLETED");
            Ok(UploadStub::upload(upload_id, status))
        }

        async fn list_uploads(&self, _source: &CustomDataSource) -> Result<Vec<Upload>, ApiError> {
            if self.fail {
                return Err(UploadStub::fault());
            }
            Ok(vec![
                UploadStub::upload("u1", "COMPLETED"),
                UploadStub::upload("u2", "PENDING"),
            ])
        }

        async fn delete_upload_data(
            &self,
            _source: &CustomDataSource,
            upload_ids: &[String],
        ) -> Result<(), ApiError> {
            if self.fail {
                return Err(UploadStub::fault());
            }
            self.deleted.lock().unwrap().extend_from_slice(upload_ids);
            Ok(())
        }

        async fn upload_data(&self, _source: &CustomDataSource, data: Vec<u8>) -> Result<Upload, ApiError> {
            if self.fail {
                return Err(UploadStub::fault());
            }
            self.uploaded.lock().unwrap().push(data);
            Ok(UploadStub::upload("new-upload", "PENDING"))
        }
    }

    fn admin(stub: UploadStub) -> DataSourceAdmin<UploadStub> {
        DataSourceAdmin::new(stub, CustomDataSource::new("123", "UA-123-1", "ds")).with_poll_policy(
            PollPolicy {
                interval: Duration::ZERO,
                max_attempts: 5,
            },
        )
    }

    fn csv_file(name: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("ga_utility_{}_{}", std::process::id(), name));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"ga:date,ga:source\n20190920,newsletter\n").unwrap();
        path
    }

    #[tokio::test]
    async fn test_upload_completes_after_pending() {
        let admin = admin(UploadStub::with_statuses(&["PENDING", "COMPLETED"]));
        let path = csv_file("pending.csv");

        let report = admin.upload_data(&path).await.unwrap();
        let stub = admin.api();

        assert!(report.succeeded);
        assert_eq!(report.upload_id, "new-upload");
        assert_eq!(report.status, "COMPLETED");
        assert_eq!(*stub.status_checks.lock().unwrap(), 2);
        assert_eq!(
            stub.uploaded.lock().unwrap()[0],
            b"ga:date,ga:source\n20190920,newsletter\n".to_vec()
        );
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_failed_upload_stops_polling() {
        let admin = admin(UploadStub::with_statuses(&["FAILED", "COMPLETED"]));
        let path = csv_file("failed.csv");

        let report = admin.upload_data(&path).await.unwrap();
        let stub = admin.api();

        assert!(!report.succeeded);
        assert_eq!(report.errors, vec!["Column ga:foo is unknown"]);
        assert!(report.detail().contains("Column ga:foo is unknown"));
        assert_eq!(*stub.status_checks.lock().unwrap(), 1);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_always_pending_times_out() {
        let admin = admin(UploadStub::with_statuses(&["PENDING"; 10]));
        let path = csv_file("stuck.csv");

        let failure = admin.upload_data(&path).await.unwrap_err();
        let stub = admin.api();

        assert_eq!(failure.kind, AdminFailureKind::Timeout);
        assert_eq!(*stub.status_checks.lock().unwrap(), 5);
        std::fs::remove_file(path).ok();
    }

    #[tokio::test]
    async fn test_missing_file_is_query_failure() {
        let admin = admin(UploadStub::default());
        let failure = admin.upload_data("/no/such/file.csv").await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Query);
        assert!(admin.api().uploaded.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let admin = admin(UploadStub::default());

        assert_eq!(admin.list_uploads().await.unwrap(), vec!["u1", "u2"]);
        admin.delete_uploads(&["u1", "u2"]).await.unwrap();
        assert_eq!(*admin.api().deleted.lock().unwrap(), vec!["u1", "u2"]);
    }

    #[tokio::test]
    async fn test_bad_arguments_are_query_failures() {
        let admin = admin(UploadStub::default());

        let failure = admin.get_upload_status("").await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Query);

        let none: [&str; 0] = [];
        let failure = admin.delete_uploads(&none).await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Query);

        let failure = admin.delete_uploads(&["ok", " "]).await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Query);
        assert!(admin.api().deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_remote_faults_become_failure_values() {
        let admin = admin(UploadStub::failing());

        let failure = admin.get_upload_status("u1").await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Remote);
        assert!(failure.to_string().contains("Insufficient permissions"));

        let failure = admin.list_uploads().await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Remote);

        let failure = admin.delete_uploads(&["u1"]).await.unwrap_err();
        assert_eq!(failure.kind, AdminFailureKind::Remote);
        assert!(failure.message.starts_with("delete uploads failed"));
    }
}
