//! Authenticated JSON client for Google REST endpoints.

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::auth::TokenSource;
use crate::error::ApiError;

/// Google error envelope: `{"error": {"code": 400, "message": "..."}}`.
#[derive(Debug, Deserialize)]
struct GoogleErrorResponse {
    error: GoogleErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GoogleErrorDetail {
    code: Option<i64>,
    message: String,
}

/// HTTP client that injects a bearer token into every request.
#[derive(Clone)]
pub struct GoogleHttpClient {
    http_client: Client,
    token_source: Arc<dyn TokenSource>,
}

impl GoogleHttpClient {
    pub fn new(token_source: Arc<dyn TokenSource>, timeout: Duration) -> Result<Self, ApiError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::HttpClientInit(e.to_string()))?;

        Ok(Self {
            http_client,
            token_source,
        })
    }

    /// GET a JSON document.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "GET");
        let builder = self.http_client.get(url);
        let body = self.execute(builder).await?;
        parse_body(&body)
    }

    /// POST a JSON body and decode the JSON reply.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        tracing::debug!(url = %url, "POST");
        let builder = self.http_client.post(url).json(body);
        let body = self.execute(builder).await?;
        parse_body(&body)
    }

    /// POST a JSON body to an endpoint that replies with no content.
    pub async fn post_json_no_content<B: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        tracing::debug!(url = %url, "POST");
        let builder = self.http_client.post(url).json(body);
        self.execute(builder).await.map(|_| ())
    }

    /// POST raw bytes (media upload) and decode the JSON reply.
    pub async fn post_bytes<T: DeserializeOwned>(
        &self,
        url: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<T, ApiError> {
        tracing::debug!(url = %url, size = bytes.len(), "POST media");
        let builder = self
            .http_client
            .post(url)
            .header("Content-Type", content_type)
            .body(bytes);
        let body = self.execute(builder).await?;
        parse_body(&body)
    }

    /// Send with auth, returning the body of a successful response.
    async fn execute(&self, builder: RequestBuilder) -> Result<String, ApiError> {
        let token = self.token_source.access_token().await?;

        let response = builder
            .bearer_auth(token)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        tracing::debug!(%status, body = %truncate(&body, 500), "Response");

        if status.is_success() {
            Ok(body)
        } else {
            Err(parse_error_response(status, &body))
        }
    }
}

fn parse_body<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    // Empty successful replies decode as an empty object.
    let body = if body.trim().is_empty() { "{}" } else { body };
    Ok(serde_json::from_str(body)?)
}

/// Map a failed response onto the Google error envelope when it has one.
fn parse_error_response(status: StatusCode, body: &str) -> ApiError {
    match serde_json::from_str::<GoogleErrorResponse>(body) {
        Ok(error) => ApiError::Google {
            status,
            code: error.error.code.unwrap_or(status.as_u16() as i64),
            message: error.error.message,
        },
        Err(_) => ApiError::HttpError {
            status,
            body: body.to_string(),
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_chars).collect();
        format!("{}...(truncated)", head)
    }
}

impl std::fmt::Debug for GoogleHttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleHttpClient").finish()
    }
}
