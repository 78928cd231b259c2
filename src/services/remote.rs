use crate::domain::Document;
use anyhow::{Context, Result};
use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const API_PREFIX: &str = "/api";
pub const UPLOAD_PATH: &str = "/upload";

pub struct RemoteResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Body of every write endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WriteAck {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UploadAck {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

// the wire underneath the fallback client; swapped for a mock in tests
#[async_trait]
pub trait RemoteTransport: Send + Sync {
    async fn get(&self, path: &str) -> Result<RemoteResponse>;
    async fn post_json(&self, path: &str, body: &Value) -> Result<RemoteResponse>;
    async fn delete(&self, path: &str) -> Result<RemoteResponse>;
    async fn upload(&self, path: &str, file: UploadFile) -> Result<RemoteResponse>;
}

pub struct HttpTransport {
    pub client: Client,
    pub base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    async fn read_response(response: reqwest::Response) -> Result<RemoteResponse> {
        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read response body")?;
        Ok(RemoteResponse { status, body })
    }
}

#[async_trait]
impl RemoteTransport for HttpTransport {
    async fn get(&self, path: &str) -> Result<RemoteResponse> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .with_context(|| format!("GET {} failed", path))?;
        Self::read_response(response).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<RemoteResponse> {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        Self::read_response(response).await
    }

    async fn delete(&self, path: &str) -> Result<RemoteResponse> {
        let response = self
            .client
            .delete(self.url(path))
            .send()
            .await
            .with_context(|| format!("DELETE {} failed", path))?;
        Self::read_response(response).await
    }

    async fn upload(&self, path: &str, file: UploadFile) -> Result<RemoteResponse> {
        let part = Part::bytes(file.bytes)
            .file_name(file.filename)
            .mime_str(&file.content_type)
            .context("Invalid upload content type")?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .with_context(|| format!("POST {} failed", path))?;
        Self::read_response(response).await
    }
}

/// Best-effort client for the content API, consulted only after a local miss
/// or a failed local write. Nothing here returns an error: failures are
/// logged and reported as `None` or `false`.
pub struct RemoteClient {
    transport: Box<dyn RemoteTransport>,
}

impl RemoteClient {
    pub fn new(transport: Box<dyn RemoteTransport>) -> Self {
        Self { transport }
    }

    pub fn http(base_url: impl Into<String>) -> Self {
        Self::new(Box::new(HttpTransport::new(base_url)))
    }

    pub async fn fetch_document<D: Document>(&self, id: &str) -> Option<D> {
        match D::KIND.item_path(id) {
            Some(path) => self.get_json::<D>(&path).await,
            // no item endpoint for this kind: filter the listing
            None => self
                .fetch_all::<D>()
                .await?
                .into_iter()
                .find(|doc| doc.id() == id),
        }
    }

    pub async fn fetch_all<D: Document>(&self) -> Option<Vec<D>> {
        self.get_json::<Vec<D>>(D::KIND.collection_path()).await
    }

    pub async fn save_document<D: Document>(&self, doc: &D) -> bool {
        let path = D::KIND.write_path();
        let body = match serde_json::to_value(doc) {
            Ok(body) => body,
            Err(e) => {
                tracing::error!(kind = %D::KIND, id = doc.id(), "Failed to serialize for remote save: {}", e);
                return false;
            }
        };

        let response = self.transport.post_json(path, &body).await;
        acknowledged(path, response)
    }

    pub async fn delete_document<D: Document>(&self, id: &str) -> bool {
        let Some(path) = D::KIND.delete_path(id) else {
            tracing::warn!(kind = %D::KIND, id, "Remote API has no delete endpoint for this kind");
            return false;
        };

        let response = self.transport.delete(&path).await;
        acknowledged(&path, response)
    }

    /// Uploads a file and returns the URL the API assigned to it.
    pub async fn upload(&self, file: UploadFile) -> Option<String> {
        let filename = file.filename.clone();
        let response = match self.transport.upload(UPLOAD_PATH, file).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!(filename = %filename, "Upload failed: {:#}", e);
                return None;
            }
        };

        if !response.status.is_success() {
            tracing::error!(filename = %filename, status = %response.status, "Upload rejected");
            return None;
        }

        match serde_json::from_str::<UploadAck>(&response.body) {
            Ok(UploadAck {
                success: true,
                url: Some(url),
            }) => Some(url),
            Ok(_) => {
                tracing::error!(filename = %filename, "Upload reported failure");
                None
            }
            Err(e) => {
                tracing::error!(filename = %filename, "Malformed upload response: {}", e);
                None
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Option<T> {
        let response = match self.transport.get(path).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(path, "Remote fetch failed: {:#}", e);
                return None;
            }
        };

        if response.status == StatusCode::NOT_FOUND {
            tracing::info!(path, "Remote has no such content (404)");
            return None;
        }
        if !response.status.is_success() {
            tracing::warn!(path, status = %response.status, "Remote fetch rejected");
            return None;
        }

        match serde_json::from_str::<T>(&response.body) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(path, "Malformed remote response: {}", e);
                None
            }
        }
    }
}

fn acknowledged(path: &str, response: Result<RemoteResponse>) -> bool {
    match response {
        Ok(response) if response.status.is_success() => {
            match serde_json::from_str::<WriteAck>(&response.body) {
                Ok(ack) => ack.success,
                Err(e) => {
                    tracing::warn!(path, "Malformed write acknowledgement: {}", e);
                    false
                }
            }
        }
        Ok(response) => {
            tracing::warn!(path, status = %response.status, "Remote write rejected");
            false
        }
        Err(e) => {
            tracing::warn!(path, "Remote write failed: {:#}", e);
            false
        }
    }
}
