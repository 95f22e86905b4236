//! Handle and wire types for the remote service API.

use serde::{Deserialize, Serialize};

/// Opaque reference to a file held by the remote service. Returned by
/// upload and by completed jobs; never interpreted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asset {
    pub asset_id: String,
    /// Present only on result assets; input assets are addressed purely
    /// by id.
    pub download_uri: Option<String>,
}

impl Asset {
    pub fn new(asset_id: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            download_uri: None,
        }
    }

    pub fn with_download_uri(asset_id: impl Into<String>, download_uri: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            download_uri: Some(download_uri.into()),
        }
    }
}

/// Opaque URL returned when a job is submitted, polled until completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobLocation(String);

impl JobLocation {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Lifecycle states a submitted job reports while being polled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum JobStatus {
    #[serde(rename = "in progress")]
    InProgress,
    #[serde(rename = "done")]
    Done,
    #[serde(rename = "failed")]
    Failed,
}

// --- Wire DTOs ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAssetRequest {
    pub media_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreateAssetResponse {
    pub upload_uri: String,
    #[serde(rename = "assetID")]
    pub asset_id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct JobStatusResponse {
    pub status: JobStatus,
    pub asset: Option<ResultAssetInfo>,
    pub error: Option<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResultAssetInfo {
    #[serde(rename = "assetID")]
    pub asset_id: Option<String>,
    #[serde(rename = "downloadUri")]
    pub download_uri: String,
}

/// Error detail the service embeds in failure responses and failed jobs.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub code: Option<String>,
    pub message: Option<String>,
    pub status: Option<u16>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: Option<ApiErrorDetail>,
}
