//! HTTP client for the hosted document-processing service.
//!
//! Owns the wire protocol: token retrieval, asset upload, job submission,
//! job polling, and content download. Nothing outside this module builds
//! requests or interprets responses.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::{CONTENT_TYPE, LOCATION};
use reqwest::{Client, StatusCode};
use std::env;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::auth::ServicePrincipalCredentials;
use crate::client::config::ClientConfig;
use crate::client::types::{
    ApiErrorBody, Asset, CreateAssetRequest, CreateAssetResponse, JobLocation, JobStatus,
    JobStatusResponse, TokenResponse,
};
use crate::domains::compression::types::{CompressPdfJob, CompressPdfResult};
use crate::errors::{ServiceError, ServiceResult};

/// Hosted endpoint, overridable through `PDF_SERVICES_BASE_URL`.
pub const DEFAULT_BASE_URL: &str = "https://pdf-services.adobe.io";

const BASE_URL_ENV: &str = "PDF_SERVICES_BASE_URL";
const API_KEY_HEADER: &str = "x-api-key";

/// Access tokens are refreshed this long before their reported expiry.
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;

const POLL_INTERVAL_MS: u64 = 2_000;
const MAX_POLL_ATTEMPTS: u32 = 60;

/// Operations the remote service exposes to this crate.
#[async_trait]
pub trait PdfServicesApi: Send + Sync {
    /// Upload raw file bytes, receiving an opaque asset handle.
    async fn upload(&self, input: Vec<u8>, media_type: mime::Mime) -> ServiceResult<Asset>;

    /// Submit a compress job, receiving the location to poll.
    async fn submit(&self, job: &CompressPdfJob) -> ServiceResult<JobLocation>;

    /// Poll the job location until it completes or the poll budget runs out.
    async fn get_job_result(&self, location: &JobLocation) -> ServiceResult<CompressPdfResult>;

    /// Download the content of a result asset.
    async fn get_content(&self, asset: &Asset) -> ServiceResult<Vec<u8>>;
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Client for the hosted service, authenticated with service principal
/// credentials via the OAuth client-credentials exchange.
pub struct PdfServices {
    client: Client,
    base_url: String,
    credentials: ServicePrincipalCredentials,
    token: Mutex<Option<CachedToken>>,
}

impl PdfServices {
    pub fn new(
        credentials: ServicePrincipalCredentials,
        config: ClientConfig,
    ) -> ServiceResult<Self> {
        let base_url =
            env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        Self::with_base_url(credentials, config, &base_url)
    }

    pub fn with_base_url(
        credentials: ServicePrincipalCredentials,
        config: ClientConfig,
        base_url: &str,
    ) -> ServiceResult<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout())
            .read_timeout(config.read_timeout())
            .build()
            .map_err(|e| {
                ServiceError::Configuration(format!("failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            token: Mutex::new(None),
        })
    }

    /// Return a valid access token, fetching or refreshing when the cached
    /// one is absent or about to expire.
    async fn access_token(&self) -> ServiceResult<String> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.access_token.clone());
            }
        }

        debug!("requesting new access token");
        let response = self
            .client
            .post(format!("{}/token", self.base_url))
            .form(&[
                ("client_id", self.credentials.client_id()),
                ("client_secret", self.credentials.client_secret()),
            ])
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("token request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("token request", response).await);
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            ServiceError::Transport(format!("failed to parse token response: {}", e))
        })?;

        let lifetime = token.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        *cached = Some(CachedToken {
            access_token: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(token.access_token)
    }

    /// Map a non-success response to its upstream failure category.
    async fn error_from_response(operation: &str, response: reqwest::Response) -> ServiceError {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "unable to read error body".to_string());

        let detail = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.error);
        let message = detail
            .as_ref()
            .and_then(|d| d.message.clone())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    format!("HTTP {}", status)
                } else {
                    body.clone()
                }
            });
        let code = detail.and_then(|d| d.code);

        Self::classify(operation, status, code, message)
    }

    fn classify(
        operation: &str,
        status: StatusCode,
        code: Option<String>,
        message: String,
    ) -> ServiceError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                ServiceError::Authentication(format!("{}: {}", operation, message))
            }
            StatusCode::TOO_MANY_REQUESTS => {
                ServiceError::ServiceUsage(format!("{}: {}", operation, message))
            }
            _ => ServiceError::ServiceApi {
                status: Some(status.as_u16()),
                code,
                message: format!("{}: {}", operation, message),
            },
        }
    }
}

#[async_trait]
impl PdfServicesApi for PdfServices {
    async fn upload(&self, input: Vec<u8>, media_type: mime::Mime) -> ServiceResult<Asset> {
        let token = self.access_token().await?;

        debug!("requesting upload slot for {} bytes ({})", input.len(), media_type);
        let response = self
            .client
            .post(format!("{}/assets", self.base_url))
            .bearer_auth(&token)
            .header(API_KEY_HEADER, self.credentials.client_id())
            .json(&CreateAssetRequest {
                media_type: media_type.to_string(),
            })
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("asset creation failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("create asset", response).await);
        }

        let created: CreateAssetResponse = response.json().await.map_err(|e| {
            ServiceError::Transport(format!("failed to parse asset creation response: {}", e))
        })?;

        // The upload URI is presigned; no auth headers on this request.
        let upload = self
            .client
            .put(&created.upload_uri)
            .header(CONTENT_TYPE, media_type.as_ref())
            .body(input)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("asset upload failed: {}", e)))?;

        if !upload.status().is_success() {
            return Err(Self::error_from_response("upload asset", upload).await);
        }

        info!("uploaded input asset {}", created.asset_id);
        Ok(Asset::new(created.asset_id))
    }

    async fn submit(&self, job: &CompressPdfJob) -> ServiceResult<JobLocation> {
        let token = self.access_token().await?;

        let response = self
            .client
            .post(format!("{}/operation/compresspdf", self.base_url))
            .bearer_auth(&token)
            .header(API_KEY_HEADER, self.credentials.client_id())
            .json(job)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("job submission failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("submit job", response).await);
        }

        let location = response
            .headers()
            .get(LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(JobLocation::new)
            .ok_or_else(|| {
                ServiceError::Transport(
                    "job submission response carried no Location header".to_string(),
                )
            })?;

        info!("submitted compress job, polling {}", location.as_str());
        Ok(location)
    }

    async fn get_job_result(&self, location: &JobLocation) -> ServiceResult<CompressPdfResult> {
        for attempt in 1..=MAX_POLL_ATTEMPTS {
            let token = self.access_token().await?;
            let response = self
                .client
                .get(location.as_str())
                .bearer_auth(&token)
                .header(API_KEY_HEADER, self.credentials.client_id())
                .send()
                .await
                .map_err(|e| ServiceError::Transport(format!("job poll failed: {}", e)))?;

            if !response.status().is_success() {
                return Err(Self::error_from_response("poll job", response).await);
            }

            let job_status: JobStatusResponse = response.json().await.map_err(|e| {
                ServiceError::Transport(format!("failed to parse job status response: {}", e))
            })?;

            match job_status.status {
                JobStatus::Done => {
                    let result = job_status.asset.ok_or_else(|| {
                        ServiceError::Transport(
                            "completed job reported no result asset".to_string(),
                        )
                    })?;
                    info!("compress job done after {} polls", attempt);
                    return Ok(CompressPdfResult {
                        asset: Asset::with_download_uri(
                            result.asset_id.unwrap_or_default(),
                            result.download_uri,
                        ),
                    });
                }
                JobStatus::Failed => {
                    let detail = job_status.error;
                    return Err(ServiceError::ServiceApi {
                        status: detail.as_ref().and_then(|d| d.status),
                        code: detail.as_ref().and_then(|d| d.code.clone()),
                        message: detail
                            .and_then(|d| d.message)
                            .unwrap_or_else(|| "job failed without error detail".to_string()),
                    });
                }
                JobStatus::InProgress => {
                    debug!("job in progress (poll {}/{})", attempt, MAX_POLL_ATTEMPTS);
                    tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                }
            }
        }

        Err(ServiceError::Timeout {
            attempts: MAX_POLL_ATTEMPTS,
        })
    }

    async fn get_content(&self, asset: &Asset) -> ServiceResult<Vec<u8>> {
        let download_uri = asset.download_uri.as_deref().ok_or_else(|| {
            ServiceError::Transport(format!("asset {} has no download URI", asset.asset_id))
        })?;

        // Download URIs are presigned; no auth headers on this request.
        let response = self
            .client
            .get(download_uri)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("content download failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Self::error_from_response("download content", response).await);
        }

        let bytes = response.bytes().await.map_err(|e| {
            ServiceError::Transport(format!("failed to read downloaded content: {}", e))
        })?;

        debug!("downloaded {} bytes of result content", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Mock implementation for testing the orchestration without a network.
#[cfg(test)]
pub(crate) struct MockPdfServices {
    result_bytes: Vec<u8>,
    job_error: Option<ServiceError>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockPdfServices {
    pub fn succeeding(result_bytes: Vec<u8>) -> Self {
        Self {
            result_bytes,
            job_error: None,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn failing_job(error: ServiceError) -> Self {
        Self {
            result_bytes: Vec::new(),
            job_error: Some(error),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Total remote calls this mock has served.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
#[async_trait]
impl PdfServicesApi for MockPdfServices {
    async fn upload(&self, _input: Vec<u8>, _media_type: mime::Mime) -> ServiceResult<Asset> {
        self.record_call();
        Ok(Asset::new("urn:asset:mock-input"))
    }

    async fn submit(&self, _job: &CompressPdfJob) -> ServiceResult<JobLocation> {
        self.record_call();
        Ok(JobLocation::new("https://mock.invalid/jobs/1/status"))
    }

    async fn get_job_result(&self, _location: &JobLocation) -> ServiceResult<CompressPdfResult> {
        self.record_call();
        if let Some(error) = &self.job_error {
            return Err(error.clone());
        }
        Ok(CompressPdfResult {
            asset: Asset::with_download_uri(
                "urn:asset:mock-result",
                "https://mock.invalid/download/1",
            ),
        })
    }

    async fn get_content(&self, _asset: &Asset) -> ServiceResult<Vec<u8>> {
        self.record_call();
        Ok(self.result_bytes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_maps_to_authentication_error() {
        let err = PdfServices::classify(
            "token request",
            StatusCode::UNAUTHORIZED,
            None,
            "invalid client".to_string(),
        );
        assert!(matches!(err, ServiceError::Authentication(_)));
    }

    #[test]
    fn too_many_requests_maps_to_usage_error() {
        let err = PdfServices::classify(
            "submit job",
            StatusCode::TOO_MANY_REQUESTS,
            Some("QUOTA_EXCEEDED".to_string()),
            "quota exhausted".to_string(),
        );
        assert!(matches!(err, ServiceError::ServiceUsage(_)));
    }

    #[test]
    fn server_error_maps_to_service_api_error() {
        let err = PdfServices::classify(
            "create asset",
            StatusCode::INTERNAL_SERVER_ERROR,
            None,
            "boom".to_string(),
        );
        match err {
            ServiceError::ServiceApi { status, .. } => assert_eq!(status, Some(500)),
            other => panic!("expected ServiceApi, got {:?}", other),
        }
    }
}
