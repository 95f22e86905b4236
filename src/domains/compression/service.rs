//! Orchestration of a single remote compression run: read the input file,
//! upload it, submit the job, wait for the result, download it, and write
//! it to the output directory.

use async_trait::async_trait;
use log::{debug, info};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

use crate::client::pdf_services::PdfServicesApi;
use crate::domains::compression::output::{create_output_file_path, DEFAULT_OUTPUT_DIR};
use crate::domains::compression::types::{CompressPdfJob, CompressPdfParams, CompressionLevel};
use crate::errors::{DomainError, ServiceResult};

/// What a completed run produced.
#[derive(Debug, Clone)]
pub struct CompressionOutcome {
    pub output_path: PathBuf,
    pub original_size: u64,
    pub compressed_size: u64,
}

impl CompressionOutcome {
    pub fn space_saved_percentage(&self) -> f64 {
        if self.original_size == 0 {
            return 0.0;
        }
        let saved = self.original_size.saturating_sub(self.compressed_size);
        (saved as f64 / self.original_size as f64) * 100.0
    }
}

#[async_trait]
pub trait CompressionService: Send + Sync {
    /// Run the full upload/compress/download sequence for one local file.
    async fn compress_file(
        &self,
        input_path: &Path,
        level: CompressionLevel,
    ) -> ServiceResult<CompressionOutcome>;
}

pub struct CompressionServiceImpl {
    client: Arc<dyn PdfServicesApi>,
    output_dir: PathBuf,
}

impl CompressionServiceImpl {
    pub fn new(client: Arc<dyn PdfServicesApi>) -> Self {
        Self::with_output_dir(client, DEFAULT_OUTPUT_DIR)
    }

    pub fn with_output_dir(client: Arc<dyn PdfServicesApi>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            output_dir: output_dir.into(),
        }
    }
}

#[async_trait]
impl CompressionService for CompressionServiceImpl {
    async fn compress_file(
        &self,
        input_path: &Path,
        level: CompressionLevel,
    ) -> ServiceResult<CompressionOutcome> {
        // The input is read fully before the first remote call.
        let input = fs::read(input_path).await.map_err(|e| {
            DomainError::File(format!(
                "failed to read input file {}: {}",
                input_path.display(),
                e
            ))
        })?;
        let original_size = input.len() as u64;
        debug!("read {} bytes from {}", original_size, input_path.display());

        let input_asset = self.client.upload(input, mime::APPLICATION_PDF).await?;

        let job = CompressPdfJob::new(&input_asset, CompressPdfParams::new(level));
        let location = self.client.submit(&job).await?;

        let result = self.client.get_job_result(&location).await?;
        let content = self.client.get_content(&result.asset).await?;
        let compressed_size = content.len() as u64;

        let output_path = create_output_file_path(&self.output_dir, level)?;
        fs::write(&output_path, &content).await.map_err(|e| {
            DomainError::File(format!(
                "failed to write output file {}: {}",
                output_path.display(),
                e
            ))
        })?;

        info!(
            "compressed {} -> {} ({} -> {} bytes)",
            input_path.display(),
            output_path.display(),
            original_size,
            compressed_size
        );

        Ok(CompressionOutcome {
            output_path,
            original_size,
            compressed_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::pdf_services::MockPdfServices;
    use crate::errors::ServiceError;

    #[tokio::test]
    async fn compress_file_writes_result_to_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("input.pdf");
        std::fs::write(&input_path, b"%PDF-1.4 original content").unwrap();

        let client = Arc::new(MockPdfServices::succeeding(b"%PDF-1.4 small".to_vec()));
        let service =
            CompressionServiceImpl::with_output_dir(client.clone(), dir.path().join("out"));

        let outcome = service
            .compress_file(&input_path, CompressionLevel::High)
            .await
            .unwrap();

        // upload, submit, poll, download
        assert_eq!(client.calls(), 4);
        assert_eq!(outcome.original_size, 25);
        assert_eq!(outcome.compressed_size, 14);

        let written = std::fs::read(&outcome.output_path).unwrap();
        assert_eq!(written, b"%PDF-1.4 small");

        let name = outcome.output_path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("compress"));
        assert!(name.ends_with("_HIGH.pdf"));
    }

    #[tokio::test]
    async fn missing_input_file_fails_before_any_remote_call() {
        let dir = tempfile::tempdir().unwrap();
        let client = Arc::new(MockPdfServices::succeeding(Vec::new()));
        let service =
            CompressionServiceImpl::with_output_dir(client.clone(), dir.path().join("out"));

        let err = service
            .compress_file(&dir.path().join("absent.pdf"), CompressionLevel::High)
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Domain(DomainError::File(_))));
        assert_eq!(client.calls(), 0);
    }

    #[tokio::test]
    async fn failed_job_surfaces_service_api_error() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("input.pdf");
        std::fs::write(&input_path, b"%PDF-1.4").unwrap();

        let client = Arc::new(MockPdfServices::failing_job(ServiceError::ServiceApi {
            status: Some(400),
            code: Some("INVALID_PDF".to_string()),
            message: "The PDF is corrupt".to_string(),
        }));
        let service =
            CompressionServiceImpl::with_output_dir(client.clone(), dir.path().join("out"));

        let err = service
            .compress_file(&input_path, CompressionLevel::High)
            .await
            .unwrap_err();

        match err {
            ServiceError::ServiceApi { code, .. } => {
                assert_eq!(code.as_deref(), Some("INVALID_PDF"));
            }
            other => panic!("expected ServiceApi, got {:?}", other),
        }

        // upload, submit, poll; nothing downloaded, nothing written
        assert_eq!(client.calls(), 3);
        assert!(!dir.path().join("out").exists());
    }
}
