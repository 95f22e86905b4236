//! Compresses a local PDF through the hosted document-processing service
//! and writes the result under `output/CompressPDF/`.

use log::{error, info};
use std::path::Path;
use std::sync::Arc;

use pdf_services_core::auth::{CredentialsFile, ServicePrincipalCredentials};
use pdf_services_core::client::{ClientConfig, PdfServices};
use pdf_services_core::domains::compression::{
    CompressionLevel, CompressionService, CompressionServiceImpl,
};
use pdf_services_core::errors::ServiceResult;

const CREDENTIALS_PATH: &str = "input/pdfservices-api-credentials.json";
const INPUT_PDF_PATH: &str = "input/test_file.pdf";
const COMPRESSION_LEVEL: CompressionLevel = CompressionLevel::High;

#[tokio::main]
async fn main() {
    init_logging();

    // A failed run is logged and the process still exits normally.
    if let Err(e) = run().await {
        error!("compression run failed: {}", e);
    }
}

async fn run() -> ServiceResult<()> {
    let credentials_file = CredentialsFile::from_path(Path::new(CREDENTIALS_PATH))?;
    credentials_file.init_env();

    let credentials = ServicePrincipalCredentials::from_env()?;
    let services = PdfServices::new(credentials, ClientConfig::default())?;

    let service = CompressionServiceImpl::new(Arc::new(services));
    let outcome = service
        .compress_file(Path::new(INPUT_PDF_PATH), COMPRESSION_LEVEL)
        .await?;

    info!(
        "wrote {} ({} -> {} bytes, {:.1}% saved)",
        outcome.output_path.display(),
        outcome.original_size,
        outcome.compressed_size,
        outcome.space_saved_percentage()
    );

    Ok(())
}

fn init_logging() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info");
    }
    env_logger::init();
}
