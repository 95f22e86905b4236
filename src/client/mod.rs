// Declare submodules for the remote service client
pub mod config;
pub mod pdf_services;
pub mod types;

pub use config::ClientConfig;
pub use pdf_services::{PdfServices, PdfServicesApi, DEFAULT_BASE_URL};
pub use types::{Asset, JobLocation, JobStatus};
