// Declare submodules for the compression domain
pub mod output;
pub mod service;
pub mod types;

// Re-export key types
pub use types::{CompressPdfJob, CompressPdfParams, CompressPdfResult, CompressionLevel};

pub use output::{create_output_file_path, output_file_name, DEFAULT_OUTPUT_DIR};
pub use service::{CompressionOutcome, CompressionService, CompressionServiceImpl};
