//! Output path construction for compression results.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::domains::compression::types::CompressionLevel;
use crate::errors::{DomainError, DomainResult};

/// Directory compression results are written to, relative to the working
/// directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output/CompressPDF";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H-%M-%S";

/// File name for a result produced at `at`. Timestamps have second
/// granularity, so two runs within the same second resolve to the same
/// name and the later write wins.
pub fn output_file_name(level: CompressionLevel, at: &DateTime<Local>) -> String {
    format!(
        "compress{}_{}.pdf",
        at.format(TIMESTAMP_FORMAT),
        level.as_str()
    )
}

/// Resolve the output path for a run, creating the output directory if it
/// does not exist yet.
pub fn create_output_file_path(
    output_dir: &Path,
    level: CompressionLevel,
) -> DomainResult<PathBuf> {
    std::fs::create_dir_all(output_dir).map_err(|e| {
        DomainError::File(format!(
            "failed to create output directory {}: {}",
            output_dir.display(),
            e
        ))
    })?;
    Ok(output_dir.join(output_file_name(level, &Local::now())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_is_deterministic_for_a_given_second() {
        let at = Local.with_ymd_and_hms(2024, 9, 12, 8, 30, 5).unwrap();
        let first = output_file_name(CompressionLevel::High, &at);
        let second = output_file_name(CompressionLevel::High, &at);
        assert_eq!(first, second);
        assert_eq!(first, "compress2024-09-12T08-30-05_HIGH.pdf");
    }

    #[test]
    fn file_name_carries_the_level_label() {
        let at = Local.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        assert_eq!(
            output_file_name(CompressionLevel::Low, &at),
            "compress2025-01-02T03-04-05_LOW.pdf"
        );
    }

    #[test]
    fn create_output_file_path_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let output_dir = dir.path().join("output").join("CompressPDF");

        let path = create_output_file_path(&output_dir, CompressionLevel::High).unwrap();

        assert!(output_dir.is_dir());
        let name = path.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("compress"));
        assert!(name.ends_with("_HIGH.pdf"));
    }
}
