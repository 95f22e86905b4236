//! Type definitions for the compression domain.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::client::types::Asset;
use crate::errors::DomainError;

/// Trade-off the remote service makes between output file size and
/// quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompressionLevel {
    Low,
    Medium,
    High,
}

impl CompressionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CompressionLevel::Low => "LOW",
            CompressionLevel::Medium => "MEDIUM",
            CompressionLevel::High => "HIGH",
        }
    }
}

impl FromStr for CompressionLevel {
    type Err = DomainError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "LOW" => Ok(CompressionLevel::Low),
            "MEDIUM" => Ok(CompressionLevel::Medium),
            "HIGH" => Ok(CompressionLevel::High),
            _ => Err(DomainError::Validation(format!(
                "Invalid compression level: {}",
                s
            ))),
        }
    }
}

/// Parameters for a compress job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressPdfParams {
    pub compression_level: CompressionLevel,
}

impl CompressPdfParams {
    pub fn new(compression_level: CompressionLevel) -> Self {
        Self { compression_level }
    }
}

impl Default for CompressPdfParams {
    fn default() -> Self {
        // The service default when no level is given.
        Self::new(CompressionLevel::Medium)
    }
}

/// A compress job referencing an uploaded input asset. Serializes directly
/// into the submission request body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressPdfJob {
    #[serde(rename = "assetID")]
    pub asset_id: String,
    pub compression_level: CompressionLevel,
}

impl CompressPdfJob {
    pub fn new(input_asset: &Asset, params: CompressPdfParams) -> Self {
        Self {
            asset_id: input_asset.asset_id.clone(),
            compression_level: params.compression_level,
        }
    }
}

/// Result of a completed compress job: the handle of the output artifact.
#[derive(Debug, Clone)]
pub struct CompressPdfResult {
    pub asset: Asset,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compression_level_round_trips_through_strings() {
        for level in [
            CompressionLevel::Low,
            CompressionLevel::Medium,
            CompressionLevel::High,
        ] {
            assert_eq!(level.as_str().parse::<CompressionLevel>().unwrap(), level);
        }
    }

    #[test]
    fn compression_level_parse_is_case_insensitive() {
        assert_eq!(
            "high".parse::<CompressionLevel>().unwrap(),
            CompressionLevel::High
        );
    }

    #[test]
    fn unknown_compression_level_is_rejected() {
        let err = "MAXIMUM".parse::<CompressionLevel>().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn job_serializes_into_submission_body() {
        let job = CompressPdfJob::new(
            &Asset::new("urn:asset:input"),
            CompressPdfParams::new(CompressionLevel::High),
        );
        let body = serde_json::to_string(&job).unwrap();
        assert_eq!(
            body,
            r#"{"assetID":"urn:asset:input","compressionLevel":"HIGH"}"#
        );
    }
}
