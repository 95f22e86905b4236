use thiserror::Error;

/// Domain-level errors: local failures that happen before or after any
/// network round-trip.
#[derive(Debug, Error, Clone)]
pub enum DomainError {
    #[error("File error: {0}")]
    File(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Service-level errors returned by the compression orchestration and the
/// remote service client.
///
/// Remote failures keep their upstream category so callers can decide
/// whether to retry, re-authenticate, or abort instead of seeing a single
/// collapsed error string.
#[derive(Debug, Error, Clone)]
pub enum ServiceError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Authentication error: {0}")]
    Authentication(String),

    /// The service accepted the connection but rejected or failed the
    /// request/job itself.
    #[error("Service API error: {message}")]
    ServiceApi {
        status: Option<u16>,
        code: Option<String>,
        message: String,
    },

    /// Quota or rate-limit failures (HTTP 429).
    #[error("Service usage limit reached: {0}")]
    ServiceUsage(String),

    /// Client-side failures: transport errors, unreadable responses,
    /// protocol violations.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timed out waiting for job completion after {attempts} polls")]
    Timeout { attempts: u32 },
}
