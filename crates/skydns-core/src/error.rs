//! Shared error type across SkyDNS metrics crates.

use thiserror::Error;

/// Stable error codes (safe to log and match on).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Invalid configuration value.
    BadConfig,
    /// A metric family name was registered twice.
    DuplicateMetric,
    /// The exposition listener could not be bound.
    Bind,
    /// The exposition listener stopped serving.
    Serve,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::DuplicateMetric => "DUPLICATE_METRIC",
            ErrorCode::Bind => "BIND_FAILED",
            ErrorCode::Serve => "SERVE_FAILED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, SkyDnsError>;

/// Unified error type used by core and metrics.
#[derive(Debug, Error)]
pub enum SkyDnsError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("duplicate metric family: {0}")]
    DuplicateMetric(String),
    #[error("bind {addr} failed: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("metrics listener stopped: {0}")]
    Serve(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl SkyDnsError {
    /// Map the error to a stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            SkyDnsError::BadConfig(_) => ErrorCode::BadConfig,
            SkyDnsError::DuplicateMetric(_) => ErrorCode::DuplicateMetric,
            SkyDnsError::Bind { .. } => ErrorCode::Bind,
            SkyDnsError::Serve(_) => ErrorCode::Serve,
            SkyDnsError::Internal(_) => ErrorCode::Internal,
        }
    }
}
