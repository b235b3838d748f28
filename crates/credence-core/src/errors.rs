//! Error types for the evaluation harness.

use std::path::PathBuf;

/// Statuses that mean the model service itself is not usable.
///
/// 404 is what the generate endpoint answers when the model is not pulled,
/// the 50x gateway codes come from a proxy in front of a stopped service.
const SERVICE_DOWN_STATUSES: [u16; 4] = [404, 502, 503, 504];

/// Classification errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifyError {
    /// Endpoint unreachable (refused, DNS, timeout).
    #[error("connection failed: {message} (endpoint: {endpoint})")]
    Connectivity { endpoint: String, message: String },

    /// Non-success status that implies the service is down or misconfigured.
    #[error("model service unavailable (status {status}): {body}")]
    ServiceUnavailable { status: u16, body: String },

    /// Any other non-success status.
    #[error("model API error (status {status}): {body}")]
    Service { status: u16, body: String },

    /// Body was not the expected JSON envelope.
    #[error("invalid response: {message}")]
    ResponseFormat { message: String },

    /// HTTP client could not be constructed.
    #[error("client error: {message}")]
    Client { message: String },
}

impl ClassifyError {
    /// Map a non-success HTTP status to an error.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if SERVICE_DOWN_STATUSES.contains(&status) {
            Self::ServiceUnavailable { status, body }
        } else {
            Self::Service { status, body }
        }
    }

    /// Whether the error must halt the whole run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Connectivity { .. } | Self::ServiceUnavailable { .. } | Self::Client { .. }
        )
    }

    /// Operator guidance printed when a fatal error aborts the run.
    pub fn guidance(&self) -> Option<&'static str> {
        match self {
            Self::Connectivity { .. } | Self::ServiceUnavailable { .. } => {
                Some("Make sure the model service is running: 'ollama serve'")
            }
            _ => None,
        }
    }
}

/// Result type for classification calls.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

/// Dataset loading errors. Malformed rows are not errors; they are dropped.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("dataset not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read dataset {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to parse config {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("unsupported config version {found} (supported: {supported})")]
    Version { found: u32, supported: u32 },

    #[error("invalid config value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Aggregation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricsError {
    #[error("ground truth cannot be UNKNOWN")]
    UnknownTruth,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_is_deterministic() {
        for status in [404, 502, 503, 504] {
            let err = ClassifyError::from_status(status, "down");
            assert!(matches!(err, ClassifyError::ServiceUnavailable { .. }));
            assert!(err.is_fatal());
        }
        for status in [400, 401, 429, 500] {
            let err = ClassifyError::from_status(status, "bad");
            assert!(matches!(err, ClassifyError::Service { .. }));
            assert!(!err.is_fatal());
        }
    }

    #[test]
    fn response_format_is_per_item() {
        let err = ClassifyError::ResponseFormat {
            message: "expected value at line 1 column 1".into(),
        };
        assert!(!err.is_fatal());
        assert!(err.guidance().is_none());
    }

    #[test]
    fn connectivity_carries_guidance() {
        let err = ClassifyError::Connectivity {
            endpoint: "http://localhost:11434/api/generate".into(),
            message: "connection refused".into(),
        };
        assert!(err.is_fatal());
        assert!(err.guidance().unwrap().contains("ollama serve"));
        assert!(err.to_string().starts_with("connection failed"));
    }
}
