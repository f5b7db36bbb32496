use serde::{Serialize, Deserialize};
use thiserror::Error;

/// Typed failure raised by collectors and the export pipeline.
///
/// Every external operation a collector performs (HTTP, DNS, WHOIS,
/// filesystem reads) converts its underlying error into one of these
/// variants before it crosses the collector boundary. The orchestrator
/// records them; it never aborts a run on any of them.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// Timeout, connection refused, or a non-2xx response.
    #[error("network failure: {message}")]
    Network {
        message: String,
        /// HTTP-status-like code, when the transport produced one.
        status: Option<u16>,
    },

    /// An optional dependency or service capability is absent.
    #[error("capability missing: {0}")]
    CapabilityMissing(String),

    /// The response did not match the expected structure.
    #[error("parse failure: {0}")]
    Parse(String),

    /// A required configuration key is absent or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The target descriptor itself is malformed (e.g. invalid IP literal).
    #[error("invalid target: {0}")]
    Validation(String),
}

impl CollectorError {
    pub fn network(message: impl Into<String>) -> Self {
        CollectorError::Network { message: message.into(), status: None }
    }

    pub fn http_status(status: u16) -> Self {
        CollectorError::Network {
            message: format!("request returned status {}", status),
            status: Some(status),
        }
    }
}

/// Failure category tag carried by recorded outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    Network,
    CapabilityMissing,
    Parse,
    Configuration,
    Validation,
}

/// Serializable form of a [`CollectorError`], stored in the run record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectorFailure {
    pub kind: FailureKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl From<CollectorError> for CollectorFailure {
    fn from(err: CollectorError) -> Self {
        match err {
            CollectorError::Network { message, status } => CollectorFailure {
                kind: FailureKind::Network,
                message,
                status,
            },
            CollectorError::CapabilityMissing(message) => CollectorFailure {
                kind: FailureKind::CapabilityMissing,
                message,
                status: None,
            },
            CollectorError::Parse(message) => CollectorFailure {
                kind: FailureKind::Parse,
                message,
                status: None,
            },
            CollectorError::Configuration(message) => CollectorFailure {
                kind: FailureKind::Configuration,
                message,
                status: None,
            },
            CollectorError::Validation(message) => CollectorFailure {
                kind: FailureKind::Validation,
                message,
                status: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_failure_carries_status() {
        let failure: CollectorFailure = CollectorError::http_status(503).into();
        assert_eq!(failure.kind, FailureKind::Network);
        assert_eq!(failure.status, Some(503));
        assert!(failure.message.contains("503"));
    }

    #[test]
    fn test_capability_missing_has_no_status() {
        let failure: CollectorFailure =
            CollectorError::CapabilityMissing("no OCR engine".to_string()).into();
        assert_eq!(failure.kind, FailureKind::CapabilityMissing);
        assert_eq!(failure.status, None);
    }

    #[test]
    fn test_failure_kind_serializes_kebab_case() {
        let failure: CollectorFailure =
            CollectorError::Validation("not an IP".to_string()).into();
        let json = serde_json::to_value(&failure).unwrap();
        assert_eq!(json["kind"], "validation");
        assert!(json.get("status").is_none());
    }
}
