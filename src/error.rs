//! Errors returned by client operations.
//!
//! Every failure is a [`PaycomError`]. Callers that need to branch on what the
//! gateway (or local validation) said should use [`PaycomError::kind`], which
//! yields the same [`GatewayErrorKind`] whether the problem was caught locally
//! or reported remotely; no string matching is needed.

use paycom_types::error_code::GatewayErrorKind;
use paycom_types::proto::ErrorDetail;
use paycom_types::validation::ValidationError;
use std::time::Duration;

use crate::config::ConfigError;
use crate::transport::TransportError;

/// A failure reported by the gateway in the envelope's `error` member.
#[derive(Debug, Clone, thiserror::Error)]
#[error("Gateway error {code} ({kind}) on {method}: {message}", code = .detail.code, message = .detail.message)]
pub struct GatewayError {
    pub kind: GatewayErrorKind,
    pub method: String,
    pub request_id: String,
    /// The raw error object, kept for diagnostics.
    pub detail: ErrorDetail,
}

/// Errors that can occur while calling the gateway.
#[derive(Debug, thiserror::Error)]
pub enum PaycomError {
    #[error("Invalid client configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),
    #[error("Failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),
    #[error("Transport error: {source}")]
    Transport {
        #[source]
        source: TransportError,
    },
    #[error("Request timed out after {after:?}")]
    Timeout { after: Duration },
    #[error("Failed to decode gateway response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        /// The undecodable payload, kept for diagnostics.
        body: String,
    },
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    /// The call succeeded but carried no receipt to act on.
    #[error("Gateway returned no receipt for {method}")]
    EmptyResult { method: &'static str },
}

impl PaycomError {
    /// Taxonomy kind of a validation or gateway failure.
    ///
    /// A success that carried no receipt is reported as `ReceiptNotFound`.
    pub fn kind(&self) -> Option<GatewayErrorKind> {
        match self {
            PaycomError::Validation(e) => Some(e.kind),
            PaycomError::Gateway(e) => Some(e.kind),
            PaycomError::EmptyResult { .. } => Some(GatewayErrorKind::ReceiptNotFound),
            _ => None,
        }
    }

    /// The numeric code the gateway reported, or the canonical code of a local
    /// validation failure.
    pub fn gateway_code(&self) -> Option<i64> {
        match self {
            PaycomError::Validation(e) => Some(e.kind.code()),
            PaycomError::Gateway(e) => Some(e.detail.code),
            PaycomError::EmptyResult { .. } => Some(GatewayErrorKind::ReceiptNotFound.code()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, PaycomError::Timeout { .. })
    }

    /// The raw gateway error object, if this is a gateway failure.
    pub fn detail(&self) -> Option<&ErrorDetail> {
        match self {
            PaycomError::Gateway(e) => Some(&e.detail),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_is_shared_by_local_and_remote_failures() {
        let local: PaycomError =
            ValidationError::new(GatewayErrorKind::InvalidAmount, "amount must be positive")
                .into();
        let remote: PaycomError = GatewayError {
            kind: GatewayErrorKind::InvalidAmount,
            method: "receipts.create".to_string(),
            request_id: "ReceiptsCreate:1".to_string(),
            detail: ErrorDetail {
                message: "Неверная сумма".to_string(),
                code: -31611,
                data: None,
                origin: None,
            },
        }
        .into();
        assert_eq!(local.kind(), remote.kind());
        assert_eq!(local.gateway_code(), Some(-31611));
        assert_eq!(remote.gateway_code(), Some(-31611));
        assert!(remote.to_string().contains("-31611"));
    }

    #[test]
    fn test_empty_result_reads_as_missing_receipt() {
        let error = PaycomError::EmptyResult {
            method: "receipts.check",
        };
        assert_eq!(error.kind(), Some(GatewayErrorKind::ReceiptNotFound));
        assert_eq!(error.gateway_code(), Some(-31401));
        assert!(error.detail().is_none());
    }

    #[test]
    fn test_timeout_has_no_kind() {
        let error = PaycomError::Timeout {
            after: Duration::from_secs(30),
        };
        assert!(error.is_timeout());
        assert_eq!(error.kind(), None);
    }
}
