//! Service error types.
//!
//! Failures when talking to the drill-metadata service. Defined in
//! `vocadrill-core` so the challenge engine can classify errors at the
//! loader/submitter boundary without string matching.

use thiserror::Error;

/// Errors that can occur when calling the drill-metadata service.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service returned a non-2xx response.
    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A transport-level failure (DNS, connection reset, TLS).
    #[error("network error: {0}")]
    Network(String),

    /// The response body did not match the expected envelope shape.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl ServiceError {
    /// The HTTP status, when the service answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ServiceError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` when the failure came from the service rather than the
    /// transport (useful to distinguish "backend said no" from "no backend").
    pub fn is_api_error(&self) -> bool {
        matches!(self, ServiceError::Api { .. })
    }
}
