//! Trait abstraction for submission transports to enable mocking in tests

use super::payload::SubmissionPayload;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Result of the primary, fire-and-forget dispatch.
///
/// The primary endpoint's response is never read, so the only thing known
/// is whether the request left without a transport-level failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    Dispatched,
    TransportFailed(String),
}

/// Failures of the fallback request
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("network error: {0}")]
    Network(String),
    #[error("failed to encode payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Trait for sending a payload to the remote endpoints, enabling mocking in tests
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionTransport: Send + Sync {
    /// POST to the primary endpoint without looking at the response
    async fn dispatch_primary(&self, payload: &SubmissionPayload) -> DispatchOutcome;

    /// POST to the fallback endpoint and report the HTTP status
    async fn dispatch_fallback(&self, payload: &SubmissionPayload) -> Result<u16, TransportError>;
}
