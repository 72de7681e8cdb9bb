//! Primary-then-fallback submission
//!
//! The pipeline runs off the UI loop: `spawn` moves it onto a tokio task
//! that reports phase changes and the final outcome over a channel.

use super::payload::SubmissionPayload;
use super::transport::{DispatchOutcome, SubmissionTransport};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

/// Where a submission attempt currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Validating,
    Submitting,
    FallbackSubmitting,
    Success,
    Failed,
}

impl SubmissionPhase {
    /// True between validation success and resolution
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Self::Validating | Self::Submitting | Self::FallbackSubmitting
        )
    }
}

/// How an attempt resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Delivered { via_fallback: bool },
    Failed { reason: String },
}

/// Messages from the background task to the UI loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionEvent {
    Phase(SubmissionPhase),
    Finished(SubmissionOutcome),
}

/// The fallback endpoint answers 200, or 0 when the response is opaque
pub fn is_fallback_success(status: u16) -> bool {
    matches!(status, 0 | 200)
}

#[derive(Clone)]
pub struct SubmissionPipeline {
    transport: Arc<dyn SubmissionTransport>,
    /// Pause before reporting a delivered submission
    success_delay: Duration,
}

impl SubmissionPipeline {
    pub fn new(transport: Arc<dyn SubmissionTransport>, success_delay: Duration) -> Self {
        Self {
            transport,
            success_delay,
        }
    }

    /// Run one attempt to completion, reporting phase changes to `on_phase`
    pub async fn run<F>(&self, payload: &SubmissionPayload, mut on_phase: F) -> SubmissionOutcome
    where
        F: FnMut(SubmissionPhase),
    {
        let attempt = payload.attempt_id();
        info!(%attempt, filename = payload.filename(), "Submitting form");
        on_phase(SubmissionPhase::Submitting);

        let via_fallback = match self.transport.dispatch_primary(payload).await {
            DispatchOutcome::Dispatched => false,
            DispatchOutcome::TransportFailed(reason) => {
                warn!(%attempt, "Primary submission failed, trying fallback: {reason}");
                on_phase(SubmissionPhase::FallbackSubmitting);

                match self.transport.dispatch_fallback(payload).await {
                    Ok(status) if is_fallback_success(status) => true,
                    Ok(status) => {
                        warn!(%attempt, status, "Fallback submission rejected");
                        on_phase(SubmissionPhase::Failed);
                        return SubmissionOutcome::Failed {
                            reason: format!("fallback returned status {status}"),
                        };
                    }
                    Err(e) => {
                        warn!(%attempt, "Fallback submission failed: {e}");
                        on_phase(SubmissionPhase::Failed);
                        return SubmissionOutcome::Failed {
                            reason: e.to_string(),
                        };
                    }
                }
            }
        };

        if !self.success_delay.is_zero() {
            tokio::time::sleep(self.success_delay).await;
        }
        info!(%attempt, via_fallback, "Form submitted");
        on_phase(SubmissionPhase::Success);
        SubmissionOutcome::Delivered { via_fallback }
    }

    /// Run an attempt on a background task, forwarding events to `tx`
    pub fn spawn(
        &self,
        payload: SubmissionPayload,
        tx: UnboundedSender<SubmissionEvent>,
    ) -> tokio::task::JoinHandle<()> {
        let pipeline = self.clone();
        tokio::spawn(async move {
            let phase_tx = tx.clone();
            let outcome = pipeline
                .run(&payload, |phase| {
                    // Receiver gone means the app is shutting down
                    let _ = phase_tx.send(SubmissionEvent::Phase(phase));
                })
                .await;
            let _ = tx.send(SubmissionEvent::Finished(outcome));
        })
    }
}
