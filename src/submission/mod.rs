//! Form submission: payload, transports and the primary/fallback pipeline

mod http;
mod payload;
mod pipeline;
mod transport;

pub use http::HttpTransport;
pub use payload::SubmissionPayload;
pub use pipeline::{SubmissionEvent, SubmissionOutcome, SubmissionPhase, SubmissionPipeline};
pub use transport::{DispatchOutcome, SubmissionTransport};

#[cfg(test)]
pub use transport::MockSubmissionTransport;
