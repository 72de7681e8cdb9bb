//! HTTP client for the remote form endpoints
//!
//! Both requests carry the same JSON body. The primary request is treated
//! as opaque: once it leaves without a transport error it counts as
//! delivered. The fallback request is bounded by a timeout and judged by
//! its status code.

use super::payload::SubmissionPayload;
use super::transport::{DispatchOutcome, SubmissionTransport, TransportError};
use crate::config::FormConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("anamnese-tui/", env!("CARGO_PKG_VERSION"));

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    primary: Client,
    fallback: Client,
    primary_url: String,
    fallback_url: String,
    fallback_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &FormConfig) -> Result<Self> {
        // No timeout on the primary request
        let primary = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to create HTTP client")?;

        let fallback_timeout = config.fallback_timeout();
        let fallback = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(fallback_timeout)
            .build()
            .context("Failed to create fallback HTTP client")?;

        Ok(Self {
            primary,
            fallback,
            primary_url: config.primary_endpoint.clone(),
            fallback_url: config.fallback_endpoint.clone(),
            fallback_timeout,
        })
    }
}

#[async_trait]
impl SubmissionTransport for HttpTransport {
    async fn dispatch_primary(&self, payload: &SubmissionPayload) -> DispatchOutcome {
        let body = match payload.to_json() {
            Ok(body) => body,
            Err(e) => return DispatchOutcome::TransportFailed(e.to_string()),
        };

        debug!(url = %self.primary_url, bytes = body.len(), "Dispatching form");
        let result = self
            .primary
            .post(&self.primary_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await;

        match result {
            // Response is dropped unread
            Ok(_) => DispatchOutcome::Dispatched,
            Err(e) => {
                warn!("Primary dispatch failed: {e}");
                DispatchOutcome::TransportFailed(e.to_string())
            }
        }
    }

    async fn dispatch_fallback(&self, payload: &SubmissionPayload) -> Result<u16, TransportError> {
        let body = payload.to_json()?;

        debug!(url = %self.fallback_url, "Dispatching form via fallback");
        let request = self
            .fallback
            .post(&self.fallback_url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send();

        match tokio::time::timeout(self.fallback_timeout, request).await {
            Err(_) => Err(TransportError::Timeout(self.fallback_timeout)),
            Ok(Err(e)) if e.is_timeout() => Err(TransportError::Timeout(self.fallback_timeout)),
            Ok(Err(e)) => Err(TransportError::Network(e.to_string())),
            Ok(Ok(response)) => Ok(response.status().as_u16()),
        }
    }
}
