//! HTTP implementation of the answer client over reqwest.

use std::time::Duration;

use tracing::debug;

use askbox_core::config::ServiceConfig;
use askbox_core::error::{AskboxError, Result};

use crate::{Answer, AnswerPort, AskRequest};

/// Answer client backed by the real HTTP service.
///
/// One attempt per call, no retries. The `/ask` round-trip uses the
/// configured request timeout; the unload beacon overrides it with the
/// shorter beacon timeout.
#[derive(Debug, Clone)]
pub struct HttpAnswerClient {
    client: reqwest::Client,
    base_url: String,
    beacon_timeout: Duration,
}

impl HttpAnswerClient {
    /// Build a client for the configured endpoint.
    pub fn new(config: &ServiceConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| AskboxError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            beacon_timeout: Duration::from_secs(config.beacon_timeout_secs),
        })
    }

    /// The endpoint this client targets.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `{base}/clear` with no body.
    async fn post_clear(&self, timeout: Option<Duration>) -> Result<()> {
        let url = format!("{}/clear", self.base_url);
        let mut request = self.client.post(&url);
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        let response = request
            .send()
            .await
            .map_err(|e| AskboxError::Transport(e.to_string()))?;
        if !response.status().is_success() {
            return Err(AskboxError::RequestFailed {
                status: response.status().as_u16(),
            });
        }
        Ok(())
    }
}

impl AnswerPort for HttpAnswerClient {
    async fn ask(&self, question: &str) -> Result<Answer> {
        let url = format!("{}/ask", self.base_url);
        debug!(url = %url, "Sending question to answer service");

        let response = self
            .client
            .post(&url)
            .json(&AskRequest {
                question: question.to_string(),
            })
            .send()
            .await
            .map_err(|e| AskboxError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AskboxError::RequestFailed {
                status: response.status().as_u16(),
            });
        }

        response
            .json::<Answer>()
            .await
            .map_err(|e| AskboxError::Transport(e.to_string()))
    }

    async fn reset_remote(&self) -> Result<()> {
        self.post_clear(None).await
    }

    async fn beacon(&self) -> Result<()> {
        self.post_clear(Some(self.beacon_timeout)).await
    }
}

// =============================================================================
// Tests
// =============================================================================
