//! Client for the remote code-execution backend.
//!
//! Forwards `{ code, engine }` submissions to the configured endpoint with
//! a Bearer credential and returns the captured output. Failed submissions
//! surface the backend's diagnostic body; there are no retries.

use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Engine used when a submission does not name one.
pub const DEFAULT_ENGINE: &str = "qiskit";

/// Compute client error type.
#[derive(Debug, Error)]
pub enum ComputeError {
    /// Transport-level failure talking to the backend.
    #[error("compute request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The backend rejected the submission with a diagnostic body.
    #[error("compute backend error ({status}): {message}")]
    Backend {
        /// HTTP status the backend answered with.
        status: StatusCode,
        /// Diagnostic from the backend's error body.
        message: String,
    },
    /// Non-success status without a parseable diagnostic body.
    #[error("compute backend returned status {0}")]
    Status(StatusCode),
}

#[derive(Serialize)]
struct ExecutePayload<'a> {
    code: &'a str,
    engine: &'a str,
}

#[derive(Deserialize)]
struct ExecuteOutput {
    output: String,
}

#[derive(Deserialize)]
struct ExecuteFailure {
    error: String,
}

/// Async client for the execution endpoint.
#[derive(Clone)]
pub struct ComputeClient {
    http: reqwest::Client,
    endpoint: Url,
    api_key: String,
}

impl ComputeClient {
    /// Create a client for `endpoint`, authenticating with `api_key`.
    #[must_use]
    pub fn new(endpoint: Url, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key: api_key.into(),
        }
    }

    /// Submit `code` for execution and return the captured output.
    ///
    /// # Errors
    /// [`ComputeError::Backend`] when the backend reports an execution
    /// error, [`ComputeError::Http`] or [`ComputeError::Status`] on
    /// transport and protocol failures.
    pub async fn execute(
        &self,
        code: &str,
        engine: Option<&str>,
    ) -> Result<String, ComputeError> {
        let payload = ExecutePayload {
            code,
            engine: engine.unwrap_or(DEFAULT_ENGINE),
        };

        let response = self
            .http
            .post(self.endpoint.clone())
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let parsed: ExecuteOutput = response.json().await?;
            return Ok(parsed.output);
        }

        match response.json::<ExecuteFailure>().await {
            Ok(failure) => Err(ComputeError::Backend {
                status,
                message: failure.error,
            }),
            Err(_) => Err(ComputeError::Status(status)),
        }
    }
}
