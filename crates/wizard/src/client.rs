//! The completion request.

use std::future::Future;

use matcha_core::completion::CompletionPayload;
use serde::Deserialize;

use crate::config::WizardConfig;
use crate::error::WizardError;

/// Body of a successful completion response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompletionResponse {
    pub success: bool,
    pub message: String,
}

/// Sends the merged payload to the server.
pub trait CompletionClient: Send + Sync {
    fn complete(
        &self,
        payload: &CompletionPayload,
    ) -> impl Future<Output = Result<CompletionResponse, WizardError>> + Send;
}

/// Failure body; either `message` or `error` is present.
#[derive(Debug, Default, Deserialize)]
struct FailureBody {
    message: Option<String>,
    error: Option<String>,
}

/// [`CompletionClient`] that posts JSON with a bearer token.
///
/// Binary images are sent as data URLs.
#[derive(Clone)]
pub struct HttpCompletionClient {
    client: reqwest::Client,
    url: String,
    token: String,
}

impl HttpCompletionClient {
    pub fn new(config: &WizardConfig, token: impl Into<String>) -> Result<Self, WizardError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| WizardError::Request(e.to_string()))?;
        Ok(Self {
            client,
            url: config.completion_url(),
            token: token.into(),
        })
    }
}

impl CompletionClient for HttpCompletionClient {
    async fn complete(
        &self,
        payload: &CompletionPayload,
    ) -> Result<CompletionResponse, WizardError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(payload)
            .send()
            .await
            .map_err(|e| WizardError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body: FailureBody = response.json().await.unwrap_or_default();
            return Err(WizardError::Rejected {
                status: status.as_u16(),
                message: body
                    .message
                    .or(body.error)
                    .unwrap_or_else(|| status.to_string()),
            });
        }

        response
            .json()
            .await
            .map_err(|e| WizardError::Request(e.to_string()))
    }
}
