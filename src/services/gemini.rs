//! Gemini client for text completion.
//!
//! Sends one prompt per call to the `generateContent` endpoint and returns
//! the first candidate's text. Transport failures, 429 and 5xx responses are
//! retried with exponential backoff inside a bounded time budget.

use anyhow::Context;
use async_trait::async_trait;
use backoff::{future::retry, ExponentialBackoff, ExponentialBackoffBuilder};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, instrument, warn};

use crate::config::Settings;
use crate::domain::{CatalogError, CatalogResult};
use crate::services::ai_gateway::CompletionClient;

/// Client for the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    retry_budget: Duration,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

/// Error body returned by the Gemini API.
#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

impl GeminiClient {
    /// Create a new Gemini client from settings.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.ai_timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        if settings.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set - AI features will report unavailable");
        }

        tracing::info!(
            base_url = %settings.gemini_base_url,
            model = %settings.gemini_model,
            "Gemini client initialized"
        );

        Ok(Self {
            client,
            base_url: settings.gemini_base_url.trim_end_matches('/').to_string(),
            model: settings.gemini_model.clone(),
            api_key: settings.gemini_api_key.clone(),
            retry_budget: Duration::from_secs(settings.ai_retry_max_elapsed_seconds),
        })
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoffBuilder::new()
            .with_initial_interval(Duration::from_millis(250))
            .with_max_interval(Duration::from_secs(4))
            .with_max_elapsed_time(Some(self.retry_budget))
            .build()
    }

    /// Single attempt against the API. Transient failures are marked so the
    /// caller can retry them.
    async fn attempt(
        &self,
        url: &str,
        api_key: &str,
        prompt: &str,
    ) -> Result<String, backoff::Error<CatalogError>> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Gemini request failed");
                backoff::Error::transient(CatalogError::AiUnavailable(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<GeminiErrorResponse>()
                .await
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("Gemini API error: {status}"));
            let err = CatalogError::AiUnavailable(message);

            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => backoff::Error::transient(err),
                s if s.is_server_error() => backoff::Error::transient(err),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    error!(status = %status, "Gemini authentication failed");
                    backoff::Error::permanent(err)
                }
                _ => {
                    error!(status = %status, error = %err, "Gemini rejected request");
                    backoff::Error::permanent(err)
                }
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini response");
            backoff::Error::permanent(CatalogError::AiUnavailable(format!(
                "invalid Gemini response: {e}"
            )))
        })?;

        parsed
            .first_text()
            .ok_or(backoff::Error::permanent(CatalogError::AiEmptyResponse))
    }
}

#[async_trait]
impl CompletionClient for GeminiClient {
    #[instrument(skip(self, prompt), fields(model = %self.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> CatalogResult<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CatalogError::AiUnavailable("GEMINI_API_KEY is not configured".into()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        debug!(url = %url, "Gemini request");

        retry(self.backoff(), || self.attempt(&url, api_key, prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text_extraction() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Silky foam."}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("Silky foam."));
    }

    #[test]
    fn test_missing_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_text(), None);

        let blocked = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(blocked).unwrap();
        assert_eq!(parsed.first_text(), None);
    }

    #[test]
    fn test_request_shape() {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: "hello" }],
            }],
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"contents": [{"parts": [{"text": "hello"}]}]})
        );
    }
}
