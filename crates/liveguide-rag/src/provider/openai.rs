//! Provider backed by an OpenAI-compatible `/embeddings` endpoint.

use crate::config::EmbeddingConfig;
use crate::error::{RagError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingProviderType};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backoff stops growing after this many doublings (100 ms · 2^6 = 6.4 s).
const MAX_BACKOFF_EXPONENT: u32 = 6;

#[derive(Debug, Clone, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Clone, Deserialize)]
struct ErrorBody {
    message: String,
}

/// A failed attempt, tagged with whether sending the same request again could succeed.
#[derive(Debug)]
struct RequestFailure {
    error: RagError,
    retryable: bool,
}

impl RequestFailure {
    fn transient(error: RagError) -> Self {
        Self {
            error,
            retryable: true,
        }
    }

    fn permanent(error: RagError) -> Self {
        Self {
            error,
            retryable: false,
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
}

fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(100 * 2u64.pow(attempt.min(MAX_BACKOFF_EXPONENT)))
}

/// Live embedding provider. One HTTP client is built per provider and reused for every call.
#[derive(Debug, Clone)]
pub struct OpenAiEmbeddingProvider {
    http_client: Client,
    base_url: String,
    api_key: String,
    model: String,
    dimension: usize,
    max_retries: u32,
}

impl OpenAiEmbeddingProvider {
    /// Create a provider from configuration and an already-resolved API key.
    pub fn new<S: Into<String>>(config: &EmbeddingConfig, api_key: S) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| RagError::configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: config.model.clone(),
            dimension: config.dimension,
            max_retries: config.max_retries,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }

    async fn send_embedding_request(
        &self,
        text: &str,
    ) -> std::result::Result<Vec<f32>, RequestFailure> {
        let url = self.endpoint();
        let request = EmbeddingRequest {
            model: &self.model,
            input: text,
        };

        log::debug!("OpenAiEmbedding: Sending request to {} (model {})", url, self.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                log::error!("OpenAiEmbedding: Failed to send HTTP request: {}", e);
                RequestFailure::transient(RagError::embedding_generation(format!(
                    "Failed to send request: {}",
                    e
                )))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            log::error!("OpenAiEmbedding: HTTP error response ({}): {}", status, error_text);

            let error = match serde_json::from_str::<ErrorResponse>(&error_text) {
                Ok(error_response) => RagError::embedding_generation(format!(
                    "API error ({}): {}",
                    status, error_response.error.message
                )),
                Err(_) => {
                    RagError::embedding_generation(format!("HTTP error {}: {}", status, error_text))
                }
            };
            return Err(if is_retryable_status(status) {
                RequestFailure::transient(error)
            } else {
                RequestFailure::permanent(error)
            });
        }

        let body = response.text().await.map_err(|e| {
            RequestFailure::transient(RagError::embedding_generation(format!(
                "Failed to read response: {}",
                e
            )))
        })?;

        let parsed: EmbeddingResponse = serde_json::from_str(&body).map_err(|e| {
            log::error!("OpenAiEmbedding: Failed to parse JSON response: {}", e);
            RequestFailure::permanent(RagError::embedding_generation(format!(
                "Malformed response: {}",
                e
            )))
        })?;

        if let Some(model) = parsed.model.as_deref() {
            log::debug!("OpenAiEmbedding: Response produced by model {}", model);
        }

        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| {
                RequestFailure::permanent(RagError::embedding_generation(
                    "Malformed response: no embedding data",
                ))
            })?;

        if embedding.len() != self.dimension {
            return Err(RequestFailure::permanent(RagError::embedding_generation(
                format!(
                    "Model {} returned {} dimensions, expected {}",
                    self.model,
                    embedding.len(),
                    self.dimension
                ),
            )));
        }

        Ok(embedding)
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddingProvider {
    fn dimension(&self) -> usize {
        self.dimension
    }

    fn model_name(&self) -> String {
        self.model.clone()
    }

    fn provider_type(&self) -> EmbeddingProviderType {
        EmbeddingProviderType::OpenAi
    }

    /// Send one request, retrying network failures, 429 and 5xx up to `max_retries` times.
    /// Client errors and malformed responses fail on the first attempt.
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut attempt = 0;
        loop {
            match self.send_embedding_request(text).await {
                Ok(embedding) => return Ok(embedding),
                Err(failure) if failure.retryable && attempt < self.max_retries => {
                    let delay = backoff_delay(attempt);
                    log::warn!(
                        "OpenAiEmbedding: attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        failure.error,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(failure) => return Err(failure.error),
            }
        }
    }
}
