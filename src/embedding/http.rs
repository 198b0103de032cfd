use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{EmbeddingError, QueryEmbedder};
use crate::constants::DEFAULT_EMBEDDING_MODEL;

/// Settings for [`HttpEmbedder`].
#[derive(Debug, Clone)]
pub struct HttpEmbedderConfig {
    /// Base URL, e.g. `http://127.0.0.1:11434`.
    pub base_url: String,
    /// Model name sent with every request.
    pub model: String,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl Default for HttpEmbedderConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Embeds text through an Ollama-compatible HTTP API.
///
/// Tries `/api/embed` first and falls back to the legacy `/api/embeddings` route.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    config: HttpEmbedderConfig,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Serialize)]
struct LegacyEmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct LegacyEmbedResponse {
    embedding: Vec<f32>,
}

impl HttpEmbedder {
    pub fn new(config: HttpEmbedderConfig) -> Result<Self, EmbeddingError> {
        if config.base_url.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedder base_url is empty".to_string(),
            });
        }
        if config.model.trim().is_empty() {
            return Err(EmbeddingError::InvalidConfig {
                reason: "embedder model is empty".to_string(),
            });
        }

        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            config: HttpEmbedderConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
        })
    }

    pub fn config(&self) -> &HttpEmbedderConfig {
        &self.config
    }

    async fn embed_modern(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let endpoint = format!("{}/api/embed", self.config.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&EmbedRequest {
                model: &self.config.model,
                input: text,
            })
            .send()
            .await?;

        let body: EmbedResponse = Self::decode(&endpoint, response).await?;
        body.embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InvalidResponse {
                reason: format!("{endpoint} returned no embeddings"),
            })
    }

    async fn embed_legacy(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let endpoint = format!("{}/api/embeddings", self.config.base_url);
        let response = self
            .client
            .post(&endpoint)
            .json(&LegacyEmbedRequest {
                model: &self.config.model,
                prompt: text,
            })
            .send()
            .await?;

        let body: LegacyEmbedResponse = Self::decode(&endpoint, response).await?;
        Ok(body.embedding)
    }

    async fn decode<T: for<'de> Deserialize<'de>>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, EmbeddingError> {
        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::UnexpectedStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse {
                reason: format!("failed to decode {endpoint} response: {e}"),
            })
    }
}

#[async_trait]
impl QueryEmbedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let input = text.trim();
        if input.is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }

        let embedding = match self.embed_modern(input).await {
            Ok(embedding) => embedding,
            Err(modern_err) => {
                warn!(error = %modern_err, "/api/embed failed, trying /api/embeddings");
                self.embed_legacy(input).await?
            }
        };

        if embedding.is_empty() {
            return Err(EmbeddingError::InvalidResponse {
                reason: "endpoint returned an empty embedding".to_string(),
            });
        }

        debug!(
            model = %self.config.model,
            dim = embedding.len(),
            "embedded text via HTTP"
        );

        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
