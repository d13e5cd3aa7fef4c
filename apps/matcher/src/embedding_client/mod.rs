/// Embedding client: the single point of entry for feature-extraction calls.
///
/// ARCHITECTURAL RULE: No other module may call the inference endpoint directly.
/// Matching code depends on the `Embedder` trait, never on `EmbeddingClient`.
///
/// One `embed` call is one HTTP round-trip, whatever the number of texts.
/// There is no retry here: the orchestrators fall back to keyword matching instead.
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_API_URL: &str =
    "https://api-inference.huggingface.co/pipeline/feature-extraction";
pub const DEFAULT_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";

const PROBE_TEXT: &str = "test";

/// One embedding per input text, same order as the input.
pub type EmbeddingVector = Vec<f32>;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Embedding API error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed embedding response: {0}")]
    Malformed(String),
}

/// Turns a batch of texts into vectors. Carried as `Arc<dyn Embedder>`.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError>;

    /// Reports whether the service currently answers. Never fails.
    async fn probe(&self) -> bool;
}

#[derive(Debug, Serialize)]
struct FeatureExtractionRequest<'a> {
    inputs: &'a [String],
    options: FeatureExtractionOptions,
}

#[derive(Debug, Serialize)]
struct FeatureExtractionOptions {
    wait_for_model: bool,
}

/// HTTP client for a hosted feature-extraction pipeline.
#[derive(Clone)]
pub struct EmbeddingClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl EmbeddingClient {
    pub fn new(
        api_url: &str,
        model: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, EmbeddingError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("{}/{}", api_url.trim_end_matches('/'), model),
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn post_batch(&self, texts: &[String]) -> Result<String, EmbeddingError> {
        let request_body = FeatureExtractionRequest {
            inputs: texts,
            options: FeatureExtractionOptions {
                wait_for_model: true,
            },
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            warn!("Embedding API returned {}: {}", status, body);
            return Err(EmbeddingError::Api {
                status: status.as_u16(),
                body,
            });
        }

        Ok(body)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let body = self.post_batch(texts).await?;
        let embeddings = parse_embeddings(&body, texts.len())?;

        debug!(
            "Embedding call succeeded: texts={}, dimensions={}",
            embeddings.len(),
            embeddings.first().map(Vec::len).unwrap_or(0)
        );

        Ok(embeddings)
    }

    async fn probe(&self) -> bool {
        match self.post_batch(&[PROBE_TEXT.to_string()]).await {
            Ok(_) => true,
            Err(e) => {
                debug!("Embedding service probe failed: {e}");
                false
            }
        }
    }
}

/// Parses a feature-extraction body into exactly `expected` vectors.
fn parse_embeddings(body: &str, expected: usize) -> Result<Vec<EmbeddingVector>, EmbeddingError> {
    let embeddings: Vec<EmbeddingVector> = serde_json::from_str(body)
        .map_err(|e| EmbeddingError::Malformed(format!("{e}; body: {}", truncate(body, 200))))?;

    if embeddings.len() != expected {
        return Err(EmbeddingError::Malformed(format!(
            "expected {expected} vectors, got {}",
            embeddings.len()
        )));
    }

    Ok(embeddings)
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
