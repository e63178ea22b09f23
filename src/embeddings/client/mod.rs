
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

use crate::config::EmbeddingsConfig;
use crate::embeddings::EmbeddingProvider;
use crate::net::{join_segment, request_with_retry};
use crate::{IngestError, Result};

const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const DEFAULT_EMBEDDING_DIMENSION: usize = 1536;

/// Output dimension for models this pipeline has shipped against.
#[inline]
pub fn known_model_dimension(model: &str) -> Option<usize> {
    match model {
        "text-embedding-ada-002" | "text-embedding-3-small" => Some(1536),
        "text-embedding-3-large" => Some(3072),
        _ => None,
    }
}

/// Blocking client for an OpenAI-compatible `/embeddings` endpoint.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    embed_url: Url,
    model: String,
    dimension: usize,
    batch_size: usize,
    api_key: Option<String>,
    agent: ureq::Agent,
    retry_attempts: u32,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl EmbeddingClient {
    #[inline]
    pub fn new(config: &EmbeddingsConfig) -> Result<Self> {
        let endpoint = config.endpoint_url()?;
        let embed_url = join_segment(&endpoint, "embeddings")
            .map_err(|e| IngestError::Embedding(format!("invalid endpoint URL: {}", e)))?;

        let dimension = config
            .dimension
            .or_else(|| known_model_dimension(&config.model))
            .unwrap_or(DEFAULT_EMBEDDING_DIMENSION);

        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(config.timeout_seconds)))
            .build()
            .into();

        Ok(Self {
            embed_url,
            model: config.model.clone(),
            dimension,
            batch_size: config.batch_size,
            api_key: config.api_key.clone(),
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        })
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts;
        self
    }

    fn embed_single_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        debug!(
            "Requesting embeddings for {} text(s) with model {}",
            texts.len(),
            self.model
        );

        let request = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let request_json = serde_json::to_string(&request)
            .map_err(|e| IngestError::Embedding(format!("failed to serialize request: {}", e)))?;

        let response_text = request_with_retry(self.retry_attempts, || {
            let mut req = self
                .agent
                .post(self.embed_url.as_str())
                .header("Content-Type", "application/json");
            if let Some(key) = &self.api_key {
                req = req.header("api-key", key);
            }
            req.send(&request_json)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
        .map_err(|e| IngestError::Embedding(format!("embedding request failed: {}", e)))?;

        let response: EmbedResponse = serde_json::from_str(&response_text)
            .map_err(|e| IngestError::Embedding(format!("failed to parse response: {}", e)))?;

        if response.data.len() != texts.len() {
            return Err(IngestError::Embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                response.data.len()
            )));
        }

        let embeddings: Vec<Vec<f32>> = response.data.into_iter().map(|d| d.embedding).collect();

        for embedding in &embeddings {
            if embedding.len() != self.dimension {
                return Err(IngestError::Embedding(format!(
                    "model {} returned a {}-dimensional vector, expected {}",
                    self.model,
                    embedding.len(),
                    self.dimension
                )));
            }
        }

        Ok(embeddings)
    }
}

impl EmbeddingProvider for EmbeddingClient {
    #[inline]
    fn model(&self) -> &str {
        &self.model
    }

    #[inline]
    fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            results.extend(self.embed_single_batch(batch)?);
        }

        debug!("Generated {} embedding(s) total", results.len());
        Ok(results)
    }
}
