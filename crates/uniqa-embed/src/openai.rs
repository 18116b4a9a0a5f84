//! OpenAI embeddings API client.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uniqa_core::config::EmbeddingConfig;
use uniqa_core::error::Error;
use uniqa_core::traits::Embedder;

const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    dim: usize,
    id: String,
}

impl OpenAiEmbedder {
    /// A missing or empty `api_key` is a startup-time contract violation.
    pub fn new(cfg: &EmbeddingConfig) -> anyhow::Result<Self> {
        let api_key = cfg
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                Error::InvalidConfig("embedding.api_key not set for openai provider".to_string())
            })?;
        let id = format!("openai:{}:d{}", cfg.model, cfg.dim);
        Ok(Self {
            client: Client::new(),
            api_key,
            model: cfg.model.clone(),
            dim: cfg.dim,
            id,
        })
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    fn embedder_id(&self) -> &str {
        &self.id
    }

    fn dim(&self) -> usize {
        self.dim
    }

    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;
        if !response.status().is_success() {
            anyhow::bail!("OpenAI embeddings request failed: {}", response.status());
        }
        let body: EmbeddingResponse = response.json().await?;
        if body.data.len() != texts.len() {
            anyhow::bail!(
                "OpenAI returned {} embeddings for {} inputs",
                body.data.len(),
                texts.len()
            );
        }
        Ok(body.data.into_iter().map(|d| d.embedding).collect())
    }
}
