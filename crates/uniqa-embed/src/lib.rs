//! Embedding providers.
//!
//! One concrete implementation per backend, selected once at construction:
//! `hash` is a deterministic local feature-hashing embedder, `openai` calls
//! the OpenAI embeddings API. An unsupported provider name fails here, at
//! startup, never on the query path.

pub mod hash;
pub mod openai;

pub use hash::HashEmbedder;
pub use openai::OpenAiEmbedder;

use std::sync::Arc;
use uniqa_core::config::EmbeddingConfig;
use uniqa_core::error::Error;
use uniqa_core::traits::Embedder;

pub fn embedder_from_config(cfg: &EmbeddingConfig) -> anyhow::Result<Arc<dyn Embedder>> {
    match cfg.provider.as_str() {
        "hash" => Ok(Arc::new(HashEmbedder::new(cfg.dim))),
        "openai" => Ok(Arc::new(OpenAiEmbedder::new(cfg)?)),
        other => {
            Err(Error::InvalidConfig(format!("Unsupported embedding provider: {other}")).into())
        }
    }
}
