use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;

/// Process-wide configuration, built once at startup and passed by
/// reference into each component constructor. Backend/provider names are
/// validated by the factories that consume them, so a bad value fails at
/// construction time rather than on the query path.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub store: StoreConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// `memory` or `lance`.
    pub backend: String,
    /// Database directory for the lance backend.
    pub db_path: String,
    pub table_name: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: "memory".to_string(),
            db_path: "./data/lancedb".to_string(),
            table_name: "university_documents".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `hash` or `openai`.
    pub provider: String,
    /// Model name for remote providers.
    pub model: String,
    /// Embedding dimensionality.
    pub dim: usize,
    /// Required when `provider = "openai"`.
    pub api_key: Option<String>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "hash".to_string(),
            model: "text-embedding-3-small".to_string(),
            dim: 256,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Default number of results a search returns.
    pub limit: usize,
    /// RRF damping constant; larger k flattens the gap between ranks.
    pub rrf_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { limit: 5, rrf_k: 60 }
    }
}

impl AppConfig {
    /// Merge `config.toml`, the `RUST_ENV`-specific overlay and `UNIQA_*`
    /// environment variables (`UNIQA_STORE__BACKEND=lance` style nesting).
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let mut figment = Figment::new().merge(Toml::file("config.toml"));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("UNIQA_").split("__"));

        figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))
    }
}
