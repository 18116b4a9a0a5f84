use crate::types::{Chunk, Meta};
use async_trait::async_trait;

/// Maps text to dense vectors.
///
/// Called with a single-element batch for query embedding. An empty input
/// yields an empty output without touching the backend.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Stable identifier for the provider/model (e.g. `hash:d256`).
    fn embedder_id(&self) -> &str;
    /// Embedding dimensionality (D).
    fn dim(&self) -> usize;
    /// Compute embeddings for a batch of input texts.
    async fn embed(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Exact-match predicate on a single metadata field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaFilter {
    pub field: String,
    pub value: String,
}

impl MetaFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Store query results as parallel arrays, one entry per result, ordered by
/// increasing distance (0 = identical for the vector path).
#[derive(Debug, Clone, Default)]
pub struct QueryResponse {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<Meta>,
    pub distances: Vec<f32>,
}

impl QueryResponse {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Persists chunks and answers the two query shapes the retrievers need:
/// nearest-neighbor by vector and keyword candidates by text, both with an
/// optional exact-match metadata filter.
///
/// Each query is independently reentrant; the store owns whatever internal
/// synchronization it needs.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    async fn add_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()>;

    async fn query_by_vector(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> anyhow::Result<QueryResponse>;

    async fn query_by_text(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> anyhow::Result<QueryResponse>;
}
