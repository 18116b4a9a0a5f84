use crate::dense::DenseRetriever;
use crate::fusion::{reciprocal_rank_fusion, DEFAULT_RRF_K};
use crate::sparse::SparseRetriever;
use std::sync::Arc;
use uniqa_core::traits::{ChunkStore, Embedder};
use uniqa_core::types::{DocumentType, RankedList};

pub const DEFAULT_LIMIT: usize = 5;

/// Each retriever is asked for three times the requested limit, a wider net
/// than the sparse retriever's own internal over-fetch, so fusion has more
/// material to rank.
const FETCH_MULTIPLIER: usize = 3;

/// Runs the dense and sparse retrievers concurrently, fuses their ranked
/// lists and truncates to the requested size. The public entry point for
/// downstream QA logic.
pub struct HybridSearcher {
    dense: DenseRetriever,
    sparse: SparseRetriever,
    rrf_k: usize,
}

impl HybridSearcher {
    pub fn new(store: Arc<dyn ChunkStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self {
            dense: DenseRetriever::new(Arc::clone(&store), embedder),
            sparse: SparseRetriever::new(store),
            rrf_k: DEFAULT_RRF_K,
        }
    }

    pub fn with_rrf_k(mut self, k: usize) -> Self {
        self.rrf_k = k;
        self
    }

    /// `search` with the default result count.
    pub async fn search_default(&self, query: &str, category: Option<DocumentType>) -> RankedList {
        self.search(query, category, DEFAULT_LIMIT).await
    }

    /// Both retriever calls are independent and joined before fusion; if
    /// both come back empty (empty store, or both degraded) the result is a
    /// valid empty list, never an error.
    pub async fn search(
        &self,
        query: &str,
        category: Option<DocumentType>,
        limit: usize,
    ) -> RankedList {
        let fetch = limit * FETCH_MULTIPLIER;
        let (dense_results, sparse_results) = tokio::join!(
            self.dense.search(query, category, fetch),
            self.sparse.search(query, category, fetch),
        );
        tracing::debug!(
            dense = dense_results.len(),
            sparse = sparse_results.len(),
            "fusing retriever outputs"
        );
        let mut fused = reciprocal_rank_fusion(dense_results, sparse_results, self.rrf_k);
        fused.truncate(limit);
        fused
    }
}

/// What the downstream context-assembly step consumes: the retrieved
/// contents concatenated in returned order, and a confidence estimate
/// taken as the minimum score across results (0.0 when empty).
#[derive(Debug, Clone)]
pub struct RetrievedContext {
    pub context: String,
    pub confidence: f32,
    pub results: RankedList,
}

impl RetrievedContext {
    pub fn from_results(results: RankedList) -> Self {
        let context = results
            .iter()
            .map(|r| r.chunk.content.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let confidence = if results.is_empty() {
            0.0
        } else {
            results.iter().map(|r| r.score).fold(f32::INFINITY, f32::min)
        };
        Self {
            context,
            confidence,
            results,
        }
    }
}
