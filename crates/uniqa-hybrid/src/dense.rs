use crate::row::{category_filter, chunk_from_row};
use std::sync::Arc;
use uniqa_core::traits::{ChunkStore, Embedder};
use uniqa_core::types::{DocumentType, RankedList, ScoredResult};

/// Semantic retriever: embeds the query (single-item batch) and asks the
/// store for the nearest vectors.
pub struct DenseRetriever {
    store: Arc<dyn ChunkStore>,
    embedder: Arc<dyn Embedder>,
}

impl DenseRetriever {
    pub fn new(store: Arc<dyn ChunkStore>, embedder: Arc<dyn Embedder>) -> Self {
        Self { store, embedder }
    }

    /// Store or embedding failures degrade to an empty list — no dense
    /// evidence, never an aborted caller.
    pub async fn search(
        &self,
        query: &str,
        category: Option<DocumentType>,
        limit: usize,
    ) -> RankedList {
        match self.try_search(query, category, limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "dense search degraded to empty");
                Vec::new()
            }
        }
    }

    async fn try_search(
        &self,
        query: &str,
        category: Option<DocumentType>,
        limit: usize,
    ) -> anyhow::Result<RankedList> {
        let embeddings = self.embedder.embed(&[query.to_string()]).await?;
        let query_vector = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("embedder returned no vector for the query"))?;
        let filter = category.map(category_filter);
        let response = self
            .store
            .query_by_vector(&query_vector, limit, filter.as_ref())
            .await?;

        let results = response
            .ids
            .into_iter()
            .zip(response.documents)
            .zip(response.metadatas)
            .zip(response.distances)
            .map(|(((id, content), metadata), distance)| {
                let chunk = chunk_from_row(id, content, metadata);
                // Assumes a cosine-style distance: 0 = identical, 1 =
                // maximally dissimilar. A store with a different native
                // metric needs this conversion re-derived.
                ScoredResult::new(chunk, 1.0 - distance)
            })
            .collect();
        Ok(results)
    }
}
