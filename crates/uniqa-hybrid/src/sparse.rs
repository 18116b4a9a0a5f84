use crate::row::{category_filter, chunk_from_row};
use std::sync::Arc;
use uniqa_core::traits::ChunkStore;
use uniqa_core::types::{DocumentType, RankedList, ScoredResult};

/// Fixed English stop words dropped during key-term extraction.
const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by", "is",
    "are", "was", "were", "be", "been", "being", "have", "has", "had", "do", "does", "did", "will",
    "would", "could", "should", "may", "might", "must", "can", "shall",
];

const MAX_KEY_TERMS: usize = 5;

/// Saturation constant of the term-frequency curve `tf / (tf + k1)`.
const TF_SATURATION: f32 = 1.5;

/// Keyword retriever: asks the store for candidate chunks by text, then
/// re-ranks them with a saturated term-frequency score.
pub struct SparseRetriever {
    store: Arc<dyn ChunkStore>,
}

impl SparseRetriever {
    pub fn new(store: Arc<dyn ChunkStore>) -> Self {
        Self { store }
    }

    /// Store failures degrade to an empty list, same policy as the dense
    /// retriever.
    pub async fn search(
        &self,
        query: &str,
        category: Option<DocumentType>,
        limit: usize,
    ) -> RankedList {
        match self.try_search(query, category, limit).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(error = %e, "sparse search degraded to empty");
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
        let key_terms = extract_key_terms(query);
        let filter = category.map(category_filter);
        // Over-fetch so the re-ranking has material to work with.
        let response = self
            .store
            .query_by_text(query, limit * 2, filter.as_ref())
            .await?;

        let mut results: RankedList = response
            .ids
            .into_iter()
            .zip(response.documents)
            .zip(response.metadatas)
            .map(|((id, content), metadata)| {
                let chunk = chunk_from_row(id, content, metadata);
                let score = relevance(&chunk.content, &key_terms).min(1.0);
                ScoredResult::new(chunk, score)
            })
            .collect();
        // Stable sort: ties keep store-return order.
        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        results.truncate(limit);
        Ok(results)
    }
}

/// Lower-case, split on whitespace, drop stop words and tokens of length
/// <= 2, keep the first five remaining in original order.
pub fn extract_key_terms(query: &str) -> Vec<String> {
    let lowered = query.to_lowercase();
    lowered
        .split_whitespace()
        .filter(|t| t.len() > 2 && !STOP_WORDS.contains(t))
        .take(MAX_KEY_TERMS)
        .map(str::to_string)
        .collect()
}

/// Saturated term frequency summed over the key terms, with a soft bonus
/// for longer chunks. Deliberately not full BM25 (no IDF); behavior parity
/// with the deployed ranking is the target.
fn relevance(content: &str, key_terms: &[String]) -> f32 {
    let content_lower = content.to_lowercase();
    let mut score = 0.0;
    for term in key_terms {
        let tf = content_lower.matches(term.as_str()).count() as f32;
        if tf > 0.0 {
            score += tf / (tf + TF_SATURATION);
        }
    }
    let word_count = content.split_whitespace().count() as f32;
    let length_bonus = (word_count / 100.0).min(1.0);
    score * (1.0 + length_bonus)
}
