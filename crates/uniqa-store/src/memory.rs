use async_trait::async_trait;
use std::sync::RwLock;
use uniqa_core::traits::{ChunkStore, MetaFilter, QueryResponse};
use uniqa_core::types::Chunk;

struct StoredChunk {
    chunk: Chunk,
    embedding: Vec<f32>,
}

/// In-memory `ChunkStore`.
///
/// Vector queries are brute-force cosine distance over every stored row;
/// keyword queries score rows by the fraction of query terms the content
/// contains. Distances lie in [0,1] for both paths.
#[derive(Default)]
pub struct MemoryStore {
    rows: RwLock<Vec<StoredChunk>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(chunk: &Chunk, filter: &MetaFilter) -> bool {
    match filter.field.as_str() {
        "document_type" => chunk.document_type.as_str() == filter.value,
        "source" => chunk.source == filter.value,
        _ => {
            chunk.metadata.get(&filter.field).and_then(|v| v.as_str())
                == Some(filter.value.as_str())
        }
    }
}

fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        return 1.0;
    }
    (1.0 - dot / (na * nb)).clamp(0.0, 1.0)
}

fn to_response(selected: Vec<(f32, &StoredChunk)>) -> QueryResponse {
    let mut response = QueryResponse::default();
    for (distance, row) in selected {
        response.ids.push(row.chunk.id.clone());
        response.documents.push(row.chunk.content.clone());
        response.metadatas.push(row.chunk.metadata.clone());
        response.distances.push(distance);
    }
    response
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn add_chunks(&self, chunks: &[Chunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()> {
        if chunks.len() != embeddings.len() {
            anyhow::bail!(
                "{} chunks but {} embeddings",
                chunks.len(),
                embeddings.len()
            );
        }
        let mut rows = self
            .rows
            .write()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        for (chunk, embedding) in chunks.iter().zip(embeddings.iter()) {
            let stored = StoredChunk {
                chunk: chunk.clone(),
                embedding: embedding.clone(),
            };
            // Same id means same (source, position, content): replace, don't duplicate.
            if let Some(pos) = rows.iter().position(|r| r.chunk.id == chunk.id) {
                rows[pos] = stored;
            } else {
                rows.push(stored);
            }
        }
        Ok(())
    }

    async fn query_by_vector(
        &self,
        vector: &[f32],
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> anyhow::Result<QueryResponse> {
        let rows = self
            .rows
            .read()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        let mut scored: Vec<(f32, &StoredChunk)> = rows
            .iter()
            .filter(|r| filter.map_or(true, |f| matches(&r.chunk, f)))
            .map(|r| (cosine_distance(vector, &r.embedding), r))
            .collect();
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(to_response(scored))
    }

    async fn query_by_text(
        &self,
        text: &str,
        top_k: usize,
        filter: Option<&MetaFilter>,
    ) -> anyhow::Result<QueryResponse> {
        let lowered = text.to_lowercase();
        let terms: Vec<&str> = lowered.split_whitespace().filter(|t| t.len() > 2).collect();
        let rows = self
            .rows
            .read()
            .map_err(|_| anyhow::anyhow!("store lock poisoned"))?;
        let mut scored: Vec<(f32, &StoredChunk)> = Vec::new();
        for row in rows
            .iter()
            .filter(|r| filter.map_or(true, |f| matches(&r.chunk, f)))
        {
            let content = row.chunk.content.to_lowercase();
            let matched = terms.iter().filter(|t| content.contains(**t)).count();
            if matched == 0 && !terms.is_empty() {
                continue;
            }
            let fraction = matched as f32 / terms.len().max(1) as f32;
            scored.push((1.0 - fraction, row));
        }
        scored.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        Ok(to_response(scored))
    }
}
