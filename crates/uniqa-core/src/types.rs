//! Domain types shared by the retrievers, the fusion engine and the stores.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hasher;

pub type ChunkId = String;
pub type Meta = HashMap<String, serde_json::Value>;

/// Closed set of document categories a chunk can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Scholarship,
    Admission,
    Masters,
    Registration,
    Faq,
    Policy,
    Form,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentType::Scholarship => "scholarship",
            DocumentType::Admission => "admission",
            DocumentType::Masters => "masters",
            DocumentType::Registration => "registration",
            DocumentType::Faq => "faq",
            DocumentType::Policy => "policy",
            DocumentType::Form => "form",
        }
    }

    /// Parse a stored label. Unknown labels yield `None`; callers that
    /// tolerate partially-tagged legacy records fall back to
    /// [`DocumentType::Scholarship`].
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "scholarship" => Some(DocumentType::Scholarship),
            "admission" => Some(DocumentType::Admission),
            "masters" => Some(DocumentType::Masters),
            "registration" => Some(DocumentType::Registration),
            "faq" => Some(DocumentType::Faq),
            "policy" => Some(DocumentType::Policy),
            "form" => Some(DocumentType::Form),
            _ => None,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A chunk of a source document that is independently retrievable.
///
/// - `id`: deterministic for a given (source, position, content), so
///   re-ingesting identical content does not mint new ids
/// - `content`: the text payload of the chunk
/// - `metadata`: string/scalar values (source, position, content hash, ...)
/// - `document_type`/`source`: category facet and originating document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: Meta,
    pub document_type: DocumentType,
    pub source: String,
}

impl Chunk {
    /// Build a chunk at `index` of `total_chunks` within `source`, with the
    /// metadata fields the stores persist alongside the text.
    pub fn new(
        source: &str,
        index: usize,
        total_chunks: usize,
        content: String,
        document_type: DocumentType,
    ) -> Self {
        let hash = content_hash(&content);
        let id = format!("{}_{}_{:08x}", source, index, hash as u32);
        let word_count = content.split_whitespace().count();
        let mut metadata = Meta::new();
        metadata.insert("source".to_string(), json!(source));
        metadata.insert("chunk_index".to_string(), json!(index));
        metadata.insert("total_chunks".to_string(), json!(total_chunks));
        metadata.insert(
            "document_type".to_string(),
            json!(document_type.as_str()),
        );
        metadata.insert("content_hash".to_string(), json!(format!("{hash:016x}")));
        metadata.insert("word_count".to_string(), json!(word_count));
        metadata.insert("size".to_string(), json!(content.len()));
        Self {
            id,
            content,
            metadata,
            document_type,
            source: source.to_string(),
        }
    }
}

/// XxHash64 of the chunk text, the stable part of the chunk id.
pub fn content_hash(text: &str) -> u64 {
    let mut hasher = twox_hash::XxHash64::with_seed(0);
    hasher.write(text.as_bytes());
    hasher.finish()
}

/// A chunk paired with its relevance score.
///
/// Dense and sparse scores lie in [0,1]; fused scores are positive but live
/// on the reciprocal-rank scale and are not comparable to retriever scores.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoredResult {
    pub chunk: Chunk,
    pub score: f32,
    pub source: String,
}

impl ScoredResult {
    pub fn new(chunk: Chunk, score: f32) -> Self {
        let source = chunk.source.clone();
        Self {
            chunk,
            score,
            source,
        }
    }
}

/// Ordered results, best first. Rank is the 0-based position; rank, not
/// score magnitude, is what crosses into fusion.
pub type RankedList = Vec<ScoredResult>;
