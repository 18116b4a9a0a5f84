//! Rebuilding chunks from the store's parallel-array responses.

use uniqa_core::traits::MetaFilter;
use uniqa_core::types::{Chunk, DocumentType, Meta};

pub(crate) fn category_filter(category: DocumentType) -> MetaFilter {
    MetaFilter::new("document_type", category.as_str())
}

/// Missing metadata fields default rather than fail, to tolerate
/// partially-tagged legacy records.
pub(crate) fn chunk_from_row(id: String, content: String, metadata: Meta) -> Chunk {
    let document_type = metadata
        .get("document_type")
        .and_then(|v| v.as_str())
        .and_then(DocumentType::from_label)
        .unwrap_or(DocumentType::Scholarship);
    let source = metadata
        .get("source")
        .and_then(|v| v.as_str())
        .unwrap_or("unknown")
        .to_string();
    Chunk {
        id,
        content,
        metadata,
        document_type,
        source,
    }
}
