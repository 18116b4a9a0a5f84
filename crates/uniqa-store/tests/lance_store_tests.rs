use tempfile::TempDir;
use uniqa_core::traits::{ChunkStore, MetaFilter};
use uniqa_core::types::{Chunk, DocumentType};
use uniqa_store::LanceStore;

fn chunk(source: &str, index: usize, content: &str, document_type: DocumentType) -> Chunk {
    Chunk::new(source, index, 2, content.to_string(), document_type)
}

fn axis(dim: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[i] = 1.0;
    v
}

#[tokio::test]
async fn lance_round_trip_with_filter() {
    let tmp = TempDir::new().expect("tempdir");
    let store = LanceStore::new(tmp.path(), "docs", 4).await.expect("open db");

    let chunks = vec![
        chunk(
            "sch.txt",
            0,
            "merit scholarship GPA requirement",
            DocumentType::Scholarship,
        ),
        chunk(
            "adm.txt",
            0,
            "admission deadline March 1",
            DocumentType::Admission,
        ),
    ];
    let embeddings = vec![axis(4, 0), axis(4, 1)];
    store.add_chunks(&chunks, &embeddings).await.expect("add");

    let response = store
        .query_by_vector(&axis(4, 0), 10, None)
        .await
        .expect("vector query");
    assert_eq!(response.ids.len(), 2);
    assert_eq!(response.ids[0], chunks[0].id);
    assert!(response.distances[0] <= response.distances[1]);

    let filter = MetaFilter::new("document_type", "admission");
    let response = store
        .query_by_vector(&axis(4, 0), 10, Some(&filter))
        .await
        .expect("filtered query");
    assert_eq!(response.ids, vec![chunks[1].id.clone()]);

    let response = store
        .query_by_text("deadline", 10, None)
        .await
        .expect("text query");
    assert_eq!(response.ids, vec![chunks[1].id.clone()]);

    // Metadata survives the JSON column round trip.
    assert_eq!(response.metadatas[0]["source"], "adm.txt");
}

#[tokio::test]
async fn reingesting_does_not_duplicate_rows() {
    let tmp = TempDir::new().expect("tempdir");
    let store = LanceStore::new(tmp.path(), "docs", 4).await.expect("open db");

    let chunks = vec![chunk("sch.txt", 0, "merit scholarship", DocumentType::Scholarship)];
    let embeddings = vec![axis(4, 0)];
    store.add_chunks(&chunks, &embeddings).await.expect("add");
    store.add_chunks(&chunks, &embeddings).await.expect("re-add");

    let response = store
        .query_by_vector(&axis(4, 0), 10, None)
        .await
        .expect("vector query");
    assert_eq!(response.ids.len(), 1);
}
