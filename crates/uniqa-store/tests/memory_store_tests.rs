use uniqa_core::traits::{ChunkStore, MetaFilter};
use uniqa_core::types::{Chunk, DocumentType};
use uniqa_store::MemoryStore;

fn chunk(source: &str, index: usize, content: &str, document_type: DocumentType) -> Chunk {
    Chunk::new(source, index, 10, content.to_string(), document_type)
}

fn axis(dim: usize, i: usize) -> Vec<f32> {
    let mut v = vec![0.0; dim];
    v[i] = 1.0;
    v
}

#[tokio::test]
async fn vector_query_orders_by_distance() {
    let store = MemoryStore::new();
    let chunks = vec![
        chunk("a.txt", 0, "alpha", DocumentType::Scholarship),
        chunk("a.txt", 1, "bravo", DocumentType::Scholarship),
    ];
    // First embedding aligned with the query, second orthogonal.
    let embeddings = vec![axis(4, 0), axis(4, 1)];
    store.add_chunks(&chunks, &embeddings).await.expect("add");

    let response = store
        .query_by_vector(&axis(4, 0), 10, None)
        .await
        .expect("query");
    assert_eq!(response.ids.len(), 2);
    assert_eq!(response.ids[0], chunks[0].id);
    assert!(response.distances[0] < response.distances[1]);
    assert!(response.distances[0].abs() < 1e-5);
}

#[tokio::test]
async fn category_filter_is_exact() {
    let store = MemoryStore::new();
    let chunks = vec![
        chunk("sch.txt", 0, "scholarship deadline", DocumentType::Scholarship),
        chunk("adm.txt", 0, "admission deadline", DocumentType::Admission),
    ];
    let embeddings = vec![axis(4, 0), axis(4, 0)];
    store.add_chunks(&chunks, &embeddings).await.expect("add");

    let filter = MetaFilter::new("document_type", "admission");
    let response = store
        .query_by_vector(&axis(4, 0), 10, Some(&filter))
        .await
        .expect("query");
    assert_eq!(response.ids, vec![chunks[1].id.clone()]);

    let response = store
        .query_by_text("deadline", 10, Some(&filter))
        .await
        .expect("query");
    assert_eq!(response.ids, vec![chunks[1].id.clone()]);
}

#[tokio::test]
async fn text_query_ranks_by_term_coverage() {
    let store = MemoryStore::new();
    let chunks = vec![
        chunk("a.txt", 0, "The GPA requirement is 3.0", DocumentType::Faq),
        chunk(
            "a.txt",
            1,
            "GPA requirement for the merit scholarship",
            DocumentType::Faq,
        ),
        chunk("a.txt", 2, "campus parking rules", DocumentType::Faq),
    ];
    let embeddings = vec![axis(4, 0), axis(4, 1), axis(4, 2)];
    store.add_chunks(&chunks, &embeddings).await.expect("add");

    let response = store
        .query_by_text("gpa requirement scholarship", 10, None)
        .await
        .expect("query");
    // The chunk covering all three terms comes first; the parking chunk
    // matches nothing and is absent.
    assert_eq!(response.ids[0], chunks[1].id);
    assert!(!response.ids.contains(&chunks[2].id));
}

#[tokio::test]
async fn reingesting_same_chunk_does_not_duplicate() {
    let store = MemoryStore::new();
    let c = chunk("a.txt", 0, "alpha", DocumentType::Policy);
    let e = vec![axis(4, 0)];
    store
        .add_chunks(std::slice::from_ref(&c), &e)
        .await
        .expect("add");
    store
        .add_chunks(std::slice::from_ref(&c), &e)
        .await
        .expect("add again");

    let response = store.query_by_vector(&axis(4, 0), 10, None).await.expect("query");
    assert_eq!(response.ids.len(), 1);
}

#[tokio::test]
async fn mismatched_lengths_are_rejected() {
    let store = MemoryStore::new();
    let c = chunk("a.txt", 0, "alpha", DocumentType::Policy);
    let result = store.add_chunks(std::slice::from_ref(&c), &[]).await;
    assert!(result.is_err());
}
