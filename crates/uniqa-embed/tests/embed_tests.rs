use uniqa_core::config::EmbeddingConfig;
use uniqa_core::traits::Embedder;
use uniqa_embed::{embedder_from_config, HashEmbedder};

#[tokio::test]
async fn hash_embedder_is_deterministic() {
    let embedder = HashEmbedder::new(64);
    let texts = vec!["scholarship GPA requirement".to_string()];
    let a = embedder.embed(&texts).await.expect("embed");
    let b = embedder.embed(&texts).await.expect("embed");
    assert_eq!(a, b);
}

#[tokio::test]
async fn hash_embedder_output_is_normalized() {
    let embedder = HashEmbedder::new(64);
    let texts = vec!["admission deadline for fall semester".to_string()];
    let vectors = embedder.embed(&texts).await.expect("embed");
    assert_eq!(vectors.len(), 1);
    assert_eq!(vectors[0].len(), 64);
    let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
    assert!((norm - 1.0).abs() < 1e-4, "expected unit norm, got {norm}");
}

#[tokio::test]
async fn empty_batch_yields_empty_output() {
    let embedder = HashEmbedder::new(64);
    let vectors = embedder.embed(&[]).await.expect("embed");
    assert!(vectors.is_empty());
}

#[test]
fn factory_rejects_unknown_provider() {
    let cfg = EmbeddingConfig {
        provider: "sentence-transformers".to_string(),
        ..EmbeddingConfig::default()
    };
    assert!(embedder_from_config(&cfg).is_err());
}

#[test]
fn factory_rejects_openai_without_key() {
    let cfg = EmbeddingConfig {
        provider: "openai".to_string(),
        api_key: None,
        ..EmbeddingConfig::default()
    };
    assert!(embedder_from_config(&cfg).is_err());
}

#[test]
fn factory_builds_hash_provider() {
    let cfg = EmbeddingConfig::default();
    let embedder = embedder_from_config(&cfg).expect("hash provider");
    assert_eq!(embedder.dim(), 256);
    assert_eq!(embedder.embedder_id(), "hash:d256");
}
