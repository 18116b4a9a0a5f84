use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::path::Path;
use tracing_subscriber::EnvFilter;
use uniqa_core::config::AppConfig;
use uniqa_core::traits::{ChunkStore, Embedder};
use uniqa_core::types::{Chunk, DocumentType};
use uniqa_embed::embedder_from_config;
use uniqa_hybrid::{HybridSearcher, RetrievedContext};
use uniqa_store::store_from_config;
use walkdir::WalkDir;

const CHUNK_SIZE: usize = 1000;
const EMBED_BATCH: usize = 64;

fn usage(program: &str) {
    eprintln!("Usage:");
    eprintln!("  {program} ingest <dir> [document_type]");
    eprintln!("  {program} search <query> [category] [limit]");
    eprintln!("Example: {program} search 'GPA requirement' scholarship 5");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage(&args[0]);
        std::process::exit(1);
    }

    let config = AppConfig::load()?;
    let embedder = embedder_from_config(&config.embedding)?;
    let store = store_from_config(&config.store, embedder.dim()).await?;
    tracing::info!(
        backend = %config.store.backend,
        provider = %embedder.embedder_id(),
        "components constructed"
    );

    match args[1].as_str() {
        "ingest" => {
            let Some(dir) = args.get(2) else {
                usage(&args[0]);
                std::process::exit(1);
            };
            let document_type = match args.get(3) {
                Some(label) => DocumentType::from_label(label)
                    .ok_or_else(|| anyhow::anyhow!("unknown document type: {label}"))?,
                None => DocumentType::Scholarship,
            };
            ingest(store.as_ref(), embedder.as_ref(), Path::new(dir), document_type).await?;
        }
        "search" => {
            let Some(query) = args.get(2) else {
                usage(&args[0]);
                std::process::exit(1);
            };
            let category = args.get(3).and_then(|s| DocumentType::from_label(s));
            let limit = args
                .get(4)
                .and_then(|s| s.parse().ok())
                .unwrap_or(config.retrieval.limit);

            let searcher = HybridSearcher::new(store, embedder).with_rrf_k(config.retrieval.rrf_k);
            let results = searcher.search(query, category, limit).await;

            println!("🔍 Found {} results for: \"{}\"", results.len(), query);
            for (i, result) in results.iter().enumerate() {
                println!(
                    "\n  {}. score={:.4}  type={}  source={}",
                    i + 1,
                    result.score,
                    result.chunk.document_type,
                    result.source
                );
                let preview: String = result.chunk.content.chars().take(160).collect();
                println!("     {preview}");
            }
            let context = RetrievedContext::from_results(results);
            if context.results.is_empty() {
                println!("\nNo evidence found.");
            } else {
                println!("\n📊 Confidence: {:.3}", context.confidence);
            }
        }
        other => {
            eprintln!("Unknown command: {other}");
            usage(&args[0]);
            std::process::exit(1);
        }
    }
    Ok(())
}

async fn ingest(
    store: &dyn ChunkStore,
    embedder: &dyn Embedder,
    dir: &Path,
    document_type: DocumentType,
) -> Result<()> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).into_iter().filter_map(std::result::Result::ok) {
        if entry.file_type().is_file() {
            if let Some("txt" | "md") = entry.path().extension().and_then(|e| e.to_str()) {
                files.push(entry.into_path());
            }
        }
    }
    if files.is_empty() {
        println!("No .txt or .md files under {}", dir.display());
        return Ok(());
    }

    let mut chunks = Vec::new();
    for path in &files {
        let text = std::fs::read_to_string(path)?;
        let source = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown");
        let pieces = split_into_chunks(&text, CHUNK_SIZE);
        let total = pieces.len();
        for (i, piece) in pieces.into_iter().enumerate() {
            chunks.push(Chunk::new(source, i, total, piece, document_type));
        }
    }

    println!(
        "Ingesting {} chunks from {} files ({document_type})...",
        chunks.len(),
        files.len()
    );
    let pb = ProgressBar::new(chunks.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} chunks")
            .unwrap()
            .progress_chars("#>-"),
    );
    for batch in chunks.chunks(EMBED_BATCH) {
        let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
        let embeddings = embedder.embed(&texts).await?;
        store.add_chunks(batch, &embeddings).await?;
        pb.inc(batch.len() as u64);
    }
    pb.finish();
    println!("✅ Ingested {} chunks", chunks.len());
    Ok(())
}

/// Fixed-size character chunks; empty pieces are dropped.
fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut count = 0usize;
    for ch in text.chars() {
        current.push(ch);
        count += 1;
        if count == chunk_size {
            let trimmed = current.trim();
            if !trimmed.is_empty() {
                chunks.push(trimmed.to_string());
            }
            current.clear();
            count = 0;
        }
    }
    let trimmed = current.trim();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    chunks
}

#[cfg(test)]
mod tests {
    use super::split_into_chunks;

    #[test]
    fn splits_on_character_boundaries() {
        let text = "a".repeat(2500);
        let chunks = split_into_chunks(&text, 1000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[2].len(), 500);
    }

    #[test]
    fn drops_whitespace_only_pieces() {
        let chunks = split_into_chunks("   \n\n   ", 1000);
        assert!(chunks.is_empty());
    }
}
