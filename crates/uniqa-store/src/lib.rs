//! `ChunkStore` backends.
//!
//! `memory` is a brute-force in-memory store used by tests and small
//! deployments; `lance` persists chunks in a LanceDB table. The backend is
//! selected once at startup from configuration; an unknown backend name is
//! a construction-time failure.

pub mod lance;
pub mod memory;

pub use lance::LanceStore;
pub use memory::MemoryStore;

use std::path::Path;
use std::sync::Arc;
use uniqa_core::config::StoreConfig;
use uniqa_core::error::Error;
use uniqa_core::traits::ChunkStore;

/// `dim` is the embedding dimensionality the lance backend declares for its
/// vector column; the memory backend ignores it.
pub async fn store_from_config(cfg: &StoreConfig, dim: usize) -> anyhow::Result<Arc<dyn ChunkStore>> {
    match cfg.backend.as_str() {
        "memory" => Ok(Arc::new(MemoryStore::new())),
        "lance" => Ok(Arc::new(
            LanceStore::new(Path::new(&cfg.db_path), &cfg.table_name, dim).await?,
        )),
        other => Err(Error::InvalidConfig(format!("Unsupported chunk store backend: {other}")).into()),
    }
}
