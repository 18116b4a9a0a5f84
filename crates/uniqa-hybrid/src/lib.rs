//! Hybrid retrieval engine.
//!
//! Combines a dense (embedding similarity) retriever and a sparse
//! (term-frequency) retriever over one chunk store, merges their ranked
//! lists with reciprocal rank fusion and returns a scored, deduplicated
//! result set. `HybridSearcher` is the public entry point.

pub mod dense;
pub mod engine;
pub mod fusion;
mod row;
pub mod sparse;

pub use dense::DenseRetriever;
pub use engine::{HybridSearcher, RetrievedContext};
pub use fusion::reciprocal_rank_fusion;
pub use sparse::SparseRetriever;
