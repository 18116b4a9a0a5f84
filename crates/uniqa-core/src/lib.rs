//! Shared data model and capability traits for the uniqa retrieval engine.
//!
//! `types` holds the chunk/result model, `traits` the `Embedder` and
//! `ChunkStore` capability interfaces that backends implement, `config` the
//! figment-based loader that merges `config.toml` + `config.<env>.toml` +
//! `UNIQA_*` env vars into one typed struct built at process start.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;
