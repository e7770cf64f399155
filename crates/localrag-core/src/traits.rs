use std::path::Path;

use async_trait::async_trait;

use crate::types::{IndexedVector, ScoredChunk};

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn max_len(&self) -> usize;
    /// Must be deterministic for identical input within one model version.
    fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Persistent or in-memory similarity index holding one named collection.
///
/// `clear` followed by `upsert` is a full rebuild; callers must not run it
/// concurrently with `query`.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn upsert(&self, records: &[IndexedVector]) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
    /// Top `k` rows by descending similarity. Ties keep the index's own order.
    async fn query(&self, vector: &[f32], k: usize) -> anyhow::Result<Vec<ScoredChunk>>;
    async fn count(&self) -> anyhow::Result<usize>;
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Single-shot completion of `prompt`; no streaming, no retry.
    async fn generate(&self, prompt: &str) -> anyhow::Result<String>;
}

pub trait TextExtractor: Send + Sync {
    /// Best effort: unreadable content yields an empty string, not an error.
    fn extract(&self, path: &Path) -> anyhow::Result<String>;
}
