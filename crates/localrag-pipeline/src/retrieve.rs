//! Question embedding plus top-k similarity lookup.
use std::sync::Arc;

use tracing::debug;

use localrag_core::traits::{Embedder, VectorIndex};
use localrag_core::types::RetrievedSet;
use localrag_core::{Error, Result};

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
    max_k: usize,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>, max_k: usize) -> Self {
        Self { embedder, index, max_k: max_k.max(1) }
    }

    /// Up to `k` chunks most similar to `question`, best first. `k` is clamped
    /// to `1..=max_k`; an empty index yields an empty set.
    pub async fn retrieve(&self, question: &str, k: usize) -> Result<RetrievedSet> {
        let k = k.clamp(1, self.max_k);
        let mut vectors = self
            .embedder
            .embed_batch(&[question.to_string()])
            .map_err(|e| Error::RetrievalFailed(format!("embedding the question: {e}")))?;
        let vector = vectors.pop().ok_or_else(|| Error::RetrievalFailed("embedder returned no vector".to_string()))?;

        let hits = self.index.query(&vector, k).await.map_err(|e| Error::RetrievalFailed(e.to_string()))?;
        debug!(k, hits = hits.len(), "retrieved");
        Ok(hits)
    }
}
