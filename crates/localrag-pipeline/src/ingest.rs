//! Full rebuild of the index from a document set.
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use localrag_core::chunker::ChunkingParams;
use localrag_core::traits::{Embedder, VectorIndex};
use localrag_core::types::{Chunk, Document, IndexedVector};
use localrag_core::{Error, Result};

const EMBED_BATCH: usize = 32;

/// Chunk, embed and store `documents`, replacing whatever the index held.
///
/// Parameters are checked before the index is touched. Chunks are returned in
/// document order, each with its 0-based position inside its own document.
pub async fn ingest(
    documents: &[Document],
    params: ChunkingParams,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
) -> Result<Vec<Chunk>> {
    params.validate()?;
    if documents.is_empty() {
        return Err(Error::NoDocumentsFound("the input set".to_string()));
    }

    let chunks: Vec<Chunk> = documents.iter().flat_map(|doc| params.chunk_document(doc)).collect();
    info!(documents = documents.len(), chunks = chunks.len(), "chunked documents");

    index.clear().await.map_err(|e| Error::Index(e.to_string()))?;

    let pb = ProgressBar::new(chunks.len() as u64);
    if let Ok(style) = ProgressStyle::default_bar().template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}") {
        pb.set_style(style.progress_chars("#>-"));
    }
    for batch in chunks.chunks(EMBED_BATCH) {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let vectors = embedder.embed_batch(&texts).map_err(|e| Error::Embedding(e.to_string()))?;
        if vectors.len() != batch.len() {
            return Err(Error::Embedding(format!("expected {} vectors, got {}", batch.len(), vectors.len())));
        }
        let records: Vec<IndexedVector> =
            batch.iter().cloned().zip(vectors).map(|(chunk, vector)| IndexedVector::new(chunk, vector)).collect();
        index.upsert(&records).await.map_err(|e| Error::Index(e.to_string()))?;
        pb.inc(batch.len() as u64);
    }
    pb.finish_with_message("indexed");

    info!(chunks = chunks.len(), "ingestion complete");
    Ok(chunks)
}
