//! Domain types shared by the chunker, the vector indexes and the answer pipeline.

use serde::{Deserialize, Serialize};

/// Stable document identity: the path or URI the text was extracted from.
pub type DocumentId = String;

/// A source document after text extraction. Never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: DocumentId,
    pub text: String,
}

impl Document {
    pub fn new(id: impl Into<DocumentId>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// A chunk of a source document that is independently embedded and indexed.
///
/// - `text`: the non-empty payload
/// - `source`: the parent document id
/// - `index`: 0-based position within the parent's chunk sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
    pub source: DocumentId,
    pub index: usize,
}

impl Chunk {
    /// Synthetic key under which the chunk is stored in a vector index.
    pub fn record_id(&self) -> String {
        format!("{}:{}", self.source, self.index)
    }
}

/// A chunk together with its embedding, as handed to a vector index.
#[derive(Debug, Clone)]
pub struct IndexedVector {
    pub id: String,
    pub chunk: Chunk,
    pub vector: Vec<f32>,
}

impl IndexedVector {
    pub fn new(chunk: Chunk, vector: Vec<f32>) -> Self {
        Self { id: chunk.record_id(), chunk, vector }
    }
}

/// One row of a similarity query. Higher `score` is more similar.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: Chunk,
    pub score: f32,
}

/// Query results in descending similarity, in the order the index returned them.
pub type RetrievedSet = Vec<ScoredChunk>;

/// Provenance pointer returned alongside an answer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SourceCitation {
    pub source: DocumentId,
    pub chunk: usize,
}

/// Response of the query entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
    pub sources: Vec<SourceCitation>,
}

/// Response of the ingestion entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub document_count: usize,
    pub chunk_count: usize,
}
