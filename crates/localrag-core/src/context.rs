//! Turns a retrieved set into prompt context plus deduplicated citations.

use std::collections::HashSet;

use crate::types::{ScoredChunk, SourceCitation};

/// Maximum number of distinct `(source, chunk)` pairs cited per answer.
pub const MAX_CITATIONS: usize = 3;

const CONTEXT_SEPARATOR: &str = "\n\n";
const PREVIEW_CHARS: usize = 180;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembledContext {
    pub context: String,
    pub citations: Vec<SourceCitation>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.context.is_empty()
    }
}

/// Concatenate every retrieved chunk (duplicates included) and cite the first
/// distinct pairs in retrieval order.
pub fn assemble(retrieved: &[ScoredChunk]) -> AssembledContext {
    let context = retrieved.iter().map(|hit| hit.chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR);
    let citations = cited_chunks(retrieved)
        .into_iter()
        .map(|hit| SourceCitation { source: hit.chunk.source.clone(), chunk: hit.chunk.index })
        .collect();
    AssembledContext { context, citations }
}

/// The retrieved rows that earn a citation: first occurrence of each
/// `(source, index)` key, at most [`MAX_CITATIONS`].
pub fn cited_chunks(retrieved: &[ScoredChunk]) -> Vec<&ScoredChunk> {
    let mut seen: HashSet<(&str, usize)> = HashSet::new();
    let mut cited = Vec::new();
    for hit in retrieved {
        if cited.len() == MAX_CITATIONS {
            break;
        }
        if seen.insert((hit.chunk.source.as_str(), hit.chunk.index)) {
            cited.push(hit);
        }
    }
    cited
}

/// One-line preview of a chunk for source listings: the first 180 characters,
/// an ellipsis, and newlines flattened to spaces.
pub fn preview(text: &str) -> String {
    let head: String = text.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...").replace('\n', " ")
}
