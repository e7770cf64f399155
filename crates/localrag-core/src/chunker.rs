//! Greedy sliding-window chunking.
//!
//! Windows are measured in characters (not bytes) so multi-byte text never
//! splits inside a code point. Consecutive windows share exactly
//! `chunk_overlap` characters; the last window may be shorter.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Chunk, Document};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingParams {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingParams {
    fn default() -> Self {
        Self { chunk_size: 500, chunk_overlap: 50 }
    }
}

impl ChunkingParams {
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self> {
        let params = Self { chunk_size, chunk_overlap };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidParameters("chunk_size must be greater than 0".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidParameters(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Split `text` into windows. Assumes `self` has been validated.
    pub fn split(&self, text: &str) -> Vec<String> {
        // Byte offset of every char boundary, including the end of the text.
        let bounds: Vec<usize> = text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
        let char_len = bounds.len() - 1;
        let step = self.chunk_size - self.chunk_overlap;

        let mut chunks = Vec::new();
        let mut offset = 0usize;
        while offset < char_len {
            let end = (offset + self.chunk_size).min(char_len);
            chunks.push(text[bounds[offset]..bounds[end]].to_string());
            if end == char_len {
                break;
            }
            offset += step;
        }
        chunks
    }

    /// Chunk one document, numbering chunks from 0.
    pub fn chunk_document(&self, document: &Document) -> Vec<Chunk> {
        self.split(&document.text)
            .into_iter()
            .enumerate()
            .map(|(index, text)| Chunk { text, source: document.id.clone(), index })
            .collect()
    }
}

/// Validate `size`/`overlap` and split `text`. Empty input yields no chunks.
pub fn split(text: &str, size: usize, overlap: usize) -> Result<Vec<String>> {
    Ok(ChunkingParams::new(size, overlap)?.split(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_count(len: usize, size: usize, overlap: usize) -> usize {
        if len == 0 {
            0
        } else if len <= size {
            1
        } else {
            (len - overlap).div_ceil(size - overlap)
        }
    }

    #[test]
    fn empty_text_yields_no_chunks() {
        assert!(split("", 10, 2).expect("split").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split("hello", 10, 2).expect("split");
        assert_eq!(chunks, vec!["hello".to_string()]);
    }

    #[test]
    fn rejects_overlap_not_smaller_than_size() {
        assert!(matches!(split("abc", 4, 4), Err(Error::InvalidParameters(_))));
        assert!(matches!(split("abc", 4, 9), Err(Error::InvalidParameters(_))));
        assert!(matches!(split("abc", 0, 0), Err(Error::InvalidParameters(_))));
    }

    #[test]
    fn windows_advance_by_size_minus_overlap() {
        let chunks = split("abcdefghij", 4, 1).expect("split");
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
    }

    #[test]
    fn chunk_count_and_overlap_hold_across_parameters() {
        let text: String = ('a'..='z').cycle().take(137).collect();
        for size in 1..=20 {
            for overlap in 0..size {
                for len in [0usize, 1, size, size + 1, 57, 137] {
                    let slice: String = text.chars().take(len).collect();
                    let chunks = split(&slice, size, overlap).expect("split");
                    assert_eq!(chunks.len(), expected_count(len, size, overlap), "len={len} size={size} overlap={overlap}");
                    for pair in chunks.windows(2) {
                        let tail: String = pair[0].chars().skip(pair[0].chars().count() - overlap).collect();
                        let head: String = pair[1].chars().take(overlap).collect();
                        assert_eq!(tail, head);
                    }
                    assert!(chunks.iter().all(|c| !c.is_empty() && c.chars().count() <= size));
                }
            }
        }
    }

    #[test]
    fn multibyte_text_splits_on_char_boundaries() {
        let chunks = split("éléphant à la plage", 5, 2).expect("split");
        assert_eq!(chunks[0], "éléph");
        assert_eq!(chunks[1], "phant");
        assert_eq!(chunks.concat().chars().filter(|c| *c == 'é').count(), 2);
    }

    #[test]
    fn chunk_document_numbers_from_zero() {
        let params = ChunkingParams::new(4, 1).expect("params");
        let doc = Document::new("notes.txt", "abcdefghij");
        let chunks = params.chunk_document(&doc);
        let indices: Vec<usize> = chunks.iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(chunks.iter().all(|c| c.source == "notes.txt"));
        assert_eq!(chunks[2].record_id(), "notes.txt:2");
    }
}
