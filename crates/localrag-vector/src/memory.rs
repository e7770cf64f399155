use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::RwLock;

use localrag_core::traits::VectorIndex;
use localrag_core::types::{IndexedVector, ScoredChunk};

/// Brute-force cosine index held in process memory. Rows keep insertion
/// order, which is also the tie-break order of `query`.
#[derive(Default)]
pub struct MemoryIndex {
	rows: RwLock<Vec<IndexedVector>>,
}

impl MemoryIndex {
	pub fn new() -> Self { Self::default() }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
	let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
	let na = a.iter().map(|x| x * x).sum::<f32>().sqrt();
	let nb = b.iter().map(|x| x * x).sum::<f32>().sqrt();
	if na == 0.0 || nb == 0.0 { 0.0 } else { dot / (na * nb) }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
	async fn upsert(&self, records: &[IndexedVector]) -> Result<()> {
		let mut rows = self.rows.write().map_err(|_| anyhow!("memory index lock poisoned"))?;
		for record in records {
			match rows.iter_mut().find(|r| r.id == record.id) {
				Some(existing) => *existing = record.clone(),
				None => rows.push(record.clone()),
			}
		}
		Ok(())
	}

	async fn clear(&self) -> Result<()> {
		self.rows.write().map_err(|_| anyhow!("memory index lock poisoned"))?.clear();
		Ok(())
	}

	async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
		let rows = self.rows.read().map_err(|_| anyhow!("memory index lock poisoned"))?;
		let mut hits: Vec<ScoredChunk> = rows.iter().map(|r| ScoredChunk { chunk: r.chunk.clone(), score: cosine(vector, &r.vector) }).collect();
		hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
		hits.truncate(k);
		Ok(hits)
	}

	async fn count(&self) -> Result<usize> {
		Ok(self.rows.read().map_err(|_| anyhow!("memory index lock poisoned"))?.len())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use localrag_core::types::Chunk;

	fn record(source: &str, index: usize, vector: Vec<f32>) -> IndexedVector {
		IndexedVector::new(Chunk { text: format!("{source}#{index}"), source: source.to_string(), index }, vector)
	}

	#[tokio::test]
	async fn query_orders_by_similarity_with_stable_ties() {
		let index = MemoryIndex::new();
		index.upsert(&[
			record("a", 0, vec![0.0, 1.0]),
			record("b", 0, vec![1.0, 0.0]),
			record("c", 0, vec![1.0, 0.0]),
		]).await.unwrap();
		let hits = index.query(&[1.0, 0.0], 3).await.unwrap();
		let order: Vec<&str> = hits.iter().map(|h| h.chunk.source.as_str()).collect();
		assert_eq!(order, vec!["b", "c", "a"]);
	}

	#[tokio::test]
	async fn upsert_replaces_by_id_and_clear_empties() {
		let index = MemoryIndex::new();
		index.upsert(&[record("a", 0, vec![1.0])]).await.unwrap();
		index.upsert(&[record("a", 0, vec![0.5])]).await.unwrap();
		assert_eq!(index.count().await.unwrap(), 1);
		index.clear().await.unwrap();
		assert_eq!(index.count().await.unwrap(), 0);
		assert!(index.query(&[1.0], 5).await.unwrap().is_empty());
	}
}
