//! localrag-vector
//!
//! Vector index backends behind `localrag_core::traits::VectorIndex`:
//! a LanceDB table persisted under a local directory, and an in-memory index
//! for tests and throwaway sessions.
use anyhow::Result;
use async_trait::async_trait;

use localrag_core::traits::VectorIndex;
use localrag_core::types::{IndexedVector, ScoredChunk};

pub mod memory;
pub mod schema;
pub mod search;
pub mod table;
pub mod writer;

pub use memory::MemoryIndex;
pub use table::LanceIndex;

#[async_trait]
impl VectorIndex for LanceIndex {
	async fn upsert(&self, records: &[IndexedVector]) -> Result<()> { self.upsert_records(records).await }
	async fn clear(&self) -> Result<()> { self.clear_rows().await }
	async fn query(&self, vector: &[f32], k: usize) -> Result<Vec<ScoredChunk>> { self.search(vector, k).await }
	async fn count(&self) -> Result<usize> { self.count_rows().await }
}
