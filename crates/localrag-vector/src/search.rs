use anyhow::{Result, anyhow};
use arrow_array::{Array, Float32Array, Int32Array, RecordBatch, StringArray};
use futures::TryStreamExt;
use lancedb::query::{ExecutableQuery, QueryBase};
use lancedb::DistanceType;

use localrag_core::types::{Chunk, ScoredChunk};

use crate::table::LanceIndex;

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> Result<&'a T> {
	batch.column_by_name(name).and_then(|c| c.as_any().downcast_ref::<T>()).ok_or_else(|| anyhow!("{name} column missing"))
}

impl LanceIndex {
	/// Cosine nearest neighbours, best first. A missing table means nothing was
	/// ingested yet and yields no rows.
	pub async fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<ScoredChunk>> {
		let Some(table) = self.existing_table().await? else { return Ok(vec![]) };
		if query_vec.len() != self.dim { return Err(anyhow!("query has {} dims, index expects {}", query_vec.len(), self.dim)); }
		let mut stream = table.vector_search(query_vec.to_vec())?.distance_type(DistanceType::Cosine).limit(k).execute().await?;
		let mut hits = Vec::new();
		while let Some(batch) = TryStreamExt::try_next(&mut stream).await? {
			let sources = column::<StringArray>(&batch, "source")?;
			let indices = column::<Int32Array>(&batch, "chunk_index")?;
			let contents = column::<StringArray>(&batch, "content")?;
			let distances = column::<Float32Array>(&batch, "_distance").ok();
			for i in 0..batch.num_rows() {
				let index = usize::try_from(indices.value(i))?;
				let score = distances.filter(|d| d.is_valid(i)).map_or(0.0, |d| 1.0 - d.value(i));
				hits.push(ScoredChunk { chunk: Chunk { text: contents.value(i).to_string(), source: sources.value(i).to_string(), index }, score });
			}
		}
		Ok(hits)
	}
}
