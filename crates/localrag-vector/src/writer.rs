use anyhow::{Result, anyhow};
use arrow_array::{FixedSizeListArray, Int32Array, RecordBatch, RecordBatchIterator, StringArray, TimestampMillisecondArray};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use localrag_core::types::IndexedVector;

use crate::schema::build_arrow_schema;
use crate::table::LanceIndex;

const BATCH_SIZE: usize = 1000;

impl LanceIndex {
	/// Insert or replace rows keyed by `id`.
	pub async fn upsert_records(&self, records: &[IndexedVector]) -> Result<()> {
		if records.is_empty() { return Ok(()); }
		for batch in records.chunks(BATCH_SIZE) {
			self.write_batch(batch).await?;
			debug!(rows = batch.len(), table = %self.table_name, "wrote batch");
		}
		info!("Indexed {} chunks into LanceDB table: {}", records.len(), self.table_name);
		Ok(())
	}

	async fn write_batch(&self, records: &[IndexedVector]) -> Result<()> {
		let record_batch = self.records_to_batch(records)?; let schema = record_batch.schema();
		let reader = Box::new(RecordBatchIterator::new(vec![Ok(record_batch)].into_iter(), schema));
		match self.existing_table().await? {
			Some(table) => {
				let mut mi = table.merge_insert(&["id"]);
				mi.when_matched_update_all(None).when_not_matched_insert_all();
				mi.execute(reader).await?;
			}
			None => { self.db.create_table(&self.table_name, reader).execute().await?; }
		}
		Ok(())
	}

	fn records_to_batch(&self, records: &[IndexedVector]) -> Result<RecordBatch> {
		let dim = self.dim_i32()?;
		let now = Utc::now().timestamp_millis();
		let mut ids = Vec::new(); let mut sources = Vec::new(); let mut chunk_indices = Vec::new(); let mut contents = Vec::new(); let mut ingested = Vec::new(); let mut vectors: Vec<Option<Vec<Option<f32>>>> = Vec::new();
		for r in records {
			if r.vector.len() != self.dim { return Err(anyhow!("dim mismatch for {}: got {} expected {}", r.id, r.vector.len(), self.dim)); }
			ids.push(r.id.clone()); sources.push(r.chunk.source.clone()); chunk_indices.push(i32::try_from(r.chunk.index)?); contents.push(r.chunk.text.clone()); ingested.push(now);
			vectors.push(Some(r.vector.iter().map(|&x| Some(x)).collect()));
		}
		let record_batch = RecordBatch::try_new(build_arrow_schema(dim), vec![
			Arc::new(StringArray::from(ids)),
			Arc::new(StringArray::from(sources)),
			Arc::new(Int32Array::from(chunk_indices)),
			Arc::new(StringArray::from(contents)),
			Arc::new(TimestampMillisecondArray::from(ingested)),
			Arc::new(FixedSizeListArray::from_iter_primitive::<arrow_array::types::Float32Type, _, _>(vectors.into_iter(), dim)),
		])?;
		Ok(record_batch)
	}
}
