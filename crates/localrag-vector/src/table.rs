//! LanceDB connection and housekeeping helpers.
//!
//! One `LanceIndex` owns one named table inside a local database directory.
use anyhow::{Result, anyhow};
use lancedb::{connect, Connection, Table};
use std::path::Path;
use tracing::info;

pub async fn open_db(uri: &str) -> Result<Connection> {
	Ok(connect(uri).execute().await?)
}

pub struct LanceIndex { pub(crate) db: Connection, pub(crate) table_name: String, pub(crate) dim: usize }

impl LanceIndex {
	/// Open (or create) the database directory. The table itself is created on
	/// first write.
	pub async fn open(db_path: &Path, table_name: &str, dim: usize) -> Result<Self> {
		if dim == 0 { return Err(anyhow!("embedding dimension must be greater than 0")); }
		std::fs::create_dir_all(db_path)?;
		let db = open_db(db_path.to_string_lossy().as_ref()).await?;
		info!(path = %db_path.display(), table = table_name, "opened LanceDB");
		Ok(Self { db, table_name: table_name.to_string(), dim })
	}

	pub fn table_name(&self) -> &str { &self.table_name }

	pub(crate) fn dim_i32(&self) -> Result<i32> { Ok(i32::try_from(self.dim)?) }

	pub(crate) async fn existing_table(&self) -> Result<Option<Table>> {
		let names = self.db.table_names().execute().await?;
		if !names.contains(&self.table_name) { return Ok(None); }
		Ok(Some(self.db.open_table(&self.table_name).execute().await?))
	}

	/// Remove every row, keeping the table and its schema.
	pub async fn clear_rows(&self) -> Result<()> {
		if let Some(table) = self.existing_table().await? {
			table.delete("true").await?;
			info!(table = %self.table_name, "cleared collection");
		}
		Ok(())
	}

	pub async fn count_rows(&self) -> Result<usize> {
		match self.existing_table().await? {
			Some(table) => Ok(table.count_rows(None).await?),
			None => Ok(0),
		}
	}
}
