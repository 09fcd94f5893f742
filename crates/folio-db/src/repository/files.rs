use chrono::Utc;
use folio_core::error::{CmsError, CmsResult};
use folio_core::ids::NodeKind;
use folio_core::models::{File, FileInput};
use sea_query::{Alias, Asterisk, Expr, ExprTrait, Order, Query, SqliteQueryBuilder};

use super::{execute, fetch_all, fetch_optional};
use crate::connection::Database;
use crate::patch::FieldPatch;
use crate::{query, rows};

const TABLE: &str = "files";

/// File row persistence. Bytes on disk are the media store's concern.
#[derive(Debug, Clone)]
pub struct FileRepository {
	db: Database,
}

impl FileRepository {
	/// Create a repository
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// File by id
	pub async fn find(&self, id: i64) -> CmsResult<Option<File>> {
		fetch_optional(&self.db, &query::select_by_id_sql(TABLE, id), rows::file).await
	}

	/// File by id, `NotFound` when absent
	pub async fn get(&self, id: i64) -> CmsResult<File> {
		self.find(id)
			.await?
			.ok_or_else(|| CmsError::not_found(NodeKind::File, id))
	}

	/// Files attached to a block
	pub async fn list_for_block(&self, block_id: i64) -> CmsResult<Vec<File>> {
		let sql = Query::select()
			.column(Asterisk)
			.from(Alias::new(TABLE))
			.and_where(Expr::col(Alias::new("block_id")).eq(block_id))
			.order_by(Alias::new("id"), Order::Asc)
			.to_string(SqliteQueryBuilder);
		fetch_all(&self.db, &sql, rows::file).await
	}

	/// Files occupying one upload slot of a block
	pub async fn list_in_slot(&self, block_id: i64, scope: Option<&str>) -> CmsResult<Vec<File>> {
		let mut stmt = Query::select();
		stmt.column(Asterisk)
			.from(Alias::new(TABLE))
			.and_where(Expr::col(Alias::new("block_id")).eq(block_id));
		match scope {
			Some(scope) => stmt.and_where(Expr::col(Alias::new("scope")).eq(scope)),
			None => stmt.and_where(Expr::col(Alias::new("scope")).is_null()),
		};
		stmt.order_by(Alias::new("id"), Order::Asc);
		fetch_all(&self.db, &stmt.to_string(SqliteQueryBuilder), rows::file).await
	}

	/// Insert a file row
	pub async fn create(&self, input: FileInput) -> CmsResult<File> {
		let mut patch = FieldPatch::new();
		patch
			.set("path", input.path)
			.set("original_name", input.original_name)
			.set("content_type", input.content_type)
			.set_opt("size", input.size)
			.set_opt("scope", input.scope)
			.set_opt("block_id", input.block_id)
			.stamp_created(Utc::now());
		let sql = query::insert_sql(TABLE, &patch)?;
		let id = execute(&self.db, &sql).await?.last_insert_rowid();
		tracing::info!(id, "file recorded");
		self.get(id).await
	}

	/// Delete a file row, returning it
	pub async fn delete(&self, id: i64) -> CmsResult<File> {
		let file = self.get(id).await?;
		execute(&self.db, &query::delete_sql(TABLE, id)).await?;
		Ok(file)
	}
}
