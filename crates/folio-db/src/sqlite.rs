//! SQLite transaction backend

use async_trait::async_trait;
use folio_core::policy::IsolationLevel;
use folio_core::position::{PositionedFamily, ShiftSpan};
use sqlx::pool::PoolConnection;
use sqlx::{Row, Sqlite, SqliteConnection, SqlitePool};

use crate::error::{DbError, DbResult, stored_position};
use crate::patch::FieldPatch;
use crate::query;
use crate::transaction::{Placement, PositionTransaction, TransactionBackend};

/// Opens transactions on a dedicated pooled connection
#[derive(Debug, Clone)]
pub struct SqliteBackend {
	pool: SqlitePool,
}

impl SqliteBackend {
	/// Create a backend over a pool
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}
}

#[async_trait]
impl TransactionBackend for SqliteBackend {
	async fn begin(&self, isolation: IsolationLevel) -> DbResult<Box<dyn PositionTransaction>> {
		let mut conn = self.pool.acquire().await?;
		sqlx::query(isolation.sqlite_begin_sql())
			.execute(&mut *conn)
			.await?;
		tracing::trace!(%isolation, "transaction started");
		Ok(Box::new(SqliteTransaction { conn: Some(conn) }))
	}
}

/// Transaction bound to one connection.
///
/// Dropped without commit or rollback, the connection is detached from the
/// pool and closed, which makes SQLite discard the open transaction.
pub struct SqliteTransaction {
	conn: Option<PoolConnection<Sqlite>>,
}

impl SqliteTransaction {
	fn conn(&mut self) -> DbResult<&mut SqliteConnection> {
		self.conn
			.as_deref_mut()
			.ok_or_else(|| DbError::Query("transaction already finished".to_string()))
	}

	async fn execute(&mut self, sql: &str) -> DbResult<u64> {
		tracing::debug!(sql, "execute");
		let result = sqlx::query(sql).execute(self.conn()?).await?;
		Ok(result.rows_affected())
	}

	async fn finish(mut self: Box<Self>, statement: &str) -> DbResult<()> {
		let mut conn = self
			.conn
			.take()
			.ok_or_else(|| DbError::Query("transaction already finished".to_string()))?;
		match sqlx::query(statement).execute(&mut *conn).await {
			Ok(_) => Ok(()),
			Err(err) => {
				// leave no half-open transaction behind on a pooled connection
				drop(conn.detach());
				Err(err.into())
			}
		}
	}
}

#[async_trait]
impl PositionTransaction for SqliteTransaction {
	async fn parent_exists(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<bool> {
		let sql = query::exists_sql(family.parent_table(), scope_id);
		let row = sqlx::query(&sql).fetch_optional(self.conn()?).await?;
		Ok(row.is_some())
	}

	async fn placement(&mut self, family: PositionedFamily, id: i64) -> DbResult<Option<Placement>> {
		let sql = query::placement_sql(family, id);
		let row = sqlx::query(&sql).fetch_optional(self.conn()?).await?;
		match row {
			Some(row) => {
				let scope_id: i64 = row.try_get(family.scope_column())?;
				let position: Option<i64> = row.try_get("position")?;
				Ok(Some(Placement {
					scope_id,
					position: stored_position(position)?,
				}))
			}
			None => Ok(None),
		}
	}

	async fn count_in_scope(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<u64> {
		let sql = query::count_in_scope_sql(family, scope_id);
		let row = sqlx::query(&sql).fetch_one(self.conn()?).await?;
		let count: i64 = row.try_get("count")?;
		Ok(count.max(0) as u64)
	}

	async fn insert(&mut self, family: PositionedFamily, patch: &FieldPatch) -> DbResult<i64> {
		let sql = query::insert_sql(family.table(), patch)?;
		tracing::debug!(sql, "insert");
		let result = sqlx::query(&sql).execute(self.conn()?).await?;
		Ok(result.last_insert_rowid())
	}

	async fn update(&mut self, family: PositionedFamily, id: i64, patch: &FieldPatch) -> DbResult<u64> {
		if patch.is_empty() {
			return Ok(0);
		}
		let sql = query::update_sql(family.table(), id, patch);
		self.execute(&sql).await
	}

	async fn shift_siblings(
		&mut self,
		family: PositionedFamily,
		scope_id: i64,
		span: ShiftSpan,
		exclude: Option<i64>,
	) -> DbResult<u64> {
		let sql = query::shift_sql(family, scope_id, span, exclude);
		self.execute(&sql).await
	}

	async fn delete(&mut self, family: PositionedFamily, id: i64) -> DbResult<u64> {
		let sql = query::delete_sql(family.table(), id);
		self.execute(&sql).await
	}

	async fn commit(self: Box<Self>) -> DbResult<()> {
		self.finish("COMMIT").await
	}

	async fn rollback(self: Box<Self>) -> DbResult<()> {
		self.finish("ROLLBACK").await
	}
}

impl Drop for SqliteTransaction {
	fn drop(&mut self) {
		if let Some(conn) = self.conn.take() {
			tracing::warn!("transaction dropped without commit or rollback; closing its connection");
			drop(conn.detach());
		}
	}
}
