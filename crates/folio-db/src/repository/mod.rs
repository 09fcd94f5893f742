//! Entity repositories.
//!
//! One repository per entity, built once at startup and passed by
//! reference. Writes to ordered families (blocks, metadata) go through the
//! [`ReorderExecutor`]; everything else runs directly on the pool.

mod blocks;
mod files;
mod metas;
mod pages;

pub use blocks::BlockRepository;
pub use files::FileRepository;
pub use metas::MetaRepository;
pub use pages::PageRepository;

use folio_conf::Settings;
use folio_core::error::CmsResult;
use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use sqlx::sqlite::SqliteRow;

use crate::connection::Database;
use crate::error::DbResult;
use crate::reorder::ReorderExecutor;

/// Every repository, sharing one pool
#[derive(Debug, Clone)]
pub struct Repositories {
	/// Pages
	pub pages: PageRepository,
	/// Blocks
	pub blocks: BlockRepository,
	/// Metadata entries
	pub metas: MetaRepository,
	/// Files
	pub files: FileRepository,
}

impl Repositories {
	/// Build the repositories over `db`
	pub fn new(db: &Database, isolation: IsolationLevel, meta_policy: MetaInsertPolicy) -> Self {
		let executor = ReorderExecutor::new(db.backend(), isolation);
		Self {
			pages: PageRepository::new(db.clone()),
			blocks: BlockRepository::new(db.clone(), executor.clone()),
			metas: MetaRepository::new(db.clone(), executor, meta_policy),
			files: FileRepository::new(db.clone()),
		}
	}

	/// Build the repositories with the isolation and meta policy from `settings`
	pub fn from_settings(db: &Database, settings: &Settings) -> Self {
		Self::new(
			db,
			settings.database.isolation,
			settings.ordering.meta_insert,
		)
	}
}

async fn fetch_optional<T>(
	db: &Database,
	sql: &str,
	decode: fn(&SqliteRow) -> DbResult<T>,
) -> CmsResult<Option<T>> {
	tracing::trace!(sql, "fetch_optional");
	let row = sqlx::query(sql)
		.fetch_optional(db.pool())
		.await
		.map_err(crate::error::DbError::from)?;
	Ok(row.as_ref().map(decode).transpose()?)
}

async fn fetch_all<T>(
	db: &Database,
	sql: &str,
	decode: fn(&SqliteRow) -> DbResult<T>,
) -> CmsResult<Vec<T>> {
	tracing::trace!(sql, "fetch_all");
	let rows = sqlx::query(sql)
		.fetch_all(db.pool())
		.await
		.map_err(crate::error::DbError::from)?;
	Ok(rows.iter().map(decode).collect::<DbResult<Vec<T>>>()?)
}

async fn execute(db: &Database, sql: &str) -> CmsResult<sqlx::sqlite::SqliteQueryResult> {
	tracing::debug!(sql, "execute");
	Ok(sqlx::query(sql)
		.execute(db.pool())
		.await
		.map_err(crate::error::DbError::from)?)
}

fn required(value: &Option<String>, field: &str) -> CmsResult<()> {
	match value {
		Some(v) if !v.trim().is_empty() => Ok(()),
		_ => Err(folio_core::error::CmsError::Validation(format!(
			"{} is required",
			field
		))),
	}
}
