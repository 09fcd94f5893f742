//! Table definitions and schema synchronisation

use sea_query::{
	Alias, ColumnDef, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, SqliteQueryBuilder,
	Table, TableCreateStatement,
};

use crate::connection::Database;
use crate::error::DbResult;

/// Tables in dependency order
pub const TABLES: [&str; 4] = ["pages", "blocks", "meta", "files"];

fn id_column() -> ColumnDef {
	ColumnDef::new(Alias::new("id"))
		.integer()
		.not_null()
		.auto_increment()
		.primary_key()
		.to_owned()
}

fn timestamp_columns(table: &mut TableCreateStatement) {
	table
		.col(ColumnDef::new(Alias::new("created_at")).timestamp().not_null())
		.col(ColumnDef::new(Alias::new("updated_at")).timestamp().not_null());
}

fn pages_table() -> TableCreateStatement {
	let mut table = Table::create();
	table
		.table(Alias::new("pages"))
		.if_not_exists()
		.col(id_column())
		.col(ColumnDef::new(Alias::new("title")).string().not_null())
		.col(ColumnDef::new(Alias::new("description")).text())
		.col(ColumnDef::new(Alias::new("project_go_live")).date())
		.col(ColumnDef::new(Alias::new("client")).string())
		.col(
			ColumnDef::new(Alias::new("published"))
				.boolean()
				.not_null()
				.default(false),
		)
		.col(ColumnDef::new(Alias::new("published_on")).timestamp())
		.col(
			ColumnDef::new(Alias::new("position"))
				.integer()
				.not_null()
				.default(0),
		)
		.col(ColumnDef::new(Alias::new("listing_image_id")).integer());
	timestamp_columns(&mut table);
	table.to_owned()
}

fn blocks_table() -> TableCreateStatement {
	let mut table = Table::create();
	table
		.table(Alias::new("blocks"))
		.if_not_exists()
		.col(id_column())
		.col(ColumnDef::new(Alias::new("page_id")).integer().not_null())
		.col(ColumnDef::new(Alias::new("block_type")).string().not_null())
		.col(
			ColumnDef::new(Alias::new("position"))
				.integer()
				.not_null()
				.default(0),
		)
		.col(ColumnDef::new(Alias::new("editor")).text())
		.col(ColumnDef::new(Alias::new("date")).timestamp())
		.col(ColumnDef::new(Alias::new("title")).string())
		.col(ColumnDef::new(Alias::new("colour")).string())
		.foreign_key(
			ForeignKey::create()
				.name("fk_blocks_page")
				.from(Alias::new("blocks"), Alias::new("page_id"))
				.to(Alias::new("pages"), Alias::new("id")),
		);
	timestamp_columns(&mut table);
	table.to_owned()
}

fn meta_table() -> TableCreateStatement {
	let mut table = Table::create();
	table
		.table(Alias::new("meta"))
		.if_not_exists()
		.col(id_column())
		.col(ColumnDef::new(Alias::new("block_id")).integer().not_null())
		.col(ColumnDef::new(Alias::new("field1")).text())
		.col(ColumnDef::new(Alias::new("field2")).text())
		.col(
			ColumnDef::new(Alias::new("position"))
				.integer()
				.not_null()
				.default(0),
		)
		.foreign_key(
			ForeignKey::create()
				.name("fk_meta_block")
				.from(Alias::new("meta"), Alias::new("block_id"))
				.to(Alias::new("blocks"), Alias::new("id"))
				.on_delete(ForeignKeyAction::Cascade),
		);
	timestamp_columns(&mut table);
	table.to_owned()
}

fn files_table() -> TableCreateStatement {
	let mut table = Table::create();
	table
		.table(Alias::new("files"))
		.if_not_exists()
		.col(id_column())
		.col(
			ColumnDef::new(Alias::new("path"))
				.string()
				.not_null()
				.unique_key(),
		)
		.col(ColumnDef::new(Alias::new("original_name")).string().not_null())
		.col(ColumnDef::new(Alias::new("content_type")).string().not_null())
		.col(ColumnDef::new(Alias::new("size")).big_integer())
		.col(ColumnDef::new(Alias::new("scope")).string())
		.col(ColumnDef::new(Alias::new("block_id")).integer())
		.foreign_key(
			ForeignKey::create()
				.name("fk_files_block")
				.from(Alias::new("files"), Alias::new("block_id"))
				.to(Alias::new("blocks"), Alias::new("id"))
				.on_delete(ForeignKeyAction::SetNull),
		);
	timestamp_columns(&mut table);
	table.to_owned()
}

fn indexes() -> Vec<IndexCreateStatement> {
	vec![
		Index::create()
			.if_not_exists()
			.name("idx_blocks_page_position")
			.table(Alias::new("blocks"))
			.col(Alias::new("page_id"))
			.col(Alias::new("position"))
			.to_owned(),
		Index::create()
			.if_not_exists()
			.name("idx_meta_block_position")
			.table(Alias::new("meta"))
			.col(Alias::new("block_id"))
			.col(Alias::new("position"))
			.to_owned(),
		Index::create()
			.if_not_exists()
			.name("idx_files_block_scope")
			.table(Alias::new("files"))
			.col(Alias::new("block_id"))
			.col(Alias::new("scope"))
			.to_owned(),
	]
}

/// `CREATE TABLE` / `CREATE INDEX` statements in execution order
pub fn create_statements() -> Vec<String> {
	let mut statements: Vec<String> = [pages_table(), blocks_table(), meta_table(), files_table()]
		.iter()
		.map(|t| t.to_string(SqliteQueryBuilder))
		.collect();
	statements.extend(indexes().iter().map(|i| i.to_string(SqliteQueryBuilder)));
	statements
}

/// `DROP TABLE IF EXISTS` statements, dependents first
pub fn drop_statements() -> Vec<String> {
	TABLES
		.iter()
		.rev()
		.map(|name| {
			Table::drop()
				.table(Alias::new(*name))
				.if_exists()
				.to_string(SqliteQueryBuilder)
		})
		.collect()
}

/// Create every table. With `force`, existing tables are dropped first.
pub async fn sync(db: &Database, force: bool) -> DbResult<()> {
	let mut tx = db.pool().begin().await?;
	if force {
		for sql in drop_statements() {
			tracing::debug!(sql, "drop");
			sqlx::query(&sql).execute(&mut *tx).await?;
		}
	}
	for sql in create_statements() {
		tracing::debug!(sql, "create");
		sqlx::query(&sql).execute(&mut *tx).await?;
	}
	tx.commit().await?;
	tracing::info!(force, "schema synchronised");
	Ok(())
}
