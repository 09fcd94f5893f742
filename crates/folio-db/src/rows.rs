//! Row decoding

use chrono::{DateTime, NaiveDate, Utc};
use folio_core::models::{Block, File, Meta, Page};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::error::{DbError, DbResult};

fn parse_timestamp(column: &'static str, raw: &str) -> DbResult<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(raw)
		.map(|ts| ts.with_timezone(&Utc))
		.map_err(|e| DbError::Decode {
			column,
			message: e.to_string(),
		})
}

fn timestamp(row: &SqliteRow, column: &'static str) -> DbResult<DateTime<Utc>> {
	let raw: String = row.try_get(column)?;
	parse_timestamp(column, &raw)
}

fn opt_timestamp(row: &SqliteRow, column: &'static str) -> DbResult<Option<DateTime<Utc>>> {
	let raw: Option<String> = row.try_get(column)?;
	raw.map(|raw| parse_timestamp(column, &raw)).transpose()
}

fn opt_date(row: &SqliteRow, column: &'static str) -> DbResult<Option<NaiveDate>> {
	let raw: Option<String> = row.try_get(column)?;
	raw.map(|raw| {
		NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|e| DbError::Decode {
			column,
			message: e.to_string(),
		})
	})
	.transpose()
}

fn opt_json(row: &SqliteRow, column: &'static str) -> DbResult<Option<serde_json::Value>> {
	let raw: Option<String> = row.try_get(column)?;
	raw.map(|raw| {
		serde_json::from_str(&raw).map_err(|e| DbError::Decode {
			column,
			message: e.to_string(),
		})
	})
	.transpose()
}

/// Decode a `pages` row
pub fn page(row: &SqliteRow) -> DbResult<Page> {
	Ok(Page {
		id: row.try_get("id")?,
		title: row.try_get("title")?,
		description: row.try_get("description")?,
		project_go_live: opt_date(row, "project_go_live")?,
		client: row.try_get("client")?,
		published: row.try_get("published")?,
		published_on: opt_timestamp(row, "published_on")?,
		position: row.try_get("position")?,
		listing_image_id: row.try_get("listing_image_id")?,
		created_at: timestamp(row, "created_at")?,
		updated_at: timestamp(row, "updated_at")?,
	})
}

/// Decode a `blocks` row
pub fn block(row: &SqliteRow) -> DbResult<Block> {
	Ok(Block {
		id: row.try_get("id")?,
		page_id: row.try_get("page_id")?,
		block_type: row.try_get("block_type")?,
		position: row.try_get("position")?,
		editor: opt_json(row, "editor")?,
		date: opt_timestamp(row, "date")?,
		title: row.try_get("title")?,
		colour: row.try_get("colour")?,
		created_at: timestamp(row, "created_at")?,
		updated_at: timestamp(row, "updated_at")?,
	})
}

/// Decode a `meta` row
pub fn meta(row: &SqliteRow) -> DbResult<Meta> {
	Ok(Meta {
		id: row.try_get("id")?,
		block_id: row.try_get("block_id")?,
		field1: row.try_get("field1")?,
		field2: row.try_get("field2")?,
		position: row.try_get("position")?,
		created_at: timestamp(row, "created_at")?,
		updated_at: timestamp(row, "updated_at")?,
	})
}

/// Decode a `files` row
pub fn file(row: &SqliteRow) -> DbResult<File> {
	Ok(File {
		id: row.try_get("id")?,
		path: row.try_get("path")?,
		original_name: row.try_get("original_name")?,
		content_type: row.try_get("content_type")?,
		size: row.try_get("size")?,
		scope: row.try_get("scope")?,
		block_id: row.try_get("block_id")?,
		created_at: timestamp(row, "created_at")?,
		updated_at: timestamp(row, "updated_at")?,
	})
}
