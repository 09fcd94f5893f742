use chrono::Utc;
use folio_core::error::{CmsError, CmsResult};
use folio_core::ids::NodeKind;
use folio_core::models::{Page, PageInput};
use sea_query::{Alias, Asterisk, Order, Query, SqliteQueryBuilder};

use super::{execute, fetch_all, fetch_optional, required};
use crate::connection::Database;
use crate::patch::FieldPatch;
use crate::{query, rows};

const TABLE: &str = "pages";

/// Page persistence
#[derive(Debug, Clone)]
pub struct PageRepository {
	db: Database,
}

fn page_patch(input: PageInput) -> FieldPatch {
	let mut patch = FieldPatch::new();
	patch
		.set_opt("title", input.title)
		.set_opt("description", input.description)
		.set_opt("project_go_live", input.project_go_live)
		.set_opt("client", input.client)
		.set_opt("published", input.published)
		.set_opt("published_on", input.published_on)
		.set_opt("position", input.position)
		.set_opt("listing_image_id", input.listing_image_id);
	patch
}

impl PageRepository {
	/// Create a repository
	pub fn new(db: Database) -> Self {
		Self { db }
	}

	/// Page by id
	pub async fn find(&self, id: i64) -> CmsResult<Option<Page>> {
		fetch_optional(&self.db, &query::select_by_id_sql(TABLE, id), rows::page).await
	}

	/// Page by id, `NotFound` when absent
	pub async fn get(&self, id: i64) -> CmsResult<Page> {
		self.find(id)
			.await?
			.ok_or_else(|| CmsError::not_found(NodeKind::Page, id))
	}

	/// All pages in creation order
	pub async fn list(&self) -> CmsResult<Vec<Page>> {
		let sql = Query::select()
			.column(Asterisk)
			.from(Alias::new(TABLE))
			.order_by(Alias::new("id"), Order::Asc)
			.to_string(SqliteQueryBuilder);
		fetch_all(&self.db, &sql, rows::page).await
	}

	/// Create a page. `title` is required.
	pub async fn create(&self, input: PageInput) -> CmsResult<Page> {
		required(&input.title, "title")?;
		let mut patch = page_patch(input);
		patch.stamp_created(Utc::now());
		let sql = query::insert_sql(TABLE, &patch)?;
		let id = execute(&self.db, &sql).await?.last_insert_rowid();
		tracing::info!(id, "page created");
		self.get(id).await
	}

	/// Update the supplied fields of a page
	pub async fn update(&self, id: i64, input: PageInput) -> CmsResult<Page> {
		if input.title.is_some() {
			required(&input.title, "title")?;
		}
		self.get(id).await?;
		let mut patch = page_patch(input);
		patch.stamp_updated(Utc::now());
		execute(&self.db, &query::update_sql(TABLE, id, &patch)).await?;
		self.get(id).await
	}
}
