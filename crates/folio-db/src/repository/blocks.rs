use chrono::Utc;
use folio_core::error::{CmsError, CmsResult};
use folio_core::ids::NodeKind;
use folio_core::models::{Block, BlockInput};
use folio_core::position::{PositionChange, PositionInput, PositionedFamily};

use super::{fetch_all, fetch_optional, required};
use crate::connection::Database;
use crate::patch::FieldPatch;
use crate::reorder::{Moved, ReorderExecutor};
use crate::{query, rows};

const FAMILY: PositionedFamily = PositionedFamily::Block;

fn block_patch(input: BlockInput) -> FieldPatch {
	let mut patch = FieldPatch::new();
	patch
		.set_opt("block_type", input.block_type)
		.set_opt("editor", input.editor)
		.set_opt("date", input.date)
		.set_opt("title", input.title)
		.set_opt("colour", input.colour);
	patch
}

/// Block persistence. Blocks are ordered within their page.
#[derive(Debug, Clone)]
pub struct BlockRepository {
	db: Database,
	executor: ReorderExecutor,
}

impl BlockRepository {
	/// Create a repository
	pub fn new(db: Database, executor: ReorderExecutor) -> Self {
		Self { db, executor }
	}

	/// Block by id
	pub async fn find(&self, id: i64) -> CmsResult<Option<Block>> {
		fetch_optional(&self.db, &query::select_by_id_sql(FAMILY.table(), id), rows::block).await
	}

	/// Block by id, `NotFound` when absent
	pub async fn get(&self, id: i64) -> CmsResult<Block> {
		self.find(id)
			.await?
			.ok_or_else(|| CmsError::not_found(NodeKind::Block, id))
	}

	/// Blocks of a page in sibling order
	pub async fn list_for_page(&self, page_id: i64) -> CmsResult<Vec<Block>> {
		fetch_all(&self.db, &query::list_in_scope_sql(FAMILY, page_id), rows::block).await
	}

	/// Append a block to a page. `block_type` is required; `date` defaults to now.
	pub async fn create(&self, page_id: i64, input: BlockInput) -> CmsResult<Block> {
		required(&input.block_type, "blockType")?;
		let now = Utc::now();
		let date = input.date.unwrap_or(now);
		let mut patch = block_patch(input);
		patch.set("date", date).stamp_created(now);
		let created = self.executor.create_appended(FAMILY, page_id, patch).await?;
		self.get(created.id).await
	}

	/// Update block fields without touching its position
	pub async fn update(&self, id: i64, input: BlockInput) -> CmsResult<Block> {
		if input.block_type.is_some() {
			required(&input.block_type, "blockType")?;
		}
		let mut patch = block_patch(input);
		patch.stamp_updated(Utc::now());
		self.executor
			.move_item(FAMILY, id, patch, PositionChange::Keep)
			.await?;
		self.get(id).await
	}

	/// Update block fields and move the block to `position`, shifting the
	/// blocks in between. A missing or non-numeric position only saves the fields.
	pub async fn move_to(
		&self,
		id: i64,
		input: BlockInput,
		position: &PositionInput,
	) -> CmsResult<(Block, Moved)> {
		let change = position.validate()?;
		let mut patch = block_patch(input);
		patch.stamp_updated(Utc::now());
		let moved = self.executor.move_item(FAMILY, id, patch, change).await?;
		Ok((self.get(id).await?, moved))
	}

	/// Delete a block, returning it. Its metadata entries cascade; siblings keep their positions.
	pub async fn delete(&self, id: i64) -> CmsResult<Block> {
		let block = self.get(id).await?;
		self.executor.delete(FAMILY, id).await?;
		Ok(block)
	}
}
