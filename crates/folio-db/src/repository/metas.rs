use chrono::Utc;
use folio_core::error::{CmsError, CmsResult};
use folio_core::ids::NodeKind;
use folio_core::models::{Meta, MetaInput};
use folio_core::policy::MetaInsertPolicy;
use folio_core::position::{PositionInput, PositionedFamily};

use super::{fetch_all, fetch_optional};
use crate::connection::Database;
use crate::patch::FieldPatch;
use crate::reorder::{Moved, ReorderExecutor};
use crate::{query, rows};

const FAMILY: PositionedFamily = PositionedFamily::Meta;

fn meta_patch(input: MetaInput) -> FieldPatch {
	let mut patch = FieldPatch::new();
	patch
		.set_opt("field1", input.field1)
		.set_opt("field2", input.field2);
	patch
}

/// Metadata persistence. Entries are ordered within their block.
#[derive(Debug, Clone)]
pub struct MetaRepository {
	db: Database,
	executor: ReorderExecutor,
	policy: MetaInsertPolicy,
}

impl MetaRepository {
	/// Create a repository
	pub fn new(db: Database, executor: ReorderExecutor, policy: MetaInsertPolicy) -> Self {
		Self {
			db,
			executor,
			policy,
		}
	}

	/// Placement policy for new entries
	pub fn policy(&self) -> MetaInsertPolicy {
		self.policy
	}

	/// Entry by id
	pub async fn find(&self, id: i64) -> CmsResult<Option<Meta>> {
		fetch_optional(&self.db, &query::select_by_id_sql(FAMILY.table(), id), rows::meta).await
	}

	/// Entry by id, `NotFound` when absent
	pub async fn get(&self, id: i64) -> CmsResult<Meta> {
		self.find(id)
			.await?
			.ok_or_else(|| CmsError::not_found(NodeKind::Meta, id))
	}

	/// Entries of a block in sibling order
	pub async fn list_for_block(&self, block_id: i64) -> CmsResult<Vec<Meta>> {
		fetch_all(&self.db, &query::list_in_scope_sql(FAMILY, block_id), rows::meta).await
	}

	/// Create an entry under a block.
	///
	/// `position` is only consulted by [`MetaInsertPolicy::ShiftAll`].
	pub async fn create(
		&self,
		block_id: i64,
		input: MetaInput,
		position: &PositionInput,
	) -> CmsResult<Meta> {
		let requested = position.validate()?;
		let mut patch = meta_patch(input);
		patch.stamp_created(Utc::now());
		let created = self
			.executor
			.create_meta(block_id, patch, self.policy, requested)
			.await?;
		self.get(created.id).await
	}

	/// Update entry fields and move it to `position`, shifting the entries in
	/// between. A missing or non-numeric position only saves the fields.
	pub async fn update(
		&self,
		id: i64,
		input: MetaInput,
		position: &PositionInput,
	) -> CmsResult<(Meta, Moved)> {
		let change = position.validate()?;
		let mut patch = meta_patch(input);
		patch.stamp_updated(Utc::now());
		let moved = self.executor.move_item(FAMILY, id, patch, change).await?;
		Ok((self.get(id).await?, moved))
	}

	/// Delete an entry, returning it. Siblings keep their positions.
	pub async fn delete(&self, id: i64) -> CmsResult<Meta> {
		let meta = self.get(id).await?;
		self.executor.delete(FAMILY, id).await?;
		Ok(meta)
	}
}
