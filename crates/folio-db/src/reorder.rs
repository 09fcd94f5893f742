//! Transactional reorder executor.
//!
//! Every mutation of a positioned collection runs as one atomic unit:
//!
//! 1. begin a transaction
//! 2. read the target's current placement (missing → `NotFound`, nothing written)
//! 3. apply the target's own field update, including its new position
//! 4. apply the compensating sibling shift as a single bulk update
//! 5. commit; any failure in 2-4 rolls everything back
//!
//! The executor is generic over [`TransactionBackend`], so the same code
//! path runs against SQLite and the in-memory test backend.

use folio_core::error::{CmsError, CmsResult};
use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use folio_core::position::{
	Position, PositionChange, PositionedFamily, ShiftSpan, append_position, compute_shift,
};

use crate::patch::FieldPatch;
use crate::sqlite::SqliteBackend;
use crate::transaction::{Placement, PositionTransaction, TransactionBackend};

/// Result of creating an ordered item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Created {
	/// New row id
	pub id: i64,
	/// Position the row was inserted at
	pub position: Position,
}

/// Result of moving (or updating) an ordered item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Moved {
	/// Row id
	pub id: i64,
	/// Scope the row belongs to
	pub scope_id: i64,
	/// Position before the move
	pub from: Position,
	/// Position after the move
	pub to: Position,
	/// Number of siblings shifted
	pub shifted: u64,
}

/// Runs positioned-collection mutations atomically
#[derive(Debug, Clone)]
pub struct ReorderExecutor<B = SqliteBackend> {
	backend: B,
	isolation: IsolationLevel,
}

impl<B: TransactionBackend> ReorderExecutor<B> {
	/// Create an executor
	pub fn new(backend: B, isolation: IsolationLevel) -> Self {
		Self { backend, isolation }
	}

	/// The underlying backend
	pub fn backend(&self) -> &B {
		&self.backend
	}

	/// Isolation used for every transaction
	pub fn isolation(&self) -> IsolationLevel {
		self.isolation
	}

	/// Insert an item at `count + 1` within its scope.
	///
	/// The count and the insert happen in the same transaction.
	#[tracing::instrument(skip(self, patch))]
	pub async fn create_appended(
		&self,
		family: PositionedFamily,
		scope_id: i64,
		patch: FieldPatch,
	) -> CmsResult<Created> {
		let mut tx = self.begin().await?;
		let result = append_steps(tx.as_mut(), family, scope_id, patch).await;
		let created = finish(tx, result).await?;
		tracing::info!(id = created.id, position = %created.position, "item appended");
		Ok(created)
	}

	/// Create a metadata entry according to `policy`.
	///
	/// With [`MetaInsertPolicy::ShiftAll`] the row is inserted at `requested`
	/// (default `0`) and every sibling with `position >= 0`, the new row
	/// included, is then shifted up by one.
	#[tracing::instrument(skip(self, patch))]
	pub async fn create_meta(
		&self,
		block_id: i64,
		patch: FieldPatch,
		policy: MetaInsertPolicy,
		requested: PositionChange,
	) -> CmsResult<Created> {
		let family = PositionedFamily::Meta;
		let mut tx = self.begin().await?;
		let result = match policy {
			MetaInsertPolicy::Append => append_steps(tx.as_mut(), family, block_id, patch).await,
			MetaInsertPolicy::ShiftAll => {
				shift_all_steps(tx.as_mut(), block_id, patch, requested).await
			}
		};
		let created = finish(tx, result).await?;
		tracing::info!(id = created.id, position = %created.position, "meta created");
		Ok(created)
	}

	/// Update an item and, when `change` carries a valid new position, move it
	/// there and shift the siblings in between.
	///
	/// [`PositionChange::Keep`] still saves `patch` but issues no shift.
	#[tracing::instrument(skip(self, patch))]
	pub async fn move_item(
		&self,
		family: PositionedFamily,
		id: i64,
		patch: FieldPatch,
		change: PositionChange,
	) -> CmsResult<Moved> {
		let mut tx = self.begin().await?;
		let result = move_steps(tx.as_mut(), family, id, patch, change).await;
		let moved = finish(tx, result).await?;
		if moved.from != moved.to {
			tracing::info!(
				id,
				from = %moved.from,
				to = %moved.to,
				shifted = moved.shifted,
				"item moved"
			);
		}
		Ok(moved)
	}

	/// Delete an item. Siblings keep their positions; the gap persists.
	#[tracing::instrument(skip(self))]
	pub async fn delete(&self, family: PositionedFamily, id: i64) -> CmsResult<Placement> {
		let mut tx = self.begin().await?;
		let result = delete_steps(tx.as_mut(), family, id).await;
		let placement = finish(tx, result).await?;
		tracing::info!(id, "item deleted");
		Ok(placement)
	}

	async fn begin(&self) -> CmsResult<Box<dyn PositionTransaction>> {
		self.backend
			.begin(self.isolation)
			.await
			.map_err(|e| CmsError::Transaction(e.to_string()))
	}
}

async fn finish<T>(tx: Box<dyn PositionTransaction>, result: CmsResult<T>) -> CmsResult<T> {
	match result {
		Ok(value) => {
			tx.commit()
				.await
				.map_err(|e| CmsError::Transaction(e.to_string()))?;
			Ok(value)
		}
		Err(err) => {
			if let Err(rollback_err) = tx.rollback().await {
				tracing::warn!(error = %rollback_err, "rollback failed");
			}
			tracing::warn!(error = %err, "transaction rolled back");
			Err(err.into_transaction())
		}
	}
}

async fn ensure_parent(
	tx: &mut dyn PositionTransaction,
	family: PositionedFamily,
	scope_id: i64,
) -> CmsResult<()> {
	if !tx.parent_exists(family, scope_id).await? {
		return Err(CmsError::not_found(family.parent_kind(), scope_id));
	}
	Ok(())
}

async fn append_steps(
	tx: &mut dyn PositionTransaction,
	family: PositionedFamily,
	scope_id: i64,
	mut patch: FieldPatch,
) -> CmsResult<Created> {
	ensure_parent(tx, family, scope_id).await?;
	let count = tx.count_in_scope(family, scope_id).await?;
	let position = append_position(count);
	patch
		.set(family.scope_column(), scope_id)
		.set("position", position.get());
	let id = tx.insert(family, &patch).await?;
	Ok(Created { id, position })
}

async fn shift_all_steps(
	tx: &mut dyn PositionTransaction,
	block_id: i64,
	mut patch: FieldPatch,
	requested: PositionChange,
) -> CmsResult<Created> {
	let family = PositionedFamily::Meta;
	ensure_parent(tx, family, block_id).await?;
	let inserted_at = requested.target().unwrap_or(Position::ZERO);
	patch
		.set(family.scope_column(), block_id)
		.set("position", inserted_at.get());
	let id = tx.insert(family, &patch).await?;
	tx.shift_siblings(family, block_id, ShiftSpan::open_up(0), None)
		.await?;
	Ok(Created {
		id,
		position: Position::new(inserted_at.get() + 1)?,
	})
}

async fn move_steps(
	tx: &mut dyn PositionTransaction,
	family: PositionedFamily,
	id: i64,
	mut patch: FieldPatch,
	change: PositionChange,
) -> CmsResult<Moved> {
	let placement = tx
		.placement(family, id)
		.await?
		.ok_or_else(|| CmsError::not_found(family.kind(), id))?;

	let target = match change {
		PositionChange::To(target) => {
			patch.set("position", target.get());
			target
		}
		PositionChange::Keep => {
			tracing::debug!(id, "position unchanged, skipping sibling shift");
			placement.position
		}
	};
	tx.update(family, id, &patch).await?;

	let shifted = match compute_shift(placement.position, target) {
		Some(shift) => {
			tx.shift_siblings(family, placement.scope_id, shift.span(), Some(id))
				.await?
		}
		None => 0,
	};

	Ok(Moved {
		id,
		scope_id: placement.scope_id,
		from: placement.position,
		to: target,
		shifted,
	})
}

async fn delete_steps(
	tx: &mut dyn PositionTransaction,
	family: PositionedFamily,
	id: i64,
) -> CmsResult<Placement> {
	let placement = tx
		.placement(family, id)
		.await?
		.ok_or_else(|| CmsError::not_found(family.kind(), id))?;
	tx.delete(family, id).await?;
	Ok(placement)
}
