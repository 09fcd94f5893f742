//! Transaction primitive used by the reorder executor.
//!
//! A [`TransactionBackend`] opens transactions; each [`PositionTransaction`]
//! is bound to one connection for its whole lifetime, so the position read,
//! the row update and the sibling shift all observe the same snapshot.
//!
//! Two backends ship with the crate:
//!
//! - [`SqliteBackend`](crate::sqlite::SqliteBackend) for production
//! - [`MemoryBackend`](crate::memory::MemoryBackend) with fault injection, for tests

use async_trait::async_trait;
use folio_core::policy::IsolationLevel;
use folio_core::position::{Position, PositionedFamily, ShiftSpan};

use crate::error::DbResult;
use crate::patch::FieldPatch;

/// Where an ordered item currently sits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
	/// Scope (parent) id
	pub scope_id: i64,
	/// Current position
	pub position: Position,
}

/// Opens transactions
#[async_trait]
pub trait TransactionBackend: Send + Sync {
	/// Begin a transaction at the given isolation level
	async fn begin(&self, isolation: IsolationLevel) -> DbResult<Box<dyn PositionTransaction>>;
}

/// Operations available inside an open transaction
#[async_trait]
pub trait PositionTransaction: Send {
	/// Whether the scope owner exists
	async fn parent_exists(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<bool>;

	/// Current placement of an item, `None` when the row does not exist
	async fn placement(&mut self, family: PositionedFamily, id: i64) -> DbResult<Option<Placement>>;

	/// Number of items in a scope
	async fn count_in_scope(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<u64>;

	/// Insert a row, returning its id
	async fn insert(&mut self, family: PositionedFamily, patch: &FieldPatch) -> DbResult<i64>;

	/// Update one row, returning the number of rows touched
	async fn update(&mut self, family: PositionedFamily, id: i64, patch: &FieldPatch) -> DbResult<u64>;

	/// Shift every sibling in `span`, except `exclude`, by the span's direction.
	/// Issued as a single bulk statement.
	async fn shift_siblings(
		&mut self,
		family: PositionedFamily,
		scope_id: i64,
		span: ShiftSpan,
		exclude: Option<i64>,
	) -> DbResult<u64>;

	/// Delete one row, returning the number of rows removed
	async fn delete(&mut self, family: PositionedFamily, id: i64) -> DbResult<u64>;

	/// Commit the transaction
	async fn commit(self: Box<Self>) -> DbResult<()>;

	/// Roll back the transaction
	async fn rollback(self: Box<Self>) -> DbResult<()>;
}
