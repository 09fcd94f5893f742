//! In-process transaction backend.
//!
//! Each transaction works on a private copy of the tables and publishes it
//! on commit, so a rollback (explicit, or after an injected fault) leaves the
//! shared state exactly as it was. Serializable transactions additionally
//! hold a scope-wide lock from `begin` to commit or rollback.
//!
//! ```
//! use folio_core::position::PositionedFamily;
//! use folio_db::memory::MemoryBackend;
//!
//! let backend = MemoryBackend::new();
//! backend.seed_parent(PositionedFamily::Block, 1);
//! let a = backend.seed_item(PositionedFamily::Block, 1, 1);
//! assert_eq!(backend.positions(PositionedFamily::Block, 1), vec![(a, 1)]);
//! ```

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::policy::IsolationLevel;
use folio_core::position::{PositionedFamily, ShiftSpan};
use parking_lot::Mutex;
use tokio::sync::OwnedMutexGuard;

use crate::error::{DbError, DbResult, stored_position};
use crate::patch::{FieldPatch, FieldValue};
use crate::transaction::{Placement, PositionTransaction, TransactionBackend};

/// A stored row: column name to value
pub type MemoryRow = BTreeMap<String, FieldValue>;

type Tables = HashMap<&'static str, BTreeMap<i64, MemoryRow>>;

/// Transaction step at which a fault can be injected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultPoint {
	/// Reading the current placement
	Placement,
	/// Counting a scope
	Count,
	/// Inserting a row
	Insert,
	/// Updating the target row
	Update,
	/// Shifting siblings
	Shift,
	/// Deleting a row
	Delete,
	/// Committing
	Commit,
}

impl fmt::Display for FaultPoint {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", self)
	}
}

#[derive(Default)]
struct State {
	tables: Tables,
	next_id: i64,
	fault: Option<FaultPoint>,
}

/// In-memory backend with fault injection
#[derive(Clone, Default)]
pub struct MemoryBackend {
	state: Arc<Mutex<State>>,
	write_lock: Arc<tokio::sync::Mutex<()>>,
}

impl MemoryBackend {
	/// Empty backend
	pub fn new() -> Self {
		Self::default()
	}

	/// Make the next transaction step of this kind fail. The fault fires once.
	pub fn fail_on(&self, point: FaultPoint) {
		self.state.lock().fault = Some(point);
	}

	/// Register a scope owner
	pub fn seed_parent(&self, family: PositionedFamily, scope_id: i64) {
		let mut state = self.state.lock();
		let mut row = MemoryRow::new();
		row.insert("id".to_string(), FieldValue::Int(scope_id));
		state
			.tables
			.entry(family.parent_table())
			.or_default()
			.insert(scope_id, row);
		state.next_id = state.next_id.max(scope_id);
	}

	/// Insert an item directly, bypassing any transaction. Returns its id.
	pub fn seed_item(&self, family: PositionedFamily, scope_id: i64, position: i64) -> i64 {
		let mut state = self.state.lock();
		state.next_id += 1;
		let id = state.next_id;
		let mut row = MemoryRow::new();
		row.insert("id".to_string(), FieldValue::Int(id));
		row.insert(family.scope_column().to_string(), FieldValue::Int(scope_id));
		row.insert("position".to_string(), FieldValue::Int(position));
		state.tables.entry(family.table()).or_default().insert(id, row);
		id
	}

	/// `(id, position)` pairs of a scope, ordered by position then id
	pub fn positions(&self, family: PositionedFamily, scope_id: i64) -> Vec<(i64, i64)> {
		let state = self.state.lock();
		let mut pairs: Vec<(i64, i64)> = state
			.tables
			.get(family.table())
			.map(|rows| {
				rows.values()
					.filter(|row| scope_of(row, family) == Some(scope_id))
					.map(|row| (int_col(row, "id").unwrap_or_default(), int_col(row, "position").unwrap_or_default()))
					.collect()
			})
			.unwrap_or_default();
		pairs.sort_by_key(|(id, position)| (*position, *id));
		pairs
	}

	/// A committed row
	pub fn row(&self, family: PositionedFamily, id: i64) -> Option<MemoryRow> {
		self.state
			.lock()
			.tables
			.get(family.table())
			.and_then(|rows| rows.get(&id))
			.cloned()
	}
}

#[async_trait]
impl TransactionBackend for MemoryBackend {
	async fn begin(&self, isolation: IsolationLevel) -> DbResult<Box<dyn PositionTransaction>> {
		let guard = match isolation {
			IsolationLevel::Serializable => Some(self.write_lock.clone().lock_owned().await),
			IsolationLevel::ReadCommitted => None,
		};
		let (tables, next_id) = {
			let state = self.state.lock();
			(state.tables.clone(), state.next_id)
		};
		Ok(Box::new(MemoryTransaction {
			state: Arc::clone(&self.state),
			tables,
			next_id,
			_guard: guard,
		}))
	}
}

struct MemoryTransaction {
	state: Arc<Mutex<State>>,
	tables: Tables,
	next_id: i64,
	_guard: Option<OwnedMutexGuard<()>>,
}

impl MemoryTransaction {
	fn check_fault(&self, point: FaultPoint) -> DbResult<()> {
		let mut state = self.state.lock();
		if state.fault == Some(point) {
			state.fault = None;
			return Err(DbError::Fault(point.to_string()));
		}
		Ok(())
	}

	fn rows(&mut self, family: PositionedFamily) -> &mut BTreeMap<i64, MemoryRow> {
		self.tables.entry(family.table()).or_default()
	}
}

fn int_col(row: &MemoryRow, column: &str) -> Option<i64> {
	row.get(column).and_then(FieldValue::as_int)
}

fn scope_of(row: &MemoryRow, family: PositionedFamily) -> Option<i64> {
	int_col(row, family.scope_column())
}

#[async_trait]
impl PositionTransaction for MemoryTransaction {
	async fn parent_exists(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<bool> {
		Ok(self
			.tables
			.get(family.parent_table())
			.is_some_and(|rows| rows.contains_key(&scope_id)))
	}

	async fn placement(&mut self, family: PositionedFamily, id: i64) -> DbResult<Option<Placement>> {
		self.check_fault(FaultPoint::Placement)?;
		let Some(row) = self.rows(family).get(&id) else {
			return Ok(None);
		};
		let Some(scope_id) = scope_of(row, family) else {
			return Ok(None);
		};
		Ok(Some(Placement {
			scope_id,
			position: stored_position(int_col(row, "position"))?,
		}))
	}

	async fn count_in_scope(&mut self, family: PositionedFamily, scope_id: i64) -> DbResult<u64> {
		self.check_fault(FaultPoint::Count)?;
		Ok(self
			.rows(family)
			.values()
			.filter(|row| scope_of(row, family) == Some(scope_id))
			.count() as u64)
	}

	async fn insert(&mut self, family: PositionedFamily, patch: &FieldPatch) -> DbResult<i64> {
		self.check_fault(FaultPoint::Insert)?;
		self.next_id += 1;
		let id = self.next_id;
		let mut row: MemoryRow = patch
			.iter()
			.map(|(column, value)| (column.to_string(), value.clone()))
			.collect();
		row.insert("id".to_string(), FieldValue::Int(id));
		row.entry("position".to_string()).or_insert(FieldValue::Int(0));
		self.rows(family).insert(id, row);
		Ok(id)
	}

	async fn update(&mut self, family: PositionedFamily, id: i64, patch: &FieldPatch) -> DbResult<u64> {
		self.check_fault(FaultPoint::Update)?;
		match self.rows(family).get_mut(&id) {
			Some(row) => {
				for (column, value) in patch.iter() {
					row.insert(column.to_string(), value.clone());
				}
				Ok(1)
			}
			None => Ok(0),
		}
	}

	async fn shift_siblings(
		&mut self,
		family: PositionedFamily,
		scope_id: i64,
		span: ShiftSpan,
		exclude: Option<i64>,
	) -> DbResult<u64> {
		self.check_fault(FaultPoint::Shift)?;
		let mut shifted = 0;
		for (id, row) in self.rows(family).iter_mut() {
			if Some(*id) == exclude || scope_of(row, family) != Some(scope_id) {
				continue;
			}
			let position = int_col(row, "position").unwrap_or_default();
			if span.contains(position) {
				row.insert("position".to_string(), FieldValue::Int(span.apply(position)));
				shifted += 1;
			}
		}
		Ok(shifted)
	}

	async fn delete(&mut self, family: PositionedFamily, id: i64) -> DbResult<u64> {
		self.check_fault(FaultPoint::Delete)?;
		Ok(u64::from(self.rows(family).remove(&id).is_some()))
	}

	async fn commit(self: Box<Self>) -> DbResult<()> {
		self.check_fault(FaultPoint::Commit)?;
		let mut state = self.state.lock();
		state.tables = self.tables.clone();
		state.next_id = state.next_id.max(self.next_id);
		Ok(())
	}

	async fn rollback(self: Box<Self>) -> DbResult<()> {
		Ok(())
	}
}
