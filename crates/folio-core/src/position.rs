//! Sibling positioning rules.
//!
//! Pages own ordered blocks and blocks own ordered metadata entries. Every
//! member of such a scope carries an integer `position`. This module holds
//! the pure part of the reorder protocol:
//!
//! - [`append_position`] picks the slot for a newly created item
//! - [`compute_shift`] derives the compensating sibling shift for a move
//! - [`PositionInput`] / [`PositionChange`] separate caller input from a
//!   validated target position
//!
//! Reading the current count or position and issuing the bulk update is the
//! executor's job; it must do both inside one transaction.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CmsError, CmsResult};
use crate::ids::NodeKind;

/// A validated, non-negative sibling position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Position(i64);

impl Position {
	/// Position `0`, the column default
	pub const ZERO: Position = Position(0);

	/// Validate a raw integer
	pub fn new(value: i64) -> CmsResult<Self> {
		if value < 0 {
			return Err(CmsError::Validation(format!(
				"position must be non-negative, got {}",
				value
			)));
		}
		Ok(Self(value))
	}

	/// Interpret a stored column value. `NULL` reads as `0`; a negative value is an error.
	pub fn from_stored(value: Option<i64>) -> CmsResult<Self> {
		Self::new(value.unwrap_or(0))
	}

	/// Raw integer value
	pub fn get(self) -> i64 {
		self.0
	}
}

impl TryFrom<i64> for Position {
	type Error = CmsError;

	fn try_from(value: i64) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<Position> for i64 {
	fn from(position: Position) -> Self {
		position.0
	}
}

impl fmt::Display for Position {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Position of the next appended item in a scope that currently holds `count` items
pub fn append_position(count: u64) -> Position {
	Position(i64::try_from(count).unwrap_or(i64::MAX - 1) + 1)
}

/// Direction siblings move during a shift
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
	/// `position + 1`; the moved item travelled towards the head
	Up,
	/// `position - 1`; the moved item travelled towards the tail
	Down,
}

impl Direction {
	/// Signed step applied to each shifted sibling
	pub fn delta(self) -> i64 {
		match self {
			Direction::Up => 1,
			Direction::Down => -1,
		}
	}
}

/// Compensating sibling shift for a single move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shift {
	/// `sign(old - new)`
	pub direction: Direction,
	/// `min(old, new)`, inclusive
	pub min: Position,
	/// `max(old, new)`, inclusive
	pub max: Position,
}

impl Shift {
	/// Range issued as the bulk update
	pub fn span(&self) -> ShiftSpan {
		ShiftSpan {
			direction: self.direction,
			from: self.min.get(),
			to: Some(self.max.get()),
		}
	}
}

/// Compute the sibling shift for moving an item from `old` to `new`.
///
/// Returns `None` when the positions are equal: a no-op move issues no
/// sibling update at all.
///
/// # Examples
///
/// ```
/// use folio_core::position::{Direction, Position, compute_shift};
///
/// let p = |v| Position::new(v).unwrap();
/// let shift = compute_shift(p(1), p(3)).unwrap();
/// assert_eq!(shift.direction, Direction::Down);
/// assert!(compute_shift(p(2), p(2)).is_none());
/// ```
pub fn compute_shift(old: Position, new: Position) -> Option<Shift> {
	let direction = match old.cmp(&new) {
		std::cmp::Ordering::Equal => return None,
		std::cmp::Ordering::Greater => Direction::Up,
		std::cmp::Ordering::Less => Direction::Down,
	};
	Some(Shift {
		direction,
		min: old.min(new),
		max: old.max(new),
	})
}

/// Rows selected by a bulk sibling update: `from <= position` and, when
/// bounded, `position <= to`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftSpan {
	/// Step direction
	pub direction: Direction,
	/// Inclusive lower bound
	pub from: i64,
	/// Inclusive upper bound, `None` for an open-ended span
	pub to: Option<i64>,
}

impl ShiftSpan {
	/// Open-ended span shifting everything at or after `from` up by one
	pub fn open_up(from: i64) -> Self {
		Self {
			direction: Direction::Up,
			from,
			to: None,
		}
	}

	/// Whether a sibling at `position` is selected
	pub fn contains(&self, position: i64) -> bool {
		position >= self.from && self.to.is_none_or(|to| position <= to)
	}

	/// Position after the shift, for a sibling inside the span
	pub fn apply(&self, position: i64) -> i64 {
		position + self.direction.delta()
	}
}

/// A position as supplied by a caller, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PositionInput {
	/// An integer was supplied
	Number(i64),
	/// No position was supplied
	Missing,
	/// Something non-numeric was supplied
	Malformed(String),
}

impl PositionInput {
	/// Parse free-form input such as a form field
	pub fn parse(raw: &str) -> Self {
		let trimmed = raw.trim();
		if trimmed.is_empty() {
			return Self::Missing;
		}
		match trimmed.parse::<i64>() {
			Ok(value) => Self::Number(value),
			Err(_) => Self::Malformed(raw.to_string()),
		}
	}

	/// Validate into a [`PositionChange`].
	///
	/// Missing and malformed input take the skip path: the caller still saves
	/// the remaining fields, but neither the position nor any sibling is
	/// touched. A negative number is rejected outright.
	pub fn validate(&self) -> CmsResult<PositionChange> {
		match self {
			Self::Number(value) => Position::new(*value).map(PositionChange::To),
			Self::Missing => Ok(PositionChange::Keep),
			Self::Malformed(raw) => {
				tracing::debug!(input = %raw, "ignoring non-numeric position");
				Ok(PositionChange::Keep)
			}
		}
	}
}

impl From<Option<i64>> for PositionInput {
	fn from(value: Option<i64>) -> Self {
		match value {
			Some(v) => Self::Number(v),
			None => Self::Missing,
		}
	}
}

impl From<i64> for PositionInput {
	fn from(value: i64) -> Self {
		Self::Number(value)
	}
}

/// Validated outcome of a [`PositionInput`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionChange {
	/// Move the item to this position and shift siblings
	To(Position),
	/// Leave position and siblings untouched
	Keep,
}

impl PositionChange {
	/// Target position, if any
	pub fn target(&self) -> Option<Position> {
		match self {
			Self::To(p) => Some(*p),
			Self::Keep => None,
		}
	}
}

/// Entity families that participate in sibling ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PositionedFamily {
	/// Blocks ordered within a page
	Block,
	/// Metadata entries ordered within a block
	Meta,
}

impl PositionedFamily {
	/// Backing table
	pub fn table(&self) -> &'static str {
		match self {
			Self::Block => "blocks",
			Self::Meta => "meta",
		}
	}

	/// Column holding the scope (parent) id
	pub fn scope_column(&self) -> &'static str {
		match self {
			Self::Block => "page_id",
			Self::Meta => "block_id",
		}
	}

	/// Kind of the ordered items
	pub fn kind(&self) -> NodeKind {
		match self {
			Self::Block => NodeKind::Block,
			Self::Meta => NodeKind::Meta,
		}
	}

	/// Kind of the scope owner
	pub fn parent_kind(&self) -> NodeKind {
		match self {
			Self::Block => NodeKind::Page,
			Self::Meta => NodeKind::Block,
		}
	}

	/// Table of the scope owner
	pub fn parent_table(&self) -> &'static str {
		match self {
			Self::Block => "pages",
			Self::Meta => "blocks",
		}
	}
}
