//! # Folio Core
//!
//! Domain types shared by every Folio crate.
//!
//! ## Architecture
//!
//! ```text
//! folio-core
//! ├── error       - CmsError taxonomy shared across crate seams
//! ├── ids         - Relay-style global ids and the closed NodeKind enum
//! ├── position    - Sibling positioning rules (append, shift, validation)
//! ├── policy      - Isolation level and meta insertion policy
//! ├── models      - Page, Block, Meta and File records plus their inputs
//! └── connection  - Array-connection slicing and cursors
//! ```
//!
//! Everything in this crate is pure: no I/O, no database handles. The
//! reorder executor in `folio-db` feeds these rules with values it read
//! inside a transaction.
//!
//! ## Quick Start
//!
//! ```rust
//! use folio_core::position::{Direction, Position, compute_shift};
//!
//! let shift = compute_shift(Position::new(4).unwrap(), Position::new(2).unwrap()).unwrap();
//! assert_eq!(shift.direction, Direction::Up);
//! assert_eq!((shift.min.get(), shift.max.get()), (2, 4));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod connection;
pub mod error;
pub mod ids;
pub mod models;
pub mod policy;
pub mod position;

pub use error::{CmsError, CmsResult};

/// Convenient re-exports of commonly used items
pub mod prelude {
	pub use crate::connection::{ConnectionArgs, ConnectionSlice, EdgeSlice};
	pub use crate::error::{CmsError, CmsResult};
	pub use crate::ids::{GlobalId, NodeKind};
	pub use crate::models::{
		Block, BlockInput, File, FileInput, Meta, MetaInput, Page, PageInput, TemporaryUpload,
	};
	pub use crate::policy::{IsolationLevel, MetaInsertPolicy};
	pub use crate::position::{
		Direction, Position, PositionChange, PositionInput, PositionedFamily, Shift, ShiftSpan,
		append_position, compute_shift,
	};
}
