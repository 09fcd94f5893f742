//! Error types for content operations

use thiserror::Error;

use crate::ids::NodeKind;

/// Result type for content operations
pub type CmsResult<T> = Result<T, CmsError>;

/// Errors surfaced by content operations
#[derive(Debug, Error)]
pub enum CmsError {
	/// The referenced row does not exist. Raised before any write is issued.
	#[error("{kind} not found: {id}")]
	NotFound {
		/// Kind of the missing entity
		kind: NodeKind,
		/// Internal id that was looked up
		id: i64,
	},

	/// A global id decoded to a different entity kind than the operation expects
	#[error("ID must belong to {expected} type, got {found}")]
	TypeMismatch {
		/// Kind the operation accepts
		expected: NodeKind,
		/// Kind encoded in the supplied id
		found: String,
	},

	/// A global id could not be decoded at all
	#[error("Invalid global id: {0}")]
	InvalidId(String),

	/// Input rejected before or during persistence
	#[error("Validation error: {0}")]
	Validation(String),

	/// A step inside an atomic sequence failed; the whole sequence was rolled back
	#[error("Transaction failed: {0}")]
	Transaction(String),

	/// Media store failure
	#[error("Storage error: {0}")]
	Storage(String),

	/// Persistence failure outside a transaction
	#[error("Database error: {0}")]
	Database(String),
}

impl CmsError {
	/// Short machine-readable code, used as the `code` extension on API errors
	pub fn code(&self) -> &'static str {
		match self {
			Self::NotFound { .. } => "NOT_FOUND",
			Self::TypeMismatch { .. } => "TYPE_MISMATCH",
			Self::InvalidId(_) => "INVALID_ID",
			Self::Validation(_) => "VALIDATION",
			Self::Transaction(_) => "TRANSACTION",
			Self::Storage(_) => "STORAGE",
			Self::Database(_) => "DATABASE",
		}
	}

	/// Shorthand for [`CmsError::NotFound`]
	pub fn not_found(kind: NodeKind, id: i64) -> Self {
		Self::NotFound { kind, id }
	}

	/// Wrap any error raised inside an atomic sequence.
	///
	/// `NotFound` and `Validation` keep their variant so callers can still
	/// distinguish "nothing happened" from "something was rolled back".
	pub fn into_transaction(self) -> Self {
		match self {
			Self::NotFound { .. } | Self::Validation(_) | Self::Transaction(_) => self,
			other => Self::Transaction(other.to_string()),
		}
	}
}
