//! Database error types

use folio_core::error::CmsError;
use folio_core::position::Position;
use thiserror::Error;

/// Result type for persistence operations
pub type DbResult<T> = Result<T, DbError>;

/// Persistence errors
#[derive(Debug, Error)]
pub enum DbError {
	/// Driver error
	#[error("SQL error: {0}")]
	Sqlx(#[from] sqlx::Error),

	/// A statement could not be built
	#[error("Query build error: {0}")]
	Query(String),

	/// A stored value could not be decoded
	#[error("Failed to decode column '{column}': {message}")]
	Decode {
		/// Column name
		column: &'static str,
		/// Decoder message
		message: String,
	},

	/// Failure injected by the in-memory backend
	#[error("Injected fault at {0}")]
	Fault(String),
}

impl DbError {
	/// Whether the driver reported a constraint violation
	pub fn is_constraint_violation(&self) -> bool {
		match self {
			DbError::Sqlx(sqlx::Error::Database(db)) => !matches!(db.kind(), sqlx::error::ErrorKind::Other),
			_ => false,
		}
	}
}

/// Decode a stored `position` column, rejecting negative values
pub(crate) fn stored_position(value: Option<i64>) -> DbResult<Position> {
	Position::from_stored(value).map_err(|err| DbError::Decode {
		column: "position",
		message: err.to_string(),
	})
}

impl From<DbError> for CmsError {
	fn from(err: DbError) -> Self {
		if err.is_constraint_violation() {
			return CmsError::Validation(err.to_string());
		}
		CmsError::Database(err.to_string())
	}
}
