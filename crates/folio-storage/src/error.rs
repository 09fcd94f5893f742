//! Storage errors

use std::path::PathBuf;

use folio_core::error::CmsError;
use thiserror::Error;

/// Result alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Failures raised by a media store
#[derive(Debug, Error)]
pub enum StorageError {
	/// Filesystem operation failed
	#[error("I/O error on '{}': {source}", path.display())]
	Io {
		/// Path the operation touched
		path: PathBuf,
		/// Underlying error
		#[source]
		source: std::io::Error,
	},

	/// File does not exist
	#[error("File not found: {0}")]
	NotFound(String),

	/// Store is misconfigured
	#[error("Configuration error: {0}")]
	Config(String),

	/// Relative path escapes the media root
	#[error("Invalid media path: {0}")]
	InvalidPath(String),
}

impl StorageError {
	pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
		let path = path.into();
		if source.kind() == std::io::ErrorKind::NotFound {
			return Self::NotFound(path.display().to_string());
		}
		Self::Io { path, source }
	}
}

impl From<StorageError> for CmsError {
	fn from(err: StorageError) -> Self {
		CmsError::Storage(err.to_string())
	}
}
