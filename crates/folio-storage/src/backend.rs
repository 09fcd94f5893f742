//! Media storage trait

use std::path::PathBuf;

use async_trait::async_trait;
use folio_core::models::{FileInput, TemporaryUpload};

use crate::StorageResult;

/// Metadata of an upload after it has been moved into the media root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
	/// Path relative to the media root
	pub path: String,
	/// Name as sent by the client
	pub original_name: String,
	/// MIME type as sent by the client
	pub content_type: String,
	/// Size in bytes
	pub size: u64,
}

impl StoredFile {
	/// Row data for this file, attached to a block slot when given.
	pub fn into_file_input(self, block_id: Option<i64>, scope: Option<String>) -> FileInput {
		FileInput {
			path: self.path,
			original_name: self.original_name,
			content_type: self.content_type,
			size: i64::try_from(self.size).ok(),
			scope,
			block_id,
		}
	}
}

/// Storage for uploaded media.
///
/// Paths handed to and returned from a store are relative to its root.
///
/// # Examples
///
/// ```rust,no_run
/// use folio_core::models::TemporaryUpload;
/// use folio_storage::{MediaStorage, StorageResult};
///
/// async fn keep(storage: &dyn MediaStorage, upload: &TemporaryUpload) -> StorageResult<String> {
///     let stored = storage.save_upload(upload).await?;
///     Ok(storage.url(&stored.path))
/// }
/// ```
#[async_trait]
pub trait MediaStorage: Send + Sync + std::fmt::Debug {
	/// Move a spooled upload into the store under a generated name.
	///
	/// The temporary file is removed once the copy succeeds.
	///
	/// # Errors
	///
	/// Returns `StorageError::NotFound` if the temporary file is gone.
	async fn save_upload(&self, upload: &TemporaryUpload) -> StorageResult<StoredFile>;

	/// Delete a stored file. Deleting a file that is already gone succeeds.
	async fn delete(&self, path: &str) -> StorageResult<()>;

	/// Check whether a stored file exists
	async fn exists(&self, path: &str) -> StorageResult<bool>;

	/// Public URL of a stored file
	fn url(&self, path: &str) -> String;

	/// Location of a stored file on disk
	fn absolute_path(&self, path: &str) -> StorageResult<PathBuf>;
}
