//! Local file system media store

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use folio_conf::MediaSettings;
use folio_core::models::TemporaryUpload;
use sha2::{Digest, Sha256};
use tokio::fs;

use crate::{MediaStorage, StorageError, StorageResult, StoredFile};

/// Media store rooted at a local directory
#[derive(Debug, Clone)]
pub struct LocalMediaStorage {
	root: PathBuf,
	host: String,
	media_path: String,
}

impl LocalMediaStorage {
	/// Create a store over an existing directory.
	///
	/// # Errors
	///
	/// Returns `StorageError::Config` if `root` is missing or not a directory.
	pub fn new(
		root: impl Into<PathBuf>,
		host: impl Into<String>,
		media_path: impl Into<String>,
	) -> StorageResult<Self> {
		let root = root.into();
		if !root.exists() {
			return Err(StorageError::Config(format!(
				"Media root does not exist: {}",
				root.display()
			)));
		}
		if !root.is_dir() {
			return Err(StorageError::Config(format!(
				"Media root is not a directory: {}",
				root.display()
			)));
		}
		Ok(Self {
			root,
			host: host.into(),
			media_path: media_path.into(),
		})
	}

	/// Create a store from the media section of the settings
	pub fn from_settings(settings: &MediaSettings) -> StorageResult<Self> {
		Self::new(&settings.root, &settings.host, &settings.path)
	}

	/// Media root directory
	pub fn root(&self) -> &Path {
		&self.root
	}

	fn resolve(&self, path: &str) -> StorageResult<PathBuf> {
		let relative = Path::new(path);
		let plain = relative
			.components()
			.all(|c| matches!(c, Component::Normal(_)));
		if path.is_empty() || !plain {
			return Err(StorageError::InvalidPath(path.to_string()));
		}
		Ok(self.root.join(relative))
	}
}

/// Generated name for an upload: hex sha256 of `"{name}-{millis}"` plus the original extension
pub fn stored_name(original_name: &str, millis: i64) -> String {
	let digest = Sha256::digest(format!("{}-{}", original_name, millis).as_bytes());
	match Path::new(original_name).extension() {
		Some(ext) => format!("{:x}.{}", digest, ext.to_string_lossy()),
		None => format!("{:x}", digest),
	}
}

#[async_trait]
impl MediaStorage for LocalMediaStorage {
	async fn save_upload(&self, upload: &TemporaryUpload) -> StorageResult<StoredFile> {
		let mut millis = Utc::now().timestamp_millis();
		let mut name = stored_name(&upload.original_name, millis);
		// Same name uploaded twice in one millisecond
		while fs::try_exists(self.root.join(&name))
			.await
			.map_err(|e| StorageError::io(&self.root, e))?
		{
			millis += 1;
			name = stored_name(&upload.original_name, millis);
		}

		let dest = self.root.join(&name);
		fs::copy(&upload.temp_path, &dest)
			.await
			.map_err(|e| StorageError::io(&upload.temp_path, e))?;
		if let Err(err) = fs::remove_file(&upload.temp_path).await {
			tracing::warn!(
				temp = %upload.temp_path.display(),
				error = %err,
				"failed to remove temporary upload"
			);
		}
		tracing::info!(path = %name, size = upload.size, "upload stored");

		Ok(StoredFile {
			path: name,
			original_name: upload.original_name.clone(),
			content_type: upload.mime_type.clone(),
			size: upload.size,
		})
	}

	async fn delete(&self, path: &str) -> StorageResult<()> {
		let full = self.resolve(path)?;
		match fs::remove_file(&full).await {
			Ok(()) => Ok(()),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
				tracing::warn!(path, "stored file already missing");
				Ok(())
			}
			Err(err) => Err(StorageError::io(full, err)),
		}
	}

	async fn exists(&self, path: &str) -> StorageResult<bool> {
		let full = self.resolve(path)?;
		Ok(fs::metadata(&full)
			.await
			.map(|m| m.is_file())
			.unwrap_or(false))
	}

	fn url(&self, path: &str) -> String {
		format!(
			"{}{}/{}",
			self.host.trim_end_matches('/'),
			self.media_path.trim_end_matches('/'),
			path
		)
	}

	fn absolute_path(&self, path: &str) -> StorageResult<PathBuf> {
		self.resolve(path)
	}
}
