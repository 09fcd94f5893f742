//! Settings structure and layered loading.
//!
//! Sources are applied in order, later ones winning:
//!
//! 1. built-in defaults
//! 2. a TOML file (explicit path, or `folio.toml` in the working directory when present)
//! 3. `FOLIO_*` environment variables
//!
//! ```toml
//! [media]
//! host = "https://cms.example.com"
//! path = "/media"
//! root = "/var/lib/folio/media"
//!
//! [database]
//! url = "sqlite:///var/lib/folio/folio.db"
//! isolation = "serializable"
//!
//! [ordering]
//! meta_insert = "append"
//! ```

use std::path::{Path, PathBuf};

use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::env::{Env, EnvError};

/// File looked up in the working directory when no explicit path is given
pub const DEFAULT_SETTINGS_FILE: &str = "folio.toml";

/// Prefix of every environment override
pub const ENV_PREFIX: &str = "FOLIO_";

/// Settings errors
#[derive(Debug, Error)]
pub enum SettingsError {
	/// The settings file could not be read
	#[error("Failed to read settings file {path}: {source}")]
	Io {
		/// File that was read
		path: PathBuf,
		/// Underlying error
		#[source]
		source: std::io::Error,
	},

	/// The settings file is not valid TOML for this structure
	#[error("Failed to parse settings: {0}")]
	Parse(#[from] toml::de::Error),

	/// An environment override is malformed
	#[error(transparent)]
	Env(#[from] EnvError),

	/// A value is out of range
	#[error("Invalid setting '{key}': {reason}")]
	Invalid {
		/// Dotted key
		key: &'static str,
		/// What is wrong with it
		reason: String,
	},
}

/// Where uploads live and how they are addressed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaSettings {
	/// Public origin prefixed to file URLs
	pub host: String,
	/// URL path media is served under, with a leading `/`
	pub path: String,
	/// Directory uploads are written to
	pub root: PathBuf,
}

impl Default for MediaSettings {
	fn default() -> Self {
		Self {
			host: "http://localhost:4000".to_string(),
			path: "/media".to_string(),
			root: PathBuf::from("media"),
		}
	}
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
	/// Connection URL, e.g. `sqlite://folio.db`
	pub url: String,
	/// Pool size
	pub max_connections: u32,
	/// Isolation used for ordered writes
	pub isolation: IsolationLevel,
}

impl Default for DatabaseSettings {
	fn default() -> Self {
		Self {
			url: "sqlite://folio.db".to_string(),
			max_connections: 5,
			isolation: IsolationLevel::default(),
		}
	}
}

/// Ordering behaviour
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderingSettings {
	/// Placement of newly created metadata entries
	pub meta_insert: MetaInsertPolicy,
}

/// Log output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
	/// `EnvFilter` directive; `RUST_LOG` takes precedence
	pub filter: String,
	/// Emit JSON lines instead of human-readable output
	pub json: bool,
}

impl Default for LoggingSettings {
	fn default() -> Self {
		Self {
			filter: "info".to_string(),
			json: false,
		}
	}
}

/// Complete application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
	/// Media storage and URLs
	pub media: MediaSettings,
	/// Database
	pub database: DatabaseSettings,
	/// Ordering
	pub ordering: OrderingSettings,
	/// Logging
	pub logging: LoggingSettings,
}

impl Settings {
	/// Load defaults, then the settings file, then environment overrides, then validate.
	pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
		let mut settings = match path {
			Some(path) => Self::from_file(path)?,
			None => {
				let fallback = Path::new(DEFAULT_SETTINGS_FILE);
				if fallback.is_file() {
					Self::from_file(fallback)?
				} else {
					Self::default()
				}
			}
		};
		settings.apply_env(&Env::new().with_prefix(ENV_PREFIX))?;
		settings.validate()?;
		tracing::debug!(
			database = %settings.database.url,
			media_root = %settings.media.root.display(),
			"settings loaded"
		);
		Ok(settings)
	}

	/// Parse a TOML file. Missing keys take their defaults.
	pub fn from_file(path: &Path) -> Result<Self, SettingsError> {
		let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		Self::from_toml_str(&content)
	}

	/// Parse TOML text
	pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
		Ok(toml::from_str(content)?)
	}

	/// Apply environment overrides
	pub fn apply_env(&mut self, env: &Env) -> Result<(), SettingsError> {
		if let Some(host) = env.opt_str("HOST")? {
			self.media.host = host;
		}
		if let Some(path) = env.opt_str("MEDIA_PATH")? {
			self.media.path = path;
		}
		if let Some(root) = env.opt_str("MEDIA_ROOT")? {
			self.media.root = PathBuf::from(root);
		}
		if let Some(url) = env.opt_str("DATABASE_URL")? {
			self.database.url = url;
		}
		if let Some(max) = env.opt_parse::<u32>("DATABASE_MAX_CONNECTIONS")? {
			self.database.max_connections = max;
		}
		if let Some(isolation) = env.opt_parse::<IsolationLevel>("DATABASE_ISOLATION")? {
			self.database.isolation = isolation;
		}
		if let Some(policy) = env.opt_parse::<MetaInsertPolicy>("META_INSERT")? {
			self.ordering.meta_insert = policy;
		}
		if let Some(filter) = env.opt_str("LOG")? {
			self.logging.filter = filter;
		}
		if let Some(json) = env.opt_bool("LOG_JSON")? {
			self.logging.json = json;
		}
		Ok(())
	}

	/// Reject values that would only fail later
	pub fn validate(&self) -> Result<(), SettingsError> {
		if self.media.host.trim().is_empty() {
			return Err(SettingsError::Invalid {
				key: "media.host",
				reason: "must not be empty".to_string(),
			});
		}
		if !self.media.path.starts_with('/') {
			return Err(SettingsError::Invalid {
				key: "media.path",
				reason: format!("must start with '/', got '{}'", self.media.path),
			});
		}
		if self.database.url.trim().is_empty() {
			return Err(SettingsError::Invalid {
				key: "database.url",
				reason: "must not be empty".to_string(),
			});
		}
		if self.database.max_connections == 0 {
			return Err(SettingsError::Invalid {
				key: "database.max_connections",
				reason: "must be at least 1".to_string(),
			});
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	fn test_partial_toml_keeps_defaults() {
		// Arrange
		let content = r#"
			[media]
			root = "/srv/media"

			[ordering]
			meta_insert = "shift_all"
		"#;

		// Act
		let settings = Settings::from_toml_str(content).unwrap();

		// Assert
		assert_eq!(settings.media.root, PathBuf::from("/srv/media"));
		assert_eq!(settings.media.path, "/media");
		assert_eq!(settings.ordering.meta_insert, MetaInsertPolicy::ShiftAll);
		assert_eq!(settings.database.isolation, IsolationLevel::Serializable);
	}

	#[rstest]
	#[case("media")]
	#[case("")]
	fn test_media_path_requires_leading_slash(#[case] path: &str) {
		let mut settings = Settings::default();
		settings.media.path = path.to_string();
		assert!(matches!(
			settings.validate(),
			Err(SettingsError::Invalid { key: "media.path", .. })
		));
	}

	#[rstest]
	fn test_zero_connections_rejected() {
		let mut settings = Settings::default();
		settings.database.max_connections = 0;
		assert!(settings.validate().is_err());
	}
}
