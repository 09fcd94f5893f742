//! # Folio Conf
//!
//! Settings for Folio processes.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio_conf::Settings;
//!
//! let settings = Settings::load(None)?;
//! println!("serving media from {}", settings.media.root.display());
//! # Ok::<(), folio_conf::SettingsError>(())
//! ```

#![warn(missing_docs)]

pub mod env;
pub mod settings;

pub use env::{Env, EnvError};
pub use settings::{
	DEFAULT_SETTINGS_FILE, DatabaseSettings, ENV_PREFIX, LoggingSettings, MediaSettings,
	OrderingSettings, Settings, SettingsError,
};
