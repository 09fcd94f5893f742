//! # Folio CMS
//!
//! The content service sitting between the API and persistence.
//!
//! [`ContentService`] takes opaque global ids as the API sends them, checks
//! that each names the expected [`NodeKind`](folio_core::ids::NodeKind), and
//! drives the repositories and the media store. Ordered writes go through the
//! reorder executor inside the repositories; the service only adds id
//! resolution and the cursor bookkeeping the API returns.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use folio_cms::ContentService;
//! use folio_conf::Settings;
//! use folio_db::{Database, Repositories};
//! use folio_storage::LocalMediaStorage;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let settings = Settings::load(None)?;
//! let db = Database::connect(&settings.database).await?;
//! let storage = LocalMediaStorage::from_settings(&settings.media)?;
//! let service = ContentService::new(Repositories::from_settings(&db, &settings), Arc::new(storage));
//! let pages = service.pages().await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod payload;
pub mod service;

pub use payload::{BlockMove, Edge, MetaUpdate, Node, Removed, SlotUpload};
pub use service::ContentService;
