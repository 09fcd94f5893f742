//! # Folio
//!
//! Content backend for pages made of ordered blocks, each holding ordered
//! metadata entries and attached media, served through a Relay-style GraphQL API.
//!
//! ## Crates
//!
//! ```text
//! folio
//! ├── folio-core     - Domain types, global ids, positioning rules
//! ├── folio-conf     - Settings: defaults, folio.toml, FOLIO_* environment
//! ├── folio-db       - SQLite persistence and the transactional reorder executor
//! ├── folio-storage  - Media storage for uploads
//! ├── folio-cms      - Content service: id resolution and mutations
//! └── folio-graphql  - GraphQL schema
//! ```
//!
//! This crate wires them together for the `folio` binary.

pub mod cli;
pub mod logging;

use std::sync::Arc;

use anyhow::Context as _;

pub use folio_cms::ContentService;
pub use folio_conf::Settings;
pub use folio_graphql::{AppSchema, create_schema};

/// Connect to the database and media root described by `settings`
pub async fn build_service(settings: &Settings) -> anyhow::Result<ContentService> {
	let db = folio_db::Database::connect(&settings.database)
		.await
		.with_context(|| format!("connecting to {}", settings.database.url))?;
	let storage = folio_storage::LocalMediaStorage::from_settings(&settings.media)
		.context("opening media root")?;
	let repos = folio_db::Repositories::from_settings(&db, settings);
	Ok(ContentService::new(repos, Arc::new(storage)))
}

/// Build the GraphQL schema for `settings`
pub async fn build_schema(settings: &Settings) -> anyhow::Result<AppSchema> {
	Ok(create_schema(build_service(settings).await?))
}
