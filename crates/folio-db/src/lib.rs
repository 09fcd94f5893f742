//! # Folio DB
//!
//! Persistence for Folio: an SQLite pool, table definitions, entity
//! repositories and the transactional reorder executor.
//!
//! ## Architecture
//!
//! ```text
//! folio-db
//! ├── connection   - Database pool
//! ├── schema       - CREATE/DROP statements and `sync`
//! ├── transaction  - TransactionBackend / PositionTransaction traits
//! ├── sqlite       - SQLite backend (BEGIN IMMEDIATE for serializable)
//! ├── memory       - In-memory backend with fault injection
//! ├── reorder      - ReorderExecutor: read, update, shift, commit
//! ├── repository   - Page, Block, Meta and File repositories
//! ├── patch        - Column assignments
//! ├── query        - Statement builders
//! └── rows         - Row decoding
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
//! use folio_core::models::{BlockInput, PageInput};
//! use folio_core::position::PositionInput;
//! use folio_db::{Database, Repositories, schema};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect_url("sqlite://folio.db", 5).await?;
//! schema::sync(&db, false).await?;
//! let repos = Repositories::new(&db, IsolationLevel::Serializable, MetaInsertPolicy::Append);
//!
//! let page = repos.pages.create(PageInput { title: Some("Home".into()), ..Default::default() }).await?;
//! let block = repos.blocks.create(page.id, BlockInput { block_type: Some("text".into()), ..Default::default() }).await?;
//! repos.blocks.move_to(block.id, BlockInput::default(), &PositionInput::Number(1)).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod connection;
pub mod error;
pub mod memory;
pub mod patch;
pub mod query;
pub mod reorder;
pub mod repository;
pub mod rows;
pub mod schema;
pub mod sqlite;
pub mod transaction;

pub use connection::Database;
pub use error::{DbError, DbResult};
pub use reorder::{Created, Moved, ReorderExecutor};
pub use repository::{BlockRepository, FileRepository, MetaRepository, PageRepository, Repositories};
pub use transaction::{Placement, PositionTransaction, TransactionBackend};
