//! # Folio GraphQL
//!
//! The Relay-style GraphQL API over [`ContentService`](folio_cms::ContentService).
//!
//! ## Architecture
//!
//! ```text
//! folio-graphql
//! ├── schema      - Query root, schema construction, SDL export
//! ├── mutation    - Mutation root and payloads
//! ├── types       - Page, Block, Meta and File objects plus the Node interface
//! ├── inputs      - Input objects and date parsing
//! ├── connection  - Connection, Edge and PageInfo
//! └── error       - CmsError to GraphQL error with `extensions.code`
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn run(service: folio_cms::ContentService) {
//! let schema = folio_graphql::create_schema(service);
//! let response = schema.execute("{ pages(first: 10) { edges { node { title } } } }").await;
//! # }
//! ```

pub mod connection;
pub mod error;
pub mod inputs;
pub mod mutation;
pub mod schema;
pub mod types;

pub use schema::{AppSchema, QueryLimits, create_schema, create_schema_with_limits, sdl};
