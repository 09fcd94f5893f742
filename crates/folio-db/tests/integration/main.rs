//! Integration tests for folio-db
//!
//! These tests run the repositories and the reorder executor against real
//! SQLite databases.

mod fixtures;

mod atomicity_test;
mod concurrency_test;
mod meta_ordering_test;
mod reorder_test;
mod repository_test;
