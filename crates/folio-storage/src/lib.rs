//! # Folio Storage
//!
//! Where uploaded media lives. [`MediaStorage`] is the seam the content
//! service talks to; [`LocalMediaStorage`] writes into a directory on disk.
//!
//! Uploads arrive already spooled to a temporary file by the transport. Saving
//! copies that file into the media root under a generated name and removes the
//! temporary copy. Storage is not part of the database transaction: a row insert
//! that fails after the copy leaves an orphaned file behind.

#![warn(missing_docs)]

pub mod backend;
pub mod error;
pub mod local;

pub use backend::{MediaStorage, StoredFile};
pub use error::{StorageError, StorageResult};
pub use local::{LocalMediaStorage, stored_name};
