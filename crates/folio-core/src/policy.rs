//! Runtime policies that change how ordered writes behave

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CmsError;

/// Transaction isolation used by the reorder executor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IsolationLevel {
	/// Deferred transaction. Two concurrent moves in one scope may
	/// interleave between the position read and the sibling shift.
	ReadCommitted,
	/// Write lock taken before the position read
	#[default]
	Serializable,
}

impl IsolationLevel {
	/// Statement that opens a transaction at this level on SQLite
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::policy::IsolationLevel;
	///
	/// assert_eq!(IsolationLevel::Serializable.sqlite_begin_sql(), "BEGIN IMMEDIATE");
	/// ```
	pub fn sqlite_begin_sql(&self) -> &'static str {
		match self {
			IsolationLevel::ReadCommitted => "BEGIN",
			IsolationLevel::Serializable => "BEGIN IMMEDIATE",
		}
	}
}

impl fmt::Display for IsolationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			IsolationLevel::ReadCommitted => f.write_str("read_committed"),
			IsolationLevel::Serializable => f.write_str("serializable"),
		}
	}
}

impl FromStr for IsolationLevel {
	type Err = CmsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('-', "_").as_str() {
			"read_committed" => Ok(IsolationLevel::ReadCommitted),
			"serializable" => Ok(IsolationLevel::Serializable),
			other => Err(CmsError::Validation(format!(
				"unknown isolation level '{}'",
				other
			))),
		}
	}
}

/// How a new metadata entry is placed within its block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaInsertPolicy {
	/// `position = count + 1`, like blocks
	#[default]
	Append,
	/// Insert at the requested position (default `0`), then shift every
	/// sibling with `position >= 0`, the new row included, up by one.
	/// Matches data written by earlier deployments.
	ShiftAll,
}

impl FromStr for MetaInsertPolicy {
	type Err = CmsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().replace('-', "_").as_str() {
			"append" => Ok(MetaInsertPolicy::Append),
			"shift_all" => Ok(MetaInsertPolicy::ShiftAll),
			other => Err(CmsError::Validation(format!(
				"unknown meta insert policy '{}'",
				other
			))),
		}
	}
}
