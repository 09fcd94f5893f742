//! Relay-style global identifiers.
//!
//! Every node exposed through the API is addressed by an opaque id of the
//! form `base64("{Type}:{id}")`. Handlers resolve the id once, at the API
//! boundary, into a [`NodeKind`] and an internal row id.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::{CmsError, CmsResult};

/// Entity kinds addressable by a global id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
	/// A page
	Page,
	/// A block owned by a page
	Block,
	/// A metadata entry owned by a block
	Meta,
	/// An uploaded file
	File,
}

impl NodeKind {
	/// Type name embedded in global ids
	pub fn as_str(&self) -> &'static str {
		match self {
			NodeKind::Page => "Page",
			NodeKind::Block => "Block",
			NodeKind::Meta => "Meta",
			NodeKind::File => "File",
		}
	}
}

impl fmt::Display for NodeKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for NodeKind {
	type Err = CmsError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Page" => Ok(NodeKind::Page),
			"Block" => Ok(NodeKind::Block),
			"Meta" => Ok(NodeKind::Meta),
			"File" => Ok(NodeKind::File),
			other => Err(CmsError::InvalidId(format!("unknown node type '{}'", other))),
		}
	}
}

/// A decoded global id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId {
	/// Entity kind
	pub kind: NodeKind,
	/// Internal row id
	pub id: i64,
}

impl GlobalId {
	/// Create a global id for a row
	pub fn new(kind: NodeKind, id: i64) -> Self {
		Self { kind, id }
	}

	/// Encode as the opaque API string
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::ids::{GlobalId, NodeKind};
	///
	/// assert_eq!(GlobalId::new(NodeKind::Block, 1).encode(), "QmxvY2s6MQ==");
	/// ```
	pub fn encode(&self) -> String {
		STANDARD.encode(format!("{}:{}", self.kind, self.id))
	}

	/// Decode an opaque API string
	pub fn decode(raw: &str) -> CmsResult<Self> {
		let bytes = STANDARD
			.decode(raw.trim())
			.map_err(|_| CmsError::InvalidId(raw.to_string()))?;
		let text = String::from_utf8(bytes).map_err(|_| CmsError::InvalidId(raw.to_string()))?;
		let (kind, id) = text
			.split_once(':')
			.ok_or_else(|| CmsError::InvalidId(raw.to_string()))?;
		let kind = kind.parse::<NodeKind>()?;
		let id = id
			.parse::<i64>()
			.map_err(|_| CmsError::InvalidId(raw.to_string()))?;
		Ok(Self { kind, id })
	}

	/// Decode and require a specific kind, returning the internal id.
	///
	/// An id that decodes cleanly but names another kind yields
	/// [`CmsError::TypeMismatch`].
	pub fn decode_as(raw: &str, expected: NodeKind) -> CmsResult<i64> {
		let global = Self::decode(raw)?;
		if global.kind != expected {
			return Err(CmsError::TypeMismatch {
				expected,
				found: global.kind.to_string(),
			});
		}
		Ok(global.id)
	}
}

impl fmt::Display for GlobalId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.encode())
	}
}
