//! Mutation results

use folio_core::models::{Block, File, Meta, Page};
use folio_db::Moved;

/// Any record addressable by a global id
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
	/// A page
	Page(Page),
	/// A block
	Block(Block),
	/// A metadata entry
	Meta(Meta),
	/// A stored file
	File(File),
}

/// A record together with its cursor in the sibling list
#[derive(Debug, Clone, PartialEq)]
pub struct Edge<T> {
	/// Array-connection cursor of `node`
	pub cursor: String,
	/// The record
	pub node: T,
}

/// Outcome of moving a block
#[derive(Debug, Clone, PartialEq)]
pub struct BlockMove {
	/// The moved block and its cursor after the move
	pub edge: Edge<Block>,
	/// What the executor changed
	pub moved: Moved,
	/// Every block of the page in sibling order
	pub siblings: Vec<Block>,
}

/// Outcome of updating a metadata entry
#[derive(Debug, Clone, PartialEq)]
pub struct MetaUpdate {
	/// The entry after the update
	pub meta: Meta,
	/// What the executor changed
	pub moved: Moved,
	/// Every entry of the block in sibling order
	pub siblings: Vec<Meta>,
}

/// A deleted record and the global id it had
#[derive(Debug, Clone, PartialEq)]
pub struct Removed<T> {
	/// Global id of the deleted record
	pub deleted_id: String,
	/// The record as it was before deletion
	pub item: T,
}

/// Outcome of replacing the file in a block slot
#[derive(Debug, Clone, PartialEq)]
pub struct SlotUpload {
	/// The new file and its cursor within the slot
	pub edge: Edge<File>,
	/// Global ids of the files the upload replaced
	pub deleted_ids: Vec<String>,
}
