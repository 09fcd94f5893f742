//! Array-connection slicing.
//!
//! Lists are exposed as Relay connections over a fully materialised,
//! already-ordered vector. Cursors are `base64("arrayconnection:{offset}")`,
//! the format graphql-relay clients expect.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{CmsError, CmsResult};

const CURSOR_PREFIX: &str = "arrayconnection:";

/// Encode an array offset as a cursor
pub fn offset_to_cursor(offset: usize) -> String {
	STANDARD.encode(format!("{}{}", CURSOR_PREFIX, offset))
}

/// Decode a cursor produced by [`offset_to_cursor`]
pub fn cursor_to_offset(cursor: &str) -> Option<usize> {
	let bytes = STANDARD.decode(cursor).ok()?;
	let text = String::from_utf8(bytes).ok()?;
	text.strip_prefix(CURSOR_PREFIX)?.parse().ok()
}

/// Pagination arguments
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectionArgs {
	/// Take at most this many edges from the front of the window
	pub first: Option<i32>,
	/// Start after this cursor
	pub after: Option<String>,
	/// Take at most this many edges from the back of the window
	pub last: Option<i32>,
	/// End before this cursor
	pub before: Option<String>,
}

impl ConnectionArgs {
	/// Arguments selecting the first `n` edges
	pub fn first(n: i32) -> Self {
		Self {
			first: Some(n),
			..Self::default()
		}
	}
}

/// One edge of a sliced connection
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSlice<T> {
	/// Cursor of this edge
	pub cursor: String,
	/// The node
	pub node: T,
}

/// A window over an ordered list
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSlice<T> {
	/// Edges inside the window
	pub edges: Vec<EdgeSlice<T>>,
	/// Whether `last` cut edges off the front
	pub has_previous_page: bool,
	/// Whether `first` cut edges off the back
	pub has_next_page: bool,
}

impl<T> ConnectionSlice<T> {
	/// Cursor of the first edge
	pub fn start_cursor(&self) -> Option<&str> {
		self.edges.first().map(|e| e.cursor.as_str())
	}

	/// Cursor of the last edge
	pub fn end_cursor(&self) -> Option<&str> {
		self.edges.last().map(|e| e.cursor.as_str())
	}
}

/// Slice `items` according to `args`.
///
/// # Examples
///
/// ```
/// use folio_core::connection::{ConnectionArgs, connection_from_vec};
///
/// let slice = connection_from_vec(vec!["a", "b", "c"], &ConnectionArgs::first(2)).unwrap();
/// assert_eq!(slice.edges.len(), 2);
/// assert!(slice.has_next_page);
/// ```
pub fn connection_from_vec<T>(items: Vec<T>, args: &ConnectionArgs) -> CmsResult<ConnectionSlice<T>> {
	let len = items.len();
	let after = args.after.as_deref().and_then(cursor_to_offset);
	let before = args.before.as_deref().and_then(cursor_to_offset);

	let mut start = after.map_or(0, |a| a.saturating_add(1).min(len));
	let mut end = before.map_or(len, |b| b.min(len)).max(start);

	if let Some(first) = args.first {
		let first = non_negative("first", first)?;
		end = end.min(start + first);
	}
	if let Some(last) = args.last {
		let last = non_negative("last", last)?;
		start = start.max(end.saturating_sub(last));
	}

	let lower = after.map_or(0, |a| a.saturating_add(1));
	let upper = before.unwrap_or(len);
	let has_previous_page = args.last.is_some() && start > lower;
	let has_next_page = args.first.is_some() && end < upper;

	let edges = items
		.into_iter()
		.enumerate()
		.skip(start)
		.take(end - start)
		.map(|(offset, node)| EdgeSlice {
			cursor: offset_to_cursor(offset),
			node,
		})
		.collect();

	Ok(ConnectionSlice {
		edges,
		has_previous_page,
		has_next_page,
	})
}

/// Cursor of the first item matching `predicate`, as it would appear in an
/// unsliced connection over `items`
pub fn cursor_for<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> Option<String> {
	items.iter().position(predicate).map(offset_to_cursor)
}

fn non_negative(name: &str, value: i32) -> CmsResult<usize> {
	usize::try_from(value).map_err(|_| {
		CmsError::Validation(format!("argument '{}' must be non-negative", name))
	})
}
