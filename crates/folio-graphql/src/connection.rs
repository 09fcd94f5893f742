//! Relay connection types

use async_graphql::{OutputType, SimpleObject};
use folio_core::connection::{ConnectionArgs, ConnectionSlice, connection_from_vec};
use folio_core::error::CmsResult;

use crate::types::{BlockNode, FileNode, MetaNode, PageNode};

/// Relay page info
#[derive(Debug, Clone, SimpleObject)]
pub struct PageInfo {
	/// More edges follow the window
	pub has_next_page: bool,
	/// More edges precede the window
	pub has_previous_page: bool,
	/// Cursor of the first edge
	pub start_cursor: Option<String>,
	/// Cursor of the last edge
	pub end_cursor: Option<String>,
}

/// An edge in a connection
#[derive(Debug, Clone, SimpleObject)]
#[graphql(concrete(name = "PageEdge", params(PageNode)))]
#[graphql(concrete(name = "BlocksEdge", params(BlockNode)))]
#[graphql(concrete(name = "MetaEdge", params(MetaNode)))]
#[graphql(concrete(name = "FileEdge", params(FileNode)))]
pub struct Edge<T: OutputType> {
	/// Cursor of this edge
	pub cursor: String,
	/// The node
	pub node: T,
}

impl<T: OutputType> Edge<T> {
	/// Edge from a service edge, wrapping its node
	pub fn wrap<S>(edge: folio_cms::Edge<S>, wrap: impl FnOnce(S) -> T) -> Self {
		Self {
			cursor: edge.cursor,
			node: wrap(edge.node),
		}
	}
}

/// A window over an ordered list
#[derive(Debug, Clone, SimpleObject)]
#[graphql(concrete(name = "PageConnection", params(PageNode)))]
#[graphql(concrete(name = "BlocksConnection", params(BlockNode)))]
#[graphql(concrete(name = "MetaConnection", params(MetaNode)))]
#[graphql(concrete(name = "FileConnection", params(FileNode)))]
pub struct Connection<T: OutputType>
where
	Edge<T>: OutputType,
{
	/// Edges inside the window
	pub edges: Vec<Edge<T>>,
	/// Window position
	pub page_info: PageInfo,
}

impl<T: OutputType> Connection<T>
where
	Edge<T>: OutputType,
{
	/// Slice `items` by `args` and wrap each node
	pub fn slice<S>(items: Vec<S>, args: &ConnectionArgs, wrap: impl Fn(S) -> T) -> CmsResult<Self> {
		Ok(Self::from_slice(connection_from_vec(items, args)?, wrap))
	}

	fn from_slice<S>(slice: ConnectionSlice<S>, wrap: impl Fn(S) -> T) -> Self {
		let page_info = PageInfo {
			has_next_page: slice.has_next_page,
			has_previous_page: slice.has_previous_page,
			start_cursor: slice.start_cursor().map(str::to_string),
			end_cursor: slice.end_cursor().map(str::to_string),
		};
		let edges = slice
			.edges
			.into_iter()
			.map(|e| Edge {
				cursor: e.cursor,
				node: wrap(e.node),
			})
			.collect();
		Self { edges, page_info }
	}
}

/// Collect the four Relay arguments
pub fn args(
	first: Option<i32>,
	after: Option<String>,
	last: Option<i32>,
	before: Option<String>,
) -> ConnectionArgs {
	ConnectionArgs {
		first,
		after,
		last,
		before,
	}
}
