use async_graphql::extensions::Analyzer;
use async_graphql::{Context, EmptySubscription, ID, Object, Result as GqlResult, Schema};
use folio_cms::ContentService;

use crate::connection::{Connection, args};
use crate::error::IntoGql;
use crate::mutation::Mutation;
use crate::types::{NodeInterface, PageNode, service};

/// Default maximum query depth.
///
/// Relay documents nest deeply (payload, connection, edges, node, child
/// connection) so this sits above the usual limit of ten.
pub const DEFAULT_MAX_QUERY_DEPTH: usize = 16;

/// Default maximum query complexity
pub const DEFAULT_MAX_QUERY_COMPLEXITY: usize = 500;

/// Query protection limits
#[derive(Debug, Clone, Copy)]
pub struct QueryLimits {
	/// Maximum allowed query depth
	pub max_depth: usize,
	/// Maximum allowed query complexity
	pub max_complexity: usize,
}

impl Default for QueryLimits {
	fn default() -> Self {
		Self {
			max_depth: DEFAULT_MAX_QUERY_DEPTH,
			max_complexity: DEFAULT_MAX_QUERY_COMPLEXITY,
		}
	}
}

/// GraphQL Query root
pub struct Query;

#[Object]
impl Query {
	/// Fetch any node by global id
	async fn node(&self, ctx: &Context<'_>, id: ID) -> GqlResult<Option<NodeInterface>> {
		let node = service(ctx)?.node(&id).await.into_gql()?;
		Ok(node.map(NodeInterface::from))
	}

	/// Every page
	async fn pages(
		&self,
		ctx: &Context<'_>,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<PageNode>> {
		let pages = service(ctx)?.pages().await.into_gql()?;
		Connection::slice(pages, &args(first, after, last, before), PageNode).into_gql()
	}
}

/// The Folio schema
pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Create the schema with default query limits
pub fn create_schema(service: ContentService) -> AppSchema {
	create_schema_with_limits(service, QueryLimits::default())
}

/// Create the schema with custom query limits.
///
/// The transport attaches a decoded upload to a request with
/// `Request::data(TemporaryUpload { .. })`; upload mutations read it from there.
pub fn create_schema_with_limits(service: ContentService, limits: QueryLimits) -> AppSchema {
	Schema::build(Query, Mutation, EmptySubscription)
		.data(service)
		.limit_depth(limits.max_depth)
		.limit_complexity(limits.max_complexity)
		.extension(Analyzer)
		.finish()
}

/// Schema definition language of the API
pub fn sdl() -> String {
	Schema::build(Query, Mutation, EmptySubscription)
		.finish()
		.sdl()
}
