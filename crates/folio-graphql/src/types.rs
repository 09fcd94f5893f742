//! Object types for pages, blocks, metadata and files

use async_graphql::{Context, ID, Interface, Json, Object, Result as GqlResult};
use chrono::{DateTime, Utc};
use folio_cms::{ContentService, Node};
use folio_core::ids::{GlobalId, NodeKind};
use folio_core::models::{Block, File, Meta, Page};

use crate::connection::{Connection, args};
use crate::error::IntoGql;

pub(crate) fn service<'a>(ctx: &Context<'a>) -> GqlResult<&'a ContentService> {
	ctx.data::<ContentService>()
}

fn global_id(kind: NodeKind, id: i64) -> ID {
	ID(GlobalId::new(kind, id).encode())
}

/// Anything addressable by a global id
#[derive(Interface)]
#[graphql(name = "Node", field(name = "id", ty = "ID"))]
pub enum NodeInterface {
	/// A page
	Page(PageNode),
	/// A block
	Block(BlockNode),
	/// A metadata entry
	Meta(MetaNode),
	/// A file
	File(FileNode),
}

impl From<Node> for NodeInterface {
	fn from(node: Node) -> Self {
		match node {
			Node::Page(page) => Self::Page(PageNode(page)),
			Node::Block(block) => Self::Block(BlockNode(block)),
			Node::Meta(meta) => Self::Meta(MetaNode(meta)),
			Node::File(file) => Self::File(FileNode(file)),
		}
	}
}

/// Project page
#[derive(Debug, Clone)]
pub struct PageNode(pub Page);

#[Object(name = "Page")]
impl PageNode {
	async fn id(&self) -> ID {
		global_id(NodeKind::Page, self.0.id)
	}

	/// Title of the project
	async fn title(&self) -> &str {
		&self.0.title
	}

	async fn description(&self) -> Option<&str> {
		self.0.description.as_deref()
	}

	/// Go-live date of the project, `YYYY-MM-DD`
	async fn project_go_live(&self) -> Option<String> {
		self.0
			.project_go_live
			.map(|d| d.format("%Y-%m-%d").to_string())
	}

	/// Client the project was for
	async fn client(&self) -> Option<&str> {
		self.0.client.as_deref()
	}

	/// Whether the page is public
	async fn published(&self) -> bool {
		self.0.published
	}

	async fn published_on(&self) -> Option<DateTime<Utc>> {
		self.0.published_on
	}

	async fn position(&self) -> i64 {
		self.0.position
	}

	/// Listing image
	async fn listing_image(&self, ctx: &Context<'_>) -> GqlResult<Option<FileNode>> {
		let Some(id) = self.0.listing_image_id else {
			return Ok(None);
		};
		let file = service(ctx)?.repos().files.find(id).await.into_gql()?;
		Ok(file.map(FileNode))
	}

	/// Blocks of the page in position order
	async fn block_connection(
		&self,
		ctx: &Context<'_>,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<BlockNode>> {
		let blocks = service(ctx)?
			.repos()
			.blocks
			.list_for_page(self.0.id)
			.await
			.into_gql()?;
		Connection::slice(blocks, &args(first, after, last, before), BlockNode).into_gql()
	}

	async fn created_at(&self) -> DateTime<Utc> {
		self.0.created_at
	}

	async fn updated_at(&self) -> DateTime<Utc> {
		self.0.updated_at
	}
}

/// Page block
#[derive(Debug, Clone)]
pub struct BlockNode(pub Block);

#[Object(name = "Block")]
impl BlockNode {
	async fn id(&self) -> ID {
		global_id(NodeKind::Block, self.0.id)
	}

	/// Owning page
	async fn page(&self, ctx: &Context<'_>) -> GqlResult<Option<PageNode>> {
		let page = service(ctx)?
			.repos()
			.pages
			.find(self.0.page_id)
			.await
			.into_gql()?;
		Ok(page.map(PageNode))
	}

	async fn block_type(&self) -> &str {
		&self.0.block_type
	}

	/// Editor document
	async fn editor(&self) -> Option<Json<serde_json::Value>> {
		self.0.editor.clone().map(Json)
	}

	/// Display date, RFC 3339
	async fn date(&self) -> Option<String> {
		self.0.date.map(|d| d.to_rfc3339())
	}

	async fn title(&self) -> Option<&str> {
		self.0.title.as_deref()
	}

	async fn colour(&self) -> Option<&str> {
		self.0.colour.as_deref()
	}

	async fn position(&self) -> i64 {
		self.0.position
	}

	/// Metadata in position order
	async fn meta_connection(
		&self,
		ctx: &Context<'_>,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<MetaNode>> {
		let metas = service(ctx)?
			.repos()
			.metas
			.list_for_block(self.0.id)
			.await
			.into_gql()?;
		Connection::slice(metas, &args(first, after, last, before), MetaNode).into_gql()
	}

	/// Attached files
	async fn file_connection(
		&self,
		ctx: &Context<'_>,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<FileNode>> {
		let files = service(ctx)?
			.repos()
			.files
			.list_for_block(self.0.id)
			.await
			.into_gql()?;
		Connection::slice(files, &args(first, after, last, before), FileNode).into_gql()
	}
}

/// Metadata entry
#[derive(Debug, Clone)]
pub struct MetaNode(pub Meta);

#[Object(name = "Meta")]
impl MetaNode {
	async fn id(&self) -> ID {
		global_id(NodeKind::Meta, self.0.id)
	}

	/// Key
	async fn field1(&self) -> Option<&str> {
		self.0.field1.as_deref()
	}

	/// Value
	async fn field2(&self) -> Option<&str> {
		self.0.field2.as_deref()
	}

	async fn position(&self) -> i64 {
		self.0.position
	}
}

/// Stored upload
#[derive(Debug, Clone)]
pub struct FileNode(pub File);

#[Object(name = "File")]
impl FileNode {
	async fn id(&self) -> ID {
		global_id(NodeKind::File, self.0.id)
	}

	/// Path relative to the media root
	async fn path(&self) -> &str {
		&self.0.path
	}

	/// Public URL
	async fn full_path(&self, ctx: &Context<'_>) -> GqlResult<String> {
		Ok(service(ctx)?.file_url(&self.0))
	}

	async fn content_type(&self) -> &str {
		&self.0.content_type
	}

	/// Upload slot
	async fn scope(&self) -> Option<&str> {
		self.0.scope.as_deref()
	}

	async fn size(&self) -> Option<i64> {
		self.0.size
	}

	async fn original_name(&self) -> &str {
		&self.0.original_name
	}
}
