//! Mutation root and payloads.
//!
//! Every mutation takes a single `input` argument carrying an optional
//! `clientMutationId`, which is echoed back on the payload.

use async_graphql::{Context, ID, Object, Result as GqlResult, SimpleObject};
use folio_core::connection::ConnectionArgs;
use folio_core::models::{BlockInput, Block, Meta, PageInput, TemporaryUpload};

use crate::connection::{Connection, Edge, args};
use crate::error::IntoGql;
use crate::inputs::{
	CreateBlockInput, CreateMetaInput, CreatePageInput, RemoveInput, UpdateBlockInput,
	UpdateBlockPositionInput, UpdateMetaInput, UpdatePageInput, UploadBlockFileInput,
	UploadFileInput,
};
use crate::types::{BlockNode, FileNode, MetaNode, PageNode, service};

fn upload<'a>(ctx: &Context<'a>) -> Option<&'a TemporaryUpload> {
	ctx.data_opt::<TemporaryUpload>()
}

#[derive(SimpleObject)]
pub struct CreatePagePayload {
	pub page: PageNode,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UpdatePagePayload {
	pub page: PageNode,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateBlockPayload {
	pub block_edge: Edge<BlockNode>,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UpdateBlockPayload {
	pub block: BlockNode,
	pub client_mutation_id: Option<String>,
}

pub struct UpdateBlockPositionPayload {
	block_edge: Edge<BlockNode>,
	siblings: Vec<Block>,
	client_mutation_id: Option<String>,
}

#[Object]
impl UpdateBlockPositionPayload {
	/// The moved block
	async fn block_edge(&self) -> &Edge<BlockNode> {
		&self.block_edge
	}

	/// Every block of the page after the move
	async fn block_connection(
		&self,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<BlockNode>> {
		connection_of(&self.siblings, args(first, after, last, before), BlockNode)
	}

	async fn client_mutation_id(&self) -> Option<&str> {
		self.client_mutation_id.as_deref()
	}
}

#[derive(SimpleObject)]
pub struct RemoveBlockPayload {
	pub deleted_id: ID,
	pub block: BlockNode,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct CreateMetaPayload {
	pub meta_edge: Edge<MetaNode>,
	pub client_mutation_id: Option<String>,
}

pub struct UpdateMetaPayload {
	meta: MetaNode,
	siblings: Vec<Meta>,
	client_mutation_id: Option<String>,
}

#[Object]
impl UpdateMetaPayload {
	/// The updated entry
	async fn update_meta(&self) -> &MetaNode {
		&self.meta
	}

	/// Every entry of the block after the update
	async fn meta_connection(
		&self,
		first: Option<i32>,
		after: Option<String>,
		last: Option<i32>,
		before: Option<String>,
	) -> GqlResult<Connection<MetaNode>> {
		connection_of(&self.siblings, args(first, after, last, before), MetaNode)
	}

	async fn client_mutation_id(&self) -> Option<&str> {
		self.client_mutation_id.as_deref()
	}
}

#[derive(SimpleObject)]
pub struct RemoveMetaPayload {
	pub deleted_id: ID,
	pub meta: MetaNode,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UploadFilePayload {
	pub file: Vec<FileNode>,
	pub client_mutation_id: Option<String>,
}

#[derive(SimpleObject)]
pub struct UploadBlockFilePayload {
	pub file: Edge<FileNode>,
	pub deleted_ids: Vec<ID>,
	pub client_mutation_id: Option<String>,
}

fn connection_of<S: Clone, T: async_graphql::OutputType>(
	items: &[S],
	args: ConnectionArgs,
	wrap: impl Fn(S) -> T,
) -> GqlResult<Connection<T>>
where
	Edge<T>: async_graphql::OutputType,
{
	Connection::slice(items.to_vec(), &args, wrap).into_gql()
}

/// GraphQL Mutation root
pub struct Mutation;

#[Object]
impl Mutation {
	/// Create a page; a request upload becomes its listing image
	async fn create_page(
		&self,
		ctx: &Context<'_>,
		input: CreatePageInput,
	) -> GqlResult<CreatePagePayload> {
		let fields = PageInput::try_from(input.page_input).into_gql()?;
		let page = service(ctx)?
			.create_page(fields, upload(ctx))
			.await
			.into_gql()?;
		Ok(CreatePagePayload {
			page: PageNode(page),
			client_mutation_id: input.client_mutation_id,
		})
	}

	async fn update_page(
		&self,
		ctx: &Context<'_>,
		input: UpdatePageInput,
	) -> GqlResult<UpdatePagePayload> {
		let fields = PageInput::try_from(input.page_input).into_gql()?;
		let page = service(ctx)?
			.update_page(&input.id, fields)
			.await
			.into_gql()?;
		Ok(UpdatePagePayload {
			page: PageNode(page),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Append a block to a page
	async fn create_block(
		&self,
		ctx: &Context<'_>,
		input: CreateBlockInput,
	) -> GqlResult<CreateBlockPayload> {
		let page_id = input.block_input.page_id.clone();
		let fields = BlockInput::try_from(input.block_input).into_gql()?;
		let edge = service(ctx)?
			.create_block(&page_id, fields)
			.await
			.into_gql()?;
		Ok(CreateBlockPayload {
			block_edge: Edge::wrap(edge, BlockNode),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Update block fields; the position is left alone
	async fn update_block(
		&self,
		ctx: &Context<'_>,
		input: UpdateBlockInput,
	) -> GqlResult<UpdateBlockPayload> {
		let id = input.block_input.id.clone();
		let fields = BlockInput::try_from(input.block_input).into_gql()?;
		let block = service(ctx)?.update_block(&id, fields).await.into_gql()?;
		Ok(UpdateBlockPayload {
			block: BlockNode(block),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Move a block within its page
	async fn update_block_position(
		&self,
		ctx: &Context<'_>,
		input: UpdateBlockPositionInput,
	) -> GqlResult<UpdateBlockPositionPayload> {
		let result = service(ctx)?
			.update_block_position(&input.id, &input.position())
			.await
			.into_gql()?;
		Ok(UpdateBlockPositionPayload {
			block_edge: Edge::wrap(result.edge, BlockNode),
			siblings: result.siblings,
			client_mutation_id: input.client_mutation_id,
		})
	}

	async fn remove_block(
		&self,
		ctx: &Context<'_>,
		input: RemoveInput,
	) -> GqlResult<RemoveBlockPayload> {
		let removed = service(ctx)?.remove_block(&input.id).await.into_gql()?;
		Ok(RemoveBlockPayload {
			deleted_id: ID(removed.deleted_id),
			block: BlockNode(removed.item),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Add a metadata entry to a block
	async fn create_meta(
		&self,
		ctx: &Context<'_>,
		input: CreateMetaInput,
	) -> GqlResult<CreateMetaPayload> {
		let (block_id, fields, position) = input.meta_input.split();
		let edge = service(ctx)?
			.create_meta(&block_id, fields, &position)
			.await
			.into_gql()?;
		Ok(CreateMetaPayload {
			meta_edge: Edge::wrap(edge, MetaNode),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Update a metadata entry, moving it when a position is given
	async fn update_meta(
		&self,
		ctx: &Context<'_>,
		input: UpdateMetaInput,
	) -> GqlResult<UpdateMetaPayload> {
		let (id, fields, position) = input.meta_input.split();
		let result = service(ctx)?
			.update_meta(&id, fields, &position)
			.await
			.into_gql()?;
		Ok(UpdateMetaPayload {
			meta: MetaNode(result.meta),
			siblings: result.siblings,
			client_mutation_id: input.client_mutation_id,
		})
	}

	async fn remove_meta(
		&self,
		ctx: &Context<'_>,
		input: RemoveInput,
	) -> GqlResult<RemoveMetaPayload> {
		let removed = service(ctx)?.remove_meta(&input.id).await.into_gql()?;
		Ok(RemoveMetaPayload {
			deleted_id: ID(removed.deleted_id),
			meta: MetaNode(removed.item),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Store the request upload
	async fn upload_file(
		&self,
		ctx: &Context<'_>,
		#[graphql(default)] input: UploadFileInput,
	) -> GqlResult<UploadFilePayload> {
		let files = service(ctx)?.upload_file(upload(ctx)).await.into_gql()?;
		Ok(UploadFilePayload {
			file: files.into_iter().map(FileNode).collect(),
			client_mutation_id: input.client_mutation_id,
		})
	}

	/// Replace the file in a block slot with the request upload
	async fn upload_block_file(
		&self,
		ctx: &Context<'_>,
		input: UploadBlockFileInput,
	) -> GqlResult<UploadBlockFilePayload> {
		let slot = input.block_file_input;
		let result = service(ctx)?
			.upload_block_file(&slot.block_id, slot.scope, upload(ctx))
			.await
			.into_gql()?;
		Ok(UploadBlockFilePayload {
			file: Edge::wrap(result.edge, FileNode),
			deleted_ids: result.deleted_ids.into_iter().map(ID).collect(),
			client_mutation_id: input.client_mutation_id,
		})
	}
}
