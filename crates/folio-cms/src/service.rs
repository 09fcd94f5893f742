//! Content service. Resolves global ids and runs every content mutation.

use std::sync::Arc;

use folio_core::connection::{cursor_for, offset_to_cursor};
use folio_core::error::{CmsError, CmsResult};
use folio_core::ids::{GlobalId, NodeKind};
use folio_core::models::{
	Block, BlockInput, File, Meta, MetaInput, Page, PageInput, TemporaryUpload,
};
use folio_core::position::PositionInput;
use folio_db::Repositories;
use folio_storage::MediaStorage;

use crate::payload::{BlockMove, Edge, MetaUpdate, Node, Removed, SlotUpload};

fn edge_of<T>(siblings: &[T], node: T, is_node: impl Fn(&T) -> bool) -> Edge<T> {
	let cursor = cursor_for(siblings, is_node).unwrap_or_else(|| offset_to_cursor(siblings.len()));
	Edge { cursor, node }
}

fn required_upload(upload: Option<&TemporaryUpload>) -> CmsResult<&TemporaryUpload> {
	upload.ok_or_else(|| CmsError::Validation("a file upload is required".to_string()))
}

/// Entry point for every read and write the API performs
#[derive(Debug, Clone)]
pub struct ContentService {
	repos: Repositories,
	storage: Arc<dyn MediaStorage>,
}

impl ContentService {
	/// Create a service over the repositories and a media store
	pub fn new(repos: Repositories, storage: Arc<dyn MediaStorage>) -> Self {
		Self { repos, storage }
	}

	/// Repositories backing the service
	pub fn repos(&self) -> &Repositories {
		&self.repos
	}

	/// Media store backing the service
	pub fn storage(&self) -> &dyn MediaStorage {
		self.storage.as_ref()
	}

	/// Public URL of a stored file
	pub fn file_url(&self, file: &File) -> String {
		self.storage.url(&file.path)
	}

	/// Look up any node. Unknown ids resolve to `None`; malformed ids are an error.
	pub async fn node(&self, global_id: &str) -> CmsResult<Option<Node>> {
		let GlobalId { kind, id } = GlobalId::decode(global_id)?;
		let node = match kind {
			NodeKind::Page => self.repos.pages.find(id).await?.map(Node::Page),
			NodeKind::Block => self.repos.blocks.find(id).await?.map(Node::Block),
			NodeKind::Meta => self.repos.metas.find(id).await?.map(Node::Meta),
			NodeKind::File => self.repos.files.find(id).await?.map(Node::File),
		};
		Ok(node)
	}

	/// Every page
	pub async fn pages(&self) -> CmsResult<Vec<Page>> {
		self.repos.pages.list().await
	}

	/// Create a page. A request upload becomes its listing image.
	pub async fn create_page(
		&self,
		mut input: PageInput,
		upload: Option<&TemporaryUpload>,
	) -> CmsResult<Page> {
		if let Some(upload) = upload {
			let file = self.store(upload, None, None).await?;
			input.listing_image_id = Some(file.id);
		}
		let page = self.repos.pages.create(input).await?;
		tracing::info!(page = page.id, "page created");
		Ok(page)
	}

	/// Update the supplied fields of a page
	pub async fn update_page(&self, page_id: &str, input: PageInput) -> CmsResult<Page> {
		let id = GlobalId::decode_as(page_id, NodeKind::Page)?;
		self.repos.pages.update(id, input).await
	}

	/// Append a block to a page
	pub async fn create_block(&self, page_id: &str, input: BlockInput) -> CmsResult<Edge<Block>> {
		let page_id = GlobalId::decode_as(page_id, NodeKind::Page)?;
		let block = self.repos.blocks.create(page_id, input).await?;
		let siblings = self.repos.blocks.list_for_page(page_id).await?;
		let id = block.id;
		Ok(edge_of(&siblings, block, |b| b.id == id))
	}

	/// Update block fields without moving it
	pub async fn update_block(&self, block_id: &str, input: BlockInput) -> CmsResult<Block> {
		let id = GlobalId::decode_as(block_id, NodeKind::Block)?;
		self.repos.blocks.update(id, input).await
	}

	/// Move a block within its page
	pub async fn update_block_position(
		&self,
		block_id: &str,
		position: &PositionInput,
	) -> CmsResult<BlockMove> {
		let id = GlobalId::decode_as(block_id, NodeKind::Block)?;
		let (block, moved) = self
			.repos
			.blocks
			.move_to(id, BlockInput::default(), position)
			.await?;
		let siblings = self.repos.blocks.list_for_page(block.page_id).await?;
		Ok(BlockMove {
			edge: edge_of(&siblings, block, |b| b.id == id),
			moved,
			siblings,
		})
	}

	/// Delete a block. Its siblings keep their positions.
	pub async fn remove_block(&self, block_id: &str) -> CmsResult<Removed<Block>> {
		let id = GlobalId::decode_as(block_id, NodeKind::Block)?;
		let item = self.repos.blocks.delete(id).await?;
		Ok(Removed {
			deleted_id: block_id.to_string(),
			item,
		})
	}

	/// Add a metadata entry to a block
	pub async fn create_meta(
		&self,
		block_id: &str,
		input: MetaInput,
		position: &PositionInput,
	) -> CmsResult<Edge<Meta>> {
		let block_id = GlobalId::decode_as(block_id, NodeKind::Block)?;
		let meta = self.repos.metas.create(block_id, input, position).await?;
		let siblings = self.repos.metas.list_for_block(block_id).await?;
		let id = meta.id;
		Ok(edge_of(&siblings, meta, |m| m.id == id))
	}

	/// Update a metadata entry, moving it when `position` is a number
	pub async fn update_meta(
		&self,
		meta_id: &str,
		input: MetaInput,
		position: &PositionInput,
	) -> CmsResult<MetaUpdate> {
		let id = GlobalId::decode_as(meta_id, NodeKind::Meta)?;
		let (meta, moved) = self.repos.metas.update(id, input, position).await?;
		let siblings = self.repos.metas.list_for_block(meta.block_id).await?;
		Ok(MetaUpdate {
			meta,
			moved,
			siblings,
		})
	}

	/// Delete a metadata entry
	pub async fn remove_meta(&self, meta_id: &str) -> CmsResult<Removed<Meta>> {
		let id = GlobalId::decode_as(meta_id, NodeKind::Meta)?;
		let item = self.repos.metas.delete(id).await?;
		Ok(Removed {
			deleted_id: meta_id.to_string(),
			item,
		})
	}

	/// Store the request upload as an unattached file
	pub async fn upload_file(&self, upload: Option<&TemporaryUpload>) -> CmsResult<Vec<File>> {
		let upload = required_upload(upload)?;
		Ok(vec![self.store(upload, None, None).await?])
	}

	/// Replace whatever occupies the `(block, scope)` slot with the request upload.
	///
	/// Replaced rows are deleted before the new file is stored. Their files are
	/// removed from disk after the rows; a failed unlink is logged and ignored.
	pub async fn upload_block_file(
		&self,
		block_id: &str,
		scope: Option<String>,
		upload: Option<&TemporaryUpload>,
	) -> CmsResult<SlotUpload> {
		let block_id = GlobalId::decode_as(block_id, NodeKind::Block)?;
		let upload = required_upload(upload)?;
		self.repos.blocks.get(block_id).await?;

		let previous = self
			.repos
			.files
			.list_in_slot(block_id, scope.as_deref())
			.await?;
		let mut deleted_ids = Vec::with_capacity(previous.len());
		for file in previous {
			self.repos.files.delete(file.id).await?;
			if let Err(err) = self.storage.delete(&file.path).await {
				tracing::warn!(file = file.id, path = %file.path, error = %err, "orphaned media file");
			}
			deleted_ids.push(GlobalId::new(NodeKind::File, file.id).encode());
		}

		let file = self.store(upload, Some(block_id), scope.clone()).await?;
		let slot = self
			.repos
			.files
			.list_in_slot(block_id, scope.as_deref())
			.await?;
		let id = file.id;
		tracing::info!(block = block_id, file = id, replaced = deleted_ids.len(), "block file uploaded");
		Ok(SlotUpload {
			edge: edge_of(&slot, file, |f| f.id == id),
			deleted_ids,
		})
	}

	async fn store(
		&self,
		upload: &TemporaryUpload,
		block_id: Option<i64>,
		scope: Option<String>,
	) -> CmsResult<File> {
		let stored = self.storage.save_upload(upload).await?;
		self.repos
			.files
			.create(stored.into_file_input(block_id, scope))
			.await
	}
}
