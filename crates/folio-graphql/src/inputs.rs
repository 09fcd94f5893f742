//! Mutation input objects and their conversion into content inputs

use async_graphql::{ID, InputObject, Json};
use chrono::{DateTime, NaiveDate, Utc};
use folio_core::error::{CmsError, CmsResult};
use folio_core::models::{BlockInput, MetaInput, PageInput};
use folio_core::position::PositionInput;

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date (midnight UTC)
pub fn parse_datetime(raw: &str) -> CmsResult<DateTime<Utc>> {
	if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
		return Ok(ts.with_timezone(&Utc));
	}
	parse_date(raw).map(|d| d.and_time(chrono::NaiveTime::default()).and_utc())
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(raw: &str) -> CmsResult<NaiveDate> {
	NaiveDate::parse_from_str(raw, "%Y-%m-%d")
		.map_err(|_| CmsError::Validation(format!("malformed date '{}'", raw)))
}

fn opt<T>(raw: Option<String>, parse: impl Fn(&str) -> CmsResult<T>) -> CmsResult<Option<T>> {
	raw.as_deref().map(parse).transpose()
}

fn position(raw: Option<i32>) -> PositionInput {
	PositionInput::from(raw.map(i64::from))
}

/// Page fields
#[derive(Debug, Clone, Default, InputObject)]
#[graphql(name = "PageInput")]
pub struct PageFields {
	/// Title of the project
	pub title: Option<String>,
	/// Description of the project
	pub description: Option<String>,
	/// Go-live date, `YYYY-MM-DD`
	pub project_go_live: Option<String>,
	/// Client the project was for
	pub client: Option<String>,
	/// Whether the page is public
	pub published: Option<bool>,
	/// Publication timestamp
	pub published_on: Option<DateTime<Utc>>,
	/// Listing order
	pub position: Option<i32>,
}

impl TryFrom<PageFields> for PageInput {
	type Error = CmsError;

	fn try_from(fields: PageFields) -> CmsResult<Self> {
		Ok(PageInput {
			title: fields.title,
			description: fields.description,
			project_go_live: opt(fields.project_go_live, parse_date)?,
			client: fields.client,
			published: fields.published,
			published_on: fields.published_on,
			position: fields.position.map(i64::from),
			listing_image_id: None,
		})
	}
}

#[derive(InputObject)]
pub struct CreatePageInput {
	pub page_input: PageFields,
	pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdatePageInput {
	pub id: ID,
	pub page_input: PageFields,
	pub client_mutation_id: Option<String>,
}

/// Block fields on create
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "BlockInput")]
pub struct BlockFields {
	/// Owning page
	pub page_id: ID,
	pub block_type: Option<String>,
	pub editor: Option<Json<serde_json::Value>>,
	/// Display date
	pub date: Option<String>,
	pub title: Option<String>,
	pub colour: Option<String>,
}

impl TryFrom<BlockFields> for BlockInput {
	type Error = CmsError;

	fn try_from(fields: BlockFields) -> CmsResult<Self> {
		Ok(BlockInput {
			block_type: fields.block_type,
			editor: fields.editor.map(|j| j.0),
			date: opt(fields.date, parse_datetime)?,
			title: fields.title,
			colour: fields.colour,
		})
	}
}

/// Block fields on update
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "BlockUpdateInput")]
pub struct BlockUpdateFields {
	/// Block to update
	#[graphql(name = "ID")]
	pub id: ID,
	pub editor: Option<Json<serde_json::Value>>,
	pub date: Option<String>,
	pub block_type: Option<String>,
	pub title: Option<String>,
	pub colour: Option<String>,
}

impl TryFrom<BlockUpdateFields> for BlockInput {
	type Error = CmsError;

	fn try_from(fields: BlockUpdateFields) -> CmsResult<Self> {
		Ok(BlockInput {
			block_type: fields.block_type,
			editor: fields.editor.map(|j| j.0),
			date: opt(fields.date, parse_datetime)?,
			title: fields.title,
			colour: fields.colour,
		})
	}
}

#[derive(InputObject)]
pub struct CreateBlockInput {
	pub block_input: BlockFields,
	pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateBlockInput {
	pub block_input: BlockUpdateFields,
	pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateBlockPositionInput {
	pub id: ID,
	/// Target position; omitted leaves the block where it is
	pub position: Option<i32>,
	pub client_mutation_id: Option<String>,
}

impl UpdateBlockPositionInput {
	pub(crate) fn position(&self) -> PositionInput {
		position(self.position)
	}
}

#[derive(InputObject)]
pub struct RemoveInput {
	pub id: ID,
	pub client_mutation_id: Option<String>,
}

/// Metadata fields on create
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "MetaTypeCreateInput")]
pub struct MetaCreateFields {
	/// Owning block
	pub block_id: ID,
	pub field1: Option<String>,
	pub field2: Option<String>,
	/// Only used when entries are inserted at the head
	pub position: Option<i32>,
}

impl MetaCreateFields {
	pub(crate) fn split(self) -> (ID, MetaInput, PositionInput) {
		let input = MetaInput {
			field1: self.field1,
			field2: self.field2,
		};
		(self.block_id, input, position(self.position))
	}
}

/// Metadata fields on update
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "MetaTypeUpdateInput")]
pub struct MetaUpdateFields {
	/// Entry to update
	pub id: ID,
	pub field1: Option<String>,
	pub field2: Option<String>,
	/// Target position; omitted keeps the entry in place
	pub position: Option<i32>,
}

impl MetaUpdateFields {
	pub(crate) fn split(self) -> (ID, MetaInput, PositionInput) {
		let input = MetaInput {
			field1: self.field1,
			field2: self.field2,
		};
		(self.id, input, position(self.position))
	}
}

#[derive(InputObject)]
pub struct CreateMetaInput {
	pub meta_input: MetaCreateFields,
	pub client_mutation_id: Option<String>,
}

#[derive(InputObject)]
pub struct UpdateMetaInput {
	pub meta_input: MetaUpdateFields,
	pub client_mutation_id: Option<String>,
}

#[derive(Default, InputObject)]
pub struct UploadFileInput {
	pub client_mutation_id: Option<String>,
}

/// Target slot of a block upload
#[derive(Debug, Clone, InputObject)]
#[graphql(name = "BlockFileTypeInput")]
pub struct BlockFileFields {
	pub block_id: ID,
	/// Slot within the block
	pub scope: Option<String>,
}

#[derive(InputObject)]
pub struct UploadBlockFileInput {
	pub block_file_input: BlockFileFields,
	pub client_mutation_id: Option<String>,
}
