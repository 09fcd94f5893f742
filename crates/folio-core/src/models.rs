//! Content records and write inputs.
//!
//! Records mirror table rows. Inputs are partial: a `None` field is left
//! untouched on update and falls back to the column default on insert.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A page. Owns an ordered list of blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
	/// Row id
	pub id: i64,
	/// Page title
	pub title: String,
	/// Free-form description
	pub description: Option<String>,
	/// Go-live date of the showcased project
	pub project_go_live: Option<NaiveDate>,
	/// Client name
	pub client: Option<String>,
	/// Publication flag
	pub published: bool,
	/// When the page was published
	pub published_on: Option<DateTime<Utc>>,
	/// Listing order among pages
	pub position: i64,
	/// File shown on listing views
	pub listing_image_id: Option<i64>,
	/// Creation timestamp
	pub created_at: DateTime<Utc>,
	/// Last update timestamp
	pub updated_at: DateTime<Utc>,
}

/// A content block, ordered within its page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
	/// Row id
	pub id: i64,
	/// Owning page
	pub page_id: i64,
	/// Block type tag chosen by the editor
	pub block_type: String,
	/// Sibling position within the page
	pub position: i64,
	/// Rich-text editor document
	pub editor: Option<serde_json::Value>,
	/// Display date
	pub date: Option<DateTime<Utc>>,
	/// Title
	pub title: Option<String>,
	/// Colour tag
	pub colour: Option<String>,
	/// Creation timestamp
	pub created_at: DateTime<Utc>,
	/// Last update timestamp
	pub updated_at: DateTime<Utc>,
}

/// A key/value style metadata entry, ordered within its block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
	/// Row id
	pub id: i64,
	/// Owning block
	pub block_id: i64,
	/// First value
	pub field1: Option<String>,
	/// Second value
	pub field2: Option<String>,
	/// Sibling position within the block
	pub position: i64,
	/// Creation timestamp
	pub created_at: DateTime<Utc>,
	/// Last update timestamp
	pub updated_at: DateTime<Utc>,
}

/// An uploaded file stored under the media root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct File {
	/// Row id
	pub id: i64,
	/// Path relative to the media root
	pub path: String,
	/// File name as uploaded
	pub original_name: String,
	/// MIME type as uploaded
	pub content_type: String,
	/// Size in bytes
	pub size: Option<i64>,
	/// Upload slot within a block, e.g. `"hero"`
	pub scope: Option<String>,
	/// Block the file is attached to
	pub block_id: Option<i64>,
	/// Creation timestamp
	pub created_at: DateTime<Utc>,
	/// Last update timestamp
	pub updated_at: DateTime<Utc>,
}

impl File {
	/// Public URL: `{host}{media_path}/{path}`
	///
	/// # Examples
	///
	/// ```
	/// # use folio_core::models::File;
	/// # use chrono::Utc;
	/// let file = File {
	/// 	id: 1,
	/// 	path: "ab12.png".into(),
	/// 	original_name: "logo.png".into(),
	/// 	content_type: "image/png".into(),
	/// 	size: Some(10),
	/// 	scope: None,
	/// 	block_id: None,
	/// 	created_at: Utc::now(),
	/// 	updated_at: Utc::now(),
	/// };
	/// assert_eq!(
	/// 	file.full_path("http://localhost:4000", "/media"),
	/// 	"http://localhost:4000/media/ab12.png"
	/// );
	/// ```
	pub fn full_path(&self, host: &str, media_path: &str) -> String {
		format!(
			"{}{}/{}",
			host.trim_end_matches('/'),
			media_path.trim_end_matches('/'),
			self.path
		)
	}

	/// Location on disk: `{media_root}/{path}`
	pub fn absolute_path(&self, media_root: &Path) -> PathBuf {
		media_root.join(&self.path)
	}
}

/// Fields for creating or updating a page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
	/// Title; required on create
	pub title: Option<String>,
	/// Description
	pub description: Option<String>,
	/// Project go-live date
	pub project_go_live: Option<NaiveDate>,
	/// Client name
	pub client: Option<String>,
	/// Publication flag
	pub published: Option<bool>,
	/// Publication timestamp
	pub published_on: Option<DateTime<Utc>>,
	/// Listing order
	pub position: Option<i64>,
	/// Listing image
	pub listing_image_id: Option<i64>,
}

/// Fields for creating or updating a block. Position is handled separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockInput {
	/// Block type; required on create
	pub block_type: Option<String>,
	/// Editor document
	pub editor: Option<serde_json::Value>,
	/// Display date; defaults to now on create
	pub date: Option<DateTime<Utc>>,
	/// Title
	pub title: Option<String>,
	/// Colour tag
	pub colour: Option<String>,
}

/// Fields for creating or updating a metadata entry. Position is handled separately.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaInput {
	/// First value
	pub field1: Option<String>,
	/// Second value
	pub field2: Option<String>,
}

/// Row data for a stored upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileInput {
	/// Path relative to the media root
	pub path: String,
	/// Name as uploaded
	pub original_name: String,
	/// MIME type as uploaded
	pub content_type: String,
	/// Size in bytes
	pub size: Option<i64>,
	/// Upload slot tag
	pub scope: Option<String>,
	/// Attached block
	pub block_id: Option<i64>,
}

/// An upload already written to a temporary location by the transport layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemporaryUpload {
	/// Where the transport spooled the upload
	pub temp_path: PathBuf,
	/// Name as sent by the client
	pub original_name: String,
	/// MIME type as sent by the client
	pub mime_type: String,
	/// Size in bytes
	pub size: u64,
}
