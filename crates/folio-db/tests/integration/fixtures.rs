//! Database fixtures for folio-db integration tests
//!
//! Every fixture gets its own SQLite file inside a temporary directory, so
//! tests can run in parallel and open several connections to one database.

use folio_core::models::{Block, BlockInput, Page, PageInput};
use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use folio_db::{Database, Repositories, schema};
use rstest::fixture;
use tempfile::TempDir;

/// A synced database plus its repositories
pub struct TestDb {
	_dir: TempDir,
	pub db: Database,
	pub repos: Repositories,
}

/// Fresh database with default ordering behaviour
///
/// # Examples
///
/// ```rust,ignore
/// #[rstest]
/// #[tokio::test]
/// async fn test_something(#[future] test_db: TestDb) {
///     let test_db = test_db.await;
/// }
/// ```
#[fixture]
pub async fn test_db() -> TestDb {
	test_db_with(IsolationLevel::Serializable, MetaInsertPolicy::Append).await
}

/// Fresh database with explicit isolation and meta policy
pub async fn test_db_with(isolation: IsolationLevel, policy: MetaInsertPolicy) -> TestDb {
	let dir = tempfile::tempdir().expect("Failed to create temp dir");
	let url = format!("sqlite://{}", dir.path().join("folio.db").display());
	let db = Database::connect_url(&url, 5)
		.await
		.expect("Failed to connect");
	schema::sync(&db, false).await.expect("Failed to sync schema");
	let repos = Repositories::new(&db, isolation, policy);
	TestDb {
		_dir: dir,
		db,
		repos,
	}
}

/// A page titled `title`
pub async fn create_page(repos: &Repositories, title: &str) -> Page {
	repos
		.pages
		.create(PageInput {
			title: Some(title.to_string()),
			..PageInput::default()
		})
		.await
		.expect("Failed to create page")
}

fn block_input(title: &str) -> BlockInput {
	BlockInput {
		block_type: Some("text".to_string()),
		title: Some(title.to_string()),
		..BlockInput::default()
	}
}

/// A page holding one block per title, appended in order (positions 1..=n)
pub async fn page_with_blocks(repos: &Repositories, titles: &[&str]) -> (Page, Vec<Block>) {
	let page = create_page(repos, "Home").await;
	let mut blocks = Vec::with_capacity(titles.len());
	for title in titles {
		let block = repos
			.blocks
			.create(page.id, block_input(title))
			.await
			.expect("Failed to create block");
		blocks.push(block);
	}
	(page, blocks)
}

/// Block titles of a page in sibling order, with their positions
pub async fn block_order(repos: &Repositories, page_id: i64) -> Vec<(String, i64)> {
	repos
		.blocks
		.list_for_page(page_id)
		.await
		.expect("Failed to list blocks")
		.into_iter()
		.map(|b| (b.title.unwrap_or_default(), b.position))
		.collect()
}

/// Expected `(title, position)` pairs
pub fn expected(pairs: &[(&str, i64)]) -> Vec<(String, i64)> {
	pairs.iter().map(|(t, p)| (t.to_string(), *p)).collect()
}
