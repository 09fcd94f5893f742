//! Page and file repositories, schema sync

use chrono::NaiveDate;
use folio_core::error::CmsError;
use folio_core::models::{BlockInput, FileInput, PageInput};
use folio_db::schema;
use rstest::rstest;

use crate::fixtures::{TestDb, create_page, page_with_blocks, test_db};

fn file_input(path: &str, block_id: Option<i64>, scope: Option<&str>) -> FileInput {
	FileInput {
		path: path.to_string(),
		original_name: format!("original-{}", path),
		content_type: "image/png".to_string(),
		size: Some(128),
		scope: scope.map(str::to_string),
		block_id,
	}
}

#[rstest]
#[tokio::test]
async fn test_page_create_and_update(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let page = test_db
		.repos
		.pages
		.create(PageInput {
			title: Some("Case study".into()),
			project_go_live: NaiveDate::from_ymd_opt(2024, 5, 1),
			client: Some("ACME".into()),
			..PageInput::default()
		})
		.await
		.unwrap();

	// Act
	let updated = test_db
		.repos
		.pages
		.update(
			page.id,
			PageInput {
				published: Some(true),
				..PageInput::default()
			},
		)
		.await
		.unwrap();

	// Assert
	assert!(!page.published);
	assert!(updated.published);
	assert_eq!(updated.client.as_deref(), Some("ACME"));
	assert_eq!(updated.project_go_live, NaiveDate::from_ymd_opt(2024, 5, 1));
	assert!(updated.updated_at >= page.updated_at);
}

#[rstest]
#[case(None)]
#[case(Some("   "))]
#[tokio::test]
async fn test_page_requires_title(#[future] test_db: TestDb, #[case] title: Option<&str>) {
	let test_db = test_db.await;
	let result = test_db
		.repos
		.pages
		.create(PageInput {
			title: title.map(str::to_string),
			..PageInput::default()
		})
		.await;
	assert!(matches!(result, Err(CmsError::Validation(_))));
}

#[rstest]
#[tokio::test]
async fn test_update_missing_page_is_not_found(#[future] test_db: TestDb) {
	let test_db = test_db.await;
	let result = test_db.repos.pages.update(9, PageInput::default()).await;
	assert!(matches!(result, Err(CmsError::NotFound { id: 9, .. })));
}

#[rstest]
#[tokio::test]
async fn test_files_in_slot_filter_by_scope(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (_, blocks) = page_with_blocks(&test_db.repos, &["A"]).await;
	let block_id = blocks[0].id;
	let files = &test_db.repos.files;
	files.create(file_input("a.png", Some(block_id), Some("hero"))).await.unwrap();
	files.create(file_input("b.png", Some(block_id), Some("thumb"))).await.unwrap();
	files.create(file_input("c.png", Some(block_id), None)).await.unwrap();

	// Act
	let hero = files.list_in_slot(block_id, Some("hero")).await.unwrap();
	let unscoped = files.list_in_slot(block_id, None).await.unwrap();
	let all = files.list_for_block(block_id).await.unwrap();

	// Assert
	assert_eq!(hero.len(), 1);
	assert_eq!(hero[0].path, "a.png");
	assert_eq!(unscoped.len(), 1);
	assert_eq!(unscoped[0].path, "c.png");
	assert_eq!(all.len(), 3);
}

#[rstest]
#[tokio::test]
async fn test_duplicate_file_path_is_a_validation_error(#[future] test_db: TestDb) {
	let test_db = test_db.await;
	test_db.repos.files.create(file_input("same.png", None, None)).await.unwrap();
	let result = test_db.repos.files.create(file_input("same.png", None, None)).await;
	assert!(matches!(result, Err(CmsError::Validation(_))));
}

#[rstest]
#[tokio::test]
async fn test_deleting_block_detaches_files(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (_, blocks) = page_with_blocks(&test_db.repos, &["A"]).await;
	let file = test_db
		.repos
		.files
		.create(file_input("keep.png", Some(blocks[0].id), Some("hero")))
		.await
		.unwrap();

	// Act
	test_db.repos.blocks.delete(blocks[0].id).await.unwrap();

	// Assert
	let file = test_db.repos.files.get(file.id).await.unwrap();
	assert_eq!(file.block_id, None);
}

#[rstest]
#[tokio::test]
async fn test_block_update_keeps_position(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (_, blocks) = page_with_blocks(&test_db.repos, &["A", "B"]).await;
	let editor = serde_json::json!({"blocks": [{"type": "paragraph", "text": "hi"}]});

	// Act
	let block = test_db
		.repos
		.blocks
		.update(
			blocks[1].id,
			BlockInput {
				editor: Some(editor.clone()),
				..BlockInput::default()
			},
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(block.position, 2);
	assert_eq!(block.editor, Some(editor));
}

#[rstest]
#[tokio::test]
async fn test_forced_sync_recreates_empty_tables(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	create_page(&test_db.repos, "Old").await;

	// Act
	schema::sync(&test_db.db, true).await.unwrap();

	// Assert
	assert!(test_db.repos.pages.list().await.unwrap().is_empty());
}
