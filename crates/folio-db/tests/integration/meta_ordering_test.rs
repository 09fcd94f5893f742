//! Metadata ordering within a block, under both insert policies

use folio_core::models::{BlockInput, MetaInput};
use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use folio_core::position::PositionInput;
use folio_db::Repositories;
use rstest::rstest;

use crate::fixtures::{TestDb, create_page, test_db, test_db_with};

async fn block_with_metas(repos: &Repositories, values: &[&str]) -> i64 {
	let page = create_page(repos, "Home").await;
	let block = repos
		.blocks
		.create(
			page.id,
			BlockInput {
				block_type: Some("facts".into()),
				..BlockInput::default()
			},
		)
		.await
		.unwrap();
	for value in values {
		repos
			.metas
			.create(
				block.id,
				MetaInput {
					field1: Some(value.to_string()),
					field2: None,
				},
				&PositionInput::Missing,
			)
			.await
			.unwrap();
	}
	block.id
}

async fn meta_order(repos: &Repositories, block_id: i64) -> Vec<(String, i64)> {
	repos
		.metas
		.list_for_block(block_id)
		.await
		.unwrap()
		.into_iter()
		.map(|m| (m.field1.unwrap_or_default(), m.position))
		.collect()
}

fn pairs(expected: &[(&str, i64)]) -> Vec<(String, i64)> {
	expected.iter().map(|(v, p)| (v.to_string(), *p)).collect()
}

#[rstest]
#[tokio::test]
async fn test_append_policy_places_new_meta_last(#[future] test_db: TestDb) {
	// Arrange & Act
	let test_db = test_db.await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b", "c"]).await;

	// Assert
	assert_eq!(
		meta_order(&test_db.repos, block_id).await,
		pairs(&[("a", 1), ("b", 2), ("c", 3)])
	);
}

#[rstest]
#[tokio::test]
async fn test_shift_all_policy_inserts_at_head() {
	// Arrange & Act
	let test_db = test_db_with(IsolationLevel::Serializable, MetaInsertPolicy::ShiftAll).await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b", "c"]).await;

	// Assert
	assert_eq!(
		meta_order(&test_db.repos, block_id).await,
		pairs(&[("c", 1), ("b", 2), ("a", 3)])
	);
}

#[rstest]
#[tokio::test]
async fn test_update_meta_moves_and_saves_fields(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b", "c", "d"]).await;
	let metas = test_db.repos.metas.list_for_block(block_id).await.unwrap();

	// Act
	let (meta, moved) = test_db
		.repos
		.metas
		.update(
			metas[0].id,
			MetaInput {
				field1: Some("a'".into()),
				field2: Some("second".into()),
			},
			&PositionInput::Number(3),
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(meta.field2.as_deref(), Some("second"));
	assert_eq!(moved.shifted, 2);
	assert_eq!(
		meta_order(&test_db.repos, block_id).await,
		pairs(&[("b", 1), ("c", 2), ("a'", 3), ("d", 4)])
	);
}

#[rstest]
#[tokio::test]
async fn test_update_meta_with_malformed_position_keeps_order(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b"]).await;
	let metas = test_db.repos.metas.list_for_block(block_id).await.unwrap();

	// Act
	let (meta, _) = test_db
		.repos
		.metas
		.update(
			metas[1].id,
			MetaInput {
				field1: None,
				field2: Some("note".into()),
			},
			&PositionInput::parse("first"),
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(meta.field2.as_deref(), Some("note"));
	assert_eq!(
		meta_order(&test_db.repos, block_id).await,
		pairs(&[("a", 1), ("b", 2)])
	);
}

#[rstest]
#[tokio::test]
async fn test_deleting_block_cascades_to_metas(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b"]).await;
	let metas = test_db.repos.metas.list_for_block(block_id).await.unwrap();

	// Act
	test_db.repos.blocks.delete(block_id).await.unwrap();

	// Assert
	assert!(test_db.repos.metas.find(metas[0].id).await.unwrap().is_none());
	assert!(test_db.repos.metas.list_for_block(block_id).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_remove_meta_leaves_gap(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let block_id = block_with_metas(&test_db.repos, &["a", "b", "c"]).await;
	let metas = test_db.repos.metas.list_for_block(block_id).await.unwrap();

	// Act
	let removed = test_db.repos.metas.delete(metas[0].id).await.unwrap();

	// Assert
	assert_eq!(removed.field1.as_deref(), Some("a"));
	assert_eq!(
		meta_order(&test_db.repos, block_id).await,
		pairs(&[("b", 2), ("c", 3)])
	);
}
