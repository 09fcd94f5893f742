//! Block reordering against SQLite

use folio_core::error::CmsError;
use folio_core::models::BlockInput;
use folio_core::position::PositionInput;
use rstest::rstest;

use crate::fixtures::{TestDb, block_order, create_page, expected, page_with_blocks, test_db};

const FIVE: [&str; 5] = ["A", "B", "C", "D", "E"];

#[rstest]
#[tokio::test]
async fn test_create_on_empty_page_gets_position_one(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let page = create_page(&test_db.repos, "Empty").await;

	// Act
	let block = test_db
		.repos
		.blocks
		.create(
			page.id,
			BlockInput {
				block_type: Some("hero".into()),
				..BlockInput::default()
			},
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(block.position, 1);
	assert!(block.date.is_some());
}

#[rstest]
#[tokio::test]
async fn test_create_appends_after_existing(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, _) = page_with_blocks(&test_db.repos, &["A", "B", "C"]).await;

	// Act
	let block = test_db
		.repos
		.blocks
		.create(
			page.id,
			BlockInput {
				block_type: Some("text".into()),
				title: Some("D".into()),
				..BlockInput::default()
			},
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(block.position, 4);
}

#[rstest]
#[tokio::test]
async fn test_move_towards_head_shifts_intervening_down_the_list(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;

	// Act
	let (block, moved) = test_db
		.repos
		.blocks
		.move_to(blocks[3].id, BlockInput::default(), &PositionInput::Number(2))
		.await
		.unwrap();

	// Assert
	assert_eq!(block.position, 2);
	assert_eq!(moved.shifted, 2);
	assert_eq!(
		block_order(&test_db.repos, page.id).await,
		expected(&[("A", 1), ("D", 2), ("B", 3), ("C", 4), ("E", 5)])
	);
}

#[rstest]
#[tokio::test]
async fn test_move_towards_tail_shifts_intervening_up_the_list(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;

	// Act
	test_db
		.repos
		.blocks
		.move_to(blocks[1].id, BlockInput::default(), &PositionInput::Number(4))
		.await
		.unwrap();

	// Assert
	assert_eq!(
		block_order(&test_db.repos, page.id).await,
		expected(&[("A", 1), ("C", 2), ("D", 3), ("B", 4), ("E", 5)])
	);
}

#[rstest]
#[tokio::test]
async fn test_move_to_current_position_is_a_no_op(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;
	let before = block_order(&test_db.repos, page.id).await;

	// Act
	let (_, moved) = test_db
		.repos
		.blocks
		.move_to(blocks[2].id, BlockInput::default(), &PositionInput::Number(3))
		.await
		.unwrap();

	// Assert
	assert_eq!(moved.shifted, 0);
	assert_eq!(block_order(&test_db.repos, page.id).await, before);
}

#[rstest]
#[case(PositionInput::Malformed("abc".into()))]
#[case(PositionInput::Missing)]
#[tokio::test]
async fn test_unusable_position_saves_fields_without_shift(
	#[future] test_db: TestDb,
	#[case] position: PositionInput,
) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;
	let input = BlockInput {
		colour: Some("teal".into()),
		..BlockInput::default()
	};

	// Act
	let (block, moved) = test_db
		.repos
		.blocks
		.move_to(blocks[1].id, input, &position)
		.await
		.unwrap();

	// Assert
	assert_eq!(block.colour.as_deref(), Some("teal"));
	assert_eq!(block.position, 2);
	assert_eq!(moved.shifted, 0);
	assert_eq!(
		block_order(&test_db.repos, page.id).await,
		expected(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)])
	);
}

#[rstest]
#[tokio::test]
async fn test_negative_position_rejected_before_any_write(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;

	// Act
	let result = test_db
		.repos
		.blocks
		.move_to(
			blocks[0].id,
			BlockInput {
				title: Some("renamed".into()),
				..BlockInput::default()
			},
			&PositionInput::Number(-2),
		)
		.await;

	// Assert
	assert!(matches!(result, Err(CmsError::Validation(_))));
	assert_eq!(block_order(&test_db.repos, page.id).await[0].0, "A");
}

#[rstest]
#[tokio::test]
async fn test_delete_leaves_gap(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &FIVE).await;

	// Act
	let deleted = test_db.repos.blocks.delete(blocks[2].id).await.unwrap();

	// Assert
	assert_eq!(deleted.title.as_deref(), Some("C"));
	assert_eq!(
		block_order(&test_db.repos, page.id).await,
		expected(&[("A", 1), ("B", 2), ("D", 4), ("E", 5)])
	);
}

#[rstest]
#[tokio::test]
async fn test_move_missing_block_is_not_found(#[future] test_db: TestDb) {
	let test_db = test_db.await;
	let result = test_db
		.repos
		.blocks
		.move_to(4242, BlockInput::default(), &PositionInput::Number(1))
		.await;
	assert!(matches!(result, Err(CmsError::NotFound { id: 4242, .. })));
}

#[rstest]
#[tokio::test]
async fn test_create_on_missing_page_writes_nothing(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let input = BlockInput {
		block_type: Some("text".into()),
		..BlockInput::default()
	};

	// Act
	let result = test_db.repos.blocks.create(77, input).await;

	// Assert
	assert!(matches!(result, Err(CmsError::NotFound { id: 77, .. })));
	assert!(test_db.repos.blocks.list_for_page(77).await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn test_create_requires_block_type(#[future] test_db: TestDb) {
	let test_db = test_db.await;
	let page = create_page(&test_db.repos, "Home").await;
	let result = test_db
		.repos
		.blocks
		.create(page.id, BlockInput::default())
		.await;
	assert!(matches!(result, Err(CmsError::Validation(_))));
}

#[rstest]
#[tokio::test]
async fn test_moves_in_one_page_do_not_touch_another(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (first, blocks) = page_with_blocks(&test_db.repos, &["A", "B", "C"]).await;
	let (second, _) = page_with_blocks(&test_db.repos, &["X", "Y", "Z"]).await;

	// Act
	test_db
		.repos
		.blocks
		.move_to(blocks[2].id, BlockInput::default(), &PositionInput::Number(1))
		.await
		.unwrap();

	// Assert
	assert_eq!(
		block_order(&test_db.repos, first.id).await,
		expected(&[("C", 1), ("A", 2), ("B", 3)])
	);
	assert_eq!(
		block_order(&test_db.repos, second.id).await,
		expected(&[("X", 1), ("Y", 2), ("Z", 3)])
	);
}
