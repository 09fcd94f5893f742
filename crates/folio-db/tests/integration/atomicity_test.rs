//! A failure anywhere inside a reorder leaves the scope untouched

use folio_core::error::CmsError;
use folio_core::models::BlockInput;
use folio_core::policy::IsolationLevel;
use folio_core::position::{Position, PositionChange, PositionInput, PositionedFamily};
use folio_db::ReorderExecutor;
use folio_db::memory::{FaultPoint, MemoryBackend};
use folio_db::patch::FieldPatch;
use rstest::rstest;

use crate::fixtures::{TestDb, block_order, expected, page_with_blocks, test_db};

#[rstest]
#[tokio::test]
async fn test_sqlite_failure_during_shift_rolls_back_target(#[future] test_db: TestDb) {
	// Arrange
	let test_db = test_db.await;
	let (page, blocks) = page_with_blocks(&test_db.repos, &["A", "B", "C", "D", "E"]).await;
	// Abort as soon as the bulk shift reaches B
	let trigger = format!(
		"CREATE TRIGGER fail_shift BEFORE UPDATE OF position ON blocks \
		 WHEN OLD.id = {} BEGIN SELECT RAISE(ABORT, 'shift rejected'); END",
		blocks[1].id
	);
	sqlx::query(&trigger)
		.execute(test_db.db.pool())
		.await
		.unwrap();

	// Act
	let result = test_db
		.repos
		.blocks
		.move_to(
			blocks[3].id,
			BlockInput {
				title: Some("D moved".into()),
				..BlockInput::default()
			},
			&PositionInput::Number(2),
		)
		.await;

	// Assert
	assert!(result.is_err());
	assert_eq!(
		block_order(&test_db.repos, page.id).await,
		expected(&[("A", 1), ("B", 2), ("C", 3), ("D", 4), ("E", 5)])
	);
}

fn scope_of_five() -> (ReorderExecutor<MemoryBackend>, Vec<i64>) {
	let backend = MemoryBackend::new();
	backend.seed_parent(PositionedFamily::Block, 1);
	let ids = (1..=5)
		.map(|p| backend.seed_item(PositionedFamily::Block, 1, p))
		.collect();
	(ReorderExecutor::new(backend, IsolationLevel::Serializable), ids)
}

#[rstest]
#[case(FaultPoint::Placement)]
#[case(FaultPoint::Update)]
#[case(FaultPoint::Shift)]
#[case(FaultPoint::Commit)]
#[tokio::test]
async fn test_move_fault_leaves_positions_unchanged(#[case] fault: FaultPoint) {
	// Arrange
	let (executor, ids) = scope_of_five();
	let before = executor.backend().positions(PositionedFamily::Block, 1);
	executor.backend().fail_on(fault);

	// Act
	let result = executor
		.move_item(
			PositionedFamily::Block,
			ids[4],
			FieldPatch::new(),
			PositionChange::To(Position::new(1).unwrap()),
		)
		.await;

	// Assert
	assert!(matches!(result, Err(CmsError::Transaction(_))));
	assert_eq!(executor.backend().positions(PositionedFamily::Block, 1), before);
}

#[rstest]
#[case(FaultPoint::Count)]
#[case(FaultPoint::Insert)]
#[case(FaultPoint::Commit)]
#[tokio::test]
async fn test_create_fault_inserts_nothing(#[case] fault: FaultPoint) {
	// Arrange
	let (executor, _) = scope_of_five();
	executor.backend().fail_on(fault);

	// Act
	let result = executor
		.create_appended(PositionedFamily::Block, 1, FieldPatch::new())
		.await;

	// Assert
	assert!(result.is_err());
	assert_eq!(executor.backend().positions(PositionedFamily::Block, 1).len(), 5);
}

#[rstest]
#[tokio::test]
async fn test_fault_fires_once() {
	// Arrange
	let (executor, ids) = scope_of_five();
	executor.backend().fail_on(FaultPoint::Shift);
	let target = PositionChange::To(Position::new(1).unwrap());

	// Act
	let first = executor
		.move_item(PositionedFamily::Block, ids[2], FieldPatch::new(), target)
		.await;
	let second = executor
		.move_item(PositionedFamily::Block, ids[2], FieldPatch::new(), target)
		.await;

	// Assert
	assert!(first.is_err());
	let moved = second.unwrap();
	assert_eq!(moved.shifted, 2);
	assert_eq!(
		executor.backend().positions(PositionedFamily::Block, 1),
		vec![(ids[2], 1), (ids[0], 2), (ids[1], 3), (ids[3], 4), (ids[4], 5)]
	);
}

#[rstest]
#[tokio::test]
async fn test_negative_stored_position_aborts_move() {
	// Arrange
	let backend = MemoryBackend::new();
	backend.seed_parent(PositionedFamily::Block, 1);
	let corrupted = backend.seed_item(PositionedFamily::Block, 1, -2);
	for p in 1..=3 {
		backend.seed_item(PositionedFamily::Block, 1, p);
	}
	let executor = ReorderExecutor::new(backend, IsolationLevel::Serializable);
	let before = executor.backend().positions(PositionedFamily::Block, 1);

	// Act
	let result = executor
		.move_item(
			PositionedFamily::Block,
			corrupted,
			FieldPatch::new(),
			PositionChange::To(Position::new(2).unwrap()),
		)
		.await;

	// Assert
	let err = result.unwrap_err();
	assert!(err.to_string().contains("position"), "{}", err);
	assert_eq!(executor.backend().positions(PositionedFamily::Block, 1), before);
}
