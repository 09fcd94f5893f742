//! Concurrent moves within one page

use std::sync::Arc;

use folio_core::models::BlockInput;
use folio_core::position::PositionInput;
use futures::future::join_all;
use rstest::rstest;

use crate::fixtures::{TestDb, block_order, page_with_blocks, test_db};

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_moves_keep_positions_unique(#[future] test_db: TestDb) {
	// Arrange
	let test_db = Arc::new(test_db.await);
	let titles = ["A", "B", "C", "D", "E", "F"];
	let (page, blocks) = page_with_blocks(&test_db.repos, &titles).await;
	let moves: Vec<(i64, i64)> = (0..24)
		.map(|i| (blocks[i % blocks.len()].id, ((i * 5) % blocks.len()) as i64 + 1))
		.collect();

	// Act
	let handles = moves.into_iter().map(|(id, position)| {
		let test_db = Arc::clone(&test_db);
		tokio::spawn(async move {
			test_db
				.repos
				.blocks
				.move_to(id, BlockInput::default(), &PositionInput::Number(position))
				.await
		})
	});
	let results = join_all(handles).await;

	// Assert
	for result in results {
		result.unwrap().unwrap();
	}
	let mut positions: Vec<i64> = block_order(&test_db.repos, page.id)
		.await
		.into_iter()
		.map(|(_, p)| p)
		.collect();
	positions.sort_unstable();
	assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);
}
