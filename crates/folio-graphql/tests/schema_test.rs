//! GraphQL documents executed against a SQLite-backed schema

use std::sync::Arc;

use async_graphql::{Request, Variables};
use folio_cms::ContentService;
use folio_core::models::TemporaryUpload;
use folio_core::policy::{IsolationLevel, MetaInsertPolicy};
use folio_db::{Database, Repositories, schema};
use folio_graphql::{AppSchema, create_schema};
use folio_storage::LocalMediaStorage;
use rstest::{fixture, rstest};
use serde_json::{Value, json};
use tempfile::TempDir;

struct TestApi {
	_db_dir: TempDir,
	_media: TempDir,
	spool: TempDir,
	schema: AppSchema,
}

impl TestApi {
	async fn run(&self, query: &str, variables: Value) -> Value {
		let response = self
			.schema
			.execute(Request::new(query).variables(Variables::from_json(variables)))
			.await;
		assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
		response.data.into_json().unwrap()
	}

	async fn run_err(&self, query: &str, variables: Value) -> Vec<async_graphql::ServerError> {
		let response = self
			.schema
			.execute(Request::new(query).variables(Variables::from_json(variables)))
			.await;
		response.errors
	}

	async fn create_page(&self, title: &str) -> String {
		let data = self
			.run(
				"mutation($title: String) { createPage(input: { pageInput: { title: $title } }) { page { id } } }",
				json!({ "title": title }),
			)
			.await;
		data["createPage"]["page"]["id"].as_str().unwrap().to_string()
	}

	async fn create_block(&self, page_id: &str, title: &str) -> String {
		let data = self
			.run(
				r#"mutation($page: ID!, $title: String) {
					createBlock(input: { blockInput: { pageId: $page, blockType: "text", title: $title } }) {
						blockEdge { node { id position } }
					}
				}"#,
				json!({ "page": page_id, "title": title }),
			)
			.await;
		data["createBlock"]["blockEdge"]["node"]["id"]
			.as_str()
			.unwrap()
			.to_string()
	}

	async fn block_titles(&self, page_id: &str) -> Vec<(String, i64)> {
		let data = self
			.run(
				r#"query($id: ID!) {
					node(id: $id) { ... on Page { blockConnection { edges { node { title position } } } } }
				}"#,
				json!({ "id": page_id }),
			)
			.await;
		data["node"]["blockConnection"]["edges"]
			.as_array()
			.unwrap()
			.iter()
			.map(|e| {
				(
					e["node"]["title"].as_str().unwrap_or_default().to_string(),
					e["node"]["position"].as_i64().unwrap(),
				)
			})
			.collect()
	}
}

#[fixture]
async fn api() -> TestApi {
	let db_dir = TempDir::new().unwrap();
	let url = format!("sqlite://{}", db_dir.path().join("api.db").display());
	let db = Database::connect_url(&url, 5).await.unwrap();
	schema::sync(&db, false).await.unwrap();
	let repos = Repositories::new(&db, IsolationLevel::Serializable, MetaInsertPolicy::Append);
	let media = TempDir::new().unwrap();
	let storage = LocalMediaStorage::new(media.path(), "http://localhost:4000", "/media").unwrap();
	TestApi {
		_db_dir: db_dir,
		_media: media,
		spool: TempDir::new().unwrap(),
		schema: create_schema(ContentService::new(repos, Arc::new(storage))),
	}
}

#[rstest]
#[tokio::test]
async fn test_client_mutation_id_is_echoed(#[future] api: TestApi) {
	// Arrange
	let api = api.await;

	// Act
	let data = api
		.run(
			r#"mutation { createPage(input: { pageInput: { title: "Home" }, clientMutationId: "abc" }) {
				clientMutationId
				page { title published }
			} }"#,
			json!({}),
		)
		.await;

	// Assert
	assert_eq!(data["createPage"]["clientMutationId"], "abc");
	assert_eq!(data["createPage"]["page"]["title"], "Home");
	assert_eq!(data["createPage"]["page"]["published"], false);
}

#[rstest]
#[tokio::test]
async fn test_update_block_position_reorders_connection(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	let page = api.create_page("Home").await;
	let mut ids = Vec::new();
	for title in ["A", "B", "C", "D", "E"] {
		ids.push(api.create_block(&page, title).await);
	}

	// Act
	let data = api
		.run(
			r#"mutation($id: ID!) {
				updateBlockPosition(input: { id: $id, position: 2 }) {
					blockEdge { cursor node { title position } }
					blockConnection(first: 2) { edges { node { title } } pageInfo { hasNextPage } }
				}
			}"#,
			json!({ "id": ids[3] }),
		)
		.await;

	// Assert
	let payload = &data["updateBlockPosition"];
	assert_eq!(payload["blockEdge"]["node"]["position"], 2);
	assert_eq!(payload["blockConnection"]["edges"][1]["node"]["title"], "D");
	assert_eq!(payload["blockConnection"]["pageInfo"]["hasNextPage"], true);
	assert_eq!(
		api.block_titles(&page).await,
		vec![
			("A".to_string(), 1),
			("D".to_string(), 2),
			("B".to_string(), 3),
			("C".to_string(), 4),
			("E".to_string(), 5)
		]
	);
}

#[rstest]
#[tokio::test]
async fn test_null_position_keeps_order(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	let page = api.create_page("Home").await;
	let a = api.create_block(&page, "A").await;
	api.create_block(&page, "B").await;

	// Act
	api.run(
		"mutation($id: ID!) { updateBlockPosition(input: { id: $id, position: null }) { blockEdge { cursor } } }",
		json!({ "id": a }),
	)
	.await;

	// Assert
	assert_eq!(
		api.block_titles(&page).await,
		vec![("A".to_string(), 1), ("B".to_string(), 2)]
	);
}

#[rstest]
#[tokio::test]
async fn test_wrong_kind_carries_error_code(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	let page = api.create_page("Home").await;

	// Act
	let errors = api
		.run_err(
			"mutation($id: ID!) { removeBlock(input: { id: $id }) { deletedId } }",
			json!({ "id": page }),
		)
		.await;

	// Assert
	assert_eq!(errors.len(), 1);
	assert!(errors[0].message.contains("ID must belong to Block type"));
	let code = errors[0]
		.extensions
		.as_ref()
		.and_then(|ext| ext.get("code"))
		.cloned();
	assert_eq!(code, Some(async_graphql::Value::from("TYPE_MISMATCH")));
}

#[rstest]
#[tokio::test]
async fn test_meta_lifecycle(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	let page = api.create_page("Home").await;
	let block = api.create_block(&page, "Facts").await;
	let mut metas = Vec::new();
	for value in ["one", "two"] {
		let data = api
			.run(
				r#"mutation($block: ID!, $v: String) {
					createMeta(input: { metaInput: { blockId: $block, field1: $v } }) { metaEdge { cursor node { id position } } }
				}"#,
				json!({ "block": block, "v": value }),
			)
			.await;
		metas.push(data["createMeta"]["metaEdge"]["node"]["id"].as_str().unwrap().to_string());
	}

	// Act
	let updated = api
		.run(
			r#"mutation($id: ID!) {
				updateMeta(input: { metaInput: { id: $id, field2: "2nd", position: 1 } }) {
					updateMeta { field2 position }
					metaConnection { edges { node { field1 position } } }
				}
			}"#,
			json!({ "id": metas[1] }),
		)
		.await;
	let removed = api
		.run(
			"mutation($id: ID!) { removeMeta(input: { id: $id }) { deletedId meta { field1 } } }",
			json!({ "id": metas[0] }),
		)
		.await;

	// Assert
	assert_eq!(updated["updateMeta"]["updateMeta"]["position"], 1);
	assert_eq!(
		updated["updateMeta"]["metaConnection"]["edges"][1]["node"]["field1"],
		"one"
	);
	assert_eq!(removed["removeMeta"]["deletedId"], metas[0].as_str());
	assert_eq!(removed["removeMeta"]["meta"]["field1"], "one");
}

#[rstest]
#[tokio::test]
async fn test_upload_block_file_reads_request_upload(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	let page = api.create_page("Home").await;
	let block = api.create_block(&page, "Hero").await;
	let temp_path = api.spool.path().join("upload");
	std::fs::write(&temp_path, b"jpeg").unwrap();
	let upload = TemporaryUpload {
		temp_path,
		original_name: "hero.jpg".into(),
		mime_type: "image/jpeg".into(),
		size: 4,
	};
	let query = r#"mutation($block: ID!) {
		uploadBlockFile(input: { blockFileInput: { blockId: $block, scope: "hero" } }) {
			deletedIds
			file { node { originalName contentType scope size fullPath } }
		}
	}"#;

	// Act
	let response = api
		.schema
		.execute(
			Request::new(query)
				.variables(Variables::from_json(json!({ "block": block })))
				.data(upload),
		)
		.await;

	// Assert
	assert!(response.errors.is_empty(), "errors: {:?}", response.errors);
	let data = response.data.into_json().unwrap();
	let file = &data["uploadBlockFile"]["file"]["node"];
	assert_eq!(file["originalName"], "hero.jpg");
	assert_eq!(file["scope"], "hero");
	assert_eq!(file["size"], 4);
	assert!(
		file["fullPath"]
			.as_str()
			.unwrap()
			.starts_with("http://localhost:4000/media/")
	);
	assert_eq!(data["uploadBlockFile"]["deletedIds"], json!([]));
}

#[rstest]
#[tokio::test]
async fn test_upload_without_request_file_fails_validation(#[future] api: TestApi) {
	let api = api.await;
	let errors = api
		.run_err("mutation { uploadFile { file { id } } }", json!({}))
		.await;
	assert_eq!(errors.len(), 1);
	let code = errors[0]
		.extensions
		.as_ref()
		.and_then(|ext| ext.get("code"))
		.cloned();
	assert_eq!(code, Some(async_graphql::Value::from("VALIDATION")));
}

#[rstest]
#[tokio::test]
async fn test_pages_connection_slices(#[future] api: TestApi) {
	// Arrange
	let api = api.await;
	for title in ["One", "Two", "Three"] {
		api.create_page(title).await;
	}

	// Act
	let data = api
		.run(
			"{ pages(last: 2) { edges { node { title } } pageInfo { hasPreviousPage startCursor } } }",
			json!({}),
		)
		.await;

	// Assert
	let edges = data["pages"]["edges"].as_array().unwrap();
	assert_eq!(edges.len(), 2);
	assert_eq!(edges[0]["node"]["title"], "Two");
	assert_eq!(data["pages"]["pageInfo"]["hasPreviousPage"], true);
	assert_eq!(
		data["pages"]["pageInfo"]["startCursor"],
		folio_core::connection::offset_to_cursor(1)
	);
}
