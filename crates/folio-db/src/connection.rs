//! Connection pool

use std::str::FromStr;
use std::time::Duration;

use folio_conf::DatabaseSettings;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::error::DbResult;
use crate::sqlite::SqliteBackend;

/// Shared SQLite pool
#[derive(Debug, Clone)]
pub struct Database {
	pool: SqlitePool,
}

impl Database {
	/// Connect using application settings
	pub async fn connect(settings: &DatabaseSettings) -> DbResult<Self> {
		Self::connect_url(&settings.url, settings.max_connections).await
	}

	/// Connect to a database URL.
	///
	/// The file is created when missing and foreign keys are enforced.
	/// In-memory databases are pinned to a single connection so every query
	/// sees the same database.
	///
	/// # Examples
	///
	/// ```no_run
	/// use folio_db::Database;
	///
	/// # async fn example() {
	/// let db = Database::connect_url("sqlite::memory:", 1).await.unwrap();
	/// # }
	/// # tokio::runtime::Runtime::new().unwrap().block_on(example());
	/// ```
	pub async fn connect_url(url: &str, max_connections: u32) -> DbResult<Self> {
		let options = SqliteConnectOptions::from_str(url)?
			.create_if_missing(true)
			.foreign_keys(true)
			.busy_timeout(Duration::from_secs(10));

		let in_memory = url.contains(":memory:") || url.contains("mode=memory");
		let mut pool_options = SqlitePoolOptions::new();
		pool_options = if in_memory {
			pool_options
				.max_connections(1)
				.idle_timeout(None)
				.max_lifetime(None)
		} else {
			pool_options.max_connections(max_connections.max(1))
		};

		let pool = pool_options.connect_with(options).await?;
		tracing::debug!(url, "database pool ready");
		Ok(Self { pool })
	}

	/// Wrap an existing pool
	pub fn from_pool(pool: SqlitePool) -> Self {
		Self { pool }
	}

	/// Underlying pool
	pub fn pool(&self) -> &SqlitePool {
		&self.pool
	}

	/// Transaction backend over this pool
	pub fn backend(&self) -> SqliteBackend {
		SqliteBackend::new(self.pool.clone())
	}

	/// Close every connection
	pub async fn close(&self) {
		self.pool.close().await;
	}
}
