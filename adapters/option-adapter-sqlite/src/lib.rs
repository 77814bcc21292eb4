//! SQLite-backed option store for the Helix settings server.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

mod option;
mod schema;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use helix_types::option_store::OptionStore;
use helix_types::prelude::*;

use crate::schema::init_db;

#[derive(Debug)]
pub struct OptionAdapterSqlite {
	db: SqlitePool,
}

impl OptionAdapterSqlite {
	/// Open (or create) the option database at `path`
	pub async fn new(path: impl AsRef<Path>) -> HxResult<Self> {
		if let Some(dir) = path.as_ref().parent().filter(|dir| !dir.as_os_str().is_empty()) {
			tokio::fs::create_dir_all(dir).await?;
		}

		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		init_db(&db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		debug!("Option store opened at {}", path.as_ref().display());
		Ok(Self { db })
	}
}

#[async_trait]
impl OptionStore for OptionAdapterSqlite {
	async fn get_option(&self, name: &str) -> HxResult<Option<Value>> {
		option::read(&self.db, name).await
	}

	async fn update_option(&self, name: &str, value: Value) -> HxResult<bool> {
		option::update(&self.db, name, &value).await
	}

	async fn update_options(&self, changes: &[(&str, Value)]) -> HxResult<bool> {
		option::update_many(&self.db, changes).await
	}
}

// vim: ts=4
