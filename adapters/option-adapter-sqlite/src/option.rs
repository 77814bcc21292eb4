//! Option key-value store
//!
//! Values are stored JSON-encoded. A write of a value equal to the stored one
//! is skipped and reported as "not changed".

use serde_json::Value;
use sqlx::{Row, SqliteConnection, SqlitePool};

use helix_types::prelude::*;

fn inspect(err: &sqlx::Error) {
	warn!("DB: {:#?}", err);
}

async fn read_conn(conn: &mut SqliteConnection, name: &str) -> Result<Option<Value>, sqlx::Error> {
	let row = sqlx::query("SELECT value FROM options WHERE name = ?")
		.bind(name)
		.fetch_optional(&mut *conn)
		.await?;

	Ok(row.and_then(|r| {
		let value: Option<String> = r.get("value");
		value.and_then(|v| serde_json::from_str(&v).ok())
	}))
}

/// Write unless the stored value is equal. Returns whether anything changed.
/// The write comes first so the transaction holds the write lock from its
/// first statement on.
async fn write_conn(
	conn: &mut SqliteConnection,
	name: &str,
	value: &Value,
) -> Result<bool, sqlx::Error> {
	let res = sqlx::query(
		"INSERT INTO options (name, value) VALUES (?, ?)
		ON CONFLICT (name) DO UPDATE SET value = excluded.value
		WHERE options.value IS NOT excluded.value",
	)
	.bind(name)
	.bind(value.to_string())
	.execute(&mut *conn)
	.await?;

	Ok(res.rows_affected() > 0)
}

/// Read a single option by name
pub(crate) async fn read(db: &SqlitePool, name: &str) -> HxResult<Option<Value>> {
	let mut conn = db.acquire().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	read_conn(&mut conn, name).await.inspect_err(inspect).map_err(|_| Error::DbError)
}

/// Update or create an option
pub(crate) async fn update(db: &SqlitePool, name: &str, value: &Value) -> HxResult<bool> {
	update_many(db, &[(name, value.clone())]).await
}

/// Update several options in one transaction
pub(crate) async fn update_many(db: &SqlitePool, changes: &[(&str, Value)]) -> HxResult<bool> {
	let mut tx = db.begin().await.inspect_err(inspect).map_err(|_| Error::DbError)?;

	let mut changed = false;
	for (name, value) in changes {
		changed |=
			write_conn(&mut tx, name, value).await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	}

	tx.commit().await.inspect_err(inspect).map_err(|_| Error::DbError)?;
	Ok(changed)
}

// vim: ts=4
