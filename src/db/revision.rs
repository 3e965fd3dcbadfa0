//! The global revision counter.
//!
//! The counter is a row in `metadata`, so it is only ever read or advanced
//! through a connection, usually one that is inside the transaction that also
//! writes the stamped rows.

use crate::error::MuseionError;
use sqlx::SqliteConnection;

pub const REVISION_KEY: &str = "revision";

/// Inserts the counter row at 0 unless it already exists.
pub async fn ensure(conn: &mut SqliteConnection) -> Result<(), MuseionError> {
    sqlx::query("INSERT INTO metadata (key, value) VALUES (?, 0) ON CONFLICT(key) DO NOTHING")
        .bind(REVISION_KEY)
        .execute(&mut *conn)
        .await?;
    Ok(())
}

/// Latest committed revision as seen by `conn`.
pub async fn current(conn: &mut SqliteConnection) -> Result<i64, MuseionError> {
    let value: i64 = sqlx::query_scalar("SELECT value FROM metadata WHERE key = ?")
        .bind(REVISION_KEY)
        .fetch_one(&mut *conn)
        .await?;
    Ok(value)
}

/// Increments the counter and returns the new value.
///
/// Must run inside the transaction that writes the rows stamped with the
/// returned value. Being a write, it takes SQLite's write lock, so no other
/// connection can reserve the same number before this transaction ends.
pub async fn advance(conn: &mut SqliteConnection) -> Result<i64, MuseionError> {
    let value: i64 =
        sqlx::query_scalar("UPDATE metadata SET value = value + 1 WHERE key = ? RETURNING value")
            .bind(REVISION_KEY)
            .fetch_one(&mut *conn)
            .await?;
    Ok(value)
}
