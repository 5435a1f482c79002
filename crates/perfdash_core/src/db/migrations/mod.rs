//! Ordered schema scripts for the employee store.
//!
//! Each script runs at most once per database; the highest applied version
//! is recorded in `PRAGMA user_version`, and all pending scripts commit in
//! one transaction.

use crate::db::{DbError, DbResult};
use rusqlite::Connection;

/// `(version, script)` pairs in strictly increasing version order.
const MIGRATIONS: &[(u32, &str)] = &[(1, include_str!("0001_employees.sql"))];

/// Highest schema version this build can create.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |&(version, _)| version)
}

/// Schema version recorded on `conn`; `0` for a fresh database.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}

/// Brings `conn` up to [`latest_version`] and returns how many scripts ran.
///
/// # Errors
/// - `UnsupportedSchemaVersion` when the database is newer than this build.
/// - `Migration` naming the first script that failed; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let current = current_version(conn)?;
    let latest = latest_version();
    if current > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: current,
            latest_supported: latest,
        });
    }
    if current == latest {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    let mut applied = 0;
    for &(version, script) in MIGRATIONS.iter().filter(|(version, _)| *version > current) {
        tx.execute_batch(script)
            .and_then(|()| tx.pragma_update(None, "user_version", version))
            .map_err(|source| DbError::Migration { version, source })?;
        applied += 1;
    }
    tx.commit()?;

    Ok(applied)
}
