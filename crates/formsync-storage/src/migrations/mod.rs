//! Schema migrations using PRAGMA user_version.
//!
//! The client and server databases are separate files with independent
//! version sequences.

pub mod client;
pub mod server;

use rusqlite::Connection;

use formsync_core::errors::{FormSyncResult, StorageError};

/// A migration step: SQL batch and the version it brings the schema to.
pub type Migration = (&'static str, u32);

/// Run all pending client migrations.
pub fn run_client_migrations(conn: &Connection) -> FormSyncResult<()> {
    apply(conn, client::MIGRATIONS)
}

/// Run all pending server migrations.
pub fn run_server_migrations(conn: &Connection) -> FormSyncResult<()> {
    apply(conn, server::MIGRATIONS)
}

fn apply(conn: &Connection, migrations: &[Migration]) -> FormSyncResult<()> {
    let current = current_version(conn)?;

    for (sql, version) in migrations {
        if current < *version {
            conn.execute_batch(sql)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            conn.pragma_update(None, "user_version", version)
                .map_err(|e| StorageError::MigrationFailed {
                    version: *version,
                    reason: e.to_string(),
                })?;
            tracing::info!(version = version, "applied migration");
        }
    }

    Ok(())
}

/// Get the current schema version.
pub fn current_version(conn: &Connection) -> FormSyncResult<u32> {
    let version = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .map_err(|e| StorageError::SqliteError {
            message: e.to_string(),
        })?;
    Ok(version)
}
