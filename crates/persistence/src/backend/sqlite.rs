// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Opening and configuring the `SQLite` case store.

use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{BigInt, Integer, Text};
use diesel::{Connection, RunQueryDsl, SqliteConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// Embedded schema migrations.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// How long a writer waits for the case lock before giving up.
pub const BUSY_TIMEOUT_MS: u32 = 5_000;

/// Journal mode requested when a store is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JournalMode {
    /// Whatever `SQLite` picks for the connection (in-memory stores).
    Default,
    /// Write-ahead log, for file stores.
    Wal,
}

#[derive(QueryableByName)]
struct ForeignKeysRow {
    #[diesel(sql_type = Integer)]
    foreign_keys: i32,
}

#[derive(QueryableByName)]
struct JournalModeRow {
    #[diesel(sql_type = Text)]
    journal_mode: String,
}

/// Runs a PRAGMA that returns nothing useful. Diesel has no PRAGMA DSL.
fn set_pragma(conn: &mut SqliteConnection, statement: &str) -> Result<(), PersistenceError> {
    debug!(statement, "Applying pragma");
    diesel::sql_query(statement)
        .execute(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("{statement}: {e}")))?;
    Ok(())
}

/// Returns the id of the row inserted last on this connection.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_last_insert_rowid(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(diesel::select(sql::<BigInt>("last_insert_rowid()")).get_result(conn)?)
}

/// Fails unless the connection enforces foreign keys.
///
/// Items, payments, allocations and commissions all hang off their case by
/// foreign key; a store that silently ignores them is refused.
///
/// # Errors
///
/// Returns `ForeignKeyEnforcementNotEnabled` if the pragma reads 0.
pub fn verify_foreign_key_enforcement(conn: &mut SqliteConnection) -> Result<(), PersistenceError> {
    let row: ForeignKeysRow = diesel::sql_query("PRAGMA foreign_keys").get_result(conn)?;

    if row.foreign_keys == 0 {
        return Err(PersistenceError::ForeignKeyEnforcementNotEnabled);
    }

    info!("SQLite foreign key enforcement is enabled");
    Ok(())
}

/// Switches the connection to WAL and returns the mode `SQLite` settled on.
fn enable_wal(conn: &mut SqliteConnection) -> Result<String, PersistenceError> {
    let row: JournalModeRow = diesel::sql_query("PRAGMA journal_mode = WAL")
        .get_result(conn)
        .map_err(|e| PersistenceError::QueryFailed(format!("journal_mode: {e}")))?;
    Ok(row.journal_mode)
}

/// Opens the store at `database_url`, configures the connection and brings
/// the schema up to date.
///
/// Foreign keys are switched on and a busy timeout is set, so a second
/// writer waits for `BEGIN IMMEDIATE` instead of failing at once.
///
/// # Errors
///
/// Returns `DatabaseConnectionFailed`, `QueryFailed` or `MigrationFailed`
/// depending on the step that failed.
pub fn open_store(
    database_url: &str,
    journal: JournalMode,
) -> Result<SqliteConnection, PersistenceError> {
    info!(database_url, ?journal, "Opening case store");

    let mut conn: SqliteConnection = SqliteConnection::establish(database_url)?;

    set_pragma(&mut conn, "PRAGMA foreign_keys = ON")?;
    set_pragma(&mut conn, &format!("PRAGMA busy_timeout = {BUSY_TIMEOUT_MS}"))?;

    if journal == JournalMode::Wal {
        let mode: String = enable_wal(&mut conn)?;
        if mode.eq_ignore_ascii_case("wal") {
            info!("Case store is in WAL mode");
        } else {
            warn!(mode = %mode, "Case store did not switch to WAL");
        }
    }

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| PersistenceError::MigrationFailed(e.to_string()))?;
    info!(applied = applied.len(), "Case store schema is up to date");

    Ok(conn)
}
