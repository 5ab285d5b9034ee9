// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Store backend.
//!
//! Everything that cannot be written in Diesel DSL lives here: opening the
//! connection, PRAGMA configuration, migrations and `last_insert_rowid()`.

pub mod sqlite;

use diesel::SqliteConnection;

use crate::error::PersistenceError;

/// Connection-level helpers used by the mutation modules.
pub trait PersistenceBackend {
    /// Id of the row inserted last on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// Fails unless foreign key enforcement is on.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyEnforcementNotEnabled` otherwise.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}
