// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Catalog seeding: clients, staff and procedures.

use clinica_domain::{DomainError, StaffRole};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::convert::{flag_to_column, timestamp_to_text};
use crate::data_models::NewProcedure;
use crate::diesel_schema::{clients, procedures, staff};
use crate::error::PersistenceError;

/// Registers a client.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_client(
    conn: &mut SqliteConnection,
    name: &str,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(clients::table)
        .values((
            clients::name.eq(name.trim()),
            clients::created_at.eq(timestamp_to_text(now)?),
        ))
        .execute(conn)?;
    let client_id: i64 = conn.get_last_insert_rowid()?;
    info!(client_id, "Created client");
    Ok(client_id)
}

/// Registers a staff member.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_staff(
    conn: &mut SqliteConnection,
    display_name: &str,
    role: StaffRole,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(staff::table)
        .values((
            staff::display_name.eq(display_name.trim()),
            staff::role.eq(role.as_str()),
            staff::is_active.eq(flag_to_column(true)),
        ))
        .execute(conn)?;
    let staff_id: i64 = conn.get_last_insert_rowid()?;
    info!(staff_id, role = %role, "Created staff member");
    Ok(staff_id)
}

/// Adds a procedure to the catalog.
///
/// # Errors
///
/// Returns `DomainError::NonPositiveAmount` (as `CommandRejected`) if the
/// price is not positive, or an error if the insert fails.
pub fn create_procedure(
    conn: &mut SqliteConnection,
    procedure: &NewProcedure,
) -> Result<i64, PersistenceError> {
    if !procedure.price.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            field: "price",
            amount: procedure.price,
        }
        .into());
    }

    diesel::insert_into(procedures::table)
        .values((
            procedures::name.eq(procedure.name.trim()),
            procedures::price_cents.eq(procedure.price.cents()),
            procedures::sale_commission_bps.eq(procedure.rates.sale.basis_points()),
            procedures::execution_commission_bps.eq(procedure.rates.execution.basis_points()),
            procedures::is_active.eq(flag_to_column(procedure.is_active)),
        ))
        .execute(conn)?;
    let procedure_id: i64 = conn.get_last_insert_rowid()?;
    info!(procedure_id, price = %procedure.price, "Created procedure");
    Ok(procedure_id)
}

/// Marks a procedure active or inactive.
///
/// # Errors
///
/// Returns `DomainError::ProcedureNotFound` (as `CommandRejected`) if no
/// row was updated.
pub fn set_procedure_active(
    conn: &mut SqliteConnection,
    procedure_id: i64,
    is_active: bool,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(procedures::table.find(procedure_id))
        .set(procedures::is_active.eq(flag_to_column(is_active)))
        .execute(conn)?;
    if updated == 0 {
        return Err(DomainError::ProcedureNotFound(procedure_id).into());
    }
    Ok(())
}
