// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Client, staff and procedure catalog queries.

use clinica_domain::{Money, Procedure, StaffRole};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::convert::{flag_from_column, parse_enum, percentage_from_column, text_to_timestamp};
use crate::data_models::{ClientRecord, StaffMember};
use crate::diesel_schema::{clients, procedures, staff};
use crate::error::PersistenceError;

/// Diesel Queryable struct for client rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = clients)]
struct ClientRow {
    client_id: i64,
    name: String,
    created_at: String,
}

/// Diesel Queryable struct for staff rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = staff)]
struct StaffRow {
    staff_id: i64,
    display_name: String,
    role: String,
    is_active: i32,
}

/// Diesel Queryable struct for procedure rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = procedures)]
pub(crate) struct ProcedureRow {
    procedure_id: i64,
    name: String,
    price_cents: i64,
    sale_commission_bps: i64,
    execution_commission_bps: i64,
    is_active: i32,
}

impl ProcedureRow {
    pub(crate) fn into_procedure(self) -> Result<Procedure, PersistenceError> {
        Ok(Procedure {
            procedure_id: self.procedure_id,
            name: self.name,
            price: Money::from_cents(self.price_cents),
            sale_commission: percentage_from_column(self.sale_commission_bps)?,
            execution_commission: percentage_from_column(self.execution_commission_bps)?,
            is_active: flag_from_column(self.is_active),
        })
    }
}

/// Retrieves a client by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the client is not found.
pub fn get_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<ClientRecord>, PersistenceError> {
    let row: Option<ClientRow> = clients::table
        .filter(clients::client_id.eq(client_id))
        .select(ClientRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|r| {
        Ok(ClientRecord {
            client_id: r.client_id,
            name: r.name,
            created_at: text_to_timestamp(&r.created_at)?,
        })
    })
    .transpose()
}

/// Returns true if a client with this id exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn client_exists(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<bool, PersistenceError> {
    let count: i64 = clients::table
        .filter(clients::client_id.eq(client_id))
        .count()
        .get_result(conn)?;
    Ok(count > 0)
}

/// Retrieves a staff member by id.
///
/// # Errors
///
/// Returns an error if the database query fails or the stored role is invalid.
/// Returns `Ok(None)` if the staff member is not found.
pub fn get_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
) -> Result<Option<StaffMember>, PersistenceError> {
    debug!(staff_id, "Looking up staff member");

    let row: Option<StaffRow> = staff::table
        .filter(staff::staff_id.eq(staff_id))
        .select(StaffRow::as_select())
        .first(conn)
        .optional()?;

    row.map(|r| {
        Ok(StaffMember {
            staff_id: r.staff_id,
            display_name: r.display_name,
            role: parse_enum::<StaffRole>("staff role", &r.role)?,
            is_active: flag_from_column(r.is_active),
        })
    })
    .transpose()
}

/// Retrieves a procedure from the catalog.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the procedure is not found.
pub fn get_procedure(
    conn: &mut SqliteConnection,
    procedure_id: i64,
) -> Result<Option<Procedure>, PersistenceError> {
    procedures::table
        .filter(procedures::procedure_id.eq(procedure_id))
        .select(ProcedureRow::as_select())
        .first(conn)
        .optional()?
        .map(ProcedureRow::into_procedure)
        .transpose()
}

/// Lists the procedure catalog ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_procedures(conn: &mut SqliteConnection) -> Result<Vec<Procedure>, PersistenceError> {
    procedures::table
        .order((procedures::name.asc(), procedures::procedure_id.asc()))
        .select(ProcedureRow::as_select())
        .load::<ProcedureRow>(conn)?
        .into_iter()
        .map(ProcedureRow::into_procedure)
        .collect()
}
