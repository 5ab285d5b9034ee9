// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installment schedule mutations.

use clinica_domain::{Installment, InstallmentPlanEntry};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::convert::{
    count_to_column, date_to_text, flag_to_column, optional_timestamp_to_text,
};
use crate::diesel_schema::installments;
use crate::error::PersistenceError;

/// Stores planned installments for a case.
///
/// # Returns
///
/// The ids of the new rows, in plan order.
///
/// # Errors
///
/// Returns an error if an insert fails.
pub fn insert_installments(
    conn: &mut SqliteConnection,
    case_id: i64,
    entries: &[InstallmentPlanEntry],
) -> Result<Vec<i64>, PersistenceError> {
    let mut ids: Vec<i64> = Vec::with_capacity(entries.len());
    for entry in entries {
        diesel::insert_into(installments::table)
            .values((
                installments::case_id.eq(case_id),
                installments::number.eq(count_to_column(entry.number)?),
                installments::amount_cents.eq(entry.amount.cents()),
                installments::due_date.eq(date_to_text(entry.due_date)?),
                installments::paid.eq(flag_to_column(false)),
                installments::replaced.eq(flag_to_column(false)),
            ))
            .execute(conn)?;
        ids.push(conn.get_last_insert_rowid()?);
    }
    debug!(case_id, count = ids.len(), "Stored installments");
    Ok(ids)
}

/// Marks unpaid installments as superseded by a new schedule.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if one of them was
/// settled meanwhile, or an error if the update fails.
pub fn mark_installments_replaced(
    conn: &mut SqliteConnection,
    installment_ids: &[i64],
) -> Result<(), PersistenceError> {
    if installment_ids.is_empty() {
        return Ok(());
    }
    let updated: usize = diesel::update(
        installments::table
            .filter(installments::installment_id.eq_any(installment_ids))
            .filter(installments::paid.eq(flag_to_column(false))),
    )
    .set(installments::replaced.eq(flag_to_column(true)))
    .execute(conn)?;

    if updated != installment_ids.len() {
        return Err(PersistenceError::ConcurrentModification(format!(
            "{} of {} installments were no longer open",
            installment_ids.len() - updated,
            installment_ids.len()
        )));
    }
    debug!(count = updated, "Replaced open installments");
    Ok(())
}

/// Writes the settlement of an installment.
///
/// Only an open row is updated, so a concurrent settlement cannot be
/// overwritten.
///
/// # Errors
///
/// Returns `PersistenceError::ConcurrentModification` if the row was
/// already paid or replaced, or an error if the update fails.
pub fn mark_installment_paid(
    conn: &mut SqliteConnection,
    installment: &Installment,
) -> Result<(), PersistenceError> {
    let updated: usize = diesel::update(
        installments::table
            .filter(installments::installment_id.eq(installment.installment_id))
            .filter(installments::paid.eq(flag_to_column(false)))
            .filter(installments::replaced.eq(flag_to_column(false))),
    )
    .set((
        installments::paid.eq(flag_to_column(installment.paid)),
        installments::payment_id.eq(installment.payment_id),
        installments::paid_at.eq(optional_timestamp_to_text(installment.paid_at)?),
    ))
    .execute(conn)?;

    if updated != 1 {
        return Err(PersistenceError::ConcurrentModification(format!(
            "installment {} is no longer unpaid",
            installment.installment_id
        )));
    }
    Ok(())
}
