// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Installment schedule queries.

use clinica_domain::{Installment, Money};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;

use crate::convert::{
    count_from_column, flag_from_column, optional_text_to_timestamp, text_to_date,
};
use crate::diesel_schema::installments;
use crate::error::PersistenceError;

/// Diesel Queryable struct for installment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = installments)]
struct InstallmentRow {
    installment_id: i64,
    case_id: i64,
    number: i32,
    amount_cents: i64,
    due_date: String,
    paid: i32,
    payment_id: Option<i64>,
    paid_at: Option<String>,
    replaced: i32,
}

impl InstallmentRow {
    fn into_installment(self) -> Result<Installment, PersistenceError> {
        Ok(Installment {
            installment_id: self.installment_id,
            case_id: self.case_id,
            number: count_from_column(self.number)?,
            amount: Money::from_cents(self.amount_cents),
            due_date: text_to_date(&self.due_date)?,
            paid: flag_from_column(self.paid),
            payment_id: self.payment_id,
            paid_at: optional_text_to_timestamp(self.paid_at.as_deref())?,
            replaced: flag_from_column(self.replaced),
        })
    }
}

/// Lists the installments of a case by number.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_installments(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<Installment>, PersistenceError> {
    installments::table
        .filter(installments::case_id.eq(case_id))
        .order(installments::number.asc())
        .select(InstallmentRow::as_select())
        .load::<InstallmentRow>(conn)?
        .into_iter()
        .map(InstallmentRow::into_installment)
        .collect()
}

/// Retrieves an installment by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_installment(
    conn: &mut SqliteConnection,
    installment_id: i64,
) -> Result<Option<Installment>, PersistenceError> {
    installments::table
        .filter(installments::installment_id.eq(installment_id))
        .select(InstallmentRow::as_select())
        .first::<InstallmentRow>(conn)
        .optional()?
        .map(InstallmentRow::into_installment)
        .transpose()
}

/// Due date of the earliest open installment of a case.
///
/// Installments replaced by a later schedule are skipped.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn next_unpaid_due_date(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Option<Date>, PersistenceError> {
    let due: Option<String> = installments::table
        .filter(installments::case_id.eq(case_id))
        .filter(installments::paid.eq(0))
        .filter(installments::replaced.eq(0))
        .order(installments::number.asc())
        .select(installments::due_date)
        .first(conn)
        .optional()?;
    due.as_deref().map(text_to_date).transpose()
}
