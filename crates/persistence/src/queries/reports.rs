// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cross-case reports.

use clinica_domain::{CaseStatus, Money};
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::AwaitingPaymentEntry;
use crate::diesel_schema::{case_items, cases, clients};
use crate::error::PersistenceError;
use crate::queries::cases::payments_total;
use crate::queries::installments::next_unpaid_due_date;

/// Lists every case waiting for payment with its balance and the next
/// installment due date, oldest case first.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub fn awaiting_payment_report(
    conn: &mut SqliteConnection,
) -> Result<Vec<AwaitingPaymentEntry>, PersistenceError> {
    let rows: Vec<(i64, i64, String)> = cases::table
        .inner_join(clients::table)
        .filter(cases::status.eq(CaseStatus::AwaitingPayment.as_str()))
        .order(cases::case_id.asc())
        .select((cases::case_id, cases::client_id, clients::name))
        .load(conn)?;

    rows.into_iter()
        .map(|(case_id, client_id, client_name)| {
            let prices: Vec<i64> = case_items::table
                .filter(case_items::case_id.eq(case_id))
                .select(case_items::price_cents)
                .load(conn)?;
            let total_due: Money = Money::sum(prices.into_iter().map(Money::from_cents))?;
            let total_paid: Money = payments_total(conn, case_id)?;

            Ok(AwaitingPaymentEntry {
                case_id,
                client_id,
                client_name,
                total_due,
                total_paid,
                outstanding: total_due.saturating_sub(total_paid),
                next_due_date: next_unpaid_due_date(conn, case_id)?,
            })
        })
        .collect()
}
