// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case mutations.
//!
//! `persist_outcome` writes the row changes a committed command implies.
//! It trusts the command layer's validation but never relies on it for
//! the no-overpay rule: the item increment is a conditional update.

use clinica::Outcome;
use clinica_domain::{
    Case, CaseStatus, CommissionSummary, ItemStatus, Money, NewCase, NewItem, NewPayment,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::convert::{count_to_column, optional_timestamp_to_text, timestamp_to_text};
use crate::diesel_schema::{case_items, cases, commissions, payment_allocations, payments};
use crate::error::PersistenceError;

/// Inserts a new case.
///
/// # Returns
///
/// The case ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn insert_case(conn: &mut SqliteConnection, case: &NewCase) -> Result<i64, PersistenceError> {
    diesel::insert_into(cases::table)
        .values((
            cases::client_id.eq(case.client_id),
            cases::evaluator_id.eq(case.evaluator_id),
            cases::status.eq(CaseStatus::Triage.as_str()),
            cases::notes.eq(case.notes.as_deref()),
            cases::created_at.eq(timestamp_to_text(case.created_at)?),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

/// Writes the mutable columns of a case row.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_case(conn: &mut SqliteConnection, case: &Case) -> Result<(), PersistenceError> {
    diesel::update(cases::table.find(case.case_id))
        .set((
            cases::evaluator_id.eq(case.evaluator_id),
            cases::liberator_id.eq(case.liberator_id),
            cases::status.eq(case.status.as_str()),
            cases::unlocked_at.eq(optional_timestamp_to_text(case.unlocked_at)?),
            cases::finalized_at.eq(optional_timestamp_to_text(case.finalized_at)?),
        ))
        .execute(conn)?;
    Ok(())
}

/// Writes the row changes of a command outcome.
///
/// # Returns
///
/// The id of the created row: the item for `ItemAdded`, the payment for
/// `PaymentRegistered`, `None` otherwise.
///
/// # Errors
///
/// Returns an error if any write fails, or
/// `PersistenceError::ConcurrentModification` if an item increment would
/// overpay it.
pub fn persist_outcome(
    conn: &mut SqliteConnection,
    case_id: i64,
    outcome: &Outcome,
    now: OffsetDateTime,
) -> Result<Option<i64>, PersistenceError> {
    match outcome {
        Outcome::EvaluatorAssigned { .. } | Outcome::Transitioned { .. } => Ok(None),
        Outcome::ItemAdded { item, .. } => insert_item(conn, item).map(Some),
        Outcome::ItemRemoved { item_id } => {
            delete_item(conn, case_id, *item_id)?;
            Ok(None)
        }
        Outcome::ExecutorAssigned {
            item_id,
            executor_id,
        } => {
            diesel::update(case_items::table.find(*item_id))
                .set(case_items::executor_id.eq(Some(*executor_id)))
                .execute(conn)?;
            Ok(None)
        }
        Outcome::ItemAdvanced {
            item_id,
            status,
            completed_at,
        } => {
            diesel::update(case_items::table.find(*item_id))
                .set((
                    case_items::status.eq(status.as_str()),
                    case_items::completed_at.eq(optional_timestamp_to_text(*completed_at)?),
                ))
                .execute(conn)?;
            Ok(None)
        }
        Outcome::PaymentRegistered {
            payment,
            item_statuses,
        } => insert_payment(conn, payment, item_statuses).map(Some),
        Outcome::Finalized(summary) => {
            insert_commissions(conn, case_id, summary, now)?;
            Ok(None)
        }
    }
}

fn insert_item(conn: &mut SqliteConnection, item: &NewItem) -> Result<i64, PersistenceError> {
    diesel::insert_into(case_items::table)
        .values((
            case_items::case_id.eq(item.case_id),
            case_items::procedure_id.eq(item.procedure_id),
            case_items::seller_id.eq(item.seller_id),
            case_items::executor_id.eq(item.executor_id),
            case_items::price_cents.eq(item.price.cents()),
            case_items::amount_paid_cents.eq(Money::ZERO.cents()),
            case_items::status.eq(ItemStatus::Pending.as_str()),
            case_items::created_at.eq(timestamp_to_text(item.created_at)?),
        ))
        .execute(conn)?;
    let item_id: i64 = conn.get_last_insert_rowid()?;
    debug!(case_id = item.case_id, item_id, price = %item.price, "Inserted item");
    Ok(item_id)
}

fn delete_item(
    conn: &mut SqliteConnection,
    case_id: i64,
    item_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(
        case_items::table
            .filter(case_items::item_id.eq(item_id))
            .filter(case_items::case_id.eq(case_id)),
    )
    .execute(conn)?;
    debug!(case_id, item_id, "Deleted item");
    Ok(())
}

fn insert_payment(
    conn: &mut SqliteConnection,
    payment: &NewPayment,
    item_statuses: &[(i64, ItemStatus)],
) -> Result<i64, PersistenceError> {
    let created_at: String = timestamp_to_text(payment.created_at)?;

    diesel::insert_into(payments::table)
        .values((
            payments::case_id.eq(payment.case_id),
            payments::receiver_id.eq(payment.receiver_id),
            payments::amount_cents.eq(payment.amount.cents()),
            payments::method.eq(payment.method.as_str()),
            payments::installment_count.eq(count_to_column(payment.installment_count)?),
            payments::note.eq(payment.note.as_deref()),
            payments::created_at.eq(&created_at),
        ))
        .execute(conn)?;
    let payment_id: i64 = conn.get_last_insert_rowid()?;

    for allocation in &payment.allocations {
        diesel::insert_into(payment_allocations::table)
            .values((
                payment_allocations::payment_id.eq(payment_id),
                payment_allocations::item_id.eq(allocation.item_id),
                payment_allocations::amount_applied_cents.eq(allocation.amount.cents()),
                payment_allocations::created_at.eq(&created_at),
            ))
            .execute(conn)?;

        let status: ItemStatus = item_statuses
            .iter()
            .find(|(item_id, _)| *item_id == allocation.item_id)
            .map(|(_, status)| *status)
            .ok_or_else(|| {
                PersistenceError::ReconstructionError(format!(
                    "no resulting status for item {}",
                    allocation.item_id
                ))
            })?;
        increment_amount_paid(conn, allocation.item_id, allocation.amount, status)?;
    }

    info!(
        case_id = payment.case_id,
        payment_id,
        amount = %payment.amount,
        allocations = payment.allocations.len(),
        "Registered payment"
    );
    Ok(payment_id)
}

/// Adds `applied` to an item's `amount_paid` in one statement.
///
/// The `WHERE` clause refuses any increment that would exceed the price,
/// so the no-overpay rule holds at the row level.
fn increment_amount_paid(
    conn: &mut SqliteConnection,
    item_id: i64,
    applied: Money,
    status: ItemStatus,
) -> Result<(), PersistenceError> {
    let cents: i64 = applied.cents();
    let updated: usize = diesel::update(
        case_items::table
            .filter(case_items::item_id.eq(item_id))
            .filter((case_items::amount_paid_cents + cents).le(case_items::price_cents)),
    )
    .set((
        case_items::amount_paid_cents.eq(case_items::amount_paid_cents + cents),
        case_items::status.eq(status.as_str()),
    ))
    .execute(conn)?;

    if updated != 1 {
        return Err(PersistenceError::ConcurrentModification(format!(
            "applying {applied} would overpay item {item_id}"
        )));
    }
    Ok(())
}

fn insert_commissions(
    conn: &mut SqliteConnection,
    case_id: i64,
    summary: &CommissionSummary,
    now: OffsetDateTime,
) -> Result<(), PersistenceError> {
    let created_at: String = timestamp_to_text(now)?;
    for draft in &summary.drafts {
        diesel::insert_into(commissions::table)
            .values((
                commissions::case_id.eq(draft.case_id),
                commissions::item_id.eq(draft.item_id),
                commissions::beneficiary_id.eq(draft.beneficiary_id),
                commissions::kind.eq(draft.kind.as_str()),
                commissions::percentage_bps.eq(draft.percentage.basis_points()),
                commissions::base_amount_cents.eq(draft.base_amount.cents()),
                commissions::commission_amount_cents.eq(draft.commission_amount.cents()),
                commissions::created_at.eq(&created_at),
            ))
            .execute(conn)?;
    }
    info!(
        case_id,
        commissions = summary.drafts.len(),
        total = %summary.grand_total,
        "Stored commissions"
    );
    Ok(())
}
