// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case, item, payment and commission queries.
//!
//! `load_case_state` assembles everything the command layer needs to
//! decide a command; it is always called inside the command's write
//! transaction so the state cannot go stale before it is persisted.

use clinica::CaseState;
use clinica_domain::{
    Allocation, Case, CaseStatus, Commission, CommissionKind, CommissionRates, DomainError, Item,
    ItemStatus, Money, Payment, PaymentMethod, Procedure,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::convert::{
    count_from_column, optional_text_to_timestamp, parse_enum, percentage_from_column,
    text_to_timestamp,
};
use crate::data_models::{CaseSummary, PaymentRecord};
use crate::diesel_schema::{
    case_items, cases, commissions, payment_allocations, payments, procedures,
};
use crate::error::PersistenceError;
use crate::queries::catalog::ProcedureRow;
use crate::queries::installments::list_installments;

/// Diesel Queryable struct for case rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cases)]
pub(crate) struct CaseRow {
    case_id: i64,
    client_id: i64,
    evaluator_id: Option<i64>,
    liberator_id: Option<i64>,
    status: String,
    notes: Option<String>,
    created_at: String,
    unlocked_at: Option<String>,
    finalized_at: Option<String>,
}

impl CaseRow {
    pub(crate) fn into_case(self) -> Result<Case, PersistenceError> {
        Ok(Case {
            case_id: self.case_id,
            client_id: self.client_id,
            evaluator_id: self.evaluator_id,
            liberator_id: self.liberator_id,
            status: parse_enum::<CaseStatus>("case status", &self.status)?,
            notes: self.notes,
            created_at: text_to_timestamp(&self.created_at)?,
            unlocked_at: optional_text_to_timestamp(self.unlocked_at.as_deref())?,
            finalized_at: optional_text_to_timestamp(self.finalized_at.as_deref())?,
        })
    }
}

/// Diesel Queryable struct for item rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = case_items)]
struct ItemRow {
    item_id: i64,
    case_id: i64,
    procedure_id: i64,
    seller_id: Option<i64>,
    executor_id: Option<i64>,
    price_cents: i64,
    amount_paid_cents: i64,
    status: String,
    created_at: String,
    completed_at: Option<String>,
}

impl ItemRow {
    fn into_item(self) -> Result<Item, PersistenceError> {
        Ok(Item {
            item_id: self.item_id,
            case_id: self.case_id,
            procedure_id: self.procedure_id,
            seller_id: self.seller_id,
            executor_id: self.executor_id,
            price: Money::from_cents(self.price_cents),
            amount_paid: Money::from_cents(self.amount_paid_cents),
            status: parse_enum::<ItemStatus>("item status", &self.status)?,
            created_at: text_to_timestamp(&self.created_at)?,
            completed_at: optional_text_to_timestamp(self.completed_at.as_deref())?,
        })
    }
}

/// Diesel Queryable struct for payment rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = payments)]
pub(crate) struct PaymentRow {
    payment_id: i64,
    case_id: i64,
    receiver_id: Option<i64>,
    amount_cents: i64,
    method: String,
    installment_count: i32,
    note: Option<String>,
    created_at: String,
}

impl PaymentRow {
    pub(crate) fn into_payment(self) -> Result<Payment, PersistenceError> {
        Ok(Payment {
            payment_id: self.payment_id,
            case_id: self.case_id,
            receiver_id: self.receiver_id,
            amount: Money::from_cents(self.amount_cents),
            method: parse_enum::<PaymentMethod>("payment method", &self.method)?,
            installment_count: count_from_column(self.installment_count)?,
            note: self.note,
            created_at: text_to_timestamp(&self.created_at)?,
        })
    }
}

/// Diesel Queryable struct for allocation rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = payment_allocations)]
struct AllocationRow {
    allocation_id: i64,
    payment_id: i64,
    item_id: i64,
    amount_applied_cents: i64,
    created_at: String,
}

/// Diesel Queryable struct for commission rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = commissions)]
struct CommissionRow {
    commission_id: i64,
    case_id: i64,
    item_id: i64,
    beneficiary_id: i64,
    kind: String,
    percentage_bps: i64,
    base_amount_cents: i64,
    commission_amount_cents: i64,
    created_at: String,
}

/// Retrieves a case row.
///
/// # Errors
///
/// Returns `PersistenceError::CommandRejected` carrying
/// `DomainError::CaseNotFound` if no such case exists.
pub fn get_case(conn: &mut SqliteConnection, case_id: i64) -> Result<Case, PersistenceError> {
    cases::table
        .filter(cases::case_id.eq(case_id))
        .select(CaseRow::as_select())
        .first::<CaseRow>(conn)
        .optional()?
        .ok_or(DomainError::CaseNotFound(case_id))?
        .into_case()
}

/// Lists the items of a case in insertion order.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_items(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<Item>, PersistenceError> {
    case_items::table
        .filter(case_items::case_id.eq(case_id))
        .order(case_items::item_id.asc())
        .select(ItemRow::as_select())
        .load::<ItemRow>(conn)?
        .into_iter()
        .map(ItemRow::into_item)
        .collect()
}

/// Retrieves an item by id, whatever case it belongs to.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_item(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> Result<Option<Item>, PersistenceError> {
    case_items::table
        .filter(case_items::item_id.eq(item_id))
        .select(ItemRow::as_select())
        .first::<ItemRow>(conn)
        .optional()?
        .map(ItemRow::into_item)
        .transpose()
}

/// Sum of every payment registered for a case.
///
/// # Errors
///
/// Returns an error if the database query fails or the sum overflows.
pub fn payments_total(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Money, PersistenceError> {
    let amounts: Vec<i64> = payments::table
        .filter(payments::case_id.eq(case_id))
        .select(payments::amount_cents)
        .load(conn)?;
    Ok(Money::sum(amounts.into_iter().map(Money::from_cents))?)
}

/// Commission rates for every procedure referenced by `items`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn commission_rates(
    conn: &mut SqliteConnection,
    items: &[Item],
) -> Result<BTreeMap<i64, CommissionRates>, PersistenceError> {
    let ids: Vec<i64> = items.iter().map(|i| i.procedure_id).collect();
    let rows: Vec<ProcedureRow> = procedures::table
        .filter(procedures::procedure_id.eq_any(ids))
        .select(ProcedureRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let procedure: Procedure = row.into_procedure()?;
            Ok((procedure.procedure_id, procedure.rates()))
        })
        .collect()
}

/// Loads the case, its items, payments total and commission rates.
///
/// # Errors
///
/// Returns `DomainError::CaseNotFound` (as `CommandRejected`) if the case
/// does not exist, or an error if a query fails.
pub fn load_case_state(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<CaseState, PersistenceError> {
    let case: Case = get_case(conn, case_id)?;
    let items: Vec<Item> = list_items(conn, case_id)?;
    let total: Money = payments_total(conn, case_id)?;
    let rates: BTreeMap<i64, CommissionRates> = commission_rates(conn, &items)?;

    debug!(
        case_id,
        status = %case.status,
        items = items.len(),
        paid = %total,
        "Loaded case state"
    );

    Ok(CaseState {
        case,
        items,
        payments_total: total,
        commission_rates: rates,
    })
}

/// Retrieves a payment by id.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn get_payment(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Option<Payment>, PersistenceError> {
    payments::table
        .filter(payments::payment_id.eq(payment_id))
        .select(PaymentRow::as_select())
        .first::<PaymentRow>(conn)
        .optional()?
        .map(PaymentRow::into_payment)
        .transpose()
}

/// Lists the payments of a case with their allocations, oldest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_payments(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<PaymentRecord>, PersistenceError> {
    let rows: Vec<PaymentRow> = payments::table
        .filter(payments::case_id.eq(case_id))
        .order(payments::payment_id.asc())
        .select(PaymentRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let payment: Payment = row.into_payment()?;
            let allocations: Vec<Allocation> = list_allocations(conn, payment.payment_id)?;
            Ok(PaymentRecord {
                payment,
                allocations,
            })
        })
        .collect()
}

/// Lists the allocations of one payment.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_allocations(
    conn: &mut SqliteConnection,
    payment_id: i64,
) -> Result<Vec<Allocation>, PersistenceError> {
    payment_allocations::table
        .filter(payment_allocations::payment_id.eq(payment_id))
        .order(payment_allocations::allocation_id.asc())
        .select(AllocationRow::as_select())
        .load::<AllocationRow>(conn)?
        .into_iter()
        .map(|row| {
            Ok(Allocation {
                allocation_id: row.allocation_id,
                payment_id: row.payment_id,
                item_id: row.item_id,
                amount_applied: Money::from_cents(row.amount_applied_cents),
                created_at: text_to_timestamp(&row.created_at)?,
            })
        })
        .collect()
}

/// Sum of every allocation applied to an item.
///
/// # Errors
///
/// Returns an error if the database query fails or the sum overflows.
pub fn allocated_to_item(
    conn: &mut SqliteConnection,
    item_id: i64,
) -> Result<Money, PersistenceError> {
    let amounts: Vec<i64> = payment_allocations::table
        .filter(payment_allocations::item_id.eq(item_id))
        .select(payment_allocations::amount_applied_cents)
        .load(conn)?;
    Ok(Money::sum(amounts.into_iter().map(Money::from_cents))?)
}

/// Lists the commissions generated for a case.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_commissions(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<Commission>, PersistenceError> {
    commissions::table
        .filter(commissions::case_id.eq(case_id))
        .order(commissions::commission_id.asc())
        .select(CommissionRow::as_select())
        .load::<CommissionRow>(conn)?
        .into_iter()
        .map(|row| {
            Ok(Commission {
                commission_id: row.commission_id,
                case_id: row.case_id,
                item_id: row.item_id,
                beneficiary_id: row.beneficiary_id,
                kind: parse_enum::<CommissionKind>("commission kind", &row.kind)?,
                percentage: percentage_from_column(row.percentage_bps)?,
                base_amount: Money::from_cents(row.base_amount_cents),
                commission_amount: Money::from_cents(row.commission_amount_cents),
                created_at: text_to_timestamp(&row.created_at)?,
            })
        })
        .collect()
}

/// Builds the full summary of a case.
///
/// # Errors
///
/// Returns `DomainError::CaseNotFound` (as `CommandRejected`) if the case
/// does not exist, or an error if a query fails.
pub fn get_case_summary(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<CaseSummary, PersistenceError> {
    let state: CaseState = load_case_state(conn, case_id)?;
    let total_due: Money = state.total_due();
    let outstanding: Money = state.outstanding();

    Ok(CaseSummary {
        payments: list_payments(conn, case_id)?,
        commissions: list_commissions(conn, case_id)?,
        installments: list_installments(conn, case_id)?,
        total_due,
        total_paid: state.payments_total,
        outstanding,
        case: state.case,
        items: state.items,
    })
}
