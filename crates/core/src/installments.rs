// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::CoreError;
use crate::state::CaseState;
use clinica_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use clinica_domain::{
    DomainError, Installment, InstallmentPlanEntry, Money, Payment, split_into_installments,
};
use time::{Date, OffsetDateTime};

/// Installments to store for a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentPlan {
    /// The new installments, numbered after the existing ones.
    pub entries: Vec<InstallmentPlanEntry>,
    /// Open installments of the earlier schedule that the new one replaces.
    pub replaced: Vec<i64>,
    /// The audit event recording the schedule.
    pub audit_event: AuditEvent,
}

/// An installment marked as paid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallmentSettlement {
    /// The installment after settlement.
    pub installment: Installment,
    /// The audit event recording the settlement.
    pub audit_event: AuditEvent,
}

/// Splits the case's outstanding balance into `count` installments.
///
/// The new schedule covers the whole balance, so every still-open
/// installment in `existing` is replaced by it. Paid ones are kept as
/// history. Installments are advisory: they never change the case status
/// and never gate a transition.
///
/// # Errors
///
/// - `DomainError::CaseFinalized` if the case is closed.
/// - `DomainError::NonPositiveAmount` if nothing is owed.
/// - `DomainError::InvalidInstallmentCount` if `count` is zero or larger
///   than the balance in cents.
pub fn apply_schedule_installments(
    state: &CaseState,
    existing: &[Installment],
    count: u32,
    first_due: Date,
    interval_days: u32,
    actor: Actor,
    cause: Cause,
) -> Result<InstallmentPlan, CoreError> {
    state.case.ensure_not_finalized()?;

    let total: Money = state.outstanding();
    let last_number: u32 = existing.iter().map(|i| i.number).max().unwrap_or(0);
    let entries: Vec<InstallmentPlanEntry> =
        split_into_installments(total, count, first_due, interval_days, last_number)?;
    let replaced: Vec<i64> = existing
        .iter()
        .filter(|i| i.is_open())
        .map(|i| i.installment_id)
        .collect();

    let snapshot: StateSnapshot = state.to_snapshot();
    let action: Action = Action::new(
        String::from("ScheduleInstallments"),
        Some(format!(
            "Split {total} into {count} installment(s) from {first_due}, replacing {} open",
            replaced.len()
        )),
    );

    Ok(InstallmentPlan {
        entries,
        replaced,
        audit_event: AuditEvent::new(actor, cause, action, snapshot.clone(), snapshot),
    })
}

/// Marks an installment of the case as paid by `payment`.
///
/// Settling is bookkeeping and stays allowed after the case is finalized.
///
/// # Errors
///
/// - `DomainError::InstallmentNotFound` if the installment is not part of the case.
/// - `DomainError::PaymentFromOtherCase` if the payment belongs to another case.
/// - `DomainError::InstallmentAlreadySettled` if it was already paid.
/// - `DomainError::InstallmentReplaced` if a later schedule superseded it.
pub fn apply_settle_installment(
    state: &CaseState,
    installment: &Installment,
    payment: &Payment,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<InstallmentSettlement, CoreError> {
    let case_id: i64 = state.case.case_id;
    if installment.case_id != case_id {
        return Err(DomainError::InstallmentNotFound(installment.installment_id).into());
    }
    if payment.case_id != case_id {
        return Err(DomainError::PaymentFromOtherCase {
            payment_id: payment.payment_id,
            case_id,
        }
        .into());
    }

    let mut settled: Installment = installment.clone();
    settled.settle(payment.payment_id, now)?;

    let snapshot: StateSnapshot = state.to_snapshot();
    let action: Action = Action::new(
        String::from("SettleInstallment"),
        Some(format!(
            "Installment {} ({}) settled by payment {}",
            settled.number, settled.amount, payment.payment_id
        )),
    );

    Ok(InstallmentSettlement {
        installment: settled,
        audit_event: AuditEvent::new(actor, cause, action, snapshot.clone(), snapshot),
    })
}
