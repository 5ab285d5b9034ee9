// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case status graph and the guard attached to each edge.
//!
//! The graph itself lives in [`CaseStatus::can_transition_to`]; this
//! module evaluates the guards against the case's items and the
//! aggregate amount paid.

use crate::error::{DomainError, TransitionBlocker};
use crate::item::{Item, incomplete_items, paid_items};
use crate::money::Money;
use crate::types::CaseStatus;

/// Aggregate view of a case used to evaluate transition guards.
#[derive(Debug, Clone, Copy)]
pub struct GuardContext<'a> {
    pub items: &'a [Item],
    /// Sum of every payment registered for the case.
    pub payments_total: Money,
}

/// Validates an explicitly requested transition.
///
/// # Errors
///
/// - `DomainError::CaseFinalized` if `from` is terminal.
/// - `DomainError::InvalidTransition` if the edge is not requestable.
/// - `DomainError::PreconditionFailed` if the edge guard refuses it.
pub fn check_transition(
    case_id: i64,
    from: CaseStatus,
    to: CaseStatus,
    ctx: GuardContext<'_>,
) -> Result<(), DomainError> {
    if from.is_terminal() {
        return Err(DomainError::CaseFinalized(case_id));
    }
    if !from.can_request_transition_to(to) {
        return Err(DomainError::InvalidTransition { from, to });
    }

    let guard: fn(GuardContext<'_>) -> Result<(), TransitionBlocker> = match (from, to) {
        (CaseStatus::Evaluation, CaseStatus::AwaitingPayment) => guard_has_items,
        (CaseStatus::AwaitingPayment, CaseStatus::InExecution) => guard_has_paid_item,
        (CaseStatus::InExecution, CaseStatus::Finalized) => guard_settled,
        _ => guard_none,
    };

    guard(ctx).map_err(|blocker| DomainError::PreconditionFailed { from, to, blocker })
}

const fn guard_none(_ctx: GuardContext<'_>) -> Result<(), TransitionBlocker> {
    Ok(())
}

const fn guard_has_items(ctx: GuardContext<'_>) -> Result<(), TransitionBlocker> {
    if ctx.items.is_empty() {
        return Err(TransitionBlocker::NoItems);
    }
    Ok(())
}

fn guard_has_paid_item(ctx: GuardContext<'_>) -> Result<(), TransitionBlocker> {
    if paid_items(ctx.items).is_empty() {
        return Err(TransitionBlocker::NoFullyPaidItem);
    }
    Ok(())
}

/// Every item done and the aggregate paid covers the aggregate price.
///
/// Individual item payment status is not consulted: the aggregate total is
/// the closing gate.
fn guard_settled(ctx: GuardContext<'_>) -> Result<(), TransitionBlocker> {
    let incomplete: usize = incomplete_items(ctx.items).len();
    let total_due: Money = ctx
        .items
        .iter()
        .fold(Money::ZERO, |acc, i| acc.saturating_add(i.price));

    if incomplete > 0 || ctx.payments_total < total_due {
        return Err(TransitionBlocker::Unsettled {
            incomplete_items: incomplete,
            total_due,
            total_paid: ctx.payments_total,
        });
    }
    Ok(())
}

/// Checks that a sequence of observed statuses is a walk of the graph.
///
/// The walk must start in `Triage`. Consecutive equal statuses are allowed
/// (commands that do not move the case).
#[must_use]
pub fn is_valid_status_walk(walk: &[CaseStatus]) -> bool {
    match walk.first() {
        None => true,
        Some(CaseStatus::Triage) => walk
            .windows(2)
            .all(|pair| pair[0] == pair[1] || pair[0].can_transition_to(pair[1])),
        Some(_) => false,
    }
}
