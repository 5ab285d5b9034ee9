// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clinica_audit::{AuditEvent, StateSnapshot};
use clinica_domain::{
    Case, CaseStatus, CommissionRates, CommissionSummary, GuardContext, Item, ItemStatus, Money,
    NewCase, NewItem, NewPayment,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Everything needed to decide a command against one case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseState {
    /// The case row.
    pub case: Case,
    /// Items currently attached to the case.
    pub items: Vec<Item>,
    /// Sum of every payment registered for the case.
    pub payments_total: Money,
    /// Commission rates keyed by procedure id, for every item's procedure.
    pub commission_rates: BTreeMap<i64, CommissionRates>,
}

impl CaseState {
    #[must_use]
    pub const fn new(case: Case) -> Self {
        Self {
            case,
            items: Vec::new(),
            payments_total: Money::ZERO,
            commission_rates: BTreeMap::new(),
        }
    }

    /// Sum of all item prices.
    #[must_use]
    pub fn total_due(&self) -> Money {
        self.items
            .iter()
            .fold(Money::ZERO, |acc, i| acc.saturating_add(i.price))
    }

    /// Saldo devedor: what is still owed, never negative.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        self.total_due().saturating_sub(self.payments_total)
    }

    pub(crate) fn item(&self, item_id: i64) -> Option<&Item> {
        self.items.iter().find(|i| i.item_id == item_id)
    }

    pub(crate) fn item_mut(&mut self, item_id: i64) -> Option<&mut Item> {
        self.items.iter_mut().find(|i| i.item_id == item_id)
    }

    pub(crate) fn guard_context(&self) -> GuardContext<'_> {
        GuardContext {
            items: &self.items,
            payments_total: self.payments_total,
        }
    }

    /// Converts the state to a snapshot for audit purposes.
    #[must_use]
    pub fn to_snapshot(&self) -> StateSnapshot {
        self.snapshot_of(self.items.len(), self.total_due())
    }

    /// Snapshot of the state once `pending`, not yet stored, is part of it.
    #[must_use]
    pub fn to_snapshot_with(&self, pending: &NewItem) -> StateSnapshot {
        self.snapshot_of(
            self.items.len().saturating_add(1),
            self.total_due().saturating_add(pending.price),
        )
    }

    fn snapshot_of(&self, items: usize, due: Money) -> StateSnapshot {
        StateSnapshot::of_case(
            self.case.status,
            &[
                ("items", items.to_string()),
                ("due", due.to_string()),
                ("paid", self.payments_total.to_string()),
            ],
        )
    }
}

/// What a successful command changed, beyond the case row itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The evaluator was set.
    EvaluatorAssigned { evaluator_id: i64 },
    /// A new item must be stored. If `reopened`, the case fell back to
    /// `awaiting_payment`.
    ItemAdded { item: NewItem, reopened: bool },
    ItemRemoved { item_id: i64 },
    ExecutorAssigned { item_id: i64, executor_id: i64 },
    ItemAdvanced {
        item_id: i64,
        status: ItemStatus,
        completed_at: Option<OffsetDateTime>,
    },
    /// A payment and its allocations must be stored, and each allocated
    /// item's `amount_paid` incremented.
    PaymentRegistered {
        payment: NewPayment,
        /// Item statuses after the payment, for every allocated item.
        item_statuses: Vec<(i64, ItemStatus)>,
    },
    /// The case moved along a forward edge.
    Transitioned { from: CaseStatus, to: CaseStatus },
    /// The case was closed; the commission drafts must be stored.
    Finalized(CommissionSummary),
}

/// The result of a successful command.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseTransition {
    /// The case state after the command.
    pub new_state: CaseState,
    /// What must be persisted.
    pub outcome: Outcome,
    /// The audit event recording this command.
    pub audit_event: AuditEvent,
}

/// The result of opening a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenCaseResult {
    /// The case to store.
    pub new_case: NewCase,
    /// The audit event recording the opening.
    pub audit_event: AuditEvent,
}
