// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clinica_domain::{AllocationRequest, CaseStatus, ItemStatus, Money, PaymentMethod, Procedure};

/// A command represents user intent against one case, as data only.
///
/// Commands are the only way to change a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Set or replace the evaluator.
    AssignEvaluator {
        /// The evaluator's staff id.
        evaluator_id: i64,
    },
    /// Attach a billable item.
    AddItem {
        /// The catalog entry being sold.
        procedure: Procedure,
        /// Who sold it.
        seller_id: Option<i64>,
        /// Who will perform it, if known.
        executor_id: Option<i64>,
        /// Replaces the catalog price when set.
        price_override: Option<Money>,
    },
    /// Detach an item (evaluation only).
    RemoveItem {
        /// The item to remove.
        item_id: i64,
    },
    /// Set the executor of an item.
    AssignExecutor {
        /// The item.
        item_id: i64,
        /// The executor's staff id.
        executor_id: i64,
    },
    /// Move an item to `executing` or `done`.
    AdvanceItemStatus {
        /// The item.
        item_id: i64,
        /// The requested status.
        target: ItemStatus,
    },
    /// Receive money and split it across items.
    RegisterPayment {
        /// Total received.
        amount: Money,
        /// How it was paid.
        method: PaymentMethod,
        /// Card installments.
        installment_count: u32,
        /// Free-text note.
        note: Option<String>,
        /// The explicit split.
        allocations: Vec<AllocationRequest>,
    },
    /// Move the case along the lifecycle graph.
    RequestTransition {
        /// The requested status.
        target: CaseStatus,
    },
    /// Close the case and generate commissions.
    Finalize,
}

impl Command {
    /// The name recorded in the audit trail.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AssignEvaluator { .. } => "AssignEvaluator",
            Self::AddItem { .. } => "AddItem",
            Self::RemoveItem { .. } => "RemoveItem",
            Self::AssignExecutor { .. } => "AssignExecutor",
            Self::AdvanceItemStatus { .. } => "AdvanceItemStatus",
            Self::RegisterPayment { .. } => "RegisterPayment",
            Self::RequestTransition { .. } => "RequestTransition",
            Self::Finalize => "Finalize",
        }
    }
}
