// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod case;
mod commission;
mod error;
mod installment;
mod item;
mod lifecycle;
mod money;
mod payment;
mod procedure;
mod types;

#[cfg(test)]
mod tests;

pub use case::{Case, NewCase};
pub use commission::{
    Commission, CommissionDraft, CommissionSummary, ItemCommissionDetail, derive_commissions,
};
pub use error::{DomainError, ErrorKind, TransitionBlocker};
pub use installment::{Installment, InstallmentPlanEntry, split_into_installments};
pub use item::{Item, NewItem, incomplete_items, paid_items, unpaid_items};
pub use lifecycle::{GuardContext, check_transition, is_valid_status_walk};
pub use money::{Money, Percentage};
pub use payment::{
    ALLOCATION_TOLERANCE, Allocation, AllocationRequest, NewPayment, Payment,
    distribute_proportionally, validate_allocations,
};
pub use procedure::{CommissionRates, Procedure};
pub use types::{CaseStatus, CommissionKind, ItemStatus, PaymentMethod, StaffRole};
