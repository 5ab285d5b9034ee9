// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use clinica::{CaseState, Outcome};
use clinica_audit::AuditEvent;
use clinica_domain::{
    Allocation, Case, Commission, CommissionRates, Installment, Item, Money, Payment, StaffRole,
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub staff_id: i64,
    pub display_name: String,
    pub role: StaffRole,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// A registered client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientRecord {
    pub client_id: i64,
    pub name: String,
    pub created_at: OffsetDateTime,
}

/// A staff member known to the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffMember {
    pub staff_id: i64,
    pub display_name: String,
    pub role: StaffRole,
    pub is_active: bool,
}

/// A catalog entry to create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProcedure {
    pub name: String,
    pub price: Money,
    pub rates: CommissionRates,
    pub is_active: bool,
}

/// A payment together with the way it was split across items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRecord {
    pub payment: Payment,
    pub allocations: Vec<Allocation>,
}

/// Everything stored for one case, with its balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseSummary {
    pub case: Case,
    pub items: Vec<Item>,
    pub payments: Vec<PaymentRecord>,
    pub commissions: Vec<Commission>,
    pub installments: Vec<Installment>,
    /// Sum of item prices.
    pub total_due: Money,
    /// Sum of payments received.
    pub total_paid: Money,
    /// Saldo devedor, never negative.
    pub outstanding: Money,
}

/// One row of a case's audit trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseEventRecord {
    pub event_id: i64,
    pub case_id: i64,
    pub event: AuditEvent,
    pub created_at: OffsetDateTime,
}

/// A line of the awaiting-payment report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitingPaymentEntry {
    pub case_id: i64,
    pub client_id: i64,
    pub client_name: String,
    pub total_due: Money,
    pub total_paid: Money,
    pub outstanding: Money,
    /// Due date of the earliest unpaid installment, if any were scheduled.
    pub next_due_date: Option<Date>,
}

/// The result of a command committed to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedCommand {
    /// The `case_events` row written for this command.
    pub event_id: i64,
    /// The case state after the command.
    pub state: CaseState,
    /// What the command changed.
    pub outcome: Outcome,
    /// Id of the row the command created: the item for `AddItem`, the
    /// payment for `RegisterPayment`.
    pub created_id: Option<i64>,
}

/// The result of opening a case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedCase {
    pub case: Case,
    pub event_id: i64,
}
