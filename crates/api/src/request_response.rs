// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Monetary amounts cross the boundary as decimal strings ("150.00"),
//! timestamps as RFC 3339 strings and due dates as `YYYY-MM-DD`.

use serde::{Deserialize, Serialize};

/// API request to open a case for an existing client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCaseRequest {
    /// The client the case is for.
    pub client_id: i64,
    /// The evaluator, if already known.
    #[serde(default)]
    pub evaluator_id: Option<i64>,
    /// Free-text notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// API request to set or replace the evaluator of a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignEvaluatorRequest {
    /// The evaluator's staff id.
    pub evaluator_id: i64,
}

/// API request to attach a procedure to a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemRequest {
    /// Catalog procedure being sold.
    pub procedure_id: i64,
    /// Who sold it. Defaults to the acting staff member.
    #[serde(default)]
    pub seller_id: Option<i64>,
    /// Who will perform it.
    #[serde(default)]
    pub executor_id: Option<i64>,
    /// Replaces the catalog price when present.
    #[serde(default)]
    pub price_override: Option<String>,
}

/// API request to set the executor of an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateItemExecutorRequest {
    /// The executor's staff id.
    pub executor_id: i64,
}

/// API request to move an item to `executing` or `done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceItemStatusRequest {
    /// Target item status.
    pub status: String,
}

/// One line of an explicit payment split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationLine {
    /// The item receiving the money.
    pub item_id: i64,
    /// Amount applied to it.
    pub amount: String,
}

/// API request to register a payment with an explicit split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPaymentRequest {
    /// Total received.
    pub amount: String,
    /// Payment method (`cash`, `instant_transfer`, `debit_card`, `credit_card`).
    pub method: String,
    /// Card installments. Defaults to 1.
    #[serde(default)]
    pub installment_count: Option<u32>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// How the amount is split across items.
    pub allocations: Vec<AllocationLine>,
}

/// API request to register a payment split in proportion to what each
/// item still owes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterProportionalPaymentRequest {
    /// Total received.
    pub amount: String,
    /// Payment method.
    pub method: String,
    /// Card installments. Defaults to 1.
    #[serde(default)]
    pub installment_count: Option<u32>,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
}

/// API request to move a case along the lifecycle graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTransitionRequest {
    /// Target case status.
    pub target: String,
}

/// API request to split the outstanding balance into installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInstallmentsRequest {
    /// Number of installments.
    pub count: u32,
    /// Due date of the first one (`YYYY-MM-DD`).
    pub first_due_date: String,
    /// Days between due dates.
    pub interval_days: u32,
}

/// API request to settle an installment with a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettleInstallmentRequest {
    /// The payment that covered it.
    pub payment_id: i64,
}

/// A case as seen by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseInfo {
    /// Case identifier.
    pub case_id: i64,
    /// Client identifier.
    pub client_id: i64,
    /// Evaluator, if assigned.
    pub evaluator_id: Option<i64>,
    /// Who unlocked execution.
    pub liberator_id: Option<i64>,
    /// Persisted status value.
    pub status: String,
    /// Status label for display.
    pub status_label: String,
    /// Free-text notes.
    pub notes: Option<String>,
    /// When the case was opened.
    pub created_at: String,
    /// When execution was unlocked.
    pub unlocked_at: Option<String>,
    /// When the case was finalized.
    pub finalized_at: Option<String>,
}

/// An item as seen by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    /// Item identifier.
    pub item_id: i64,
    /// Catalog procedure.
    pub procedure_id: i64,
    /// Who sold it.
    pub seller_id: Option<i64>,
    /// Who performs it.
    pub executor_id: Option<i64>,
    /// Price agreed for this item.
    pub price: String,
    /// Amount applied so far.
    pub amount_paid: String,
    /// Price minus amount paid.
    pub outstanding: String,
    /// Persisted status value.
    pub status: String,
    /// When it was added.
    pub created_at: String,
    /// When it was done.
    pub completed_at: Option<String>,
}

/// An allocation as seen by API clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationInfo {
    /// The item that received the money.
    pub item_id: i64,
    /// Amount applied.
    pub amount_applied: String,
}

/// A payment and its split.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentInfo {
    /// Payment identifier.
    pub payment_id: i64,
    /// Who received it.
    pub receiver_id: Option<i64>,
    /// Total received.
    pub amount: String,
    /// Payment method.
    pub method: String,
    /// Card installments.
    pub installment_count: u32,
    /// Free-text note.
    pub note: Option<String>,
    /// When it was received.
    pub created_at: String,
    /// Split across items.
    pub allocations: Vec<AllocationInfo>,
}

/// A stored commission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionInfo {
    /// Commission identifier.
    pub commission_id: i64,
    /// Item it was earned on.
    pub item_id: i64,
    /// Staff member earning it.
    pub beneficiary_id: i64,
    /// `sale` or `execution`.
    pub kind: String,
    /// Rate applied.
    pub percentage: String,
    /// Item price the rate was applied to.
    pub base_amount: String,
    /// Amount earned.
    pub commission_amount: String,
}

/// An installment of a case's balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallmentInfo {
    /// Installment identifier.
    pub installment_id: i64,
    /// Sequence number within the case.
    pub number: u32,
    /// Amount due.
    pub amount: String,
    /// Due date.
    pub due_date: String,
    /// Whether it has been settled.
    pub paid: bool,
    /// The payment that settled it.
    pub payment_id: Option<i64>,
    /// When it was settled.
    pub paid_at: Option<String>,
    /// Whether a later schedule superseded it.
    pub replaced: bool,
}

/// API response for opening a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenCaseResponse {
    /// The new case.
    pub case: CaseInfo,
    /// The audit event recording the opening.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for commands that only change the case or one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseCommandResponse {
    /// The case after the command.
    pub case: CaseInfo,
    /// The audit event recording the command.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for attaching an item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateItemResponse {
    /// The stored item.
    pub item: ItemInfo,
    /// The case after the command.
    pub case: CaseInfo,
    /// True if the case fell back from `in_execution` to `awaiting_payment`.
    pub reopened: bool,
    /// The audit event recording the command.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for an item status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCommandResponse {
    /// The item after the command.
    pub item: ItemInfo,
    /// The audit event recording the command.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response for a registered payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterPaymentResponse {
    /// The stored payment.
    pub payment_id: i64,
    /// Total received.
    pub amount: String,
    /// How it was split.
    pub allocations: Vec<AllocationInfo>,
    /// Case balance after the payment.
    pub outstanding: String,
    /// The audit event recording the command.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// Commission detail for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCommissionInfo {
    /// The item.
    pub item_id: i64,
    /// Its catalog procedure.
    pub procedure_id: i64,
    /// Item price.
    pub price: String,
    /// Seller, if any.
    pub seller_id: Option<i64>,
    /// Sale commission (zero if no seller).
    pub sale_commission: String,
    /// Executor, if any.
    pub executor_id: Option<i64>,
    /// Execution commission (zero if no executor).
    pub execution_commission: String,
}

/// API response for closing a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizeCaseResponse {
    /// The finalized case.
    pub case: CaseInfo,
    /// Sum of sale commissions.
    pub sale_total: String,
    /// Sum of execution commissions.
    pub execution_total: String,
    /// Sum of both.
    pub grand_total: String,
    /// Per-item breakdown.
    pub per_item: Vec<ItemCommissionInfo>,
    /// The audit event recording the command.
    pub event_id: i64,
    /// A success message.
    pub message: String,
}

/// API response listing a case's installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleInstallmentsResponse {
    /// The case.
    pub case_id: i64,
    /// Every installment of the case, in order.
    pub installments: Vec<InstallmentInfo>,
    /// A success message.
    pub message: String,
}

/// API response with everything recorded for one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseSummaryResponse {
    /// The case.
    pub case: CaseInfo,
    /// Its items.
    pub items: Vec<ItemInfo>,
    /// Its payments.
    pub payments: Vec<PaymentInfo>,
    /// Commissions, once finalized.
    pub commissions: Vec<CommissionInfo>,
    /// Its installments.
    pub installments: Vec<InstallmentInfo>,
    /// Sum of item prices.
    pub total_due: String,
    /// Sum of payments received.
    pub total_paid: String,
    /// Saldo devedor.
    pub outstanding: String,
}

/// One case waiting for payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingPaymentInfo {
    /// The case.
    pub case_id: i64,
    /// The client.
    pub client_id: i64,
    /// Client name.
    pub client_name: String,
    /// Sum of item prices.
    pub total_due: String,
    /// Sum of payments received.
    pub total_paid: String,
    /// Still owed.
    pub outstanding: String,
    /// Due date of the earliest unpaid installment.
    pub next_due_date: Option<String>,
}

/// API response for the awaiting-payment report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwaitingPaymentReportResponse {
    /// One entry per case in `awaiting_payment`.
    pub cases: Vec<AwaitingPaymentInfo>,
}
