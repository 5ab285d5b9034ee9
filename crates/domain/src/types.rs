// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Lifecycle state of a treatment case (atendimento).
///
/// Valid edges:
/// - `Triage` → `Evaluation`
/// - `Evaluation` → `AwaitingPayment`
/// - `AwaitingPayment` → `InExecution`
/// - `InExecution` → `Finalized`
/// - `InExecution` → `AwaitingPayment` (only when a new item is added)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    /// Initial state after creation.
    #[default]
    Triage,
    /// Being evaluated; items are proposed and may be removed.
    Evaluation,
    /// Waiting for at least one item to be fully paid.
    AwaitingPayment,
    /// Execution unlocked.
    InExecution,
    /// Closed. Commissions generated. Read-only.
    Finalized,
}

impl CaseStatus {
    /// All states in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Triage,
        Self::Evaluation,
        Self::AwaitingPayment,
        Self::InExecution,
        Self::Finalized,
    ];

    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Triage => "triage",
            Self::Evaluation => "evaluation",
            Self::AwaitingPayment => "awaiting_payment",
            Self::InExecution => "in_execution",
            Self::Finalized => "finalized",
        }
    }

    /// Returns the label shown to clinic staff.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Triage => "triagem",
            Self::Evaluation => "avaliação",
            Self::AwaitingPayment => "aguardando pagamento",
            Self::InExecution => "em execução",
            Self::Finalized => "finalizado",
        }
    }

    /// Checks whether `self → target` is an edge of the lifecycle graph.
    ///
    /// This includes the lateral `InExecution → AwaitingPayment` edge.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Triage, Self::Evaluation)
                | (Self::Evaluation, Self::AwaitingPayment)
                | (Self::AwaitingPayment, Self::InExecution)
                | (Self::InExecution, Self::Finalized | Self::AwaitingPayment)
        )
    }

    /// Checks whether `self → target` may be requested explicitly.
    ///
    /// The lateral edge back to `AwaitingPayment` is excluded: only adding
    /// an item during execution takes it.
    #[must_use]
    pub const fn can_request_transition_to(&self, target: Self) -> bool {
        self.can_transition_to(target)
            && !matches!((self, target), (Self::InExecution, Self::AwaitingPayment))
    }

    /// Returns true once the case is closed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Finalized)
    }

    /// Items may be added in triage, evaluation and execution.
    #[must_use]
    pub const fn accepts_new_items(&self) -> bool {
        matches!(self, Self::Triage | Self::Evaluation | Self::InExecution)
    }

    /// Items may only be removed during evaluation.
    #[must_use]
    pub const fn allows_item_removal(&self) -> bool {
        matches!(self, Self::Evaluation)
    }

    /// Payments are accepted while awaiting payment or in execution.
    #[must_use]
    pub const fn accepts_payments(&self) -> bool {
        matches!(self, Self::AwaitingPayment | Self::InExecution)
    }

    /// Items may be worked on only once execution is unlocked.
    #[must_use]
    pub const fn allows_execution(&self) -> bool {
        matches!(self, Self::InExecution)
    }

    /// The evaluator may be set before or during evaluation.
    #[must_use]
    pub const fn allows_evaluator_assignment(&self) -> bool {
        matches!(self, Self::Triage | Self::Evaluation)
    }
}

impl std::fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CaseStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "triage" => Ok(Self::Triage),
            "evaluation" => Ok(Self::Evaluation),
            "awaiting_payment" => Ok(Self::AwaitingPayment),
            "in_execution" => Ok(Self::InExecution),
            "finalized" => Ok(Self::Finalized),
            _ => Err(DomainError::InvalidCaseStatus(s.to_string())),
        }
    }
}

/// Status of a billable item within a case.
///
/// `Pending` and `Paid` are the payment phase; `Executing` and `Done`
/// follow once work starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    /// Not fully paid.
    #[default]
    Pending,
    /// Fully paid, not started.
    Paid,
    /// Being performed.
    Executing,
    /// Completed.
    Done,
}

impl ItemStatus {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Executing => "executing",
            Self::Done => "done",
        }
    }

    /// Returns the label shown to clinic staff.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "pendente",
            Self::Paid => "pago",
            Self::Executing => "em execução",
            Self::Done => "concluído",
        }
    }

    /// Returns true for `Pending` and `Paid`.
    #[must_use]
    pub const fn is_payment_phase(&self) -> bool {
        matches!(self, Self::Pending | Self::Paid)
    }

    /// Checks whether an execution action may move the item to `target`.
    ///
    /// `Pending → Paid` is not listed: only payments make an item paid.
    #[must_use]
    pub const fn can_advance_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Pending | Self::Paid, Self::Executing) | (Self::Executing, Self::Done)
        )
    }
}

impl std::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "executing" => Ok(Self::Executing),
            "done" => Ok(Self::Done),
            _ => Err(DomainError::InvalidItemStatus(s.to_string())),
        }
    }
}

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash.
    Cash,
    /// Instant bank transfer (PIX).
    InstantTransfer,
    /// Debit card.
    DebitCard,
    /// Credit card, possibly in installments.
    CreditCard,
}

impl PaymentMethod {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::InstantTransfer => "instant_transfer",
            Self::DebitCard => "debit_card",
            Self::CreditCard => "credit_card",
        }
    }

    /// Validates the card installment count for this method.
    ///
    /// Every method takes at least one installment; only credit card
    /// payments may be split into more.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidInstallmentCount` otherwise.
    pub const fn validate_installment_count(&self, count: u32) -> Result<(), DomainError> {
        match (self, count) {
            (_, 0) => Err(DomainError::InvalidInstallmentCount(count)),
            (Self::CreditCard, _) | (_, 1) => Ok(()),
            _ => Err(DomainError::InvalidInstallmentCount(count)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "instant_transfer" => Ok(Self::InstantTransfer),
            "debit_card" => Ok(Self::DebitCard),
            "credit_card" => Ok(Self::CreditCard),
            _ => Err(DomainError::InvalidPaymentMethod(s.to_string())),
        }
    }
}

/// What a commission rewards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommissionKind {
    /// Paid to whoever sold the item.
    Sale,
    /// Paid to whoever performed the item.
    Execution,
}

impl CommissionKind {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sale => "sale",
            Self::Execution => "execution",
        }
    }
}

impl std::fmt::Display for CommissionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CommissionKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sale" => Ok(Self::Sale),
            "execution" => Ok(Self::Execution),
            _ => Err(DomainError::InvalidCommissionKind(s.to_string())),
        }
    }
}

/// Role of a clinic staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaffRole {
    /// Full authority.
    Admin,
    /// Evaluates cases (avaliador).
    Evaluator,
    /// Performs procedures.
    Executor,
    /// Front desk: opens cases and receives payments.
    Receptionist,
}

impl StaffRole {
    /// Returns the persisted string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Evaluator => "evaluator",
            Self::Executor => "executor",
            Self::Receptionist => "receptionist",
        }
    }

    /// Returns true for administrators.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Executor or admin.
    #[must_use]
    pub const fn is_executor_or_admin(&self) -> bool {
        matches!(self, Self::Executor | Self::Admin)
    }

    /// Evaluator or admin.
    #[must_use]
    pub const fn is_evaluator_or_admin(&self) -> bool {
        matches!(self, Self::Evaluator | Self::Admin)
    }
}

impl std::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "evaluator" => Ok(Self::Evaluator),
            "executor" => Ok(Self::Executor),
            "receptionist" => Ok(Self::Receptionist),
            _ => Err(DomainError::InvalidStaffRole(s.to_string())),
        }
    }
}
