// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::money::Money;
use crate::types::{CaseStatus, ItemStatus};

/// Classification of domain errors as seen by callers.
///
/// Every rejection maps to exactly one kind so the boundary layer can
/// choose a response without inspecting individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced case, item, procedure, client or staff member does not exist.
    NotFound,
    /// The requested case status edge is not part of the lifecycle graph.
    InvalidTransition,
    /// The edge exists but its guard condition is not met.
    PreconditionFailed,
    /// Allocations do not sum to the payment, or would overpay an item.
    OverAllocation,
    /// Structurally valid but forbidden by a business rule.
    PolicyViolation,
    /// The actor is not allowed to perform the action.
    AuthorizationDenied,
    /// A value could not be parsed or is out of range.
    InvalidInput,
}

/// Why a guarded case status edge was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionBlocker {
    /// `evaluation → awaiting_payment` with no items attached.
    NoItems,
    /// `awaiting_payment → in_execution` with no fully paid item.
    NoFullyPaidItem,
    /// `in_execution → finalized` with unfinished work or an open balance.
    Unsettled {
        /// Items whose status is not `done`.
        incomplete_items: usize,
        /// Sum of all item prices.
        total_due: Money,
        /// Sum of all payments received for the case.
        total_paid: Money,
    },
}

impl TransitionBlocker {
    /// Outstanding balance carried by an `Unsettled` blocker.
    #[must_use]
    pub fn outstanding(&self) -> Money {
        match self {
            Self::Unsettled {
                total_due,
                total_paid,
                ..
            } => total_due.saturating_sub(*total_paid),
            Self::NoItems | Self::NoFullyPaidItem => Money::ZERO,
        }
    }
}

impl std::fmt::Display for TransitionBlocker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoItems => write!(
                f,
                "o atendimento precisa de ao menos um procedimento para seguir para pagamento"
            ),
            Self::NoFullyPaidItem => write!(
                f,
                "é necessário pelo menos um procedimento totalmente pago para liberar a execução"
            ),
            Self::Unsettled {
                incomplete_items,
                total_due,
                total_paid,
            } => {
                let mut reasons: Vec<String> = Vec::new();
                if *incomplete_items > 0 {
                    reasons.push(format!(
                        "existem procedimentos não concluídos ({incomplete_items})"
                    ));
                }
                if total_paid < total_due {
                    reasons.push(format!(
                        "pagamento incompleto: total {total_due}, pago {total_paid}"
                    ));
                }
                write!(f, "{}", reasons.join("; "))
            }
        }
    }
}

/// Errors that can occur while applying clinic business rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Case does not exist.
    CaseNotFound(i64),
    /// Item does not exist.
    ItemNotFound(i64),
    /// Item exists but belongs to another case.
    ItemNotInCase {
        /// The case the caller addressed.
        case_id: i64,
        /// The item that is not part of it.
        item_id: i64,
    },
    /// Procedure does not exist in the catalog.
    ProcedureNotFound(i64),
    /// Client does not exist in the registry.
    ClientNotFound(i64),
    /// Staff member does not exist.
    StaffNotFound(i64),
    /// Payment does not exist.
    PaymentNotFound(i64),
    /// Installment does not exist.
    InstallmentNotFound(i64),
    /// The requested edge is not in the lifecycle graph.
    InvalidTransition {
        /// Current case status.
        from: CaseStatus,
        /// Requested case status.
        to: CaseStatus,
    },
    /// The edge exists but its guard refused it.
    PreconditionFailed {
        /// Current case status.
        from: CaseStatus,
        /// Requested case status.
        to: CaseStatus,
        /// The failing guard with its detail.
        blocker: TransitionBlocker,
    },
    /// Item status cannot move from `from` to `to`.
    InvalidItemStatusTransition {
        /// The item.
        item_id: i64,
        /// Current item status.
        from: ItemStatus,
        /// Requested item status.
        to: ItemStatus,
    },
    /// Allocations do not add up to the payment amount.
    AllocationSumMismatch {
        /// The payment total.
        payment_amount: Money,
        /// The sum of all allocations.
        allocated: Money,
    },
    /// An allocation would push an item above its price.
    ItemOverpaid {
        /// The item.
        item_id: i64,
        /// Item price.
        price: Money,
        /// Amount already paid before this allocation.
        amount_paid: Money,
        /// Amount the allocation tried to apply.
        applied: Money,
    },
    /// Amount to distribute is larger than everything still owed.
    AmountExceedsOutstanding {
        /// Amount requested.
        amount: Money,
        /// Total outstanding across the case.
        outstanding: Money,
    },
    /// The case is finalized; nothing about it may change.
    CaseFinalized(i64),
    /// Items may only be removed while the case is in evaluation.
    ItemRemovalNotAllowed(CaseStatus),
    /// Items cannot be added in the current case status.
    ItemsNotAccepted(CaseStatus),
    /// Payments cannot be registered in the current case status.
    PaymentsNotAccepted(CaseStatus),
    /// Items can only be executed once the case is in execution.
    ExecutionNotUnlocked(CaseStatus),
    /// The evaluator can no longer be changed.
    EvaluatorAssignmentNotAllowed(CaseStatus),
    /// Procedure is inactive and cannot be sold.
    ProcedureInactive(i64),
    /// Item is already done.
    ItemAlreadyCompleted(i64),
    /// Installment has already been settled.
    InstallmentAlreadySettled(i64),
    /// Installment was superseded by a later schedule.
    InstallmentReplaced(i64),
    /// Payment belongs to another case.
    PaymentFromOtherCase {
        /// The payment.
        payment_id: i64,
        /// The case the installment belongs to.
        case_id: i64,
    },
    /// Actor is not the executor assigned to the item.
    NotAssignedExecutor {
        /// The item.
        item_id: i64,
        /// The acting staff member.
        actor_id: i64,
    },
    /// Unknown case status string.
    InvalidCaseStatus(String),
    /// Unknown item status string.
    InvalidItemStatus(String),
    /// Unknown payment method string.
    InvalidPaymentMethod(String),
    /// Unknown commission kind string.
    InvalidCommissionKind(String),
    /// Unknown staff role string.
    InvalidStaffRole(String),
    /// Monetary amount could not be parsed.
    InvalidAmount(String),
    /// Percentage could not be parsed or is outside 0..=100.
    InvalidPercentage(String),
    /// Amount must be strictly positive.
    NonPositiveAmount {
        /// The field holding the amount.
        field: &'static str,
        /// The rejected value.
        amount: Money,
    },
    /// A payment must be allocated to at least one item.
    EmptyAllocation,
    /// The same item appears twice in one payment.
    DuplicateAllocationItem(i64),
    /// Installment count is zero or not allowed for the payment method.
    InvalidInstallmentCount(u32),
    /// Monetary arithmetic overflowed.
    AmountOverflow,
    /// Date arithmetic overflowed.
    DateArithmeticOverflow,
}

impl DomainError {
    /// Returns the error classification.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::CaseNotFound(_)
            | Self::ItemNotFound(_)
            | Self::ItemNotInCase { .. }
            | Self::ProcedureNotFound(_)
            | Self::ClientNotFound(_)
            | Self::StaffNotFound(_)
            | Self::PaymentNotFound(_)
            | Self::InstallmentNotFound(_) => ErrorKind::NotFound,
            Self::InvalidTransition { .. } | Self::InvalidItemStatusTransition { .. } => {
                ErrorKind::InvalidTransition
            }
            Self::PreconditionFailed { .. } => ErrorKind::PreconditionFailed,
            Self::AllocationSumMismatch { .. }
            | Self::ItemOverpaid { .. }
            | Self::AmountExceedsOutstanding { .. } => ErrorKind::OverAllocation,
            Self::CaseFinalized(_)
            | Self::ItemRemovalNotAllowed(_)
            | Self::ItemsNotAccepted(_)
            | Self::PaymentsNotAccepted(_)
            | Self::ExecutionNotUnlocked(_)
            | Self::EvaluatorAssignmentNotAllowed(_)
            | Self::ProcedureInactive(_)
            | Self::ItemAlreadyCompleted(_)
            | Self::InstallmentAlreadySettled(_)
            | Self::InstallmentReplaced(_)
            | Self::PaymentFromOtherCase { .. } => ErrorKind::PolicyViolation,
            Self::NotAssignedExecutor { .. } => ErrorKind::AuthorizationDenied,
            Self::InvalidCaseStatus(_)
            | Self::InvalidItemStatus(_)
            | Self::InvalidPaymentMethod(_)
            | Self::InvalidCommissionKind(_)
            | Self::InvalidStaffRole(_)
            | Self::InvalidAmount(_)
            | Self::InvalidPercentage(_)
            | Self::NonPositiveAmount { .. }
            | Self::EmptyAllocation
            | Self::DuplicateAllocationItem(_)
            | Self::InvalidInstallmentCount(_)
            | Self::AmountOverflow
            | Self::DateArithmeticOverflow => ErrorKind::InvalidInput,
        }
    }
}

impl std::fmt::Display for DomainError {
    #[allow(clippy::too_many_lines)]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CaseNotFound(id) => write!(f, "atendimento {id} não encontrado"),
            Self::ItemNotFound(id) => write!(f, "procedimento do atendimento {id} não encontrado"),
            Self::ItemNotInCase { case_id, item_id } => write!(
                f,
                "procedimento {item_id} não pertence ao atendimento {case_id}"
            ),
            Self::ProcedureNotFound(id) => {
                write!(f, "procedimento {id} não encontrado no catálogo")
            }
            Self::ClientNotFound(id) => write!(f, "cliente {id} não encontrado"),
            Self::StaffNotFound(id) => write!(f, "usuário {id} não encontrado"),
            Self::PaymentNotFound(id) => write!(f, "pagamento {id} não encontrado"),
            Self::InstallmentNotFound(id) => write!(f, "parcela {id} não encontrada"),
            Self::InvalidTransition { from, to } => write!(
                f,
                "transição não permitida: de '{}' para '{}'",
                from.label(),
                to.label()
            ),
            Self::PreconditionFailed { from, to, blocker } => write!(
                f,
                "não é possível passar de '{}' para '{}': {blocker}",
                from.label(),
                to.label()
            ),
            Self::InvalidItemStatusTransition { item_id, from, to } => write!(
                f,
                "procedimento {item_id} não pode passar de '{}' para '{}'",
                from.label(),
                to.label()
            ),
            Self::AllocationSumMismatch {
                payment_amount,
                allocated,
            } => write!(
                f,
                "a soma distribuída ({allocated}) difere do valor do pagamento ({payment_amount})"
            ),
            Self::ItemOverpaid {
                item_id,
                price,
                amount_paid,
                applied,
            } => write!(
                f,
                "procedimento {item_id} ficaria pago acima do valor: preço {price}, pago {amount_paid}, aplicado {applied}"
            ),
            Self::AmountExceedsOutstanding {
                amount,
                outstanding,
            } => write!(
                f,
                "valor {amount} excede o saldo devedor de {outstanding}"
            ),
            Self::CaseFinalized(id) => write!(f, "atendimento {id} já foi finalizado"),
            Self::ItemRemovalNotAllowed(status) => write!(
                f,
                "procedimentos só podem ser removidos durante a avaliação (status atual: '{}')",
                status.label()
            ),
            Self::ItemsNotAccepted(status) => write!(
                f,
                "não é possível adicionar procedimentos com o atendimento em '{}'",
                status.label()
            ),
            Self::PaymentsNotAccepted(status) => write!(
                f,
                "não é possível registrar pagamentos com o atendimento em '{}'",
                status.label()
            ),
            Self::ExecutionNotUnlocked(status) => write!(
                f,
                "a execução ainda não foi liberada (status atual: '{}')",
                status.label()
            ),
            Self::EvaluatorAssignmentNotAllowed(status) => write!(
                f,
                "o avaliador não pode ser alterado com o atendimento em '{}'",
                status.label()
            ),
            Self::ProcedureInactive(id) => write!(f, "procedimento {id} está inativo"),
            Self::ItemAlreadyCompleted(id) => write!(f, "procedimento {id} já foi concluído"),
            Self::InstallmentAlreadySettled(id) => write!(f, "parcela {id} já foi quitada"),
            Self::InstallmentReplaced(id) => {
                write!(f, "parcela {id} foi substituída por um novo parcelamento")
            }
            Self::PaymentFromOtherCase {
                payment_id,
                case_id,
            } => write!(
                f,
                "pagamento {payment_id} não pertence ao atendimento {case_id}"
            ),
            Self::NotAssignedExecutor { item_id, actor_id } => write!(
                f,
                "usuário {actor_id} não é o executor responsável pelo procedimento {item_id}"
            ),
            Self::InvalidCaseStatus(s) => write!(f, "status de atendimento inválido: '{s}'"),
            Self::InvalidItemStatus(s) => write!(f, "status de procedimento inválido: '{s}'"),
            Self::InvalidPaymentMethod(s) => write!(f, "forma de pagamento inválida: '{s}'"),
            Self::InvalidCommissionKind(s) => write!(f, "tipo de comissão inválido: '{s}'"),
            Self::InvalidStaffRole(s) => write!(f, "perfil de usuário inválido: '{s}'"),
            Self::InvalidAmount(s) => write!(f, "valor monetário inválido: '{s}'"),
            Self::InvalidPercentage(s) => write!(f, "percentual inválido: '{s}'"),
            Self::NonPositiveAmount { field, amount } => {
                write!(f, "o campo '{field}' deve ser maior que zero (recebido {amount})")
            }
            Self::EmptyAllocation => write!(
                f,
                "o pagamento deve ser distribuído em pelo menos um procedimento"
            ),
            Self::DuplicateAllocationItem(id) => write!(
                f,
                "procedimento {id} aparece mais de uma vez na distribuição do pagamento"
            ),
            Self::InvalidInstallmentCount(count) => {
                write!(f, "quantidade de parcelas inválida: {count}")
            }
            Self::AmountOverflow => write!(f, "valor monetário fora do limite suportado"),
            Self::DateArithmeticOverflow => write!(f, "data fora do limite suportado"),
        }
    }
}

impl std::error::Error for DomainError {}
