// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use clinica::CoreError;
use clinica_domain::{DomainError, TransitionBlocker};
use clinica_persistence::PersistenceError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::error;

/// Authentication and authorization errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The caller could not be identified as an active staff member.
    #[error("Authentication failed: {reason}")]
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// The caller's role does not allow the action.
    #[error("Unauthorized: '{action}' requires {required_role} role")]
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

/// Structured detail of a refused `in_execution → finalized` edge, so a
/// client can render its own message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementDetail {
    /// Items not yet done.
    pub incomplete_items: usize,
    /// Sum of item prices.
    pub total_due: String,
    /// Sum of payments received.
    pub total_paid: String,
    /// What is still owed.
    pub outstanding: String,
}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
/// `Display` yields the message shown to clinic staff.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The caller could not be authenticated.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The requested status change is not part of the lifecycle graph.
    InvalidTransition {
        /// A human-readable description.
        message: String,
    },
    /// The status change is valid but its guard is not met.
    PreconditionFailed {
        /// A human-readable description of the failing guard.
        message: String,
        /// Counts and amounts, when the finalization guard failed.
        settlement: Option<SettlementDetail>,
    },
    /// Allocations do not match the payment or would overpay an item.
    OverAllocation {
        /// A human-readable description.
        message: String,
    },
    /// A business rule forbids the action.
    PolicyViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// The actor may not perform the action.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// A human-readable description.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::ResourceNotFound { message, .. }
            | Self::InvalidTransition { message }
            | Self::PreconditionFailed { message, .. }
            | Self::OverAllocation { message }
            | Self::PolicyViolation { message, .. }
            | Self::Unauthorized { message, .. }
            | Self::InvalidInput { message, .. } => write!(f, "{message}"),
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match &err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed {
                reason: reason.clone(),
            },
            AuthError::Unauthorized { action, .. } => Self::Unauthorized {
                action: action.clone(),
                message: err.to_string(),
            },
        }
    }
}

fn not_found(resource_type: &str, err: &DomainError) -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: resource_type.to_string(),
        message: err.to_string(),
    }
}

fn policy(rule: &str, err: &DomainError) -> ApiError {
    ApiError::PolicyViolation {
        rule: rule.to_string(),
        message: err.to_string(),
    }
}

fn invalid(field: &str, err: &DomainError) -> ApiError {
    ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
/// The message is always the domain's own wording.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match &err {
        DomainError::CaseNotFound(_) => not_found("Case", &err),
        DomainError::ItemNotFound(_) | DomainError::ItemNotInCase { .. } => {
            not_found("Item", &err)
        }
        DomainError::ProcedureNotFound(_) => not_found("Procedure", &err),
        DomainError::ClientNotFound(_) => not_found("Client", &err),
        DomainError::StaffNotFound(_) => not_found("Staff member", &err),
        DomainError::PaymentNotFound(_) => not_found("Payment", &err),
        DomainError::InstallmentNotFound(_) => not_found("Installment", &err),
        DomainError::InvalidTransition { .. } | DomainError::InvalidItemStatusTransition { .. } => {
            ApiError::InvalidTransition {
                message: err.to_string(),
            }
        }
        DomainError::PreconditionFailed { blocker, .. } => ApiError::PreconditionFailed {
            message: err.to_string(),
            settlement: match blocker {
                TransitionBlocker::Unsettled {
                    incomplete_items,
                    total_due,
                    total_paid,
                } => Some(SettlementDetail {
                    incomplete_items: *incomplete_items,
                    total_due: total_due.to_string(),
                    total_paid: total_paid.to_string(),
                    outstanding: blocker.outstanding().to_string(),
                }),
                TransitionBlocker::NoItems | TransitionBlocker::NoFullyPaidItem => None,
            },
        },
        DomainError::AllocationSumMismatch { .. }
        | DomainError::ItemOverpaid { .. }
        | DomainError::AmountExceedsOutstanding { .. } => ApiError::OverAllocation {
            message: err.to_string(),
        },
        DomainError::CaseFinalized(_) => policy("case_finalized", &err),
        DomainError::ItemRemovalNotAllowed(_) => policy("item_removal", &err),
        DomainError::ItemsNotAccepted(_) => policy("item_creation", &err),
        DomainError::PaymentsNotAccepted(_) => policy("payment_registration", &err),
        DomainError::ExecutionNotUnlocked(_) => policy("execution_unlock", &err),
        DomainError::EvaluatorAssignmentNotAllowed(_) => policy("evaluator_assignment", &err),
        DomainError::ProcedureInactive(_) => policy("active_procedure", &err),
        DomainError::ItemAlreadyCompleted(_) => policy("item_completed", &err),
        DomainError::InstallmentAlreadySettled(_) => policy("installment_settled", &err),
        DomainError::InstallmentReplaced(_) => policy("installment_replaced", &err),
        DomainError::PaymentFromOtherCase { .. } => policy("installment_payment_case", &err),
        DomainError::NotAssignedExecutor { .. } => ApiError::Unauthorized {
            action: String::from("advance_item_status"),
            message: err.to_string(),
        },
        DomainError::InvalidCaseStatus(_) => invalid("status", &err),
        DomainError::InvalidItemStatus(_) => invalid("status", &err),
        DomainError::InvalidPaymentMethod(_) => invalid("method", &err),
        DomainError::InvalidCommissionKind(_) => invalid("kind", &err),
        DomainError::InvalidStaffRole(_) => invalid("role", &err),
        DomainError::InvalidAmount(_) | DomainError::AmountOverflow => invalid("amount", &err),
        DomainError::InvalidPercentage(_) => invalid("percentage", &err),
        DomainError::NonPositiveAmount { field, .. } => invalid(field, &err),
        DomainError::EmptyAllocation | DomainError::DuplicateAllocationItem(_) => {
            invalid("allocations", &err)
        }
        DomainError::InvalidInstallmentCount(_) => invalid("installment_count", &err),
        DomainError::DateArithmeticOverflow => invalid("date", &err),
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
    }
}

/// Translates a persistence error into an API error.
///
/// Rejected commands keep their structured reason. Store failures become
/// an opaque `Internal` error and are logged here.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::CommandRejected(core_err) => translate_core_error(core_err),
        PersistenceError::ConcurrentModification(message) => ApiError::OverAllocation { message },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message,
        },
        PersistenceError::DatabaseError(_)
        | PersistenceError::DatabaseConnectionFailed(_)
        | PersistenceError::MigrationFailed(_)
        | PersistenceError::QueryFailed(_)
        | PersistenceError::SerializationError(_)
        | PersistenceError::InitializationError(_)
        | PersistenceError::ForeignKeyEnforcementNotEnabled
        | PersistenceError::ReconstructionError(_) => {
            error!(error = %err, "Store failure");
            ApiError::Internal {
                message: err.to_string(),
            }
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        translate_persistence_error(err)
    }
}
