// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the clinic case engine.
//!
//! Request handlers call into this crate with DTOs; it resolves the
//! external collaborators (procedure catalog, identity service, client
//! registry), checks roles, runs one store operation and translates every
//! failure into an [`ApiError`] whose message can be shown to clinic staff.

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
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod collaborators;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthenticationService, AuthorizationService};
pub use collaborators::{CaseStore, ClientRegistry, IdentityService, ProcedureCatalog};
pub use error::{
    ApiError, AuthError, SettlementDetail, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{
    advance_item_status, assign_evaluator, awaiting_payment_report, create_item, finalize_case,
    get_case_summary, open_case, register_payment, register_payment_proportional, remove_item,
    request_transition, schedule_installments, settle_installment, update_item_executor,
};
pub use request_response::{
    AdvanceItemStatusRequest, AllocationInfo, AllocationLine, AssignEvaluatorRequest,
    AwaitingPaymentInfo, AwaitingPaymentReportResponse, CaseCommandResponse, CaseInfo,
    CaseSummaryResponse, CommissionInfo, CreateItemRequest, CreateItemResponse,
    FinalizeCaseResponse, InstallmentInfo, ItemCommandResponse, ItemCommissionInfo, ItemInfo,
    OpenCaseRequest, OpenCaseResponse, PaymentInfo, RegisterPaymentRequest,
    RegisterPaymentResponse, RegisterProportionalPaymentRequest, RequestTransitionRequest,
    ScheduleInstallmentsRequest, ScheduleInstallmentsResponse, SettleInstallmentRequest,
    UpdateItemExecutorRequest,
};
