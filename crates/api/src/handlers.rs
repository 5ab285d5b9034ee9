// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for state-changing and read-only operations.
//!
//! Each handler translates a request DTO into domain values, consults the
//! external collaborators it needs, runs exactly one store operation and
//! maps the result back into a response DTO.

use clinica::{CaseState, Command, Outcome};
use clinica_audit::Cause;
use clinica_domain::{
    Allocation, AllocationRequest, Case, CaseStatus, Commission, DomainError, Installment, Item,
    ItemCommissionDetail, ItemStatus, Money, Payment, PaymentMethod, Procedure,
    distribute_proportionally,
};
use clinica_persistence::{
    AwaitingPaymentEntry, CaseSummary, CommittedCommand, OpenedCase, PaymentRecord,
};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use tracing::info;

use crate::auth::{AuthenticatedActor, AuthorizationService, ensure_staff_exists};
use crate::collaborators::{CaseStore, ClientRegistry, IdentityService, ProcedureCatalog};
use crate::error::{ApiError, translate_domain_error};
use crate::request_response::{
    AdvanceItemStatusRequest, AllocationInfo, AssignEvaluatorRequest, AwaitingPaymentInfo,
    AwaitingPaymentReportResponse, CaseCommandResponse, CaseInfo, CaseSummaryResponse,
    CommissionInfo, CreateItemRequest, CreateItemResponse, FinalizeCaseResponse,
    InstallmentInfo, ItemCommandResponse, ItemCommissionInfo, ItemInfo, OpenCaseRequest,
    OpenCaseResponse, PaymentInfo, RegisterPaymentRequest, RegisterPaymentResponse,
    RegisterProportionalPaymentRequest, RequestTransitionRequest, ScheduleInstallmentsRequest,
    ScheduleInstallmentsResponse, SettleInstallmentRequest, UpdateItemExecutorRequest,
};

// ============================================================================
// Cases
// ============================================================================

/// Opens a case in `triage` for an existing client.
///
/// # Errors
///
/// - `ResourceNotFound` if the client or the evaluator does not exist.
/// - `PolicyViolation` if the evaluator is neither an evaluator nor an admin.
/// - `Internal` if the store fails.
pub fn open_case<S>(
    store: &mut S,
    request: OpenCaseRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<OpenCaseResponse, ApiError>
where
    S: CaseStore + ClientRegistry + IdentityService + ?Sized,
{
    if !store.client_exists(request.client_id)? {
        return Err(translate_domain_error(DomainError::ClientNotFound(
            request.client_id,
        )));
    }
    if let Some(evaluator_id) = request.evaluator_id {
        AuthorizationService::ensure_evaluator_candidate(store, evaluator_id)?;
    }

    let opened: OpenedCase = store.open_case(
        request.client_id,
        request.evaluator_id,
        request.notes,
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(
        case_id = opened.case.case_id,
        client_id = opened.case.client_id,
        "Opened case"
    );
    Ok(OpenCaseResponse {
        message: format!("Atendimento {} aberto", opened.case.case_id),
        case: case_info(&opened.case)?,
        event_id: opened.event_id,
    })
}

/// Sets or replaces the evaluator of a case in `triage` or `evaluation`.
///
/// # Errors
///
/// - `ResourceNotFound` if the case or the evaluator does not exist.
/// - `PolicyViolation` if the evaluator lacks the role or the case is past
///   evaluation.
pub fn assign_evaluator<S>(
    store: &mut S,
    case_id: i64,
    request: &AssignEvaluatorRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CaseCommandResponse, ApiError>
where
    S: CaseStore + IdentityService + ?Sized,
{
    AuthorizationService::ensure_evaluator_candidate(store, request.evaluator_id)?;

    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::AssignEvaluator {
            evaluator_id: request.evaluator_id,
        },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, evaluator_id = request.evaluator_id, "Assigned evaluator");
    case_command_response(
        &committed,
        format!("Avaliador {} definido", request.evaluator_id),
    )
}

/// Requests a move along the case lifecycle graph.
///
/// This is the only operation that changes a case's status on request.
/// Asking for `finalized` behaves exactly like [`finalize_case`].
///
/// # Errors
///
/// - `InvalidInput` if the target status is unknown.
/// - `InvalidTransition` if the edge is not in the graph.
/// - `PreconditionFailed` if the edge's guard is not met; the message and
///   the settlement detail say why.
/// - `PolicyViolation` if the case is finalized.
pub fn request_transition<S>(
    store: &mut S,
    case_id: i64,
    request: &RequestTransitionRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CaseCommandResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let target: CaseStatus = request.target.parse().map_err(translate_domain_error)?;

    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::RequestTransition { target },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, status = %target, "Case transitioned");
    case_command_response(
        &committed,
        format!("Atendimento {case_id} agora está {}", target.label()),
    )
}

/// Closes a case and generates its commissions.
///
/// # Errors
///
/// - `InvalidTransition` unless the case is `in_execution`.
/// - `PreconditionFailed` with the settlement detail if items are not done
///   or payments do not cover the total.
/// - `PolicyViolation` if the case is already finalized.
pub fn finalize_case<S>(
    store: &mut S,
    case_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<FinalizeCaseResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::Finalize,
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    let Outcome::Finalized(summary) = &committed.outcome else {
        return Err(unexpected_outcome("Finalize", &committed.outcome));
    };

    info!(
        case_id,
        sale_total = %summary.sale_total,
        execution_total = %summary.execution_total,
        commissions = summary.drafts.len(),
        "Finalized case"
    );
    Ok(FinalizeCaseResponse {
        case: case_info(&committed.state.case)?,
        sale_total: summary.sale_total.to_string(),
        execution_total: summary.execution_total.to_string(),
        grand_total: summary.grand_total.to_string(),
        per_item: summary.per_item.iter().map(item_commission_info).collect(),
        event_id: committed.event_id,
        message: format!(
            "Atendimento {case_id} finalizado; comissões {}",
            summary.grand_total
        ),
    })
}

// ============================================================================
// Items
// ============================================================================

/// Attaches a catalog procedure to a case.
///
/// The price comes from the catalog unless overridden. The seller
/// defaults to the acting staff member. Adding to a case in execution
/// sends it back to `awaiting_payment`.
///
/// # Errors
///
/// - `ResourceNotFound` if the case, procedure, seller or executor does
///   not exist.
/// - `PolicyViolation` if the procedure is inactive, the case does not
///   accept items or the executor lacks the role.
/// - `InvalidInput` if the price override is malformed or not positive.
pub fn create_item<S>(
    store: &mut S,
    case_id: i64,
    request: &CreateItemRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CreateItemResponse, ApiError>
where
    S: CaseStore + ProcedureCatalog + IdentityService + ?Sized,
{
    let procedure: Procedure = store
        .get_procedure(request.procedure_id)?
        .ok_or_else(|| {
            translate_domain_error(DomainError::ProcedureNotFound(request.procedure_id))
        })?;
    let price_override: Option<Money> = request
        .price_override
        .as_deref()
        .map(|raw| parse_money("price_override", raw))
        .transpose()?;

    let seller_id: i64 = request.seller_id.unwrap_or(actor.staff_id);
    ensure_staff_exists(store, seller_id)?;
    if let Some(executor_id) = request.executor_id {
        AuthorizationService::ensure_executor_candidate(store, executor_id)?;
    }

    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::AddItem {
            procedure,
            seller_id: Some(seller_id),
            executor_id: request.executor_id,
            price_override,
        },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    let Outcome::ItemAdded { reopened, .. } = committed.outcome else {
        return Err(unexpected_outcome("AddItem", &committed.outcome));
    };
    let item_id: i64 = committed.created_id.ok_or_else(|| ApiError::Internal {
        message: String::from("stored item has no id"),
    })?;
    let item: &Item = find_item(&committed.state, item_id)?;

    info!(case_id, item_id, price = %item.price, reopened, "Created item");
    Ok(CreateItemResponse {
        item: item_info(item)?,
        case: case_info(&committed.state.case)?,
        reopened,
        event_id: committed.event_id,
        message: if reopened {
            format!(
                "Procedimento {item_id} adicionado; atendimento voltou para aguardando pagamento"
            )
        } else {
            format!("Procedimento {item_id} adicionado")
        },
    })
}

/// Detaches an item while the case is in evaluation.
///
/// # Errors
///
/// - `ResourceNotFound` if the case or item does not exist.
/// - `PolicyViolation` outside `evaluation`.
pub fn remove_item<S>(
    store: &mut S,
    case_id: i64,
    item_id: i64,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CaseCommandResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::RemoveItem { item_id },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, item_id, "Removed item");
    case_command_response(&committed, format!("Procedimento {item_id} removido"))
}

/// Sets the executor of an item.
///
/// # Errors
///
/// - `ResourceNotFound` if the case, item or executor does not exist.
/// - `PolicyViolation` if the executor lacks the role, the item is done or
///   the case is finalized.
pub fn update_item_executor<S>(
    store: &mut S,
    case_id: i64,
    item_id: i64,
    request: &UpdateItemExecutorRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ItemCommandResponse, ApiError>
where
    S: CaseStore + IdentityService + ?Sized,
{
    AuthorizationService::ensure_executor_candidate(store, request.executor_id)?;

    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::AssignExecutor {
            item_id,
            executor_id: request.executor_id,
        },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, item_id, executor_id = request.executor_id, "Assigned executor");
    item_command_response(
        &committed,
        item_id,
        format!("Executor {} definido", request.executor_id),
    )
}

/// Moves an item to `executing` or `done`.
///
/// # Errors
///
/// - `Unauthorized` if the actor is not an executor or admin, or is not
///   the item's assigned executor.
/// - `InvalidInput` if the status is unknown.
/// - `InvalidTransition` if the item cannot move there.
/// - `PolicyViolation` unless the case is `in_execution`.
pub fn advance_item_status<S>(
    store: &mut S,
    case_id: i64,
    item_id: i64,
    request: &AdvanceItemStatusRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ItemCommandResponse, ApiError>
where
    S: CaseStore + IdentityService + ?Sized,
{
    AuthorizationService::authorize_advance_item_status(store, actor)?;
    let target: ItemStatus = request.status.parse().map_err(translate_domain_error)?;

    let committed: CommittedCommand = store.apply_case_command(
        case_id,
        Command::AdvanceItemStatus { item_id, target },
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, item_id, status = %target, "Advanced item");
    item_command_response(
        &committed,
        item_id,
        format!("Procedimento {item_id} agora está {}", target.label()),
    )
}

// ============================================================================
// Payments
// ============================================================================

/// Registers a payment with an explicit split across items.
///
/// # Errors
///
/// - `InvalidInput` for malformed amounts, an unknown method, an empty or
///   duplicated split or a bad installment count.
/// - `OverAllocation` if the split does not add up to the amount or would
///   overpay an item.
/// - `ResourceNotFound` if an allocated item is not part of the case.
/// - `PolicyViolation` if the case does not accept payments.
pub fn register_payment<S>(
    store: &mut S,
    case_id: i64,
    request: RegisterPaymentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RegisterPaymentResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let amount: Money = parse_money("amount", &request.amount)?;
    let method: PaymentMethod = request.method.parse().map_err(translate_domain_error)?;
    let allocations: Vec<AllocationRequest> = request
        .allocations
        .iter()
        .map(|line| {
            Ok(AllocationRequest {
                item_id: line.item_id,
                amount: parse_money("allocations", &line.amount)?,
            })
        })
        .collect::<Result<_, ApiError>>()?;

    commit_payment(
        store,
        case_id,
        Command::RegisterPayment {
            amount,
            method,
            installment_count: request.installment_count.unwrap_or(1),
            note: request.note,
            allocations,
        },
        actor,
        cause,
        now,
    )
}

/// Registers a payment split in proportion to what each item still owes.
///
/// The split is computed with the largest-remainder method and then goes
/// through the same checks as [`register_payment`].
///
/// # Errors
///
/// As [`register_payment`]; additionally `OverAllocation` if the amount is
/// larger than the case's outstanding balance.
pub fn register_payment_proportional<S>(
    store: &mut S,
    case_id: i64,
    request: RegisterProportionalPaymentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RegisterPaymentResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let amount: Money = parse_money("amount", &request.amount)?;
    let method: PaymentMethod = request.method.parse().map_err(translate_domain_error)?;

    let state: CaseState = store.load_case_state(case_id)?;
    state
        .case
        .ensure_not_finalized()
        .map_err(translate_domain_error)?;
    if !state.case.status.accepts_payments() {
        return Err(translate_domain_error(DomainError::PaymentsNotAccepted(
            state.case.status,
        )));
    }
    let allocations: Vec<AllocationRequest> =
        distribute_proportionally(amount, &state.items).map_err(translate_domain_error)?;

    commit_payment(
        store,
        case_id,
        Command::RegisterPayment {
            amount,
            method,
            installment_count: request.installment_count.unwrap_or(1),
            note: request.note,
            allocations,
        },
        actor,
        cause,
        now,
    )
}

fn commit_payment<S>(
    store: &mut S,
    case_id: i64,
    command: Command,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<RegisterPaymentResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let committed: CommittedCommand =
        store.apply_case_command(case_id, command, actor.to_audit_actor(), cause, now)?;

    let Outcome::PaymentRegistered { payment, .. } = &committed.outcome else {
        return Err(unexpected_outcome("RegisterPayment", &committed.outcome));
    };
    let payment_id: i64 = committed.created_id.ok_or_else(|| ApiError::Internal {
        message: String::from("stored payment has no id"),
    })?;
    let outstanding: Money = committed.state.outstanding();

    info!(
        case_id,
        payment_id,
        amount = %payment.amount,
        method = %payment.method,
        %outstanding,
        "Registered payment"
    );
    Ok(RegisterPaymentResponse {
        payment_id,
        amount: payment.amount.to_string(),
        allocations: payment
            .allocations
            .iter()
            .map(|a| AllocationInfo {
                item_id: a.item_id,
                amount_applied: a.amount.to_string(),
            })
            .collect(),
        outstanding: outstanding.to_string(),
        event_id: committed.event_id,
        message: format!(
            "Pagamento de {} registrado; saldo devedor {outstanding}",
            payment.amount
        ),
    })
}

// ============================================================================
// Installments
// ============================================================================

/// Splits the case's outstanding balance into installments.
///
/// # Errors
///
/// - `InvalidInput` for a malformed date, a zero count or a case that owes
///   nothing.
/// - `PolicyViolation` if the case is finalized.
pub fn schedule_installments<S>(
    store: &mut S,
    case_id: i64,
    request: &ScheduleInstallmentsRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<ScheduleInstallmentsResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let first_due: Date = parse_date("first_due_date", &request.first_due_date)?;

    let installments: Vec<Installment> = store.schedule_installments(
        case_id,
        request.count,
        first_due,
        request.interval_days,
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(case_id, count = request.count, "Scheduled installments");
    Ok(ScheduleInstallmentsResponse {
        case_id,
        installments: installments
            .iter()
            .map(installment_info)
            .collect::<Result<_, _>>()?,
        message: format!("{} parcela(s) agendada(s)", request.count),
    })
}

/// Marks an installment as paid by a payment of the same case.
///
/// # Errors
///
/// - `ResourceNotFound` if the installment or payment does not exist.
/// - `PolicyViolation` if the payment belongs to another case or the
///   installment was already settled.
pub fn settle_installment<S>(
    store: &mut S,
    installment_id: i64,
    request: &SettleInstallmentRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<InstallmentInfo, ApiError>
where
    S: CaseStore + ?Sized,
{
    let installment: Installment = store.settle_installment(
        installment_id,
        request.payment_id,
        actor.to_audit_actor(),
        cause,
        now,
    )?;

    info!(
        case_id = installment.case_id,
        installment_id,
        payment_id = request.payment_id,
        "Settled installment"
    );
    installment_info(&installment)
}

// ============================================================================
// Read-only operations
// ============================================================================

/// Returns everything recorded for a case together with its totals.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the case does not exist.
pub fn get_case_summary<S>(store: &mut S, case_id: i64) -> Result<CaseSummaryResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let summary: CaseSummary = store.get_case_summary(case_id)?;

    Ok(CaseSummaryResponse {
        case: case_info(&summary.case)?,
        items: summary
            .items
            .iter()
            .map(item_info)
            .collect::<Result<_, _>>()?,
        payments: summary
            .payments
            .iter()
            .map(payment_info)
            .collect::<Result<_, _>>()?,
        commissions: summary.commissions.iter().map(commission_info).collect(),
        installments: summary
            .installments
            .iter()
            .map(installment_info)
            .collect::<Result<_, _>>()?,
        total_due: summary.total_due.to_string(),
        total_paid: summary.total_paid.to_string(),
        outstanding: summary.outstanding.to_string(),
    })
}

/// Lists the cases waiting for payment with their balances.
///
/// # Errors
///
/// Returns `Internal` if the store fails.
pub fn awaiting_payment_report<S>(store: &mut S) -> Result<AwaitingPaymentReportResponse, ApiError>
where
    S: CaseStore + ?Sized,
{
    let entries: Vec<AwaitingPaymentEntry> = store.awaiting_payment_report()?;

    Ok(AwaitingPaymentReportResponse {
        cases: entries
            .iter()
            .map(awaiting_payment_info)
            .collect::<Result<_, _>>()?,
    })
}

// ============================================================================
// Parsing
// ============================================================================

fn parse_money(field: &str, raw: &str) -> Result<Money, ApiError> {
    raw.parse::<Money>().map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: err.to_string(),
    })
}

fn parse_date(field: &str, raw: &str) -> Result<Date, ApiError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|err| {
        ApiError::InvalidInput {
            field: field.to_string(),
            message: format!("data inválida '{raw}': {err}"),
        }
    })
}

// ============================================================================
// Response mapping
// ============================================================================

fn unexpected_outcome(command: &str, outcome: &Outcome) -> ApiError {
    ApiError::Internal {
        message: format!("{command} produced an unexpected outcome: {outcome:?}"),
    }
}

fn find_item(state: &CaseState, item_id: i64) -> Result<&Item, ApiError> {
    state
        .items
        .iter()
        .find(|i| i.item_id == item_id)
        .ok_or_else(|| translate_domain_error(DomainError::ItemNotFound(item_id)))
}

fn case_command_response(
    committed: &CommittedCommand,
    message: String,
) -> Result<CaseCommandResponse, ApiError> {
    Ok(CaseCommandResponse {
        case: case_info(&committed.state.case)?,
        event_id: committed.event_id,
        message,
    })
}

fn item_command_response(
    committed: &CommittedCommand,
    item_id: i64,
    message: String,
) -> Result<ItemCommandResponse, ApiError> {
    Ok(ItemCommandResponse {
        item: item_info(find_item(&committed.state, item_id)?)?,
        event_id: committed.event_id,
        message,
    })
}

fn timestamp(value: OffsetDateTime) -> Result<String, ApiError> {
    value.format(&Rfc3339).map_err(|err| ApiError::Internal {
        message: format!("cannot format timestamp: {err}"),
    })
}

fn optional_timestamp(value: Option<OffsetDateTime>) -> Result<Option<String>, ApiError> {
    value.map(timestamp).transpose()
}

fn date(value: Date) -> Result<String, ApiError> {
    value
        .format(format_description!("[year]-[month]-[day]"))
        .map_err(|err| ApiError::Internal {
            message: format!("cannot format date: {err}"),
        })
}

fn case_info(case: &Case) -> Result<CaseInfo, ApiError> {
    Ok(CaseInfo {
        case_id: case.case_id,
        client_id: case.client_id,
        evaluator_id: case.evaluator_id,
        liberator_id: case.liberator_id,
        status: case.status.as_str().to_string(),
        status_label: case.status.label().to_string(),
        notes: case.notes.clone(),
        created_at: timestamp(case.created_at)?,
        unlocked_at: optional_timestamp(case.unlocked_at)?,
        finalized_at: optional_timestamp(case.finalized_at)?,
    })
}

fn item_info(item: &Item) -> Result<ItemInfo, ApiError> {
    Ok(ItemInfo {
        item_id: item.item_id,
        procedure_id: item.procedure_id,
        seller_id: item.seller_id,
        executor_id: item.executor_id,
        price: item.price.to_string(),
        amount_paid: item.amount_paid.to_string(),
        outstanding: item.outstanding().to_string(),
        status: item.status.as_str().to_string(),
        created_at: timestamp(item.created_at)?,
        completed_at: optional_timestamp(item.completed_at)?,
    })
}

fn allocation_info(allocation: &Allocation) -> AllocationInfo {
    AllocationInfo {
        item_id: allocation.item_id,
        amount_applied: allocation.amount_applied.to_string(),
    }
}

fn payment_info(record: &PaymentRecord) -> Result<PaymentInfo, ApiError> {
    let payment: &Payment = &record.payment;
    Ok(PaymentInfo {
        payment_id: payment.payment_id,
        receiver_id: payment.receiver_id,
        amount: payment.amount.to_string(),
        method: payment.method.as_str().to_string(),
        installment_count: payment.installment_count,
        note: payment.note.clone(),
        created_at: timestamp(payment.created_at)?,
        allocations: record.allocations.iter().map(allocation_info).collect(),
    })
}

fn commission_info(commission: &Commission) -> CommissionInfo {
    CommissionInfo {
        commission_id: commission.commission_id,
        item_id: commission.item_id,
        beneficiary_id: commission.beneficiary_id,
        kind: commission.kind.as_str().to_string(),
        percentage: commission.percentage.to_string(),
        base_amount: commission.base_amount.to_string(),
        commission_amount: commission.commission_amount.to_string(),
    }
}

fn item_commission_info(detail: &ItemCommissionDetail) -> ItemCommissionInfo {
    ItemCommissionInfo {
        item_id: detail.item_id,
        procedure_id: detail.procedure_id,
        price: detail.price.to_string(),
        seller_id: detail.seller_id,
        sale_commission: detail.sale_commission.to_string(),
        executor_id: detail.executor_id,
        execution_commission: detail.execution_commission.to_string(),
    }
}

fn installment_info(installment: &Installment) -> Result<InstallmentInfo, ApiError> {
    Ok(InstallmentInfo {
        installment_id: installment.installment_id,
        number: installment.number,
        amount: installment.amount.to_string(),
        due_date: date(installment.due_date)?,
        paid: installment.paid,
        payment_id: installment.payment_id,
        paid_at: optional_timestamp(installment.paid_at)?,
        replaced: installment.replaced,
    })
}

fn awaiting_payment_info(entry: &AwaitingPaymentEntry) -> Result<AwaitingPaymentInfo, ApiError> {
    Ok(AwaitingPaymentInfo {
        case_id: entry.case_id,
        client_id: entry.client_id,
        client_name: entry.client_name.clone(),
        total_due: entry.total_due.to_string(),
        total_paid: entry.total_paid.to_string(),
        outstanding: entry.outstanding.to_string(),
        next_due_date: entry.next_due_date.map(date).transpose()?,
    })
}
