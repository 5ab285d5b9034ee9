// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::Command;
use crate::error::CoreError;
use crate::state::{CaseState, CaseTransition, OpenCaseResult, Outcome};
use clinica_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use clinica_domain::{
    AllocationRequest, CaseStatus, CommissionSummary, DomainError, Item, ItemStatus, Money,
    NewCase, NewItem, NewPayment, PaymentMethod, Procedure, check_transition, derive_commissions,
    validate_allocations,
};
use time::OffsetDateTime;

/// Opens a new case in `triage`.
///
/// The client's existence is checked by the caller against the client
/// registry; this only builds the draft and its audit event.
#[must_use]
pub fn apply_open_case(
    client_id: i64,
    evaluator_id: Option<i64>,
    notes: Option<String>,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> OpenCaseResult {
    let new_case: NewCase = NewCase::new(client_id, evaluator_id, notes, now);
    let before: StateSnapshot = StateSnapshot::new(String::from("status=none"));
    let after: StateSnapshot = StateSnapshot::of_case(
        CaseStatus::Triage,
        &[
            ("items", String::from("0")),
            ("due", Money::ZERO.to_string()),
            ("paid", Money::ZERO.to_string()),
        ],
    );
    let action: Action = Action::new(
        String::from("OpenCase"),
        Some(format!("Opened case for client {client_id}")),
    );

    OpenCaseResult {
        new_case,
        audit_event: AuditEvent::new(actor, cause, action, before, after),
    }
}

/// Applies a command to a case, producing the new state, what must be
/// persisted and an audit event.
///
/// No command is accepted once the case is finalized.
///
/// # Errors
///
/// Returns `CoreError::DomainViolation` carrying the first rule the
/// command breaks. The input state is never modified.
pub fn apply(
    state: &CaseState,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<CaseTransition, CoreError> {
    state.case.ensure_not_finalized()?;

    let name: &'static str = command.name();
    let mut new_state: CaseState = state.clone();

    let (outcome, details): (Outcome, String) = match command {
        Command::AssignEvaluator { evaluator_id } => {
            assign_evaluator(&mut new_state, evaluator_id)?
        }
        Command::AddItem {
            procedure,
            seller_id,
            executor_id,
            price_override,
        } => add_item(
            &mut new_state,
            &procedure,
            seller_id,
            executor_id,
            price_override,
            now,
        )?,
        Command::RemoveItem { item_id } => remove_item(&mut new_state, item_id)?,
        Command::AssignExecutor {
            item_id,
            executor_id,
        } => assign_executor(&mut new_state, item_id, executor_id)?,
        Command::AdvanceItemStatus { item_id, target } => {
            advance_item(&mut new_state, item_id, target, &actor, now)?
        }
        Command::RegisterPayment {
            amount,
            method,
            installment_count,
            note,
            allocations,
        } => register_payment(
            &mut new_state,
            PaymentInput {
                amount,
                method,
                installment_count,
                note,
                allocations,
            },
            actor.staff_id,
            now,
        )?,
        Command::RequestTransition { target } => {
            transition(&mut new_state, target, actor.staff_id, now)?
        }
        Command::Finalize => {
            transition(&mut new_state, CaseStatus::Finalized, actor.staff_id, now)?
        }
    };

    let after: StateSnapshot = match &outcome {
        Outcome::ItemAdded { item, .. } => new_state.to_snapshot_with(item),
        _ => new_state.to_snapshot(),
    };
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), Some(details)),
        state.to_snapshot(),
        after,
    );

    Ok(CaseTransition {
        new_state,
        outcome,
        audit_event,
    })
}

type Applied = Result<(Outcome, String), CoreError>;

fn find_item(state: &CaseState, item_id: i64) -> Result<&Item, DomainError> {
    state.item(item_id).ok_or(DomainError::ItemNotInCase {
        case_id: state.case.case_id,
        item_id,
    })
}

fn find_item_mut(state: &mut CaseState, item_id: i64) -> Result<&mut Item, DomainError> {
    let case_id: i64 = state.case.case_id;
    state
        .item_mut(item_id)
        .ok_or(DomainError::ItemNotInCase { case_id, item_id })
}

fn assign_evaluator(state: &mut CaseState, evaluator_id: i64) -> Applied {
    if !state.case.status.allows_evaluator_assignment() {
        return Err(DomainError::EvaluatorAssignmentNotAllowed(state.case.status).into());
    }
    state.case.evaluator_id = Some(evaluator_id);
    Ok((
        Outcome::EvaluatorAssigned { evaluator_id },
        format!("Evaluator set to staff {evaluator_id}"),
    ))
}

fn add_item(
    state: &mut CaseState,
    procedure: &Procedure,
    seller_id: Option<i64>,
    executor_id: Option<i64>,
    price_override: Option<Money>,
    now: OffsetDateTime,
) -> Applied {
    let status: CaseStatus = state.case.status;
    if !status.accepts_new_items() {
        return Err(DomainError::ItemsNotAccepted(status).into());
    }
    procedure.ensure_active()?;
    let price: Money = procedure.item_price(price_override)?;

    let item: NewItem = NewItem {
        case_id: state.case.case_id,
        procedure_id: procedure.procedure_id,
        seller_id,
        executor_id,
        price,
        created_at: now,
    };

    // A new billable item has to be paid before execution resumes.
    let reopened: bool = status == CaseStatus::InExecution;
    if reopened {
        state.case.status = CaseStatus::AwaitingPayment;
    }
    state
        .commission_rates
        .insert(procedure.procedure_id, procedure.rates());

    let details: String = format!(
        "Added procedure {} ({}) at {price}{}",
        procedure.procedure_id,
        procedure.name,
        if reopened {
            "; case returned to awaiting payment"
        } else {
            ""
        }
    );
    Ok((Outcome::ItemAdded { item, reopened }, details))
}

fn remove_item(state: &mut CaseState, item_id: i64) -> Applied {
    if !state.case.status.allows_item_removal() {
        return Err(DomainError::ItemRemovalNotAllowed(state.case.status).into());
    }
    find_item(state, item_id)?;
    state.items.retain(|i| i.item_id != item_id);
    Ok((
        Outcome::ItemRemoved { item_id },
        format!("Removed item {item_id}"),
    ))
}

fn assign_executor(state: &mut CaseState, item_id: i64, executor_id: i64) -> Applied {
    find_item_mut(state, item_id)?.assign_executor(executor_id)?;
    Ok((
        Outcome::ExecutorAssigned {
            item_id,
            executor_id,
        },
        format!("Item {item_id} assigned to staff {executor_id}"),
    ))
}

fn advance_item(
    state: &mut CaseState,
    item_id: i64,
    target: ItemStatus,
    actor: &Actor,
    now: OffsetDateTime,
) -> Applied {
    if !state.case.status.allows_execution() {
        return Err(DomainError::ExecutionNotUnlocked(state.case.status).into());
    }
    let item: &mut Item = find_item_mut(state, item_id)?;
    item.ensure_executor(actor.staff_id, actor.role)?;
    let from: ItemStatus = item.status;
    item.advance(target, now)?;

    Ok((
        Outcome::ItemAdvanced {
            item_id,
            status: item.status,
            completed_at: item.completed_at,
        },
        format!("Item {item_id}: {from} -> {target}"),
    ))
}

struct PaymentInput {
    amount: Money,
    method: PaymentMethod,
    installment_count: u32,
    note: Option<String>,
    allocations: Vec<AllocationRequest>,
}

fn register_payment(
    state: &mut CaseState,
    input: PaymentInput,
    receiver_id: i64,
    now: OffsetDateTime,
) -> Applied {
    let status: CaseStatus = state.case.status;
    if !status.accepts_payments() {
        return Err(DomainError::PaymentsNotAccepted(status).into());
    }
    input.method.validate_installment_count(input.installment_count)?;
    validate_allocations(
        state.case.case_id,
        input.amount,
        &input.allocations,
        &state.items,
    )?;

    let mut item_statuses: Vec<(i64, ItemStatus)> = Vec::with_capacity(input.allocations.len());
    for allocation in &input.allocations {
        let item: &mut Item = find_item_mut(state, allocation.item_id)?;
        item.apply_payment(allocation.amount)?;
        item_statuses.push((item.item_id, item.status));
    }
    state.payments_total = state.payments_total.checked_add(input.amount)?;

    let details: String = format!(
        "Received {} via {} across {} item(s)",
        input.amount,
        input.method,
        input.allocations.len()
    );
    let payment: NewPayment = NewPayment {
        case_id: state.case.case_id,
        receiver_id: Some(receiver_id),
        amount: input.amount,
        method: input.method,
        installment_count: input.installment_count,
        note: input
            .note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        allocations: input.allocations,
        created_at: now,
    };

    Ok((
        Outcome::PaymentRegistered {
            payment,
            item_statuses,
        },
        details,
    ))
}

fn transition(
    state: &mut CaseState,
    target: CaseStatus,
    actor_id: i64,
    now: OffsetDateTime,
) -> Applied {
    let from: CaseStatus = state.case.status;
    check_transition(state.case.case_id, from, target, state.guard_context())?;

    if target == CaseStatus::Finalized {
        let summary: CommissionSummary =
            derive_commissions(&state.items, &state.commission_rates)?;
        state.case.enter(target, actor_id, now);
        let details: String = format!(
            "Finalized; commissions sale {} execution {} total {}",
            summary.sale_total, summary.execution_total, summary.grand_total
        );
        return Ok((Outcome::Finalized(summary), details));
    }

    state.case.enter(target, actor_id, now);
    Ok((
        Outcome::Transitioned { from, to: target },
        format!("{from} -> {target}"),
    ))
}
