// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    CASE_ID, EXECUTOR, SELLER, admin, case_in, executor, money, now, other_executor, procedure,
    receptionist, run, step, with_item,
};
use crate::{CaseState, CaseTransition, Command, CoreError, Outcome};
use clinica_domain::{CaseStatus, DomainError, ErrorKind, ItemStatus, Procedure};

fn add(procedure: Procedure) -> Command {
    Command::AddItem {
        procedure,
        seller_id: Some(SELLER),
        executor_id: None,
        price_override: None,
    }
}

#[test]
fn test_add_item_uses_catalog_price() {
    let state: CaseState = case_in(CaseStatus::Evaluation);
    let transition: CaseTransition =
        run(&state, add(procedure("150.00", "10", "20")), receptionist()).unwrap();

    let Outcome::ItemAdded { item, reopened } = transition.outcome else {
        panic!("expected ItemAdded");
    };
    assert!(!reopened);
    assert_eq!(item.case_id, CASE_ID);
    assert_eq!(item.price, money("150.00"));
    assert_eq!(item.seller_id, Some(SELLER));
    assert_eq!(item.created_at, now());
    assert_eq!(transition.new_state.case.status, CaseStatus::Evaluation);
    assert_eq!(transition.audit_event.action.name, "AddItem");
}

#[test]
fn test_add_item_audit_snapshot_counts_the_new_item() {
    let state: CaseState = with_item(case_in(CaseStatus::Evaluation), 11, "50.00");
    let transition: CaseTransition =
        run(&state, add(procedure("150.00", "10", "20")), receptionist()).unwrap();

    let event = &transition.audit_event;
    assert_eq!(event.before.field("items"), Some("1"));
    assert_eq!(event.before.field("due"), Some("50.00"));
    assert_eq!(event.after.field("items"), Some("2"));
    assert_eq!(event.after.field("due"), Some("200.00"));
    assert_eq!(event.after.field("paid"), Some("0.00"));
}

#[test]
fn test_price_override_replaces_catalog_price() {
    let state: CaseState = case_in(CaseStatus::Triage);
    let transition: CaseTransition = run(
        &state,
        Command::AddItem {
            procedure: procedure("150.00", "10", "20"),
            seller_id: None,
            executor_id: Some(EXECUTOR),
            price_override: Some(money("120.00")),
        },
        receptionist(),
    )
    .unwrap();
    let Outcome::ItemAdded { item, .. } = transition.outcome else {
        panic!("expected ItemAdded");
    };
    assert_eq!(item.price, money("120.00"));
    assert_eq!(item.executor_id, Some(EXECUTOR));
}

#[test]
fn test_inactive_procedure_is_rejected() {
    let mut inactive: Procedure = procedure("150.00", "10", "20");
    inactive.is_active = false;
    let err: CoreError = run(&case_in(CaseStatus::Evaluation), add(inactive), receptionist())
        .unwrap_err();
    assert_eq!(err.domain_error(), &DomainError::ProcedureInactive(5));
}

#[test]
fn test_items_not_accepted_while_awaiting_payment() {
    let err: CoreError = run(
        &case_in(CaseStatus::AwaitingPayment),
        add(procedure("10.00", "0", "0")),
        receptionist(),
    )
    .unwrap_err();
    assert_eq!(
        err.domain_error(),
        &DomainError::ItemsNotAccepted(CaseStatus::AwaitingPayment)
    );
}

#[test]
fn test_adding_item_in_execution_reopens_payment() {
    let state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    let transition: CaseTransition =
        run(&state, add(procedure("50.00", "10", "20")), receptionist()).unwrap();

    assert!(matches!(
        transition.outcome,
        Outcome::ItemAdded { reopened: true, .. }
    ));
    assert_eq!(
        transition.new_state.case.status,
        CaseStatus::AwaitingPayment
    );
    assert!(transition.audit_event.changes_status());
}

#[test]
fn test_remove_item_during_evaluation() {
    let state: CaseState = with_item(case_in(CaseStatus::Evaluation), 1, "100.00");
    let new_state: CaseState = step(&state, Command::RemoveItem { item_id: 1 }, receptionist());
    assert!(new_state.items.is_empty());
}

#[test]
fn test_remove_item_in_execution_is_policy_violation() {
    let state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    let err: CoreError = run(&state, Command::RemoveItem { item_id: 1 }, admin()).unwrap_err();
    assert_eq!(err.domain_error().kind(), ErrorKind::PolicyViolation);
    assert_eq!(
        err.domain_error(),
        &DomainError::ItemRemovalNotAllowed(CaseStatus::InExecution)
    );
}

#[test]
fn test_remove_unknown_item_is_not_found() {
    let state: CaseState = case_in(CaseStatus::Evaluation);
    let err: CoreError = run(&state, Command::RemoveItem { item_id: 9 }, admin()).unwrap_err();
    assert_eq!(err.domain_error().kind(), ErrorKind::NotFound);
}

#[test]
fn test_assign_executor_any_time_before_done() {
    let state: CaseState = with_item(case_in(CaseStatus::AwaitingPayment), 1, "100.00");
    let new_state: CaseState = step(
        &state,
        Command::AssignExecutor {
            item_id: 1,
            executor_id: 30,
        },
        receptionist(),
    );
    assert_eq!(new_state.items[0].executor_id, Some(30));
}

#[test]
fn test_assigned_executor_runs_item_to_done() {
    let mut state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    state.items[0].amount_paid = money("100.00");
    state.items[0].status = ItemStatus::Paid;

    let state: CaseState = step(
        &state,
        Command::AdvanceItemStatus {
            item_id: 1,
            target: ItemStatus::Executing,
        },
        executor(),
    );
    let transition: CaseTransition = run(
        &state,
        Command::AdvanceItemStatus {
            item_id: 1,
            target: ItemStatus::Done,
        },
        executor(),
    )
    .unwrap();

    assert_eq!(
        transition.outcome,
        Outcome::ItemAdvanced {
            item_id: 1,
            status: ItemStatus::Done,
            completed_at: Some(now()),
        }
    );
}

#[test]
fn test_other_executor_is_denied() {
    let state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    let err: CoreError = run(
        &state,
        Command::AdvanceItemStatus {
            item_id: 1,
            target: ItemStatus::Executing,
        },
        other_executor(),
    )
    .unwrap_err();
    assert_eq!(err.domain_error().kind(), ErrorKind::AuthorizationDenied);
}

#[test]
fn test_admin_may_advance_any_item() {
    let state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    let new_state: CaseState = step(
        &state,
        Command::AdvanceItemStatus {
            item_id: 1,
            target: ItemStatus::Executing,
        },
        admin(),
    );
    assert_eq!(new_state.items[0].status, ItemStatus::Executing);
}

#[test]
fn test_execution_requires_unlocked_case() {
    let state: CaseState = with_item(case_in(CaseStatus::AwaitingPayment), 1, "100.00");
    let err: CoreError = run(
        &state,
        Command::AdvanceItemStatus {
            item_id: 1,
            target: ItemStatus::Executing,
        },
        executor(),
    )
    .unwrap_err();
    assert_eq!(
        err.domain_error(),
        &DomainError::ExecutionNotUnlocked(CaseStatus::AwaitingPayment)
    );
}

#[test]
fn test_failed_command_leaves_state_untouched() {
    let state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "100.00");
    let before: CaseState = state.clone();
    let _ = run(&state, Command::RemoveItem { item_id: 1 }, admin());
    assert_eq!(state, before);
}
