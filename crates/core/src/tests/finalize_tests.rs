// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    EXECUTOR, SELLER, admin, case_in, money, now, pay, receptionist, run, with_item,
};
use crate::{CaseState, CaseTransition, Command, CoreError, Outcome};
use clinica_domain::{
    CaseStatus, CommissionKind, CommissionSummary, DomainError, ErrorKind, ItemStatus, Money,
};

fn settled_case() -> CaseState {
    let mut state: CaseState = with_item(case_in(CaseStatus::InExecution), 1, "150.00");
    state.items[0].amount_paid = money("150.00");
    state.items[0].status = ItemStatus::Done;
    state.payments_total = money("150.00");
    state
}

#[test]
fn test_finalize_generates_sale_and_execution_commissions() {
    let transition: CaseTransition = run(&settled_case(), Command::Finalize, admin()).unwrap();

    let Outcome::Finalized(summary) = &transition.outcome else {
        panic!("expected Finalized");
    };
    assert_eq!(summary.drafts.len(), 2);
    assert_eq!(summary.drafts[0].kind, CommissionKind::Sale);
    assert_eq!(summary.drafts[0].beneficiary_id, SELLER);
    assert_eq!(summary.drafts[0].commission_amount, money("15.00"));
    assert_eq!(summary.drafts[1].kind, CommissionKind::Execution);
    assert_eq!(summary.drafts[1].beneficiary_id, EXECUTOR);
    assert_eq!(summary.drafts[1].commission_amount, money("30.00"));
    assert_eq!(summary.grand_total, money("45.00"));

    assert_eq!(transition.new_state.case.status, CaseStatus::Finalized);
    assert_eq!(transition.new_state.case.finalized_at, Some(now()));
    assert_eq!(transition.audit_event.action.name, "Finalize");
}

#[test]
fn test_request_transition_to_finalized_also_generates_commissions() {
    let transition: CaseTransition = run(
        &settled_case(),
        Command::RequestTransition {
            target: CaseStatus::Finalized,
        },
        admin(),
    )
    .unwrap();
    assert!(matches!(transition.outcome, Outcome::Finalized(ref s) if s.drafts.len() == 2));
}

#[test]
fn test_finalize_is_not_reentrant() {
    let finalized: CaseState = run(&settled_case(), Command::Finalize, admin())
        .unwrap()
        .new_state;

    let err: CoreError = run(&finalized, Command::Finalize, admin()).unwrap_err();
    assert_eq!(err.domain_error(), &DomainError::CaseFinalized(1));
    assert_eq!(err.domain_error().kind(), ErrorKind::PolicyViolation);
}

#[test]
fn test_finalized_case_rejects_every_command() {
    let finalized: CaseState = run(&settled_case(), Command::Finalize, admin())
        .unwrap()
        .new_state;

    for command in [
        pay("1.00", &[(1, "1.00")]),
        Command::RemoveItem { item_id: 1 },
        Command::AssignExecutor {
            item_id: 1,
            executor_id: 9,
        },
        Command::AssignEvaluator { evaluator_id: 9 },
        Command::RequestTransition {
            target: CaseStatus::AwaitingPayment,
        },
    ] {
        let err: CoreError = run(&finalized, command, receptionist()).unwrap_err();
        assert_eq!(err.domain_error(), &DomainError::CaseFinalized(1));
    }
}

#[test]
fn test_finalize_blocked_by_open_balance() {
    let mut state: CaseState = settled_case();
    state.payments_total = money("100.00");

    let err: CoreError = run(&state, Command::Finalize, admin()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "não é possível passar de 'em execução' para 'finalizado': pagamento incompleto: total 150.00, pago 100.00"
    );
}

#[test]
fn test_item_without_seller_and_zero_execution_rate_earns_nothing() {
    let mut state: CaseState = settled_case();
    state.items[0].seller_id = None;
    state
        .commission_rates
        .get_mut(&5)
        .unwrap()
        .execution = "0".parse().unwrap();

    let transition: CaseTransition = run(&state, Command::Finalize, admin()).unwrap();
    let Outcome::Finalized(summary) = transition.outcome else {
        panic!("expected Finalized");
    };
    let summary: CommissionSummary = summary;
    assert!(summary.drafts.is_empty());
    assert_eq!(summary.grand_total, Money::ZERO);
    assert_eq!(summary.per_item.len(), 1);
}
