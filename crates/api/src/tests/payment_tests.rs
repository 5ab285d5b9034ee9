// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    AllocationLine, ApiError, CaseSummaryResponse, RegisterPaymentRequest,
    RegisterPaymentResponse, RegisterProportionalPaymentRequest, get_case_summary,
    register_payment, register_payment_proportional,
};

use super::{Clinic, create_test_cause, now};

fn proportional(amount: &str) -> RegisterProportionalPaymentRequest {
    RegisterProportionalPaymentRequest {
        amount: amount.to_string(),
        method: String::from("cash"),
        installment_count: None,
        note: None,
    }
}

#[test]
fn test_partial_payment_leaves_item_pending() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["300.00", "500.00"]);

    clinic
        .pay(case_id, "300.00", &[(items[0], "200.00"), (items[1], "100.00")])
        .unwrap();

    let summary: CaseSummaryResponse = get_case_summary(&mut clinic.persistence, case_id).unwrap();
    assert_eq!(summary.items[0].amount_paid, "200.00");
    assert_eq!(summary.items[0].status, "pending");
    assert_eq!(summary.items[1].amount_paid, "100.00");
    assert_eq!(summary.items[1].status, "pending");
    assert_eq!(summary.total_paid, "300.00");
    assert_eq!(summary.outstanding, "500.00");
    assert_eq!(summary.payments.len(), 1);
    assert_eq!(summary.payments[0].allocations.len(), 2);
}

#[test]
fn test_register_payment_response_reports_balance() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00", "150.00"]);
    let request = RegisterPaymentRequest {
        amount: String::from("150"),
        method: String::from("credit_card"),
        installment_count: Some(3),
        note: Some(String::from("  entrada  ")),
        allocations: vec![AllocationLine {
            item_id: items[0],
            amount: String::from("150.00"),
        }],
    };

    let response: RegisterPaymentResponse = register_payment(
        &mut clinic.persistence,
        case_id,
        request,
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap();

    assert_eq!(response.amount, "150.00");
    assert_eq!(response.outstanding, "150.00");
    assert_eq!(response.allocations.len(), 1);

    let summary: CaseSummaryResponse = get_case_summary(&mut clinic.persistence, case_id).unwrap();
    let payment = &summary.payments[0];
    assert_eq!(payment.payment_id, response.payment_id);
    assert_eq!(payment.method, "credit_card");
    assert_eq!(payment.installment_count, 3);
    assert_eq!(payment.note.as_deref(), Some("entrada"));
    assert_eq!(payment.receiver_id, Some(clinic.receptionist.staff_id));
    assert_eq!(summary.items[0].status, "paid");
}

#[test]
fn test_overpaying_an_item_writes_nothing() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00"]);

    let err = clinic
        .pay(case_id, "200.00", &[(items[0], "200.00")])
        .unwrap_err();

    assert!(matches!(err, ApiError::OverAllocation { .. }));
    let summary: CaseSummaryResponse = get_case_summary(&mut clinic.persistence, case_id).unwrap();
    assert!(summary.payments.is_empty());
    assert_eq!(summary.items[0].amount_paid, "0.00");
}

#[test]
fn test_split_must_match_amount() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00"]);

    let err = clinic
        .pay(case_id, "100.00", &[(items[0], "90.00")])
        .unwrap_err();

    assert!(matches!(err, ApiError::OverAllocation { .. }));
    assert!(err.to_string().contains("difere do valor do pagamento"));
}

#[test]
fn test_malformed_amount_and_method_are_invalid_input() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00"]);

    let err = clinic.pay(case_id, "cem", &[(items[0], "100.00")]).unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "amount"));

    let request = RegisterPaymentRequest {
        amount: String::from("100.00"),
        method: String::from("cheque"),
        installment_count: None,
        note: None,
        allocations: vec![AllocationLine {
            item_id: items[0],
            amount: String::from("100.00"),
        }],
    };
    let err = register_payment(
        &mut clinic.persistence,
        case_id,
        request,
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap_err();
    assert!(matches!(err, ApiError::InvalidInput { ref field, .. } if field == "method"));
}

#[test]
fn test_negative_amount_is_rejected() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00"]);

    let err = clinic
        .pay(case_id, "-10.00", &[(items[0], "-10.00")])
        .unwrap_err();

    assert!(matches!(err, ApiError::InvalidInput { .. }));
}

#[test]
fn test_proportional_payment_splits_by_outstanding_balance() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["300.00", "100.00"]);

    let response: RegisterPaymentResponse = register_payment_proportional(
        &mut clinic.persistence,
        case_id,
        proportional("200.00"),
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap();

    let split: Vec<(i64, &str)> = response
        .allocations
        .iter()
        .map(|a| (a.item_id, a.amount_applied.as_str()))
        .collect();
    assert_eq!(split, vec![(items[0], "150.00"), (items[1], "50.00")]);
    assert_eq!(response.outstanding, "200.00");
}

#[test]
fn test_proportional_payment_spreads_leftover_cents() {
    let mut clinic = Clinic::new();
    let (case_id, _) = clinic.case_awaiting_payment(&["100.00", "100.00", "100.00"]);

    let response: RegisterPaymentResponse = register_payment_proportional(
        &mut clinic.persistence,
        case_id,
        proportional("100.00"),
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap();

    let amounts: Vec<&str> = response
        .allocations
        .iter()
        .map(|a| a.amount_applied.as_str())
        .collect();
    assert_eq!(amounts, vec!["33.34", "33.33", "33.33"]);
}

#[test]
fn test_proportional_payment_above_balance_is_over_allocation() {
    let mut clinic = Clinic::new();
    let (case_id, _) = clinic.case_awaiting_payment(&["100.00"]);

    let err = register_payment_proportional(
        &mut clinic.persistence,
        case_id,
        proportional("100.01"),
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap_err();

    assert!(matches!(err, ApiError::OverAllocation { .. }));
}

#[test]
fn test_proportional_payment_during_evaluation_is_refused() {
    let mut clinic = Clinic::new();
    let case_id: i64 = clinic.open_case();
    clinic.transition(case_id, "evaluation").unwrap();
    clinic.add_item(case_id, "100.00");

    let err = register_payment_proportional(
        &mut clinic.persistence,
        case_id,
        proportional("50.00"),
        &clinic.receptionist,
        create_test_cause(),
        now(),
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ApiError::PolicyViolation { ref rule, .. } if rule == "payment_registration"
    ));
}

#[test]
fn test_unlock_needs_a_fully_paid_item() {
    let mut clinic = Clinic::new();
    let (case_id, items) = clinic.case_awaiting_payment(&["150.00"]);
    clinic.pay(case_id, "100.00", &[(items[0], "100.00")]).unwrap();

    let err = clinic.transition(case_id, "in_execution").unwrap_err();
    assert!(matches!(err, ApiError::PreconditionFailed { .. }));

    clinic.pay(case_id, "50.00", &[(items[0], "50.00")]).unwrap();
    clinic.transition(case_id, "in_execution").unwrap();

    let summary: CaseSummaryResponse = get_case_summary(&mut clinic.persistence, case_id).unwrap();
    assert_eq!(summary.case.status, "in_execution");
    assert_eq!(summary.case.liberator_id, Some(clinic.admin.staff_id));
    assert_eq!(summary.outstanding, "0.00");
}
