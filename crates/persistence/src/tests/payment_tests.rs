// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Barrier};
use std::thread::JoinHandle;

use crate::mutations::cases::persist_outcome;
use crate::{CommittedCommand, Persistence, PersistenceError};
use clinica::{Command, Outcome};
use clinica_domain::{
    AllocationRequest, CaseStatus, DomainError, ErrorKind, ItemStatus, Money, NewPayment,
    PaymentMethod,
};
use diesel::SqliteConnection;

use super::{Fixture, create_test_cause, money, now, rejection};

#[test]
fn test_two_payments_settle_single_item() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00"]);

    fx.pay(case_id, "100.00", &[(items[0], "100.00")]).unwrap();
    let item = fx.persistence.get_item(items[0]).unwrap().unwrap();
    assert_eq!(item.amount_paid, money("100.00"));
    assert_eq!(item.status, ItemStatus::Pending);

    fx.pay(case_id, "50.00", &[(items[0], "50.00")]).unwrap();

    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert_eq!(summary.items[0].amount_paid, money("150.00"));
    assert_eq!(summary.items[0].status, ItemStatus::Paid);
    assert_eq!(summary.total_paid, money("150.00"));
    assert_eq!(summary.outstanding, Money::ZERO);
    assert_eq!(summary.payments.len(), 2);
    fx.assert_ledger_consistent(case_id);
}

#[test]
fn test_split_payment_across_two_items() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["300.00", "500.00"]);

    let committed = fx
        .pay(
            case_id,
            "500.00",
            &[(items[0], "300.00"), (items[1], "200.00")],
        )
        .unwrap();

    let payment_id: i64 = committed.created_id.unwrap();
    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert_eq!(summary.items[0].status, ItemStatus::Paid);
    assert_eq!(summary.items[1].amount_paid, money("200.00"));
    assert_eq!(summary.items[1].status, ItemStatus::Pending);
    assert_eq!(summary.total_due, money("800.00"));
    assert_eq!(summary.outstanding, money("300.00"));

    let record = &summary.payments[0];
    assert_eq!(record.payment.payment_id, payment_id);
    assert_eq!(record.payment.method, PaymentMethod::InstantTransfer);
    assert_eq!(record.payment.receiver_id, Some(fx.receptionist.staff_id));
    assert_eq!(record.allocations.len(), 2);
    fx.assert_ledger_consistent(case_id);
}

#[test]
fn test_overpayment_is_rejected_and_nothing_is_written() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00", "50.00"]);
    fx.pay(case_id, "100.00", &[(items[0], "100.00")]).unwrap();

    let err = fx
        .pay(
            case_id,
            "80.00",
            &[(items[1], "20.00"), (items[0], "60.00")],
        )
        .unwrap_err();

    assert_eq!(rejection(&err).kind(), ErrorKind::OverAllocation);
    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert_eq!(summary.payments.len(), 1);
    assert_eq!(summary.items[0].amount_paid, money("100.00"));
    assert_eq!(summary.items[1].amount_paid, Money::ZERO);
    fx.assert_ledger_consistent(case_id);
}

#[test]
fn test_allocation_sum_must_match_amount() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00"]);

    let err = fx
        .pay(case_id, "100.00", &[(items[0], "99.99")])
        .unwrap_err();

    assert_eq!(
        rejection(&err),
        &DomainError::AllocationSumMismatch {
            payment_amount: money("100.00"),
            allocated: money("99.99"),
        }
    );
}

#[test]
fn test_allocation_to_item_of_another_case_is_not_found() {
    let mut fx = Fixture::new();
    let (case_id, _) = fx.case_awaiting_payment(&["150.00"]);
    let (_, other_items) = fx.case_awaiting_payment(&["150.00"]);

    let err = fx
        .pay(case_id, "10.00", &[(other_items[0], "10.00")])
        .unwrap_err();

    assert_eq!(
        rejection(&err),
        &DomainError::ItemNotInCase {
            case_id,
            item_id: other_items[0],
        }
    );
    assert_eq!(
        fx.persistence.get_item(other_items[0]).unwrap().unwrap().amount_paid,
        Money::ZERO
    );
}

#[test]
fn test_payment_before_awaiting_payment_is_rejected() {
    let mut fx = Fixture::new();
    let case_id: i64 = fx.open_case();
    fx.transition(case_id, CaseStatus::Evaluation).unwrap();
    let item_id: i64 = fx.add_item(case_id, None);

    let err = fx
        .pay(case_id, "150.00", &[(item_id, "150.00")])
        .unwrap_err();

    assert_eq!(
        rejection(&err),
        &DomainError::PaymentsNotAccepted(CaseStatus::Evaluation)
    );
}

#[test]
fn test_installments_only_allowed_on_credit_card() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00"]);
    let receptionist = fx.receptionist.clone();

    let err = fx
        .run(
            case_id,
            Command::RegisterPayment {
                amount: money("150.00"),
                method: PaymentMethod::DebitCard,
                installment_count: 3,
                note: None,
                allocations: vec![AllocationRequest {
                    item_id: items[0],
                    amount: money("150.00"),
                }],
            },
            &receptionist,
        )
        .unwrap_err();
    assert_eq!(rejection(&err).kind(), ErrorKind::InvalidInput);

    fx.run(
        case_id,
        Command::RegisterPayment {
            amount: money("150.00"),
            method: PaymentMethod::CreditCard,
            installment_count: 3,
            note: Some(String::from(" 3x sem juros ")),
            allocations: vec![AllocationRequest {
                item_id: items[0],
                amount: money("150.00"),
            }],
        },
        &receptionist,
    )
    .unwrap();

    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert_eq!(summary.payments[0].payment.installment_count, 3);
    assert_eq!(summary.payments[0].payment.note.as_deref(), Some("3x sem juros"));
}

#[test]
fn test_payment_to_executing_item_keeps_its_status() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00", "100.00"]);
    fx.pay(case_id, "150.00", &[(items[0], "150.00")]).unwrap();
    fx.transition(case_id, CaseStatus::InExecution).unwrap();
    fx.advance(case_id, items[1], ItemStatus::Executing).unwrap();

    fx.pay(case_id, "100.00", &[(items[1], "100.00")]).unwrap();

    let item = fx.persistence.get_item(items[1]).unwrap().unwrap();
    assert_eq!(item.amount_paid, money("100.00"));
    assert_eq!(item.status, ItemStatus::Executing);
    fx.assert_ledger_consistent(case_id);
}

fn overpaying_outcome(case_id: i64, item_id: i64) -> Outcome {
    Outcome::PaymentRegistered {
        payment: NewPayment {
            case_id,
            receiver_id: None,
            amount: money("200.00"),
            method: PaymentMethod::Cash,
            installment_count: 1,
            note: None,
            allocations: vec![AllocationRequest {
                item_id,
                amount: money("200.00"),
            }],
            created_at: now(),
        },
        item_statuses: vec![(item_id, ItemStatus::Paid)],
    }
}

#[test]
fn test_store_refuses_increment_past_price() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00"]);
    let outcome: Outcome = overpaying_outcome(case_id, items[0]);

    let err = fx
        .persistence
        .conn
        .immediate_transaction::<_, PersistenceError, _>(|conn: &mut SqliteConnection| {
            persist_outcome(conn, case_id, &outcome, now())
        })
        .unwrap_err();

    assert!(matches!(err, PersistenceError::ConcurrentModification(_)));
    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert!(summary.payments.is_empty());
    assert_eq!(summary.items[0].amount_paid, Money::ZERO);
    assert_eq!(summary.items[0].status, ItemStatus::Pending);
}

#[test]
fn test_ledger_stays_consistent_over_many_payments() {
    let mut fx = Fixture::new();
    let (case_id, items) = fx.case_awaiting_payment(&["150.00", "99.99", "0.03"]);

    fx.pay(case_id, "50.00", &[(items[0], "25.00"), (items[1], "25.00")])
        .unwrap();
    fx.pay(case_id, "0.03", &[(items[2], "0.01"), (items[1], "0.02")])
        .unwrap();
    fx.pay(case_id, "0.03", &[(items[2], "0.03")]).unwrap_err();
    fx.pay(case_id, "125.02", &[(items[0], "125.00"), (items[2], "0.02")])
        .unwrap();
    fx.pay(case_id, "74.97", &[(items[1], "74.97")]).unwrap();

    let summary = fx.persistence.get_case_summary(case_id).unwrap();
    assert!(summary.items.iter().all(|i| i.status == ItemStatus::Paid));
    assert_eq!(summary.outstanding, Money::ZERO);
    fx.assert_ledger_consistent(case_id);
}

fn remove_database_files(path: &Path) {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        let _ = std::fs::remove_file(PathBuf::from(name));
    }
}

#[test]
fn test_concurrent_payments_cannot_jointly_overpay_an_item() {
    let path: PathBuf = std::env::temp_dir().join(format!(
        "clinica_payment_race_{}.sqlite3",
        std::process::id()
    ));
    remove_database_files(&path);

    let mut fx = Fixture::with_store(Persistence::new_with_file(&path).unwrap());
    let (case_id, items) = fx.case_awaiting_payment(&["150.00"]);
    let item_id: i64 = items[0];

    let barrier: Arc<Barrier> = Arc::new(Barrier::new(2));
    let writers: Vec<JoinHandle<Result<CommittedCommand, PersistenceError>>> = (0..2)
        .map(|_| {
            let path: PathBuf = path.clone();
            let barrier: Arc<Barrier> = Arc::clone(&barrier);
            let actor = fx.receptionist.clone();
            std::thread::spawn(move || {
                let mut store: Persistence = Persistence::new_with_file(&path).unwrap();
                barrier.wait();
                store.apply_case_command(
                    case_id,
                    Command::RegisterPayment {
                        amount: money("100.00"),
                        method: PaymentMethod::Cash,
                        installment_count: 1,
                        note: None,
                        allocations: vec![AllocationRequest {
                            item_id,
                            amount: money("100.00"),
                        }],
                    },
                    actor,
                    create_test_cause(),
                    now(),
                )
            })
        })
        .collect();
    let results: Vec<Result<CommittedCommand, PersistenceError>> = writers
        .into_iter()
        .map(|writer| writer.join().unwrap())
        .collect();

    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    let loser: &PersistenceError = results
        .iter()
        .find_map(|r| r.as_ref().err())
        .unwrap();
    assert_eq!(rejection(loser).kind(), ErrorKind::OverAllocation);

    let item = fx.persistence.get_item(item_id).unwrap().unwrap();
    assert_eq!(item.amount_paid, money("100.00"));
    assert!(item.amount_paid <= item.price);
    assert_eq!(fx.persistence.get_case_summary(case_id).unwrap().payments.len(), 1);
    fx.assert_ledger_consistent(case_id);

    drop(fx);
    remove_database_files(&path);
}
