// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{item, item_with, money, now};
use crate::{
    DomainError, Item, ItemStatus, Money, StaffRole, incomplete_items, paid_items, unpaid_items,
};

#[test]
fn test_two_partial_payments_make_item_paid() {
    let mut it: Item = item(1, "150.00");

    it.apply_payment(money("100.00")).unwrap();
    assert_eq!(it.status, ItemStatus::Pending);
    assert_eq!(it.outstanding(), money("50.00"));

    it.apply_payment(money("50.00")).unwrap();
    assert_eq!(it.amount_paid, money("150.00"));
    assert_eq!(it.status, ItemStatus::Paid);
    assert_eq!(it.outstanding(), Money::ZERO);
    assert!(it.is_consistent());
}

#[test]
fn test_overpayment_is_rejected_and_item_unchanged() {
    let mut it: Item = item_with(1, "150.00", "120.00", ItemStatus::Pending);

    let err: DomainError = it.apply_payment(money("30.01")).unwrap_err();
    assert_eq!(
        err,
        DomainError::ItemOverpaid {
            item_id: 1,
            price: money("150.00"),
            amount_paid: money("120.00"),
            applied: money("30.01"),
        }
    );
    assert_eq!(it.amount_paid, money("120.00"));
    assert_eq!(it.status, ItemStatus::Pending);
}

#[test]
fn test_paid_status_implies_fully_paid() {
    let it: Item = item_with(1, "150.00", "149.99", ItemStatus::Paid);
    assert!(!it.is_consistent());
}

#[test]
fn test_fully_paid_implies_paid_status() {
    let it: Item = item_with(1, "150.00", "150.00", ItemStatus::Pending);
    assert!(!it.is_consistent());

    let it: Item = item_with(1, "150.00", "150.00", ItemStatus::Paid);
    assert!(it.is_consistent());
}

#[test]
fn test_payment_on_executing_item_keeps_status() {
    let mut it: Item = item_with(1, "100.00", "40.00", ItemStatus::Executing);
    it.apply_payment(money("60.00")).unwrap();
    assert_eq!(it.status, ItemStatus::Executing);
    assert!(it.is_fully_paid());
    assert!(it.is_consistent());
}

#[test]
fn test_assigned_executor_may_advance() {
    let mut it: Item = item_with(1, "100.00", "100.00", ItemStatus::Paid);
    it.ensure_executor(200, StaffRole::Executor).unwrap();
    it.advance(ItemStatus::Executing, now()).unwrap();
    assert_eq!(it.completed_at, None);
    it.advance(ItemStatus::Done, now()).unwrap();
    assert_eq!(it.status, ItemStatus::Done);
    assert_eq!(it.completed_at, Some(now()));
}

#[test]
fn test_other_executor_is_denied() {
    let it: Item = item(1, "100.00");
    assert_eq!(
        it.ensure_executor(201, StaffRole::Executor),
        Err(DomainError::NotAssignedExecutor {
            item_id: 1,
            actor_id: 201
        })
    );
}

#[test]
fn test_admin_may_act_on_any_item() {
    let mut it: Item = item(1, "100.00");
    it.executor_id = None;
    assert!(it.ensure_executor(999, StaffRole::Admin).is_ok());
}

#[test]
fn test_item_cannot_skip_or_go_back() {
    let mut it: Item = item(1, "100.00");
    assert!(matches!(
        it.advance(ItemStatus::Done, now()),
        Err(DomainError::InvalidItemStatusTransition { .. })
    ));

    let mut done: Item = item_with(2, "100.00", "100.00", ItemStatus::Done);
    assert!(done.advance(ItemStatus::Executing, now()).is_err());
    assert_eq!(done.status, ItemStatus::Done);
}

#[test]
fn test_executor_cannot_be_changed_after_done() {
    let mut it: Item = item_with(1, "100.00", "100.00", ItemStatus::Done);
    assert_eq!(
        it.assign_executor(300),
        Err(DomainError::ItemAlreadyCompleted(1))
    );

    let mut open: Item = item(2, "100.00");
    open.assign_executor(300).unwrap();
    assert_eq!(open.executor_id, Some(300));
}

#[test]
fn test_item_queries() {
    let items: Vec<Item> = vec![
        item(1, "100.00"),
        item_with(2, "100.00", "100.00", ItemStatus::Paid),
        item_with(3, "100.00", "100.00", ItemStatus::Done),
    ];

    let unpaid: Vec<i64> = unpaid_items(&items).iter().map(|i| i.item_id).collect();
    let paid: Vec<i64> = paid_items(&items).iter().map(|i| i.item_id).collect();
    let incomplete: Vec<i64> = incomplete_items(&items).iter().map(|i| i.item_id).collect();

    assert_eq!(unpaid, vec![1]);
    assert_eq!(paid, vec![2]);
    assert_eq!(incomplete, vec![1, 2]);
}
