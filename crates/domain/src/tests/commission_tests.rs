// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{item_with, money};
use crate::{
    CommissionKind, CommissionRates, CommissionSummary, DomainError, Item, ItemStatus, Money,
    Percentage, derive_commissions,
};
use std::collections::BTreeMap;

fn pct(s: &str) -> Percentage {
    s.parse().unwrap()
}

fn rates(sale: &str, execution: &str) -> BTreeMap<i64, CommissionRates> {
    BTreeMap::from([(
        10,
        CommissionRates {
            sale: pct(sale),
            execution: pct(execution),
        },
    )])
}

#[test]
fn test_sale_and_execution_commissions_for_one_item() {
    let mut it: Item = item_with(1, "150.00", "150.00", ItemStatus::Done);
    it.seller_id = Some(1);
    it.executor_id = Some(2);

    let summary: CommissionSummary = derive_commissions(&[it], &rates("10", "20")).unwrap();

    assert_eq!(summary.drafts.len(), 2);
    let sale = &summary.drafts[0];
    assert_eq!(sale.kind, CommissionKind::Sale);
    assert_eq!(sale.beneficiary_id, 1);
    assert_eq!(sale.base_amount, money("150.00"));
    assert_eq!(sale.commission_amount, money("15.00"));
    let execution = &summary.drafts[1];
    assert_eq!(execution.kind, CommissionKind::Execution);
    assert_eq!(execution.beneficiary_id, 2);
    assert_eq!(execution.commission_amount, money("30.00"));

    assert_eq!(summary.sale_total, money("15.00"));
    assert_eq!(summary.execution_total, money("30.00"));
    assert_eq!(summary.grand_total, money("45.00"));
    assert_eq!(summary.per_item.len(), 1);
}

#[test]
fn test_no_sale_commission_without_seller() {
    let mut it: Item = item_with(1, "150.00", "150.00", ItemStatus::Done);
    it.seller_id = None;

    let summary: CommissionSummary = derive_commissions(&[it], &rates("10", "20")).unwrap();
    assert_eq!(summary.drafts.len(), 1);
    assert_eq!(summary.drafts[0].kind, CommissionKind::Execution);
    assert_eq!(summary.sale_total, Money::ZERO);
}

#[test]
fn test_no_execution_commission_at_zero_percent() {
    let it: Item = item_with(1, "150.00", "150.00", ItemStatus::Done);
    let summary: CommissionSummary = derive_commissions(&[it], &rates("10", "0")).unwrap();
    assert_eq!(summary.drafts.len(), 1);
    assert_eq!(summary.drafts[0].kind, CommissionKind::Sale);
    assert_eq!(summary.per_item[0].execution_commission, Money::ZERO);
}

#[test]
fn test_same_beneficiary_may_get_both_kinds() {
    let mut it: Item = item_with(1, "80.00", "80.00", ItemStatus::Done);
    it.seller_id = Some(7);
    it.executor_id = Some(7);
    let summary: CommissionSummary = derive_commissions(&[it], &rates("5", "12.5")).unwrap();
    assert_eq!(summary.drafts.len(), 2);
    assert!(summary.drafts.iter().all(|d| d.beneficiary_id == 7));
    assert_eq!(summary.grand_total, money("14.00"));
}

#[test]
fn test_commission_amount_is_price_times_percentage() {
    let items: Vec<Item> = (1..=20)
        .map(|i| item_with(i, &format!("{i}7.35"), "0", ItemStatus::Done))
        .collect();
    let summary: CommissionSummary = derive_commissions(&items, &rates("10", "25")).unwrap();
    for draft in &summary.drafts {
        let exact: i64 = draft.base_amount.cents() * draft.percentage.basis_points();
        if exact % 10_000 == 0 {
            assert_eq!(draft.commission_amount.cents(), exact / 10_000);
        }
    }
    let first = &summary.drafts[0];
    // 17.35 x 10% = 1.735, rounded half up
    assert_eq!(first.commission_amount, money("1.74"));
}

#[test]
fn test_missing_procedure_rates_is_not_found() {
    let it: Item = item_with(1, "10.00", "10.00", ItemStatus::Done);
    assert_eq!(
        derive_commissions(&[it], &BTreeMap::new()),
        Err(DomainError::ProcedureNotFound(10))
    );
}
