// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::item::Item;
use crate::money::{Money, Percentage};
use crate::procedure::CommissionRates;
use crate::types::CommissionKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// A stored commission record. Write-once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commission {
    pub commission_id: i64,
    pub case_id: i64,
    pub item_id: i64,
    pub beneficiary_id: i64,
    pub kind: CommissionKind,
    pub percentage: Percentage,
    /// The item price.
    pub base_amount: Money,
    pub commission_amount: Money,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A commission computed at finalization, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommissionDraft {
    pub case_id: i64,
    pub item_id: i64,
    pub beneficiary_id: i64,
    pub kind: CommissionKind,
    pub percentage: Percentage,
    pub base_amount: Money,
    pub commission_amount: Money,
}

impl CommissionDraft {
    fn compute(
        item: &Item,
        kind: CommissionKind,
        beneficiary_id: i64,
        percentage: Percentage,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            case_id: item.case_id,
            item_id: item.item_id,
            beneficiary_id,
            kind,
            percentage,
            base_amount: item.price,
            commission_amount: item.price.apply_percentage(percentage)?,
        })
    }
}

/// Commission detail for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCommissionDetail {
    pub item_id: i64,
    pub procedure_id: i64,
    pub price: Money,
    pub seller_id: Option<i64>,
    pub sale_commission: Money,
    pub executor_id: Option<i64>,
    pub execution_commission: Money,
}

/// Everything the commission generator produced for a case.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionSummary {
    pub sale_total: Money,
    pub execution_total: Money,
    pub grand_total: Money,
    pub per_item: Vec<ItemCommissionDetail>,
    pub drafts: Vec<CommissionDraft>,
}

/// Derives the sale and execution commissions of every item.
///
/// For each item, a sale commission goes to the seller and an execution
/// commission to the executor, each only when the beneficiary is set and
/// the procedure's percentage is above zero. The amount is
/// `price × percentage / 100`, rounded to the cent.
///
/// # Errors
///
/// - `DomainError::ProcedureNotFound` if an item's procedure has no rates.
/// - `DomainError::AmountOverflow` if a total does not fit.
pub fn derive_commissions(
    items: &[Item],
    rates: &BTreeMap<i64, CommissionRates>,
) -> Result<CommissionSummary, DomainError> {
    let mut summary: CommissionSummary = CommissionSummary::default();

    for item in items {
        let item_rates: CommissionRates = *rates
            .get(&item.procedure_id)
            .ok_or(DomainError::ProcedureNotFound(item.procedure_id))?;

        let sale: Option<CommissionDraft> = match item.seller_id {
            Some(seller_id) if !item_rates.sale.is_zero() => Some(CommissionDraft::compute(
                item,
                CommissionKind::Sale,
                seller_id,
                item_rates.sale,
            )?),
            _ => None,
        };
        let execution: Option<CommissionDraft> = match item.executor_id {
            Some(executor_id) if !item_rates.execution.is_zero() => {
                Some(CommissionDraft::compute(
                    item,
                    CommissionKind::Execution,
                    executor_id,
                    item_rates.execution,
                )?)
            }
            _ => None,
        };

        let sale_amount: Money = sale.as_ref().map_or(Money::ZERO, |d| d.commission_amount);
        let execution_amount: Money = execution
            .as_ref()
            .map_or(Money::ZERO, |d| d.commission_amount);

        summary.sale_total = summary.sale_total.checked_add(sale_amount)?;
        summary.execution_total = summary.execution_total.checked_add(execution_amount)?;
        summary.per_item.push(ItemCommissionDetail {
            item_id: item.item_id,
            procedure_id: item.procedure_id,
            price: item.price,
            seller_id: item.seller_id,
            sale_commission: sale_amount,
            executor_id: item.executor_id,
            execution_commission: execution_amount,
        });
        summary.drafts.extend(sale);
        summary.drafts.extend(execution);
    }

    summary.grand_total = summary.sale_total.checked_add(summary.execution_total)?;
    Ok(summary)
}
