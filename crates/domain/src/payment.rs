// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::item::Item;
use crate::money::Money;
use crate::types::PaymentMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// Largest accepted gap between a payment amount and the sum of its
/// allocations.
///
/// Amounts are integer cents, so the sum must match exactly.
pub const ALLOCATION_TOLERANCE: Money = Money::ZERO;

/// Money received against a case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: i64,
    pub case_id: i64,
    /// Staff member who received the money.
    pub receiver_id: Option<i64>,
    pub amount: Money,
    pub method: PaymentMethod,
    pub installment_count: u32,
    pub note: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// The portion of one payment applied to one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    pub allocation_id: i64,
    pub payment_id: i64,
    pub item_id: i64,
    pub amount_applied: Money,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// A requested `(item, amount)` split of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationRequest {
    pub item_id: i64,
    pub amount: Money,
}

/// A validated payment that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPayment {
    pub case_id: i64,
    pub receiver_id: Option<i64>,
    pub amount: Money,
    pub method: PaymentMethod,
    pub installment_count: u32,
    pub note: Option<String>,
    pub allocations: Vec<AllocationRequest>,
    pub created_at: OffsetDateTime,
}

/// Validates a payment and its allocations against the case's items.
///
/// Checks, in order: the amount is positive, at least one allocation is
/// given, every allocation is positive, targets an item of the case and
/// appears once, no item would be overpaid, and the allocations add up to
/// the payment amount.
///
/// # Errors
///
/// Returns the first violated rule as a `DomainError`.
pub fn validate_allocations(
    case_id: i64,
    amount: Money,
    allocations: &[AllocationRequest],
    items: &[Item],
) -> Result<(), DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            field: "amount",
            amount,
        });
    }
    if allocations.is_empty() {
        return Err(DomainError::EmptyAllocation);
    }

    let mut seen: BTreeSet<i64> = BTreeSet::new();
    for allocation in allocations {
        if !allocation.amount.is_positive() {
            return Err(DomainError::NonPositiveAmount {
                field: "amount_applied",
                amount: allocation.amount,
            });
        }
        if !seen.insert(allocation.item_id) {
            return Err(DomainError::DuplicateAllocationItem(allocation.item_id));
        }
        let item: &Item = items
            .iter()
            .find(|i| i.item_id == allocation.item_id)
            .ok_or(DomainError::ItemNotInCase {
                case_id,
                item_id: allocation.item_id,
            })?;
        item.check_allocation(allocation.amount)?;
    }

    let allocated: Money = Money::sum(allocations.iter().map(|a| a.amount))?;
    if allocated.abs_diff(amount) > ALLOCATION_TOLERANCE {
        return Err(DomainError::AllocationSumMismatch {
            payment_amount: amount,
            allocated,
        });
    }
    Ok(())
}

/// Splits `amount` across the items that still owe money, proportionally
/// to each item's outstanding balance.
///
/// Uses the largest-remainder method so the shares add up to `amount`
/// exactly; leftover cents go to the items with the largest fractional
/// share, earlier items first on ties. No item receives more than it owes.
///
/// # Errors
///
/// - `DomainError::NonPositiveAmount` if `amount` is not positive.
/// - `DomainError::AmountExceedsOutstanding` if `amount` is larger than
///   the total still owed.
pub fn distribute_proportionally(
    amount: Money,
    items: &[Item],
) -> Result<Vec<AllocationRequest>, DomainError> {
    if !amount.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            field: "amount",
            amount,
        });
    }

    let owing: Vec<(i64, i128)> = items
        .iter()
        .filter(|i| i.outstanding().is_positive())
        .map(|i| (i.item_id, i128::from(i.outstanding().cents())))
        .collect();
    let total: i128 = owing.iter().map(|(_, o)| o).sum();
    let requested: i128 = i128::from(amount.cents());

    if requested > total {
        let outstanding: i64 = i64::try_from(total).map_err(|_| DomainError::AmountOverflow)?;
        return Err(DomainError::AmountExceedsOutstanding {
            amount,
            outstanding: Money::from_cents(outstanding),
        });
    }

    // (position, share, remainder)
    let mut shares: Vec<(usize, i128, i128)> = owing
        .iter()
        .enumerate()
        .map(|(pos, (_, outstanding))| {
            let scaled: i128 = requested * outstanding;
            (pos, scaled / total, scaled % total)
        })
        .collect();

    let assigned: i128 = shares.iter().map(|(_, share, _)| share).sum();
    let mut leftover: i128 = requested - assigned;

    let mut by_remainder: Vec<usize> = (0..shares.len()).collect();
    by_remainder.sort_by(|a, b| shares[*b].2.cmp(&shares[*a].2).then(a.cmp(b)));
    for idx in by_remainder {
        if leftover == 0 {
            break;
        }
        shares[idx].1 += 1;
        leftover -= 1;
    }

    shares
        .into_iter()
        .filter(|(_, share, _)| *share > 0)
        .map(|(pos, share, _)| {
            let cents: i64 = i64::try_from(share).map_err(|_| DomainError::AmountOverflow)?;
            Ok(AllocationRequest {
                item_id: owing[pos].0,
                amount: Money::from_cents(cents),
            })
        })
        .collect()
}
