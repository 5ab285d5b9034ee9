// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::money::Money;
use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime};

/// An expected future payment (parcela). Advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installment {
    pub installment_id: i64,
    pub case_id: i64,
    /// Sequential per case, starting at 1.
    pub number: u32,
    pub amount: Money,
    pub due_date: Date,
    pub paid: bool,
    /// Payment that settled it.
    pub payment_id: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub paid_at: Option<OffsetDateTime>,
    /// Superseded by a later schedule while still unpaid.
    pub replaced: bool,
}

impl Installment {
    /// Still expected: neither paid nor replaced.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !self.paid && !self.replaced
    }

    /// Marks the installment as settled by `payment_id`.
    ///
    /// # Errors
    ///
    /// - `DomainError::InstallmentAlreadySettled` if already paid.
    /// - `DomainError::InstallmentReplaced` if a later schedule superseded it.
    pub const fn settle(
        &mut self,
        payment_id: i64,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if self.paid {
            return Err(DomainError::InstallmentAlreadySettled(self.installment_id));
        }
        if self.replaced {
            return Err(DomainError::InstallmentReplaced(self.installment_id));
        }
        self.paid = true;
        self.payment_id = Some(payment_id);
        self.paid_at = Some(now);
        Ok(())
    }
}

/// An installment that has not been stored yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstallmentPlanEntry {
    pub number: u32,
    pub amount: Money,
    pub due_date: Date,
}

/// Splits `total` into `count` installments.
///
/// Each installment gets `total / count`; the remainder cents go to the
/// last one. Numbers start after `last_number` and due dates are spaced
/// `interval_days` apart from `first_due`.
///
/// # Errors
///
/// - `DomainError::InvalidInstallmentCount` if `count` is zero.
/// - `DomainError::NonPositiveAmount` if `total` is not positive.
/// - `DomainError::DateArithmeticOverflow` if a due date is out of range.
pub fn split_into_installments(
    total: Money,
    count: u32,
    first_due: Date,
    interval_days: u32,
    last_number: u32,
) -> Result<Vec<InstallmentPlanEntry>, DomainError> {
    if count == 0 {
        return Err(DomainError::InvalidInstallmentCount(count));
    }
    if !total.is_positive() {
        return Err(DomainError::NonPositiveAmount {
            field: "total",
            amount: total,
        });
    }

    let base: i64 = total.cents() / i64::from(count);
    let remainder: i64 = total.cents() % i64::from(count);
    if base == 0 {
        return Err(DomainError::InvalidInstallmentCount(count));
    }

    (0..count)
        .map(|offset| {
            let is_last: bool = offset + 1 == count;
            let cents: i64 = if is_last { base + remainder } else { base };
            let days: i64 = i64::from(interval_days) * i64::from(offset);
            let due_date: Date = first_due
                .checked_add(Duration::days(days))
                .ok_or(DomainError::DateArithmeticOverflow)?;
            let number: u32 = last_number
                .checked_add(offset + 1)
                .ok_or(DomainError::InvalidInstallmentCount(count))?;
            Ok(InstallmentPlanEntry {
                number,
                amount: Money::from_cents(cents),
                due_date,
            })
        })
        .collect()
}
