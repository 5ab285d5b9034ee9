// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::money::Money;
use crate::types::{ItemStatus, StaffRole};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A billable procedure instance attached to a case.
///
/// Invariants maintained by the methods below:
/// - `amount_paid <= price`
/// - in the payment phase, `status == Paid` iff `amount_paid >= price`
/// - status never moves backward
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub item_id: i64,
    pub case_id: i64,
    pub procedure_id: i64,
    /// Who sold (created) the item.
    pub seller_id: Option<i64>,
    /// Who performs the item.
    pub executor_id: Option<i64>,
    /// Fixed at creation.
    pub price: Money,
    /// Sum of all allocations applied to this item.
    pub amount_paid: Money,
    pub status: ItemStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
}

impl Item {
    /// Remaining balance on the item.
    #[must_use]
    pub const fn outstanding(&self) -> Money {
        self.price.saturating_sub(self.amount_paid)
    }

    /// True once the item has received its full price.
    #[must_use]
    pub const fn is_fully_paid(&self) -> bool {
        self.amount_paid.cents() >= self.price.cents()
    }

    /// True when the item counts as paid for the execution unlock gate.
    #[must_use]
    pub const fn is_paid(&self) -> bool {
        matches!(self.status, ItemStatus::Paid)
    }

    /// True once the item is done.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        matches!(self.status, ItemStatus::Done)
    }

    /// Checks that `applied` fits within the item's remaining balance.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ItemOverpaid` if the allocation would push
    /// `amount_paid` above `price`.
    pub fn check_allocation(&self, applied: Money) -> Result<(), DomainError> {
        let after = self.amount_paid.checked_add(applied)?;
        if after > self.price {
            return Err(DomainError::ItemOverpaid {
                item_id: self.item_id,
                price: self.price,
                amount_paid: self.amount_paid,
                applied,
            });
        }
        Ok(())
    }

    /// Applies part of a payment to this item.
    ///
    /// A pending item becomes paid as soon as `amount_paid` reaches its
    /// price. Items already executing or done keep their status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ItemOverpaid` if the allocation would overpay.
    pub fn apply_payment(&mut self, applied: Money) -> Result<(), DomainError> {
        self.check_allocation(applied)?;
        self.amount_paid = self.amount_paid.checked_add(applied)?;
        if self.status == ItemStatus::Pending && self.is_fully_paid() {
            self.status = ItemStatus::Paid;
        }
        Ok(())
    }

    /// Ensures `actor` may work on this item.
    ///
    /// Admins may act on any item; anyone else must be the assigned executor.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NotAssignedExecutor` otherwise.
    pub const fn ensure_executor(&self, actor_id: i64, role: StaffRole) -> Result<(), DomainError> {
        if role.is_admin() {
            return Ok(());
        }
        match self.executor_id {
            Some(executor_id) if executor_id == actor_id => Ok(()),
            _ => Err(DomainError::NotAssignedExecutor {
                item_id: self.item_id,
                actor_id,
            }),
        }
    }

    /// Moves the item forward in its execution flow.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidItemStatusTransition` if `target` is not
    /// a forward execution step from the current status.
    pub fn advance(&mut self, target: ItemStatus, now: OffsetDateTime) -> Result<(), DomainError> {
        if !self.status.can_advance_to(target) {
            return Err(DomainError::InvalidItemStatusTransition {
                item_id: self.item_id,
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        if target == ItemStatus::Done {
            self.completed_at = Some(now);
        }
        Ok(())
    }

    /// Sets the executor. Not allowed once the item is done.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ItemAlreadyCompleted` for done items.
    pub const fn assign_executor(&mut self, executor_id: i64) -> Result<(), DomainError> {
        if self.is_done() {
            return Err(DomainError::ItemAlreadyCompleted(self.item_id));
        }
        self.executor_id = Some(executor_id);
        Ok(())
    }

    /// Checks the payment-phase consistency rule for this item.
    #[must_use]
    pub const fn is_consistent(&self) -> bool {
        if self.amount_paid.cents() > self.price.cents() {
            return false;
        }
        if self.status.is_payment_phase() {
            return self.is_paid() == self.is_fully_paid();
        }
        true
    }
}

/// An item that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub case_id: i64,
    pub procedure_id: i64,
    pub seller_id: Option<i64>,
    pub executor_id: Option<i64>,
    pub price: Money,
    pub created_at: OffsetDateTime,
}

impl NewItem {
    /// Returns the pending item this draft becomes once stored.
    #[must_use]
    pub const fn into_item(self, item_id: i64) -> Item {
        Item {
            item_id,
            case_id: self.case_id,
            procedure_id: self.procedure_id,
            seller_id: self.seller_id,
            executor_id: self.executor_id,
            price: self.price,
            amount_paid: Money::ZERO,
            status: ItemStatus::Pending,
            created_at: self.created_at,
            completed_at: None,
        }
    }
}

/// Items not yet fully paid.
#[must_use]
pub fn unpaid_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|i| !i.is_fully_paid()).collect()
}

/// Items whose status is `paid`.
#[must_use]
pub fn paid_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|i| i.is_paid()).collect()
}

/// Items whose status is not `done`.
#[must_use]
pub fn incomplete_items(items: &[Item]) -> Vec<&Item> {
    items.iter().filter(|i| !i.is_done()).collect()
}
