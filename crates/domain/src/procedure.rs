// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::money::{Money, Percentage};
use serde::{Deserialize, Serialize};

/// A billable procedure definition from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub procedure_id: i64,
    pub name: String,
    /// Default price for new items.
    pub price: Money,
    pub sale_commission: Percentage,
    pub execution_commission: Percentage,
    pub is_active: bool,
}

impl Procedure {
    /// Ensures the procedure may still be sold.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ProcedureInactive` if the procedure is inactive.
    pub const fn ensure_active(&self) -> Result<(), DomainError> {
        if self.is_active {
            Ok(())
        } else {
            Err(DomainError::ProcedureInactive(self.procedure_id))
        }
    }

    /// Price for a new item: the override when given, the catalog price otherwise.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::NonPositiveAmount` if the resulting price is not positive.
    pub const fn item_price(&self, price_override: Option<Money>) -> Result<Money, DomainError> {
        let price = match price_override {
            Some(price) => price,
            None => self.price,
        };
        if !price.is_positive() {
            return Err(DomainError::NonPositiveAmount {
                field: "price",
                amount: price,
            });
        }
        Ok(price)
    }

    #[must_use]
    pub const fn rates(&self) -> CommissionRates {
        CommissionRates {
            sale: self.sale_commission,
            execution: self.execution_commission,
        }
    }
}

/// Sale and execution commission percentages of one procedure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CommissionRates {
    pub sale: Percentage,
    pub execution: Percentage,
}
