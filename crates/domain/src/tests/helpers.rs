// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseStatus, Item, ItemStatus, Money};
use time::OffsetDateTime;
use time::macros::datetime;

pub const CASE_ID: i64 = 1;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

pub fn item(item_id: i64, price: &str) -> Item {
    Item {
        item_id,
        case_id: CASE_ID,
        procedure_id: 10,
        seller_id: Some(100),
        executor_id: Some(200),
        price: money(price),
        amount_paid: Money::ZERO,
        status: ItemStatus::Pending,
        created_at: datetime!(2026-03-01 09:00 UTC),
        completed_at: None,
    }
}

pub fn item_with(item_id: i64, price: &str, paid: &str, status: ItemStatus) -> Item {
    Item {
        amount_paid: money(paid),
        status,
        ..item(item_id, price)
    }
}

pub const fn all_statuses() -> [CaseStatus; 5] {
    CaseStatus::ALL
}
