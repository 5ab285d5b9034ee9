// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CaseState, CaseTransition, Command, CoreError, apply};
use clinica_audit::{Actor, Cause};
use clinica_domain::{
    AllocationRequest, Case, CaseStatus, CommissionRates, Item, ItemStatus, Money, PaymentMethod,
    Procedure, StaffRole,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub const CASE_ID: i64 = 1;
pub const SELLER: i64 = 11;
pub const EXECUTOR: i64 = 22;
pub const PROCEDURE_ID: i64 = 5;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

pub fn admin() -> Actor {
    Actor::new(1, String::from("Admin"), StaffRole::Admin)
}

pub fn receptionist() -> Actor {
    Actor::new(3, String::from("Recepção"), StaffRole::Receptionist)
}

pub fn executor() -> Actor {
    Actor::new(EXECUTOR, String::from("Executor"), StaffRole::Executor)
}

pub fn other_executor() -> Actor {
    Actor::new(23, String::from("Outro"), StaffRole::Executor)
}

pub fn cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("test"))
}

pub fn procedure(price: &str, sale: &str, execution: &str) -> Procedure {
    Procedure {
        procedure_id: PROCEDURE_ID,
        name: String::from("Limpeza de pele"),
        price: money(price),
        sale_commission: sale.parse().unwrap(),
        execution_commission: execution.parse().unwrap(),
        is_active: true,
    }
}

pub fn case_in(status: CaseStatus) -> CaseState {
    let mut state: CaseState = CaseState::new(Case {
        case_id: CASE_ID,
        client_id: 100,
        evaluator_id: None,
        liberator_id: None,
        status,
        notes: None,
        created_at: datetime!(2026-03-01 09:00 UTC),
        unlocked_at: None,
        finalized_at: None,
    });
    state.commission_rates.insert(
        PROCEDURE_ID,
        CommissionRates {
            sale: "10".parse().unwrap(),
            execution: "20".parse().unwrap(),
        },
    );
    state
}

pub fn with_item(mut state: CaseState, item_id: i64, price: &str) -> CaseState {
    state.items.push(Item {
        item_id,
        case_id: CASE_ID,
        procedure_id: PROCEDURE_ID,
        seller_id: Some(SELLER),
        executor_id: Some(EXECUTOR),
        price: money(price),
        amount_paid: Money::ZERO,
        status: ItemStatus::Pending,
        created_at: datetime!(2026-03-01 09:10 UTC),
        completed_at: None,
    });
    state
}

pub fn run(state: &CaseState, command: Command, actor: Actor) -> Result<CaseTransition, CoreError> {
    apply(state, command, actor, cause(), now())
}

pub fn pay(amount: &str, allocations: &[(i64, &str)]) -> Command {
    Command::RegisterPayment {
        amount: money(amount),
        method: PaymentMethod::Cash,
        installment_count: 1,
        note: None,
        allocations: allocations
            .iter()
            .map(|(item_id, amount)| AllocationRequest {
                item_id: *item_id,
                amount: money(amount),
            })
            .collect(),
    }
}

/// Applies a command that must succeed and returns the new state.
pub fn step(state: &CaseState, command: Command, actor: Actor) -> CaseState {
    run(state, command, actor).unwrap().new_state
}
