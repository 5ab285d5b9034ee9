// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod catalog_tests;
mod payment_tests;

use crate::{CommittedCommand, NewProcedure, Persistence, PersistenceError};
use clinica::Command;
use clinica_audit::{Actor, Cause};
use clinica_domain::{
    AllocationRequest, CaseStatus, CommissionRates, DomainError, Money, PaymentMethod, Procedure,
    StaffRole,
};
use time::OffsetDateTime;
use time::macros::datetime;

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Returns the domain error a rejected command carried.
pub fn rejection(err: &PersistenceError) -> &DomainError {
    err.rejection()
        .unwrap_or_else(|| panic!("expected a rejected command, got {err:?}"))
}

/// A seeded store: staff with each role, one client and a procedure
/// priced 150.00 with 10% sale and 20% execution commission.
pub struct Fixture {
    pub persistence: Persistence,
    pub admin: Actor,
    pub receptionist: Actor,
    pub evaluator: Actor,
    pub executor: Actor,
    pub other_executor: Actor,
    pub client_id: i64,
    pub procedure: Procedure,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_store(Persistence::new_in_memory().unwrap())
    }

    /// Seeds the given store instead of a fresh in-memory one.
    pub fn with_store(mut persistence: Persistence) -> Self {

        let mut staff = |name: &str, role: StaffRole| -> Actor {
            let id: i64 = persistence.create_staff(name, role).unwrap();
            Actor::new(id, String::from(name), role)
        };
        let admin: Actor = staff("Admin", StaffRole::Admin);
        let receptionist: Actor = staff("Recepção", StaffRole::Receptionist);
        let evaluator: Actor = staff("Dra. Avaliadora", StaffRole::Evaluator);
        let executor: Actor = staff("Executora", StaffRole::Executor);
        let other_executor: Actor = staff("Outra Executora", StaffRole::Executor);

        let client_id: i64 = persistence.create_client("Maria Silva", now()).unwrap();
        let procedure_id: i64 = persistence
            .create_procedure(&NewProcedure {
                name: String::from("Limpeza de pele"),
                price: money("150.00"),
                rates: CommissionRates {
                    sale: "10".parse().unwrap(),
                    execution: "20".parse().unwrap(),
                },
                is_active: true,
            })
            .unwrap();
        let procedure: Procedure = persistence.get_procedure(procedure_id).unwrap().unwrap();

        Self {
            persistence,
            admin,
            receptionist,
            evaluator,
            executor,
            other_executor,
            client_id,
            procedure,
        }
    }

    pub fn open_case(&mut self) -> i64 {
        self.persistence
            .open_case(
                self.client_id,
                None,
                None,
                self.receptionist.clone(),
                create_test_cause(),
                now(),
            )
            .unwrap()
            .case
            .case_id
    }

    pub fn run(
        &mut self,
        case_id: i64,
        command: Command,
        actor: &Actor,
    ) -> Result<CommittedCommand, PersistenceError> {
        self.persistence
            .apply_case_command(case_id, command, actor.clone(), create_test_cause(), now())
    }

    /// Adds an item sold by the evaluator and assigned to the executor.
    pub fn add_item(&mut self, case_id: i64, price: Option<&str>) -> i64 {
        let command: Command = Command::AddItem {
            procedure: self.procedure.clone(),
            seller_id: Some(self.evaluator.staff_id),
            executor_id: Some(self.executor.staff_id),
            price_override: price.map(money),
        };
        let admin: Actor = self.admin.clone();
        self.run(case_id, command, &admin)
            .unwrap()
            .created_id
            .unwrap()
    }

    pub fn transition(
        &mut self,
        case_id: i64,
        target: CaseStatus,
    ) -> Result<CommittedCommand, PersistenceError> {
        let admin: Actor = self.admin.clone();
        self.run(case_id, Command::RequestTransition { target }, &admin)
    }

    pub fn pay(
        &mut self,
        case_id: i64,
        amount: &str,
        allocations: &[(i64, &str)],
    ) -> Result<CommittedCommand, PersistenceError> {
        let command: Command = Command::RegisterPayment {
            amount: money(amount),
            method: PaymentMethod::InstantTransfer,
            installment_count: 1,
            note: None,
            allocations: allocations
                .iter()
                .map(|(item_id, amount)| AllocationRequest {
                    item_id: *item_id,
                    amount: money(amount),
                })
                .collect(),
        };
        let receptionist: Actor = self.receptionist.clone();
        self.run(case_id, command, &receptionist)
    }

    pub fn advance(
        &mut self,
        case_id: i64,
        item_id: i64,
        target: clinica_domain::ItemStatus,
    ) -> Result<CommittedCommand, PersistenceError> {
        let executor: Actor = self.executor.clone();
        self.run(
            case_id,
            Command::AdvanceItemStatus { item_id, target },
            &executor,
        )
    }

    /// Opens a case and walks it to `awaiting_payment` with items at the given prices.
    pub fn case_awaiting_payment(&mut self, prices: &[&str]) -> (i64, Vec<i64>) {
        let case_id: i64 = self.open_case();
        self.transition(case_id, CaseStatus::Evaluation).unwrap();
        let items: Vec<i64> = prices
            .iter()
            .map(|price| self.add_item(case_id, Some(*price)))
            .collect();
        self.transition(case_id, CaseStatus::AwaitingPayment).unwrap();
        (case_id, items)
    }

    /// Asserts every stored item respects the payment invariants.
    pub fn assert_ledger_consistent(&mut self, case_id: i64) {
        let summary = self.persistence.get_case_summary(case_id).unwrap();
        for item in &summary.items {
            assert!(item.amount_paid <= item.price, "item {} overpaid", item.item_id);
            assert!(item.is_consistent(), "item {} status mismatch", item.item_id);
            let allocated: Money = self.persistence.allocated_to_item(item.item_id).unwrap();
            assert_eq!(allocated, item.amount_paid, "item {}", item.item_id);
        }
        for record in &summary.payments {
            let allocated: Money =
                Money::sum(record.allocations.iter().map(|a| a.amount_applied)).unwrap();
            assert_eq!(allocated, record.payment.amount);
        }
    }
}
