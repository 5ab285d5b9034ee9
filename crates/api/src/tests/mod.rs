// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test module for the API crate.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod payment_tests;

use std::collections::HashMap;

use clinica_audit::Cause;
use clinica_domain::{CommissionRates, Money, StaffRole};
use clinica_persistence::{NewProcedure, Persistence, StaffMember};
use time::OffsetDateTime;
use time::macros::datetime;

use crate::{
    AdvanceItemStatusRequest, AllocationLine, ApiError, AuthenticatedActor, AuthenticationService,
    CreateItemRequest, IdentityService, OpenCaseRequest, RegisterPaymentRequest,
    RequestTransitionRequest, advance_item_status, create_item, open_case, register_payment,
    request_transition,
};

pub fn now() -> OffsetDateTime {
    datetime!(2026-03-02 14:30 UTC)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn money(s: &str) -> Money {
    s.parse().unwrap()
}

/// An identity service that knows only the staff it was given.
#[derive(Default)]
pub struct FakeIdentity {
    pub staff: HashMap<i64, StaffMember>,
}

impl FakeIdentity {
    pub fn with(mut self, staff_id: i64, role: StaffRole, is_active: bool) -> Self {
        self.staff.insert(
            staff_id,
            StaffMember {
                staff_id,
                display_name: format!("Staff {staff_id}"),
                role,
                is_active,
            },
        );
        self
    }
}

impl IdentityService for FakeIdentity {
    fn find_staff(&mut self, staff_id: i64) -> Result<Option<StaffMember>, ApiError> {
        Ok(self.staff.get(&staff_id).cloned())
    }
}

/// A seeded store with one staff member per role, a client and a
/// procedure priced 150.00 with 10% sale and 20% execution commission.
pub struct Clinic {
    pub persistence: Persistence,
    pub admin: AuthenticatedActor,
    pub receptionist: AuthenticatedActor,
    pub evaluator: AuthenticatedActor,
    pub executor: AuthenticatedActor,
    pub client_id: i64,
    pub procedure_id: i64,
}

impl Clinic {
    pub fn new() -> Self {
        let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

        let mut staff = |name: &str, role: StaffRole| -> AuthenticatedActor {
            let id: i64 = persistence.create_staff(name, role).unwrap();
            AuthenticationService::authenticate(&mut persistence, id).unwrap()
        };
        let admin: AuthenticatedActor = staff("Admin", StaffRole::Admin);
        let receptionist: AuthenticatedActor = staff("Recepção", StaffRole::Receptionist);
        let evaluator: AuthenticatedActor = staff("Dra. Avaliadora", StaffRole::Evaluator);
        let executor: AuthenticatedActor = staff("Executora", StaffRole::Executor);

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

        Self {
            persistence,
            admin,
            receptionist,
            evaluator,
            executor,
            client_id,
            procedure_id,
        }
    }

    pub fn open_case(&mut self) -> i64 {
        let request: OpenCaseRequest = OpenCaseRequest {
            client_id: self.client_id,
            evaluator_id: Some(self.evaluator.staff_id),
            notes: None,
        };
        open_case(
            &mut self.persistence,
            request,
            &self.receptionist,
            create_test_cause(),
            now(),
        )
        .unwrap()
        .case
        .case_id
    }

    pub fn transition(&mut self, case_id: i64, target: &str) -> Result<(), ApiError> {
        request_transition(
            &mut self.persistence,
            case_id,
            &RequestTransitionRequest {
                target: target.to_string(),
            },
            &self.admin,
            create_test_cause(),
            now(),
        )
        .map(|_| ())
    }

    /// Adds an item sold by the evaluator and assigned to the executor.
    pub fn add_item(&mut self, case_id: i64, price: &str) -> i64 {
        let request: CreateItemRequest = CreateItemRequest {
            procedure_id: self.procedure_id,
            seller_id: Some(self.evaluator.staff_id),
            executor_id: Some(self.executor.staff_id),
            price_override: Some(price.to_string()),
        };
        create_item(
            &mut self.persistence,
            case_id,
            &request,
            &self.evaluator,
            create_test_cause(),
            now(),
        )
        .unwrap()
        .item
        .item_id
    }

    /// Opens a case and walks it to `awaiting_payment` with items at the
    /// given prices.
    pub fn case_awaiting_payment(&mut self, prices: &[&str]) -> (i64, Vec<i64>) {
        let case_id: i64 = self.open_case();
        self.transition(case_id, "evaluation").unwrap();
        let items: Vec<i64> = prices
            .iter()
            .map(|price| self.add_item(case_id, price))
            .collect();
        self.transition(case_id, "awaiting_payment").unwrap();
        (case_id, items)
    }

    pub fn pay(
        &mut self,
        case_id: i64,
        amount: &str,
        allocations: &[(i64, &str)],
    ) -> Result<i64, ApiError> {
        let request: RegisterPaymentRequest = RegisterPaymentRequest {
            amount: amount.to_string(),
            method: String::from("instant_transfer"),
            installment_count: None,
            note: None,
            allocations: allocations
                .iter()
                .map(|(item_id, amount)| AllocationLine {
                    item_id: *item_id,
                    amount: (*amount).to_string(),
                })
                .collect(),
        };
        register_payment(
            &mut self.persistence,
            case_id,
            request,
            &self.receptionist,
            create_test_cause(),
            now(),
        )
        .map(|response| response.payment_id)
    }

    pub fn advance(&mut self, case_id: i64, item_id: i64, status: &str) -> Result<(), ApiError> {
        advance_item_status(
            &mut self.persistence,
            case_id,
            item_id,
            &AdvanceItemStatusRequest {
                status: status.to_string(),
            },
            &self.executor,
            create_test_cause(),
            now(),
        )
        .map(|_| ())
    }

    /// Walks a case to `in_execution` with every item paid and done.
    pub fn settled_case(&mut self, prices: &[&str]) -> (i64, Vec<i64>) {
        let (case_id, items) = self.case_awaiting_payment(prices);
        for (item_id, price) in items.iter().zip(prices.iter().copied()) {
            self.pay(case_id, price, &[(*item_id, price)]).unwrap();
        }
        self.transition(case_id, "in_execution").unwrap();
        for item_id in &items {
            self.advance(case_id, *item_id, "executing").unwrap();
            self.advance(case_id, *item_id, "done").unwrap();
        }
        (case_id, items)
    }
}
