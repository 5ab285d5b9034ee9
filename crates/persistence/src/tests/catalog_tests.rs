// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::NewProcedure;
use clinica_domain::{CommissionRates, DomainError, ErrorKind, Procedure, StaffRole};

use super::{Fixture, money, now, rejection};

#[test]
fn test_client_round_trip() {
    let mut fx = Fixture::new();

    let client = fx.persistence.get_client(fx.client_id).unwrap().unwrap();

    assert_eq!(client.name, "Maria Silva");
    assert_eq!(client.created_at, now());
    assert!(fx.persistence.get_client(fx.client_id + 100).unwrap().is_none());
}

#[test]
fn test_staff_roles_are_stored() {
    let mut fx = Fixture::new();

    let executor = fx
        .persistence
        .get_staff(fx.executor.staff_id)
        .unwrap()
        .unwrap();

    assert_eq!(executor.role, StaffRole::Executor);
    assert_eq!(executor.display_name, "Executora");
    assert!(executor.is_active);
    assert!(fx.persistence.get_staff(9_999).unwrap().is_none());
}

#[test]
fn test_procedure_round_trip_keeps_rates() {
    let fx = Fixture::new();

    assert_eq!(fx.procedure.price, money("150.00"));
    assert_eq!(fx.procedure.sale_commission.basis_points(), 1_000);
    assert_eq!(fx.procedure.execution_commission.basis_points(), 2_000);
    assert!(fx.procedure.is_active);
}

#[test]
fn test_procedure_with_zero_price_is_rejected() {
    let mut fx = Fixture::new();

    let err = fx
        .persistence
        .create_procedure(&NewProcedure {
            name: String::from("Cortesia"),
            price: money("0"),
            rates: CommissionRates::default(),
            is_active: true,
        })
        .unwrap_err();

    assert_eq!(rejection(&err).kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_deactivating_procedure() {
    let mut fx = Fixture::new();
    let procedure_id: i64 = fx.procedure.procedure_id;

    fx.persistence
        .set_procedure_active(procedure_id, false)
        .unwrap();

    let stored: Procedure = fx.persistence.get_procedure(procedure_id).unwrap().unwrap();
    assert!(!stored.is_active);

    let err = fx.persistence.set_procedure_active(777, false).unwrap_err();
    assert_eq!(rejection(&err), &DomainError::ProcedureNotFound(777));
}

#[test]
fn test_list_procedures_is_ordered_by_name() {
    let mut fx = Fixture::new();
    fx.persistence
        .create_procedure(&NewProcedure {
            name: String::from("Botox"),
            price: money("900.00"),
            rates: CommissionRates::default(),
            is_active: true,
        })
        .unwrap();

    let names: Vec<String> = fx
        .persistence
        .list_procedures()
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(names, vec!["Botox", "Limpeza de pele"]);
}
