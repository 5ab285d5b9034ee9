// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seams to the systems the case engine consumes.
//!
//! The procedure catalog, the identity service and the client registry are
//! owned elsewhere; the engine only needs the narrow lookups below.
//! `CaseStore` is the transactional store the operations drive. All four
//! are implemented for [`Persistence`].

use clinica::{CaseState, Command};
use clinica_audit::{Actor, Cause};
use clinica_domain::{Installment, Procedure};
use clinica_persistence::{
    AwaitingPaymentEntry, CaseSummary, CommittedCommand, OpenedCase, Persistence,
    PersistenceError, StaffMember,
};
use time::{Date, OffsetDateTime};

use crate::error::ApiError;

/// Procedure catalog lookups.
pub trait ProcedureCatalog {
    /// Returns the catalog entry, or `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be reached.
    fn get_procedure(&mut self, procedure_id: i64) -> Result<Option<Procedure>, ApiError>;
}

/// Identity and role lookups.
pub trait IdentityService {
    /// Returns the staff member, or `None` if unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity service cannot be reached.
    fn find_staff(&mut self, staff_id: i64) -> Result<Option<StaffMember>, ApiError>;

    /// True if the staff member is active and may execute procedures.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity service cannot be reached.
    fn is_executor_or_admin(&mut self, staff_id: i64) -> Result<bool, ApiError> {
        Ok(self
            .find_staff(staff_id)?
            .is_some_and(|s| s.is_active && s.role.is_executor_or_admin()))
    }

    /// True if the staff member is active and may evaluate clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the identity service cannot be reached.
    fn is_evaluator_or_admin(&mut self, staff_id: i64) -> Result<bool, ApiError> {
        Ok(self
            .find_staff(staff_id)?
            .is_some_and(|s| s.is_active && s.role.is_evaluator_or_admin()))
    }
}

/// Client existence checks.
pub trait ClientRegistry {
    /// True if the client exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the registry cannot be reached.
    fn client_exists(&mut self, client_id: i64) -> Result<bool, ApiError>;
}

/// The transactional case store.
///
/// Each mutating method commits everything or nothing.
#[allow(clippy::missing_errors_doc)]
pub trait CaseStore {
    fn open_case(
        &mut self,
        client_id: i64,
        evaluator_id: Option<i64>,
        notes: Option<String>,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OpenedCase, PersistenceError>;

    fn apply_case_command(
        &mut self,
        case_id: i64,
        command: Command,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<CommittedCommand, PersistenceError>;

    #[allow(clippy::too_many_arguments)]
    fn schedule_installments(
        &mut self,
        case_id: i64,
        count: u32,
        first_due: Date,
        interval_days: u32,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Vec<Installment>, PersistenceError>;

    fn settle_installment(
        &mut self,
        installment_id: i64,
        payment_id: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Installment, PersistenceError>;

    fn load_case_state(&mut self, case_id: i64) -> Result<CaseState, PersistenceError>;

    fn get_case_summary(&mut self, case_id: i64) -> Result<CaseSummary, PersistenceError>;

    fn awaiting_payment_report(&mut self) -> Result<Vec<AwaitingPaymentEntry>, PersistenceError>;
}

impl ProcedureCatalog for Persistence {
    fn get_procedure(&mut self, procedure_id: i64) -> Result<Option<Procedure>, ApiError> {
        Ok(Self::get_procedure(self, procedure_id)?)
    }
}

impl IdentityService for Persistence {
    fn find_staff(&mut self, staff_id: i64) -> Result<Option<StaffMember>, ApiError> {
        Ok(self.get_staff(staff_id)?)
    }
}

impl ClientRegistry for Persistence {
    fn client_exists(&mut self, client_id: i64) -> Result<bool, ApiError> {
        Ok(Self::client_exists(self, client_id)?)
    }
}

impl CaseStore for Persistence {
    fn open_case(
        &mut self,
        client_id: i64,
        evaluator_id: Option<i64>,
        notes: Option<String>,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OpenedCase, PersistenceError> {
        Self::open_case(self, client_id, evaluator_id, notes, actor, cause, now)
    }

    fn apply_case_command(
        &mut self,
        case_id: i64,
        command: Command,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<CommittedCommand, PersistenceError> {
        Self::apply_case_command(self, case_id, command, actor, cause, now)
    }

    fn schedule_installments(
        &mut self,
        case_id: i64,
        count: u32,
        first_due: Date,
        interval_days: u32,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Vec<Installment>, PersistenceError> {
        Self::schedule_installments(
            self,
            case_id,
            count,
            first_due,
            interval_days,
            actor,
            cause,
            now,
        )
    }

    fn settle_installment(
        &mut self,
        installment_id: i64,
        payment_id: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Installment, PersistenceError> {
        Self::settle_installment(self, installment_id, payment_id, actor, cause, now)
    }

    fn load_case_state(&mut self, case_id: i64) -> Result<CaseState, PersistenceError> {
        Self::load_case_state(self, case_id)
    }

    fn get_case_summary(&mut self, case_id: i64) -> Result<CaseSummary, PersistenceError> {
        Self::get_case_summary(self, case_id)
    }

    fn awaiting_payment_report(&mut self) -> Result<Vec<AwaitingPaymentEntry>, PersistenceError> {
        Self::awaiting_payment_report(self)
    }
}
