// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the clinic case system.
//!
//! This crate stores cases, items, payments, allocations, commissions,
//! installments and the per-case audit trail in `SQLite` through Diesel.
//!
//! ## Transactions
//!
//! Every command runs as load → apply → persist inside a single
//! `BEGIN IMMEDIATE` transaction. `SQLite` takes the write lock when the
//! transaction begins, so two commands against the same case are
//! serialized and the second one decides on fresh data. A command that
//! breaks a business rule rolls the transaction back and surfaces as
//! `PersistenceError::CommandRejected`.
//!
//! ## Testing
//!
//! Tests run against a fresh shared-cache in-memory database per
//! `Persistence::new_in_memory()` call.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use clinica::{
    CaseState, CaseTransition, Command, InstallmentPlan, InstallmentSettlement, OpenCaseResult,
    apply, apply_open_case, apply_schedule_installments, apply_settle_installment,
};
use clinica_audit::{Actor, Cause};
use clinica_domain::{
    Case, CaseStatus, DomainError, Installment, Item, Money, Payment, Procedure, StaffRole,
};
use diesel::{Connection, SqliteConnection};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use tracing::info;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod convert;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{
    AwaitingPaymentEntry, CaseEventRecord, CaseSummary, ClientRecord, CommittedCommand,
    NewProcedure, OpenedCase, PaymentRecord, StaffMember,
};
pub use error::PersistenceError;

use backend::PersistenceBackend;
use backend::sqlite::JournalMode;

/// Persistence adapter owning one `SQLite` connection.
///
/// Created once at startup and handed to whoever needs the store.
pub struct Persistence {
    pub(crate) conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:clinica_mem_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection =
            backend::sqlite::open_store(&shared_memory_url, JournalMode::Default)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::open_store(path_str, JournalMode::Wal)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Catalog (clients, staff, procedures)
    // ========================================================================

    /// Registers a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_client(
        &mut self,
        name: &str,
        now: OffsetDateTime,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::create_client(&mut self.conn, name, now)
    }

    /// Retrieves a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_client(&mut self, client_id: i64) -> Result<Option<ClientRecord>, PersistenceError> {
        queries::catalog::get_client(&mut self.conn, client_id)
    }

    /// Returns true if the client exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn client_exists(&mut self, client_id: i64) -> Result<bool, PersistenceError> {
        queries::catalog::client_exists(&mut self.conn, client_id)
    }

    /// Registers a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_staff(
        &mut self,
        display_name: &str,
        role: StaffRole,
    ) -> Result<i64, PersistenceError> {
        mutations::catalog::create_staff(&mut self.conn, display_name, role)
    }

    /// Retrieves a staff member.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_staff(&mut self, staff_id: i64) -> Result<Option<StaffMember>, PersistenceError> {
        queries::catalog::get_staff(&mut self.conn, staff_id)
    }

    /// Adds a procedure to the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the price is not positive or the insert fails.
    pub fn create_procedure(&mut self, procedure: &NewProcedure) -> Result<i64, PersistenceError> {
        mutations::catalog::create_procedure(&mut self.conn, procedure)
    }

    /// Activates or deactivates a procedure.
    ///
    /// # Errors
    ///
    /// Returns an error if the procedure does not exist or the update fails.
    pub fn set_procedure_active(
        &mut self,
        procedure_id: i64,
        is_active: bool,
    ) -> Result<(), PersistenceError> {
        mutations::catalog::set_procedure_active(&mut self.conn, procedure_id, is_active)
    }

    /// Retrieves a procedure from the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_procedure(
        &mut self,
        procedure_id: i64,
    ) -> Result<Option<Procedure>, PersistenceError> {
        queries::catalog::get_procedure(&mut self.conn, procedure_id)
    }

    /// Lists the procedure catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_procedures(&mut self) -> Result<Vec<Procedure>, PersistenceError> {
        queries::catalog::list_procedures(&mut self.conn)
    }

    // ========================================================================
    // Case commands
    // ========================================================================

    /// Opens a case in `triage` for an existing client.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ClientNotFound` (as `CommandRejected`) if the
    /// client does not exist, or an error if a write fails.
    pub fn open_case(
        &mut self,
        client_id: i64,
        evaluator_id: Option<i64>,
        notes: Option<String>,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<OpenedCase, PersistenceError> {
        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                if !queries::catalog::client_exists(conn, client_id)? {
                    return Err(DomainError::ClientNotFound(client_id).into());
                }

                let result: OpenCaseResult =
                    apply_open_case(client_id, evaluator_id, notes, actor, cause, now);
                let case_id: i64 = mutations::cases::insert_case(conn, &result.new_case)?;
                let event_id: i64 =
                    mutations::events::insert_case_event(conn, case_id, &result.audit_event, now)?;

                info!(case_id, client_id, event_id, "Opened case");
                Ok(OpenedCase {
                    case: result.new_case.into_case(case_id),
                    event_id,
                })
            })
    }

    /// Applies a command to a case and commits everything it changed.
    ///
    /// Loading the case, deciding the command and writing the case row,
    /// the outcome rows and the audit event happen in one immediate
    /// transaction. Nothing is written when the command is rejected.
    ///
    /// # Errors
    ///
    /// - `PersistenceError::CommandRejected` if a business rule refuses it.
    /// - `PersistenceError::ConcurrentModification` if an item increment
    ///   would overpay it.
    /// - Any database error.
    pub fn apply_case_command(
        &mut self,
        case_id: i64,
        command: Command,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<CommittedCommand, PersistenceError> {
        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                let state: CaseState = queries::cases::load_case_state(conn, case_id)?;
                let transition: CaseTransition = apply(&state, command, actor, cause, now)?;

                mutations::cases::update_case(conn, &transition.new_state.case)?;
                let created_id: Option<i64> =
                    mutations::cases::persist_outcome(conn, case_id, &transition.outcome, now)?;
                let event_id: i64 = mutations::events::insert_case_event(
                    conn,
                    case_id,
                    &transition.audit_event,
                    now,
                )?;

                info!(
                    case_id,
                    event_id,
                    action = %transition.audit_event.action.name,
                    status = %transition.new_state.case.status,
                    "Committed case command"
                );

                let mut new_state: CaseState = transition.new_state;
                if created_id.is_some() {
                    // Reload so the state carries the ids assigned by the database.
                    new_state = queries::cases::load_case_state(conn, case_id)?;
                }

                Ok(CommittedCommand {
                    event_id,
                    state: new_state,
                    outcome: transition.outcome,
                    created_id,
                })
            })
    }

    /// Schedules installments for a case's outstanding balance.
    ///
    /// Numbering continues after any installments already stored. Earlier
    /// installments that are still open are marked replaced.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` if the case is finalized, nothing is owed
    /// or `count` is invalid, or an error if a write fails.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule_installments(
        &mut self,
        case_id: i64,
        count: u32,
        first_due: Date,
        interval_days: u32,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Vec<Installment>, PersistenceError> {
        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                let state: CaseState = queries::cases::load_case_state(conn, case_id)?;
                let existing: Vec<Installment> =
                    queries::installments::list_installments(conn, case_id)?;
                let plan: InstallmentPlan = apply_schedule_installments(
                    &state,
                    &existing,
                    count,
                    first_due,
                    interval_days,
                    actor,
                    cause,
                )?;

                mutations::installments::mark_installments_replaced(conn, &plan.replaced)?;
                mutations::installments::insert_installments(conn, case_id, &plan.entries)?;
                let event_id: i64 =
                    mutations::events::insert_case_event(conn, case_id, &plan.audit_event, now)?;
                info!(
                    case_id,
                    event_id,
                    count,
                    replaced = plan.replaced.len(),
                    "Scheduled installments"
                );

                queries::installments::list_installments(conn, case_id)
            })
    }

    /// Marks an installment as paid by a payment of the same case.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected` if the installment or payment does not
    /// exist, the payment belongs to another case or the installment was
    /// already settled, or an error if a write fails.
    pub fn settle_installment(
        &mut self,
        installment_id: i64,
        payment_id: i64,
        actor: Actor,
        cause: Cause,
        now: OffsetDateTime,
    ) -> Result<Installment, PersistenceError> {
        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                let installment: Installment =
                    queries::installments::get_installment(conn, installment_id)?
                        .ok_or(DomainError::InstallmentNotFound(installment_id))?;
                let payment: Payment = queries::cases::get_payment(conn, payment_id)?
                    .ok_or(DomainError::PaymentNotFound(payment_id))?;
                let state: CaseState =
                    queries::cases::load_case_state(conn, installment.case_id)?;

                let settlement: InstallmentSettlement =
                    apply_settle_installment(&state, &installment, &payment, actor, cause, now)?;

                mutations::installments::mark_installment_paid(conn, &settlement.installment)?;
                let event_id: i64 = mutations::events::insert_case_event(
                    conn,
                    installment.case_id,
                    &settlement.audit_event,
                    now,
                )?;
                info!(
                    case_id = installment.case_id,
                    installment_id,
                    payment_id,
                    event_id,
                    "Settled installment"
                );

                Ok(settlement.installment)
            })
    }

    // ========================================================================
    // Case queries
    // ========================================================================

    /// Retrieves a case row.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected(CaseNotFound)` if the case does not exist.
    pub fn get_case(&mut self, case_id: i64) -> Result<Case, PersistenceError> {
        queries::cases::get_case(&mut self.conn, case_id)
    }

    /// Retrieves an item by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_item(&mut self, item_id: i64) -> Result<Option<Item>, PersistenceError> {
        queries::cases::get_item(&mut self.conn, item_id)
    }

    /// Loads everything the command layer needs to decide a command.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected(CaseNotFound)` if the case does not exist.
    pub fn load_case_state(&mut self, case_id: i64) -> Result<CaseState, PersistenceError> {
        queries::cases::load_case_state(&mut self.conn, case_id)
    }

    /// Builds the full summary of a case.
    ///
    /// # Errors
    ///
    /// Returns `CommandRejected(CaseNotFound)` if the case does not exist.
    pub fn get_case_summary(&mut self, case_id: i64) -> Result<CaseSummary, PersistenceError> {
        self.conn
            .transaction::<_, PersistenceError, _>(|conn| {
                queries::cases::get_case_summary(conn, case_id)
            })
    }

    /// Lists the audit trail of a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the trail cannot be read.
    pub fn list_case_events(
        &mut self,
        case_id: i64,
    ) -> Result<Vec<CaseEventRecord>, PersistenceError> {
        queries::events::list_case_events(&mut self.conn, case_id)
    }

    /// The statuses a case went through, in order, read from its audit trail.
    ///
    /// # Errors
    ///
    /// Returns an error if the trail cannot be read.
    pub fn status_walk(&mut self, case_id: i64) -> Result<Vec<CaseStatus>, PersistenceError> {
        queries::events::status_walk(&mut self.conn, case_id)
    }

    /// Sum of every allocation applied to an item.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn allocated_to_item(&mut self, item_id: i64) -> Result<Money, PersistenceError> {
        queries::cases::allocated_to_item(&mut self.conn, item_id)
    }

    /// Lists the installments of a case.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_installments(
        &mut self,
        case_id: i64,
    ) -> Result<Vec<Installment>, PersistenceError> {
        queries::installments::list_installments(&mut self.conn, case_id)
    }

    /// Lists every case waiting for payment with its balance.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub fn awaiting_payment_report(
        &mut self,
    ) -> Result<Vec<AwaitingPaymentEntry>, PersistenceError> {
        self.conn
            .transaction::<_, PersistenceError, _>(queries::reports::awaiting_payment_report)
    }
}
