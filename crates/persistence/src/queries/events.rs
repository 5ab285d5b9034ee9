// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case audit trail queries.

use clinica_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use clinica_domain::CaseStatus;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::convert::text_to_timestamp;
use crate::data_models::{ActionData, ActorData, CaseEventRecord, CauseData};
use crate::diesel_schema::case_events;
use crate::error::PersistenceError;

/// Diesel Queryable struct for case event rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = case_events)]
struct CaseEventRow {
    event_id: i64,
    case_id: i64,
    #[allow(dead_code)]
    actor_staff_id: i64,
    #[allow(dead_code)]
    actor_display_name: String,
    actor_json: String,
    cause_json: String,
    action_json: String,
    before_snapshot: String,
    after_snapshot: String,
    created_at: String,
}

impl CaseEventRow {
    fn into_record(self) -> Result<CaseEventRecord, PersistenceError> {
        let actor_data: ActorData = serde_json::from_str(&self.actor_json)?;
        let cause_data: CauseData = serde_json::from_str(&self.cause_json)?;
        let action_data: ActionData = serde_json::from_str(&self.action_json)?;

        let event: AuditEvent = AuditEvent::new(
            Actor::new(
                actor_data.staff_id,
                actor_data.display_name,
                actor_data.role,
            ),
            Cause::new(cause_data.id, cause_data.description),
            Action::new(action_data.name, action_data.details),
            StateSnapshot::new(self.before_snapshot),
            StateSnapshot::new(self.after_snapshot),
        );

        Ok(CaseEventRecord {
            event_id: self.event_id,
            case_id: self.case_id,
            event,
            created_at: text_to_timestamp(&self.created_at)?,
        })
    }
}

/// Lists the audit trail of a case in commit order.
///
/// # Errors
///
/// Returns an error if the database query fails or an event cannot be
/// deserialized.
pub fn list_case_events(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<CaseEventRecord>, PersistenceError> {
    case_events::table
        .filter(case_events::case_id.eq(case_id))
        .order(case_events::event_id.asc())
        .select(CaseEventRow::as_select())
        .load::<CaseEventRow>(conn)?
        .into_iter()
        .map(CaseEventRow::into_record)
        .collect()
}

/// The sequence of statuses a case went through, read from its audit trail.
///
/// Starts with the status recorded after the opening event and appends
/// every status change in order.
///
/// # Errors
///
/// Returns an error if the audit trail cannot be read, or a snapshot
/// carries no valid status.
pub fn status_walk(
    conn: &mut SqliteConnection,
    case_id: i64,
) -> Result<Vec<CaseStatus>, PersistenceError> {
    let mut walk: Vec<CaseStatus> = Vec::new();
    for record in list_case_events(conn, case_id)? {
        let after: CaseStatus = record.event.after.status().ok_or_else(|| {
            PersistenceError::ReconstructionError(format!(
                "event {} has no case status",
                record.event_id
            ))
        })?;
        if walk.last() != Some(&after) {
            walk.push(after);
        }
    }
    Ok(walk)
}
