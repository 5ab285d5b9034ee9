// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Case audit trail mutations.

use clinica_audit::AuditEvent;
use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::debug;

use crate::backend::PersistenceBackend;
use crate::convert::timestamp_to_text;
use crate::data_models::{ActionData, ActorData, CauseData};
use crate::diesel_schema::case_events;
use crate::error::PersistenceError;

/// Appends an audit event to a case's trail.
///
/// # Returns
///
/// The event ID assigned by the database.
///
/// # Errors
///
/// Returns an error if serialization or the insert fails.
pub fn insert_case_event(
    conn: &mut SqliteConnection,
    case_id: i64,
    event: &AuditEvent,
    now: OffsetDateTime,
) -> Result<i64, PersistenceError> {
    let actor_data: ActorData = ActorData {
        staff_id: event.actor.staff_id,
        display_name: event.actor.display_name.clone(),
        role: event.actor.role,
    };
    let cause_data: CauseData = CauseData {
        id: event.cause.id.clone(),
        description: event.cause.description.clone(),
    };
    let action_data: ActionData = ActionData {
        name: event.action.name.clone(),
        details: event.action.details.clone(),
    };

    diesel::insert_into(case_events::table)
        .values((
            case_events::case_id.eq(case_id),
            case_events::actor_staff_id.eq(event.actor.staff_id),
            case_events::actor_display_name.eq(&event.actor.display_name),
            case_events::actor_json.eq(serde_json::to_string(&actor_data)?),
            case_events::cause_json.eq(serde_json::to_string(&cause_data)?),
            case_events::action_json.eq(serde_json::to_string(&action_data)?),
            case_events::before_snapshot.eq(&event.before.data),
            case_events::after_snapshot.eq(&event.after.data),
            case_events::created_at.eq(timestamp_to_text(now)?),
        ))
        .execute(conn)?;

    let event_id: i64 = conn.get_last_insert_rowid()?;
    debug!(case_id, event_id, action = %event.action.name, "Recorded case event");
    Ok(event_id)
}
