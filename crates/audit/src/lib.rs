// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use clinica_domain::{CaseStatus, StaffRole};

/// The staff member performing an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// Staff identifier.
    pub staff_id: i64,
    /// Name shown in the audit trail.
    pub display_name: String,
    /// Role at the time of the action.
    pub role: StaffRole,
}

impl Actor {
    /// Creates a new Actor.
    #[must_use]
    pub const fn new(staff_id: i64, display_name: String, role: StaffRole) -> Self {
        Self {
            staff_id,
            display_name,
            role,
        }
    }

    /// Returns true if the actor has administrative authority.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Why a command was issued: the request that carried it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// Request or ticket id.
    pub id: String,
    /// Free text shown next to the event.
    pub description: String,
}

impl Cause {
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// The command that was applied, by name, with its rendered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// Command name, e.g. `RegisterPayment`.
    pub name: String,
    /// `key=value` arguments, when the command has any.
    pub details: Option<String>,
}

impl Action {
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of a case at a point in time.
///
/// The data is a space-separated list of `key=value` pairs and always
/// starts with `status=<case status>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// The rendered `key=value` pairs.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot` from raw data.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// Creates a snapshot of a case status followed by extra fields.
    #[must_use]
    pub fn of_case(status: CaseStatus, fields: &[(&str, String)]) -> Self {
        let mut data: String = format!("status={}", status.as_str());
        for (key, value) in fields {
            data.push(' ');
            data.push_str(key);
            data.push('=');
            data.push_str(value);
        }
        Self { data }
    }

    /// Returns the value of `key`, if present.
    #[must_use]
    pub fn field(&self, key: &str) -> Option<&str> {
        self.data.split(' ').find_map(|pair| {
            pair.split_once('=')
                .filter(|(k, _)| *k == key)
                .map(|(_, v)| v)
        })
    }

    /// Returns the case status recorded in this snapshot.
    #[must_use]
    pub fn status(&self) -> Option<CaseStatus> {
        self.field("status").and_then(|s| s.parse().ok())
    }
}

/// An immutable audit event representing a case mutation.
///
/// Every successful case mutation produces exactly one audit event,
/// capturing who acted (actor), why (cause), what was done (action) and
/// the case state before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    pub actor: Actor,
    pub cause: Cause,
    pub action: Action,
    /// Case before the command.
    pub before: StateSnapshot,
    /// Case after the command.
    pub after: StateSnapshot,
}

impl AuditEvent {
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// True when the action moved the case to another status.
    #[must_use]
    pub fn changes_status(&self) -> bool {
        self.before.status() != self.after.status()
    }
}
