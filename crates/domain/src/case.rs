// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::CaseStatus;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A client's treatment case (atendimento).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Case {
    /// Store-assigned identity.
    pub case_id: i64,
    /// The client being treated.
    pub client_id: i64,
    /// Assigned evaluator (avaliador), if any.
    pub evaluator_id: Option<i64>,
    /// Staff member who unlocked execution.
    pub liberator_id: Option<i64>,
    /// Current lifecycle state.
    pub status: CaseStatus,
    /// Free-text notes captured at opening.
    pub notes: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub unlocked_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub finalized_at: Option<OffsetDateTime>,
}

impl Case {
    /// Rejects any change to a finalized case.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::CaseFinalized` if the case is closed.
    pub const fn ensure_not_finalized(&self) -> Result<(), DomainError> {
        if self.status.is_terminal() {
            return Err(DomainError::CaseFinalized(self.case_id));
        }
        Ok(())
    }

    /// Moves the case to `target` and stamps the side effects of the edge.
    ///
    /// The caller must have validated the edge. Entering `InExecution`
    /// records the liberator and unlock time; entering `Finalized` records
    /// the closing time.
    pub const fn enter(&mut self, target: CaseStatus, actor_id: i64, now: OffsetDateTime) {
        match target {
            CaseStatus::InExecution => {
                self.liberator_id = Some(actor_id);
                self.unlocked_at = Some(now);
            }
            CaseStatus::Finalized => self.finalized_at = Some(now),
            CaseStatus::Triage | CaseStatus::Evaluation | CaseStatus::AwaitingPayment => {}
        }
        self.status = target;
    }
}

/// A case that has not been stored yet.
///
/// New cases always start in `Triage`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCase {
    pub client_id: i64,
    pub evaluator_id: Option<i64>,
    pub notes: Option<String>,
    pub created_at: OffsetDateTime,
}

impl NewCase {
    #[must_use]
    pub fn new(
        client_id: i64,
        evaluator_id: Option<i64>,
        notes: Option<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        let notes = notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self {
            client_id,
            evaluator_id,
            notes,
            created_at,
        }
    }

    /// Returns the case this draft becomes once the store assigns `case_id`.
    #[must_use]
    pub fn into_case(self, case_id: i64) -> Case {
        Case {
            case_id,
            client_id: self.client_id,
            evaluator_id: self.evaluator_id,
            liberator_id: None,
            status: CaseStatus::Triage,
            notes: self.notes,
            created_at: self.created_at,
            unlocked_at: None,
            finalized_at: None,
        }
    }
}
