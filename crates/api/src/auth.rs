// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.

use clinica_audit::Actor;
use clinica_domain::{DomainError, StaffRole};
use clinica_persistence::StaffMember;
use tracing::warn;

use crate::collaborators::IdentityService;
use crate::error::{ApiError, AuthError, translate_domain_error};

/// An authenticated staff member.
///
/// Produced by [`AuthenticationService::authenticate`] from the identity
/// service; the role is the one on record at the time of the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// Staff identifier.
    pub staff_id: i64,
    /// Name shown in the audit trail.
    pub display_name: String,
    /// Role on record.
    pub role: StaffRole,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    #[must_use]
    pub const fn new(staff_id: i64, display_name: String, role: StaffRole) -> Self {
        Self {
            staff_id,
            display_name,
            role,
        }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.staff_id, self.display_name.clone(), self.role)
    }
}

impl From<StaffMember> for AuthenticatedActor {
    fn from(staff: StaffMember) -> Self {
        Self::new(staff.staff_id, staff.display_name, staff.role)
    }
}

/// Resolves request credentials to a staff member.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Authenticates a caller by staff id.
    ///
    /// # Errors
    ///
    /// Returns `AuthenticationFailed` if the staff member is unknown or
    /// inactive, or an error if the identity service fails.
    pub fn authenticate<I>(identity: &mut I, staff_id: i64) -> Result<AuthenticatedActor, ApiError>
    where
        I: IdentityService + ?Sized,
    {
        match identity.find_staff(staff_id)? {
            Some(staff) if staff.is_active => Ok(AuthenticatedActor::from(staff)),
            Some(_) => {
                warn!(staff_id, "Rejected inactive staff member");
                Err(AuthError::AuthenticationFailed {
                    reason: format!("staff member {staff_id} is inactive"),
                }
                .into())
            }
            None => Err(AuthError::AuthenticationFailed {
                reason: format!("unknown staff member {staff_id}"),
            }
            .into()),
        }
    }
}

/// Role checks made before a command reaches the case engine.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks that the actor may work on procedures.
    ///
    /// The case engine additionally requires the actor to be the item's
    /// assigned executor unless they are an admin.
    ///
    /// # Errors
    ///
    /// Returns `Unauthorized` if the identity service says the actor is
    /// neither an executor nor an admin.
    pub fn authorize_advance_item_status<I>(
        identity: &mut I,
        actor: &AuthenticatedActor,
    ) -> Result<(), ApiError>
    where
        I: IdentityService + ?Sized,
    {
        if identity.is_executor_or_admin(actor.staff_id)? {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                action: String::from("advance_item_status"),
                required_role: String::from("Executor or Admin"),
            }
            .into())
        }
    }

    /// Checks that `executor_id` names someone who may perform procedures.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` if the staff member does not exist.
    /// - `PolicyViolation` if they are neither an executor nor an admin.
    pub fn ensure_executor_candidate<I>(identity: &mut I, executor_id: i64) -> Result<(), ApiError>
    where
        I: IdentityService + ?Sized,
    {
        ensure_staff_exists(identity, executor_id)?;
        if identity.is_executor_or_admin(executor_id)? {
            Ok(())
        } else {
            Err(ApiError::PolicyViolation {
                rule: String::from("executor_role"),
                message: format!("usuário {executor_id} não é executor nem administrador"),
            })
        }
    }

    /// Checks that `evaluator_id` names someone who may evaluate clients.
    ///
    /// # Errors
    ///
    /// - `ResourceNotFound` if the staff member does not exist.
    /// - `PolicyViolation` if they are neither an evaluator nor an admin.
    pub fn ensure_evaluator_candidate<I>(
        identity: &mut I,
        evaluator_id: i64,
    ) -> Result<(), ApiError>
    where
        I: IdentityService + ?Sized,
    {
        ensure_staff_exists(identity, evaluator_id)?;
        if identity.is_evaluator_or_admin(evaluator_id)? {
            Ok(())
        } else {
            Err(ApiError::PolicyViolation {
                rule: String::from("evaluator_role"),
                message: format!("usuário {evaluator_id} não é avaliador nem administrador"),
            })
        }
    }
}

/// Checks that a staff member exists, whatever their role.
///
/// # Errors
///
/// Returns `ResourceNotFound` if they do not.
pub(crate) fn ensure_staff_exists<I>(identity: &mut I, staff_id: i64) -> Result<(), ApiError>
where
    I: IdentityService + ?Sized,
{
    if identity.find_staff(staff_id)?.is_some() {
        Ok(())
    } else {
        Err(translate_domain_error(DomainError::StaffNotFound(staff_id)))
    }
}
