// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor roles and authorization rules.
//!
//! Identity is asserted by the caller (`actor_id`); the role comes from the
//! `RoleProvider`. Voting is not role-gated: eligibility is decided by the
//! meeting directory and the document's roster instead.

use minutes_vote_audit::Actor;
use minutes_vote_domain::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ApiError;

/// Roles known to the role provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrators. May run every workflow action.
    Admin,
    /// Meeting managers. May run every workflow action.
    Manager,
    /// Meeting secretaries. Draft minutes and steer them to a decision.
    Secretary,
    /// Everyone else. May only vote, and only when eligible.
    Member,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Secretary => "secretary",
            Self::Member => "member",
        }
    }

    /// Returns true for the roles allowed to create, close, approve, reject
    /// and advance minutes.
    #[must_use]
    pub const fn manages_minutes(&self) -> bool {
        matches!(self, Self::Admin | Self::Manager | Self::Secretary)
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "manager" => Ok(Self::Manager),
            "secretary" => Ok(Self::Secretary),
            "member" => Ok(Self::Member),
            _ => Err(ApiError::InvalidInput {
                field: String::from("role"),
                message: format!("Unknown role '{s}'"),
            }),
        }
    }
}

/// A caller with the role the role provider reported for them.
///
/// Users the role provider does not know are treated as `Role::Member`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    pub user_id: UserId,
    pub role: Role,
}

impl AuthenticatedActor {
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }

    /// Converts this actor into the audit representation.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(
            self.user_id.value().to_string(),
            self.role.as_str().to_string(),
        )
    }
}

/// Authorization service for enforcing role-based access control.
///
/// Every minutes-management action shares the same rule; the separate entry
/// points keep the attempted action in the error.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may open a new minutes round.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is an admin, manager or secretary.
    pub fn authorize_create_minutes(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require_minutes_manager(actor, "create_minutes")
    }

    /// Checks if an actor may close voting.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is an admin, manager or secretary.
    pub fn authorize_close_voting(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require_minutes_manager(actor, "close_voting")
    }

    /// Checks if an actor may approve minutes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is an admin, manager or secretary.
    pub fn authorize_approve(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require_minutes_manager(actor, "approve_minutes")
    }

    /// Checks if an actor may reject minutes.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is an admin, manager or secretary.
    pub fn authorize_reject(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require_minutes_manager(actor, "reject_minutes")
    }

    /// Checks if an actor may move minutes between editorial states.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` unless the actor is an admin, manager or secretary.
    pub fn authorize_advance_status(actor: &AuthenticatedActor) -> Result<(), ApiError> {
        Self::require_minutes_manager(actor, "advance_status")
    }

    fn require_minutes_manager(actor: &AuthenticatedActor, action: &str) -> Result<(), ApiError> {
        if actor.role.manages_minutes() {
            Ok(())
        } else {
            Err(ApiError::Unauthorized {
                action: action.to_string(),
                required_role: String::from("admin, manager or secretary"),
            })
        }
    }
}
