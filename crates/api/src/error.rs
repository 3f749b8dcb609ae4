// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use minutes_vote::CoreError;
use minutes_vote_domain::DomainError;
use minutes_vote_persistence::PersistenceError;
use tracing::error;

/// API-level errors.
///
/// These are distinct from domain/core/persistence errors and represent the
/// API contract. Every variant maps to exactly one HTTP status in the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request conflicts with the current state (duplicate open round,
    /// disallowed lifecycle transition).
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// A ballot was submitted after voting closed.
    VotingClosed {
        /// A human-readable description.
        message: String,
    },
    /// The voter is not an attendee or organizer of the meeting.
    NotEligible {
        /// The rejected voter.
        voter_id: String,
        /// A human-readable description.
        message: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The roles allowed to perform this action.
        required_role: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// Concurrent writers kept winning the race for the same document.
    ///
    /// This is transient; the caller may retry the request.
    RetryExhausted {
        /// The operation that gave up.
        operation: String,
        /// How many write attempts were made.
        attempts: u32,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => write!(f, "Conflict ({rule}): {message}"),
            Self::VotingClosed { message } => write!(f, "Voting closed: {message}"),
            Self::NotEligible { voter_id, message } => {
                write!(f, "Voter '{voter_id}' is not eligible: {message}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::RetryExhausted {
                operation,
                attempts,
            } => {
                write!(
                    f,
                    "'{operation}' gave up after {attempts} conflicting write attempts; retry the request"
                )
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidTitle(msg) => ApiError::InvalidInput {
            field: String::from("title"),
            message: msg,
        },
        DomainError::InvalidContent(msg) => ApiError::InvalidInput {
            field: String::from("content"),
            message: msg,
        },
        DomainError::InvalidComment(msg) => ApiError::InvalidInput {
            field: String::from("comment"),
            message: msg,
        },
        DomainError::InvalidRejectionReason(msg) => ApiError::InvalidInput {
            field: String::from("reason"),
            message: msg,
        },
        DomainError::InvalidDecision { index, reason } => ApiError::InvalidInput {
            field: format!("decisions[{index}]"),
            message: reason,
        },
        err @ DomainError::InvalidVoteType(_) => ApiError::InvalidInput {
            field: String::from("vote_type"),
            message: err.to_string(),
        },
        err @ DomainError::InvalidMinutesStatus(_) => ApiError::InvalidInput {
            field: String::from("status"),
            message: err.to_string(),
        },
        err @ DomainError::InvalidDecisionStatus(_) => ApiError::InvalidInput {
            field: String::from("decisions"),
            message: err.to_string(),
        },
        DomainError::InvalidVoteDeadline { reason } => ApiError::InvalidInput {
            field: String::from("vote_deadline"),
            message: reason,
        },
        err @ DomainError::InvalidStatusTransition { .. } => ApiError::Conflict {
            rule: String::from("status_transition"),
            message: err.to_string(),
        },
        err @ DomainError::VotingStillOpen { .. } => ApiError::Conflict {
            rule: String::from("voting_still_open"),
            message: err.to_string(),
        },
        err @ DomainError::OpenRoundExists { .. } => ApiError::Conflict {
            rule: String::from("one_open_round"),
            message: err.to_string(),
        },
        err @ DomainError::VotingClosed { .. } => ApiError::VotingClosed {
            message: err.to_string(),
        },
        DomainError::NotEligible {
            voter_id,
            meeting_id,
        } => ApiError::NotEligible {
            voter_id: voter_id.to_string(),
            message: format!("not an attendee or organizer of meeting {meeting_id}"),
        },
        DomainError::MinutesNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Minutes"),
            message: format!("Minutes {id} does not exist"),
        },
        DomainError::MeetingNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Meeting"),
            message: format!("Meeting {id} does not exist"),
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(message) => {
            error!(%message, "Core transition failed");
            ApiError::Internal { message }
        }
    }
}

/// Translates a persistence error into an API error.
///
/// `VersionConflict` is normally consumed by the service's retry loop and
/// only reaches this function if a caller bypasses it.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::MinutesNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Minutes"),
            message: format!("Minutes {id} does not exist"),
        },
        PersistenceError::OpenRoundExists { meeting_id } => ApiError::Conflict {
            rule: String::from("one_open_round"),
            message: format!("Meeting {meeting_id} already has open minutes"),
        },
        other => {
            error!(error = %other, "Persistence operation failed");
            ApiError::Internal {
                message: other.to_string(),
            }
        }
    }
}
