// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use minutes_vote::CoreError;
use minutes_vote_domain::{DomainError, MeetingId, MinutesId, UserId};
use minutes_vote_persistence::PersistenceError;

use crate::{ApiError, translate_core_error, translate_domain_error, translate_persistence_error};

#[test]
fn test_validation_errors_name_the_field() {
    let err: ApiError = translate_domain_error(DomainError::InvalidDecision {
        index: 2,
        reason: String::from("Title must not be empty"),
    });

    assert_eq!(
        err,
        ApiError::InvalidInput {
            field: String::from("decisions[2]"),
            message: String::from("Title must not be empty"),
        }
    );
}

#[test]
fn test_open_round_is_a_conflict() {
    let err: ApiError = translate_domain_error(DomainError::OpenRoundExists {
        meeting_id: MeetingId::new(4),
        minutes_id: Some(MinutesId::new(9)),
    });

    assert!(matches!(err, ApiError::Conflict { ref rule, .. } if rule == "one_open_round"));
}

#[test]
fn test_not_eligible_keeps_voter() {
    let err: ApiError = translate_domain_error(DomainError::NotEligible {
        voter_id: UserId::new("dave"),
        meeting_id: MeetingId::new(1),
    });

    assert_eq!(
        err.to_string(),
        "Voter 'dave' is not eligible: not an attendee or organizer of meeting 1"
    );
}

#[test]
fn test_core_internal_error_is_internal() {
    let err: ApiError = translate_core_error(CoreError::Internal(String::from("bad round")));

    assert_eq!(
        err,
        ApiError::Internal {
            message: String::from("bad round"),
        }
    );
}

#[test]
fn test_persistence_errors() {
    assert!(matches!(
        translate_persistence_error(PersistenceError::MinutesNotFound(3)),
        ApiError::ResourceNotFound { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::OpenRoundExists { meeting_id: 1 }),
        ApiError::Conflict { .. }
    ));
    assert!(matches!(
        translate_persistence_error(PersistenceError::QueryFailed(String::from("disk I/O"))),
        ApiError::Internal { .. }
    ));
}

#[test]
fn test_retry_exhausted_message() {
    let err: ApiError = ApiError::RetryExhausted {
        operation: String::from("cast_vote"),
        attempts: 5,
    };

    assert_eq!(
        err.to_string(),
        "'cast_vote' gave up after 5 conflicting write attempts; retry the request"
    );
}
