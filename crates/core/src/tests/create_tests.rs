// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{
    CREATED_AT, create_test_actor, create_test_cause, create_test_document,
    create_test_new_minutes,
};
use crate::{CoreError, CreationResult, NewMinutes, apply_create};
use minutes_vote_domain::{
    Decision, DomainError, MeetingId, MinutesDocument, MinutesId, MinutesStatus,
};
use time::Duration;
use time::macros::datetime;

fn create(existing: &[MinutesDocument], new_minutes: NewMinutes) -> Result<CreationResult, CoreError> {
    apply_create(
        existing,
        new_minutes,
        create_test_actor(),
        create_test_cause(),
        CREATED_AT,
        Duration::hours(24),
    )
}

#[test]
fn test_create_produces_open_draft_without_votes() {
    let result: CreationResult = create(&[], create_test_new_minutes()).unwrap();
    let document: MinutesDocument = result.new_document;

    assert_eq!(document.status, MinutesStatus::Draft);
    assert!(!document.is_voting_closed);
    assert!(document.votes.is_empty());
    assert_eq!(document.required_vote_count(), 3);
    assert_eq!(document.minutes_id, None);
    assert_eq!(document.version, 1);
    assert_eq!(document.created_at, CREATED_AT);
}

#[test]
fn test_default_deadline_is_creation_plus_window() {
    let result: CreationResult = create(&[], create_test_new_minutes()).unwrap();

    assert_eq!(
        result.new_document.vote_deadline,
        datetime!(2026-03-03 09:00 UTC)
    );
}

#[test]
fn test_explicit_deadline_is_kept() {
    let mut new_minutes: NewMinutes = create_test_new_minutes();
    new_minutes.vote_deadline = Some(datetime!(2026-03-09 17:00 UTC));

    let result: CreationResult = create(&[], new_minutes).unwrap();

    assert_eq!(
        result.new_document.vote_deadline,
        datetime!(2026-03-09 17:00 UTC)
    );
}

#[test]
fn test_explicit_deadline_in_past_is_rejected() {
    let mut new_minutes: NewMinutes = create_test_new_minutes();
    new_minutes.vote_deadline = Some(datetime!(2026-03-01 09:00 UTC));

    let result: Result<CreationResult, CoreError> = create(&[], new_minutes);

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidVoteDeadline { .. }))
    ));
}

#[test]
fn test_title_and_content_are_trimmed_and_validated() {
    let mut new_minutes: NewMinutes = create_test_new_minutes();
    new_minutes.title = String::from("   Board meeting  ");
    let result: CreationResult = create(&[], new_minutes).unwrap();
    assert_eq!(result.new_document.title, "Board meeting");

    let mut new_minutes: NewMinutes = create_test_new_minutes();
    new_minutes.content = String::from("short");
    assert!(matches!(
        create(&[], new_minutes),
        Err(CoreError::DomainViolation(DomainError::InvalidContent(_)))
    ));
}

#[test]
fn test_invalid_decision_is_rejected() {
    let mut new_minutes: NewMinutes = create_test_new_minutes();
    new_minutes.decisions = vec![Decision::new("Approve budget"), Decision::new("")];

    assert!(matches!(
        create(&[], new_minutes),
        Err(CoreError::DomainViolation(DomainError::InvalidDecision { index: 1, .. }))
    ));
}

#[test]
fn test_open_round_blocks_creation() {
    let existing: MinutesDocument = create_test_document();

    let result: Result<CreationResult, CoreError> = create(&[existing], create_test_new_minutes());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::OpenRoundExists {
            meeting_id: MeetingId::new(1),
            minutes_id: Some(MinutesId::new(1)),
        }))
    );
}

#[test]
fn test_closed_round_does_not_block_creation() {
    let mut existing: MinutesDocument = create_test_document();
    existing.is_voting_closed = true;

    assert!(create(&[existing], create_test_new_minutes()).is_ok());
}

#[test]
fn test_round_past_deadline_does_not_block_creation() {
    let existing: MinutesDocument = create_test_document();

    let result = apply_create(
        &[existing],
        create_test_new_minutes(),
        create_test_actor(),
        create_test_cause(),
        datetime!(2026-03-04 09:00 UTC),
        Duration::hours(24),
    );

    assert!(result.is_ok());
}

#[test]
fn test_round_from_another_meeting_is_an_internal_error() {
    let mut existing: MinutesDocument = create_test_document();
    existing.meeting_id = MeetingId::new(2);

    assert!(matches!(
        create(&[existing], create_test_new_minutes()),
        Err(CoreError::Internal(_))
    ));
}

#[test]
fn test_creation_emits_audit_event() {
    let result: CreationResult = create(&[], create_test_new_minutes()).unwrap();

    assert_eq!(result.audit_event.action.name, "CreateMinutes");
    assert_eq!(result.audit_event.actor.id, "secretary");
    assert_eq!(result.audit_event.meeting_id, MeetingId::new(1));
    assert_eq!(result.audit_event.before.data, "none");
    assert_eq!(
        result.audit_event.after.data,
        "status=draft,voting_closed=false,votes=0"
    );
}

#[test]
fn test_default_window_past_date_range_is_an_error() {
    let result = apply_create(
        &[],
        create_test_new_minutes(),
        create_test_actor(),
        create_test_cause(),
        CREATED_AT,
        Duration::MAX,
    );

    assert!(matches!(result, Err(CoreError::Internal(_))));
}
