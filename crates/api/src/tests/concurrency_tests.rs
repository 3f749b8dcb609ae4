// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Races reproduced by a second writer that commits between the service's
//! read and its conditional save.

use minutes_vote::{Command, TransitionResult, apply};
use minutes_vote_audit::{Actor, Cause};
use minutes_vote_domain::{CloseTrigger, MinutesDocument, MinutesId, UserId, VoteType};
use minutes_vote_persistence::Persistence;
use time::OffsetDateTime;
use time::macros::datetime;

use super::helpers::{
    SECRETARY, cast, create_board_minutes, create_interleaving_harness, create_test_cause,
};
use crate::ApiError;

const RACE_AT: OffsetDateTime = datetime!(2026-03-02 10:00 UTC);

/// Commits `command` directly to the store, as another server process would.
fn commit_concurrently(persistence: &mut Persistence, minutes_id: MinutesId, command: Command) {
    let current: MinutesDocument = persistence.load_minutes(minutes_id).unwrap();
    let result: TransitionResult = apply(
        &current,
        command,
        Actor::new(String::from("other-process"), String::from("secretary")),
        Cause::new(String::from("race"), String::from("Concurrent writer")),
        RACE_AT,
    )
    .unwrap();
    persistence
        .save_minutes(
            &result.new_document,
            current.version,
            &result.audit_event.unwrap(),
        )
        .unwrap();
}

#[test]
fn test_close_during_vote_rejects_the_vote() {
    let mut harness = create_interleaving_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness
        .service
        .repository_mut()
        .interfere_before_next_save(move |persistence| {
            commit_concurrently(
                persistence,
                minutes_id,
                Command::CloseVoting {
                    trigger: CloseTrigger::Manual,
                },
            );
        });

    let result = cast(&mut harness, minutes_id, "carol", "agree", None);

    assert!(matches!(result, Err(ApiError::VotingClosed { .. })));
    let document = harness.service.get_minutes(minutes_id).unwrap().minutes;
    assert!(document.is_voting_closed);
    assert!(document.votes.is_empty());
    assert_eq!(harness.service.repository().save_calls, 1);
    assert!(harness.sink.events().is_empty());
}

#[test]
fn test_vote_before_close_is_kept() {
    let mut harness = create_interleaving_harness();
    let minutes_id = create_board_minutes(&mut harness);

    cast(&mut harness, minutes_id, "carol", "agree", None).unwrap();
    harness
        .service
        .close_voting(minutes_id, SECRETARY, create_test_cause())
        .unwrap();

    let document = harness.service.get_minutes(minutes_id).unwrap().minutes;
    assert!(document.is_voting_closed);
    assert_eq!(document.votes.len(), 1);
    assert_eq!(document.votes[0].voter_id, UserId::new("carol"));
}

#[test]
fn test_concurrent_votes_are_both_recorded() {
    let mut harness = create_interleaving_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness
        .service
        .repository_mut()
        .interfere_before_next_save(move |persistence| {
            commit_concurrently(
                persistence,
                minutes_id,
                Command::CastVote {
                    voter_id: UserId::new("bob"),
                    vote_type: VoteType::Disagree,
                    comment: None,
                },
            );
        });

    let response = cast(&mut harness, minutes_id, "alice", "agree", None).unwrap();

    let document = response.minutes.minutes;
    assert_eq!(document.votes.len(), 2);
    assert_eq!(document.votes[0].voter_id, UserId::new("bob"));
    assert_eq!(document.votes[1].voter_id, UserId::new("alice"));
    assert_eq!(response.minutes.metadata.received_vote_count, 2);
    assert_eq!(harness.service.repository().save_calls, 2);
}

#[test]
fn test_concurrent_close_makes_manual_close_a_no_op() {
    let mut harness = create_interleaving_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness
        .service
        .repository_mut()
        .interfere_before_next_save(move |persistence| {
            commit_concurrently(
                persistence,
                minutes_id,
                Command::CloseVoting {
                    trigger: CloseTrigger::Manual,
                },
            );
        });

    let response = harness
        .service
        .close_voting(minutes_id, SECRETARY, create_test_cause())
        .unwrap();

    assert!(!response.closed_now);
    assert!(response.minutes.minutes.is_voting_closed);
    let trail = harness.service.audit_trail(minutes_id).unwrap();
    assert_eq!(trail.events.len(), 2);
    assert_eq!(trail.events[1].actor_id, "other-process");
}

#[test]
fn test_persistent_conflicts_exhaust_retries() {
    let mut harness = create_interleaving_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness.service.repository_mut().conflict_forever();

    let result = cast(&mut harness, minutes_id, "alice", "agree", None);

    assert_eq!(
        result,
        Err(ApiError::RetryExhausted {
            operation: String::from("cast_vote"),
            attempts: 5,
        })
    );
    assert_eq!(harness.service.repository().save_calls, 5);
    let document = harness.service.repository_mut().inner.load_minutes(minutes_id).unwrap();
    assert!(document.votes.is_empty());
}
