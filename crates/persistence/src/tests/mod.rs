// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod audit_tests;
mod initialization_tests;

use crate::Persistence;
use minutes_vote::{
    Command, CreationResult, NewMinutes, TransitionResult, apply, apply_create,
};
use minutes_vote_audit::{Actor, Cause};
use minutes_vote_domain::{
    Decision, DecisionStatus, MeetingId, MinutesDocument, UserId, VoteType,
};
use std::collections::BTreeSet;
use time::macros::{date, datetime};
use time::{Duration, OffsetDateTime};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);
pub const DURING_VOTING: OffsetDateTime = datetime!(2026-03-02 12:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("secretary"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

pub fn create_test_new_minutes(meeting_id: i64) -> NewMinutes {
    let mut decision: Decision = Decision::new("Renew the cleaning contract");
    decision.description = Some(String::from("Two year term"));
    decision.responsible_user_id = Some(UserId::new("bob"));
    decision.deadline = Some(date!(2026 - 04 - 30));
    decision.status = DecisionStatus::InProgress;

    NewMinutes {
        meeting_id: MeetingId::new(meeting_id),
        secretary_id: UserId::new("secretary"),
        title: String::from("Facilities committee"),
        content: String::from("The committee reviewed the open maintenance items."),
        vote_deadline: None,
        decisions: vec![decision, Decision::new("Schedule follow-up")],
        eligible_voters: ["alice", "bob", "carol"]
            .into_iter()
            .map(UserId::new)
            .collect::<BTreeSet<UserId>>(),
    }
}

/// Creates and inserts an open round for the given meeting.
pub fn insert_test_minutes(persistence: &mut Persistence, meeting_id: i64) -> MinutesDocument {
    let created: CreationResult = apply_create(
        &[],
        create_test_new_minutes(meeting_id),
        create_test_actor(),
        create_test_cause(),
        CREATED_AT,
        Duration::hours(24),
    )
    .unwrap();

    persistence
        .insert_minutes(&created.new_document, &created.audit_event)
        .unwrap()
}

/// Applies a command and saves the result.
pub fn apply_and_save(
    persistence: &mut Persistence,
    document: &MinutesDocument,
    command: Command,
) -> MinutesDocument {
    let result: TransitionResult = apply(
        document,
        command,
        create_test_actor(),
        create_test_cause(),
        DURING_VOTING,
    )
    .unwrap();

    persistence
        .save_minutes(
            &result.new_document,
            document.version,
            result.audit_event.as_ref().unwrap(),
        )
        .unwrap()
}

pub fn vote(voter: &str, vote_type: VoteType, comment: Option<&str>) -> Command {
    Command::CastVote {
        voter_id: UserId::new(voter),
        vote_type,
        comment: comment.map(String::from),
    }
}
