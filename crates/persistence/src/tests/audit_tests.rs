// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::{apply_and_save, insert_test_minutes, vote};
use crate::{Persistence, PersistenceError};
use minutes_vote_audit::AuditEvent;
use minutes_vote_domain::{MeetingId, MinutesDocument, MinutesId, VoteType};

#[test]
fn test_creation_event_is_bound_to_inserted_minutes() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let document: MinutesDocument = insert_test_minutes(&mut persistence, 5);

    let events: Vec<AuditEvent> = persistence
        .get_audit_events_for_minutes(document.minutes_id.unwrap())
        .unwrap();

    assert_eq!(events.len(), 1);
    assert_eq!(events[0].action.name, "CreateMinutes");
    assert_eq!(events[0].minutes_id, document.minutes_id);
    assert_eq!(events[0].meeting_id, MeetingId::new(5));
    assert_eq!(events[0].actor.id, "secretary");
    assert!(events[0].event_id.is_some());
}

#[test]
fn test_audit_trail_is_ordered() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let document: MinutesDocument = insert_test_minutes(&mut persistence, 1);
    let document: MinutesDocument =
        apply_and_save(&mut persistence, &document, vote("alice", VoteType::Agree, None));
    apply_and_save(&mut persistence, &document, vote("bob", VoteType::Disagree, None));

    let events: Vec<AuditEvent> = persistence
        .get_audit_events_for_minutes(document.minutes_id.unwrap())
        .unwrap();

    let names: Vec<&str> = events.iter().map(|e| e.action.name.as_str()).collect();
    assert_eq!(names, vec!["CreateMinutes", "CastVote", "CastVote"]);
    assert_eq!(
        events[2].action.details.as_deref(),
        Some("voter=bob,vote=disagree")
    );
    assert_eq!(events[2].after.data, "status=draft,voting_closed=false,votes=2");
}

#[test]
fn test_get_audit_event_by_id() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    let document: MinutesDocument = insert_test_minutes(&mut persistence, 1);
    let events: Vec<AuditEvent> = persistence
        .get_audit_events_for_minutes(document.minutes_id.unwrap())
        .unwrap();
    let event_id: i64 = events[0].event_id.unwrap();

    let event: AuditEvent = persistence.get_audit_event(event_id).unwrap();

    assert_eq!(event, events[0]);
}

#[test]
fn test_missing_audit_event_is_reported() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert_eq!(
        persistence.get_audit_event(404),
        Err(PersistenceError::EventNotFound(404))
    );
    assert!(
        persistence
            .get_audit_events_for_minutes(MinutesId::new(404))
            .unwrap()
            .is_empty()
    );
}
