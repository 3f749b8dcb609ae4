// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::Duration;

use super::helpers::{
    CREATED_AT, SECRETARY, cast, create_board_minutes, create_harness, create_test_cause,
};
use crate::{Capability, MinutesCapabilities};

#[test]
fn test_attendee_may_vote_but_not_manage() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);

    let caps: MinutesCapabilities = harness.service.capabilities(minutes_id, "alice").unwrap();

    assert_eq!(caps.can_vote, Capability::Allowed);
    assert_eq!(caps.can_close_voting, Capability::Denied);
    assert_eq!(caps.can_approve, Capability::Denied);
    assert_eq!(caps.can_reject, Capability::Denied);
    assert_eq!(caps.can_advance_status, Capability::Denied);
}

#[test]
fn test_secretary_may_close_but_not_vote() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);

    let caps: MinutesCapabilities = harness
        .service
        .capabilities(minutes_id, SECRETARY)
        .unwrap();

    assert_eq!(caps.can_vote, Capability::Denied);
    assert_eq!(caps.can_close_voting, Capability::Allowed);
    assert_eq!(caps.can_approve, Capability::Denied);
    assert_eq!(caps.can_advance_status, Capability::Allowed);
}

#[test]
fn test_non_attendee_may_not_vote() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);

    let caps: MinutesCapabilities = harness.service.capabilities(minutes_id, "dave").unwrap();

    assert_eq!(caps.can_vote, Capability::Denied);
}

#[test]
fn test_capabilities_after_deadline() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);
    cast(&mut harness, minutes_id, "alice", "agree", None).unwrap();
    harness.clock.advance(Duration::days(1) + Duration::seconds(1));

    let voter: MinutesCapabilities = harness.service.capabilities(minutes_id, "bob").unwrap();
    let secretary: MinutesCapabilities = harness
        .service
        .capabilities(minutes_id, SECRETARY)
        .unwrap();

    assert_eq!(voter.can_vote, Capability::Denied);
    assert_eq!(secretary.can_close_voting, Capability::Denied);
    assert_eq!(secretary.can_approve, Capability::Allowed);
    assert_eq!(secretary.can_reject, Capability::Allowed);
}

#[test]
fn test_flags_use_the_same_instant_as_expiry() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness.clock.set(CREATED_AT + Duration::hours(24));
    harness.clock.step_after_each_read(Duration::seconds(1));

    let caps: MinutesCapabilities = harness.service.capabilities(minutes_id, "bob").unwrap();

    assert_eq!(caps.can_vote, Capability::Allowed);
}

#[test]
fn test_nothing_allowed_on_approved_minutes() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);
    harness
        .service
        .close_voting(minutes_id, SECRETARY, create_test_cause())
        .unwrap();
    harness
        .service
        .approve(minutes_id, SECRETARY, create_test_cause())
        .unwrap();

    let caps: MinutesCapabilities = harness
        .service
        .capabilities(minutes_id, SECRETARY)
        .unwrap();

    assert!(!caps.can_vote.is_allowed());
    assert!(!caps.can_close_voting.is_allowed());
    assert!(!caps.can_approve.is_allowed());
    assert!(!caps.can_reject.is_allowed());
    assert!(!caps.can_advance_status.is_allowed());
}

#[test]
fn test_capabilities_serialize_as_booleans() {
    let mut harness = create_harness();
    let minutes_id = create_board_minutes(&mut harness);
    let caps: MinutesCapabilities = harness.service.capabilities(minutes_id, "alice").unwrap();

    let json: serde_json::Value = serde_json::to_value(&caps).unwrap();

    assert_eq!(json["can_vote"], serde_json::Value::Bool(true));
    assert_eq!(json["can_approve"], serde_json::Value::Bool(false));
}
