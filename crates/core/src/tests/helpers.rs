// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{NewMinutes, apply_create};
use minutes_vote_audit::{Actor, Cause};
use minutes_vote_domain::{MeetingId, MinutesDocument, MinutesId, UserId};
use std::collections::BTreeSet;
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("secretary"), String::from("user"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("API request"))
}

pub fn create_test_voters() -> BTreeSet<UserId> {
    ["alice", "bob", "carol"].into_iter().map(UserId::new).collect()
}

pub fn create_test_new_minutes() -> NewMinutes {
    NewMinutes {
        meeting_id: MeetingId::new(1),
        secretary_id: UserId::new("secretary"),
        title: String::from("Board meeting"),
        content: String::from("The board reviewed the quarterly figures."),
        vote_deadline: None,
        decisions: Vec::new(),
        eligible_voters: create_test_voters(),
    }
}

/// A saved, open draft for meeting 1 with the default 24 hour window.
pub fn create_test_document() -> MinutesDocument {
    let mut document: MinutesDocument = apply_create(
        &[],
        create_test_new_minutes(),
        create_test_actor(),
        create_test_cause(),
        CREATED_AT,
        Duration::hours(24),
    )
    .unwrap()
    .new_document;
    document.minutes_id = Some(MinutesId::new(1));
    document
}
