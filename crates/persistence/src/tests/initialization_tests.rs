// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::Persistence;
use crate::tests::insert_test_minutes;
use minutes_vote_domain::MeetingId;

#[test]
fn test_in_memory_database_enforces_foreign_keys() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    insert_test_minutes(&mut first, 1);

    assert_eq!(
        first
            .list_minutes_for_meeting(MeetingId::new(1))
            .unwrap()
            .len(),
        1
    );
    assert!(
        second
            .list_minutes_for_meeting(MeetingId::new(1))
            .unwrap()
            .is_empty()
    );
}
