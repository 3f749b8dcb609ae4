// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use minutes_vote_audit::{AuditEvent, Cause};
use minutes_vote_domain::{MeetingId, MinutesDocument, MinutesId, UserId};
use minutes_vote_persistence::{Persistence, PersistenceError};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

use crate::{
    CastVoteRequest, Clock, Collaborators, CreateMinutesRequest, MeetingDirectory,
    MinutesEvent, MinutesRepository, MinutesWorkflowService, NotificationError,
    NotificationSink, Role, RoleProvider, WorkflowConfig,
};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-03-02 09:00 UTC);

/// Meeting attended by alice, bob and carol (alice organizes).
pub const BOARD_MEETING: MeetingId = MeetingId::new(1);
/// Meeting attended by alice and dave.
pub const OTHER_MEETING: MeetingId = MeetingId::new(2);
/// Meeting the directory does not know.
pub const UNKNOWN_MEETING: MeetingId = MeetingId::new(99);

pub const SECRETARY: &str = "sec";
pub const ADMIN: &str = "admin";
pub const MANAGER: &str = "mgr";

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<OffsetDateTime>,
    step: Mutex<Duration>,
}

impl ManualClock {
    pub const fn new(now: OffsetDateTime) -> Self {
        Self {
            now: Mutex::new(now),
            step: Mutex::new(Duration::ZERO),
        }
    }

    pub fn set(&self, now: OffsetDateTime) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }

    /// Moves the clock forward by `by` after every read.
    pub fn step_after_each_read(&self, by: Duration) {
        *self.step.lock().unwrap() = by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        let mut now = self.now.lock().unwrap();
        let read: OffsetDateTime = *now;
        *now += *self.step.lock().unwrap();
        read
    }
}

pub struct StaticDirectory {
    meetings: HashMap<MeetingId, BTreeSet<UserId>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        let mut meetings: HashMap<MeetingId, BTreeSet<UserId>> = HashMap::new();
        meetings.insert(BOARD_MEETING, users(&["alice", "bob", "carol"]));
        meetings.insert(OTHER_MEETING, users(&["alice", "dave"]));
        Self { meetings }
    }
}

impl MeetingDirectory for StaticDirectory {
    fn attendees_and_organizer(&self, meeting_id: MeetingId) -> Option<BTreeSet<UserId>> {
        self.meetings.get(&meeting_id).cloned()
    }
}

pub struct StaticRoles;

impl RoleProvider for StaticRoles {
    fn role(&self, user_id: &UserId) -> Option<Role> {
        match user_id.value() {
            SECRETARY => Some(Role::Secretary),
            ADMIN => Some(Role::Admin),
            MANAGER => Some(Role::Manager),
            "alice" | "bob" | "carol" | "dave" => Some(Role::Member),
            _ => None,
        }
    }
}

/// Records every published event.
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<MinutesEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<MinutesEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.events().iter().map(MinutesEvent::name).collect()
    }
}

impl NotificationSink for RecordingSink {
    fn publish(&self, event: &MinutesEvent) -> Result<(), NotificationError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// Fails every delivery.
pub struct FailingSink;

impl NotificationSink for FailingSink {
    fn publish(&self, event: &MinutesEvent) -> Result<(), NotificationError> {
        Err(NotificationError::DeliveryFailed {
            event: event.name().to_string(),
            reason: String::from("broker offline"),
        })
    }
}

type Interference = Box<dyn FnOnce(&mut Persistence) + Send>;

/// Wraps the real persistence layer and lets a test act as a concurrent
/// writer between the service's load and its conditional save.
pub struct InterleavingRepository {
    pub inner: Persistence,
    interference: Option<Interference>,
    always_conflict: bool,
    pub save_calls: u32,
}

impl InterleavingRepository {
    pub fn new() -> Self {
        Self {
            inner: Persistence::new_in_memory().unwrap(),
            interference: None,
            always_conflict: false,
            save_calls: 0,
        }
    }

    /// Runs `interference` against the store right before the next save.
    pub fn interfere_before_next_save(
        &mut self,
        interference: impl FnOnce(&mut Persistence) + Send + 'static,
    ) {
        self.interference = Some(Box::new(interference));
    }

    /// Makes every save lose the race.
    pub const fn conflict_forever(&mut self) {
        self.always_conflict = true;
    }
}

impl MinutesRepository for InterleavingRepository {
    fn load(&mut self, minutes_id: MinutesId) -> Result<MinutesDocument, PersistenceError> {
        self.inner.load(minutes_id)
    }

    fn insert(
        &mut self,
        document: &MinutesDocument,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        self.inner.insert(document, event)
    }

    fn save(
        &mut self,
        document: &MinutesDocument,
        expected_version: i64,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        self.save_calls += 1;
        if self.always_conflict {
            return Err(PersistenceError::VersionConflict {
                minutes_id: document.minutes_id.map_or(0, |id| id.value()),
                expected_version,
            });
        }
        if let Some(interference) = self.interference.take() {
            interference(&mut self.inner);
        }
        self.inner.save(document, expected_version, event)
    }

    fn list_for_meeting(
        &mut self,
        meeting_id: MeetingId,
    ) -> Result<Vec<MinutesDocument>, PersistenceError> {
        self.inner.list_for_meeting(meeting_id)
    }

    fn list_open(&mut self) -> Result<Vec<MinutesDocument>, PersistenceError> {
        self.inner.list_open()
    }

    fn audit_events(
        &mut self,
        minutes_id: MinutesId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        self.inner.audit_events(minutes_id)
    }
}

/// A service over an in-memory database with handles on its clock and sink.
pub struct Harness<R: MinutesRepository> {
    pub service: MinutesWorkflowService<R>,
    pub clock: Arc<ManualClock>,
    pub sink: Arc<RecordingSink>,
}

pub fn create_harness() -> Harness<Persistence> {
    create_harness_with(Persistence::new_in_memory().unwrap())
}

pub fn create_interleaving_harness() -> Harness<InterleavingRepository> {
    create_harness_with(InterleavingRepository::new())
}

pub fn create_harness_with<R: MinutesRepository>(repository: R) -> Harness<R> {
    let clock: Arc<ManualClock> = Arc::new(ManualClock::new(CREATED_AT));
    let sink: Arc<RecordingSink> = Arc::new(RecordingSink::default());
    let collaborators: Collaborators = Collaborators {
        directory: Arc::new(StaticDirectory::new()),
        roles: Arc::new(StaticRoles),
        clock: Arc::clone(&clock) as Arc<dyn Clock>,
        notifications: Arc::clone(&sink) as Arc<dyn NotificationSink>,
    };

    Harness {
        service: MinutesWorkflowService::new(repository, collaborators, WorkflowConfig::default()),
        clock,
        sink,
    }
}

pub fn users(ids: &[&str]) -> BTreeSet<UserId> {
    ids.iter().copied().map(UserId::new).collect()
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_valid_request() -> CreateMinutesRequest {
    CreateMinutesRequest {
        title: String::from("Board meeting, March"),
        content: String::from("The board reviewed the quarterly figures and the budget."),
        vote_deadline: None,
        decisions: Vec::new(),
    }
}

pub fn vote_request(vote_type: &str, comment: Option<&str>) -> CastVoteRequest {
    CastVoteRequest {
        vote_type: vote_type.to_string(),
        comment: comment.map(str::to_string),
    }
}

/// Creates open minutes for the board meeting and returns their id.
pub fn create_board_minutes<R: MinutesRepository>(harness: &mut Harness<R>) -> MinutesId {
    harness
        .service
        .create_minutes(
            BOARD_MEETING,
            SECRETARY,
            &create_valid_request(),
            create_test_cause(),
        )
        .unwrap()
        .minutes
        .minutes_id
        .unwrap()
}

pub fn cast<R: MinutesRepository>(
    harness: &mut Harness<R>,
    minutes_id: MinutesId,
    voter: &str,
    vote_type: &str,
    comment: Option<&str>,
) -> Result<crate::CastVoteResponse, crate::ApiError> {
    harness.service.cast_or_update_vote(
        minutes_id,
        voter,
        &vote_request(vote_type, comment),
        create_test_cause(),
    )
}
