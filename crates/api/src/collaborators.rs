// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Seams between the workflow service and the rest of the application.

use minutes_vote_audit::AuditEvent;
use minutes_vote_domain::{MeetingId, MinutesDocument, MinutesId, UserId};
use minutes_vote_persistence::{Persistence, PersistenceError};
use std::collections::BTreeSet;
use std::sync::Arc;
use time::OffsetDateTime;

use crate::auth::Role;
use crate::notifications::{MinutesEvent, NotificationError};

/// Storage for minutes documents and their audit trail.
///
/// `save` is a conditional write: it must fail with
/// `PersistenceError::VersionConflict` when the stored version is no longer
/// `expected_version`, writing nothing. Audit events are stored in the same
/// unit of work as the document change they describe.
pub trait MinutesRepository {
    /// # Errors
    ///
    /// Returns `PersistenceError::MinutesNotFound` if the document does not exist.
    fn load(&mut self, minutes_id: MinutesId) -> Result<MinutesDocument, PersistenceError>;

    /// # Errors
    ///
    /// Returns `PersistenceError::OpenRoundExists` if the meeting already has
    /// an open round.
    fn insert(
        &mut self,
        document: &MinutesDocument,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError>;

    /// # Errors
    ///
    /// Returns `PersistenceError::VersionConflict` if another writer saved first.
    fn save(
        &mut self,
        document: &MinutesDocument,
        expected_version: i64,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the rounds cannot be read.
    fn list_for_meeting(
        &mut self,
        meeting_id: MeetingId,
    ) -> Result<Vec<MinutesDocument>, PersistenceError>;

    /// Documents whose voting flag is unset and whose status is not terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the documents cannot be read.
    fn list_open(&mut self) -> Result<Vec<MinutesDocument>, PersistenceError>;

    /// # Errors
    ///
    /// Returns an error if the events cannot be read.
    fn audit_events(&mut self, minutes_id: MinutesId)
    -> Result<Vec<AuditEvent>, PersistenceError>;
}

impl MinutesRepository for Persistence {
    fn load(&mut self, minutes_id: MinutesId) -> Result<MinutesDocument, PersistenceError> {
        self.load_minutes(minutes_id)
    }

    fn insert(
        &mut self,
        document: &MinutesDocument,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        self.insert_minutes(document, event)
    }

    fn save(
        &mut self,
        document: &MinutesDocument,
        expected_version: i64,
        event: &AuditEvent,
    ) -> Result<MinutesDocument, PersistenceError> {
        self.save_minutes(document, expected_version, event)
    }

    fn list_for_meeting(
        &mut self,
        meeting_id: MeetingId,
    ) -> Result<Vec<MinutesDocument>, PersistenceError> {
        self.list_minutes_for_meeting(meeting_id)
    }

    fn list_open(&mut self) -> Result<Vec<MinutesDocument>, PersistenceError> {
        self.list_open_minutes()
    }

    fn audit_events(
        &mut self,
        minutes_id: MinutesId,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        self.get_audit_events_for_minutes(minutes_id)
    }
}

/// Knows who attended or organized each meeting.
pub trait MeetingDirectory: Send + Sync {
    /// Returns the attendees plus the organizer, or `None` for an unknown meeting.
    fn attendees_and_organizer(&self, meeting_id: MeetingId) -> Option<BTreeSet<UserId>>;
}

/// Knows each user's role.
pub trait RoleProvider: Send + Sync {
    fn role(&self, user_id: &UserId) -> Option<Role>;
}

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The wall clock, in UTC.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Receives workflow events after the change they describe is committed.
pub trait NotificationSink: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered. The service
    /// logs it and carries on.
    fn publish(&self, event: &MinutesEvent) -> Result<(), NotificationError>;
}

/// The non-storage collaborators a `MinutesWorkflowService` needs.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn MeetingDirectory>,
    pub roles: Arc<dyn RoleProvider>,
    pub clock: Arc<dyn Clock>,
    pub notifications: Arc<dyn NotificationSink>,
}
