// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

use minutes_vote_domain::{MeetingId, MinutesId};

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is a user acting through the API, or the system itself when a
/// passed deadline closes voting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "user", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }

    /// The actor recorded for transitions the system performs on its own,
    /// such as closing voting after the deadline.
    #[must_use]
    pub fn system() -> Self {
        Self::new(String::from("system"), String::from("system"))
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`CastVote`", "`CloseVoting`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A compact rendering of a minutes document at a point in time.
///
/// Snapshots are flat `key=value` lists, e.g.
/// `status=draft,voting_closed=false,votes=2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// The snapshot recorded before a document exists.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(String::from("none"))
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change produces exactly one audit event.
/// A request that changes nothing (closing an already-closed window)
/// produces none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Repository-assigned identifier. `None` until persisted.
    pub event_id: Option<i64>,
    /// The meeting whose minutes changed.
    pub meeting_id: MeetingId,
    /// The minutes document. `None` for a creation event that has not been persisted.
    pub minutes_id: Option<MinutesId>,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent` that has not been persisted yet.
    ///
    /// # Arguments
    ///
    /// * `meeting_id` - The meeting the minutes belong to
    /// * `minutes_id` - The minutes document, if already assigned
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        meeting_id: MeetingId,
        minutes_id: Option<MinutesId>,
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            meeting_id,
            minutes_id,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns the same event tied to the given minutes document.
    ///
    /// Used once the repository has assigned an identifier on insert.
    #[must_use]
    pub fn for_minutes(mut self, minutes_id: MinutesId) -> Self {
        self.minutes_id = Some(minutes_id);
        self
    }
}
