// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use minutes_vote_audit::AuditEvent;
use minutes_vote_domain::{
    Decision, MeetingId, MinutesAggregator, MinutesDocument, MinutesId, MinutesMetadata,
};
use time::OffsetDateTime;

/// API request to open a new minutes round for a meeting.
///
/// The requesting actor becomes the secretary of the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMinutesRequest {
    pub title: String,
    pub content: String,
    /// Explicit voting deadline. The configured default window applies when absent.
    pub vote_deadline: Option<OffsetDateTime>,
    pub decisions: Vec<Decision>,
}

/// API request to cast or replace the caller's ballot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CastVoteRequest {
    /// `agree`, `agree_with_comments` or `disagree`.
    pub vote_type: String,
    pub comment: Option<String>,
}

/// API request to reject minutes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectMinutesRequest {
    pub reason: Option<String>,
}

/// API request to move minutes to another editorial status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceStatusRequest {
    /// `draft`, `pending_review` or `pending_approval`.
    pub target_status: String,
}

/// A minutes document together with its freshly computed vote statistics.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MinutesResponse {
    pub minutes: MinutesDocument,
    pub metadata: MinutesMetadata,
}

impl MinutesResponse {
    /// Wraps a document, computing its metadata.
    #[must_use]
    pub fn from_document(minutes: MinutesDocument) -> Self {
        let metadata: MinutesMetadata =
            MinutesAggregator::compute_metadata(&minutes.votes, minutes.required_vote_count());
        Self { minutes, metadata }
    }
}

/// API response for a ballot write.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CastVoteResponse {
    /// True when an earlier ballot by the same voter was replaced.
    pub updated_existing: bool,
    #[serde(flatten)]
    pub minutes: MinutesResponse,
}

/// API response for a close-voting request.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CloseVotingResponse {
    /// False when voting was already closed and nothing changed.
    pub closed_now: bool,
    #[serde(flatten)]
    pub minutes: MinutesResponse,
}

/// Every minutes round recorded for a meeting, oldest first.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ListMinutesResponse {
    pub meeting_id: MeetingId,
    pub minutes: Vec<MinutesResponse>,
}

/// One entry of a document's audit trail.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditEventInfo {
    pub event_id: Option<i64>,
    pub actor_id: String,
    pub actor_type: String,
    pub cause_id: String,
    pub cause_description: String,
    pub action: String,
    pub details: Option<String>,
    pub before: String,
    pub after: String,
}

impl From<AuditEvent> for AuditEventInfo {
    fn from(event: AuditEvent) -> Self {
        Self {
            event_id: event.event_id,
            actor_id: event.actor.id,
            actor_type: event.actor.actor_type,
            cause_id: event.cause.id,
            cause_description: event.cause.description,
            action: event.action.name,
            details: event.action.details,
            before: event.before.data,
            after: event.after.data,
        }
    }
}

/// A document's audit trail, oldest first.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditTrailResponse {
    pub minutes_id: MinutesId,
    pub events: Vec<AuditEventInfo>,
}

/// Documents closed by one expiry sweep.
#[derive(Debug, Clone, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct SweepResponse {
    pub closed: Vec<MinutesId>,
    /// Documents skipped because their expiry could not be written.
    pub failed: Vec<MinutesId>,
}

/// Represents whether a specific action is permitted.
///
/// Serializes to JSON as true/false.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the capability is allowed.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Creates a capability from a boolean value.
    #[must_use]
    pub const fn from_bool(value: bool) -> Self {
        if value { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(self.is_allowed())
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let allowed: bool = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(allowed))
    }
}

/// What an actor may currently do with one minutes document.
///
/// Advisory only: every operation enforces its own rules regardless.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MinutesCapabilities {
    pub minutes_id: MinutesId,
    pub actor_id: String,
    pub can_vote: Capability,
    pub can_close_voting: Capability,
    pub can_approve: Capability,
    pub can_reject: Capability,
    pub can_advance_status: Capability,
}
