// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Workflow events published after successful writes.
//!
//! Publishing is fire-and-forget: a failing sink is logged and never
//! undoes or fails the write that produced the event.

use minutes_vote_domain::{
    CloseTrigger, MeetingId, MinutesMetadata, MinutesId, UserId, VoteType,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An event describing a committed change to a minutes document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum MinutesEvent {
    /// A ballot was inserted or overwritten.
    VoteCast {
        minutes_id: MinutesId,
        meeting_id: MeetingId,
        voter_id: UserId,
        vote_type: VoteType,
        /// True when an earlier ballot by the same voter was replaced.
        updated_existing: bool,
        metadata: MinutesMetadata,
    },
    /// The voting window closed. Carries the final tally.
    VotingClosed {
        minutes_id: MinutesId,
        meeting_id: MeetingId,
        trigger: CloseTrigger,
        metadata: MinutesMetadata,
    },
    Approved {
        minutes_id: MinutesId,
        meeting_id: MeetingId,
        approved_by: UserId,
    },
    Rejected {
        minutes_id: MinutesId,
        meeting_id: MeetingId,
        rejected_by: UserId,
        reason: Option<String>,
    },
}

impl MinutesEvent {
    /// The document the event is about.
    #[must_use]
    pub const fn minutes_id(&self) -> MinutesId {
        match self {
            Self::VoteCast { minutes_id, .. }
            | Self::VotingClosed { minutes_id, .. }
            | Self::Approved { minutes_id, .. }
            | Self::Rejected { minutes_id, .. } => *minutes_id,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::VoteCast { .. } => "vote_cast",
            Self::VotingClosed { .. } => "voting_closed",
            Self::Approved { .. } => "approved",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// Errors a notification sink may report.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum NotificationError {
    /// The sink is shut down and can no longer deliver events.
    #[error("notification sink is unavailable")]
    Unavailable,

    /// Delivery failed.
    #[error("failed to deliver {event} notification: {reason}")]
    DeliveryFailed { event: String, reason: String },
}
