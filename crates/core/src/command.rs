// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use minutes_vote_domain::{CloseTrigger, Decision, MeetingId, MinutesStatus, UserId, VoteType};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// A request to open a new minutes round for a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMinutes {
    /// The meeting the minutes record.
    pub meeting_id: MeetingId,
    /// The author of the minutes.
    pub secretary_id: UserId,
    pub title: String,
    pub content: String,
    /// Explicit deadline. The default vote window applies when absent.
    pub vote_deadline: Option<OffsetDateTime>,
    pub decisions: Vec<Decision>,
    /// Attendees and organizer at creation time.
    pub eligible_voters: BTreeSet<UserId>,
}

/// A command represents user or system intent against an existing minutes
/// document, as data only.
///
/// Commands are the only way to request state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cast a ballot, or overwrite the voter's existing one.
    CastVote {
        /// The voter.
        voter_id: UserId,
        /// The position taken.
        vote_type: VoteType,
        /// Optional remarks.
        comment: Option<String>,
    },
    /// Close the voting window.
    CloseVoting {
        /// Whether this is an explicit close or a deadline evaluation.
        trigger: CloseTrigger,
    },
    /// Approve the minutes. Voting must be closed.
    Approve {
        /// The approving user.
        approver_id: UserId,
    },
    /// Reject the minutes. Voting must be closed.
    Reject {
        /// The rejecting user.
        rejected_by: UserId,
        /// Optional explanation.
        reason: Option<String>,
    },
    /// Move the minutes between editorial states.
    AdvanceStatus {
        /// The requested non-terminal status.
        target: MinutesStatus,
    },
}

impl Command {
    /// The action name recorded in audit events.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CastVote { .. } => "CastVote",
            Self::CloseVoting { .. } => "CloseVoting",
            Self::Approve { .. } => "Approve",
            Self::Reject { .. } => "Reject",
            Self::AdvanceStatus { .. } => "AdvanceStatus",
        }
    }
}
