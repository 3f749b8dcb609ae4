// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The minutes document and its status vocabulary.

use crate::decision::Decision;
use crate::error::DomainError;
use crate::types::{MeetingId, MinutesId, UserId};
use crate::vote::{VoteRecord, VoteType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::str::FromStr;
use time::OffsetDateTime;

/// Editorial status of a minutes document.
///
/// `Draft` and the terminal `Approved` state carry the consensus path.
/// `PendingReview` and `PendingApproval` exist for manual editorial workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MinutesStatus {
    #[default]
    Draft,
    PendingReview,
    PendingApproval,
    Approved,
    Rejected,
}

impl MinutesStatus {
    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::PendingReview => "pending_review",
            Self::PendingApproval => "pending_approval",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true if no further transition is possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl FromStr for MinutesStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(Self::Draft),
            "pending_review" => Ok(Self::PendingReview),
            "pending_approval" => Ok(Self::PendingApproval),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            _ => Err(DomainError::InvalidMinutesStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for MinutesStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether a ballot write created a new record or replaced an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteChange {
    Inserted,
    Updated,
}

/// A record of one meeting, voted on by its attendees.
///
/// Each document is one voting "round" for its meeting. Status and the
/// voting-closed flag are only changed through `MinutesStateMachine`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinutesDocument {
    /// Repository-assigned identifier. `None` until inserted.
    pub minutes_id: Option<MinutesId>,
    pub meeting_id: MeetingId,
    pub title: String,
    pub content: String,
    pub status: MinutesStatus,
    pub secretary_id: UserId,
    #[serde(with = "time::serde::rfc3339")]
    pub vote_deadline: OffsetDateTime,
    pub is_voting_closed: bool,
    pub decisions: Vec<Decision>,
    /// Ballots in first-cast order, unique by voter.
    pub votes: Vec<VoteRecord>,
    pub approved_by: Option<UserId>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub rejected_by: Option<UserId>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub rejected_at: Option<OffsetDateTime>,
    pub rejection_reason: Option<String>,
    /// Voter roster captured at creation. Its size is the required vote count.
    pub eligible_voters: BTreeSet<UserId>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Optimistic concurrency counter, bumped by every successful save.
    pub version: i64,
}

impl MinutesDocument {
    /// Creates a new, unsaved draft with voting open and no ballots.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub const fn new_draft(
        meeting_id: MeetingId,
        secretary_id: UserId,
        title: String,
        content: String,
        vote_deadline: OffsetDateTime,
        decisions: Vec<Decision>,
        eligible_voters: BTreeSet<UserId>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            minutes_id: None,
            meeting_id,
            title,
            content,
            status: MinutesStatus::Draft,
            secretary_id,
            vote_deadline,
            is_voting_closed: false,
            decisions,
            votes: Vec::new(),
            approved_by: None,
            approved_at: None,
            rejected_by: None,
            rejected_at: None,
            rejection_reason: None,
            eligible_voters,
            created_at,
            version: 1,
        }
    }

    /// Number of voters captured at creation.
    #[must_use]
    pub fn required_vote_count(&self) -> usize {
        self.eligible_voters.len()
    }

    /// Returns the ballot cast by the given voter, if any.
    #[must_use]
    pub fn vote_by(&self, voter_id: &UserId) -> Option<&VoteRecord> {
        self.votes.iter().find(|v| &v.voter_id == voter_id)
    }

    /// Returns true if the voter was part of the roster captured at creation.
    #[must_use]
    pub fn is_in_roster(&self, voter_id: &UserId) -> bool {
        self.eligible_voters.contains(voter_id)
    }

    /// Returns true if `now` is strictly after the vote deadline.
    #[must_use]
    pub fn is_past_deadline(&self, now: OffsetDateTime) -> bool {
        now > self.vote_deadline
    }

    /// Returns true if this round still blocks a new round for its meeting.
    ///
    /// A round is open while it is neither approved nor voting-closed.
    #[must_use]
    pub fn is_open_round(&self) -> bool {
        self.status != MinutesStatus::Approved && !self.is_voting_closed
    }

    /// Same as `is_open_round`, but also treats a passed deadline as closed.
    #[must_use]
    pub fn is_open_round_at(&self, now: OffsetDateTime) -> bool {
        self.is_open_round() && !self.is_past_deadline(now)
    }

    /// Returns true if ballots may be written at `now`.
    #[must_use]
    pub fn accepts_votes_at(&self, now: OffsetDateTime) -> bool {
        !self.is_voting_closed && !self.status.is_terminal() && !self.is_past_deadline(now)
    }

    /// Inserts the voter's ballot, or overwrites it in place if one exists.
    ///
    /// This does not check whether voting is open; callers go through
    /// `MinutesStateMachine::ensure_accepting_votes` first.
    pub fn upsert_vote(
        &mut self,
        voter_id: UserId,
        vote_type: VoteType,
        comment: Option<String>,
        voted_at: OffsetDateTime,
    ) -> VoteChange {
        if let Some(existing) = self.votes.iter_mut().find(|v| v.voter_id == voter_id) {
            existing.overwrite(vote_type, comment, voted_at);
            return VoteChange::Updated;
        }

        self.votes
            .push(VoteRecord::new(voter_id, vote_type, comment, voted_at));
        VoteChange::Inserted
    }
}
