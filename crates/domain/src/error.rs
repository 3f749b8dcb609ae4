// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::{MeetingId, MinutesId, UserId};

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Minutes title is empty, too short or too long.
    InvalidTitle(String),
    /// Minutes content is too short or too long.
    InvalidContent(String),
    /// Vote comment exceeds the permitted length.
    InvalidComment(String),
    /// Rejection reason exceeds the permitted length.
    InvalidRejectionReason(String),
    /// A decision entry is malformed.
    InvalidDecision {
        /// Zero-based position of the decision in the list.
        index: usize,
        /// Description of the validation error.
        reason: String,
    },
    /// Vote type string is not one of the enumerated values.
    InvalidVoteType(String),
    /// Minutes status string is not one of the enumerated values.
    InvalidMinutesStatus(String),
    /// Decision status string is not one of the enumerated values.
    InvalidDecisionStatus(String),
    /// Vote deadline is not usable.
    InvalidVoteDeadline {
        /// Description of the validation error.
        reason: String,
    },
    /// The requested status transition is not allowed.
    InvalidStatusTransition {
        /// The current status.
        from: String,
        /// The requested status.
        to: String,
        /// Why the transition was refused.
        reason: String,
    },
    /// Voting on the minutes is closed (explicitly, by deadline, or by a terminal status).
    VotingClosed {
        /// The minutes document.
        minutes_id: Option<MinutesId>,
    },
    /// Approval or rejection attempted while voting is still open.
    VotingStillOpen {
        /// The minutes document.
        minutes_id: Option<MinutesId>,
    },
    /// The voter is not an attendee or organizer of the meeting.
    NotEligible {
        /// The voter.
        voter_id: UserId,
        /// The meeting the minutes belong to.
        meeting_id: MeetingId,
    },
    /// Minutes document does not exist.
    MinutesNotFound(MinutesId),
    /// Meeting is unknown to the meeting directory.
    MeetingNotFound(MeetingId),
    /// An open minutes round already exists for the meeting.
    OpenRoundExists {
        /// The meeting.
        meeting_id: MeetingId,
        /// The open minutes document.
        minutes_id: Option<MinutesId>,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle(msg) => write!(f, "Invalid title: {msg}"),
            Self::InvalidContent(msg) => write!(f, "Invalid content: {msg}"),
            Self::InvalidComment(msg) => write!(f, "Invalid comment: {msg}"),
            Self::InvalidRejectionReason(msg) => write!(f, "Invalid rejection reason: {msg}"),
            Self::InvalidDecision { index, reason } => {
                write!(f, "Invalid decision at position {index}: {reason}")
            }
            Self::InvalidVoteType(value) => {
                write!(
                    f,
                    "Invalid vote type '{value}'. Must be agree, agree_with_comments or disagree"
                )
            }
            Self::InvalidMinutesStatus(value) => write!(f, "Invalid minutes status '{value}'"),
            Self::InvalidDecisionStatus(value) => write!(f, "Invalid decision status '{value}'"),
            Self::InvalidVoteDeadline { reason } => write!(f, "Invalid vote deadline: {reason}"),
            Self::InvalidStatusTransition { from, to, reason } => {
                write!(f, "Cannot transition minutes from '{from}' to '{to}': {reason}")
            }
            Self::VotingClosed { minutes_id } => match minutes_id {
                Some(id) => write!(f, "Voting is closed for minutes {id}"),
                None => write!(f, "Voting is closed for these minutes"),
            },
            Self::VotingStillOpen { minutes_id } => match minutes_id {
                Some(id) => write!(f, "Voting is still open for minutes {id}"),
                None => write!(f, "Voting is still open for these minutes"),
            },
            Self::NotEligible {
                voter_id,
                meeting_id,
            } => {
                write!(
                    f,
                    "User '{voter_id}' is not an attendee or organizer of meeting {meeting_id}"
                )
            }
            Self::MinutesNotFound(id) => write!(f, "Minutes {id} not found"),
            Self::MeetingNotFound(id) => write!(f, "Meeting {id} not found"),
            Self::OpenRoundExists {
                meeting_id,
                minutes_id,
            } => match minutes_id {
                Some(id) => write!(
                    f,
                    "Meeting {meeting_id} already has open minutes {id}; close or approve them first"
                ),
                None => write!(f, "Meeting {meeting_id} already has open minutes"),
            },
        }
    }
}

impl std::error::Error for DomainError {}
