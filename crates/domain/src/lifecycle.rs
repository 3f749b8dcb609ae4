// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minutes lifecycle and voting-window transitions.
//!
//! This is the only place where a document's `status` or
//! `is_voting_closed` flag changes.
//!
//! ## Transitions
//!
//! - close voting: status unchanged, `is_voting_closed = true`, idempotent
//! - `draft -> pending_review -> pending_approval`, and `pending_review -> draft`
//! - `{draft, pending_review, pending_approval} -> approved | rejected`,
//!   only once voting is closed
//!
//! ## Invariants
//!
//! - `is_voting_closed` never goes back to `false`
//! - `approved` and `rejected` are terminal
//! - a terminal document always has `is_voting_closed == true`

use crate::error::DomainError;
use crate::minutes::{MinutesDocument, MinutesStatus};
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// What caused the voting window to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseTrigger {
    /// An authorized actor closed voting explicitly.
    Manual,
    /// The vote deadline passed and the document was evaluated afterwards.
    Deadline,
}

impl CloseTrigger {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Deadline => "deadline",
        }
    }
}

/// Result of a close-voting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The window was open and is now closed.
    Closed,
    /// The window was already closed; nothing changed.
    AlreadyClosed,
}

/// Lifecycle rules for minutes documents.
pub struct MinutesStateMachine;

impl MinutesStateMachine {
    /// Closes the voting window.
    ///
    /// Closing an already-closed window is a no-op, not an error, since a
    /// deadline evaluation and a manual close may race.
    pub const fn close_voting(document: &mut MinutesDocument) -> CloseOutcome {
        if document.is_voting_closed {
            return CloseOutcome::AlreadyClosed;
        }
        document.is_voting_closed = true;
        CloseOutcome::Closed
    }

    /// Closes the voting window if `now` is past the deadline.
    ///
    /// Returns `CloseOutcome::Closed` only when this call fired the transition.
    pub fn expire_if_past_deadline(
        document: &mut MinutesDocument,
        now: OffsetDateTime,
    ) -> CloseOutcome {
        if document.is_voting_closed || !document.is_past_deadline(now) {
            return CloseOutcome::AlreadyClosed;
        }
        Self::close_voting(document)
    }

    /// Checks that ballots may be written to the document at `now`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VotingClosed` if voting was closed, the status is
    /// terminal, or the deadline has passed.
    pub fn ensure_accepting_votes(
        document: &MinutesDocument,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        if document.accepts_votes_at(now) {
            Ok(())
        } else {
            Err(DomainError::VotingClosed {
                minutes_id: document.minutes_id,
            })
        }
    }

    /// Validates if a status transition is permitted by the lifecycle.
    ///
    /// This checks the status graph only. Approval and rejection additionally
    /// require a closed voting window, see `approve` and `reject`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStatusTransition` if the transition is not allowed.
    pub fn validate_transition(
        from: MinutesStatus,
        to: MinutesStatus,
    ) -> Result<(), DomainError> {
        if from.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: "cannot transition from terminal state".to_string(),
            });
        }

        let valid: bool = match from {
            MinutesStatus::Draft => matches!(
                to,
                MinutesStatus::PendingReview | MinutesStatus::Approved | MinutesStatus::Rejected
            ),
            MinutesStatus::PendingReview => matches!(
                to,
                MinutesStatus::Draft
                    | MinutesStatus::PendingApproval
                    | MinutesStatus::Approved
                    | MinutesStatus::Rejected
            ),
            MinutesStatus::PendingApproval => {
                matches!(to, MinutesStatus::Approved | MinutesStatus::Rejected)
            }
            MinutesStatus::Approved | MinutesStatus::Rejected => false,
        };

        if valid {
            Ok(())
        } else {
            Err(DomainError::InvalidStatusTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: "transition not permitted by minutes lifecycle rules".to_string(),
            })
        }
    }

    /// Moves the document between editorial states.
    ///
    /// # Errors
    ///
    /// Returns an error if `to` is a terminal state (use `approve` or `reject`)
    /// or the transition is not permitted.
    pub fn advance_status(
        document: &mut MinutesDocument,
        to: MinutesStatus,
    ) -> Result<(), DomainError> {
        if to.is_terminal() {
            return Err(DomainError::InvalidStatusTransition {
                from: document.status.as_str().to_string(),
                to: to.as_str().to_string(),
                reason: "terminal states are reached through approve or reject".to_string(),
            });
        }
        Self::validate_transition(document.status, to)?;
        document.status = to;
        Ok(())
    }

    /// Approves the document.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VotingStillOpen` if voting has not been closed, or
    /// `DomainError::InvalidStatusTransition` if the document is already terminal.
    pub fn approve(
        document: &mut MinutesDocument,
        approver: UserId,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        Self::validate_transition(document.status, MinutesStatus::Approved)?;
        if !document.is_voting_closed {
            return Err(DomainError::VotingStillOpen {
                minutes_id: document.minutes_id,
            });
        }

        document.status = MinutesStatus::Approved;
        document.approved_by = Some(approver);
        document.approved_at = Some(now);
        Ok(())
    }

    /// Rejects the document.
    ///
    /// Rejection follows the same close-then-decide path as approval.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::VotingStillOpen` if voting has not been closed, or
    /// `DomainError::InvalidStatusTransition` if the document is already terminal.
    pub fn reject(
        document: &mut MinutesDocument,
        rejected_by: UserId,
        reason: Option<String>,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        Self::validate_transition(document.status, MinutesStatus::Rejected)?;
        if !document.is_voting_closed {
            return Err(DomainError::VotingStillOpen {
                minutes_id: document.minutes_id,
            });
        }

        document.status = MinutesStatus::Rejected;
        document.rejected_by = Some(rejected_by);
        document.rejected_at = Some(now);
        document.rejection_reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Ok(())
    }
}
