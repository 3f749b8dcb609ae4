// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use minutes_vote_audit::{AuditEvent, StateSnapshot};
use minutes_vote_domain::{MinutesDocument, VoteChange};

/// Renders the audited part of a document as a snapshot.
#[must_use]
pub fn snapshot(document: &MinutesDocument) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},voting_closed={},votes={}",
        document.status.as_str(),
        document.is_voting_closed,
        document.votes.len()
    ))
}

/// The result of opening a new minutes round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreationResult {
    /// The unsaved draft.
    pub new_document: MinutesDocument,
    /// The audit event for the creation. Its `minutes_id` is assigned on insert.
    pub audit_event: AuditEvent,
}

/// The result of applying a command to an existing document.
///
/// `audit_event` is `None` when the command was accepted but changed
/// nothing, in which case `new_document` equals the input and must not be
/// saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The document after the transition, with the version not yet bumped.
    pub new_document: MinutesDocument,
    /// The audit event for this transition, if anything changed.
    pub audit_event: Option<AuditEvent>,
    /// For ballots, whether the voter's record was inserted or overwritten.
    pub vote_change: Option<VoteChange>,
}

impl TransitionResult {
    /// Returns true if the document changed and must be saved.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        self.audit_event.is_some()
    }
}
