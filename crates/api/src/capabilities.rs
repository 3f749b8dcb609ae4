// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what an actor is permitted to do with a document
//! right now. They are advisory only and do not replace the checks each
//! operation performs.

use minutes_vote_domain::{MinutesDocument, MinutesId, MinutesStateMachine, MinutesStatus, UserId};
use std::collections::BTreeSet;
use time::OffsetDateTime;

use crate::auth::AuthenticatedActor;
use crate::request_response::{Capability, MinutesCapabilities};

const EDITORIAL_TARGETS: [MinutesStatus; 3] = [
    MinutesStatus::Draft,
    MinutesStatus::PendingReview,
    MinutesStatus::PendingApproval,
];

/// Computes an actor's capabilities on one document.
///
/// # Arguments
///
/// * `minutes_id` - The document identifier
/// * `document` - The document, already evaluated for deadline expiry
/// * `actor` - The actor asking
/// * `attendees` - The meeting's attendees and organizer, if the meeting is known
/// * `now` - The evaluation time
#[must_use]
pub fn compute_minutes_capabilities(
    minutes_id: MinutesId,
    document: &MinutesDocument,
    actor: &AuthenticatedActor,
    attendees: Option<&BTreeSet<UserId>>,
    now: OffsetDateTime,
) -> MinutesCapabilities {
    let is_attendee: bool = attendees.is_some_and(|set| set.contains(&actor.user_id));
    let can_vote: bool =
        document.accepts_votes_at(now) && is_attendee && document.is_in_roster(&actor.user_id);

    let manages: bool = actor.role.manages_minutes();
    let is_terminal: bool = document.status.is_terminal();

    let can_close_voting: bool = manages && !document.is_voting_closed && !is_terminal;
    let can_approve: bool = manages
        && document.is_voting_closed
        && MinutesStateMachine::validate_transition(document.status, MinutesStatus::Approved)
            .is_ok();
    let can_reject: bool = manages
        && document.is_voting_closed
        && MinutesStateMachine::validate_transition(document.status, MinutesStatus::Rejected)
            .is_ok();
    let can_advance_status: bool = manages
        && EDITORIAL_TARGETS
            .iter()
            .any(|target| MinutesStateMachine::validate_transition(document.status, *target).is_ok());

    MinutesCapabilities {
        minutes_id,
        actor_id: actor.user_id.value().to_string(),
        can_vote: Capability::from_bool(can_vote),
        can_close_voting: Capability::from_bool(can_close_voting),
        can_approve: Capability::from_bool(can_approve),
        can_reject: Capability::from_bool(can_reject),
        can_advance_status: Capability::from_bool(can_advance_status),
    }
}
