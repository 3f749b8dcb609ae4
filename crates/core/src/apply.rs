// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, NewMinutes};
use crate::error::CoreError;
use crate::state::{CreationResult, TransitionResult, snapshot};
use minutes_vote_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use minutes_vote_domain::{
    CloseOutcome, CloseTrigger, DomainError, MinutesDocument, MinutesStateMachine, VoteChange,
    validate_comment, validate_content, validate_decisions, validate_rejection_reason,
    validate_title, validate_vote_deadline,
};
use time::{Duration, OffsetDateTime};

/// Opens a new minutes round, producing an unsaved draft and its audit event.
///
/// # Arguments
///
/// * `existing_rounds` - Every minutes document already recorded for the meeting
/// * `new_minutes` - The creation request
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The creation time
/// * `default_vote_window` - Applied when no explicit deadline is given
///
/// # Errors
///
/// Returns an error if:
/// - Any field fails validation
/// - An explicit deadline is not after `now`
/// - The default vote window runs past the supported date range
/// - Another round for the meeting is still open at `now`
pub fn apply_create(
    existing_rounds: &[MinutesDocument],
    new_minutes: NewMinutes,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
    default_vote_window: Duration,
) -> Result<CreationResult, CoreError> {
    validate_title(&new_minutes.title)?;
    validate_content(&new_minutes.content)?;
    validate_decisions(&new_minutes.decisions)?;

    if let Some(other) = existing_rounds
        .iter()
        .find(|doc| doc.meeting_id != new_minutes.meeting_id)
    {
        return Err(CoreError::Internal(format!(
            "round for meeting {} passed while creating minutes for meeting {}",
            other.meeting_id, new_minutes.meeting_id
        )));
    }

    if let Some(open) = existing_rounds.iter().find(|doc| doc.is_open_round_at(now)) {
        return Err(CoreError::DomainViolation(DomainError::OpenRoundExists {
            meeting_id: new_minutes.meeting_id,
            minutes_id: open.minutes_id,
        }));
    }

    let vote_deadline: OffsetDateTime = match new_minutes.vote_deadline {
        Some(deadline) => {
            validate_vote_deadline(deadline, now)?;
            deadline
        }
        None => {
            let deadline: OffsetDateTime = now.checked_add(default_vote_window).ok_or_else(|| {
                CoreError::Internal(format!(
                    "default vote window {default_vote_window} overflows from {now}"
                ))
            })?;
            validate_vote_deadline(deadline, now)?;
            deadline
        }
    };

    let new_document: MinutesDocument = MinutesDocument::new_draft(
        new_minutes.meeting_id,
        new_minutes.secretary_id,
        new_minutes.title.trim().to_string(),
        new_minutes.content.trim().to_string(),
        vote_deadline,
        new_minutes.decisions,
        new_minutes.eligible_voters,
        now,
    );

    let action: Action = Action::new(
        String::from("CreateMinutes"),
        Some(format!(
            "Created minutes for meeting {} with {} eligible voters, deadline {}",
            new_document.meeting_id,
            new_document.required_vote_count(),
            new_document.vote_deadline
        )),
    );
    let audit_event: AuditEvent = AuditEvent::new(
        new_document.meeting_id,
        None,
        actor,
        cause,
        action,
        StateSnapshot::empty(),
        snapshot(&new_document),
    );

    Ok(CreationResult {
        new_document,
        audit_event,
    })
}

/// Applies a command to a minutes document, producing a new document and audit event.
///
/// The input document is never modified. Authorization and meeting-directory
/// checks happen before this is called; this function enforces the document's
/// own rules (voting window, roster snapshot, lifecycle).
///
/// # Arguments
///
/// * `document` - The current document (immutable)
/// * `command` - The command to apply
/// * `actor` - The actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - The time the command is evaluated at
///
/// # Errors
///
/// Returns an error if the command violates a domain rule.
#[allow(clippy::too_many_lines)]
pub fn apply(
    document: &MinutesDocument,
    command: Command,
    actor: Actor,
    cause: Cause,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    let action_name: &'static str = command.name();
    let before: StateSnapshot = snapshot(document);
    let mut new_document: MinutesDocument = document.clone();

    let (details, vote_change): (String, Option<VoteChange>) = match command {
        Command::CastVote {
            voter_id,
            vote_type,
            comment,
        } => {
            MinutesStateMachine::ensure_accepting_votes(document, now)?;

            if !document.is_in_roster(&voter_id) {
                return Err(CoreError::DomainViolation(DomainError::NotEligible {
                    voter_id,
                    meeting_id: document.meeting_id,
                }));
            }

            validate_comment(comment.as_deref())?;

            let details: String = format!("voter={voter_id},vote={}", vote_type.as_str());
            let change: VoteChange = new_document.upsert_vote(voter_id, vote_type, comment, now);
            (details, Some(change))
        }
        Command::CloseVoting { trigger } => {
            let outcome: CloseOutcome = match trigger {
                CloseTrigger::Manual => MinutesStateMachine::close_voting(&mut new_document),
                CloseTrigger::Deadline => {
                    MinutesStateMachine::expire_if_past_deadline(&mut new_document, now)
                }
            };

            if outcome == CloseOutcome::AlreadyClosed {
                return Ok(TransitionResult {
                    new_document,
                    audit_event: None,
                    vote_change: None,
                });
            }

            (
                format!(
                    "trigger={},received={},required={}",
                    trigger.as_str(),
                    new_document.votes.len(),
                    new_document.required_vote_count()
                ),
                None,
            )
        }
        Command::Approve { approver_id } => {
            let details: String = format!("approved_by={approver_id}");
            MinutesStateMachine::approve(&mut new_document, approver_id, now)?;
            (details, None)
        }
        Command::Reject {
            rejected_by,
            reason,
        } => {
            validate_rejection_reason(reason.as_deref())?;
            let details: String = format!("rejected_by={rejected_by}");
            MinutesStateMachine::reject(&mut new_document, rejected_by, reason, now)?;
            (details, None)
        }
        Command::AdvanceStatus { target } => {
            let details: String = format!(
                "from={},to={}",
                document.status.as_str(),
                target.as_str()
            );
            MinutesStateMachine::advance_status(&mut new_document, target)?;
            (details, None)
        }
    };

    let after: StateSnapshot = snapshot(&new_document);
    let action: Action = Action::new(String::from(action_name), Some(details));
    let audit_event: AuditEvent = AuditEvent::new(
        document.meeting_id,
        document.minutes_id,
        actor,
        cause,
        action,
        before,
        after,
    );

    Ok(TransitionResult {
        new_document,
        audit_event: Some(audit_event),
        vote_change,
    })
}
