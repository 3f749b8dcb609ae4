// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The minutes workflow service.
//!
//! Every write follows the same shape: load the document, evaluate deadline
//! expiry, check the caller, apply a pure transition from the core crate and
//! save it conditionally on the version that was loaded. A lost race reloads
//! and re-applies the command from scratch, so a ballot is either recorded
//! before a concurrent close or rejected after it, never dropped.
//!
//! Deadline expiry is lazy: the first evaluation after the deadline persists
//! the closure (with its audit event and notification) before doing anything
//! else. `close_expired_voting` does the same for every open document and
//! is never needed for correctness.

use minutes_vote::{Command, CreationResult, NewMinutes, TransitionResult, apply, apply_create};
use minutes_vote_audit::{Actor, AuditEvent, Cause};
use minutes_vote_domain::{
    CloseTrigger, DomainError, MeetingId, MinutesAggregator, MinutesDocument, MinutesId,
    MinutesMetadata, MinutesStateMachine, MinutesStatus, UserId, VoteChange, VoteType,
};
use minutes_vote_persistence::PersistenceError;
use std::collections::BTreeSet;
use std::str::FromStr;
use std::sync::Arc;
use time::OffsetDateTime;
use tracing::{debug, error, info, warn};

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::capabilities::compute_minutes_capabilities;
use crate::collaborators::{Collaborators, MeetingDirectory, MinutesRepository};
use crate::config::WorkflowConfig;
use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::notifications::MinutesEvent;
use crate::request_response::{
    AdvanceStatusRequest, AuditEventInfo, AuditTrailResponse, CastVoteRequest, CastVoteResponse,
    CloseVotingResponse, CreateMinutesRequest, ListMinutesResponse, MinutesCapabilities,
    MinutesResponse, RejectMinutesRequest, SweepResponse,
};

/// A committed (or deliberately skipped) transition.
struct Applied {
    document: MinutesDocument,
    vote_change: Option<VoteChange>,
    /// False when the command was a no-op and nothing was written.
    changed: bool,
}

/// Coordinates minutes creation, voting and lifecycle transitions.
pub struct MinutesWorkflowService<R: MinutesRepository> {
    repository: R,
    collaborators: Collaborators,
    config: WorkflowConfig,
}

impl<R: MinutesRepository> MinutesWorkflowService<R> {
    #[must_use]
    pub const fn new(repository: R, collaborators: Collaborators, config: WorkflowConfig) -> Self {
        Self {
            repository,
            collaborators,
            config,
        }
    }

    #[must_use]
    pub const fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    pub const fn repository_mut(&mut self) -> &mut R {
        &mut self.repository
    }

    // ========================================================================
    // Writes
    // ========================================================================

    /// Opens a new minutes round for a meeting.
    ///
    /// The roster is snapshotted from the meeting directory; its size becomes
    /// the required vote count. Rounds of the same meeting whose deadline has
    /// passed are closed first.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The actor is not an admin, manager or secretary
    /// - The meeting is unknown to the directory
    /// - Any field fails validation
    /// - The meeting still has an open round
    pub fn create_minutes(
        &mut self,
        meeting_id: MeetingId,
        secretary_id: &str,
        request: &CreateMinutesRequest,
        cause: Cause,
    ) -> Result<MinutesResponse, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(secretary_id)?;
        AuthorizationService::authorize_create_minutes(&actor)?;

        let eligible_voters: BTreeSet<UserId> = self
            .collaborators
            .directory
            .attendees_and_organizer(meeting_id)
            .ok_or_else(|| translate_domain_error(DomainError::MeetingNotFound(meeting_id)))?;

        let (rounds, now): (Vec<MinutesDocument>, OffsetDateTime) =
            self.current_rounds(meeting_id, "create_minutes")?;

        let new_minutes: NewMinutes = NewMinutes {
            meeting_id,
            secretary_id: actor.user_id.clone(),
            title: request.title.clone(),
            content: request.content.clone(),
            vote_deadline: request.vote_deadline,
            decisions: request.decisions.clone(),
            eligible_voters,
        };

        let creation: CreationResult = apply_create(
            &rounds,
            new_minutes,
            actor.to_audit_actor(),
            cause,
            now,
            self.config.default_vote_window,
        )
        .map_err(translate_core_error)?;

        let stored: MinutesDocument = self
            .repository
            .insert(&creation.new_document, &creation.audit_event)
            .map_err(translate_persistence_error)?;

        info!(
            meeting_id = meeting_id.value(),
            minutes_id = stored.minutes_id.map(|id| id.value()),
            secretary = %actor.user_id,
            required_votes = stored.required_vote_count(),
            deadline = %stored.vote_deadline,
            "Created minutes"
        );
        Ok(MinutesResponse::from_document(stored))
    }

    /// Casts the voter's ballot, or overwrites it in place.
    ///
    /// The voter must be an attendee or organizer of the meeting now and must
    /// have been one when the minutes were created.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vote type is unknown
    /// - The minutes do not exist
    /// - Voting is closed, by action, status or deadline
    /// - The voter is not eligible
    /// - The comment is too long
    pub fn cast_or_update_vote(
        &mut self,
        minutes_id: MinutesId,
        voter_id: &str,
        request: &CastVoteRequest,
        cause: Cause,
    ) -> Result<CastVoteResponse, ApiError> {
        let voter: AuthenticatedActor = self.resolve_actor(voter_id)?;
        let vote_type: VoteType =
            VoteType::parse_str(&request.vote_type).map_err(translate_domain_error)?;

        let command: Command = Command::CastVote {
            voter_id: voter.user_id.clone(),
            vote_type,
            comment: request.comment.clone(),
        };

        let directory: Arc<dyn MeetingDirectory> = Arc::clone(&self.collaborators.directory);
        let voter_user: &UserId = &voter.user_id;
        let applied: Applied = self.run_transition(
            "cast_vote",
            minutes_id,
            command,
            voter.to_audit_actor(),
            cause,
            |document, now| {
                MinutesStateMachine::ensure_accepting_votes(document, now)
                    .map_err(translate_domain_error)?;
                let attends: bool = directory
                    .attendees_and_organizer(document.meeting_id)
                    .is_some_and(|attendees| attendees.contains(voter_user));
                if attends {
                    Ok(())
                } else {
                    Err(translate_domain_error(DomainError::NotEligible {
                        voter_id: voter_user.clone(),
                        meeting_id: document.meeting_id,
                    }))
                }
            },
        )?;

        let updated_existing: bool = applied.vote_change == Some(VoteChange::Updated);
        let response: MinutesResponse = MinutesResponse::from_document(applied.document);

        self.publish(&MinutesEvent::VoteCast {
            minutes_id,
            meeting_id: response.minutes.meeting_id,
            voter_id: voter.user_id,
            vote_type,
            updated_existing,
            metadata: response.metadata,
        });

        Ok(CastVoteResponse {
            updated_existing,
            minutes: response,
        })
    }

    /// Closes voting. Closing already-closed minutes succeeds without changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not an admin, manager or secretary,
    /// or the minutes do not exist.
    pub fn close_voting(
        &mut self,
        minutes_id: MinutesId,
        actor_id: &str,
        cause: Cause,
    ) -> Result<CloseVotingResponse, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(actor_id)?;
        AuthorizationService::authorize_close_voting(&actor)?;

        let command: Command = Command::CloseVoting {
            trigger: CloseTrigger::Manual,
        };
        let applied: Applied = self.run_transition(
            "close_voting",
            minutes_id,
            command,
            actor.to_audit_actor(),
            cause,
            |_, _| Ok(()),
        )?;

        let response: MinutesResponse = MinutesResponse::from_document(applied.document);
        if applied.changed {
            self.publish(&MinutesEvent::VotingClosed {
                minutes_id,
                meeting_id: response.minutes.meeting_id,
                trigger: CloseTrigger::Manual,
                metadata: response.metadata,
            });
        } else {
            debug!(minutes_id = minutes_id.value(), "Voting was already closed");
        }

        Ok(CloseVotingResponse {
            closed_now: applied.changed,
            minutes: response,
        })
    }

    /// Approves minutes whose voting is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not authorized, the minutes do not
    /// exist, voting is still open, or the minutes are already terminal.
    pub fn approve(
        &mut self,
        minutes_id: MinutesId,
        actor_id: &str,
        cause: Cause,
    ) -> Result<MinutesResponse, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(actor_id)?;
        AuthorizationService::authorize_approve(&actor)?;

        let command: Command = Command::Approve {
            approver_id: actor.user_id.clone(),
        };
        let applied: Applied = self.run_transition(
            "approve",
            minutes_id,
            command,
            actor.to_audit_actor(),
            cause,
            |_, _| Ok(()),
        )?;

        let response: MinutesResponse = MinutesResponse::from_document(applied.document);
        self.publish(&MinutesEvent::Approved {
            minutes_id,
            meeting_id: response.minutes.meeting_id,
            approved_by: actor.user_id,
        });
        Ok(response)
    }

    /// Rejects minutes whose voting is closed.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not authorized, the minutes do not
    /// exist, voting is still open, the minutes are already terminal, or the
    /// reason is too long.
    pub fn reject(
        &mut self,
        minutes_id: MinutesId,
        actor_id: &str,
        request: &RejectMinutesRequest,
        cause: Cause,
    ) -> Result<MinutesResponse, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(actor_id)?;
        AuthorizationService::authorize_reject(&actor)?;

        let command: Command = Command::Reject {
            rejected_by: actor.user_id.clone(),
            reason: request.reason.clone(),
        };
        let applied: Applied = self.run_transition(
            "reject",
            minutes_id,
            command,
            actor.to_audit_actor(),
            cause,
            |_, _| Ok(()),
        )?;

        let response: MinutesResponse = MinutesResponse::from_document(applied.document);
        self.publish(&MinutesEvent::Rejected {
            minutes_id,
            meeting_id: response.minutes.meeting_id,
            rejected_by: actor.user_id,
            reason: response.minutes.rejection_reason.clone(),
        });
        Ok(response)
    }

    /// Moves minutes between the editorial states `draft`, `pending_review`
    /// and `pending_approval`.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor is not authorized, the minutes do not
    /// exist, the status is unknown, or the transition is not allowed.
    pub fn advance_status(
        &mut self,
        minutes_id: MinutesId,
        actor_id: &str,
        request: &AdvanceStatusRequest,
        cause: Cause,
    ) -> Result<MinutesResponse, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(actor_id)?;
        AuthorizationService::authorize_advance_status(&actor)?;

        let target: MinutesStatus =
            MinutesStatus::from_str(&request.target_status).map_err(translate_domain_error)?;
        let command: Command = Command::AdvanceStatus { target };
        let applied: Applied = self.run_transition(
            "advance_status",
            minutes_id,
            command,
            actor.to_audit_actor(),
            cause,
            |_, _| Ok(()),
        )?;

        Ok(MinutesResponse::from_document(applied.document))
    }

    /// Closes voting on every open document whose deadline has passed.
    ///
    /// Failures are logged and reported per document; the sweep carries on.
    ///
    /// # Errors
    ///
    /// Returns an error if the open documents cannot be listed.
    pub fn close_expired_voting(&mut self) -> Result<SweepResponse, ApiError> {
        let now: OffsetDateTime = self.collaborators.clock.now();
        let open: Vec<MinutesDocument> = self
            .repository
            .list_open()
            .map_err(translate_persistence_error)?;

        let mut response: SweepResponse = SweepResponse::default();
        for document in open {
            let Some(minutes_id) = document.minutes_id else {
                continue;
            };
            if !document.is_past_deadline(now) {
                continue;
            }

            match self.evaluate(minutes_id, "close_expired_voting") {
                Ok((evaluated, _)) if evaluated.is_voting_closed => response.closed.push(minutes_id),
                Ok(_) => {}
                Err(err) => {
                    error!(
                        minutes_id = minutes_id.value(),
                        error = %err,
                        "Failed to close expired voting"
                    );
                    response.failed.push(minutes_id);
                }
            }
        }

        if !response.closed.is_empty() {
            info!(closed = response.closed.len(), "Expiry sweep closed voting");
        }
        Ok(response)
    }

    // ========================================================================
    // Reads
    // ========================================================================

    /// Loads minutes with freshly computed metadata, closing voting first if
    /// the deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns an error if the minutes do not exist.
    pub fn get_minutes(&mut self, minutes_id: MinutesId) -> Result<MinutesResponse, ApiError> {
        let (document, _): (MinutesDocument, OffsetDateTime) =
            self.evaluate(minutes_id, "get_minutes")?;
        Ok(MinutesResponse::from_document(document))
    }

    /// Lists every round of a meeting, oldest first, each evaluated for expiry.
    ///
    /// # Errors
    ///
    /// Returns an error if the meeting is unknown and has no recorded rounds.
    pub fn list_minutes(&mut self, meeting_id: MeetingId) -> Result<ListMinutesResponse, ApiError> {
        let (rounds, _): (Vec<MinutesDocument>, OffsetDateTime) =
            self.current_rounds(meeting_id, "list_minutes")?;

        if rounds.is_empty()
            && self
                .collaborators
                .directory
                .attendees_and_organizer(meeting_id)
                .is_none()
        {
            return Err(translate_domain_error(DomainError::MeetingNotFound(
                meeting_id,
            )));
        }

        Ok(ListMinutesResponse {
            meeting_id,
            minutes: rounds
                .into_iter()
                .map(MinutesResponse::from_document)
                .collect(),
        })
    }

    /// Returns the audit trail of a document, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the minutes do not exist.
    pub fn audit_trail(&mut self, minutes_id: MinutesId) -> Result<AuditTrailResponse, ApiError> {
        self.repository
            .load(minutes_id)
            .map_err(translate_persistence_error)?;
        let events: Vec<AuditEvent> = self
            .repository
            .audit_events(minutes_id)
            .map_err(translate_persistence_error)?;

        Ok(AuditTrailResponse {
            minutes_id,
            events: events.into_iter().map(AuditEventInfo::from).collect(),
        })
    }

    /// Computes what an actor may currently do with a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor id is empty or the minutes do not exist.
    pub fn capabilities(
        &mut self,
        minutes_id: MinutesId,
        actor_id: &str,
    ) -> Result<MinutesCapabilities, ApiError> {
        let actor: AuthenticatedActor = self.resolve_actor(actor_id)?;
        let (document, evaluated_at): (MinutesDocument, OffsetDateTime) =
            self.evaluate(minutes_id, "capabilities")?;
        let attendees: Option<BTreeSet<UserId>> = self
            .collaborators
            .directory
            .attendees_and_organizer(document.meeting_id);

        Ok(compute_minutes_capabilities(
            minutes_id,
            &document,
            &actor,
            attendees.as_ref(),
            evaluated_at,
        ))
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn attempts(&self) -> u32 {
        self.config.max_write_attempts.max(1)
    }

    fn retry_exhausted(&self, operation: &str) -> ApiError {
        warn!(
            operation,
            attempts = self.attempts(),
            "Giving up after repeated version conflicts"
        );
        ApiError::RetryExhausted {
            operation: operation.to_string(),
            attempts: self.attempts(),
        }
    }

    fn resolve_actor(&self, actor_id: &str) -> Result<AuthenticatedActor, ApiError> {
        let user_id: UserId = UserId::new(actor_id);
        if user_id.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("actor_id"),
                message: String::from("Actor ID cannot be empty"),
            });
        }
        let role: Role = self
            .collaborators
            .roles
            .role(&user_id)
            .unwrap_or(Role::Member);
        Ok(AuthenticatedActor::new(user_id, role))
    }

    /// Loads, expires and applies `command`, saving conditionally. Repeats from
    /// a fresh read whenever another writer saved first.
    #[allow(clippy::needless_pass_by_value)]
    fn run_transition<F>(
        &mut self,
        operation: &'static str,
        minutes_id: MinutesId,
        command: Command,
        actor: Actor,
        cause: Cause,
        precheck: F,
    ) -> Result<Applied, ApiError>
    where
        F: Fn(&MinutesDocument, OffsetDateTime) -> Result<(), ApiError>,
    {
        for attempt in 1..=self.attempts() {
            let loaded: MinutesDocument = self
                .repository
                .load(minutes_id)
                .map_err(translate_persistence_error)?;
            let now: OffsetDateTime = self.collaborators.clock.now();
            let Some(current) = self.expire_if_due(loaded, now)? else {
                continue;
            };

            precheck(&current, now)?;

            let result: TransitionResult =
                apply(&current, command.clone(), actor.clone(), cause.clone(), now)
                    .map_err(translate_core_error)?;
            let Some(event) = result.audit_event else {
                return Ok(Applied {
                    document: current,
                    vote_change: None,
                    changed: false,
                });
            };

            if let Some(stored) =
                self.save_or_conflict(operation, &result.new_document, current.version, &event)?
            {
                info!(
                    operation,
                    minutes_id = minutes_id.value(),
                    actor = %actor.id,
                    version = stored.version,
                    attempt,
                    "Minutes transition committed"
                );
                return Ok(Applied {
                    document: stored,
                    vote_change: result.vote_change,
                    changed: true,
                });
            }
        }

        Err(self.retry_exhausted(operation))
    }

    /// Loads a document and persists its deadline expiry if due, returning it
    /// with the evaluation time.
    fn evaluate(
        &mut self,
        minutes_id: MinutesId,
        operation: &'static str,
    ) -> Result<(MinutesDocument, OffsetDateTime), ApiError> {
        for _ in 0..self.attempts() {
            let loaded: MinutesDocument = self
                .repository
                .load(minutes_id)
                .map_err(translate_persistence_error)?;
            let now: OffsetDateTime = self.collaborators.clock.now();
            if let Some(current) = self.expire_if_due(loaded, now)? {
                return Ok((current, now));
            }
        }

        Err(self.retry_exhausted(operation))
    }

    /// Loads every round of a meeting, persisting any due deadline expiry,
    /// and returns them with the evaluation time.
    fn current_rounds(
        &mut self,
        meeting_id: MeetingId,
        operation: &'static str,
    ) -> Result<(Vec<MinutesDocument>, OffsetDateTime), ApiError> {
        'attempt: for _ in 0..self.attempts() {
            let now: OffsetDateTime = self.collaborators.clock.now();
            let rounds: Vec<MinutesDocument> = self
                .repository
                .list_for_meeting(meeting_id)
                .map_err(translate_persistence_error)?;

            let mut evaluated: Vec<MinutesDocument> = Vec::with_capacity(rounds.len());
            for round in rounds {
                match self.expire_if_due(round, now)? {
                    Some(current) => evaluated.push(current),
                    None => continue 'attempt,
                }
            }
            return Ok((evaluated, now));
        }

        Err(self.retry_exhausted(operation))
    }

    /// Closes voting if the deadline has passed and persists the closure.
    ///
    /// Returns the document to continue with, or `Ok(None)` if another writer
    /// saved first and the caller must reload.
    fn expire_if_due(
        &mut self,
        document: MinutesDocument,
        now: OffsetDateTime,
    ) -> Result<Option<MinutesDocument>, ApiError> {
        if document.is_voting_closed || !document.is_past_deadline(now) {
            return Ok(Some(document));
        }

        let minutes_id: MinutesId = document.minutes_id.ok_or_else(|| ApiError::Internal {
            message: String::from("Stored minutes have no identifier"),
        })?;
        let cause: Cause = Cause::new(
            String::from("vote-deadline"),
            format!("Vote deadline {} passed", document.vote_deadline),
        );
        let result: TransitionResult = apply(
            &document,
            Command::CloseVoting {
                trigger: CloseTrigger::Deadline,
            },
            Actor::system(),
            cause,
            now,
        )
        .map_err(translate_core_error)?;

        let Some(event) = result.audit_event else {
            return Ok(Some(document));
        };
        let Some(stored) =
            self.save_or_conflict("expire_voting", &result.new_document, document.version, &event)?
        else {
            return Ok(None);
        };

        info!(
            minutes_id = minutes_id.value(),
            deadline = %stored.vote_deadline,
            "Voting closed by deadline"
        );
        let metadata: MinutesMetadata =
            MinutesAggregator::compute_metadata(&stored.votes, stored.required_vote_count());
        self.publish(&MinutesEvent::VotingClosed {
            minutes_id,
            meeting_id: stored.meeting_id,
            trigger: CloseTrigger::Deadline,
            metadata,
        });
        Ok(Some(stored))
    }

    fn save_or_conflict(
        &mut self,
        operation: &str,
        document: &MinutesDocument,
        expected_version: i64,
        event: &AuditEvent,
    ) -> Result<Option<MinutesDocument>, ApiError> {
        match self.repository.save(document, expected_version, event) {
            Ok(stored) => Ok(Some(stored)),
            Err(PersistenceError::VersionConflict {
                minutes_id,
                expected_version,
            }) => {
                warn!(
                    operation,
                    minutes_id, expected_version, "Concurrent write detected, retrying"
                );
                Ok(None)
            }
            Err(err) => Err(translate_persistence_error(err)),
        }
    }

    fn publish(&self, event: &MinutesEvent) {
        if let Err(err) = self.collaborators.notifications.publish(event) {
            warn!(
                event = event.name(),
                minutes_id = event.minutes_id().value(),
                error = %err,
                "Failed to publish notification"
            );
        }
    }
}
