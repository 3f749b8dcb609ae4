// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minutes insert and conditional save.
//!
//! Every write runs in an immediate transaction together with the audit
//! event describing it, so a document change is never stored without its
//! event and vice versa.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use minutes_vote_audit::AuditEvent;
use minutes_vote_domain::{Decision, MinutesDocument, MinutesId, UserId, VoteRecord};
use tracing::{debug, info};

use crate::connection::get_last_insert_rowid;
use crate::data_models::{format_date, format_optional_timestamp, format_timestamp};
use crate::diesel_schema::{minutes, minutes_decisions, minutes_eligible_voters, minutes_votes};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;

/// Inserts a new minutes document with its roster, decisions and creation event.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `document` - The unsaved document (its `minutes_id` is ignored)
/// * `creation_event` - The audit event for the creation
///
/// # Returns
///
/// The stored document with its assigned `minutes_id`.
///
/// # Errors
///
/// Returns `PersistenceError::OpenRoundExists` if the meeting already has an
/// open round, or another error if the write fails.
pub fn insert_minutes(
    conn: &mut SqliteConnection,
    document: &MinutesDocument,
    creation_event: &AuditEvent,
) -> Result<MinutesDocument, PersistenceError> {
    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let inserted = diesel::insert_into(minutes::table)
            .values((
                minutes::meeting_id.eq(document.meeting_id.value()),
                minutes::title.eq(&document.title),
                minutes::content.eq(&document.content),
                minutes::status.eq(document.status.as_str()),
                minutes::secretary_id.eq(document.secretary_id.value()),
                minutes::vote_deadline.eq(format_timestamp(document.vote_deadline)?),
                minutes::is_voting_closed.eq(i32::from(document.is_voting_closed)),
                minutes::approved_by.eq(document.approved_by.as_ref().map(UserId::value)),
                minutes::approved_at.eq(format_optional_timestamp(document.approved_at)?),
                minutes::rejected_by.eq(document.rejected_by.as_ref().map(UserId::value)),
                minutes::rejected_at.eq(format_optional_timestamp(document.rejected_at)?),
                minutes::rejection_reason.eq(document.rejection_reason.as_deref()),
                minutes::created_at.eq(format_timestamp(document.created_at)?),
                minutes::version.eq(document.version),
            ))
            .execute(conn);

        match inserted {
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                return Err(PersistenceError::OpenRoundExists {
                    meeting_id: document.meeting_id.value(),
                });
            }
            other => {
                other?;
            }
        }

        let minutes_id: i64 = get_last_insert_rowid(conn)?;

        for voter_id in &document.eligible_voters {
            diesel::insert_into(minutes_eligible_voters::table)
                .values((
                    minutes_eligible_voters::minutes_id.eq(minutes_id),
                    minutes_eligible_voters::voter_id.eq(voter_id.value()),
                ))
                .execute(conn)?;
        }

        insert_decisions(conn, minutes_id, &document.decisions)?;
        insert_votes(conn, minutes_id, &document.votes)?;

        let event: AuditEvent = creation_event
            .clone()
            .for_minutes(MinutesId::new(minutes_id));
        persist_audit_event(conn, &event)?;

        info!(
            minutes_id,
            meeting_id = document.meeting_id.value(),
            eligible_voters = document.eligible_voters.len(),
            "Inserted minutes"
        );

        let mut stored: MinutesDocument = document.clone();
        stored.minutes_id = Some(MinutesId::new(minutes_id));
        Ok(stored)
    })
}

/// Saves a changed document if nobody else has saved it since it was read.
///
/// The minutes row is updated only where `version = expected_version`, and
/// the version is bumped. Ballots and decisions are rewritten in order. The
/// voter roster is fixed at creation and never rewritten.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `document` - The changed document
/// * `expected_version` - The version the caller read
/// * `audit_event` - The audit event describing the change
///
/// # Returns
///
/// The stored document carrying its new version.
///
/// # Errors
///
/// Returns `PersistenceError::VersionConflict` if the stored version differs,
/// `PersistenceError::MinutesNotFound` if the document does not exist, or
/// another error if the write fails. Nothing is written on error.
pub fn save_minutes(
    conn: &mut SqliteConnection,
    document: &MinutesDocument,
    expected_version: i64,
    audit_event: &AuditEvent,
) -> Result<MinutesDocument, PersistenceError> {
    let minutes_id: i64 = document
        .minutes_id
        .map(|id| id.value())
        .ok_or_else(|| PersistenceError::NotFound(String::from("Minutes document was never inserted")))?;
    let new_version: i64 = expected_version + 1;

    conn.immediate_transaction::<_, PersistenceError, _>(|conn| {
        let updated: usize = diesel::update(minutes::table)
            .filter(minutes::minutes_id.eq(minutes_id))
            .filter(minutes::version.eq(expected_version))
            .set((
                minutes::title.eq(&document.title),
                minutes::content.eq(&document.content),
                minutes::status.eq(document.status.as_str()),
                minutes::vote_deadline.eq(format_timestamp(document.vote_deadline)?),
                minutes::is_voting_closed.eq(i32::from(document.is_voting_closed)),
                minutes::approved_by.eq(document.approved_by.as_ref().map(UserId::value)),
                minutes::approved_at.eq(format_optional_timestamp(document.approved_at)?),
                minutes::rejected_by.eq(document.rejected_by.as_ref().map(UserId::value)),
                minutes::rejected_at.eq(format_optional_timestamp(document.rejected_at)?),
                minutes::rejection_reason.eq(document.rejection_reason.as_deref()),
                minutes::version.eq(new_version),
            ))
            .execute(conn)?;

        if updated == 0 {
            let exists: i64 = minutes::table
                .filter(minutes::minutes_id.eq(minutes_id))
                .count()
                .get_result(conn)?;
            if exists == 0 {
                return Err(PersistenceError::MinutesNotFound(minutes_id));
            }
            debug!(minutes_id, expected_version, "Conditional save lost the race");
            return Err(PersistenceError::VersionConflict {
                minutes_id,
                expected_version,
            });
        }

        diesel::delete(minutes_votes::table.filter(minutes_votes::minutes_id.eq(minutes_id)))
            .execute(conn)?;
        insert_votes(conn, minutes_id, &document.votes)?;

        diesel::delete(
            minutes_decisions::table.filter(minutes_decisions::minutes_id.eq(minutes_id)),
        )
        .execute(conn)?;
        insert_decisions(conn, minutes_id, &document.decisions)?;

        let event_id: i64 = persist_audit_event(conn, audit_event)?;

        info!(
            minutes_id,
            version = new_version,
            event_id,
            status = document.status.as_str(),
            voting_closed = document.is_voting_closed,
            votes = document.votes.len(),
            "Saved minutes"
        );

        let mut stored: MinutesDocument = document.clone();
        stored.version = new_version;
        Ok(stored)
    })
}

fn insert_votes(
    conn: &mut SqliteConnection,
    minutes_id: i64,
    votes: &[VoteRecord],
) -> Result<(), PersistenceError> {
    for vote in votes {
        diesel::insert_into(minutes_votes::table)
            .values((
                minutes_votes::minutes_id.eq(minutes_id),
                minutes_votes::voter_id.eq(vote.voter_id.value()),
                minutes_votes::vote_type.eq(vote.vote_type.as_str()),
                minutes_votes::comment.eq(vote.comment.as_deref()),
                minutes_votes::voted_at.eq(format_timestamp(vote.voted_at)?),
            ))
            .execute(conn)?;
    }
    Ok(())
}

fn insert_decisions(
    conn: &mut SqliteConnection,
    minutes_id: i64,
    decisions: &[Decision],
) -> Result<(), PersistenceError> {
    for (index, decision) in decisions.iter().enumerate() {
        let position: i32 = i32::try_from(index).map_err(|_| {
            PersistenceError::SerializationError(format!("Decision position {index} out of range"))
        })?;
        let deadline: Option<String> = decision.deadline.map(format_date).transpose()?;

        diesel::insert_into(minutes_decisions::table)
            .values((
                minutes_decisions::minutes_id.eq(minutes_id),
                minutes_decisions::position.eq(position),
                minutes_decisions::title.eq(&decision.title),
                minutes_decisions::description.eq(decision.description.as_deref()),
                minutes_decisions::responsible_user_id
                    .eq(decision.responsible_user_id.as_ref().map(UserId::value)),
                minutes_decisions::deadline.eq(deadline),
                minutes_decisions::status.eq(decision.status.as_str()),
            ))
            .execute(conn)?;
    }
    Ok(())
}
