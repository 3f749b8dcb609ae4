// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Minutes document queries.
//!
//! A document is assembled from its `minutes` row plus the roster, ballots
//! (in first-cast order) and decisions (in recorded order). Each load reads
//! the row and its children inside one transaction so a concurrent save
//! cannot be observed half applied.

use diesel::SqliteConnection;
use diesel::prelude::*;
use minutes_vote_domain::{
    Decision, DecisionStatus, MeetingId, MinutesDocument, MinutesId, MinutesStatus, UserId,
    VoteRecord, VoteType,
};
use std::collections::BTreeSet;
use std::str::FromStr;
use tracing::debug;

use crate::data_models::{parse_date, parse_optional_timestamp, parse_timestamp};
use crate::diesel_schema::{minutes, minutes_decisions, minutes_eligible_voters, minutes_votes};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = minutes)]
struct MinutesRow {
    minutes_id: i64,
    meeting_id: i64,
    title: String,
    content: String,
    status: String,
    secretary_id: String,
    vote_deadline: String,
    is_voting_closed: i32,
    approved_by: Option<String>,
    approved_at: Option<String>,
    rejected_by: Option<String>,
    rejected_at: Option<String>,
    rejection_reason: Option<String>,
    created_at: String,
    version: i64,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = minutes_votes)]
struct VoteRow {
    voter_id: String,
    vote_type: String,
    comment: Option<String>,
    voted_at: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = minutes_decisions)]
struct DecisionRow {
    title: String,
    description: Option<String>,
    responsible_user_id: Option<String>,
    deadline: Option<String>,
    status: String,
}

/// Loads a minutes document by ID.
///
/// # Errors
///
/// Returns `PersistenceError::MinutesNotFound` if no such document exists,
/// or another error if a stored value cannot be reconstructed.
pub fn load_minutes(
    conn: &mut SqliteConnection,
    minutes_id: i64,
) -> Result<MinutesDocument, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let row: MinutesRow = minutes::table
            .filter(minutes::minutes_id.eq(minutes_id))
            .select(MinutesRow::as_select())
            .first::<MinutesRow>(conn)
            .optional()?
            .ok_or(PersistenceError::MinutesNotFound(minutes_id))?;

        assemble(conn, row)
    })
}

/// Lists every round recorded for a meeting, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be reconstructed.
pub fn list_minutes_for_meeting(
    conn: &mut SqliteConnection,
    meeting_id: i64,
) -> Result<Vec<MinutesDocument>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: Vec<MinutesRow> = minutes::table
            .filter(minutes::meeting_id.eq(meeting_id))
            .order(minutes::minutes_id.asc())
            .select(MinutesRow::as_select())
            .load::<MinutesRow>(conn)?;

        debug!(meeting_id, rounds = rows.len(), "Loaded minutes for meeting");
        rows.into_iter().map(|row| assemble(conn, row)).collect()
    })
}

/// Lists documents whose voting flag is still unset and whose status is not terminal.
///
/// Deadlines are not evaluated here; callers compare against their clock.
///
/// # Errors
///
/// Returns an error if the query fails or a stored value cannot be reconstructed.
pub fn list_open_minutes(
    conn: &mut SqliteConnection,
) -> Result<Vec<MinutesDocument>, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let rows: Vec<MinutesRow> = minutes::table
            .filter(minutes::is_voting_closed.eq(0))
            .filter(
                minutes::status.ne_all(vec![
                    MinutesStatus::Approved.as_str(),
                    MinutesStatus::Rejected.as_str(),
                ]),
            )
            .order(minutes::minutes_id.asc())
            .select(MinutesRow::as_select())
            .load::<MinutesRow>(conn)?;

        rows.into_iter().map(|row| assemble(conn, row)).collect()
    })
}

fn assemble(
    conn: &mut SqliteConnection,
    row: MinutesRow,
) -> Result<MinutesDocument, PersistenceError> {
    let eligible_voters: BTreeSet<UserId> = minutes_eligible_voters::table
        .filter(minutes_eligible_voters::minutes_id.eq(row.minutes_id))
        .select(minutes_eligible_voters::voter_id)
        .load::<String>(conn)?
        .into_iter()
        .map(|voter_id| UserId::new(&voter_id))
        .collect();

    let votes: Vec<VoteRecord> = minutes_votes::table
        .filter(minutes_votes::minutes_id.eq(row.minutes_id))
        .order(minutes_votes::vote_id.asc())
        .select(VoteRow::as_select())
        .load::<VoteRow>(conn)?
        .into_iter()
        .map(|vote| {
            Ok(VoteRecord {
                voter_id: UserId::new(&vote.voter_id),
                vote_type: VoteType::parse_str(&vote.vote_type)
                    .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
                comment: vote.comment,
                voted_at: parse_timestamp(&vote.voted_at)?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    let decisions: Vec<Decision> = minutes_decisions::table
        .filter(minutes_decisions::minutes_id.eq(row.minutes_id))
        .order(minutes_decisions::position.asc())
        .select(DecisionRow::as_select())
        .load::<DecisionRow>(conn)?
        .into_iter()
        .map(|decision| {
            Ok(Decision {
                title: decision.title,
                description: decision.description,
                responsible_user_id: decision.responsible_user_id.as_deref().map(UserId::new),
                deadline: decision.deadline.as_deref().map(parse_date).transpose()?,
                status: DecisionStatus::from_str(&decision.status)
                    .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
            })
        })
        .collect::<Result<_, PersistenceError>>()?;

    Ok(MinutesDocument {
        minutes_id: Some(MinutesId::new(row.minutes_id)),
        meeting_id: MeetingId::new(row.meeting_id),
        title: row.title,
        content: row.content,
        status: MinutesStatus::from_str(&row.status)
            .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
        secretary_id: UserId::new(&row.secretary_id),
        vote_deadline: parse_timestamp(&row.vote_deadline)?,
        is_voting_closed: row.is_voting_closed != 0,
        decisions,
        votes,
        approved_by: row.approved_by.as_deref().map(UserId::new),
        approved_at: parse_optional_timestamp(row.approved_at.as_deref())?,
        rejected_by: row.rejected_by.as_deref().map(UserId::new),
        rejected_at: parse_optional_timestamp(row.rejected_at.as_deref())?,
        rejection_reason: row.rejection_reason,
        eligible_voters,
        created_at: parse_timestamp(&row.created_at)?,
        version: row.version,
    })
}
