// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! File-backed meeting directory and role provider.
//!
//! The roster is a JSON document loaded once at startup:
//!
//! ```json
//! {
//!   "users": [{ "id": "sec", "role": "secretary" }],
//!   "meetings": [{ "id": 1, "organizer": "sec", "attendees": ["alice", "bob"] }]
//! }
//! ```
//!
//! Users that are not listed resolve to no role, which the service treats
//! as a plain member.

use minutes_vote_api::{MeetingDirectory, Role, RoleProvider};
use minutes_vote_domain::{MeetingId, UserId};
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors raised while loading a roster file.
#[derive(Debug, Error)]
pub enum RosterError {
    #[error("failed to read roster file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid roster JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("meeting {0} is listed more than once")]
    DuplicateMeeting(MeetingId),
    #[error("user '{0}' is listed more than once")]
    DuplicateUser(UserId),
    #[error("roster contains an empty user id")]
    EmptyUserId,
}

#[derive(Debug, Deserialize)]
struct RosterFile {
    #[serde(default)]
    users: Vec<RosterUser>,
    #[serde(default)]
    meetings: Vec<RosterMeeting>,
}

#[derive(Debug, Deserialize)]
struct RosterUser {
    id: String,
    role: Role,
}

#[derive(Debug, Deserialize)]
struct RosterMeeting {
    id: MeetingId,
    organizer: String,
    #[serde(default)]
    attendees: Vec<String>,
}

/// In-memory roster of users and meetings.
#[derive(Debug, Default)]
pub struct Roster {
    roles: HashMap<UserId, Role>,
    meetings: HashMap<MeetingId, BTreeSet<UserId>>,
}

impl Roster {
    /// Loads and validates a roster file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// lists a user or meeting twice.
    pub fn from_file(path: &Path) -> Result<Self, RosterError> {
        let raw: String = std::fs::read_to_string(path).map_err(|source| RosterError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let roster: Self = Self::from_json(&raw)?;
        info!(
            path = %path.display(),
            users = roster.roles.len(),
            meetings = roster.meetings.len(),
            "Loaded roster"
        );
        Ok(roster)
    }

    /// Parses a roster from its JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a valid roster.
    pub fn from_json(raw: &str) -> Result<Self, RosterError> {
        let file: RosterFile = serde_json::from_str(raw)?;

        let mut roles: HashMap<UserId, Role> = HashMap::new();
        for user in file.users {
            let id: UserId = non_empty_user(&user.id)?;
            if roles.insert(id.clone(), user.role).is_some() {
                return Err(RosterError::DuplicateUser(id));
            }
        }

        let mut meetings: HashMap<MeetingId, BTreeSet<UserId>> = HashMap::new();
        for meeting in file.meetings {
            let mut participants: BTreeSet<UserId> = meeting
                .attendees
                .iter()
                .map(|attendee| non_empty_user(attendee))
                .collect::<Result<_, _>>()?;
            participants.insert(non_empty_user(&meeting.organizer)?);
            if meetings.insert(meeting.id, participants).is_some() {
                return Err(RosterError::DuplicateMeeting(meeting.id));
            }
        }

        Ok(Self { roles, meetings })
    }
}

fn non_empty_user(raw: &str) -> Result<UserId, RosterError> {
    let id: UserId = UserId::new(raw);
    if id.is_empty() {
        return Err(RosterError::EmptyUserId);
    }
    Ok(id)
}

impl MeetingDirectory for Roster {
    fn attendees_and_organizer(&self, meeting_id: MeetingId) -> Option<BTreeSet<UserId>> {
        self.meetings.get(&meeting_id).cloned()
    }
}

impl RoleProvider for Roster {
    fn role(&self, user_id: &UserId) -> Option<Role> {
        self.roles.get(user_id).copied()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    const ROSTER: &str = r#"{
        "users": [
            { "id": "sec", "role": "secretary" },
            { "id": "boss", "role": "admin" }
        ],
        "meetings": [
            { "id": 1, "organizer": "boss", "attendees": ["alice", "bob"] },
            { "id": 2, "organizer": "sec" }
        ]
    }"#;

    #[test]
    fn test_organizer_counts_as_participant() {
        let roster: Roster = Roster::from_json(ROSTER).unwrap();

        let participants = roster.attendees_and_organizer(MeetingId::new(1)).unwrap();

        let ids: Vec<&str> = participants.iter().map(UserId::value).collect();
        assert_eq!(ids, vec!["alice", "bob", "boss"]);
        assert_eq!(
            roster.attendees_and_organizer(MeetingId::new(2)).unwrap().len(),
            1
        );
    }

    #[test]
    fn test_unknown_meeting() {
        let roster: Roster = Roster::from_json(ROSTER).unwrap();

        assert!(roster.attendees_and_organizer(MeetingId::new(3)).is_none());
    }

    #[test]
    fn test_roles() {
        let roster: Roster = Roster::from_json(ROSTER).unwrap();

        assert_eq!(roster.role(&UserId::new("sec")), Some(Role::Secretary));
        assert_eq!(roster.role(&UserId::new("alice")), None);
    }

    #[test]
    fn test_duplicate_meeting_is_rejected() {
        let raw: &str = r#"{ "meetings": [
            { "id": 1, "organizer": "a" },
            { "id": 1, "organizer": "b" }
        ] }"#;

        assert!(matches!(
            Roster::from_json(raw),
            Err(RosterError::DuplicateMeeting(id)) if id == MeetingId::new(1)
        ));
    }

    #[test]
    fn test_unknown_role_is_a_parse_error() {
        let raw: &str = r#"{ "users": [{ "id": "x", "role": "chair" }] }"#;

        assert!(matches!(Roster::from_json(raw), Err(RosterError::Parse(_))));
    }

    #[test]
    fn test_blank_user_is_rejected() {
        let raw: &str = r#"{ "users": [{ "id": "  ", "role": "member" }] }"#;

        assert!(matches!(Roster::from_json(raw), Err(RosterError::EmptyUserId)));
    }

    #[test]
    fn test_missing_file() {
        let result = Roster::from_file(Path::new("/nonexistent/roster.json"));

        assert!(matches!(result, Err(RosterError::Io { .. })));
    }
}
