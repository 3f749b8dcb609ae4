// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Ballots cast on a minutes document.

use crate::error::DomainError;
use crate::types::UserId;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::OffsetDateTime;

/// The position a voter takes on a minutes document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteType {
    /// The voter agrees with the minutes as written.
    Agree,
    /// The voter agrees but attaches remarks.
    AgreeWithComments,
    /// The voter disagrees with the minutes.
    Disagree,
}

impl VoteType {
    /// Returns the string representation of the vote type.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Agree => "agree",
            Self::AgreeWithComments => "agree_with_comments",
            Self::Disagree => "disagree",
        }
    }

    /// Parses a vote type from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidVoteType` if the string is not a valid vote type.
    pub fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "agree" => Ok(Self::Agree),
            "agree_with_comments" => Ok(Self::AgreeWithComments),
            "disagree" => Ok(Self::Disagree),
            _ => Err(DomainError::InvalidVoteType(s.to_string())),
        }
    }
}

impl FromStr for VoteType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for VoteType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One user's ballot on one minutes document.
///
/// At most one record exists per voter; casting again overwrites the
/// existing record and refreshes `voted_at`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter_id: UserId,
    pub vote_type: VoteType,
    pub comment: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub voted_at: OffsetDateTime,
}

impl VoteRecord {
    /// Creates a new vote record.
    ///
    /// Blank comments are normalized to `None`.
    #[must_use]
    pub fn new(
        voter_id: UserId,
        vote_type: VoteType,
        comment: Option<String>,
        voted_at: OffsetDateTime,
    ) -> Self {
        Self {
            voter_id,
            vote_type,
            comment: normalize_comment(comment),
            voted_at,
        }
    }

    /// Overwrites this ballot in place.
    pub fn overwrite(
        &mut self,
        vote_type: VoteType,
        comment: Option<String>,
        voted_at: OffsetDateTime,
    ) {
        self.vote_type = vote_type;
        self.comment = normalize_comment(comment);
        self.voted_at = voted_at;
    }
}

fn normalize_comment(comment: Option<String>) -> Option<String> {
    comment
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}
