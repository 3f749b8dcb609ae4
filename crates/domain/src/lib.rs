// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod decision;
mod error;
mod lifecycle;
mod metadata;
mod minutes;
mod types;
mod validation;
mod vote;

#[cfg(test)]
mod tests;

pub use lifecycle::{CloseOutcome, CloseTrigger, MinutesStateMachine};
pub use metadata::{MinutesAggregator, MinutesMetadata};

// Re-export public types
pub use decision::{Decision, DecisionStatus};
pub use error::DomainError;
pub use minutes::{MinutesDocument, MinutesStatus, VoteChange};
pub use types::{MeetingId, MinutesId, UserId};
pub use validation::{
    COMMENT_MAX_CHARS, CONTENT_MAX_CHARS, CONTENT_MIN_CHARS, DECISION_DESCRIPTION_MAX_CHARS,
    DECISION_TITLE_MAX_CHARS, REJECTION_REASON_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
    validate_comment, validate_content, validate_decisions, validate_rejection_reason,
    validate_title, validate_vote_deadline,
};
pub use vote::{VoteRecord, VoteType};
