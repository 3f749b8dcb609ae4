// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::decision::Decision;
use crate::error::DomainError;
use time::{OffsetDateTime, UtcOffset};

pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 200;
pub const CONTENT_MIN_CHARS: usize = 10;
pub const CONTENT_MAX_CHARS: usize = 10_000;
pub const COMMENT_MAX_CHARS: usize = 1_000;
pub const REJECTION_REASON_MAX_CHARS: usize = 1_000;
pub const DECISION_TITLE_MAX_CHARS: usize = 200;
pub const DECISION_DESCRIPTION_MAX_CHARS: usize = 2_000;

fn char_len(value: &str) -> usize {
    value.trim().chars().count()
}

/// Validates a minutes title.
///
/// # Errors
///
/// Returns `DomainError::InvalidTitle` unless the trimmed title is 3 to 200 characters.
pub fn validate_title(title: &str) -> Result<(), DomainError> {
    let len: usize = char_len(title);
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&len) {
        return Err(DomainError::InvalidTitle(format!(
            "Title must be between {TITLE_MIN_CHARS} and {TITLE_MAX_CHARS} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validates minutes content.
///
/// # Errors
///
/// Returns `DomainError::InvalidContent` unless the trimmed content is 10 to 10,000 characters.
pub fn validate_content(content: &str) -> Result<(), DomainError> {
    let len: usize = char_len(content);
    if !(CONTENT_MIN_CHARS..=CONTENT_MAX_CHARS).contains(&len) {
        return Err(DomainError::InvalidContent(format!(
            "Content must be between {CONTENT_MIN_CHARS} and {CONTENT_MAX_CHARS} characters, got {len}"
        )));
    }
    Ok(())
}

/// Validates an optional vote comment.
///
/// # Errors
///
/// Returns `DomainError::InvalidComment` if the comment exceeds 1,000 characters.
pub fn validate_comment(comment: Option<&str>) -> Result<(), DomainError> {
    if let Some(comment) = comment {
        let len: usize = char_len(comment);
        if len > COMMENT_MAX_CHARS {
            return Err(DomainError::InvalidComment(format!(
                "Comment must be at most {COMMENT_MAX_CHARS} characters, got {len}"
            )));
        }
    }
    Ok(())
}

/// Validates an optional rejection reason.
///
/// # Errors
///
/// Returns `DomainError::InvalidRejectionReason` if the reason exceeds 1,000 characters.
pub fn validate_rejection_reason(reason: Option<&str>) -> Result<(), DomainError> {
    if let Some(reason) = reason {
        let len: usize = char_len(reason);
        if len > REJECTION_REASON_MAX_CHARS {
            return Err(DomainError::InvalidRejectionReason(format!(
                "Reason must be at most {REJECTION_REASON_MAX_CHARS} characters, got {len}"
            )));
        }
    }
    Ok(())
}

/// Validates the ordered decision list.
///
/// # Errors
///
/// Returns `DomainError::InvalidDecision` for the first decision with an
/// empty or over-long title, or an over-long description.
pub fn validate_decisions(decisions: &[Decision]) -> Result<(), DomainError> {
    for (index, decision) in decisions.iter().enumerate() {
        let title_len: usize = char_len(&decision.title);
        if title_len == 0 || title_len > DECISION_TITLE_MAX_CHARS {
            return Err(DomainError::InvalidDecision {
                index,
                reason: format!(
                    "Title must be between 1 and {DECISION_TITLE_MAX_CHARS} characters, got {title_len}"
                ),
            });
        }

        if let Some(description) = &decision.description {
            let description_len: usize = char_len(description);
            if description_len > DECISION_DESCRIPTION_MAX_CHARS {
                return Err(DomainError::InvalidDecision {
                    index,
                    reason: format!(
                        "Description must be at most {DECISION_DESCRIPTION_MAX_CHARS} characters, got {description_len}"
                    ),
                });
            }
        }
    }
    Ok(())
}

/// Validates an explicit vote deadline against the creation time.
///
/// # Errors
///
/// Returns `DomainError::InvalidVoteDeadline` if the deadline is not after `now`
/// or has no UTC equivalent within the supported date range.
pub fn validate_vote_deadline(
    deadline: OffsetDateTime,
    now: OffsetDateTime,
) -> Result<(), DomainError> {
    if deadline.checked_to_offset(UtcOffset::UTC).is_none() {
        return Err(DomainError::InvalidVoteDeadline {
            reason: format!("Deadline {deadline} is outside the supported date range"),
        });
    }
    if deadline <= now {
        return Err(DomainError::InvalidVoteDeadline {
            reason: format!("Deadline {deadline} must be after creation time {now}"),
        });
    }
    Ok(())
}
