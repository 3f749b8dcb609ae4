// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::tests::helpers::{create_test_actor, create_test_cause, create_test_document};
use crate::{Command, CoreError, TransitionResult, apply};
use minutes_vote_domain::{
    CloseTrigger, DomainError, MinutesDocument, MinutesId, MinutesStatus, UserId,
};
use time::OffsetDateTime;
use time::macros::datetime;

const DURING_VOTING: OffsetDateTime = datetime!(2026-03-02 12:00 UTC);
const AFTER_DEADLINE: OffsetDateTime = datetime!(2026-03-03 12:00 UTC);

fn run(
    document: &MinutesDocument,
    command: Command,
    now: OffsetDateTime,
) -> Result<TransitionResult, CoreError> {
    apply(
        document,
        command,
        create_test_actor(),
        create_test_cause(),
        now,
    )
}

fn closed_document() -> MinutesDocument {
    run(
        &create_test_document(),
        Command::CloseVoting {
            trigger: CloseTrigger::Manual,
        },
        DURING_VOTING,
    )
    .unwrap()
    .new_document
}

#[test]
fn test_manual_close_keeps_status() {
    let result: TransitionResult = run(
        &create_test_document(),
        Command::CloseVoting {
            trigger: CloseTrigger::Manual,
        },
        DURING_VOTING,
    )
    .unwrap();

    assert!(result.new_document.is_voting_closed);
    assert_eq!(result.new_document.status, MinutesStatus::Draft);
    let event = result.audit_event.unwrap();
    assert_eq!(event.action.name, "CloseVoting");
    assert!(event.action.details.unwrap().starts_with("trigger=manual"));
}

#[test]
fn test_closing_closed_document_is_a_no_op() {
    let document: MinutesDocument = closed_document();

    let result: TransitionResult = run(
        &document,
        Command::CloseVoting {
            trigger: CloseTrigger::Manual,
        },
        DURING_VOTING,
    )
    .unwrap();

    assert!(!result.is_change());
    assert_eq!(result.new_document, document);
}

#[test]
fn test_deadline_close_before_deadline_is_a_no_op() {
    let result: TransitionResult = run(
        &create_test_document(),
        Command::CloseVoting {
            trigger: CloseTrigger::Deadline,
        },
        DURING_VOTING,
    )
    .unwrap();

    assert!(!result.is_change());
    assert!(!result.new_document.is_voting_closed);
}

#[test]
fn test_deadline_close_after_deadline_closes() {
    let result: TransitionResult = run(
        &create_test_document(),
        Command::CloseVoting {
            trigger: CloseTrigger::Deadline,
        },
        AFTER_DEADLINE,
    )
    .unwrap();

    assert!(result.new_document.is_voting_closed);
    assert!(
        result
            .audit_event
            .unwrap()
            .action
            .details
            .unwrap()
            .starts_with("trigger=deadline")
    );
}

#[test]
fn test_approve_requires_closed_voting() {
    let result: Result<TransitionResult, CoreError> = run(
        &create_test_document(),
        Command::Approve {
            approver_id: UserId::new("manager"),
        },
        DURING_VOTING,
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::VotingStillOpen {
            minutes_id: Some(MinutesId::new(1)),
        }))
    );
}

#[test]
fn test_approve_after_close() {
    let result: TransitionResult = run(
        &closed_document(),
        Command::Approve {
            approver_id: UserId::new("manager"),
        },
        AFTER_DEADLINE,
    )
    .unwrap();

    assert_eq!(result.new_document.status, MinutesStatus::Approved);
    assert_eq!(
        result.new_document.approved_by,
        Some(UserId::new("manager"))
    );
    assert_eq!(result.new_document.approved_at, Some(AFTER_DEADLINE));
}

#[test]
fn test_reject_after_close_records_reason() {
    let result: TransitionResult = run(
        &closed_document(),
        Command::Reject {
            rejected_by: UserId::new("secretary"),
            reason: Some(String::from("Attendance list incomplete")),
        },
        AFTER_DEADLINE,
    )
    .unwrap();

    assert_eq!(result.new_document.status, MinutesStatus::Rejected);
    assert_eq!(
        result.new_document.rejection_reason.as_deref(),
        Some("Attendance list incomplete")
    );
}

#[test]
fn test_reject_with_overlong_reason_is_rejected() {
    let result: Result<TransitionResult, CoreError> = run(
        &closed_document(),
        Command::Reject {
            rejected_by: UserId::new("secretary"),
            reason: Some("r".repeat(1_001)),
        },
        AFTER_DEADLINE,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidRejectionReason(_)))
    ));
}

#[test]
fn test_approved_minutes_refuse_votes_and_transitions() {
    let approved: MinutesDocument = run(
        &closed_document(),
        Command::Approve {
            approver_id: UserId::new("manager"),
        },
        AFTER_DEADLINE,
    )
    .unwrap()
    .new_document;

    assert!(
        run(
            &approved,
            Command::Reject {
                rejected_by: UserId::new("manager"),
                reason: None,
            },
            AFTER_DEADLINE,
        )
        .is_err()
    );
    assert!(
        run(
            &approved,
            Command::AdvanceStatus {
                target: MinutesStatus::PendingReview,
            },
            AFTER_DEADLINE,
        )
        .is_err()
    );
}

#[test]
fn test_advance_status_records_transition() {
    let result: TransitionResult = run(
        &create_test_document(),
        Command::AdvanceStatus {
            target: MinutesStatus::PendingReview,
        },
        DURING_VOTING,
    )
    .unwrap();

    assert_eq!(result.new_document.status, MinutesStatus::PendingReview);
    assert!(!result.new_document.is_voting_closed);
    assert_eq!(
        result.audit_event.unwrap().action.details.as_deref(),
        Some("from=draft,to=pending_review")
    );
}

#[test]
fn test_advance_status_to_terminal_is_refused() {
    let result: Result<TransitionResult, CoreError> = run(
        &closed_document(),
        Command::AdvanceStatus {
            target: MinutesStatus::Approved,
        },
        AFTER_DEADLINE,
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidStatusTransition { .. }))
    ));
}
