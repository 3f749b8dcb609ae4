// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote statistics for a minutes document.
//!
//! Metadata is never stored. It is recomputed from the ballots on every
//! read and write, so this module must stay pure and deterministic.
//!
//! ## Invariants
//!
//! - `received_vote_count == votes.len()`
//! - `agree_count + agree_with_comments_count + disagree_count == received_vote_count`
//! - Rates are `0.0` whenever their denominator is zero (never `NaN`)

use crate::vote::{VoteRecord, VoteType};
use serde::{Deserialize, Serialize};

/// Aggregate statistics derived from a document's ballots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinutesMetadata {
    pub required_vote_count: usize,
    pub received_vote_count: usize,
    pub pending_vote_count: usize,
    pub agree_count: usize,
    pub agree_with_comments_count: usize,
    pub disagree_count: usize,
    /// `agree_count / received_vote_count`, in `[0, 1]`.
    pub agreement_rate: f64,
    /// `received_vote_count / required_vote_count`, in `[0, 1]` while the roster invariant holds.
    pub participation_rate: f64,
}

impl MinutesMetadata {
    /// Agreement rate as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn agreement_percent(&self) -> u8 {
        to_percent(self.agreement_rate)
    }

    /// Participation rate as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn participation_percent(&self) -> u8 {
        to_percent(self.participation_rate)
    }
}

/// Pure aggregation over a ballot set.
pub struct MinutesAggregator;

impl MinutesAggregator {
    /// Computes vote statistics.
    ///
    /// # Arguments
    ///
    /// * `votes` - The ballots of one minutes document
    /// * `required_vote_count` - The voter roster size captured at creation
    #[must_use]
    pub fn compute_metadata(votes: &[VoteRecord], required_vote_count: usize) -> MinutesMetadata {
        let mut agree_count: usize = 0;
        let mut agree_with_comments_count: usize = 0;
        let mut disagree_count: usize = 0;

        for vote in votes {
            match vote.vote_type {
                VoteType::Agree => agree_count += 1,
                VoteType::AgreeWithComments => agree_with_comments_count += 1,
                VoteType::Disagree => disagree_count += 1,
            }
        }

        let received_vote_count: usize = votes.len();

        MinutesMetadata {
            required_vote_count,
            received_vote_count,
            pending_vote_count: required_vote_count.saturating_sub(received_vote_count),
            agree_count,
            agree_with_comments_count,
            disagree_count,
            agreement_rate: ratio(agree_count, received_vote_count),
            participation_rate: ratio(received_vote_count, required_vote_count),
        }
    }
}

#[allow(clippy::cast_precision_loss)]
fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn to_percent(rate: f64) -> u8 {
    (rate * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;
    use time::macros::datetime;

    fn vote(voter: &str, vote_type: VoteType) -> VoteRecord {
        VoteRecord::new(
            UserId::new(voter),
            vote_type,
            None,
            datetime!(2026-03-02 10:00 UTC),
        )
    }

    #[test]
    fn test_empty_vote_set_has_zero_rates() {
        let metadata: MinutesMetadata = MinutesAggregator::compute_metadata(&[], 4);

        assert_eq!(metadata.received_vote_count, 0);
        assert_eq!(metadata.pending_vote_count, 4);
        assert!(metadata.agreement_rate.abs() < f64::EPSILON);
        assert!(metadata.participation_rate.abs() < f64::EPSILON);
        assert_eq!(metadata.agreement_percent(), 0);
    }

    #[test]
    fn test_zero_required_count_does_not_divide_by_zero() {
        let metadata: MinutesMetadata = MinutesAggregator::compute_metadata(&[], 0);

        assert!(!metadata.participation_rate.is_nan());
        assert!(metadata.participation_rate.abs() < f64::EPSILON);
        assert_eq!(metadata.pending_vote_count, 0);
    }

    #[test]
    fn test_counts_partition_received_votes() {
        let votes: Vec<VoteRecord> = vec![
            vote("a", VoteType::Agree),
            vote("b", VoteType::Agree),
            vote("c", VoteType::AgreeWithComments),
            vote("d", VoteType::Disagree),
        ];

        let metadata: MinutesMetadata = MinutesAggregator::compute_metadata(&votes, 5);

        assert_eq!(metadata.received_vote_count, 4);
        assert_eq!(metadata.agree_count, 2);
        assert_eq!(metadata.agree_with_comments_count, 1);
        assert_eq!(metadata.disagree_count, 1);
        assert_eq!(
            metadata.agree_count + metadata.agree_with_comments_count + metadata.disagree_count,
            metadata.received_vote_count
        );
        assert!((metadata.agreement_rate - 0.5).abs() < f64::EPSILON);
        assert!((metadata.participation_rate - 0.8).abs() < f64::EPSILON);
        assert_eq!(metadata.pending_vote_count, 1);
    }

    #[test]
    fn test_agree_with_comments_does_not_count_toward_agreement_rate() {
        let votes: Vec<VoteRecord> = vec![
            vote("a", VoteType::AgreeWithComments),
            vote("b", VoteType::Disagree),
        ];

        let metadata: MinutesMetadata = MinutesAggregator::compute_metadata(&votes, 3);

        assert!(metadata.agreement_rate.abs() < f64::EPSILON);
        assert_eq!(metadata.participation_percent(), 67);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let votes: Vec<VoteRecord> = vec![
            vote("a", VoteType::Agree),
            vote("b", VoteType::Disagree),
        ];

        assert_eq!(
            MinutesAggregator::compute_metadata(&votes, 2),
            MinutesAggregator::compute_metadata(&votes, 2)
        );
    }
}
