// src/grading/aggregator.rs

use rust_decimal::Decimal;
use serde::Serialize;

use super::store::AnswerGradeStore;
use crate::models::submission::{Submission, SubmissionGradingMode};

/// Result of recomputing a submission's total grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Aggregate {
    pub mode: SubmissionGradingMode,
    pub total_grade: Decimal,
    pub maximum_grade: Decimal,
}

impl Aggregate {
    /// `false` when the maximum grade is zero and no credit fraction exists.
    /// The experience point calculator short-circuits to zero in that case.
    pub fn award_defined(&self) -> bool {
        self.maximum_grade > Decimal::ZERO
    }
}

/// Derives submission totals from the grade store. Always a full
/// recomputation over the current grades, so there is no running sum to
/// drift.
pub struct GradeAggregator<'a> {
    store: &'a AnswerGradeStore,
}

impl<'a> GradeAggregator<'a> {
    pub fn new(store: &'a AnswerGradeStore) -> Self {
        Self { store }
    }

    pub fn recompute(&self, submission: &Submission) -> Aggregate {
        let total_grade = match submission.mode {
            SubmissionGradingMode::SingleQuestion => self
                .store
                .all_grades(submission.id)
                .next()
                .map(|(_, grade)| grade)
                .unwrap_or(Decimal::ZERO),
            SubmissionGradingMode::MultiQuestion => self
                .store
                .all_grades(submission.id)
                .map(|(_, grade)| grade)
                .sum(),
        };

        tracing::debug!(
            "Submission {} total grade recomputed: {} / {}",
            submission.id,
            total_grade,
            submission.maximum_grade
        );

        Aggregate {
            mode: submission.mode,
            total_grade: total_grade.normalize(),
            maximum_grade: submission.maximum_grade,
        }
    }
}
