// src/models/submission.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How the total grade of a submission is derived.
///
/// Fixed when the submission is created, from the number of distinct
/// questions in its assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionGradingMode {
    /// The total grade is the single answer's grade.
    SingleQuestion,
    /// The total grade is the sum of all graded answers.
    MultiQuestion,
}

impl SubmissionGradingMode {
    pub fn from_question_count(count: usize) -> Self {
        if count == 1 {
            SubmissionGradingMode::SingleQuestion
        } else {
            SubmissionGradingMode::MultiQuestion
        }
    }
}

/// One learner attempt at an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub id: i64,
    pub assessment_id: i64,
    pub mode: SubmissionGradingMode,

    /// Copied from the assessment when the submission is created.
    pub base_points: i64,

    /// Sum of the maximum grades of the assessment's questions.
    pub maximum_grade: Decimal,

    /// Derived from the answer grades; refreshed by the grading pipeline.
    pub total_grade: Decimal,

    pub multiplier: Decimal,

    /// `None` until points are bootstrapped or explicitly awarded.
    pub points_awarded: Option<i64>,

    pub created_at: Option<DateTime<Utc>>,
}

impl Submission {
    pub fn new(
        id: i64,
        assessment_id: i64,
        question_count: usize,
        base_points: i64,
        maximum_grade: Decimal,
    ) -> Self {
        Self {
            id,
            assessment_id,
            mode: SubmissionGradingMode::from_question_count(question_count),
            base_points,
            maximum_grade,
            total_grade: Decimal::ZERO,
            multiplier: Decimal::ONE,
            points_awarded: None,
            created_at: Some(Utc::now()),
        }
    }
}
