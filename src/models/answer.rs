// src/models/answer.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A learner's response to one question of a submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    pub id: i64,
    pub submission_id: i64,
    pub question_id: i64,

    /// `None` until a reviewer grades the answer.
    pub grade: Option<Decimal>,

    /// The reviewer who last graded the answer.
    pub grader_id: Option<i64>,

    pub graded_at: Option<DateTime<Utc>>,
}

impl Answer {
    /// Creates an ungraded answer.
    pub fn new(id: i64, submission_id: i64, question_id: i64) -> Self {
        Self {
            id,
            submission_id,
            question_id,
            grade: None,
            grader_id: None,
            graded_at: None,
        }
    }
}
