// src/models/assessment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An assessment groups questions and configures the experience points
/// awarded for a perfect score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assessment {
    pub id: i64,
    pub title: String,

    /// Full experience-point reward before the multiplier is applied.
    pub base_points: i64,

    /// Question IDs in display order.
    pub question_ids: Vec<i64>,

    pub created_at: Option<DateTime<Utc>>,
}

/// DTO for creating an assessment.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateAssessmentRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,

    /// Falls back to the configured default when omitted.
    #[validate(range(min = 0, max = 1_000_000))]
    pub base_points: Option<i64>,
}
