// src/handlers/submission.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::Value;
use validator::Validate;

use crate::{
    error::AppError,
    grading::{InvalidGradeError, parse_grade},
    state::SharedCatalog,
};

/// DTO for recording a learner's attempt.
#[derive(Debug, Deserialize)]
pub struct CreateSubmissionRequest {
    /// Questions the learner answered. Empty means every question.
    #[serde(default)]
    pub question_ids: Vec<i64>,
}

/// DTO for grading one answer.
/// `grade` is taken as typed by the reviewer: a JSON number or a string.
#[derive(Debug, Deserialize)]
pub struct GradeRequest {
    pub grade: Value,
    pub grader_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct MultiplierRequest {
    #[serde(default)]
    pub multiplier: Value,
}

#[derive(Debug, Deserialize, Validate)]
pub struct PointsRequest {
    #[validate(range(min = 0))]
    pub points: i64,
}

/// Reads a reviewer-typed number out of a JSON value.
fn raw_number(value: &Value) -> Option<String> {
    match value {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        _ => None,
    }
}

pub async fn create_submission(
    State(catalog): State<SharedCatalog>,
    Path(assessment_id): Path<i64>,
    Json(payload): Json<CreateSubmissionRequest>,
) -> Result<impl IntoResponse, AppError> {
    let view = catalog
        .write()
        .await
        .create_submission(assessment_id, &payload.question_ids)?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Returns the grades summary, totals and awarded points.
pub async fn get_submission(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = catalog.read().await.submission_view(id)?;
    Ok(Json(view))
}

/// Grades one answer and returns the refreshed summary, total grade and
/// experience points.
///
/// Non-numeric or out-of-range grades are rejected and the previous grade
/// is kept.
pub async fn grade_answer(
    State(catalog): State<SharedCatalog>,
    Path((submission_id, answer_id)): Path<(i64, i64)>,
    Json(payload): Json<GradeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let grade = raw_number(&payload.grade)
        .ok_or_else(|| InvalidGradeError::NotNumeric(payload.grade.to_string()))
        .and_then(|raw| parse_grade(&raw))?;

    let change = catalog
        .write()
        .await
        .grade_answer(submission_id, answer_id, grade, payload.grader_id)?;

    Ok(Json(change))
}

/// Applies a new multiplier. A non-numeric multiplier leaves the
/// submission untouched and returns its current state.
pub async fn change_multiplier(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
    Json(payload): Json<MultiplierRequest>,
) -> Result<impl IntoResponse, AppError> {
    let raw = raw_number(&payload.multiplier).unwrap_or_default();
    let view = catalog.write().await.change_multiplier(id, &raw)?;
    Ok(Json(view))
}

/// Stores an award typed in by the reviewer.
pub async fn override_points(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
    Json(payload): Json<PointsRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }
    let view = catalog.write().await.override_points(id, payload.points)?;
    Ok(Json(view))
}
