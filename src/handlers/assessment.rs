// src/handlers/assessment.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    config::Config,
    error::AppError,
    models::{assessment::CreateAssessmentRequest, question::QuestionRequest},
    state::SharedCatalog,
};

/// Creates an empty assessment.
/// Base points default to the configured value when omitted.
pub async fn create_assessment(
    State(catalog): State<SharedCatalog>,
    State(config): State<Config>,
    Json(payload): Json<CreateAssessmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    if let Err(validation_errors) = payload.validate() {
        return Err(AppError::BadRequest(validation_errors.to_string()));
    }

    let assessment = catalog
        .write()
        .await
        .create_assessment(payload, config.default_base_points);

    Ok((StatusCode::CREATED, Json(assessment)))
}

/// Returns an assessment with its questions in display order.
pub async fn get_assessment(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let view = catalog.read().await.assessment_view(id)?;
    Ok(Json(view))
}

/// Adds a question to an assessment.
///
/// * Field rules (title length, maximum grade range) are checked first.
/// * The option set must then contain a correct option (exactly one for
///   multiple choice).
pub async fn create_question(
    State(catalog): State<SharedCatalog>,
    Path(assessment_id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let question = catalog
        .write()
        .await
        .create_question(assessment_id, payload)
        .inspect_err(|e| {
            tracing::warn!("Rejected question for assessment {}: {}", assessment_id, e)
        })?;

    Ok((StatusCode::CREATED, Json(question)))
}
