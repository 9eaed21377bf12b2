// src/handlers/question.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::{
    error::AppError,
    models::question::{OptionRequest, PublicQuestion, QuestionRequest},
    state::SharedCatalog,
};

/// Returns the full question, including correctness and staff comments.
pub async fn get_question(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = catalog.read().await;
    Ok(Json(catalog.question(id)?.clone()))
}

/// Returns the learner-facing view of a question.
pub async fn get_public_question(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let catalog = catalog.read().await;
    Ok(Json(PublicQuestion::from(catalog.question(id)?)))
}

/// Replaces a question's authored fields and options.
/// The stored question is unchanged if validation fails.
pub async fn update_question(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
    Json(payload): Json<QuestionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let question = catalog.write().await.update_question(id, payload)?;
    Ok(Json(question))
}

/// Deletes a question and its options.
pub async fn delete_question(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    catalog.write().await.delete_question(id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_option(
    State(catalog): State<SharedCatalog>,
    Path(id): Path<i64>,
    Json(payload): Json<OptionRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let question = catalog.write().await.add_option(id, payload)?;
    Ok((StatusCode::CREATED, Json(question)))
}

/// Removes the option at `index` (display order).
/// Fails if the remaining options would leave the question invalid.
pub async fn remove_option(
    State(catalog): State<SharedCatalog>,
    Path((id, index)): Path<(i64, usize)>,
) -> Result<impl IntoResponse, AppError> {
    let removed = catalog.write().await.remove_option(id, index)?;
    Ok(Json(removed))
}
