// src/routes.rs

use axum::{
    Router,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{
    handlers::{assessment, question, submission},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges the authoring (assessment, question) and grading (submission) routers.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (grading catalog, configuration).
pub fn create_router(state: AppState) -> Router {
    let origins: Vec<HeaderValue> = state
        .config
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    let assessment_routes = Router::new()
        .route("/", post(assessment::create_assessment))
        .route("/{id}", get(assessment::get_assessment))
        .route("/{id}/questions", post(assessment::create_question))
        .route("/{id}/submissions", post(submission::create_submission));

    let question_routes = Router::new()
        .route(
            "/{id}",
            get(question::get_question)
                .put(question::update_question)
                .delete(question::delete_question),
        )
        .route("/{id}/public", get(question::get_public_question))
        .route("/{id}/options", post(question::add_option))
        .route("/{id}/options/{index}", delete(question::remove_option));

    let submission_routes = Router::new()
        .route("/{id}", get(submission::get_submission))
        .route(
            "/{id}/answers/{answer_id}/grade",
            put(submission::grade_answer),
        )
        .route("/{id}/multiplier", put(submission::change_multiplier))
        .route("/{id}/points", put(submission::override_points));

    Router::new()
        .nest("/api/assessments", assessment_routes)
        .nest("/api/questions", question_routes)
        .nest("/api/submissions", submission_routes)
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
