//! HTTP request handlers for the employment law engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::evaluate_case;
use crate::error::EngineError;

use super::request::EvaluationRequest;
use super::response::{ApiError, ApiErrorResponse, EvaluationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/evaluate", post(evaluate_handler))
        .with_state(state)
}

/// Handler for POST /evaluate endpoint.
///
/// Accepts the facts of a case and returns its evaluation.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> impl IntoResponse {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    if body_text.contains("missing field") {
                        ApiError::validation_error(body_text)
                    } else {
                        ApiError::malformed_json(body_text)
                    }
                }
                JsonRejection::JsonSyntaxError(err) => {
                    warn!(
                        correlation_id = %correlation_id,
                        error = %err,
                        "JSON syntax error"
                    );
                    ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
                }
                JsonRejection::MissingJsonContentType(_) => {
                    ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
                }
                _ => ApiError::malformed_json("Failed to parse request body"),
            };
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let facts = match request.into_facts(Utc::now().date_naive()) {
        Ok(facts) => facts,
        Err(err) => return error_response(correlation_id, err, "Invalid case facts"),
    };

    let start_time = Instant::now();
    match evaluate_case(&facts, state.config().config()) {
        Ok(evaluation) => {
            info!(
                correlation_id = %correlation_id,
                canton = %facts.canton,
                case = ?evaluation.timeline.termination_case,
                steps = evaluation.audit_trace.steps.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Evaluation completed successfully"
            );
            json_response(StatusCode::OK, EvaluationResponse::new(evaluation))
        }
        Err(err) => error_response(correlation_id, err, "Evaluation failed"),
    }
}

fn error_response(correlation_id: Uuid, err: EngineError, context: &str) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "{}", context
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}
