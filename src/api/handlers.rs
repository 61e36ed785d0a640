//! HTTP request handlers for the roster engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::UnitSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::Period;
use crate::scheduling::{RunInputs, calculate, run_all_strategies, validate_roster};

use super::request::{
    CompareRequest, ScheduleRequest, ScoreRequest, ValidateRequest, solver_options,
};
use super::response::{ApiError, ApiErrorResponse, CompareResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/schedule", post(schedule_handler))
        .route("/schedule/compare", post(compare_handler))
        .route("/validate", post(validate_handler))
        .route("/score", post(score_handler))
        .with_state(state)
}

/// Handler for POST /schedule.
///
/// Runs one strategy and returns its [`RunOutput`](crate::scheduling::RunOutput).
/// The search runs on the blocking pool.
async fn schedule_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScheduleRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing schedule request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let strategy = match request.strategy() {
        Ok(strategy) => strategy,
        Err(err) => return error_response(correlation_id, err),
    };
    let settings = match prepare(&state, request.period, request.unit) {
        Ok(settings) => settings,
        Err(err) => return error_response(correlation_id, err),
    };

    let options = solver_options(&settings, request.seed);
    let inputs = RunInputs {
        period: request.period,
        staff: request.staff,
        settings,
        submissions: request.submissions,
    };

    let start_time = Instant::now();
    let output = match tokio::task::spawn_blocking(move || inputs.run(strategy, &options)).await {
        Ok(output) => output,
        Err(err) => {
            let err = EngineError::SchedulingError {
                message: format!("run task failed: {err}"),
            };
            return error_response(correlation_id, err);
        }
    };

    info!(
        correlation_id = %correlation_id,
        run_id = %output.run_id,
        strategy = %strategy,
        outcome = ?output.outcome,
        duration_ms = start_time.elapsed().as_millis() as u64,
        "Schedule completed"
    );
    json_response(output)
}

/// Handler for POST /schedule/compare.
///
/// Runs all three strategies in parallel and returns each output with its
/// quality score.
async fn compare_handler(
    State(state): State<AppState>,
    payload: Result<Json<CompareRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing compare request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let settings = match prepare(&state, request.period, request.unit) {
        Ok(settings) => settings,
        Err(err) => return error_response(correlation_id, err),
    };

    let options = solver_options(&settings, request.seed);
    let inputs = Arc::new(RunInputs {
        period: request.period,
        staff: request.staff,
        settings,
        submissions: request.submissions,
    });

    let start_time = Instant::now();
    match run_all_strategies(inputs, options).await {
        Ok(results) => {
            info!(
                correlation_id = %correlation_id,
                runs = results.len(),
                duration_ms = start_time.elapsed().as_millis() as u64,
                "Comparison completed"
            );
            json_response(CompareResponse { results })
        }
        Err(err) => error_response(correlation_id, err),
    }
}

/// Handler for POST /validate.
///
/// Audits a roster against the hard rules and daily coverage.
async fn validate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ValidateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing validate request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let settings = match prepare(&state, request.period, request.unit) {
        Ok(settings) => settings,
        Err(err) => return error_response(correlation_id, err),
    };

    let report = validate_roster(
        &request.roster,
        request.period,
        &request.staff,
        &settings,
        &request.submissions,
    );

    info!(
        correlation_id = %correlation_id,
        violations = report.violation_count(),
        coverage_days = report.coverage_issues.len(),
        "Validation completed"
    );
    json_response(report)
}

/// Handler for POST /score.
///
/// Scores a roster against the unit's quality weights.
async fn score_handler(
    State(state): State<AppState>,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing score request");

    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let settings = match prepare(&state, request.period, request.unit) {
        Ok(settings) => settings,
        Err(err) => return error_response(correlation_id, err),
    };

    let breakdown = calculate(
        &request.roster,
        request.period,
        &settings,
        &request.submissions,
    );

    info!(
        correlation_id = %correlation_id,
        total = %breakdown.total,
        pass = breakdown.pass,
        "Scoring completed"
    );
    json_response(breakdown)
}

/// Checks the period and picks the unit: the inline one (validated) or the
/// server's.
fn prepare(
    state: &AppState,
    period: Period,
    unit: Option<UnitSettings>,
) -> EngineResult<UnitSettings> {
    period.ensure_valid()?;
    match unit {
        Some(unit) => {
            unit.validate()?;
            Ok(unit)
        }
        None => Ok(state.settings().clone()),
    }
}

fn json_response<T: Serialize>(body: T) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(correlation_id = %correlation_id, error = %err, "Request failed");
    ApiErrorResponse::from(err).into_response()
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
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
    ApiErrorResponse::bad_request(error).into_response()
}
