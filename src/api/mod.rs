//! HTTP API module for the roster engine.
//!
//! This module provides the REST endpoints for building, comparing,
//! validating and scoring monthly rosters.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{CompareRequest, ScheduleRequest, ScoreRequest, ValidateRequest};
pub use response::{ApiError, ApiErrorResponse, CompareResponse};
pub use state::AppState;
