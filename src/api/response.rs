//! Response types for the roster engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::scheduling::StrategyComparison;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// A 400 response carrying `error`.
    pub fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::InvalidConfig { field, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_CONFIG",
                    format!("Invalid unit configuration field '{}': {}", field, message),
                    "The inline unit configuration is inconsistent",
                ))
            }
            EngineError::InvalidPeriod { year, month } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_PERIOD",
                    format!("Invalid period: {}-{:02}", year, month),
                    "The period must name a calendar month (1-12)",
                ))
            }
            EngineError::InvalidStaff { staff_id, message } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "INVALID_STAFF",
                    format!("Invalid staff member '{}': {}", staff_id, message),
                    "The staff list contains invalid information",
                ))
            }
            EngineError::UnknownStrategy { name } => {
                ApiErrorResponse::bad_request(ApiError::with_details(
                    "UNKNOWN_STRATEGY",
                    format!("Unknown strategy: {}", name),
                    "Supported strategies: balance, wish_priority, regularity",
                ))
            }
            EngineError::SchedulingError { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("SCHEDULING_ERROR", "Scheduling failed", message),
            },
        }
    }
}

/// Response body for `POST /schedule/compare`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompareResponse {
    /// One entry per strategy, in balance, wish_priority, regularity order.
    pub results: Vec<StrategyComparison>,
}
