//! Error types for the roster engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every fault that can occur while loading unit configuration or
//! preparing a scheduling run.

use thiserror::Error;

/// The main error type for the roster engine.
///
/// Configuration loading and run preparation return this error type. The
/// scheduling entry point never surfaces it to callers directly; it is
/// converted into a log line on the run output instead.
///
/// # Example
///
/// ```
/// use roster_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/unit.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/unit.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// Configuration parsed but is internally inconsistent.
    #[error("Invalid configuration field '{field}': {message}")]
    InvalidConfig {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// The requested scheduling period does not name a real month.
    #[error("Invalid period: {year}-{month:02}")]
    InvalidPeriod {
        /// The requested year.
        year: i32,
        /// The requested month (1-12).
        month: u32,
    },

    /// A staff record was invalid or inconsistent with the rest of the roster.
    #[error("Invalid staff member '{staff_id}': {message}")]
    InvalidStaff {
        /// The identifier of the offending staff member.
        staff_id: String,
        /// A description of what made the record invalid.
        message: String,
    },

    /// A strategy name did not match any known heuristic.
    #[error("Unknown strategy: {name}")]
    UnknownStrategy {
        /// The name that was supplied.
        name: String,
    },

    /// A general scheduling fault occurred.
    #[error("Scheduling error: {message}")]
    SchedulingError {
        /// A description of the fault.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
