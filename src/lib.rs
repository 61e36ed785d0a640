//! Monthly Shift-Roster Engine
//!
//! This crate builds monthly work rosters for a care unit: it sorts staff
//! into scheduling lanes, fills the month day by day with a bounded-time
//! backtracking search ordered by one of three strategies, audits rosters
//! against hard rules and staffing minimums, and scores finished rosters on
//! coverage, satisfaction, fairness and health.

#![warn(missing_docs)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod scheduling;
