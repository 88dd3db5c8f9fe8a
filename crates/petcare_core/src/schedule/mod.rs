//! Recurring schedule expansion.
//!
//! # Responsibility
//! - Turn a medication rule and a date range into concrete dose instants.
//! - Turn a daily feeding plan into the meal instants of one day.
//!
//! # Invariants
//! - Expansion is pure: no clock reads, no storage access.
//! - Output is ascending by date, then by time of day.

pub mod expander;
pub mod feeding;
