//! Due/overdue aggregation over source collections.
//!
//! # Responsibility
//! - Merge doses, feedings, reminders, follow-ups, refills and grooming
//!   dates into one ordered `DueItem` sequence.
//!
//! # Invariants
//! - Aggregation is pure; `now` and both windows are explicit inputs.
//! - Ordering is total and stable for unchanged input.

pub mod aggregator;
