//! Daily feeding plan expansion.

use crate::model::feeding::FeedingPlan;
use chrono::{NaiveDate, NaiveDateTime};

/// Meal instants of `plan` on `date`, ascending and deduplicated.
///
/// Inactive plans produce nothing.
pub fn expand_feeding_plan(plan: &FeedingPlan, date: NaiveDate) -> Vec<NaiveDateTime> {
    if !plan.is_active {
        return Vec::new();
    }

    let mut times = plan.times.clone();
    times.sort_unstable();
    times.dedup();
    times.into_iter().map(|time| date.and_time(time)).collect()
}
