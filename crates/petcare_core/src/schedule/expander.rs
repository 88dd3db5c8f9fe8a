//! Medication dose-schedule expander.
//!
//! # Responsibility
//! - Expand a `MedicationRule` over a closed date range into `DoseInstant`s.
//! - Build day-grouped previews for medication detail views.
//!
//! # Invariants
//! - Dose times are fixed per frequency: 09:00, 15:00 and 21:00 slots.
//! - Instants are wall-clock times on the rule's naive calendar, so the
//!   result is independent of when expansion runs.
//! - `monthly` on a day-of-month missing from a month yields nothing for that
//!   month (no clamp to month end).
//! - `as_needed` and `other` never produce instants.

use crate::model::dose::DoseInstant;
use crate::model::medication::{Frequency, MedicationRule};
use crate::model::record::ValidationError;
use chrono::{Datelike, Duration, NaiveDate, NaiveTime};

const MORNING: NaiveTime = hm(9, 0);
const AFTERNOON: NaiveTime = hm(15, 0);
const EVENING: NaiveTime = hm(21, 0);

const fn hm(hour: u32, minute: u32) -> NaiveTime {
    match NaiveTime::from_hms_opt(hour, minute, 0) {
        Some(time) => time,
        None => panic!("invalid dose slot"),
    }
}

/// Expands `rule` over `[range_start, range_end]`.
///
/// The effective range is the intersection with `[start_date, end_date]`;
/// an empty intersection yields an empty sequence.
///
/// # Errors
/// - `ValidationError::EndBeforeStart` when the rule itself is malformed.
/// - `ValidationError::InvertedRange` when `range_end < range_start`.
pub fn expand(
    rule: &MedicationRule,
    range_start: NaiveDate,
    range_end: NaiveDate,
) -> Result<Vec<DoseInstant>, ValidationError> {
    rule.validate()?;
    if range_end < range_start {
        return Err(ValidationError::InvertedRange {
            start: range_start,
            end: range_end,
        });
    }

    if !rule.frequency.is_scheduled() {
        return Ok(Vec::new());
    }

    let first = range_start.max(rule.start_date);
    let last = rule.end_date.map_or(range_end, |end| end.min(range_end));
    if last < first {
        return Ok(Vec::new());
    }

    let instants = first
        .iter_days()
        .take_while(|date| *date <= last)
        .flat_map(|date| {
            day_times(rule, date)
                .iter()
                .map(move |time_of_day| DoseInstant {
                    date,
                    time_of_day: *time_of_day,
                })
        })
        .collect();

    Ok(instants)
}

/// Times of day the rule produces on `date`, ascending.
///
/// Does not check whether `date` is inside the rule's active range.
pub fn day_times(rule: &MedicationRule, date: NaiveDate) -> &'static [NaiveTime] {
    match rule.frequency {
        Frequency::OnceDaily => &[MORNING],
        Frequency::TwiceDaily => &[MORNING, EVENING],
        Frequency::ThreeTimesDaily => &[MORNING, AFTERNOON, EVENING],
        Frequency::Weekly if date.weekday() == rule.start_date.weekday() => &[MORNING],
        Frequency::Monthly if date.day() == rule.start_date.day() => &[MORNING],
        Frequency::Weekly | Frequency::Monthly | Frequency::AsNeeded | Frequency::Other => &[],
    }
}

/// Doses of one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySchedule {
    pub date: NaiveDate,
    pub doses: Vec<DoseInstant>,
}

/// Day-grouped expansion starting at the rule's first day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulePreview {
    /// Only days with at least one dose, ascending.
    pub days: Vec<DaySchedule>,
}

impl SchedulePreview {
    pub fn total_doses(&self) -> usize {
        self.days.iter().map(|day| day.doses.len()).sum()
    }
}

/// Previews `days` calendar days starting at `rule.start_date`.
///
/// `days == 0` yields an empty preview. The range is cut at `end_date`.
///
/// # Errors
/// - `ValidationError::RangeOverflow` when an open-ended rule's range runs
///   past `NaiveDate::MAX`.
pub fn preview(rule: &MedicationRule, days: u32) -> Result<SchedulePreview, ValidationError> {
    rule.validate()?;
    if days == 0 {
        return Ok(SchedulePreview { days: Vec::new() });
    }

    let span = Duration::days(i64::from(days) - 1);
    let range_end = match (rule.start_date.checked_add_signed(span), rule.end_date) {
        (Some(end), Some(rule_end)) => end.min(rule_end),
        (Some(end), None) => end,
        (None, Some(rule_end)) => rule_end,
        (None, None) => {
            return Err(ValidationError::RangeOverflow {
                start: rule.start_date,
                days,
            })
        }
    };
    let instants = expand(rule, rule.start_date, range_end)?;

    let mut grouped: Vec<DaySchedule> = Vec::new();
    for instant in instants {
        match grouped.last_mut() {
            Some(day) if day.date == instant.date => day.doses.push(instant),
            _ => grouped.push(DaySchedule {
                date: instant.date,
                doses: vec![instant],
            }),
        }
    }

    Ok(SchedulePreview { days: grouped })
}
