//! Due item aggregator.
//!
//! # Responsibility
//! - Select records by the window their kind belongs to.
//! - Derive overdue flags and produce a stable ascending ordering.
//!
//! # Invariants
//! - Day-window kinds (doses, feedings, active reminders) use the half-open
//!   window `[day.start, day.end)`.
//! - Upcoming kinds (follow-ups, refills of active medications, grooming
//!   next-dates) use the open window `(now, now + upcoming_horizon)`, comparing
//!   the start of the record's date.
//! - Ties on `scheduled_at` are broken by `DueKind::priority`, then by source
//!   order.

use crate::model::care_log::{GroomingLog, VetVisit};
use crate::model::dose::MedicationDose;
use crate::model::due::{DueItem, DueKind, DueStatus, WindowClass};
use crate::model::feeding::FeedingEntry;
use crate::model::medication::Medication;
use crate::model::record::{PetId, RecordId};
use crate::model::reminder::{Reminder, ReminderStatus};
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

/// Half-open instant range `[start, end)`.
///
/// A window ending at `NaiveDateTime::MAX` also holds that last instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeWindow {
    /// Midnight of `date` up to midnight of the next day.
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: date.and_time(NaiveTime::MIN),
            end: date
                .succ_opt()
                .map_or(NaiveDateTime::MAX, |next| next.and_time(NaiveTime::MIN)),
        }
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        at >= self.start && (at < self.end || at == NaiveDateTime::MAX)
    }
}

/// The two independently configurable aggregation windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgendaWindows {
    pub day: TimeWindow,
    pub upcoming_horizon: Duration,
}

impl AgendaWindows {
    pub fn for_day(date: NaiveDate, upcoming_horizon: Duration) -> Self {
        Self {
            day: TimeWindow::day(date),
            upcoming_horizon,
        }
    }
}

/// Source collections, already scoped to one owner (and optionally one pet).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueSources {
    pub doses: Vec<MedicationDose>,
    pub feedings: Vec<FeedingEntry>,
    pub reminders: Vec<Reminder>,
    pub vet_visits: Vec<VetVisit>,
    pub medications: Vec<Medication>,
    pub grooming: Vec<GroomingLog>,
}

/// Collects every due item selected by `windows`, sorted ascending.
pub fn collect_due(
    sources: &DueSources,
    windows: &AgendaWindows,
    now: NaiveDateTime,
) -> Vec<DueItem> {
    let upcoming_end = now
        .checked_add_signed(windows.upcoming_horizon)
        .unwrap_or(NaiveDateTime::MAX);
    let in_day = |at: NaiveDateTime| windows.day.contains(at);
    let in_upcoming = |date: NaiveDate| {
        let at = date.and_time(NaiveTime::MIN);
        at > now && at < upcoming_end
    };

    let mut items = Vec::new();

    items.extend(
        sources
            .doses
            .iter()
            .filter(|dose| in_day(dose.scheduled_at))
            .map(|dose| {
                DueItem::new(
                    DueKind::MedicationDose,
                    dose.id,
                    dose.pet_id,
                    dose.scheduled_at,
                    dose.title.as_str(),
                    DueStatus::Dose(dose.status),
                    now,
                )
            }),
    );

    items.extend(
        sources
            .feedings
            .iter()
            .filter(|feeding| in_day(feeding.scheduled_at))
            .map(|feeding| {
                DueItem::new(
                    DueKind::Feeding,
                    feeding.id,
                    feeding.pet_id,
                    feeding.scheduled_at,
                    feeding.title.as_str(),
                    DueStatus::Feeding(feeding.status),
                    now,
                )
            }),
    );

    items.extend(
        sources
            .reminders
            .iter()
            .filter(|reminder| {
                reminder.status == ReminderStatus::Active && in_day(reminder.scheduled_at)
            })
            .map(|reminder| {
                DueItem::new(
                    DueKind::Reminder,
                    reminder.id,
                    reminder.pet_id,
                    reminder.scheduled_at,
                    reminder.title.as_str(),
                    DueStatus::Reminder,
                    now,
                )
            }),
    );

    items.extend(sources.vet_visits.iter().filter_map(|visit| {
        let date = visit.follow_up_date.filter(|date| in_upcoming(*date))?;
        Some(date_only_item(
            DueKind::VetFollowup,
            visit.id,
            visit.pet_id,
            date,
            format!("Follow-up at {}", visit.clinic_name),
            now,
        ))
    }));

    items.extend(sources.medications.iter().filter_map(|medication| {
        if !medication.is_active {
            return None;
        }
        let date = medication.refill_by_date.filter(|date| in_upcoming(*date))?;
        Some(date_only_item(
            DueKind::MedicationRefill,
            medication.id,
            medication.pet_id,
            date,
            format!("Refill {}", medication.name),
            now,
        ))
    }));

    items.extend(sources.grooming.iter().filter_map(|log| {
        let date = log.next_date.filter(|date| in_upcoming(*date))?;
        Some(date_only_item(
            DueKind::GroomingNext,
            log.id,
            log.pet_id,
            date,
            format!("Grooming: {}", log.display_type()),
            now,
        ))
    }));

    sort_due_items(&mut items);
    items
}

/// Stable ascending sort by instant, then kind priority.
pub fn sort_due_items(items: &mut [DueItem]) {
    items.sort_by(|left, right| {
        left.scheduled_at
            .cmp(&right.scheduled_at)
            .then_with(|| left.kind.priority().cmp(&right.kind.priority()))
    });
}

fn date_only_item(
    kind: DueKind,
    source_id: RecordId,
    pet_id: PetId,
    date: NaiveDate,
    title: String,
    now: NaiveDateTime,
) -> DueItem {
    DueItem::new(
        kind,
        source_id,
        pet_id,
        date.and_time(NaiveTime::MIN),
        title,
        DueStatus::DateOnly,
        now,
    )
}

/// "Due today" and "due soon" views of one aggregation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DueAgenda {
    pub today: Vec<DueItem>,
    pub upcoming: Vec<DueItem>,
}

impl DueAgenda {
    /// Splits sorted items by window class, preserving order.
    pub fn split(items: Vec<DueItem>) -> Self {
        let (today, upcoming): (Vec<DueItem>, Vec<DueItem>) = items
            .into_iter()
            .partition(|item| item.kind.window_class() == WindowClass::Day);
        Self { today, upcoming }
    }

    pub fn overdue_count(&self) -> usize {
        self.today.iter().filter(|item| item.is_overdue).count()
    }
}

/// Active medications whose refill date is before `now + horizon`.
///
/// Unlike the upcoming window, past refill dates are included. Sorted by
/// refill date, then name.
pub fn refill_alerts<'a>(
    medications: &'a [Medication],
    now: NaiveDateTime,
    horizon: Duration,
) -> Vec<&'a Medication> {
    let mut alerts: Vec<&Medication> = medications
        .iter()
        .filter(|medication| medication.needs_refill(now, horizon))
        .collect();
    alerts.sort_by(|left, right| {
        left.refill_by_date
            .cmp(&right.refill_by_date)
            .then_with(|| left.name.cmp(&right.name))
    });
    alerts
}
