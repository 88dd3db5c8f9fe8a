//! Unified due/overdue view over schedulable records.
//!
//! # Responsibility
//! - Normalize doses, feedings, reminders, follow-ups, refills and grooming
//!   dates into one `DueItem` shape.
//! - Hold the per-kind rule table: which window selects a kind, its tie-break
//!   priority, and whether its status makes it eligible for overdue marking.
//!
//! # Invariants
//! - The kind set is closed; every rule is an exhaustive `match`.
//! - `DueItem::source_id` plus `kind` identifies exactly one stored record.

use crate::model::dose::DoseStatus;
use crate::model::feeding::FeedingStatus;
use crate::model::record::{PetId, RecordId};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueKind {
    MedicationDose,
    Feeding,
    Reminder,
    VetFollowup,
    MedicationRefill,
    GroomingNext,
}

/// Which aggregation window selects a kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowClass {
    /// Closed same-day window `[start, end]`.
    Day,
    /// Forward-looking open window `(now, now + horizon)`.
    Upcoming,
}

impl DueKind {
    pub fn window_class(self) -> WindowClass {
        match self {
            Self::MedicationDose | Self::Feeding | Self::Reminder => WindowClass::Day,
            Self::VetFollowup | Self::MedicationRefill | Self::GroomingNext => {
                WindowClass::Upcoming
            }
        }
    }

    /// Tie-break order for items sharing one instant; lower sorts first.
    pub fn priority(self) -> u8 {
        match self {
            Self::MedicationDose => 0,
            Self::Feeding => 1,
            Self::Reminder => 2,
            Self::VetFollowup => 3,
            Self::MedicationRefill => 4,
            Self::GroomingNext => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MedicationDose => "medication_dose",
            Self::Feeding => "feeding",
            Self::Reminder => "reminder",
            Self::VetFollowup => "vet_followup",
            Self::MedicationRefill => "medication_refill",
            Self::GroomingNext => "grooming_next",
        }
    }
}

/// Kind-dependent status carried by a due item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum DueStatus {
    Dose(DoseStatus),
    Feeding(FeedingStatus),
    /// Reminders have no completion state.
    Reminder,
    /// Follow-ups, refills and grooming dates: presence only.
    DateOnly,
}

impl DueStatus {
    /// Whether an item with this status is flagged when its time has passed.
    pub fn overdue_eligible(self) -> bool {
        match self {
            Self::Dose(status) => status == DoseStatus::Pending,
            Self::Feeding(status) => status == FeedingStatus::Pending,
            Self::Reminder => true,
            Self::DateOnly => false,
        }
    }
}

/// One normalized agenda entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueItem {
    pub kind: DueKind,
    pub source_id: RecordId,
    pub pet_id: PetId,
    pub scheduled_at: NaiveDateTime,
    pub title: String,
    pub status: DueStatus,
    pub is_overdue: bool,
}

impl DueItem {
    /// Builds an item and derives `is_overdue` against `now`.
    pub fn new(
        kind: DueKind,
        source_id: RecordId,
        pet_id: PetId,
        scheduled_at: NaiveDateTime,
        title: impl Into<String>,
        status: DueStatus,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            kind,
            source_id,
            pet_id,
            scheduled_at,
            title: title.into(),
            status,
            is_overdue: scheduled_at < now && status.overdue_eligible(),
        }
    }

    /// Only doses and feedings can be toggled.
    pub fn is_toggleable(&self) -> bool {
        matches!(self.status, DueStatus::Dose(_) | DueStatus::Feeding(_))
    }
}
