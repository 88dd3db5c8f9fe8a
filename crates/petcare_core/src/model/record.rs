//! Shared record contract for storage collections.
//!
//! # Responsibility
//! - Name every collection kind known to storage.
//! - Describe what storage needs from a record: identity, pet link,
//!   ordering key, and write-time validation.
//!
//! # Invariants
//! - `RecordKind` string forms are stable; they are persisted.
//! - `validate()` runs before every storage write and after every read.

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every stored record.
pub type RecordId = Uuid;

/// Identifier of the pet a record belongs to.
pub type PetId = Uuid;

/// Storage collection kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Pet,
    Medication,
    MedicationDose,
    FeedingEntry,
    FeedingPlan,
    Reminder,
    VetVisit,
    GroomingLog,
}

impl RecordKind {
    /// Persisted name of the collection.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pet => "pet",
            Self::Medication => "medication",
            Self::MedicationDose => "medication_dose",
            Self::FeedingEntry => "feeding_entry",
            Self::FeedingPlan => "feeding_plan",
            Self::Reminder => "reminder",
            Self::VetVisit => "vet_visit",
            Self::GroomingLog => "grooming_log",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pet" => Some(Self::Pet),
            "medication" => Some(Self::Medication),
            "medication_dose" => Some(Self::MedicationDose),
            "feeding_entry" => Some(Self::FeedingEntry),
            "feeding_plan" => Some(Self::FeedingPlan),
            "reminder" => Some(Self::Reminder),
            "vet_visit" => Some(Self::VetVisit),
            "grooming_log" => Some(Self::GroomingLog),
            _ => None,
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural validation failures for rules, ranges and records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Medication rule ends before it starts.
    EndBeforeStart { start: NaiveDate, end: NaiveDate },
    /// Requested expansion range is inverted.
    InvertedRange { start: NaiveDate, end: NaiveDate },
    /// Range length runs past the last representable date.
    RangeOverflow { start: NaiveDate, days: u32 },
    /// A pending dose/feeding carries a completion timestamp.
    CompletionTimeOnPending(RecordId),
    /// A required text field is blank.
    EmptyField(&'static str),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EndBeforeStart { start, end } => {
                write!(f, "end date {end} is before start date {start}")
            }
            Self::InvertedRange { start, end } => {
                write!(f, "range end {end} is before range start {start}")
            }
            Self::RangeOverflow { start, days } => {
                write!(f, "{days} days from {start} exceeds the supported calendar")
            }
            Self::CompletionTimeOnPending(id) => {
                write!(f, "pending record {id} must not carry an actual time")
            }
            Self::EmptyField(field) => write!(f, "`{field}` cannot be empty"),
        }
    }
}

impl Error for ValidationError {}

/// Contract every storage collection record fulfils.
pub trait CareRecord: Serialize + DeserializeOwned {
    /// Collection this record type is stored in.
    const KIND: RecordKind;

    fn id(&self) -> RecordId;

    /// Owning pet. Pet records return their own id.
    fn pet_id(&self) -> PetId;

    /// Instant used by storage ordering; `None` sorts by creation order.
    fn sort_key(&self) -> Option<NaiveDateTime>;

    /// Checks record invariants before writes and after reads.
    fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}

pub(crate) fn require_text(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(())
}
