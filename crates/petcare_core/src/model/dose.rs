//! Dose instants and persisted dose records.
//!
//! # Invariants
//! - `DoseInstant` is derived by the expander and never stored directly.
//! - A `MedicationDose` carries `actual_at` only while `status == Taken`.

use crate::model::record::{require_text, CareRecord, PetId, RecordId, RecordKind, ValidationError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One scheduled administration point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DoseInstant {
    pub date: NaiveDate,
    pub time_of_day: NaiveTime,
}

impl DoseInstant {
    pub fn scheduled_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time_of_day)
    }
}

/// Completion state of a materialized dose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DoseStatus {
    Pending,
    Taken,
}

impl DoseStatus {
    pub fn flipped(self) -> Self {
        match self {
            Self::Pending => Self::Taken,
            Self::Taken => Self::Pending,
        }
    }
}

/// A dose instant persisted as a status-tracked record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationDose {
    pub id: RecordId,
    pub pet_id: PetId,
    pub medication_id: RecordId,
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub status: DoseStatus,
    pub actual_at: Option<NaiveDateTime>,
}

impl MedicationDose {
    /// Creates a pending dose with a generated id.
    pub fn pending(
        pet_id: PetId,
        medication_id: RecordId,
        title: impl Into<String>,
        scheduled_at: NaiveDateTime,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            medication_id,
            title: title.into(),
            scheduled_at,
            status: DoseStatus::Pending,
            actual_at: None,
        }
    }

    /// Returns a copy with the status flipped.
    ///
    /// `actual_at` becomes `now` when moving to `Taken` and is cleared when
    /// moving back to `Pending`. `self` is left untouched so callers can
    /// discard the copy when persistence fails.
    pub fn toggled(&self, now: NaiveDateTime) -> Self {
        let status = self.status.flipped();
        Self {
            status,
            actual_at: (status == DoseStatus::Taken).then_some(now),
            ..self.clone()
        }
    }
}

impl CareRecord for MedicationDose {
    const KIND: RecordKind = RecordKind::MedicationDose;

    fn id(&self) -> RecordId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.pet_id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        Some(self.scheduled_at)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.title, "title")?;
        if self.status == DoseStatus::Pending && self.actual_at.is_some() {
            return Err(ValidationError::CompletionTimeOnPending(self.id));
        }
        Ok(())
    }
}
