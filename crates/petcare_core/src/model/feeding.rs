//! Feeding entries and recurring feeding plans.
//!
//! # Invariants
//! - A `FeedingEntry` carries `actual_at` only while `status == Completed`.
//! - `FeedingPlan::times` are wall-clock meal times repeated every day.

use crate::model::record::{require_text, CareRecord, PetId, RecordId, RecordKind, ValidationError};
use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedingStatus {
    Pending,
    Completed,
}

impl FeedingStatus {
    pub fn flipped(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

/// One scheduled meal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingEntry {
    pub id: RecordId,
    pub pet_id: PetId,
    /// Plan this entry was materialized from, if any.
    pub plan_id: Option<RecordId>,
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub status: FeedingStatus,
    pub actual_at: Option<NaiveDateTime>,
}

impl FeedingEntry {
    pub fn pending(pet_id: PetId, title: impl Into<String>, scheduled_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            plan_id: None,
            title: title.into(),
            scheduled_at,
            status: FeedingStatus::Pending,
            actual_at: None,
        }
    }

    /// Returns a copy with the status flipped; see `MedicationDose::toggled`.
    pub fn toggled(&self, now: NaiveDateTime) -> Self {
        let status = self.status.flipped();
        Self {
            status,
            actual_at: (status == FeedingStatus::Completed).then_some(now),
            ..self.clone()
        }
    }
}

impl CareRecord for FeedingEntry {
    const KIND: RecordKind = RecordKind::FeedingEntry;

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
        if self.status == FeedingStatus::Pending && self.actual_at.is_some() {
            return Err(ValidationError::CompletionTimeOnPending(self.id));
        }
        Ok(())
    }
}

/// Daily meal plan (e.g. 07:30 and 18:00) for one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedingPlan {
    pub id: RecordId,
    pub pet_id: PetId,
    pub food: String,
    pub amount: Option<String>,
    pub times: Vec<NaiveTime>,
    pub is_active: bool,
}

impl FeedingPlan {
    pub fn new(pet_id: PetId, food: impl Into<String>, times: Vec<NaiveTime>) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            food: food.into(),
            amount: None,
            times,
            is_active: true,
        }
    }
}

impl CareRecord for FeedingPlan {
    const KIND: RecordKind = RecordKind::FeedingPlan;

    fn id(&self) -> RecordId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.pet_id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        None
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.food, "food")
    }
}
