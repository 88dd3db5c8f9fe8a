//! Free-form reminders.

use crate::model::record::{require_text, CareRecord, PetId, RecordId, RecordKind, ValidationError};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reminders have no completion state; dismissing removes them from agendas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderStatus {
    Active,
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: RecordId,
    pub pet_id: PetId,
    pub title: String,
    pub scheduled_at: NaiveDateTime,
    pub status: ReminderStatus,
}

impl Reminder {
    pub fn active(pet_id: PetId, title: impl Into<String>, scheduled_at: NaiveDateTime) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            title: title.into(),
            scheduled_at,
            status: ReminderStatus::Active,
        }
    }
}

impl CareRecord for Reminder {
    const KIND: RecordKind = RecordKind::Reminder;

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
        require_text(&self.title, "title")
    }
}
