//! Vet visit and grooming history records.
//!
//! Both carry an optional forward-looking date (`follow_up_date`,
//! `next_date`) that feeds the upcoming agenda window.

use crate::model::record::{require_text, CareRecord, PetId, RecordId, RecordKind, ValidationError};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VetVisit {
    pub id: RecordId,
    pub pet_id: PetId,
    pub date: NaiveDate,
    pub clinic_name: String,
    pub reason: String,
    pub follow_up_date: Option<NaiveDate>,
}

impl VetVisit {
    pub fn new(
        pet_id: PetId,
        date: NaiveDate,
        clinic_name: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            date,
            clinic_name: clinic_name.into(),
            reason: reason.into(),
            follow_up_date: None,
        }
    }
}

impl CareRecord for VetVisit {
    const KIND: RecordKind = RecordKind::VetVisit;

    fn id(&self) -> RecordId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.pet_id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        Some(self.date.and_time(NaiveTime::MIN))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.clinic_name, "clinic_name")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroomingLog {
    pub id: RecordId,
    pub pet_id: PetId,
    /// Snake-case service name, e.g. `full_groom`, `nail_trim`.
    pub groom_type: String,
    pub date: NaiveDate,
    pub next_date: Option<NaiveDate>,
}

impl GroomingLog {
    pub fn new(pet_id: PetId, groom_type: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            groom_type: groom_type.into(),
            date,
            next_date: None,
        }
    }

    /// `full_groom` -> `full groom`.
    pub fn display_type(&self) -> String {
        self.groom_type.replace('_', " ")
    }
}

impl CareRecord for GroomingLog {
    const KIND: RecordKind = RecordKind::GroomingLog;

    fn id(&self) -> RecordId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.pet_id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        Some(self.date.and_time(NaiveTime::MIN))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.groom_type, "groom_type")
    }
}
