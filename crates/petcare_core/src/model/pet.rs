//! Pet record.

use crate::model::record::{require_text, CareRecord, PetId, RecordKind, ValidationError};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked animal. Archived pets are kept for history but hidden from lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    pub id: PetId,
    pub name: String,
    pub species: String,
    pub breed: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub archived: bool,
}

impl Pet {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            species: species.into(),
            breed: None,
            date_of_birth: None,
            archived: false,
        }
    }
}

impl CareRecord for Pet {
    const KIND: RecordKind = RecordKind::Pet;

    fn id(&self) -> PetId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        None
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")
    }
}
