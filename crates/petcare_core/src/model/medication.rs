//! Medication record and its recurrence rule.
//!
//! # Responsibility
//! - Define the timing policy (`MedicationRule`) the schedule expander reads.
//! - Carry refill and activity metadata used by agenda aggregation.
//!
//! # Invariants
//! - `end_date`, when set, is not earlier than `start_date`.
//! - Unknown frequency strings degrade to `Frequency::Other`; they never fail
//!   deserialization.
//! - Deactivation lives on `Medication::is_active`, never on the rule.

use crate::model::record::{require_text, CareRecord, PetId, RecordId, RecordKind, ValidationError};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How often a medication is given.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Frequency {
    OnceDaily,
    TwiceDaily,
    ThreeTimesDaily,
    Weekly,
    Monthly,
    /// Given on demand; never auto-scheduled.
    AsNeeded,
    /// Free-form or unrecognized policy; never auto-scheduled.
    Other,
}

impl Frequency {
    /// Parses the persisted name. Unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "once_daily" => Self::OnceDaily,
            "twice_daily" => Self::TwiceDaily,
            "three_times_daily" => Self::ThreeTimesDaily,
            "weekly" => Self::Weekly,
            "monthly" => Self::Monthly,
            "as_needed" => Self::AsNeeded,
            _ => Self::Other,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::OnceDaily => "once_daily",
            Self::TwiceDaily => "twice_daily",
            Self::ThreeTimesDaily => "three_times_daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::AsNeeded => "as_needed",
            Self::Other => "other",
        }
    }

    /// Whether the expander ever produces instants for this frequency.
    pub fn is_scheduled(self) -> bool {
        !matches!(self, Self::AsNeeded | Self::Other)
    }
}

impl From<String> for Frequency {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Frequency> for String {
    fn from(value: Frequency) -> Self {
        value.as_str().to_string()
    }
}

/// Timing policy of a prescribed medication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicationRule {
    pub frequency: Frequency,
    /// Inclusive first day of the course.
    pub start_date: NaiveDate,
    /// Inclusive last day; open-ended when `None`.
    pub end_date: Option<NaiveDate>,
}

impl MedicationRule {
    /// Builds a validated rule.
    ///
    /// # Errors
    /// - `ValidationError::EndBeforeStart` when `end_date < start_date`.
    pub fn new(
        frequency: Frequency,
        start_date: NaiveDate,
        end_date: Option<NaiveDate>,
    ) -> Result<Self, ValidationError> {
        let rule = Self {
            frequency,
            start_date,
            end_date,
        };
        rule.validate()?;
        Ok(rule)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.end_date {
            Some(end) if end < self.start_date => Err(ValidationError::EndBeforeStart {
                start: self.start_date,
                end,
            }),
            _ => Ok(()),
        }
    }

    /// Returns whether `date` lies inside `[start_date, end_date]`.
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date && self.end_date.map_or(true, |end| date <= end)
    }
}

/// A medication prescribed to one pet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Medication {
    pub id: RecordId,
    pub pet_id: PetId,
    pub name: String,
    pub dose: Option<String>,
    pub unit: Option<String>,
    pub rule: MedicationRule,
    pub refill_by_date: Option<NaiveDate>,
    pub is_active: bool,
}

impl Medication {
    /// Creates an active medication with a generated id.
    pub fn new(pet_id: PetId, name: impl Into<String>, rule: MedicationRule) -> Self {
        Self {
            id: Uuid::new_v4(),
            pet_id,
            name: name.into(),
            dose: None,
            unit: None,
            rule,
            refill_by_date: None,
            is_active: true,
        }
    }

    /// The course has ended before `today`.
    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.rule.end_date.is_some_and(|end| end < today)
    }

    /// Active medication whose refill date falls before `now + horizon`.
    ///
    /// Past refill dates count, so a missed refill keeps alerting.
    pub fn needs_refill(&self, now: NaiveDateTime, horizon: Duration) -> bool {
        let cutoff = now.checked_add_signed(horizon).unwrap_or(NaiveDateTime::MAX);
        self.is_active
            && self
                .refill_by_date
                .is_some_and(|date| date.and_time(chrono::NaiveTime::MIN) < cutoff)
    }
}

impl CareRecord for Medication {
    const KIND: RecordKind = RecordKind::Medication;

    fn id(&self) -> RecordId {
        self.id
    }

    fn pet_id(&self) -> PetId {
        self.pet_id
    }

    fn sort_key(&self) -> Option<NaiveDateTime> {
        Some(self.rule.start_date.and_time(chrono::NaiveTime::MIN))
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require_text(&self.name, "name")?;
        self.rule.validate()
    }
}
