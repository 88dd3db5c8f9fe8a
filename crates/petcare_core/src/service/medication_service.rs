//! Medication and feeding-plan use-cases.
//!
//! # Responsibility
//! - Create and (de)activate medications with rule validation.
//! - Preview schedules and persist expanded doses/feedings as pending records.
//! - Report medications that need a refill.
//!
//! # Invariants
//! - Materialization is idempotent: an instant already persisted for the same
//!   medication (or feeding plan) is never created twice.
//! - Inactive medications and plans materialize nothing.

use crate::agenda::aggregator::refill_alerts;
use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::model::dose::MedicationDose;
use crate::model::feeding::{FeedingEntry, FeedingPlan};
use crate::model::medication::Medication;
use crate::model::record::{PetId, RecordId, ValidationError};
use crate::repo::care_store::{CareStore, RecordQuery, RepoError};
use crate::schedule::expander::{expand, preview, SchedulePreview};
use crate::schedule::feeding::expand_feeding_plan;
use chrono::{NaiveDate, NaiveDateTime};
use log::info;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum MedicationServiceError {
    Validation(ValidationError),
    MedicationNotFound(RecordId),
    Repo(RepoError),
}

impl Display for MedicationServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::MedicationNotFound(id) => write!(f, "medication not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for MedicationServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::MedicationNotFound(_) => None,
        }
    }
}

impl From<ValidationError> for MedicationServiceError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for MedicationServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

pub type MedicationResult<T> = Result<T, MedicationServiceError>;

pub struct MedicationService<S: CareStore, C: Clock> {
    store: S,
    clock: C,
    config: CoreConfig,
}

impl<S: CareStore, C: Clock> MedicationService<S, C> {
    pub fn new(store: S, clock: C, config: CoreConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Validates and stores a new medication.
    pub fn create_medication(
        &self,
        owner: &str,
        medication: &Medication,
    ) -> MedicationResult<RecordId> {
        medication.rule.validate()?;
        Ok(self.store.create(owner, medication)?)
    }

    /// Sets `is_active` and returns the stored medication.
    pub fn set_active(
        &self,
        owner: &str,
        id: RecordId,
        active: bool,
    ) -> MedicationResult<Medication> {
        let mut medication = self.medication(owner, id)?;
        medication.is_active = active;
        self.store.update(owner, &medication)?;
        Ok(medication)
    }

    /// Day-grouped preview over the configured number of days.
    pub fn schedule_preview(
        &self,
        owner: &str,
        id: RecordId,
    ) -> MedicationResult<SchedulePreview> {
        let medication = self.medication(owner, id)?;
        Ok(preview(&medication.rule, self.config.preview_days)?)
    }

    /// Persists pending dose records for every instant in the range that is
    /// not already stored. Returns only the newly created doses.
    pub fn materialize_doses(
        &self,
        owner: &str,
        id: RecordId,
        range_start: NaiveDate,
        range_end: NaiveDate,
    ) -> MedicationResult<Vec<MedicationDose>> {
        let medication = self.medication(owner, id)?;
        if !medication.is_active {
            return Ok(Vec::new());
        }

        let instants = expand(&medication.rule, range_start, range_end)?;
        let existing: HashSet<NaiveDateTime> = self
            .store
            .list::<MedicationDose>(owner, &RecordQuery::for_pet(Some(medication.pet_id)))?
            .into_iter()
            .filter(|dose| dose.medication_id == medication.id)
            .map(|dose| dose.scheduled_at)
            .collect();

        let mut created = Vec::new();
        for instant in instants {
            let scheduled_at = instant.scheduled_at();
            if existing.contains(&scheduled_at) {
                continue;
            }
            let dose = MedicationDose::pending(
                medication.pet_id,
                medication.id,
                medication.name.as_str(),
                scheduled_at,
            );
            self.store.create(owner, &dose)?;
            created.push(dose);
        }

        info!(
            "event=doses_materialize module=medication status=ok medication_id={} created={}",
            medication.id,
            created.len()
        );
        Ok(created)
    }

    /// Persists pending feeding entries for every active plan on `date`.
    pub fn materialize_feedings(
        &self,
        owner: &str,
        pet_id: Option<PetId>,
        date: NaiveDate,
    ) -> MedicationResult<Vec<FeedingEntry>> {
        let query = RecordQuery::for_pet(pet_id);
        let plans: Vec<FeedingPlan> = self.store.list(owner, &query)?;
        let existing: HashSet<(RecordId, NaiveDateTime)> = self
            .store
            .list::<FeedingEntry>(owner, &query)?
            .into_iter()
            .filter_map(|entry| entry.plan_id.map(|plan_id| (plan_id, entry.scheduled_at)))
            .collect();

        let mut created = Vec::new();
        for plan in &plans {
            for scheduled_at in expand_feeding_plan(plan, date) {
                if existing.contains(&(plan.id, scheduled_at)) {
                    continue;
                }
                let mut entry =
                    FeedingEntry::pending(plan.pet_id, plan.food.as_str(), scheduled_at);
                entry.plan_id = Some(plan.id);
                self.store.create(owner, &entry)?;
                created.push(entry);
            }
        }

        info!(
            "event=feedings_materialize module=medication status=ok plans={} created={}",
            plans.len(),
            created.len()
        );
        Ok(created)
    }

    /// Active medications with a refill due within the configured horizon,
    /// including missed refills.
    pub fn refill_alerts(
        &self,
        owner: &str,
        pet_id: Option<PetId>,
    ) -> MedicationResult<Vec<Medication>> {
        let medications: Vec<Medication> =
            self.store.list(owner, &RecordQuery::for_pet(pet_id))?;
        let alerts = refill_alerts(
            &medications,
            self.clock.now(),
            self.config.upcoming_horizon(),
        );
        Ok(alerts.into_iter().cloned().collect())
    }

    fn medication(&self, owner: &str, id: RecordId) -> MedicationResult<Medication> {
        self.store
            .get::<Medication>(owner, id)?
            .ok_or(MedicationServiceError::MedicationNotFound(id))
    }
}
