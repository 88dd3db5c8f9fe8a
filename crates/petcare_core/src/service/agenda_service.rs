//! Agenda loading and status toggles.
//!
//! # Responsibility
//! - Load every source collection for one owner (and optional pet).
//! - Degrade a failing collection to empty and report it as a warning.
//! - Flip dose/feeding completion state and persist it.
//!
//! # Invariants
//! - One unavailable collection never fails the whole agenda.
//! - A failed toggle write leaves the caller's item untouched; the flipped
//!   copy is discarded.
//! - Toggles are a single read-modify-write with no version check. Two
//!   overlapping toggles on one record resolve last-write-wins.

use crate::agenda::aggregator::{collect_due, AgendaWindows, DueSources};
use crate::clock::Clock;
use crate::config::CoreConfig;
use crate::model::dose::MedicationDose;
use crate::model::due::{DueItem, DueKind};
use crate::model::feeding::FeedingEntry;
use crate::model::record::{CareRecord, PetId, RecordId, RecordKind};
use crate::repo::care_store::{CareStore, RecordQuery, RepoError, SortOrder};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A collection that could not be loaded for this pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnavailable {
    pub kind: RecordKind,
    pub message: String,
}

impl Display for SourceUnavailable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} unavailable: {}", self.kind, self.message)
    }
}

/// Aggregation result plus the collections that were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaReport {
    pub items: Vec<DueItem>,
    pub warnings: Vec<SourceUnavailable>,
}

/// Record as persisted after a toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggledRecord {
    Dose(MedicationDose),
    Feeding(FeedingEntry),
}

#[derive(Debug)]
pub enum ToggleError {
    /// Only doses and feedings carry a completion state.
    NotToggleable(DueKind),
    NotFound { kind: RecordKind, id: RecordId },
    /// Storage read or write failed; nothing was applied.
    Persistence(RepoError),
}

impl Display for ToggleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotToggleable(kind) => write!(f, "{} items cannot be toggled", kind.as_str()),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::Persistence(err) => write!(f, "status was not saved: {err}"),
        }
    }
}

impl Error for ToggleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ToggleError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound { kind, id } => Self::NotFound { kind, id },
            other => Self::Persistence(other),
        }
    }
}

/// Agenda facade over a record store and a clock.
pub struct AgendaService<S: CareStore, C: Clock> {
    store: S,
    clock: C,
    config: CoreConfig,
}

impl<S: CareStore, C: Clock> AgendaService<S, C> {
    pub fn new(store: S, clock: C, config: CoreConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Loads all source collections; failures become warnings.
    pub fn load_sources(
        &self,
        owner: &str,
        pet_id: Option<PetId>,
    ) -> (DueSources, Vec<SourceUnavailable>) {
        // Oldest first so equal instants keep insertion order after the stable sort.
        let query = RecordQuery {
            order: SortOrder::Ascending,
            ..RecordQuery::for_pet(pet_id)
        };
        let mut warnings = Vec::new();

        let sources = DueSources {
            doses: self.load(owner, &query, &mut warnings),
            feedings: self.load(owner, &query, &mut warnings),
            reminders: self.load(owner, &query, &mut warnings),
            vet_visits: self.load(owner, &query, &mut warnings),
            medications: self.load(owner, &query, &mut warnings),
            grooming: self.load(owner, &query, &mut warnings),
        };

        (sources, warnings)
    }

    /// Aggregates with explicit windows and reference instant.
    pub fn collect(
        &self,
        owner: &str,
        pet_id: Option<PetId>,
        windows: &AgendaWindows,
        now: chrono::NaiveDateTime,
    ) -> AgendaReport {
        let (sources, warnings) = self.load_sources(owner, pet_id);
        let items = collect_due(&sources, windows, now);

        info!(
            "event=agenda_collect module=agenda status={} items={} overdue={} unavailable={}",
            if warnings.is_empty() { "ok" } else { "degraded" },
            items.len(),
            items.iter().filter(|item| item.is_overdue).count(),
            warnings.len()
        );

        AgendaReport { items, warnings }
    }

    /// Today's agenda using the injected clock and configured horizon.
    pub fn today(&self, owner: &str, pet_id: Option<PetId>) -> AgendaReport {
        let now = self.clock.now();
        let windows = AgendaWindows::for_day(now.date(), self.config.upcoming_horizon());
        self.collect(owner, pet_id, &windows, now)
    }

    /// Flips the completion state of the item's source record and saves it.
    ///
    /// # Errors
    /// - `NotToggleable` for reminders and date-only items.
    /// - `NotFound` when the source record no longer exists.
    /// - `Persistence` when storage fails; no change is applied.
    pub fn toggle_status(
        &self,
        owner: &str,
        item: &DueItem,
    ) -> Result<ToggledRecord, ToggleError> {
        let now = self.clock.now();
        let toggled = match item.kind {
            DueKind::MedicationDose => {
                let dose: MedicationDose = self.fetch(owner, item.source_id)?;
                let updated = dose.toggled(now);
                self.save(owner, &updated)?;
                ToggledRecord::Dose(updated)
            }
            DueKind::Feeding => {
                let feeding: FeedingEntry = self.fetch(owner, item.source_id)?;
                let updated = feeding.toggled(now);
                self.save(owner, &updated)?;
                ToggledRecord::Feeding(updated)
            }
            other => return Err(ToggleError::NotToggleable(other)),
        };

        info!(
            "event=status_toggle module=agenda status=ok kind={} id={}",
            item.kind.as_str(),
            item.source_id
        );
        Ok(toggled)
    }

    fn load<R: CareRecord>(
        &self,
        owner: &str,
        query: &RecordQuery,
        warnings: &mut Vec<SourceUnavailable>,
    ) -> Vec<R> {
        match self.store.list::<R>(owner, query) {
            Ok(records) => records,
            Err(err) => {
                warn!(
                    "event=source_unavailable module=agenda status=degraded kind={} error={}",
                    R::KIND,
                    err
                );
                warnings.push(SourceUnavailable {
                    kind: R::KIND,
                    message: err.to_string(),
                });
                Vec::new()
            }
        }
    }

    fn fetch<R: CareRecord>(&self, owner: &str, id: RecordId) -> Result<R, ToggleError> {
        self.store
            .get::<R>(owner, id)?
            .ok_or(ToggleError::NotFound { kind: R::KIND, id })
    }

    fn save<R: CareRecord>(&self, owner: &str, record: &R) -> Result<(), ToggleError> {
        self.store.update(owner, record).map_err(|err| {
            warn!(
                "event=status_toggle module=agenda status=error kind={} id={} error={}",
                R::KIND,
                record.id(),
                err
            );
            ToggleError::from(err)
        })
    }
}
