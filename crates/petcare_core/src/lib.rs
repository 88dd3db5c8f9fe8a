//! Core domain logic for pet-care tracking.
//! This crate is the single source of truth for schedule and agenda rules.

pub mod agenda;
pub mod clock;
pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schedule;
pub mod service;

pub use agenda::aggregator::{
    collect_due, refill_alerts, sort_due_items, AgendaWindows, DueAgenda, DueSources, TimeWindow,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{ConfigError, CoreConfig};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::care_log::{GroomingLog, VetVisit};
pub use model::dose::{DoseInstant, DoseStatus, MedicationDose};
pub use model::due::{DueItem, DueKind, DueStatus, WindowClass};
pub use model::feeding::{FeedingEntry, FeedingPlan, FeedingStatus};
pub use model::medication::{Frequency, Medication, MedicationRule};
pub use model::pet::Pet;
pub use model::record::{CareRecord, PetId, RecordId, RecordKind, ValidationError};
pub use model::reminder::{Reminder, ReminderStatus};
pub use repo::care_store::{CareStore, RecordQuery, RepoError, RepoResult, SortOrder};
pub use repo::sqlite_store::SqliteCareStore;
pub use schedule::expander::{day_times, expand, preview, DaySchedule, SchedulePreview};
pub use schedule::feeding::expand_feeding_plan;
pub use service::agenda_service::{
    AgendaReport, AgendaService, SourceUnavailable, ToggleError, ToggledRecord,
};
pub use service::demo_seed::{seed_demo_data, DemoSummary};
pub use service::medication_service::{
    MedicationResult, MedicationService, MedicationServiceError,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
