//! Pet-care domain model.
//!
//! # Responsibility
//! - Define the records exchanged with storage (pets, medications, doses,
//!   feedings, reminders, vet visits, grooming logs).
//! - Define the derived schedule/agenda view types (`DoseInstant`, `DueItem`).
//!
//! # Invariants
//! - Every stored record is identified by a stable `RecordId`.
//! - Records belong to exactly one pet; owner scoping is done by storage.
//! - Derived view types are never persisted as their own records.

pub mod care_log;
pub mod dose;
pub mod due;
pub mod feeding;
pub mod medication;
pub mod pet;
pub mod record;
pub mod reminder;
