//! Storage contracts and the SQLite reference implementation.
//!
//! # Responsibility
//! - Define the owner-scoped CRUD contract (`CareStore`) the services use.
//! - Keep SQL and JSON encoding details inside the persistence boundary.
//!
//! # Invariants
//! - Writes call `CareRecord::validate()` before SQL mutations.
//! - Reads reject invalid persisted state instead of masking it.
//! - Every call is scoped to an explicit owner id.

pub mod care_store;
pub mod sqlite_store;
