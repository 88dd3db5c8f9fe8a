//! Schema registry for the `care_records` store.
//!
//! # Responsibility
//! - Own the ordered list of schema steps for the single JSON-body record
//!   table and its owner/kind/pet lookup indexes.
//! - Bring a connection from any older schema version to the latest one.
//!
//! # Invariants
//! - Step versions start at 1 and increase by exactly one.
//! - The schema version lives in `PRAGMA user_version` and only advances
//!   inside the transaction that applied the step.
//! - A database written by a newer build is never touched.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

#[derive(Debug, Clone, Copy)]
struct SchemaStep {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

const SCHEMA_STEPS: &[SchemaStep] = &[
    SchemaStep {
        version: 1,
        name: "care_records",
        sql: include_str!("0001_care_records.sql"),
    },
    SchemaStep {
        version: 2,
        name: "record_indexes",
        sql: include_str!("0002_record_indexes.sql"),
    },
];

/// Schema version this build writes.
pub fn latest_version() -> u32 {
    SCHEMA_STEPS.last().map_or(0, |step| step.version)
}

/// Schema version recorded in the database file.
pub fn current_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Applies every step newer than the recorded version in one transaction.
///
/// Returns the number of steps applied; `0` for an up-to-date database.
///
/// # Errors
/// - `DbError::UnsupportedSchemaVersion` when the file is ahead of this build.
/// - `DbError::Sqlite` when a step fails; nothing is committed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<usize> {
    let from_version = current_version(conn)?;
    let latest = latest_version();
    if from_version > latest {
        return Err(DbError::UnsupportedSchemaVersion {
            db_version: from_version,
            latest_supported: latest,
        });
    }

    let pending: Vec<&SchemaStep> = SCHEMA_STEPS
        .iter()
        .filter(|step| step.version > from_version)
        .collect();
    if pending.is_empty() {
        return Ok(0);
    }

    let tx = conn.transaction()?;
    for step in &pending {
        tx.execute_batch(step.sql)?;
        tx.pragma_update(None, "user_version", step.version)?;
    }
    tx.commit()?;

    info!(
        "event=db_migrate module=db status=ok from_version={from_version} to_version={latest} steps={} last_step={}",
        pending.len(),
        pending.last().map_or("none", |step| step.name)
    );
    Ok(pending.len())
}
