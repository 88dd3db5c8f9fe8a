//! SQLite-backed `CareStore`.
//!
//! # Responsibility
//! - Persist every record kind in one `care_records` table as a JSON body.
//! - Index owner, kind, pet and ordering key as plain columns.
//!
//! # Invariants
//! - Only connections at the latest schema version are accepted.
//! - The `kind` column always matches `R::KIND` of the stored body.

use crate::db::migrations::{current_version, latest_version};
use crate::model::record::{CareRecord, RecordId, RecordKind};
use crate::repo::care_store::{CareStore, RecordQuery, RepoError, RepoResult, SortOrder};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

/// SQLite-backed record store borrowing a migrated connection.
pub struct SqliteCareStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCareStore<'conn> {
    /// Constructs a store from a migrated/ready connection.
    ///
    /// # Errors
    /// - `RepoError::UninitializedConnection` when migrations were not applied.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_version(conn)?;
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl CareStore for SqliteCareStore<'_> {
    fn list<R: CareRecord>(&self, owner: &str, query: &RecordQuery) -> RepoResult<Vec<R>> {
        let mut sql = String::from("SELECT body FROM care_records WHERE owner_id = ? AND kind = ?");
        let mut bind_values: Vec<Value> = vec![
            Value::Text(owner.to_string()),
            Value::Text(R::KIND.as_str().to_string()),
        ];

        if let Some(pet_id) = query.pet_id {
            sql.push_str(" AND pet_uuid = ?");
            bind_values.push(Value::Text(pet_id.to_string()));
        }

        match query.order {
            SortOrder::Ascending => {
                sql.push_str(" ORDER BY COALESCE(sort_at, created_at) ASC, rowid ASC")
            }
            SortOrder::Descending => {
                sql.push_str(" ORDER BY COALESCE(sort_at, created_at) DESC, rowid DESC")
            }
        }

        if let Some(limit) = query.limit {
            sql.push_str(" LIMIT ?");
            bind_values.push(Value::Integer(i64::from(limit)));
        }

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            records.push(decode_body::<R>(&body)?);
        }

        Ok(records)
    }

    fn get<R: CareRecord>(&self, owner: &str, id: RecordId) -> RepoResult<Option<R>> {
        let mut stmt = self.conn.prepare(
            "SELECT body FROM care_records
             WHERE uuid = ?1
               AND kind = ?2
               AND owner_id = ?3;",
        )?;

        let mut rows = stmt.query(params![id.to_string(), R::KIND.as_str(), owner])?;
        if let Some(row) = rows.next()? {
            let body: String = row.get(0)?;
            return Ok(Some(decode_body::<R>(&body)?));
        }

        Ok(None)
    }

    fn create<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<RecordId> {
        record.validate()?;
        let body = serde_json::to_string(record)?;

        self.conn.execute(
            "INSERT INTO care_records (
                uuid,
                kind,
                owner_id,
                pet_uuid,
                sort_at,
                body
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.id().to_string(),
                R::KIND.as_str(),
                owner,
                record.pet_id().to_string(),
                record.sort_key().map(to_epoch_ms),
                body,
            ],
        )?;

        Ok(record.id())
    }

    fn update<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<()> {
        record.validate()?;
        let body = serde_json::to_string(record)?;

        let changed = self.conn.execute(
            "UPDATE care_records
             SET
                pet_uuid = ?1,
                sort_at = ?2,
                body = ?3,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE uuid = ?4
               AND kind = ?5
               AND owner_id = ?6;",
            params![
                record.pet_id().to_string(),
                record.sort_key().map(to_epoch_ms),
                body,
                record.id().to_string(),
                R::KIND.as_str(),
                owner,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                kind: R::KIND,
                id: record.id(),
            });
        }

        Ok(())
    }

    fn delete(&self, owner: &str, kind: RecordKind, id: RecordId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM care_records
             WHERE uuid = ?1
               AND kind = ?2
               AND owner_id = ?3;",
            params![id.to_string(), kind.as_str(), owner],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound { kind, id });
        }

        Ok(())
    }
}

fn decode_body<R: CareRecord>(body: &str) -> RepoResult<R> {
    let record: R = serde_json::from_str(body).map_err(|err| {
        RepoError::InvalidData(format!("undecodable {} body: {err}", R::KIND))
    })?;
    record.validate().map_err(|err| {
        RepoError::InvalidData(format!("{} {} violates invariants: {err}", R::KIND, record.id()))
    })?;
    Ok(record)
}

fn to_epoch_ms(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis()
}
