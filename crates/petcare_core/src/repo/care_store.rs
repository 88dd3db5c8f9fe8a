//! Owner-scoped storage contract.
//!
//! # Invariants
//! - `update` and `delete` return `RepoError::NotFound` when no row of the
//!   given kind, id and owner exists.
//! - Overlapping writes to one record are last-write-wins; there is no
//!   version check.

use crate::db::DbError;
use crate::model::record::{CareRecord, PetId, RecordId, RecordKind, ValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Storage error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationError),
    Db(DbError),
    Json(serde_json::Error),
    NotFound { kind: RecordKind, id: RecordId },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "record encoding failed: {err}"),
            Self::NotFound { kind, id } => write!(f, "{kind} not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db/open_db_in_memory"
            ),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::NotFound { .. } | Self::InvalidData(_) | Self::UninitializedConnection { .. } => {
                None
            }
        }
    }
}

impl From<ValidationError> for RepoError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    /// Newest first.
    #[default]
    Descending,
}

/// List options shared by every collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    /// Restrict to one pet.
    pub pet_id: Option<PetId>,
    /// Order by `CareRecord::sort_key`, falling back to creation time.
    pub order: SortOrder,
    pub limit: Option<u32>,
}

impl RecordQuery {
    pub fn for_pet(pet_id: Option<PetId>) -> Self {
        Self {
            pet_id,
            ..Self::default()
        }
    }
}

/// Owner-scoped CRUD over every record collection.
pub trait CareStore {
    fn list<R: CareRecord>(&self, owner: &str, query: &RecordQuery) -> RepoResult<Vec<R>>;
    fn get<R: CareRecord>(&self, owner: &str, id: RecordId) -> RepoResult<Option<R>>;
    fn create<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<RecordId>;
    fn update<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<()>;
    fn delete(&self, owner: &str, kind: RecordKind, id: RecordId) -> RepoResult<()>;
}

impl<S: CareStore> CareStore for &S {
    fn list<R: CareRecord>(&self, owner: &str, query: &RecordQuery) -> RepoResult<Vec<R>> {
        (**self).list(owner, query)
    }

    fn get<R: CareRecord>(&self, owner: &str, id: RecordId) -> RepoResult<Option<R>> {
        (**self).get(owner, id)
    }

    fn create<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<RecordId> {
        (**self).create(owner, record)
    }

    fn update<R: CareRecord>(&self, owner: &str, record: &R) -> RepoResult<()> {
        (**self).update(owner, record)
    }

    fn delete(&self, owner: &str, kind: RecordKind, id: RecordId) -> RepoResult<()> {
        (**self).delete(owner, kind, id)
    }
}
