//! Persistence gateway for the registration aggregate.
//!
//! # Responsibility
//! - Define the whole-aggregate `save` / `load` / `reset` contract.
//! - Provide SQLite-backed and in-memory implementations.
//!
//! # Invariants
//! - `save` replaces the previous durable image atomically; a failed save
//!   leaves the previous image readable.
//! - `load` after `save` yields an aggregate structurally equal to the one
//!   saved.
//! - `load` on an empty or reset store yields an empty aggregate.

pub mod memory_store;
pub mod sqlite_store;

use crate::db::DbError;
use crate::model::manager::RegistrationManager;
use crate::model::ModelError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence failure. Callers treat these as fatal.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Persisted row could not be decoded.
    InvalidData(String),
    /// Decoded rows do not form a valid aggregate.
    Model(ModelError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted data: {message}"),
            Self::Model(err) => write!(f, "persisted aggregate is inconsistent: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
            Self::Model(err) => Some(err),
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<ModelError> for StoreError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

/// Durable home of one registration aggregate.
pub trait RegistrationStore {
    /// Overwrites the stored image with the full state of `manager`.
    fn save(&mut self, manager: &RegistrationManager) -> StoreResult<()>;
    /// Rebuilds a fresh aggregate from the last successful save.
    fn load(&self) -> StoreResult<RegistrationManager>;
    /// Removes the stored image entirely.
    fn reset(&mut self) -> StoreResult<()>;
}
