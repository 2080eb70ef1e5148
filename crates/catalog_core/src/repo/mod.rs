//! Store gateway: repository contracts and the SQLite implementation.
//!
//! # Responsibility
//! - Define use-case oriented persistence contracts for authors and books.
//! - Keep SQL, transactions and constraint mapping inside this boundary.
//!
//! # Invariants
//! - Multi-statement writes run inside one IMMEDIATE transaction.
//! - Store constraints are the final authority: a UNIQUE or FOREIGN KEY
//!   violation at commit time surfaces as a validation error, never as a
//!   raw database error.

use crate::db::DbError;
use crate::model::entity::EntityKind;
use crate::validation::ValidationErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

pub mod author_repo;
pub mod book_repo;
pub mod sqlite_store;

pub use author_repo::AuthorRepository;
pub use book_repo::BookRepository;
pub use sqlite_store::SqliteCatalogStore;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(ValidationErrors),
    Db(DbError),
    NotFound {
        entity: EntityKind,
        id: Uuid,
    },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
}

impl RepoError {
    /// Field errors carried by a validation failure, if any.
    pub fn validation_errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "validation failed: {err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{} not found: {id}", entity.as_str()),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match required {expected_version}; open it through db::open_db"
            ),
            Self::MissingRequiredTable(table) => write!(f, "required table `{table}` is missing"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for RepoError {
    fn from(value: ValidationErrors) -> Self {
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
