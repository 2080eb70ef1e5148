//! SQLite-backed catalog store shared by the author and book repositories.
//!
//! # Responsibility
//! - Validate that a connection is migrated before any repository use.
//! - Provide read-only lookups used by validation rules.
//! - Own transaction and constraint-error helpers.
//!
//! # Invariants
//! - A store is only constructed over a connection at the latest schema.
//! - Write transactions take the SQLite write lock up front (IMMEDIATE), so
//!   checks made inside them see committed state.

use super::{RepoError, RepoResult};
use crate::db::migrations::{current_user_version, latest_version};
use crate::model::author::AuthorId;
use crate::validation::CatalogLookup;
use rusqlite::{Connection, ErrorCode, Transaction, TransactionBehavior};
use uuid::Uuid;

const REQUIRED_TABLES: [&str; 3] = ["authors", "books", "book_authors"];

/// Catalog store over one migrated SQLite connection.
///
/// Cheap to copy; every copy borrows the same connection.
#[derive(Clone, Copy)]
pub struct SqliteCatalogStore<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> SqliteCatalogStore<'conn> {
    /// Constructs a store from a migrated, ready connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    /// - `MissingRequiredTable` when a catalog table is absent.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(RepoError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        for table in REQUIRED_TABLES {
            if !table_exists(conn, table)? {
                return Err(RepoError::MissingRequiredTable(table));
            }
        }

        Ok(Self { conn })
    }

    pub(super) fn begin_write(&self) -> RepoResult<Transaction<'conn>> {
        Ok(Transaction::new_unchecked(
            self.conn,
            TransactionBehavior::Immediate,
        )?)
    }
}

impl CatalogLookup for SqliteCatalogStore<'_> {
    fn exists_author_name(&self, normalized_name: &str) -> RepoResult<bool> {
        self.conn.exists_author_name(normalized_name)
    }

    fn exists_author_id(&self, id: AuthorId) -> RepoResult<bool> {
        self.conn.exists_author_id(id)
    }
}

impl CatalogLookup for Connection {
    fn exists_author_name(&self, normalized_name: &str) -> RepoResult<bool> {
        let exists: i64 = self.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE name = ?1);",
            [normalized_name],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn exists_author_id(&self, id: AuthorId) -> RepoResult<bool> {
        let exists: i64 = self.query_row(
            "SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?1);",
            [id.to_string()],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

pub(super) fn parse_uuid(value: &str, column: &str) -> RepoResult<Uuid> {
    Uuid::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in {column}")))
}

/// Whether `err` is a UNIQUE (or primary key) constraint violation.
pub(super) fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
    )
}

/// Whether `err` is a FOREIGN KEY constraint violation.
pub(super) fn is_foreign_key_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY
    )
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}
