//! Author repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist validated authors, one at a time or as one atomic batch.
//! - Serve filtered, ordered, paged author reads.
//!
//! # Invariants
//! - A batch insert commits every author or none of them.
//! - Name uniqueness is re-checked inside the write transaction, and the
//!   `authors.name` UNIQUE constraint backs it up.

use super::sqlite_store::{is_unique_violation, parse_uuid, SqliteCatalogStore};
use super::{RepoError, RepoResult};
use crate::model::author::{Author, AuthorId};
use crate::model::entity::{EntityKind, EntityMeta};
use crate::query::{AuthorOrderField, FilterQuery, PageRequest};
use crate::validation::{CatalogLookup, FieldErrorKind, ValidatedAuthor, ValidationErrors};
use log::warn;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};
use std::collections::HashSet;
use uuid::Uuid;

const AUTHOR_SELECT_SQL: &str = "SELECT
    authors.id AS id,
    authors.name AS name,
    authors.created_at AS created_at,
    authors.updated_at AS updated_at
FROM authors";

/// Persistence contract for authors.
pub trait AuthorRepository: CatalogLookup {
    /// Inserts one author. A lost uniqueness race surfaces as
    /// `DuplicateEntity` on `name`.
    fn insert_author(&self, author: &ValidatedAuthor) -> RepoResult<Author>;
    /// Inserts all authors in one transaction, or none of them.
    fn insert_authors_atomic(&self, authors: &[ValidatedAuthor]) -> RepoResult<Vec<Author>>;
    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>>;
    fn list_authors(
        &self,
        query: &FilterQuery<AuthorOrderField>,
        page: &PageRequest,
    ) -> RepoResult<Vec<Author>>;
    fn count_authors(&self, query: &FilterQuery<AuthorOrderField>) -> RepoResult<u64>;
}

impl AuthorRepository for SqliteCatalogStore<'_> {
    fn insert_author(&self, author: &ValidatedAuthor) -> RepoResult<Author> {
        let mut inserted = self.insert_authors_atomic(std::slice::from_ref(author))?;
        inserted
            .pop()
            .ok_or_else(|| RepoError::InvalidData("author insert returned no row".to_string()))
    }

    fn insert_authors_atomic(&self, authors: &[ValidatedAuthor]) -> RepoResult<Vec<Author>> {
        let tx = self.begin_write()?;

        let mut errors = ValidationErrors::new();
        let mut seen = HashSet::with_capacity(authors.len());
        for author in authors {
            let name = author.name();
            if !seen.insert(name) || tx.exists_author_name(name)? {
                errors.push("name", duplicate(name));
            }
        }
        if !errors.is_empty() {
            warn!(
                "event=author_insert module=repo status=conflict phase=precommit conflicts={}",
                errors.len()
            );
            return Err(RepoError::Validation(errors));
        }

        let mut ids = Vec::with_capacity(authors.len());
        for author in authors {
            let id = Uuid::new_v4();
            let result = tx.execute(
                "INSERT INTO authors (id, name) VALUES (?1, ?2);",
                params![id.to_string(), author.name()],
            );
            match result {
                Ok(_) => ids.push(id),
                Err(err) if is_unique_violation(&err) => {
                    warn!("event=author_insert module=repo status=conflict phase=commit");
                    return Err(RepoError::Validation(ValidationErrors::single(
                        "name",
                        duplicate(author.name()),
                    )));
                }
                Err(err) => return Err(err.into()),
            }
        }

        let mut inserted = Vec::with_capacity(ids.len());
        for id in ids {
            let author = load_author(&tx, id)?.ok_or(RepoError::NotFound {
                entity: EntityKind::Author,
                id,
            })?;
            inserted.push(author);
        }

        tx.commit()?;
        Ok(inserted)
    }

    fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        load_author(self.conn, id)
    }

    fn list_authors(
        &self,
        query: &FilterQuery<AuthorOrderField>,
        page: &PageRequest,
    ) -> RepoResult<Vec<Author>> {
        let filter = query.predicate.to_sql("authors");
        let mut sql = format!(
            "{AUTHOR_SELECT_SQL} WHERE {} ORDER BY {}",
            filter.clause,
            query.ordering.to_sql("authors")
        );
        let mut bind_values: Vec<Value> = filter.binds;
        page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut authors = Vec::new();
        while let Some(row) = rows.next()? {
            authors.push(parse_author_row(row)?);
        }
        Ok(authors)
    }

    fn count_authors(&self, query: &FilterQuery<AuthorOrderField>) -> RepoResult<u64> {
        let filter = query.predicate.to_sql("authors");
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM authors WHERE {};", filter.clause),
            params_from_iter(filter.binds),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative author count `{count}`")))
    }
}

fn duplicate(name: &str) -> FieldErrorKind {
    FieldErrorKind::DuplicateEntity {
        entity: EntityKind::Author,
        value: name.to_string(),
    }
}

fn load_author(conn: &Connection, id: AuthorId) -> RepoResult<Option<Author>> {
    let mut stmt = conn.prepare(&format!("{AUTHOR_SELECT_SQL} WHERE authors.id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_author_row(row)?));
    }
    Ok(None)
}

fn parse_author_row(row: &Row<'_>) -> RepoResult<Author> {
    let id_text: String = row.get("id")?;
    Ok(Author {
        meta: EntityMeta {
            id: parse_uuid(&id_text, "authors.id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        name: row.get("name")?,
    })
}
