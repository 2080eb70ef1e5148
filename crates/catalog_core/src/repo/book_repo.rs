//! Book repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide create/read/update/delete for books and their author links.
//! - Serve filtered, ordered, paged book reads with authors expanded.
//!
//! # Invariants
//! - A book row and its author links are written in one transaction.
//! - Every linked author id resolves inside the write transaction.
//! - Deleting a book removes its links and never the authors.

use super::sqlite_store::{is_foreign_key_violation, parse_uuid, SqliteCatalogStore};
use super::{RepoError, RepoResult};
use crate::model::author::{AuthorId, AuthorSummary};
use crate::model::book::{Book, BookId};
use crate::model::entity::{EntityKind, EntityMeta};
use crate::query::{BookOrderField, FilterQuery, PageRequest};
use crate::validation::{CatalogLookup, FieldErrorKind, ValidatedBook, ValidationErrors};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row, Transaction};
use uuid::Uuid;

const BOOK_SELECT_SQL: &str = "SELECT
    books.id AS id,
    books.name AS name,
    books.edition AS edition,
    books.publication_year AS publication_year,
    books.created_at AS created_at,
    books.updated_at AS updated_at
FROM books";

/// Persistence contract for books.
pub trait BookRepository: CatalogLookup {
    fn insert_book(&self, book: &ValidatedBook) -> RepoResult<Book>;
    /// Replaces every field and the full author set of an existing book.
    fn update_book(&self, id: BookId, book: &ValidatedBook) -> RepoResult<Book>;
    fn delete_book(&self, id: BookId) -> RepoResult<()>;
    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>>;
    fn list_books(
        &self,
        query: &FilterQuery<BookOrderField>,
        page: &PageRequest,
    ) -> RepoResult<Vec<Book>>;
    fn count_books(&self, query: &FilterQuery<BookOrderField>) -> RepoResult<u64>;
}

impl BookRepository for SqliteCatalogStore<'_> {
    fn insert_book(&self, book: &ValidatedBook) -> RepoResult<Book> {
        let tx = self.begin_write()?;
        ensure_authors_exist(&tx, book.authors())?;

        let id = Uuid::new_v4();
        tx.execute(
            "INSERT INTO books (id, name, edition, publication_year)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                id.to_string(),
                book.name(),
                book.edition(),
                book.publication_year()
            ],
        )?;
        replace_links(&tx, id, book.authors())?;

        let created = load_book(&tx, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Book,
            id,
        })?;
        tx.commit()?;
        Ok(created)
    }

    fn update_book(&self, id: BookId, book: &ValidatedBook) -> RepoResult<Book> {
        let tx = self.begin_write()?;
        ensure_authors_exist(&tx, book.authors())?;

        let changed = tx.execute(
            "UPDATE books
             SET
                name = ?2,
                edition = ?3,
                publication_year = ?4,
                updated_at = (CAST(strftime('%s', 'now') AS INTEGER) * 1000)
             WHERE id = ?1;",
            params![
                id.to_string(),
                book.name(),
                book.edition(),
                book.publication_year()
            ],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Book,
                id,
            });
        }
        replace_links(&tx, id, book.authors())?;

        let updated = load_book(&tx, id)?.ok_or(RepoError::NotFound {
            entity: EntityKind::Book,
            id,
        })?;
        tx.commit()?;
        Ok(updated)
    }

    fn delete_book(&self, id: BookId) -> RepoResult<()> {
        let tx = self.begin_write()?;
        tx.execute(
            "DELETE FROM book_authors WHERE book_id = ?1;",
            [id.to_string()],
        )?;
        let changed = tx.execute("DELETE FROM books WHERE id = ?1;", [id.to_string()])?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: EntityKind::Book,
                id,
            });
        }
        tx.commit()?;
        Ok(())
    }

    fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        load_book(self.conn, id)
    }

    fn list_books(
        &self,
        query: &FilterQuery<BookOrderField>,
        page: &PageRequest,
    ) -> RepoResult<Vec<Book>> {
        let filter = query.predicate.to_sql("books");
        let mut sql = format!(
            "{BOOK_SELECT_SQL} WHERE {} ORDER BY {}",
            filter.clause,
            query.ordering.to_sql("books")
        );
        let mut bind_values: Vec<Value> = filter.binds;
        page.push_sql(&mut sql, &mut bind_values);

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut books = Vec::new();
        while let Some(row) = rows.next()? {
            books.push(parse_book_row(self.conn, row)?);
        }
        Ok(books)
    }

    fn count_books(&self, query: &FilterQuery<BookOrderField>) -> RepoResult<u64> {
        let filter = query.predicate.to_sql("books");
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM books WHERE {};", filter.clause),
            params_from_iter(filter.binds),
            |row| row.get(0),
        )?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative book count `{count}`")))
    }
}

fn ensure_authors_exist(tx: &Transaction<'_>, ids: &[AuthorId]) -> RepoResult<()> {
    let mut missing = Vec::new();
    for id in ids {
        if !tx.exists_author_id(*id)? {
            missing.push(*id);
        }
    }
    if missing.is_empty() {
        return Ok(());
    }
    Err(unknown_authors(missing))
}

fn replace_links(tx: &Transaction<'_>, book_id: BookId, authors: &[AuthorId]) -> RepoResult<()> {
    let book_id_text = book_id.to_string();
    tx.execute(
        "DELETE FROM book_authors WHERE book_id = ?1;",
        [book_id_text.as_str()],
    )?;

    for author_id in authors {
        let result = tx.execute(
            "INSERT OR IGNORE INTO book_authors (book_id, author_id) VALUES (?1, ?2);",
            params![book_id_text.as_str(), author_id.to_string()],
        );
        match result {
            Ok(_) => {}
            Err(err) if is_foreign_key_violation(&err) => {
                return Err(unknown_authors(vec![*author_id]));
            }
            Err(err) => return Err(err.into()),
        }
    }
    Ok(())
}

fn unknown_authors(ids: Vec<AuthorId>) -> RepoError {
    RepoError::Validation(ValidationErrors::single(
        "authors",
        FieldErrorKind::UnknownReference {
            entity: EntityKind::Author,
            ids,
        },
    ))
}

fn load_book(conn: &Connection, id: BookId) -> RepoResult<Option<Book>> {
    let mut stmt = conn.prepare(&format!("{BOOK_SELECT_SQL} WHERE books.id = ?1;"))?;
    let mut rows = stmt.query([id.to_string()])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_book_row(conn, row)?));
    }
    Ok(None)
}

fn parse_book_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Book> {
    let id_text: String = row.get("id")?;
    let authors = load_authors_for_book(conn, &id_text)?;
    Ok(Book {
        meta: EntityMeta {
            id: parse_uuid(&id_text, "books.id")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        },
        name: row.get("name")?,
        edition: row.get("edition")?,
        publication_year: row.get("publication_year")?,
        authors,
    })
}

fn load_authors_for_book(conn: &Connection, book_id: &str) -> RepoResult<Vec<AuthorSummary>> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.name
         FROM book_authors ba
         INNER JOIN authors a ON a.id = ba.author_id
         WHERE ba.book_id = ?1
         ORDER BY a.name ASC, a.id ASC;",
    )?;
    let mut rows = stmt.query([book_id])?;
    let mut authors = Vec::new();
    while let Some(row) = rows.next()? {
        let id_text: String = row.get(0)?;
        authors.push(AuthorSummary {
            id: parse_uuid(&id_text, "book_authors.author_id")?,
            name: row.get(1)?,
        });
    }
    Ok(authors)
}
