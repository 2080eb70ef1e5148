//! Book use-case service.

use super::current_year;
use crate::model::book::{Book, BookDraft, BookId};
use crate::model::entity::EntityKind;
use crate::query::{BookCriteria, BookOrderField, Ordering, Page, PageRequest};
use crate::repo::{BookRepository, RepoError, RepoResult};
use crate::validation::{validate_book, ValidatedBook};
use log::{debug, info};

/// Book create/read/update/delete and listing.
pub struct BookService<R: BookRepository> {
    repo: R,
}

impl<R: BookRepository> BookService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Validates and stores a new book with its author links.
    pub fn create_book(&self, draft: &BookDraft) -> RepoResult<Book> {
        let validated = self.validate("book_create", draft)?;
        let book = self.repo.insert_book(&validated)?;
        info!(
            "event=book_create module=service status=ok book_id={} authors={}",
            book.id(),
            book.authors.len()
        );
        Ok(book)
    }

    /// Replaces every field of an existing book, re-running all rules.
    ///
    /// # Errors
    /// - `RepoError::NotFound` when `id` does not exist.
    /// - `RepoError::Validation` when the draft violates a rule.
    pub fn update_book(&self, id: BookId, draft: &BookDraft) -> RepoResult<Book> {
        if self.repo.get_book(id)?.is_none() {
            return Err(RepoError::NotFound {
                entity: EntityKind::Book,
                id,
            });
        }

        let validated = self.validate("book_update", draft)?;
        let book = self.repo.update_book(id, &validated)?;
        info!(
            "event=book_update module=service status=ok book_id={} authors={}",
            book.id(),
            book.authors.len()
        );
        Ok(book)
    }

    pub fn delete_book(&self, id: BookId) -> RepoResult<()> {
        self.repo.delete_book(id)?;
        info!("event=book_delete module=service status=ok book_id={id}");
        Ok(())
    }

    pub fn get_book(&self, id: BookId) -> RepoResult<Option<Book>> {
        self.repo.get_book(id)
    }

    /// Lists books matching every supplied criterion, ordered and paged.
    pub fn list_books(
        &self,
        criteria: &BookCriteria,
        ordering: Ordering<BookOrderField>,
        page: PageRequest,
    ) -> RepoResult<Page<Book>> {
        let query = criteria.clone().into_query(ordering);
        let total = self.repo.count_books(&query)?;
        let items = self.repo.list_books(&query, &page)?;
        Ok(Page {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        })
    }

    fn validate(&self, event: &str, draft: &BookDraft) -> RepoResult<ValidatedBook> {
        validate_book(draft, &self.repo, current_year()).inspect_err(|err| {
            if let Some(errors) = err.validation_errors() {
                debug!(
                    "event={event} module=service status=invalid fields={}",
                    errors.fields().join(",")
                );
            }
        })
    }
}
