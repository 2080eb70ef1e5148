//! Author use-case service.

use crate::model::author::{Author, AuthorId};
use crate::query::{AuthorCriteria, AuthorOrderField, Ordering, Page, PageRequest};
use crate::repo::{AuthorRepository, RepoResult};
use crate::validation::validate_author;
use log::{debug, info};

/// Single-entity author operations.
pub struct AuthorService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one author from raw input.
    ///
    /// A blank name is a hard validation failure here, unlike bulk import.
    ///
    /// # Errors
    /// - `RepoError::Validation` with `BlankValue`, `TooLong` or
    ///   `DuplicateEntity` on `name`.
    pub fn create_author(&self, name: &str) -> RepoResult<Author> {
        let validated = validate_author(Some(name), &self.repo).inspect_err(|err| {
            if let Some(errors) = err.validation_errors() {
                debug!(
                    "event=author_create module=service status=invalid fields={}",
                    errors.fields().join(",")
                );
            }
        })?;

        let author = self.repo.insert_author(&validated)?;
        info!(
            "event=author_create module=service status=ok author_id={}",
            author.id()
        );
        Ok(author)
    }

    pub fn get_author(&self, id: AuthorId) -> RepoResult<Option<Author>> {
        self.repo.get_author(id)
    }

    /// Lists authors matching `criteria`, ordered and paged.
    pub fn list_authors(
        &self,
        criteria: &AuthorCriteria,
        ordering: Ordering<AuthorOrderField>,
        page: PageRequest,
    ) -> RepoResult<Page<Author>> {
        let query = criteria.clone().into_query(ordering);
        let total = self.repo.count_authors(&query)?;
        let items = self.repo.list_authors(&query, &page)?;
        Ok(Page {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        })
    }
}
