//! Catalog core for authors and books.
//!
//! Validation, normalization, atomic bulk import and filtered queries over a
//! many-to-many author/book relation. This crate is the single source of
//! truth for catalog invariants; HTTP and CLI layers only call into it.

pub mod config;
pub mod db;
pub mod import;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{CatalogConfig, LoggingConfig};
pub use import::{ImportError, ImportResult, RowError};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::author::{Author, AuthorId, AuthorSummary};
pub use model::book::{Book, BookDraft, BookId};
pub use model::entity::{EntityKind, EntityMeta};
pub use query::{
    AuthorCriteria, AuthorOrderField, BookCriteria, BookOrderField, FilterError, FilterQuery,
    Ordering, Page, PageRequest, Predicate, SortDirection,
};
pub use repo::{AuthorRepository, BookRepository, RepoError, RepoResult, SqliteCatalogStore};
pub use service::author_service::AuthorService;
pub use service::book_service::BookService;
pub use service::import_service::{AuthorImportService, ImportSummary};
pub use validation::{
    normalize, validate_author, validate_book, CatalogLookup, FieldError, FieldErrorKind,
    ValidatedAuthor, ValidatedBook, ValidationErrors,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
