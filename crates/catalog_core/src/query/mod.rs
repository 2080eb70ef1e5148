//! Filter query construction for catalog reads.
//!
//! # Responsibility
//! - Turn field/value search criteria into a composable `Predicate`.
//! - Attach a caller-selected ordering to the predicate.
//! - Render predicates and orderings to parameterized SQL for the store.
//!
//! # Invariants
//! - Supplied criteria always combine with AND; absent criteria add nothing.
//! - A `FilterQuery` is unbounded; paging is applied separately.

mod filter;
mod page;

pub use filter::{
    AuthorCriteria, AuthorOrderField, BookCriteria, BookOrderField, FilterError, FilterQuery,
    FilterResult, OrderField, Ordering, Predicate, SortDirection, SqlFilter,
};
pub use page::{normalize_page_size, Page, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
