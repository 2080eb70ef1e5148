//! Catalog use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and repository calls into use-case level APIs.
//! - Keep HTTP/CLI callers decoupled from storage details.
//!
//! # Invariants
//! - Every write is normalized and validated before reaching a repository.
//! - Services hold no mutable state between calls.

pub mod author_service;
pub mod book_service;
pub mod import_service;

use chrono::Datelike;

/// Calendar year used by book validation at call time.
pub fn current_year() -> i64 {
    i64::from(chrono::Local::now().year())
}
