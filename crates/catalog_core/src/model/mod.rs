//! Catalog domain model: authors, books and their shared identity fields.
//!
//! # Responsibility
//! - Define canonical entity shapes returned by repositories and services.
//! - Keep identity/timestamp bookkeeping in one composable field set.
//!
//! # Invariants
//! - Every entity is identified by a stable, store-assigned `Uuid`.
//! - Entities handed out by the core always carry normalized names.

pub mod author;
pub mod book;
pub mod entity;
