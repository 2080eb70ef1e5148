//! Identity and timestamp fields shared by every persisted entity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bookkeeping fields embedded in each concrete entity.
///
/// `id` is assigned once at creation and never changes. Timestamps are
/// epoch milliseconds written by the store: `created_at` is immutable,
/// `updated_at` is refreshed on every update.
///
/// Only `id` is part of the serialized shape; timestamps stay internal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMeta {
    pub id: Uuid,
    #[serde(skip_serializing, default)]
    pub created_at: i64,
    #[serde(skip_serializing, default)]
    pub updated_at: i64,
}

/// Entity families known to the catalog, used in error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Author,
    Book,
}

impl EntityKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Author => "author",
            Self::Book => "book",
        }
    }
}
