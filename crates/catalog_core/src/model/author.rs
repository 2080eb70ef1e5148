//! Author entity.

use crate::model::entity::EntityMeta;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of an author.
pub type AuthorId = Uuid;

/// Maximum author name length, counted in characters after normalization.
pub const AUTHOR_NAME_MAX_CHARS: usize = 100;

/// Persisted author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    #[serde(flatten)]
    pub meta: EntityMeta,
    /// Normalized, catalog-wide unique name.
    pub name: String,
}

impl Author {
    pub fn id(&self) -> AuthorId {
        self.meta.id
    }
}

/// Author shape exposed to serialization layers and nested inside books.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorSummary {
    pub id: AuthorId,
    pub name: String,
}
