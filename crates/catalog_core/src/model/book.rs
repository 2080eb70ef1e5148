//! Book entity and its write-side draft.

use crate::model::author::{AuthorId, AuthorSummary};
use crate::model::entity::EntityMeta;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a book.
pub type BookId = Uuid;

/// Maximum book name length, counted in characters after normalization.
pub const BOOK_NAME_MAX_CHARS: usize = 50;

/// Persisted book with its authors fully expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    #[serde(flatten)]
    pub meta: EntityMeta,
    pub name: String,
    pub edition: i64,
    pub publication_year: i64,
    /// Related authors sorted by name. The book does not own them.
    pub authors: Vec<AuthorSummary>,
}

impl Book {
    pub fn id(&self) -> BookId {
        self.meta.id
    }

    pub fn author_ids(&self) -> Vec<AuthorId> {
        self.authors.iter().map(|author| author.id).collect()
    }
}

/// Caller-supplied book fields for create and full update.
///
/// Fields are optional so that absent input can be reported as a
/// validation failure instead of a decoding failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDraft {
    pub name: Option<String>,
    pub edition: Option<i64>,
    pub publication_year: Option<i64>,
    #[serde(default)]
    pub authors: Vec<AuthorId>,
}

impl BookDraft {
    pub fn new(name: impl Into<String>, edition: i64, publication_year: i64) -> Self {
        Self {
            name: Some(name.into()),
            edition: Some(edition),
            publication_year: Some(publication_year),
            authors: Vec::new(),
        }
    }

    pub fn with_authors(mut self, authors: impl IntoIterator<Item = AuthorId>) -> Self {
        self.authors = authors.into_iter().collect();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookDraft};
    use crate::model::author::AuthorSummary;
    use crate::model::entity::EntityMeta;
    use uuid::Uuid;

    #[test]
    fn book_serializes_with_flat_identity_and_expanded_authors() {
        let author_id = Uuid::new_v4();
        let book = Book {
            meta: EntityMeta {
                id: Uuid::new_v4(),
                created_at: 1,
                updated_at: 2,
            },
            name: "Hamlet".to_string(),
            edition: 1,
            publication_year: 1603,
            authors: vec![AuthorSummary {
                id: author_id,
                name: "William Shakespeare".to_string(),
            }],
        };

        let json = serde_json::to_value(&book).unwrap();
        let mut keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec!["authors", "edition", "id", "name", "publication_year"]
        );
        assert_eq!(json["authors"][0]["name"], "William Shakespeare");
        assert_eq!(json["authors"][0]["id"], author_id.to_string());
    }

    #[test]
    fn draft_deserializes_without_authors() {
        let draft: BookDraft =
            serde_json::from_str(r#"{"name":"Emma","edition":2,"publication_year":1815}"#)
                .unwrap();
        assert_eq!(draft.edition, Some(2));
        assert!(draft.authors.is_empty());
    }
}
