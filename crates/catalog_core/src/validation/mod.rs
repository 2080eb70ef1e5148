//! Field- and entity-level validation for catalog writes.
//!
//! # Responsibility
//! - Normalize names before any rule runs.
//! - Evaluate ordered rule lists and collect every failure per field.
//! - Produce ready-to-persist values (`ValidatedAuthor`, `ValidatedBook`).
//!
//! # Invariants
//! - Validation only reads from the store; it never mutates it.
//! - A failed validation reports all applicable field errors, not the first.

pub mod normalize;
mod rules;

pub use normalize::{is_blank, normalize, normalize_opt};
pub use rules::{validate_author, validate_book, ValidatedAuthor, ValidatedBook};

use crate::model::author::AuthorId;
use crate::model::entity::EntityKind;
use crate::repo::RepoResult;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Read-only store lookups the rules depend on.
pub trait CatalogLookup {
    /// Exact, case-sensitive match against stored normalized author names.
    fn exists_author_name(&self, normalized_name: &str) -> RepoResult<bool>;
    fn exists_author_id(&self, id: AuthorId) -> RepoResult<bool>;
}

/// One rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    /// Absent, empty or whitespace-only value.
    BlankValue,
    TooLong { max: usize, actual: usize },
    /// Integer missing or below its minimum.
    OutOfRange { min: i64, value: Option<i64> },
    FutureYear { value: i64, current_year: i64 },
    DuplicateEntity { entity: EntityKind, value: String },
    UnknownReference { entity: EntityKind, ids: Vec<Uuid> },
}

impl Display for FieldErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankValue => write!(f, "this field cannot be blank"),
            Self::TooLong { max, actual } => write!(
                f,
                "ensure this value has at most {max} characters (it has {actual})"
            ),
            Self::OutOfRange { min, value: None } => {
                write!(f, "this field is required and must be at least {min}")
            }
            Self::OutOfRange {
                min,
                value: Some(value),
            } => write!(f, "{value} is less than the minimum of {min}"),
            Self::FutureYear {
                value,
                current_year,
            } => write!(
                f,
                "{value} must be earlier than or equal to the current year ({current_year})"
            ),
            Self::DuplicateEntity { entity, value } => {
                write!(f, "{} with the name \"{value}\" already exists", entity.as_str())
            }
            Self::UnknownReference { entity, ids } => {
                let ids = ids.iter().map(Uuid::to_string).collect::<Vec<_>>();
                write!(f, "unknown {} id(s): {}", entity.as_str(), ids.join(", "))
            }
        }
    }
}

/// A violation attached to the field it concerns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub kind: FieldErrorKind,
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.kind)
    }
}

/// Ordered set of every violation found for one candidate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: &'static str, kind: FieldErrorKind) -> Self {
        let mut errors = Self::new();
        errors.push(field, kind);
        errors
    }

    pub fn push(&mut self, field: &'static str, kind: FieldErrorKind) {
        self.errors.push(FieldError { field, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Violations reported for one field, in rule order.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldErrorKind> {
        self.errors
            .iter()
            .filter(move |error| error.field == field)
            .map(|error| &error.kind)
    }

    /// Fields with at least one violation, deduplicated, in first-seen order.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields: Vec<&'static str> = Vec::new();
        for error in &self.errors {
            if !fields.contains(&error.field) {
                fields.push(error.field);
            }
        }
        fields
    }

    /// Returns `Ok(())` when no violation was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let rendered = self
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>();
        write!(f, "{}", rendered.join("; "))
    }
}

impl Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = FieldError;
    type IntoIter = std::vec::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}
