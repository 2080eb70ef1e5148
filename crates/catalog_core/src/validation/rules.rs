//! Ordered rule lists for author and book candidates.
//!
//! Each rule is a plain function over the normalized candidate and a
//! read-only lookup. Rules for a candidate all run; the ones that fail are
//! collected into one `ValidationErrors`.

use super::normalize::normalize_opt;
use super::{CatalogLookup, FieldErrorKind, ValidationErrors};
use crate::model::author::{AuthorId, AUTHOR_NAME_MAX_CHARS};
use crate::model::book::{BookDraft, BOOK_NAME_MAX_CHARS};
use crate::model::entity::EntityKind;
use crate::repo::{RepoError, RepoResult};

const NAME_FIELD: &str = "name";
const EDITION_FIELD: &str = "edition";
const PUBLICATION_YEAR_FIELD: &str = "publication_year";
const AUTHORS_FIELD: &str = "authors";

type Check<C> = fn(&C, &dyn CatalogLookup) -> RepoResult<Option<FieldErrorKind>>;

struct Rule<C> {
    field: &'static str,
    check: Check<C>,
}

/// Author name that passed every rule and is ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAuthor {
    name: String,
}

impl ValidatedAuthor {
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Book fields that passed every rule and are ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBook {
    name: String,
    edition: i64,
    publication_year: i64,
    authors: Vec<AuthorId>,
}

impl ValidatedBook {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn edition(&self) -> i64 {
        self.edition
    }

    pub fn publication_year(&self) -> i64 {
        self.publication_year
    }

    /// Referenced author ids, deduplicated in submission order.
    pub fn authors(&self) -> &[AuthorId] {
        &self.authors
    }
}

struct AuthorCandidate {
    name: String,
}

struct BookCandidate {
    name: String,
    edition: Option<i64>,
    publication_year: Option<i64>,
    authors: Vec<AuthorId>,
    current_year: i64,
}

const AUTHOR_RULES: &[Rule<AuthorCandidate>] = &[
    Rule {
        field: NAME_FIELD,
        check: author_name_not_blank,
    },
    Rule {
        field: NAME_FIELD,
        check: author_name_length,
    },
    Rule {
        field: NAME_FIELD,
        check: author_name_unique,
    },
];

const BOOK_RULES: &[Rule<BookCandidate>] = &[
    Rule {
        field: NAME_FIELD,
        check: book_name_not_blank,
    },
    Rule {
        field: NAME_FIELD,
        check: book_name_length,
    },
    Rule {
        field: EDITION_FIELD,
        check: edition_at_least_one,
    },
    Rule {
        field: PUBLICATION_YEAR_FIELD,
        check: publication_year_at_least_one,
    },
    Rule {
        field: PUBLICATION_YEAR_FIELD,
        check: publication_year_not_future,
    },
    Rule {
        field: AUTHORS_FIELD,
        check: authors_resolve,
    },
];

/// Validates one author name for the single-entity create path.
///
/// Absent input is treated as blank. Uniqueness is checked by exact match
/// of the normalized name against stored authors.
///
/// # Errors
/// - `RepoError::Validation` with every violated rule.
/// - `RepoError::Db` when a store lookup fails.
pub fn validate_author(
    name: Option<&str>,
    lookup: &dyn CatalogLookup,
) -> RepoResult<ValidatedAuthor> {
    let candidate = AuthorCandidate {
        name: normalize_opt(name),
    };
    run_rules(&candidate, AUTHOR_RULES, lookup)?;
    Ok(ValidatedAuthor {
        name: candidate.name,
    })
}

/// Validates book fields for create or full update.
///
/// `current_year` is the calendar year at validation time; years after it
/// are rejected on every write, not only on creation.
pub fn validate_book(
    draft: &BookDraft,
    lookup: &dyn CatalogLookup,
    current_year: i64,
) -> RepoResult<ValidatedBook> {
    let mut authors: Vec<AuthorId> = Vec::with_capacity(draft.authors.len());
    for id in &draft.authors {
        if !authors.contains(id) {
            authors.push(*id);
        }
    }

    let candidate = BookCandidate {
        name: normalize_opt(draft.name.as_deref()),
        edition: draft.edition,
        publication_year: draft.publication_year,
        authors,
        current_year,
    };
    run_rules(&candidate, BOOK_RULES, lookup)?;

    // Both integers are present once the minimum rules passed.
    match (candidate.edition, candidate.publication_year) {
        (Some(edition), Some(publication_year)) => Ok(ValidatedBook {
            name: candidate.name,
            edition,
            publication_year,
            authors: candidate.authors,
        }),
        _ => Err(RepoError::InvalidData(
            "book candidate passed validation without edition or year".to_string(),
        )),
    }
}

fn run_rules<C>(candidate: &C, rules: &[Rule<C>], lookup: &dyn CatalogLookup) -> RepoResult<()> {
    let mut errors = ValidationErrors::new();
    for rule in rules {
        if let Some(kind) = (rule.check)(candidate, lookup)? {
            errors.push(rule.field, kind);
        }
    }
    errors.into_result().map_err(RepoError::Validation)
}

fn author_name_not_blank(
    candidate: &AuthorCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(not_blank(&candidate.name))
}

fn author_name_length(
    candidate: &AuthorCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(max_chars(&candidate.name, AUTHOR_NAME_MAX_CHARS))
}

fn author_name_unique(
    candidate: &AuthorCandidate,
    lookup: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    // Blank or oversized names already failed and cannot collide.
    let name = candidate.name.as_str();
    if name.is_empty() || name.chars().count() > AUTHOR_NAME_MAX_CHARS {
        return Ok(None);
    }

    if lookup.exists_author_name(name)? {
        return Ok(Some(FieldErrorKind::DuplicateEntity {
            entity: EntityKind::Author,
            value: name.to_string(),
        }));
    }
    Ok(None)
}

fn book_name_not_blank(
    candidate: &BookCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(not_blank(&candidate.name))
}

fn book_name_length(
    candidate: &BookCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(max_chars(&candidate.name, BOOK_NAME_MAX_CHARS))
}

fn edition_at_least_one(
    candidate: &BookCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(at_least(candidate.edition, 1))
}

fn publication_year_at_least_one(
    candidate: &BookCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    Ok(at_least(candidate.publication_year, 1))
}

fn publication_year_not_future(
    candidate: &BookCandidate,
    _: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    match candidate.publication_year {
        Some(value) if value > candidate.current_year => Ok(Some(FieldErrorKind::FutureYear {
            value,
            current_year: candidate.current_year,
        })),
        _ => Ok(None),
    }
}

fn authors_resolve(
    candidate: &BookCandidate,
    lookup: &dyn CatalogLookup,
) -> RepoResult<Option<FieldErrorKind>> {
    let mut missing = Vec::new();
    for id in &candidate.authors {
        if !lookup.exists_author_id(*id)? {
            missing.push(*id);
        }
    }

    if missing.is_empty() {
        Ok(None)
    } else {
        Ok(Some(FieldErrorKind::UnknownReference {
            entity: EntityKind::Author,
            ids: missing,
        }))
    }
}

fn not_blank(value: &str) -> Option<FieldErrorKind> {
    value.is_empty().then_some(FieldErrorKind::BlankValue)
}

fn max_chars(value: &str, max: usize) -> Option<FieldErrorKind> {
    let actual = value.chars().count();
    (actual > max).then_some(FieldErrorKind::TooLong { max, actual })
}

fn at_least(value: Option<i64>, min: i64) -> Option<FieldErrorKind> {
    match value {
        Some(value) if value >= min => None,
        other => Some(FieldErrorKind::OutOfRange { min, value: other }),
    }
}

#[cfg(test)]
mod tests {
    use super::{validate_author, validate_book};
    use crate::model::author::AuthorId;
    use crate::model::book::BookDraft;
    use crate::model::entity::EntityKind;
    use crate::repo::{RepoError, RepoResult};
    use crate::validation::{CatalogLookup, FieldErrorKind, ValidationErrors};
    use std::collections::HashSet;
    use uuid::Uuid;

    const CURRENT_YEAR: i64 = 2024;

    #[derive(Default)]
    struct FakeLookup {
        names: HashSet<String>,
        ids: HashSet<AuthorId>,
    }

    impl CatalogLookup for FakeLookup {
        fn exists_author_name(&self, normalized_name: &str) -> RepoResult<bool> {
            Ok(self.names.contains(normalized_name))
        }

        fn exists_author_id(&self, id: AuthorId) -> RepoResult<bool> {
            Ok(self.ids.contains(&id))
        }
    }

    fn validation_errors(err: RepoError) -> ValidationErrors {
        match err {
            RepoError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn author_name_is_normalized() {
        let lookup = FakeLookup::default();
        let validated = validate_author(Some("  George   R.  Martin  "), &lookup).unwrap();
        assert_eq!(validated.name(), "George R. Martin");
    }

    #[test]
    fn absent_and_blank_author_names_fail_as_blank() {
        let lookup = FakeLookup::default();
        for input in [None, Some(""), Some(" \t ")] {
            let errors = validation_errors(validate_author(input, &lookup).unwrap_err());
            assert_eq!(
                errors.for_field("name").collect::<Vec<_>>(),
                vec![&FieldErrorKind::BlankValue]
            );
        }
    }

    #[test]
    fn author_name_over_limit_fails_with_length() {
        let lookup = FakeLookup::default();
        let errors =
            validation_errors(validate_author(Some(&"a".repeat(101)), &lookup).unwrap_err());
        assert_eq!(
            errors.for_field("name").collect::<Vec<_>>(),
            vec![&FieldErrorKind::TooLong {
                max: 100,
                actual: 101
            }]
        );
        assert!(validate_author(Some(&"a".repeat(100)), &lookup).is_ok());
    }

    #[test]
    fn duplicate_is_checked_on_normalized_exact_value() {
        let mut lookup = FakeLookup::default();
        lookup.names.insert("Jane Austen".to_string());

        let errors =
            validation_errors(validate_author(Some(" Jane   Austen "), &lookup).unwrap_err());
        assert_eq!(
            errors.for_field("name").collect::<Vec<_>>(),
            vec![&FieldErrorKind::DuplicateEntity {
                entity: EntityKind::Author,
                value: "Jane Austen".to_string()
            }]
        );

        // Case-sensitive match: a different casing is a different name.
        assert!(validate_author(Some("jane austen"), &lookup).is_ok());
    }

    #[test]
    fn book_collects_every_failing_field() {
        let lookup = FakeLookup::default();
        let missing = Uuid::new_v4();
        let draft = BookDraft {
            name: Some("   ".to_string()),
            edition: Some(0),
            publication_year: Some(CURRENT_YEAR + 1),
            authors: vec![missing],
        };

        let errors = validation_errors(validate_book(&draft, &lookup, CURRENT_YEAR).unwrap_err());
        assert_eq!(
            errors.fields(),
            vec!["name", "edition", "publication_year", "authors"]
        );
        assert!(matches!(
            errors.for_field("publication_year").next(),
            Some(FieldErrorKind::FutureYear { value, current_year })
                if *value == CURRENT_YEAR + 1 && *current_year == CURRENT_YEAR
        ));
        assert!(matches!(
            errors.for_field("authors").next(),
            Some(FieldErrorKind::UnknownReference { ids, .. }) if ids == &vec![missing]
        ));
    }

    #[test]
    fn book_year_bounds_are_distinct() {
        let lookup = FakeLookup::default();

        let too_low = BookDraft::new("Old", 1, 0);
        let errors = validation_errors(validate_book(&too_low, &lookup, CURRENT_YEAR).unwrap_err());
        assert_eq!(
            errors.for_field("publication_year").collect::<Vec<_>>(),
            vec![&FieldErrorKind::OutOfRange {
                min: 1,
                value: Some(0)
            }]
        );

        let current = BookDraft::new("Now", 1, CURRENT_YEAR);
        assert!(validate_book(&current, &lookup, CURRENT_YEAR).is_ok());
    }

    #[test]
    fn book_missing_integers_are_out_of_range() {
        let lookup = FakeLookup::default();
        let draft = BookDraft {
            name: Some("Untitled".to_string()),
            ..BookDraft::default()
        };

        let errors = validation_errors(validate_book(&draft, &lookup, CURRENT_YEAR).unwrap_err());
        assert_eq!(
            errors.for_field("edition").collect::<Vec<_>>(),
            vec![&FieldErrorKind::OutOfRange { min: 1, value: None }]
        );
        assert_eq!(errors.for_field("publication_year").count(), 1);
    }

    #[test]
    fn book_name_limit_and_author_dedup() {
        let mut lookup = FakeLookup::default();
        let author = Uuid::new_v4();
        lookup.ids.insert(author);

        let long = BookDraft::new("b".repeat(51), 1, 2000);
        let errors = validation_errors(validate_book(&long, &lookup, CURRENT_YEAR).unwrap_err());
        assert!(matches!(
            errors.for_field("name").next(),
            Some(FieldErrorKind::TooLong { max: 50, actual: 51 })
        ));

        let draft = BookDraft::new("  The   Hobbit ", 3, 1937).with_authors([author, author]);
        let validated = validate_book(&draft, &lookup, CURRENT_YEAR).unwrap();
        assert_eq!(validated.name(), "The Hobbit");
        assert_eq!(validated.authors(), &[author]);
    }
}
