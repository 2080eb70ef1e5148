//! Bulk author import pipeline.
//!
//! # Responsibility
//! - Skip blank rows, validate the rest against stored and in-batch names.
//! - Persist the whole batch through one atomic repository write.
//!
//! # Invariants
//! - Any invalid row rejects the batch; zero authors are written.
//! - Two rows normalizing to the same name are a duplicate, even when the
//!   store holds neither.
//! - Blank rows are skipped silently and never reported as errors.

use crate::import::{
    read_name_column, read_name_field, AuthorRecord, ImportError, ImportResult, NameRow, RowError,
    AUTHOR_NAME_COLUMN,
};
use crate::model::author::Author;
use crate::model::entity::EntityKind;
use crate::repo::{AuthorRepository, RepoError};
use crate::validation::{
    is_blank, normalize_opt, validate_author, FieldErrorKind, ValidatedAuthor, ValidationErrors,
};
use log::{info, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::time::Instant;

/// Outcome of a successful import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    /// Authors written, in input order.
    pub authors: Vec<Author>,
    /// Blank rows skipped before validation.
    pub skipped_blank: usize,
}

impl ImportSummary {
    pub fn imported(&self) -> usize {
        self.authors.len()
    }

    /// Human-readable result line, e.g. `3 authors imported.`
    pub fn message(&self) -> String {
        match self.imported() {
            1 => "1 author imported.".to_string(),
            count => format!("{count} authors imported."),
        }
    }
}

/// All-or-nothing author import.
pub struct AuthorImportService<R: AuthorRepository> {
    repo: R,
}

impl<R: AuthorRepository> AuthorImportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Imports authors from a CSV file with a `name` column.
    ///
    /// # Errors
    /// - `ImportError::Io` when the file cannot be opened.
    /// - Any error of [`Self::import_csv`].
    pub fn import_file(&self, path: impl AsRef<Path>) -> ImportResult<ImportSummary> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| ImportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.import_csv(file, &path.display().to_string())
    }

    /// Imports authors from CSV content read from `reader`.
    pub fn import_csv<Rd: Read>(
        &self,
        reader: Rd,
        source_name: &str,
    ) -> ImportResult<ImportSummary> {
        let rows = read_name_column(reader, AUTHOR_NAME_COLUMN, source_name)
            .inspect_err(|err| log_rejected(err))?;
        self.import_rows(rows)
    }

    /// Imports authors from decoded records keyed by column name.
    pub fn import_records(
        &self,
        records: &[AuthorRecord],
        source_name: &str,
    ) -> ImportResult<ImportSummary> {
        let rows = read_name_field(records, AUTHOR_NAME_COLUMN, source_name)
            .inspect_err(|err| log_rejected(err))?;
        self.import_rows(rows)
    }

    /// Runs the pipeline over extracted name values.
    pub fn import_rows(&self, rows: Vec<NameRow>) -> ImportResult<ImportSummary> {
        let started_at = Instant::now();
        let (validated, skipped_blank) = self
            .validate_batch(rows)
            .inspect_err(|err| log_rejected(err))?;

        if validated.is_empty() {
            info!(
                "event=author_import module=import status=ok count=0 skipped_blank={} duration_ms={}",
                skipped_blank,
                started_at.elapsed().as_millis()
            );
            return Ok(ImportSummary {
                authors: Vec::new(),
                skipped_blank,
            });
        }

        let authors = self
            .repo
            .insert_authors_atomic(&validated)
            .map_err(ImportError::from)
            .inspect_err(|err| log_rejected(err))?;

        info!(
            "event=author_import module=import status=ok count={} skipped_blank={} duration_ms={}",
            authors.len(),
            skipped_blank,
            started_at.elapsed().as_millis()
        );
        Ok(ImportSummary {
            authors,
            skipped_blank,
        })
    }

    fn validate_batch(&self, rows: Vec<NameRow>) -> ImportResult<(Vec<ValidatedAuthor>, usize)> {
        let mut skipped_blank = 0;
        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut validated = Vec::new();
        let mut row_errors = Vec::new();

        for row in rows {
            if is_blank(row.value.as_deref()) {
                skipped_blank += 1;
                continue;
            }

            match validate_author(row.value.as_deref(), &self.repo) {
                Ok(author) => {
                    if let Some(first_row) = first_seen.get(author.name()) {
                        row_errors.push(RowError {
                            row: row.row,
                            name: author.name().to_string(),
                            errors: ValidationErrors::single(
                                "name",
                                FieldErrorKind::DuplicateEntity {
                                    entity: EntityKind::Author,
                                    value: author.name().to_string(),
                                },
                            ),
                        });
                        warn!(
                            "event=author_import module=import status=duplicate_in_batch row={} first_row={}",
                            row.row, first_row
                        );
                        continue;
                    }
                    first_seen.insert(author.name().to_string(), row.row);
                    validated.push(author);
                }
                Err(RepoError::Validation(errors)) => row_errors.push(RowError {
                    row: row.row,
                    name: normalize_opt(row.value.as_deref()),
                    errors,
                }),
                Err(err) => return Err(ImportError::Repo(err)),
            }
        }

        if row_errors.is_empty() {
            Ok((validated, skipped_blank))
        } else {
            Err(ImportError::InvalidRows(row_errors))
        }
    }
}

fn log_rejected(err: &ImportError) {
    let reason = match err {
        ImportError::MalformedInput { .. } => "malformed_input",
        ImportError::Io { .. } => "io",
        ImportError::Csv(_) => "csv",
        ImportError::InvalidRows(_) => "invalid_rows",
        ImportError::Conflict(_) => "conflict",
        ImportError::Repo(_) => "repo",
    };
    warn!(
        "event=author_import module=import status=rejected reason={} invalid_rows={}",
        reason,
        err.row_errors().len()
    );
}
