//! Bulk author import: input reading and batch error reporting.
//!
//! # Responsibility
//! - Extract the designated name column from tabular input.
//! - Describe every way a batch can be rejected.
//!
//! # Invariants
//! - A missing name column is a hard failure raised before any write.
//! - A rejected batch writes nothing.
//!
//! The pipeline itself lives in `service::import_service`.

mod csv_source;

pub use csv_source::{read_name_column, read_name_field, AuthorRecord, NameRow};

use crate::repo::RepoError;
use crate::validation::ValidationErrors;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Column holding author names in import input.
pub const AUTHOR_NAME_COLUMN: &str = "name";

pub type ImportResult<T> = Result<T, ImportError>;

/// Validation failure of one input row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowError {
    /// One-based data row number (the header is not counted).
    pub row: usize,
    /// Normalized value of the name column.
    pub name: String,
    pub errors: ValidationErrors,
}

impl Display for RowError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "row {} (\"{}\"): {}", self.row, self.name, self.errors)
    }
}

/// Reasons a whole import batch is rejected.
#[derive(Debug)]
pub enum ImportError {
    /// Input lacks the required column.
    MalformedInput {
        column: &'static str,
        source_name: String,
    },
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Csv(csv::Error),
    /// One or more rows failed validation; nothing was written.
    InvalidRows(Vec<RowError>),
    /// The store rejected the batch at commit time (e.g. a name inserted
    /// concurrently after the pre-check).
    Conflict(ValidationErrors),
    Repo(RepoError),
}

impl ImportError {
    /// Rows rejected by validation, empty for every other failure.
    pub fn row_errors(&self) -> &[RowError] {
        match self {
            Self::InvalidRows(rows) => rows,
            _ => &[],
        }
    }
}

impl Display for ImportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedInput {
                column,
                source_name,
            } => write!(
                f,
                "the \"{column}\" column is missing from the header in \"{source_name}\""
            ),
            Self::Io { path, source } => {
                write!(f, "failed to read \"{}\": {source}", path.display())
            }
            Self::Csv(err) => write!(f, "invalid CSV input: {err}"),
            Self::InvalidRows(rows) => {
                let rendered = rows.iter().map(ToString::to_string).collect::<Vec<_>>();
                write!(
                    f,
                    "{} invalid row(s), nothing imported: {}",
                    rows.len(),
                    rendered.join(" | ")
                )
            }
            Self::Conflict(errors) => write!(f, "import conflicted with stored data: {errors}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ImportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv(err) => Some(err),
            Self::Conflict(errors) => Some(errors),
            Self::Repo(err) => Some(err),
            Self::MalformedInput { .. } | Self::InvalidRows(_) => None,
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

impl From<RepoError> for ImportError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(errors) => Self::Conflict(errors),
            other => Self::Repo(other),
        }
    }
}
