//! Criteria, predicates and orderings for author and book listings.

use crate::db::FOLD_CASE_FN;
use crate::validation::normalize;
use rusqlite::types::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type FilterResult<T> = Result<T, FilterError>;

/// Rejected search or ordering input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// Integer field received a value that does not parse.
    InvalidValue { field: &'static str, value: String },
    UnknownOrdering(String),
}

impl Display for FilterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidValue { field, value } => {
                write!(f, "invalid value `{value}` for filter `{field}`: expected an integer")
            }
            Self::UnknownOrdering(key) => write!(f, "unknown ordering `{key}`"),
        }
    }
}

impl Error for FilterError {}

/// Composable filter condition consumed by the store read path.
///
/// Text needles are stored already normalized and case-folded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Matches every row.
    All,
    /// Every inner predicate must hold.
    And(Vec<Predicate>),
    NameContains(String),
    /// Some related author's name contains the needle.
    AuthorNameContains(String),
    EditionEq(i64),
    PublicationYearEq(i64),
}

impl Predicate {
    /// Combines predicates with AND, flattening `All` away.
    pub fn and(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        let mut parts = Vec::new();
        for predicate in predicates {
            match predicate {
                Self::All => {}
                Self::And(inner) => parts.extend(inner),
                other => parts.push(other),
            }
        }
        match parts.len() {
            0 => Self::All,
            1 => parts.remove(0),
            _ => Self::And(parts),
        }
    }

    /// Renders this predicate as a `WHERE` condition over `table`.
    pub fn to_sql(&self, table: &str) -> SqlFilter {
        let mut filter = SqlFilter::default();
        self.write_sql(table, &mut filter);
        filter
    }

    fn write_sql(&self, table: &str, out: &mut SqlFilter) {
        match self {
            Self::All => out.clause.push_str("1 = 1"),
            // Empty conjunction constrains nothing.
            Self::And(parts) if parts.is_empty() => out.clause.push_str("1 = 1"),
            Self::And(parts) => {
                for (index, part) in parts.iter().enumerate() {
                    if index > 0 {
                        out.clause.push_str(" AND ");
                    }
                    out.clause.push('(');
                    part.write_sql(table, out);
                    out.clause.push(')');
                }
            }
            Self::NameContains(needle) => {
                out.clause
                    .push_str(&format!("instr({FOLD_CASE_FN}({table}.name), ?) > 0"));
                out.binds.push(Value::Text(needle.clone()));
            }
            Self::AuthorNameContains(needle) => {
                out.clause.push_str(&format!(
                    "EXISTS (
                        SELECT 1
                        FROM book_authors ba
                        INNER JOIN authors a ON a.id = ba.author_id
                        WHERE ba.book_id = {table}.id
                          AND instr({FOLD_CASE_FN}(a.name), ?) > 0
                    )"
                ));
                out.binds.push(Value::Text(needle.clone()));
            }
            Self::EditionEq(edition) => {
                out.clause.push_str(&format!("{table}.edition = ?"));
                out.binds.push(Value::Integer(*edition));
            }
            Self::PublicationYearEq(year) => {
                out.clause.push_str(&format!("{table}.publication_year = ?"));
                out.binds.push(Value::Integer(*year));
            }
        }
    }
}

/// Parameterized SQL condition with positional bind values.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFilter {
    pub clause: String,
    pub binds: Vec<Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Sortable column of one entity listing.
pub trait OrderField: Copy + Default {
    fn parse(key: &str) -> Option<Self>;
    fn column(self) -> &'static str;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorOrderField {
    #[default]
    Name,
}

impl OrderField for AuthorOrderField {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrderField {
    #[default]
    Name,
    Edition,
    PublicationYear,
}

impl OrderField for BookOrderField {
    fn parse(key: &str) -> Option<Self> {
        match key {
            "name" => Some(Self::Name),
            "edition" => Some(Self::Edition),
            "publication_year" => Some(Self::PublicationYear),
            _ => None,
        }
    }

    fn column(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Edition => "edition",
            Self::PublicationYear => "publication_year",
        }
    }
}

/// Ordering annotation: one field plus direction. Defaults to name ascending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Ordering<F> {
    pub field: F,
    pub direction: SortDirection,
}

impl<F: OrderField> Ordering<F> {
    pub fn asc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: F) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }

    /// Parses `field` or `-field`; blank input yields the default ordering.
    pub fn parse(raw: &str) -> FilterResult<Self> {
        let key = raw.trim();
        if key.is_empty() {
            return Ok(Self::default());
        }

        let (direction, name) = match key.strip_prefix('-') {
            Some(rest) => (SortDirection::Desc, rest),
            None => (SortDirection::Asc, key),
        };
        let field = F::parse(name).ok_or_else(|| FilterError::UnknownOrdering(key.to_string()))?;
        Ok(Self { field, direction })
    }

    /// Renders an `ORDER BY` body; ties break on `id` ascending.
    pub fn to_sql(&self, table: &str) -> String {
        format!(
            "{table}.{} {}, {table}.id ASC",
            self.field.column(),
            self.direction.as_sql()
        )
    }
}

/// Unbounded, order-annotated predicate handed to the store read path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery<F> {
    pub predicate: Predicate,
    pub ordering: Ordering<F>,
}

impl<F: OrderField> Default for FilterQuery<F> {
    fn default() -> Self {
        Self {
            predicate: Predicate::All,
            ordering: Ordering::default(),
        }
    }
}

impl<F: OrderField> FilterQuery<F> {
    pub fn new(predicate: Predicate, ordering: Ordering<F>) -> Self {
        Self {
            predicate,
            ordering,
        }
    }
}

/// Search criteria for authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorCriteria {
    /// Case-insensitive substring of the author name.
    pub name: Option<String>,
}

impl AuthorCriteria {
    pub fn name(value: impl Into<String>) -> Self {
        Self {
            name: Some(value.into()),
        }
    }

    /// Reads criteria from query-string style pairs. Unknown keys are ignored.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            if key == "name" {
                criteria.name = Some(value.to_string());
            }
        }
        criteria
    }

    pub fn build_predicate(&self) -> Predicate {
        Predicate::and(text_needle(self.name.as_deref()).map(Predicate::NameContains))
    }

    pub fn into_query(self, ordering: Ordering<AuthorOrderField>) -> FilterQuery<AuthorOrderField> {
        FilterQuery::new(self.build_predicate(), ordering)
    }
}

/// Search criteria for books.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BookCriteria {
    /// Case-insensitive substring of the book name.
    pub name: Option<String>,
    /// Case-insensitive substring of any related author's name.
    pub author: Option<String>,
    pub edition: Option<i64>,
    pub publication_year: Option<i64>,
}

impl BookCriteria {
    /// Reads criteria from query-string style pairs.
    ///
    /// Unknown keys are ignored and blank values add no constraint.
    ///
    /// # Errors
    /// - `FilterError::InvalidValue` for a non-integer `edition` or
    ///   `publication_year`.
    pub fn from_pairs<'a>(
        pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> FilterResult<Self> {
        let mut criteria = Self::default();
        for (key, value) in pairs {
            match key {
                "name" => criteria.name = Some(value.to_string()),
                "author" => criteria.author = Some(value.to_string()),
                "edition" => criteria.edition = parse_integer("edition", value)?,
                "publication_year" => {
                    criteria.publication_year = parse_integer("publication_year", value)?
                }
                _ => {}
            }
        }
        Ok(criteria)
    }

    pub fn build_predicate(&self) -> Predicate {
        let mut parts = Vec::new();
        if let Some(needle) = text_needle(self.name.as_deref()) {
            parts.push(Predicate::NameContains(needle));
        }
        if let Some(edition) = self.edition {
            parts.push(Predicate::EditionEq(edition));
        }
        if let Some(year) = self.publication_year {
            parts.push(Predicate::PublicationYearEq(year));
        }
        if let Some(needle) = text_needle(self.author.as_deref()) {
            parts.push(Predicate::AuthorNameContains(needle));
        }
        Predicate::and(parts)
    }

    pub fn into_query(self, ordering: Ordering<BookOrderField>) -> FilterQuery<BookOrderField> {
        FilterQuery::new(self.build_predicate(), ordering)
    }
}

fn text_needle(value: Option<&str>) -> Option<String> {
    let normalized = normalize(value?);
    if normalized.is_empty() {
        None
    } else {
        Some(normalized.to_lowercase())
    }
}

fn parse_integer(field: &'static str, value: &str) -> FilterResult<Option<i64>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<i64>()
        .map(Some)
        .map_err(|_| FilterError::InvalidValue {
            field,
            value: value.to_string(),
        })
}
