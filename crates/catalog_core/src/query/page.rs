//! Limit/offset paging helpers.

use rusqlite::types::Value;
use serde::Serialize;

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Normalizes a requested page size: `None` or zero means the default,
/// oversized values clamp to the maximum.
pub fn normalize_page_size(size: Option<u32>) -> u32 {
    match size {
        Some(0) | None => DEFAULT_PAGE_SIZE,
        Some(value) if value > MAX_PAGE_SIZE => MAX_PAGE_SIZE,
        Some(value) => value,
    }
}

/// Row window applied on top of a `FilterQuery`.
///
/// The default request is unbounded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageRequest {
    pub limit: Option<u32>,
    pub offset: u32,
}

impl PageRequest {
    /// One-based page number with a normalized page size.
    pub fn page(number: u32, size: Option<u32>) -> Self {
        let size = normalize_page_size(size);
        Self {
            limit: Some(size),
            offset: number.saturating_sub(1).saturating_mul(size),
        }
    }

    /// Appends `LIMIT`/`OFFSET` to `sql` and their values to `binds`.
    pub(crate) fn push_sql(&self, sql: &mut String, binds: &mut Vec<Value>) {
        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            binds.push(Value::Integer(i64::from(limit)));
            if self.offset > 0 {
                sql.push_str(" OFFSET ?");
                binds.push(Value::Integer(i64::from(self.offset)));
            }
        } else if self.offset > 0 {
            sql.push_str(" LIMIT -1 OFFSET ?");
            binds.push(Value::Integer(i64::from(self.offset)));
        }
    }
}

/// One window of results plus the unpaged match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub limit: Option<u32>,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::{normalize_page_size, PageRequest, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
    use rusqlite::types::Value;

    #[test]
    fn page_size_defaults_and_clamps() {
        assert_eq!(normalize_page_size(None), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(0)), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_page_size(Some(25)), 25);
        assert_eq!(normalize_page_size(Some(1_000)), MAX_PAGE_SIZE);
    }

    #[test]
    fn page_numbers_are_one_based() {
        assert_eq!(
            PageRequest::page(3, Some(20)),
            PageRequest {
                limit: Some(20),
                offset: 40
            }
        );
        assert_eq!(PageRequest::page(0, None).offset, 0);
    }

    #[test]
    fn offset_without_limit_uses_unbounded_limit() {
        let mut sql = String::new();
        let mut binds = Vec::new();
        PageRequest {
            limit: None,
            offset: 5,
        }
        .push_sql(&mut sql, &mut binds);
        assert_eq!(sql, " LIMIT -1 OFFSET ?");
        assert_eq!(binds, vec![Value::Integer(5)]);
    }
}
