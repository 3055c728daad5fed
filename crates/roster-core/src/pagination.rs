//! Offset pagination for list and search operations.

use serde::{Deserialize, Serialize};

/// An offset/limit window over an ordered collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Number of records to skip.
    pub skip: u64,
    /// Maximum number of records to return.
    pub limit: u64,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_LIMIT: u64 = 10;
    /// The maximum allowed page size.
    pub const MAX_LIMIT: u64 = 100;

    /// Creates a new page request, capping `limit` at [`Self::MAX_LIMIT`].
    #[must_use]
    pub fn new(skip: u64, limit: u64) -> Self {
        Self {
            skip,
            limit: limit.min(Self::MAX_LIMIT),
        }
    }

    /// Builds a request from optional query values, applying defaults.
    #[must_use]
    pub fn from_query(skip: Option<u64>, limit: Option<u64>) -> Self {
        Self::new(skip.unwrap_or(0), limit.unwrap_or(Self::DEFAULT_LIMIT))
    }

    /// Returns the offset as a signed value for SQL binding.
    #[must_use]
    pub fn offset_i64(&self) -> i64 {
        i64::try_from(self.skip).unwrap_or(i64::MAX)
    }

    /// Returns the limit as a signed value for SQL binding.
    #[must_use]
    pub fn limit_i64(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX)
    }

    /// Returns the offset as an index into an in-memory collection.
    #[must_use]
    pub fn skip_usize(&self) -> usize {
        usize::try_from(self.skip).unwrap_or(usize::MAX)
    }

    /// Returns the limit as an element count for an in-memory collection.
    #[must_use]
    pub fn limit_usize(&self) -> usize {
        usize::try_from(self.limit).unwrap_or(usize::MAX)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_window() {
        let page = PageRequest::default();
        assert_eq!(page.skip, 0);
        assert_eq!(page.limit, 10);
    }

    #[test]
    fn test_limit_is_capped() {
        let page = PageRequest::new(0, 1000);
        assert_eq!(page.limit, PageRequest::MAX_LIMIT);
    }

    #[test]
    fn test_from_query_defaults() {
        assert_eq!(PageRequest::from_query(None, None), PageRequest::new(0, 10));
        assert_eq!(PageRequest::from_query(Some(4), None), PageRequest::new(4, 10));
        assert_eq!(PageRequest::from_query(None, Some(2)), PageRequest::new(0, 2));
    }

    #[test]
    fn test_sql_bindings_saturate() {
        let page = PageRequest { skip: u64::MAX, limit: 5 };
        assert_eq!(page.offset_i64(), i64::MAX);
        assert_eq!(page.limit_i64(), 5);
    }
}
