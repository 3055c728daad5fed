//! Pagination and search query extractors.

use roster_core::PageRequest;
use serde::Deserialize;
use utoipa::IntoParams;

/// `skip` / `limit` query parameters.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    /// Rows to skip (default 0).
    #[serde(default)]
    pub skip: Option<u64>,
    /// Rows to return (default 10, at most 100).
    #[serde(default)]
    pub limit: Option<u64>,
}

impl From<PaginationQuery> for PageRequest {
    fn from(query: PaginationQuery) -> Self {
        PageRequest::from_query(query.skip, query.limit)
    }
}

/// Query parameters of the search endpoint.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SearchQuery {
    /// Case-insensitive substring matched against name and email.
    #[serde(default)]
    pub q: Option<String>,
    /// Rows to skip (default 0).
    #[serde(default)]
    pub skip: Option<u64>,
    /// Rows to return (default 10, at most 100).
    #[serde(default)]
    pub limit: Option<u64>,
}

impl SearchQuery {
    /// Splits the query into its term and page window.
    #[must_use]
    pub fn into_parts(self) -> (Option<String>, PageRequest) {
        (self.q, PageRequest::from_query(self.skip, self.limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_defaults() {
        let page: PageRequest = PaginationQuery::default().into();
        assert_eq!(page, PageRequest::new(0, 10));
    }

    #[test]
    fn test_pagination_limit_is_capped() {
        let page: PageRequest = PaginationQuery {
            skip: Some(5),
            limit: Some(1000),
        }
        .into();
        assert_eq!(page.skip, 5);
        assert_eq!(page.limit, PageRequest::MAX_LIMIT);
    }

    #[test]
    fn test_search_query_parts() {
        let (term, page) = SearchQuery {
            q: Some("ali".to_string()),
            skip: None,
            limit: Some(2),
        }
        .into_parts();
        assert_eq!(term.as_deref(), Some("ali"));
        assert_eq!(page, PageRequest::new(0, 2));
    }
}
