//! Shared pagination types for API query parameters.
//!
//! List endpoints are page based: `p` selects the 1-based page and `limit` the page size.

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
use utoipa::{IntoParams, ToSchema};

/// Default number of items to return per page.
pub const DEFAULT_LIMIT: i64 = 6;

/// Maximum number of items that can be requested per page.
pub const MAX_LIMIT: i64 = 100;

/// Page-based pagination parameters for list endpoints.
///
/// - `p`: 1-based page number (default: 1)
/// - `limit`: Maximum items per page (default: 6, max: 100)
///
/// Out of range values are clamped rather than rejected; non-numeric values fail extraction.
#[serde_as]
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct Pagination {
    /// Page number, starting at 1 (default: 1)
    #[param(default = 1, minimum = 1)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub p: Option<i64>,

    /// Maximum number of items to return (default: 6, max: 100)
    #[param(default = 6, minimum = 1, maximum = 100)]
    #[serde_as(as = "Option<DisplayFromStr>")]
    pub limit: Option<i64>,
}

impl Pagination {
    /// Get the page number, defaulting to 1.
    #[inline]
    pub fn page(&self) -> i64 {
        self.p.unwrap_or(1).max(1)
    }

    /// Get the limit value, clamped between 1 and MAX_LIMIT.
    #[inline]
    pub fn limit(&self) -> i64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    /// Number of rows to skip for the selected page.
    #[inline]
    pub fn skip(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }
}

/// Generic paginated response wrapper for list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PaginatedResponse<T: ToSchema> {
    /// The items for the current page
    pub data: Vec<T>,
    /// Total number of items (before pagination)
    pub total_count: i64,
    /// The page that was returned
    pub page: i64,
    /// Maximum items returned per page
    pub limit: i64,
}

impl<T: ToSchema> PaginatedResponse<T> {
    pub fn new(data: Vec<T>, total_count: i64, pagination: &Pagination) -> Self {
        Self {
            data,
            total_count,
            page: pagination.page(),
            limit: pagination.limit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let pagination = Pagination::default();
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), DEFAULT_LIMIT);
        assert_eq!(pagination.skip(), 0);
    }

    #[test]
    fn test_skip_arithmetic() {
        let pagination = Pagination {
            p: Some(3),
            limit: Some(6),
        };
        assert_eq!(pagination.skip(), 12);
    }

    #[test]
    fn test_clamping() {
        let pagination = Pagination {
            p: Some(-4),
            limit: Some(1000),
        };
        assert_eq!(pagination.page(), 1);
        assert_eq!(pagination.limit(), MAX_LIMIT);

        let pagination = Pagination {
            p: Some(2),
            limit: Some(0),
        };
        assert_eq!(pagination.limit(), 1);
        assert_eq!(pagination.skip(), 1);
    }

    #[test]
    fn test_deserialize_from_query_strings() {
        let pagination: Pagination = serde_json::from_value(serde_json::json!({"p": "2", "limit": "10"})).unwrap();
        assert_eq!(pagination.skip(), 10);

        let result: Result<Pagination, _> = serde_json::from_value(serde_json::json!({"p": "abc"}));
        assert!(result.is_err());
    }
}
