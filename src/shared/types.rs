use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::shared::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
}

// =============================================================================
// PAGINATION
// =============================================================================

/// Standard pagination query parameters for list endpoints.
///
/// Filter queries carry their own `page`/`page_size` fields (query strings do
/// not mix well with `#[serde(flatten)]`) and convert with `pagination()`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct PaginationQuery {
    /// Page number (1-indexed, default: 1)
    #[serde(default = "default_page")]
    #[param(minimum = 1)]
    pub page: i64,

    /// Number of items per page (default: 10, max: 100)
    #[serde(default = "default_page_size")]
    #[param(minimum = 1, maximum = 100)]
    pub page_size: i64,
}

pub fn default_page() -> i64 {
    1
}

pub fn default_page_size() -> i64 {
    DEFAULT_PAGE_SIZE
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PaginationQuery {
    pub fn new(page: i64, page_size: i64) -> Self {
        Self { page, page_size }
    }

    /// Calculate SQL OFFSET from page number, saturating for absurd pages
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1).saturating_mul(self.limit())
    }

    /// Get clamped page_size (respects MAX_PAGE_SIZE)
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    /// Success response for a page of results
    pub fn paged(items: T, total: i64) -> Self {
        Self::success(Some(items), None, Some(Meta { total }))
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

/// Normalise an optional free-text filter into an ILIKE pattern
pub fn search_pattern(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| format!("%{}%", s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_offset_and_clamp() {
        let p = PaginationQuery::new(3, 20);
        assert_eq!(p.limit(), 20);
        assert_eq!(p.offset(), 40);

        let p = PaginationQuery::new(0, 1000);
        assert_eq!(p.limit(), MAX_PAGE_SIZE);
        assert_eq!(p.offset(), 0);

        let p = PaginationQuery::new(2, 0);
        assert_eq!(p.limit(), 1);
        assert_eq!(p.offset(), 1);
    }

    #[test]
    fn test_pagination_offset_does_not_overflow() {
        let p = PaginationQuery::new(i64::MAX, 100);
        assert_eq!(p.offset(), i64::MAX);

        let p = PaginationQuery::new(i64::MIN, 100);
        assert_eq!(p.offset(), 0);
    }

    #[test]
    fn test_search_pattern() {
        assert_eq!(search_pattern(None), None);
        assert_eq!(search_pattern(Some("   ")), None);
        assert_eq!(search_pattern(Some(" acme ")), Some("%acme%".to_string()));
        assert_eq!(search_pattern(Some("50%_off")), Some("%50\\%\\_off%".to_string()));
    }
}
