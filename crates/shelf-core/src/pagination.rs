//! Pagination types for list loaders
//!
//! Query keys follow the page URLs: `?page=2&per_page=8&s=drill`.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: i64 = 8;
pub const MAX_PER_PAGE: i64 = 100;
/// Highest page number accepted; keeps `offset` within `i64`
pub const MAX_PAGE: i64 = i64::MAX / MAX_PER_PAGE;

/// Raw query string values. Parsed leniently: garbage falls back to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
    pub s: Option<String>,
}

/// Normalized pagination parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageParams {
    /// Page number (1-indexed)
    pub page: i64,
    /// Items per page
    pub per_page: i64,
    /// Free-text search, `None` when blank
    pub search: Option<String>,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: DEFAULT_PER_PAGE,
            search: None,
        }
    }
}

impl PageParams {
    pub fn new(page: i64, per_page: i64, search: Option<String>) -> Self {
        Self {
            page: page.clamp(1, MAX_PAGE),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
            search: search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Calculate the SQL offset
    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    /// Calculate the SQL limit
    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

impl From<PageQuery> for PageParams {
    fn from(query: PageQuery) -> Self {
        let page = query
            .page
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(1);
        let per_page = query
            .per_page
            .and_then(|p| p.trim().parse().ok())
            .unwrap_or(DEFAULT_PER_PAGE);
        Self::new(page, per_page, query.s)
    }
}

/// Totals and relative prev/next links for a paginated page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    /// Empty string when there is no previous page
    pub prev: String,
    /// Empty string when there is no next page
    pub next: String,
}

impl PageMeta {
    pub fn new(params: &PageParams, total_items: i64) -> Self {
        let total_pages = if total_items <= 0 {
            0
        } else {
            (total_items + params.per_page - 1) / params.per_page
        };

        let prev = if params.page > 1 {
            page_href(params.page - 1, params.search.as_deref())
        } else {
            String::new()
        };

        let next = if params.page < total_pages {
            page_href(params.page + 1, params.search.as_deref())
        } else {
            String::new()
        };

        Self {
            page: params.page,
            per_page: params.per_page,
            total_items,
            total_pages,
            prev,
            next,
        }
    }
}

fn page_href(page: i64, search: Option<&str>) -> String {
    match search {
        Some(search) => {
            let encoded: String = url::form_urlencoded::byte_serialize(search.as_bytes()).collect();
            format!("?page={}&s={}", page, encoded)
        }
        None => format!("?page={}", page),
    }
}

/// Page title with the application name appended
pub fn append_to_meta_title(title: Option<&str>, app_title: &str) -> String {
    match title.map(str::trim).filter(|t| !t.is_empty()) {
        Some(title) => format!("{} | {}", title, app_title),
        None => app_title.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_params_from_query() {
        let params = PageParams::from(PageQuery {
            page: Some("3".into()),
            per_page: Some("20".into()),
            s: Some("  drill ".into()),
        });

        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 20);
        assert_eq!(params.search.as_deref(), Some("drill"));
        assert_eq!(params.offset(), 40);
        assert_eq!(params.limit(), 20);
    }

    #[test]
    fn test_page_params_lenient_defaults() {
        let params = PageParams::from(PageQuery {
            page: Some("abc".into()),
            per_page: Some("0".into()),
            s: Some("   ".into()),
        });

        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);
        assert_eq!(params.search, None);
    }

    #[test]
    fn test_huge_page_is_clamped() {
        let params = PageParams::from(PageQuery {
            page: Some(i64::MAX.to_string()),
            per_page: Some("100".into()),
            s: None,
        });

        assert_eq!(params.page, MAX_PAGE);
        assert!(params.offset() > 0);

        let meta = PageMeta::new(&params, 3);
        assert_eq!(meta.prev, format!("?page={}", MAX_PAGE - 1));
        assert!(meta.next.is_empty());
    }

    #[test]
    fn test_page_meta_middle_page() {
        let params = PageParams::new(2, 8, None);
        let meta = PageMeta::new(&params, 20);

        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.prev, "?page=1");
        assert_eq!(meta.next, "?page=3");
    }

    #[test]
    fn test_page_meta_edges() {
        let first = PageMeta::new(&PageParams::new(1, 8, None), 8);
        assert_eq!(first.total_pages, 1);
        assert!(first.prev.is_empty());
        assert!(first.next.is_empty());

        let empty = PageMeta::new(&PageParams::default(), 0);
        assert_eq!(empty.total_pages, 0);
        assert!(empty.next.is_empty());
    }

    #[test]
    fn test_page_meta_keeps_search() {
        let params = PageParams::new(2, 1, Some("power drill".into()));
        let meta = PageMeta::new(&params, 5);

        assert_eq!(meta.prev, "?page=1&s=power+drill");
        assert_eq!(meta.next, "?page=3&s=power+drill");
    }

    #[test]
    fn test_append_to_meta_title() {
        assert_eq!(append_to_meta_title(Some("Garage"), "shelf.nu"), "Garage | shelf.nu");
        assert_eq!(append_to_meta_title(None, "shelf.nu"), "shelf.nu");
        assert_eq!(append_to_meta_title(Some(" "), "shelf.nu"), "shelf.nu");
    }
}
