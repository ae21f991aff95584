use serde::{Deserialize, Serialize};

use super::types::SortDirection;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;
pub const MAX_LIMIT: u32 = 100;
pub const DEFAULT_SORT_COLUMN: &str = "created_at";

/// Raw, untrusted pagination parameters as they arrive on the query string.
///
/// Everything is kept as text so that a malformed `page=abc` normalizes to a
/// default instead of rejecting the request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
    pub search: Option<String>,
}

/// Normalized pagination request.
///
/// `sort_by` is still the caller's text here; it only becomes a column once
/// `ListQuery` resolves it against an entity allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortDirection,
    pub search: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
            sort_by: DEFAULT_SORT_COLUMN.to_string(),
            sort_order: SortDirection::Desc,
            search: None,
        }
    }
}

impl From<PageQuery> for PageRequest {
    fn from(raw: PageQuery) -> Self {
        let page = match parse_number(raw.page.as_deref()) {
            Some(p) if p >= 1 => p,
            _ => DEFAULT_PAGE,
        };

        let limit = match parse_number(raw.limit.as_deref()) {
            Some(l) if l > MAX_LIMIT => MAX_LIMIT,
            Some(l) if l >= 1 => l,
            _ => DEFAULT_LIMIT,
        };

        let sort_by = raw
            .sort_by
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_SORT_COLUMN.to_string());

        let search = raw
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        Self {
            page,
            limit,
            sort_by,
            sort_order: SortDirection::parse_or_default(raw.sort_order.as_deref()),
            search,
        }
    }
}

impl PageRequest {
    /// Row offset for this page; page 1 starts at 0.
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1) * i64::from(self.limit)
    }
}

// Negative and oversized values parse as None; the caller applies the default.
fn parse_number(raw: Option<&str>) -> Option<u32> {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
}

/// Number of pages for `total_rows`, never less than one.
pub fn total_pages(total_rows: i64, limit: u32) -> i64 {
    let limit = i64::from(limit.max(1));
    if total_rows <= 0 {
        return 1;
    }
    (total_rows + limit - 1) / limit
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub total_pages: i64,
    pub total_rows: i64,
    pub limit: u32,
}

impl PageMeta {
    pub fn new(total_rows: i64, request: &PageRequest) -> Self {
        Self {
            current_page: request.page,
            total_pages: total_pages(total_rows, request.limit),
            total_rows,
            limit: request.limit,
        }
    }
}

/// One page of rows plus the unpaged row count for the same filter.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: &str, limit: &str) -> PageQuery {
        PageQuery {
            page: Some(page.to_string()),
            limit: Some(limit.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn empty_query_uses_defaults() {
        let req = PageRequest::from(PageQuery::default());
        assert_eq!(req, PageRequest::default());
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn malformed_numbers_fall_back_to_defaults() {
        let req = PageRequest::from(query("abc", "1.5"));
        assert_eq!(req.page, DEFAULT_PAGE);
        assert_eq!(req.limit, DEFAULT_LIMIT);

        let req = PageRequest::from(query("-3", "0"));
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, 10);

        let req = PageRequest::from(query("99999999999999", ""));
        assert_eq!(req.page, 1);
    }

    #[test]
    fn limit_is_clamped_to_max() {
        let req = PageRequest::from(query("2", "500"));
        assert_eq!(req.limit, MAX_LIMIT);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn offset_follows_page_and_limit() {
        for page in [1u32, 2, 7, 1000] {
            for limit in [1u32, 10, 33, 100] {
                let req = PageRequest::from(query(&page.to_string(), &limit.to_string()));
                assert_eq!(req.offset(), i64::from(page - 1) * i64::from(limit));
            }
        }
        let req = PageRequest { page: u32::MAX, limit: MAX_LIMIT, ..Default::default() };
        assert_eq!(req.offset(), (i64::from(u32::MAX) - 1) * 100);
    }

    #[test]
    fn sort_order_and_search_are_normalized() {
        let req = PageRequest::from(PageQuery {
            sort_by: Some("  name ".to_string()),
            sort_order: Some("asc".to_string()),
            search: Some("   ".to_string()),
            ..Default::default()
        });
        assert_eq!(req.sort_by, "name");
        assert_eq!(req.sort_order, SortDirection::Asc);
        assert_eq!(req.search, None);

        let req = PageRequest::from(PageQuery {
            sort_order: Some("sideways".to_string()),
            search: Some(" latte ".to_string()),
            ..Default::default()
        });
        assert_eq!(req.sort_order, SortDirection::Desc);
        assert_eq!(req.search.as_deref(), Some("latte"));
    }

    #[test]
    fn total_pages_rounds_up_with_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(250, 100), 3);
        assert_eq!(total_pages(7, 1), 7);
        for limit in 1..=100u32 {
            assert_eq!(total_pages(0, limit), 1);
        }
    }

    #[test]
    fn meta_reports_request_and_totals() {
        let req = PageRequest { page: 3, limit: 20, ..Default::default() };
        let meta = PageMeta::new(45, &req);
        assert_eq!(
            meta,
            PageMeta { current_page: 3, total_pages: 3, total_rows: 45, limit: 20 }
        );
    }
}
