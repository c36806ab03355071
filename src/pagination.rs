//! Pagination math and navigation links.
//!
//! Everything here is pure: identical inputs always give identical links.

use serde::{Deserialize, Serialize};

/// Navigation links for one page of a listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLinks {
    pub first: String,
    pub last: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub prev: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub next: Option<String>,
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    /// Replaces missing or non-positive values with safe ones.
    ///
    /// `page` falls back to 1, `page_size` to `default_size`; sizes above
    /// `max_size` are clamped.
    pub fn normalize(
        page: Option<i64>,
        page_size: Option<i64>,
        default_size: u64,
        max_size: u64,
    ) -> Self {
        let max_size = max_size.max(1);
        let page = page.filter(|p| *p >= 1).map(|p| p as u64).unwrap_or(1);
        let page_size = page_size
            .filter(|s| *s >= 1)
            .map(|s| s as u64)
            .unwrap_or(default_size.max(1))
            .min(max_size);
        Self { page, page_size }
    }

    /// Rows skipped before this page begins.
    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

/// `ceil(total_count / page_size)`, never less than 1.
pub fn total_pages(total_count: u64, page_size: u64) -> u64 {
    let page_size = page_size.max(1);
    total_count.div_ceil(page_size).max(1)
}

/// Builds first/last/prev/next links for `current_page`.
pub fn build_links(base: &str, current_page: u64, page_size: u64, total_count: u64) -> PageLinks {
    let last = total_pages(total_count, page_size);
    let link = |page: u64| format!("{}?page={}&pageSize={}", base, page, page_size);

    PageLinks {
        first: link(1),
        last: link(last),
        prev: (current_page > 1).then(|| link(current_page - 1)),
        next: (current_page < last).then(|| link(current_page + 1)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_defaults() {
        let req = PageRequest::normalize(None, None, 10, 100);
        assert_eq!(req, PageRequest { page: 1, page_size: 10 });
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_normalize_rejects_zero_and_negative() {
        let req = PageRequest::normalize(Some(0), Some(-5), 10, 100);
        assert_eq!(req, PageRequest { page: 1, page_size: 10 });

        let req = PageRequest::normalize(Some(-3), Some(0), 25, 100);
        assert_eq!(req, PageRequest { page: 1, page_size: 25 });
    }

    #[test]
    fn test_normalize_clamps_size() {
        let req = PageRequest::normalize(Some(2), Some(5_000), 10, 100);
        assert_eq!(req.page_size, 100);
        assert_eq!(req.offset(), 100);
    }

    #[test]
    fn test_total_pages_empty_listing() {
        assert_eq!(total_pages(0, 10), 1);
    }

    #[test]
    fn test_middle_page_links() {
        let links = build_links("/users", 2, 10, 25);
        assert_eq!(links.first, "/users?page=1&pageSize=10");
        assert_eq!(links.last, "/users?page=3&pageSize=10");
        assert_eq!(links.prev.as_deref(), Some("/users?page=1&pageSize=10"));
        assert_eq!(links.next.as_deref(), Some("/users?page=3&pageSize=10"));
    }

    #[test]
    fn test_single_page_has_no_neighbours() {
        let links = build_links("/users", 1, 10, 0);
        assert_eq!(links.first, links.last);
        assert!(links.prev.is_none());
        assert!(links.next.is_none());
    }

    #[test]
    fn test_absent_links_are_not_serialized() {
        let json = serde_json::to_value(build_links("/users", 1, 10, 5)).unwrap();
        assert!(json.get("prev").is_none());
        assert!(json.get("next").is_none());
    }

    proptest! {
        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..100_000, size in 1u64..500) {
            let pages = total_pages(total, size);
            prop_assert!(pages >= 1);
            if total > 0 {
                prop_assert_eq!(pages, (total + size - 1) / size);
                prop_assert!((pages - 1) * size < total && total <= pages * size);
            }
        }

        #[test]
        fn prop_prev_and_next_bounds(total in 0u64..10_000, size in 1u64..100, page_seed in 0u64..1_000) {
            let last = total_pages(total, size);
            let page = page_seed % last + 1;
            let links = build_links("/users", page, size, total);

            prop_assert_eq!(links.prev.is_some(), page > 1);
            prop_assert_eq!(links.next.is_some(), page < last);
            if page == last {
                prop_assert!(links.next.is_none());
            }
        }

        #[test]
        fn prop_normalized_request_is_valid(page in any::<Option<i64>>(), size in any::<Option<i64>>()) {
            let req = PageRequest::normalize(page, size, 10, 100);
            prop_assert!(req.page >= 1);
            prop_assert!(req.page_size >= 1 && req.page_size <= 100);
        }
    }
}
