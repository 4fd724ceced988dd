//! Page/limit handling and pagination metadata

use serde::Serialize;

/// Records per page when `limit` is absent or unusable
pub const DEFAULT_LIMIT: usize = 25;

/// Largest accepted `limit`; larger values are clamped
pub const MAX_LIMIT: usize = 100;

/// One-based page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Pagination {
    /// Build from raw query values.
    ///
    /// Malformed or zero values fall back to the defaults instead of failing.
    pub fn from_raw(page: Option<&str>, limit: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(1);
        let limit = limit
            .and_then(|l| l.trim().parse::<usize>().ok())
            .filter(|l| *l > 0)
            .map(|l| l.min(MAX_LIMIT))
            .unwrap_or(DEFAULT_LIMIT);

        Self { page, limit }
    }

    /// Number of records to skip
    pub fn offset(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Next/previous page links given the total number of matches
    pub fn meta(&self, total: usize) -> PageMeta {
        let end = self.page.saturating_mul(self.limit);
        PageMeta {
            next: (end < total).then(|| PageLink {
                page: self.page + 1,
                limit: self.limit,
            }),
            prev: (self.offset() > 0).then(|| PageLink {
                page: self.page - 1,
                limit: self.limit,
            }),
        }
    }
}

/// A link to a neighbouring page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub page: usize,
    pub limit: usize,
}

/// Pagination metadata attached to list responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PageMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

impl PageMeta {
    /// Whether more pages follow this one
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_for_malformed_values() {
        assert_eq!(Pagination::from_raw(Some("abc"), Some("-3")), Pagination::default());
        assert_eq!(Pagination::from_raw(Some("0"), Some("0")), Pagination::default());
        assert_eq!(Pagination::from_raw(None, None), Pagination::default());
    }

    #[test]
    fn test_limit_is_clamped() {
        let page = Pagination::from_raw(Some("2"), Some("5000"));
        assert_eq!(page.limit, MAX_LIMIT);
        assert_eq!(page.offset(), MAX_LIMIT);
    }

    #[test]
    fn test_page_meta() {
        let first = Pagination::from_raw(Some("1"), Some("2"));
        let meta = first.meta(5);
        assert!(meta.has_more());
        assert_eq!(meta.next, Some(PageLink { page: 2, limit: 2 }));
        assert_eq!(meta.prev, None);

        let last = Pagination::from_raw(Some("3"), Some("2"));
        let meta = last.meta(5);
        assert!(!meta.has_more());
        assert_eq!(meta.prev, Some(PageLink { page: 2, limit: 2 }));
    }

    #[test]
    fn test_page_meta_serialization_skips_absent_links() {
        let json = serde_json::to_value(Pagination::default().meta(0)).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
