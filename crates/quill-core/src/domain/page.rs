//! Offset pagination over filtered listings.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Largest offset a storage backend can bind as a signed 64-bit integer.
const MAX_INDEX: u64 = i64::MAX as u64;

/// A 1-based page window. Both fields are always at least 1 and
/// `page * limit` never exceeds `i64::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageRequest {
    page: u64,
    limit: u64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageRequest {
    /// Build a window, replacing zero values with the defaults. A window whose
    /// end lies beyond `i64::MAX` falls back to the default window.
    pub fn new(page: u64, limit: u64) -> Self {
        let page = if page == 0 { DEFAULT_PAGE } else { page };
        let limit = if limit == 0 { DEFAULT_LIMIT } else { limit };

        match page.checked_mul(limit) {
            Some(end) if end <= MAX_INDEX => Self { page, limit },
            _ => Self::default(),
        }
    }

    /// Lenient parse of raw query-string values. Anything missing, malformed,
    /// zero or negative falls back to the default for that field.
    pub fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        fn positive(raw: Option<&str>) -> u64 {
            raw.and_then(|s| s.trim().parse::<u64>().ok()).unwrap_or(0)
        }
        Self::new(positive(page), positive(limit))
    }

    pub fn page(&self) -> u64 {
        self.page
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Offset of the first item on this page.
    pub fn start_index(&self) -> u64 {
        (self.page - 1) * self.limit
    }

    /// Offset one past the last item on this page.
    pub fn end_index(&self) -> u64 {
        self.page * self.limit
    }

    /// Neighbouring page links for a listing with `total` matching items.
    pub fn links(&self, total: u64) -> Pagination {
        let next = (self.end_index() < total).then(|| PageLink {
            page: self.page + 1,
            limit: self.limit,
        });
        let prev = (self.start_index() > 0).then(|| PageLink {
            page: self.page - 1,
            limit: self.limit,
        });
        Pagination { next, prev }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: u64,
    pub limit: u64,
}

/// Links to the adjacent pages, each present only if that page exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

/// One page of a filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Count of all matching items, independent of the window.
    pub total: u64,
    pub pagination: Pagination,
}
