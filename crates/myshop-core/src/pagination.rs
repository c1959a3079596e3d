//! # Pagination
//!
//! Page requests as sent by callers and the pages handed back to them.
//!
//! Callers may send anything for `page` and `page_size`, including nothing at
//! all. Values below 1 fall back to the defaults instead of failing, so a
//! listing request never errors on paging input alone.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::DEFAULT_PAGE_SIZE;

/// A normalized page request. Both fields are always ≥ 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageRequest {
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
}

impl PageRequest {
    /// Builds a request, replacing zeros with the defaults.
    pub fn new(page: u32, page_size: u32) -> Self {
        PageRequest {
            page: page.max(1),
            page_size: if page_size == 0 {
                DEFAULT_PAGE_SIZE
            } else {
                page_size
            },
        }
    }

    /// Normalizes raw caller input.
    ///
    /// ## Example
    /// ```rust
    /// use myshop_core::PageRequest;
    ///
    /// let req = PageRequest::from_params(None, Some(-3));
    /// assert_eq!((req.page, req.page_size), (1, 10));
    ///
    /// let req = PageRequest::from_params(Some(3), Some(25));
    /// assert_eq!(req.offset(), 50);
    /// ```
    pub fn from_params(page: Option<i64>, page_size: Option<i64>) -> Self {
        let page = match page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => 1,
        };
        let page_size = match page_size {
            Some(s) if s >= 1 => u32::try_from(s).unwrap_or(u32::MAX),
            _ => DEFAULT_PAGE_SIZE,
        };
        PageRequest { page, page_size }
    }

    /// Rows to skip: `(page - 1) × page_size`, saturating at `i64::MAX`.
    #[inline]
    pub fn offset(&self) -> i64 {
        (i64::from(self.page) - 1).saturating_mul(i64::from(self.page_size))
    }

    #[inline]
    pub fn limit(&self) -> i64 {
        i64::from(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the total across all pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Matching rows across every page.
    pub total: i64,
    pub page: u32,
    pub page_size: u32,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Page {
            items,
            total,
            page: request.page,
            page_size: request.page_size,
        }
    }
}
