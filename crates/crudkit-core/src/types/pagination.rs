//! Pagination types for list endpoints.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request parameters for paginated queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page number (1-based).
    pub page_number: u64,
    /// Number of items per page.
    pub page_size: u64,
}

impl PageRequest {
    /// Validate and build a page request. Both values must be at least 1.
    pub fn new(page_number: u64, page_size: u64) -> Result<Self, AppError> {
        if page_number < 1 {
            return Err(AppError::validation(format!(
                "Page number must be at least 1, got {page_number}"
            )));
        }
        if page_size < 1 {
            return Err(AppError::validation(format!(
                "Page size must be at least 1, got {page_size}"
            )));
        }
        Ok(Self {
            page_number,
            page_size,
        })
    }

    /// Calculate the number of rows to skip.
    pub fn offset(&self) -> u64 {
        self.page_number.saturating_sub(1).saturating_mul(self.page_size)
    }

    /// Return the window size.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

/// One page of results plus the number of matches across all pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult<T> {
    /// The items on this page.
    pub items: Vec<T>,
    /// Total number of matches, ignoring the page window.
    pub total_count: u64,
    /// Current page number (1-based).
    pub page_number: u64,
    /// Requested page size.
    pub page_size: u64,
}

impl<T> PaginatedResult<T> {
    /// Create a page from its items and the full match count.
    pub fn new(items: Vec<T>, page: PageRequest, total_count: u64) -> Self {
        Self {
            items,
            total_count,
            page_number: page.page_number,
            page_size: page.page_size,
        }
    }

    /// An empty page that keeps the requested coordinates.
    pub fn empty(page_number: u64, page_size: u64) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            page_number,
            page_size,
        }
    }

    /// Total number of pages for `total_count`.
    pub fn total_pages(&self) -> u64 {
        if self.total_count == 0 || self.page_size == 0 {
            1
        } else {
            self.total_count.div_ceil(self.page_size)
        }
    }

    /// Transform every item, dropping the page if any item fails.
    pub fn try_map<U>(self, f: impl FnMut(T) -> Option<U>) -> Option<PaginatedResult<U>> {
        let items = self.items.into_iter().map(f).collect::<Option<Vec<U>>>()?;
        Some(PaginatedResult {
            items,
            total_count: self.total_count,
            page_number: self.page_number,
            page_size: self.page_size,
        })
    }
}

impl<T> Default for PaginatedResult<T> {
    fn default() -> Self {
        Self::empty(1, 0)
    }
}
