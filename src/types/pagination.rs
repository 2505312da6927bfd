//! Pagination query parameters and response envelope.

use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_PAGE_NUMBER, DEFAULT_PAGE_SIZE};

/// Query-string pagination parameters, 1-indexed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaginationParams {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl PaginationParams {
    /// Requested page number, defaulted and clamped to >= 1.
    pub fn page_number(&self) -> i64 {
        self.page.unwrap_or(DEFAULT_PAGE_NUMBER).max(1)
    }

    /// Requested page size, defaulted and clamped to >= 0.
    pub fn page_size(&self) -> i64 {
        self.per_page.unwrap_or(DEFAULT_PAGE_SIZE).max(0)
    }
}

/// One page of results plus the shape of the whole collection.
#[derive(Debug, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub page: i64,
    pub per_page: i64,
    pub total: u64,
}
