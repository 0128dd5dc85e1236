//! Pagination shared by every listing endpoint

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
};

/// Raw `page` / `limit` query parameters
#[derive(Debug, Default, Clone, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Results per page
    pub limit: Option<i64>,
}

impl PageQuery {
    pub fn resolve(&self, config: &PaginationConfig) -> AppResult<PageRequest> {
        PageRequest::new(
            self.page.unwrap_or(1),
            self.limit.unwrap_or(config.default_limit).min(config.max_limit),
        )
    }
}

/// Validated page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> AppResult<Self> {
        if page < 1 {
            return Err(AppError::Validation("page must be >= 1".to_string()));
        }
        if limit < 1 {
            return Err(AppError::Validation("limit must be > 0".to_string()));
        }
        // The row offset must stay representable for both stores
        if (page - 1).checked_mul(limit).is_none() {
            return Err(AppError::Validation("page is out of range".to_string()));
        }
        Ok(Self { page, limit })
    }

    pub fn offset(&self) -> i64 {
        // Checked in `new`
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Cut this page out of an already ordered list
    pub fn slice<T>(&self, rows: Vec<T>) -> Vec<T> {
        rows.into_iter()
            .skip(usize::try_from(self.offset()).unwrap_or(usize::MAX))
            .take(self.limit as usize)
            .collect()
    }
}

/// Pagination metadata returned alongside every page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub total: i64,
    pub page: i64,
    pub total_pages: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PageMeta {
    pub fn new(total: i64, request: &PageRequest) -> Self {
        let total_pages = (total + request.limit - 1) / request.limit;
        Self {
            total,
            page: request.page,
            total_pages,
            has_next_page: request.page < total_pages,
            has_prev_page: request.page > 1,
        }
    }
}
