//! Page selection query parameters.

use std::num::NonZeroU64;

use serde::Deserialize;

use crate::http::validation::{FieldError, FieldErrors, Validate};

pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=&page_size=` with 1-based pages.
///
/// Signed so that `page=0` and `page=-3` are reported as range errors on the
/// parameter rather than as a query parse failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageParams {
    pub page: i64,
    pub page_size: i64,
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Validate for PageParams {
    fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.page < 1 {
            errors.push(FieldError::query("page", "must be greater than or equal to 1"));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            errors.push(FieldError::query(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }
        errors.into_result()
    }
}

impl PageParams {
    /// Current page, clamped to at least 1.
    pub fn page(&self) -> u64 {
        u64::try_from(self.page).unwrap_or(0).max(1)
    }

    /// Page size, clamped into `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> NonZeroU64 {
        let size = self.page_size.clamp(1, MAX_PAGE_SIZE);
        NonZeroU64::new(u64::try_from(size).unwrap_or(1)).unwrap_or(NonZeroU64::MIN)
    }

    /// Number of items before the current page.
    pub fn offset(&self) -> u64 {
        (self.page() - 1).saturating_mul(self.page_size().get())
    }
}
