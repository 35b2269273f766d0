//! Pagination utilities
//!
//! Provides a simple `Pagination` struct, helpers to normalize inputs and an
//! in-memory `Page` slice for listings that are already loaded.

use serde::{Deserialize, Serialize};

pub const MAX_PER_PAGE: u32 = 100;

/// Pagination parameters
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// 1-based page index
    pub page: u32,
    /// items per page
    pub per_page: u32,
}

impl Pagination {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    /// Clamp to sane defaults and return `(zero_based_page, per_page)`
    pub fn normalize(self) -> (u64, u64) {
        let page = if self.page == 0 { 1 } else { self.page };
        let per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        ((page - 1) as u64, per_page as u64)
    }

    /// Number of pages needed for `total` items; zero when there are none.
    pub fn total_pages(self, total: usize) -> u32 {
        let (_, per_page) = self.normalize();
        total.div_ceil(per_page as usize) as u32
    }
}

impl Default for Pagination {
    fn default() -> Self { Self { page: 1, per_page: 20 } }
}

/// One page of an in-memory listing.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub per_page: u32,
    pub total: usize,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool { self.page < self.total_pages }

    pub fn has_prev(&self) -> bool { self.page > 1 }
}

/// Slice `items` to the requested page. Pages past the end come back empty.
pub fn paginate<T: Clone>(items: &[T], opts: Pagination) -> Page<T> {
    let (page_idx, per_page) = opts.normalize();
    let start = (page_idx * per_page) as usize;
    let slice = if start >= items.len() {
        Vec::new()
    } else {
        let end = (start + per_page as usize).min(items.len());
        items[start..end].to_vec()
    };
    Page {
        items: slice,
        page: page_idx as u32 + 1,
        per_page: per_page as u32,
        total: items.len(),
        total_pages: opts.total_pages(items.len()),
    }
}
