//! Pagination state for the dashboard read path.

use crate::consts::cli_consts::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE, PAGE_WINDOW_RADIUS};

/// What the client asks for: a 1-based page and a page size.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageQuery {
    pub page: u32,
    pub page_size: u32,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        let page = page.max(1);
        // The server falls back to the default beyond its cap
        let page_size = if page_size == 0 || page_size > MAX_PAGE_SIZE {
            DEFAULT_PAGE_SIZE
        } else {
            page_size
        };
        PageQuery { page, page_size }
    }

    /// Offset of the first row on this page, used for row numbering.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        PageQuery::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// What the server reported back: the page it served and how many exist.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct PageInfo {
    pub page: u32,
    pub total_pages: u32,
}

impl PageInfo {
    pub fn new(page: u32, total_pages: u32) -> Self {
        PageInfo {
            page: page.max(1),
            total_pages: total_pages.max(1),
        }
    }

    pub fn prev(&self) -> u32 {
        self.page.saturating_sub(1).max(1)
    }

    pub fn next(&self) -> u32 {
        (self.page + 1).min(self.total_pages)
    }

    /// Page numbers for the pagination strip: the current page plus a fixed
    /// window on either side, clamped to the valid range.
    pub fn window(&self) -> Vec<u32> {
        let start = self.page.saturating_sub(PAGE_WINDOW_RADIUS).max(1);
        let end = (self.page + PAGE_WINDOW_RADIUS).min(self.total_pages);
        (start..=end).collect()
    }
}
