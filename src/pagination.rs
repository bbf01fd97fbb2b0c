//! Page arithmetic shared by the repository, the API and the controller.

use serde::Serialize;

/// Fixed number of advocates shown per page.
pub const PAGE_SIZE: usize = 6;

/// Number of pages needed to show `total` items.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Offset of the first item on the 1-based `page`.
pub fn page_offset(page: usize, page_size: usize) -> usize {
    page.saturating_sub(1).saturating_mul(page_size)
}

/// Items on the 1-based `page`; empty when the page is out of range.
pub fn slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 || page > page_count(items.len(), page_size) {
        return &[];
    }
    let start = page_offset(page, page_size);
    let end = (start + page_size).min(items.len());
    &items[start..end]
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Every page number from 1 to the page count.
    pub pages: Vec<usize>,
    pub page: usize,
    pub total: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, current_page: usize, total: usize, page_size: usize) -> Self {
        let current_page = if current_page == 0 { 1 } else { current_page };
        let pages = (1..=page_count(total, page_size)).collect();

        Self {
            items,
            pages,
            page: current_page,
            total,
        }
    }
}
