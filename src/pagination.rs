//! Fixed-size pagination over a sorted view.
//!
//! All functions here are pure; the current page lives in
//! [`ViewState`](crate::state::ViewState).

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::record::Record;
use crate::view::SortedView;

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 10;

/// Page-number buttons shown at once once the page count exceeds it.
pub const VISIBLE_PAGE_BUTTONS: usize = 5;

/// One window of table rows plus what the pager needs to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    /// 1-based page number this window was cut at
    pub page: usize,
    pub page_size: usize,
    pub total_rows: usize,
    pub total_pages: usize,
    pub visible_page_numbers: Vec<usize>,
    /// 1-based position of the first row shown ("Showing X to Y of Z")
    pub first_index: usize,
    pub last_index: usize,
}

/// `ceil(total_rows / page_size)`; zero for an empty set.
pub fn total_pages(total_rows: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total_rows.div_ceil(page_size)
}

/// Row index range `[(page-1)*size, page*size)`, clamped to the row count.
///
/// Any page past the end yields an empty window at `total_rows`.
pub fn page_window(page: usize, page_size: usize, total_rows: usize) -> Range<usize> {
    let page = page.max(1);
    let start = (page - 1).saturating_mul(page_size).min(total_rows);
    let end = page.saturating_mul(page_size).min(total_rows);
    start..end
}

/// Page numbers for the pager buttons.
///
/// All pages when there are at most five. Otherwise exactly five numbers:
/// the first five while `page <= 3`, the last five while
/// `page >= total_pages - 2`, and `page-2..=page+2` in between.
///
/// # Examples
///
/// ```
/// use evdash::pagination::visible_pages;
///
/// assert_eq!(visible_pages(1, 10), vec![1, 2, 3, 4, 5]);
/// assert_eq!(visible_pages(6, 10), vec![4, 5, 6, 7, 8]);
/// assert_eq!(visible_pages(10, 10), vec![6, 7, 8, 9, 10]);
/// assert_eq!(visible_pages(2, 3), vec![1, 2, 3]);
/// ```
pub fn visible_pages(page: usize, total_pages: usize) -> Vec<usize> {
    if total_pages <= VISIBLE_PAGE_BUTTONS {
        return (1..=total_pages).collect();
    }

    if page <= 3 {
        (1..=5).collect()
    } else if page >= total_pages - 2 {
        (total_pages - 4..=total_pages).collect()
    } else {
        (page - 2..=page + 2).collect()
    }
}

/// Page before `page`, never below 1.
pub fn previous_page(page: usize) -> usize {
    page.saturating_sub(1).max(1)
}

/// Page after `page`, never beyond `total_pages`; unchanged when there are no pages.
pub fn next_page(page: usize, total_pages: usize) -> usize {
    if total_pages == 0 {
        return page;
    }
    (page + 1).min(total_pages)
}

/// Clamp a requested page into `1..=max(total_pages, 1)`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

impl<T: Clone> Page<T> {
    /// Cut a page out of an in-memory row list.
    pub fn from_slice(rows: &[T], page: usize, page_size: usize) -> Self {
        let window = page_window(page, page_size, rows.len());
        Page::assemble(rows[window.clone()].to_vec(), window, page, page_size, rows.len())
    }
}

impl<T> Page<T> {
    fn assemble(
        rows: Vec<T>,
        window: Range<usize>,
        page: usize,
        page_size: usize,
        total_rows: usize,
    ) -> Self {
        let total = total_pages(total_rows, page_size);
        let (first_index, last_index) = if window.is_empty() {
            (0, 0)
        } else {
            (window.start + 1, window.end)
        };

        Page {
            rows,
            page,
            page_size,
            total_rows,
            total_pages: total,
            visible_page_numbers: visible_pages(page, total),
            first_index,
            last_index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Cut page `page` out of a sorted view, copying only the rows shown.
pub fn paginate(view: &SortedView, page: usize, page_size: usize) -> Page<Record> {
    let window = page_window(page, page_size, view.len());
    let rows: Vec<Record> = view
        .iter()
        .skip(window.start)
        .take(window.len())
        .cloned()
        .collect();
    Page::assemble(rows, window, page, page_size, view.len())
}
