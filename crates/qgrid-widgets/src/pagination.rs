#![forbid(unsafe_code)]

//! Page cursor and page slicing.
//!
//! Pages are 1-based. `items_per_page` is at least 1; a zero passed in by a
//! caller is treated as 1. There is always at least one page, even for an
//! empty collection, so the page range is never `[1, 0]`.

use serde::{Deserialize, Serialize};

/// Page size used when a screen does not configure one.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;

/// Number of pages needed for `filtered_count` records: `max(1, ceil(n / per))`.
#[inline]
pub fn total_pages(filtered_count: usize, items_per_page: usize) -> usize {
    filtered_count.div_ceil(items_per_page.max(1)).max(1)
}

/// Clamp `current_page` into `[1, total_pages(filtered_count, items_per_page)]`.
#[inline]
pub fn clamp_page(current_page: usize, filtered_count: usize, items_per_page: usize) -> usize {
    current_page.clamp(1, total_pages(filtered_count, items_per_page))
}

/// The records of page `current_page`: `[(page-1)*per, page*per)` clamped to bounds.
///
/// A page past the end yields an empty slice.
pub fn paginate<T>(records: &[T], current_page: usize, items_per_page: usize) -> &[T] {
    let (start, end) = bounds(records.len(), current_page, items_per_page);
    &records[start..end]
}

fn bounds(len: usize, current_page: usize, items_per_page: usize) -> (usize, usize) {
    let per = items_per_page.max(1);
    let start = current_page.max(1).saturating_sub(1).saturating_mul(per);
    if start >= len {
        return (len, len);
    }
    (start, start.saturating_add(per).min(len))
}

/// Build the outbound page view from an already-filtered record list.
pub fn page_of<'a, T>(filtered: &[&'a T], current_page: usize, items_per_page: usize) -> Page<'a, T> {
    let (start, end) = bounds(filtered.len(), current_page, items_per_page);
    Page {
        rows: filtered[start..end].to_vec(),
        current_page: current_page.max(1),
        total_pages: total_pages(filtered.len(), items_per_page),
        filtered_count: filtered.len(),
        start,
        end,
    }
}

/// A table's position in its filtered record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    current_page: usize,
    items_per_page: usize,
}

impl Default for PageCursor {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}

impl PageCursor {
    /// Cursor at page 1.
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    /// Current 1-based page.
    pub const fn current_page(&self) -> usize {
        self.current_page
    }

    /// Page size.
    pub const fn items_per_page(&self) -> usize {
        self.items_per_page
    }

    /// Change the page size and go back to page 1.
    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.items_per_page = items_per_page.max(1);
        self.current_page = 1;
    }

    /// Jump to `page` (at least 1; the upper bound is applied by [`Self::clamp`]).
    pub fn set_page(&mut self, page: usize) {
        self.current_page = page.max(1);
    }

    /// Back to page 1.
    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Advance one page if not already on the last. Returns `true` if it moved.
    pub fn next_page(&mut self, filtered_count: usize) -> bool {
        if self.current_page < total_pages(filtered_count, self.items_per_page) {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Go back one page if not already on the first. Returns `true` if it moved.
    pub fn prev_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// Jump to the last page for `filtered_count` records.
    pub fn last_page(&mut self, filtered_count: usize) {
        self.current_page = total_pages(filtered_count, self.items_per_page);
    }

    /// Pull the cursor back into range after the filtered set changed size.
    ///
    /// Returns `true` if the page changed.
    pub fn clamp(&mut self, filtered_count: usize) -> bool {
        let clamped = clamp_page(self.current_page, filtered_count, self.items_per_page);
        if clamped == self.current_page {
            return false;
        }
        crate::debug!(
            from = self.current_page,
            to = clamped,
            filtered_count,
            "pagination.clamp"
        );
        self.current_page = clamped;
        true
    }
}

/// One rendered page: the `(pagedRecords, totalPages, currentPage)` triple and
/// the numbers behind the "Showing X to Y of Z" footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<'a, T> {
    /// Records on this page.
    pub rows: Vec<&'a T>,
    /// 1-based page number.
    pub current_page: usize,
    /// Total page count, at least 1.
    pub total_pages: usize,
    /// Size of the filtered set.
    pub filtered_count: usize,
    /// Index of the first row within the filtered set.
    pub start: usize,
    /// One past the index of the last row within the filtered set.
    pub end: usize,
}

impl<T> Page<'_, T> {
    /// Whether the page has no rows (render the empty state).
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of rows on this page.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether a previous page exists.
    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    /// Whether a next page exists.
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Footer text.
    pub fn summary(&self) -> String {
        if self.filtered_count == 0 {
            return "No matching entries".to_owned();
        }
        if self.start >= self.end {
            return format!("Showing 0 of {} entries", self.filtered_count);
        }
        format!(
            "Showing {} to {} of {} entries",
            self.start + 1,
            self.end,
            self.filtered_count
        )
    }

    /// Numbered page buttons for this page; see [`page_window`].
    pub fn window(&self, max_buttons: usize) -> Vec<PageItem> {
        page_window(self.current_page, self.total_pages, max_buttons)
    }
}

/// One entry of a pagination button strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    /// A numbered page button.
    Page(usize),
    /// A gap between numbered buttons.
    Ellipsis,
}

/// Numbered buttons around `current`, always including the first and last page.
///
/// At most `max_buttons` numbered entries are produced (minimum 3), with
/// [`PageItem::Ellipsis`] marking skipped ranges.
pub fn page_window(current: usize, total: usize, max_buttons: usize) -> Vec<PageItem> {
    let total = total.max(1);
    let current = current.clamp(1, total);
    let max_buttons = max_buttons.max(3);
    if total <= max_buttons {
        return (1..=total).map(PageItem::Page).collect();
    }

    let inner = max_buttons - 2;
    let start = current.saturating_sub(inner / 2).clamp(2, total - inner);
    let end = start + inner - 1;

    let mut items = Vec::with_capacity(max_buttons + 2);
    items.push(PageItem::Page(1));
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}
