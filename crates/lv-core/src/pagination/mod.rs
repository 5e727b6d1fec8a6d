//! Page windowing over a dynamically sized item set
//!
//! Page numbers are 1-based. Requests outside `[1, total_pages]` are clamped
//! rather than rejected; with zero items the only valid page is 1 and it is
//! empty.

use std::ops::{Range, RangeInclusive};

/// Number of page buttons shown around the current page
pub const DEFAULT_PAGE_WINDOW: usize = 5;

/// "Showing `start` to `end` of `total`" summary, 1-based and inclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    pub start: usize,
    pub end: usize,
    pub total: usize,
}

/// Pagination state for one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pager {
    page_size: usize,
    total_items: usize,
    current: usize,
}

impl Pager {
    /// Create a pager; a page size of 0 is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            total_items: 0,
            current: 1,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_items(&self) -> usize {
        self.total_items
    }

    /// Current page, 1-based
    pub fn current(&self) -> usize {
        self.current
    }

    /// `ceil(total_items / page_size)`, 0 when there are no items
    pub fn total_pages(&self) -> usize {
        self.total_items.div_ceil(self.page_size)
    }

    /// Update the item count and go back to page 1
    pub fn reset(&mut self, total_items: usize) {
        self.total_items = total_items;
        self.current = 1;
    }

    /// Clamp a requested page into the valid range
    pub fn clamp(&self, page: usize) -> usize {
        let last = self.total_pages().max(1);
        page.clamp(1, last)
    }

    /// Navigate to a page (clamped). Returns the page actually selected.
    pub fn seek_to(&mut self, page: usize) -> usize {
        self.current = self.clamp(page);
        self.current
    }

    /// Go to page 1. Returns whether the page changed.
    pub fn first(&mut self) -> bool {
        self.move_to(1)
    }

    /// Go back one page. No-op on page 1.
    pub fn previous(&mut self) -> bool {
        if self.current > 1 {
            self.move_to(self.current - 1)
        } else {
            false
        }
    }

    /// Advance one page. No-op on the last page.
    pub fn next(&mut self) -> bool {
        if self.current < self.total_pages() {
            self.move_to(self.current + 1)
        } else {
            false
        }
    }

    /// Go to the last page. Returns whether the page changed.
    pub fn last(&mut self) -> bool {
        self.move_to(self.total_pages())
    }

    fn move_to(&mut self, page: usize) -> bool {
        let before = self.current;
        self.seek_to(page);
        before != self.current
    }

    /// Item index range of `page` (clamped), suitable for slicing
    pub fn range_for(&self, page: usize) -> Range<usize> {
        let page = self.clamp(page);
        let start = ((page - 1) * self.page_size).min(self.total_items);
        let end = (page * self.page_size).min(self.total_items);
        start..end
    }

    /// Item index range of the current page
    pub fn range(&self) -> Range<usize> {
        self.range_for(self.current)
    }

    /// Page numbers to show as buttons: up to `max_visible` pages around the
    /// current one, shifted at either end. Empty when there is at most one page.
    pub fn window(&self, max_visible: usize) -> RangeInclusive<usize> {
        let total = self.total_pages();
        if total <= 1 || max_visible == 0 {
            #[allow(clippy::reversed_empty_ranges)]
            return 1..=0;
        }

        let mut start = self.current.saturating_sub(max_visible / 2).max(1);
        let end = (start + max_visible - 1).min(total);
        if end + 1 - start < max_visible {
            start = (end + 1).saturating_sub(max_visible).max(1);
        }
        start..=end
    }

    /// Showing-X-to-Y-of-Z summary for the current page
    pub fn summary(&self) -> PageSummary {
        let range = self.range();
        PageSummary {
            start: if self.total_items == 0 { 0 } else { range.start + 1 },
            end: range.end,
            total: self.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pager(page_size: usize, items: usize) -> Pager {
        let mut pager = Pager::new(page_size);
        pager.reset(items);
        pager
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(pager(25, 0).total_pages(), 0);
        assert_eq!(pager(25, 1).total_pages(), 1);
        assert_eq!(pager(25, 25).total_pages(), 1);
        assert_eq!(pager(25, 26).total_pages(), 2);
    }

    #[test]
    fn test_out_of_range_pages_are_clamped() {
        let mut p = pager(10, 35);
        assert_eq!(p.seek_to(0), 1);
        assert_eq!(p.seek_to(99), 4);
        assert_eq!(p.range(), 30..35);

        let mut empty = pager(10, 0);
        assert_eq!(empty.seek_to(3), 1);
        assert_eq!(empty.range(), 0..0);
    }

    #[test]
    fn test_step_navigation_stops_at_ends() {
        let mut p = pager(10, 25);
        assert!(!p.previous());
        assert!(p.next());
        assert!(p.next());
        assert!(!p.next());
        assert_eq!(p.current(), 3);
        assert!(p.first());
        assert!(p.last());
        assert_eq!(p.current(), 3);
    }

    #[test]
    fn test_window_shifts_at_edges() {
        let mut p = pager(1, 10);
        assert_eq!(p.window(5), 1..=5);
        p.seek_to(6);
        assert_eq!(p.window(5), 4..=8);
        p.seek_to(10);
        assert_eq!(p.window(5), 6..=10);
        assert!(pager(10, 5).window(5).is_empty());
        assert_eq!(pager(10, 25).window(5), 1..=3);
    }

    #[test]
    fn test_summary() {
        let mut p = pager(25, 60);
        p.seek_to(3);
        assert_eq!(p.summary(), PageSummary { start: 51, end: 60, total: 60 });
        assert_eq!(pager(25, 0).summary(), PageSummary { start: 0, end: 0, total: 0 });
    }
}
