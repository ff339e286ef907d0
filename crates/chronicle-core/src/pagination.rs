//! Stateless pagination over feed results.
//!
//! The page number comes fresh from the query string on every request;
//! out-of-range numbers clamp to the last page instead of erroring.

use serde::Serialize;

/// Fixed page size for every feed.
pub const PAGE_SIZE: u64 = 10;

/// One page of a paginated listing, 1-based page numbers.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub number: u64,
    pub total_pages: u64,
    pub total_items: u64,
}

impl<T> Page<T> {
    /// Clamp a requested page number into `[1, total_pages]`.
    ///
    /// Zero (absent query parameter parsed as default) maps to page 1.
    pub fn clamp_page(requested: u64, total_pages: u64) -> u64 {
        requested.max(1).min(total_pages.max(1))
    }

    /// Number of pages needed for `total_items`; an empty listing still has
    /// one (empty) page.
    pub fn count_pages(total_items: u64, page_size: u64) -> u64 {
        if total_items == 0 {
            1
        } else {
            total_items.div_ceil(page_size)
        }
    }

    /// Paginate an already-ordered, already-filtered in-memory sequence.
    pub fn from_items(all: Vec<T>, requested: u64) -> Self {
        let total_items = all.len() as u64;
        let total_pages = Self::count_pages(total_items, PAGE_SIZE);
        let number = Self::clamp_page(requested, total_pages);
        let items = all
            .into_iter()
            .skip(((number - 1) * PAGE_SIZE) as usize)
            .take(PAGE_SIZE as usize)
            .collect();

        Self {
            items,
            number,
            total_pages,
            total_items,
        }
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_five_items_make_three_pages() {
        let page = Page::from_items((0..25).collect::<Vec<_>>(), 1);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_items, 25);
        assert_eq!(page.items.len(), 10);
        assert!(page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn last_page_holds_the_remainder() {
        let page = Page::from_items((0..25).collect::<Vec<_>>(), 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items, vec![20, 21, 22, 23, 24]);
        assert!(!page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn overflowing_page_clamps_to_last_instead_of_erroring() {
        let page = Page::from_items((0..25).collect::<Vec<_>>(), 4);
        assert_eq!(page.number, 3);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn empty_listing_is_one_empty_page() {
        let page = Page::from_items(Vec::<i32>::new(), 1);
        assert_eq!(page.number, 1);
        assert_eq!(page.total_pages, 1);
        assert!(page.items.is_empty());
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn page_zero_maps_to_page_one() {
        let page = Page::from_items((0..5).collect::<Vec<_>>(), 0);
        assert_eq!(page.number, 1);
        assert_eq!(page.items.len(), 5);
    }
}
