//! Page math for the table view: item range and the page-number window.

/// Neighbors shown on each side of the current page.
const DELTA: usize = 2;

/// Page sizes offered by the page-size selector.
pub const PAGE_SIZES: [usize; 5] = [10, 100, 200, 500, 1000];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageToken {
    Page(usize),
    Ellipsis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub total_items: usize,
    /// 1-based first item on the page (0 when there are no items).
    pub start_item: usize,
    /// 1-based last item on the page.
    pub end_item: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Zero-based item offset of the current page.
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

/// `ceil(total_items / page_size)`, never less than 1.
pub fn total_pages(total_items: usize, page_size: usize) -> usize {
    let page_size = page_size.max(1);
    total_items.div_ceil(page_size).max(1)
}

/// Item range for `current_page`, which is clamped into `[1, total_pages]`.
pub fn page_info(current_page: usize, page_size: usize, total_items: usize) -> PageInfo {
    let page_size = page_size.max(1);
    let total_pages = total_pages(total_items, page_size);
    let current_page = current_page.clamp(1, total_pages);
    let start_item = if total_items == 0 {
        0
    } else {
        (current_page - 1) * page_size + 1
    };
    PageInfo {
        current_page,
        total_pages,
        page_size,
        total_items,
        start_item,
        end_item: (current_page * page_size).min(total_items),
    }
}

/// Page-number window: first and last page always, up to two neighbors
/// around the current page, an ellipsis where a gap is skipped. Empty
/// when there is only one page.
pub fn visible_pages(current_page: usize, total_pages: usize) -> Vec<PageToken> {
    if total_pages <= 1 {
        return Vec::new();
    }
    let current = current_page.clamp(1, total_pages);

    let mut window = vec![PageToken::Page(1)];
    if current > DELTA + 2 {
        window.push(PageToken::Ellipsis);
    }

    let first = current.saturating_sub(DELTA).max(2);
    let last = (current + DELTA).min(total_pages - 1);
    window.extend((first..=last).map(PageToken::Page));

    if current + DELTA < total_pages - 1 {
        window.push(PageToken::Ellipsis);
    }
    window.push(PageToken::Page(total_pages));
    window
}

/// Next entry of [`PAGE_SIZES`] after `current`, wrapping around.
pub fn next_page_size(current: usize) -> usize {
    PAGE_SIZES
        .iter()
        .copied()
        .find(|&s| s > current)
        .unwrap_or(PAGE_SIZES[0])
}

#[cfg(test)]
mod tests {
    use super::PageToken::{Ellipsis, Page};
    use super::*;

    #[test]
    fn total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(95, 10), 10);
    }

    #[test]
    fn page_info_range() {
        let info = page_info(5, 10, 95);
        assert_eq!(info.total_pages, 10);
        assert_eq!(info.start_item, 41);
        assert_eq!(info.end_item, 50);

        let last = page_info(10, 10, 95);
        assert_eq!(last.start_item, 91);
        assert_eq!(last.end_item, 95);
        assert!(!last.has_next());
        assert!(last.has_previous());
    }

    #[test]
    fn page_info_clamps_out_of_range_pages() {
        assert_eq!(page_info(0, 10, 95).current_page, 1);
        assert_eq!(page_info(99, 10, 95).current_page, 10);
        let empty = page_info(1, 10, 0);
        assert_eq!((empty.start_item, empty.end_item), (0, 0));
    }

    #[test]
    fn window_middle_page_has_both_ellipses() {
        assert_eq!(
            visible_pages(5, 10),
            vec![Page(1), Ellipsis, Page(3), Page(4), Page(5), Page(6), Page(7), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn window_near_start() {
        assert_eq!(
            visible_pages(1, 10),
            vec![Page(1), Page(2), Page(3), Ellipsis, Page(10)]
        );
        assert_eq!(
            visible_pages(4, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
    }

    #[test]
    fn window_near_end() {
        assert_eq!(
            visible_pages(10, 10),
            vec![Page(1), Ellipsis, Page(8), Page(9), Page(10)]
        );
        assert_eq!(
            visible_pages(7, 10),
            vec![Page(1), Ellipsis, Page(5), Page(6), Page(7), Page(8), Page(9), Page(10)]
        );
    }

    #[test]
    fn window_small_totals() {
        assert!(visible_pages(1, 1).is_empty());
        assert!(visible_pages(1, 0).is_empty());
        assert_eq!(visible_pages(1, 2), vec![Page(1), Page(2)]);
        assert_eq!(visible_pages(2, 3), vec![Page(1), Page(2), Page(3)]);
    }

    #[test]
    fn window_invariants_hold_for_all_positions() {
        for total in 2..=30 {
            for current in 1..=total {
                let window = visible_pages(current, total);
                let pages: Vec<usize> = window
                    .iter()
                    .filter_map(|t| match t {
                        Page(n) => Some(*n),
                        Ellipsis => None,
                    })
                    .collect();
                assert_eq!(pages.iter().filter(|&&p| p == 1).count(), 1);
                assert_eq!(pages.iter().filter(|&&p| p == total).count(), 1);
                assert!(pages.windows(2).all(|w| w[0] < w[1]), "{window:?}");
                assert!(pages.contains(&current));
                let ellipses = window.iter().filter(|t| **t == Ellipsis).count();
                assert!(ellipses <= 2);
                assert_ne!(window.first(), Some(&Ellipsis));
                assert_ne!(window.last(), Some(&Ellipsis));
            }
        }
    }

    #[test]
    fn out_of_range_current_is_clamped() {
        assert_eq!(visible_pages(0, 3), visible_pages(1, 3));
        assert_eq!(visible_pages(40, 10), visible_pages(10, 10));
    }

    #[test]
    fn page_sizes_cycle() {
        assert_eq!(next_page_size(10), 100);
        assert_eq!(next_page_size(500), 1000);
        assert_eq!(next_page_size(1000), 10);
        assert_eq!(next_page_size(25), 100);
    }
}
