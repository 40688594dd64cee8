//! Sliding window of page-number buttons around the current page.

/// Buttons shown by default.
pub const DEFAULT_VISIBLE: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageButton {
    pub label: u32,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    pub buttons: Vec<PageButton>,
    pub show_previous: bool,
    pub show_next: bool,
}

impl PaginationWindow {
    /// Center a window of `visible` buttons on `page`, clamped to
    /// `[1, total_pages]`.
    ///
    /// `page` itself is not clamped: an out-of-range page still yields the
    /// window computed from it, and the caller decides what to do about it.
    /// Zero inputs are treated as 1.
    pub fn new(page: u32, total_pages: u32, visible: u32) -> Self {
        let page = page.max(1);
        let total_pages = total_pages.max(1);
        let visible = visible.max(1);

        let mut start = page.saturating_sub(visible / 2).max(1);
        let mut end = start.saturating_add(visible - 1);
        if end > total_pages {
            end = total_pages;
            start = (end + 1).saturating_sub(visible).max(1);
        }

        let buttons = (start..=end)
            .map(|label| PageButton {
                label,
                is_current: label == page,
            })
            .collect();

        Self {
            buttons,
            show_previous: page > 1,
            show_next: page < total_pages,
        }
    }

    pub fn labels(&self) -> Vec<u32> {
        self.buttons.iter().map(|b| b.label).collect()
    }

    pub fn current(&self) -> Option<u32> {
        self.buttons.iter().find(|b| b.is_current).map(|b| b.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn single_page_has_no_affordances() {
        let w = PaginationWindow::new(1, 1, 5);
        assert_eq!(w.labels(), vec![1]);
        assert!(!w.show_previous);
        assert!(!w.show_next);
        assert_eq!(w.current(), Some(1));
    }

    #[test]
    fn first_page_hides_previous() {
        let w = PaginationWindow::new(1, 10, 5);
        assert_eq!(w.labels(), vec![1, 2, 3, 4, 5]);
        assert!(!w.show_previous);
        assert!(w.show_next);
    }

    #[test]
    fn last_page_hides_next() {
        let w = PaginationWindow::new(10, 10, 5);
        assert_eq!(w.labels(), vec![6, 7, 8, 9, 10]);
        assert!(w.show_previous);
        assert!(!w.show_next);
    }

    #[test]
    fn window_clamps_near_the_end() {
        let w = PaginationWindow::new(9, 10, 5);
        assert_eq!(w.labels(), vec![6, 7, 8, 9, 10]);
        assert_eq!(w.current(), Some(9));
    }

    #[test]
    fn centered_in_the_middle() {
        let w = PaginationWindow::new(5, 10, 5);
        assert_eq!(w.labels(), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn fewer_pages_than_buttons() {
        let w = PaginationWindow::new(2, 4, 5);
        assert_eq!(w.labels(), vec![1, 2, 3, 4]);
        assert!(w.show_previous);
        assert!(w.show_next);
    }

    #[test]
    fn page_beyond_total_is_not_clamped() {
        let w = PaginationWindow::new(12, 10, 5);
        assert_eq!(w.labels(), vec![6, 7, 8, 9, 10]);
        assert_eq!(w.current(), None);
        assert!(w.show_previous);
        assert!(!w.show_next);
    }

    #[test]
    fn even_visible_count() {
        let w = PaginationWindow::new(5, 10, 4);
        assert_eq!(w.labels(), vec![3, 4, 5, 6]);
    }

    proptest! {
        #[test]
        fn window_is_full_contiguous_and_contains_page(
            (total, visible, page) in (1u32..500).prop_flat_map(|total| {
                (Just(total), 1u32..=total).prop_flat_map(|(total, visible)| {
                    (Just(total), Just(visible), 1u32..=total)
                })
            })
        ) {
            let w = PaginationWindow::new(page, total, visible);
            let labels = w.labels();
            prop_assert_eq!(labels.len() as u32, visible);
            prop_assert!(labels.contains(&page));
            prop_assert!(labels.windows(2).all(|p| p[1] == p[0] + 1));
            prop_assert!(*labels.last().unwrap() <= total);
            prop_assert!(labels[0] >= 1);
            prop_assert_eq!(w.current(), Some(page));
        }

        #[test]
        fn window_never_exceeds_total(
            page in 1u32..1000,
            total in 1u32..1000,
            visible in 1u32..20,
        ) {
            let w = PaginationWindow::new(page, total, visible);
            prop_assert_eq!(w.buttons.len() as u32, visible.min(total));
            prop_assert_eq!(w.show_previous, page > 1);
            prop_assert_eq!(w.show_next, page < total);
        }
    }
}
