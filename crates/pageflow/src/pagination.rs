#![forbid(unsafe_code)]

//! Derivation of the truncated pagination-control descriptor list.
//!
//! The list is bounded by the *furthest page reached*, not the dataset
//! size: pages the user has never scrolled to are not offered as numbered
//! links. The truncation tie-breaks (`<= 7` pages untruncated, head run
//! through page 5, tail run from `total - 4`, otherwise one page either
//! side of current) are fixed constants of the control's layout and are
//! not derived from the window configuration.

/// One pagination control, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationItem {
    /// Step back one page. Always emitted first.
    Prev {
        /// Page to go to.
        target: u32,
        /// Whether stepping back is possible.
        disabled: bool,
    },
    /// A numbered page link.
    Page {
        /// The page the link targets.
        page: u32,
        /// Exactly one emitted item carries `true`.
        is_current: bool,
    },
    /// A gap in the numbered links.
    Ellipsis,
    /// Step forward one page. Always emitted last.
    Next {
        /// Page to go to.
        target: u32,
        /// Whether stepping forward is possible.
        disabled: bool,
    },
}

/// Build the descriptor list for `current_page` out of the pages reached
/// so far. Empty when nothing has been reached.
#[must_use]
pub fn pagination_items(current_page: u32, max_accessible_page: u32) -> Vec<PaginationItem> {
    let total = max_accessible_page;
    if total < 1 {
        return Vec::new();
    }
    let current = current_page.clamp(1, total);

    let mut items = Vec::with_capacity(11);
    items.push(PaginationItem::Prev {
        target: current.saturating_sub(1).max(1),
        disabled: current <= 1,
    });

    let mut page = |items: &mut Vec<PaginationItem>, p: u32| {
        items.push(PaginationItem::Page {
            page: p,
            is_current: p == current,
        });
    };

    if total <= 7 {
        for p in 1..=total {
            page(&mut items, p);
        }
    } else if current <= 4 {
        for p in 1..=5 {
            page(&mut items, p);
        }
        items.push(PaginationItem::Ellipsis);
        page(&mut items, total);
    } else if current >= total - 3 {
        page(&mut items, 1);
        items.push(PaginationItem::Ellipsis);
        for p in total - 4..=total {
            page(&mut items, p);
        }
    } else {
        page(&mut items, 1);
        items.push(PaginationItem::Ellipsis);
        for p in current - 1..=current + 1 {
            page(&mut items, p);
        }
        items.push(PaginationItem::Ellipsis);
        page(&mut items, total);
    }

    items.push(PaginationItem::Next {
        target: (current + 1).min(total),
        disabled: current >= total,
    });
    items
}

#[cfg(test)]
mod tests {
    use super::PaginationItem::{Ellipsis, Next, Page, Prev};
    use super::*;

    #[test]
    fn small_total_is_untruncated() {
        assert_eq!(
            pagination_items(1, 3),
            vec![
                Prev {
                    target: 1,
                    disabled: true
                },
                Page {
                    page: 1,
                    is_current: true
                },
                Page {
                    page: 2,
                    is_current: false
                },
                Page {
                    page: 3,
                    is_current: false
                },
                Next {
                    target: 2,
                    disabled: false
                },
            ]
        );
    }

    #[test]
    fn middle_current_gets_dual_ellipsis() {
        assert_eq!(
            pagination_items(5, 20),
            vec![
                Prev {
                    target: 4,
                    disabled: false
                },
                Page {
                    page: 1,
                    is_current: false
                },
                Ellipsis,
                Page {
                    page: 4,
                    is_current: false
                },
                Page {
                    page: 5,
                    is_current: true
                },
                Page {
                    page: 6,
                    is_current: false
                },
                Ellipsis,
                Page {
                    page: 20,
                    is_current: false
                },
                Next {
                    target: 6,
                    disabled: false
                },
            ]
        );
    }

    #[test]
    fn nothing_reached_is_empty() {
        assert_eq!(pagination_items(1, 0), Vec::new());
    }

    #[test]
    fn head_run_through_page_five() {
        // current <= 4 on a long list: 1..5, gap, total.
        let items = pagination_items(4, 20);
        let pages: Vec<u32> = numbered(&items);
        assert_eq!(pages, vec![1, 2, 3, 4, 5, 20]);
        assert_eq!(ellipses(&items), 1);
    }

    #[test]
    fn tail_run_from_total_minus_four() {
        let items = pagination_items(18, 20);
        let pages: Vec<u32> = numbered(&items);
        assert_eq!(pages, vec![1, 16, 17, 18, 19, 20]);
        assert_eq!(ellipses(&items), 1);
    }

    #[test]
    fn boundary_between_head_and_middle() {
        // current = 5 is the first middle layout on total >= 9.
        assert_eq!(numbered(&pagination_items(5, 9)), vec![1, 4, 5, 6, 9]);
        // current = 4 still uses the head run.
        assert_eq!(numbered(&pagination_items(4, 9)), vec![1, 2, 3, 4, 5, 9]);
    }

    #[test]
    fn boundary_between_middle_and_tail() {
        // total = 20: current 17 is tail (17 >= 16), current 16 is middle.
        assert_eq!(
            numbered(&pagination_items(17, 20)),
            vec![1, 16, 17, 18, 19, 20]
        );
        assert_eq!(
            numbered(&pagination_items(16, 20)),
            vec![1, 15, 16, 17, 20]
        );
    }

    #[test]
    fn seven_pages_untruncated_eight_truncated() {
        assert_eq!(numbered(&pagination_items(1, 7)), vec![1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(ellipses(&pagination_items(1, 7)), 0);
        assert_eq!(numbered(&pagination_items(1, 8)), vec![1, 2, 3, 4, 5, 8]);
        assert_eq!(ellipses(&pagination_items(1, 8)), 1);
    }

    #[test]
    fn current_out_of_range_is_clamped() {
        // current beyond the reached pages clamps to the last one.
        let items = pagination_items(50, 6);
        let current: Vec<u32> = items
            .iter()
            .filter_map(|i| match i {
                Page {
                    page,
                    is_current: true,
                } => Some(*page),
                _ => None,
            })
            .collect();
        assert_eq!(current, vec![6]);
        // current 0 clamps up to 1.
        let items = pagination_items(0, 6);
        assert!(matches!(
            items[1],
            Page {
                page: 1,
                is_current: true
            }
        ));
    }

    #[test]
    fn exactly_one_current_everywhere() {
        for total in 1..=25 {
            for current in 1..=total {
                let items = pagination_items(current, total);
                let count = items
                    .iter()
                    .filter(|i| matches!(i, Page { is_current: true, .. }))
                    .count();
                assert_eq!(count, 1, "current={current} total={total}");
            }
        }
    }

    #[test]
    fn prev_next_gating_at_extremes() {
        let items = pagination_items(1, 10);
        assert!(matches!(
            items.first(),
            Some(Prev {
                target: 1,
                disabled: true
            })
        ));
        assert!(matches!(
            items.last(),
            Some(Next {
                target: 2,
                disabled: false
            })
        ));
        let items = pagination_items(10, 10);
        assert!(matches!(
            items.first(),
            Some(Prev {
                target: 9,
                disabled: false
            })
        ));
        assert!(matches!(
            items.last(),
            Some(Next {
                target: 10,
                disabled: true
            })
        ));
    }

    fn numbered(items: &[PaginationItem]) -> Vec<u32> {
        items
            .iter()
            .filter_map(|i| match i {
                Page { page, .. } => Some(*page),
                _ => None,
            })
            .collect()
    }

    fn ellipses(items: &[PaginationItem]) -> usize {
        items.iter().filter(|i| matches!(i, Ellipsis)).count()
    }
}
