#![forbid(unsafe_code)]

//! Projection of (window, store) into the flat item-slot list a host
//! renders.
//!
//! The output is always a gapless, page-ordered sequence of exactly
//! `window_len × page_size` slots with stable global indices; whether a
//! slot carries an item only depends on its page being `loaded` and the
//! in-page index existing. Slots are derived on demand and never stored.

use crate::store::PageStore;
use crate::window::PageWindow;

/// One renderable position in the materialized list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemSlot<'a, T> {
    /// Page the slot belongs to (1-based).
    pub page: u32,
    /// Index within the page, `0..page_size`.
    pub index_in_page: usize,
    /// Absolute index into the full dataset.
    pub global_index: usize,
    /// The item, when its page is loaded and holds this index.
    pub item: Option<&'a T>,
}

impl<T> ItemSlot<'_, T> {
    /// Whether the host should render a placeholder here.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.item.is_none()
    }
}

/// Materialize every slot of the resident window, in page order.
#[must_use]
pub fn project<'a, T, E>(
    window: PageWindow,
    store: &'a PageStore<T, E>,
    page_size: usize,
) -> Vec<ItemSlot<'a, T>> {
    let mut slots = Vec::with_capacity(window.len() as usize * page_size);
    for page in window.pages() {
        let items = store.items(page);
        let page_base = (page as usize - 1) * page_size;
        for index_in_page in 0..page_size {
            slots.push(ItemSlot {
                page,
                index_in_page,
                global_index: page_base + index_in_page,
                item: items.and_then(|items| items.get(index_in_page)),
            });
        }
    }
    slots
}
