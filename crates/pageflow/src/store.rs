#![forbid(unsafe_code)]

//! Per-page fetch state for the pages currently resident in the window.
//!
//! The store is plain data plus the page state machine:
//!
//! ```text
//! idle ──► loading ──► loaded
//!   ▲         │  └────► error ──► loading   (retry after a reconcile)
//!   │         │                    │
//!   └─────────┴── (no edge) ◄──────┘        invalidate: loaded/error/idle → idle
//! ```
//!
//! There is no transition out of `loading` except to `loaded` or `error`,
//! and commits only land on a record that is still tracked *and* still
//! `loading` — a completion that raced an eviction or an `invalidate` is
//! dropped without touching anything.

use std::collections::BTreeMap;

use tracing::{debug, trace};

use crate::window::PageWindow;

/// Status tag of a [`PageRecord`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// Tracked but no fetch issued yet (or invalidated).
    Idle,
    /// A fetch is in flight.
    Loading,
    /// Items arrived.
    Loaded,
    /// The fetch failed; the error is kept on the record.
    Error,
}

/// State payload of a tracked page.
#[derive(Debug, Clone, PartialEq, Eq)]
enum PageState<T, E> {
    Idle,
    Loading,
    Loaded(Vec<T>),
    Error(E),
}

/// Fetch state for one resident page.
///
/// Created when the page enters the window, discarded when it leaves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRecord<T, E> {
    page: u32,
    state: PageState<T, E>,
}

impl<T, E> PageRecord<T, E> {
    fn idle(page: u32) -> Self {
        Self {
            page,
            state: PageState::Idle,
        }
    }

    /// The page this record tracks.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Current status tag.
    #[must_use]
    pub fn status(&self) -> PageStatus {
        match self.state {
            PageState::Idle => PageStatus::Idle,
            PageState::Loading => PageStatus::Loading,
            PageState::Loaded(_) => PageStatus::Loaded,
            PageState::Error(_) => PageStatus::Error,
        }
    }

    /// Loaded items, if the page is `loaded`.
    #[must_use]
    pub fn items(&self) -> Option<&[T]> {
        match &self.state {
            PageState::Loaded(items) => Some(items),
            _ => None,
        }
    }

    /// The fetch failure, if the page is `error`.
    #[must_use]
    pub fn error(&self) -> Option<&E> {
        match &self.state {
            PageState::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Ordered map of resident pages to their fetch state.
///
/// Owned by the coordinating context; all mutation flows through the
/// transition methods below.
#[derive(Debug, Clone)]
pub struct PageStore<T, E> {
    records: BTreeMap<u32, PageRecord<T, E>>,
}

impl<T, E> Default for PageStore<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> PageStore<T, E> {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: BTreeMap::new(),
        }
    }

    /// Align the tracked set with `window`: create `idle` records for pages
    /// that just entered, drop records for pages that left, and preserve
    /// surviving records verbatim (no forced re-fetch).
    pub fn reconcile(&mut self, window: PageWindow) {
        let before = self.records.len();
        self.records.retain(|page, _| window.contains(*page));
        let evicted = before - self.records.len();
        for page in window.pages() {
            self.records.entry(page).or_insert_with(|| PageRecord::idle(page));
        }
        if evicted > 0 {
            trace!(
                start = window.start_page,
                end = window.end_page,
                evicted,
                "reconciled page store"
            );
        }
    }

    /// Transition a tracked `idle` or `error` page to `loading`.
    ///
    /// Returns `false` (and changes nothing) when the page is untracked,
    /// already `loading`, or already `loaded` — callers use this as the
    /// dedup gate before issuing a fetch.
    pub fn mark_loading(&mut self, page: u32) -> bool {
        match self.records.get_mut(&page) {
            Some(record) => match record.state {
                PageState::Idle | PageState::Error(_) => {
                    record.state = PageState::Loading;
                    true
                }
                PageState::Loading | PageState::Loaded(_) => false,
            },
            None => false,
        }
    }

    /// Commit fetched items to a page that is still tracked and `loading`.
    ///
    /// Stale completions (page evicted, or reset by `invalidate` while the
    /// fetch was in flight) are dropped and must never resurrect a record.
    pub fn commit_loaded(&mut self, page: u32, items: Vec<T>) -> bool {
        match self.records.get_mut(&page) {
            Some(record) if matches!(record.state, PageState::Loading) => {
                record.state = PageState::Loaded(items);
                true
            }
            Some(record) => {
                debug!(page, status = ?record.status(), "dropping completion for non-loading page");
                false
            }
            None => {
                debug!(page, "dropping completion for evicted page");
                false
            }
        }
    }

    /// Commit a fetch failure to a page that is still tracked and `loading`.
    ///
    /// Same staleness rules as [`PageStore::commit_loaded`].
    pub fn commit_error(&mut self, page: u32, error: E) -> bool {
        match self.records.get_mut(&page) {
            Some(record) if matches!(record.state, PageState::Loading) => {
                record.state = PageState::Error(error);
                true
            }
            Some(record) => {
                debug!(page, status = ?record.status(), "dropping failure for non-loading page");
                false
            }
            None => {
                debug!(page, "dropping failure for evicted page");
                false
            }
        }
    }

    /// Force a tracked page back to `idle` so the next reconcile pass
    /// re-fetches it. No-op for untracked pages and for pages currently
    /// `loading` (the machine has no `loading → idle` edge).
    pub fn invalidate(&mut self, page: u32) -> bool {
        match self.records.get_mut(&page) {
            Some(record) => match record.state {
                PageState::Loading => false,
                _ => {
                    record.state = PageState::Idle;
                    true
                }
            },
            None => false,
        }
    }

    /// Whether any tracked page has a fetch in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.records
            .values()
            .any(|r| matches!(r.state, PageState::Loading))
    }

    /// Record for `page`, if tracked.
    #[must_use]
    pub fn get(&self, page: u32) -> Option<&PageRecord<T, E>> {
        self.records.get(&page)
    }

    /// Status tag for `page`, if tracked.
    #[must_use]
    pub fn status(&self, page: u32) -> Option<PageStatus> {
        self.records.get(&page).map(PageRecord::status)
    }

    /// Loaded items for `page`, if tracked and `loaded`.
    #[must_use]
    pub fn items(&self, page: u32) -> Option<&[T]> {
        self.records.get(&page).and_then(PageRecord::items)
    }

    /// Tracked pages in ascending order.
    pub fn pages(&self) -> impl Iterator<Item = u32> + '_ {
        self.records.keys().copied()
    }

    /// Number of tracked pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no pages are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Drop every record (session teardown / reset).
    pub fn clear(&mut self) {
        self.records.clear();
    }
}
