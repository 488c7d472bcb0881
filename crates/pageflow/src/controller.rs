#![forbid(unsafe_code)]

//! The coordinating context that owns all session state.
//!
//! A [`PageListController`] holds the window, the page store, the current
//! page, and the furthest page reached, and is the only place they mutate.
//! Hosts drive it with discrete events — a visible-range report, a jump
//! request, a reload, a fetch completion — and each mutating entry point
//! returns an [`Update`] describing what changed and which fetches to run,
//! in the update-returns-commands style: the controller never performs IO
//! itself.
//!
//! ```
//! use pageflow::{PagingConfig, PageListController, VisibleRange};
//!
//! let config = PagingConfig::new(3, 4).with_window_size(2);
//! let mut list: PageListController<String, String> =
//!     PageListController::new(config).unwrap();
//!
//! // Fetch the initial window, then hand the requests to a fetch driver.
//! let update = list.init();
//! assert_eq!(update.requests.len(), 2);
//!
//! // The host's viewport reaches page 4: the window jumps.
//! let update = list.visible_range_changed(VisibleRange::global(9, 11));
//! assert_eq!(update.page_changed, Some(4));
//! assert!(list.window().contains(4));
//! ```

use tracing::{debug, trace};

use crate::config::{ConfigError, PagingConfig};
use crate::fetch::{FetchRequest, collect_requests};
use crate::pagination::{PaginationItem, pagination_items};
use crate::projector::{ItemSlot, project};
use crate::store::{PageStatus, PageStore};
use crate::viewport::{
    ViewportContext, VisibleRange, WindowMove, resolve_visible_range,
};
use crate::window::{PageWindow, compute_window};

/// What one controller event changed, and the fetches it wants run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Update {
    /// New current page, when the event changed it. This is the
    /// page-change notification: hosts that track the current page react
    /// to `Some` here.
    pub page_changed: Option<u32>,
    /// Whether the resident window moved (and the store was reconciled).
    pub window_changed: bool,
    /// Pages to fetch, already marked `loading`. Feed each result back via
    /// [`PageListController::complete_fetch`].
    pub requests: Vec<FetchRequest>,
}

impl Update {
    fn none() -> Self {
        Self::default()
    }

    /// Whether the event changed nothing and requested nothing.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.page_changed.is_none() && !self.window_changed && self.requests.is_empty()
    }
}

/// Scroll targets returned by a jump, in global item indices.
///
/// `target_global_index` is the first item of the jumped-to page;
/// `window_global_index` is the first item the new window materializes.
/// Their difference is the offset of the target inside the materialized
/// list, which is all a host needs to position its viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpTarget {
    /// Global index of the first item of the target page.
    pub target_global_index: usize,
    /// Global index of the first item of the new window.
    pub window_global_index: usize,
}

/// Windowed page-cache coordinator for one list session.
///
/// `T` is the item type, `E` the fetch capability's opaque error type; the
/// controller inspects neither.
#[derive(Debug)]
pub struct PageListController<T, E> {
    config: PagingConfig,
    window: PageWindow,
    store: PageStore<T, E>,
    current_page: u32,
    max_accessible_page: u32,
    pending_jump: Option<u32>,
}

impl<T, E> PageListController<T, E> {
    /// Create a controller for one session.
    ///
    /// The window is centered on the configured initial page and the store
    /// is populated with idle records; no fetches are requested until
    /// [`PageListController::init`].
    pub fn new(config: PagingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let current_page = initial_current_page(&config);
        let window = compute_window(current_page, config.total_pages, config.window_size);
        let mut store = PageStore::new();
        store.reconcile(window);
        Ok(Self {
            config,
            window,
            store,
            current_page,
            max_accessible_page: current_page.min(config.total_pages),
            pending_jump: None,
        })
    }

    /// Request the fetches for the initial window.
    ///
    /// Separate from construction so hosts can wire up their fetch driver
    /// first. Calling it again only re-requests pages that are still
    /// `idle` or `error`.
    pub fn init(&mut self) -> Update {
        Update {
            requests: collect_requests(&mut self.store, self.window),
            ..Update::none()
        }
    }

    /// Apply a visible-range report from the host.
    ///
    /// Updates the current page and the furthest page reached, and moves
    /// the window when the report requires a jump or an edge slide. A
    /// recompute that lands on identical bounds does not reconcile the
    /// store and issues no fetches.
    pub fn visible_range_changed(&mut self, report: VisibleRange) -> Update {
        if self.config.total_pages == 0 {
            return Update::none();
        }
        let decision = resolve_visible_range(&self.viewport_context(), report);
        trace!(
            top = decision.top_page,
            bottom = decision.bottom_page,
            current = decision.current_page,
            "visible range applied"
        );

        if decision.clear_pending {
            self.pending_jump = None;
        }
        let page_changed = self.set_current_page(decision.current_page);
        self.raise_max_accessible(decision.max_page_seen);

        let (window_changed, requests) = match decision.window_move {
            WindowMove::None => (false, Vec::new()),
            WindowMove::Jump { center } | WindowMove::Slide { center } => {
                self.apply_window(compute_window(
                    center,
                    self.config.total_pages,
                    self.config.window_size,
                ))
            }
        };

        Update {
            page_changed,
            window_changed,
            requests,
        }
    }

    /// Jump to `target_page`, recentering the window on it.
    ///
    /// The target is clamped into the dataset and recorded as pending so
    /// the visible-range reports from the host's follow-up scroll keep the
    /// current page pinned to it. Returns the scroll targets plus the
    /// update; repeating a jump to the already-current page recomputes and
    /// fetches nothing.
    pub fn scroll_to_page(&mut self, target_page: u32) -> (JumpTarget, Update) {
        if self.config.total_pages == 0 {
            return (
                JumpTarget {
                    target_global_index: 0,
                    window_global_index: 0,
                },
                Update::none(),
            );
        }
        let target = target_page.clamp(1, self.config.total_pages);
        self.pending_jump = Some(target);
        self.raise_max_accessible(target);

        let (page_changed, window_changed, requests) = if target == self.current_page
            && self.window.contains(target)
        {
            // Idempotent repeat: the window already covers the current
            // page, so recomputing it would be redundant work.
            (None, false, Vec::new())
        } else {
            debug!(target, "explicit page jump");
            let page_changed = self.set_current_page(target);
            let (window_changed, requests) = self.apply_window(compute_window(
                target,
                self.config.total_pages,
                self.config.window_size,
            ));
            (page_changed, window_changed, requests)
        };

        (
            JumpTarget {
                target_global_index: (target as usize - 1) * self.config.page_size,
                window_global_index: self.window.first_global_index(self.config.page_size),
            },
            Update {
                page_changed,
                window_changed,
                requests,
            },
        )
    }

    /// Force `page` back to `idle` and re-request the window's missing
    /// pages. No-op for pages outside the window or still `loading`.
    pub fn reload_page(&mut self, page: u32) -> Update {
        if !self.store.invalidate(page) {
            return Update::none();
        }
        debug!(page, "manual page reload");
        Update {
            requests: collect_requests(&mut self.store, self.window),
            ..Update::none()
        }
    }

    /// Commit one fetch result.
    ///
    /// Returns `false` when the completion was stale (its page left the
    /// window, or a reload reset it first) and nothing was mutated.
    pub fn complete_fetch(&mut self, page: u32, result: Result<Vec<T>, E>) -> bool {
        match result {
            Ok(items) => self.store.commit_loaded(page, items),
            Err(error) => self.store.commit_error(page, error),
        }
    }

    /// Restart the session from the configured initial state: current page
    /// back to the initial page, furthest-reached reset, every record
    /// dropped, window recomputed. In-flight fetches become stale.
    pub fn reset(&mut self) -> Update {
        let previous = self.current_page;
        self.current_page = initial_current_page(&self.config);
        self.max_accessible_page = self.current_page.min(self.config.total_pages);
        self.pending_jump = None;
        self.window = compute_window(
            self.current_page,
            self.config.total_pages,
            self.config.window_size,
        );
        self.store.clear();
        self.store.reconcile(self.window);
        debug!(page = self.current_page, "session reset");
        Update {
            page_changed: (self.current_page != previous).then_some(self.current_page),
            window_changed: true,
            requests: collect_requests(&mut self.store, self.window),
        }
    }

    /// Current resident window bounds.
    #[must_use]
    pub fn window(&self) -> PageWindow {
        self.window
    }

    /// Page the viewport is considered to be showing.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }

    /// Highest page reached via scrolling or jumps (bounds the pagination
    /// links). Non-decreasing until [`PageListController::reset`].
    #[must_use]
    pub fn max_accessible_page(&self) -> u32 {
        self.max_accessible_page
    }

    /// Whether any resident page has a fetch in flight.
    #[must_use]
    pub fn is_fetching(&self) -> bool {
        self.store.is_fetching()
    }

    /// Fetch status of a resident page.
    #[must_use]
    pub fn page_status(&self, page: u32) -> Option<PageStatus> {
        self.store.status(page)
    }

    /// The error recorded for a resident page, if its fetch failed.
    #[must_use]
    pub fn page_error(&self, page: u32) -> Option<&E> {
        self.store.get(page).and_then(|record| record.error())
    }

    /// The flat slot list for the resident window, in global-index order.
    #[must_use]
    pub fn items(&self) -> Vec<ItemSlot<'_, T>> {
        project(self.window, &self.store, self.config.page_size)
    }

    /// The pagination descriptors for the pages reached so far.
    #[must_use]
    pub fn pagination(&self) -> Vec<PaginationItem> {
        pagination_items(self.current_page, self.max_accessible_page)
    }

    /// Number of item slots the current window materializes.
    #[must_use]
    pub fn len_materialized(&self) -> usize {
        self.window.len() as usize * self.config.page_size
    }

    /// The session configuration.
    #[must_use]
    pub fn config(&self) -> &PagingConfig {
        &self.config
    }

    fn viewport_context(&self) -> ViewportContext {
        ViewportContext {
            window: self.window,
            page_size: self.config.page_size,
            total_pages: self.config.total_pages,
            prefetch_threshold_pages: self.config.prefetch_threshold_pages,
            pending_jump: self.pending_jump,
        }
    }

    /// Replace the window when the bounds actually moved; identical bounds
    /// skip reconciliation entirely so in-flight dedup state is untouched.
    fn apply_window(&mut self, window: PageWindow) -> (bool, Vec<FetchRequest>) {
        if window == self.window {
            return (false, Vec::new());
        }
        debug!(
            old_start = self.window.start_page,
            old_end = self.window.end_page,
            new_start = window.start_page,
            new_end = window.end_page,
            "window moved"
        );
        self.window = window;
        self.store.reconcile(window);
        (true, collect_requests(&mut self.store, window))
    }

    fn set_current_page(&mut self, page: u32) -> Option<u32> {
        if page == self.current_page {
            None
        } else {
            debug!(from = self.current_page, to = page, "current page changed");
            self.current_page = page;
            Some(page)
        }
    }

    fn raise_max_accessible(&mut self, page: u32) {
        let clamped = page.min(self.config.total_pages);
        if clamped > self.max_accessible_page {
            self.max_accessible_page = clamped;
        }
    }
}

fn initial_current_page(config: &PagingConfig) -> u32 {
    config.initial_page.clamp(1, config.total_pages.max(1))
}
