#![forbid(unsafe_code)]

//! Windowed page cache and scroll coordination for virtualized,
//! page-fetched lists.
//!
//! A host renders an unbounded dataset as one continuous list while this
//! crate keeps only a bounded, contiguous run of pages resident. The host
//! feeds in raw signals — visible index ranges, jump requests, fetch
//! completions — and reads back derived outputs: the flat item-slot list,
//! the truncated pagination descriptors, the window bounds, and scroll
//! targets.
//!
//! # Pieces
//!
//! - [`PageListController`] — owns all session state and decides, per
//!   event, what changed and which pages to fetch.
//! - [`compute_window`] / [`PageWindow`] — the contiguous resident range
//!   and its recentering rule.
//! - [`PageStore`] — per-page fetch state with stale-completion rejection.
//! - [`FetchPool`] / [`PageFetcher`] — background execution of the
//!   caller-supplied fetch capability, one thread per page.
//! - [`pagination_items`] — bounded, truncated pagination controls from
//!   the furthest page reached.
//! - [`project`] — the gapless slot list (items and placeholders) the
//!   host renders.
//!
//! # Driving loop
//!
//! ```
//! use std::sync::Arc;
//! use pageflow::{FetchPool, PageListController, PagingConfig, VisibleRange};
//!
//! let config = PagingConfig::new(10, 40).with_window_size(4);
//! let mut list: PageListController<u64, String> =
//!     PageListController::new(config).unwrap();
//! let mut pool: FetchPool<u64, String> =
//!     FetchPool::new(Arc::new(|page: u32| -> Result<Vec<u64>, String> {
//!         Ok((0..10).map(|i| u64::from((page - 1) * 10 + i)).collect())
//!     }));
//!
//! pool.dispatch(list.init().requests);
//! while let Some(delivery) = pool.recv() {
//!     list.complete_fetch(delivery.page, delivery.result);
//! }
//! assert!(!list.is_fetching());
//!
//! // The host scrolled; apply the report and run any new fetches.
//! let update = list.visible_range_changed(VisibleRange::global(100, 119));
//! pool.dispatch(update.requests);
//! ```

/// Session configuration and validation.
pub mod config;
/// The coordinating context owning all session state.
pub mod controller;
/// Fetch request synthesis and the background fetch driver.
pub mod fetch;
/// Pagination-control descriptor derivation.
pub mod pagination;
/// Projection of the resident window into renderable slots.
pub mod projector;
/// Per-page fetch state for resident pages.
pub mod store;
/// Deterministic fetch doubles for tests.
#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;
/// Visible-range resolution and the jump/slide decision.
pub mod viewport;
/// The resident page window and its recompute rule.
pub mod window;

pub use config::{ConfigError, PagingConfig};
pub use controller::{JumpTarget, PageListController, Update};
pub use fetch::{FetchDelivery, FetchPool, FetchRequest, PageFetcher, collect_requests};
pub use pagination::{PaginationItem, pagination_items};
pub use projector::{ItemSlot, project};
pub use store::{PageRecord, PageStatus, PageStore};
pub use viewport::{IndexKind, VisibleRange};
pub use window::{PageWindow, compute_window};
