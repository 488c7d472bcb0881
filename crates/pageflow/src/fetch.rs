#![forbid(unsafe_code)]

//! Fetch coordination: deciding what to fetch, and running the fetches.
//!
//! The sans-IO half ([`collect_requests`]) reconciles the page store
//! against the resident window: every page that is `idle` or `error` is
//! marked `loading` *synchronously* and surfaced as a [`FetchRequest`], so
//! two reconcile passes can never double-issue a fetch for the same page.
//!
//! The effectful half ([`FetchPool`]) executes requests against a
//! caller-supplied [`PageFetcher`], one spawned thread per page, and
//! delivers each [`FetchDelivery`] over a channel for the host to feed back
//! into the controller. Completions have no ordering guarantee and are
//! committed independently per page; a fetch that outlives its page is
//! dropped at commit time by the store, not cancelled.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, TryRecvError, channel};
use std::thread::JoinHandle;

use tracing::debug;

use crate::store::PageStore;
use crate::window::PageWindow;

/// An instruction to fetch one page.
///
/// By the time a request is surfaced its page is already `loading`, so
/// holders only ever see each resident page requested once between
/// reloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    /// Page to fetch (1-based).
    pub page: u32,
}

/// Result of one executed fetch, ready to feed back into
/// [`PageListController::complete_fetch`](crate::controller::PageListController::complete_fetch).
#[derive(Debug)]
pub struct FetchDelivery<T, E> {
    /// Page the fetch was issued for.
    pub page: u32,
    /// Items on success, the caller's opaque error on failure.
    pub result: Result<Vec<T>, E>,
}

/// Caller-supplied fetch capability.
///
/// Implementations should be safe to call more than once for the same page
/// (the coordinator deduplicates call sites, but a reload re-fetches) and
/// should return exactly `page_size` items for every full page. The call
/// runs on a [`FetchPool`] worker thread and may block.
pub trait PageFetcher<T, E>: Send + Sync {
    /// Fetch the items of `page`.
    fn fetch_page(&self, page: u32) -> Result<Vec<T>, E>;
}

impl<T, E, F> PageFetcher<T, E> for F
where
    F: Fn(u32) -> Result<Vec<T>, E> + Send + Sync,
{
    fn fetch_page(&self, page: u32) -> Result<Vec<T>, E> {
        self(page)
    }
}

/// Mark every `idle`/`error` page in `window` as `loading` and return one
/// request per page so marked.
///
/// Pages already `loading` or `loaded` produce nothing — this is the fetch
/// dedup guarantee, enforced by the store's `mark_loading` gate rather than
/// by comparing against an in-flight set.
pub fn collect_requests<T, E>(store: &mut PageStore<T, E>, window: PageWindow) -> Vec<FetchRequest> {
    let mut requests = Vec::new();
    for page in window.pages() {
        if store.mark_loading(page) {
            debug!(page, "issuing page fetch");
            requests.push(FetchRequest { page });
        }
    }
    requests
}

/// Runs fetches on background threads and funnels results to the host.
///
/// One thread per request, results delivered through an mpsc channel the
/// host drains between events. Teardown abandons in-flight work: worker
/// threads finish on their own and their deliveries go nowhere.
pub struct FetchPool<T, E> {
    fetcher: Arc<dyn PageFetcher<T, E>>,
    sender: Sender<FetchDelivery<T, E>>,
    receiver: Receiver<FetchDelivery<T, E>>,
    handles: Vec<JoinHandle<()>>,
}

impl<T, E> std::fmt::Debug for FetchPool<T, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FetchPool")
            .field("in_flight", &self.handles.len())
            .finish()
    }
}

impl<T: Send + 'static, E: Send + 'static> FetchPool<T, E> {
    /// Create a pool around the caller's fetch capability.
    #[must_use]
    pub fn new(fetcher: Arc<dyn PageFetcher<T, E>>) -> Self {
        let (sender, receiver) = channel();
        Self {
            fetcher,
            sender,
            receiver,
            handles: Vec::new(),
        }
    }

    /// Spawn one worker per request.
    pub fn dispatch(&mut self, requests: impl IntoIterator<Item = FetchRequest>) {
        self.reap_finished();
        for request in requests {
            let fetcher = Arc::clone(&self.fetcher);
            let sender = self.sender.clone();
            let handle = std::thread::spawn(move || {
                let result = fetcher.fetch_page(request.page);
                let _ = sender.send(FetchDelivery {
                    page: request.page,
                    result,
                });
            });
            self.handles.push(handle);
        }
    }

    /// Collect every delivery that has arrived, without blocking.
    pub fn try_drain(&mut self) -> Vec<FetchDelivery<T, E>> {
        let mut deliveries = Vec::new();
        loop {
            match self.receiver.try_recv() {
                Ok(delivery) => deliveries.push(delivery),
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => break,
            }
        }
        self.reap_finished();
        deliveries
    }

    /// Wait for the next delivery. Returns `None` when nothing is queued
    /// and no worker is running.
    pub fn recv(&mut self) -> Option<FetchDelivery<T, E>> {
        if let Ok(delivery) = self.receiver.try_recv() {
            self.reap_finished();
            return Some(delivery);
        }
        self.reap_finished();
        if self.handles.is_empty() {
            return None;
        }
        let delivery = self.receiver.recv().ok();
        self.reap_finished();
        delivery
    }

    /// Number of workers still running.
    #[must_use]
    pub fn in_flight(&mut self) -> usize {
        self.reap_finished();
        self.handles.len()
    }

    fn reap_finished(&mut self) {
        if self.handles.is_empty() {
            return;
        }
        let mut remaining = Vec::with_capacity(self.handles.len());
        for handle in self.handles.drain(..) {
            if handle.is_finished() {
                let _ = handle.join();
            } else {
                remaining.push(handle);
            }
        }
        self.handles = remaining;
    }
}
