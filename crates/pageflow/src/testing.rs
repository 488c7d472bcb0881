#![forbid(unsafe_code)]

//! Deterministic fetch doubles for driving the coordinator in tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::PageFetcher;

/// A [`PageFetcher`] whose per-page outcomes are programmed up front.
///
/// Every call is recorded, so tests can assert how often each page was
/// actually fetched (the dedup guarantees). Safe to share across the
/// worker threads of a [`FetchPool`](crate::fetch::FetchPool).
///
/// # Panics
///
/// `fetch_page` panics when asked for a page with no scripted outcome —
/// in a test that is a wrong-page bug, not a condition to handle.
#[derive(Debug, Default)]
pub struct ScriptedFetcher<T, E> {
    outcomes: Mutex<HashMap<u32, Result<Vec<T>, E>>>,
    calls: Mutex<Vec<u32>>,
}

impl<T: Clone, E: Clone> ScriptedFetcher<T, E> {
    /// Create a fetcher with no scripted pages.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outcomes: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Script the outcome of fetching `page`.
    pub fn script(&self, page: u32, outcome: Result<Vec<T>, E>) {
        self.outcomes.lock().unwrap().insert(page, outcome);
    }

    /// Every page fetched so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<u32> {
        self.calls.lock().unwrap().clone()
    }

    /// How many times `page` has been fetched.
    #[must_use]
    pub fn call_count(&self, page: u32) -> usize {
        self.calls.lock().unwrap().iter().filter(|p| **p == page).count()
    }
}

impl<T: Clone + Send, E: Clone + Send> PageFetcher<T, E> for ScriptedFetcher<T, E> {
    fn fetch_page(&self, page: u32) -> Result<Vec<T>, E> {
        self.calls.lock().unwrap().push(page);
        self.outcomes
            .lock()
            .unwrap()
            .get(&page)
            .cloned()
            .unwrap_or_else(|| panic!("no scripted outcome for page {page}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_outcomes_and_call_log() {
        let fetcher: ScriptedFetcher<u32, &'static str> = ScriptedFetcher::new();
        fetcher.script(1, Ok(vec![10, 11]));
        fetcher.script(2, Err("boom"));
        assert_eq!(fetcher.fetch_page(1), Ok(vec![10, 11]));
        assert_eq!(fetcher.fetch_page(2), Err("boom"));
        assert_eq!(fetcher.fetch_page(1), Ok(vec![10, 11]));
        assert_eq!(fetcher.calls(), vec![1, 2, 1]);
        assert_eq!(fetcher.call_count(1), 2);
        assert_eq!(fetcher.call_count(3), 0);
    }
}
