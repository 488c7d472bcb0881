#![forbid(unsafe_code)]

//! Session configuration for the paging coordinator.
//!
//! A [`PagingConfig`] is immutable for the lifetime of a
//! [`PageListController`](crate::controller::PageListController); starting a
//! new session with different knobs means constructing a new controller (or
//! calling `reset` after swapping nothing — the knobs themselves never
//! change in place).

use std::fmt;

/// Immutable knobs for one paging session.
///
/// `page_size` and `total_pages` describe the dataset; the remaining fields
/// shape the resident window and when it moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagingConfig {
    /// Items per page. Must be at least 1.
    pub page_size: usize,
    /// Total pages in the dataset. Zero means an empty dataset.
    pub total_pages: u32,
    /// Maximum number of contiguous pages kept resident.
    pub window_size: u32,
    /// Page the session starts on (1-based).
    pub initial_page: u32,
    /// How close (in pages) the visible range may get to a window edge
    /// before the window slides.
    pub prefetch_threshold_pages: u32,
}

impl PagingConfig {
    /// Create a config for a dataset of `total_pages` pages of `page_size`
    /// items, with default window knobs.
    #[must_use]
    pub fn new(page_size: usize, total_pages: u32) -> Self {
        Self {
            page_size,
            total_pages,
            window_size: 10,
            initial_page: 1,
            prefetch_threshold_pages: 1,
        }
    }

    /// Set the resident window size (pages).
    #[must_use]
    pub fn with_window_size(mut self, window_size: u32) -> Self {
        self.window_size = window_size;
        self
    }

    /// Set the page the session starts on.
    #[must_use]
    pub fn with_initial_page(mut self, initial_page: u32) -> Self {
        self.initial_page = initial_page;
        self
    }

    /// Set the edge-proximity threshold that triggers a window slide.
    #[must_use]
    pub fn with_prefetch_threshold(mut self, pages: u32) -> Self {
        self.prefetch_threshold_pages = pages;
        self
    }

    /// Check the structural constraints the coordinator relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if self.window_size == 0 {
            return Err(ConfigError::ZeroWindowSize);
        }
        if self.initial_page == 0 {
            return Err(ConfigError::ZeroInitialPage);
        }
        Ok(())
    }

    /// Number of item slots a full window materializes.
    #[must_use]
    pub fn window_capacity(&self) -> usize {
        self.page_size.saturating_mul(self.window_size as usize)
    }
}

/// Rejected [`PagingConfig`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// `page_size` was 0; every page must hold at least one item.
    ZeroPageSize,
    /// `window_size` was 0; the window must hold at least one page.
    ZeroWindowSize,
    /// `initial_page` was 0; pages are 1-based.
    ZeroInitialPage,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroPageSize => write!(f, "page_size must be at least 1"),
            Self::ZeroWindowSize => write!(f, "window_size must be at least 1"),
            Self::ZeroInitialPage => write!(f, "initial_page must be at least 1 (pages are 1-based)"),
        }
    }
}

impl std::error::Error for ConfigError {}
