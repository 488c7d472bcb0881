#![forbid(unsafe_code)]

//! Visible-range resolution and the jump/slide decision.
//!
//! Hosts report which item indices are on screen. Different hosts count
//! differently: some report absolute dataset indices, some report offsets
//! into the currently materialized slice, and some do not know which they
//! have. This module resolves a report to global indices, derives the pages
//! it touches, and decides whether the resident window must jump
//! (discontiguous recenter), slide (edge-adjacent shift), or stay put.
//!
//! The decision functions are pure over a [`ViewportContext`] snapshot so
//! every ambiguous case can be table-tested without a controller.

use tracing::trace;

use crate::window::PageWindow;

/// How the indices in a [`VisibleRange`] are counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndexKind {
    /// Absolute indices into the full dataset.
    Global,
    /// Offsets into the currently materialized item list.
    Relative,
    /// Caller does not know; infer per [`resolve_kind`].
    #[default]
    Auto,
}

/// A host report of the currently visible item index range (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleRange {
    /// First visible index.
    pub start_index: usize,
    /// Last visible index.
    pub stop_index: usize,
    /// How the indices are counted.
    pub kind: IndexKind,
}

impl VisibleRange {
    /// A report in absolute dataset indices.
    #[must_use]
    pub fn global(start_index: usize, stop_index: usize) -> Self {
        Self {
            start_index,
            stop_index,
            kind: IndexKind::Global,
        }
    }

    /// A report in materialized-list offsets.
    #[must_use]
    pub fn relative(start_index: usize, stop_index: usize) -> Self {
        Self {
            start_index,
            stop_index,
            kind: IndexKind::Relative,
        }
    }

    /// A report of unknown index kind.
    #[must_use]
    pub fn auto(start_index: usize, stop_index: usize) -> Self {
        Self {
            start_index,
            stop_index,
            kind: IndexKind::Auto,
        }
    }
}

/// Snapshot of the coordinator state a resolution runs against.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ViewportContext {
    pub window: PageWindow,
    pub page_size: usize,
    pub total_pages: u32,
    pub prefetch_threshold_pages: u32,
    /// Target of an explicit jump whose follow-up scroll has not settled.
    pub pending_jump: Option<u32>,
}

/// Window movement a resolution calls for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowMove {
    /// Visible pages are covered and not near an edge.
    None,
    /// Visible pages escape the resident window; recenter on `center`.
    Jump { center: u32 },
    /// Visible pages approach a window edge; recenter on `center`.
    Slide { center: u32 },
}

/// Outcome of resolving one visible-range report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ViewportDecision {
    /// Page the viewport is now considered to show.
    pub current_page: u32,
    /// Highest page this report proves reachable, clamped to the dataset.
    pub max_page_seen: u32,
    /// Required window movement, if any.
    pub window_move: WindowMove,
    /// Whether the pending jump target stopped covering the report and
    /// should be cleared.
    pub clear_pending: bool,
    /// First visible page (after resolution).
    pub top_page: u32,
    /// Last visible page (after resolution).
    pub bottom_page: u32,
}

/// Decide whether an [`IndexKind::Auto`] report is relative or global.
///
/// Both interpretations are computed; the report is treated as relative
/// only when that interpretation maps to pages inside the resident window
/// *and* neither raw index exceeds the materialized item count. Everything
/// else — including the short-materialization moment right after a jump —
/// falls back to global, the interpretation that can only over-shoot into
/// a jump rather than silently mis-slide.
pub(crate) fn resolve_kind(ctx: &ViewportContext, report: VisibleRange) -> IndexKind {
    match report.kind {
        IndexKind::Global | IndexKind::Relative => report.kind,
        IndexKind::Auto => {
            let materialized = ctx.window.len() as usize * ctx.page_size;
            if report.start_index > materialized || report.stop_index > materialized {
                return IndexKind::Global;
            }
            let offset = ctx.window.first_global_index(ctx.page_size);
            let rel_top = page_of(offset + report.start_index, ctx.page_size);
            let rel_bottom = page_of(offset + report.stop_index, ctx.page_size);
            if ctx.window.contains(rel_top) && ctx.window.contains(rel_bottom) {
                IndexKind::Relative
            } else {
                IndexKind::Global
            }
        }
    }
}

/// Resolve a report to a decision: current page, furthest page, and the
/// window movement it requires.
pub(crate) fn resolve_visible_range(
    ctx: &ViewportContext,
    report: VisibleRange,
) -> ViewportDecision {
    let kind = resolve_kind(ctx, report);
    let (start, stop) = normalized(report);
    let (start, stop) = match kind {
        IndexKind::Relative => {
            let offset = ctx.window.first_global_index(ctx.page_size);
            (offset + start, offset + stop)
        }
        _ => (start, stop),
    };

    let top_page = page_of(start, ctx.page_size);
    let bottom_page = page_of(stop, ctx.page_size);
    trace!(?kind, top_page, bottom_page, "resolved visible range");

    let max_page_seen = ctx.total_pages.min(top_page.max(bottom_page));

    // While a jump is settling, the reported range still covering the
    // target pins the current page to it; the first report that escapes
    // the target releases the pin.
    let (current_page, clear_pending) = match ctx.pending_jump {
        Some(target) if top_page <= target && target <= bottom_page => (target, false),
        Some(_) => (clamp_page(top_page, ctx.total_pages), true),
        None => (clamp_page(top_page, ctx.total_pages), false),
    };

    let covered = !ctx.window.is_empty()
        && top_page >= ctx.window.start_page
        && bottom_page <= ctx.window.end_page;
    let window_move = if !covered {
        WindowMove::Jump {
            center: current_page,
        }
    } else {
        slide_move(ctx, top_page, bottom_page)
    };

    ViewportDecision {
        current_page,
        max_page_seen,
        window_move,
        clear_pending,
        top_page,
        bottom_page,
    }
}

/// Edge-proximity half of the decision, only reached when the visible
/// pages are fully covered by the window.
fn slide_move(ctx: &ViewportContext, top_page: u32, bottom_page: u32) -> WindowMove {
    let threshold = ctx.prefetch_threshold_pages;
    let near_top = top_page < ctx.window.start_page.saturating_add(threshold);
    let near_bottom = bottom_page > ctx.window.end_page.saturating_sub(threshold);
    if near_top && ctx.window.start_page > 1 {
        WindowMove::Slide { center: top_page }
    } else if near_bottom && ctx.window.end_page < ctx.total_pages {
        WindowMove::Slide {
            center: bottom_page,
        }
    } else {
        WindowMove::None
    }
}

/// 1-based page containing a global item index.
fn page_of(global_index: usize, page_size: usize) -> u32 {
    (global_index / page_size.max(1)) as u32 + 1
}

fn clamp_page(page: u32, total_pages: u32) -> u32 {
    page.clamp(1, total_pages.max(1))
}

fn normalized(report: VisibleRange) -> (usize, usize) {
    if report.stop_index < report.start_index {
        (report.stop_index, report.start_index)
    } else {
        (report.start_index, report.stop_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::window::compute_window;

    fn ctx(window: PageWindow) -> ViewportContext {
        ViewportContext {
            window,
            page_size: 10,
            total_pages: 100,
            prefetch_threshold_pages: 1,
            pending_jump: None,
        }
    }

    #[test]
    fn global_report_inside_window_stays_put() {
        // Window [8, 12], pages hold 10 items: global 80..=99 is pages 9-10.
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(80, 99));
        assert_eq!((d.top_page, d.bottom_page), (9, 10));
        assert_eq!(d.current_page, 9);
        assert_eq!(d.max_page_seen, 10);
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn global_report_outside_window_jumps() {
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(500, 519));
        assert_eq!((d.top_page, d.bottom_page), (51, 52));
        assert_eq!(d.window_move, WindowMove::Jump { center: 51 });
    }

    #[test]
    fn partially_covered_report_jumps() {
        // Window [8, 12]; visible pages 12-13 are not fully covered.
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(115, 125));
        assert_eq!((d.top_page, d.bottom_page), (12, 13));
        assert_eq!(d.window_move, WindowMove::Jump { center: 12 });
    }

    #[test]
    fn relative_report_is_offset_by_window_start() {
        // Window [8, 12] starts at global index 70.
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::relative(0, 9));
        assert_eq!((d.top_page, d.bottom_page), (8, 8));
        assert_eq!(d.current_page, 8);
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn auto_small_indices_read_as_relative() {
        // Raw 0..=9 fits the materialized list and maps inside the window,
        // so auto resolves relative even though the window starts at 8.
        let c = ctx(compute_window(10, 100, 5));
        assert_eq!(
            resolve_kind(&c, VisibleRange::auto(0, 9)),
            IndexKind::Relative
        );
    }

    #[test]
    fn auto_large_indices_read_as_global() {
        // 500 exceeds the 50 materialized slots.
        let c = ctx(compute_window(10, 100, 5));
        assert_eq!(
            resolve_kind(&c, VisibleRange::auto(500, 519)),
            IndexKind::Global
        );
    }

    #[test]
    fn auto_on_window_at_origin_prefers_relative() {
        // Window [1, 5]: both interpretations coincide; relative wins the
        // tie and resolves to the same pages.
        let c = ctx(compute_window(1, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::auto(0, 9));
        assert_eq!((d.top_page, d.bottom_page), (1, 1));
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn slide_near_bottom_edge() {
        // Window [8, 12], threshold 1: bottom page 12 > 12 - 1.
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(110, 119));
        assert_eq!((d.top_page, d.bottom_page), (12, 12));
        assert_eq!(d.window_move, WindowMove::Slide { center: 12 });
    }

    #[test]
    fn slide_near_top_edge() {
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(70, 79));
        assert_eq!((d.top_page, d.bottom_page), (8, 8));
        assert_eq!(d.window_move, WindowMove::Slide { center: 8 });
    }

    #[test]
    fn no_slide_when_window_hits_dataset_start() {
        // Window [1, 5] cannot slide further up.
        let c = ctx(compute_window(1, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(0, 9));
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn no_slide_when_window_hits_dataset_end() {
        let c = ctx(compute_window(100, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(990, 999));
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn zero_threshold_never_slides() {
        let mut c = ctx(compute_window(10, 100, 5));
        c.prefetch_threshold_pages = 0;
        let d = resolve_visible_range(&c, VisibleRange::global(110, 119));
        assert_eq!(d.window_move, WindowMove::None);
    }

    #[test]
    fn pending_jump_pins_current_page() {
        let mut c = ctx(compute_window(51, 100, 5));
        c.pending_jump = Some(51);
        // The settling scroll reports pages 50-51; current stays pinned.
        let d = resolve_visible_range(&c, VisibleRange::global(495, 505));
        assert_eq!(d.current_page, 51);
        assert!(!d.clear_pending);
    }

    #[test]
    fn pending_jump_released_once_range_escapes() {
        let mut c = ctx(compute_window(51, 100, 5));
        c.pending_jump = Some(51);
        let d = resolve_visible_range(&c, VisibleRange::global(520, 529));
        assert_eq!(d.current_page, 53);
        assert!(d.clear_pending);
    }

    #[test]
    fn max_page_seen_clamps_to_dataset() {
        let mut c = ctx(compute_window(98, 100, 5));
        c.total_pages = 100;
        let d = resolve_visible_range(&c, VisibleRange::global(1500, 1510));
        assert_eq!(d.max_page_seen, 100);
    }

    #[test]
    fn reversed_report_is_normalized() {
        let c = ctx(compute_window(10, 100, 5));
        let d = resolve_visible_range(&c, VisibleRange::global(99, 80));
        assert_eq!((d.top_page, d.bottom_page), (9, 10));
    }

    #[test]
    fn report_on_last_page_forces_jump() {
        // Three items per page, four pages, window [1, 2]: global (9, 11)
        // is page 4 and forces a jump.
        let c = ViewportContext {
            window: compute_window(1, 4, 2),
            page_size: 3,
            total_pages: 4,
            prefetch_threshold_pages: 1,
            pending_jump: None,
        };
        let d = resolve_visible_range(&c, VisibleRange::global(9, 11));
        assert_eq!((d.top_page, d.bottom_page), (4, 4));
        assert_eq!(d.window_move, WindowMove::Jump { center: 4 });
    }
}
