//! Result types returned to callers.
//!
//! All types here are plain serde-serializable data: the library has no
//! user-facing surface of its own, so a CLI or HTTP layer can ship these
//! straight out as JSON.

use serde::{Deserialize, Serialize};

/// An axis-aligned highlight rectangle in output pixel space.
///
/// Coordinates are pre-multiplied by the configured scale factor
/// ([`crate::SearchConfig::scale`]), so a `Rect` overlays a page rendered at
/// the same DPI without further transforms. `y` grows downward, matching
/// raster conventions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Build a rectangle with every component scaled independently.
    pub(crate) fn scaled(x: f32, y: f32, w: f32, h: f32, scale: f32) -> Self {
        Self {
            x: x * scale,
            y: y * scale,
            w: w * scale,
            h: h * scale,
        }
    }
}

/// One page's result in a whole-document scan.
///
/// Produced only for pages with at least one occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHit {
    /// 1-based page number.
    pub page_number: u32,
    /// The full page text wrapped as a fenced `text` block.
    pub page_markdown: String,
    /// Non-overlapping case-insensitive occurrences of the query on this page.
    pub occurrences: usize,
}

/// Aggregate result of a whole-document scan.
///
/// `pages` is always sorted ascending by page number, regardless of the
/// order worker units completed in. The timing fields and `parallelism` are
/// advisory observability data, not inputs to any decision logic — two scans
/// of the same document differ only there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// Caller-supplied document identity (e.g. a file name).
    pub source: String,
    /// The query that was searched for.
    pub query: String,
    /// Total pages the document has; every one of them was considered.
    pub total_pages: u32,
    /// Number of pages with at least one occurrence.
    pub matched_pages: usize,
    /// Per-page hits, ascending by page number.
    pub pages: Vec<PageHit>,
    /// Milliseconds spent opening the document for the page count.
    pub load_ms: u64,
    /// Milliseconds spent in the parallel scan phase.
    pub scan_ms: u64,
    /// Worker-pool size the scan actually used.
    pub parallelism: usize,
}
