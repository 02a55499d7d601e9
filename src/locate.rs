//! Position-indexed match locator: from a query to highlight rectangles.
//!
//! Given one page's ordered glyph stream, the locator finds every literal,
//! case-insensitive occurrence of the query and converts each occurrence's
//! character span back into one axis-aligned bounding box per visual line it
//! touches, scaled into output pixel space.
//!
//! ## Why not a pattern engine?
//!
//! The query is literal text. Routing it through a regex engine would mean
//! quoting every metacharacter and inheriting that engine's corner cases; a
//! plain left-to-right scan over the glyph characters is both the simpler
//! and the safer contract — no pattern syntax ever leaks to callers.
//!
//! ## Index alignment
//!
//! Matching runs over a `Vec<char>` built from the glyph stream, one char
//! per glyph, so char index `i` in the haystack IS index `i` in the position
//! slice. Offsets never need re-mapping between text space and glyph space.

use crate::config::SearchConfig;
use crate::engine::{DecodeSession, DocumentEngine, GlyphPosition};
use crate::error::SearchError;
use crate::output::Rect;
use std::sync::Arc;
use tracing::debug;

/// A half-open character range `[start, end)` identifying one query
/// occurrence inside a page's concatenated glyph text.
///
/// Indices are glyph indices: `positions[start..end]` is exactly the matched
/// glyph run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan {
    pub start: usize,
    pub end: usize,
}

/// Find every literal, non-overlapping occurrence of `needle` in `haystack`,
/// left to right.
///
/// Case folding is the caller's responsibility; this function compares chars
/// exactly. After a match the scan resumes past its end, so overlapping
/// self-occurrences are not double-reported.
pub fn find_matches(haystack: &[char], needle: &[char]) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    if needle.is_empty() || haystack.len() < needle.len() {
        return spans;
    }
    let mut i = 0;
    while i + needle.len() <= haystack.len() {
        if haystack[i..i + needle.len()] == *needle {
            spans.push(MatchSpan {
                start: i,
                end: i + needle.len(),
            });
            i += needle.len();
        } else {
            i += 1;
        }
    }
    spans
}

/// Convert every occurrence of `query` in one page's glyph stream into
/// highlight rectangles in output pixel space.
///
/// `positions` must belong to exactly one page, in visual reading order as
/// produced by the engine. Rectangles are appended in match order
/// (left-to-right, top-to-bottom as the haystack reads) and, within a match,
/// in line order. A query with zero occurrences yields an empty vector, not
/// an error.
///
/// # Errors
/// [`SearchError::EmptyQuery`] for an empty query,
/// [`SearchError::InvalidScale`] for `scale <= 0`.
pub fn locate_rects(
    positions: &[GlyphPosition],
    query: &str,
    scale: f32,
) -> Result<Vec<Rect>, SearchError> {
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    if scale <= 0.0 {
        return Err(SearchError::InvalidScale { scale });
    }

    let haystack: Vec<char> = positions.iter().map(|p| fold(p.ch)).collect();
    let needle: Vec<char> = query.to_lowercase().chars().collect();

    let spans = find_matches(&haystack, &needle);
    debug!("{} match span(s) for query of {} chars", spans.len(), needle.len());

    let mut rects = Vec::new();
    for span in spans {
        push_boxes_for_span(&positions[span.start..span.end], scale, &mut rects);
    }
    Ok(rects)
}

/// Open a decode session, validate `page`, and locate `query` on that page.
///
/// Convenience entry point around [`locate_rects`]: runs the engine work on
/// the blocking pool (pdfium is CPU-bound and not async-safe) and applies the
/// configured scale. The session lives for this one call only.
pub async fn locate_matches<E: DocumentEngine>(
    engine: Arc<E>,
    bytes: Arc<[u8]>,
    query: &str,
    page: u32,
    config: &SearchConfig,
) -> Result<Vec<Rect>, SearchError> {
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let query = query.to_string();
    let scale = config.scale();

    tokio::task::spawn_blocking(move || {
        let session = engine.open(&bytes)?;
        let total = session.page_count();
        if page < 1 || page > total {
            return Err(SearchError::PageOutOfRange { page, total });
        }
        let positions = session.glyph_positions(page)?;
        locate_rects(&positions, &query, scale)
    })
    .await
    .map_err(|e| SearchError::Internal(format!("locate task panicked: {e}")))?
}

/// Simple case folding: the first lowercase mapping of the char.
///
/// One char in, one char out, so haystack indices stay aligned with glyph
/// indices even for characters whose full lowercase expansion is longer.
fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Group one match span's glyphs into line clusters and flush each cluster's
/// bounding box as a scaled rectangle.
///
/// A new line begins when the glyph's baseline differs from the cluster's
/// reference baseline by more than half the current glyph's height. Clusters
/// whose max x never exceeds their min x are suppressed (a degenerate glyph
/// run would otherwise emit a zero-width rectangle).
fn push_boxes_for_span(glyphs: &[GlyphPosition], scale: f32, out: &mut Vec<Rect>) {
    let mut cur_y = f32::NAN;
    let mut min_x = f32::MAX;
    let mut max_x = f32::MIN;
    let mut min_y = f32::MAX;
    let mut max_y = f32::MIN;

    for g in glyphs {
        if cur_y.is_nan() {
            cur_y = g.y;
        }
        if (g.y - cur_y).abs() > g.height * 0.5 {
            if max_x > min_x {
                out.push(Rect::scaled(min_x, min_y, max_x - min_x, max_y - min_y, scale));
            }
            cur_y = g.y;
            min_x = f32::MAX;
            max_x = f32::MIN;
            min_y = f32::MAX;
            max_y = f32::MIN;
        }

        min_x = min_x.min(g.x);
        min_y = min_y.min(g.y - g.height);
        max_x = max_x.max(g.x + g.width);
        max_y = max_y.max(g.y);
    }
    if max_x > min_x {
        out.push(Rect::scaled(min_x, min_y, max_x - min_x, max_y - min_y, scale));
    }
}
