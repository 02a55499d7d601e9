//! Whole-document scan: every page, concurrently, all-or-nothing.
//!
//! The scanner splits a document into one unit of work per page and drives
//! the units through a bounded pool. Each unit opens its own decode session
//! over the shared byte buffer — sessions are never shared between workers —
//! extracts its one page's text, and counts literal occurrences of the query.
//!
//! ## Why `buffer_unordered` + `spawn_blocking`?
//!
//! Page extraction is CPU-bound pdfium work, so each unit runs on the
//! blocking pool; `buffer_unordered(parallelism)` caps how many are in
//! flight at once. Completion order is whatever the pool produces — the
//! result is sorted by page number afterwards so that order never leaks out.
//!
//! ## Fail-fast
//!
//! The scan is all-or-nothing. `try_collect` propagates the first unit
//! failure and drops the stream, abandoning units that have not started;
//! hits collected so far are discarded. A caller either gets a result that
//! considered every page, or one [`SearchError::ScanAborted`] naming the
//! first failing page.

use crate::cache::{PageKey, PageTextCache};
use crate::config::SearchConfig;
use crate::engine::{DecodeSession, DocumentEngine};
use crate::error::SearchError;
use crate::markdown::fenced_text_block;
use crate::output::{PageHit, SearchResult};
use futures::stream::{self, StreamExt, TryStreamExt};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Search every page of a document for literal, case-insensitive
/// occurrences of `query`.
///
/// `source` is the caller's identity for the document (a file name, an
/// object key); it is echoed into the result and used as the document part
/// of the page-text cache key when a cache is configured. `bytes` is treated
/// as read-only and shared across the worker pool.
///
/// The returned [`SearchResult`] lists one [`PageHit`] per matching page,
/// ascending by page number, and always accounts for the full document:
/// partial scans are never returned.
///
/// # Errors
/// [`SearchError::EmptyQuery`] before any work happens;
/// [`SearchError::DecodeFailed`] when the document cannot be opened;
/// [`SearchError::ScanAborted`] when any page unit fails.
pub async fn scan_document<E: DocumentEngine>(
    engine: Arc<E>,
    bytes: Arc<[u8]>,
    source: &str,
    query: &str,
    config: &SearchConfig,
) -> Result<SearchResult, SearchError> {
    if query.is_empty() {
        return Err(SearchError::EmptyQuery);
    }
    let parallelism = config.resolved_parallelism();
    let needle = query.to_lowercase();

    // One short-lived session just for the page count; per-page extraction
    // below always opens a fresh one.
    let load_start = Instant::now();
    let total_pages = {
        let engine = Arc::clone(&engine);
        let bytes = Arc::clone(&bytes);
        tokio::task::spawn_blocking(move || -> Result<u32, SearchError> {
            Ok(engine.open(&bytes)?.page_count())
        })
        .await
        .map_err(|e| SearchError::Internal(format!("page-count task panicked: {e}")))??
    };
    let load_ms = load_start.elapsed().as_millis() as u64;
    info!("document opened: {total_pages} pages, scanning with {parallelism} workers");

    let scan_start = Instant::now();
    let hits: Vec<Option<PageHit>> = stream::iter((1..=total_pages).map(|page| {
        let engine = Arc::clone(&engine);
        let bytes = Arc::clone(&bytes);
        let needle = needle.clone();
        let cache = config.cache.clone();
        let doc_key = source.to_string();
        async move {
            tokio::task::spawn_blocking(move || {
                scan_page(&*engine, &bytes, page, &needle, &doc_key, cache.as_deref())
            })
            .await
            .map_err(|e| SearchError::Internal(format!("scan worker panicked: {e}")))
            .and_then(|unit| unit)
            .map_err(|e| SearchError::ScanAborted {
                page,
                source: Box::new(e),
            })
        }
    }))
    .buffer_unordered(parallelism)
    .try_collect()
    .await?;
    let scan_ms = scan_start.elapsed().as_millis() as u64;

    let mut pages: Vec<PageHit> = hits.into_iter().flatten().collect();
    pages.sort_by_key(|h| h.page_number);

    info!(
        "scan complete: {}/{} pages matched in {}ms",
        pages.len(),
        total_pages,
        scan_ms
    );

    Ok(SearchResult {
        source: source.to_string(),
        query: query.to_string(),
        total_pages,
        matched_pages: pages.len(),
        pages,
        load_ms,
        scan_ms,
        parallelism,
    })
}

/// One unit of work: extract one page's text and count occurrences.
///
/// Opens its own decode session; consults the cache first when one is
/// configured. Returns `Some(PageHit)` only for pages with at least one
/// occurrence.
fn scan_page<E: DocumentEngine>(
    engine: &E,
    bytes: &[u8],
    page: u32,
    needle: &str,
    doc_key: &str,
    cache: Option<&dyn PageTextCache>,
) -> Result<Option<PageHit>, SearchError> {
    let text = match cache.and_then(|c| c.get(&PageKey::new(doc_key, page))) {
        Some(cached) => cached,
        None => {
            let session = engine.open(bytes)?;
            let text = session.page_text(page)?;
            if let Some(c) = cache {
                c.put(PageKey::new(doc_key, page), text.clone());
            }
            text
        }
    };

    let occurrences = count_occurrences(&text, needle);
    debug!("page {page}: {occurrences} occurrence(s)");
    if occurrences == 0 {
        return Ok(None);
    }
    Ok(Some(PageHit {
        page_number: page,
        page_markdown: fenced_text_block(&text),
        occurrences,
    }))
}

/// Count non-overlapping occurrences of `needle_lower` in `text`,
/// case-insensitively. `needle_lower` must already be lowercased.
fn count_occurrences(text: &str, needle_lower: &str) -> usize {
    if needle_lower.is_empty() {
        return 0;
    }
    let hay = text.to_lowercase();
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = hay[from..].find(needle_lower) {
        count += 1;
        from += pos + needle_lower.len();
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_are_case_insensitive() {
        assert_eq!(count_occurrences("Hello hello HELLO", "hello"), 3);
    }

    #[test]
    fn counts_do_not_overlap() {
        assert_eq!(count_occurrences("aaaa", "aa"), 2);
    }

    #[test]
    fn zero_count_for_absent_needle() {
        assert_eq!(count_occurrences("nothing here", "zebra"), 0);
    }

    #[test]
    fn needle_with_pattern_metacharacters_is_literal() {
        assert_eq!(count_occurrences("costs $4.99 or $4.99", "$4.99"), 2);
        assert_eq!(count_occurrences("a.c abc", "a.c"), 1);
    }
}
