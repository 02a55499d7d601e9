//! Whole-document scan behaviour, driven through an in-memory engine.
//!
//! The engine seam means none of these tests need a pdfium library or a real
//! PDF: a `FakeEngine` serves page text (or a poisoned failure) straight
//! from memory, and the scanner's contract — page ordering, occurrence
//! counting, fail-fast, cache interaction — is exercised exactly as it would
//! be against pdfium.

use pdf_quarry::{
    locate_matches, scan_document, DecodeSession, DocumentEngine, GlyphPosition,
    MemoryPageTextCache, PageKey, PageTextCache, SearchConfig, SearchError,
};
use std::sync::Arc;

// ── Fake engine ──────────────────────────────────────────────────────────────

/// In-memory document: each page is either text or a decode failure.
struct FakeEngine {
    pages: Vec<Result<String, String>>,
}

impl FakeEngine {
    fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| Ok(p.to_string())).collect(),
        }
    }

    fn with_poisoned_page(pages: &[&str], poisoned: usize, detail: &str) -> Self {
        let mut engine = Self::new(pages);
        engine.pages[poisoned - 1] = Err(detail.to_string());
        engine
    }
}

struct FakeSession {
    pages: Vec<Result<String, String>>,
}

impl DocumentEngine for FakeEngine {
    type Session<'a> = FakeSession where Self: 'a;

    fn open<'a>(&'a self, _bytes: &'a [u8]) -> Result<FakeSession, SearchError> {
        Ok(FakeSession {
            pages: self.pages.clone(),
        })
    }
}

impl DecodeSession for FakeSession {
    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn page_text(&self, page: u32) -> Result<String, SearchError> {
        let total = self.pages.len() as u32;
        if page < 1 || page > total {
            return Err(SearchError::PageOutOfRange { page, total });
        }
        match &self.pages[(page - 1) as usize] {
            Ok(text) => Ok(text.clone()),
            Err(detail) => Err(SearchError::PageDecodeFailed {
                page,
                detail: detail.clone(),
            }),
        }
    }

    fn glyph_positions(&self, page: u32) -> Result<Vec<GlyphPosition>, SearchError> {
        // One glyph per char on a single line, fixed metrics.
        let text = self.page_text(page)?;
        Ok(text
            .chars()
            .enumerate()
            .map(|(i, ch)| GlyphPosition {
                ch,
                x: 72.0 + i as f32 * 9.0,
                y: 100.0,
                width: 9.0,
                height: 11.0,
            })
            .collect())
    }
}

fn doc_bytes() -> Arc<[u8]> {
    Arc::from(&b"%PDF-1.7 fake"[..])
}

fn config_with_parallelism(n: usize) -> SearchConfig {
    SearchConfig::builder().parallelism(n).build().unwrap()
}

// ── Scan tests ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn hits_are_sorted_by_page_for_every_parallelism() {
    let pages = [
        "alpha beta",
        "nothing here",
        "beta beta beta",
        "still nothing",
        "one more beta",
        "beta again",
    ];
    for parallelism in [1, 2, 4, 16] {
        let engine = Arc::new(FakeEngine::new(&pages));
        let result = scan_document(
            engine,
            doc_bytes(),
            "doc.pdf",
            "beta",
            &config_with_parallelism(parallelism),
        )
        .await
        .unwrap();

        let numbers: Vec<u32> = result.pages.iter().map(|h| h.page_number).collect();
        assert_eq!(numbers, vec![1, 3, 5, 6], "parallelism {parallelism}");
        assert!(numbers.iter().all(|&n| n >= 1 && n <= result.total_pages));
        assert_eq!(result.parallelism, parallelism);
    }
}

#[tokio::test]
async fn repeated_scans_are_idempotent() {
    let pages = ["query here", "and query query here", "none"];
    let engine = Arc::new(FakeEngine::new(&pages));
    let config = config_with_parallelism(4);

    let first = scan_document(Arc::clone(&engine), doc_bytes(), "d", "query", &config)
        .await
        .unwrap();
    let second = scan_document(engine, doc_bytes(), "d", "query", &config)
        .await
        .unwrap();

    // Everything except the advisory timings must be byte-identical.
    assert_eq!(first.pages, second.pages);
    assert_eq!(first.total_pages, second.total_pages);
    assert_eq!(first.matched_pages, second.matched_pages);
}

#[tokio::test]
async fn single_matching_page_with_two_occurrences() {
    let engine = Arc::new(FakeEngine::new(&[
        "page one says hello",
        "Needle and a second needle",
        "page three is empty of it",
    ]));
    let result = scan_document(
        engine,
        doc_bytes(),
        "tri.pdf",
        "needle",
        &config_with_parallelism(2),
    )
    .await
    .unwrap();

    assert_eq!(result.total_pages, 3);
    assert_eq!(result.matched_pages, 1);
    assert_eq!(result.pages.len(), 1);
    let hit = &result.pages[0];
    assert_eq!(hit.page_number, 2);
    assert_eq!(hit.occurrences, 2);
}

#[tokio::test]
async fn page_text_is_wrapped_as_fenced_block() {
    let engine = Arc::new(FakeEngine::new(&["the needle text"]));
    let result = scan_document(
        engine,
        doc_bytes(),
        "one.pdf",
        "needle",
        &config_with_parallelism(1),
    )
    .await
    .unwrap();

    assert_eq!(result.pages[0].page_markdown, "```text\nthe needle text\n```");
}

#[tokio::test]
async fn one_bad_page_aborts_the_whole_scan() {
    let engine = Arc::new(FakeEngine::with_poisoned_page(
        &["match", "match", "broken", "match", "match"],
        3,
        "bad content stream",
    ));
    let err = scan_document(
        engine,
        doc_bytes(),
        "broken.pdf",
        "match",
        &config_with_parallelism(2),
    )
    .await
    .unwrap_err();

    match err {
        SearchError::ScanAborted { page, source } => {
            assert_eq!(page, 3);
            assert!(matches!(
                *source,
                SearchError::PageDecodeFailed { page: 3, .. }
            ));
        }
        other => panic!("expected ScanAborted, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_query_is_rejected_before_any_work() {
    let engine = Arc::new(FakeEngine::new(&["content"]));
    let err = scan_document(
        engine,
        doc_bytes(),
        "d.pdf",
        "",
        &SearchConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery));
}

#[tokio::test]
async fn no_matches_yields_empty_result_not_error() {
    let engine = Arc::new(FakeEngine::new(&["alpha", "beta"]));
    let result = scan_document(
        engine,
        doc_bytes(),
        "d.pdf",
        "gamma",
        &config_with_parallelism(2),
    )
    .await
    .unwrap();
    assert_eq!(result.matched_pages, 0);
    assert!(result.pages.is_empty());
    assert_eq!(result.total_pages, 2);
}

// ── Cache interaction ────────────────────────────────────────────────────────

#[tokio::test]
async fn scan_populates_the_injected_cache() {
    let cache = Arc::new(MemoryPageTextCache::with_capacity(16));
    let config = SearchConfig::builder()
        .parallelism(2)
        .cache(Arc::clone(&cache) as Arc<dyn PageTextCache>)
        .build()
        .unwrap();

    let engine = Arc::new(FakeEngine::new(&["one needle", "two", "three needle"]));
    scan_document(engine, doc_bytes(), "doc-v1", "needle", &config)
        .await
        .unwrap();

    assert_eq!(cache.len(), 3);
    assert_eq!(
        cache.get(&PageKey::new("doc-v1", 1)).as_deref(),
        Some("one needle")
    );
}

#[tokio::test]
async fn cached_text_is_served_instead_of_extraction() {
    let cache = Arc::new(MemoryPageTextCache::with_capacity(16));
    // Pre-fill page 1 under the same document key with different text than
    // the engine would produce; the scan must trust the cache.
    cache.put(PageKey::new("doc-v1", 1), "cached needle needle".to_string());

    let config = SearchConfig::builder()
        .parallelism(1)
        .cache(Arc::clone(&cache) as Arc<dyn PageTextCache>)
        .build()
        .unwrap();

    let engine = Arc::new(FakeEngine::new(&["no occurrences in the engine copy"]));
    let result = scan_document(engine, doc_bytes(), "doc-v1", "needle", &config)
        .await
        .unwrap();

    assert_eq!(result.matched_pages, 1);
    assert_eq!(result.pages[0].occurrences, 2);
}

// ── Locate through the seam ──────────────────────────────────────────────────

#[tokio::test]
async fn locate_matches_validates_page_range() {
    let engine = Arc::new(FakeEngine::new(&["hello world"]));
    let err = locate_matches(
        engine,
        doc_bytes(),
        "world",
        7,
        &SearchConfig::default(),
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        SearchError::PageOutOfRange { page: 7, total: 1 }
    ));
}

#[tokio::test]
async fn locate_matches_returns_scaled_boxes() {
    let engine = Arc::new(FakeEngine::new(&["hello world"]));
    let rects = locate_matches(
        engine,
        doc_bytes(),
        "world",
        1,
        &SearchConfig::default(),
    )
    .await
    .unwrap();

    assert_eq!(rects.len(), 1);
    // "world" is chars 6..11 of the fake layout: x = 72 + 6*9 = 126,
    // width = 5 glyphs * 9 = 45, scaled by the default 2.5.
    assert_eq!(rects[0].x, 126.0 * 2.5);
    assert_eq!(rects[0].w, 45.0 * 2.5);
}
