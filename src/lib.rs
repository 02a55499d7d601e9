//! # pdf-quarry
//!
//! Full-text search for PDF documents with pixel-space highlight rectangles.
//!
//! ## What it does
//!
//! Two operations cover the interesting ground:
//!
//! * **Whole-document scan** — every page of a document is searched
//!   concurrently for literal, case-insensitive occurrences of a query, and
//!   the result lists matching pages in page order with occurrence counts
//!   and the page text. All-or-nothing: one unreadable page aborts the scan.
//! * **Match boxes for one page** — each occurrence on a page is converted
//!   back into axis-aligned bounding rectangles, one per visual line the
//!   match spans, pre-scaled so they overlay a render of the same page at
//!   the configured DPI.
//!
//! ```text
//! PDF bytes
//!  │
//!  ├─ scan      one decode session per page unit, bounded worker pool,
//!  │            page-ordered PageHit list (occurrences + fenced text)
//!  ├─ locate    glyph positions → literal match spans → per-line Rects
//!  └─ render    companion page raster at the same scale factor
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_quarry::{scan_document, PdfiumEngine, SearchConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let bytes: Arc<[u8]> = std::fs::read("report.pdf")?.into();
//!     let engine = Arc::new(PdfiumEngine::new());
//!     let config = SearchConfig::default();
//!
//!     let result = scan_document(engine, bytes, "report.pdf", "liability", &config).await?;
//!     println!("{}/{} pages match", result.matched_pages, result.total_pages);
//!     for hit in &result.pages {
//!         println!("page {}: {} occurrence(s)", hit.page_number, hit.occurrences);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Coordinate contract
//!
//! Rectangles are emitted in the pixel space of a page rendered at
//! [`SearchConfig::dpi`] (default 180 DPI, scale factor 2.5 against the
//! PDF's 72-units-per-inch space). Render through [`render_page`] or
//! match the DPI yourself; either way no further transform is needed.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfquarry` binary (clap + anyhow + tracing-subscriber) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod locate;
pub mod markdown;
pub mod output;
pub mod render;
pub mod scan;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use cache::{MemoryPageTextCache, PageKey, PageTextCache};
pub use config::{SearchConfig, SearchConfigBuilder};
pub use engine::{DecodeSession, DocumentEngine, GlyphPosition, PdfiumEngine};
pub use error::SearchError;
pub use locate::{locate_matches, locate_rects, MatchSpan};
pub use output::{PageHit, Rect, SearchResult};
pub use render::render_page;
pub use scan::scan_document;
