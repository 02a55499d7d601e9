//! Error types for the pdf-quarry library.
//!
//! One enum covers the whole crate, grouped by where the failure originates:
//!
//! * Argument errors ([`SearchError::EmptyQuery`], [`SearchError::InvalidScale`],
//!   [`SearchError::InvalidConfig`]) — the caller handed the core something it
//!   rejects up front, before any PDF work happens.
//! * Document errors ([`SearchError::DecodeFailed`],
//!   [`SearchError::PageDecodeFailed`], [`SearchError::PageOutOfRange`]) —
//!   the PDF engine could not open the byte buffer or read a specific page.
//! * [`SearchError::ScanAborted`] — the whole-document scan is all-or-nothing:
//!   the first page unit that fails aborts the scan, and this variant wraps
//!   that page number together with the underlying cause. Partial results are
//!   never returned.
//!
//! Nothing here is retried or swallowed; callers (a CLI, an HTTP layer)
//! decide how to present each variant.

use thiserror::Error;

/// All errors returned by the pdf-quarry library.
#[derive(Debug, Error)]
pub enum SearchError {
    // ── Argument errors ───────────────────────────────────────────────────
    /// The query string is empty. An empty needle matches everywhere and
    /// nowhere; the core refuses it rather than guessing.
    #[error("Query must not be empty")]
    EmptyQuery,

    /// A non-positive scale factor was supplied to the locator.
    #[error("Scale factor must be positive, got {scale}")]
    InvalidScale { scale: f32 },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Document errors ───────────────────────────────────────────────────
    /// Requested page number lies outside `[1, total]`.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: u32, total: u32 },

    /// The PDF engine could not open or parse the document bytes.
    #[error("Failed to decode PDF document: {detail}")]
    DecodeFailed { detail: String },

    /// The PDF engine opened the document but failed on a specific page.
    #[error("Failed to decode page {page}: {detail}")]
    PageDecodeFailed { page: u32, detail: String },

    // ── Scan errors ───────────────────────────────────────────────────────
    /// A whole-document scan aborted because one page unit failed.
    ///
    /// The scan is fail-fast: outstanding page units are abandoned, hits
    /// collected so far are discarded, and this single error carries the
    /// first observed failing page and its cause.
    #[error("Scan aborted: page {page} failed: {source}")]
    ScanAborted {
        page: u32,
        #[source]
        source: Box<SearchError>,
    },

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
Place libpdfium next to the executable, or set PDFIUM_LIB_PATH to the\n\
directory containing an existing copy.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error (e.g. a panicked worker task).
    #[error("Internal error: {0}")]
    Internal(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_out_of_range_display() {
        let e = SearchError::PageOutOfRange { page: 9, total: 5 };
        let msg = e.to_string();
        assert!(msg.contains("Page 9"), "got: {msg}");
        assert!(msg.contains("5 pages"), "got: {msg}");
    }

    #[test]
    fn scan_aborted_carries_page_and_cause() {
        let e = SearchError::ScanAborted {
            page: 3,
            source: Box::new(SearchError::PageDecodeFailed {
                page: 3,
                detail: "bad content stream".into(),
            }),
        };
        let msg = e.to_string();
        assert!(msg.contains("page 3"), "got: {msg}");
        assert!(msg.contains("bad content stream"), "got: {msg}");
    }

    #[test]
    fn invalid_scale_display() {
        let e = SearchError::InvalidScale { scale: -1.5 };
        assert!(e.to_string().contains("-1.5"));
    }
}
