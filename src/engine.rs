//! The PDF engine seam: decode sessions over an immutable byte buffer.
//!
//! Everything the search core needs from a PDF library is expressed by two
//! small traits: [`DocumentEngine`] opens a [`DecodeSession`] over a shared
//! read-only byte buffer, and the session answers page count, per-page plain
//! text, and per-page glyph positions. The production implementation
//! ([`PdfiumEngine`]) is backed by `pdfium-render`; tests inject an in-memory
//! engine through the same seam.
//!
//! ## Session discipline
//!
//! A decode session is cheap to open and is never shared between threads or
//! reused across units of work: the scanner opens one session per page unit,
//! and the page-count probe uses a session of its own. Decode state lives
//! inside pdfium, so "one session per unit" is a hard invariant of this
//! crate, not a style preference.
//!
//! The pdfium session binds its own library handle and re-opens the document
//! from the shared buffer for each extraction call — nothing pdfium-side is
//! ever shared between two sessions. The `thread_safe` crate feature
//! serialises the underlying C calls, so sessions on different worker
//! threads coexist safely.

use crate::error::SearchError;
use pdfium_render::prelude::*;
use tracing::debug;

/// One decoded character on a page, with its position metrics.
///
/// Coordinates use the top-down reading convention: `x` is the glyph's left
/// edge, `y` its baseline measured from the top of the page, `width` the
/// advance and `height` the glyph height, all in PDF units (72 per inch).
/// The glyph's box therefore spans `y - height ..= y` vertically.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphPosition {
    /// The character this glyph represents.
    pub ch: char,
    /// Left edge in PDF units.
    pub x: f32,
    /// Baseline position, measured top-down.
    pub y: f32,
    /// Advance width in PDF units.
    pub width: f32,
    /// Glyph height in PDF units.
    pub height: f32,
}

/// Opens decode sessions over a document byte buffer.
///
/// Implementations must be shareable across the scanner's worker threads;
/// the sessions they produce are used by exactly one thread each and never
/// escape it.
pub trait DocumentEngine: Send + Sync + 'static {
    /// The session type produced by [`DocumentEngine::open`]. Borrows the
    /// byte buffer; zero-copy implementations are expected.
    type Session<'a>: DecodeSession
    where
        Self: 'a;

    /// Open one independent decode session over `bytes`.
    ///
    /// # Errors
    /// [`SearchError::DecodeFailed`] when the buffer is not a parsable PDF.
    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<Self::Session<'a>, SearchError>;
}

/// A single decode session: page count and per-page extraction.
///
/// Page numbers are 1-based everywhere; out-of-range pages fail with
/// [`SearchError::PageOutOfRange`].
pub trait DecodeSession {
    /// Number of pages in the document.
    fn page_count(&self) -> u32;

    /// Extract the plain text of exactly one page.
    fn page_text(&self, page: u32) -> Result<String, SearchError>;

    /// Extract the ordered glyph-position stream of exactly one page, in the
    /// visual reading order the text engine emits.
    fn glyph_positions(&self, page: u32) -> Result<Vec<GlyphPosition>, SearchError>;
}

// ── Pdfium implementation ────────────────────────────────────────────────

/// Bind to the pdfium dynamic library.
///
/// Resolution order: `PDFIUM_LIB_PATH` (a directory), the current working
/// directory, then the system library path.
pub(crate) fn bind_pdfium() -> Result<Pdfium, SearchError> {
    let dir = std::env::var("PDFIUM_LIB_PATH").unwrap_or_else(|_| "./".to_string());
    let bindings = Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(&dir))
        .or_else(|_| Pdfium::bind_to_system_library())
        .map_err(|e| SearchError::PdfiumBindingFailed(format!("{e:?}")))?;
    Ok(Pdfium::new(bindings))
}

/// Production [`DocumentEngine`] backed by pdfium.
#[derive(Default)]
pub struct PdfiumEngine {
    password: Option<String>,
}

impl PdfiumEngine {
    /// Engine for unencrypted documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Engine that supplies `password` when opening each session.
    pub fn with_password(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }
}

impl DocumentEngine for PdfiumEngine {
    type Session<'a> = PdfiumSession<'a> where Self: 'a;

    fn open<'a>(&'a self, bytes: &'a [u8]) -> Result<PdfiumSession<'a>, SearchError> {
        let pdfium = bind_pdfium()?;
        let password = self.password.as_deref();
        // Parse once up front: a buffer that is not a PDF fails here, and
        // the page count is fixed for the session's lifetime.
        let page_count = {
            let doc = load_document(&pdfium, bytes, password)?;
            doc.pages().len() as u32
        };
        Ok(PdfiumSession {
            pdfium,
            bytes,
            password,
            page_count,
        })
    }
}

/// A decode session over one document buffer, with its own pdfium binding.
///
/// Each extraction call re-opens the document from the shared buffer; the
/// handle never outlives the call, so no pdfium state is carried between
/// calls or shared with any other session.
pub struct PdfiumSession<'a> {
    pdfium: Pdfium,
    bytes: &'a [u8],
    password: Option<&'a str>,
    page_count: u32,
}

impl PdfiumSession<'_> {
    fn document(&self) -> Result<PdfDocument<'_>, SearchError> {
        load_document(&self.pdfium, self.bytes, self.password)
    }
}

impl DecodeSession for PdfiumSession<'_> {
    fn page_count(&self) -> u32 {
        self.page_count
    }

    fn page_text(&self, page: u32) -> Result<String, SearchError> {
        let index = page_index(page, self.page_count)?;
        let doc = self.document()?;
        let pages = doc.pages();
        let pdf_page = pages.get(index).map_err(|e| page_error(page, &e))?;
        let text = pdf_page.text().map_err(|e| page_error(page, &e))?;
        Ok(text.all())
    }

    fn glyph_positions(&self, page: u32) -> Result<Vec<GlyphPosition>, SearchError> {
        let index = page_index(page, self.page_count)?;
        let doc = self.document()?;
        let pages = doc.pages();
        let pdf_page = pages.get(index).map_err(|e| page_error(page, &e))?;
        let page_height = pdf_page.height().value;
        let text = pdf_page.text().map_err(|e| page_error(page, &e))?;

        let mut positions = Vec::new();
        for ch in text.chars().iter() {
            // Generated glyphs (synthesised line breaks etc.) have no usable
            // bounds and carry no visual extent; skip them.
            if let (Some(unicode), Ok(bounds)) = (ch.unicode_char(), ch.tight_bounds()) {
                positions.push(GlyphPosition {
                    ch: unicode,
                    x: bounds.left().value,
                    // pdfium measures bottom-up; flip to the top-down
                    // baseline convention.
                    y: page_height - bounds.bottom().value,
                    width: (bounds.right().value - bounds.left().value).abs(),
                    height: (bounds.top().value - bounds.bottom().value).abs(),
                });
            }
        }
        debug!("page {page}: {} positioned glyphs", positions.len());
        Ok(positions)
    }
}

fn load_document<'a>(
    pdfium: &'a Pdfium,
    bytes: &'a [u8],
    password: Option<&str>,
) -> Result<PdfDocument<'a>, SearchError> {
    pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| SearchError::DecodeFailed {
            detail: format!("{e:?}"),
        })
}

/// Validate a 1-based page number against `total`, returning the 0-based
/// pdfium page index.
fn page_index(page: u32, total: u32) -> Result<u16, SearchError> {
    if page < 1 || page > total {
        return Err(SearchError::PageOutOfRange { page, total });
    }
    Ok((page - 1) as u16)
}

fn page_error(page: u32, e: &PdfiumError) -> SearchError {
    SearchError::PageDecodeFailed {
        page,
        detail: format!("{e:?}"),
    }
}
