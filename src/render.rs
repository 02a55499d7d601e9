//! Plain page rendering at the configured highlight resolution.
//!
//! Highlight rectangles are only useful against a raster they line up with,
//! so the renderer and the locator share one scale constant:
//! [`crate::SearchConfig::scale`], the ratio between the configured DPI and
//! the PDF's 72-units-per-inch native space. A page rendered here and the
//! rectangles from [`crate::locate_matches`] overlay without further
//! transforms.
//!
//! Encoding the returned image (PNG or otherwise) is the caller's concern;
//! `image::DynamicImage` already knows how.

use crate::config::SearchConfig;
use crate::engine::bind_pdfium;
use crate::error::SearchError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Render one page to an image at the configured scale.
///
/// Runs on the blocking pool since pdfium rasterisation is CPU-bound.
///
/// # Errors
/// [`SearchError::DecodeFailed`] when the document cannot be opened,
/// [`SearchError::PageOutOfRange`] for a bad page number,
/// [`SearchError::PageDecodeFailed`] when rasterisation itself fails.
pub async fn render_page(
    bytes: Arc<[u8]>,
    page: u32,
    config: &SearchConfig,
) -> Result<DynamicImage, SearchError> {
    let scale = config.scale();
    let password = config.password.clone();

    tokio::task::spawn_blocking(move || render_page_blocking(&bytes, page, scale, password.as_deref()))
        .await
        .map_err(|e| SearchError::Internal(format!("render task panicked: {e}")))?
}

fn render_page_blocking(
    bytes: &[u8],
    page: u32,
    scale: f32,
    password: Option<&str>,
) -> Result<DynamicImage, SearchError> {
    let pdfium = bind_pdfium()?;
    let document = pdfium
        .load_pdf_from_byte_slice(bytes, password)
        .map_err(|e| SearchError::DecodeFailed {
            detail: format!("{e:?}"),
        })?;

    let pages = document.pages();
    let total = pages.len() as u32;
    if page < 1 || page > total {
        return Err(SearchError::PageOutOfRange { page, total });
    }

    let pdf_page = pages
        .get((page - 1) as u16)
        .map_err(|e| SearchError::PageDecodeFailed {
            page,
            detail: format!("{e:?}"),
        })?;

    // Target size = page size in PDF units × scale, so the raster's pixel
    // space is exactly the one highlight rectangles are emitted in.
    let width = pdf_page.width().value;
    let height = pdf_page.height().value;
    let render_config = PdfRenderConfig::new()
        .set_target_width((width * scale) as i32)
        .set_target_height((height * scale) as i32);
    let bitmap = pdf_page
        .render_with_config(&render_config)
        .map_err(|e| SearchError::PageDecodeFailed {
            page,
            detail: format!("{e:?}"),
        })?;

    let image = bitmap.as_image();
    debug!("rendered page {page} at scale {scale} → {}x{} px", image.width(), image.height());
    Ok(image)
}
