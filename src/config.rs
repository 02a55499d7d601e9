//! Configuration for search and rendering.
//!
//! Every knob lives in one [`SearchConfig`] struct built through
//! [`SearchConfigBuilder`], so a config can be shared across worker threads,
//! logged, and diffed between two runs to understand why their outputs differ.
//!
//! The one invariant worth calling out: [`SearchConfig::scale`] is the single
//! source of truth for the pixel-space the locator emits rectangles in. It is
//! the ratio between the render DPI and the PDF's native 72-units-per-inch
//! space, so rectangles overlay a page rendered through
//! [`crate::render::render_page`] without any further transform.

use crate::cache::PageTextCache;
use crate::error::SearchError;
use std::fmt;
use std::sync::Arc;
use std::thread;

/// Native PDF unit space: 72 units per inch.
const PDF_UNITS_PER_INCH: f32 = 72.0;

/// Configuration for document scans and match-box queries.
///
/// Built via [`SearchConfig::builder()`] or [`SearchConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_quarry::SearchConfig;
///
/// let config = SearchConfig::builder()
///     .dpi(180)
///     .parallelism(4)
///     .build()
///     .unwrap();
/// assert_eq!(config.scale(), 2.5);
/// ```
#[derive(Clone)]
pub struct SearchConfig {
    /// Resolution the companion page render uses, in DPI. Range: 72–600. Default: 180.
    ///
    /// Highlight rectangles are scaled by `dpi / 72`, so this value must match
    /// the resolution of whatever raster the caller overlays them on. 180 DPI
    /// (scale 2.5) keeps text legible on ordinary displays without producing
    /// multi-megapixel images for large pages.
    pub dpi: u32,

    /// Worker-pool size for whole-document scans. Default: 0 (auto).
    ///
    /// 0 resolves to the host's available logical core count at scan time.
    /// Page extraction is CPU-bound, so going past the core count buys
    /// nothing; lowering it bounds memory when many scans run side by side.
    pub parallelism: usize,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Optional page-text cache consulted by the scanner.
    ///
    /// Purely an accelerator: scans are correct with or without it. The
    /// caller owns the cache and its key discipline (document identity plus
    /// content version), so a stale file never serves stale text unless the
    /// caller's key says it may.
    pub cache: Option<Arc<dyn PageTextCache>>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            dpi: 180,
            parallelism: 0,
            password: None,
            cache: None,
        }
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("dpi", &self.dpi)
            .field("parallelism", &self.parallelism)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("cache", &self.cache.as_ref().map(|_| "<dyn PageTextCache>"))
            .finish()
    }
}

impl SearchConfig {
    /// Create a new builder for `SearchConfig`.
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder {
            config: Self::default(),
        }
    }

    /// Scale factor from PDF unit space into output pixel space.
    ///
    /// `180 / 72 = 2.5` at the default DPI.
    pub fn scale(&self) -> f32 {
        self.dpi as f32 / PDF_UNITS_PER_INCH
    }

    /// The worker-pool size a scan will actually use: the configured value,
    /// or the available logical core count when set to 0.
    pub fn resolved_parallelism(&self) -> usize {
        if self.parallelism > 0 {
            self.parallelism
        } else {
            thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        }
    }
}

/// Builder for [`SearchConfig`].
#[derive(Debug)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn parallelism(mut self, n: usize) -> Self {
        self.config.parallelism = n;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn cache(mut self, cache: Arc<dyn PageTextCache>) -> Self {
        self.config.cache = Some(cache);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SearchConfig, SearchError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(SearchError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scale_is_two_and_a_half() {
        assert_eq!(SearchConfig::default().scale(), 2.5);
    }

    #[test]
    fn dpi_is_clamped() {
        let config = SearchConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(config.dpi, 600);
        let config = SearchConfig::builder().dpi(10).build().unwrap();
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn zero_parallelism_resolves_to_at_least_one() {
        let config = SearchConfig::default();
        assert!(config.resolved_parallelism() >= 1);
    }

    #[test]
    fn explicit_parallelism_wins() {
        let config = SearchConfig::builder().parallelism(3).build().unwrap();
        assert_eq!(config.resolved_parallelism(), 3);
    }
}
