//! Rendering library seam
//!
//! The viewer never parses documents itself. A [`RenderLibrary`] opens bytes
//! into a [`DocumentHandle`], which answers page geometry, rasterises pages
//! and resolves named destinations. Page numbers are 1-based throughout.

#[cfg(feature = "pdf")]
pub mod pdf;

use crate::error::Result;

/// Native page size at scale 1.0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Per-page rendering geometry at a given scale
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub scale: f32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Surface dimensions are the scaled size truncated to whole pixels
    #[must_use]
    pub fn compute(size: PageSize, scale: f32) -> Self {
        Self {
            scale,
            width: (size.width * scale).max(1.0) as u32,
            height: (size.height * scale).max(1.0) as u32,
        }
    }
}

/// RGB raster produced for one page (3 bytes per pixel)
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl RasterImage {
    /// Blank white raster of the given size
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0xFF; width as usize * height as usize * 3],
        }
    }
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Byte-level progress reported while a document opens
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadProgress {
    pub loaded: usize,
    pub total: usize,
}

impl LoadProgress {
    pub fn percent(&self) -> Option<u32> {
        (self.total > 0).then(|| ((self.loaded as f64 / self.total as f64) * 100.0).round() as u32)
    }
}

/// A loaded multi-page document
pub trait DocumentHandle {
    fn page_count(&self) -> usize;

    /// Native size of `page`
    fn page_size(&self, page: usize) -> Result<PageSize>;

    /// Rasterise `page` into a surface matching `viewport`
    fn render_page(&self, page: usize, viewport: &Viewport) -> Result<RasterImage>;

    /// Title from document metadata, `None` when absent or blank
    fn title(&self) -> Result<Option<String>>;

    /// Page a named destination points at, `None` when unknown
    fn resolve_destination(&self, name: &str) -> Result<Option<usize>>;

    /// Release the underlying document; later calls are no-ops
    fn destroy(&mut self);
}

/// The document-rendering library
pub trait RenderLibrary {
    /// Whether the library can open documents right now
    fn is_ready(&self) -> bool;

    /// Attempt to bring the library up
    fn try_initialize(&mut self) -> Result<()>;

    fn open(
        &mut self,
        data: &[u8],
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Box<dyn DocumentHandle>>;
}
