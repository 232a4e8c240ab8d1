//! Page surfaces and the page list model
//!
//! The viewer owns one [`PageList`]; each entry is a value object holding the
//! raster for one page at the current scale. Layout of the scroll content is
//! derived from the list, never stored separately.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::debug;

use crate::backend::{RasterImage, Viewport};
use crate::error::{Result, ViewerError};

/// One rendered page
#[derive(Clone, Debug, PartialEq)]
pub struct PageSurface {
    /// Page number (1-indexed)
    pub page_number: usize,
    pub viewport: Viewport,
    pub image: Arc<RasterImage>,
}

impl PageSurface {
    pub fn new(page_number: usize, viewport: Viewport, image: RasterImage) -> Self {
        Self {
            page_number,
            viewport,
            image: Arc::new(image),
        }
    }

    /// Displayed height; the surface is resized to its viewport
    pub fn height(&self) -> u32 {
        self.viewport.height
    }

    pub fn width(&self) -> u32 {
        self.viewport.width
    }
}

/// Ordered surfaces, one per page, plus the spacing used to lay them out
#[derive(Clone, Debug, Default)]
pub struct PageList {
    surfaces: Vec<PageSurface>,
    padding: u32,
    gap: u32,
}

impl PageList {
    pub fn new(padding: u32, gap: u32) -> Self {
        Self {
            surfaces: Vec::new(),
            padding,
            gap,
        }
    }

    pub fn clear(&mut self) {
        self.surfaces.clear();
    }

    /// Append the next page; surfaces must arrive in page order
    pub fn push(&mut self, surface: PageSurface) {
        debug_assert_eq!(surface.page_number, self.surfaces.len() + 1);
        self.surfaces.push(surface);
    }

    /// Swap in a complete, freshly rendered set of surfaces
    pub fn set_surfaces(&mut self, surfaces: Vec<PageSurface>) {
        debug_assert!(
            surfaces
                .iter()
                .enumerate()
                .all(|(i, s)| s.page_number == i + 1)
        );
        self.surfaces = surfaces;
    }

    pub fn get(&self, page_number: usize) -> Option<&PageSurface> {
        self.surfaces.get(page_number.checked_sub(1)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageSurface> {
        self.surfaces.iter()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Total scrollable height of the laid-out column
    pub fn content_height(&self) -> f64 {
        let pages: f64 = self
            .surfaces
            .iter()
            .map(|s| f64::from(s.height()) + f64::from(self.gap))
            .sum();
        pages + 2.0 * f64::from(self.padding)
    }

    /// Width of the widest page plus padding
    pub fn content_width(&self) -> f64 {
        let widest = self.surfaces.iter().map(PageSurface::width).max().unwrap_or(0);
        f64::from(widest) + 2.0 * f64::from(self.padding)
    }

    /// Top edge of `page_number` within the content
    pub fn page_top(&self, page_number: usize) -> Option<f64> {
        let index = page_number.checked_sub(1)?;
        if index >= self.surfaces.len() {
            return None;
        }
        let above: f64 = self.surfaces[..index]
            .iter()
            .map(|s| f64::from(s.height()) + f64::from(self.gap))
            .sum();
        Some(f64::from(self.padding) + above)
    }
}

/// Write every surface to `dir` as `page-NNNN.png`
pub fn export_pages(pages: &PageList, dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(pages.len());
    for surface in pages.iter() {
        let raster = surface.image.as_ref();
        let img = image::RgbImage::from_raw(raster.width, raster.height, raster.pixels.clone())
            .ok_or_else(|| ViewerError::page_render(surface.page_number, "raster size mismatch"))?;
        let path = dir.join(format!("page-{:04}.png", surface.page_number));
        img.save(&path)
            .map_err(|e| ViewerError::page_render(surface.page_number, e))?;
        debug!("Exported page {} to {path:?}", surface.page_number);
        written.push(path);
    }
    Ok(written)
}
