//! MuPDF-backed rendering library

use log::debug;
use mupdf::{Colorspace, Document, Matrix, MetadataName};

use super::{DocumentHandle, LoadProgress, PageSize, RasterImage, RenderLibrary, Viewport};
use crate::error::{Result, ViewerError};

const PDF_MAGIC: &str = "application/pdf";

/// MuPDF is linked in, so it is ready as soon as it exists
#[derive(Debug, Default)]
pub struct MupdfLibrary;

impl RenderLibrary for MupdfLibrary {
    fn is_ready(&self) -> bool {
        true
    }

    fn try_initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn open(
        &mut self,
        data: &[u8],
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Box<dyn DocumentHandle>> {
        let doc = Document::from_bytes(data, PDF_MAGIC)?;
        progress(LoadProgress {
            loaded: data.len(),
            total: data.len(),
        });
        let destinations = outline_destinations(&doc);
        debug!("Opened PDF with {} outline destinations", destinations.len());
        Ok(Box::new(MupdfDocument {
            doc: Some(doc),
            destinations,
        }))
    }
}

pub struct MupdfDocument {
    doc: Option<Document>,
    /// Outline titles with their 1-based target page
    destinations: Vec<(String, usize)>,
}

impl MupdfDocument {
    fn doc(&self) -> Result<&Document> {
        self.doc.as_ref().ok_or(ViewerError::NotLoaded)
    }

    fn load_page(&self, page: usize) -> Result<mupdf::Page> {
        let index = page
            .checked_sub(1)
            .ok_or_else(|| ViewerError::page_render(page, "page numbers start at 1"))?;
        Ok(self.doc()?.load_page(index as i32)?)
    }
}

impl DocumentHandle for MupdfDocument {
    fn page_count(&self) -> usize {
        self.doc
            .as_ref()
            .and_then(|doc| doc.page_count().ok())
            .map_or(0, |count| count.max(0) as usize)
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        let bounds = self.load_page(page)?.bounds()?;
        Ok(PageSize::new(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn render_page(&self, page: usize, viewport: &Viewport) -> Result<RasterImage> {
        let page_ref = self.load_page(page)?;
        let transform = Matrix::new_scale(viewport.scale, viewport.scale);
        let rgb = Colorspace::device_rgb();
        let pixmap = page_ref.to_pixmap(&transform, &rgb, false, false)?;

        let (width, height) = (pixmap.width(), pixmap.height());
        let image = RasterImage {
            width,
            height,
            pixels: pixmap.samples().to_vec(),
        };
        if image.pixels.len() != width as usize * height as usize * 3 {
            return Err(ViewerError::page_render(page, "unexpected pixmap layout"));
        }
        Ok(image)
    }

    fn title(&self) -> Result<Option<String>> {
        let title = self.doc()?.metadata(MetadataName::Title)?;
        let title = title.trim();
        Ok((!title.is_empty()).then(|| title.to_string()))
    }

    fn resolve_destination(&self, name: &str) -> Result<Option<usize>> {
        self.doc()?;
        let wanted = name.trim().trim_start_matches('#');
        if let Some(page) = wanted
            .strip_prefix("page=")
            .and_then(|n| n.parse::<usize>().ok())
        {
            return Ok(Some(page));
        }

        Ok(self
            .destinations
            .iter()
            .find(|(title, _)| title.eq_ignore_ascii_case(wanted))
            .map(|(_, page)| *page))
    }

    fn destroy(&mut self) {
        if self.doc.take().is_some() {
            debug!("Released MuPDF document");
        }
    }
}

fn outline_destinations(doc: &Document) -> Vec<(String, usize)> {
    let mut entries = Vec::new();
    if let Ok(outlines) = doc.outlines() {
        flatten_outlines(&outlines, &mut entries);
    }
    entries
}

fn flatten_outlines(outlines: &[mupdf::Outline], entries: &mut Vec<(String, usize)>) {
    for outline in outlines {
        if let Some(dest) = &outline.dest {
            let title = outline.title.trim();
            if !title.is_empty() {
                entries.push((title.to_string(), dest.loc.page_number as usize + 1));
            }
        }
        if !outline.down.is_empty() {
            flatten_outlines(&outline.down, entries);
        }
    }
}
