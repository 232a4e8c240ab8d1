//! In-memory rendering library for tests

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{
    DocumentHandle, LoadProgress, PageSize, RasterImage, RenderLibrary, Viewport,
};
use crate::error::{Result, ViewerError};

/// Shape of the document a [`FakeLibrary`] opens
#[derive(Clone, Debug, Default)]
pub struct FakeDocumentSpec {
    pub pages: Vec<PageSize>,
    pub title: Option<String>,
    pub destinations: Vec<(String, usize)>,
    pub fail_render_page: Option<usize>,
    /// Page that renders on load but fails the next time it is drawn
    pub fail_rerender_page: Option<usize>,
    pub fail_metadata: bool,
}

impl FakeDocumentSpec {
    pub fn uniform(count: usize, width: f32, height: f32) -> Self {
        Self {
            pages: vec![PageSize::new(width, height); count],
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_destination(mut self, name: impl Into<String>, page: usize) -> Self {
        self.destinations.push((name.into(), page));
        self
    }

    pub fn failing_page(mut self, page: usize) -> Self {
        self.fail_render_page = Some(page);
        self
    }

    /// `page` fails its second render only, so a retry succeeds
    pub fn failing_rerender(mut self, page: usize) -> Self {
        self.fail_rerender_page = Some(page);
        self
    }

    pub fn failing_metadata(mut self) -> Self {
        self.fail_metadata = true;
        self
    }
}

/// Counters shared between a [`FakeLibrary`] and the documents it opens
#[derive(Debug, Default)]
pub struct CallCounts {
    pub open_calls: usize,
    pub init_attempts: u32,
    pub destroyed: usize,
    pub renders: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FakeCounters(Rc<RefCell<CallCounts>>);

impl FakeCounters {
    pub fn open_calls(&self) -> usize {
        self.0.borrow().open_calls
    }

    pub fn init_attempts(&self) -> u32 {
        self.0.borrow().init_attempts
    }

    pub fn destroyed(&self) -> usize {
        self.0.borrow().destroyed
    }

    pub fn renders(&self) -> usize {
        self.0.borrow().renders
    }

    fn update(&self, f: impl FnOnce(&mut CallCounts)) {
        f(&mut self.0.borrow_mut());
    }
}

#[derive(Debug)]
pub struct FakeLibrary {
    spec: FakeDocumentSpec,
    /// Initialization attempts needed before the library reports ready.
    /// `None` never becomes ready.
    ready_after: Option<u32>,
    counters: FakeCounters,
}

impl FakeLibrary {
    pub fn new(spec: FakeDocumentSpec) -> Self {
        Self {
            spec,
            ready_after: Some(0),
            counters: FakeCounters::default(),
        }
    }

    pub fn ready_after(mut self, attempts: u32) -> Self {
        self.ready_after = Some(attempts);
        self
    }

    pub fn never_ready(mut self) -> Self {
        self.ready_after = None;
        self
    }

    pub fn counters(&self) -> FakeCounters {
        self.counters.clone()
    }
}

impl RenderLibrary for FakeLibrary {
    fn is_ready(&self) -> bool {
        self.ready_after
            .is_some_and(|needed| self.counters.init_attempts() >= needed)
    }

    fn try_initialize(&mut self) -> Result<()> {
        self.counters.update(|c| c.init_attempts += 1);
        Ok(())
    }

    fn open(
        &mut self,
        data: &[u8],
        progress: &mut dyn FnMut(LoadProgress),
    ) -> Result<Box<dyn DocumentHandle>> {
        self.counters.update(|c| c.open_calls += 1);
        progress(LoadProgress {
            loaded: data.len() / 2,
            total: data.len(),
        });
        progress(LoadProgress {
            loaded: data.len(),
            total: data.len(),
        });
        Ok(Box::new(FakeDocument {
            spec: self.spec.clone(),
            counters: self.counters.clone(),
            render_counts: RefCell::new(HashMap::new()),
            destroyed: false,
        }))
    }
}

#[derive(Debug)]
pub struct FakeDocument {
    spec: FakeDocumentSpec,
    counters: FakeCounters,
    render_counts: RefCell<HashMap<usize, usize>>,
    destroyed: bool,
}

impl DocumentHandle for FakeDocument {
    fn page_count(&self) -> usize {
        self.spec.pages.len()
    }

    fn page_size(&self, page: usize) -> Result<PageSize> {
        page.checked_sub(1)
            .and_then(|i| self.spec.pages.get(i))
            .copied()
            .ok_or_else(|| ViewerError::page_render(page, "no such page"))
    }

    fn render_page(&self, page: usize, viewport: &Viewport) -> Result<RasterImage> {
        if self.spec.fail_render_page == Some(page) {
            return Err(ViewerError::page_render(page, "corrupt content stream"));
        }
        let previous = {
            let mut counts = self.render_counts.borrow_mut();
            let count = counts.entry(page).or_insert(0);
            *count += 1;
            *count - 1
        };
        if self.spec.fail_rerender_page == Some(page) && previous == 1 {
            return Err(ViewerError::page_render(page, "out of memory"));
        }
        self.counters.update(|c| c.renders += 1);
        Ok(RasterImage::blank(viewport.width, viewport.height))
    }

    fn title(&self) -> Result<Option<String>> {
        if self.spec.fail_metadata {
            return Err(ViewerError::render("metadata unreadable"));
        }
        Ok(self.spec.title.clone())
    }

    fn resolve_destination(&self, name: &str) -> Result<Option<usize>> {
        Ok(self
            .spec
            .destinations
            .iter()
            .find(|(dest, _)| dest == name)
            .map(|(_, page)| *page))
    }

    fn destroy(&mut self) {
        if !self.destroyed {
            self.destroyed = true;
            self.counters.update(|c| c.destroyed += 1);
        }
    }
}
