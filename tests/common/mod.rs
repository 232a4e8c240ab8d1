#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use pagescroll::keyboard::KeyboardHub;
use pagescroll::settings::ViewerSettings;
use pagescroll::test_utils::{FakeDocumentSpec, FakeLibrary, FakeCounters};
use pagescroll::{FetchResponse, Viewer, ViewerEvent};

/// 432px wide container: a 200pt page fits at exactly 2x after padding
pub const WIDTH: f64 = 432.0;
pub const HEIGHT: f64 = 300.0;

pub struct Harness {
    pub viewer: Viewer<FakeLibrary>,
    pub events: Rc<RefCell<Vec<ViewerEvent>>>,
    pub counters: FakeCounters,
    pub hub: KeyboardHub,
}

impl Harness {
    pub fn new(spec: FakeDocumentSpec) -> Self {
        Self::with_library(FakeLibrary::new(spec), test_settings())
    }

    pub fn with_library(library: FakeLibrary, settings: ViewerSettings) -> Self {
        Self::build(library, settings, None)
    }

    /// Viewer whose page location carries a `book` parameter
    pub fn at_location(spec: FakeDocumentSpec, href: &str) -> Self {
        Self::build(FakeLibrary::new(spec), test_settings(), Some(href))
    }

    fn build(library: FakeLibrary, settings: ViewerSettings, href: Option<&str>) -> Self {
        let counters = library.counters();
        let hub = KeyboardHub::new();
        let mut viewer =
            Viewer::with_settings(library, settings, WIDTH, HEIGHT).with_keyboard_hub(hub.clone());
        if let Some(href) = href {
            viewer = viewer.with_location(href);
        }
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        viewer.subscribe(move |event| sink.borrow_mut().push(event.clone()));
        Self {
            viewer,
            events,
            counters,
            hub,
        }
    }

    /// `pages` pages of 200x300, loaded
    pub fn loaded(pages: usize) -> Self {
        let mut harness = Self::new(FakeDocumentSpec::uniform(pages, 200.0, 300.0));
        harness.load_ok();
        harness
    }

    /// Attach a progress slider; do this before loading
    pub fn with_slider(self) -> Self {
        Self {
            viewer: self.viewer.with_progress_slider(),
            ..self
        }
    }

    pub fn load_ok(&mut self) {
        self.viewer
            .load(FetchResponse::ok(b"%PDF-1.7 fake".to_vec()))
            .expect("document should load");
    }

    pub fn take_events(&self) -> Vec<ViewerEvent> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    pub fn page_changes(&self) -> Vec<usize> {
        self.events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                ViewerEvent::PageChanged { page_number, .. } => Some(*page_number),
                _ => None,
            })
            .collect()
    }
}

pub fn test_settings() -> ViewerSettings {
    ViewerSettings {
        library_poll_attempts: 3,
        library_poll_interval_ms: 1,
        ..ViewerSettings::default()
    }
}
