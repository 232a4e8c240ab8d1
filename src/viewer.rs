//! The viewer component
//!
//! Owns the document handle, the page list, the scroll container and the
//! gesture trackers, and reconciles them into [`ViewerState`]. Everything
//! runs on the caller's thread; time-dependent work (smooth scrolling, the
//! scroll debounce, queued key presses) advances in [`Viewer::tick`].

use std::thread;
use std::time::Instant;

use log::{debug, error, info, warn};

use crate::backend::{DocumentHandle, LoadProgress, RenderLibrary, Viewport};
use crate::container::{ScrollBehavior, ScrollContainer};
use crate::debounce::Debouncer;
use crate::error::{Result, ViewerError};
use crate::events::{EventBus, ListenerId, ViewerEvent};
use crate::fetch::FetchResponse;
use crate::gesture::{PinchTracker, TouchPoint, double_tap_target, two_finger_distance};
use crate::keyboard::{KeyboardHub, KeySubscription, NavKey};
use crate::location::file_name_from_location;
use crate::navigation;
use crate::progress::{Progress, ProgressSlider, page_for_slider, slider_scroll_target};
use crate::settings::{self, FontSize, ViewerSettings};
use crate::state::{Command, Effect, ViewerState};
use crate::status::StatusLine;
use crate::surface::{PageList, PageSurface};
use crate::theme::{Theme, ThemePalette};
use crate::zoom::ScaleBounds;

/// Chapter navigation target
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    Named(String),
    Page(usize),
}

impl Destination {
    /// Bare numbers are page numbers, anything else a named destination
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        match s.parse::<usize>() {
            Ok(page) => Destination::Page(page),
            Err(_) => Destination::Named(s.to_string()),
        }
    }
}

impl From<&str> for Destination {
    fn from(name: &str) -> Self {
        Destination::Named(name.to_string())
    }
}

impl From<usize> for Destination {
    fn from(page: usize) -> Self {
        Destination::Page(page)
    }
}

pub struct Viewer<L: RenderLibrary> {
    library: L,
    settings: ViewerSettings,
    document: Option<Box<dyn DocumentHandle>>,
    state: ViewerState,
    pages: PageList,
    container: ScrollContainer,
    pinch: PinchTracker,
    scroll_debounce: Debouncer,
    events: EventBus,
    keyboard: KeyboardHub,
    key_subscription: Option<KeySubscription>,
    listeners_bound: bool,
    slider: Option<ProgressSlider>,
    palette: ThemePalette,
    status: StatusLine,
    location: Option<String>,
}

impl<L: RenderLibrary> Viewer<L> {
    /// Viewer over a `width` x `height` container using the global settings
    pub fn new(library: L, width: f64, height: f64) -> Self {
        Self::with_settings(library, settings::current(), width, height)
    }

    pub fn with_settings(library: L, settings: ViewerSettings, width: f64, height: f64) -> Self {
        let bounds = ScaleBounds::new(settings.min_scale, settings.max_scale);
        let theme = if settings.dark_theme {
            Theme::dark()
        } else {
            Theme::light()
        };
        Self {
            container: ScrollContainer::new(width, height, settings.smooth_scroll()),
            pages: PageList::new(settings.container_padding, settings.page_gap),
            scroll_debounce: Debouncer::new(settings.scroll_debounce()),
            state: ViewerState::new(bounds),
            pinch: PinchTracker::new(1.0),
            events: EventBus::new(),
            keyboard: KeyboardHub::document(),
            key_subscription: None,
            listeners_bound: false,
            slider: None,
            palette: ThemePalette::from_theme(&theme),
            status: StatusLine::new(),
            location: None,
            document: None,
            library,
            settings,
        }
    }

    /// Bind keyboard navigation to `hub` instead of the process-wide one
    pub fn with_keyboard_hub(mut self, hub: KeyboardHub) -> Self {
        self.keyboard = hub;
        self
    }

    /// Location used for the title fallback
    pub fn with_location(mut self, href: impl Into<String>) -> Self {
        self.location = Some(href.into());
        self
    }

    /// Attach a host progress slider
    pub fn with_progress_slider(mut self) -> Self {
        self.slider = Some(ProgressSlider::new());
        self
    }

    pub fn subscribe<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&ViewerEvent) + 'static,
    {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    pub fn current_page(&self) -> usize {
        self.state.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages
    }

    pub fn scale(&self) -> f32 {
        self.state.scale
    }

    pub fn state(&self) -> &ViewerState {
        &self.state
    }

    pub fn pages(&self) -> &PageList {
        &self.pages
    }

    pub fn container(&self) -> &ScrollContainer {
        &self.container
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn palette(&self) -> &ThemePalette {
        &self.palette
    }

    pub fn settings(&self) -> &ViewerSettings {
        &self.settings
    }

    pub fn slider(&self) -> Option<&ProgressSlider> {
        self.slider.as_ref()
    }

    pub fn pinch(&self) -> &PinchTracker {
        &self.pinch
    }

    pub fn library(&self) -> &L {
        &self.library
    }

    pub fn is_loaded(&self) -> bool {
        self.document.is_some()
    }

    pub fn listeners_bound(&self) -> bool {
        self.listeners_bound
    }

    pub fn has_keyboard_binding(&self) -> bool {
        self.key_subscription
            .as_ref()
            .is_some_and(KeySubscription::is_active)
    }

    /// Poll the rendering library until it reports ready
    pub fn wait_for_library(&mut self) -> Result<()> {
        if self.library.is_ready() {
            return Ok(());
        }

        let attempts = self.settings.library_poll_attempts;
        let interval = self.settings.library_poll_interval();
        for attempt in 1..=attempts {
            if let Err(e) = self.library.try_initialize() {
                debug!("Rendering library init attempt {attempt} failed: {e}");
            }
            if self.library.is_ready() {
                info!("Rendering library ready after {attempt} attempts");
                return Ok(());
            }
            thread::sleep(interval);
        }

        Err(ViewerError::LibraryUnavailable { attempts })
    }

    /// Open the document in `response`, render every page and bind input.
    ///
    /// Failures leave an error on the status line, go through the shared
    /// error handler and are returned.
    pub fn load(&mut self, response: FetchResponse) -> Result<()> {
        match self.load_document(response) {
            Ok(()) => Ok(()),
            Err(err) => {
                error!("PDF load failed: {err}");
                self.handle_error(&err);
                self.status.show_error(format!("PDF load failed: {err}"));
                Err(err)
            }
        }
    }

    fn load_document(&mut self, response: FetchResponse) -> Result<()> {
        self.status.show_loading("Loading PDF...");
        if !response.is_ok() {
            return Err(ViewerError::HttpError {
                status: response.status(),
            });
        }
        self.wait_for_library()?;

        let bytes = response.into_bytes()?;
        if bytes.is_empty() {
            return Err(ViewerError::EmptyDocument);
        }

        self.release_document();

        let status = &mut self.status;
        let document = self.library.open(&bytes, &mut |progress: LoadProgress| {
            if let Some(percent) = progress.percent() {
                status.show_loading(format!("Loading PDF... {percent}%"));
            }
        })?;

        let total = document.page_count();
        self.document = Some(document);
        let _ = self.state.apply(Command::SetPageCount(total));
        if total == 0 {
            self.release_document();
            return Err(ViewerError::InvalidDocument);
        }
        info!("Opened document with {total} pages");

        self.status.show_loading("Rendering pages...");
        if let Err(err) = self.render_initial_pages() {
            self.release_document();
            return Err(err);
        }

        let title = match self.resolve_title() {
            Ok(title) => title,
            Err(err) => {
                self.release_document();
                return Err(err);
            }
        };
        self.status.hide();

        self.events.emit(ViewerEvent::Loaded {
            total_pages: total,
            title,
        });
        self.bind_listeners();
        self.update_progress(self.state.current_page);
        Ok(())
    }

    fn render_initial_pages(&mut self) -> Result<()> {
        let doc = self.document.as_deref().ok_or(ViewerError::NotLoaded)?;
        let first = doc.page_size(1)?;
        let scale = self.state.bounds.fit_width(
            self.container.client_width(),
            f64::from(self.settings.horizontal_padding),
            first.width,
        );
        let _ = self.state.apply(Command::SetInitialScale(scale));
        self.pinch.set_base_scale(self.state.scale);
        debug!("Initial scale {:.3}", self.state.scale);

        let surfaces = render_pages(doc, self.state.total_pages, self.state.scale)?;
        self.pages.set_surfaces(surfaces);
        self.container.set_content_height(self.pages.content_height());
        self.container
            .scroll_to(0.0, ScrollBehavior::Instant, Instant::now());
        Ok(())
    }

    fn resolve_title(&self) -> Result<String> {
        let metadata = match self.document.as_deref() {
            Some(doc) => doc.title()?,
            None => None,
        };
        Ok(metadata
            .or_else(|| self.location.as_deref().and_then(file_name_from_location))
            .unwrap_or_else(|| self.settings.default_title.clone()))
    }

    fn bind_listeners(&mut self) {
        if self.key_subscription.is_none() {
            self.key_subscription = Some(self.keyboard.subscribe());
        }
        self.listeners_bound = true;
    }

    fn unbind_listeners(&mut self) -> bool {
        self.listeners_bound = false;
        self.scroll_debounce.cancel();
        match self.key_subscription.take() {
            Some(mut subscription) => subscription.unsubscribe(),
            None => false,
        }
    }

    fn release_document(&mut self) -> bool {
        let Some(mut document) = self.document.take() else {
            return false;
        };
        document.destroy();
        self.pages.clear();
        let _ = self.state.apply(Command::Reset);
        self.pinch = PinchTracker::new(self.state.scale);
        self.container.set_content_height(0.0);
        self.container
            .scroll_to(0.0, ScrollBehavior::Instant, Instant::now());
        debug!("Released document handle");
        true
    }

    /// Release the document and unbind input. Safe to call repeatedly.
    pub fn cleanup(&mut self) {
        let unbound = self.unbind_listeners();
        let released = self.release_document();
        if unbound || released {
            info!("Viewer cleaned up");
        }
    }

    /// The container scrolled; reconcile the page once scrolling pauses
    pub fn handle_scroll(&mut self) {
        self.handle_scroll_at(Instant::now());
    }

    pub fn handle_scroll_at(&mut self, now: Instant) {
        if self.listeners_bound {
            self.scroll_debounce.schedule(now);
        }
    }

    /// User-driven scroll to an absolute offset
    pub fn scroll_to(&mut self, top: f64) {
        self.scroll_to_at(top, Instant::now());
    }

    pub fn scroll_to_at(&mut self, top: f64, now: Instant) {
        if self.container.scroll_to(top, ScrollBehavior::Instant, now) {
            self.handle_scroll_at(now);
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.resize_at(width, height, Instant::now());
    }

    pub fn resize_at(&mut self, width: f64, height: f64, now: Instant) {
        self.container.resize(width, height);
        self.handle_scroll_at(now);
    }

    /// Advance animations, queued keys and the scroll debounce
    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.drain_keys(now);
        if self.container.tick(now) {
            self.handle_scroll_at(now);
        }
        if self.scroll_debounce.fire_if_due(now) {
            self.reconcile_page();
        }
    }

    /// Finish any scroll animation and run pending reconciliation now
    pub fn settle(&mut self) {
        let now = Instant::now();
        self.drain_keys(now);
        if self.container.settle() {
            self.handle_scroll_at(now);
        }
        if self.scroll_debounce.flush() {
            self.reconcile_page();
        }
    }

    fn reconcile_page(&mut self) {
        let total = self.state.total_pages;
        if total == 0 {
            return;
        }
        let page = navigation::page_at_scroll(
            self.container.scroll_top(),
            self.container.client_height(),
            self.container.scroll_height(),
            total,
        );
        debug!(
            "Scroll settled at {:.1}/{:.1}, page {page}",
            self.container.scroll_top(),
            self.container.scroll_height()
        );
        let effects = self.state.apply(Command::SyncPage(page));
        self.run_effects_reporting(effects);
    }

    fn drain_keys(&mut self, now: Instant) {
        let keys: Vec<NavKey> = match &self.key_subscription {
            Some(subscription) => subscription.pending().collect(),
            None => return,
        };
        for key in keys {
            self.handle_key_at(key, now);
        }
    }

    /// Scroll for a navigation key. Returns true if the key was consumed.
    pub fn handle_key(&mut self, key: NavKey) -> bool {
        self.handle_key_at(key, Instant::now())
    }

    pub fn handle_key_at(&mut self, key: NavKey, now: Instant) -> bool {
        if !self.listeners_bound {
            return false;
        }
        let step = self.container.client_height() * self.settings.keyboard_scroll_ratio;
        match key {
            NavKey::ArrowUp | NavKey::PageUp => {
                self.container.scroll_by(-step, ScrollBehavior::Smooth, now);
            }
            NavKey::ArrowDown | NavKey::PageDown | NavKey::Space => {
                self.container.scroll_by(step, ScrollBehavior::Smooth, now);
            }
            NavKey::Home => {
                self.container.scroll_to(0.0, ScrollBehavior::Smooth, now);
            }
            NavKey::End => {
                let bottom = self.container.scroll_height();
                self.container.scroll_to(bottom, ScrollBehavior::Smooth, now);
            }
        }
        true
    }

    pub fn go_to_page(&mut self, page: usize) {
        let target = i64::try_from(page).unwrap_or(i64::MAX);
        let effects = self.state.apply(Command::GoToPage(target));
        self.run_effects_reporting(effects);
    }

    pub fn next(&mut self) {
        self.go_to_page(self.state.current_page + 1);
    }

    pub fn prev(&mut self) {
        self.go_to_page(self.state.current_page.saturating_sub(1));
    }

    /// Navigate to a named destination or page. Failures are reported
    /// through the error handler, never returned.
    pub fn go_to_chapter(&mut self, dest: impl Into<Destination>) {
        let dest = dest.into();
        match self.resolve_destination(&dest) {
            Ok(page) => {
                debug!("Destination {dest:?} resolved to page {page}");
                self.go_to_page(page);
            }
            Err(err) => self.handle_error(&err),
        }
    }

    fn resolve_destination(&self, dest: &Destination) -> Result<usize> {
        let doc = self.document.as_deref().ok_or(ViewerError::NotLoaded)?;
        match dest {
            Destination::Page(page) => Ok(*page),
            Destination::Named(name) => doc
                .resolve_destination(name)?
                .ok_or_else(|| ViewerError::InvalidDestination(name.clone())),
        }
    }

    fn scroll_to_page(&mut self, page: usize) {
        let offset = navigation::page_scroll_offset(
            page,
            self.container.scroll_height(),
            self.state.total_pages,
        );
        let now = Instant::now();
        if self.container.scroll_to(offset, ScrollBehavior::Smooth, now) {
            self.handle_scroll_at(now);
        }
    }

    /// Emit `progressChanged` for `page`; nothing without a document
    pub fn update_progress(&mut self, page: usize) -> Option<Progress> {
        let total = self.state.total_pages;
        if total == 0 {
            return None;
        }
        let progress = Progress::compute(page, total);
        if let Some(slider) = self.slider.as_mut() {
            slider.set_value(progress.percentage);
        }
        self.events.emit(ViewerEvent::ProgressChanged {
            percentage: progress.rounded(),
            current: page,
            total,
        });
        Some(progress)
    }

    /// The host slider moved to `value` (0..=100)
    pub fn handle_slider_input(&mut self, value: f64) {
        let total = self.state.total_pages;
        if total == 0 {
            return;
        }
        let value = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            0.0
        };
        if let Some(slider) = self.slider.as_mut() {
            slider.set_value(value);
        }

        let effects = self
            .state
            .apply(Command::JumpToPage(page_for_slider(value, total)));
        self.run_effects_reporting(effects);

        let top = slider_scroll_target(
            value,
            self.container.scroll_height(),
            self.container.client_height(),
        );
        let now = Instant::now();
        if self.container.scroll_to(top, ScrollBehavior::Smooth, now) {
            self.handle_scroll_at(now);
        }
    }

    /// Re-render every page at `scale`. Returns false when `scale` is out of
    /// bounds or already in effect; re-applying the current scale does not
    /// re-render.
    ///
    /// A failed re-render keeps the previous scale and surfaces.
    pub fn set_scale(&mut self, scale: f32) -> Result<bool> {
        let previous = self.state.scale;
        let effects = self.state.apply(Command::SetScale(scale));
        if effects.is_empty() {
            debug!("Ignoring scale {scale}");
            return Ok(false);
        }
        if let Err(err) = self.run_effects(effects) {
            self.restore_scale(previous);
            self.handle_error(&err);
            return Err(err);
        }
        if !self.pinch.is_active() {
            self.pinch.set_base_scale(self.state.scale);
        }
        Ok(true)
    }

    fn restore_scale(&mut self, previous: f32) {
        self.state.scale = previous;
        debug!("Scale restored to {previous}");
    }

    pub fn handle_touch_start(&mut self, touches: &[TouchPoint]) {
        self.pinch.start(touches);
    }

    /// Returns true when the move belongs to a pinch and page zoom should
    /// be suppressed
    pub fn handle_touch_move(&mut self, touches: &[TouchPoint]) -> bool {
        if two_finger_distance(touches).is_none() {
            return false;
        }
        if let Some(candidate) = self.pinch.update(touches) {
            if self.state.bounds.contains(candidate) {
                // errors already went through handle_error
                let _ = self.set_scale(candidate);
            }
        }
        true
    }

    pub fn handle_touch_end(&mut self) {
        self.pinch.end(self.state.scale);
    }

    pub fn handle_double_tap(&mut self) -> Result<bool> {
        self.set_scale(double_tap_target(self.state.scale))
    }

    fn rerender_all(&mut self) -> Result<()> {
        let Some(doc) = self.document.as_deref() else {
            return Ok(());
        };
        let scale = self.state.scale;
        let surfaces = render_pages(doc, self.state.total_pages, scale)?;
        self.pages.set_surfaces(surfaces);
        debug!("Re-rendered {} pages at scale {scale:.3}", self.pages.len());

        if self.container.set_content_height(self.pages.content_height()) {
            self.handle_scroll_at(Instant::now());
        }
        Ok(())
    }

    pub fn set_font_size(&mut self, size: FontSize) -> Result<()> {
        let scale = self.settings.font_scales.scale_for(size);
        info!("Font size {} -> scale {scale}", size.as_str());
        self.status.show_loading("Adjusting font size...");

        let previous = self.state.scale;
        let effects = self.state.apply(Command::SetFontScale(scale));
        if let Err(err) = self.run_effects(effects) {
            self.restore_scale(previous);
            self.status
                .show_error(format!("Failed to adjust font size: {err}"));
            return Err(err);
        }
        self.pinch.set_base_scale(self.state.scale);
        Ok(())
    }

    /// Rebuild every surface at the current scale, keeping the reader at
    /// the same fraction of the document
    pub fn reload_document(&mut self) -> Result<()> {
        let result = self.rebuild_pages();
        if let Err(err) = &result {
            error!("Failed to reload document: {err}");
            self.status
                .show_error(format!("Failed to reload document: {err}"));
        }
        result
    }

    fn rebuild_pages(&mut self) -> Result<()> {
        let fraction = self.container.scroll_fraction();
        let doc = self.document.as_deref().ok_or(ViewerError::NotLoaded)?;
        let surfaces = render_pages(doc, self.state.total_pages, self.state.scale)?;
        self.pages.set_surfaces(surfaces);

        let now = Instant::now();
        let clamped = self.container.set_content_height(self.pages.content_height());
        let target = fraction * self.container.scroll_height();
        let moved = self.container.scroll_to(target, ScrollBehavior::Instant, now);
        if clamped || moved {
            self.handle_scroll_at(now);
        }

        self.status.hide();
        self.events.emit(ViewerEvent::Rendered {
            scale: self.state.scale,
        });
        Ok(())
    }

    pub fn set_theme(&mut self, theme: &Theme) {
        self.palette = ThemePalette::from_theme(theme);
        debug!(
            "Theme applied (dark: {}, page background {})",
            self.palette.invert_pages, self.palette.page_background
        );
    }

    /// Shared non-throwing error path
    pub fn handle_error(&mut self, err: &ViewerError) {
        warn!("Viewer error: {err}");
        self.status.show_error(err.to_string());
        self.events.emit(ViewerEvent::Error {
            message: err.to_string(),
        });
    }

    fn run_effects(&mut self, effects: Vec<Effect>) -> Result<()> {
        for effect in effects {
            match effect {
                Effect::RerenderAll => self.rerender_all()?,
                Effect::ReloadDocument => self.reload_document()?,
                Effect::ScrollToPage(page) => self.scroll_to_page(page),
                Effect::PageChanged(page) => self.events.emit(ViewerEvent::PageChanged {
                    page_number: page,
                    total_pages: self.state.total_pages,
                }),
                Effect::UpdateProgress(page) => {
                    self.update_progress(page);
                }
            }
        }
        Ok(())
    }

    fn run_effects_reporting(&mut self, effects: Vec<Effect>) {
        if let Err(err) = self.run_effects(effects) {
            self.handle_error(&err);
        }
    }
}

impl<L: RenderLibrary> Drop for Viewer<L> {
    fn drop(&mut self) {
        self.cleanup();
    }
}

/// Render pages `1..=total` in order. Nothing is returned unless every page
/// rendered.
fn render_pages(doc: &dyn DocumentHandle, total: usize, scale: f32) -> Result<Vec<PageSurface>> {
    let mut surfaces = Vec::with_capacity(total);
    for page in 1..=total {
        let viewport = Viewport::compute(doc.page_size(page)?, scale);
        let image = doc.render_page(page, &viewport)?;
        debug!(
            "Rendered page {page}/{total} at {}x{}",
            viewport.width, viewport.height
        );
        surfaces.push(PageSurface::new(page, viewport, image));
    }
    Ok(surfaces)
}
