//! Viewer state management

use crate::navigation::clamp_page;
use crate::zoom::ScaleBounds;

/// Page and scale state for the loaded document
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerState {
    /// Current page (1-indexed, at least 1)
    pub current_page: usize,

    /// Total page count, 0 before a document is loaded
    pub total_pages: usize,

    /// Scale pages are rendered at
    pub scale: f32,

    pub bounds: ScaleBounds,
}

impl ViewerState {
    #[must_use]
    pub fn new(bounds: ScaleBounds) -> Self {
        Self {
            current_page: 1,
            total_pages: 0,
            scale: 1.0,
            bounds,
        }
    }

    pub fn min_scale(&self) -> f32 {
        self.bounds.min
    }

    pub fn max_scale(&self) -> f32 {
        self.bounds.max
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::Reset => {
                self.current_page = 1;
                self.total_pages = 0;
                self.scale = 1.0;
                vec![]
            }

            Command::SetPageCount(count) => {
                self.total_pages = count;
                self.current_page = clamp_page(self.current_page as i64, count);
                vec![]
            }

            Command::SetInitialScale(scale) => {
                self.scale = self.bounds.clamp_factor(scale);
                vec![]
            }

            Command::SetScale(scale) => {
                if !self.bounds.contains(scale) {
                    return vec![];
                }
                if (self.scale - scale).abs() > f32::EPSILON {
                    self.scale = scale;
                    vec![Effect::RerenderAll]
                } else {
                    vec![]
                }
            }

            Command::SetFontScale(scale) => {
                self.scale = self.bounds.clamp_factor(scale);
                vec![Effect::ReloadDocument]
            }

            Command::GoToPage(page) => {
                if self.total_pages == 0 {
                    return vec![];
                }
                vec![Effect::ScrollToPage(clamp_page(page, self.total_pages))]
            }

            Command::SyncPage(page) => {
                let page = clamp_page(page as i64, self.total_pages);
                if self.current_page != page {
                    self.current_page = page;
                    vec![Effect::PageChanged(page), Effect::UpdateProgress(page)]
                } else {
                    vec![]
                }
            }

            Command::JumpToPage(page) => {
                let page = clamp_page(page as i64, self.total_pages);
                self.current_page = page;
                vec![Effect::PageChanged(page)]
            }
        }
    }
}

/// Commands that modify viewer state
#[derive(Clone, Debug)]
pub enum Command {
    /// Forget the document
    Reset,
    /// Update the page count after opening a document
    SetPageCount(usize),
    /// Fit-to-width scale computed on load
    SetInitialScale(f32),
    /// User zoom; ignored outside the scale bounds
    SetScale(f32),
    /// Font size preset; always triggers a full reload
    SetFontScale(f32),
    /// Navigate towards a page, possibly out of range
    GoToPage(i64),
    /// Page derived from the scroll position
    SyncPage(usize),
    /// Direct jump from the progress slider
    JumpToPage(usize),
}

/// Effects produced by state changes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Re-render every surface at the current scale
    RerenderAll,
    /// Tear down and rebuild every surface, restoring the scroll fraction
    ReloadDocument,
    /// Smooth-scroll to the top of a page
    ScrollToPage(usize),
    /// Announce the new current page
    PageChanged(usize),
    /// Recompute reading progress
    UpdateProgress(usize),
}
