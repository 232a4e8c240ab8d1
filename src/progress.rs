//! Reading progress and the host progress slider

/// Progress through the document by page
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Progress {
    pub percentage: f64,
    pub current: usize,
    pub total: usize,
}

impl Progress {
    /// 0% on the first page, exactly 100% on the last
    pub fn compute(current: usize, total: usize) -> Self {
        let span = total.saturating_sub(1).max(1) as f64;
        let percentage = (current as f64 - 1.0) / span * 100.0;
        Self {
            percentage,
            current,
            total,
        }
    }

    pub fn rounded(&self) -> u32 {
        self.percentage.round().max(0.0) as u32
    }
}

/// Host range input (`0..=100`) mirroring the reading position
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ProgressSlider {
    value: f64,
}

impl ProgressSlider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn set_value(&mut self, value: f64) {
        self.value = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            0.0
        };
    }
}

/// Page a slider value jumps to
pub fn page_for_slider(value: f64, total: usize) -> usize {
    if total == 0 {
        return 1;
    }
    let raw = (value / 100.0 * total as f64).round();
    (raw.max(1.0) as usize).min(total)
}

/// Scroll offset a slider value maps to
pub fn slider_scroll_target(value: f64, scroll_height: f64, viewport_height: f64) -> f64 {
    let max_scroll = (scroll_height - viewport_height).max(0.0);
    value / 100.0 * max_scroll
}
