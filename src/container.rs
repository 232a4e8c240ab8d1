//! Scroll container geometry
//!
//! Models the scrollable element the pages live in: viewport size, scroll
//! offset, content height and an optional smooth-scroll animation. Offsets
//! are clamped to `[0, scroll_height - client_height]` the way a browser
//! clamps `scrollTop`.

use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollBehavior {
    Instant,
    Smooth,
}

#[derive(Clone, Copy, Debug)]
struct ScrollAnimation {
    from: f64,
    to: f64,
    started: Instant,
    duration: Duration,
}

impl ScrollAnimation {
    fn position_at(&self, now: Instant) -> (f64, bool) {
        let elapsed = now.saturating_duration_since(self.started);
        if self.duration.is_zero() || elapsed >= self.duration {
            return (self.to, true);
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        // ease-in-out cubic
        let eased = if t < 0.5 {
            4.0 * t * t * t
        } else {
            1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
        };
        (self.from + (self.to - self.from) * eased, false)
    }
}

#[derive(Clone, Debug)]
pub struct ScrollContainer {
    client_width: f64,
    client_height: f64,
    scroll_top: f64,
    scroll_height: f64,
    smooth_duration: Duration,
    animation: Option<ScrollAnimation>,
}

impl ScrollContainer {
    pub fn new(client_width: f64, client_height: f64, smooth_duration: Duration) -> Self {
        Self {
            client_width: client_width.max(0.0),
            client_height: client_height.max(0.0),
            scroll_top: 0.0,
            scroll_height: client_height.max(0.0),
            smooth_duration,
            animation: None,
        }
    }

    pub fn client_width(&self) -> f64 {
        self.client_width
    }

    pub fn client_height(&self) -> f64 {
        self.client_height
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    /// Scrollable height; never smaller than the viewport
    pub fn scroll_height(&self) -> f64 {
        self.scroll_height
    }

    pub fn max_scroll(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Where the container will rest once any animation completes
    pub fn target_top(&self) -> f64 {
        self.animation.map_or(self.scroll_top, |a| a.to)
    }

    /// Replace the content height. Returns true if the offset had to move.
    pub fn set_content_height(&mut self, height: f64) -> bool {
        self.scroll_height = height.max(self.client_height);
        self.clamp_offsets()
    }

    /// Resize the viewport. Returns true if the offset had to move.
    pub fn resize(&mut self, width: f64, height: f64) -> bool {
        self.client_width = width.max(0.0);
        self.client_height = height.max(0.0);
        self.scroll_height = self.scroll_height.max(self.client_height);
        self.clamp_offsets()
    }

    /// Scroll to an absolute offset. Returns true if the offset changed now.
    pub fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior, now: Instant) -> bool {
        let target = self.clamp(top);
        match behavior {
            ScrollBehavior::Instant => {
                self.animation = None;
                self.set_top(target)
            }
            ScrollBehavior::Smooth => {
                if (target - self.scroll_top).abs() < f64::EPSILON {
                    self.animation = None;
                    return false;
                }
                self.animation = Some(ScrollAnimation {
                    from: self.scroll_top,
                    to: target,
                    started: now,
                    duration: self.smooth_duration,
                });
                false
            }
        }
    }

    /// Scroll relative to the current offset
    pub fn scroll_by(&mut self, delta: f64, behavior: ScrollBehavior, now: Instant) -> bool {
        self.scroll_to(self.scroll_top + delta, behavior, now)
    }

    /// Advance a running animation. Returns true if the offset moved.
    pub fn tick(&mut self, now: Instant) -> bool {
        let Some(animation) = self.animation else {
            return false;
        };
        let (position, done) = animation.position_at(now);
        if done {
            self.animation = None;
        }
        self.set_top(position)
    }

    /// Jump straight to the end of a running animation
    pub fn settle(&mut self) -> bool {
        match self.animation.take() {
            Some(animation) => self.set_top(animation.to),
            None => false,
        }
    }

    /// Scroll offset as a fraction of the scrollable height
    pub fn scroll_fraction(&self) -> f64 {
        if self.scroll_height > 0.0 {
            self.scroll_top / self.scroll_height
        } else {
            0.0
        }
    }

    fn clamp(&self, top: f64) -> f64 {
        if top.is_finite() {
            top.clamp(0.0, self.max_scroll())
        } else {
            0.0
        }
    }

    fn set_top(&mut self, top: f64) -> bool {
        let top = self.clamp(top);
        let moved = (top - self.scroll_top).abs() > f64::EPSILON;
        self.scroll_top = top;
        moved
    }

    fn clamp_offsets(&mut self) -> bool {
        if let Some(animation) = self.animation.as_mut() {
            animation.to = animation.to.clamp(0.0, (self.scroll_height - self.client_height).max(0.0));
        }
        self.set_top(self.scroll_top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn container() -> ScrollContainer {
        let mut c = ScrollContainer::new(800.0, 600.0, Duration::from_millis(300));
        c.set_content_height(3000.0);
        c
    }

    #[test]
    fn instant_scroll_clamps_to_max() {
        let mut c = container();
        assert!(c.scroll_to(10_000.0, ScrollBehavior::Instant, Instant::now()));
        assert_eq!(c.scroll_top(), 2400.0);
        assert!(c.scroll_to(-50.0, ScrollBehavior::Instant, Instant::now()));
        assert_eq!(c.scroll_top(), 0.0);
    }

    #[test]
    fn smooth_scroll_reaches_target_after_duration() {
        let mut c = container();
        let start = Instant::now();
        assert!(!c.scroll_to(1000.0, ScrollBehavior::Smooth, start));
        assert_eq!(c.scroll_top(), 0.0);
        assert_eq!(c.target_top(), 1000.0);

        assert!(c.tick(start + Duration::from_millis(150)));
        let midway = c.scroll_top();
        assert!(midway > 0.0 && midway < 1000.0);

        assert!(c.tick(start + Duration::from_millis(400)));
        assert_eq!(c.scroll_top(), 1000.0);
        assert!(!c.is_animating());
        assert!(!c.tick(start + Duration::from_millis(500)));
    }

    #[test]
    fn settle_finishes_animation() {
        let mut c = container();
        c.scroll_to(700.0, ScrollBehavior::Smooth, Instant::now());
        assert!(c.settle());
        assert_eq!(c.scroll_top(), 700.0);
        assert!(!c.settle());
    }

    #[test]
    fn shrinking_content_pulls_offset_back() {
        let mut c = container();
        c.scroll_to(2400.0, ScrollBehavior::Instant, Instant::now());
        assert!(c.set_content_height(1000.0));
        assert_eq!(c.scroll_top(), 400.0);
    }

    #[test]
    fn short_content_cannot_scroll() {
        let mut c = ScrollContainer::new(800.0, 600.0, Duration::ZERO);
        c.set_content_height(200.0);
        assert_eq!(c.scroll_height(), 600.0);
        assert!(!c.scroll_to(100.0, ScrollBehavior::Instant, Instant::now()));
    }

    #[test]
    fn scroll_fraction_is_relative_to_scroll_height() {
        let mut c = container();
        c.scroll_to(1500.0, ScrollBehavior::Instant, Instant::now());
        assert_eq!(c.scroll_fraction(), 0.5);
    }
}
