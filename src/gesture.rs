//! Pinch-to-zoom and double-tap helpers

/// One touch point in client coordinates
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchPoint {
    pub x: f64,
    pub y: f64,
}

impl TouchPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Distance between the first two touches, if exactly two are down
pub fn two_finger_distance(touches: &[TouchPoint]) -> Option<f64> {
    match touches {
        [a, b] => Some((b.x - a.x).hypot(b.y - a.y)),
        _ => None,
    }
}

/// In-progress two-finger pinch.
///
/// `base_scale` is the scale the gesture multiplies from; it only moves when
/// a gesture ends, so one pinch always scales relative to where it started.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchTracker {
    initial_distance: f64,
    base_scale: f32,
}

impl PinchTracker {
    pub fn new(base_scale: f32) -> Self {
        Self {
            initial_distance: 0.0,
            base_scale,
        }
    }

    pub fn is_active(&self) -> bool {
        self.initial_distance > 0.0
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    pub fn set_base_scale(&mut self, scale: f32) {
        self.base_scale = scale;
    }

    pub fn start(&mut self, touches: &[TouchPoint]) {
        if let Some(distance) = two_finger_distance(touches) {
            self.initial_distance = distance;
        }
    }

    /// Candidate scale for the current finger spread, unclamped
    pub fn update(&self, touches: &[TouchPoint]) -> Option<f32> {
        let current = two_finger_distance(touches)?;
        if !self.is_active() {
            return None;
        }
        Some(self.base_scale * (current / self.initial_distance) as f32)
    }

    /// Finish the gesture and snap the base to the scale now in effect
    pub fn end(&mut self, current_scale: f32) {
        self.initial_distance = 0.0;
        self.base_scale = current_scale;
    }
}

/// Double tap flips between 1x and 2x; any scale other than 1x goes to 1x
pub fn double_tap_target(scale: f32) -> f32 {
    if (scale - 1.0).abs() < f32::EPSILON {
        2.0
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fingers(spread: f64) -> [TouchPoint; 2] {
        [TouchPoint::new(0.0, 0.0), TouchPoint::new(spread, 0.0)]
    }

    #[test]
    fn distance_needs_exactly_two_touches() {
        assert_eq!(two_finger_distance(&fingers(5.0)), Some(5.0));
        assert_eq!(
            two_finger_distance(&[TouchPoint::new(0.0, 0.0), TouchPoint::new(3.0, 4.0)]),
            Some(5.0)
        );
        assert_eq!(two_finger_distance(&[TouchPoint::new(1.0, 1.0)]), None);
    }

    #[test]
    fn spread_scales_relative_to_base() {
        let mut pinch = PinchTracker::new(1.5);
        pinch.start(&fingers(100.0));
        assert_eq!(pinch.update(&fingers(200.0)), Some(3.0));
        assert_eq!(pinch.update(&fingers(50.0)), Some(0.75));
    }

    #[test]
    fn update_without_start_is_ignored() {
        let pinch = PinchTracker::new(1.0);
        assert_eq!(pinch.update(&fingers(200.0)), None);
    }

    #[test]
    fn end_resets_and_snaps_base() {
        let mut pinch = PinchTracker::new(1.0);
        pinch.start(&fingers(100.0));
        pinch.end(1.8);
        assert!(!pinch.is_active());
        assert_eq!(pinch.base_scale(), 1.8);
    }

    #[test]
    fn double_tap_toggles_between_one_and_two() {
        assert_eq!(double_tap_target(1.0), 2.0);
        assert_eq!(double_tap_target(2.0), 1.0);
        assert_eq!(double_tap_target(1.5), 1.0);
        assert_eq!(double_tap_target(0.5), 1.0);
    }
}
