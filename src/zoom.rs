//! Scale bounds for page rendering

/// Allowed render scale range
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBounds {
    pub min: f32,
    pub max: f32,
}

impl Default for ScaleBounds {
    fn default() -> Self {
        Self {
            min: Self::MIN_SCALE,
            max: Self::MAX_SCALE,
        }
    }
}

impl ScaleBounds {
    /// Smallest scale a page may be drawn at
    pub const MIN_SCALE: f32 = 0.5;
    /// Largest scale a page may be drawn at
    pub const MAX_SCALE: f32 = 3.0;

    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Whether `scale` may be applied as-is; NaN and infinities never are
    pub fn contains(&self, scale: f32) -> bool {
        scale.is_finite() && scale >= self.min && scale <= self.max
    }

    /// Clamp into range, mapping non-finite input to 1.0 first
    pub fn clamp_factor(&self, scale: f32) -> f32 {
        let scale = if scale.is_finite() { scale } else { 1.0 };
        scale.clamp(self.min, self.max)
    }

    /// Scale at which a page of `page_width` fills `container_width`
    /// less `padding`, kept inside the bounds
    pub fn fit_width(&self, container_width: f64, padding: f64, page_width: f32) -> f32 {
        if page_width <= 0.0 {
            return self.clamp_factor(1.0);
        }
        let fit = ((container_width - padding) / f64::from(page_width)) as f32;
        self.clamp_factor(fit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_inclusive() {
        let b = ScaleBounds::default();
        assert!(b.contains(0.5));
        assert!(b.contains(3.0));
        assert!(!b.contains(0.49));
        assert!(!b.contains(3.01));
        assert!(!b.contains(f32::NAN));
    }

    #[test]
    fn clamp_handles_non_finite() {
        let b = ScaleBounds::default();
        assert_eq!(b.clamp_factor(f32::INFINITY), 1.0);
        assert_eq!(b.clamp_factor(10.0), 3.0);
        assert_eq!(b.clamp_factor(0.1), 0.5);
    }

    #[test]
    fn fit_width_subtracts_padding() {
        let b = ScaleBounds::default();
        assert_eq!(b.fit_width(644.0, 32.0, 612.0), 1.0);
        assert_eq!(b.fit_width(1256.0, 32.0, 612.0), 2.0);
        assert_eq!(b.fit_width(100.0, 32.0, 612.0), 0.5);
        assert_eq!(b.fit_width(800.0, 32.0, 0.0), 1.0);
    }
}
