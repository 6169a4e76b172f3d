//! Linear volume ramps.

/// Monotonic linear ramp from `from` to `to` over `duration` seconds.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearFade {
    from: f32,
    to: f32,
    duration: f32,
    elapsed: f32,
}

impl LinearFade {
    /// Ramp starting now. A non-positive duration completes immediately.
    pub fn new(from: f32, to: f32, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    /// Advance by `dt` and return the new value.
    pub fn advance(&mut self, dt: f32) -> f32 {
        self.elapsed = (self.elapsed + dt.max(0.0)).min(self.duration);
        self.value()
    }

    /// Progress in `[0, 1]`.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            1.0
        } else {
            (self.elapsed / self.duration).clamp(0.0, 1.0)
        }
    }

    /// Current value.
    pub fn value(&self) -> f32 {
        let t = self.progress();
        if t >= 1.0 {
            self.to
        } else {
            self.from + (self.to - self.from) * t
        }
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.progress() >= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_midpoint() {
        let mut f = LinearFade::new(0.0, 0.35, 3.0);
        assert_eq!(f.value(), 0.0);
        let v = f.advance(1.5);
        assert!((v - 0.175).abs() < 1e-6);
        assert!((f.progress() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ends_exactly_on_target() {
        let mut f = LinearFade::new(0.35, 0.0, 1.0);
        for _ in 0..7 {
            f.advance(0.3);
        }
        assert!(f.is_done());
        assert_eq!(f.value(), 0.0);
    }

    #[test]
    fn test_zero_duration() {
        let f = LinearFade::new(0.0, 0.35, 0.0);
        assert!(f.is_done());
        assert_eq!(f.value(), 0.35);
    }

    #[test]
    fn test_monotonic() {
        let mut f = LinearFade::new(0.1, 0.9, 2.0);
        let mut prev = f.value();
        for _ in 0..50 {
            let v = f.advance(0.05);
            assert!(v >= prev);
            prev = v;
        }
    }
}
