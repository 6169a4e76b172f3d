//! Day/night controller.
//!
//! Owns the sky angle and the day flag. [`DayNightController::toggle`] picks
//! a new target angle; [`DayNightController::advance`] moves the angle toward
//! it at a fixed angular speed and settles exactly on it. Toggling while a
//! transition is running only re-targets, the angle itself never jumps.

use serde::{Deserialize, Serialize};

use crate::atmosphere::config::SkyConfig;
use crate::atmosphere::sun::light_direction;
use crate::core::approach::step_toward;
use crate::core::types::Vec3;

/// Snapshot of the sky state machine.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SkyState {
    /// Current sky angle (radians from zenith).
    pub angle: f32,
    /// Angle being approached.
    pub target_angle: f32,
    pub is_day: bool,
    /// Always `angle != target_angle`.
    pub is_transitioning: bool,
}

/// Drives the sky angle between the day and night constants.
#[derive(Clone, Debug)]
pub struct DayNightController {
    config: SkyConfig,
    state: SkyState,
    /// Whether the scene finished starting; toggles before that are deferred.
    started: bool,
    /// Net toggle requested before start.
    pending_toggle: bool,
}

impl DayNightController {
    /// Create a settled controller at the day angle.
    pub fn new(config: SkyConfig) -> Self {
        let day = config.day_angle;
        Self {
            config,
            state: SkyState {
                angle: day,
                target_angle: day,
                is_day: true,
                is_transitioning: false,
            },
            started: false,
            pending_toggle: false,
        }
    }

    /// Mark the controller as live and apply any toggle requested earlier.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if std::mem::take(&mut self.pending_toggle) {
            log::debug!("Applying day/night toggle deferred until start");
            self.apply_toggle();
        }
    }

    /// Whether [`start`](Self::start) has been called.
    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Flip day/night and return the new day flag.
    ///
    /// Before [`start`](Self::start) the request is only recorded; the
    /// returned flag is the one that will take effect.
    pub fn toggle(&mut self) -> bool {
        if !self.started {
            self.pending_toggle = !self.pending_toggle;
            let will_be_day = self.state.is_day != self.pending_toggle;
            log::debug!("Day/night toggle deferred (will be day: {will_be_day})");
            return will_be_day;
        }
        self.apply_toggle()
    }

    /// Set day or night explicitly. No-op when already there.
    pub fn set_day(&mut self, is_day: bool) -> bool {
        let effective = self.state.is_day != self.pending_toggle;
        if effective != is_day {
            self.toggle();
        }
        is_day
    }

    fn apply_toggle(&mut self) -> bool {
        self.state.is_day = !self.state.is_day;
        self.state.target_angle = if self.state.is_day {
            self.config.day_angle
        } else {
            self.config.night_angle
        };
        self.state.is_transitioning = self.state.angle != self.state.target_angle;
        log::info!(
            "Sky transitioning to {} (angle {:.3} -> {:.3})",
            if self.state.is_day { "day" } else { "night" },
            self.state.angle,
            self.state.target_angle
        );
        self.state.is_day
    }

    /// Move the angle toward its target by `transition_speed * dt`.
    pub fn advance(&mut self, dt: f32) {
        if !self.state.is_transitioning {
            return;
        }
        let max_step = self.config.transition_speed * dt.max(0.0);
        self.state.angle = step_toward(self.state.angle, self.state.target_angle, max_step);
        if self.state.angle == self.state.target_angle {
            self.state.is_transitioning = false;
            log::debug!("Sky settled at {:.3}", self.state.angle);
        }
    }

    /// Direction toward the light for the current angle.
    pub fn light_direction(&self) -> Vec3 {
        light_direction(self.state.angle, Vec3::from(self.config.rotation_axis))
    }

    /// Seconds until the current transition settles.
    pub fn transition_remaining(&self) -> f32 {
        if self.config.transition_speed <= 0.0 {
            return 0.0;
        }
        (self.state.target_angle - self.state.angle).abs() / self.config.transition_speed
    }

    #[inline]
    pub fn state(&self) -> SkyState {
        self.state
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.state.angle
    }

    #[inline]
    pub fn is_day(&self) -> bool {
        self.state.is_day
    }

    #[inline]
    pub fn is_transitioning(&self) -> bool {
        self.state.is_transitioning
    }

    #[inline]
    pub fn config(&self) -> &SkyConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn started() -> DayNightController {
        let mut c = DayNightController::new(SkyConfig::default());
        c.start();
        c
    }

    #[test]
    fn test_starts_settled_at_day() {
        let c = started();
        let s = c.state();
        assert!(s.is_day);
        assert_eq!(s.angle, 0.35 * PI);
        assert_eq!(s.target_angle, 0.35 * PI);
        assert!(!s.is_transitioning);
    }

    #[test]
    fn test_toggle_to_night_then_settle_exactly() {
        let mut c = started();
        assert!(!c.toggle());
        let s = c.state();
        assert!(!s.is_day);
        assert_eq!(s.target_angle, 0.75 * PI);
        assert!(s.is_transitioning);

        // 0.25π rad/s over 0.4π needs 1.6 s; give it a bit more in uneven steps
        for dt in [0.3, 0.5, 0.01, 0.7, 0.2, 0.3] {
            c.advance(dt);
        }
        let s = c.state();
        assert_eq!(s.angle, 0.75 * PI);
        assert!(!s.is_transitioning);
    }

    #[test]
    fn test_monotonic_no_overshoot() {
        let mut c = started();
        c.toggle();
        let target = c.state().target_angle;
        let mut prev = c.angle();
        let dts = [0.016, 0.1, 0.033, 0.5, 0.0, 0.25, 1.0, 0.016];
        for _ in 0..20 {
            for dt in dts {
                c.advance(dt);
                let a = c.angle();
                assert!(a >= prev, "angle went backwards: {prev} -> {a}");
                assert!(a <= target, "angle overshot: {a} > {target}");
                assert_eq!(c.is_transitioning(), a != target);
                prev = a;
            }
        }
        assert_eq!(c.angle(), target);
    }

    #[test]
    fn test_toggle_mid_transition_keeps_angle() {
        let mut c = started();
        c.toggle();
        c.advance(0.5);
        let before = c.angle();
        assert!(c.is_transitioning());

        assert!(c.toggle());
        assert_eq!(c.angle(), before);
        assert_eq!(c.state().target_angle, 0.35 * PI);
        assert!(c.is_transitioning());

        // Heads back down toward the day angle
        c.advance(0.1);
        assert!(c.angle() < before);
        c.advance(10.0);
        assert_eq!(c.angle(), 0.35 * PI);
        assert!(!c.is_transitioning());
    }

    #[test]
    fn test_settled_advance_is_noop() {
        let mut c = started();
        let before = c.state();
        for _ in 0..10 {
            c.advance(1.0);
        }
        assert_eq!(c.state(), before);
    }

    #[test]
    fn test_transition_time_matches_distance() {
        let mut c = started();
        c.toggle();
        let expected = (0.4 * PI) / (0.25 * PI);
        assert!((c.transition_remaining() - expected).abs() < 1e-4);
        c.advance(expected * 0.5);
        assert!((c.transition_remaining() - expected * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_toggle_before_start_is_deferred() {
        let mut c = DayNightController::new(SkyConfig::default());
        assert!(!c.toggle());
        // nothing moved yet
        assert!(c.is_day());
        assert_eq!(c.state().target_angle, 0.35 * PI);
        c.advance(10.0);
        assert_eq!(c.angle(), 0.35 * PI);

        c.start();
        assert!(!c.is_day());
        assert_eq!(c.state().target_angle, 0.75 * PI);
    }

    #[test]
    fn test_double_toggle_before_start_cancels() {
        let mut c = DayNightController::new(SkyConfig::default());
        c.toggle();
        assert!(c.toggle());
        c.start();
        assert!(c.is_day());
        assert!(!c.is_transitioning());
    }

    #[test]
    fn test_target_only_ever_day_or_night() {
        let mut c = started();
        let cfg = SkyConfig::default();
        for i in 0..25 {
            c.toggle();
            c.advance(0.07 * i as f32);
            let t = c.state().target_angle;
            assert!(t == cfg.day_angle || t == cfg.night_angle);
        }
    }

    #[test]
    fn test_set_day_idempotent() {
        let mut c = started();
        c.set_day(true);
        assert!(!c.is_transitioning());
        c.set_day(false);
        assert!(!c.is_day());
        c.advance(0.2);
        let a = c.angle();
        c.set_day(false);
        assert_eq!(c.angle(), a);
        assert!(!c.is_day());
    }

    #[test]
    fn test_light_direction_follows_angle() {
        let mut c = started();
        assert!(c.light_direction().y > 0.0);
        c.toggle();
        c.advance(10.0);
        assert!(c.light_direction().y < 0.0);
    }
}
