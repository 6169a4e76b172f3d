//! Campfire state.
//!
//! The fire burns at night. [`FireStateMachine::update`] ramps the visual
//! intensity toward 1 at night and 0 by day, hides the fire group once it is
//! effectively out, runs the ember pool only while the fire is lit, and
//! computes a deterministic flicker for the point light.

pub mod embers;

pub use embers::{Ember, EmberConfig, EmberInstance, EmberPool};

use serde::{Deserialize, Serialize};

use crate::core::approach::step_toward;

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Fire tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FireConfig {
    /// Intensity change per second.
    pub fade_speed: f32,
    /// Point light intensity at full fire.
    pub max_light_intensity: f32,
    /// Flicker amplitudes and angular frequencies:
    /// `1 + a·sin(ω1·t) + b·sin(ω2·t)`.
    pub flicker_a: f32,
    pub flicker_omega1: f32,
    pub flicker_b: f32,
    pub flicker_omega2: f32,
    /// Below this intensity the fire group is hidden.
    pub hide_threshold: f32,
    /// Above this intensity the ember pool is simulated.
    pub ember_threshold: f32,
    /// Point light colour (linear RGB).
    pub light_color: [f32; 3],
    /// Fire origin in world space.
    pub position: [f32; 3],
    pub embers: EmberConfig,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            fade_speed: 0.5,
            max_light_intensity: 2.0,
            flicker_a: 0.15,
            flicker_omega1: 10.0,
            flicker_b: 0.08,
            flicker_omega2: 23.0,
            hide_threshold: 0.001,
            ember_threshold: 0.01,
            light_color: [1.0, 0.55, 0.2],
            position: [0.0, 0.0, 0.0],
            embers: EmberConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Snapshot of the fire after an update.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FireState {
    pub current_intensity: f32,
    pub target_intensity: f32,
    /// Whether the fire group is rendered at all.
    pub visible: bool,
    /// Whether the ember pool ran this frame.
    pub embers_active: bool,
    /// Flickering point light intensity.
    pub light_intensity: f32,
}

/// Drives fire intensity, visibility, flicker and embers.
pub struct FireStateMachine {
    config: FireConfig,
    state: FireState,
    embers: EmberPool,
}

impl FireStateMachine {
    /// Create an unlit fire.
    pub fn new(config: FireConfig) -> Self {
        let embers = EmberPool::new(config.embers.clone());
        Self {
            config,
            state: FireState {
                current_intensity: 0.0,
                target_intensity: 0.0,
                visible: false,
                embers_active: false,
                light_intensity: 0.0,
            },
            embers,
        }
    }

    /// Target intensity for a day flag.
    #[inline]
    pub fn target_for(is_day: bool) -> f32 {
        if is_day { 0.0 } else { 1.0 }
    }

    /// Advance by `dt`; `elapsed` drives flicker and ember wobble.
    pub fn update(&mut self, dt: f32, elapsed: f32, is_day: bool) -> FireState {
        let dt = dt.max(0.0);
        let target = Self::target_for(is_day);
        let was_visible = self.state.visible;

        self.state.target_intensity = target;
        self.state.current_intensity = step_toward(
            self.state.current_intensity,
            target,
            self.config.fade_speed * dt,
        )
        .clamp(0.0, 1.0);

        let current = self.state.current_intensity;
        self.state.visible = current >= self.config.hide_threshold;
        if self.state.visible != was_visible {
            log::debug!("Fire {}", if self.state.visible { "shown" } else { "hidden" });
        }

        self.state.embers_active = current > self.config.ember_threshold;
        if self.state.embers_active {
            self.embers.update(dt, elapsed);
        }

        self.state.light_intensity = self.light_intensity_at(elapsed);
        self.state
    }

    /// Flickering light intensity at time `t` for the current fire intensity.
    pub fn light_intensity_at(&self, t: f32) -> f32 {
        let cfg = &self.config;
        let flicker = 1.0
            + cfg.flicker_a * (cfg.flicker_omega1 * t).sin()
            + cfg.flicker_b * (cfg.flicker_omega2 * t).sin();
        self.state.current_intensity * cfg.max_light_intensity * flicker
    }

    #[inline]
    pub fn state(&self) -> FireState {
        self.state
    }

    #[inline]
    pub fn embers(&self) -> &EmberPool {
        &self.embers
    }

    #[inline]
    pub fn config(&self) -> &FireConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
