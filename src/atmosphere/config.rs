//! Sky and lighting configuration.

use std::f32::consts::PI;

use serde::{Deserialize, Serialize};

use crate::atmosphere::ramp::Ramp;

// ---------------------------------------------------------------------------
// Sky config
// ---------------------------------------------------------------------------

/// Day/night sky angle configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyConfig {
    /// Sky angle (radians from zenith) held during the day.
    pub day_angle: f32,
    /// Sky angle held during the night.
    pub night_angle: f32,
    /// Angular speed of a day/night transition, radians per second.
    pub transition_speed: f32,
    /// Horizontal axis the sky rotates around.
    pub rotation_axis: [f32; 3],
}

impl Default for SkyConfig {
    fn default() -> Self {
        Self {
            day_angle: 0.35 * PI,
            night_angle: 0.75 * PI,
            transition_speed: 0.25 * PI,
            rotation_axis: [1.0, 0.0, 0.0],
        }
    }
}

// ---------------------------------------------------------------------------
// Lighting config
// ---------------------------------------------------------------------------

/// How the sky angle maps to light colour and intensity. Ramps are keyed by
/// sky angle in radians.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LightingConfig {
    /// Light height (direction Y) at which sun visibility reaches 0.
    pub visibility_low: f32,
    /// Light height at which sun visibility reaches 1.
    pub visibility_high: f32,

    /// Sun colour (linear RGB).
    pub sun_color_ramp: Ramp<[f32; 3]>,
    /// Sun intensity multiplier.
    pub sun_intensity_ramp: Ramp<f32>,
    /// Moonlight colour used while the sun is hidden.
    pub moon_color: [f32; 3],
    /// Moonlight intensity.
    pub moon_intensity: f32,
    /// Ambient light colour.
    pub ambient_color_ramp: Ramp<[f32; 3]>,
    /// Ambient intensity multiplier.
    pub ambient_intensity_ramp: Ramp<f32>,
}

impl Default for LightingConfig {
    fn default() -> Self {
        Self {
            visibility_low: -0.1,
            visibility_high: 0.15,

            // Day: near-white, horizon: deep orange, below: dim
            sun_color_ramp: Ramp::new(vec![
                (0.35 * PI, [1.0, 0.98, 0.95]),
                (0.45 * PI, [1.0, 0.75, 0.5]),
                (0.50 * PI, [1.0, 0.45, 0.2]),
                (0.55 * PI, [0.3, 0.15, 0.2]),
            ]),
            sun_intensity_ramp: Ramp::new(vec![
                (0.35 * PI, 1.5),
                (0.45 * PI, 1.1),
                (0.50 * PI, 0.3),
                (0.55 * PI, 0.0),
            ]),

            moon_color: [0.35, 0.45, 0.7],
            moon_intensity: 0.25,

            ambient_color_ramp: Ramp::new(vec![
                (0.35 * PI, [0.55, 0.62, 0.7]),
                (0.50 * PI, [0.4, 0.3, 0.3]),
                (0.60 * PI, [0.08, 0.1, 0.18]),
            ]),
            ambient_intensity_ramp: Ramp::new(vec![
                (0.35 * PI, 1.0),
                (0.50 * PI, 0.6),
                (0.60 * PI, 0.35),
            ]),
        }
    }
}
