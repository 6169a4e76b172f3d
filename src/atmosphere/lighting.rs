//! Shared lighting parameters.
//!
//! [`LightingBroadcaster`] is the single producer of
//! [`SharedLightingParameters`]: once per frame it derives them from the sky
//! angle and publishes into one cell. Scene lights, ocean materials and the
//! island material all hold a [`Reader`] to that same cell.

use serde::{Deserialize, Serialize};

use crate::atmosphere::config::LightingConfig;
use crate::atmosphere::sky::DayNightController;
use crate::atmosphere::sun::sun_visibility;
use crate::core::shared::{Publisher, Reader};
use crate::core::types::Vec3;

/// Lighting values shared by every renderer that needs the sun.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SharedLightingParameters {
    /// Unit vector toward the light source.
    pub light_direction: [f32; 3],
    /// Directional light colour premultiplied by intensity.
    pub light_color_intensity: [f32; 3],
    /// `[0, 1]`, how lit the above-water scene is.
    pub sun_visibility: f32,
    /// Ambient colour premultiplied by intensity.
    pub ambient_color_intensity: [f32; 3],
    /// Sky angle the values were derived from.
    pub sky_angle: f32,
}

impl Default for SharedLightingParameters {
    fn default() -> Self {
        Self {
            light_direction: [0.0, 1.0, 0.0],
            light_color_intensity: [1.5, 1.47, 1.425],
            sun_visibility: 1.0,
            ambient_color_intensity: [0.55, 0.62, 0.7],
            sky_angle: 0.0,
        }
    }
}

/// Derives lighting from the sky and publishes it.
pub struct LightingBroadcaster {
    config: LightingConfig,
    publisher: Publisher<SharedLightingParameters>,
}

impl LightingBroadcaster {
    pub fn new(config: LightingConfig) -> Self {
        Self {
            config,
            publisher: Publisher::new(SharedLightingParameters::default()),
        }
    }

    /// Reader for a consumer. Every reader sees the same cell.
    pub fn reader(&self) -> Reader<SharedLightingParameters> {
        self.publisher.reader()
    }

    /// Lighting for a sky angle and light direction. Pure.
    pub fn compute(&self, angle: f32, direction: Vec3) -> SharedLightingParameters {
        let cfg = &self.config;
        let visibility = sun_visibility(direction, cfg.visibility_low, cfg.visibility_high);

        let sun = Vec3::from(cfg.sun_color_ramp.sample(angle)) * cfg.sun_intensity_ramp.sample(angle);
        let moon = Vec3::from(cfg.moon_color) * cfg.moon_intensity;
        let light = sun * visibility + moon * (1.0 - visibility);

        let ambient = Vec3::from(cfg.ambient_color_ramp.sample(angle))
            * cfg.ambient_intensity_ramp.sample(angle);

        SharedLightingParameters {
            light_direction: direction.to_array(),
            light_color_intensity: light.to_array(),
            sun_visibility: visibility,
            ambient_color_intensity: ambient.to_array(),
            sky_angle: angle,
        }
    }

    /// Recompute from the controller and publish for `frame`.
    pub fn update(&self, sky: &DayNightController, frame: u64) -> SharedLightingParameters {
        let params = self.compute(sky.angle(), sky.light_direction());
        self.publisher.publish(params, frame);
        log::trace!(
            "Lighting frame {frame}: visibility {:.3}, dir {:?}",
            params.sun_visibility,
            params.light_direction
        );
        params
    }

    /// Value most recently published.
    #[inline]
    pub fn current(&self) -> SharedLightingParameters {
        self.publisher.current()
    }

    #[inline]
    pub fn config(&self) -> &LightingConfig {
        &self.config
    }
}

/// Scene-level directional and ambient lights, read from the shared cell.
#[derive(Clone, Debug)]
pub struct SceneLights {
    lighting: Reader<SharedLightingParameters>,
}

impl SceneLights {
    pub fn new(lighting: Reader<SharedLightingParameters>) -> Self {
        Self { lighting }
    }

    /// `(direction, colour * intensity)` of the directional light.
    pub fn directional(&self) -> (Vec3, Vec3) {
        let p = self.lighting.get();
        (Vec3::from(p.light_direction), Vec3::from(p.light_color_intensity))
    }

    /// Ambient colour premultiplied by intensity.
    pub fn ambient(&self) -> Vec3 {
        Vec3::from(self.lighting.get().ambient_color_intensity)
    }

    /// Whether the lighting was published for `frame`.
    pub fn is_current(&self, frame: u64) -> bool {
        self.lighting.is_current(frame)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
