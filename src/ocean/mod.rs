//! Ocean light absorption and ambient brightness.
//!
//! The ocean has no state of its own: each frame
//! [`OceanAmbienceSynchronizer`] derives [`OceanParams`] from the published
//! lighting and writes them into one shared cell. The surface, volume,
//! object and triplanar parameter sets ([`OceanMaterial`]) all read that
//! cell.

pub mod material;

pub use material::{OceanMaterial, OceanMaterialKind, OceanUniforms};

use serde::{Deserialize, Serialize};

use crate::atmosphere::lighting::SharedLightingParameters;
use crate::core::shared::{Publisher, Reader};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// Ocean tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct OceanConfig {
    /// Beer-Lambert absorption coefficients (RGB) in full daylight.
    pub absorption: [f32; 3],
    /// Absorption multiplier reached when the sun is fully hidden.
    pub night_absorption_scale: f32,
    /// Scattered water colour (linear RGB).
    pub water_color: [f32; 3],
    /// Brightness with full sun.
    pub day_brightness: f32,
    /// Brightness with no sun.
    pub night_brightness: f32,
    /// Sea level in world space.
    pub sea_level: f32,
}

impl Default for OceanConfig {
    fn default() -> Self {
        Self {
            absorption: [0.45, 0.15, 0.05], // Red absorbed most, blue least
            night_absorption_scale: 1.6,
            water_color: [0.0, 0.4, 0.6],
            day_brightness: 1.0,
            night_brightness: 0.08,
            sea_level: 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Shared params
// ---------------------------------------------------------------------------

/// Values shared by every ocean parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct OceanParams {
    /// Per-channel attenuation per metre of water.
    pub absorption: [f32; 3],
    /// Visibility-derived brightness of scattered light.
    pub brightness: f32,
    pub water_color: [f32; 3],
    pub sun_visibility: f32,
}

impl Default for OceanParams {
    fn default() -> Self {
        let cfg = OceanConfig::default();
        Self {
            absorption: cfg.absorption,
            brightness: cfg.day_brightness,
            water_color: cfg.water_color,
            sun_visibility: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Synchronizer
// ---------------------------------------------------------------------------

/// Single producer of [`OceanParams`].
pub struct OceanAmbienceSynchronizer {
    config: OceanConfig,
    publisher: Publisher<OceanParams>,
}

impl OceanAmbienceSynchronizer {
    pub fn new(config: OceanConfig) -> Self {
        let initial = OceanParams {
            absorption: config.absorption,
            brightness: config.day_brightness,
            water_color: config.water_color,
            sun_visibility: 1.0,
        };
        Self {
            config,
            publisher: Publisher::new(initial),
        }
    }

    /// Reader for an ocean consumer.
    pub fn reader(&self) -> Reader<OceanParams> {
        self.publisher.reader()
    }

    /// Build a parameter set of the given kind bound to the shared cell.
    pub fn material(&self, kind: OceanMaterialKind) -> OceanMaterial {
        OceanMaterial::new(kind, self.reader(), self.config.sea_level)
    }

    /// Ocean params for a lighting state. Pure.
    pub fn compute(&self, lighting: &SharedLightingParameters) -> OceanParams {
        let cfg = &self.config;
        let visibility = lighting.sun_visibility.clamp(0.0, 1.0);
        let scale = 1.0 + (cfg.night_absorption_scale - 1.0) * (1.0 - visibility);
        OceanParams {
            absorption: [
                cfg.absorption[0] * scale,
                cfg.absorption[1] * scale,
                cfg.absorption[2] * scale,
            ],
            brightness: cfg.night_brightness + (cfg.day_brightness - cfg.night_brightness) * visibility,
            water_color: cfg.water_color,
            sun_visibility: visibility,
        }
    }

    /// Recompute from this frame's lighting and publish.
    pub fn update(&self, lighting: &SharedLightingParameters, frame: u64) -> OceanParams {
        let params = self.compute(lighting);
        self.publisher.publish(params, frame);
        params
    }

    #[inline]
    pub fn current(&self) -> OceanParams {
        self.publisher.current()
    }

    #[inline]
    pub fn config(&self) -> &OceanConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn lighting(visibility: f32) -> SharedLightingParameters {
        SharedLightingParameters {
            sun_visibility: visibility,
            ..Default::default()
        }
    }

    #[test]
    fn test_day_values_match_config() {
        let sync = OceanAmbienceSynchronizer::new(OceanConfig::default());
        let p = sync.compute(&lighting(1.0));
        assert_eq!(p.absorption, [0.45, 0.15, 0.05]);
        assert!((p.brightness - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_night_darker_and_more_absorbing() {
        let sync = OceanAmbienceSynchronizer::new(OceanConfig::default());
        let day = sync.compute(&lighting(1.0));
        let night = sync.compute(&lighting(0.0));
        assert!((night.brightness - 0.08).abs() < 1e-6);
        for i in 0..3 {
            assert!(night.absorption[i] > day.absorption[i]);
        }
    }

    #[test]
    fn test_brightness_linear_in_visibility() {
        let sync = OceanAmbienceSynchronizer::new(OceanConfig::default());
        let half = sync.compute(&lighting(0.5));
        assert!((half.brightness - (0.08 + 0.92 * 0.5)).abs() < 1e-5);
    }

    #[test]
    fn test_update_reaches_every_material() {
        let sync = OceanAmbienceSynchronizer::new(OceanConfig::default());
        let mats: Vec<_> = [
            OceanMaterialKind::Surface,
            OceanMaterialKind::Volume,
            OceanMaterialKind::Object,
            OceanMaterialKind::Triplanar,
        ]
        .into_iter()
        .map(|k| sync.material(k))
        .collect();

        let p = sync.update(&lighting(0.25), 9);
        for m in &mats {
            assert_eq!(m.params(), p);
            assert!(m.is_current(9));
        }
    }
}
