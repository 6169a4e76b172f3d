//! Island material
//!
//! The island is lit by the shared lighting and, below the waterline, tinted
//! by the triplanar ocean parameters. Its texture-blend factor mixes the
//! sand/grass albedo textures against a flat moonlit tint as the sun sets.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use crate::atmosphere::lighting::SharedLightingParameters;
use crate::core::shared::Reader;
use crate::ocean::{OceanMaterial, OceanMaterialKind};

/// Island shading tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct IslandConfig {
    /// Texture blend with full sun.
    pub day_texture_blend: f32,
    /// Texture blend with no sun.
    pub night_texture_blend: f32,
    /// Height above sea level that still reads as wet sand.
    pub wet_sand_height: f32,
}

impl Default for IslandConfig {
    fn default() -> Self {
        Self {
            day_texture_blend: 1.0,
            night_texture_blend: 0.25,
            wet_sand_height: 0.3,
        }
    }
}

/// GPU-ready island uniforms (16-byte aligned rows).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct IslandUniforms {
    pub light_direction: [f32; 3],
    pub texture_blend: f32,
    pub light_color: [f32; 3],
    pub sun_visibility: f32,
    pub ambient: [f32; 3],
    pub sea_level: f32,
    pub absorption: [f32; 3],
    pub wet_sand_height: f32,
}

/// Island material bound to the shared lighting and ocean cells.
#[derive(Clone, Debug)]
pub struct IslandMaterial {
    config: IslandConfig,
    lighting: Reader<SharedLightingParameters>,
    ocean: OceanMaterial,
    sea_level: f32,
}

impl IslandMaterial {
    /// `ocean` must be the triplanar parameter set.
    pub fn new(
        config: IslandConfig,
        lighting: Reader<SharedLightingParameters>,
        ocean: OceanMaterial,
        sea_level: f32,
    ) -> Self {
        debug_assert_eq!(ocean.kind(), OceanMaterialKind::Triplanar);
        Self {
            config,
            lighting,
            ocean,
            sea_level,
        }
    }

    /// Sand/grass texture weight for a sun visibility.
    pub fn texture_blend_for(&self, sun_visibility: f32) -> f32 {
        let v = sun_visibility.clamp(0.0, 1.0);
        let cfg = &self.config;
        cfg.night_texture_blend + (cfg.day_texture_blend - cfg.night_texture_blend) * v
    }

    /// Texture weight for the current lighting.
    pub fn texture_blend(&self) -> f32 {
        self.texture_blend_for(self.lighting.get().sun_visibility)
    }

    /// Whether both inputs were published for `frame`.
    pub fn is_current(&self, frame: u64) -> bool {
        self.lighting.is_current(frame) && self.ocean.is_current(frame)
    }

    pub fn uniforms(&self) -> IslandUniforms {
        let light = self.lighting.get();
        let ocean = self.ocean.params();
        IslandUniforms {
            light_direction: light.light_direction,
            texture_blend: self.texture_blend_for(light.sun_visibility),
            light_color: light.light_color_intensity,
            sun_visibility: light.sun_visibility,
            ambient: light.ambient_color_intensity,
            sea_level: self.sea_level,
            absorption: ocean.absorption,
            wet_sand_height: self.config.wet_sand_height,
        }
    }

    #[inline]
    pub fn config(&self) -> &IslandConfig {
        &self.config
    }
}
