//! Ocean shader parameter sets

use bytemuck::{Pod, Zeroable};

use crate::core::shared::Reader;
use crate::ocean::OceanParams;

/// Which ocean shader a parameter set feeds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OceanMaterialKind {
    /// Animated water surface
    Surface,
    /// Underwater volume fog
    Volume,
    /// Objects partially submerged (absorption applied below sea level)
    Object,
    /// Triplanar-mapped terrain under the waterline
    Triplanar,
}

/// GPU-ready ocean uniforms.
///
/// All `vec3` fields are padded to 16-byte alignment for WGSL compatibility.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct OceanUniforms {
    /// Sea level in world space (meters)
    pub sea_level: f32,
    /// Time in seconds (for wave animation)
    pub time: f32,
    /// Brightness of scattered light
    pub brightness: f32,
    /// Sun visibility `[0, 1]`
    pub sun_visibility: f32,

    /// Water colour (linear RGB)
    pub water_color: [f32; 3],
    pub _pad1: f32,

    /// Beer-Lambert absorption coefficients (RGB)
    pub absorption: [f32; 3],
    pub _pad2: f32,
}

/// One consumer of the shared ocean parameters.
#[derive(Clone, Debug)]
pub struct OceanMaterial {
    kind: OceanMaterialKind,
    params: Reader<OceanParams>,
    sea_level: f32,
}

impl OceanMaterial {
    pub fn new(kind: OceanMaterialKind, params: Reader<OceanParams>, sea_level: f32) -> Self {
        Self {
            kind,
            params,
            sea_level,
        }
    }

    #[inline]
    pub fn kind(&self) -> OceanMaterialKind {
        self.kind
    }

    /// Current shared params
    #[inline]
    pub fn params(&self) -> OceanParams {
        self.params.get()
    }

    /// Whether the shared params were published for `frame`
    pub fn is_current(&self, frame: u64) -> bool {
        self.params.is_current(frame)
    }

    /// Uniforms for this frame
    pub fn uniforms(&self, time: f32) -> OceanUniforms {
        let p = self.params.get();
        OceanUniforms {
            sea_level: self.sea_level,
            time,
            brightness: p.brightness,
            sun_visibility: p.sun_visibility,
            water_color: p.water_color,
            _pad1: 0.0,
            absorption: p.absorption,
            _pad2: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocean::{OceanAmbienceSynchronizer, OceanConfig};

    #[test]
    fn test_uniform_size_alignment() {
        let size = std::mem::size_of::<OceanUniforms>();
        assert_eq!(size % 16, 0, "OceanUniforms size {size} is not 16-byte aligned");
    }

    #[test]
    fn test_uniforms_follow_shared_params() {
        let sync = OceanAmbienceSynchronizer::new(OceanConfig::default());
        let mat = sync.material(OceanMaterialKind::Volume);
        let before = mat.uniforms(0.0);
        assert_eq!(before.brightness, 1.0);

        let lighting = crate::atmosphere::SharedLightingParameters {
            sun_visibility: 0.0,
            ..Default::default()
        };
        sync.update(&lighting, 1);
        let after = mat.uniforms(1.5);
        assert!((after.brightness - 0.08).abs() < 1e-6);
        assert_eq!(after.time, 1.5);
        assert_eq!(bytemuck::bytes_of(&after).len(), std::mem::size_of::<OceanUniforms>());
    }
}
