//! Per-frame render parameters

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Everything the renderer needs for one frame, finalized by the scheduler
/// after every producer has run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameParams {
    pub frame: u64,
    pub elapsed: f32,
    pub delta: f32,
    pub sky_angle: f32,
    pub is_day: bool,
    pub light_direction: [f32; 3],
    pub light_color_intensity: [f32; 3],
    pub ambient_color_intensity: [f32; 3],
    pub sun_visibility: f32,
    pub absorption: [f32; 3],
    pub ocean_brightness: f32,
    pub fire_intensity: f32,
    pub fire_visible: bool,
    pub fire_light_intensity: f32,
    pub fire_light_color: [f32; 3],
    pub fire_position: [f32; 3],
    pub texture_blend: f32,
}

/// GPU uniform for the frame (16-byte aligned rows).
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct FrameUniform {
    pub light_direction: [f32; 3],
    pub sun_visibility: f32,
    pub light_color: [f32; 3],
    pub time: f32,
    pub ambient: [f32; 3],
    pub ocean_brightness: f32,
    pub absorption: [f32; 3],
    pub texture_blend: f32,
    /// Fire light colour premultiplied by flickering intensity
    pub fire_light: [f32; 3],
    /// 1.0 when the fire group is visible
    pub fire_visible: f32,
    pub fire_position: [f32; 3],
    pub fire_intensity: f32,
}

impl FrameParams {
    pub fn to_uniform(&self) -> FrameUniform {
        let fire = self.fire_light_color.map(|c| c * self.fire_light_intensity);
        FrameUniform {
            light_direction: self.light_direction,
            sun_visibility: self.sun_visibility,
            light_color: self.light_color_intensity,
            time: self.elapsed,
            ambient: self.ambient_color_intensity,
            ocean_brightness: self.ocean_brightness,
            absorption: self.absorption,
            texture_blend: self.texture_blend,
            fire_light: fire,
            fire_visible: if self.fire_visible { 1.0 } else { 0.0 },
            fire_position: self.fire_position,
            fire_intensity: self.fire_intensity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 96);
        let params = FrameParams::default();
        let u = params.to_uniform();
        assert_eq!(bytemuck::bytes_of(&u).len(), 96);
    }

    #[test]
    fn test_fire_light_premultiplied() {
        let params = FrameParams {
            fire_visible: true,
            fire_light_intensity: 2.0,
            fire_light_color: [1.0, 0.5, 0.25],
            ..Default::default()
        };
        let u = params.to_uniform();
        assert_eq!(u.fire_light, [2.0, 1.0, 0.5]);
        assert_eq!(u.fire_visible, 1.0);
    }
}
