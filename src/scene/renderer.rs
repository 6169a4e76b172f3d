//! Render boundary

use crate::core::types::Result;
use crate::fire::EmberInstance;
use crate::ocean::{OceanMaterialKind, OceanUniforms};
use crate::scene::island::IslandUniforms;
use crate::scene::params::{FrameParams, FrameUniform};

/// Everything handed to the renderer for one frame.
#[derive(Clone, Copy, Debug)]
pub struct RenderFrame<'a> {
    pub params: &'a FrameParams,
    pub uniform: FrameUniform,
    /// One entry per ocean parameter set
    pub ocean: &'a [(OceanMaterialKind, OceanUniforms)],
    pub island: IslandUniforms,
    pub embers: &'a [EmberInstance],
}

/// Consumes the finalized per-frame data.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<()>;
}

/// Renderer that only logs. Used by the headless binary and benches.
#[derive(Debug, Default)]
pub struct LogRenderer {
    frames: u64,
    uploaded_bytes: u64,
    last_is_day: Option<bool>,
}

impl LogRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames rendered so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Uniform bytes that a GPU backend would have uploaded
    pub fn uploaded_bytes(&self) -> u64 {
        self.uploaded_bytes
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &RenderFrame<'_>) -> Result<()> {
        let params = frame.params;
        self.frames += 1;

        let mut bytes = bytemuck::bytes_of(&frame.uniform).len()
            + bytemuck::bytes_of(&frame.island).len();
        for (_, ocean) in frame.ocean {
            bytes += bytemuck::bytes_of(ocean).len();
        }
        self.uploaded_bytes += bytes as u64;

        if self.last_is_day != Some(params.is_day) {
            log::info!(
                "Frame {}: {} (sky angle {:.3})",
                params.frame,
                if params.is_day { "day" } else { "night" },
                params.sky_angle
            );
            self.last_is_day = Some(params.is_day);
        }
        log::trace!(
            "Frame {}: visibility {:.3}, brightness {:.3}, texture blend {:.3}, fire {:.3}, {} embers, {} uniform bytes",
            params.frame,
            frame.uniform.sun_visibility,
            frame.uniform.ocean_brightness,
            frame.island.texture_blend,
            frame.uniform.fire_intensity,
            frame.embers.len(),
            bytes
        );
        Ok(())
    }
}
