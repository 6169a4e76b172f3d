//! Scene wiring: configuration, per-frame scheduling and the render boundary

pub mod config;
pub mod island;
pub mod params;
pub mod renderer;
pub mod scheduler;

pub use config::SceneConfig;
pub use island::{IslandConfig, IslandMaterial, IslandUniforms};
pub use params::{FrameParams, FrameUniform};
pub use renderer::{LogRenderer, RenderFrame, Renderer};
pub use scheduler::FrameScheduler;
