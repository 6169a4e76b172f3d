//! Day/night sky and the lighting derived from it.
//!
//! [`DayNightController`] owns the sky angle and day flag.
//! [`LightingBroadcaster`] turns the angle into a [`SharedLightingParameters`]
//! that every lit renderer reads through a shared handle.

pub mod config;
pub mod lighting;
pub mod ramp;
pub mod sky;
pub mod sun;

// Re-exports
pub use config::{LightingConfig, SkyConfig};
pub use lighting::{LightingBroadcaster, SceneLights, SharedLightingParameters};
pub use ramp::Ramp;
pub use sky::{DayNightController, SkyState};
