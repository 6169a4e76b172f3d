//! Scene configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::atmosphere::{LightingConfig, SkyConfig};
use crate::audio::AudioConfig;
use crate::core::error::Error;
use crate::core::time::ClockConfig;
use crate::core::types::Result;
use crate::fire::FireConfig;
use crate::ocean::OceanConfig;
use crate::scene::island::IslandConfig;

/// Configuration for the whole scene. Missing fields take their defaults.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub clock: ClockConfig,
    pub sky: SkyConfig,
    pub lighting: LightingConfig,
    pub ocean: OceanConfig,
    pub island: IslandConfig,
    pub fire: FireConfig,
    pub audio: AudioConfig,
}

fn check(ok: bool, msg: impl FnOnce() -> String) -> Result<()> {
    if ok { Ok(()) } else { Err(Error::Config(msg())) }
}

fn unit(name: &str, v: f32) -> Result<()> {
    check((0.0..=1.0).contains(&v), || format!("{name} must be in [0, 1], got {v}"))
}

impl SceneConfig {
    /// Save to file (sync)
    pub fn save_sync(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file (sync) and validate
    pub fn load_sync(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the state machines cannot run with.
    pub fn validate(&self) -> Result<()> {
        let sky = &self.sky;
        check(sky.transition_speed > 0.0, || {
            format!("sky.transition_speed must be > 0, got {}", sky.transition_speed)
        })?;
        check(sky.day_angle != sky.night_angle, || {
            "sky.day_angle and sky.night_angle must differ".to_string()
        })?;
        check(
            sky.rotation_axis.iter().any(|c| *c != 0.0),
            || "sky.rotation_axis must be non-zero".to_string(),
        )?;

        let lighting = &self.lighting;
        check(lighting.visibility_high > lighting.visibility_low, || {
            "lighting.visibility_high must exceed visibility_low".to_string()
        })?;

        let fire = &self.fire;
        check(fire.fade_speed > 0.0, || {
            format!("fire.fade_speed must be > 0, got {}", fire.fade_speed)
        })?;
        check(fire.embers.count > 0, || "fire.embers.count must be > 0".to_string())?;
        check(fire.embers.lifetime > 0.0, || {
            "fire.embers.lifetime must be > 0".to_string()
        })?;
        check(fire.embers.speed_min <= fire.embers.speed_max, || {
            "fire.embers.speed_min must not exceed speed_max".to_string()
        })?;

        let audio = &self.audio;
        check(audio.breeze_delay_min >= 0.0, || {
            "audio.breeze_delay_min must be >= 0".to_string()
        })?;
        check(audio.breeze_delay_min <= audio.breeze_delay_max, || {
            format!(
                "audio.breeze_delay_min ({}) exceeds breeze_delay_max ({})",
                audio.breeze_delay_min, audio.breeze_delay_max
            )
        })?;
        check(audio.fireplace.fade_in >= 0.0 && audio.fireplace.fade_out >= 0.0, || {
            "audio.fireplace fade durations must be >= 0".to_string()
        })?;
        unit("audio.water_volume", audio.water_volume)?;
        unit("audio.breeze_volume", audio.breeze_volume)?;
        unit("audio.fireplace.floor", audio.fireplace.floor)?;
        unit("audio.fireplace.ceiling", audio.fireplace.ceiling)?;

        check(self.clock.max_delta > 0.0, || "clock.max_delta must be > 0".to_string())?;
        Ok(())
    }
}
