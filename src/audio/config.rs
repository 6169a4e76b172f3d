use serde::{Deserialize, Serialize};

/// Fireplace loop fades.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct FireplaceConfig {
    /// Volume at the start of the fade-in.
    pub floor: f32,
    /// Steady-state volume.
    pub ceiling: f32,
    /// Seconds from playback start to `ceiling`.
    pub fade_in: f32,
    /// Seconds from the current volume to silence.
    pub fade_out: f32,
}

impl Default for FireplaceConfig {
    fn default() -> Self {
        Self {
            floor: 0.0,
            ceiling: 0.35,
            fade_in: 3.0,
            fade_out: 1.0,
        }
    }
}

/// Ambience audio settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub water_url: String,
    pub breeze_url: String,
    pub fireplace_url: String,
    pub water_volume: f32,
    pub breeze_volume: f32,
    pub fireplace: FireplaceConfig,
    /// Delay range between breeze plays, seconds.
    pub breeze_delay_min: f32,
    pub breeze_delay_max: f32,
    /// Jump volumes instead of ramping. For hosts that ignore volume changes
    /// on media elements.
    pub skip_fades: bool,
    /// Start muted.
    pub muted: bool,
    /// Fixed seed for the breeze delay RNG; random when unset.
    pub seed: Option<u64>,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            water_url: "assets/audio/water-loop.mp3".to_string(),
            breeze_url: "assets/audio/breeze.mp3".to_string(),
            fireplace_url: "assets/audio/fireplace-loop.mp3".to_string(),
            water_volume: 0.5,
            breeze_volume: 0.4,
            fireplace: FireplaceConfig::default(),
            breeze_delay_min: 8.0,
            breeze_delay_max: 20.0,
            skip_fades: false,
            muted: false,
            seed: None,
        }
    }
}
