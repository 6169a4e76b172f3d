//! Debug protocol - JSON command/response definitions

use serde::{Deserialize, Serialize};

/// Commands sent from a debug client to the debug server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "cmd", content = "params")]
pub enum DebugCommand {
    /// Flip between day and night
    ToggleDayNight,
    /// Set day or night explicitly (no-op when already there)
    SetDay { is_day: bool },
    /// Unlock audio as if the user had clicked
    StartAudio,
    /// Mute or unmute all ambience audio
    SetMuted { muted: bool },
    /// Get sky angle and transition state
    GetSkyState,
    /// Get the parameters last handed to the renderer
    GetFrameParams,
    /// Get campfire state
    GetFireState,
    /// Get ambience audio state
    GetAudioState,
    /// Get FPS statistics
    GetFpsStats,
    /// Ping (health check)
    Ping,
}

/// Responses from debug server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum DebugResponse {
    #[serde(rename = "ok")]
    Ok { data: ResponseData },
    #[serde(rename = "error")]
    Error { message: String },
}

/// Response data variants
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseData {
    Pong { message: String },
    ParamsUpdated { description: String },
    SkyState(SkyInfo),
    FrameParams(FrameParamsInfo),
    FireState(FireInfo),
    AudioState(AudioInfo),
    FpsStats { current_fps: f32, frame_count: u64 },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkyInfo {
    pub angle: f32,
    pub target_angle: f32,
    pub is_day: bool,
    pub is_transitioning: bool,
    /// Seconds until the sky settles
    pub transition_remaining: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameParamsInfo {
    pub frame: u64,
    pub elapsed: f32,
    pub light_direction: [f32; 3],
    pub light_color_intensity: [f32; 3],
    pub ambient_color_intensity: [f32; 3],
    pub sun_visibility: f32,
    pub absorption: [f32; 3],
    pub ocean_brightness: f32,
    pub fire_intensity: f32,
    pub fire_light_intensity: f32,
    pub texture_blend: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FireInfo {
    pub current_intensity: f32,
    pub target_intensity: f32,
    pub visible: bool,
    pub embers_active: bool,
    pub light_intensity: f32,
    pub ember_count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AudioInfo {
    /// Unlock state name (`Uninitialized`, `Initializing`, `Ready`, `Failed`)
    pub unlock: String,
    pub is_fireplace_active: bool,
    /// Fireplace phase name (`Idle`, `FadingIn`, `Steady`, `FadingOut`)
    pub fireplace_phase: String,
    pub fireplace_volume: f32,
    pub fade_progress: f32,
    pub water_playing: bool,
    pub next_breeze: Option<f32>,
    pub muted: bool,
}

impl DebugResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self::Ok { data }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self::Error {
            message: msg.into(),
        }
    }

    pub fn pong() -> Self {
        Self::ok(ResponseData::Pong {
            message: "pong".into(),
        })
    }

    pub fn updated(description: impl Into<String>) -> Self {
        Self::ok(ResponseData::ParamsUpdated {
            description: description.into(),
        })
    }
}
