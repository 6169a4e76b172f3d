use std::path::PathBuf;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard};
use std::time::{Duration, Instant};

use shoreline::audio::{AmbienceAudioState, AudioBackend, SilentBackend};
use shoreline::core::logging;
use shoreline::scene::{FrameParams, FrameScheduler, LogRenderer, Renderer, SceneConfig};
use shoreline_debug::{AudioInfo, FireInfo, FrameParamsInfo, SkyInfo};

/// Target frame time of the headless loop
const FRAME_TIME: Duration = Duration::from_micros(16_667);

/// Shared state between the debug server and the frame loop
#[derive(Default)]
struct SharedDebugState {
    // Requests (set by debug handler, consumed by frame loop)
    toggle_requests: u32,
    set_day: Option<bool>,
    start_audio: bool,
    set_muted: Option<bool>,

    // Snapshots (updated by frame loop each frame)
    sky: SkyInfo,
    frame_params: FrameParamsInfo,
    fire: FireInfo,
    audio: AudioInfo,
    current_fps: f32,
    frame_count: u64,
}

fn lock(state: &StdMutex<SharedDebugState>) -> MutexGuard<'_, SharedDebugState> {
    // A panicked holder leaves only plain values behind
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct AppDebugHandler {
    state: Arc<StdMutex<SharedDebugState>>,
}

impl shoreline_debug::DebugHandler for AppDebugHandler {
    fn handle_command(&mut self, cmd: shoreline_debug::DebugCommand) -> shoreline_debug::DebugResponse {
        use shoreline_debug::*;

        match cmd {
            DebugCommand::Ping => DebugResponse::pong(),

            DebugCommand::ToggleDayNight => {
                let mut s = lock(&self.state);
                s.toggle_requests += 1;
                DebugResponse::updated("day/night toggle queued")
            }

            DebugCommand::SetDay { is_day } => {
                let mut s = lock(&self.state);
                s.set_day = Some(is_day);
                DebugResponse::updated(if is_day { "day queued" } else { "night queued" })
            }

            DebugCommand::StartAudio => {
                let mut s = lock(&self.state);
                s.start_audio = true;
                DebugResponse::updated("audio start queued")
            }

            DebugCommand::SetMuted { muted } => {
                let mut s = lock(&self.state);
                s.set_muted = Some(muted);
                DebugResponse::updated(if muted { "mute queued" } else { "unmute queued" })
            }

            DebugCommand::GetSkyState => {
                let s = lock(&self.state);
                DebugResponse::ok(ResponseData::SkyState(s.sky.clone()))
            }

            DebugCommand::GetFrameParams => {
                let s = lock(&self.state);
                DebugResponse::ok(ResponseData::FrameParams(s.frame_params.clone()))
            }

            DebugCommand::GetFireState => {
                let s = lock(&self.state);
                DebugResponse::ok(ResponseData::FireState(s.fire.clone()))
            }

            DebugCommand::GetAudioState => {
                let s = lock(&self.state);
                DebugResponse::ok(ResponseData::AudioState(s.audio.clone()))
            }

            DebugCommand::GetFpsStats => {
                let s = lock(&self.state);
                DebugResponse::ok(ResponseData::FpsStats {
                    current_fps: s.current_fps,
                    frame_count: s.frame_count,
                })
            }
        }
    }
}

fn frame_params_info(p: &FrameParams) -> FrameParamsInfo {
    FrameParamsInfo {
        frame: p.frame,
        elapsed: p.elapsed,
        light_direction: p.light_direction,
        light_color_intensity: p.light_color_intensity,
        ambient_color_intensity: p.ambient_color_intensity,
        sun_visibility: p.sun_visibility,
        absorption: p.absorption,
        ocean_brightness: p.ocean_brightness,
        fire_intensity: p.fire_intensity,
        fire_light_intensity: p.fire_light_intensity,
        texture_blend: p.texture_blend,
    }
}

fn audio_info(a: &AmbienceAudioState) -> AudioInfo {
    AudioInfo {
        unlock: format!("{:?}", a.unlock),
        is_fireplace_active: a.is_fireplace_active,
        fireplace_phase: format!("{:?}", a.fireplace_phase),
        fireplace_volume: a.fireplace_volume,
        fade_progress: a.fade_progress,
        water_playing: a.water_playing,
        next_breeze: a.next_breeze,
        muted: a.muted,
    }
}

/// Apply queued debug requests, then publish this frame's snapshots.
fn sync_debug_state<B: AudioBackend, R: Renderer>(
    scene: &mut FrameScheduler<B, R>,
    state: &StdMutex<SharedDebugState>,
) {
    let mut s = lock(state);

    for _ in 0..std::mem::take(&mut s.toggle_requests) {
        scene.toggle_day_night();
    }
    if let Some(is_day) = s.set_day.take() {
        scene.set_day(is_day);
    }
    if std::mem::take(&mut s.start_audio) {
        scene.start_audio();
    }
    if let Some(muted) = s.set_muted.take() {
        scene.set_muted(muted);
    }

    let sky = scene.sky_state();
    s.sky = SkyInfo {
        angle: sky.angle,
        target_angle: sky.target_angle,
        is_day: sky.is_day,
        is_transitioning: sky.is_transitioning,
        transition_remaining: scene.sky().transition_remaining(),
    };
    s.frame_params = frame_params_info(scene.params());
    let fire = scene.fire_state();
    s.fire = FireInfo {
        current_intensity: fire.current_intensity,
        target_intensity: fire.target_intensity,
        visible: fire.visible,
        embers_active: fire.embers_active,
        light_intensity: fire.light_intensity,
        ember_count: scene.fire().embers().len() as u32,
    };
    s.audio = audio_info(&scene.audio_state());
    s.current_fps = scene.clock().fps();
    s.frame_count = scene.clock().frame_count();
}

fn main() {
    logging::init();
    log::info!("Shoreline starting...");

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_config_arg(&args);
    let max_frames = parse_frames_arg(&args);

    let config = match &config_path {
        Some(path) => {
            log::info!("Loading config from: {}", path.display());
            match SceneConfig::load_sync(path) {
                Ok(c) => c,
                Err(e) => {
                    log::error!("Failed to load config {}: {}", path.display(), e);
                    std::process::exit(1);
                }
            }
        }
        None => SceneConfig::default(),
    };
    if let Some(n) = max_frames {
        log::info!("Running {} frames", n);
    }

    // Create shared debug state
    let debug_state = Arc::new(StdMutex::new(SharedDebugState::default()));

    // Start debug server in background thread with tokio runtime
    let debug_state_clone = debug_state.clone();
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                log::error!("Failed to create tokio runtime: {}", e);
                return;
            }
        };
        rt.block_on(async {
            let handler = Arc::new(tokio::sync::Mutex::new(AppDebugHandler {
                state: debug_state_clone,
            }));
            let _server = shoreline_debug::DebugServer::start(handler, shoreline_debug::DEFAULT_PORT);
            log::info!("Debug server started on port {}", shoreline_debug::DEFAULT_PORT);
            // Keep runtime alive forever
            loop {
                tokio::time::sleep(Duration::from_secs(3600)).await;
            }
        });
    });

    let breeze_length = 6.0;
    let mut scene = match FrameScheduler::new(
        config,
        SilentBackend::new(breeze_length),
        LogRenderer::new(),
    ) {
        Ok(s) => s,
        Err(e) => {
            log::error!("Invalid scene config: {}", e);
            std::process::exit(1);
        }
    };
    scene.start();

    let mut frames = 0u64;
    loop {
        let frame_start = Instant::now();

        sync_debug_state(&mut scene, &debug_state);
        scene.tick_realtime();
        frames += 1;

        if max_frames.is_some_and(|n| frames >= n) {
            break;
        }

        let spent = frame_start.elapsed();
        if spent < FRAME_TIME {
            std::thread::sleep(FRAME_TIME - spent);
        }
    }

    let p = scene.params();
    log::info!(
        "Stopped after {} frames ({:.2}s): {}, sun visibility {:.3}, fire {:.3}",
        frames,
        p.elapsed,
        if p.is_day { "day" } else { "night" },
        p.sun_visibility,
        p.fire_intensity
    );
}

/// Parse --config argument from command line
fn parse_config_arg(args: &[String]) -> Option<PathBuf> {
    for i in 0..args.len() {
        if args[i] == "--config" || args[i] == "-c" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

/// Parse --frames argument from command line (stop after this many frames)
fn parse_frames_arg(args: &[String]) -> Option<u64> {
    for i in 0..args.len() {
        if args[i] == "--frames" || args[i] == "-n" {
            if let Some(n) = args.get(i + 1) {
                return n.parse().ok();
            }
        }
    }
    None
}
