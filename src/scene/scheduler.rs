//! Frame scheduler
//!
//! Owns every environmental system and runs them in a fixed order each
//! frame: clock, sky, lighting, ocean, fire, audio, then the renderer. A
//! producer always runs before its consumers, so every reader sees values
//! stamped with the current frame.

use crate::atmosphere::{DayNightController, LightingBroadcaster, SceneLights, SkyState};
use crate::audio::{AmbienceAudioController, AmbienceAudioState, AudioBackend};
use crate::core::time::{Clock, ClockState};
use crate::core::types::Result;
use crate::fire::{EmberInstance, FireState, FireStateMachine};
use crate::ocean::{OceanAmbienceSynchronizer, OceanMaterial, OceanMaterialKind, OceanUniforms};
use crate::scene::config::SceneConfig;
use crate::scene::island::IslandMaterial;
use crate::scene::params::FrameParams;
use crate::scene::renderer::{RenderFrame, Renderer};

const OCEAN_KINDS: [OceanMaterialKind; 4] = [
    OceanMaterialKind::Surface,
    OceanMaterialKind::Volume,
    OceanMaterialKind::Object,
    OceanMaterialKind::Triplanar,
];

/// Per-frame driver of the scene.
pub struct FrameScheduler<B: AudioBackend, R: Renderer> {
    config: SceneConfig,
    clock: Clock,
    sky: DayNightController,
    lighting: LightingBroadcaster,
    lights: SceneLights,
    ocean: OceanAmbienceSynchronizer,
    ocean_materials: Vec<OceanMaterial>,
    island: IslandMaterial,
    fire: FireStateMachine,
    audio: AmbienceAudioController<B>,
    renderer: R,
    params: FrameParams,
    embers: Vec<EmberInstance>,
    ocean_uniforms: Vec<(OceanMaterialKind, OceanUniforms)>,
    render_errors: u64,
}

impl<B: AudioBackend, R: Renderer> FrameScheduler<B, R> {
    /// Build every system and wire the shared cells. The sky is not started
    /// yet; toggles before [`start`](Self::start) are deferred.
    pub fn new(config: SceneConfig, backend: B, renderer: R) -> Result<Self> {
        config.validate()?;

        let clock = Clock::new(&config.clock);
        let sky = DayNightController::new(config.sky.clone());
        let lighting = LightingBroadcaster::new(config.lighting.clone());
        let lights = SceneLights::new(lighting.reader());
        let ocean = OceanAmbienceSynchronizer::new(config.ocean.clone());
        let ocean_materials = OCEAN_KINDS.iter().map(|k| ocean.material(*k)).collect();
        let island = IslandMaterial::new(
            config.island.clone(),
            lighting.reader(),
            ocean.material(OceanMaterialKind::Triplanar),
            config.ocean.sea_level,
        );
        let fire = FireStateMachine::new(config.fire.clone());
        let audio = AmbienceAudioController::new(config.audio.clone(), backend, sky.is_day());
        let embers = Vec::with_capacity(config.fire.embers.count);

        log::info!(
            "Scene ready: {} embers, {} ocean parameter sets",
            config.fire.embers.count,
            OCEAN_KINDS.len()
        );

        Ok(Self {
            config,
            clock,
            sky,
            lighting,
            lights,
            ocean,
            ocean_materials,
            island,
            fire,
            audio,
            renderer,
            params: FrameParams::default(),
            embers,
            ocean_uniforms: Vec::with_capacity(OCEAN_KINDS.len()),
            render_errors: 0,
        })
    }

    /// Scene finished initializing: apply any deferred toggle.
    pub fn start(&mut self) {
        self.sky.start();
    }

    /// Run one frame with an explicit delta.
    pub fn tick(&mut self, dt: f32) -> &FrameParams {
        let clock = self.clock.advance(dt);
        self.run_frame(clock)
    }

    /// Run one frame timed by the wall clock.
    pub fn tick_realtime(&mut self) -> &FrameParams {
        let clock = self.clock.tick();
        self.run_frame(clock)
    }

    fn run_frame(&mut self, clock: ClockState) -> &FrameParams {
        let frame = self.clock.frame_count();
        let ClockState { elapsed, delta } = clock;

        self.sky.advance(delta);
        let is_day = self.sky.is_day();
        let lighting = self.lighting.update(&self.sky, frame);
        let ocean = self.ocean.update(&lighting, frame);
        let fire = self.fire.update(delta, elapsed, is_day);
        self.audio.update(delta, elapsed, is_day);

        debug_assert!(self.lights.is_current(frame));
        debug_assert!(self.ocean_materials.iter().all(|m| m.is_current(frame)));
        debug_assert!(self.island.is_current(frame));

        let (light_direction, light_color) = self.lights.directional();
        self.params = FrameParams {
            frame,
            elapsed,
            delta,
            sky_angle: self.sky.angle(),
            is_day,
            light_direction: light_direction.to_array(),
            light_color_intensity: light_color.to_array(),
            ambient_color_intensity: self.lights.ambient().to_array(),
            sun_visibility: lighting.sun_visibility,
            absorption: ocean.absorption,
            ocean_brightness: ocean.brightness,
            fire_intensity: fire.current_intensity,
            fire_visible: fire.visible,
            fire_light_intensity: fire.light_intensity,
            fire_light_color: self.config.fire.light_color,
            fire_position: self.config.fire.position,
            texture_blend: self.island.texture_blend(),
        };

        self.embers.clear();
        if fire.visible {
            self.embers
                .extend(self.fire.embers().instances(fire.current_intensity));
        }

        self.ocean_uniforms.clear();
        self.ocean_uniforms.extend(
            self.ocean_materials
                .iter()
                .map(|m| (m.kind(), m.uniforms(elapsed))),
        );

        let render_frame = RenderFrame {
            params: &self.params,
            uniform: self.params.to_uniform(),
            ocean: &self.ocean_uniforms,
            island: self.island.uniforms(),
            embers: &self.embers,
        };
        if let Err(e) = self.renderer.render(&render_frame) {
            self.render_errors += 1;
            log::error!("Render failed on frame {frame}: {e}");
        }

        &self.params
    }

    /// Input: flip day/night. Returns the new day flag (or the current one
    /// when the toggle was deferred).
    pub fn toggle_day_night(&mut self) -> bool {
        self.sky.toggle()
    }

    /// Input: explicit day/night.
    pub fn set_day(&mut self, is_day: bool) -> bool {
        self.sky.set_day(is_day)
    }

    /// Input: user gesture that unlocks audio.
    pub fn start_audio(&mut self) {
        self.audio.start_audio();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.audio.set_muted(muted);
    }

    /// Parameters of the last frame.
    #[inline]
    pub fn params(&self) -> &FrameParams {
        &self.params
    }

    #[inline]
    pub fn sky_state(&self) -> SkyState {
        self.sky.state()
    }

    #[inline]
    pub fn sky(&self) -> &DayNightController {
        &self.sky
    }

    #[inline]
    pub fn fire_state(&self) -> FireState {
        self.fire.state()
    }

    #[inline]
    pub fn fire(&self) -> &FireStateMachine {
        &self.fire
    }

    #[inline]
    pub fn audio_state(&self) -> AmbienceAudioState {
        self.audio.state()
    }

    #[inline]
    pub fn audio(&self) -> &AmbienceAudioController<B> {
        &self.audio
    }

    #[inline]
    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    #[inline]
    pub fn ocean_materials(&self) -> &[OceanMaterial] {
        &self.ocean_materials
    }

    #[inline]
    pub fn island(&self) -> &IslandMaterial {
        &self.island
    }

    #[inline]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Renderer failures so far
    #[inline]
    pub fn render_errors(&self) -> u64 {
        self.render_errors
    }

    #[inline]
    pub fn config(&self) -> &SceneConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
