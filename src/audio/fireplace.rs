//! Night-only fireplace loop.
//!
//! Start and stop are idempotent and driven by day/night edges. A start that
//! arrives before audio is unlocked (or before the asset loaded) is kept as
//! intent and fulfilled by [`Fireplace::resume_deferred`] once playback is
//! possible.

use serde::{Deserialize, Serialize};

use crate::audio::backend::{AudioBackend, Track};
use crate::audio::config::FireplaceConfig;
use crate::audio::fade::LinearFade;

/// Playback phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FireplacePhase {
    Idle,
    FadingIn,
    Steady,
    FadingOut,
}

/// Fireplace loop with linear fades.
#[derive(Clone, Debug)]
pub struct Fireplace {
    config: FireplaceConfig,
    skip_fades: bool,
    phase: FireplacePhase,
    fade: Option<LinearFade>,
    volume: f32,
    gain: f32,
    wanted: bool,
    starts: u32,
}

impl Fireplace {
    pub fn new(config: FireplaceConfig, skip_fades: bool) -> Self {
        Self {
            config,
            skip_fades,
            phase: FireplacePhase::Idle,
            fade: None,
            volume: 0.0,
            gain: 1.0,
            wanted: false,
            starts: 0,
        }
    }

    /// Request the fireplace. Returns `false` when it was already active.
    pub fn start(&mut self, backend: &mut dyn AudioBackend, can_play: bool) -> bool {
        if self.wanted {
            log::debug!("Fireplace already active");
            return false;
        }
        self.wanted = true;
        self.starts += 1;
        if can_play {
            self.begin(backend);
        } else {
            log::debug!("Fireplace start deferred until audio is ready");
        }
        true
    }

    /// Release the fireplace. Returns `false` when it was not active.
    pub fn stop(&mut self, backend: &mut dyn AudioBackend) -> bool {
        if !self.wanted {
            return false;
        }
        self.wanted = false;
        match self.phase {
            FireplacePhase::Idle | FireplacePhase::FadingOut => {}
            FireplacePhase::FadingIn | FireplacePhase::Steady => {
                if self.skip_fades {
                    self.finish(backend);
                } else {
                    log::debug!("Fireplace fading out from {:.3}", self.volume);
                    self.fade = Some(LinearFade::new(self.volume, 0.0, self.config.fade_out));
                    self.phase = FireplacePhase::FadingOut;
                }
            }
        }
        true
    }

    /// Fulfil a start that was requested while playback was impossible.
    pub fn resume_deferred(&mut self, backend: &mut dyn AudioBackend, can_play: bool) {
        if self.wanted && can_play && self.phase == FireplacePhase::Idle {
            self.begin(backend);
        }
    }

    fn begin(&mut self, backend: &mut dyn AudioBackend) {
        let cfg = &self.config;
        if self.phase == FireplacePhase::FadingOut {
            // Still audible: ramp back up from where the fade-out got to.
            let span = (cfg.ceiling - cfg.floor).abs().max(f32::EPSILON);
            let remaining = ((cfg.ceiling - self.volume) / span).clamp(0.0, 1.0);
            self.fade = Some(LinearFade::new(self.volume, cfg.ceiling, cfg.fade_in * remaining));
            self.phase = FireplacePhase::FadingIn;
            return;
        }

        if let Err(e) = backend.play(Track::Fireplace, true) {
            log::error!("Fireplace playback failed: {e}");
            self.wanted = false;
            return;
        }
        log::info!("Fireplace started");

        if self.skip_fades {
            self.volume = cfg.ceiling;
            self.fade = None;
            self.phase = FireplacePhase::Steady;
        } else {
            self.volume = cfg.floor;
            self.fade = Some(LinearFade::new(cfg.floor, cfg.ceiling, cfg.fade_in));
            self.phase = FireplacePhase::FadingIn;
        }
        self.apply_volume(backend);
    }

    fn finish(&mut self, backend: &mut dyn AudioBackend) {
        backend.stop(Track::Fireplace);
        self.volume = 0.0;
        self.fade = None;
        self.phase = FireplacePhase::Idle;
        log::info!("Fireplace stopped");
    }

    fn apply_volume(&self, backend: &mut dyn AudioBackend) {
        backend.set_volume(Track::Fireplace, self.volume * self.gain);
    }

    /// Advance the running fade by `dt`.
    pub fn update(&mut self, dt: f32, backend: &mut dyn AudioBackend) {
        let Some(fade) = self.fade.as_mut() else {
            return;
        };
        self.volume = fade.advance(dt);
        let done = fade.is_done();
        self.apply_volume(backend);

        if done {
            match self.phase {
                FireplacePhase::FadingIn => {
                    self.fade = None;
                    self.phase = FireplacePhase::Steady;
                }
                FireplacePhase::FadingOut => self.finish(backend),
                FireplacePhase::Idle | FireplacePhase::Steady => self.fade = None,
            }
        }
    }

    /// Master gain (0 when muted). Re-applied immediately while audible.
    pub fn set_gain(&mut self, gain: f32, backend: &mut dyn AudioBackend) {
        self.gain = gain.clamp(0.0, 1.0);
        if self.phase != FireplacePhase::Idle {
            self.apply_volume(backend);
        }
    }

    /// Whether the fireplace is wanted (night), playing or not.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.wanted
    }

    #[inline]
    pub fn phase(&self) -> FireplacePhase {
        self.phase
    }

    /// Volume before master gain.
    #[inline]
    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Progress of the running fade; 1 when settled.
    pub fn fade_progress(&self) -> f32 {
        self.fade.as_ref().map_or(1.0, LinearFade::progress)
    }

    /// Accepted start requests so far
    #[inline]
    pub fn starts(&self) -> u32 {
        self.starts
    }
}
