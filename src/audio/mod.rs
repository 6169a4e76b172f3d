//! Ambience audio.
//!
//! A water loop that plays forever once audio is unlocked, breeze one-shots on
//! a randomized timer, and a fireplace loop that fades in when night falls and
//! out when day breaks. The controller reacts to *edges* of the day flag, so
//! a steady night never restarts the fireplace.

pub mod assets;
pub mod backend;
pub mod breeze;
pub mod config;
pub mod fade;
pub mod fireplace;
pub mod unlock;

#[cfg(test)]
pub(crate) mod testing;

pub use assets::{AssetTracker, LoadState};
pub use backend::{AudioBackend, ContextState, SilentBackend, Track};
pub use breeze::{BreezeScheduler, SingleShotTimer};
pub use config::{AudioConfig, FireplaceConfig};
pub use fade::LinearFade;
pub use fireplace::{Fireplace, FireplacePhase};
pub use unlock::{AudioUnlock, UnlockState};

use serde::{Deserialize, Serialize};

/// Snapshot of the ambience layer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AmbienceAudioState {
    pub is_fireplace_active: bool,
    /// Progress of the running fireplace fade; 1 when settled.
    pub fade_progress: f32,
    pub was_day: bool,
    pub fireplace_phase: FireplacePhase,
    pub fireplace_volume: f32,
    pub unlock: UnlockState,
    pub water_playing: bool,
    /// Absolute time of the next breeze, if one is pending.
    pub next_breeze: Option<f32>,
    pub muted: bool,
}

/// Drives the three ambience tracks from the day flag.
pub struct AmbienceAudioController<B: AudioBackend> {
    config: AudioConfig,
    backend: B,
    unlock: AudioUnlock,
    assets: AssetTracker,
    fireplace: Fireplace,
    breeze: BreezeScheduler,
    water_playing: bool,
    was_day: bool,
    muted: bool,
}

impl<B: AudioBackend> AmbienceAudioController<B> {
    /// Create the controller and start loading assets. `is_day` is the
    /// scene's initial day flag, used as the first edge reference.
    pub fn new(config: AudioConfig, mut backend: B, is_day: bool) -> Self {
        let mut assets = AssetTracker::new();
        assets.begin(&mut backend, &config);
        let fireplace = Fireplace::new(config.fireplace.clone(), config.skip_fades);
        let breeze =
            BreezeScheduler::new(config.breeze_delay_min, config.breeze_delay_max, config.seed);
        let muted = config.muted;
        Self {
            config,
            backend,
            unlock: AudioUnlock::new(),
            assets,
            fireplace,
            breeze,
            water_playing: false,
            was_day: is_day,
            muted,
        }
    }

    /// User gesture: unlock audio output.
    pub fn start_audio(&mut self) {
        self.unlock.request(&mut self.backend);
    }

    /// Per-frame update. `elapsed` is the clock's total time.
    pub fn update(&mut self, dt: f32, elapsed: f32, is_day: bool) {
        self.backend.update(dt);
        self.assets.poll(&mut self.backend);
        if self.unlock.poll(&mut self.backend) {
            self.apply_volumes();
        }

        // Fades advance before edges so a fade started this frame is
        // measured from its own start.
        self.fireplace.update(dt, &mut self.backend);
        if self.unlock.is_ready() {
            self.breeze.update(elapsed, &mut self.backend);
        }

        if self.was_day && !is_day {
            let can_play = self.can_play(Track::Fireplace);
            self.fireplace.start(&mut self.backend, can_play);
        } else if !self.was_day && is_day {
            self.fireplace.stop(&mut self.backend);
        }
        self.was_day = is_day;

        if self.unlock.is_ready() {
            self.start_water();
            if !self.breeze.is_started() && self.assets.is_loaded(Track::Breeze) {
                self.breeze.start(elapsed, &mut self.backend);
            }
        }
        let can_play = self.can_play(Track::Fireplace);
        self.fireplace.resume_deferred(&mut self.backend, can_play);
    }

    fn can_play(&self, track: Track) -> bool {
        self.unlock.is_ready() && self.assets.is_loaded(track)
    }

    fn start_water(&mut self) {
        if self.water_playing || !self.assets.is_loaded(Track::Water) {
            return;
        }
        match self.backend.play(Track::Water, true) {
            Ok(()) => {
                log::info!("Water loop started");
                self.water_playing = true;
                self.backend
                    .set_volume(Track::Water, self.config.water_volume * self.gain());
            }
            Err(e) => {
                log::error!("Water loop failed: {e}");
                self.assets.mark_failed(Track::Water);
            }
        }
    }

    fn gain(&self) -> f32 {
        if self.muted { 0.0 } else { 1.0 }
    }

    fn apply_volumes(&mut self) {
        let gain = self.gain();
        self.backend
            .set_volume(Track::Water, self.config.water_volume * gain);
        self.backend
            .set_volume(Track::Breeze, self.config.breeze_volume * gain);
        self.fireplace.set_gain(gain, &mut self.backend);
    }

    /// Master mute on top of all track volumes.
    pub fn set_muted(&mut self, muted: bool) {
        if self.muted == muted {
            return;
        }
        self.muted = muted;
        log::info!("Audio {}", if muted { "muted" } else { "unmuted" });
        self.apply_volumes();
    }

    pub fn state(&self) -> AmbienceAudioState {
        AmbienceAudioState {
            is_fireplace_active: self.fireplace.is_active(),
            fade_progress: self.fireplace.fade_progress(),
            was_day: self.was_day,
            fireplace_phase: self.fireplace.phase(),
            fireplace_volume: self.fireplace.volume(),
            unlock: self.unlock.state(),
            water_playing: self.water_playing,
            next_breeze: self.breeze.pending(),
            muted: self.muted,
        }
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.unlock.is_ready()
    }

    #[inline]
    pub fn load_state(&self, track: Track) -> LoadState {
        self.assets.state(track)
    }

    #[inline]
    pub fn fireplace(&self) -> &Fireplace {
        &self.fireplace
    }

    #[inline]
    pub fn breeze(&self) -> &BreezeScheduler {
        &self.breeze
    }

    #[inline]
    pub fn unlock(&self) -> &AudioUnlock {
        &self.unlock
    }

    #[inline]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    #[inline]
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    #[inline]
    pub fn config(&self) -> &AudioConfig {
        &self.config
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::testing::{Call, RecordingBackend};
    use super::*;

    const DT: f32 = 0.016;

    fn config() -> AudioConfig {
        AudioConfig {
            seed: Some(5),
            ..Default::default()
        }
    }

    fn ready_controller(config: AudioConfig) -> AmbienceAudioController<RecordingBackend> {
        let mut c = AmbienceAudioController::new(config, RecordingBackend::new(), true);
        c.start_audio();
        c.update(DT, DT, true);
        assert!(c.is_ready());
        c
    }

    #[test]
    fn test_loads_every_track() {
        let c = AmbienceAudioController::new(config(), RecordingBackend::new(), true);
        let loads = c
            .backend()
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Load(..)))
            .count();
        assert_eq!(loads, 3);
    }

    #[test]
    fn test_nothing_plays_before_unlock() {
        let mut c = AmbienceAudioController::new(config(), RecordingBackend::new(), true);
        for _ in 0..10 {
            c.update(DT, 0.0, false);
        }
        assert_eq!(c.state().unlock, UnlockState::Uninitialized);
        assert_eq!(c.backend().plays(Track::Water), 0);
        assert_eq!(c.backend().plays(Track::Fireplace), 0);
    }

    #[test]
    fn test_water_and_breeze_start_once_unlocked() {
        let mut c = ready_controller(config());
        for _ in 0..20 {
            c.update(DT, DT, true);
        }
        assert_eq!(c.backend().plays(Track::Water), 1);
        assert!(c.backend().calls.contains(&Call::Play(Track::Water, true)));
        assert_eq!(c.backend().plays(Track::Breeze), 1);
        assert_eq!(c.backend().volume(Track::Water), Some(0.5));
        assert!(c.state().water_playing);
    }

    #[test]
    fn test_fireplace_edge_triggered() {
        let mut c = ready_controller(config());
        c.update(DT, DT, false);
        c.update(DT, DT, false);
        c.update(DT, DT, false);
        assert_eq!(c.fireplace().starts(), 1);
        assert_eq!(c.backend().plays(Track::Fireplace), 1);
        assert!(c.state().is_fireplace_active);
        assert!(!c.state().was_day);
    }

    #[test]
    fn test_fade_in_midpoint() {
        let mut c = ready_controller(config());
        c.update(DT, 0.0, false);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::FadingIn);
        assert_eq!(c.state().fireplace_volume, 0.0);
        for _ in 0..3 {
            c.update(0.5, 0.0, false);
        }
        let s = c.state();
        assert!((s.fireplace_volume - 0.175).abs() < 1e-5);
        assert!((s.fade_progress - 0.5).abs() < 1e-5);
        let v = c.backend().volume(Track::Fireplace).unwrap();
        assert!((v - 0.175).abs() < 1e-5);
    }

    #[test]
    fn test_fade_out_stops_and_rewinds() {
        let mut c = ready_controller(config());
        c.update(DT, 0.0, false);
        c.update(3.0, 0.0, false);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Steady);
        assert!((c.state().fireplace_volume - 0.35).abs() < 1e-6);

        c.update(DT, 0.0, true);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::FadingOut);
        assert!(!c.state().is_fireplace_active);
        assert_eq!(c.backend().stops(Track::Fireplace), 0);

        c.update(0.5, 0.0, true);
        assert!((c.state().fireplace_volume - 0.175).abs() < 1e-5);
        c.update(0.5, 0.0, true);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Idle);
        assert_eq!(c.backend().stops(Track::Fireplace), 1);
    }

    #[test]
    fn test_stop_when_inactive_is_noop() {
        let mut c = ready_controller(config());
        for _ in 0..5 {
            c.update(DT, 0.0, true);
        }
        assert_eq!(c.backend().stops(Track::Fireplace), 0);
        assert_eq!(c.fireplace().starts(), 0);
    }

    #[test]
    fn test_night_before_unlock_is_deferred() {
        let mut c = AmbienceAudioController::new(config(), RecordingBackend::new(), true);
        c.update(DT, 0.0, false);
        assert!(c.state().is_fireplace_active);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Idle);

        c.start_audio();
        c.update(DT, 0.0, false);
        assert_eq!(c.backend().plays(Track::Fireplace), 1);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::FadingIn);
    }

    #[test]
    fn test_skip_fades_jumps_volume() {
        let mut c = ready_controller(AudioConfig {
            skip_fades: true,
            ..config()
        });
        c.update(DT, 0.0, false);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Steady);
        assert_eq!(c.state().fireplace_volume, 0.35);

        c.update(DT, 0.0, true);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Idle);
        assert_eq!(c.backend().stops(Track::Fireplace), 1);
    }

    #[test]
    fn test_night_again_during_fade_out_ramps_back_up() {
        let mut c = ready_controller(config());
        c.update(DT, 0.0, false);
        c.update(3.0, 0.0, false);
        c.update(DT, 0.0, true);
        c.update(0.5, 0.0, true);
        c.update(0.0, 0.0, false);
        let s = c.state();
        assert_eq!(s.fireplace_phase, FireplacePhase::FadingIn);
        assert!((s.fireplace_volume - 0.175).abs() < 1e-5);
        // no restart from the beginning
        assert_eq!(c.backend().plays(Track::Fireplace), 1);
        assert_eq!(c.backend().stops(Track::Fireplace), 0);
        c.update(1.5, 0.0, false);
        assert_eq!(c.state().fireplace_phase, FireplacePhase::Steady);
    }

    #[test]
    fn test_failed_resume_is_retried() {
        let mut backend = RecordingBackend::new();
        backend.failing_resumes = 1;
        let mut c = AmbienceAudioController::new(config(), backend, true);
        c.start_audio();
        c.update(DT, 0.0, true);
        assert_eq!(c.state().unlock, UnlockState::Failed);
        c.update(DT, 0.0, true);
        c.update(DT, 0.0, true);
        assert!(c.is_ready());
        assert_eq!(c.unlock().attempts(), 2);
    }

    #[test]
    fn test_suspended_context_is_resumed() {
        let mut c = ready_controller(config());
        c.backend_mut().context = ContextState::Suspended;
        c.update(DT, 0.0, true);
        assert_eq!(c.state().unlock, UnlockState::Initializing);
        c.update(DT, 0.0, true);
        assert!(c.is_ready());
    }

    #[test]
    fn test_failed_asset_stays_silent() {
        let mut backend = RecordingBackend::new();
        backend.failing_loads.insert(Track::Fireplace);
        let mut c = AmbienceAudioController::new(config(), backend, true);
        c.start_audio();
        for _ in 0..5 {
            c.update(DT, 0.0, false);
        }
        assert_eq!(c.load_state(Track::Fireplace), LoadState::Failed);
        assert_eq!(c.backend().plays(Track::Fireplace), 0);
        assert_eq!(c.backend().plays(Track::Water), 1);
    }

    #[test]
    fn test_breeze_rescheduled_after_end() {
        let mut c = ready_controller(config());
        assert_eq!(c.breeze().plays(), 1);
        assert!(c.state().next_breeze.is_none());

        c.backend_mut().finish(Track::Breeze);
        c.update(DT, 2.0, true);
        let due = c.state().next_breeze.unwrap();
        assert!((10.0..=22.0).contains(&due));

        c.update(DT, due - 0.1, true);
        assert_eq!(c.breeze().plays(), 1);
        c.update(DT, due, true);
        assert_eq!(c.breeze().plays(), 2);
        assert!(c.state().next_breeze.is_none());
    }

    #[test]
    fn test_mute_zeroes_volumes() {
        let mut c = ready_controller(config());
        c.update(DT, 0.0, false);
        c.update(1.5, 0.0, false);
        c.set_muted(true);
        assert_eq!(c.backend().volume(Track::Water), Some(0.0));
        assert_eq!(c.backend().volume(Track::Fireplace), Some(0.0));
        // fade keeps running underneath
        assert!(c.state().fireplace_volume > 0.0);

        c.set_muted(false);
        assert_eq!(c.backend().volume(Track::Water), Some(0.5));
    }
}
