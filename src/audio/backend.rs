//! Audio output boundary.
//!
//! Decoding and playback belong to the host. The ambience controller only
//! talks to an [`AudioBackend`]: it hands over asset URLs, asks for playback
//! and volume changes, and polls for the results of asynchronous work
//! (asset loads, context resume) once per frame without ever blocking.

use std::collections::HashMap;
use std::task::Poll;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;
use crate::core::types::Result;

/// The three ambience tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    /// Continuous water loop
    Water,
    /// One-shot breeze, replayed on a timer
    Breeze,
    /// Night-only fireplace loop
    Fireplace,
}

impl Track {
    pub const ALL: [Track; 3] = [Track::Water, Track::Breeze, Track::Fireplace];
}

/// State of the host audio context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContextState {
    /// No output allowed until resumed (autoplay policy, backgrounding).
    Suspended,
    Running,
    Closed,
}

/// Host audio capability.
pub trait AudioBackend {
    /// Start fetching and decoding `url` for `track`. Completion is reported
    /// through [`poll_load`](Self::poll_load).
    fn load(&mut self, track: Track, url: &str);

    /// Result of the load started for `track`.
    fn poll_load(&mut self, track: Track) -> Poll<Result<()>>;

    /// Current context state.
    fn context_state(&self) -> ContextState;

    /// Ask the host to resume the context. Fire-and-forget; the outcome
    /// arrives through [`poll_resume`](Self::poll_resume).
    fn resume(&mut self);

    /// Outcome of the last [`resume`](Self::resume) request.
    fn poll_resume(&mut self) -> Poll<Result<()>>;

    /// Start `track` from its current position.
    fn play(&mut self, track: Track, looping: bool) -> Result<()>;

    /// Stop `track` and rewind it to the start.
    fn stop(&mut self, track: Track);

    /// Set the output volume of `track` in `[0, 1]`.
    fn set_volume(&mut self, track: Track, volume: f32);

    /// Whether a non-looping `track` finished since the last call.
    fn take_ended(&mut self, track: Track) -> bool;

    /// Advance any backend-side simulation by `dt` seconds.
    fn update(&mut self, _dt: f32) {}
}

// ---------------------------------------------------------------------------
// Silent backend
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, Default)]
struct SilentVoice {
    playing: bool,
    looping: bool,
    position: f32,
    volume: f32,
    ended: bool,
}

/// Backend that produces no sound but honours the full contract.
///
/// Loads succeed on the first poll unless the URL is empty, resume succeeds
/// on the first poll, and one-shots end after their configured duration.
/// Used by the headless binary and benches.
pub struct SilentBackend {
    context: ContextState,
    resume_pending: bool,
    loads: HashMap<Track, std::result::Result<(), String>>,
    voices: HashMap<Track, SilentVoice>,
    durations: HashMap<Track, f32>,
}

impl SilentBackend {
    /// `breeze_duration` is the length of the breeze one-shot in seconds.
    pub fn new(breeze_duration: f32) -> Self {
        let mut durations = HashMap::new();
        durations.insert(Track::Breeze, breeze_duration.max(0.0));
        Self {
            context: ContextState::Suspended,
            resume_pending: false,
            loads: HashMap::new(),
            voices: HashMap::new(),
            durations,
        }
    }

    /// Whether `track` is currently playing.
    pub fn is_playing(&self, track: Track) -> bool {
        self.voices.get(&track).is_some_and(|v| v.playing)
    }

    /// Last volume set on `track`.
    pub fn volume(&self, track: Track) -> f32 {
        self.voices.get(&track).map_or(0.0, |v| v.volume)
    }
}

impl Default for SilentBackend {
    fn default() -> Self {
        Self::new(6.0)
    }
}

impl AudioBackend for SilentBackend {
    fn load(&mut self, track: Track, url: &str) {
        let result = if url.is_empty() {
            Err(format!("no URL for {track:?}"))
        } else {
            Ok(())
        };
        self.loads.insert(track, result);
    }

    fn poll_load(&mut self, track: Track) -> Poll<Result<()>> {
        match self.loads.get(&track) {
            Some(Ok(())) => Poll::Ready(Ok(())),
            Some(Err(reason)) => Poll::Ready(Err(Error::Asset {
                url: String::new(),
                reason: reason.clone(),
            })),
            None => Poll::Pending,
        }
    }

    fn context_state(&self) -> ContextState {
        self.context
    }

    fn resume(&mut self) {
        self.resume_pending = true;
    }

    fn poll_resume(&mut self) -> Poll<Result<()>> {
        if self.resume_pending {
            self.resume_pending = false;
            self.context = ContextState::Running;
        }
        match self.context {
            ContextState::Running => Poll::Ready(Ok(())),
            ContextState::Closed => Poll::Ready(Err(Error::Audio("context closed".into()))),
            ContextState::Suspended => Poll::Pending,
        }
    }

    fn play(&mut self, track: Track, looping: bool) -> Result<()> {
        if self.context != ContextState::Running {
            return Err(Error::Audio(format!("cannot play {track:?}: context not running")));
        }
        let voice = self.voices.entry(track).or_default();
        voice.playing = true;
        voice.looping = looping;
        voice.ended = false;
        Ok(())
    }

    fn stop(&mut self, track: Track) {
        if let Some(voice) = self.voices.get_mut(&track) {
            voice.playing = false;
            voice.position = 0.0;
        }
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        self.voices.entry(track).or_default().volume = volume.clamp(0.0, 1.0);
    }

    fn take_ended(&mut self, track: Track) -> bool {
        self.voices
            .get_mut(&track)
            .is_some_and(|v| std::mem::take(&mut v.ended))
    }

    fn update(&mut self, dt: f32) {
        for (track, voice) in self.voices.iter_mut() {
            if !voice.playing {
                continue;
            }
            voice.position += dt;
            if voice.looping {
                continue;
            }
            if let Some(&duration) = self.durations.get(track) {
                if voice.position >= duration {
                    voice.playing = false;
                    voice.position = 0.0;
                    voice.ended = true;
                }
            }
        }
    }
}
