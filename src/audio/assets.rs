//! Per-track asset load tracking.

use std::collections::HashMap;
use std::task::Poll;

use serde::{Deserialize, Serialize};

use crate::audio::backend::{AudioBackend, Track};
use crate::audio::config::AudioConfig;

/// Load progress of one track.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoadState {
    Pending,
    Loaded,
    Failed,
}

/// Tracks asset loads handed to the backend.
#[derive(Clone, Debug, Default)]
pub struct AssetTracker {
    states: HashMap<Track, LoadState>,
}

impl AssetTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand every configured URL to the backend.
    pub fn begin(&mut self, backend: &mut dyn AudioBackend, config: &AudioConfig) {
        for track in Track::ALL {
            let url = match track {
                Track::Water => &config.water_url,
                Track::Breeze => &config.breeze_url,
                Track::Fireplace => &config.fireplace_url,
            };
            log::debug!("Loading {track:?} from {url}");
            backend.load(track, url);
            self.states.insert(track, LoadState::Pending);
        }
    }

    /// Poll pending loads. Failures are logged and the track stays silent.
    pub fn poll(&mut self, backend: &mut dyn AudioBackend) {
        for (track, state) in self.states.iter_mut() {
            if *state != LoadState::Pending {
                continue;
            }
            match backend.poll_load(*track) {
                Poll::Ready(Ok(())) => {
                    log::info!("{track:?} audio loaded");
                    *state = LoadState::Loaded;
                }
                Poll::Ready(Err(e)) => {
                    log::error!("{track:?} audio failed to load: {e}");
                    *state = LoadState::Failed;
                }
                Poll::Pending => {}
            }
        }
    }

    /// Give up on a track after a playback error.
    pub fn mark_failed(&mut self, track: Track) {
        self.states.insert(track, LoadState::Failed);
    }

    /// State of `track`; `Pending` when never requested.
    pub fn state(&self, track: Track) -> LoadState {
        self.states.get(&track).copied().unwrap_or(LoadState::Pending)
    }

    #[inline]
    pub fn is_loaded(&self, track: Track) -> bool {
        self.state(track) == LoadState::Loaded
    }
}
