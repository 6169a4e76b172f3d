//! Recording audio backend for tests.

use std::collections::{HashMap, HashSet};
use std::task::Poll;

use crate::audio::backend::{AudioBackend, ContextState, Track};
use crate::core::error::Error;
use crate::core::types::Result;

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Load(Track, String),
    Resume,
    Play(Track, bool),
    Stop(Track),
    SetVolume(Track, f32),
}

/// Records every call; loads and resume succeed on first poll unless told
/// otherwise.
pub struct RecordingBackend {
    pub calls: Vec<Call>,
    pub context: ContextState,
    /// Number of upcoming resume requests that fail.
    pub failing_resumes: u32,
    /// Tracks whose load fails.
    pub failing_loads: HashSet<Track>,
    resume_requested: bool,
    loads: HashSet<Track>,
    ended: HashSet<Track>,
    volumes: HashMap<Track, f32>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self {
            calls: Vec::new(),
            context: ContextState::Suspended,
            failing_resumes: 0,
            failing_loads: HashSet::new(),
            resume_requested: false,
            loads: HashSet::new(),
            ended: HashSet::new(),
            volumes: HashMap::new(),
        }
    }

    /// Simulate a one-shot reaching its end.
    pub fn finish(&mut self, track: Track) {
        self.ended.insert(track);
    }

    pub fn plays(&self, track: Track) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Play(t, _) if *t == track))
            .count()
    }

    pub fn stops(&self, track: Track) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, Call::Stop(t) if *t == track))
            .count()
    }

    pub fn volume(&self, track: Track) -> Option<f32> {
        self.volumes.get(&track).copied()
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for RecordingBackend {
    fn load(&mut self, track: Track, url: &str) {
        self.calls.push(Call::Load(track, url.to_string()));
        self.loads.insert(track);
    }

    fn poll_load(&mut self, track: Track) -> Poll<Result<()>> {
        if !self.loads.contains(&track) {
            return Poll::Pending;
        }
        if self.failing_loads.contains(&track) {
            Poll::Ready(Err(Error::Asset {
                url: format!("{track:?}"),
                reason: "not found".into(),
            }))
        } else {
            Poll::Ready(Ok(()))
        }
    }

    fn context_state(&self) -> ContextState {
        self.context
    }

    fn resume(&mut self) {
        self.calls.push(Call::Resume);
        self.resume_requested = true;
    }

    fn poll_resume(&mut self) -> Poll<Result<()>> {
        if self.resume_requested {
            self.resume_requested = false;
            if self.failing_resumes > 0 {
                self.failing_resumes -= 1;
                return Poll::Ready(Err(Error::Audio("resume rejected".into())));
            }
            self.context = ContextState::Running;
        }
        match self.context {
            ContextState::Running => Poll::Ready(Ok(())),
            _ => Poll::Pending,
        }
    }

    fn play(&mut self, track: Track, looping: bool) -> Result<()> {
        if self.context != ContextState::Running {
            return Err(Error::Audio("suspended".into()));
        }
        self.calls.push(Call::Play(track, looping));
        Ok(())
    }

    fn stop(&mut self, track: Track) {
        self.calls.push(Call::Stop(track));
    }

    fn set_volume(&mut self, track: Track, volume: f32) {
        self.calls.push(Call::SetVolume(track, volume));
        self.volumes.insert(track, volume);
    }

    fn take_ended(&mut self, track: Track) -> bool {
        self.ended.remove(&track)
    }
}
