//! Audio context unlock.
//!
//! Hosts refuse audio output until a user gesture. [`AudioUnlock`] tracks the
//! resume request as an explicit state machine, polled once per frame. A
//! failed or re-suspended context is retried on later frames for as long as
//! audio has been requested; failure is never fatal.

use std::task::Poll;

use serde::{Deserialize, Serialize};

use crate::audio::backend::{AudioBackend, ContextState};

/// Unlock progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnlockState {
    /// No resume requested yet
    Uninitialized,
    /// Resume requested, waiting for the host
    Initializing,
    /// Context running
    Ready,
    /// Last attempt failed; retried on the next frame
    Failed,
}

/// Unlock state machine.
#[derive(Clone, Debug)]
pub struct AudioUnlock {
    state: UnlockState,
    requested: bool,
    attempts: u32,
}

impl AudioUnlock {
    pub fn new() -> Self {
        Self {
            state: UnlockState::Uninitialized,
            requested: false,
            attempts: 0,
        }
    }

    /// User gesture: ask for audio. Re-entrant calls while a request is
    /// outstanding or after success do nothing.
    pub fn request(&mut self, backend: &mut dyn AudioBackend) {
        self.requested = true;
        match self.state {
            UnlockState::Uninitialized | UnlockState::Failed => self.begin(backend),
            UnlockState::Initializing | UnlockState::Ready => {}
        }
    }

    fn begin(&mut self, backend: &mut dyn AudioBackend) {
        self.attempts += 1;
        self.state = UnlockState::Initializing;
        log::debug!("Requesting audio context resume (attempt {})", self.attempts);
        backend.resume();
    }

    /// Poll the outstanding request. Returns `true` on the frame the context
    /// becomes ready.
    pub fn poll(&mut self, backend: &mut dyn AudioBackend) -> bool {
        match self.state {
            UnlockState::Uninitialized => false,
            UnlockState::Initializing => match backend.poll_resume() {
                Poll::Ready(Ok(())) => {
                    log::info!("Audio unlocked");
                    self.state = UnlockState::Ready;
                    true
                }
                Poll::Ready(Err(e)) => {
                    log::warn!("Audio resume failed: {e}");
                    self.state = UnlockState::Failed;
                    false
                }
                Poll::Pending => false,
            },
            UnlockState::Ready => {
                if backend.context_state() == ContextState::Suspended && self.requested {
                    log::info!("Audio context suspended, resuming");
                    self.begin(backend);
                }
                false
            }
            UnlockState::Failed => {
                if self.requested {
                    self.begin(backend);
                }
                false
            }
        }
    }

    #[inline]
    pub fn state(&self) -> UnlockState {
        self.state
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state == UnlockState::Ready
    }

    #[inline]
    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Number of resume attempts made
    #[inline]
    pub fn attempts(&self) -> u32 {
        self.attempts
    }
}

impl Default for AudioUnlock {
    fn default() -> Self {
        Self::new()
    }
}
