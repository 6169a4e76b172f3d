//! Breeze one-shots on a randomized timer.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::backend::{AudioBackend, Track};

/// Single-slot timer. Scheduling replaces whatever was pending.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SingleShotTimer {
    due: Option<f32>,
}

impl SingleShotTimer {
    /// Schedule at absolute time `at`, returning the replaced deadline.
    pub fn schedule(&mut self, at: f32) -> Option<f32> {
        self.due.replace(at)
    }

    pub fn cancel(&mut self) -> Option<f32> {
        self.due.take()
    }

    /// Consume the deadline if it has passed.
    pub fn fire(&mut self, now: f32) -> bool {
        match self.due {
            Some(at) if now >= at => {
                self.due = None;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn due(&self) -> Option<f32> {
        self.due
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.due.is_some()
    }
}

/// Plays the breeze once, then again a random delay after each play ends.
pub struct BreezeScheduler {
    timer: SingleShotTimer,
    rng: StdRng,
    delay_min: f32,
    delay_max: f32,
    started: bool,
    playing: bool,
    plays: u32,
}

impl BreezeScheduler {
    pub fn new(delay_min: f32, delay_max: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (delay_min, delay_max) = if delay_min <= delay_max {
            (delay_min, delay_max)
        } else {
            (delay_max, delay_min)
        };
        Self {
            timer: SingleShotTimer::default(),
            rng,
            delay_min: delay_min.max(0.0),
            delay_max: delay_max.max(0.0),
            started: false,
            playing: false,
            plays: 0,
        }
    }

    /// First play. Later calls do nothing.
    pub fn start(&mut self, now: f32, backend: &mut dyn AudioBackend) {
        if self.started {
            return;
        }
        self.started = true;
        self.timer.cancel();
        self.play(now, backend);
    }

    fn play(&mut self, now: f32, backend: &mut dyn AudioBackend) {
        match backend.play(Track::Breeze, false) {
            Ok(()) => {
                self.playing = true;
                self.plays += 1;
                log::debug!("Breeze playing ({} so far)", self.plays);
            }
            Err(e) => {
                log::warn!("Breeze playback failed: {e}");
                self.schedule_next(now);
            }
        }
    }

    fn schedule_next(&mut self, now: f32) {
        let delay = self.next_delay();
        if self.timer.schedule(now + delay).is_some() {
            log::trace!("Replaced pending breeze");
        }
        log::debug!("Next breeze in {delay:.1}s");
    }

    /// Uniform delay in the configured range.
    pub fn next_delay(&mut self) -> f32 {
        if self.delay_max > self.delay_min {
            self.rng.gen_range(self.delay_min..=self.delay_max)
        } else {
            self.delay_min
        }
    }

    /// Handle the "ended" notification and the pending timer.
    pub fn update(&mut self, now: f32, backend: &mut dyn AudioBackend) {
        if self.playing && backend.take_ended(Track::Breeze) {
            self.playing = false;
            self.schedule_next(now);
        }
        if self.timer.fire(now) {
            self.play(now, backend);
        }
    }

    #[inline]
    pub fn is_started(&self) -> bool {
        self.started
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Absolute time of the pending play, if any.
    #[inline]
    pub fn pending(&self) -> Option<f32> {
        self.timer.due()
    }

    #[inline]
    pub fn plays(&self) -> u32 {
        self.plays
    }
}
