//! Fixed-size ember particle pool.
//!
//! Embers are never allocated or freed after construction: when one burns
//! out it is re-initialised in place near the fire origin with a fresh
//! upward velocity.

use std::f32::consts::TAU;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::core::types::Vec3;

/// Ember pool tuning.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EmberConfig {
    /// Number of embers in the pool.
    pub count: usize,
    /// Seconds from spawn to burn-out.
    pub lifetime: f32,
    /// Horizontal radius around the origin embers spawn in.
    pub spawn_radius: f32,
    /// Base upward speed (units/s) before the random multiplier.
    pub base_speed: f32,
    /// Horizontal spread of the launch direction relative to straight up.
    pub spread: f32,
    /// Random speed multiplier range.
    pub speed_min: f32,
    pub speed_max: f32,
    /// Sideways wobble amplitude (units/s).
    pub wobble_amplitude: f32,
    /// Wobble frequency (rad/s).
    pub wobble_frequency: f32,
    /// Rendered size of a fresh ember.
    pub size: f32,
    /// Fixed RNG seed; random when unset.
    pub seed: Option<u64>,
}

impl Default for EmberConfig {
    fn default() -> Self {
        Self {
            count: 48,
            lifetime: 1.6,
            spawn_radius: 0.25,
            base_speed: 1.2,
            spread: 0.35,
            speed_min: 0.5,
            speed_max: 1.5,
            wobble_amplitude: 0.15,
            wobble_frequency: 3.0,
            size: 0.05,
            seed: None,
        }
    }
}

/// One recycled spark.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ember {
    /// Position relative to the fire origin.
    pub position: Vec3,
    /// Remaining life, 1 at spawn and 0 at burn-out.
    pub life: f32,
    pub velocity: Vec3,
    /// Per-ember random value in `[0, 1)`.
    pub seed: f32,
}

/// Render data for one ember.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EmberInstance {
    pub position: Vec3,
    pub size: f32,
    pub alpha: f32,
}

/// The ember pool.
pub struct EmberPool {
    config: EmberConfig,
    embers: Vec<Ember>,
    rng: StdRng,
    respawns: u64,
}

impl EmberPool {
    /// Fill the pool. Initial lives are staggered so embers don't all burn
    /// out on the same frame.
    pub fn new(config: EmberConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut pool = Self {
            embers: Vec::with_capacity(config.count),
            config,
            rng,
            respawns: 0,
        };
        for _ in 0..pool.config.count {
            let mut ember = pool.spawn();
            ember.life = pool.rng.gen_range(0.05..=1.0);
            pool.embers.push(ember);
        }
        pool
    }

    fn spawn(&mut self) -> Ember {
        let cfg = &self.config;
        let r = cfg.spawn_radius.abs();
        let spread = cfg.spread.abs();
        let position = Vec3::new(
            self.rng.gen_range(-r..=r),
            0.0,
            self.rng.gen_range(-r..=r),
        );
        let dir = Vec3::new(
            self.rng.gen_range(-spread..=spread),
            1.0,
            self.rng.gen_range(-spread..=spread),
        )
        .normalize();
        let (lo, hi) = if cfg.speed_min <= cfg.speed_max {
            (cfg.speed_min, cfg.speed_max)
        } else {
            (cfg.speed_max, cfg.speed_min)
        };
        let speed = cfg.base_speed * self.rng.gen_range(lo..=hi);
        Ember {
            position,
            life: 1.0,
            velocity: dir * speed,
            seed: self.rng.r#gen::<f32>(),
        }
    }

    /// Advance every ember by `dt`. `elapsed` drives the wobble phase.
    pub fn update(&mut self, dt: f32, elapsed: f32) {
        let dt = dt.max(0.0);
        let lifetime = self.config.lifetime.max(1e-3);
        let amp = self.config.wobble_amplitude;
        let freq = self.config.wobble_frequency;

        for i in 0..self.embers.len() {
            let burnt_out = {
                let ember = &mut self.embers[i];
                // index offsets the phase so neighbours don't sway in sync
                let phase = elapsed * freq + i as f32 * 0.7 + ember.seed * TAU;
                let wobble = Vec3::new(phase.sin(), 0.0, phase.cos()) * amp * dt;
                ember.position += ember.velocity * dt + wobble;
                ember.life = (ember.life - dt / lifetime).min(1.0);
                ember.life <= 0.0
            };

            if burnt_out {
                self.embers[i] = self.spawn();
                self.respawns += 1;
            }
        }
    }

    /// Embers as render instances, faded by `intensity`.
    pub fn instances(&self, intensity: f32) -> impl Iterator<Item = EmberInstance> + '_ {
        let size = self.config.size;
        self.embers.iter().map(move |e| EmberInstance {
            position: e.position,
            size: size * (0.5 + 0.5 * e.life),
            alpha: e.life * intensity,
        })
    }

    #[inline]
    pub fn embers(&self) -> &[Ember] {
        &self.embers
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.embers.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.embers.is_empty()
    }

    /// Total respawns so far
    #[inline]
    pub fn respawns(&self) -> u64 {
        self.respawns
    }
}
