//! Keyframe interpolation over the sky angle.
//!
//! [`Ramp`] maps a sky angle (radians) to a value by linearly interpolating
//! between sorted keys. Outside the keyed range the nearest end key is held,
//! since the sky angle only sweeps between the day and night constants.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Lerp trait
// ---------------------------------------------------------------------------

/// Trait for types that can be linearly interpolated.
pub trait Lerp: Clone + Default {
    fn lerp(&self, other: &Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for [f32; 3] {
    #[inline]
    fn lerp(&self, other: &Self, t: f32) -> Self {
        [
            self[0] + (other[0] - self[0]) * t,
            self[1] + (other[1] - self[1]) * t,
            self[2] + (other[2] - self[2]) * t,
        ]
    }
}

// ---------------------------------------------------------------------------
// Ramp
// ---------------------------------------------------------------------------

/// Keyframe ramp keyed by sky angle, clamped at both ends.
#[derive(Clone, Debug)]
pub struct Ramp<T: Lerp> {
    keys: Vec<(f32, T)>,
}

impl<T: Lerp> Ramp<T> {
    /// Create a new ramp from unsorted keys. Keys are sorted by angle.
    pub fn new(mut keys: Vec<(f32, T)>) -> Self {
        keys.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { keys }
    }

    /// Create a constant ramp that always returns the same value.
    pub fn constant(value: T) -> Self {
        Self {
            keys: vec![(0.0, value)],
        }
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the ramp has no keys
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sample the ramp at `angle`. An empty ramp yields `T::default()`.
    pub fn sample(&self, angle: f32) -> T {
        let (first, last) = match (self.keys.first(), self.keys.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return T::default(),
        };
        if self.keys.len() == 1 {
            return first.1.clone();
        }

        if angle <= first.0 {
            return first.1.clone();
        }
        if angle >= last.0 {
            return last.1.clone();
        }

        // first key with angle > sample; guaranteed to exist and be > 0 here
        let upper = self
            .keys
            .iter()
            .position(|k| k.0 > angle)
            .unwrap_or(self.keys.len() - 1);
        let (a_t, ref a_v) = self.keys[upper - 1];
        let (b_t, ref b_v) = self.keys[upper];
        let span = b_t - a_t;
        if span < 1e-6 {
            return a_v.clone();
        }
        a_v.lerp(b_v, (angle - a_t) / span)
    }
}

// ---------------------------------------------------------------------------
// Serde support
// ---------------------------------------------------------------------------

impl<T: Lerp + Serialize> Serialize for Ramp<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.keys.serialize(serializer)
    }
}

impl<'de, T: Lerp + Deserialize<'de>> Deserialize<'de> for Ramp<T> {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let keys = Vec::<(f32, T)>::deserialize(deserializer)?;
        Ok(Self::new(keys))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
