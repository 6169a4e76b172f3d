//! Light direction and visibility from the sky angle.
//!
//! The sky angle is measured from the zenith. The reference up vector is
//! rotated about a horizontal axis (camera-relative, world +X by default, so
//! the sun rises and sets in front of a viewer looking down -Z) and then
//! mirrored in X/Z so the result points toward the light source.

use glam::{Quat, Vec3};

/// Compute the unit direction toward the light for a sky angle.
pub fn light_direction(angle: f32, axis: Vec3) -> Vec3 {
    let axis = axis.try_normalize().unwrap_or(Vec3::X);
    let rotated = Quat::from_axis_angle(axis, angle) * Vec3::Y;
    Vec3::new(-rotated.x, rotated.y, -rotated.z).normalize_or_zero()
}

/// How much of the directly lit scene the sun illuminates, in `[0, 1]`.
///
/// Linear in the light's height between `low` (fully dark) and `high`
/// (fully lit).
pub fn sun_visibility(direction: Vec3, low: f32, high: f32) -> f32 {
    if high <= low {
        return if direction.y >= high { 1.0 } else { 0.0 };
    }
    ((direction.y - low) / (high - low)).clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_zero_angle_is_overhead() {
        let dir = light_direction(0.0, Vec3::X);
        assert!((dir - Vec3::Y).length() < 1e-5, "dir = {dir:?}");
    }

    #[test]
    fn test_day_angle_in_front_and_above() {
        let dir = light_direction(0.35 * PI, Vec3::X);
        assert!((dir.length() - 1.0).abs() < 1e-5);
        assert!(dir.y > 0.4, "day light Y = {}", dir.y);
        // in front of a viewer looking down -Z
        assert!(dir.z < 0.0, "day light Z = {}", dir.z);
        assert!(dir.x.abs() < 1e-5);
    }

    #[test]
    fn test_night_angle_below_horizon() {
        let dir = light_direction(0.75 * PI, Vec3::X);
        assert!(dir.y < -0.5, "night light Y = {}", dir.y);
    }

    #[test]
    fn test_degenerate_axis_falls_back() {
        let a = light_direction(1.0, Vec3::ZERO);
        let b = light_direction(1.0, Vec3::X);
        assert!((a - b).length() < 1e-6);
    }

    #[test]
    fn test_monotonic_descent() {
        let mut prev_y = 2.0;
        for i in 0..=100 {
            let angle = 0.35 * PI + (0.4 * PI) * i as f32 / 100.0;
            let y = light_direction(angle, Vec3::X).y;
            assert!(y <= prev_y + 1e-6, "Y not decreasing at angle {angle}");
            prev_y = y;
        }
    }

    #[test]
    fn test_visibility_bounds() {
        assert_eq!(sun_visibility(Vec3::Y, -0.1, 0.15), 1.0);
        assert_eq!(sun_visibility(-Vec3::Y, -0.1, 0.15), 0.0);
        let mid = sun_visibility(Vec3::new(0.0, 0.025, 1.0), -0.1, 0.15);
        assert!((mid - 0.5).abs() < 1e-5);
    }
}
