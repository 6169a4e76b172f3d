//! Clamped linear approach shared by the sky angle and fire intensity.

/// Move `current` toward `target` by at most `max_step`.
///
/// When the remaining distance is within `max_step` the result is exactly
/// `target`, so repeated calls settle without drifting or overshooting.
#[inline]
pub fn step_toward(current: f32, target: f32, max_step: f32) -> f32 {
    let max_step = max_step.max(0.0);
    let diff = target - current;
    if diff.abs() <= max_step {
        target
    } else {
        current + diff.signum() * max_step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_by_max() {
        assert!((step_toward(0.0, 1.0, 0.25) - 0.25).abs() < 1e-6);
        assert!((step_toward(1.0, 0.0, 0.25) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_snaps_on_last_step() {
        assert_eq!(step_toward(0.9, 1.0, 0.25), 1.0);
        assert_eq!(step_toward(0.1, 0.0, 0.25), 0.0);
        // exactly the remaining distance also snaps
        assert_eq!(step_toward(0.5, 1.0, 0.5), 1.0);
    }

    #[test]
    fn test_negative_step_is_noop() {
        assert_eq!(step_toward(0.3, 1.0, -1.0), 0.3);
    }
}
