//! Yaw measurement against the initial camera orientation.

use glam::{EulerRot, Quat};

/// Signed yaw of the camera relative to its initial orientation.
///
/// The reference is captured once, right after the initial pose is set, and
/// never changes. Measuring is cheap but is meant to run only when an orbit
/// interaction ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitTracker {
    reference: Quat,
}

impl OrbitTracker {
    /// Snapshot `orientation` as the zero-yaw reference.
    #[must_use]
    pub fn capture(orientation: Quat) -> Self {
        Self {
            reference: orientation,
        }
    }

    /// The captured reference orientation.
    #[must_use]
    pub fn reference(&self) -> Quat {
        self.reference
    }

    /// Yaw in degrees, in `[0, 360)`, of `current` relative to the reference.
    ///
    /// The relative rotation `reference * current⁻¹` is decomposed in Y-X-Z
    /// order and its Y angle is reported. Crossing the reference direction
    /// wraps between 0 and 360.
    #[must_use]
    pub fn measure_yaw(&self, current: Quat) -> f32 {
        let relative = self.reference * current.inverse();
        let (yaw, _, _) = relative.to_euler(EulerRot::YXZ);
        normalize_yaw(yaw.to_degrees())
    }
}

/// Map a decomposed yaw in `(-180, 180]` degrees into `[0, 360)`.
#[must_use]
pub fn normalize_yaw(degrees: f32) -> f32 {
    let wrapped = if degrees < 0.0 { degrees + 360.0 } else { degrees };
    // -0.00001 + 360 rounds to 360.0 in f32.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use super::*;

    #[test]
    fn normalize_adds_full_turn_to_negative_angles() {
        assert_eq!(normalize_yaw(0.0), 0.0);
        assert_eq!(normalize_yaw(45.0), 45.0);
        assert_eq!(normalize_yaw(-90.0), 270.0);
        assert_relative_eq!(normalize_yaw(-0.5), 359.5);
        assert!(normalize_yaw(-1.0e-6) < 360.0);
    }

    #[test]
    fn unchanged_orientation_measures_zero() {
        let reference = Quat::from_rotation_x(0.3) * Quat::from_rotation_y(1.1);
        let tracker = OrbitTracker::capture(reference);
        assert_relative_eq!(tracker.measure_yaw(reference), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn yaw_about_vertical_axis_is_reported_in_degrees() {
        let tracker = OrbitTracker::capture(Quat::IDENTITY);

        // Camera turned -30 degrees about Y: relative = current^-1 = +30.
        let current = Quat::from_rotation_y((-30.0_f32).to_radians());
        assert_relative_eq!(tracker.measure_yaw(current), 30.0, epsilon = 1e-3);

        // Turned the other way: -30 wraps to 330.
        let current = Quat::from_rotation_y(30.0_f32.to_radians());
        assert_relative_eq!(tracker.measure_yaw(current), 330.0, epsilon = 1e-3);
    }

    #[test]
    fn pitch_does_not_leak_into_yaw() {
        let tracker = OrbitTracker::capture(Quat::IDENTITY);
        let current = Quat::from_axis_angle(Vec3::X, 0.4);
        assert_relative_eq!(tracker.measure_yaw(current), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn yaw_always_in_range() {
        let tracker = OrbitTracker::capture(Quat::IDENTITY);
        for step in 0..720 {
            let angle = (step as f32 * 0.5).to_radians();
            let yaw = tracker.measure_yaw(Quat::from_rotation_y(angle));
            assert!((0.0..360.0).contains(&yaw), "{yaw} at step {step}");
        }
    }
}
