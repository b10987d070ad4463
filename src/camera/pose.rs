//! Initial camera pose from a calibration record.
//!
//! The calibration's second axis points down in rendering terms, so the up
//! hint is its negation. The field of view reproduces the pinhole vertical
//! FOV for a focal length given in pixels.

use glam::Vec3;

use super::core::CameraState;
use crate::calibration::CalibrationRecord;
use crate::options::{CameraOptions, StandoffFrame, ViewportOptions};

/// A camera pose plus the point it was aimed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InitialPose {
    /// The initialized camera.
    pub camera: CameraState,
    /// Calibration center pushed one target distance along the forward axis.
    pub look_target: Vec3,
}

/// Vertical field of view in degrees for a viewport `height` pixels tall and
/// a focal length in pixels.
#[must_use]
pub fn vertical_fov_degrees(height: f32, focal_length: f32) -> f32 {
    2.0 * (height / 2.0).atan2(focal_length).to_degrees()
}

/// Place the camera from a calibration record.
///
/// Pure function of its inputs; an ill-formed basis produces an ill-formed
/// pose rather than an error.
#[must_use]
pub fn initial_pose(
    calibration: &CalibrationRecord,
    camera: &CameraOptions,
    viewport: &ViewportOptions,
) -> InitialPose {
    let center = calibration.center();
    let [lateral, vertical] = camera.standoff;
    let standoff = match camera.standoff_frame {
        StandoffFrame::Basis => {
            calibration.axis_x() * lateral + calibration.axis_y() * vertical
        }
        StandoffFrame::World => Vec3::new(lateral, vertical, 0.0),
    };
    let look_target = center + calibration.axis_z() * camera.target_distance;

    let mut state = CameraState::new(
        center + standoff,
        vertical_fov_degrees(viewport.height as f32, calibration.focal_length),
        viewport.aspect(),
        camera.znear,
        camera.zfar,
    );
    state.up = -calibration.axis_y();
    state.look_at(look_target);

    log::debug!(
        "initial pose: position {:.4}, target {:.4}, fov {:.3} deg",
        state.position,
        look_target,
        state.fovy
    );
    InitialPose {
        camera: state,
        look_target,
    }
}
