//! Calibration record for the reconstructed surface's reference camera.
//!
//! A record carries the camera rotation basis (three orthonormal axes, one
//! per row), the reconstruction center, and the vertical focal length in
//! pixels. Orthonormality is a caller contract and is not validated here.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Extrinsic + intrinsic calibration for the reference camera.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationRecord {
    /// Rotation basis: row 0 is the X axis, row 1 Y, row 2 Z (forward).
    pub rotation: [[f32; 3]; 3],
    /// Reconstruction center in world space.
    pub center: [f32; 3],
    /// Vertical focal length in pixels.
    pub focal_length: f32,
}

impl CalibrationRecord {
    /// Camera record shipped with the reference reconstruction.
    #[must_use]
    pub fn reference() -> Self {
        Self {
            rotation: [
                [-0.385_898_28, -0.041_285_064, 0.921_617_1],
                [-0.059_838_827, 0.998_014_6, 0.019_651_758],
                [-0.920_598_6, -0.047_564_905, -0.387_602_56],
            ],
            center: [0.755_984_1, -1.327_263_4, 1.280_063_3],
            focal_length: 833.3112,
        }
    }

    /// Load a record from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ViewportError> {
        let content = std::fs::read_to_string(path).map_err(ViewportError::Io)?;
        Self::from_json(&content)
    }

    /// Parse a record from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ViewportError> {
        serde_json::from_str(json)
            .map_err(|e| ViewportError::CalibrationParse(e.to_string()))
    }

    /// First basis axis (camera right in calibration convention).
    #[must_use]
    pub fn axis_x(&self) -> Vec3 {
        Vec3::from_array(self.rotation[0])
    }

    /// Second basis axis (camera down in calibration convention).
    #[must_use]
    pub fn axis_y(&self) -> Vec3 {
        Vec3::from_array(self.rotation[1])
    }

    /// Third basis axis (camera forward).
    #[must_use]
    pub fn axis_z(&self) -> Vec3 {
        Vec3::from_array(self.rotation[2])
    }

    /// Reconstruction center.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        Vec3::from_array(self.center)
    }
}

impl Default for CalibrationRecord {
    fn default() -> Self {
        Self::reference()
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn parses_json_record() {
        let json = r#"{
            "rotation": [[1, 0, 0], [0, 1, 0], [0, 0, 1]],
            "center": [0.5, -1.0, 2.0],
            "focal_length": 800.0
        }"#;
        let record = CalibrationRecord::from_json(json).unwrap();
        assert_eq!(record.axis_z(), Vec3::Z);
        assert_eq!(record.center(), Vec3::new(0.5, -1.0, 2.0));
        assert_eq!(record.focal_length, 800.0);
    }

    #[test]
    fn missing_field_is_a_parse_error() {
        let err = CalibrationRecord::from_json(r#"{"center": [0, 0, 0]}"#)
            .unwrap_err();
        assert!(matches!(err, ViewportError::CalibrationParse(_)));
    }

    #[test]
    fn reference_basis_is_orthonormal() {
        let record = CalibrationRecord::reference();
        let (x, y, z) = (record.axis_x(), record.axis_y(), record.axis_z());
        for axis in [x, y, z] {
            assert_relative_eq!(axis.length(), 1.0, epsilon = 1e-4);
        }
        assert_relative_eq!(x.dot(y), 0.0, epsilon = 1e-4);
        assert_relative_eq!(y.dot(z), 0.0, epsilon = 1e-4);
    }
}
