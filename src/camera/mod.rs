//! Camera system for the calibrated viewport.
//!
//! Provides the camera state and matrices, the calibration-driven initial
//! pose, and the damped orbit controller that moves the camera afterward.

/// Damped orbit controller (rotate, pan, dolly about a pivot).
pub mod controller;
/// Core camera state and GPU uniform types.
pub mod core;
/// Initial pose from a calibration record.
pub mod pose;
