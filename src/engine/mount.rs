//! Seams between the viewport controller and whatever displays it.
//!
//! A [`MountPoint`] is the host container (a window, a test double). On mount
//! the viewport asks it for a [`RenderOutput`]; on teardown it hands the
//! output back so the mount point can detach it.

use crate::camera::core::CameraState;
use crate::error::ViewportError;
use crate::scene::{ResourceId, Scene};

/// Everything a render output needs to draw one frame.
pub struct Frame<'a> {
    /// Scene to draw.
    pub scene: &'a Scene,
    /// Camera to draw it from.
    pub camera: &'a CameraState,
    /// Ambient floor for lit materials.
    pub ambient: f32,
}

/// A drawable surface attached to a mount point.
pub trait RenderOutput {
    /// Draw one frame.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::Surface`] if the frame could not be
    /// presented. The render loop logs the error and keeps running.
    fn render(&mut self, frame: &Frame<'_>) -> Result<(), ViewportError>;

    /// Free GPU copies of resources the scene no longer references.
    fn release(&mut self, resources: &[ResourceId]);

    /// Track a change of the drawable size in pixels.
    fn resize(&mut self, width: u32, height: u32);
}

/// Host container the render output attaches to.
pub trait MountPoint {
    /// Output produced by attaching.
    type Output: RenderOutput;

    /// Attach a new output of `width`×`height` pixels.
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError`] if the output (for example its GPU context)
    /// cannot be created.
    fn attach(&mut self, width: u32, height: u32) -> Result<Self::Output, ViewportError>;

    /// Detach and drop `output`. Returns `false` if the mount point had
    /// already been torn down, in which case nothing happens.
    fn detach(&mut self, output: Self::Output) -> bool;
}
