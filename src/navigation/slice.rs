//! Yaw quantization into image-stack slice indices.

use super::command::{CommandChannel, NavigationRequest};
use crate::options::NavigationOptions;

/// Quantizes yaw into a slice index and asks the host to show that slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SliceIndexMapper {
    step_degrees: f32,
    command: String,
}

impl SliceIndexMapper {
    /// Mapper with a step size in degrees and the host command to invoke.
    /// Non-positive or non-finite steps fall back to 7.5.
    #[must_use]
    pub fn new(step_degrees: f32, command: impl Into<String>) -> Self {
        let step_degrees = if step_degrees.is_finite() && step_degrees > 0.0 {
            step_degrees
        } else {
            log::warn!("invalid slice step {step_degrees}, using 7.5");
            NavigationOptions::default().step_degrees
        };
        Self {
            step_degrees,
            command: command.into(),
        }
    }

    /// Step size in degrees.
    #[must_use]
    pub fn step_degrees(&self) -> f32 {
        self.step_degrees
    }

    /// Number of distinct indices: `ceil(360 / step)`.
    #[must_use]
    pub fn slice_count(&self) -> u32 {
        (360.0 / self.step_degrees).ceil() as u32
    }

    /// `floor(yaw / step)` for a yaw in `[0, 360)`.
    ///
    /// Out-of-range input is wrapped first so the result is always below
    /// [`Self::slice_count`].
    #[must_use]
    pub fn index_for(&self, yaw_degrees: f32) -> u32 {
        let yaw = yaw_degrees.rem_euclid(360.0);
        let index = (yaw / self.step_degrees).floor() as u32;
        index.min(self.slice_count().saturating_sub(1))
    }

    /// Compute the index for `yaw_degrees` and send one navigation request.
    ///
    /// The request is fire-and-forget: a channel error is logged and
    /// otherwise ignored. Returns the index that was requested.
    pub fn navigate(&self, yaw_degrees: f32, channel: &mut impl CommandChannel) -> u32 {
        let image_index = self.index_for(yaw_degrees);
        let request = NavigationRequest { image_index };
        log::debug!(
            "yaw {yaw_degrees:.2} deg -> {} {{ imageIndex: {image_index} }}",
            self.command
        );
        match serde_json::to_value(request) {
            Ok(payload) => {
                if let Err(e) = channel.run_command(&self.command, &payload) {
                    log::warn!("{} rejected: {e}", self.command);
                }
            }
            Err(e) => log::warn!("failed to encode navigation request: {e}"),
        }
        image_index
    }
}

impl From<&NavigationOptions> for SliceIndexMapper {
    fn from(options: &NavigationOptions) -> Self {
        Self::new(options.step_degrees, options.command.clone())
    }
}
