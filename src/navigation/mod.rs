//! Yaw-driven slice navigation.
//!
//! When an orbit interaction ends, [`tracker::OrbitTracker`] measures how far
//! the camera has turned about its up axis since the initial pose, and
//! [`slice::SliceIndexMapper`] quantizes that yaw into an image index sent to
//! the host through a [`command::CommandChannel`].

pub mod command;
pub mod slice;
pub mod tracker;

pub use command::{CommandChannel, JsonLinesChannel, NavigationRequest};
pub use slice::SliceIndexMapper;
pub use tracker::{normalize_yaw, OrbitTracker};
