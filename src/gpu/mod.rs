//! GPU rendering of the viewport scene.
//!
//! Provides wgpu device/surface initialization, texture upload, and the
//! [`renderer::SurfaceRenderer`] render output used by the native viewer.

/// Bind-group layout entries and pipeline construction helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Textured surface and marker renderer.
pub mod renderer;
/// Uploaded surface maps and the depth target.
pub mod texture;
