// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Calibrated 3D surface viewport built on wgpu.
//!
//! A surface mesh (PLY) and its texture are placed in a scene whose camera
//! pose comes from a calibration record, so the rendered view lines up with
//! a reference photograph. Orbiting the camera is translated into discrete
//! image-stack navigation requests sent to the host, and clicking the
//! surface drops a marker at the hit point.
//!
//! # Key entry points
//!
//! - [`Viewport`] - lifecycle, input, navigation, and picking in one place
//! - [`CalibrationRecord`] - camera pose and intrinsics of the reference view
//! - [`Options`] - runtime configuration (viewport, camera, orbit, lighting)
//! - [`navigation::CommandChannel`] - where navigation requests are sent
//! - `Viewer` - standalone winit window (feature `viewer`)
//!
//! # Architecture
//!
//! Assets are fetched and decoded on a worker thread and polled each frame.
//! Rendering sits behind the [`engine::MountPoint`] /
//! [`engine::RenderOutput`] seam, so everything above the GPU runs (and is
//! tested) without a window.

pub mod assets;
pub mod calibration;
pub mod camera;
pub mod engine;
pub mod error;
pub mod gpu;
pub mod input;
pub mod navigation;
pub mod options;
pub mod picking;
pub mod scene;
#[cfg(feature = "viewer")]
pub mod viewer;

#[cfg(test)]
pub(crate) mod testing;

pub use calibration::CalibrationRecord;
pub use engine::Viewport;
pub use error::ViewportError;
pub use input::{InputEvent, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
