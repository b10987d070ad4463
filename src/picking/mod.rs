//! Screen-space surface picking and the singleton point marker.
//!
//! A click is remapped from host pointer coordinates into the viewport's
//! NDC, turned into a world-space ray, and intersected with the scene. The
//! nearest hit replaces the marker.

pub mod picker;
pub mod ray;

pub use picker::{Marker, SurfacePicker};
pub use ray::{Ray, ViewportGeometry};
