//! Input handling: event types, the click/drag state machine, and the input
//! processor that converts raw window events into viewport interactions.

/// Platform-agnostic input events.
pub mod event;
/// Press, drag, and release tracking.
pub(crate) mod mouse;
/// Converts raw events into interactions.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, Interaction};
