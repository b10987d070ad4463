/// Platform-agnostic input events.
///
/// Positions are absolute, in the host's pointer coordinate space (the same
/// space the viewport origin is configured in). These are fed into an
/// [`InputProcessor`](super::InputProcessor) which converts them into
/// [`Interaction`](super::Interaction) values.
///
/// # Example
///
/// ```ignore
/// for interaction in input.handle_event(InputEvent::CursorMoved { x: 1700.0, y: 400.0 }) {
///     viewport.apply(interaction);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to absolute screen position.
    CursorMoved {
        /// Horizontal position in pixels.
        x: f32,
        /// Vertical position in pixels.
        y: f32,
    },
    /// Mouse button pressed or released.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount (positive = zoom in, negative = zoom out).
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

/// Back, forward, and other extra buttons have no viewport meaning and are
/// rejected, handing the original button back.
#[cfg(feature = "viewer")]
impl TryFrom<winit::event::MouseButton> for MouseButton {
    type Error = winit::event::MouseButton;

    fn try_from(button: winit::event::MouseButton) -> Result<Self, Self::Error> {
        match button {
            winit::event::MouseButton::Left => Ok(Self::Left),
            winit::event::MouseButton::Right => Ok(Self::Right),
            winit::event::MouseButton::Middle => Ok(Self::Middle),
            other => Err(other),
        }
    }
}
