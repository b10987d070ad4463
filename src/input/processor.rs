//! Converts raw platform events into viewport interactions.
//!
//! The `InputProcessor` owns all transient input state (cursor tracking,
//! drag detection, modifier keys) and knows where the viewport sits, so
//! presses and wheel steps outside it are ignored. Interaction boundaries
//! follow orbit-control conventions: `OrbitStart` on press, `OrbitEnd` on
//! release, and a start/zoom/end triple for every wheel step.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use super::mouse::{Gesture, PointerState, Release};
use crate::picking::ray::ViewportGeometry;

/// A camera or picking action derived from raw input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Interaction {
    /// An orbit interaction began (button pressed in the viewport).
    OrbitStart,
    /// Rotate about the pivot by a pointer delta in pixels.
    Rotate {
        /// Pointer movement since the previous event.
        delta: Vec2,
    },
    /// Pan the pivot by a pointer delta in pixels.
    Pan {
        /// Pointer movement since the previous event.
        delta: Vec2,
    },
    /// Dolly by wheel notches; positive moves toward the pivot.
    Zoom {
        /// Number of notches.
        steps: f32,
    },
    /// The orbit interaction ended.
    OrbitEnd,
    /// Primary-button click that did not turn into a drag.
    Click {
        /// Absolute pointer position.
        position: Vec2,
    },
}

/// Converts raw window events into [`Interaction`]s.
///
/// # Usage
///
/// ```ignore
/// for interaction in input_processor.handle_event(event) {
///     viewport.apply(interaction);
/// }
/// ```
pub struct InputProcessor {
    /// Cursor tracking and click/drag state machine.
    state: PointerState,
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
    /// Where the viewport sits in pointer space.
    viewport: ViewportGeometry,
}

impl InputProcessor {
    /// Processor for a viewport at `viewport`; presses travelling more
    /// than `drag_threshold` pixels are drags, not clicks.
    #[must_use]
    pub fn new(viewport: ViewportGeometry, drag_threshold: f32) -> Self {
        Self {
            state: PointerState::new(drag_threshold),
            shift_pressed: false,
            viewport,
        }
    }

    /// Track a viewport move or resize.
    pub fn set_viewport(&mut self, viewport: ViewportGeometry) {
        self.viewport = viewport;
    }

    /// Process a raw input event and return the resulting interactions, in
    /// order.
    pub fn handle_event(&mut self, event: InputEvent) -> Vec<Interaction> {
        match event {
            InputEvent::CursorMoved { x, y } => {
                self.handle_cursor_moved(Vec2::new(x, y)).into_iter().collect()
            }
            InputEvent::MouseButton { button, pressed } => {
                if pressed {
                    self.handle_press(button).into_iter().collect()
                } else {
                    self.handle_release(button)
                }
            }
            InputEvent::Scroll { delta } => self.handle_scroll(delta),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                Vec::new()
            }
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<Interaction> {
        let (delta, gesture) = self.state.handle_mouse_position(position)?;
        if delta == Vec2::ZERO {
            return None;
        }
        Some(match gesture {
            Gesture::Rotate => Interaction::Rotate { delta },
            Gesture::Pan => Interaction::Pan { delta },
            // Dragging down moves away.
            Gesture::Dolly => Interaction::Zoom {
                steps: -delta.y.signum(),
            },
        })
    }

    fn handle_press(&mut self, button: MouseButton) -> Option<Interaction> {
        if !self.viewport.contains(self.state.position) {
            return None;
        }
        let gesture = match button {
            MouseButton::Left if self.shift_pressed => Gesture::Pan,
            MouseButton::Left => Gesture::Rotate,
            MouseButton::Right => Gesture::Pan,
            MouseButton::Middle => Gesture::Dolly,
        };
        self.state
            .handle_mouse_down(button, gesture)
            .then_some(Interaction::OrbitStart)
    }

    fn handle_release(&mut self, button: MouseButton) -> Vec<Interaction> {
        match self.state.handle_mouse_up(button) {
            None => Vec::new(),
            Some(Release::Drag) => vec![Interaction::OrbitEnd],
            Some(Release::Click {
                button: MouseButton::Left,
                position,
            }) => vec![Interaction::OrbitEnd, Interaction::Click { position }],
            Some(Release::Click { .. }) => vec![Interaction::OrbitEnd],
        }
    }

    fn handle_scroll(&mut self, delta: f32) -> Vec<Interaction> {
        if delta == 0.0 || !self.viewport.contains(self.state.position) {
            return Vec::new();
        }
        vec![
            Interaction::OrbitStart,
            Interaction::Zoom {
                steps: delta.signum(),
            },
            Interaction::OrbitEnd,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> InputProcessor {
        InputProcessor::new(ViewportGeometry::new(Vec2::new(100.0, 50.0), 200, 400), 3.0)
    }

    fn move_to(input: &mut InputProcessor, x: f32, y: f32) -> Vec<Interaction> {
        input.handle_event(InputEvent::CursorMoved { x, y })
    }

    fn button(input: &mut InputProcessor, button: MouseButton, pressed: bool) -> Vec<Interaction> {
        input.handle_event(InputEvent::MouseButton { button, pressed })
    }

    #[test]
    fn click_in_viewport_ends_orbit_then_clicks() {
        let mut input = processor();
        let _ = move_to(&mut input, 150.0, 100.0);
        assert_eq!(button(&mut input, MouseButton::Left, true), vec![Interaction::OrbitStart]);
        assert_eq!(
            button(&mut input, MouseButton::Left, false),
            vec![
                Interaction::OrbitEnd,
                Interaction::Click {
                    position: Vec2::new(150.0, 100.0)
                }
            ]
        );
    }

    #[test]
    fn drag_rotates_and_suppresses_click() {
        let mut input = processor();
        let _ = move_to(&mut input, 150.0, 100.0);
        let _ = button(&mut input, MouseButton::Left, true);
        assert_eq!(
            move_to(&mut input, 160.0, 104.0),
            vec![Interaction::Rotate {
                delta: Vec2::new(10.0, 4.0)
            }]
        );
        assert_eq!(button(&mut input, MouseButton::Left, false), vec![Interaction::OrbitEnd]);
    }

    #[test]
    fn shift_or_right_button_pans() {
        let mut input = processor();
        let _ = move_to(&mut input, 150.0, 100.0);
        let _ = button(&mut input, MouseButton::Right, true);
        assert!(matches!(
            move_to(&mut input, 151.0, 100.0).as_slice(),
            [Interaction::Pan { .. }]
        ));
        // Right-button release never picks.
        assert_eq!(button(&mut input, MouseButton::Right, false), vec![Interaction::OrbitEnd]);

        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = button(&mut input, MouseButton::Left, true);
        assert!(matches!(
            move_to(&mut input, 155.0, 100.0).as_slice(),
            [Interaction::Pan { .. }]
        ));
    }

    #[test]
    fn presses_outside_viewport_are_ignored() {
        let mut input = processor();
        let _ = move_to(&mut input, 10.0, 10.0);
        assert!(button(&mut input, MouseButton::Left, true).is_empty());
        assert!(move_to(&mut input, 20.0, 10.0).is_empty());
        assert!(button(&mut input, MouseButton::Left, false).is_empty());
        assert!(input.handle_event(InputEvent::Scroll { delta: 1.0 }).is_empty());
    }

    #[test]
    fn wheel_step_is_a_complete_interaction() {
        let mut input = processor();
        let _ = move_to(&mut input, 150.0, 100.0);
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: -3.0 }),
            vec![
                Interaction::OrbitStart,
                Interaction::Zoom { steps: -1.0 },
                Interaction::OrbitEnd
            ]
        );
    }

    #[test]
    fn middle_drag_dollies() {
        let mut input = processor();
        let _ = move_to(&mut input, 150.0, 100.0);
        let _ = button(&mut input, MouseButton::Middle, true);
        assert_eq!(
            move_to(&mut input, 150.0, 90.0),
            vec![Interaction::Zoom { steps: 1.0 }]
        );
    }
}
