use glam::Vec2;

use super::event::MouseButton;

/// What a held button does to the camera.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gesture {
    Rotate,
    Pan,
    Dolly,
}

/// A button held down inside the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Press {
    button: MouseButton,
    gesture: Gesture,
    travel: f32,
}

/// Result of releasing the held button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Release {
    /// Released without travelling past the drag threshold.
    Click {
        button: MouseButton,
        position: Vec2,
    },
    /// Released after a drag.
    Drag,
}

/// Tracks cursor position and the press/drag/release cycle of one button.
pub(crate) struct PointerState {
    pub(crate) position: Vec2,
    press: Option<Press>,
    drag_threshold: f32,
}

impl PointerState {
    /// A press becomes a drag once the pointer travels `drag_threshold`
    /// pixels.
    pub(crate) fn new(drag_threshold: f32) -> Self {
        Self {
            position: Vec2::ZERO,
            press: None,
            drag_threshold: drag_threshold.max(0.0),
        }
    }

    /// Start a press. Ignored while another button is already held.
    pub(crate) fn handle_mouse_down(&mut self, button: MouseButton, gesture: Gesture) -> bool {
        if self.press.is_some() {
            return false;
        }
        self.press = Some(Press {
            button,
            gesture,
            travel: 0.0,
        });
        true
    }

    /// Move the cursor. Returns the delta and the active gesture while a
    /// button is held.
    pub(crate) fn handle_mouse_position(&mut self, position: Vec2) -> Option<(Vec2, Gesture)> {
        let delta = position - self.position;
        self.position = position;
        let press = self.press.as_mut()?;
        press.travel += delta.length();
        Some((delta, press.gesture))
    }

    /// Release `button`. Returns `None` if it was not the held button.
    pub(crate) fn handle_mouse_up(&mut self, button: MouseButton) -> Option<Release> {
        match self.press {
            Some(press) if press.button == button => {
                self.press = None;
                Some(if press.travel > self.drag_threshold {
                    Release::Drag
                } else {
                    Release::Click {
                        button,
                        position: self.position,
                    }
                })
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_travel_is_a_click() {
        let mut state = PointerState::new(3.0);
        let _ = state.handle_mouse_position(Vec2::new(10.0, 10.0));
        assert!(state.handle_mouse_down(MouseButton::Left, Gesture::Rotate));
        let _ = state.handle_mouse_position(Vec2::new(11.0, 11.0));
        assert_eq!(
            state.handle_mouse_up(MouseButton::Left),
            Some(Release::Click {
                button: MouseButton::Left,
                position: Vec2::new(11.0, 11.0)
            })
        );
        assert!(state.press.is_none());
    }

    #[test]
    fn long_travel_is_a_drag() {
        let mut state = PointerState::new(3.0);
        assert!(state.handle_mouse_down(MouseButton::Left, Gesture::Rotate));
        let (delta, gesture) = state.handle_mouse_position(Vec2::new(5.0, 0.0)).unwrap();
        assert_eq!(delta, Vec2::new(5.0, 0.0));
        assert_eq!(gesture, Gesture::Rotate);
        assert_eq!(state.handle_mouse_up(MouseButton::Left), Some(Release::Drag));
    }

    #[test]
    fn second_button_is_ignored_until_release() {
        let mut state = PointerState::new(3.0);
        assert!(state.handle_mouse_down(MouseButton::Right, Gesture::Pan));
        assert!(!state.handle_mouse_down(MouseButton::Left, Gesture::Rotate));
        assert_eq!(state.handle_mouse_up(MouseButton::Left), None);
        assert!(state.handle_mouse_up(MouseButton::Right).is_some());
    }

    #[test]
    fn hover_without_press_reports_nothing() {
        let mut state = PointerState::new(3.0);
        assert!(state.handle_mouse_position(Vec2::new(4.0, 4.0)).is_none());
        assert_eq!(state.position, Vec2::new(4.0, 4.0));
    }
}
