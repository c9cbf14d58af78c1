//! Raw input state

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

/// Input state manager
#[derive(Debug)]
pub struct Input {
    /// Currently pressed keys
    pressed_keys: HashSet<KeyCode>,
    /// Keys that were just pressed this frame
    just_pressed_keys: HashSet<KeyCode>,
    /// Currently pressed mouse buttons
    pressed_mouse_buttons: HashSet<MouseButton>,
    /// Raw pointer motion accumulated this frame
    mouse_delta: Vec2,
    /// Whether the cursor is grabbed for mouse look
    cursor_grabbed: bool,
}

impl Input {
    /// Create a new input manager
    pub fn new() -> Self {
        Self {
            pressed_keys: HashSet::new(),
            just_pressed_keys: HashSet::new(),
            pressed_mouse_buttons: HashSet::new(),
            mouse_delta: Vec2::ZERO,
            cursor_grabbed: false,
        }
    }

    /// Call at the end of each frame to clear per-frame state
    pub fn update(&mut self) {
        self.just_pressed_keys.clear();
        self.mouse_delta = Vec2::ZERO;
    }

    /// Process a keyboard event
    pub fn process_keyboard(&mut self, key_code: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if !self.pressed_keys.contains(&key_code) {
                    self.just_pressed_keys.insert(key_code);
                }
                self.pressed_keys.insert(key_code);
            }
            ElementState::Released => {
                self.pressed_keys.remove(&key_code);
            }
        }
    }

    /// Process a mouse button event
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                self.pressed_mouse_buttons.insert(button);
            }
            ElementState::Released => {
                self.pressed_mouse_buttons.remove(&button);
            }
        }
    }

    /// Process raw mouse delta (for first-person camera)
    ///
    /// Motion is only collected while the cursor is grabbed.
    pub fn process_mouse_delta(&mut self, delta: Vec2) {
        if self.cursor_grabbed {
            self.mouse_delta += delta;
        }
    }

    /// Record whether the cursor is grabbed
    pub fn set_cursor_grabbed(&mut self, grabbed: bool) {
        self.cursor_grabbed = grabbed;
        if !grabbed {
            self.mouse_delta = Vec2::ZERO;
        }
    }

    /// Whether the cursor is grabbed
    pub fn is_cursor_grabbed(&self) -> bool {
        self.cursor_grabbed
    }

    /// Check if a key is currently pressed
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    /// Check if a key was just pressed this frame
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.just_pressed_keys.contains(&key)
    }

    /// Check if a mouse button is currently pressed
    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_mouse_buttons.contains(&button)
    }

    /// Get pointer motion accumulated this frame
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_just_pressed_cleared_on_update() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::Escape, ElementState::Pressed);
        assert!(input.is_key_just_pressed(KeyCode::Escape));
        assert!(input.is_key_pressed(KeyCode::Escape));

        input.update();
        assert!(!input.is_key_just_pressed(KeyCode::Escape));
        assert!(input.is_key_pressed(KeyCode::Escape));
    }

    #[test]
    fn test_repeat_press_not_just_pressed() {
        let mut input = Input::new();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        input.update();
        input.process_keyboard(KeyCode::KeyW, ElementState::Pressed);
        assert!(!input.is_key_just_pressed(KeyCode::KeyW));
    }

    #[test]
    fn test_mouse_delta_requires_grab() {
        let mut input = Input::new();
        input.process_mouse_delta(Vec2::new(4.0, 2.0));
        assert_eq!(input.mouse_delta(), Vec2::ZERO);

        input.set_cursor_grabbed(true);
        input.process_mouse_delta(Vec2::new(4.0, 2.0));
        input.process_mouse_delta(Vec2::new(1.0, -1.0));
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, 1.0));

        input.update();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_release_grab_drops_pending_motion() {
        let mut input = Input::new();
        input.set_cursor_grabbed(true);
        input.process_mouse_delta(Vec2::new(3.0, 3.0));
        input.set_cursor_grabbed(false);
        assert!(!input.is_cursor_grabbed());
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_mouse_buttons() {
        let mut input = Input::new();
        input.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(input.is_mouse_button_pressed(MouseButton::Left));
        input.process_mouse_button(MouseButton::Left, ElementState::Released);
        assert!(!input.is_mouse_button_pressed(MouseButton::Left));
    }
}
