//! Held-key movement flags
//!
//! The window layer turns key presses into edges; this module folds those
//! edges into four independent booleans that the frame loop reads once per
//! tick. Everything here is pure so it can be driven without a window.

use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// One of the four first-person movement directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MovementKey {
    /// Walk along the camera's forward axis
    Forward,
    /// Walk against the camera's forward axis
    Backward,
    /// Strafe against the camera's right axis
    Left,
    /// Strafe along the camera's right axis
    Right,
}

impl MovementKey {
    /// All movement keys, in flag order.
    pub const ALL: [Self; 4] = [Self::Forward, Self::Backward, Self::Left, Self::Right];

    /// Fixed WASD mapping for a physical key.
    #[must_use]
    pub const fn from_wasd(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::KeyW => Some(Self::Forward),
            KeyCode::KeyS => Some(Self::Backward),
            KeyCode::KeyA => Some(Self::Left),
            KeyCode::KeyD => Some(Self::Right),
            _ => None,
        }
    }
}

/// Whether a key went down or came back up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEdge {
    /// Key pressed
    Down,
    /// Key released
    Up,
}

impl From<ElementState> for KeyEdge {
    fn from(state: ElementState) -> Self {
        match state {
            ElementState::Pressed => Self::Down,
            ElementState::Released => Self::Up,
        }
    }
}

/// Which movement keys are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MovementState {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MovementState {
    /// Nothing held
    #[must_use]
    pub const fn new() -> Self {
        Self {
            forward: false,
            backward: false,
            left: false,
            right: false,
        }
    }

    /// Copy of this state with one flag set to `held`.
    #[must_use]
    pub const fn with(mut self, key: MovementKey, held: bool) -> Self {
        match key {
            MovementKey::Forward => self.forward = held,
            MovementKey::Backward => self.backward = held,
            MovementKey::Left => self.left = held,
            MovementKey::Right => self.right = held,
        }
        self
    }

    /// Copy of this state after `edge` on `key`.
    #[must_use]
    pub const fn with_edge(self, key: MovementKey, edge: KeyEdge) -> Self {
        self.with(key, matches!(edge, KeyEdge::Down))
    }

    /// Whether `key` is held.
    #[must_use]
    pub const fn is_held(&self, key: MovementKey) -> bool {
        match key {
            MovementKey::Forward => self.forward,
            MovementKey::Backward => self.backward,
            MovementKey::Left => self.left,
            MovementKey::Right => self.right,
        }
    }

    /// Whether any movement key is held.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }
}

/// Apply a key edge using the fixed WASD layout.
///
/// Keys outside the layout leave the state untouched. A release for a key
/// that was never pressed is a no-op because the flag is already false.
#[must_use]
pub fn apply_key_event(state: MovementState, key: KeyCode, edge: KeyEdge) -> MovementState {
    match MovementKey::from_wasd(key) {
        Some(movement) => state.with_edge(movement, edge),
        None => state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALPHABET: [(KeyCode, KeyEdge); 10] = [
        (KeyCode::KeyW, KeyEdge::Down),
        (KeyCode::KeyW, KeyEdge::Up),
        (KeyCode::KeyS, KeyEdge::Down),
        (KeyCode::KeyS, KeyEdge::Up),
        (KeyCode::KeyA, KeyEdge::Down),
        (KeyCode::KeyA, KeyEdge::Up),
        (KeyCode::KeyD, KeyEdge::Down),
        (KeyCode::KeyD, KeyEdge::Up),
        (KeyCode::KeyQ, KeyEdge::Down),
        (KeyCode::KeyQ, KeyEdge::Up),
    ];

    #[test]
    fn test_key_down_sets_flag() {
        let state = apply_key_event(MovementState::new(), KeyCode::KeyW, KeyEdge::Down);
        assert!(state.forward);
        assert!(!state.backward && !state.left && !state.right);
    }

    #[test]
    fn test_key_up_clears_flag() {
        let state = apply_key_event(MovementState::new(), KeyCode::KeyD, KeyEdge::Down);
        let state = apply_key_event(state, KeyCode::KeyD, KeyEdge::Up);
        assert_eq!(state, MovementState::new());
    }

    #[test]
    fn test_release_without_press_is_noop() {
        let state = apply_key_event(MovementState::new(), KeyCode::KeyS, KeyEdge::Up);
        assert!(!state.backward);
        assert_eq!(state, MovementState::new());
    }

    #[test]
    fn test_unmapped_key_ignored() {
        let held = MovementState::new().with(MovementKey::Left, true);
        assert_eq!(apply_key_event(held, KeyCode::Space, KeyEdge::Down), held);
        assert_eq!(apply_key_event(held, KeyCode::Space, KeyEdge::Up), held);
    }

    #[test]
    fn test_flags_are_independent() {
        let mut state = MovementState::new();
        state = apply_key_event(state, KeyCode::KeyW, KeyEdge::Down);
        state = apply_key_event(state, KeyCode::KeyD, KeyEdge::Down);
        state = apply_key_event(state, KeyCode::KeyW, KeyEdge::Up);
        assert!(!state.forward);
        assert!(state.right);
    }

    #[test]
    fn test_flag_tracks_most_recent_edge() {
        // Every sequence of length 4 over the alphabet, including an unmapped key.
        let n = ALPHABET.len();
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    for d in 0..n {
                        let events = [ALPHABET[a], ALPHABET[b], ALPHABET[c], ALPHABET[d]];
                        let state = events
                            .iter()
                            .fold(MovementState::new(), |s, &(key, edge)| {
                                apply_key_event(s, key, edge)
                            });

                        for key in MovementKey::ALL {
                            let last = events
                                .iter()
                                .rev()
                                .find(|(code, _)| MovementKey::from_wasd(*code) == Some(key))
                                .map(|&(_, edge)| edge);
                            assert_eq!(
                                state.is_held(key),
                                last == Some(KeyEdge::Down),
                                "{key:?} after {events:?}"
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_edge_from_element_state() {
        assert_eq!(KeyEdge::from(ElementState::Pressed), KeyEdge::Down);
        assert_eq!(KeyEdge::from(ElementState::Released), KeyEdge::Up);
    }

    #[test]
    fn test_any() {
        assert!(!MovementState::new().any());
        assert!(MovementState::new().with(MovementKey::Backward, true).any());
    }
}
