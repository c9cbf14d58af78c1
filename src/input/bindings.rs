//! Rebindable key table for movement
//!
//! Maps physical keys to [`MovementKey`]s so the window layer never hard-codes
//! a layout. Several keys may drive the same movement.
//!
//! # Example
//!
//! ```ignore
//! let mut bindings = KeyBindings::wasd();
//! bindings.bind(KeyCode::ArrowUp, MovementKey::Forward);
//!
//! state = bindings.apply_key_event(state, KeyCode::ArrowUp, KeyEdge::Down);
//! assert!(state.forward);
//! ```

use rustc_hash::FxHashMap;
use winit::keyboard::KeyCode;

use super::movement::{KeyEdge, MovementKey, MovementState};

/// Maps physical keys to movement directions.
#[derive(Debug, Clone)]
pub struct KeyBindings {
    /// Key to movement bindings
    key_bindings: FxHashMap<KeyCode, MovementKey>,
    /// Reverse lookup, for listing the keys of a movement
    movement_keys: FxHashMap<MovementKey, Vec<KeyCode>>,
}

impl KeyBindings {
    /// Create an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            key_bindings: FxHashMap::default(),
            movement_keys: FxHashMap::default(),
        }
    }

    /// Create a table with the W/A/S/D layout.
    #[must_use]
    pub fn wasd() -> Self {
        let mut bindings = Self::new();
        bindings.bind(KeyCode::KeyW, MovementKey::Forward);
        bindings.bind(KeyCode::KeyS, MovementKey::Backward);
        bindings.bind(KeyCode::KeyA, MovementKey::Left);
        bindings.bind(KeyCode::KeyD, MovementKey::Right);
        bindings
    }

    /// Bind a key to a movement.
    ///
    /// If the key was previously bound, the old binding is replaced.
    pub fn bind(&mut self, key: KeyCode, movement: MovementKey) {
        if let Some(old) = self.key_bindings.get(&key)
            && let Some(keys) = self.movement_keys.get_mut(old)
        {
            keys.retain(|k| *k != key);
        }

        self.key_bindings.insert(key, movement);
        self.movement_keys.entry(movement).or_default().push(key);
    }

    /// Unbind a key.
    pub fn unbind(&mut self, key: KeyCode) {
        if let Some(movement) = self.key_bindings.remove(&key)
            && let Some(keys) = self.movement_keys.get_mut(&movement)
        {
            keys.retain(|k| *k != key);
        }
    }

    /// Get the movement for a key.
    #[must_use]
    pub fn get(&self, key: KeyCode) -> Option<MovementKey> {
        self.key_bindings.get(&key).copied()
    }

    /// Get all keys bound to a movement.
    #[must_use]
    pub fn keys_for(&self, movement: MovementKey) -> &[KeyCode] {
        self.movement_keys
            .get(&movement)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get total number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.key_bindings.len()
    }

    /// Whether no key is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.key_bindings.is_empty()
    }

    /// Apply a key edge through this table.
    ///
    /// Unbound keys leave the state untouched.
    #[must_use]
    pub fn apply_key_event(&self, state: MovementState, key: KeyCode, edge: KeyEdge) -> MovementState {
        match self.get(key) {
            Some(movement) => state.with_edge(movement, edge),
            None => state,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::wasd()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::movement::apply_key_event;

    #[test]
    fn test_wasd_defaults() {
        let bindings = KeyBindings::wasd();

        assert_eq!(bindings.get(KeyCode::KeyW), Some(MovementKey::Forward));
        assert_eq!(bindings.get(KeyCode::KeyS), Some(MovementKey::Backward));
        assert_eq!(bindings.get(KeyCode::KeyA), Some(MovementKey::Left));
        assert_eq!(bindings.get(KeyCode::KeyD), Some(MovementKey::Right));
        assert_eq!(bindings.len(), 4);
    }

    #[test]
    fn test_wasd_matches_fixed_layout() {
        let bindings = KeyBindings::wasd();
        let keys = [KeyCode::KeyW, KeyCode::KeyA, KeyCode::KeyS, KeyCode::KeyD, KeyCode::KeyE];

        for key in keys {
            for edge in [KeyEdge::Down, KeyEdge::Up] {
                let held = MovementState::new().with(MovementKey::Left, true);
                assert_eq!(
                    bindings.apply_key_event(held, key, edge),
                    apply_key_event(held, key, edge)
                );
            }
        }
    }

    #[test]
    fn test_rebind_moves_key() {
        let mut bindings = KeyBindings::wasd();

        bindings.bind(KeyCode::KeyW, MovementKey::Backward);
        assert_eq!(bindings.get(KeyCode::KeyW), Some(MovementKey::Backward));
        assert!(!bindings.keys_for(MovementKey::Forward).contains(&KeyCode::KeyW));
        assert!(bindings.keys_for(MovementKey::Backward).contains(&KeyCode::KeyW));
    }

    #[test]
    fn test_alternate_keys_share_movement() {
        let mut bindings = KeyBindings::wasd();
        bindings.bind(KeyCode::ArrowUp, MovementKey::Forward);

        let keys = bindings.keys_for(MovementKey::Forward);
        assert!(keys.contains(&KeyCode::KeyW));
        assert!(keys.contains(&KeyCode::ArrowUp));

        let state = bindings.apply_key_event(MovementState::new(), KeyCode::ArrowUp, KeyEdge::Down);
        assert!(state.forward);
    }

    #[test]
    fn test_unbind() {
        let mut bindings = KeyBindings::wasd();

        bindings.unbind(KeyCode::KeyA);
        assert!(bindings.get(KeyCode::KeyA).is_none());
        assert!(bindings.keys_for(MovementKey::Left).is_empty());

        let state = bindings.apply_key_event(MovementState::new(), KeyCode::KeyA, KeyEdge::Down);
        assert!(!state.left);
    }

    #[test]
    fn test_empty_table() {
        let bindings = KeyBindings::new();
        assert!(bindings.is_empty());
        assert_eq!(bindings.keys_for(MovementKey::Right), &[] as &[KeyCode]);
    }
}
