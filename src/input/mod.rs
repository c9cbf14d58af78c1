//! Input handling module
//!
//! Raw key/mouse state, the held-key movement flags and the key table that
//! feeds them.

mod bindings;
mod movement;
mod state;

pub use bindings::KeyBindings;
pub use movement::{KeyEdge, MovementKey, MovementState, apply_key_event};
pub use state::Input;
