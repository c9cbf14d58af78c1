//! Procedural animation
//!
//! Frame-stepped motion primitives for scene objects.

mod oscillator;

pub use oscillator::{Direction, Oscillator};
