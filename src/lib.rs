//! A small 3D showroom built in Rust
//!
//! This crate provides:
//! - Forward rendering with wgpu: cubemap sky, sun shadows, standard and toon materials
//! - A fixed-tick frame loop driving a bobbing, spinning object
//! - First-person WASD and mouse-look controls with winit
//! - Looping background music with rodio
//! - Scene descriptions in RON or JSON

pub mod animation;
pub mod audio;
pub mod core;
pub mod input;
pub mod renderer;
pub mod stage;

// Re-exports for convenience
pub use glam;
pub use wgpu;
pub use winit;

/// Prelude module for common imports
pub mod prelude {
    pub use crate::animation::{Direction, Oscillator};
    pub use crate::audio::{AudioManager, Playback};
    pub use crate::core::{
        DebugInfo, Engine, EngineConfig, EngineContext, FrameState, Game, SceneConfig,
    };
    pub use crate::input::{Input, KeyBindings, KeyEdge, MovementState};
    pub use crate::renderer::{Camera, Material, Mesh, RenderFrame, Renderer, Vertex};
    pub use crate::stage::Stage;
    pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};
    pub use winit::keyboard::KeyCode;
}
