//! Core engine module
//!
//! Contains the main Engine struct, the frame loop state and scene configuration

mod debug;
mod engine;
mod frame;
mod scene;
mod time;

pub use debug::{DebugInfo, FrameStats};
pub use engine::{Engine, EngineConfig, EngineContext, Game};
pub use frame::{FrameSettings, FrameState, MAX_TICKS_PER_STEP, movement_offset};
pub use scene::{
    AmbientConfig, AnimationConfig, CameraConfig, ControlsConfig, MaterialConfig, MusicConfig,
    ObjectConfig, SceneConfig, SceneError, SceneFormat, Shape, SkyConfig, SunConfig,
};
pub use time::Time;
