//! Rendering module
//!
//! Forward 3D rendering with wgpu: a cubemap sky, a sun with a shadow map,
//! and standard or toon materials.

mod camera;
mod context;
mod lights;
mod material;
mod mesh;
mod shadow;
mod skybox;
mod texture;

pub use camera::Camera;
pub use context::{ModelUniform, RenderError, RenderFrame, Renderer};
pub use lights::{AmbientLight, DirectionalLight, LightUniform};
pub use material::{Material, MaterialUniform, Shading, color_from_hex};
pub use mesh::{Mesh, Vertex};
pub use shadow::{ShadowConfig, ShadowMap, ShadowUniform};
pub use skybox::{Skybox, SkyboxUniform};
pub use texture::{Texture, TextureError};
