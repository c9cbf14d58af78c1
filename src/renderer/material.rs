//! Material system for meshes

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Convert an sRGB `0xRRGGBB` color to linear RGB
#[must_use]
pub fn color_from_hex(hex: u32) -> Vec3 {
    let channel = |shift: u32| {
        let c = ((hex >> shift) & 0xff) as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    Vec3::new(channel(16), channel(8), channel(0))
}

/// Lighting model used by the fragment shader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Shading {
    /// Metal/roughness lighting with optional sky reflection
    #[default]
    Standard,
    /// Banded cel shading
    Toon,
}

impl Shading {
    fn as_uniform(self) -> f32 {
        match self {
            Self::Standard => 0.0,
            Self::Toon => 1.0,
        }
    }
}

/// Material properties for rendering
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct MaterialUniform {
    /// Base color (linear RGB)
    pub color: [f32; 3],
    pub metalness: f32,
    pub roughness: f32,
    /// Strength of the sky reflection
    pub env_intensity: f32,
    /// Whether to use texture (1.0) or solid color (0.0)
    pub use_texture: f32,
    /// 0.0 standard, 1.0 toon
    pub shading: f32,
    /// Texture coordinate scale
    pub uv_scale: [f32; 2],
    _padding: [f32; 2],
}

impl Default for MaterialUniform {
    fn default() -> Self {
        Material::default().to_uniform(false)
    }
}

/// Material definition
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    /// Base color, linear
    pub color: Vec3,
    /// 0.0 dielectric, 1.0 metal
    pub metalness: f32,
    /// 0.0 mirror, 1.0 fully diffuse
    pub roughness: f32,
    /// Sky reflection strength, 0.0 disables it
    pub env_intensity: f32,
    /// How many times a texture tiles across the surface
    pub texture_repeat: f32,
    pub shading: Shading,
}

impl Material {
    /// Rough, non-metallic surface
    pub fn standard(color: Vec3) -> Self {
        Self {
            color,
            metalness: 0.0,
            roughness: 1.0,
            env_intensity: 0.0,
            texture_repeat: 1.0,
            shading: Shading::Standard,
        }
    }

    /// Two-tone cel material
    pub fn toon(color: Vec3) -> Self {
        Self {
            shading: Shading::Toon,
            ..Self::standard(color)
        }
    }

    /// Polished metal mirroring the sky
    pub fn metal(color: Vec3) -> Self {
        Self {
            metalness: 1.0,
            roughness: 0.0,
            env_intensity: 1.0,
            ..Self::standard(color)
        }
    }

    #[must_use]
    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    #[must_use]
    pub fn with_env_intensity(mut self, intensity: f32) -> Self {
        self.env_intensity = intensity.max(0.0);
        self
    }

    #[must_use]
    pub fn with_texture_repeat(mut self, repeat: f32) -> Self {
        self.texture_repeat = repeat;
        self
    }

    /// Convert to uniform data
    pub fn to_uniform(&self, textured: bool) -> MaterialUniform {
        MaterialUniform {
            color: self.color.into(),
            metalness: self.metalness,
            roughness: self.roughness,
            env_intensity: self.env_intensity,
            use_texture: if textured { 1.0 } else { 0.0 },
            shading: self.shading.as_uniform(),
            uv_scale: [self.texture_repeat; 2],
            _padding: [0.0; 2],
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self::standard(Vec3::splat(0.8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<MaterialUniform>(), 48);
    }

    #[test]
    fn test_color_from_hex() {
        assert_eq!(color_from_hex(0xffffff), Vec3::ONE);
        assert_eq!(color_from_hex(0x000000), Vec3::ZERO);

        let orange = color_from_hex(0xf67104);
        assert!(orange.x > orange.y && orange.y > orange.z);
        // sRGB mid-gray is darker in linear space
        assert!((color_from_hex(0x808080).x - 0.2158).abs() < 1e-3);
    }

    #[test]
    fn test_toon_uniform() {
        let uniform = Material::toon(Vec3::X).to_uniform(false);
        assert_eq!(uniform.shading, 1.0);
        assert_eq!(uniform.use_texture, 0.0);
        assert_eq!(uniform.env_intensity, 0.0);
    }

    #[test]
    fn test_metal_builder() {
        let material = Material::metal(Vec3::ONE).with_roughness(2.0);
        assert_eq!(material.metalness, 1.0);
        assert_eq!(material.roughness, 1.0);
        assert_eq!(material.env_intensity, 1.0);
    }

    #[test]
    fn test_texture_repeat_scales_uv() {
        let uniform = Material::standard(Vec3::ONE)
            .with_texture_repeat(40.0)
            .to_uniform(true);
        assert_eq!(uniform.uv_scale, [40.0, 40.0]);
        assert_eq!(uniform.use_texture, 1.0);
    }
}
