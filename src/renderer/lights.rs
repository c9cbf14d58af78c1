//! Scene lighting
//!
//! One directional sun plus a uniform ambient term.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// GPU-compatible light data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LightUniform {
    /// Unit vector from surfaces toward the sun
    pub direction: [f32; 3],
    _padding1: f32,
    /// Sun color premultiplied by intensity
    pub color: [f32; 3],
    _padding2: f32,
    /// Ambient color premultiplied by intensity
    pub ambient: [f32; 3],
    _padding3: f32,
}

impl LightUniform {
    /// Pack the sun and ambient light
    #[must_use]
    pub fn new(sun: &DirectionalLight, ambient: &AmbientLight) -> Self {
        Self {
            direction: sun.to_light().into(),
            _padding1: 0.0,
            color: (sun.color * sun.intensity).into(),
            _padding2: 0.0,
            ambient: (ambient.color * ambient.intensity).into(),
            _padding3: 0.0,
        }
    }
}

impl Default for LightUniform {
    fn default() -> Self {
        Self::new(&DirectionalLight::default(), &AmbientLight::default())
    }
}

/// Directional light (like the sun). It sits at `position` and shines toward
/// `target`; only the direction matters for shading, the position places the
/// shadow camera.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub target: Vec3,
    /// Linear light color
    pub color: Vec3,
    /// Intensity
    pub intensity: f32,
    pub casts_shadow: bool,
}

impl DirectionalLight {
    /// Create a new directional light aimed at the origin
    #[must_use]
    pub fn new(position: Vec3, color: Vec3, intensity: f32) -> Self {
        Self {
            position,
            target: Vec3::ZERO,
            color,
            intensity,
            casts_shadow: true,
        }
    }

    /// Unit vector from the scene toward the light
    #[must_use]
    pub fn to_light(&self) -> Vec3 {
        (self.position - self.target).normalize_or(Vec3::Y)
    }
}

impl Default for DirectionalLight {
    fn default() -> Self {
        Self::new(Vec3::new(5.0, 5.0, 5.0), Vec3::ONE, 1.0)
    }
}

/// Light that reaches every surface equally
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    /// Linear light color
    pub color: Vec3,
    pub intensity: f32,
}

impl AmbientLight {
    #[must_use]
    pub fn new(color: Vec3, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self::new(Vec3::ONE, 0.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(std::mem::size_of::<LightUniform>(), 48);
    }

    #[test]
    fn test_direction_points_at_light() {
        let sun = DirectionalLight::new(Vec3::new(25.0, 30.0, 15.0), Vec3::ONE, 0.7);
        let uniform = LightUniform::new(&sun, &AmbientLight::new(Vec3::ONE, 1.0));

        let direction = Vec3::from(uniform.direction);
        assert!((direction.length() - 1.0).abs() < 1e-5);
        assert!(direction.y > 0.0);
        assert!(Vec3::from(uniform.color).abs_diff_eq(Vec3::splat(0.7), 1e-6));
        assert_eq!(uniform.ambient, [1.0; 3]);
    }

    #[test]
    fn test_light_at_target_falls_back_to_overhead() {
        let mut sun = DirectionalLight::default();
        sun.position = sun.target;
        assert_eq!(sun.to_light(), Vec3::Y);
    }
}
