//! Shadow mapping system
//!
//! Implements shadow mapping for the directional sun with a depth-only pass
//! and a percentage-closer filtered lookup in the scene shader.

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use wgpu::util::DeviceExt;

/// Depth format of the shadow map
pub const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Shadow map configuration: an orthographic box around the light's view axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShadowConfig {
    /// Shadow map resolution (width and height)
    pub resolution: u32,
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    /// Near plane for shadow camera
    pub near: f32,
    /// Far plane for shadow camera
    pub far: f32,
    /// Depth offset added before comparison; negative pulls receivers toward
    /// the light to prevent shadow acne
    pub bias: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            resolution: 1024,
            left: -50.0,
            right: 50.0,
            top: 50.0,
            bottom: -50.0,
            near: 0.5,
            far: 100.0,
            bias: -0.005,
        }
    }
}

impl ShadowConfig {
    /// View-projection from a light at `light_position` aimed at `target`
    #[must_use]
    pub fn light_space_matrix(&self, light_position: Vec3, target: Vec3) -> Mat4 {
        let projection = Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        );

        // Straight-down light would make Y a degenerate up vector
        let axis = (target - light_position).normalize_or(Vec3::NEG_Y);
        let up = if axis.cross(Vec3::Y).length_squared() < 1e-6 {
            Vec3::Z
        } else {
            Vec3::Y
        };
        let view = Mat4::look_at_rh(light_position, target, up);

        projection * view
    }
}

/// Shadow uniform data for shader
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowUniform {
    /// Light space matrix
    pub light_space_matrix: [[f32; 4]; 4],
    /// Shadow bias
    pub bias: f32,
    /// Size of one shadow map texel in UV units
    pub texel_size: f32,
    /// 1.0 when shadows are sampled, 0.0 to treat everything as lit
    pub enabled: f32,
    _padding: f32,
}

impl ShadowUniform {
    fn new(matrix: Mat4, config: &ShadowConfig, enabled: bool) -> Self {
        Self {
            light_space_matrix: matrix.to_cols_array_2d(),
            bias: config.bias,
            texel_size: 1.0 / config.resolution.max(1) as f32,
            enabled: if enabled { 1.0 } else { 0.0 },
            _padding: 0.0,
        }
    }
}

/// Shadow map for a single light
pub struct ShadowMap {
    /// Depth texture for shadow map
    pub texture: wgpu::Texture,
    /// Texture view for rendering
    pub depth_view: wgpu::TextureView,
    /// Sampler for shadow sampling
    pub sampler: wgpu::Sampler,
    /// Light space matrix (view-projection from light's perspective)
    pub light_space_matrix: Mat4,
    /// Configuration
    pub config: ShadowConfig,
    /// Uniform buffer for shadow data
    pub uniform_buffer: wgpu::Buffer,
    /// Bind group used by the depth-only pass
    pass_bind_group: wgpu::BindGroup,
}

impl ShadowMap {
    /// Create a new shadow map
    #[must_use]
    pub fn new(device: &wgpu::Device, pass_layout: &wgpu::BindGroupLayout, config: ShadowConfig) -> Self {
        let resolution = config.resolution.max(1);
        let size = wgpu::Extent3d {
            width: resolution,
            height: resolution,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });

        let depth_view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Nearest,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });

        let uniform = ShadowUniform::new(Mat4::IDENTITY, &config, false);
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("shadow_uniform_buffer"),
            contents: bytemuck::bytes_of(&uniform),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let pass_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_pass_bind_group"),
            layout: pass_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Self {
            texture,
            depth_view,
            sampler,
            light_space_matrix: Mat4::IDENTITY,
            config,
            uniform_buffer,
            pass_bind_group,
        }
    }

    /// Aim the shadow camera from `light_position` at `target`
    pub fn update(&mut self, queue: &wgpu::Queue, light_position: Vec3, target: Vec3, enabled: bool) {
        self.light_space_matrix = self.config.light_space_matrix(light_position, target);
        let uniform = ShadowUniform::new(self.light_space_matrix, &self.config, enabled);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Layout of the depth-only pass's own bind group
    pub fn pass_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_pass_bind_group_layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }

    /// Bind group for the depth-only pass
    pub fn pass_bind_group(&self) -> &wgpu::BindGroup {
        &self.pass_bind_group
    }

    /// Get the resolution
    #[must_use]
    pub const fn resolution(&self) -> u32 {
        self.config.resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    fn to_ndc(matrix: Mat4, point: Vec3) -> Vec3 {
        let clip = matrix * point.extend(1.0);
        clip.xyz() / clip.w
    }

    #[test]
    fn test_uniform_size() {
        assert_eq!(std::mem::size_of::<ShadowUniform>(), 80);
    }

    #[test]
    fn test_scene_inside_shadow_frustum() {
        let config = ShadowConfig::default();
        let matrix = config.light_space_matrix(Vec3::new(25.0, 30.0, 15.0), Vec3::ZERO);

        for point in [
            Vec3::ZERO,
            Vec3::new(-10.0, 22.0, -20.0),
            Vec3::new(-20.0, 5.0, -7.0),
            Vec3::new(0.0, 13.0, 0.0),
        ] {
            let ndc = to_ndc(matrix, point);
            assert!(ndc.x.abs() <= 1.0 && ndc.y.abs() <= 1.0, "{point} -> {ndc}");
            assert!((0.0..=1.0).contains(&ndc.z), "{point} -> {ndc}");
        }
    }

    #[test]
    fn test_closer_to_light_is_shallower() {
        let config = ShadowConfig::default();
        let light = Vec3::new(25.0, 30.0, 15.0);
        let matrix = config.light_space_matrix(light, Vec3::ZERO);

        let near = to_ndc(matrix, light * 0.5);
        let far = to_ndc(matrix, Vec3::ZERO);
        assert!(near.z < far.z);
    }

    #[test]
    fn test_overhead_light_is_finite() {
        let config = ShadowConfig::default();
        let matrix = config.light_space_matrix(Vec3::new(0.0, 50.0, 0.0), Vec3::ZERO);
        assert!(matrix.is_finite());
    }

    #[test]
    fn test_texel_size_follows_resolution() {
        let uniform = ShadowUniform::new(Mat4::IDENTITY, &ShadowConfig::default(), true);
        assert_eq!(uniform.texel_size, 1.0 / 1024.0);
        assert_eq!(uniform.enabled, 1.0);
    }
}
