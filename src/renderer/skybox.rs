//! Skybox rendering
//!
//! Draws a cubemap behind everything with a single fullscreen triangle: each
//! pixel unprojects to a view direction and samples the cube along it.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use wgpu::util::DeviceExt;

use super::texture::Texture;

/// Skybox uniform data
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct SkyboxUniform {
    /// Inverse of projection * view with the translation removed
    pub inv_view_proj: [[f32; 4]; 4],
}

impl SkyboxUniform {
    /// Build from the camera matrices; the sky stays centered on the camera
    #[must_use]
    pub fn new(view: Mat4, projection: Mat4) -> Self {
        let mut rotation_only = view;
        rotation_only.w_axis.x = 0.0;
        rotation_only.w_axis.y = 0.0;
        rotation_only.w_axis.z = 0.0;

        Self {
            inv_view_proj: (projection * rotation_only).inverse().to_cols_array_2d(),
        }
    }
}

/// Skybox renderer
pub struct Skybox {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl Skybox {
    /// Create a new skybox showing `cubemap`
    #[must_use]
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
        cubemap: &Texture,
    ) -> Self {
        let layout = Self::bind_group_layout(device);

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("skybox_uniform"),
            contents: bytemuck::bytes_of(&SkyboxUniform::new(Mat4::IDENTITY, Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = Self::create_bind_group(device, &layout, &uniform_buffer, cubemap);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Skybox Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("skybox.wgsl").into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Skybox Pipeline Layout"),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Skybox Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                ..Default::default()
            },
            // Drawn first, so it never needs to win a depth test
            depth_stencil: Some(wgpu::DepthStencilState {
                format: depth_format,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            layout,
            uniform_buffer,
            bind_group,
        }
    }

    /// Show a different cubemap
    pub fn set_cubemap(&mut self, device: &wgpu::Device, cubemap: &Texture) {
        self.bind_group = Self::create_bind_group(device, &self.layout, &self.uniform_buffer, cubemap);
    }

    /// Update skybox with camera matrices
    pub fn update(&self, queue: &wgpu::Queue, view: Mat4, projection: Mat4) {
        let uniform = SkyboxUniform::new(view, projection);
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
    }

    /// Record the sky draw; call before any scene geometry
    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }

    /// Get bind group layout for skybox
    fn bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("skybox_bind_group_layout"),
            entries: &[
                // Uniform
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                // Cubemap texture
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                // Sampler
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        uniform_buffer: &wgpu::Buffer,
        cubemap: &Texture,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("skybox_bind_group"),
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&cubemap.view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&cubemap.sampler),
                },
            ],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec3, Vec4, Vec4Swizzles};

    fn view_direction(uniform: &SkyboxUniform, ndc_x: f32, ndc_y: f32) -> Vec3 {
        let inv = Mat4::from_cols_array_2d(&uniform.inv_view_proj);
        let world = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        (world.xyz() / world.w).normalize()
    }

    #[test]
    fn test_screen_center_looks_forward() {
        let view = Mat4::look_at_rh(Vec3::new(0.0, 10.0, 30.0), Vec3::new(0.0, 10.0, 29.0), Vec3::Y);
        let projection = Mat4::perspective_rh(75.0_f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0);

        let uniform = SkyboxUniform::new(view, projection);
        assert!(view_direction(&uniform, 0.0, 0.0).abs_diff_eq(Vec3::NEG_Z, 1e-3));
        assert!(view_direction(&uniform, 0.0, 0.9).y > 0.0);
    }

    #[test]
    fn test_camera_position_ignored() {
        let projection = Mat4::perspective_rh(1.0, 1.0, 0.1, 1000.0);
        let near = Mat4::look_at_rh(Vec3::ZERO, Vec3::X, Vec3::Y);
        let far = Mat4::look_at_rh(Vec3::new(500.0, -3.0, 42.0), Vec3::new(501.0, -3.0, 42.0), Vec3::Y);

        let a = SkyboxUniform::new(near, projection);
        let b = SkyboxUniform::new(far, projection);
        let (da, db) = (view_direction(&a, 0.3, -0.2), view_direction(&b, 0.3, -0.2));
        assert!(da.abs_diff_eq(db, 1e-4));
    }
}
