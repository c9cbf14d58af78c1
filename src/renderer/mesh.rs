//! Mesh and vertex definitions
//!
//! Procedural primitives for the showroom. Every generator winds its
//! triangles counter-clockwise seen from outside, matching the back-face
//! culling of the scene pipeline.

use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Vertex with position, normal, and UV coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    /// Create a new vertex
    pub const fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Get the vertex buffer layout for wgpu
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // Position
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // Normal
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x3,
                },
                // UV
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 6]>() as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x2,
                },
            ],
        }
    }
}

/// A 3D mesh with vertices and indices
#[derive(Debug)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// GPU vertex buffer (created when uploaded)
    pub(crate) vertex_buffer: Option<wgpu::Buffer>,
    /// GPU index buffer (created when uploaded)
    pub(crate) index_buffer: Option<wgpu::Buffer>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::from_data(Vec::new(), Vec::new())
    }

    /// Create a mesh from vertices and indices
    pub fn from_data(vertices: Vec<Vertex>, indices: Vec<u32>) -> Self {
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
        }
    }

    /// Box centered at the origin with the given edge lengths
    pub fn cuboid(size: Vec3) -> Self {
        // (normal, u axis, v axis) per face, u x v = normal
        const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
            ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
            ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
            ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
            ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
            ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];

        let half = size * 0.5;
        let mut vertices = Vec::with_capacity(24);
        let mut indices = Vec::with_capacity(36);

        for (normal, u, v) in FACES {
            let (n, u, v) = (Vec3::from(normal), Vec3::from(u), Vec3::from(v));
            let base = vertices.len() as u32;

            // Corners counter-clockwise from bottom-left; image rows run top-down
            for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
                let position = (n + u * su + v * sv) * half;
                let uv = [(su + 1.0) * 0.5, (1.0 - sv) * 0.5];
                vertices.push(Vertex::new(position.into(), normal, uv));
            }

            indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
        }

        Self::from_data(vertices, indices)
    }

    /// Unit cube centered at origin
    pub fn cube() -> Self {
        Self::cuboid(Vec3::ONE)
    }

    /// Square on the XZ plane facing +Y, split into `segments` x `segments` cells
    pub fn plane(size: f32, segments: u32) -> Self {
        let segments = segments.max(1);
        let half = size / 2.0;
        let row = segments + 1;

        let mut vertices = Vec::with_capacity((row * row) as usize);
        for j in 0..=segments {
            let fj = j as f32 / segments as f32;
            for i in 0..=segments {
                let fi = i as f32 / segments as f32;
                vertices.push(Vertex::new(
                    [-half + size * fi, 0.0, half - size * fj],
                    [0.0, 1.0, 0.0],
                    [fi, 1.0 - fj],
                ));
            }
        }

        let mut indices = Vec::with_capacity((segments * segments * 6) as usize);
        for j in 0..segments {
            for i in 0..segments {
                let a = j * row + i;
                let b = a + 1;
                let c = b + row;
                let d = a + row;
                indices.extend_from_slice(&[a, b, c, c, d, a]);
            }
        }

        Self::from_data(vertices, indices)
    }

    /// Open-sided cone with a base cap, centered on its mid-height with the
    /// apex pointing up
    pub fn cone(radius: f32, height: f32, radial_segments: u32, height_segments: u32) -> Self {
        let radial = radial_segments.max(3);
        let rows = height_segments.max(1);
        let half = height / 2.0;
        let slope = radius / height.max(f32::EPSILON);

        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        // Side: row 0 is the apex ring, row `rows` the base ring
        for k in 0..=rows {
            let t = k as f32 / rows as f32;
            let y = half - height * t;
            let ring = radius * t;

            for s in 0..=radial {
                let u = s as f32 / radial as f32;
                let (sin, cos) = (u * TAU).sin_cos();
                let normal = Vec3::new(sin, slope, cos).normalize();
                vertices.push(Vertex::new(
                    [ring * sin, y, ring * cos],
                    normal.into(),
                    [u, t],
                ));
            }
        }

        let row = radial + 1;
        for k in 0..rows {
            for s in 0..radial {
                let current = k * row + s;
                let next = current + row;
                indices.extend_from_slice(&[current, next, current + 1]);
                indices.extend_from_slice(&[current + 1, next, next + 1]);
            }
        }

        // Base cap
        let center = vertices.len() as u32;
        vertices.push(Vertex::new([0.0, -half, 0.0], [0.0, -1.0, 0.0], [0.5, 0.5]));
        let first = center + 1;
        for s in 0..=radial {
            let (sin, cos) = (s as f32 / radial as f32 * TAU).sin_cos();
            vertices.push(Vertex::new(
                [radius * sin, -half, radius * cos],
                [0.0, -1.0, 0.0],
                [0.5 + sin * 0.5, 0.5 + cos * 0.5],
            ));
        }
        for s in 0..radial {
            indices.extend_from_slice(&[center, first + s + 1, first + s]);
        }

        Self::from_data(vertices, indices)
    }

    /// Create a UV sphere
    pub fn sphere(radius: f32, segments: u32, rings: u32) -> Self {
        let segments = segments.max(3);
        let rings = rings.max(2);
        let mut vertices = Vec::new();
        let mut indices = Vec::new();

        for ring in 0..=rings {
            let phi = PI * ring as f32 / rings as f32;
            let y = radius * phi.cos();
            let ring_radius = radius * phi.sin();

            for segment in 0..=segments {
                let theta = TAU * segment as f32 / segments as f32;
                let x = ring_radius * theta.cos();
                let z = ring_radius * theta.sin();

                let position = Vec3::new(x, y, z);
                let normal = Vec3::new(phi.sin() * theta.cos(), phi.cos(), phi.sin() * theta.sin());

                vertices.push(Vertex::new(
                    position.into(),
                    normal.into(),
                    [segment as f32 / segments as f32, ring as f32 / rings as f32],
                ));
            }
        }

        for ring in 0..rings {
            for segment in 0..segments {
                let current = ring * (segments + 1) + segment;
                let next = current + segments + 1;

                indices.extend_from_slice(&[current, current + 1, next]);
                indices.extend_from_slice(&[current + 1, next + 1, next]);
            }
        }

        Self::from_data(vertices, indices)
    }

    /// Get the number of indices
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Check if the mesh has been uploaded to GPU
    pub fn is_uploaded(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
