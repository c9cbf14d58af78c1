//! Texture loading and GPU management
//!
//! 2D textures for surfaces and six-face cubemaps for the sky. Images are
//! decoded with the `image` crate and uploaded as sRGB.

use std::path::Path;

use image::GenericImageView;
use wgpu::util::DeviceExt;

/// A GPU texture with its view and sampler
#[derive(Debug)]
pub struct Texture {
    /// The GPU texture
    pub texture: wgpu::Texture,
    /// Texture view for binding
    pub view: wgpu::TextureView,
    /// Sampler for texture filtering
    pub sampler: wgpu::Sampler,
    /// Texture dimensions
    pub size: wgpu::Extent3d,
}

/// Decoded RGBA8 pixels
struct Pixels {
    rgba: Vec<u8>,
    dimensions: (u32, u32),
}

impl Pixels {
    fn decode(bytes: &[u8]) -> Result<Self, TextureError> {
        let img =
            image::load_from_memory(bytes).map_err(|e| TextureError::DecodeError(e.to_string()))?;
        Ok(Self {
            dimensions: img.dimensions(),
            rgba: img.to_rgba8().into_raw(),
        })
    }

    fn read(path: &Path) -> Result<Self, TextureError> {
        let bytes = std::fs::read(path)
            .map_err(|e| TextureError::IoError(format!("{}: {e}", path.display())))?;
        Self::decode(&bytes)
    }
}

/// Check that `len` bytes hold exactly `width * height` RGBA pixels
fn check_rgba_len(len: usize, (width, height): (u32, u32)) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if width == 0 || height == 0 || len != expected {
        return Err(TextureError::SizeMismatch {
            expected,
            actual: len,
        });
    }
    Ok(())
}

/// Check that six faces are equal squares; returns the edge length
fn check_cube_faces(dimensions: &[(u32, u32)]) -> Result<u32, TextureError> {
    if dimensions.len() != 6 {
        return Err(TextureError::CubemapFaceMismatch(format!(
            "expected 6 faces, got {}",
            dimensions.len()
        )));
    }

    let (edge, _) = dimensions[0];
    for (i, &(w, h)) in dimensions.iter().enumerate() {
        if w != h || w != edge {
            return Err(TextureError::CubemapFaceMismatch(format!(
                "face {i} is {w}x{h}, expected {edge}x{edge}"
            )));
        }
    }
    Ok(edge)
}

impl Texture {
    /// Load a texture from a file path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or decoded
    pub fn from_path(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: impl AsRef<Path>,
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let pixels = Pixels::read(path.as_ref())?;
        Self::from_rgba(device, queue, &pixels.rgba, pixels.dimensions, label)
    }

    /// Create a texture from raw RGBA data
    ///
    /// # Errors
    ///
    /// Returns [`TextureError::SizeMismatch`] if `rgba` does not hold exactly
    /// `width * height` pixels
    pub fn from_rgba(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        dimensions: (u32, u32),
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        check_rgba_len(rgba.len(), dimensions)?;
        Ok(Self::upload_2d(device, queue, rgba, dimensions, label))
    }

    fn upload_2d(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &[u8],
        dimensions: (u32, u32),
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: dimensions.0,
            height: dimensions.1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            rgba,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("texture_sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Create a 1x1 white texture (useful as default/placeholder)
    #[must_use]
    pub fn white(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        Self::solid_color(device, queue, [255, 255, 255, 255])
    }

    /// Create a 1x1 colored texture
    #[must_use]
    pub fn solid_color(device: &wgpu::Device, queue: &wgpu::Queue, color: [u8; 4]) -> Self {
        Self::upload_2d(device, queue, &color, (1, 1), Some("solid_color_texture"))
    }

    /// Load a cubemap from six images in +X, -X, +Y, -Y, +Z, -Z order
    ///
    /// # Errors
    ///
    /// Returns an error if a face cannot be read or decoded, or the faces are
    /// not six equal squares
    pub fn cubemap_from_paths<P: AsRef<Path>>(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        faces: &[P],
        label: Option<&str>,
    ) -> Result<Self, TextureError> {
        let faces = faces
            .iter()
            .map(|p| Pixels::read(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        let dimensions: Vec<_> = faces.iter().map(|f| f.dimensions).collect();
        let edge = check_cube_faces(&dimensions)?;

        let data: Vec<u8> = faces.into_iter().flat_map(|f| f.rgba).collect();
        Ok(Self::upload_cube(device, queue, &data, edge, label))
    }

    /// 1x1 cubemap of a single color, stands in for a sky that failed to load
    #[must_use]
    pub fn solid_cubemap(device: &wgpu::Device, queue: &wgpu::Queue, color: [u8; 4]) -> Self {
        let data: Vec<u8> = std::iter::repeat_n(color, 6).flatten().collect();
        Self::upload_cube(device, queue, &data, 1, Some("solid_cubemap"))
    }

    fn upload_cube(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        data: &[u8],
        edge: u32,
        label: Option<&str>,
    ) -> Self {
        let size = wgpu::Extent3d {
            width: edge,
            height: edge,
            depth_or_array_layers: 6,
        };

        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label,
                size,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8UnormSrgb,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            wgpu::util::TextureDataOrder::LayerMajor,
            data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor {
            label: Some("cubemap_view"),
            dimension: Some(wgpu::TextureViewDimension::Cube),
            ..Default::default()
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("cubemap_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            texture,
            view,
            sampler,
            size,
        }
    }

    /// Get texture width
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.size.width
    }

    /// Get texture height
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.size.height
    }
}

/// Errors that can occur during texture loading
#[derive(Debug, Clone, PartialEq)]
pub enum TextureError {
    /// IO error reading file
    IoError(String),
    /// Error decoding image data
    DecodeError(String),
    /// Pixel data does not match the stated dimensions
    SizeMismatch { expected: usize, actual: usize },
    /// Cubemap faces are missing or differ in size
    CubemapFaceMismatch(String),
}

impl std::fmt::Display for TextureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::DecodeError(e) => write!(f, "Decode error: {e}"),
            Self::SizeMismatch { expected, actual } => {
                write!(f, "Expected {expected} bytes of RGBA data, got {actual}")
            }
            Self::CubemapFaceMismatch(e) => write!(f, "Bad cubemap: {e}"),
        }
    }
}

impl std::error::Error for TextureError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgba_len_checked() {
        assert!(check_rgba_len(16, (2, 2)).is_ok());
        assert_eq!(
            check_rgba_len(12, (2, 2)),
            Err(TextureError::SizeMismatch {
                expected: 16,
                actual: 12
            })
        );
        assert!(check_rgba_len(0, (0, 0)).is_err());
    }

    #[test]
    fn test_cube_faces_must_match() {
        assert_eq!(check_cube_faces(&[(64, 64); 6]), Ok(64));

        let mut uneven = [(64, 64); 6];
        uneven[3] = (32, 32);
        assert!(matches!(
            check_cube_faces(&uneven),
            Err(TextureError::CubemapFaceMismatch(_))
        ));

        assert!(check_cube_faces(&[(64, 32); 6]).is_err());
        assert!(check_cube_faces(&[(64, 64); 5]).is_err());
    }

    #[test]
    fn test_decode_png() {
        let mut png = Vec::new();
        image::RgbaImage::from_pixel(3, 2, image::Rgba([10, 20, 30, 255]))
            .write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();

        let pixels = Pixels::decode(&png).unwrap();
        assert_eq!(pixels.dimensions, (3, 2));
        assert_eq!(&pixels.rgba[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            Pixels::decode(b"not an image"),
            Err(TextureError::DecodeError(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Pixels::read(Path::new("no/such/texture.png")),
            Err(TextureError::IoError(_))
        ));
    }
}
