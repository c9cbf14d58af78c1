//! Scene description
//!
//! Everything the showroom draws and plays, as plain data. `SceneConfig::default()`
//! is the stock showroom; other layouts are loaded from RON (Rusty Object
//! Notation) or JSON files.

use std::fs;
use std::path::Path;

use glam::{EulerRot, Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::animation::Oscillator;
use crate::core::frame::{FrameSettings, FrameState};
use crate::renderer::{Camera, Mesh, ShadowConfig};

/// Initial camera placement and lens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraConfig {
    pub position: Vec3,
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

/// Cubemap sky, also used as the environment map for reflective materials
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkyConfig {
    /// Face images in +X, -X, +Y, -Y, +Z, -Z order
    pub faces: Vec<String>,
}

/// Geometry of a scene object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    /// Square on the XZ plane facing +Y
    Plane { size: f32, segments: u32 },
    /// Cone standing on the XZ plane, centered on its mid-height
    Cone {
        radius: f32,
        height: f32,
        radial_segments: u32,
        height_segments: u32,
    },
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box { width: f32, height: f32, depth: f32 },
}

impl Shape {
    /// Generate the mesh for this shape
    pub fn mesh(&self) -> Mesh {
        match *self {
            Self::Plane { size, segments } => Mesh::plane(size, segments),
            Self::Cone {
                radius,
                height,
                radial_segments,
                height_segments,
            } => Mesh::cone(radius, height, radial_segments, height_segments),
            Self::Sphere {
                radius,
                width_segments,
                height_segments,
            } => Mesh::sphere(radius, width_segments, height_segments),
            Self::Box {
                width,
                height,
                depth,
            } => Mesh::cuboid(Vec3::new(width, height, depth)),
        }
    }
}

/// Surface of a scene object. Colors are sRGB hex values (`0xRRGGBB`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum MaterialConfig {
    /// Lit metal/roughness surface, optionally textured and sky-reflective
    Standard {
        color: u32,
        texture: Option<String>,
        /// Times the texture tiles across the surface
        texture_repeat: f32,
        metalness: f32,
        roughness: f32,
        reflect_sky: bool,
        env_intensity: f32,
    },
    /// Two-tone cel shading
    Toon { color: u32 },
}

impl MaterialConfig {
    /// Texture path, if any
    pub fn texture(&self) -> Option<&str> {
        match self {
            Self::Standard { texture, .. } => texture.as_deref(),
            Self::Toon { .. } => None,
        }
    }
}

/// One object in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub shape: Shape,
    pub material: MaterialConfig,
    pub position: Vec3,
    /// Euler rotation (XYZ order) in radians
    pub rotation: Vec3,
    pub casts_shadow: bool,
    pub receives_shadow: bool,
}

impl ObjectConfig {
    /// World transform with an extra yaw and a replaced height
    pub fn transform_with(&self, height: f32, extra_yaw: f32) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y + extra_yaw,
            self.rotation.z,
        );
        let position = Vec3::new(self.position.x, height, self.position.z);
        Mat4::from_rotation_translation(rotation, position)
    }

    /// Resting world transform
    pub fn transform(&self) -> Mat4 {
        self.transform_with(self.position.y, 0.0)
    }
}

/// The directional sun light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunConfig {
    pub color: u32,
    pub intensity: f32,
    /// Light position; it shines toward the origin
    pub position: Vec3,
    pub casts_shadow: bool,
    pub shadow: ShadowConfig,
}

/// Uniform ambient light
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmbientConfig {
    pub color: u32,
    pub intensity: f32,
}

/// Background music
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MusicConfig {
    pub path: String,
    pub looping: bool,
    pub volume: f32,
}

/// First-person control tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlsConfig {
    /// Distance walked per tick per held key
    pub move_speed: f32,
    /// Radians of rotation per pixel of mouse motion
    pub look_sensitivity: f32,
}

/// The bobbing, spinning object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Name of the animated object
    pub target: String,
    /// Height change per tick
    pub step: f32,
    pub min: f32,
    pub max: f32,
    /// Yaw added per tick, in radians
    pub spin_per_tick: f32,
}

/// A complete scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    /// Scene name
    pub name: String,
    /// Scene version for compatibility
    pub version: u32,
    /// Simulation ticks per second
    pub tick_rate: f32,
    pub camera: CameraConfig,
    pub sky: Option<SkyConfig>,
    pub objects: Vec<ObjectConfig>,
    pub sun: SunConfig,
    pub ambient: AmbientConfig,
    pub music: Option<MusicConfig>,
    pub controls: ControlsConfig,
    pub animation: AnimationConfig,
}

impl SceneConfig {
    /// Load a scene, picking the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unknown, the file cannot be read,
    /// parsing fails, or the scene is invalid
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SceneError> {
        let path = path.as_ref();
        let format = SceneFormat::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|e| SceneError::IoError(e.to_string()))?;

        let scene = match format {
            SceneFormat::Ron => Self::from_ron_str(&content)?,
            SceneFormat::Json => Self::from_json_str(&content)?,
        };
        scene.validate()?;
        Ok(scene)
    }

    /// Save the scene, picking the format from the file extension
    ///
    /// # Errors
    ///
    /// Returns an error if the extension is unknown, serialization fails, or
    /// the file cannot be written
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SceneError> {
        let path = path.as_ref();
        let content = match SceneFormat::from_path(path)? {
            SceneFormat::Ron => self.to_ron_string()?,
            SceneFormat::Json => self.to_json_string()?,
        };
        fs::write(path, content).map_err(|e| SceneError::IoError(e.to_string()))
    }

    /// Parse RON text
    pub fn from_ron_str(content: &str) -> Result<Self, SceneError> {
        ron::from_str(content).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }

    /// Serialize to pretty RON text
    pub fn to_ron_string(&self) -> Result<String, SceneError> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SceneError::SerializeError(e.to_string()))
    }

    /// Parse JSON text
    pub fn from_json_str(content: &str) -> Result<Self, SceneError> {
        serde_json::from_str(content).map_err(|e| SceneError::DeserializeError(e.to_string()))
    }

    /// Serialize to pretty JSON text
    pub fn to_json_string(&self) -> Result<String, SceneError> {
        serde_json::to_string_pretty(self).map_err(|e| SceneError::SerializeError(e.to_string()))
    }

    /// Check the values the frame loop and renderer rely on
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::Invalid`] describing the first problem found
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |msg: String| Err(SceneError::Invalid(msg));

        if !(self.tick_rate > 0.0) {
            return invalid(format!("tick_rate must be positive, got {}", self.tick_rate));
        }

        let camera = &self.camera;
        if !(camera.near > 0.0 && camera.far > camera.near) {
            return invalid(format!(
                "camera clip planes must satisfy 0 < near < far, got {} / {}",
                camera.near, camera.far
            ));
        }
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return invalid(format!("camera fov out of range: {}", camera.fov_degrees));
        }

        if let Some(sky) = &self.sky
            && sky.faces.len() != 6
        {
            return invalid(format!("sky needs 6 faces, got {}", sky.faces.len()));
        }

        for (i, object) in self.objects.iter().enumerate() {
            if self.objects[..i].iter().any(|o| o.name == object.name) {
                return invalid(format!("duplicate object name '{}'", object.name));
            }
        }

        let shadow = &self.sun.shadow;
        if shadow.resolution == 0 || !(shadow.far > shadow.near) {
            return invalid("sun shadow needs a resolution and near < far".to_string());
        }

        let animation = &self.animation;
        if self.animated_index().is_none() {
            return invalid(format!("animation target '{}' not found", animation.target));
        }
        if !(animation.step > 0.0) || !(animation.min < animation.max) {
            return invalid(format!(
                "animation needs step > 0 and min < max, got step {} in [{}, {}]",
                animation.step, animation.min, animation.max
            ));
        }

        Ok(())
    }

    /// Index of the animated object
    pub fn animated_index(&self) -> Option<usize> {
        self.objects
            .iter()
            .position(|o| o.name == self.animation.target)
    }

    /// Camera described by this scene
    pub fn build_camera(&self) -> Camera {
        Camera::perspective(
            self.camera.position,
            self.camera.fov_degrees,
            self.camera.near,
            self.camera.far,
        )
    }

    /// Initial frame-loop state: no keys held, bob starting at the animated
    /// object's resting height
    pub fn frame_state(&self) -> FrameState {
        let start = self
            .animated_index()
            .map_or(self.animation.min, |i| self.objects[i].position.y);
        let bob = Oscillator::new(
            start,
            self.animation.step,
            self.animation.min,
            self.animation.max,
        );
        let settings = FrameSettings {
            move_speed: self.controls.move_speed,
            spin_per_tick: self.animation.spin_per_tick,
            tick_rate: self.tick_rate,
        };
        FrameState::new(self.build_camera(), bob, settings)
    }
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            name: String::from("Showroom"),
            version: 1,
            tick_rate: 60.0,
            camera: CameraConfig {
                position: Vec3::new(0.0, 10.0, 30.0),
                fov_degrees: 75.0,
                near: 0.1,
                far: 1000.0,
            },
            sky: Some(SkyConfig {
                faces: [
                    "img/sky-right.jpg",
                    "img/sky-left.jpg",
                    "img/sky-top.jpg",
                    "img/sky-bottom.jpg",
                    "img/sky-front.jpg",
                    "img/sky-back.jpg",
                ]
                .map(String::from)
                .to_vec(),
            }),
            objects: vec![
                ObjectConfig {
                    name: String::from("floor"),
                    shape: Shape::Plane {
                        size: 1000.0,
                        segments: 250,
                    },
                    material: MaterialConfig::Standard {
                        color: 0xffffff,
                        texture: Some(String::from("img/floor_tiles_3.png")),
                        texture_repeat: 40.0,
                        metalness: 0.0,
                        roughness: 1.0,
                        reflect_sky: false,
                        env_intensity: 0.0,
                    },
                    position: Vec3::ZERO,
                    rotation: Vec3::ZERO,
                    casts_shadow: false,
                    receives_shadow: true,
                },
                ObjectConfig {
                    name: String::from("cone"),
                    shape: Shape::Cone {
                        radius: 8.0,
                        height: 16.0,
                        radial_segments: 16,
                        height_segments: 16,
                    },
                    material: MaterialConfig::Toon { color: 0xf67104 },
                    position: Vec3::new(0.0, 5.0, 0.0),
                    rotation: Vec3::ZERO,
                    casts_shadow: true,
                    receives_shadow: true,
                },
                ObjectConfig {
                    name: String::from("sphere"),
                    shape: Shape::Sphere {
                        radius: 6.0,
                        width_segments: 16,
                        height_segments: 16,
                    },
                    material: MaterialConfig::Standard {
                        color: 0xffffff,
                        texture: None,
                        texture_repeat: 1.0,
                        metalness: 1.0,
                        roughness: 0.0,
                        reflect_sky: true,
                        env_intensity: 1.0,
                    },
                    position: Vec3::new(-10.0, 20.0, -20.0),
                    rotation: Vec3::ZERO,
                    casts_shadow: true,
                    receives_shadow: true,
                },
                ObjectConfig {
                    name: String::from("crate"),
                    shape: Shape::Box {
                        width: 10.0,
                        height: 10.0,
                        depth: 10.0,
                    },
                    material: MaterialConfig::Standard {
                        color: 0xffffff,
                        texture: Some(String::from("img/cube_crate_low.jpg")),
                        texture_repeat: 1.0,
                        metalness: 0.0,
                        roughness: 1.0,
                        reflect_sky: false,
                        env_intensity: 0.0,
                    },
                    position: Vec3::new(-20.0, 5.0, -7.0),
                    // 45 radians, not degrees
                    rotation: Vec3::new(0.0, 45.0, 0.0),
                    casts_shadow: true,
                    receives_shadow: true,
                },
            ],
            sun: SunConfig {
                color: 0xffffff,
                intensity: 0.7,
                position: Vec3::new(25.0, 30.0, 15.0),
                casts_shadow: true,
                shadow: ShadowConfig::default(),
            },
            ambient: AmbientConfig {
                color: 0xffffff,
                intensity: 1.0,
            },
            music: Some(MusicConfig {
                path: String::from("mp3/dnb-jungle-2.mp3"),
                looping: true,
                volume: 1.0,
            }),
            controls: ControlsConfig {
                move_speed: 1.0,
                look_sensitivity: 0.002,
            },
            animation: AnimationConfig {
                target: String::from("sphere"),
                step: 0.01,
                min: 20.0,
                max: 22.0,
                spin_per_tick: 0.01,
            },
        }
    }
}

/// On-disk scene formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneFormat {
    Ron,
    Json,
}

impl SceneFormat {
    /// Pick the format from a file extension
    ///
    /// # Errors
    ///
    /// Returns [`SceneError::UnsupportedFormat`] for anything but `.ron`/`.json`
    pub fn from_path(path: &Path) -> Result<Self, SceneError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("ron") => Ok(Self::Ron),
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            _ => Err(SceneError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// Errors that can occur during scene operations
#[derive(Debug, Clone)]
pub enum SceneError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
    /// File extension is neither RON nor JSON
    UnsupportedFormat(String),
    /// Scene parsed but describes something unusable
    Invalid(String),
}

impl std::fmt::Display for SceneError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
            Self::UnsupportedFormat(p) => write!(f, "Unsupported scene format: {p}"),
            Self::Invalid(e) => write!(f, "Invalid scene: {e}"),
        }
    }
}

impl std::error::Error for SceneError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Direction;

    #[test]
    fn test_default_scene_is_valid() {
        let scene = SceneConfig::default();
        assert!(scene.validate().is_ok());
        assert_eq!(scene.objects.len(), 4);
        assert_eq!(scene.animated_index(), Some(2));
    }

    #[test]
    fn test_bundled_scene_matches_default() {
        let scene = SceneConfig::from_ron_str(include_str!("../../assets/scene.ron")).unwrap();
        assert_eq!(scene, SceneConfig::default());
    }

    #[test]
    fn test_scene_serialization_ron() {
        let scene = SceneConfig::default();
        let ron_str = scene.to_ron_string().unwrap();
        assert!(ron_str.contains("sphere"));

        let loaded = SceneConfig::from_ron_str(&ron_str).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_scene_serialization_json() {
        let mut scene = SceneConfig::default();
        scene.music = None;

        let json_str = scene.to_json_string().unwrap();
        let loaded = SceneConfig::from_json_str(&json_str).unwrap();
        assert!(loaded.music.is_none());
        assert_eq!(loaded.objects[1].material, MaterialConfig::Toon { color: 0xf67104 });
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let err = SceneConfig::load("scene.yaml").unwrap_err();
        assert!(matches!(err, SceneError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SceneConfig::load("does/not/exist.ron").unwrap_err();
        assert!(matches!(err, SceneError::IoError(_)));
    }

    #[test]
    fn test_garbage_is_deserialize_error() {
        let err = SceneConfig::from_ron_str("not a scene").unwrap_err();
        assert!(matches!(err, SceneError::DeserializeError(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("showroom_scene_{}.json", std::process::id()));
        let scene = SceneConfig::default();

        scene.save(&path).unwrap();
        let loaded = SceneConfig::load(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_missing_animation_target_invalid() {
        let mut scene = SceneConfig::default();
        scene.animation.target = String::from("teapot");
        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_inverted_bounds_invalid() {
        let mut scene = SceneConfig::default();
        scene.animation.min = 30.0;
        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_sky_face_count_checked() {
        let mut scene = SceneConfig::default();
        scene.sky = Some(SkyConfig {
            faces: vec![String::from("only-one.jpg")],
        });
        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_duplicate_names_invalid() {
        let mut scene = SceneConfig::default();
        let copy = scene.objects[0].clone();
        scene.objects.push(copy);
        assert!(matches!(scene.validate(), Err(SceneError::Invalid(_))));
    }

    #[test]
    fn test_frame_state_starts_at_target_height() {
        let state = SceneConfig::default().frame_state();
        assert_eq!(state.bob.position, 20.0);
        assert_eq!(state.bob.direction, Direction::Up);
        assert_eq!(state.camera.position, Vec3::new(0.0, 10.0, 30.0));
        assert_eq!(state.settings.move_speed, 1.0);
        assert!(!state.movement.any());
    }

    #[test]
    fn test_transform_with_replaces_height_and_adds_yaw() {
        let scene = SceneConfig::default();
        let sphere = &scene.objects[2];

        let m = sphere.transform_with(21.5, std::f32::consts::FRAC_PI_2);
        let origin = m.transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(Vec3::new(-10.0, 21.5, -20.0), 1e-5));

        // A quarter turn about Y sends +X to -Z
        let x = m.transform_vector3(Vec3::X);
        assert!(x.abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_shape_meshes_are_nonempty() {
        for object in SceneConfig::default().objects {
            let mesh = object.shape.mesh();
            assert!(!mesh.vertices.is_empty(), "{}", object.name);
            assert_eq!(mesh.indices.len() % 3, 0, "{}", object.name);
        }
    }
}
