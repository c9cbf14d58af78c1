//! GPU-side scene
//!
//! [`Stage`] turns a [`SceneConfig`] into uploaded meshes, textures and bind
//! groups, then keeps them in step with the [`FrameState`] each frame. Assets
//! that fail to load are logged and replaced with placeholders so the scene
//! still comes up.

use std::path::{Path, PathBuf};

use glam::Mat4;

use crate::core::{AmbientConfig, FrameState, MaterialConfig, ObjectConfig, SceneConfig, SunConfig};
use crate::renderer::{
    AmbientLight, DirectionalLight, Material, Mesh, Renderer, Texture, color_from_hex,
};

/// Sky color used when the cubemap faces cannot be loaded
const FALLBACK_SKY: [u8; 4] = [135, 170, 215, 255];

/// Resolve a scene asset path against the asset root
#[must_use]
pub fn asset_path(root: &Path, relative: &str) -> PathBuf {
    let path = Path::new(relative);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// Material parameters for a configured surface
#[must_use]
pub fn material_from_config(config: &MaterialConfig) -> Material {
    match *config {
        MaterialConfig::Standard {
            color,
            texture_repeat,
            metalness,
            roughness,
            reflect_sky,
            env_intensity,
            ..
        } => Material::standard(color_from_hex(color))
            .with_metalness(metalness)
            .with_roughness(roughness)
            .with_env_intensity(if reflect_sky { env_intensity } else { 0.0 })
            .with_texture_repeat(texture_repeat),
        MaterialConfig::Toon { color } => Material::toon(color_from_hex(color)),
    }
}

/// Sun light for a configured sun; it always aims at the origin
#[must_use]
pub fn sun_from_config(config: &SunConfig) -> DirectionalLight {
    let mut sun = DirectionalLight::new(
        config.position,
        color_from_hex(config.color),
        config.intensity,
    );
    sun.casts_shadow = config.casts_shadow;
    sun
}

#[must_use]
pub fn ambient_from_config(config: &AmbientConfig) -> AmbientLight {
    AmbientLight::new(color_from_hex(config.color), config.intensity)
}

/// World transform of an object this frame: the animated object follows the
/// bob height and accumulated spin, everything else stays at rest
#[must_use]
pub fn object_transform(object: &ObjectConfig, animated: bool, state: &FrameState) -> Mat4 {
    if animated {
        object.transform_with(state.bob.position, state.spin)
    } else {
        object.transform()
    }
}

/// One uploaded scene object
struct StageObject {
    config: ObjectConfig,
    mesh: Mesh,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    material_bind_group: wgpu::BindGroup,
}

/// Everything needed to draw a scene
pub struct Stage {
    objects: Vec<StageObject>,
    animated: Option<usize>,
    sun: DirectionalLight,
    ambient: AmbientLight,
}

impl Stage {
    /// Upload a scene. Asset paths are resolved against `asset_root`.
    pub fn build(renderer: &mut Renderer, scene: &SceneConfig, asset_root: &Path) -> Self {
        let sky = match &scene.sky {
            Some(sky) => {
                let faces: Vec<PathBuf> = sky
                    .faces
                    .iter()
                    .map(|face| asset_path(asset_root, face))
                    .collect();
                match Texture::cubemap_from_paths(
                    renderer.device(),
                    renderer.queue(),
                    &faces,
                    Some("sky"),
                ) {
                    Ok(cubemap) => Some(cubemap),
                    Err(e) => {
                        log::error!("Failed to load sky: {e}");
                        None
                    }
                }
            }
            None => None,
        };
        let sky = sky.unwrap_or_else(|| {
            Texture::solid_cubemap(renderer.device(), renderer.queue(), FALLBACK_SKY)
        });
        renderer.set_sky(sky);
        renderer.set_shadow_config(scene.sun.shadow.clone());

        let animated = scene.animated_index();
        let objects = scene
            .objects
            .iter()
            .map(|object| Self::upload_object(renderer, object, asset_root))
            .collect::<Vec<_>>();

        log::info!(
            "Stage '{}' ready: {} objects, animating {:?}",
            scene.name,
            objects.len(),
            scene.animation.target
        );

        Self {
            objects,
            animated,
            sun: sun_from_config(&scene.sun),
            ambient: ambient_from_config(&scene.ambient),
        }
    }

    fn upload_object(renderer: &Renderer, object: &ObjectConfig, asset_root: &Path) -> StageObject {
        let mut mesh = object.shape.mesh();
        renderer.upload_mesh(&mut mesh);

        let texture = object.material.texture().and_then(|relative| {
            let path = asset_path(asset_root, relative);
            Texture::from_path(
                renderer.device(),
                renderer.queue(),
                &path,
                Some(&object.name),
            )
            .inspect_err(|e| log::error!("Failed to load texture for '{}': {e}", object.name))
            .ok()
        });

        let material = material_from_config(&object.material);
        let material_bind_group = renderer.create_material_bind_group(&material, texture.as_ref());
        let (model_buffer, model_bind_group) =
            renderer.create_model_bind_group(object.transform(), object.receives_shadow);

        log::debug!(
            "Uploaded '{}': {} vertices, {} indices",
            object.name,
            mesh.vertices.len(),
            mesh.indices.len()
        );

        StageObject {
            config: object.clone(),
            mesh,
            model_buffer,
            model_bind_group,
            material_bind_group,
        }
    }

    /// Push camera, lights and the animated transform to the GPU
    pub fn sync(&self, renderer: &mut Renderer, state: &FrameState) {
        renderer.update_camera(&state.camera);
        renderer.update_lights(&self.sun, &self.ambient);

        if let Some(object) = self.animated.and_then(|i| self.objects.get(i)) {
            let transform = object_transform(&object.config, true, state);
            renderer.update_model_buffer(
                &object.model_buffer,
                transform,
                object.config.receives_shadow,
            );
        }
    }

    /// Draw shadow casters into the shadow map
    pub fn draw_shadows(&self, renderer: &Renderer, pass: &mut wgpu::RenderPass<'_>) {
        if !self.sun.casts_shadow {
            return;
        }
        for object in self.objects.iter().filter(|o| o.config.casts_shadow) {
            renderer.draw_shadow_caster(pass, &object.mesh, &object.model_bind_group);
        }
    }

    /// Draw the sky, then every object
    pub fn draw(&self, renderer: &Renderer, pass: &mut wgpu::RenderPass<'_>) {
        renderer.draw_skybox(pass);
        for object in &self.objects {
            renderer.draw_mesh(
                pass,
                &object.mesh,
                &object.model_bind_group,
                &object.material_bind_group,
            );
        }
    }

    /// Render one frame: shadow pass, then the main pass
    pub fn render(&self, renderer: &Renderer) {
        let Some(mut frame) = renderer.begin_frame() else {
            return;
        };

        {
            let mut pass = renderer.begin_shadow_pass(&mut frame);
            self.draw_shadows(renderer, &mut pass);
        }

        {
            let mut pass = renderer.begin_render_pass(&mut frame);
            self.draw(renderer, &mut pass);
        }

        renderer.end_frame(frame);
    }

    #[must_use]
    pub fn sun(&self) -> &DirectionalLight {
        &self.sun
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::Shading;
    use glam::Vec3;

    #[test]
    fn test_asset_path() {
        let root = Path::new("assets");
        assert_eq!(asset_path(root, "img/a.png"), PathBuf::from("assets/img/a.png"));

        let absolute = std::env::temp_dir().join("b.png");
        let absolute_str = absolute.to_string_lossy().into_owned();
        assert_eq!(asset_path(root, &absolute_str), absolute);
    }

    #[test]
    fn test_toon_material() {
        let material = material_from_config(&MaterialConfig::Toon { color: 0xf67104 });
        assert_eq!(material.shading, Shading::Toon);
        assert_eq!(material.color, color_from_hex(0xf67104));
        assert_eq!(material.env_intensity, 0.0);
    }

    #[test]
    fn test_reflective_sphere_material() {
        let scene = SceneConfig::default();
        let material = material_from_config(&scene.objects[2].material);
        assert_eq!(material.shading, Shading::Standard);
        assert_eq!(material.metalness, 1.0);
        assert_eq!(material.roughness, 0.0);
        assert_eq!(material.env_intensity, 1.0);
    }

    #[test]
    fn test_env_intensity_needs_reflect_sky() {
        let config = MaterialConfig::Standard {
            color: 0xffffff,
            texture: None,
            texture_repeat: 1.0,
            metalness: 1.0,
            roughness: 0.0,
            reflect_sky: false,
            env_intensity: 1.0,
        };
        assert_eq!(material_from_config(&config).env_intensity, 0.0);
    }

    #[test]
    fn test_floor_texture_repeat() {
        let scene = SceneConfig::default();
        let material = material_from_config(&scene.objects[0].material);
        assert_eq!(material.texture_repeat, 40.0);
        assert!(material.color.abs_diff_eq(Vec3::ONE, 1e-5));
    }

    #[test]
    fn test_sun_from_config() {
        let scene = SceneConfig::default();
        let sun = sun_from_config(&scene.sun);
        assert_eq!(sun.position, Vec3::new(25.0, 30.0, 15.0));
        assert_eq!(sun.target, Vec3::ZERO);
        assert_eq!(sun.intensity, 0.7);
        assert!(sun.casts_shadow);

        let ambient = ambient_from_config(&scene.ambient);
        assert!(ambient.color.abs_diff_eq(Vec3::ONE, 1e-5));
        assert_eq!(ambient.intensity, 1.0);
    }

    #[test]
    fn test_animated_transform_follows_state() {
        let scene = SceneConfig::default();
        let sphere = &scene.objects[2];
        let mut state = scene.frame_state();
        for _ in 0..50 {
            state = state.tick();
        }

        let moved = object_transform(sphere, true, &state);
        let origin = moved.transform_point3(Vec3::ZERO);
        assert!((origin.y - state.bob.position).abs() < 1e-5);
        assert!(origin.y > 20.4);

        let resting = object_transform(sphere, false, &state);
        assert_eq!(resting, sphere.transform());
    }
}
