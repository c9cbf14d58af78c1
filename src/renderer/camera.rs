//! Camera system for 3D rendering

use glam::{Mat4, Vec3};

/// Largest pitch mouse look may reach, just short of straight up/down
const MAX_PITCH_DEGREES: f32 = 89.0;

/// Perspective camera for 3D rendering
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Direction the camera is looking at
    pub direction: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Yaw angle (rotation around Y axis)
    yaw: f32,
    /// Pitch angle (rotation around X axis)
    pitch: f32,
}

impl Camera {
    /// Create a new camera with default settings, looking down -Z
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
        }
    }

    /// Create a camera at `position` looking down -Z with the given lens
    pub fn perspective(position: Vec3, fov_degrees: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            fov: fov_degrees.to_radians(),
            near,
            far,
            ..Self::new()
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Rotate camera using mouse delta
    pub fn rotate(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        self.yaw += delta_x * sensitivity;
        self.pitch -= delta_y * sensitivity;

        let max_pitch = MAX_PITCH_DEGREES.to_radians();
        self.pitch = self.pitch.clamp(-max_pitch, max_pitch);

        self.direction = Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize();
    }

    /// Yaw in radians
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    /// Pitch in radians
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Get the right vector
    pub fn right(&self) -> Vec3 {
        self.direction.cross(self.up).normalize()
    }

    /// Get the forward vector (same as direction)
    pub fn forward(&self) -> Vec3 {
        self.direction
    }

    /// Forward projected onto the ground plane.
    ///
    /// Walking ignores pitch: looking up or down never lifts the camera.
    pub fn forward_planar(&self) -> Vec3 {
        self.up.cross(self.right()).normalize()
    }

    /// Walk forward/backward along the ground plane
    pub fn move_forward(&mut self, amount: f32) {
        self.position += self.forward_planar() * amount;
    }

    /// Strafe left/right
    pub fn move_right(&mut self, amount: f32) {
        self.position += self.right() * amount;
    }

    /// Shift the camera by a world-space offset
    pub fn translate(&mut self, offset: Vec3) {
        self.position += offset;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_default_axes() {
        let camera = Camera::new();
        assert!(camera.right().abs_diff_eq(Vec3::X, EPSILON));
        assert!(camera.forward_planar().abs_diff_eq(Vec3::NEG_Z, EPSILON));
    }

    #[test]
    fn test_perspective_lens() {
        let camera = Camera::perspective(Vec3::new(0.0, 10.0, 30.0), 75.0, 0.1, 1000.0);
        assert!((camera.fov - 75.0_f32.to_radians()).abs() < EPSILON);
        assert_eq!(camera.position, Vec3::new(0.0, 10.0, 30.0));
        assert_eq!(camera.direction, Vec3::NEG_Z);
    }

    #[test]
    fn test_forward_planar_ignores_pitch() {
        let mut camera = Camera::new();
        camera.rotate(0.0, -200.0, 0.002);
        assert!(camera.direction.y > 0.1);

        let forward = camera.forward_planar();
        assert!(forward.y.abs() < EPSILON);
        assert!((forward.length() - 1.0).abs() < EPSILON);
        assert!(forward.abs_diff_eq(Vec3::NEG_Z, 1e-4));
    }

    #[test]
    fn test_move_forward_keeps_height() {
        let mut camera = Camera::new();
        camera.rotate(100.0, -150.0, 0.002);
        let height = camera.position.y;

        camera.move_forward(5.0);
        assert!((camera.position.y - height).abs() < EPSILON);
    }

    #[test]
    fn test_move_right() {
        let mut camera = Camera::new();
        camera.move_right(-2.0);
        assert!(camera.position.abs_diff_eq(Vec3::new(-2.0, 0.0, 5.0), EPSILON));
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = Camera::new();
        camera.rotate(0.0, -100_000.0, 0.01);
        assert!(camera.pitch() <= MAX_PITCH_DEGREES.to_radians() + EPSILON);
        assert!(camera.right().is_finite());
    }

    #[test]
    fn test_turning_right_increases_yaw() {
        let mut camera = Camera::new();
        camera.rotate(50.0, 0.0, 0.01);
        assert!(camera.direction.x > 0.0);
        assert!(camera.yaw() > -90.0_f32.to_radians());
    }

    #[test]
    fn test_set_aspect_guards_zero_height() {
        let mut camera = Camera::new();
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }
}
