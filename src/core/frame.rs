//! Per-frame simulation state
//!
//! [`FrameState`] is the whole mutable state of the showroom: held movement
//! keys, the bobbing object's oscillator, its spin, and the camera. Updates are
//! pure (`state -> state`) so any scheduler can drive them: the window's
//! redraw loop in the app, a plain loop in tests.

use glam::Vec3;

use crate::animation::Oscillator;
use crate::input::MovementState;
use crate::renderer::Camera;

/// Most ticks a single [`FrameState::step`] may run before dropping backlog
pub const MAX_TICKS_PER_STEP: u32 = 8;

/// Fixed per-tick tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSettings {
    /// Camera translation per tick for each held movement key
    pub move_speed: f32,
    /// Yaw added to the animated object every tick, in radians
    pub spin_per_tick: f32,
    /// Ticks per second when driven by [`FrameState::step`]
    pub tick_rate: f32,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            spin_per_tick: 0.01,
            tick_rate: 60.0,
        }
    }
}

/// Camera offset for one tick of held movement keys.
///
/// Each held key contributes one `speed`-long step along its axis; the steps
/// add up with no clamping, so two orthogonal keys move diagonally.
#[must_use]
pub fn movement_offset(movement: MovementState, camera: &Camera, speed: f32) -> Vec3 {
    let forward = camera.forward_planar();
    let right = camera.right();
    let mut offset = Vec3::ZERO;

    if movement.forward {
        offset += forward * speed;
    }
    if movement.backward {
        offset -= forward * speed;
    }
    if movement.left {
        offset -= right * speed;
    }
    if movement.right {
        offset += right * speed;
    }

    offset
}

/// Everything the frame loop advances
#[derive(Debug, Clone, PartialEq)]
pub struct FrameState {
    /// Held movement keys
    pub movement: MovementState,
    /// Vertical bob of the animated object
    pub bob: Oscillator,
    /// Accumulated spin of the animated object, in radians
    pub spin: f32,
    /// First-person camera
    pub camera: Camera,
    /// Ticks run so far
    pub ticks: u64,
    /// Tuning
    pub settings: FrameSettings,
    /// Unconsumed scheduler time, in seconds
    accumulator: f32,
}

impl FrameState {
    /// Create a state with no keys held
    pub fn new(camera: Camera, bob: Oscillator, settings: FrameSettings) -> Self {
        Self {
            movement: MovementState::new(),
            bob,
            spin: 0.0,
            camera,
            ticks: 0,
            settings,
            accumulator: 0.0,
        }
    }

    /// Length of one tick in seconds
    pub fn tick_interval(&self) -> f32 {
        1.0 / self.settings.tick_rate.max(f32::EPSILON)
    }

    /// One display refresh worth of update.
    ///
    /// Bob and spin the animated object, then walk the camera by the held
    /// keys.
    #[must_use]
    pub fn tick(&self) -> Self {
        let mut next = self.clone();

        next.bob = self.bob.advanced();
        next.spin = self.spin + self.settings.spin_per_tick;
        next.camera
            .translate(movement_offset(self.movement, &self.camera, self.settings.move_speed));
        next.ticks = self.ticks + 1;

        next
    }

    /// Advance by `dt` seconds of scheduler time.
    ///
    /// Time accumulates and is spent in whole ticks at the configured tick
    /// rate. A step that would need more than [`MAX_TICKS_PER_STEP`] ticks
    /// runs that many and drops the rest.
    #[must_use]
    pub fn step(&self, dt: f32) -> Self {
        let interval = self.tick_interval();
        let mut next = self.clone();
        next.accumulator += dt.max(0.0);

        let mut ran = 0;
        while next.accumulator >= interval && ran < MAX_TICKS_PER_STEP {
            next = next.tick();
            next.accumulator -= interval;
            ran += 1;
        }

        if ran == MAX_TICKS_PER_STEP && next.accumulator >= interval {
            next.accumulator = 0.0;
        }

        next
    }

    /// Apply mouse-look motion to the camera
    pub fn look(&mut self, delta_x: f32, delta_y: f32, sensitivity: f32) {
        self.camera.rotate(delta_x, delta_y, sensitivity);
    }

    /// Unconsumed scheduler time in seconds
    pub fn pending_time(&self) -> f32 {
        self.accumulator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Direction;
    use crate::input::MovementKey;

    const EPSILON: f32 = 1e-4;

    fn state() -> FrameState {
        FrameState::new(
            Camera::perspective(Vec3::new(0.0, 10.0, 30.0), 75.0, 0.1, 1000.0),
            Oscillator::new(20.0, 0.01, 20.0, 22.0),
            FrameSettings::default(),
        )
    }

    fn holding(keys: &[MovementKey]) -> MovementState {
        keys.iter()
            .fold(MovementState::new(), |s, &key| s.with(key, true))
    }

    #[test]
    fn test_forward_one_tick_moves_exactly_move_speed() {
        let mut start = state();
        start.movement = holding(&[MovementKey::Forward]);

        let next = start.tick();
        let moved = next.camera.position - start.camera.position;

        assert!(moved.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), EPSILON));
        assert!((moved.length() - start.settings.move_speed).abs() < EPSILON);
    }

    #[test]
    fn test_no_keys_no_motion() {
        let start = state();
        let next = start.tick();
        assert_eq!(next.camera.position, start.camera.position);
    }

    #[test]
    fn test_each_key_moves_along_its_axis() {
        let camera = state().camera;
        let forward = camera.forward_planar();
        let right = camera.right();
        let cases = [
            (MovementKey::Forward, forward),
            (MovementKey::Backward, -forward),
            (MovementKey::Left, -right),
            (MovementKey::Right, right),
        ];

        for (key, axis) in cases {
            let offset = movement_offset(holding(&[key]), &camera, 2.5);
            assert!(offset.abs_diff_eq(axis * 2.5, EPSILON), "{key:?}");
        }
    }

    #[test]
    fn test_orthogonal_keys_add_up() {
        let mut camera = state().camera;
        camera.rotate(37.0, 12.0, 0.01);

        let pairs = [
            (MovementKey::Forward, MovementKey::Right),
            (MovementKey::Forward, MovementKey::Left),
            (MovementKey::Backward, MovementKey::Right),
            (MovementKey::Backward, MovementKey::Left),
        ];

        for (a, b) in pairs {
            let both = movement_offset(holding(&[a, b]), &camera, 1.0);
            let sum = movement_offset(holding(&[a]), &camera, 1.0)
                + movement_offset(holding(&[b]), &camera, 1.0);
            assert!(both.abs_diff_eq(sum, EPSILON), "{a:?} + {b:?}");
        }
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let camera = state().camera;
        let offset = movement_offset(
            holding(&[MovementKey::Forward, MovementKey::Backward]),
            &camera,
            1.0,
        );
        assert!(offset.abs_diff_eq(Vec3::ZERO, EPSILON));
    }

    #[test]
    fn test_tick_advances_bob_and_spin() {
        let next = state().tick();
        assert!((next.bob.position - 20.01).abs() < EPSILON);
        assert!((next.spin - 0.01).abs() < EPSILON);
        assert_eq!(next.ticks, 1);
    }

    #[test]
    fn test_tick_preserves_overshoot() {
        let mut start = state();
        start.bob = Oscillator::new(22.0, 0.01, 20.0, 22.0);

        let next = start.tick();
        assert!((next.bob.position - 22.01).abs() < EPSILON);
        assert_eq!(next.bob.direction, Direction::Down);
    }

    #[test]
    fn test_tick_is_pure() {
        let start = state();
        let snapshot = start.clone();
        let _ = start.tick();
        assert_eq!(start, snapshot);
    }

    #[test]
    fn test_step_runs_whole_ticks() {
        let start = state();
        let interval = start.tick_interval();

        let one = start.step(interval);
        assert_eq!(one.ticks, 1);

        let half = start.step(interval * 0.5);
        assert_eq!(half.ticks, 0);
        let full = half.step(interval * 0.5);
        assert_eq!(full.ticks, 1);

        let three = start.step(interval * 3.5);
        assert_eq!(three.ticks, 3);
        assert!(three.pending_time() > 0.0);
    }

    #[test]
    fn test_step_matches_repeated_ticks() {
        let mut start = state();
        start.movement = holding(&[MovementKey::Forward, MovementKey::Right]);
        let interval = start.tick_interval();

        let stepped = start.step(interval * 4.0);
        let ticked = start.tick().tick().tick().tick();

        assert_eq!(stepped.ticks, ticked.ticks);
        assert!(stepped.camera.position.abs_diff_eq(ticked.camera.position, EPSILON));
        assert!((stepped.bob.position - ticked.bob.position).abs() < EPSILON);
    }

    #[test]
    fn test_step_drops_backlog() {
        let start = state();
        let next = start.step(10.0);
        assert_eq!(next.ticks, u64::from(MAX_TICKS_PER_STEP));
        assert_eq!(next.pending_time(), 0.0);
    }

    #[test]
    fn test_negative_dt_ignored() {
        let next = state().step(-1.0);
        assert_eq!(next.ticks, 0);
        assert_eq!(next.pending_time(), 0.0);
    }

    #[test]
    fn test_look_turns_walk_direction() {
        let mut start = state();
        start.look(100.0 * std::f32::consts::FRAC_PI_2, 0.0, 0.01);
        start.movement = holding(&[MovementKey::Forward]);

        let moved = start.tick().camera.position - start.camera.position;
        assert!(moved.abs_diff_eq(Vec3::X, 1e-3));
    }
}
