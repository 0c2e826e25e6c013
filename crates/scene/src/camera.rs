use glam::{Mat4, Vec3};

/// Closest the camera may orbit to its target.
pub const MIN_RADIUS: f32 = 1.0;
/// Vertical field of view of the perspective projection, in degrees.
pub const FOV_Y_DEGREES: f32 = 45.0;
pub const Z_NEAR: f32 = 0.1;
pub const Z_FAR: f32 = 100.0;
/// Speed multiplier applied while the boost input is held.
pub const BOOST_MULTIPLIER: f32 = 2.0;

/// Directional input for one tick, already resolved from key bindings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CameraInput {
    /// Decrease the orbit angle.
    pub left: bool,
    /// Increase the orbit angle.
    pub right: bool,
    /// Move toward the target.
    pub closer: bool,
    /// Move away from the target.
    pub farther: bool,
    pub boost: bool,
}

/// Orbit camera circling a fixed target in the XZ plane.
///
/// Position is `(radius·cos(angle), 0, radius·sin(angle))` relative to the
/// origin target; world up is +Y, which is never parallel to the view
/// direction because the camera stays on the horizontal plane at a radius of
/// at least [`MIN_RADIUS`].
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    radius: f32,
    speed: f32,
    angle: f32,
    automatic: bool,
    speed_multiplier: f32,
    target: Vec3,
    up: Vec3,
    position: Vec3,
    view: Mat4,
}

impl OrbitCamera {
    /// Camera at angle 0 in manual mode. `radius` is clamped to [`MIN_RADIUS`].
    pub fn new(radius: f32, speed: f32) -> Self {
        let mut camera = Self {
            radius: radius.max(MIN_RADIUS),
            speed,
            angle: 0.0,
            automatic: false,
            speed_multiplier: 1.0,
            target: Vec3::ZERO,
            up: Vec3::Y,
            position: Vec3::ZERO,
            view: Mat4::IDENTITY,
        };
        camera.refresh();
        camera
    }

    /// Flip between automatic and manual orbit.
    pub fn toggle_mode(&mut self) {
        self.automatic = !self.automatic;
    }

    /// Advance the automatic orbit by `dt` seconds. No-op in manual mode.
    pub fn update(&mut self, dt: f32) {
        if self.automatic {
            self.angle += self.speed * dt * self.speed_multiplier;
            self.refresh();
        }
    }

    /// Apply directional input for one tick.
    ///
    /// Runs in both modes, so manual input also applies on top of the
    /// automatic advance. The boost multiplier is latched before the
    /// directional keys are read and persists until the next call.
    pub fn process_input(&mut self, input: CameraInput, dt: f32) {
        self.speed_multiplier = if input.boost { BOOST_MULTIPLIER } else { 1.0 };
        let step = self.speed * dt * self.speed_multiplier;

        if input.left {
            self.angle -= step;
        }
        if input.right {
            self.angle += step;
        }
        if input.closer {
            self.radius = (self.radius - step).max(MIN_RADIUS);
        }
        if input.farther {
            self.radius += step;
        }

        self.refresh();
    }

    /// Cached view matrix from the last update.
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    /// Perspective projection for `aspect_ratio`; independent of camera state.
    pub fn projection_matrix(&self, aspect_ratio: f32) -> Mat4 {
        Mat4::perspective_rh(FOV_Y_DEGREES.to_radians(), aspect_ratio, Z_NEAR, Z_FAR)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    fn refresh(&mut self) {
        self.position = self.target
            + Vec3::new(
                self.radius * self.angle.cos(),
                0.0,
                self.radius * self.angle.sin(),
            );
        self.view = Mat4::look_at_rh(self.position, self.target, self.up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expected_view(radius: f32, angle: f32) -> Mat4 {
        Mat4::look_at_rh(
            Vec3::new(radius * angle.cos(), 0.0, radius * angle.sin()),
            Vec3::ZERO,
            Vec3::Y,
        )
    }

    #[test]
    fn construction_derives_position_and_view() {
        let cam = OrbitCamera::new(10.0, 1.0);
        assert_eq!(cam.position(), Vec3::new(10.0, 0.0, 0.0));
        assert_eq!(cam.view_matrix(), expected_view(10.0, 0.0));
        assert!(!cam.is_automatic());
        assert_eq!(cam.speed_multiplier(), 1.0);
    }

    #[test]
    fn construction_clamps_radius() {
        let cam = OrbitCamera::new(0.0, 1.0);
        assert_eq!(cam.radius(), MIN_RADIUS);
        assert!(!cam.view_matrix().is_nan());
    }

    #[test]
    fn manual_update_is_noop_then_automatic_advances() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        cam.update(1.0);
        assert_eq!(cam.angle(), 0.0);
        assert_eq!(cam.position(), Vec3::new(10.0, 0.0, 0.0));

        cam.toggle_mode();
        cam.update(1.0);
        assert_eq!(cam.angle(), 1.0);
        let expected = Vec3::new(10.0 * 1.0_f32.cos(), 0.0, 10.0 * 1.0_f32.sin());
        assert!(cam.position().abs_diff_eq(expected, 1e-6));
        assert_eq!(cam.view_matrix(), expected_view(10.0, 1.0));
    }

    #[test]
    fn toggle_twice_restores_mode() {
        let mut cam = OrbitCamera::new(5.0, 1.0);
        let before = cam.is_automatic();
        cam.toggle_mode();
        assert_ne!(cam.is_automatic(), before);
        cam.toggle_mode();
        assert_eq!(cam.is_automatic(), before);
    }

    #[test]
    fn view_tracks_radius_and_angle_after_input() {
        let mut cam = OrbitCamera::new(8.0, 1.5);
        let inputs = [
            CameraInput { left: true, ..Default::default() },
            CameraInput { right: true, boost: true, ..Default::default() },
            CameraInput { farther: true, ..Default::default() },
            CameraInput { closer: true, left: true, ..Default::default() },
        ];
        for input in inputs {
            cam.process_input(input, 0.25);
            assert_eq!(cam.view_matrix(), expected_view(cam.radius(), cam.angle()));
        }
    }

    #[test]
    fn left_decreases_and_right_increases_angle() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        cam.process_input(CameraInput { left: true, ..Default::default() }, 0.5);
        assert_eq!(cam.angle(), -0.5);
        cam.process_input(CameraInput { right: true, ..Default::default() }, 1.0);
        assert_eq!(cam.angle(), 0.5);
    }

    #[test]
    fn radius_never_drops_below_floor() {
        let mut cam = OrbitCamera::new(3.0, 2.0);
        let closer = CameraInput { closer: true, ..Default::default() };
        let farther = CameraInput { farther: true, ..Default::default() };
        let pattern = [closer, closer, farther, closer, closer, closer, farther, closer];
        for _ in 0..50 {
            for input in pattern {
                cam.process_input(input, 0.3);
                assert!(cam.radius() >= MIN_RADIUS);
            }
        }
        assert_eq!(cam.radius(), MIN_RADIUS);
    }

    #[test]
    fn boost_doubles_step_and_resets() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        cam.process_input(CameraInput { right: true, boost: true, ..Default::default() }, 1.0);
        assert_eq!(cam.angle(), 2.0);
        assert_eq!(cam.speed_multiplier(), BOOST_MULTIPLIER);

        cam.process_input(CameraInput::default(), 1.0);
        assert_eq!(cam.speed_multiplier(), 1.0);
    }

    #[test]
    fn boost_applies_to_automatic_orbit() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        cam.toggle_mode();
        cam.process_input(CameraInput { boost: true, ..Default::default() }, 0.0);
        cam.update(1.0);
        assert_eq!(cam.angle(), 2.0);
    }

    #[test]
    fn manual_input_applies_in_automatic_mode() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        cam.toggle_mode();
        cam.update(1.0);
        cam.process_input(CameraInput { left: true, ..Default::default() }, 1.0);
        assert_eq!(cam.angle(), 0.0);
        assert_eq!(cam.view_matrix(), expected_view(10.0, 0.0));
    }

    #[test]
    fn projection_is_pure_function_of_aspect() {
        let mut cam = OrbitCamera::new(10.0, 1.0);
        let a = cam.projection_matrix(4.0 / 3.0);
        cam.toggle_mode();
        cam.update(3.0);
        cam.process_input(CameraInput { farther: true, ..Default::default() }, 1.0);
        let b = cam.projection_matrix(4.0 / 3.0);
        assert_eq!(a, b);
        assert_eq!(
            a,
            Mat4::perspective_rh(45.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0)
        );
    }
}
