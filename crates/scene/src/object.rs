use glam::{Mat4, Vec3};

/// Held directional input for the moving object, along fixed world axes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ObjectInput {
    pub pos_x: bool,
    pub neg_x: bool,
    pub pos_y: bool,
    pub neg_y: bool,
    pub pos_z: bool,
    pub neg_z: bool,
}

impl ObjectInput {
    /// Sum of the active axis directions; opposing keys cancel out.
    pub fn direction(&self) -> Vec3 {
        let axis = |pos: bool, neg: bool| match (pos, neg) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        Vec3::new(
            axis(self.pos_x, self.neg_x),
            axis(self.pos_y, self.neg_y),
            axis(self.pos_z, self.neg_z),
        )
    }
}

/// A single object translated by world-axis input, independent of the camera.
///
/// Its model matrix applies a fixed mesh-space correction (scale, then a
/// rotation about a fixed axis) before translating to the current position.
#[derive(Debug, Clone)]
pub struct MovingObject {
    position: Vec3,
    move_speed: f32,
    mesh_scale: f32,
    mesh_rotation_axis: Vec3,
    mesh_rotation: f32,
}

impl MovingObject {
    /// Object at the origin. `mesh_rotation_degrees` is about `mesh_rotation_axis`.
    pub fn new(
        move_speed: f32,
        mesh_scale: f32,
        mesh_rotation_axis: Vec3,
        mesh_rotation_degrees: f32,
    ) -> Self {
        Self {
            position: Vec3::ZERO,
            move_speed,
            mesh_scale,
            mesh_rotation_axis: mesh_rotation_axis.try_normalize().unwrap_or(Vec3::Y),
            mesh_rotation: mesh_rotation_degrees.to_radians(),
        }
    }

    /// Translate by `move_speed · dt` along each held axis.
    pub fn process_input(&mut self, input: ObjectInput, dt: f32) {
        self.position += input.direction() * self.move_speed * dt;
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// `translate(position) · scale(mesh_scale) · rotate(mesh_rotation, axis)`.
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.position)
            * Mat4::from_scale(Vec3::splat(self.mesh_scale))
            * Mat4::from_axis_angle(self.mesh_rotation_axis, self.mesh_rotation)
    }
}

impl Default for MovingObject {
    fn default() -> Self {
        Self::new(5.0, 0.001, Vec3::Y, 90.0)
    }
}
