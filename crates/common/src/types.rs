use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Spatial transform: translation, axis-angle rotation, uniform-or-not scale.
///
/// The composed matrix is `translate · rotate · scale`, so scale is applied
/// in mesh space first and translation last.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    /// Build a transform from a translation, a rotation of `angle` radians
    /// about `axis` and a uniform scale factor.
    ///
    /// The axis is normalized; a zero axis yields no rotation.
    pub fn from_axis_angle(position: Vec3, axis: Vec3, angle: f32, scale: f32) -> Self {
        let rotation = axis
            .try_normalize()
            .map(|axis| Quat::from_axis_angle(axis, angle))
            .unwrap_or(Quat::IDENTITY);
        Self {
            position,
            rotation,
            scale: Vec3::splat(scale),
        }
    }

    /// Model matrix for this transform.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }
}

/// Axis-aligned rectangle in window pixel coordinates (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl ScreenRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive point-in-rectangle test: points on any edge are inside.
    pub fn contains(&self, px: f64, py: f64) -> bool {
        let (x, y) = (self.x as f64, self.y as f64);
        px >= x && px <= x + self.width as f64 && py >= y && py <= y + self.height as f64
    }
}

/// Drawable surface size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; a zero height is treated as one pixel.
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_default_is_identity() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.matrix(), Mat4::IDENTITY);
    }

    #[test]
    fn transform_matrix_is_translate_rotate_scale() {
        let axis = Vec3::new(1.0, 0.3, 0.5);
        let t = Transform::from_axis_angle(Vec3::new(1.0, -2.0, 3.0), axis, 0.7, 0.25);
        let expected = Mat4::from_translation(Vec3::new(1.0, -2.0, 3.0))
            * Mat4::from_axis_angle(axis.normalize(), 0.7)
            * Mat4::from_scale(Vec3::splat(0.25));
        assert!(t.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn zero_axis_means_no_rotation() {
        let t = Transform::from_axis_angle(Vec3::ZERO, Vec3::ZERO, 1.0, 1.0);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn rect_hit_test_is_inclusive() {
        let rect = ScreenRect::new(100.0, 100.0, 200.0, 200.0);
        assert!(rect.contains(150.0, 150.0));
        assert!(!rect.contains(50.0, 50.0));
        assert!(rect.contains(100.0, 100.0));
        assert!(rect.contains(300.0, 300.0));
        assert!(!rect.contains(300.5, 150.0));
    }

    #[test]
    fn viewport_aspect_ratio() {
        assert_eq!(Viewport::new(800, 600).aspect_ratio(), 800.0 / 600.0);
        assert_eq!(Viewport::new(800, 0).aspect_ratio(), 800.0);
    }
}
