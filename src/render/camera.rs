//! Perspective camera for the shape field.

use glam::{Mat4, Vec2, Vec3, Vec4Swizzles};

use crate::viewport::Viewport;

/// Orbit camera looking at `target` from `distance` away.
///
/// With zero yaw and pitch it sits on the +Z axis, which is how the shape
/// field is framed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    /// Horizontal rotation angle in radians.
    pub yaw: f32,
    /// Vertical rotation angle in radians.
    pub pitch: f32,
    /// Distance from the target point.
    pub distance: f32,
    /// Point the camera orbits around.
    pub target: Vec3,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
    /// Width over height; follows the viewport.
    pub aspect: f32,
}

impl Camera {
    pub fn new(distance: f32, fov_degrees: f32) -> Self {
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance,
            target: Vec3::ZERO,
            fov_y: fov_degrees.to_radians(),
            near: 0.1,
            far: 1000.0,
            aspect: 1.0,
        }
    }

    /// Calculate the camera's world position.
    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + Vec3::new(x, y, z)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Match the aspect ratio to a new viewport.
    pub fn resize(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }

    /// Project a world point to pixel coordinates.
    ///
    /// Returns the pixel position and the view-space depth, or `None` for
    /// points at or behind the near plane.
    pub fn project(&self, view_proj: &Mat4, world: Vec3, viewport: Viewport) -> Option<(Vec2, f32)> {
        let clip = *view_proj * world.extend(1.0);
        if clip.w < self.near {
            return None;
        }
        let ndc = clip.xy() / clip.w;
        let screen = Vec2::new(
            (ndc.x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc.y) * 0.5 * viewport.height,
        );
        Some((screen, clip.w))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(15.0, 75.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_sits_on_z_axis() {
        let camera = Camera::default();
        assert_relative_eq!(camera.position().x, 0.0);
        assert_relative_eq!(camera.position().y, 0.0);
        assert_relative_eq!(camera.position().z, 15.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let mut camera = Camera::default();
        let viewport = Viewport::new(800.0, 600.0);
        camera.resize(viewport);
        let vp = camera.view_proj();

        let (screen, depth) = camera.project(&vp, Vec3::ZERO, viewport).unwrap();
        assert_relative_eq!(screen.x, 400.0, epsilon = 1e-3);
        assert_relative_eq!(screen.y, 300.0, epsilon = 1e-3);
        assert_relative_eq!(depth, 15.0, epsilon = 1e-3);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::default();
        let viewport = Viewport::new(100.0, 100.0);
        let vp = camera.view_proj();
        let (screen, _) = camera.project(&vp, Vec3::new(0.0, 1.0, 0.0), viewport).unwrap();
        assert!(screen.y < 50.0);
    }

    #[test]
    fn test_behind_camera_is_culled() {
        let camera = Camera::default();
        let vp = camera.view_proj();
        assert!(camera.project(&vp, Vec3::new(0.0, 0.0, 20.0), Viewport::new(10.0, 10.0)).is_none());
    }
}
