//! Viewport dimensions and the bounds derived from them.

use glam::{Vec2, Vec3};
use winit::dpi::{LogicalSize, PhysicalSize};

/// Size of the host drawing area in pixels.
///
/// Stored as floats because hosts report fractional logical sizes and every
/// consumer works in float space. Zero or negative sizes are representable
/// on purpose: they are treated as "nothing to draw".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Whether this viewport has no drawable area.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0) || !self.width.is_finite() || !self.height.is_finite()
    }

    /// Drawable area, zero for degenerate viewports.
    pub fn area(&self) -> f32 {
        if self.is_degenerate() {
            0.0
        } else {
            self.width * self.height
        }
    }

    /// Width over height, 1.0 for degenerate viewports.
    pub fn aspect(&self) -> f32 {
        if self.is_degenerate() {
            1.0
        } else {
            self.width / self.height
        }
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Integer pixel size for raster surfaces, `(0, 0)` when degenerate.
    pub fn pixel_size(&self) -> (u32, u32) {
        if self.is_degenerate() {
            (0, 0)
        } else {
            (self.width.round() as u32, self.height.round() as u32)
        }
    }

    /// Whether `p` lies in `[-margin, size + margin]` on both axes.
    pub fn contains(&self, p: Vec2, margin: f32) -> bool {
        p.x >= -margin && p.x <= self.width + margin && p.y >= -margin && p.y <= self.height + margin
    }

    /// Convert a pixel coordinate to normalized device coordinates.
    ///
    /// Origin at the center, X to the right, Y up.
    pub fn to_ndc(&self, p: Vec2) -> Vec2 {
        if self.is_degenerate() {
            return Vec2::ZERO;
        }
        Vec2::new(p.x / self.width * 2.0 - 1.0, 1.0 - p.y / self.height * 2.0)
    }
}

impl Viewport {
    /// Viewport of a window in logical pixels.
    ///
    /// Densities, radii and connector distances are tuned per logical pixel,
    /// so a HiDPI window gets the same field as a 1x one.
    pub fn logical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let size: LogicalSize<f32> = size.to_logical(scale_factor);
        Self::new(size.width, size.height)
    }
}

/// Axis-aligned scene volume centered on the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneBounds {
    pub half_extents: Vec3,
}

impl SceneBounds {
    pub const fn new(half_extents: Vec3) -> Self {
        Self { half_extents }
    }

    pub fn contains(&self, p: Vec3) -> bool {
        p.abs().cmple(self.half_extents).all()
    }
}

impl Default for SceneBounds {
    fn default() -> Self {
        Self::new(Vec3::new(25.0, 25.0, 20.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_viewports() {
        assert!(Viewport::new(0.0, 600.0).is_degenerate());
        assert!(Viewport::new(800.0, -1.0).is_degenerate());
        assert!(Viewport::new(f32::NAN, 600.0).is_degenerate());
        assert!(!Viewport::new(800.0, 600.0).is_degenerate());
        assert_eq!(Viewport::new(-5.0, 10.0).area(), 0.0);
    }

    #[test]
    fn test_logical_viewport_ignores_scale_factor() {
        let hidpi = Viewport::logical(PhysicalSize::new(1600, 1200), 2.0);
        assert_eq!(hidpi, Viewport::new(800.0, 600.0));
        assert_eq!(hidpi.area(), Viewport::logical(PhysicalSize::new(800, 600), 1.0).area());
    }

    #[test]
    fn test_ndc() {
        let vp = Viewport::new(800.0, 600.0);
        let center = vp.to_ndc(Vec2::new(400.0, 300.0));
        assert!(center.length() < 1e-6);
        assert_eq!(vp.to_ndc(Vec2::ZERO), Vec2::new(-1.0, 1.0));
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn test_scene_bounds_contains() {
        let bounds = SceneBounds::default();
        assert!(bounds.contains(Vec3::new(25.0, -25.0, 20.0)));
        assert!(!bounds.contains(Vec3::new(25.1, 0.0, 0.0)));
    }
}
