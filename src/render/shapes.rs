//! Backend B: lit, translucent 3-D shapes.
//!
//! Triangles are transformed, back-face culled, shaded flat at their
//! centroid, then painted far to near onto the canvas.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};
use std::cmp::Ordering;
use tracing::debug;

use super::camera::Camera;
use super::lighting::{shade, LightRig};
use super::mesh::ShapeCatalog;
use super::surface::Surface;
use super::{FrameInfo, Renderer};
use crate::config::ShapeSettings;
use crate::element::FloatingShape;
use crate::error::RenderError;
use crate::theme::Palette;
use crate::viewport::Viewport;

/// One projected, shaded triangle waiting for the painter's sort.
#[derive(Debug, Clone, Copy)]
struct Splat {
    depth: f32,
    screen: [Vec2; 3],
    color: Vec3,
    alpha: f32,
}

/// Model transform of a shape: scale, then XYZ Euler rotation, then translation.
pub fn model_matrix(shape: &FloatingShape) -> Mat4 {
    let r = shape.rotation;
    Mat4::from_scale_rotation_translation(
        Vec3::splat(shape.scale),
        Quat::from_euler(EulerRot::XYZ, r.x, r.y, r.z),
        shape.position,
    )
}

/// Draws a [`crate::ShapeField`] onto any [`Surface`].
pub struct ShapeRenderer<S: Surface> {
    surface: S,
    catalog: ShapeCatalog,
    camera: Camera,
    lights: LightRig,
    viewport: Viewport,
    palette_version: Option<u64>,
    background: [Vec3; 2],
    splats: Vec<Splat>,
}

impl<S: Surface> ShapeRenderer<S> {
    pub fn new(surface: S, settings: &ShapeSettings) -> Self {
        let palette = Palette::dark();
        Self {
            surface,
            catalog: ShapeCatalog::new(),
            camera: Camera::new(settings.camera_distance, settings.fov_degrees),
            lights: LightRig::new(settings.light_orbit_rate, &palette),
            viewport: Viewport::default(),
            palette_version: None,
            background: palette.background,
            splats: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn lights(&self) -> &LightRig {
        &self.lights
    }

    /// Triangles painted in the last frame.
    pub fn last_triangle_count(&self) -> usize {
        self.splats.len()
    }

    fn refresh_palette(&mut self, palette: &Palette) {
        if self.palette_version == Some(palette.version) {
            return;
        }
        self.lights.apply_palette(palette);
        self.background = palette.background;
        self.palette_version = Some(palette.version);
        debug!(mode = ?palette.mode, version = palette.version, "shape lighting re-derived");
    }

    fn collect_splats(&mut self, shapes: &[FloatingShape]) {
        self.splats.clear();
        let view_proj = self.camera.view_proj();
        let eye = self.camera.position();

        for shape in shapes {
            let model = model_matrix(shape);
            let rotation = Quat::from_euler(EulerRot::XYZ, shape.rotation.x, shape.rotation.y, shape.rotation.z);
            let material = &shape.material;

            for tri in self.catalog.mesh(shape.kind).triangles() {
                let world = tri.vertices.map(|v| model.transform_point3(v));
                let normal = rotation * tri.normal;
                let centroid = (world[0] + world[1] + world[2]) / 3.0;
                if normal.dot(eye - centroid) <= 0.0 {
                    continue;
                }

                let mut screen = [Vec2::ZERO; 3];
                let mut depth = 0.0;
                let mut visible = true;
                for (slot, v) in screen.iter_mut().zip(world) {
                    match self.camera.project(&view_proj, v, self.viewport) {
                        Some((p, d)) => {
                            *slot = p;
                            depth += d;
                        }
                        None => visible = false,
                    }
                }
                if !visible {
                    continue;
                }

                self.splats.push(Splat {
                    depth: depth / 3.0,
                    screen,
                    color: shade(material, centroid, normal, eye, &self.lights),
                    alpha: material.opacity,
                });
            }
        }

        // Far first, so nearer translucent faces blend over farther ones.
        self.splats
            .sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap_or(Ordering::Equal));
    }
}

impl<S: Surface> Renderer for ShapeRenderer<S> {
    type Element = FloatingShape;

    fn is_available(&self) -> bool {
        self.surface.is_available()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.camera.resize(viewport);
        self.surface.resize(viewport);
    }

    fn draw(&mut self, elements: &[FloatingShape], palette: &Palette, frame: &FrameInfo) -> Result<(), RenderError> {
        self.refresh_palette(palette);
        self.lights.update(frame.elapsed);

        if self.viewport.is_degenerate() {
            self.splats.clear();
        } else {
            self.collect_splats(elements);
        }

        let canvas = self.surface.canvas()?;
        canvas.clear_gradient(self.background[0], self.background[1]);
        for splat in &self.splats {
            canvas.fill_triangle(splat.screen, splat.color, splat.alpha);
        }

        self.surface.present()
    }

    fn release(&mut self) {
        self.surface.release();
        self.splats = Vec::new();
        self.palette_version = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ShapeKind;
    use crate::render::OffscreenSurface;
    use crate::theme::{MaterialSlot, ThemeAdapter, ThemeMode};

    fn renderer(viewport: Viewport) -> ShapeRenderer<OffscreenSurface> {
        let mut renderer = ShapeRenderer::new(OffscreenSurface::new(viewport), &ShapeSettings::default());
        renderer.resize(viewport);
        renderer
    }

    fn ball_at(position: Vec3) -> FloatingShape {
        let palette = Palette::dark();
        FloatingShape {
            kind: ShapeKind::Ball,
            position,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            scale: 2.0,
            material: *palette.material(MaterialSlot::Yellow),
        }
    }

    #[test]
    fn test_model_matrix_places_shape() {
        let shape = ball_at(Vec3::new(1.0, 2.0, 3.0));
        let p = model_matrix(&shape).transform_point3(Vec3::X);
        assert!((p - Vec3::new(3.0, 2.0, 3.0)).length() < 1e-5);
    }

    #[test]
    fn test_centered_ball_covers_screen_center() {
        let viewport = Viewport::new(120.0, 90.0);
        let mut renderer = renderer(viewport);
        let adapter = ThemeAdapter::new(ThemeMode::Dark);

        renderer
            .draw(&[ball_at(Vec3::ZERO)], adapter.palette(), &FrameInfo::default())
            .unwrap();

        assert!(renderer.last_triangle_count() > 0);
        let frame = renderer.surface().frame().unwrap();
        let center = frame.pixel(60, 45).unwrap();
        let corner = frame.pixel(0, 0).unwrap();
        assert_ne!(center, corner);
        assert_eq!(corner, [0x11, 0x18, 0x27, 255]);
    }

    #[test]
    fn test_shape_behind_camera_is_skipped() {
        let viewport = Viewport::new(64.0, 64.0);
        let mut renderer = renderer(viewport);
        renderer
            .draw(&[ball_at(Vec3::new(0.0, 0.0, 18.0))], &Palette::dark(), &FrameInfo::default())
            .unwrap();
        assert_eq!(renderer.last_triangle_count(), 0);
    }

    #[test]
    fn test_back_faces_culled() {
        let viewport = Viewport::new(64.0, 64.0);
        let mut renderer = renderer(viewport);
        let total = ShapeCatalog::new().mesh(ShapeKind::Ball).len();
        renderer
            .draw(&[ball_at(Vec3::ZERO)], &Palette::dark(), &FrameInfo::default())
            .unwrap();
        assert!(renderer.last_triangle_count() < total);
    }

    #[test]
    fn test_theme_change_swaps_lights() {
        let viewport = Viewport::new(32.0, 32.0);
        let mut renderer = renderer(viewport);
        let mut adapter = ThemeAdapter::new(ThemeMode::Dark);
        renderer.draw(&[], adapter.palette(), &FrameInfo::default()).unwrap();

        adapter.set_mode(ThemeMode::Light);
        renderer.draw(&[], adapter.palette(), &FrameInfo::default()).unwrap();
        assert_eq!(renderer.lights().lights[0].color, Palette::light().point_lights[0].color);
        let frame = renderer.surface().frame().unwrap();
        assert_eq!(frame.pixel(0, 0), Some([0x81, 0x8c, 0xf8, 255]));
    }
}
