//! The 3-D floating-shape field.

use glam::{Vec2, Vec3};
use std::f32::consts::TAU;
use tracing::debug;

use super::Population;
use crate::boundary::wrap_position;
use crate::config::ShapeSettings;
use crate::element::{FloatingShape, ShapeKind};
use crate::force::ForceField;
use crate::pointer::PointerState;
use crate::spawn::SpawnContext;
use crate::theme::Palette;
use crate::viewport::{SceneBounds, Viewport};

/// Base drift and spin per axis per frame, before the speed multiplier.
const BASE_SPEED: f32 = 0.01;

/// A fixed number of lit shapes drifting inside a wrapped scene volume.
#[derive(Debug, Clone)]
pub struct ShapeField {
    settings: ShapeSettings,
    bounds: SceneBounds,
    spawn: SpawnContext,
    viewport: Viewport,
    palette: Palette,
    shapes: Vec<FloatingShape>,
}

impl ShapeField {
    pub fn new(settings: ShapeSettings, seed: Option<u64>) -> Self {
        Self {
            bounds: settings.bounds(),
            settings,
            spawn: SpawnContext::new(seed),
            viewport: Viewport::default(),
            palette: Palette::dark(),
            shapes: Vec::new(),
        }
    }

    pub fn bounds(&self) -> SceneBounds {
        self.bounds
    }

    pub fn shapes_mut(&mut self) -> &mut [FloatingShape] {
        &mut self.shapes
    }

    pub fn capacity(&self) -> usize {
        self.shapes.capacity()
    }

    /// Pointer position projected onto the scene's z = 0 plane.
    pub fn pointer_in_scene(&self, pointer: &PointerState) -> Option<Vec2> {
        pointer
            .position()
            .filter(|_| !self.viewport.is_degenerate())
            .map(|p| self.viewport.to_ndc(p) * self.settings.pointer_scale)
    }

    fn spawn_shape(&mut self) -> FloatingShape {
        let h = self.bounds.half_extents;
        let speed = BASE_SPEED * self.settings.speed_multiplier;

        let kind = ShapeKind::ALL[self.spawn.index(ShapeKind::ALL.len())];
        // Biased toward the back of the volume, like a receding field.
        let position = self.spawn.in_box(-h.x..h.x, -h.y..h.y, -h.z..h.z * 0.5);
        let rotation = self.spawn.euler();
        let scale = self.spawn.range(0.5..1.5);
        let velocity = self.spawn.symmetric3(speed);
        let angular_velocity = self.spawn.symmetric3(speed);

        FloatingShape {
            kind,
            position,
            velocity,
            rotation,
            angular_velocity,
            scale,
            material: *self.palette.material(kind.material_slot()),
        }
    }
}

impl Population for ShapeField {
    type Element = FloatingShape;

    fn rebuild(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.shapes.clear();
        if viewport.is_degenerate() {
            debug!("degenerate viewport, shape field left empty");
            return;
        }
        let count = self.settings.count;
        self.shapes.reserve(count);
        for _ in 0..count {
            let shape = self.spawn_shape();
            self.shapes.push(shape);
        }
        debug!(count, "rebuilt shape field");
    }

    /// The count is fixed, so a resize only changes the pointer projection,
    /// unless the field was or becomes degenerate.
    fn resized(&mut self, viewport: Viewport) {
        let was_degenerate = self.viewport.is_degenerate();
        if was_degenerate || viewport.is_degenerate() {
            self.rebuild(viewport);
        } else {
            self.viewport = viewport;
        }
    }

    fn step(&mut self, dt: f32, pointer: &PointerState) {
        let nudge = ForceField::nudge(self.settings.proximity, self.settings.nudge);
        let pointer_scene = self.pointer_in_scene(pointer);
        let bounds = self.bounds;

        for shape in &mut self.shapes {
            let spun = shape.rotation + shape.angular_velocity * dt;
            shape.rotation = Vec3::new(
                spun.x.rem_euclid(TAU),
                spun.y.rem_euclid(TAU),
                spun.z.rem_euclid(TAU),
            );

            shape.position += shape.velocity * dt;
            shape.position += nudge.repulsion_xy(shape.position, pointer_scene) * dt;

            wrap_position(&mut shape.position, bounds);
        }
    }

    fn apply_palette(&mut self, palette: &Palette) {
        self.palette = palette.clone();
        for shape in &mut self.shapes {
            shape.retint(palette);
        }
    }

    fn elements(&self) -> &[FloatingShape] {
        &self.shapes
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}
