//! Backend A: filled circles plus proximity connectors.

use glam::{Vec2, Vec3};
use tracing::debug;

use super::surface::Surface;
use super::{FrameInfo, Renderer};
use crate::element::Particle;
use crate::error::RenderError;
use crate::theme::{Palette, PARTICLE_COLORS};
use crate::viewport::Viewport;

/// Visit every unique pair closer than `threshold`.
///
/// The callback receives both indices and the connector opacity
/// `1 - d / threshold`, which is 1 at distance zero and never reaches 0.
pub fn for_each_connection(positions: &[Vec2], threshold: f32, mut f: impl FnMut(usize, usize, f32)) {
    if !(threshold > 0.0) {
        return;
    }
    let threshold_sq = threshold * threshold;
    for a in 0..positions.len() {
        for b in (a + 1)..positions.len() {
            let d_sq = positions[a].distance_squared(positions[b]);
            if d_sq < threshold_sq {
                f(a, b, 1.0 - d_sq.sqrt() / threshold);
            }
        }
    }
}

/// Palette-derived paint, cached until the palette version changes.
#[derive(Debug, Clone, PartialEq)]
struct Paint {
    version: u64,
    background: [Vec3; 2],
    fills: [Vec3; PARTICLE_COLORS],
    connection_color: Vec3,
    connection_alpha: f32,
}

impl Paint {
    fn from_palette(palette: &Palette) -> Self {
        Self {
            version: palette.version,
            background: palette.background,
            fills: palette.particle_colors,
            connection_color: palette.connection_color,
            connection_alpha: palette.connection_alpha,
        }
    }
}

/// Draws a [`crate::ParticleField`] onto any [`Surface`].
pub struct ParticleRenderer<S: Surface> {
    surface: S,
    connection_distance: f32,
    paint: Option<Paint>,
    positions: Vec<Vec2>,
}

impl<S: Surface> ParticleRenderer<S> {
    pub fn new(surface: S, connection_distance: f32) -> Self {
        Self {
            surface,
            connection_distance,
            paint: None,
            positions: Vec::new(),
        }
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Palette version the cached paint was derived from.
    pub fn paint_version(&self) -> Option<u64> {
        self.paint.as_ref().map(|p| p.version)
    }

    fn refresh_paint(&mut self, palette: &Palette) -> &Paint {
        let stale = self.paint.as_ref().map_or(true, |p| p.version != palette.version);
        if stale {
            debug!(mode = ?palette.mode, version = palette.version, "particle paint re-derived");
        }
        let paint = match self.paint.take() {
            Some(paint) if !stale => paint,
            _ => Paint::from_palette(palette),
        };
        self.paint.insert(paint)
    }
}

impl<S: Surface> Renderer for ParticleRenderer<S> {
    type Element = Particle;

    fn is_available(&self) -> bool {
        self.surface.is_available()
    }

    fn resize(&mut self, viewport: Viewport) {
        self.surface.resize(viewport);
    }

    fn draw(&mut self, elements: &[Particle], palette: &Palette, _frame: &FrameInfo) -> Result<(), RenderError> {
        let paint = self.refresh_paint(palette).clone();

        self.positions.clear();
        self.positions.extend(elements.iter().map(|p| p.position));

        let canvas = self.surface.canvas()?;
        canvas.clear_gradient(paint.background[0], paint.background[1]);

        for p in elements {
            let fill = paint.fills[p.color_index % PARTICLE_COLORS];
            canvas.fill_circle(p.position, p.size, fill, 1.0);
        }

        let positions = &self.positions;
        for_each_connection(positions, self.connection_distance, |a, b, opacity| {
            canvas.stroke_line(
                positions[a],
                positions[b],
                paint.connection_color,
                opacity * paint.connection_alpha,
            );
        });

        self.surface.present()
    }

    fn release(&mut self) {
        self.surface.release();
        self.paint = None;
    }
}
