//! The 2-D particle field.

use glam::Vec2;
use tracing::debug;

use super::Population;
use crate::boundary::{bounce_anchor, clamp_to_viewport};
use crate::config::ParticleSettings;
use crate::element::Particle;
use crate::force::{ease_toward, ForceField};
use crate::pointer::PointerState;
use crate::spawn::SpawnContext;
use crate::theme::{Palette, PARTICLE_COLORS};
use crate::viewport::Viewport;

/// Particles whose count follows the viewport area.
///
/// Connector drawing is O(n²), so density is tied to area to bound the cost.
#[derive(Debug, Clone)]
pub struct ParticleField {
    settings: ParticleSettings,
    spawn: SpawnContext,
    viewport: Viewport,
    particles: Vec<Particle>,
}

impl ParticleField {
    pub fn new(settings: ParticleSettings, seed: Option<u64>) -> Self {
        Self {
            settings,
            spawn: SpawnContext::new(seed),
            viewport: Viewport::default(),
            particles: Vec::new(),
        }
    }

    /// Mutable access for tests and tools that place particles by hand.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Allocated capacity, exposed so rebuild reuse can be checked.
    pub fn capacity(&self) -> usize {
        self.particles.capacity()
    }

    fn spawn_particle(&mut self) -> Particle {
        let s = &self.settings;
        let (size_lo, size_hi) = (s.size_range[0], s.size_range[1]);
        let (dens_lo, dens_hi) = (s.density_range[0], s.density_range[1]);
        let max_drift = s.max_drift;

        let anchor = self.spawn.in_rect(self.viewport.size());
        let velocity = self.spawn.symmetric2(max_drift);
        let size = self.spawn.range(size_lo..size_hi);
        let density = self.spawn.range(dens_lo..dens_hi);
        let color_index = self.spawn.index(PARTICLE_COLORS);
        Particle::at_rest(anchor, velocity, size, density, color_index)
    }
}

impl Population for ParticleField {
    type Element = Particle;

    fn rebuild(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.particles.clear();
        let count = self.settings.target_count(viewport);
        self.particles.reserve(count);
        for _ in 0..count {
            let particle = self.spawn_particle();
            self.particles.push(particle);
        }
        debug!(
            count,
            width = viewport.width,
            height = viewport.height,
            "rebuilt particle field"
        );
    }

    fn resized(&mut self, viewport: Viewport) {
        self.rebuild(viewport);
    }

    fn step(&mut self, dt: f32, pointer: &PointerState) {
        let force = ForceField::linear(pointer.influence_radius);
        let pointer_pos = pointer.position();
        let relaxation = self.settings.relaxation;
        let margin = self.settings.display_margin();
        let viewport = self.viewport;

        for p in &mut self.particles {
            let push = force.repulsion(p.position, pointer_pos, p.density);

            p.anchor += p.velocity * dt;
            if push != Vec2::ZERO {
                p.position += push * dt;
            } else {
                p.position = ease_toward(p.position, p.anchor, relaxation, dt);
            }

            bounce_anchor(p.anchor, &mut p.velocity, viewport);
            p.position = clamp_to_viewport(p.position, viewport, margin);
        }
    }

    fn apply_palette(&mut self, _palette: &Palette) {
        // Particles store a palette index; the renderer resolves colors.
    }

    fn elements(&self) -> &[Particle] {
        &self.particles
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field() -> ParticleField {
        ParticleField::new(ParticleSettings::default(), Some(9))
    }

    #[test]
    fn test_rebuild_count_follows_area() {
        let mut field = field();
        field.rebuild(Viewport::new(800.0, 600.0));
        assert_eq!(field.len(), 53);

        field.rebuild(Viewport::new(1920.0, 1080.0));
        assert_eq!(field.len(), 230);
    }

    #[test]
    fn test_degenerate_viewport_is_empty() {
        let mut field = field();
        field.rebuild(Viewport::new(800.0, 600.0));
        field.resized(Viewport::new(0.0, 0.0));
        assert!(field.is_empty());

        field.step(1.0, &PointerState::at(Vec2::ZERO, 150.0));
        assert!(field.is_empty());
    }

    #[test]
    fn test_spawned_attributes_in_range() {
        let mut field = field();
        field.rebuild(Viewport::new(1024.0, 768.0));
        for p in field.elements() {
            assert_eq!(p.position, p.anchor);
            assert!(p.size >= 1.0 && p.size < 4.0);
            assert!(p.density >= 1.0 && p.density < 31.0);
            assert!(p.velocity.abs().max_element() <= 0.25);
            assert!(p.color_index < PARTICLE_COLORS);
        }
    }

    #[test]
    fn test_pointer_pushes_then_particle_settles() {
        let mut settings = ParticleSettings::default();
        settings.max_drift = 0.0;
        let mut field = ParticleField::new(settings, Some(3));
        field.rebuild(Viewport::new(800.0, 600.0));
        let anchor = Vec2::new(410.0, 305.0);
        field.particles_mut()[0] = Particle::at_rest(anchor, Vec2::ZERO, 2.0, 10.0, 0);

        let mut pointer = PointerState::at(Vec2::new(400.0, 300.0), 150.0);
        field.step(1.0, &pointer);
        let pushed = field.elements()[0].position;
        assert!(pushed.distance(Vec2::new(400.0, 300.0)) > anchor.distance(Vec2::new(400.0, 300.0)));

        pointer.clear();
        for _ in 0..200 {
            field.step(1.0, &pointer);
        }
        assert!(field.elements()[0].displacement() < 0.01);
    }
}
