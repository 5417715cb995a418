//! Integration tests for field behavior over many steps.
//!
//! These drive the populations through their public API only, the way the
//! engine does, and check the properties that must hold on every frame.

use approx::assert_relative_eq;
use backdrop::force::{Falloff, ForceField};
use backdrop::{
    Particle, ParticleField, ParticleSettings, PointerState, Population, ShapeField, ShapeSettings, Viewport,
};
use glam::{Vec2, Vec3};

const VIEWPORT: Viewport = Viewport::new(800.0, 600.0);

/// Deterministic pointer path sweeping the viewport, leaving it now and then.
fn pointer_at(step: usize) -> PointerState {
    if step % 97 > 80 {
        return PointerState::new(150.0);
    }
    let t = step as f32 * 0.05;
    let p = Vec2::new(400.0 + 380.0 * t.sin(), 300.0 + 280.0 * (t * 1.3).cos());
    PointerState::at(p, 150.0)
}

// ============================================================================
// Boundary containment
// ============================================================================

#[test]
fn test_particle_anchors_stay_in_viewport() {
    let settings = ParticleSettings::default();
    let mut field = ParticleField::new(settings, Some(42));
    field.rebuild(VIEWPORT);

    // An anchor may overshoot by one step of drift before it is turned around.
    let drift_margin = settings.max_drift + 1e-3;
    for step in 0..3000 {
        field.step(1.0, &pointer_at(step));
        for p in field.elements() {
            assert!(VIEWPORT.contains(p.anchor, drift_margin), "anchor {:?} escaped at step {step}", p.anchor);
            assert!(VIEWPORT.contains(p.position, settings.display_margin()));
        }
    }
}

#[test]
fn test_large_steps_stay_contained() {
    let settings = ParticleSettings::default();
    let mut field = ParticleField::new(settings, Some(8));
    field.rebuild(VIEWPORT);

    let dt = 3.0;
    for step in 0..1000 {
        field.step(dt, &pointer_at(step));
        for p in field.elements() {
            assert!(VIEWPORT.contains(p.anchor, settings.max_drift * dt + 1e-3));
        }
    }
}

#[test]
fn test_shapes_stay_in_volume() {
    let mut field = ShapeField::new(ShapeSettings::default(), Some(42));
    field.rebuild(VIEWPORT);
    let bounds = field.bounds();

    for step in 0..3000 {
        field.step(1.0, &pointer_at(step));
        for shape in field.elements() {
            assert!(bounds.contains(shape.position), "{:?} left the volume", shape.position);
        }
    }
}

// ============================================================================
// Zero-pointer stability
// ============================================================================

#[test]
fn test_displacement_decays_without_pointer() {
    let settings = ParticleSettings {
        max_drift: 0.0,
        ..ParticleSettings::default()
    };
    let mut field = ParticleField::new(settings, Some(5));
    field.rebuild(VIEWPORT);
    field.particles_mut()[0] = Particle::at_rest(Vec2::new(405.0, 300.0), Vec2::ZERO, 2.0, 20.0, 0);

    // Scatter everything first.
    for step in 0..30 {
        field.step(1.0, &PointerState::at(Vec2::new(400.0 + step as f32, 300.0), 150.0));
    }
    assert!(field.elements().iter().any(|p| p.displacement() > 1.0));

    let absent = PointerState::new(150.0);
    let mut previous: Vec<f32> = field.elements().iter().map(|p| p.displacement()).collect();
    for _ in 0..120 {
        field.step(1.0, &absent);
        for (p, before) in field.elements().iter().zip(&previous) {
            assert!(p.displacement() <= *before);
        }
        previous = field.elements().iter().map(|p| p.displacement()).collect();
    }
    assert!(previous.iter().all(|d| *d < 0.05));
}

#[test]
fn test_drifting_particles_track_anchor() {
    let mut field = ParticleField::new(ParticleSettings::default(), Some(6));
    field.rebuild(VIEWPORT);
    let absent = PointerState::new(150.0);
    for _ in 0..600 {
        field.step(1.0, &absent);
    }
    // Steady lag behind a drifting anchor is about relaxation * drift.
    for p in field.elements() {
        assert!(p.displacement() < 10.0 * 0.25 * 2.0_f32.sqrt() + 1e-3);
    }
}

// ============================================================================
// Force falloff
// ============================================================================

#[test]
fn test_linear_falloff_is_exact() {
    for (distance, radius) in [(0.0, 150.0), (37.5, 150.0), (149.0, 150.0), (10.0, 12.0)] {
        assert_eq!(Falloff::Linear.factor(distance, radius), (radius - distance) / radius);
    }
    assert_eq!(Falloff::Linear.factor(150.0, 150.0), 0.0);
}

#[test]
fn test_force_magnitude_matches_falloff_times_density() {
    let force = ForceField::linear(150.0);
    let pointer = Vec2::new(400.0, 300.0);
    for (offset, density) in [
        (Vec2::new(10.0, 5.0), 1.0),
        (Vec2::new(-90.0, 40.0), 17.5),
        (Vec2::new(0.0, -149.0), 30.0),
        (Vec2::ZERO, 4.0),
    ] {
        let distance = offset.length();
        let push = force.repulsion(pointer + offset, Some(pointer), density);
        assert_relative_eq!(push.length(), (150.0 - distance) / 150.0 * density, max_relative = 1e-5);
    }
}

// ============================================================================
// Rebuild idempotence
// ============================================================================

#[test]
fn test_rebuild_twice_same_size_and_allocation() {
    let mut field = ParticleField::new(ParticleSettings::default(), Some(1));
    field.rebuild(VIEWPORT);
    let capacity = field.capacity();
    assert_eq!(field.len(), 53);

    field.rebuild(VIEWPORT);
    assert_eq!(field.len(), 53);
    assert_eq!(field.capacity(), capacity);

    let mut shapes = ShapeField::new(ShapeSettings::default(), Some(1));
    shapes.rebuild(VIEWPORT);
    let capacity = shapes.capacity();
    shapes.rebuild(VIEWPORT);
    assert_eq!(shapes.len(), 45);
    assert_eq!(shapes.capacity(), capacity);
}

#[test]
fn test_degenerate_viewports_empty_the_field() {
    for viewport in [Viewport::new(0.0, 0.0), Viewport::new(-800.0, 600.0), Viewport::new(800.0, 0.0)] {
        let mut particles = ParticleField::new(ParticleSettings::default(), Some(2));
        particles.rebuild(viewport);
        particles.step(1.0, &PointerState::at(Vec2::ZERO, 150.0));
        assert!(particles.is_empty());

        let mut shapes = ShapeField::new(ShapeSettings::default(), Some(2));
        shapes.rebuild(viewport);
        assert!(shapes.is_empty());
    }
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_scenario_pointer_in_800_by_600() {
    let mut field = ParticleField::new(ParticleSettings::default(), Some(3));
    field.rebuild(VIEWPORT);
    assert_eq!(field.len(), 53);

    let force = ForceField::linear(150.0);
    let pointer = Some(Vec2::new(400.0, 300.0));

    let near = Vec2::new(410.0, 305.0);
    let push = force.repulsion(near, pointer, 1.0);
    assert!(push.length() > 0.0);
    assert!(push.dot(near - Vec2::new(400.0, 300.0)) > 0.0, "force must point outward");

    assert_eq!(force.repulsion(Vec2::new(10.0, 10.0), pointer, 1.0), Vec2::ZERO);
}

#[test]
fn test_scenario_shape_wraps_to_opposite_face() {
    let mut field = ShapeField::new(ShapeSettings::default(), Some(4));
    field.rebuild(VIEWPORT);
    {
        let shape = &mut field.shapes_mut()[0];
        shape.position = Vec3::new(26.0, 0.0, 0.0);
        shape.velocity = Vec3::ZERO;
    }

    field.step(1.0, &PointerState::new(150.0));
    assert_eq!(field.elements()[0].position.x, -25.0);
    assert_eq!(field.elements()[0].position.y, 0.0);
}
