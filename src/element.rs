//! Kinematic elements: the units each population simulates.

use glam::{Vec2, Vec3};

use crate::theme::{MaterialParams, MaterialSlot, Palette};

/// A 2-D particle of the particle field.
///
/// `position` is what gets drawn. `anchor` is the undisturbed resting point:
/// it drifts with `velocity` and bounces at the viewport edges, while
/// `position` is pushed around by the pointer and eases back to the anchor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec2,
    pub anchor: Vec2,
    /// Anchor drift per reference frame.
    pub velocity: Vec2,
    /// Circle radius in pixels.
    pub size: f32,
    /// Responsiveness to the pointer, multiplies the falloff.
    pub density: f32,
    /// Index into [`Palette::particle_colors`]; fixed for the particle's life.
    pub color_index: usize,
}

impl Particle {
    /// Particle at rest on its anchor.
    pub fn at_rest(anchor: Vec2, velocity: Vec2, size: f32, density: f32, color_index: usize) -> Self {
        Self {
            position: anchor,
            anchor,
            velocity,
            size,
            density,
            color_index,
        }
    }

    /// Distance between the drawn position and the anchor.
    #[inline]
    pub fn displacement(&self) -> f32 {
        self.position.distance(self.anchor)
    }
}

/// The five floating shape forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    PawPrint,
    Bone,
    Ball,
    Heart,
    Star,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 5] = [
        ShapeKind::PawPrint,
        ShapeKind::Bone,
        ShapeKind::Ball,
        ShapeKind::Heart,
        ShapeKind::Star,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    /// Material slot each form is painted with.
    pub fn material_slot(self) -> MaterialSlot {
        match self {
            ShapeKind::PawPrint => MaterialSlot::Purple,
            ShapeKind::Bone | ShapeKind::Heart => MaterialSlot::Pink,
            ShapeKind::Ball => MaterialSlot::Yellow,
            ShapeKind::Star => MaterialSlot::Blue,
        }
    }
}

/// A lit 3-D shape of the shape field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FloatingShape {
    pub kind: ShapeKind,
    pub position: Vec3,
    /// Drift per reference frame.
    pub velocity: Vec3,
    /// Euler angles (XYZ order) in radians.
    pub rotation: Vec3,
    /// Rotation per reference frame.
    pub angular_velocity: Vec3,
    pub scale: f32,
    /// Palette-dependent paint, re-derived on theme change.
    pub material: MaterialParams,
}

impl FloatingShape {
    /// Re-derive the palette-dependent material in place.
    pub fn retint(&mut self, palette: &Palette) {
        self.material = *palette.material(self.kind.material_slot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_particle_at_rest() {
        let p = Particle::at_rest(Vec2::new(3.0, 4.0), Vec2::ZERO, 2.0, 10.0, 1);
        assert_eq!(p.position, p.anchor);
        assert_eq!(p.displacement(), 0.0);
    }

    #[test]
    fn test_retint_follows_slot() {
        let dark = Palette::dark();
        let light = Palette::light();
        let mut shape = FloatingShape {
            kind: ShapeKind::Star,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            rotation: Vec3::ZERO,
            angular_velocity: Vec3::ZERO,
            scale: 1.0,
            material: *dark.material(MaterialSlot::Blue),
        };
        shape.retint(&light);
        assert_eq!(shape.material, *light.material(MaterialSlot::Blue));
    }

    #[test]
    fn test_every_kind_has_a_slot() {
        let slots: Vec<_> = ShapeKind::ALL.iter().map(|k| k.material_slot()).collect();
        assert_eq!(slots.len(), 5);
        assert!(MaterialSlot::ALL.iter().all(|s| slots.contains(s)));
    }
}
