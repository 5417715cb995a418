//! Pointer-driven forces.
//!
//! Both fields repel elements away from the pointer; they differ in the
//! falloff curve:
//!
//! - The particle field scales the push by [`Falloff::Linear`] and a
//!   per-particle density, so nearby particles scatter hard and particles at
//!   the rim barely move.
//! - The shape field uses [`Falloff::Constant`]: a small fixed nudge inside a
//!   proximity distance, cheap for a few large objects.
//!
//! Absent pointer means zero force. Particles then ease back toward their
//! anchor with [`ease_toward`].

use glam::{Vec2, Vec3};

/// Escape direction used when an element sits exactly on the pointer.
pub const FALLBACK_ESCAPE: Vec2 = Vec2::X;

/// Distance falloff functions for pointer forces.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Falloff {
    /// Constant force anywhere inside the radius.
    Constant,

    /// Linear falloff: `(radius - distance) / radius`, zero at the edge.
    #[default]
    Linear,
}

impl Falloff {
    /// Falloff factor for `distance` inside `radius`.
    ///
    /// Returns 0 at or beyond the radius.
    #[inline]
    pub fn factor(self, distance: f32, radius: f32) -> f32 {
        if !(distance < radius) || radius <= 0.0 {
            return 0.0;
        }
        match self {
            Falloff::Constant => 1.0,
            Falloff::Linear => (radius - distance) / radius,
        }
    }
}

/// Repulsion around a pointer position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceField {
    /// Influence radius; elements at or beyond it feel nothing.
    pub radius: f32,
    /// Scale applied on top of the falloff (the shape field's nudge size).
    pub strength: f32,
    pub falloff: Falloff,
}

impl ForceField {
    /// Linear repulsion used by the particle field.
    pub fn linear(radius: f32) -> Self {
        Self {
            radius,
            strength: 1.0,
            falloff: Falloff::Linear,
        }
    }

    /// Fixed-step nudge used by the shape field.
    pub fn nudge(radius: f32, step: f32) -> Self {
        Self {
            radius,
            strength: step,
            falloff: Falloff::Constant,
        }
    }

    /// Displacement pushing an element at `p` away from `pointer`.
    ///
    /// `density` scales the result per element. The magnitude is exactly
    /// `falloff(distance) * strength * density`.
    pub fn repulsion(&self, p: Vec2, pointer: Option<Vec2>, density: f32) -> Vec2 {
        let Some(m) = pointer else {
            return Vec2::ZERO;
        };
        let offset = p - m;
        let distance = offset.length();
        let factor = self.falloff.factor(distance, self.radius);
        if factor == 0.0 {
            return Vec2::ZERO;
        }
        let direction = if distance > 0.0 {
            offset / distance
        } else {
            FALLBACK_ESCAPE
        };
        direction * (factor * self.strength * density)
    }

    /// Planar repulsion for a 3-D element: the pointer lives on the z = 0
    /// plane and the push never changes depth.
    pub fn repulsion_xy(&self, p: Vec3, pointer: Option<Vec2>) -> Vec3 {
        self.repulsion(p.truncate(), pointer, 1.0).extend(0.0)
    }
}

/// Fraction of the offset from the anchor kept after one reference frame,
/// for a relaxation constant of `relaxation` frames.
#[inline]
pub fn relaxation_keep(relaxation: f32) -> f32 {
    if relaxation <= 1.0 {
        0.0
    } else {
        1.0 - 1.0 / relaxation
    }
}

/// Ease `position` toward `anchor` over `dt` reference frames.
///
/// One frame at relaxation 10 gives `position -= (position - anchor) / 10`.
#[inline]
pub fn ease_toward(position: Vec2, anchor: Vec2, relaxation: f32, dt: f32) -> Vec2 {
    let keep = relaxation_keep(relaxation).powf(dt.max(0.0));
    anchor + (position - anchor) * keep
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_falloff_factors() {
        assert_eq!(Falloff::Linear.factor(0.0, 150.0), 1.0);
        assert_eq!(Falloff::Linear.factor(75.0, 150.0), 0.5);
        assert_eq!(Falloff::Linear.factor(150.0, 150.0), 0.0);
        assert_eq!(Falloff::Constant.factor(4.9, 5.0), 1.0);
        assert_eq!(Falloff::Constant.factor(5.0, 5.0), 0.0);
        assert_eq!(Falloff::Linear.factor(f32::NAN, 5.0), 0.0);
    }

    #[test]
    fn test_absent_pointer_is_no_force() {
        let field = ForceField::linear(150.0);
        assert_eq!(field.repulsion(Vec2::new(10.0, 10.0), None, 20.0), Vec2::ZERO);
    }

    #[test]
    fn test_repulsion_points_away() {
        let field = ForceField::linear(150.0);
        let push = field.repulsion(Vec2::new(410.0, 300.0), Some(Vec2::new(400.0, 300.0)), 2.0);
        assert!(push.x > 0.0);
        assert_eq!(push.y, 0.0);
        // (150 - 10) / 150 * 2
        assert!((push.x - 140.0 / 150.0 * 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_distance_uses_fallback() {
        let field = ForceField::linear(150.0);
        let p = Vec2::new(5.0, 5.0);
        let push = field.repulsion(p, Some(p), 3.0);
        assert_eq!(push, FALLBACK_ESCAPE * 3.0);
        assert!(push.is_finite());
    }

    #[test]
    fn test_nudge_is_fixed_step() {
        let field = ForceField::nudge(5.0, 0.1);
        let near = field.repulsion_xy(Vec3::new(0.0, 1.0, -3.0), Some(Vec2::ZERO));
        let far = field.repulsion_xy(Vec3::new(0.0, 4.5, 2.0), Some(Vec2::ZERO));
        assert!((near.length() - 0.1).abs() < 1e-6);
        assert!((far.length() - 0.1).abs() < 1e-6);
        assert_eq!(near.z, 0.0);
        assert_eq!(field.repulsion_xy(Vec3::new(0.0, 5.5, 0.0), Some(Vec2::ZERO)), Vec3::ZERO);
    }

    #[test]
    fn test_ease_one_frame() {
        let eased = ease_toward(Vec2::new(110.0, 50.0), Vec2::new(100.0, 50.0), 10.0, 1.0);
        assert!((eased.x - 109.0).abs() < 1e-4);
        assert_eq!(eased.y, 50.0);
    }

    #[test]
    fn test_ease_zero_dt_is_identity() {
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(ease_toward(p, Vec2::ZERO, 10.0, 0.0), p);
    }
}
