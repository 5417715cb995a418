//! Boundary policies keeping the population on screen forever.
//!
//! - [`bounce_anchor`]: the particle field reflects the *drift* of each
//!   anchor at the viewport edges. The anchor keeps moving continuously and
//!   never teleports.
//! - [`wrap_position`]: the shape field wraps absolute positions toroidally;
//!   an element leaving through one face re-enters at the opposite face.
//!
//! Both run after force integration on every step for every element.

use glam::{Vec2, Vec3};

use crate::viewport::{SceneBounds, Viewport};

/// Reflect `velocity` so an anchor outside the viewport heads back in.
///
/// Velocity components are pointed inward rather than blindly negated, so an
/// anchor that is still outside on the next frame cannot flip back out.
/// Returns `true` if any component changed.
#[inline]
pub fn bounce_anchor(anchor: Vec2, velocity: &mut Vec2, viewport: Viewport) -> bool {
    let before = *velocity;
    if anchor.x < 0.0 {
        velocity.x = velocity.x.abs();
    } else if anchor.x > viewport.width {
        velocity.x = -velocity.x.abs();
    }
    if anchor.y < 0.0 {
        velocity.y = velocity.y.abs();
    } else if anchor.y > viewport.height {
        velocity.y = -velocity.y.abs();
    }
    *velocity != before
}

/// Clamp a displayed position to the viewport grown by `margin`.
#[inline]
pub fn clamp_to_viewport(position: Vec2, viewport: Viewport, margin: f32) -> Vec2 {
    position.clamp(
        Vec2::splat(-margin),
        Vec2::new(viewport.width + margin, viewport.height + margin),
    )
}

/// Toroidal wrap, independently per axis.
///
/// A coordinate beyond `+h` becomes exactly `-h` and vice versa.
#[inline]
pub fn wrap_position(position: &mut Vec3, bounds: SceneBounds) -> bool {
    let h = bounds.half_extents;
    let mut wrapped = false;
    for axis in 0..3 {
        if position[axis] > h[axis] {
            position[axis] = -h[axis];
            wrapped = true;
        } else if position[axis] < -h[axis] {
            position[axis] = h[axis];
            wrapped = true;
        }
    }
    wrapped
}
