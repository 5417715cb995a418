//! Population managers.
//!
//! A population exclusively owns its elements. Each frame the engine calls
//! [`Population::step`], which for every element applies the pointer force,
//! integrates motion and enforces the boundary policy, in that order.
//! Renderers only ever see `&[Element]`.

mod particles;
mod shapes;

pub use particles::ParticleField;
pub use shapes::ShapeField;

use crate::pointer::PointerState;
use crate::theme::Palette;
use crate::viewport::Viewport;

/// Owner of a collection of kinematic elements.
pub trait Population {
    type Element;

    /// Clear and recreate the whole population for `viewport`.
    ///
    /// Degenerate viewports produce an empty population. Calling this
    /// repeatedly with the same arguments yields the same element count and
    /// reuses the existing allocation.
    fn rebuild(&mut self, viewport: Viewport);

    /// React to a viewport change.
    fn resized(&mut self, viewport: Viewport);

    /// Advance every element by `dt` reference frames.
    fn step(&mut self, dt: f32, pointer: &PointerState);

    /// Re-derive palette-dependent element attributes without rebuilding.
    fn apply_palette(&mut self, palette: &Palette);

    fn elements(&self) -> &[Self::Element];

    fn viewport(&self) -> Viewport;

    fn len(&self) -> usize {
        self.elements().len()
    }

    fn is_empty(&self) -> bool {
        self.elements().is_empty()
    }
}
