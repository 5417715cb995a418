//! Renderers for both backdrop backends.
//!
//! A renderer owns its [`Surface`] and reads the population as an element
//! slice each frame. Palette-dependent paint is re-derived whenever the
//! palette version moves; geometry and elements are never rebuilt for it.

mod camera;
mod canvas;
mod lighting;
mod mesh;
mod particles;
mod shapes;
mod surface;

pub use camera::Camera;
pub use canvas::PixelCanvas;
pub use lighting::{shade, LightRig, PointLight};
pub use mesh::{Mesh, ShapeCatalog, Triangle};
pub use particles::{for_each_connection, ParticleRenderer};
pub use shapes::ShapeRenderer;
pub use surface::{OffscreenSurface, Surface};

use crate::error::RenderError;
use crate::theme::Palette;
use crate::viewport::Viewport;

/// Clock readings a renderer may animate with.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInfo {
    /// Seconds since the engine started.
    pub elapsed: f32,
    pub frame: u64,
}

/// Draws one population's elements onto a surface.
pub trait Renderer {
    type Element;

    /// Whether the underlying surface can still be drawn to.
    fn is_available(&self) -> bool;

    /// Follow a viewport change: surface size, camera aspect.
    fn resize(&mut self, viewport: Viewport);

    /// Draw and present one frame.
    fn draw(
        &mut self,
        elements: &[Self::Element],
        palette: &Palette,
        frame: &FrameInfo,
    ) -> Result<(), RenderError>;

    /// Release the surface. Idempotent.
    fn release(&mut self);
}
