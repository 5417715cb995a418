//! Draw surfaces handed to renderers at mount time.

use tracing::debug;

use super::canvas::PixelCanvas;
use crate::error::RenderError;
use crate::viewport::Viewport;

/// A raster target owned by a renderer for the engine's lifetime.
pub trait Surface {
    /// Whether the surface can still be drawn to.
    ///
    /// Turns false once released, or when the host removed it.
    fn is_available(&self) -> bool;

    fn resize(&mut self, viewport: Viewport);

    /// Canvas for this frame's drawing.
    fn canvas(&mut self) -> Result<&mut PixelCanvas, RenderError>;

    /// Show the finished frame.
    fn present(&mut self) -> Result<(), RenderError>;

    /// Drop every resource acquired for drawing. Idempotent.
    fn release(&mut self);
}

/// In-memory surface for headless runs and tests.
#[derive(Debug, Default)]
pub struct OffscreenSurface {
    canvas: Option<PixelCanvas>,
    detached: bool,
    presented: u64,
}

impl OffscreenSurface {
    pub fn new(viewport: Viewport) -> Self {
        let (w, h) = viewport.pixel_size();
        Self {
            canvas: Some(PixelCanvas::new(w, h)),
            detached: false,
            presented: 0,
        }
    }

    /// Simulate the host removing the surface mid-session.
    pub fn detach(&mut self) {
        self.detached = true;
    }

    /// Number of frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }

    /// The last drawn frame, if the surface still holds one.
    pub fn frame(&self) -> Option<&PixelCanvas> {
        self.canvas.as_ref()
    }

    pub fn is_released(&self) -> bool {
        self.canvas.is_none()
    }
}

impl Surface for OffscreenSurface {
    fn is_available(&self) -> bool {
        self.canvas.is_some() && !self.detached
    }

    fn resize(&mut self, viewport: Viewport) {
        let (w, h) = viewport.pixel_size();
        if let Some(canvas) = &mut self.canvas {
            canvas.resize(w, h);
        }
    }

    fn canvas(&mut self) -> Result<&mut PixelCanvas, RenderError> {
        if self.detached {
            return Err(RenderError::SurfaceUnavailable);
        }
        self.canvas.as_mut().ok_or(RenderError::SurfaceUnavailable)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        if !self.is_available() {
            return Err(RenderError::SurfaceUnavailable);
        }
        self.presented += 1;
        Ok(())
    }

    fn release(&mut self) {
        if self.canvas.take().is_some() {
            debug!(presented = self.presented, "released offscreen surface");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_is_idempotent() {
        let mut surface = OffscreenSurface::new(Viewport::new(8.0, 8.0));
        assert!(surface.is_available());
        surface.release();
        surface.release();
        assert!(!surface.is_available());
        assert!(matches!(surface.canvas(), Err(RenderError::SurfaceUnavailable)));
    }

    #[test]
    fn test_detached_surface_refuses_frames() {
        let mut surface = OffscreenSurface::new(Viewport::new(8.0, 8.0));
        surface.detach();
        assert!(!surface.is_available());
        assert!(surface.present().is_err());
        assert_eq!(surface.presented(), 0);
    }

    #[test]
    fn test_resize_follows_viewport() {
        let mut surface = OffscreenSurface::new(Viewport::new(8.0, 8.0));
        surface.resize(Viewport::new(16.0, 4.0));
        let canvas = surface.canvas().unwrap();
        assert_eq!((canvas.width(), canvas.height()), (16, 4));
    }
}
