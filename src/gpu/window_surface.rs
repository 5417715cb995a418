use std::sync::Arc;

use tracing::{info, trace, warn};
use winit::window::Window;

use super::{PresentOutcome, Presenter};
use crate::error::{GpuError, RenderError};
use crate::render::{PixelCanvas, Surface};
use crate::viewport::Viewport;

/// A [`Surface`] backed by a window and its GPU presenter.
///
/// The canvas is sized in logical pixels and the swapchain in physical ones;
/// the blit scales between them.
pub struct WindowSurface {
    window: Arc<Window>,
    presenter: Option<Presenter>,
    canvas: PixelCanvas,
}

impl WindowSurface {
    /// Initialize the presenter for `window`, blocking on adapter setup.
    pub fn new(window: Arc<Window>) -> Result<Self, GpuError> {
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;
        let (width, height) = Viewport::logical(window.inner_size(), window.scale_factor()).pixel_size();
        Ok(Self {
            window,
            presenter: Some(presenter),
            canvas: PixelCanvas::new(width, height),
        })
    }
}

impl Surface for WindowSurface {
    fn is_available(&self) -> bool {
        self.presenter.is_some()
    }

    fn resize(&mut self, viewport: Viewport) {
        let (width, height) = viewport.pixel_size();
        self.canvas.resize(width, height);
        if let Some(presenter) = &mut self.presenter {
            let physical = self.window.inner_size();
            presenter.resize(physical.width, physical.height);
        }
    }

    fn canvas(&mut self) -> Result<&mut PixelCanvas, RenderError> {
        if self.presenter.is_none() {
            return Err(RenderError::SurfaceUnavailable);
        }
        Ok(&mut self.canvas)
    }

    fn present(&mut self) -> Result<(), RenderError> {
        let Some(presenter) = &mut self.presenter else {
            return Err(RenderError::SurfaceUnavailable);
        };
        self.window.pre_present_notify();
        match presenter.present(&self.canvas)? {
            PresentOutcome::Presented => Ok(()),
            PresentOutcome::Skipped => {
                trace!("surface timed out, frame skipped");
                Ok(())
            }
            PresentOutcome::Reconfigured => {
                warn!("surface lost, reconfigured");
                Err(RenderError::SurfaceLost)
            }
        }
    }

    fn release(&mut self) {
        if self.presenter.take().is_some() {
            self.canvas = PixelCanvas::new(0, 0);
            info!("released window surface");
        }
    }
}
