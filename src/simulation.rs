//! Backdrop builder and runner.

use std::collections::BTreeSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::{BackdropConfig, BackendKind, ThemeSource};
use crate::engine::{Animation, Engine};
use crate::error::SimulationError;
use crate::gpu::WindowSurface;
use crate::host::{FrameToken, Host, ListenerId, ManualHost, Signal, SignalKind};
use crate::pointer::{pointer_event, PointerEvent};
use crate::population::{ParticleField, Population, ShapeField};
use crate::render::{OffscreenSurface, ParticleRenderer, PixelCanvas, Renderer, ShapeRenderer, Surface};
use crate::theme::ThemeMode;
use crate::time::{Time, REFERENCE_FPS};
use crate::viewport::Viewport;

/// An ambient backdrop builder.
///
/// Use method chaining to configure, then call `.run()` to open a window,
/// or `.render_headless()` to draw frames without one.
#[derive(Debug, Clone, Default)]
pub struct Backdrop {
    config: BackdropConfig,
}

impl Backdrop {
    /// Create a backdrop with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: BackdropConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BackdropConfig {
        &self.config
    }

    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.config.backend = backend;
        self
    }

    pub fn with_theme(mut self, theme: ThemeSource) -> Self {
        self.config.theme = theme;
        self
    }

    /// Fix the spawn seed for reproducible layouts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.config.window.width = width;
        self.config.window.height = height;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config.window.title = title.into();
        self
    }

    fn particle_engine<S: Surface>(
        &self,
        surface: S,
        viewport: Viewport,
        theme: ThemeMode,
    ) -> Engine<ParticleField, ParticleRenderer<S>> {
        let settings = self.config.particles;
        let field = ParticleField::new(settings, self.config.seed);
        let renderer = ParticleRenderer::new(surface, settings.connection_distance);
        Engine::new(field, renderer, viewport, theme).with_influence_radius(settings.influence_radius)
    }

    fn shape_engine<S: Surface>(
        &self,
        surface: S,
        viewport: Viewport,
        theme: ThemeMode,
    ) -> Engine<ShapeField, ShapeRenderer<S>> {
        let field = ShapeField::new(self.config.shapes, self.config.seed);
        let renderer = ShapeRenderer::new(surface, &self.config.shapes);
        Engine::new(field, renderer, viewport, theme)
    }

    fn engine_for<S: Surface + 'static>(&self, surface: S, viewport: Viewport, theme: ThemeMode) -> Box<dyn Animation> {
        match self.config.backend {
            BackendKind::Particles => Box::new(self.particle_engine(surface, viewport, theme)),
            BackendKind::Shapes => Box::new(self.shape_engine(surface, viewport, theme)),
        }
    }

    /// Run `frames` frames at the configured window size without a window.
    ///
    /// Returns the last drawn frame, or `None` if the engine stopped before
    /// drawing anything.
    pub fn render_headless(&self, frames: u32) -> Result<Option<PixelCanvas>, SimulationError> {
        self.config.validate()?;
        let viewport = Viewport::new(self.config.window.width as f32, self.config.window.height as f32);
        let theme = self.config.theme.initial(None);
        let surface = OffscreenSurface::new(viewport);
        let mut host = ManualHost::new();
        let mut time = Time::fixed(1.0 / REFERENCE_FPS).with_max_ticks(self.config.max_ticks());

        let snapshot = match self.config.backend {
            BackendKind::Particles => run_offscreen(
                self.particle_engine(surface, viewport, theme),
                &mut host,
                &mut time,
                frames,
                |r| r.surface(),
            ),
            BackendKind::Shapes => run_offscreen(
                self.shape_engine(surface, viewport, theme),
                &mut host,
                &mut time,
                frames,
                |r| r.surface(),
            ),
        };
        info!(frames = time.frame(), "headless run finished");
        Ok(snapshot.filter(|_| time.frame() > 0))
    }

    /// Open a window and animate until it is closed. Blocks.
    pub fn run(self) -> Result<(), SimulationError> {
        self.config.validate()?;

        let event_loop = EventLoop::new()?;
        // Frames are driven by redraw requests, nothing else needs polling.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = App::new(self);
        event_loop.run_app(&mut app)?;

        match app.error.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Drive an offscreen engine for `frames` frames and keep its last frame.
///
/// The frame is copied out before `stop` releases the surface.
fn run_offscreen<P, R>(
    mut engine: Engine<P, R>,
    host: &mut ManualHost,
    time: &mut Time,
    frames: u32,
    surface_of: impl Fn(&R) -> &OffscreenSurface,
) -> Option<PixelCanvas>
where
    P: Population,
    R: Renderer<Element = P::Element>,
{
    drive_frames(&mut engine, host, time, frames);
    let frame = surface_of(engine.renderer()).frame().cloned();
    engine.stop(host);
    frame
}

fn drive_frames(animation: &mut dyn Animation, host: &mut ManualHost, time: &mut Time, frames: u32) {
    animation.start(host);
    for _ in 0..frames {
        if host.take_frame().is_none() {
            break;
        }
        time.update();
        if !animation.frame(host, time) {
            break;
        }
    }
}

/// [`Host`] over a winit window: a pending frame is a requested redraw.
///
/// A redraw already requested from winit cannot be withdrawn, so a cancelled
/// token just makes the next `RedrawRequested` a no-op.
#[derive(Default)]
pub struct WinitHost {
    window: Option<Arc<Window>>,
    next_id: u64,
    pending: Option<FrameToken>,
    listeners: BTreeSet<(SignalKind, ListenerId)>,
}

impl WinitHost {
    pub fn new(window: Arc<Window>) -> Self {
        Self {
            window: Some(window),
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    pub fn is_listening(&self, kind: SignalKind) -> bool {
        self.listeners.iter().any(|(k, _)| *k == kind)
    }
}

impl Host for WinitHost {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id());
        if let Some(window) = &self.window {
            window.request_redraw();
        }
        self.pending = Some(token);
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
        }
    }

    fn listen(&mut self, kind: SignalKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert((kind, id));
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.retain(|(_, existing)| *existing != id);
    }
}

struct App {
    backdrop: Backdrop,
    window: Option<Arc<Window>>,
    host: WinitHost,
    engine: Option<Box<dyn Animation>>,
    time: Time,
    error: Option<SimulationError>,
}

impl App {
    fn new(backdrop: Backdrop) -> Self {
        let time = Time::new().with_max_ticks(backdrop.config.max_ticks());
        Self {
            backdrop,
            window: None,
            host: WinitHost::default(),
            engine: None,
            time,
            error: None,
        }
    }

    fn mount(&mut self, event_loop: &ActiveEventLoop) -> Result<(), SimulationError> {
        let settings = &self.backdrop.config.window;
        let window_attrs = Window::default_attributes()
            .with_title(settings.title.clone())
            .with_inner_size(winit::dpi::LogicalSize::new(settings.width, settings.height));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let surface = WindowSurface::new(window.clone())?;
        let viewport = Viewport::logical(window.inner_size(), window.scale_factor());
        let theme = self.backdrop.config.theme.initial(window.theme().map(ThemeMode::from));

        let mut engine = self.backdrop.engine_for(surface, viewport, theme);
        self.host = WinitHost::new(window.clone());
        self.time.reset();
        engine.start(&mut self.host);

        self.window = Some(window);
        self.engine = Some(engine);
        Ok(())
    }

    fn scale_factor(&self) -> f64 {
        self.window.as_ref().map_or(1.0, |w| w.scale_factor())
    }

    fn dispatch(&mut self, signal: Signal) {
        if !self.host.is_listening(signal.kind()) {
            return;
        }
        if let Some(engine) = &mut self.engine {
            engine.dispatch(signal);
        }
    }

    fn teardown(&mut self) {
        if let Some(engine) = &mut self.engine {
            engine.stop(&mut self.host);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(err) = self.mount(event_loop) {
            warn!(error = %err, "failed to mount backdrop");
            self.error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if let Some(pointer) = pointer_event(&event, self.scale_factor()) {
            let signal = match pointer {
                PointerEvent::Moved(p) => Signal::PointerMoved(p),
                PointerEvent::Left => Signal::PointerLeft,
            };
            self.dispatch(signal);
            return;
        }

        match event {
            WindowEvent::CloseRequested => {
                self.teardown();
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                let viewport = Viewport::logical(physical_size, self.scale_factor());
                self.dispatch(Signal::Resized(viewport));
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                if let Some(window) = &self.window {
                    let viewport = Viewport::logical(window.inner_size(), scale_factor);
                    self.dispatch(Signal::Resized(viewport));
                }
            }
            WindowEvent::ThemeChanged(theme) => {
                if self.backdrop.config.theme.follows_system() {
                    self.dispatch(Signal::ThemeChanged(ThemeMode::from(theme)));
                } else {
                    debug!(?theme, "OS theme change ignored, theme is fixed");
                }
            }
            WindowEvent::RedrawRequested => {
                if self.host.take_frame().is_none() {
                    return;
                }
                self.time.update();
                let Some(engine) = &mut self.engine else {
                    return;
                };
                if !engine.frame(&mut self.host, &self.time) {
                    info!("engine stopped, closing window");
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_overrides_config() {
        let backdrop = Backdrop::new()
            .with_backend(BackendKind::Shapes)
            .with_theme(ThemeSource::Light)
            .with_seed(7)
            .with_window_size(320, 200)
            .with_title("demo");
        let config = backdrop.config();
        assert_eq!(config.backend, BackendKind::Shapes);
        assert_eq!(config.theme, ThemeSource::Light);
        assert_eq!(config.seed, Some(7));
        assert_eq!((config.window.width, config.window.height), (320, 200));
        assert_eq!(config.window.title, "demo");
    }

    #[test]
    fn test_headless_particles_draws_frame() {
        let frame = Backdrop::new()
            .with_seed(1)
            .with_theme(ThemeSource::Dark)
            .with_window_size(160, 120)
            .render_headless(5)
            .unwrap()
            .unwrap();
        assert_eq!((frame.width(), frame.height()), (160, 120));
        assert_eq!(frame.pixel(0, 0), Some([0x11, 0x18, 0x27, 255]));
    }

    #[test]
    fn test_headless_shapes_draws_frame() {
        let frame = Backdrop::new()
            .with_backend(BackendKind::Shapes)
            .with_theme(ThemeSource::Light)
            .with_seed(3)
            .with_window_size(96, 64)
            .render_headless(2)
            .unwrap()
            .unwrap();
        assert_eq!((frame.width(), frame.height()), (96, 64));
    }

    #[test]
    fn test_headless_runs_repeat_for_a_seed() {
        for backend in [BackendKind::Particles, BackendKind::Shapes] {
            let backdrop = Backdrop::new()
                .with_backend(backend)
                .with_theme(ThemeSource::Dark)
                .with_seed(11)
                .with_window_size(120, 90);
            let first = backdrop.render_headless(4).unwrap().unwrap();
            let second = backdrop.render_headless(4).unwrap().unwrap();
            assert_eq!(first.as_bytes(), second.as_bytes(), "{backend:?}");
        }
    }

    #[test]
    fn test_headless_zero_frames_yields_nothing() {
        let frame = Backdrop::new().with_window_size(32, 32).render_headless(0).unwrap();
        assert!(frame.is_none());
    }

    #[test]
    fn test_headless_rejects_invalid_config() {
        let result = Backdrop::new().with_window_size(0, 10).render_headless(1);
        assert!(matches!(result, Err(SimulationError::Config(_))));
    }

    #[test]
    fn test_winit_host_tracks_listeners_without_window() {
        let mut host = WinitHost::default();
        let id = host.listen(SignalKind::Theme);
        assert!(host.is_listening(SignalKind::Theme));
        let token = host.request_frame();
        host.cancel_frame(token);
        assert!(host.take_frame().is_none());
        host.unlisten(id);
        assert!(!host.is_listening(SignalKind::Theme));
    }
}
