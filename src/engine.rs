//! Frame scheduling and lifecycle of one backdrop.
//!
//! The [`Engine`] owns the population, the renderer and a small snapshot of
//! external state (pointer, pending viewport, theme). Signal handlers only
//! write that snapshot; all simulation work happens in [`Engine::frame`].

use tracing::{debug, error, info, trace, warn};

use crate::error::RenderError;
use crate::host::{FrameToken, Host, ListenerId, Signal, SignalKind};
use crate::pointer::PointerState;
use crate::population::Population;
use crate::render::{FrameInfo, Renderer};
use crate::theme::{Palette, ThemeAdapter, ThemeMode};
use crate::time::Time;
use crate::viewport::Viewport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Built but not started.
    Idle,
    Running,
    /// Torn down. A stopped engine cannot be restarted.
    Stopped,
}

pub struct Engine<P, R>
where
    P: Population,
    R: Renderer<Element = P::Element>,
{
    population: P,
    renderer: R,
    state: EngineState,
    pointer: PointerState,
    viewport: Viewport,
    pending_viewport: Option<Viewport>,
    theme: ThemeAdapter,
    applied_palette: Option<u64>,
    listeners: Vec<ListenerId>,
    pending_frame: Option<FrameToken>,
}

impl<P, R> Engine<P, R>
where
    P: Population,
    R: Renderer<Element = P::Element>,
{
    pub fn new(population: P, renderer: R, viewport: Viewport, theme: ThemeMode) -> Self {
        Self {
            population,
            renderer,
            state: EngineState::Idle,
            pointer: PointerState::default(),
            viewport,
            pending_viewport: None,
            theme: ThemeAdapter::new(theme),
            applied_palette: None,
            listeners: Vec::new(),
            pending_frame: None,
        }
    }

    /// Radius within which the pointer repels particles.
    pub fn with_influence_radius(mut self, radius: f32) -> Self {
        self.pointer.influence_radius = radius;
        self
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == EngineState::Running
    }

    pub fn population(&self) -> &P {
        &self.population
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// Viewport the population is currently sized to.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn palette(&self) -> &Palette {
        self.theme.palette()
    }

    /// Palette version last pushed into the population.
    pub fn applied_palette_version(&self) -> Option<u64> {
        self.applied_palette
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending_frame
    }

    /// Build the population, attach listeners and schedule the first frame.
    pub fn start(&mut self, host: &mut dyn Host) {
        match self.state {
            EngineState::Running => {
                debug!("engine already running");
                return;
            }
            EngineState::Stopped => {
                warn!("refusing to start a stopped engine");
                return;
            }
            EngineState::Idle => {}
        }

        self.population.rebuild(self.viewport);
        self.renderer.resize(self.viewport);
        self.sync_palette();

        self.listeners = SignalKind::ALL.iter().map(|kind| host.listen(*kind)).collect();
        self.pending_frame = Some(host.request_frame());
        self.state = EngineState::Running;

        info!(
            elements = self.population.len(),
            width = self.viewport.width,
            height = self.viewport.height,
            theme = ?self.theme.mode(),
            "engine started"
        );
    }

    /// Record an external signal for the next frame.
    ///
    /// Returns `false` when the engine is not running and the signal was dropped.
    pub fn dispatch(&mut self, signal: Signal) -> bool {
        if self.state != EngineState::Running {
            trace!(?signal, "signal ignored, engine not running");
            return false;
        }
        match signal {
            Signal::PointerMoved(p) => self.pointer.move_to(p),
            Signal::PointerLeft => self.pointer.clear(),
            Signal::Resized(viewport) => self.pending_viewport = Some(viewport),
            Signal::ThemeChanged(mode) => {
                if self.theme.set_mode(mode) {
                    info!(?mode, version = self.theme.version(), "theme changed");
                }
            }
        }
        true
    }

    /// Run one frame: apply the snapshot, step, draw, schedule the next.
    ///
    /// Returns `false` if the engine is not running afterwards.
    pub fn frame(&mut self, host: &mut dyn Host, time: &Time) -> bool {
        if self.state != EngineState::Running {
            return false;
        }
        self.pending_frame = None;

        if !self.renderer.is_available() {
            warn!("render surface unavailable, stopping");
            self.stop(host);
            return false;
        }

        if let Some(viewport) = self.pending_viewport.take() {
            if viewport != self.viewport {
                self.viewport = viewport;
                self.population.resized(viewport);
                self.renderer.resize(viewport);
                debug!(
                    width = viewport.width,
                    height = viewport.height,
                    elements = self.population.len(),
                    "viewport applied"
                );
            }
        }

        self.sync_palette();
        self.population.step(time.ticks(), &self.pointer);

        let info = FrameInfo {
            elapsed: time.elapsed(),
            frame: time.frame(),
        };
        match self
            .renderer
            .draw(self.population.elements(), self.theme.palette(), &info)
        {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => {
                self.renderer.resize(self.viewport);
            }
            Err(RenderError::SurfaceUnavailable) => {
                warn!("render surface went away mid-frame, stopping");
                self.stop(host);
                return false;
            }
            Err(RenderError::Gpu(e)) => {
                error!(error = %e, "presentation failed, stopping");
                self.stop(host);
                return false;
            }
        }

        self.pending_frame = Some(host.request_frame());
        true
    }

    /// Cancel the pending frame, detach listeners and release the surface.
    ///
    /// Safe to call any number of times.
    pub fn stop(&mut self, host: &mut dyn Host) {
        if self.state == EngineState::Stopped {
            return;
        }
        if let Some(token) = self.pending_frame.take() {
            host.cancel_frame(token);
        }
        let detached = self.listeners.len();
        for id in self.listeners.drain(..) {
            host.unlisten(id);
        }
        self.renderer.release();
        self.pointer.clear();
        self.pending_viewport = None;
        self.state = EngineState::Stopped;
        info!(listeners = detached, "engine stopped");
    }

    fn sync_palette(&mut self) {
        let version = self.theme.version();
        if self.applied_palette != Some(version) {
            self.population.apply_palette(self.theme.palette());
            self.applied_palette = Some(version);
        }
    }
}

/// Object-safe face of an [`Engine`], so a host can drive either backend.
pub trait Animation {
    fn start(&mut self, host: &mut dyn Host);
    fn dispatch(&mut self, signal: Signal) -> bool;
    fn frame(&mut self, host: &mut dyn Host, time: &Time) -> bool;
    fn stop(&mut self, host: &mut dyn Host);
    fn state(&self) -> EngineState;
}

impl<P, R> Animation for Engine<P, R>
where
    P: Population,
    R: Renderer<Element = P::Element>,
{
    fn start(&mut self, host: &mut dyn Host) {
        Engine::start(self, host)
    }

    fn dispatch(&mut self, signal: Signal) -> bool {
        Engine::dispatch(self, signal)
    }

    fn frame(&mut self, host: &mut dyn Host, time: &Time) -> bool {
        Engine::frame(self, host, time)
    }

    fn stop(&mut self, host: &mut dyn Host) {
        Engine::stop(self, host)
    }

    fn state(&self) -> EngineState {
        self.state
    }
}
