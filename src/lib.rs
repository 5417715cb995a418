//! # backdrop
//!
//! Ambient, pointer-reactive background animations.
//!
//! Two interchangeable backends share one lifecycle:
//!
//! - **Particles**: a 2-D field of drifting dots joined by proximity
//!   connectors. The pointer pushes particles away; they ease back to their
//!   anchors once it leaves.
//! - **Shapes**: a fixed set of lit 3-D shapes (paw prints, bones, balls,
//!   hearts, stars) drifting and spinning inside a wrapped volume.
//!
//! Both follow the host's light/dark theme live, without rebuilding.
//!
//! ## Quick Start
//!
//! ```ignore
//! use backdrop::prelude::*;
//!
//! fn main() -> Result<(), SimulationError> {
//!     Backdrop::new()
//!         .with_backend(BackendKind::Shapes)
//!         .with_theme(ThemeSource::System)
//!         .run()
//! }
//! ```
//!
//! ## Driving an engine by hand
//!
//! [`Engine`] is host-agnostic. Any [`Host`] that can schedule a frame and
//! attach listeners can drive it; [`ManualHost`] does so in memory:
//!
//! ```ignore
//! let mut host = ManualHost::new();
//! let mut engine = Engine::new(field, renderer, viewport, ThemeMode::Dark);
//! engine.start(&mut host);
//! while host.take_frame().is_some() {
//!     time.update();
//!     engine.frame(&mut host, &time);
//! }
//! engine.stop(&mut host);
//! ```
//!
//! ## Frame anatomy
//!
//! | Step | What happens |
//! |------|--------------|
//! | snapshot | pending resize applied, palette change pushed to the population |
//! | step | pointer force, integration, boundary policy per element |
//! | draw | renderer paints the elements and presents the surface |
//! | schedule | next frame requested from the host |

pub mod boundary;
pub mod config;
pub mod element;
pub mod engine;
pub mod error;
pub mod force;
mod gpu;
pub mod host;
pub mod pointer;
pub mod population;
pub mod render;
mod simulation;
pub mod spawn;
pub mod theme;
pub mod time;
pub mod viewport;

pub use config::{BackdropConfig, BackendKind, ParticleSettings, ShapeSettings, ThemeSource, WindowSettings};
pub use element::{FloatingShape, Particle, ShapeKind};
pub use engine::{Animation, Engine, EngineState};
pub use error::{ConfigError, GpuError, RenderError, SimulationError};
pub use gpu::{PresentOutcome, Presenter, WindowSurface};
pub use host::{FrameToken, Host, ListenerId, ManualHost, Signal, SignalKind};
pub use pointer::PointerState;
pub use population::{ParticleField, Population, ShapeField};
pub use render::{OffscreenSurface, ParticleRenderer, PixelCanvas, Renderer, ShapeRenderer, Surface};
pub use simulation::{Backdrop, WinitHost};
pub use theme::{Palette, ThemeAdapter, ThemeMode};
pub use time::Time;
pub use viewport::{SceneBounds, Viewport};

pub use glam::{Vec2, Vec3};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::{
        Backdrop, BackdropConfig, BackendKind, Engine, Host, ManualHost, Population, Renderer, Signal,
        SimulationError, ThemeMode, ThemeSource, Time, Viewport,
    };
    pub use crate::{OffscreenSurface, ParticleField, ParticleRenderer, ShapeField, ShapeRenderer};
    pub use glam::{Vec2, Vec3};
}
