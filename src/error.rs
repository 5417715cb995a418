//! Error types for backdrop.
//!
//! Simulation code never fails: empty viewports, absent pointers and lost
//! surfaces are all valid states. Only setup (configuration, window and GPU
//! initialization) and surface access return these errors.

use thiserror::Error;

/// Errors that can occur during GPU initialization and presentation.
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reported a format list we cannot render to.
    #[error("surface exposes no usable texture format")]
    NoSurfaceFormat,
    /// Acquiring the next swapchain texture failed.
    #[error("failed to acquire surface texture: {0}")]
    Acquire(#[from] wgpu::SurfaceError),
}

/// Errors reported by a renderer while drawing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The draw surface has been released or detached from the host.
    ///
    /// The engine reacts by stopping itself.
    #[error("render surface is no longer available")]
    SurfaceUnavailable,
    /// The surface needs to be reconfigured before the next frame.
    #[error("render surface was lost and must be reconfigured")]
    SurfaceLost,
    /// Any other presentation failure.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
}

/// Errors that can occur while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    /// The file is not valid TOML for [`crate::BackdropConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    /// A value is out of its accepted range.
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

/// Errors that can occur when running the windowed backdrop.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// Configuration was rejected.
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}
