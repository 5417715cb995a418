//! Pointer state shared between the host's event handlers and the frame loop.
//!
//! Handlers only ever overwrite the last known position (last writer wins);
//! the frame callback reads it once at the start of each step.

use glam::Vec2;
use winit::dpi::{LogicalPosition, PhysicalPosition};
use winit::event::WindowEvent;

/// Default influence radius for the particle field, in pixels.
pub const DEFAULT_INFLUENCE_RADIUS: f32 = 150.0;

/// Last known pointer position in viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerState {
    position: Option<Vec2>,
    /// Radius within which elements are repelled.
    pub influence_radius: f32,
}

impl PointerState {
    /// Create a pointer with no known position yet.
    pub fn new(influence_radius: f32) -> Self {
        Self {
            position: None,
            influence_radius,
        }
    }

    /// Pointer already resting at `position`.
    pub fn at(position: Vec2, influence_radius: f32) -> Self {
        Self {
            position: Some(position),
            influence_radius,
        }
    }

    /// Position in viewport pixels, `None` before the first movement or
    /// after the pointer left the surface.
    #[inline]
    pub fn position(&self) -> Option<Vec2> {
        self.position
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        self.position.is_some()
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.position = Some(position);
    }

    pub fn clear(&mut self) {
        self.position = None;
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new(DEFAULT_INFLUENCE_RADIUS)
    }
}

/// What a window event means for the pointer, if anything.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Moved(Vec2),
    Left,
}

/// Translate a winit window event into a pointer event.
///
/// Cursor positions arrive in physical pixels and are reported in logical
/// pixels, matching [`Viewport::logical`](crate::viewport::Viewport::logical).
pub fn pointer_event(event: &WindowEvent, scale_factor: f64) -> Option<PointerEvent> {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            Some(PointerEvent::Moved(logical_point(*position, scale_factor)))
        }
        WindowEvent::CursorLeft { .. } => Some(PointerEvent::Left),
        _ => None,
    }
}

/// Physical cursor position to logical pixels.
pub fn logical_point(position: PhysicalPosition<f64>, scale_factor: f64) -> Vec2 {
    let p: LogicalPosition<f32> = position.to_logical(scale_factor);
    Vec2::new(p.x, p.y)
}
