//! The host an engine is mounted in.
//!
//! A host schedules frame callbacks and delivers pointer, resize and theme
//! signals. The engine attaches one listener per [`SignalKind`] on start and
//! detaches all of them on stop; a host must not deliver signals of a kind
//! nobody listens to.

use glam::Vec2;
use std::collections::BTreeMap;
use tracing::trace;

use crate::theme::ThemeMode;
use crate::viewport::Viewport;

/// Handle of one scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FrameToken(pub u64);

/// Handle of one attached listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SignalKind {
    Pointer,
    Resize,
    Theme,
}

impl SignalKind {
    pub const ALL: [SignalKind; 3] = [SignalKind::Pointer, SignalKind::Resize, SignalKind::Theme];
}

/// An external event delivered to the engine between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    PointerMoved(Vec2),
    PointerLeft,
    Resized(Viewport),
    ThemeChanged(ThemeMode),
}

impl Signal {
    pub fn kind(&self) -> SignalKind {
        match self {
            Signal::PointerMoved(_) | Signal::PointerLeft => SignalKind::Pointer,
            Signal::Resized(_) => SignalKind::Resize,
            Signal::ThemeChanged(_) => SignalKind::Theme,
        }
    }
}

/// Frame scheduling and listener registration.
pub trait Host {
    /// Schedule one frame callback.
    fn request_frame(&mut self) -> FrameToken;

    /// Cancel a scheduled callback. Unknown or already fired tokens are ignored.
    fn cancel_frame(&mut self, token: FrameToken);

    fn listen(&mut self, kind: SignalKind) -> ListenerId;

    /// Detach a listener. Unknown ids are ignored.
    fn unlisten(&mut self, id: ListenerId);
}

/// A host driven by hand: headless runs and tests.
///
/// At most one frame is pending at a time, like a display's frame callback.
#[derive(Debug, Default)]
pub struct ManualHost {
    next_id: u64,
    pending: Option<FrameToken>,
    listeners: BTreeMap<ListenerId, SignalKind>,
    requested: u64,
    cancelled: u64,
}

impl ManualHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn pending_frame(&self) -> Option<FrameToken> {
        self.pending
    }

    /// Fire the pending frame, if any. The caller then runs the engine's frame.
    pub fn take_frame(&mut self) -> Option<FrameToken> {
        self.pending.take()
    }

    pub fn is_listening(&self, kind: SignalKind) -> bool {
        self.listeners.values().any(|k| *k == kind)
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Whether a listener would receive `signal`.
    pub fn deliverable(&self, signal: &Signal) -> bool {
        self.is_listening(signal.kind())
    }

    /// Frames requested over the host's lifetime.
    pub fn frames_requested(&self) -> u64 {
        self.requested
    }

    pub fn frames_cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl Host for ManualHost {
    fn request_frame(&mut self) -> FrameToken {
        let token = FrameToken(self.next_id());
        self.pending = Some(token);
        self.requested += 1;
        trace!(token = token.0, "frame requested");
        token
    }

    fn cancel_frame(&mut self, token: FrameToken) {
        if self.pending == Some(token) {
            self.pending = None;
            self.cancelled += 1;
        }
    }

    fn listen(&mut self, kind: SignalKind) -> ListenerId {
        let id = ListenerId(self.next_id());
        self.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_kinds() {
        assert_eq!(Signal::PointerLeft.kind(), SignalKind::Pointer);
        assert_eq!(Signal::Resized(Viewport::new(1.0, 1.0)).kind(), SignalKind::Resize);
        assert_eq!(Signal::ThemeChanged(ThemeMode::Light).kind(), SignalKind::Theme);
    }

    #[test]
    fn test_cancel_only_matching_token() {
        let mut host = ManualHost::new();
        let first = host.request_frame();
        let second = host.request_frame();
        host.cancel_frame(first);
        assert_eq!(host.pending_frame(), Some(second));
        host.cancel_frame(second);
        assert_eq!(host.pending_frame(), None);
        assert_eq!(host.frames_cancelled(), 1);
    }

    #[test]
    fn test_listeners_gate_delivery() {
        let mut host = ManualHost::new();
        let signal = Signal::PointerMoved(Vec2::ONE);
        assert!(!host.deliverable(&signal));

        let id = host.listen(SignalKind::Pointer);
        assert!(host.deliverable(&signal));
        host.unlisten(id);
        host.unlisten(id);
        assert!(!host.deliverable(&signal));
        assert_eq!(host.listener_count(), 0);
    }
}
