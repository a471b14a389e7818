//! Raw host input events, already stamped with their own timestamps.

use tui_tiles_core::HostNotification;

/// A key-down as delivered by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyDown {
    /// DOM-style key code (`ArrowLeft`, `KeyW`, `Space`, ...).
    pub code: String,
    /// Fired by key auto-repeat rather than a fresh press.
    pub repeat: bool,
    pub timestamp_ms: u64,
}

impl KeyDown {
    pub fn press(code: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            code: code.into(),
            repeat: false,
            timestamp_ms,
        }
    }

    pub fn repeat(code: impl Into<String>, timestamp_ms: u64) -> Self {
        Self {
            code: code.into(),
            repeat: true,
            timestamp_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Down,
    Move,
    Up,
    Leave,
}

/// A pointer event in host units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(kind: PointerKind, x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self {
            kind,
            x,
            y,
            timestamp_ms,
        }
    }

    pub fn down(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(PointerKind::Down, x, y, timestamp_ms)
    }

    pub fn moved(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(PointerKind::Move, x, y, timestamp_ms)
    }

    pub fn up(x: f64, y: f64, timestamp_ms: u64) -> Self {
        Self::new(PointerKind::Up, x, y, timestamp_ms)
    }

    pub fn leave(timestamp_ms: u64) -> Self {
        Self::new(PointerKind::Leave, 0.0, 0.0, timestamp_ms)
    }
}

/// Everything the unifier accepts from the host event loop.
#[derive(Debug, Clone, PartialEq)]
pub enum RawInput {
    Key(KeyDown),
    Pointer(PointerEvent),
    Focus(bool),
    Layout(HostNotification),
}
