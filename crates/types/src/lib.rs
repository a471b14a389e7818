//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the runtime.
//! All types are plain data with no I/O, making them usable in any context
//! (container, input unification, rendering, configuration).
//!
//! # Timing Constants
//!
//! Timing values are in milliseconds and measured against event timestamps:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `KEY_DEBOUNCE_MS` | 200 | Minimum gap between two repeat-fired key-downs of one code |
//! | `TOUCH_DEBOUNCE_MS` | 200 | Minimum gap between two recognized swipe gestures |
//!
//! # Rendering Constants
//!
//! - `ZOOM`: 24 - every logical pixel is drawn as a 24x24 block on the canvas
//! - `MIN_SWIPE_DISTANCE`: 30 - pointer travel (host units) before a move is a swipe
//!
//! # Examples
//!
//! ```
//! use tui_tiles_types::{Input, Tile, Drawable};
//!
//! let input = Input::from_str("left").unwrap();
//! assert_eq!(input, Input::Left);
//!
//! let tile = Tile::parse("
//!     .1.
//!     111
//! ");
//! let player = Drawable::new(&tile, (3, 4));
//! assert!(player.is_paintable());
//! ```

pub mod color;
pub mod tile;

pub use color::{Background, Palette, Rgb};
pub use tile::{GlyphGrid, Tile};

use serde::{Deserialize, Serialize};

/// Canvas upscaling factor applied to every logical pixel.
pub const ZOOM: u32 = 24;

/// Key-repeat debounce window (milliseconds).
pub const KEY_DEBOUNCE_MS: u64 = 200;

/// Swipe gesture debounce window (milliseconds).
pub const TOUCH_DEBOUNCE_MS: u64 = 200;

/// Minimum pointer travel on either axis before a move counts as a swipe.
pub const MIN_SWIPE_DISTANCE: f64 = 30.0;

/// Discrete player intent produced by the input unifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Input {
    Left,
    Up,
    Right,
    Down,
    Action,
}

impl Input {
    pub const ALL: [Input; 5] = [
        Input::Left,
        Input::Up,
        Input::Right,
        Input::Down,
        Input::Action,
    ];

    /// Parse input from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Input::Left),
            "up" => Some(Input::Up),
            "right" => Some(Input::Right),
            "down" => Some(Input::Down),
            "action" => Some(Input::Action),
            _ => None,
        }
    }

    /// Convert to the upper-case name used in control maps
    pub fn as_str(&self) -> &'static str {
        match self {
            Input::Left => "LEFT",
            Input::Up => "UP",
            Input::Right => "RIGHT",
            Input::Down => "DOWN",
            Input::Action => "ACTION",
        }
    }

    /// Tile-space step for directional inputs.
    pub fn delta(&self) -> Option<(i32, i32)> {
        match self {
            Input::Left => Some((-1, 0)),
            Input::Up => Some((0, -1)),
            Input::Right => Some((1, 0)),
            Input::Down => Some((0, 1)),
            Input::Action => None,
        }
    }
}

/// Tile coordinates `(x, y)`.
pub type Position = (i32, i32);

/// Normalized resize notification in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResizeEvent {
    pub height: f64,
    pub width: f64,
    pub left: f64,
    pub top: f64,
}

impl ResizeEvent {
    pub const fn new(height: f64, width: f64, left: f64, top: f64) -> Self {
        Self {
            height,
            width,
            left,
            top,
        }
    }
}

/// One renderable entity for one frame.
///
/// The sprite is borrowed: the renderer never keeps drawables across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drawable<'a> {
    pub sprite: Option<&'a Tile>,
    pub position: Position,
    pub visible: Option<bool>,
}

impl<'a> Drawable<'a> {
    pub fn new(sprite: &'a Tile, position: Position) -> Self {
        Self {
            sprite: Some(sprite),
            position,
            visible: None,
        }
    }

    /// A drawable with no sprite (never painted).
    pub fn empty(position: Position) -> Self {
        Self {
            sprite: None,
            position,
            visible: None,
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = Some(visible);
        self
    }

    /// Only an explicit `visible == false` hides a sprite.
    pub fn is_paintable(&self) -> bool {
        self.sprite.is_some() && self.visible != Some(false)
    }
}
