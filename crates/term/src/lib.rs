//! Tile rendering and terminal presentation.
//!
//! The [`TileRenderer`] paints drawables onto a fixed-resolution
//! [`PixelCanvas`] and keeps it letterboxed inside a container. The
//! [`Presenter`] samples that canvas into half-block terminal cells and the
//! [`TerminalRenderer`] flushes the cells with diffing.
//!
//! Pipeline per frame:
//! - `TileRenderer::render` (drawables -> canvas)
//! - `Presenter::compose_into` (canvas + placement -> framebuffer)
//! - `TerminalRenderer::draw_swap` (framebuffer -> terminal)

pub mod canvas;
pub mod fb;
pub mod present;
pub mod renderer;
pub mod terminal;

pub use tui_tiles_core as core;
pub use tui_tiles_types as types;

pub use canvas::{CanvasBackend, DrawContext, MemoryBackend, PixelCanvas, MAX_CANVAS_PIXELS};
pub use fb::{Cell, CellStyle, FrameBuffer};
pub use present::{Presenter, HALF_BLOCK};
pub use renderer::{
    compute_placement, orientation, Orientation, Placement, RendererParams, TileRenderer,
};
pub use terminal::{encode_diff_into, encode_full_into, viewport_dots, TerminalRenderer};
