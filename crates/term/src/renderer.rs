//! TileRenderer: rasterizes drawables onto a fixed-resolution canvas and keeps
//! that canvas letterboxed inside its container.
//!
//! The canvas resolution never changes after construction. Every logical
//! pixel is painted as a `ZOOM x ZOOM` block so nearest-neighbor scaling by the
//! presenter stays crisp at any displayed size.

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use tui_tiles_core::{Container, HostNotification};

use crate::canvas::{CanvasBackend, DrawContext, PixelCanvas};
use crate::types::{Background, Drawable, Palette, Position, ResizeEvent, Tile, ZOOM};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RendererParams {
    /// Logical pixels per cell, horizontally.
    pub cell_width: u32,
    /// Logical pixels per cell, vertically.
    pub cell_height: u32,
    /// Visible cells, horizontally.
    pub screen_width: u32,
    /// Visible cells, vertically.
    pub screen_height: u32,
    pub colors: Palette,
    #[serde(default)]
    pub background: Option<Background>,
}

impl RendererParams {
    pub fn new(cell_width: u32, cell_height: u32, screen_width: u32, screen_height: u32) -> Self {
        Self {
            cell_width,
            cell_height,
            screen_width,
            screen_height,
            colors: Palette::default(),
            background: None,
        }
    }

    pub fn with_colors(mut self, colors: Palette) -> Self {
        self.colors = colors;
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = Some(background);
        self
    }

    /// Intrinsic canvas size, or `None` on overflow.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        let w = self
            .cell_width
            .checked_mul(self.screen_width)?
            .checked_mul(ZOOM)?;
        let h = self
            .cell_height
            .checked_mul(self.screen_height)?
            .checked_mul(ZOOM)?;
        Some((w, h))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// Wider-or-square canvases are horizontal.
pub fn orientation(canvas_width: u32, canvas_height: u32) -> Orientation {
    if canvas_width < canvas_height {
        Orientation::Vertical
    } else {
        Orientation::Horizontal
    }
}

/// Displayed canvas box in host units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Placement {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub top: f64,
}

/// Fit the canvas inside the available box, centered, aspect preserved.
pub fn compute_placement(canvas_width: u32, canvas_height: u32, available: &ResizeEvent) -> Placement {
    let cw = f64::from(canvas_width);
    let ch = f64::from(canvas_height);
    let side = available.width.min(available.height).max(0.0);

    let (width, height) = match orientation(canvas_width, canvas_height) {
        Orientation::Horizontal => (side, side / cw * ch),
        Orientation::Vertical => (side / ch * cw, side),
    };

    Placement {
        width,
        height,
        left: (available.width - width) * 0.5 + available.left,
        top: (available.height - height) * 0.5 + available.top,
    }
}

pub struct TileRenderer<C: DrawContext = PixelCanvas> {
    params: RendererParams,
    container: Container,
    ctx: C,
    canvas_width: u32,
    canvas_height: u32,
    placement: Placement,
}

impl<C: DrawContext> TileRenderer<C> {
    /// Create the canvas and place it inside `container`.
    ///
    /// Fails only when the backend cannot provide a drawing context.
    pub fn new<B>(params: RendererParams, container: Container, backend: &mut B) -> Result<Self>
    where
        B: CanvasBackend<Context = C>,
    {
        let Some((canvas_width, canvas_height)) = params.canvas_size() else {
            bail!("canvas size overflows: {params:?}");
        };
        let Some(ctx) = backend.context_2d(canvas_width, canvas_height) else {
            bail!("failed to acquire a 2D drawing context ({canvas_width}x{canvas_height})");
        };

        tracing::info!(
            canvas_width,
            canvas_height,
            palette = params.colors.len(),
            "tile renderer created"
        );

        let mut renderer = Self {
            params,
            container,
            ctx,
            canvas_width,
            canvas_height,
            placement: Placement::default(),
        };
        let initial = renderer.container.make_resize_event();
        renderer.set_size(&initial);
        Ok(renderer)
    }

    pub fn params(&self) -> &RendererParams {
        &self.params
    }

    pub fn context(&self) -> &C {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut C {
        &mut self.ctx
    }

    pub fn canvas_size(&self) -> (u32, u32) {
        (self.canvas_width, self.canvas_height)
    }

    pub fn placement(&self) -> Placement {
        self.placement
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    /// Forward a layout notification; re-places the canvas when it applies.
    pub fn handle_layout(&mut self, notification: HostNotification) -> bool {
        match self.container.notify(notification) {
            Some(event) => {
                self.set_size(&event);
                true
            }
            None => false,
        }
    }

    pub fn set_size(&mut self, available: &ResizeEvent) {
        self.placement = compute_placement(self.canvas_width, self.canvas_height, available);
        tracing::trace!(
            width = self.placement.width,
            height = self.placement.height,
            left = self.placement.left,
            top = self.placement.top,
            "canvas placed"
        );
    }

    /// Repaint the frame. Later drawables overpaint earlier ones.
    pub fn render(&mut self, drawables: &[Drawable<'_>], camera: Position) {
        self.clear();
        let (camera_x, camera_y) = camera;
        let cw = i64::from(self.params.cell_width);
        let ch = i64::from(self.params.cell_height);

        for item in drawables {
            let Some(sprite) = item.sprite else {
                continue;
            };
            if item.visible == Some(false) {
                continue;
            }
            let (tile_x, tile_y) = item.position;
            let screen_x = (i64::from(tile_x) - i64::from(camera_x)) * cw;
            let screen_y = (i64::from(tile_y) - i64::from(camera_y)) * ch;
            self.draw_tile(sprite, screen_x, screen_y);
        }
    }

    pub fn clear(&mut self) {
        self.ctx
            .clear_rect(0, 0, self.canvas_width, self.canvas_height);
        let Some(background) = self.params.background else {
            return;
        };
        let color = self.params.colors.resolve_background(background);
        self.ctx
            .fill_rect(0, 0, self.canvas_width, self.canvas_height, color);
    }

    /// Paint one tile at a screen position in logical pixels.
    pub fn draw_tile(&mut self, tile: &Tile, screen_x: i64, screen_y: i64) {
        let cw = i64::from(self.params.cell_width);
        let ch = i64::from(self.params.cell_height);
        let screen_w = i64::from(self.params.screen_width) * cw;
        let screen_h = i64::from(self.params.screen_height) * ch;
        if screen_x + cw <= 0 || screen_y + ch <= 0 || screen_x >= screen_w || screen_y >= screen_h {
            return;
        }

        let zoom = i64::from(ZOOM);
        match tile {
            Tile::Solid(index) => {
                let Some(color) = self.params.colors.get(*index) else {
                    return;
                };
                self.ctx.fill_rect(
                    screen_x * zoom,
                    screen_y * zoom,
                    self.params.cell_width * ZOOM,
                    self.params.cell_height * ZOOM,
                    color,
                );
            }
            Tile::Glyph(grid) => {
                for y in 0..self.params.cell_height as usize {
                    for x in 0..self.params.cell_width as usize {
                        let Some(index) = grid.get(x, y) else {
                            continue;
                        };
                        let Some(color) = self.params.colors.get(usize::from(index)) else {
                            continue;
                        };
                        self.ctx.fill_rect(
                            (screen_x + x as i64) * zoom,
                            (screen_y + y as i64) * zoom,
                            ZOOM,
                            ZOOM,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Release the container subscription. The canvas goes with `self`.
    pub fn dispose(&mut self) {
        self.container.dispose();
    }
}
