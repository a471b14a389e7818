//! Presenter: scales a placed canvas onto terminal cells.
//!
//! Host units are "dots": a terminal cell is one dot wide and two dots tall,
//! drawn as an upper half block with the upper dot as foreground and the lower
//! dot as background. Sampling is nearest-neighbor.

use crate::canvas::PixelCanvas;
use crate::fb::{Cell, CellStyle, FrameBuffer};
use crate::renderer::Placement;
use crate::types::Rgb;

pub const HALF_BLOCK: char = '▀';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presenter {
    clear: Rgb,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new(Rgb::BLACK)
    }
}

impl Presenter {
    /// `clear` shows through transparent pixels and the letterbox bars.
    pub fn new(clear: Rgb) -> Self {
        Self { clear }
    }

    pub fn compose(
        &self,
        canvas: &PixelCanvas,
        placement: &Placement,
        cols: u16,
        rows: u16,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(cols, rows);
        self.compose_into(canvas, placement, &mut fb);
        fb
    }

    /// Overwrite every cell of `fb`.
    pub fn compose_into(&self, canvas: &PixelCanvas, placement: &Placement, fb: &mut FrameBuffer) {
        for row in 0..fb.height() {
            let top_y = f64::from(row) * 2.0 + 0.5;
            for col in 0..fb.width() {
                let x = f64::from(col) + 0.5;
                let upper = self.sample(canvas, placement, x, top_y);
                let lower = self.sample(canvas, placement, x, top_y + 1.0);
                fb.set(
                    col,
                    row,
                    Cell {
                        ch: HALF_BLOCK,
                        style: CellStyle::new(upper, lower),
                    },
                );
            }
        }
    }

    fn sample(&self, canvas: &PixelCanvas, placement: &Placement, x: f64, y: f64) -> Rgb {
        if placement.width <= 0.0 || placement.height <= 0.0 {
            return self.clear;
        }
        let u = (x - placement.left) / placement.width;
        let v = (y - placement.top) / placement.height;
        if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
            return self.clear;
        }
        let px = ((u * f64::from(canvas.width())) as u32).min(canvas.width().saturating_sub(1));
        let py = ((v * f64::from(canvas.height())) as u32).min(canvas.height().saturating_sub(1));
        canvas.get(px, py).unwrap_or(self.clear)
    }
}
