//! Pixel canvas and the 2D drawing context the tile renderer paints through.

use crate::types::Rgb;

/// Largest canvas the in-memory backend will allocate (pixels).
pub const MAX_CANVAS_PIXELS: u64 = 1 << 26;

/// Minimal 2D drawing API.
///
/// Coordinates are canvas pixels and may be negative; implementations clip.
pub trait DrawContext {
    /// `(width, height)` in pixels.
    fn size(&self) -> (u32, u32);

    /// Make a rectangle transparent.
    fn clear_rect(&mut self, x: i64, y: i64, w: u32, h: u32);

    /// Paint a rectangle in a solid color.
    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb);
}

/// Source of drawing contexts (the host's canvas element).
pub trait CanvasBackend {
    type Context: DrawContext;

    /// Acquire a context of the given intrinsic size, or `None` if the host
    /// cannot provide one.
    fn context_2d(&mut self, width: u32, height: u32) -> Option<Self::Context>;
}

/// RGB pixel buffer; `None` pixels are transparent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Option<Rgb>>,
}

impl PixelCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        let len = (width as usize) * (height as usize);
        Self {
            width,
            height,
            pixels: vec![None; len],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Option<Rgb>] {
        &self.pixels
    }

    #[inline(always)]
    fn idx(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgb> {
        self.idx(x, y).and_then(|i| self.pixels[i])
    }

    /// True when no pixel is painted.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(Option::is_none)
    }

    /// Clip a rectangle to the canvas as `(x0, y0, x1, y1)`, or `None` if empty.
    fn clip(&self, x: i64, y: i64, w: u32, h: u32) -> Option<(usize, usize, usize, usize)> {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + i64::from(w)).min(i64::from(self.width));
        let y1 = (y + i64::from(h)).min(i64::from(self.height));
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as usize, y0 as usize, x1 as usize, y1 as usize))
    }

    fn fill(&mut self, x: i64, y: i64, w: u32, h: u32, value: Option<Rgb>) {
        let Some((x0, y0, x1, y1)) = self.clip(x, y, w, h) else {
            return;
        };
        let stride = self.width as usize;
        for row in y0..y1 {
            self.pixels[row * stride + x0..row * stride + x1].fill(value);
        }
    }
}

impl DrawContext for PixelCanvas {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear_rect(&mut self, x: i64, y: i64, w: u32, h: u32) {
        self.fill(x, y, w, h, None);
    }

    fn fill_rect(&mut self, x: i64, y: i64, w: u32, h: u32, color: Rgb) {
        self.fill(x, y, w, h, Some(color));
    }
}

/// Backend handing out in-memory [`PixelCanvas`]es.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBackend {
    max_pixels: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            max_pixels: MAX_CANVAS_PIXELS,
        }
    }

    pub fn with_max_pixels(max_pixels: u64) -> Self {
        Self { max_pixels }
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CanvasBackend for MemoryBackend {
    type Context = PixelCanvas;

    fn context_2d(&mut self, width: u32, height: u32) -> Option<PixelCanvas> {
        let area = u64::from(width) * u64::from(height);
        if area == 0 || area > self.max_pixels {
            return None;
        }
        Some(PixelCanvas::new(width, height))
    }
}
