//! Tiles: solid palette colors or multi-line glyph grids.

use serde::{Deserialize, Serialize};

/// A paintable unit, decided once when the tile is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TileRepr", into = "TileRepr")]
pub enum Tile {
    /// The whole cell in one palette color.
    Solid(usize),
    /// One palette index (or transparency) per pixel of the cell.
    Glyph(GlyphGrid),
}

impl Tile {
    /// Build a glyph tile from its text form.
    pub fn parse(text: &str) -> Self {
        Tile::Glyph(GlyphGrid::parse(text))
    }
}

impl From<usize> for Tile {
    fn from(index: usize) -> Self {
        Tile::Solid(index)
    }
}

/// Character grid of palette indices.
///
/// Lines are trimmed and blank lines dropped, so glyphs can be written
/// indented inside source code or JSON. Every ASCII digit is an index; any
/// other character is transparent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GlyphGrid {
    rows: Vec<Vec<Option<u8>>>,
    source: String,
}

impl GlyphGrid {
    pub fn parse(text: &str) -> Self {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                line.chars()
                    .map(|ch| ch.to_digit(10).map(|d| d as u8))
                    .collect()
            })
            .collect();
        Self {
            rows,
            source: text.to_string(),
        }
    }

    /// Palette index at `(x, y)`; `None` for transparent or out-of-grid.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        self.rows.get(y)?.get(x).copied().flatten()
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Length of the longest row.
    pub fn width(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum TileRepr {
    Index(usize),
    Text(String),
}

impl From<TileRepr> for Tile {
    fn from(value: TileRepr) -> Self {
        match value {
            TileRepr::Index(i) => Tile::Solid(i),
            TileRepr::Text(s) => Tile::parse(&s),
        }
    }
}

impl From<Tile> for TileRepr {
    fn from(value: Tile) -> Self {
        match value {
            Tile::Solid(i) => TileRepr::Index(i),
            Tile::Glyph(grid) => TileRepr::Text(grid.source),
        }
    }
}
