//! Game configuration (JSON).
//!
//! A config bundles the renderer and input parameters with a small demo map:
//! rows of tile characters, a legend from characters to tiles, and the player
//! sprite. Everything is read once at startup and never mutated.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::input::InputParams;
use crate::term::RendererParams;
use crate::types::{Background, Palette, Position, Rgb, Tile};

pub const DEFAULT_TICK_MS: u64 = 50;

fn default_tick_ms() -> u64 {
    DEFAULT_TICK_MS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub position: Position,
    pub sprite: Tile,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapConfig {
    /// One string per tile row; `rows[y].chars().nth(x)` is the tile at `(x, y)`.
    pub rows: Vec<String>,
    /// Single-character keys. Characters without an entry are empty.
    #[serde(default)]
    pub legend: BTreeMap<String, Tile>,
    /// Characters the player cannot step onto.
    #[serde(default)]
    pub solid: String,
    pub player: PlayerConfig,
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

impl MapConfig {
    pub fn char_at(&self, (x, y): Position) -> Option<char> {
        let x = usize::try_from(x).ok()?;
        let y = usize::try_from(y).ok()?;
        self.rows.get(y)?.chars().nth(x)
    }

    /// Legend tile for a map character.
    pub fn tile_for(&self, ch: char) -> Option<&Tile> {
        let mut key = [0u8; 4];
        self.legend.get(&*ch.encode_utf8(&mut key))
    }

    /// Every legend tile on the map with its position, row-major.
    pub fn placed_tiles(&self) -> Vec<(Position, &Tile)> {
        let mut out = Vec::new();
        for (y, row) in self.rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if let Some(tile) = self.tile_for(ch) {
                    out.push(((x as i32, y as i32), tile));
                }
            }
        }
        out
    }

    /// True when the player may stand on `pos`: inside the map and not solid.
    pub fn is_walkable(&self, pos: Position) -> bool {
        match self.char_at(pos) {
            Some(ch) => !self.solid.contains(ch),
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub renderer: RendererParams,
    #[serde(default)]
    pub input: InputParams,
    pub map: MapConfig,
}

impl GameConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: GameConfig = serde_json::from_str(s).context("invalid game config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("failed to load config {}", path.display()))?;
        tracing::info!(path = %path.display(), "config loaded");
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let r = &self.renderer;
        if r.cell_width == 0 || r.cell_height == 0 || r.screen_width == 0 || r.screen_height == 0 {
            bail!("renderer cell and screen sizes must be non-zero");
        }
        if r.canvas_size().is_none() {
            bail!("renderer canvas size overflows");
        }
        if let Some(key) = self.map.legend.keys().find(|k| k.chars().count() != 1) {
            bail!("legend key {key:?} must be a single character");
        }
        if self.map.tick_ms == 0 {
            bail!("map.tick_ms must be positive");
        }
        Ok(())
    }
}

impl Default for GameConfig {
    /// Built-in demo: a walled room with a few pillars.
    fn default() -> Self {
        let colors = Palette::new(vec![
            Rgb::new(0x10, 0x14, 0x1c),
            Rgb::new(0x3a, 0x40, 0x4c),
            Rgb::new(0x8a, 0x6a, 0x3c),
            Rgb::new(0xe8, 0xc0, 0x40),
            Rgb::new(0x40, 0x90, 0xe0),
        ]);
        let renderer = RendererParams::new(4, 4, 12, 8)
            .with_colors(colors)
            .with_background(Background::Index(0));

        let rows = [
            "####################",
            "#..................#",
            "#..##..........##..#",
            "#..##....~~....##..#",
            "#........~~........#",
            "#..................#",
            "#..##..........##..#",
            "#..##..........##..#",
            "#..................#",
            "####################",
        ];

        let mut legend = BTreeMap::new();
        legend.insert("#".to_string(), Tile::Solid(2));
        legend.insert(".".to_string(), Tile::parse("1...\n....\n..1.\n...."));
        legend.insert("~".to_string(), Tile::parse("4444\n4144\n4441\n4444"));

        Self {
            renderer,
            input: InputParams::default().with_min_swipe_distance(3.0),
            map: MapConfig {
                rows: rows.iter().map(|r| r.to_string()).collect(),
                legend,
                solid: "#~".to_string(),
                player: PlayerConfig {
                    position: (2, 1),
                    sprite: Tile::parse(".33.\n3333\n.33.\n3..3"),
                },
                tick_ms: DEFAULT_TICK_MS,
            },
        }
    }
}
