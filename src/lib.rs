//! Tile-based 2D game runtime for the terminal (workspace facade crate).
//!
//! Re-exports the workspace crates under short names
//! (`tui_tiles::{core,input,term,types}`) and owns the JSON game config used
//! by the binaries.

pub mod config;

pub use tui_tiles_core as core;
pub use tui_tiles_input as input;
pub use tui_tiles_term as term;
pub use tui_tiles_types as types;

pub use config::{GameConfig, MapConfig, PlayerConfig};
