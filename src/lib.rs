//! Maze Chase - an arcade chase game in an endlessly scrolling maze
//!
//! Core modules:
//! - `sim`: Deterministic simulation (maze generation, movement, ghosts, game state)
//! - `settings`: Data-driven game balance
//! - `audio`: Mapping of simulation events to sound cues

pub mod audio;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per second
    pub const TICK_RATE: u32 = 60;

    /// Maze columns (fixed board width)
    pub const COLUMNS: usize = 10;
    /// Side length of one cell in world units
    pub const CELL_SIZE: f32 = 64.0;
    /// Rows visible to the player (and to ghost navigation)
    pub const VIEW_ROWS: usize = 24;
    /// Rows generated when a session starts
    pub const INITIAL_ROWS: usize = 32;

    /// Half-width of every actor's hitbox
    pub const HITBOX_HALF: f32 = 20.0;
    /// Distance of the blocking line from each cell edge
    pub const WALL_INSET: f32 = 12.0;

    /// Screen height (world units) above which the camera follows the player
    pub const SCROLL_ANCHOR: f32 = CELL_SIZE * 10.0;
}

use consts::CELL_SIZE;

/// World-space centre of a cell
#[inline]
pub fn cell_center(col: usize, row: usize) -> Vec2 {
    Vec2::new(
        col as f32 * CELL_SIZE + CELL_SIZE / 2.0,
        row as f32 * CELL_SIZE + CELL_SIZE / 2.0,
    )
}

/// World-space bottom-left corner of a cell
#[inline]
pub fn cell_origin(col: usize, row: usize) -> Vec2 {
    Vec2::new(col as f32 * CELL_SIZE, row as f32 * CELL_SIZE)
}
