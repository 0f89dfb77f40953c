//! Game balance settings
//!
//! Every gameplay tunable lives here so a run can be rebalanced from a JSON
//! file without touching the simulation. Fixed board geometry stays in
//! `crate::consts`.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{CELL_SIZE, TICK_RATE, VIEW_ROWS};

/// Errors raised while loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Settings file is not valid JSON for `Settings`
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    /// Values parsed but cannot drive a game
    #[error("Invalid settings: {0}")]
    Invalid(String),
}

/// Gameplay tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Movement ===
    /// Player speed (world units per tick)
    pub player_speed: f32,
    /// Ghost speed (world units per tick)
    pub ghost_speed: f32,

    // === Scoring ===
    /// Lives at the start of a run
    pub start_lives: u32,
    /// Life powers are ignored at this many lives
    pub max_lives: u32,
    /// Score at the start of a run
    pub start_score: u64,
    /// Bonus for eating a ghost while invincible
    pub ghost_bonus: u64,
    /// Length of the invincibility window in ticks
    pub invincibility_ticks: u64,

    // === Scrolling ===
    /// Rows dropped from the bottom of the maze per scroll step
    pub compact_rows: usize,
    /// Rows appended when the buffer above the window runs low
    pub grow_rows: usize,
    /// Minimum rows kept generated above the visible window
    pub min_buffer_rows: usize,
    /// Scroll once the player is this many rows from the window top
    pub scroll_margin_rows: usize,

    // === Contact ===
    /// Per-axis distance at which the player picks up a power
    pub power_touch_radius: f32,
    /// Per-axis distance at which the player and a ghost touch
    pub ghost_touch_radius: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Movement
            player_speed: 2.0,
            ghost_speed: 1.0,

            // Scoring
            start_lives: 5,
            max_lives: 7,
            start_score: 1,
            ghost_bonus: 200,
            invincibility_ticks: 10 * TICK_RATE as u64,

            // Scrolling
            compact_rows: 4,
            grow_rows: 16,
            min_buffer_rows: 4,
            scroll_margin_rows: 8,

            // Contact
            power_touch_radius: 20.0,
            ghost_touch_radius: 30.0,
        }
    }
}

impl Settings {
    /// Parse and validate settings from a JSON string; missing fields keep defaults
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Check that the values keep the simulation well formed
    pub fn validate(&self) -> Result<(), SettingsError> {
        check_speed("player_speed", self.player_speed)?;
        check_speed("ghost_speed", self.ghost_speed)?;

        if self.start_lives == 0 {
            return Err(SettingsError::Invalid("start_lives must be at least 1".into()));
        }
        if self.max_lives < self.start_lives {
            return Err(SettingsError::Invalid(format!(
                "max_lives ({}) is below start_lives ({})",
                self.max_lives, self.start_lives
            )));
        }
        if self.scroll_margin_rows == 0 || self.scroll_margin_rows >= VIEW_ROWS {
            return Err(SettingsError::Invalid(format!(
                "scroll_margin_rows must be in 1..{VIEW_ROWS}"
            )));
        }
        if self.compact_rows == 0 || self.compact_rows >= self.scroll_threshold_row() {
            return Err(SettingsError::Invalid(format!(
                "compact_rows must be in 1..{}",
                self.scroll_threshold_row()
            )));
        }
        if self.grow_rows < self.compact_rows {
            return Err(SettingsError::Invalid(
                "grow_rows must be at least compact_rows".into(),
            ));
        }
        if self.power_touch_radius <= 0.0 || self.ghost_touch_radius <= 0.0 {
            return Err(SettingsError::Invalid("touch radii must be positive".into()));
        }
        Ok(())
    }

    /// Player row at which the maze scrolls
    pub fn scroll_threshold_row(&self) -> usize {
        VIEW_ROWS.saturating_sub(self.scroll_margin_rows)
    }
}

/// Speeds must land exactly on every cell centre
fn check_speed(name: &str, speed: f32) -> Result<(), SettingsError> {
    let steps = CELL_SIZE / 2.0 / speed;
    if !(speed > 0.0) || steps.fract() != 0.0 {
        return Err(SettingsError::Invalid(format!(
            "{name} ({speed}) must be positive and divide half a cell ({})",
            CELL_SIZE / 2.0
        )));
    }
    Ok(())
}
