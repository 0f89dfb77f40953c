//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in `GameState`, including the one
//! random source every decision draws from.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::agent::{PlayerIntent, first_exit};
use super::maze::{Cell, Direction, Maze, Row};
use crate::cell_center;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, no session exists
    Loading,
    /// Active gameplay
    Running,
    /// Simulation frozen
    Paused,
    /// Out of lives, waiting for a reset
    GameOver,
}

impl From<u8> for GamePhase {
    /// Raw phase codes from outside the simulation; anything unknown is Loading
    fn from(raw: u8) -> Self {
        match raw {
            0 => GamePhase::Loading,
            1 => GamePhase::Running,
            2 => GamePhase::Paused,
            3 => GamePhase::GameOver,
            other => {
                log::warn!("Unknown game phase {other}, falling back to Loading");
                GamePhase::Loading
            }
        }
    }
}

/// Discrete notifications for audio and other observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    GameStart,
    /// Player reached the centre of a cell for the first time
    Chomp,
    CollectLife,
    CollectPower,
    InvincibilityEnded,
    EatGhost,
    LoseLife,
    GameOver,
}

/// Cell coordinate plus continuous world position and facing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub col: usize,
    pub row: usize,
    /// World position (origin at the bottom-left of maze row 0)
    pub pos: Vec2,
    pub direction: Direction,
}

impl Position {
    /// Centred in a cell
    pub fn at_cell(col: usize, row: usize, direction: Direction) -> Self {
        Self {
            col,
            row,
            pos: cell_center(col, row),
            direction,
        }
    }

    #[inline]
    pub fn cell(&self) -> (usize, usize) {
        (self.col, self.row)
    }

    /// Exactly on the centre of the current cell
    pub fn is_centered(&self) -> bool {
        self.pos == cell_center(self.col, self.row)
    }

    /// Move `rows` rows down, as when the maze drops its bottom rows.
    /// Returns false when the position fell off the bottom.
    pub fn shift_down(&mut self, rows: usize) -> bool {
        self.pos.y -= rows as f32 * CELL_SIZE;
        match self.row.checked_sub(rows) {
            Some(row) => {
                self.row = row;
                true
            }
            None => false,
        }
    }
}

/// The player
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pacman {
    pub position: Position,
}

/// Ghost appearance; behaviour is identical for all four
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GhostKind {
    Blinky,
    Pinky,
    Inky,
    Clyde,
}

impl GhostKind {
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => GhostKind::Blinky,
            1 => GhostKind::Pinky,
            2 => GhostKind::Inky,
            _ => GhostKind::Clyde,
        }
    }
}

/// An autonomous chaser
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ghost {
    pub position: Position,
    pub kind: GhostKind,
}

impl Ghost {
    pub fn new(col: usize, row: usize, kind: GhostKind, direction: Direction) -> Self {
        Self {
            position: Position::at_cell(col, row, direction),
            kind,
        }
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerKind {
    /// One extra life, up to the cap
    Life,
    /// Temporary invincibility; ghosts flee and can be eaten
    Invincibility,
}

/// A collectible sitting at a cell centre
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Power {
    pub position: Position,
    pub kind: PowerKind,
}

impl Power {
    pub fn new(col: usize, row: usize, kind: PowerKind) -> Self {
        Self {
            position: Position::at_cell(col, row, Direction::North),
            kind,
        }
    }
}

/// Per-run state; exists from the start trigger until the reset after game over
#[derive(Debug, Clone)]
pub struct Session {
    pub maze: Maze,
    pub pacman: Pacman,
    pub intent: PlayerIntent,
    pub ghosts: Vec<Ghost>,
    pub powers: Vec<Power>,
    pub lives: u32,
    pub score: u64,
    /// Camera offset (world units) of the visible window above maze row 0
    pub scroll_offset: f32,
    /// Tick at which invincibility ends, when active
    pub invincible_until: Option<u64>,
}

impl Session {
    /// Build a fresh run: new maze, player on row 0, powers and ghosts spread
    /// over the visible window.
    pub fn spawn<R: Rng + ?Sized>(settings: &Settings, rng: &mut R) -> Self {
        let mut maze = Maze::populated(INITIAL_ROWS, rng);

        let start_col = rng.random_range(0..COLUMNS);
        let pacman = Pacman {
            position: Position::at_cell(start_col, 0, Direction::North),
        };
        if let Some(cell) = maze.cell_mut(0, start_col) {
            cell.visited = true;
        }

        let mut powers = Vec::new();
        for band in (0..VIEW_ROWS).step_by(4) {
            let col = rng.random_range(0..COLUMNS);
            let offset = rng.random_range(0..4);
            let kind = if offset % 2 == 0 {
                PowerKind::Life
            } else {
                PowerKind::Invincibility
            };
            powers.push(Power::new(col, band + offset, kind));
        }

        let mut ghosts = Vec::new();
        for band in (0..VIEW_ROWS).step_by(2) {
            // Alternate between the left and right half of the board
            let col = if band % 4 == 0 {
                rng.random_range(0..COLUMNS / 2)
            } else {
                rng.random_range(COLUMNS / 2..COLUMNS)
            };
            let row = band + rng.random_range(0..2);
            let heading = maze.cell(row, col).map(first_exit).unwrap_or(Direction::North);
            ghosts.push(Ghost::new(col, row, GhostKind::from_index(col + row), heading));
        }

        Self {
            maze,
            pacman,
            intent: PlayerIntent::new(Direction::North),
            ghosts,
            powers,
            lives: settings.start_lives,
            score: settings.start_score,
            scroll_offset: 0.0,
            invincible_until: None,
        }
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_until.is_some()
    }

    /// Walls of a cell in the maze (a closed box outside the maze)
    pub fn cell_at(&self, (col, row): (usize, usize)) -> Cell {
        self.maze.cell(row, col).copied().unwrap_or(Cell::CLOSED)
    }
}

/// Read-only view handed to renderers each tick
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub time_ticks: u64,
    pub score: u64,
    pub lives: u32,
    pub invincible: bool,
    pub scroll_offset: f32,
    /// Visible rows, bottom first
    pub maze: &'a [Row],
    pub pacman: Option<&'a Pacman>,
    pub ghosts: &'a [Ghost],
    pub powers: &'a [Power],
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Shared random source for maze carving, spawning and ghost choices
    pub rng: Pcg32,
    /// Gameplay tunables
    pub settings: Settings,
    /// Current phase
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Live run, absent while Loading
    pub session: Option<Session>,
    /// Events raised by the most recent tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state with the given seed and default settings
    pub fn new(seed: u64) -> Self {
        Self::with_settings(seed, Settings::default())
    }

    /// Create a new game state; settings that fail validation are replaced
    /// by the defaults.
    pub fn with_settings(seed: u64, settings: Settings) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::warn!("{e}, using default settings");
                Settings::default()
            }
        };
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::Loading,
            time_ticks: 0,
            session: None,
            events: Vec::new(),
        }
    }

    /// Drop the current run and return to the title phase
    pub fn reset(&mut self) {
        self.session = None;
        self.phase = GamePhase::Loading;
    }

    /// Build the view a renderer draws from
    pub fn snapshot(&self) -> Snapshot<'_> {
        match &self.session {
            Some(session) => Snapshot {
                phase: self.phase,
                time_ticks: self.time_ticks,
                score: session.score,
                lives: session.lives,
                invincible: session.is_invincible(),
                scroll_offset: session.scroll_offset,
                maze: session.maze.window(0, VIEW_ROWS),
                pacman: Some(&session.pacman),
                ghosts: &session.ghosts,
                powers: &session.powers,
            },
            None => Snapshot {
                phase: self.phase,
                time_ticks: self.time_ticks,
                score: 0,
                lives: 0,
                invincible: false,
                scroll_offset: 0.0,
                maze: &[],
                pacman: None,
                ghosts: &[],
                powers: &[],
            },
        }
    }
}
