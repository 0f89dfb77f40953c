//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only, one stream per game
//! - Stable iteration order (spawn order of ghosts and powers)
//! - No rendering or platform dependencies

pub mod agent;
pub mod collision;
pub mod maze;
pub mod state;
pub mod tick;

pub use agent::{GhostMode, GhostView, PlayerIntent, choose_heading};
pub use collision::{Hitbox, can_move, touches};
pub use maze::{Cell, Direction, MERGE_PROBABILITY, Maze, Row, Wall};
pub use state::{
    GameEvent, GamePhase, GameState, Ghost, GhostKind, Pacman, Position, Power, PowerKind,
    Session, Snapshot,
};
pub use tick::{TickInput, tick};
