//! Heading decisions for the player and the ghosts
//!
//! The player turns only where the maze allows it. Ghosts read nothing but
//! their own cell's walls and the player's cell, and pick the open neighbour
//! that brings them closest to the player (or furthest, while the player is
//! invincible).

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use super::maze::{Cell, Direction};
use crate::cell_center;

/// Player steering state
///
/// `requested` holds the last direction pressed until the player's cell lets
/// it through; `heading` is the accepted direction, applied to the facing as
/// soon as the player lines up with the cell centre.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    pub requested: Option<Direction>,
    pub heading: Direction,
}

impl PlayerIntent {
    pub fn new(heading: Direction) -> Self {
        Self {
            requested: None,
            heading,
        }
    }

    /// Record a fresh direction press (replaces any pending one)
    pub fn request(&mut self, dir: Direction) {
        self.requested = Some(dir);
    }

    /// Accept the pending request if `cell` is open on that side
    pub fn resolve(&mut self, cell: &Cell) -> Direction {
        if let Some(dir) = self.requested {
            if cell.is_open(dir) {
                self.heading = dir;
                self.requested = None;
            }
        }
        self.heading
    }
}

/// Number of closed sides
pub fn wall_count(cell: &Cell) -> usize {
    Direction::ALL.iter().filter(|&&d| !cell.is_open(d)).count()
}

/// A cell with a real choice: not a dead end, not a straight corridor
pub fn is_intersection(cell: &Cell) -> bool {
    match wall_count(cell) {
        0 | 1 => true,
        2 => {
            let straight_ns = !cell.is_open(Direction::East) && !cell.is_open(Direction::West);
            let straight_ew = !cell.is_open(Direction::North) && !cell.is_open(Direction::South);
            !(straight_ns || straight_ew)
        }
        _ => false,
    }
}

pub fn is_dead_end(cell: &Cell) -> bool {
    wall_count(cell) >= 3
}

pub fn is_blocked(cell: &Cell, heading: Direction) -> bool {
    !cell.is_open(heading)
}

/// First open side in N, E, S, W order (North if fully closed)
pub fn first_exit(cell: &Cell) -> Direction {
    Direction::ALL
        .into_iter()
        .find(|&d| cell.is_open(d))
        .unwrap_or(Direction::North)
}

/// Whether a ghost flees from or closes in on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    Pursuit,
    Evasion,
}

/// What a ghost knows when it picks a heading
#[derive(Debug, Clone, Copy)]
pub struct GhostView<'a> {
    pub walls: &'a Cell,
    pub cell: (usize, usize),
    pub heading: Direction,
    pub player_cell: (usize, usize),
    /// Exclusive row limit for northward moves (top of the visible window)
    pub row_limit: usize,
    pub mode: GhostMode,
}

/// Pick a ghost's next heading.
///
/// Open sides are scanned in random order; the reverse of the current heading
/// is only used when nothing else is open. Distance ties keep the earlier
/// candidate in scan order.
pub fn choose_heading<R: Rng + ?Sized>(view: &GhostView<'_>, rng: &mut R) -> Direction {
    if view.cell == view.player_cell {
        return view.heading;
    }

    let target = cell_center(view.player_cell.0, view.player_cell.1);
    let reverse = view.heading.opposite();

    let mut order = Direction::ALL;
    order.shuffle(rng);

    let mut best: Option<(Direction, f32)> = None;
    let mut fallback = None;
    for dir in order {
        if !view.walls.is_open(dir) {
            continue;
        }
        let Some(next) = neighbour(view.cell, dir, view.row_limit) else {
            continue;
        };
        if dir == reverse {
            fallback = Some(dir);
            continue;
        }

        let dist = cell_center(next.0, next.1).distance(target);
        let better = match (best, view.mode) {
            (None, _) => true,
            (Some((_, d)), GhostMode::Pursuit) => dist < d,
            (Some((_, d)), GhostMode::Evasion) => dist > d,
        };
        if better {
            best = Some((dir, dist));
        }
    }

    best.map(|(dir, _)| dir).or(fallback).unwrap_or(view.heading)
}

fn neighbour(cell: (usize, usize), dir: Direction, row_limit: usize) -> Option<(usize, usize)> {
    let (dx, dy) = dir.delta();
    let col = cell.0.checked_add_signed(dx)?;
    let row = cell.1.checked_add_signed(dy)?;
    (row < row_limit).then_some((col, row))
}
