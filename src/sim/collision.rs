//! Collision tests between actors and cell walls
//!
//! Walls block at an inset line `WALL_INSET` inside each cell edge rather than
//! at the edge itself. The four inset corner squares block unconditionally so
//! an actor can never slip diagonally past the end of a wall.

use glam::Vec2;

use super::maze::{Cell, Direction};
use crate::cell_origin;
use crate::consts::{CELL_SIZE, WALL_INSET};

/// Axis-aligned box around an actor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub min: Vec2,
    pub max: Vec2,
}

impl Hitbox {
    pub fn around(center: Vec2, half_width: f32) -> Self {
        Self {
            min: center - Vec2::splat(half_width),
            max: center + Vec2::splat(half_width),
        }
    }
}

/// Whether an actor of `half_width` may occupy `candidate` while in `cell`.
///
/// `cell` is the (column, row) the actor currently occupies; `walls` is that
/// cell's wall configuration.
pub fn can_move(half_width: f32, candidate: Vec2, cell: (usize, usize), walls: &Cell) -> bool {
    let hitbox = Hitbox::around(candidate, half_width);

    let start = cell_origin(cell.0, cell.1);
    let end = start + Vec2::splat(CELL_SIZE);

    let past_north = hitbox.max.y > end.y - WALL_INSET;
    let past_east = hitbox.max.x > end.x - WALL_INSET;
    let past_south = hitbox.min.y < start.y + WALL_INSET;
    let past_west = hitbox.min.x < start.x + WALL_INSET;

    if (past_north && !walls.is_open(Direction::North))
        || (past_east && !walls.is_open(Direction::East))
        || (past_south && !walls.is_open(Direction::South))
        || (past_west && !walls.is_open(Direction::West))
    {
        return false;
    }

    // Corner squares block regardless of the walls around them
    let in_corner = (past_north || past_south) && (past_east || past_west);
    !in_corner
}

/// Whether two actors touch: same cell and within `radius` on both axes
pub fn touches(
    a: Vec2,
    a_cell: (usize, usize),
    b: Vec2,
    b_cell: (usize, usize),
    radius: f32,
) -> bool {
    if a_cell != b_cell {
        return false;
    }
    (a.x - b.x).abs() < radius && (a.y - b.y).abs() < radius
}
