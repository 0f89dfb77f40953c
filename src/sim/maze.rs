//! Infinite maze generation
//!
//! Rows are produced one at a time with a relaxed Eller's algorithm: every
//! horizontally joined run of cells in the row below gets at least one
//! passage into the new row, then adjacent cells of the new row are merged at
//! random. The merge pass ignores set membership, so the result has loops.
//!
//! Row 0 is the bottom of the maze and North points toward higher rows. The
//! maze only grows at the top and only shrinks at the bottom.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::COLUMNS;

/// Probability that two horizontally adjacent cells are joined
pub const MERGE_PROBABILITY: f64 = 0.7;

/// Compass direction, also used to index a cell's walls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// Unit step in cell coordinates (columns, rows)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::East => (1, 0),
            Direction::South => (0, -1),
            Direction::West => (-1, 0),
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Direction::North | Direction::South)
    }
}

/// State of one side of a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Wall {
    Open,
    #[default]
    Closed,
}

/// One grid unit of the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cell {
    /// Walls indexed by `Direction::index`
    pub walls: [Wall; 4],
    /// Player has passed through the centre of this cell
    pub visited: bool,
}

impl Cell {
    /// A fully closed, unvisited cell
    pub const CLOSED: Cell = Cell {
        walls: [Wall::Closed; 4],
        visited: false,
    };

    #[inline]
    pub fn wall(&self, dir: Direction) -> Wall {
        self.walls[dir.index()]
    }

    #[inline]
    pub fn is_open(&self, dir: Direction) -> bool {
        self.wall(dir) == Wall::Open
    }

    #[inline]
    pub fn set_wall(&mut self, dir: Direction, wall: Wall) {
        self.walls[dir.index()] = wall;
    }
}

/// A full row of cells
pub type Row = [Cell; COLUMNS];

/// Vertically unbounded maze kept as a sliding window of rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Maze {
    rows: Vec<Row>,
    /// Absolute index of `rows[0]` since the maze was created
    head: u64,
}

impl Maze {
    /// Create `rows` closed rows without carving anything
    pub fn new(rows: usize) -> Self {
        Self {
            rows: vec![[Cell::CLOSED; COLUMNS]; rows],
            head: 0,
        }
    }

    /// Create and populate `rows` rows
    pub fn populated<R: Rng + ?Sized>(rows: usize, rng: &mut R) -> Self {
        let mut maze = Self::new(rows);
        maze.populate(rng);
        maze
    }

    /// Number of rows currently held
    pub fn rows(&self) -> usize {
        self.rows.len()
    }

    /// Absolute index of row 0; grows by the compacted amount
    pub fn head_index(&self) -> u64 {
        self.head
    }

    /// Total rows ever generated (compacted rows included)
    pub fn generated(&self) -> u64 {
        self.head + self.rows.len() as u64
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut Cell> {
        self.rows.get_mut(row).and_then(|r| r.get_mut(col))
    }

    /// (Re)generate every row from the bottom up
    pub fn populate<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for row in 0..self.rows.len() {
            self.populate_row(row, rng);
        }
    }

    /// Append `n` freshly generated rows
    pub fn grow_by<R: Rng + ?Sized>(&mut self, n: usize, rng: &mut R) {
        let start = self.rows.len();
        self.rows.resize(start + n, [Cell::CLOSED; COLUMNS]);
        for row in start..start + n {
            self.populate_row(row, rng);
        }
    }

    /// Drop the first `n` rows and seal the new bottom row.
    ///
    /// Asking for at least as many rows as exist empties the maze.
    pub fn compact(&mut self, n: usize) {
        if n >= self.rows.len() {
            self.head += self.rows.len() as u64;
            self.rows.clear();
            return;
        }

        self.rows.drain(..n);
        self.head += n as u64;
        for cell in self.rows[0].iter_mut() {
            cell.set_wall(Direction::South, Wall::Closed);
        }
    }

    /// Rows `from..to`, growing the maze first if `to` is past the end
    pub fn get<R: Rng + ?Sized>(&mut self, from: usize, to: usize, rng: &mut R) -> &[Row] {
        let (from, to) = if from > to { (to, from) } else { (from, to) };
        if to > self.rows.len() {
            self.grow_by(to - self.rows.len(), rng);
        }
        &self.rows[from..to]
    }

    /// Rows `from..to` clipped to what exists, never growing
    pub fn window(&self, from: usize, to: usize) -> &[Row] {
        let (from, to) = if from > to { (to, from) } else { (from, to) };
        let to = to.min(self.rows.len());
        let from = from.min(to);
        &self.rows[from..to]
    }

    /// Fill a single row, carving passages into the row below it
    pub fn populate_row<R: Rng + ?Sized>(&mut self, row: usize, rng: &mut R) {
        if row >= self.rows.len() {
            return;
        }
        self.rows[row] = [Cell::CLOSED; COLUMNS];

        if row > 0 {
            let mut set: Vec<usize> = Vec::with_capacity(COLUMNS);
            for col in 0..COLUMNS {
                set.push(col);
                let closes_set =
                    col + 1 == COLUMNS || !self.rows[row - 1][col].is_open(Direction::East);
                if !closes_set {
                    continue;
                }

                set.shuffle(rng);
                let offset = if set.len() > 2 { 2 } else { 1 };
                let half = set.len() as f64 / 2.0;
                let gates = ((rng.random::<f64>() * half).floor() as usize + offset).min(set.len());
                for &gate in &set[..gates] {
                    self.rows[row - 1][gate].set_wall(Direction::North, Wall::Open);
                    self.rows[row][gate].set_wall(Direction::South, Wall::Open);
                }
                set.clear();
            }
        }

        self.merge_columns(row, rng);
    }

    fn merge_columns<R: Rng + ?Sized>(&mut self, row: usize, rng: &mut R) {
        for col in 0..COLUMNS - 1 {
            if rng.random::<f64>() < MERGE_PROBABILITY {
                self.rows[row][col].set_wall(Direction::East, Wall::Open);
                self.rows[row][col + 1].set_wall(Direction::West, Wall::Open);
            }
        }
    }
}
