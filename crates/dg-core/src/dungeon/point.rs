//! Grid points and orthogonal directions
//!
//! Coordinates are 1-based: `row` 1 is the top line, `col` 1 the left column.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// A cell position on the dungeon grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Point {
    pub row: u8,
    pub col: u8,
}

impl Point {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// The neighbour one step towards `direction`, if it is representable
    pub fn moved_to(self, direction: Direction) -> Option<Point> {
        let (row, col) = match direction {
            Direction::Up => (self.row.checked_sub(1)?, self.col),
            Direction::Down => (self.row.checked_add(1)?, self.col),
            Direction::Left => (self.row, self.col.checked_sub(1)?),
            Direction::Right => (self.row, self.col.checked_add(1)?),
        };
        Some(Point { row, col })
    }

    /// Neighbours on both sides perpendicular to `direction`
    pub fn flanks(self, direction: Direction) -> [Option<Point>; 2] {
        [
            self.moved_to(direction.rotated_clockwise()),
            self.moved_to(direction.rotated_counter_clockwise()),
        ]
    }

    /// The four orthogonal neighbours
    pub fn neighbours(self) -> impl Iterator<Item = Point> {
        [Direction::Up, Direction::Right, Direction::Down, Direction::Left]
            .into_iter()
            .filter_map(move |d| self.moved_to(d))
    }

    /// The coordinate that changes when moving along `direction`
    pub fn coordinate_along(self, direction: Direction) -> u8 {
        if direction.is_horizontal() { self.col } else { self.row }
    }

    /// The coordinate that stays fixed when moving along `direction`
    pub fn coordinate_across(self, direction: Direction) -> u8 {
        if direction.is_horizontal() { self.row } else { self.col }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Orthogonal direction on the grid
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    pub const fn rotated_clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub const fn rotated_counter_clockwise(self) -> Direction {
        self.rotated_clockwise().opposite()
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    /// Direction leading from `from` to `to` along a shared row or column
    pub fn between(from: Point, to: Point) -> Option<Direction> {
        use std::cmp::Ordering::*;
        match (from.row.cmp(&to.row), from.col.cmp(&to.col)) {
            (Equal, Less) => Some(Direction::Right),
            (Equal, Greater) => Some(Direction::Left),
            (Less, Equal) => Some(Direction::Down),
            (Greater, Equal) => Some(Direction::Up),
            _ => None,
        }
    }
}
