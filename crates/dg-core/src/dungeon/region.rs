//! Rectangular regions of the grid
//!
//! A region is cell-inclusive: its bottom-right cell is
//! `top_left + (rows - 1, cols - 1)`. Regions are plain values used for BSP
//! partitioning, room footprints and door search areas.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::point::{Direction, Point};

/// An axis-aligned rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub top_left: Point,
    pub rows: u8,
    pub cols: u8,
}

impl Region {
    /// Create a region from its top-left cell and size
    pub const fn new(row: u8, col: u8, rows: u8, cols: u8) -> Self {
        Self {
            top_left: Point::new(row, col),
            rows,
            cols,
        }
    }

    pub fn top(&self) -> u8 {
        self.top_left.row
    }

    pub fn left(&self) -> u8 {
        self.top_left.col
    }

    pub fn bottom(&self) -> u8 {
        self.top_left.row + self.rows - 1
    }

    pub fn right(&self) -> u8 {
        self.top_left.col + self.cols - 1
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.bottom(), self.right())
    }

    pub fn area(&self) -> u32 {
        u32::from(self.rows) * u32::from(self.cols)
    }

    /// rows / cols; below 1.0 means the region is wider than tall
    pub fn ratio(&self) -> f64 {
        f64::from(self.rows) / f64::from(self.cols)
    }

    /// Check if the point lies inside this region
    pub fn contains(&self, place: Point) -> bool {
        place.row >= self.top()
            && place.row <= self.bottom()
            && place.col >= self.left()
            && place.col <= self.right()
    }

    /// Check if `other` lies entirely inside this region
    pub fn contains_region(&self, other: &Region) -> bool {
        self.contains(other.top_left) && self.contains(other.bottom_right())
    }

    /// Check if the point lies on the outermost ring of cells
    pub fn is_border(&self, place: Point) -> bool {
        self.contains(place)
            && (place.row == self.top()
                || place.row == self.bottom()
                || place.col == self.left()
                || place.col == self.right())
    }

    /// Row or column of the edge facing `direction`
    pub fn edge(&self, direction: Direction) -> u8 {
        match direction {
            Direction::Up => self.top(),
            Direction::Down => self.bottom(),
            Direction::Left => self.left(),
            Direction::Right => self.right(),
        }
    }

    /// Split into left and right parts, the left one `cols` wide
    pub fn split_vertically(&self, cols: u8) -> (Region, Region) {
        debug_assert!(cols > 0 && cols < self.cols);
        let left = Region { cols, ..*self };
        let right = Region::new(self.top(), self.left() + cols, self.rows, self.cols - cols);
        (left, right)
    }

    /// Split into top and bottom parts, the top one `rows` high
    pub fn split_horizontally(&self, rows: u8) -> (Region, Region) {
        debug_assert!(rows > 0 && rows < self.rows);
        let top = Region { rows, ..*self };
        let bottom = Region::new(self.top() + rows, self.left(), self.rows - rows, self.cols);
        (top, bottom)
    }

    /// The rows strictly above `row`
    pub fn before_row(&self, row: u8) -> Option<Region> {
        if row <= self.top() {
            return None;
        }
        let rows = if row > self.bottom() { self.rows } else { row - self.top() };
        Some(Region { rows, ..*self })
    }

    /// The rows strictly below `row`
    pub fn after_row(&self, row: u8) -> Option<Region> {
        if row >= self.bottom() {
            return None;
        }
        let top = row.max(self.top().saturating_sub(1)) + 1;
        Some(Region::new(top, self.left(), self.bottom() - top + 1, self.cols))
    }

    /// The columns strictly left of `col`
    pub fn before_col(&self, col: u8) -> Option<Region> {
        if col <= self.left() {
            return None;
        }
        let cols = if col > self.right() { self.cols } else { col - self.left() };
        Some(Region { cols, ..*self })
    }

    /// The columns strictly right of `col`
    pub fn after_col(&self, col: u8) -> Option<Region> {
        if col >= self.right() {
            return None;
        }
        let left = col.max(self.left().saturating_sub(1)) + 1;
        Some(Region::new(self.top(), left, self.rows, self.right() - left + 1))
    }

    /// The two parts left when the line through `place` across `direction` is removed
    ///
    /// For a horizontal `direction` the removed line is the row of `place`,
    /// otherwise its column.
    pub fn without_line(&self, place: Point, direction: Direction) -> [Option<Region>; 2] {
        if direction.is_horizontal() {
            [self.before_row(place.row), self.after_row(place.row)]
        } else {
            [self.before_col(place.col), self.after_col(place.col)]
        }
    }

    /// Smallest region containing both
    pub fn union_with(&self, other: &Region) -> Region {
        let top = self.top().min(other.top());
        let left = self.left().min(other.left());
        let bottom = self.bottom().max(other.bottom());
        let right = self.right().max(other.right());
        Region::new(top, left, bottom - top + 1, right - left + 1)
    }

    /// Same top-left corner, both sides multiplied by `k` (never below 1)
    pub fn scaled(&self, k: f64) -> Region {
        let scale = |side: u8| ((f64::from(side) * k).floor() as u8).max(1);
        Region {
            rows: scale(self.rows),
            cols: scale(self.cols),
            ..*self
        }
    }

    /// Shrink by `n` cells on every side
    pub fn inset(&self, n: u8) -> Option<Region> {
        let rows = self.rows.checked_sub(n.checked_mul(2)?)?;
        let cols = self.cols.checked_sub(n.checked_mul(2)?)?;
        if rows == 0 || cols == 0 {
            return None;
        }
        Some(Region::new(self.top() + n, self.left() + n, rows, cols))
    }

    /// All cells, row-major
    pub fn points(&self) -> impl Iterator<Item = Point> + use<> {
        let region = *self;
        (region.top()..=region.bottom())
            .flat_map(move |row| (region.left()..=region.right()).map(move |col| Point::new(row, col)))
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}, {}, {}]",
            self.top(),
            self.left(),
            self.rows,
            self.cols
        )
    }
}
