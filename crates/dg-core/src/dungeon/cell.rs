//! Cell classification

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

/// What occupies a grid cell
///
/// Derived from the wall and floor layers plus the doorway map, in that
/// order of precedence.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumIter,
)]
pub enum Cell {
    #[default]
    Nothing,
    Floor,
    Wall,
    Doorway,
}

impl Cell {
    /// Check if this cell can be walked on
    pub const fn is_passable(&self) -> bool {
        matches!(self, Cell::Floor | Cell::Doorway)
    }

    /// Get the display character for this cell
    pub const fn symbol(&self) -> char {
        match self {
            Cell::Nothing => ' ',
            Cell::Floor => '.',
            Cell::Wall => '#',
            Cell::Doorway => '\'',
        }
    }

    /// Parse a display character; doorways can't be parsed
    /// because they need placements on both sides.
    pub const fn from_symbol(symbol: char) -> Option<Cell> {
        match symbol {
            ' ' => Some(Cell::Nothing),
            '.' => Some(Cell::Floor),
            '#' => Some(Cell::Wall),
            _ => None,
        }
    }
}
