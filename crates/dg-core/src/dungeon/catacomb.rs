//! Catacomb grid state
//!
//! Holds the two bit layers (floor and walls), the placement list and the
//! doorway map of one BSP-generated level, together with the carving
//! primitives used by room and passage generation.

use std::collections::BTreeMap;
use std::fmt;
use std::io;

use crate::error::{DungeonError, Result};
use crate::rng::DungeonRng;

use super::bitmap::Bitmap;
use super::cell::Cell;
use super::placement::{Doorway, Placement, PlacementId};
use super::point::Point;
use super::region::Region;

/// Grid layers, placements and doorways of a catacomb level
#[derive(Debug, Clone, PartialEq)]
pub struct Catacomb {
    rows: u8,
    cols: u8,
    pub(crate) floor: Bitmap,
    pub(crate) walls: Bitmap,
    placements: Vec<Placement>,
    doorways: BTreeMap<Point, Doorway>,
}

impl Catacomb {
    /// Create an empty catacomb where every cell is nothing
    pub fn new(rows: u8, cols: u8) -> Self {
        Self {
            rows,
            cols,
            floor: Bitmap::new(rows, cols),
            walls: Bitmap::new(rows, cols),
            placements: Vec::new(),
            doorways: BTreeMap::new(),
        }
    }

    /// Build the floor and wall layers from an ASCII drawing
    ///
    /// `#` is a wall, `.` a floor and a space nothing. Short lines are padded
    /// with nothing. No placements are registered.
    pub fn parse(text: &str) -> Result<Self> {
        let lines: Vec<&str> = text.lines().collect();
        let width = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);
        let (Ok(rows), Ok(cols)) = (u8::try_from(lines.len()), u8::try_from(width)) else {
            return Err(DungeonError::InvalidOptions {
                reason: format!("drawing of {}x{width} cells is too large", lines.len()),
            });
        };

        let mut catacomb = Self::new(rows, cols);
        for (row, line) in lines.iter().enumerate() {
            for (col, symbol) in line.chars().enumerate() {
                let place = Point::new(row as u8 + 1, col as u8 + 1);
                match Cell::from_symbol(symbol) {
                    Some(Cell::Wall) => catacomb.walls.set_at(place),
                    Some(Cell::Floor) => catacomb.floor.set_at(place),
                    Some(_) => {}
                    None => {
                        return Err(DungeonError::UnknownSymbol {
                            symbol,
                            row: row + 1,
                            col: col + 1,
                        });
                    }
                }
            }
        }
        Ok(catacomb)
    }

    pub fn rows(&self) -> u8 {
        self.rows
    }

    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// The whole grid as a region
    pub fn region(&self) -> Region {
        Region::new(1, 1, self.rows, self.cols)
    }

    pub fn is_inside(&self, place: Point) -> bool {
        place.row >= 1 && place.row <= self.rows && place.col >= 1 && place.col <= self.cols
    }

    fn check_inside(&self, place: Point) -> Result<()> {
        if self.is_inside(place) {
            Ok(())
        } else {
            Err(DungeonError::PlaceOutsideTheDungeon { place })
        }
    }

    /// Classify a cell: wall, then floor, then doorway, else nothing
    ///
    /// Places outside the grid are nothing.
    pub fn cell_at(&self, place: Point) -> Cell {
        if !self.is_inside(place) {
            Cell::Nothing
        } else if self.walls.is_set_at(place) {
            Cell::Wall
        } else if self.floor.is_set_at(place) {
            Cell::Floor
        } else if self.doorways.contains_key(&place) {
            Cell::Doorway
        } else {
            Cell::Nothing
        }
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn placement(&self, id: PlacementId) -> Option<&Placement> {
        self.placements.get(id.0)
    }

    /// First placement, in creation order, containing the point
    pub fn placement_id_with(&self, place: Point) -> Option<PlacementId> {
        self.placements
            .iter()
            .position(|placement| placement.contains(place))
            .map(PlacementId)
    }

    pub fn placement_with(&self, place: Point) -> Option<&Placement> {
        self.placement_id_with(place).and_then(|id| self.placement(id))
    }

    pub fn add_placement(&mut self, placement: Placement) -> PlacementId {
        self.placements.push(placement);
        PlacementId(self.placements.len() - 1)
    }

    pub fn doorway_at(&self, place: Point) -> Option<&Doorway> {
        self.doorways.get(&place)
    }

    pub fn doorways(&self) -> &BTreeMap<Point, Doorway> {
        &self.doorways
    }

    /// Ids of the room placements in creation order
    pub fn room_ids(&self) -> impl Iterator<Item = PlacementId> + '_ {
        self.placements
            .iter()
            .enumerate()
            .filter(|(_, placement)| placement.as_room().is_some())
            .map(|(i, _)| PlacementId(i))
    }

    /// Random point of a uniformly chosen placement
    pub fn random_place(&self, rng: &mut DungeonRng) -> Option<Point> {
        rng.choose(&self.placements).map(|placement| placement.random_place(rng))
    }

    /// Put a wall on the cell if it is inside the grid and holds nothing
    pub fn create_wall_if_nothing(&mut self, place: Point) -> bool {
        let empty = self.cell_at(place) == Cell::Nothing && self.is_inside(place);
        if empty {
            self.walls.set_at(place);
        }
        empty
    }

    /// Put a floor on the cell if it is inside the grid and holds nothing
    pub fn create_floor_if_nothing(&mut self, place: Point) -> bool {
        let empty = self.cell_at(place) == Cell::Nothing && self.is_inside(place);
        if empty {
            self.floor.set_at(place);
        }
        empty
    }

    /// Reset a cell to nothing; doorways can't be cleaned
    pub fn clean_at(&mut self, place: Point) -> Result<()> {
        self.check_inside(place)?;
        if self.doorways.contains_key(&place) {
            return Err(DungeonError::DoorwayCantBeCleaned { place });
        }
        self.walls.unset_at(place);
        self.floor.unset_at(place);
        Ok(())
    }

    pub fn force_create_wall(&mut self, place: Point) -> Result<()> {
        self.clean_at(place)?;
        self.walls.set_at(place);
        Ok(())
    }

    pub fn force_create_floor(&mut self, place: Point) -> Result<()> {
        self.clean_at(place)?;
        self.floor.set_at(place);
        Ok(())
    }

    /// Turn the cell into a doorway between two placements, whatever it was
    ///
    /// The door is also recorded in both placements.
    pub fn force_create_doorway(
        &mut self,
        place: Point,
        placement_from: PlacementId,
        placement_to: PlacementId,
    ) -> Result<()> {
        self.check_inside(place)?;
        self.walls.unset_at(place);
        self.floor.unset_at(place);
        self.doorways
            .insert(place, Doorway::new(placement_from, placement_to));
        for id in [placement_from, placement_to] {
            if let Some(placement) = self.placements.get_mut(id.0) {
                placement.add_doorway(place);
            }
        }
        Ok(())
    }

    /// Write the grid as ASCII, one line per row
    pub fn write(&self, mut writer: impl io::Write) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Display for Catacomb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=self.rows {
            for col in 1..=self.cols {
                write!(f, "{}", self.cell_at(Point::new(row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::placement::Room;

    const ROOM: &str = concat!(" ####\n", " #..#\n", " #..#\n", " ####\n");

    #[test]
    fn test_parse_and_dump_round_trip() {
        let catacomb = Catacomb::parse(ROOM).unwrap();
        assert_eq!(catacomb.rows(), 4);
        assert_eq!(catacomb.cols(), 5);
        assert_eq!(catacomb.cell_at(Point::new(1, 1)), Cell::Nothing);
        assert_eq!(catacomb.cell_at(Point::new(1, 5)), Cell::Wall);
        assert_eq!(catacomb.to_string(), ROOM);

        let again = Catacomb::parse(&catacomb.to_string()).unwrap();
        assert_eq!(again.to_string(), ROOM);
    }

    #[test]
    fn test_parse_pads_short_lines() {
        let catacomb = Catacomb::parse("#\n###\n").unwrap();
        assert_eq!(catacomb.to_string(), "#  \n###\n");
    }

    #[test]
    fn test_parse_rejects_unknown_symbols() {
        let err = Catacomb::parse("##\n#x\n").unwrap_err();
        assert_eq!(
            err,
            DungeonError::UnknownSymbol {
                symbol: 'x',
                row: 2,
                col: 2
            }
        );
    }

    #[test]
    fn test_cell_precedence() {
        let mut catacomb = Catacomb::new(3, 3);
        let place = Point::new(2, 2);
        catacomb.floor.set_at(place);
        catacomb.walls.set_at(place);
        assert_eq!(catacomb.cell_at(place), Cell::Wall);

        catacomb.walls.unset_at(place);
        assert_eq!(catacomb.cell_at(place), Cell::Floor);

        assert_eq!(catacomb.cell_at(Point::new(0, 1)), Cell::Nothing);
        assert_eq!(catacomb.cell_at(Point::new(4, 1)), Cell::Nothing);
    }

    #[test]
    fn test_create_if_nothing_keeps_existing_cells() {
        let mut catacomb = Catacomb::parse("#. \n").unwrap();
        assert!(!catacomb.create_floor_if_nothing(Point::new(1, 1)));
        assert!(!catacomb.create_wall_if_nothing(Point::new(1, 2)));
        assert!(catacomb.create_wall_if_nothing(Point::new(1, 3)));
        assert!(!catacomb.create_wall_if_nothing(Point::new(1, 4)));
        assert_eq!(catacomb.to_string(), "#.#\n");
    }

    #[test]
    fn test_doorway_cant_be_cleaned() {
        let mut catacomb = Catacomb::parse(ROOM).unwrap();
        let room = catacomb.add_placement(Placement::Room(Room::new(Region::new(1, 2, 4, 4))));
        let door = Point::new(2, 2);
        catacomb.force_create_doorway(door, room, room).unwrap();
        assert_eq!(catacomb.cell_at(door), Cell::Doorway);
        assert!(catacomb.placements()[0].doorways().contains(&door));

        assert_eq!(
            catacomb.clean_at(door),
            Err(DungeonError::DoorwayCantBeCleaned { place: door })
        );
        assert!(catacomb.force_create_wall(door).is_err());
        assert!(catacomb.force_create_floor(door).is_err());
        assert_eq!(catacomb.cell_at(door), Cell::Doorway);
    }

    #[test]
    fn test_force_outside_is_rejected() {
        let mut catacomb = Catacomb::new(3, 3);
        let outside = Point::new(3, 4);
        assert_eq!(
            catacomb.force_create_wall(outside),
            Err(DungeonError::PlaceOutsideTheDungeon { place: outside })
        );
        assert!(!catacomb.create_floor_if_nothing(outside));
    }

    #[test]
    fn test_placement_lookup_uses_creation_order() {
        let mut catacomb = Catacomb::new(10, 10);
        let first = catacomb.add_placement(Placement::Room(Room::new(Region::new(1, 1, 5, 5))));
        let second = catacomb.add_placement(Placement::Room(Room::new(Region::new(1, 1, 8, 8))));
        assert_eq!(catacomb.placement_id_with(Point::new(2, 2)), Some(first));
        assert_eq!(catacomb.placement_id_with(Point::new(7, 7)), Some(second));
        assert_eq!(catacomb.placement_id_with(Point::new(9, 9)), None);
        assert_eq!(catacomb.room_ids().count(), 2);
    }
}
