//! Rooms, passages and the doorways between them

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::rng::DungeonRng;

use super::point::{Direction, Point};
use super::region::Region;

/// Index of a placement in its dungeon's placement list
///
/// Placements are never removed during generation, so an id stays valid
/// for the dungeon's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlacementId(pub usize);

/// A rectangular room, walls included
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub region: Region,
    pub doorways: BTreeSet<Point>,
    /// Nested rooms carved out of this one; generated catacombs have none
    pub inner_rooms: Vec<Room>,
}

impl Room {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            doorways: BTreeSet::new(),
            inner_rooms: Vec::new(),
        }
    }

    pub fn contains(&self, place: Point) -> bool {
        self.region.contains(place) && !self.inner_rooms.iter().any(|inner| inner.contains(place))
    }

    /// The floor part of the room
    pub fn interior(&self) -> Option<Region> {
        self.region.inset(1)
    }

    /// A random floor cell, or the top-left corner for rooms without floor
    pub fn random_place(&self, rng: &mut DungeonRng) -> Point {
        let area = self.interior().unwrap_or(self.region);
        Point::new(
            rng.between_u8(area.top(), area.bottom()),
            rng.between_u8(area.left(), area.right()),
        )
    }
}

/// One waypoint of a passage and the direction taken from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub place: Point,
    pub to_direction: Direction,
}

impl Turn {
    pub const fn new(place: Point, to_direction: Direction) -> Self {
        Self { place, to_direction }
    }
}

/// A corridor made of straight orthogonal segments
///
/// The first turn is the starting door, the last one the arriving door;
/// the direction of the last turn is not used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    pub turns: Vec<Turn>,
    pub doorways: BTreeSet<Point>,
}

impl Passage {
    pub fn new(turns: Vec<Turn>) -> Self {
        Self {
            turns,
            doorways: BTreeSet::new(),
        }
    }

    /// Turns between the two doors
    pub fn inner_turns(&self) -> &[Turn] {
        let end = self.turns.len().saturating_sub(1);
        &self.turns[1.min(end)..end]
    }

    /// Consecutive turn pairs with the direction walked between them
    pub fn segments(&self) -> impl Iterator<Item = (Point, Point, Direction)> + '_ {
        self.turns
            .windows(2)
            .map(|pair| (pair[0].place, pair[1].place, pair[0].to_direction))
    }

    /// Check if the point is on the corridor or on one of its side walls
    pub fn contains(&self, place: Point) -> bool {
        let near = |a: u8, b: u8| a.abs_diff(b) <= 1;
        let within = |v: u8, a: u8, b: u8| v >= a.min(b) && v <= a.max(b);

        let on_segment = self.segments().any(|(from, to, direction)| {
            if direction.is_horizontal() {
                near(place.row, from.row) && within(place.col, from.col, to.col)
            } else {
                near(place.col, from.col) && within(place.row, from.row, to.row)
            }
        });
        let at_turn = self
            .inner_turns()
            .iter()
            .any(|turn| near(place.row, turn.place.row) && near(place.col, turn.place.col));

        on_segment || at_turn
    }

    /// A random corridor cell: a random segment, then a random cell on it
    pub fn random_place(&self, rng: &mut DungeonRng) -> Point {
        let segments: Vec<_> = self.segments().collect();
        let Some(&(from, to, _)) = rng.choose(&segments) else {
            return self.turns.first().map_or(Point::new(1, 1), |turn| turn.place);
        };
        Point::new(
            rng.between_u8(from.row.min(to.row), from.row.max(to.row)),
            rng.between_u8(from.col.min(to.col), from.col.max(to.col)),
        )
    }
}

/// A room or a passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Room(Room),
    Passage(Passage),
}

impl Placement {
    pub fn contains(&self, place: Point) -> bool {
        match self {
            Placement::Room(room) => room.contains(place),
            Placement::Passage(passage) => passage.contains(place),
        }
    }

    pub fn doorways(&self) -> &BTreeSet<Point> {
        match self {
            Placement::Room(room) => &room.doorways,
            Placement::Passage(passage) => &passage.doorways,
        }
    }

    pub fn add_doorway(&mut self, place: Point) {
        match self {
            Placement::Room(room) => room.doorways.insert(place),
            Placement::Passage(passage) => passage.doorways.insert(place),
        };
    }

    pub fn random_place(&self, rng: &mut DungeonRng) -> Point {
        match self {
            Placement::Room(room) => room.random_place(rng),
            Placement::Passage(passage) => passage.random_place(rng),
        }
    }

    pub fn as_room(&self) -> Option<&Room> {
        match self {
            Placement::Room(room) => Some(room),
            Placement::Passage(_) => None,
        }
    }

    pub fn as_passage(&self) -> Option<&Passage> {
        match self {
            Placement::Passage(passage) => Some(passage),
            Placement::Room(_) => None,
        }
    }
}

/// A door cell and the two placements it connects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Doorway {
    pub placement_from: PlacementId,
    pub placement_to: PlacementId,
    /// Handle of the door entity spawned here by the game, if any
    pub door_id: Option<u64>,
}

impl Doorway {
    pub const fn new(placement_from: PlacementId, placement_to: PlacementId) -> Self {
        Self {
            placement_from,
            placement_to,
            door_id: None,
        }
    }

    /// The placement on the other side of the door
    pub fn opposite_placement(&self, placement: PlacementId) -> Option<PlacementId> {
        if placement == self.placement_from {
            Some(self.placement_to)
        } else if placement == self.placement_to {
            Some(self.placement_from)
        } else {
            None
        }
    }
}
