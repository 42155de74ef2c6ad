//! Read-only dungeon facade
//!
//! Game code only sees a [`Dungeon`]. The layout behind it comes from any
//! [`DungeonSource`], so other level generators can plug in next to the BSP
//! catacomb.

use std::fmt;
use std::io;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::{DungeonError, Result};
use crate::rng::DungeonRng;

use super::catacomb::Catacomb;
use super::cell::Cell;
use super::placement::{Doorway, Placement};
use super::point::Point;

/// Queries a dungeon layout must answer
pub trait DungeonSource {
    fn rows(&self) -> u8;

    fn cols(&self) -> u8;

    /// Cell at `place`; nothing outside the grid
    fn cell_at(&self, place: Point) -> Cell;

    /// First placement, in creation order, containing `place`
    fn placement_with(&self, place: Point) -> Option<&Placement>;

    /// Random point inside a uniformly chosen placement
    fn random_place(&self, rng: &mut DungeonRng) -> Option<Point>;

    fn doorway_at(&self, place: Point) -> Option<&Doorway>;

    fn placements(&self) -> &[Placement];
}

impl DungeonSource for Catacomb {
    fn rows(&self) -> u8 {
        Catacomb::rows(self)
    }

    fn cols(&self) -> u8 {
        Catacomb::cols(self)
    }

    fn cell_at(&self, place: Point) -> Cell {
        Catacomb::cell_at(self, place)
    }

    fn placement_with(&self, place: Point) -> Option<&Placement> {
        Catacomb::placement_with(self, place)
    }

    fn random_place(&self, rng: &mut DungeonRng) -> Option<Point> {
        Catacomb::random_place(self, rng)
    }

    fn doorway_at(&self, place: Point) -> Option<&Doorway> {
        Catacomb::doorway_at(self, place)
    }

    fn placements(&self) -> &[Placement] {
        Catacomb::placements(self)
    }
}

/// Which generator produced a dungeon
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum DungeonKind {
    /// Rooms in BSP leaves joined by passages
    Catacomb,
    /// Hand-drawn layout, typically a test fixture
    Fixture,
}

/// A generated level
pub struct Dungeon {
    seed: u64,
    kind: DungeonKind,
    entrance: Point,
    exit: Point,
    source: Box<dyn DungeonSource>,
}

impl Dungeon {
    /// Wrap a layout, placing the entrance in its first room and the exit in its last
    pub fn new(
        seed: u64,
        kind: DungeonKind,
        source: Box<dyn DungeonSource>,
        rng: &mut DungeonRng,
    ) -> Result<Self> {
        let mut rooms = source.placements().iter().filter_map(Placement::as_room);
        let first = rooms.next().ok_or(DungeonError::RoomWasNotFound)?;
        let last = rooms.last().unwrap_or(first);
        let entrance = first.random_place(rng);
        let exit = last.random_place(rng);

        Ok(Self {
            seed,
            kind,
            entrance,
            exit,
            source,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn kind(&self) -> DungeonKind {
        self.kind
    }

    pub fn rows(&self) -> u8 {
        self.source.rows()
    }

    pub fn cols(&self) -> u8 {
        self.source.cols()
    }

    pub fn entrance(&self) -> Point {
        self.entrance
    }

    pub fn exit(&self) -> Point {
        self.exit
    }

    pub fn cell_at(&self, place: Point) -> Cell {
        self.source.cell_at(place)
    }

    pub fn placement_with(&self, place: Point) -> Option<&Placement> {
        self.source.placement_with(place)
    }

    /// Random point inside a random placement
    pub fn random_place(&self, rng: &mut DungeonRng) -> Point {
        self.source.random_place(rng).unwrap_or(self.entrance)
    }

    pub fn doorway_at(&self, place: Point) -> Option<&Doorway> {
        self.source.doorway_at(place)
    }

    pub fn placements(&self) -> &[Placement] {
        self.source.placements()
    }

    pub fn source(&self) -> &dyn DungeonSource {
        self.source.as_ref()
    }

    /// Dump the grid as ASCII, one line per row
    pub fn write(&self, mut writer: impl io::Write) -> io::Result<()> {
        write!(writer, "{self}")
    }
}

impl fmt::Debug for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dungeon")
            .field("seed", &self.seed)
            .field("kind", &self.kind)
            .field("rows", &self.rows())
            .field("cols", &self.cols())
            .field("entrance", &self.entrance)
            .field("exit", &self.exit)
            .field("placements", &self.placements().len())
            .finish()
    }
}

impl fmt::Display for Dungeon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 1..=self.rows() {
            for col in 1..=self.cols() {
                write!(f, "{}", self.cell_at(Point::new(row, col)).symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
