//! Generation errors
//!
//! Any error aborts the current generation attempt; there is no partial
//! dungeon. Callers may retry with a new seed (see `generate_with_retries`).

use thiserror::Error;

use crate::dungeon::{Point, Region};

/// Errors raised while generating or building a dungeon
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DungeonError {
    #[error("No space for a door in region {region}")]
    NoSpaceForDoor { region: Region },

    #[error("Passage can't be created near {place}")]
    PassageCantBeCreated { place: Point },

    #[error("Room was not found")]
    RoomWasNotFound,

    #[error("Place {place} is outside the dungeon")]
    PlaceOutsideTheDungeon { place: Point },

    #[error("Doorway at {place} can't be cleaned")]
    DoorwayCantBeCleaned { place: Point },

    #[error("Invalid generation options: {reason}")]
    InvalidOptions { reason: String },

    #[error("Unknown symbol {symbol:?} at row {row}, col {col}")]
    UnknownSymbol { symbol: char, row: usize, col: usize },
}

pub type Result<T> = std::result::Result<T, DungeonError>;
