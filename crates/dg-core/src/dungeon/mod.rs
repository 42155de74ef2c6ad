//! Dungeon generation
//!
//! Contains the grid primitives, the BSP catacomb generator and the
//! read-only `Dungeon` facade handed to the game.

mod bitmap;
mod bsp;
mod catacomb;
mod cell;
mod generation;
mod passage;
mod placement;
mod point;
mod region;
mod room;
mod view;

pub use bitmap::Bitmap;
pub use bsp::{BspTree, NodeId};
pub use catacomb::Catacomb;
pub use cell::Cell;
pub use generation::{DEFAULT_GENERATION_ATTEMPTS, generate, generate_catacomb, generate_with_retries};
pub use passage::{
    create_and_add_passage_between_regions, find_place_for_door, find_place_for_door_in_region_rnd,
    find_place_for_passage_turn,
};
pub use placement::{Doorway, Passage, Placement, PlacementId, Room, Turn};
pub use point::{Direction, Point};
pub use region::Region;
pub use room::{carve_room, create_room, shape_room};
pub use view::{Dungeon, DungeonKind, DungeonSource};
