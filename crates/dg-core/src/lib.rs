//! dg-core: BSP catacomb generator for a roguelike
//!
//! Partitions the level with a binary space partition tree, builds one room
//! per leaf, joins sibling subtrees with passages and hands the result to
//! the game as a read-only [`Dungeon`]. Generation is a pure function of
//! `(seed, rows, cols, options)`; the crate does no I/O besides the ASCII
//! dump.

pub mod dungeon;
pub mod error;
pub mod options;
pub mod rng;

pub use dungeon::{
    Cell, DEFAULT_GENERATION_ATTEMPTS, Direction, Dungeon, DungeonKind, DungeonSource, Point,
    Region, generate, generate_with_retries,
};
pub use error::{DungeonError, Result};
pub use options::GenerationOptions;
pub use rng::DungeonRng;
