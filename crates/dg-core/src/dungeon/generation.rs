//! Catacomb generation
//!
//! 1. Partition the grid with a BSP tree.
//! 2. Build one room per leaf and store the room region back in the leaf.
//! 3. Fold the tree bottom-up, joining every pair of siblings with a passage.
//! 4. Put the entrance in the first room and the exit in the last one.
//!
//! Every random draw comes from one `DungeonRng`, so a seed always gives
//! the same dungeon.

use log::{debug, warn};

use crate::error::Result;
use crate::options::GenerationOptions;
use crate::rng::DungeonRng;

use super::bsp::BspTree;
use super::catacomb::Catacomb;
use super::passage::create_and_add_passage_between_regions;
use super::room::create_room;
use super::view::{Dungeon, DungeonKind};

/// Attempts made by callers that retry failed generations
pub const DEFAULT_GENERATION_ATTEMPTS: usize = 10;

/// Build the catacomb layout, drawing from `rng`
pub fn generate_catacomb(
    rows: u8,
    cols: u8,
    options: &GenerationOptions,
    rng: &mut DungeonRng,
) -> Result<Catacomb> {
    let mut tree = BspTree::build(rows, cols, options, rng);
    let mut catacomb = Catacomb::new(rows, cols);

    for leaf in tree.leaves() {
        let id = create_room(&mut catacomb, tree.value(leaf), options, rng);
        if let Some(room) = catacomb.placement(id).and_then(|p| p.as_room()) {
            tree.set_value(leaf, room.region);
        }
    }

    tree.fold_modify(BspTree::ROOT, |r1, r2| {
        create_and_add_passage_between_regions(&mut catacomb, rng, r1, r2)
    })?;

    Ok(catacomb)
}

/// Generate a `rows` x `cols` catacomb from `seed`
///
/// Any failure aborts the whole attempt; see [`generate_with_retries`].
pub fn generate(seed: u64, rows: u8, cols: u8, options: &GenerationOptions) -> Result<Dungeon> {
    options.validate(rows, cols)?;

    let mut rng = DungeonRng::new(seed);
    let catacomb = generate_catacomb(rows, cols, options, &mut rng)?;
    let rooms = catacomb.room_ids().count();
    let passages = catacomb.placements().len() - rooms;

    let dungeon = Dungeon::new(seed, DungeonKind::Catacomb, Box::new(catacomb), &mut rng)?;
    debug!(
        "generated {rows}x{cols} catacomb from seed {seed}: {rooms} rooms, {passages} passages, {} draws",
        rng.draws()
    );
    Ok(dungeon)
}

/// Run [`generate`] until it succeeds, at most `attempts` times
///
/// The first attempt uses `seed`; the following ones use seeds drawn from a
/// `DungeonRng` seeded with `seed`, so the whole sequence is reproducible.
/// Returns the last error when every attempt fails.
pub fn generate_with_retries(
    seed: u64,
    rows: u8,
    cols: u8,
    options: &GenerationOptions,
    attempts: usize,
) -> Result<Dungeon> {
    options.validate(rows, cols)?;

    let mut seeds = DungeonRng::new(seed);
    let mut attempt_seed = seed;
    let mut attempt = 1;
    loop {
        match generate(attempt_seed, rows, cols, options) {
            Ok(dungeon) => return Ok(dungeon),
            Err(err) if attempt >= attempts => return Err(err),
            Err(err) => {
                warn!("generation attempt {attempt}/{attempts} with seed {attempt_seed} failed: {err}");
                attempt_seed = seeds.next_seed();
                attempt += 1;
            }
        }
    }
}
