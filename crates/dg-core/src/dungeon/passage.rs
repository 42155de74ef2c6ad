//! Passages between sibling BSP regions
//!
//! Connecting two regions takes four steps: pick the connecting direction,
//! find a door on the facing side of each region, plan a Z-shaped path
//! between the doors, then carve it and register the doorways.

use log::trace;

use crate::error::{DungeonError, Result};
use crate::rng::DungeonRng;

use super::catacomb::Catacomb;
use super::cell::Cell;
use super::placement::{Passage, Placement, PlacementId, Turn};
use super::point::{Direction, Point};
use super::region::Region;

/// Candidate turn lines tried before falling back to the default one
const MAX_TURN_ATTEMPTS: usize = 5;

/// Distance kept between an improved turn line and either door
const TURN_MARGIN: u8 = 2;

/// Scan from `start` towards `direction` for a door cell inside `region`
///
/// Empty cells are skipped. The first other cell is the answer if it is a
/// wall with floor right behind it and no doorway on either side of it.
pub fn find_place_for_door(
    catacomb: &Catacomb,
    start: Point,
    direction: Direction,
    region: Region,
) -> Option<Point> {
    let mut place = start;
    while region.contains(place) {
        match catacomb.cell_at(place) {
            Cell::Nothing => place = place.moved_to(direction)?,
            Cell::Wall => {
                let floor_behind = place
                    .moved_to(direction)
                    .is_some_and(|behind| catacomb.cell_at(behind) == Cell::Floor);
                let doorway_aside = place
                    .flanks(direction)
                    .into_iter()
                    .flatten()
                    .any(|aside| catacomb.cell_at(aside) == Cell::Doorway);
                return (floor_behind && !doorway_aside).then_some(place);
            }
            Cell::Floor | Cell::Doorway => return None,
        }
    }
    None
}

/// Find a door on the `side` edge of `region`, scanning inwards
///
/// Each attempt starts from a random cell of the edge. A failed line is
/// removed from the search area and both remaining parts are searched in
/// random order, until a door is found or nothing is left.
pub fn find_place_for_door_in_region_rnd(
    catacomb: &Catacomb,
    rng: &mut DungeonRng,
    region: Region,
    side: Direction,
) -> Result<Point> {
    let scan = side.opposite();
    let mut stack = vec![region];

    while let Some(area) = stack.pop() {
        let start = if scan.is_horizontal() {
            Point::new(rng.between_u8(area.top(), area.bottom()), area.edge(side))
        } else {
            Point::new(area.edge(side), rng.between_u8(area.left(), area.right()))
        };

        if let Some(door) = find_place_for_door(catacomb, start, scan, area) {
            return Ok(door);
        }

        let [before, after] = area.without_line(start, scan);
        if rng.coin() {
            stack.extend(after);
            stack.extend(before);
        } else {
            stack.extend(before);
            stack.extend(after);
        }
    }

    Err(DungeonError::NoSpaceForDoor { region })
}

/// Point on the line `along` (measured in `direction`) and the cross line of `place`
fn on_line(place: Point, direction: Direction, along: u8) -> Point {
    if direction.is_horizontal() {
        Point::new(place.row, along)
    } else {
        Point::new(along, place.col)
    }
}

/// Turns of a path from `door1` to `door2` crossing over at line `along`
fn path_through(door1: Point, door2: Point, direction: Direction, along: u8) -> Vec<Turn> {
    let first = on_line(door1, direction, along);
    let second = on_line(door2, direction, along);
    match Direction::between(first, second) {
        Some(across) => vec![
            Turn::new(door1, direction),
            Turn::new(first, across),
            Turn::new(second, direction),
            Turn::new(door2, direction),
        ],
        None => vec![Turn::new(door1, direction), Turn::new(door2, direction)],
    }
}

/// Check that a path and its walls would only cover empty cells
///
/// The two doors themselves are not checked.
fn path_is_clear(catacomb: &Catacomb, turns: &[Turn]) -> bool {
    let Some((first, last)) = turns.first().zip(turns.last()) else {
        return true;
    };
    let doors = [first.place, last.place];
    let empty = |place: Option<Point>| place.is_some_and(|p| catacomb.cell_at(p) == Cell::Nothing);

    let passage = Passage::new(turns.to_vec());
    for (from, to, direction) in passage.segments() {
        let mut place = from;
        loop {
            if !doors.contains(&place)
                && !(empty(Some(place)) && place.flanks(direction).into_iter().all(empty))
            {
                return false;
            }
            if place == to {
                break;
            }
            match place.moved_to(direction) {
                Some(next) => place = next,
                None => return false,
            }
        }
    }

    passage.inner_turns().iter().all(|turn| {
        turn_block(turn.place).all(|place| doors.contains(&place) || empty(Some(place)))
    })
}

/// The 3x3 block centered on `place`, clipped at the grid origin
fn turn_block(place: Point) -> impl Iterator<Item = Point> {
    let rows = place.row.saturating_sub(1)..=place.row.saturating_add(1);
    rows.flat_map(move |row| {
        (place.col.saturating_sub(1)..=place.col.saturating_add(1)).map(move |col| Point::new(row, col))
    })
}

/// Look for a crossing line between the doors that runs through empty space
///
/// Candidates keep a margin from both doors. The middle of the interval is
/// tried first, then the halves on either side in random order.
pub fn find_place_for_passage_turn(
    catacomb: &Catacomb,
    rng: &mut DungeonRng,
    door1: Point,
    door2: Point,
    direction: Direction,
) -> Option<u8> {
    let from = door1.coordinate_along(direction);
    let to = door2.coordinate_along(direction);
    let (Some(lo), Some(hi)) = (from.checked_add(TURN_MARGIN), to.checked_sub(TURN_MARGIN)) else {
        return None;
    };

    let mut stack = vec![(lo, hi)];
    let mut attempts = 0;
    while let Some((lo, hi)) = stack.pop() {
        if lo > hi {
            continue;
        }
        if attempts == MAX_TURN_ATTEMPTS {
            break;
        }
        attempts += 1;

        let middle = lo + (hi - lo) / 2;
        if path_is_clear(catacomb, &path_through(door1, door2, direction, middle)) {
            return Some(middle);
        }

        let below = (lo, middle.saturating_sub(1));
        let above = (middle + 1, hi);
        if rng.coin() {
            stack.push(above);
            stack.push(below);
        } else {
            stack.push(below);
            stack.push(above);
        }
    }
    None
}

/// Plan the turns of a passage between two doors
///
/// Collinear doors are joined by a single segment. Otherwise the path
/// crosses over on an empty line between the doors when one is found, and
/// on the first line past `r1` when not.
fn plan_passage(
    catacomb: &Catacomb,
    rng: &mut DungeonRng,
    r1: Region,
    door1: Point,
    door2: Point,
    direction: Direction,
) -> Vec<Turn> {
    if door1.coordinate_across(direction) == door2.coordinate_across(direction) {
        return path_through(door1, door2, direction, door1.coordinate_along(direction));
    }
    let along = find_place_for_passage_turn(catacomb, rng, door1, door2, direction)
        .unwrap_or_else(|| r1.edge(direction).saturating_add(1));
    path_through(door1, door2, direction, along)
}

/// Carve a straight segment: floor on the way, walls on both sides
///
/// Only empty cells are touched.
fn dig(catacomb: &mut Catacomb, from: Point, to: Point, direction: Direction) -> Result<()> {
    let mut place = from;
    loop {
        catacomb.create_floor_if_nothing(place);
        for aside in place.flanks(direction).into_iter().flatten() {
            catacomb.create_wall_if_nothing(aside);
        }
        if place == to {
            return Ok(());
        }
        place = place
            .moved_to(direction)
            .ok_or(DungeonError::PlaceOutsideTheDungeon { place })?;
    }
}

/// Open the three corridor cells of a turn
fn dig_turn(catacomb: &mut Catacomb, turn: Point, incoming: Direction, outgoing: Direction) -> Result<()> {
    let outside = DungeonError::PlaceOutsideTheDungeon { place: turn };
    let before = turn.moved_to(incoming.opposite()).ok_or(outside.clone())?;
    let after = turn.moved_to(outgoing).ok_or(outside)?;
    for place in [before, turn, after] {
        catacomb.force_create_floor(place)?;
    }
    Ok(())
}

/// Carve the passage, register it and its two doorways
fn dig_passage(
    catacomb: &mut Catacomb,
    door1: Point,
    door2: Point,
    turns: Vec<Turn>,
    direction: Direction,
) -> Result<PlacementId> {
    let passage = Passage::new(turns);
    for (from, to, heading) in passage.segments() {
        dig(catacomb, from, to, heading)?;
    }

    for turn in passage.inner_turns() {
        for place in turn_block(turn.place) {
            catacomb.force_create_wall(place)?;
        }
    }
    for pair in passage.turns.windows(3) {
        dig_turn(catacomb, pair[1].place, pair[0].to_direction, pair[1].to_direction)?;
    }

    let behind = |catacomb: &Catacomb, door: Point, towards: Direction| {
        door.moved_to(towards)
            .and_then(|place| catacomb.placement_id_with(place))
            .ok_or(DungeonError::PassageCantBeCreated { place: door })
    };
    let from = behind(&*catacomb, door1, direction.opposite())?;
    let to = behind(&*catacomb, door2, direction)?;

    let id = catacomb.add_placement(Placement::Passage(passage));
    catacomb.force_create_doorway(door1, from, id)?;
    catacomb.force_create_doorway(door2, id, to)?;
    Ok(id)
}

/// Connect two sibling regions with a passage and return their union
///
/// `r1` is left of `r2` when both start on the same row, above it otherwise.
pub fn create_and_add_passage_between_regions(
    catacomb: &mut Catacomb,
    rng: &mut DungeonRng,
    r1: Region,
    r2: Region,
) -> Result<Region> {
    let direction = if r1.top() == r2.top() {
        Direction::Right
    } else {
        Direction::Down
    };

    let door1 = find_place_for_door_in_region_rnd(catacomb, rng, r1, direction)?;
    let door2 = find_place_for_door_in_region_rnd(catacomb, rng, r2, direction.opposite())?;
    let turns = plan_passage(catacomb, rng, r1, door1, door2, direction);
    trace!("passage {door1} -> {door2} with {} turns", turns.len());
    dig_passage(catacomb, door1, door2, turns, direction)?;

    Ok(r1.union_with(&r2))
}
