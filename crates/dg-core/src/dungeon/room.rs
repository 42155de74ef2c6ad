//! Room placement inside BSP leaves

use log::trace;

use crate::options::GenerationOptions;
use crate::rng::DungeonRng;

use super::catacomb::Catacomb;
use super::placement::{Placement, PlacementId, Room};
use super::region::Region;

/// Smallest room side: a wall on each side of one floor cell
const MIN_ROOM_SIDE: u8 = 3;

/// Allowed distance between a room's ratio and the target ratio
const RATIO_TOLERANCE: f64 = 0.1;

/// Compute the rectangle of the room built in a leaf region
///
/// The room starts as the leaf inset by one cell, gets its longer side cut
/// down when its ratio is far from `square_ratio`, and is then scaled by a
/// random factor in `[min_scale, 1]`. The top-left corner never moves.
pub fn shape_room(leaf: Region, options: &GenerationOptions, rng: &mut DungeonRng) -> Region {
    let mut room = leaf.inset(1).unwrap_or(leaf);

    let ratio = room.ratio();
    if (ratio - options.square_ratio).abs() > RATIO_TOLERANCE {
        if ratio > options.square_ratio {
            let target = (f64::from(room.cols) * options.square_ratio).round() as u8;
            let floor = options.region_min_rows.min(room.rows);
            room.rows = target.clamp(floor, room.rows);
        } else {
            let target = (f64::from(room.rows) / options.square_ratio)
                .round()
                .min(f64::from(u8::MAX)) as u8;
            let floor = options.region_min_cols.min(room.cols);
            room.cols = target.clamp(floor, room.cols);
        }
    }

    let area = room.area();
    let min_area = (f64::from(area) * options.min_scale) as u32;
    let offset = rng.between(0, area - min_area);
    let scale = (f64::from(area - offset) / f64::from(area)).max(options.min_scale);

    let scaled = room.scaled(scale);
    Region {
        rows: scaled.rows.max(MIN_ROOM_SIDE.min(room.rows)),
        cols: scaled.cols.max(MIN_ROOM_SIDE.min(room.cols)),
        ..room
    }
}

/// Shape, carve and register the room of a leaf region
pub fn create_room(
    catacomb: &mut Catacomb,
    leaf: Region,
    options: &GenerationOptions,
    rng: &mut DungeonRng,
) -> PlacementId {
    let region = shape_room(leaf, options, rng);
    carve_room(catacomb, region);
    trace!("room {region} in leaf {leaf}");
    catacomb.add_placement(Placement::Room(Room::new(region)))
}

/// Wall the border of `region` and floor the rest
///
/// Floor bits end up under the walls too; walls win when classifying.
pub fn carve_room(catacomb: &mut Catacomb, region: Region) {
    let walls = &mut catacomb.walls;
    walls.set_row_value(region.top(), region.left(), region.cols, true);
    walls.set_row_value(region.bottom(), region.left(), region.cols, true);
    for row in region.top() + 1..region.bottom() {
        walls.set(row, region.left());
        walls.set(row, region.right());
    }
    catacomb.floor.set_region_value(region, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{Cell, Point};

    #[test]
    fn test_carved_room_is_enclosed() {
        let mut catacomb = Catacomb::new(10, 20);
        let region = Region::new(2, 3, 6, 10);
        carve_room(&mut catacomb, region);

        for row in 1..=10 {
            for col in 1..=20 {
                let place = Point::new(row, col);
                let expected = if region.is_border(place) {
                    Cell::Wall
                } else if region.contains(place) {
                    Cell::Floor
                } else {
                    Cell::Nothing
                };
                assert_eq!(catacomb.cell_at(place), expected, "{place}");
            }
        }
    }

    #[test]
    fn test_room_fits_inside_leaf_with_gap() {
        let options = GenerationOptions::default();
        let mut rng = DungeonRng::new(11);
        for _ in 0..100 {
            let leaf = Region::new(4, 7, 13, 27);
            let room = shape_room(leaf, &options, &mut rng);
            assert_eq!(room.top_left, Point::new(5, 8));
            assert!(room.bottom() < leaf.bottom());
            assert!(room.right() < leaf.right());
            assert!(room.rows >= 3 && room.cols >= 3);
        }
    }

    #[test]
    fn test_scale_never_goes_below_min_scale() {
        let options = GenerationOptions::default();
        let mut rng = DungeonRng::new(12);
        let leaf = Region::new(1, 1, 10, 20);
        // 8x18 inset is already close enough to the target ratio
        for _ in 0..100 {
            let room = shape_room(leaf, &options, &mut rng);
            assert!(room.rows >= 4 && room.rows <= 8, "{room}");
            assert!(room.cols >= 10 && room.cols <= 18, "{room}");
        }
    }

    #[test]
    fn test_tall_leaf_is_flattened() {
        let options = GenerationOptions {
            min_scale: 1.0,
            ..GenerationOptions::default()
        };
        let mut rng = DungeonRng::new(13);
        let room = shape_room(Region::new(1, 1, 30, 22), &options, &mut rng);
        assert_eq!(room, Region::new(2, 2, 10, 20));
    }

    #[test]
    fn test_wide_leaf_is_narrowed() {
        let options = GenerationOptions {
            min_scale: 1.0,
            ..GenerationOptions::default()
        };
        let mut rng = DungeonRng::new(14);
        let room = shape_room(Region::new(1, 1, 10, 60), &options, &mut rng);
        assert_eq!(room, Region::new(2, 2, 8, 20));
    }

    #[test]
    fn test_create_room_registers_placement() {
        let mut catacomb = Catacomb::new(12, 24);
        let mut rng = DungeonRng::new(15);
        let id = create_room(
            &mut catacomb,
            Region::new(1, 1, 12, 24),
            &GenerationOptions::default(),
            &mut rng,
        );
        let room = catacomb.placement(id).and_then(Placement::as_room).unwrap();
        assert_eq!(catacomb.cell_at(room.region.top_left), Cell::Wall);
        assert_eq!(
            catacomb.cell_at(Point::new(room.region.top() + 1, room.region.left() + 1)),
            Cell::Floor
        );
    }
}
