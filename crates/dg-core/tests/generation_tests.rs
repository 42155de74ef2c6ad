use std::collections::{BTreeSet, VecDeque};

use dg_core::dungeon::{Placement, PlacementId};
use dg_core::{
    Cell, DEFAULT_GENERATION_ATTEMPTS, Direction, Dungeon, GenerationOptions, Point,
    generate_with_retries,
};
use proptest::prelude::*;

fn generate(seed: u64, rows: u8, cols: u8) -> Dungeon {
    generate_with_retries(
        seed,
        rows,
        cols,
        &GenerationOptions::default(),
        DEFAULT_GENERATION_ATTEMPTS,
    )
    .unwrap()
}

fn all_points(dungeon: &Dungeon) -> impl Iterator<Item = Point> + '_ {
    (1..=dungeon.rows()).flat_map(move |row| (1..=dungeon.cols()).map(move |col| Point::new(row, col)))
}

/// Passable cells reachable from the entrance
fn flood_from_entrance(dungeon: &Dungeon) -> BTreeSet<Point> {
    let mut seen = BTreeSet::from([dungeon.entrance()]);
    let mut queue = VecDeque::from([dungeon.entrance()]);
    while let Some(place) = queue.pop_front() {
        for next in place.neighbours() {
            if dungeon.cell_at(next).is_passable() && seen.insert(next) {
                queue.push_back(next);
            }
        }
    }
    seen
}

fn check_rooms_are_enclosed(dungeon: &Dungeon) {
    for room in dungeon.placements().iter().filter_map(Placement::as_room) {
        for place in room.region.points() {
            let cell = dungeon.cell_at(place);
            if room.region.is_border(place) {
                let is_door = cell == Cell::Doorway && room.doorways.contains(&place);
                assert!(cell == Cell::Wall || is_door, "{place} of {} is {cell}\n{dungeon}", room.region);
            } else {
                assert_eq!(cell, Cell::Floor, "{place} of {}\n{dungeon}", room.region);
            }
        }
    }
}

fn check_doorways(dungeon: &Dungeon) {
    for place in all_points(dungeon) {
        let Some(doorway) = dungeon.doorway_at(place) else {
            assert_ne!(dungeon.cell_at(place), Cell::Doorway);
            continue;
        };
        assert_eq!(dungeon.cell_at(place), Cell::Doorway);
        assert_ne!(doorway.placement_from, doorway.placement_to);

        let opens = |a: Direction| {
            let passable = |d: Direction| {
                place
                    .moved_to(d)
                    .is_some_and(|p| dungeon.cell_at(p).is_passable())
            };
            passable(a) && passable(a.opposite())
        };
        assert!(
            opens(Direction::Right) || opens(Direction::Down),
            "doorway {place} is not between two passable cells\n{dungeon}"
        );

        for id in [doorway.placement_from, doorway.placement_to] {
            let PlacementId(index) = id;
            assert!(dungeon.placements()[index].doorways().contains(&place));
        }
    }
}

fn check_connected(dungeon: &Dungeon) {
    let reached = flood_from_entrance(dungeon);
    assert!(reached.contains(&dungeon.exit()));
    for room in dungeon.placements().iter().filter_map(Placement::as_room) {
        let interior = room.interior().unwrap();
        assert!(
            interior.points().all(|p| reached.contains(&p)),
            "room {} is not connected\n{dungeon}",
            room.region
        );
    }
}

#[test]
fn test_generation_is_deterministic() {
    let first = generate(0xC0FFEE, 40, 120).to_string();
    for _ in 0..10 {
        assert_eq!(generate(0xC0FFEE, 40, 120).to_string(), first);
    }
}

#[test]
fn test_different_seeds_differ() {
    let a = generate(1, 40, 120).to_string();
    let b = generate(2, 40, 120).to_string();
    assert_ne!(a, b);
}

#[test]
fn test_rooms_are_enclosed() {
    for seed in 0..10 {
        check_rooms_are_enclosed(&generate(seed, 40, 120));
    }
}

#[test]
fn test_doorways_join_two_placements() {
    for seed in 0..10 {
        check_doorways(&generate(seed, 40, 120));
    }
}

#[test]
fn test_every_room_is_reachable_from_entrance() {
    for seed in 0..10 {
        check_connected(&generate(seed, 40, 120));
    }
}

#[test]
fn test_entrance_and_exit_are_in_first_and_last_rooms() {
    let dungeon = generate(99, 50, 150);
    let rooms: Vec<_> = dungeon.placements().iter().filter_map(Placement::as_room).collect();
    assert!(rooms.len() > 2);
    assert!(rooms[0].interior().unwrap().contains(dungeon.entrance()));
    assert!(rooms[rooms.len() - 1].interior().unwrap().contains(dungeon.exit()));
}

#[test]
fn test_random_place_is_inside_a_placement() {
    let dungeon = generate(4, 40, 120);
    let mut rng = dg_core::DungeonRng::new(4);
    for _ in 0..200 {
        let place = dungeon.random_place(&mut rng);
        assert!(dungeon.placement_with(place).is_some(), "{place}");
        assert!(dungeon.cell_at(place).is_passable(), "{place}");
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn generated_dungeons_hold_their_invariants(
        seed in any::<u64>(),
        rows in 20u8..=60,
        cols in 40u8..=200,
    ) {
        let options = GenerationOptions::default();
        let dungeon = generate_with_retries(seed, rows, cols, &options, DEFAULT_GENERATION_ATTEMPTS);
        prop_assert!(dungeon.is_ok(), "{:?}", dungeon.as_ref().err());
        let dungeon = dungeon.unwrap();

        let again = generate_with_retries(seed, rows, cols, &options, DEFAULT_GENERATION_ATTEMPTS).unwrap();
        prop_assert_eq!(dungeon.to_string(), again.to_string());

        check_rooms_are_enclosed(&dungeon);
        check_doorways(&dungeon);
        check_connected(&dungeon);
    }

    #[test]
    fn small_regions_still_connect(seed in any::<u64>()) {
        let options = GenerationOptions {
            region_min_rows: 8,
            region_min_cols: 12,
            ..GenerationOptions::default()
        };
        let dungeon = generate_with_retries(seed, 30, 80, &options, DEFAULT_GENERATION_ATTEMPTS);
        prop_assert!(dungeon.is_ok(), "{:?}", dungeon.as_ref().err());
        check_connected(&dungeon.unwrap());
    }
}
