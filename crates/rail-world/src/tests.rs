use rail_core::{TileCoord, TrackDirection, WorldTime};
use rail_net::{Exit, SignalKind, SignalLocation, SignalState, TilePair, TrackArea, TrackState};

use crate::observer::WorldObserver;
use crate::timetable::{Timetable, TimetableState};
use crate::world::{World, WorldConfig};

fn c(x: i32, y: i32) -> TileCoord {
    TileCoord::new(x, y)
}

/// Straight horizontal track from `(from_x, y)` to `(to_x, y)` inclusive.
fn line(world: &mut World, y: i32, from_x: i32, to_x: i32) {
    for x in from_x..to_x {
        world.add_track(x, y, x + 1, y);
    }
}

fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1.0e-4,
        "expected {expected}, got {actual}"
    );
}

/// Observer that records every callback as a line of text.
#[derive(Default)]
struct EventLog {
    events: Vec<String>,
}

impl WorldObserver for EventLog {
    fn on_signal_passed(&mut self, train_id: &str, location: SignalLocation) {
        self.events
            .push(format!("signal {} {}", train_id, location.from_tile));
    }
    fn on_area_entered(&mut self, train_id: &str, area_name: &str) {
        self.events.push(format!("entered {train_id} {area_name}"));
    }
    fn on_area_left(&mut self, train_id: &str, area_name: &str) {
        self.events.push(format!("left-area {train_id} {area_name}"));
    }
    fn on_train_spawned(&mut self, train_id: &str, exit_name: &str, _time: WorldTime) {
        self.events.push(format!("spawned {train_id} {exit_name}"));
    }
    fn on_train_arrived(&mut self, train_id: &str, area_name: &str, _time: WorldTime) {
        self.events.push(format!("arrived {train_id} {area_name}"));
    }
    fn on_train_departed(&mut self, train_id: &str, area_name: &str, _time: WorldTime) {
        self.events.push(format!("departed {train_id} {area_name}"));
    }
    fn on_train_left(&mut self, train_id: &str, _time: WorldTime) {
        self.events.push(format!("left {train_id}"));
    }
}

mod topology {
    use super::*;

    #[test]
    fn add_track_connects_both_tiles() {
        let mut world = World::new();
        world.add_track(0, 0, 1, 0);

        assert_eq!(
            world.find_tile(0, 0).unwrap().connected_directions,
            TrackDirection::E
        );
        assert_eq!(
            world.find_tile(1, 0).unwrap().connected_directions,
            TrackDirection::W
        );
    }

    #[test]
    fn duplicate_track_is_ignored() {
        let mut world = World::new();
        world.add_track(0, 0, 1, 0);
        world.add_track(0, 0, 1, 0);

        assert_eq!(world.track_tiles().len(), 2);
        assert_eq!(
            world.find_tile(0, 0).unwrap().connected_directions,
            TrackDirection::E
        );
    }

    #[test]
    fn straight_tile_has_one_path() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        assert_eq!(
            world.list_valid_paths(1, 0),
            vec![TrackDirection::E | TrackDirection::W]
        );
        assert!(!world.is_point(1, 0));
    }

    #[test]
    fn missing_tile_has_no_paths() {
        let world = World::new();
        assert!(world.list_valid_paths(5, 5).is_empty());
        assert!(!world.is_point(5, 5));
    }

    #[test]
    fn branch_makes_a_point_and_switching_cycles_paths() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);
        world.add_track(1, 0, 2, 1);

        // Connected W, E, NE; compass enumeration yields NE|W before E|W.
        let paths = world.list_valid_paths(1, 0);
        assert_eq!(
            paths,
            vec![
                TrackDirection::NE | TrackDirection::W,
                TrackDirection::E | TrackDirection::W,
            ]
        );
        assert!(world.is_point(1, 0));

        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
        world.switch_point(1, 0);
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 1);
        world.switch_point(1, 0);
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
    }

    #[test]
    fn switching_a_non_point_does_nothing() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        world.switch_point(1, 0);
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
    }

    #[test]
    fn duplicate_signal_is_ignored() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        let location = SignalLocation::new(c(0, 0), c(1, 0));
        world.add_signal(location, SignalKind::Manual);
        world.add_signal(location, SignalKind::Manual);

        assert_eq!(world.signals().len(), 1);
        assert_eq!(world.find_signal(location).unwrap().state, SignalState::Danger);
    }

    #[test]
    fn signals_on_opposite_orientations_are_distinct() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        let forward = SignalLocation::new(c(0, 0), c(1, 0));
        world.add_signal(forward, SignalKind::Manual);
        world.add_signal(forward.reversed(), SignalKind::Manual);

        assert_eq!(world.signals().len(), 2);
    }

    #[test]
    fn switch_signal_toggles_state() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        let location = SignalLocation::new(c(0, 0), c(1, 0));
        world.add_signal(location, SignalKind::Manual);

        world.switch_signal(location);
        assert_eq!(world.find_signal(location).unwrap().state, SignalState::Clear);
        world.switch_signal(location);
        assert_eq!(world.find_signal(location).unwrap().state, SignalState::Danger);
    }
}

mod spawning {
    use super::*;

    #[test]
    fn spawn_rejects_missing_tile_and_bad_direction() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);

        assert!(!world.spawn_train_at("t", 9, 9, TrackDirection::E, 0.5));
        assert!(!world.spawn_train_at("t", 1, 0, TrackDirection::N, 0.5));
        assert!(world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5));
        assert_eq!(world.trains().len(), 1);
    }

    #[test]
    fn spawn_rejects_direction_off_the_selected_path() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);
        world.add_track(1, 0, 2, 1);

        // Selected path 0 is NE|W; heading E is off it until the point is
        // switched.
        assert!(!world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5));
        world.switch_point(1, 0);
        assert!(world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5));
    }
}

mod motion {
    use super::*;

    #[test]
    fn zero_or_negative_speed_pauses_the_world() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.set_simulation_speed(0.0);
        world.update(100.0);
        assert_eq!(world.current_time(), WorldTime::from_seconds(0.0));
        assert_close(world.trains()[0].offset_in_tile, 0.0);

        world.set_simulation_speed(-1.0);
        world.update(100.0);
        assert_close(world.trains()[0].offset_in_tile, 0.0);
    }

    #[test]
    fn train_advances_within_a_cardinal_tile() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        // Default speed 0.2 over half a tile of length 0.5.
        world.update(1.0);
        let train = &world.trains()[0];
        assert_eq!(train.tile, c(1, 0));
        assert_close(train.offset_in_tile, 0.4);
    }

    #[test]
    fn diagonal_half_tiles_are_longer() {
        let mut world = World::new();
        world.add_track(0, 0, 1, 1);
        world.add_track(1, 1, 2, 2);
        world.spawn_train_at("t", 1, 1, TrackDirection::NE, 0.5);

        world.update(1.0);
        let train = &world.trains()[0];
        assert_close(
            train.offset_in_tile,
            0.2 / (0.5 * std::f32::consts::SQRT_2),
        );
    }

    #[test]
    fn train_crosses_into_the_next_tile() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        // 0.5 of distance: half a tile out, arriving at the border.
        world.update(2.5);
        let train = &world.trains()[0];
        assert_eq!(train.tile, c(2, 0));
        assert_close(train.offset_in_tile, -1.0);
    }

    #[test]
    fn danger_signal_blocks_at_the_border_regardless_of_delta() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        let location = SignalLocation::new(c(1, 0), c(2, 0));
        world.add_signal(location, SignalKind::Manual);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.update(1000.0);
        let train = &world.trains()[0];
        assert_eq!(train.tile, c(1, 0));
        assert_close(train.offset_in_tile, 1.0);

        world.update(1000.0);
        assert_close(world.trains()[0].offset_in_tile, 1.0);
    }

    #[test]
    fn clear_signal_is_consumed_on_passage() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        let location = SignalLocation::new(c(1, 0), c(2, 0));
        world.add_signal(location, SignalKind::Manual);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.update(1000.0); // parked at the border
        world.switch_signal(location);

        world.update(2.5);
        let train = &world.trains()[0];
        assert_eq!(train.tile, c(2, 0));
        assert_close(train.offset_in_tile, 0.0);
        assert_eq!(world.find_signal(location).unwrap().state, SignalState::Danger);
    }
}

mod occupancy {
    use super::*;

    #[test]
    fn occupancy_spreads_along_the_track_circuit() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.update(0.1);
        for x in 0..=4 {
            assert!(
                world.find_tile(x, 0).unwrap().has_any(TrackState::Occupied),
                "tile ({x}, 0) should be occupied"
            );
        }
    }

    #[test]
    fn signal_breaks_the_track_circuit() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        world.add_signal(
            SignalLocation::new(c(2, 0), c(3, 0)),
            SignalKind::Manual,
        );
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.update(0.1);
        assert!(world.find_tile(2, 0).unwrap().has_any(TrackState::Occupied));
        assert!(!world.find_tile(3, 0).unwrap().has_any(TrackState::Occupied));
        assert!(!world.find_tile(4, 0).unwrap().has_any(TrackState::Occupied));
    }

    #[test]
    fn flood_fill_terminates_on_a_closed_loop() {
        let mut world = World::new();
        // A closed loop with straight sections and 45-degree corners.
        let loop_tiles = [
            c(0, 0),
            c(1, 0),
            c(2, 0),
            c(3, 1),
            c(3, 2),
            c(2, 3),
            c(1, 3),
            c(0, 3),
            c(-1, 2),
            c(-1, 1),
        ];
        for index in 0..loop_tiles.len() {
            let a = loop_tiles[index];
            let b = loop_tiles[(index + 1) % loop_tiles.len()];
            world.add_track(a.x, a.y, b.x, b.y);
        }
        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.5);

        world.update(0.1);
        for tile in loop_tiles {
            assert!(
                world
                    .find_tile(tile.x, tile.y)
                    .unwrap()
                    .has_any(TrackState::Occupied),
                "tile {tile} should be occupied"
            );
        }
    }
}

mod routes {
    use super::*;

    fn signalled_line() -> (World, SignalLocation, SignalLocation) {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        let from = SignalLocation::new(c(1, 0), c(2, 0));
        let to = SignalLocation::new(c(3, 0), c(4, 0));
        world.add_signal(from, SignalKind::Manual);
        world.add_signal(to, SignalKind::Manual);
        (world, from, to)
    }

    #[test]
    fn route_found_along_a_straight_line() {
        let (world, from, to) = signalled_line();

        let route = world.try_create_route(from, to).unwrap();
        assert_eq!(route.tiles, vec![c(1, 0), c(2, 0), c(3, 0)]);
    }

    #[test]
    fn route_to_a_facing_signal_fails() {
        let mut world = World::new();
        line(&mut world, 0, 0, 4);
        let from = SignalLocation::new(c(1, 0), c(2, 0));
        let to = SignalLocation::new(c(3, 0), c(2, 0));
        world.add_signal(from, SignalKind::Manual);
        world.add_signal(to, SignalKind::Manual);

        assert!(world.try_create_route(from, to).is_none());
    }

    #[test]
    fn route_search_backtracks_out_of_dead_branches() {
        let mut world = World::new();
        line(&mut world, 0, 0, 3);
        // The point's first path leads onto a stub that dead-ends.
        world.add_track(1, 0, 2, 1);
        world.add_track(2, 1, 3, 1);

        let from = SignalLocation::new(c(0, 0), c(1, 0));
        let to = SignalLocation::new(c(2, 0), c(3, 0));
        world.add_signal(from, SignalKind::Manual);
        world.add_signal(to, SignalKind::Manual);

        let route = world.try_create_route(from, to).unwrap();
        assert_eq!(route.tiles, vec![c(0, 0), c(1, 0), c(2, 0)]);
    }

    #[test]
    fn opening_a_route_reserves_and_clears_the_origin() {
        let (mut world, from, to) = signalled_line();

        let route = world.try_create_route(from, to).unwrap();
        assert!(world.try_open_route(&route));

        assert_eq!(world.find_signal(from).unwrap().state, SignalState::Clear);
        assert_eq!(
            world.find_tile(2, 0).unwrap().state(TrackDirection::W),
            TrackState::Reserved
        );
        assert_eq!(
            world.find_tile(2, 0).unwrap().state(TrackDirection::E),
            TrackState::Reserved
        );
        assert_eq!(
            world.find_tile(3, 0).unwrap().state(TrackDirection::W),
            TrackState::Reserved
        );
        // The half right before the destination signal is reserved too.
        assert_eq!(
            world.find_tile(3, 0).unwrap().state(TrackDirection::E),
            TrackState::Reserved
        );
        // The halves behind the origin signal and past the destination
        // signal stay untouched.
        assert_eq!(
            world.find_tile(1, 0).unwrap().state(TrackDirection::E),
            TrackState::Free
        );
        assert_eq!(
            world.find_tile(4, 0).unwrap().state(TrackDirection::W),
            TrackState::Free
        );
    }

    #[test]
    fn consecutive_blocks_can_be_opened_ahead() {
        let mut world = World::new();
        line(&mut world, 0, 0, 6);
        let a = SignalLocation::new(c(1, 0), c(2, 0));
        let b = SignalLocation::new(c(3, 0), c(4, 0));
        let d = SignalLocation::new(c(5, 0), c(6, 0));
        world.add_signal(a, SignalKind::Manual);
        world.add_signal(b, SignalKind::Manual);
        world.add_signal(d, SignalKind::Manual);

        let first = world.try_create_route(a, b).unwrap();
        assert!(world.try_open_route(&first));

        // The first route ends at b; the block beyond it is still free, so
        // the follow-on route opens.
        let second = world.try_create_route(b, d).unwrap();
        assert_eq!(second.tiles, vec![c(3, 0), c(4, 0), c(5, 0)]);
        assert!(world.try_open_route(&second));

        assert_eq!(world.find_signal(b).unwrap().state, SignalState::Clear);
        assert_eq!(
            world.find_tile(4, 0).unwrap().state(TrackDirection::W),
            TrackState::Reserved
        );
    }

    #[test]
    fn opening_a_route_aligns_points_along_it() {
        let mut world = World::new();
        line(&mut world, 0, 0, 3);
        world.add_track(1, 0, 2, 1);
        world.add_track(2, 1, 3, 1);

        let from = SignalLocation::new(c(0, 0), c(1, 0));
        let to = SignalLocation::new(c(2, 1), c(3, 1));
        world.add_signal(from, SignalKind::Manual);
        world.add_signal(to, SignalKind::Manual);

        // Point the switch at the straight path first; opening the diverging
        // route must realign it.
        world.switch_point(1, 0);
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 1);

        let route = world.try_create_route(from, to).unwrap();
        assert_eq!(route.tiles, vec![c(0, 0), c(1, 0), c(2, 1)]);
        assert!(world.try_open_route(&route));
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
        assert_eq!(world.find_signal(from).unwrap().state, SignalState::Clear);
    }

    #[test]
    fn conflicting_route_is_refused_without_side_effects() {
        let mut world = World::new();
        line(&mut world, 0, 0, 5);
        world.add_track(1, 0, 2, 1);
        let a = SignalLocation::new(c(0, 0), c(1, 0));
        let b = SignalLocation::new(c(2, 0), c(3, 0));
        let d = SignalLocation::new(c(4, 0), c(5, 0));
        world.add_signal(a, SignalKind::Manual);
        world.add_signal(b, SignalKind::Manual);
        world.add_signal(d, SignalKind::Manual);

        let blocking = world.try_create_route(b, d).unwrap();
        assert!(world.try_open_route(&blocking));

        // The long route validates two free segments before hitting the
        // conflict at (3, 0); the refusal must leave all of them untouched.
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
        let route = world.try_create_route(a, d).unwrap();
        assert_eq!(route.tiles, vec![c(0, 0), c(1, 0), c(2, 0), c(3, 0), c(4, 0)]);
        assert!(!world.try_open_route(&route));

        assert_eq!(world.find_signal(a).unwrap().state, SignalState::Danger);
        // Opening would have thrown the point to its straight path.
        assert_eq!(world.find_tile(1, 0).unwrap().selected_path, 0);
        for direction in [TrackDirection::W, TrackDirection::E] {
            assert_eq!(
                world.find_tile(1, 0).unwrap().state(direction),
                TrackState::Free
            );
            assert_eq!(
                world.find_tile(2, 0).unwrap().state(direction),
                TrackState::Free
            );
        }
    }
}

mod automatic_signals {
    use super::*;

    #[test]
    fn automatic_signal_follows_block_occupancy() {
        let mut world = World::with_config(WorldConfig { train_speed: 1.0 });
        line(&mut world, 0, 0, 4);
        let first = SignalLocation::new(c(2, 0), c(3, 0));
        let second = SignalLocation::new(c(3, 0), c(4, 0));
        world.add_signal(first, SignalKind::Automatic);
        world.add_signal(second, SignalKind::Automatic);

        // With nothing on the track both blocks are clear.
        world.update(0.01);
        assert_eq!(world.find_signal(first).unwrap().state, SignalState::Clear);

        world.spawn_train_at("t", 1, 0, TrackDirection::E, 0.3);

        // Head reaches the center of (2, 0); the block beyond the first
        // signal is still free.
        world.update(1.0);
        assert_eq!(world.trains()[0].tile, c(2, 0));
        assert_eq!(world.find_signal(first).unwrap().state, SignalState::Clear);

        // Head crosses into (3, 0); the block behind it is now occupied.
        world.update(1.0);
        assert_eq!(world.trains()[0].tile, c(3, 0));
        assert_eq!(world.find_signal(first).unwrap().state, SignalState::Danger);

        // Once the train clears the block the signal drops back to clear.
        world.update(1.0);
        assert_eq!(world.trains()[0].tile, c(4, 0));
        assert_eq!(world.find_signal(first).unwrap().state, SignalState::Clear);
    }
}

mod timetables {
    use super::*;

    fn sample_timetable() -> Timetable {
        Timetable::new(
            WorldTime::from_seconds(10.0),
            WorldTime::from_seconds(20.0),
            WorldTime::from_seconds(30.0),
            WorldTime::from_seconds(40.0),
            "west",
            "platform",
            "east",
            1.0,
        )
    }

    #[test]
    fn arrival_on_the_preferred_track_scores_full_points() {
        let mut timetable = sample_timetable();
        timetable.just_spawned();
        timetable.just_arrived("platform", WorldTime::from_seconds(15.0));
        assert_eq!(timetable.score(), 40);
    }

    #[test]
    fn arrival_on_the_wrong_track_scores_half() {
        let mut timetable = sample_timetable();
        timetable.just_spawned();
        timetable.just_arrived("siding", WorldTime::from_seconds(15.0));
        assert_eq!(timetable.score(), 20);
    }

    #[test]
    fn late_arrival_is_scored_down_to_a_floor() {
        let mut timetable = Timetable::new(
            WorldTime::from_seconds(0.0),
            WorldTime::from_hms(10, 0, 0),
            WorldTime::from_hms(11, 0, 0),
            WorldTime::from_hms(12, 0, 0),
            "west",
            "platform",
            "east",
            1.0,
        );
        timetable.just_spawned();

        // Ten minutes late: modifier 1 - 10 * 0.08 = 0.2, floored at 0.4.
        timetable.just_arrived("platform", WorldTime::from_hms(10, 10, 0));
        assert_eq!(timetable.score(), 16);
    }

    #[test]
    fn departure_needs_both_schedule_and_dwell() {
        let mut timetable = sample_timetable();
        timetable.just_spawned();
        timetable.just_arrived("platform", WorldTime::from_seconds(15.0));

        assert!(!timetable.should_depart(WorldTime::from_seconds(60.0)));
        timetable.update(2.0);
        assert!(!timetable.should_depart(WorldTime::from_seconds(25.0)));
        assert!(timetable.should_depart(WorldTime::from_seconds(60.0)));
    }

    #[test]
    fn scheduled_train_runs_its_whole_journey() {
        let mut world = World::with_config(WorldConfig { train_speed: 1.0 });
        line(&mut world, 0, -1, 7);
        world.add_exit(Exit {
            name: "west".into(),
            location: c(0, 0),
            spawn_direction: TrackDirection::E,
        });
        world.add_exit(Exit {
            name: "east".into(),
            location: c(6, 0),
            spawn_direction: TrackDirection::W,
        });
        world.add_track_area(TrackArea {
            name: "platform".into(),
            entry_points: vec![TilePair::new(c(2, 0), c(3, 0))],
            stopping_points: vec![TilePair::new(c(3, 0), c(4, 0))],
        });

        assert!(world.spawn_train("ic1", 0.5, sample_timetable()));
        let mut log = EventLog::default();

        // Before the spawn time the train exists only on paper.
        world.update_with(1.0, &mut log);
        assert_eq!(world.trains()[0].timetable.state(), TimetableState::NotSpawned);

        world.override_time(WorldTime::from_seconds(9.0));
        world.update_with(1.0, &mut log);
        let train = &world.trains()[0];
        assert_eq!(train.timetable.state(), TimetableState::MovingToDestination);
        assert_eq!(train.tile, c(0, 0));

        // One tile per second toward the platform.
        world.update_with(1.0, &mut log);
        world.update_with(1.0, &mut log);
        world.update_with(1.0, &mut log);
        assert_eq!(world.trains()[0].tile, c(3, 0));

        // The stopping boundary halts the train.
        world.update_with(1.0, &mut log);
        let train = &world.trains()[0];
        assert_eq!(train.timetable.state(), TimetableState::StoppedAtDestination);
        assert!(!train.is_moving);
        assert_eq!(train.tile, c(3, 0));
        assert_close(train.offset_in_tile, 1.0);
        assert_eq!(train.timetable.score(), 40);

        // Dwell until both the schedule and the minimum stop are served.
        world.override_time(WorldTime::from_seconds(30.0));
        world.update_with(1.0, &mut log);
        assert_eq!(
            world.trains()[0].timetable.state(),
            TimetableState::StoppedAtDestination
        );
        world.update_with(1.0, &mut log);
        let train = &world.trains()[0];
        assert_eq!(train.timetable.state(), TimetableState::MovingToExit);
        assert_eq!(train.timetable.score(), 80);

        // Roll on to the east exit and leave the world.
        world.update_with(1.0, &mut log);
        let train = &world.trains()[0];
        assert_eq!(train.timetable.state(), TimetableState::Left);
        assert_eq!(train.timetable.score(), 120);
        assert!(!train.is_moving);

        let expected = [
            "spawned ic1 west",
            "entered ic1 platform",
            "arrived ic1 platform",
            "departed ic1 platform",
            "left ic1",
        ];
        assert_eq!(log.events, expected);

        // A departed train never comes back.
        world.update_with(10.0, &mut log);
        assert_eq!(world.trains()[0].timetable.state(), TimetableState::Left);
    }

    #[test]
    fn spawn_with_unknown_exit_is_rejected() {
        let mut world = World::new();
        line(&mut world, 0, 0, 2);
        assert!(!world.spawn_train("t", 0.5, sample_timetable()));
        assert!(world.trains().is_empty());
    }

    #[test]
    fn spawn_is_deferred_while_the_exit_tile_is_occupied() {
        let mut world = World::with_config(WorldConfig { train_speed: 1.0 });
        line(&mut world, 0, -1, 4);
        world.add_exit(Exit {
            name: "west".into(),
            location: c(0, 0),
            spawn_direction: TrackDirection::E,
        });
        let gate = SignalLocation::new(c(1, 0), c(2, 0));
        world.add_signal(gate, SignalKind::Manual);
        world.switch_signal(gate);

        world.spawn_train_at("blocker", 0, 0, TrackDirection::E, 0.4);
        world.update(0.5); // blocker now occupies the exit block

        let timetable = Timetable::new(
            WorldTime::from_seconds(0.0),
            WorldTime::from_seconds(20.0),
            WorldTime::from_seconds(30.0),
            WorldTime::from_seconds(40.0),
            "west",
            "platform",
            "east",
            1.0,
        );
        assert!(world.spawn_train("t2", 0.4, timetable));

        // The blocker's tail still reaches back into the exit block.
        world.update(1.0);
        assert_eq!(world.trains()[1].timetable.state(), TimetableState::NotSpawned);

        // Once the blocker passes the signal the block frees up.
        world.update(1.0);
        let spawned = &world.trains()[1];
        assert_eq!(spawned.timetable.state(), TimetableState::MovingToDestination);
        assert_eq!(spawned.tile, c(0, 0));
        assert!(world.find_tile(0, 0).unwrap().has_any(TrackState::Occupied));
    }
}
