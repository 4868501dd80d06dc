//! junction — a two-platform passing loop worked from a timetable.
//!
//! Builds a small yard (a main line through platform 1 and a diverging loop
//! through platform 2), schedules two trains from the western exit, and plays
//! dispatcher: routes are opened at scripted times, trains obey the signals,
//! stop at their platforms, and leave to the east.  The final world is saved
//! as JSON under `output/junction/`.

use std::path::Path;

use anyhow::Result;

use rail_core::{TileCoord, TrackDirection, WorldTime};
use rail_net::{Exit, SignalKind, SignalLocation, TilePair, TrackArea};
use rail_world::{Timetable, World, WorldConfig, WorldObserver};

// ── Constants ─────────────────────────────────────────────────────────────────

const TRAIN_SPEED:   f32 = 1.0;  // one tile per second keeps the log readable
const TICK_SECONDS:  f32 = 0.5;
const RUN_SECONDS:   f32 = 80.0;
const MIN_STOP:      f32 = 2.0;

fn c(x: i32, y: i32) -> TileCoord {
    TileCoord::new(x, y)
}

// ── Console observer ──────────────────────────────────────────────────────────

#[derive(Default)]
struct ConsoleObserver {
    events: usize,
}

impl WorldObserver for ConsoleObserver {
    fn on_signal_passed(&mut self, train_id: &str, location: SignalLocation) {
        self.events += 1;
        println!("  [signal]   {train_id} passed the signal at {}", location.from_tile);
    }
    fn on_area_entered(&mut self, train_id: &str, area_name: &str) {
        self.events += 1;
        println!("  [area]     {train_id} entered {area_name}");
    }
    fn on_train_spawned(&mut self, train_id: &str, exit_name: &str, time: WorldTime) {
        self.events += 1;
        println!("  [{time}] {train_id} entered the world at {exit_name}");
    }
    fn on_train_arrived(&mut self, train_id: &str, area_name: &str, time: WorldTime) {
        self.events += 1;
        println!("  [{time}] {train_id} arrived at {area_name}");
    }
    fn on_train_departed(&mut self, train_id: &str, area_name: &str, time: WorldTime) {
        self.events += 1;
        println!("  [{time}] {train_id} departed from {area_name}");
    }
    fn on_train_left(&mut self, train_id: &str, time: WorldTime) {
        self.events += 1;
        println!("  [{time}] {train_id} left the world");
    }
}

// ── Yard construction ─────────────────────────────────────────────────────────

/// Main line along y = 0 with a diverging loop through platform 2:
///
/// ```text
///                3,1 ─ 4,1 ─ 5,1 ─ 6,1      (platform 2)
///               /                     \
/// -1,0 ─ ... 2,0 ─ 3,0 ─ 4,0 ─ 5,0 ─ 6,0 ─ 7,0 ─ ... 10,0
///                       (platform 1)
/// ```
fn build_yard(world: &mut World) {
    for x in -1..10 {
        world.add_track(x, 0, x + 1, 0);
    }
    world.add_track(2, 0, 3, 1);
    for x in 3..6 {
        world.add_track(x, 1, x + 1, 1);
    }
    world.add_track(6, 1, 7, 0);

    world.add_exit(Exit {
        name: "west".into(),
        location: c(0, 0),
        spawn_direction: TrackDirection::E,
    });
    world.add_exit(Exit {
        name: "east".into(),
        location: c(9, 0),
        spawn_direction: TrackDirection::W,
    });

    world.add_track_area(TrackArea {
        name: "platform 1".into(),
        entry_points: vec![TilePair::new(c(2, 0), c(3, 0))],
        stopping_points: vec![TilePair::new(c(5, 0), c(6, 0))],
    });
    world.add_track_area(TrackArea {
        name: "platform 2".into(),
        entry_points: vec![TilePair::new(c(2, 0), c(3, 1))],
        stopping_points: vec![TilePair::new(c(5, 1), c(6, 1))],
    });
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    env_logger::init();

    println!("=== junction — two platforms, one dispatcher ===");
    println!();

    // 1. Build the yard and its signals.
    let mut world = World::with_config(WorldConfig { train_speed: TRAIN_SPEED });
    build_yard(&mut world);

    let entry = SignalLocation::new(c(1, 0), c(2, 0));
    let platform1_exit = SignalLocation::new(c(6, 0), c(7, 0));
    let platform2_exit = SignalLocation::new(c(6, 1), c(7, 0));
    let east_block = SignalLocation::new(c(8, 0), c(9, 0));
    world.add_signal(entry, SignalKind::Manual);
    world.add_signal(platform1_exit, SignalKind::Manual);
    world.add_signal(platform2_exit, SignalKind::Manual);
    world.add_signal(east_block, SignalKind::Automatic);
    println!(
        "Yard: {} tiles, {} signals, {} platforms",
        world.track_tiles().len(),
        world.signals().len(),
        world.track_areas().len()
    );

    // 2. Timetable two trains from the west.
    world.spawn_train(
        "local 7",
        0.5,
        Timetable::new(
            WorldTime::from_seconds(5.0),
            WorldTime::from_seconds(15.0),
            WorldTime::from_seconds(30.0),
            WorldTime::from_seconds(45.0),
            "west",
            "platform 1",
            "east",
            MIN_STOP,
        ),
    );
    world.spawn_train(
        "express 12",
        0.5,
        Timetable::new(
            WorldTime::from_seconds(20.0),
            WorldTime::from_seconds(35.0),
            WorldTime::from_seconds(55.0),
            WorldTime::from_seconds(70.0),
            "west",
            "platform 2",
            "east",
            MIN_STOP,
        ),
    );

    // 3. The dispatcher's script: routes to open once their time has come.
    //    A refused opening (the path is still occupied) is retried each tick.
    let mut script = vec![
        (2.0, entry, platform1_exit),
        (25.0, platform1_exit, east_block),
        (34.0, entry, platform2_exit),
        (50.0, platform2_exit, east_block),
    ];

    // 4. Run.
    println!();
    let mut observer = ConsoleObserver::default();
    let ticks = (RUN_SECONDS / TICK_SECONDS) as usize;
    for _ in 0..ticks {
        let now = world.current_time().total_seconds();
        script.retain(|&(due, from, to)| {
            if now < due {
                return true;
            }
            let opened = world
                .try_create_route(from, to)
                .map(|route| world.try_open_route(&route))
                .unwrap_or(false);
            if opened {
                println!(
                    "  [route]    opened {} -> {}",
                    from.from_tile, to.from_tile
                );
            }
            !opened
        });

        world.update_with(TICK_SECONDS, &mut observer);
    }

    // 5. Summary.
    println!();
    println!("Simulated {RUN_SECONDS} s, {} events", observer.events);
    println!("{:<12} {:<22} {:>6}", "Train", "State", "Score");
    println!("{}", "-".repeat(42));
    for train in world.trains() {
        println!(
            "{:<12} {:<22} {:>6}",
            train.id,
            format!("{:?}", train.timetable.state()),
            train.timetable.score()
        );
    }

    // 6. Save the final world.
    std::fs::create_dir_all("output/junction")?;
    let saved = rail_save::save_world(&world)?;
    let path = Path::new("output/junction/save.json");
    std::fs::write(path, &saved)?;
    println!();
    println!("World saved to {} ({} bytes)", path.display(), saved.len());

    Ok(())
}
