//! The `World`: owner of the track grid, signals, areas, exits, and trains.

use rail_core::diag::{Diagnostics, LogDiagnostics};
use rail_core::{TileCoord, TrackDirection, WorldTime};
use rail_net::{
    Exit, Signal, SignalKind, SignalLocation, SignalSet, SignalState, TileGrid, TrackArea,
    TrackState, TrackTile,
};

use crate::motion::{TrainUpdateContext, update_train};
use crate::observer::{NoopObserver, WorldObserver};
use crate::timetable::{Timetable, TimetableState};
use crate::train::Train;

/// Tunable simulation parameters.
#[derive(Clone, Debug)]
pub struct WorldConfig {
    /// Train speed in meters (tile side lengths) per second.
    pub train_speed: f32,
}

impl Default for WorldConfig {
    fn default() -> WorldConfig {
        WorldConfig { train_speed: 0.2 }
    }
}

/// The simulation world.
///
/// Exclusively owned by the host game loop: all mutators are synchronous and
/// immediate, and [`update`](Self::update) must be called exactly once per
/// tick with the elapsed time.
pub struct World {
    pub(crate) grid: TileGrid,
    pub(crate) signals: SignalSet,
    pub(crate) areas: Vec<TrackArea>,
    pub(crate) exits: Vec<Exit>,
    pub(crate) trains: Vec<Train>,

    pub(crate) current_time: WorldTime,
    pub(crate) simulation_speed: f32,
    pub(crate) config: WorldConfig,

    pub(crate) diag: Box<dyn Diagnostics>,
}

impl Default for World {
    fn default() -> World {
        World::new()
    }
}

impl World {
    pub fn new() -> World {
        World::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> World {
        World {
            grid: TileGrid::new(),
            signals: SignalSet::new(),
            areas: Vec::new(),
            exits: Vec::new(),
            trains: Vec::new(),
            current_time: WorldTime::default(),
            simulation_speed: 1.0,
            config,
            diag: Box::new(LogDiagnostics),
        }
    }

    /// Replace the diagnostics sink the core reports through.
    pub fn set_diagnostics(&mut self, diag: Box<dyn Diagnostics>) {
        self.diag = diag;
    }

    // ── Queries ───────────────────────────────────────────────────────────

    pub fn track_tiles(&self) -> &[TrackTile] {
        self.grid.tiles()
    }

    pub fn signals(&self) -> &[Signal] {
        self.signals.signals()
    }

    pub fn trains(&self) -> &[Train] {
        &self.trains
    }

    pub fn track_areas(&self) -> &[TrackArea] {
        &self.areas
    }

    pub fn exits(&self) -> &[Exit] {
        &self.exits
    }

    pub fn find_tile(&self, x: i32, y: i32) -> Option<&TrackTile> {
        self.grid.get(TileCoord::new(x, y))
    }

    pub fn find_signal(&self, location: SignalLocation) -> Option<&Signal> {
        self.signals.get(location)
    }

    pub fn current_time(&self) -> WorldTime {
        self.current_time
    }

    pub fn simulation_speed(&self) -> f32 {
        self.simulation_speed
    }

    /// Scale applied to every delta time.  0 pauses the simulation; negative
    /// values behave like 0.
    pub fn set_simulation_speed(&mut self, speed: f32) {
        self.simulation_speed = speed;
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    // ── Topology mutation ─────────────────────────────────────────────────

    /// Add a piece of track between two 8-neighbor tiles, creating the tiles
    /// if needed.  Duplicate track warns and leaves the world unchanged.
    ///
    /// # Panics
    /// Panics if the coordinates are not 8-neighbors.
    pub fn add_track(&mut self, from_x: i32, from_y: i32, to_x: i32, to_y: i32) {
        let from = TileCoord::new(from_x, from_y);
        let to = TileCoord::new(to_x, to_y);
        self.add_track_single_direction(from, to);
        self.add_track_single_direction(to, from);
    }

    fn add_track_single_direction(&mut self, from: TileCoord, to: TileCoord) {
        let direction = from.direction_to(to);

        if let Some(tile) = self.grid.get(from) {
            if tile.connected_directions.contains(direction) {
                self.diag.warning(&format!(
                    "trying to add track from {from} to {to}, which already exists"
                ));
                return;
            }
        }

        let tile = self.grid.get_or_insert(from);
        tile.connected_directions |= direction;
    }

    /// The valid through-paths of the tile at `(x, y)`; empty if there is no
    /// tile there.  See [`TrackTile::valid_paths`] for the ordering contract.
    pub fn list_valid_paths(&self, x: i32, y: i32) -> Vec<TrackDirection> {
        self.find_tile(x, y)
            .map(TrackTile::valid_paths)
            .unwrap_or_default()
    }

    /// True iff the tile has more than one valid path (a switch).
    pub fn is_point(&self, x: i32, y: i32) -> bool {
        self.list_valid_paths(x, y).len() > 1
    }

    /// Cycle a point to its next path.  No-op on anything that is not a
    /// point.
    pub fn switch_point(&mut self, x: i32, y: i32) {
        if !self.is_point(x, y) {
            return;
        }

        let path_count = self.list_valid_paths(x, y).len() as u32;
        if let Some(tile) = self.grid.get_mut(TileCoord::new(x, y)) {
            tile.selected_path = (tile.selected_path + 1) % path_count;
        }
    }

    /// Install a signal on an ordered tile boundary.  Duplicate locations
    /// warn and leave the world unchanged.  New signals show `Danger`.
    ///
    /// # Panics
    /// Panics if the location's tiles are not distinct 8-neighbors.
    pub fn add_signal(&mut self, location: SignalLocation, kind: SignalKind) {
        assert!(
            location.is_valid(),
            "signal tiles {} and {} are not neighbors",
            location.from_tile,
            location.to_tile
        );

        let inserted = self.signals.insert(Signal {
            location,
            state: SignalState::Danger,
            kind,
        });
        if !inserted {
            self.diag.warning(&format!(
                "trying to add signal from {} to {}, which already exists",
                location.from_tile, location.to_tile
            ));
        }
    }

    /// Manually toggle a signal through its Danger → Clear → Danger cycle.
    /// Unknown locations are ignored.
    pub fn switch_signal(&mut self, location: SignalLocation) {
        if let Some(signal) = self.signals.get_mut(location) {
            signal.state = signal.state.toggled();
        }
    }

    /// Register a named track area; returns its index.
    pub fn add_track_area(&mut self, area: TrackArea) -> u32 {
        self.areas.push(area);
        self.areas.len() as u32 - 1
    }

    pub fn add_exit(&mut self, exit: Exit) {
        self.exits.push(exit);
    }

    // ── Trains ────────────────────────────────────────────────────────────

    /// Place a free-running train at a tile center immediately.
    ///
    /// The tile must exist, have track in `direction`, and its selected path
    /// must include `direction`; otherwise this warns and returns `false`.
    pub fn spawn_train_at(
        &mut self,
        id: impl Into<String>,
        x: i32,
        y: i32,
        direction: TrackDirection,
        length: f32,
    ) -> bool {
        let id = id.into();
        let coord = TileCoord::new(x, y);

        let Some(tile) = self.grid.get(coord) else {
            self.diag.warning(&format!(
                "trying to spawn train {id} at {coord}, which is not a valid track tile"
            ));
            return false;
        };
        if !tile.connected_directions.contains(direction) {
            self.diag.warning(&format!(
                "trying to spawn train {id} at {coord} in invalid direction {}",
                direction.compass_name()
            ));
            return false;
        }
        let paths = tile.valid_paths();
        if !paths[tile.selected_path as usize].intersects(direction) {
            self.diag.warning(&format!(
                "trying to spawn train {id} at {coord}, direction {}, which is not part of the selected path",
                direction.compass_name()
            ));
            return false;
        }

        self.trains
            .push(Train::new(id, coord, direction, length, Timetable::free_running()));
        true
    }

    /// Register a timetabled train.  It enters the world at the exit named by
    /// the timetable's spawn location once its spawn time is reached and the
    /// spawn tile is clear; until then it exists only on paper.
    pub fn spawn_train(&mut self, id: impl Into<String>, length: f32, timetable: Timetable) -> bool {
        let id = id.into();

        if !self
            .exits
            .iter()
            .any(|exit| exit.name == timetable.spawn_location())
        {
            self.diag.warning(&format!(
                "trying to schedule train {id} with unknown spawn location {:?}",
                timetable.spawn_location()
            ));
            return false;
        }

        let mut train = Train::new(id, TileCoord::default(), TrackDirection::N, length, timetable);
        train.is_moving = false;
        self.trains.push(train);
        true
    }

    // ── Simulation control ────────────────────────────────────────────────

    /// Advance the simulation by `delta_time` seconds (before speed scaling).
    pub fn update(&mut self, delta_time: f32) {
        self.update_with(delta_time, &mut NoopObserver);
    }

    /// Like [`update`](Self::update), with event callbacks.
    pub fn update_with(&mut self, delta_time: f32, observer: &mut dyn WorldObserver) {
        let adjusted = self.simulation_speed * delta_time;
        if adjusted <= 0.0 {
            return;
        }

        self.current_time += adjusted;

        // Occupancy is recomputed from scratch each tick: simpler than
        // diffing, and correct since trains move monotonically within a tick.
        for tile in self.grid.iter_mut() {
            let directions = tile.connected_directions;
            for direction in directions.existing() {
                if tile.state(direction) == TrackState::Occupied {
                    tile.set_state(direction, TrackState::Free);
                }
            }
        }

        // Trains update in insertion order: first come, first served within
        // a tick.
        let World {
            grid,
            signals,
            areas,
            exits,
            trains,
            config,
            diag,
            current_time,
            ..
        } = self;
        let mut ctx = TrainUpdateContext {
            grid,
            signals,
            areas,
            exits,
            config,
            now: *current_time,
            diag: diag.as_ref(),
        };
        for train in trains.iter_mut() {
            update_train(&mut ctx, train, adjusted, observer);
        }

        // Placement runs after the occupancy rebuild so a blocked exit is
        // seen as blocked.  A newly placed train starts moving next tick.
        self.place_due_trains(observer);

        self.refresh_automatic_signals();
    }

    /// Put timetabled trains whose spawn time has come onto the grid.  A
    /// blocked spawn tile is retried next tick.
    fn place_due_trains(&mut self, observer: &mut dyn WorldObserver) {
        let World {
            grid,
            exits,
            trains,
            diag,
            current_time,
            ..
        } = self;
        let now = *current_time;

        for train in trains.iter_mut() {
            if train.timetable.state() != TimetableState::NotSpawned
                || train.timetable.spawn_time() > now
            {
                continue;
            }

            // The exit was validated when the train was scheduled.
            let Some(exit) = exits
                .iter()
                .find(|exit| exit.name == train.timetable.spawn_location())
            else {
                continue;
            };

            let Some(tile) = grid.get(exit.location) else {
                diag.warning(&format!(
                    "cannot spawn train {} at exit {}: no track at {}",
                    train.id, exit.name, exit.location
                ));
                continue;
            };
            if !tile.connected_directions.contains(exit.spawn_direction)
                || !tile.valid_paths()[tile.selected_path as usize]
                    .intersects(exit.spawn_direction)
            {
                diag.warning(&format!(
                    "cannot spawn train {} at exit {}: spawn direction {} does not match the track",
                    train.id,
                    exit.name,
                    exit.spawn_direction.compass_name()
                ));
                continue;
            }
            if tile.has_any(TrackState::Occupied) || tile.has_any(TrackState::Reserved) {
                continue; // another train is in the way; try again next tick
            }

            // Claim the tile right away so a second due train cannot be
            // placed on it within the same tick.  The occupancy pass takes
            // over from the next tick on.
            if let Some(tile) = grid.get_mut(exit.location) {
                let directions = tile.connected_directions;
                for direction in directions.existing() {
                    tile.set_state(direction, TrackState::Occupied);
                }
            }

            train.tile = exit.location;
            train.direction = exit.spawn_direction;
            train.offset_in_tile = 0.0;
            train.is_moving = true;
            train.timetable.just_spawned();
            observer.on_train_spawned(&train.id, &exit.name, now);
            diag.info(&format!(
                "train {} spawned at exit {}",
                train.id, exit.name
            ));
        }
    }

    /// Automatic signals follow the occupancy of the block ahead of them:
    /// `Danger` while the half-segment past the boundary is occupied, `Clear`
    /// otherwise.  Looking only forward keeps a signal from reading the train
    /// approaching it as a blocked block.
    fn refresh_automatic_signals(&mut self) {
        let World { grid, signals, .. } = self;

        for signal in signals.iter_mut() {
            if signal.kind != SignalKind::Automatic {
                continue;
            }

            let location = signal.location;
            let direction = location.from_tile.direction_to(location.to_tile);
            let blocked = match grid.get(location.to_tile) {
                Some(to) => to.state(direction.opposite()) == TrackState::Occupied,
                None => true,
            };
            signal.state = if blocked {
                SignalState::Danger
            } else {
                SignalState::Clear
            };
        }
    }

    // ── Persistence hooks ─────────────────────────────────────────────────
    //
    // Used only by the save adapter; they bypass the usual validation so a
    // snapshot can be restored verbatim.

    pub fn overwrite_tile(&mut self, tile: TrackTile) {
        self.grid.overwrite(tile);
    }

    /// # Panics
    /// Panics if the signal's location is not a valid tile boundary.
    pub fn overwrite_signal(&mut self, signal: Signal) {
        assert!(signal.location.is_valid());
        self.signals.overwrite(signal);
    }

    pub fn add_train_unchecked(&mut self, train: Train) {
        self.trains.push(train);
    }

    pub fn override_time(&mut self, time: WorldTime) {
        self.current_time = time;
    }
}
