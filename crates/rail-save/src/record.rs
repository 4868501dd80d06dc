//! Flat serde records mirroring the on-disk document, plus the conversions
//! between them and the live world types.
//!
//! Restoring a record returns `Err` with a human-readable reason whenever a
//! field is semantically invalid (direction bits, out-of-range selected path,
//! unknown state value); the loader turns that into a warning and moves on.

use serde::{Deserialize, Serialize};

use rail_core::{TileCoord, TrackDirection, WorldTime};
use rail_net::{
    Exit, Signal, SignalKind, SignalLocation, SignalState, TilePair, TrackArea, TrackState,
    TrackTile,
};
use rail_world::{Timetable, Train};

fn coord(pair: [i32; 2]) -> TileCoord {
    TileCoord::new(pair[0], pair[1])
}

fn pair(coord: TileCoord) -> [i32; 2] {
    [coord.x, coord.y]
}

fn state_to_u8(state: TrackState) -> u8 {
    match state {
        TrackState::Free => 0,
        TrackState::Reserved => 1,
        TrackState::Occupied => 2,
    }
}

fn state_from_u8(raw: u8) -> Result<TrackState, String> {
    match raw {
        0 => Ok(TrackState::Free),
        1 => Ok(TrackState::Reserved),
        2 => Ok(TrackState::Occupied),
        other => Err(format!("unknown track state {other}")),
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub(crate) struct MetaRecord {
    /// World clock, seconds since midnight.
    pub time: f32,
}

/// The complete document as written by `save_world`.  The loader does not use
/// this type; it picks the sections out of a `serde_json::Value` so one bad
/// record cannot poison the rest.
#[derive(Serialize)]
pub(crate) struct SaveDocument {
    pub meta: MetaRecord,
    pub tiles: Vec<TileRecord>,
    pub signals: Vec<SignalRecord>,
    pub areas: Vec<AreaRecord>,
    pub exits: Vec<ExitRecord>,
    pub trains: Vec<TrainRecord>,
}

// ── Tiles ─────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub(crate) struct TileRecord {
    pub coordinates: [i32; 2],
    /// Connected directions as the raw bitmask.
    pub directions: u8,
    pub selected_path: u32,
    /// One value (0 free / 1 reserved / 2 occupied) per existing direction,
    /// in compass order.
    pub states: Vec<u8>,
}

impl TileRecord {
    pub fn capture(tile: &TrackTile) -> TileRecord {
        TileRecord {
            coordinates: pair(tile.coord),
            directions: tile.connected_directions.bits(),
            selected_path: tile.selected_path,
            states: tile
                .connected_directions
                .existing()
                .map(|direction| state_to_u8(tile.state(direction)))
                .collect(),
        }
    }

    pub fn restore(self) -> Result<TrackTile, String> {
        let directions =
            TrackDirection::from_persisted_bits(self.directions).map_err(|e| e.to_string())?;
        if directions.is_empty() {
            return Err("tile has no track".into());
        }
        if directions.bits().count_ones() as usize != self.states.len() {
            return Err(format!(
                "expected {} states, got {}",
                directions.bits().count_ones(),
                self.states.len()
            ));
        }

        let mut tile = TrackTile::new(coord(self.coordinates), directions);
        if self.selected_path as usize >= tile.valid_paths().len() {
            return Err(format!("selected path {} out of range", self.selected_path));
        }
        tile.selected_path = self.selected_path;

        for (direction, &raw) in directions.existing().zip(self.states.iter()) {
            tile.set_state(direction, state_from_u8(raw)?);
        }
        Ok(tile)
    }
}

// ── Signals ───────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub(crate) struct SignalRecord {
    pub from: [i32; 2],
    pub to: [i32; 2],
    /// 0 danger / 1 clear.
    pub state: u8,
    /// 0 manual / 1 automatic.
    pub kind: u8,
}

impl SignalRecord {
    pub fn capture(signal: &Signal) -> SignalRecord {
        SignalRecord {
            from: pair(signal.location.from_tile),
            to: pair(signal.location.to_tile),
            state: match signal.state {
                SignalState::Danger => 0,
                SignalState::Clear => 1,
            },
            kind: match signal.kind {
                SignalKind::Manual => 0,
                SignalKind::Automatic => 1,
            },
        }
    }

    pub fn restore(self) -> Result<Signal, String> {
        let location = SignalLocation::new(coord(self.from), coord(self.to));
        if !location.is_valid() {
            return Err(format!(
                "{} and {} are not neighboring tiles",
                location.from_tile, location.to_tile
            ));
        }
        let state = match self.state {
            0 => SignalState::Danger,
            1 => SignalState::Clear,
            other => return Err(format!("unknown signal state {other}")),
        };
        let kind = match self.kind {
            0 => SignalKind::Manual,
            1 => SignalKind::Automatic,
            other => return Err(format!("unknown signal kind {other}")),
        };
        Ok(Signal { location, state, kind })
    }
}

// ── Areas and exits ───────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub(crate) struct AreaRecord {
    pub name: String,
    pub entry_points: Vec<[[i32; 2]; 2]>,
    pub stopping_points: Vec<[[i32; 2]; 2]>,
}

impl AreaRecord {
    pub fn capture(area: &TrackArea) -> AreaRecord {
        let pairs = |points: &[TilePair]| {
            points
                .iter()
                .map(|p| [pair(p.from), pair(p.to)])
                .collect()
        };
        AreaRecord {
            name: area.name.clone(),
            entry_points: pairs(&area.entry_points),
            stopping_points: pairs(&area.stopping_points),
        }
    }

    pub fn restore(self) -> TrackArea {
        let points = |raw: Vec<[[i32; 2]; 2]>| {
            raw.into_iter()
                .map(|[from, to]| TilePair::new(coord(from), coord(to)))
                .collect()
        };
        TrackArea {
            name: self.name,
            entry_points: points(self.entry_points),
            stopping_points: points(self.stopping_points),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub(crate) struct ExitRecord {
    pub name: String,
    pub location: [i32; 2],
    /// Compass name, e.g. `"NE"`.
    pub spawn_direction: String,
}

impl ExitRecord {
    pub fn capture(exit: &Exit) -> ExitRecord {
        ExitRecord {
            name: exit.name.clone(),
            location: pair(exit.location),
            spawn_direction: exit.spawn_direction.compass_name().to_string(),
        }
    }

    pub fn restore(self) -> Result<Exit, String> {
        let spawn_direction =
            TrackDirection::from_compass(&self.spawn_direction).map_err(|e| e.to_string())?;
        Ok(Exit {
            name: self.name,
            location: coord(self.location),
            spawn_direction,
        })
    }
}

// ── Trains ────────────────────────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub(crate) struct TimetableRecord {
    pub spawn_time: f32,
    pub arrival_time: f32,
    pub departure_time: f32,
    pub leave_time: f32,
    pub spawn_location: String,
    pub preferred_track: String,
    pub leave_location: String,
    pub min_stop_duration: f32,
}

#[derive(Serialize, Deserialize)]
pub(crate) struct TrainRecord {
    pub id: String,
    pub tile: [i32; 2],
    /// Sub-tile offset in `[-1, 1]`.
    pub offset: f32,
    /// Travel direction as the raw single-bit mask.
    pub direction: u8,
    pub length: f32,
    pub timetable: TimetableRecord,
}

impl TrainRecord {
    pub fn capture(train: &Train) -> TrainRecord {
        let timetable = &train.timetable;
        TrainRecord {
            id: train.id.clone(),
            tile: pair(train.tile),
            offset: train.offset_in_tile,
            direction: train.direction.bits(),
            length: train.length,
            timetable: TimetableRecord {
                spawn_time: timetable.spawn_time().total_seconds(),
                arrival_time: timetable.arrival_time().total_seconds(),
                departure_time: timetable.departure_time().total_seconds(),
                leave_time: timetable.leave_time().total_seconds(),
                spawn_location: timetable.spawn_location().to_string(),
                preferred_track: timetable.preferred_track().to_string(),
                leave_location: timetable.leave_location().to_string(),
                min_stop_duration: timetable.min_stop_duration(),
            },
        }
    }

    pub fn restore(self) -> Result<Train, String> {
        let direction =
            TrackDirection::from_persisted_bits(self.direction).map_err(|e| e.to_string())?;
        if direction.bits().count_ones() != 1 {
            return Err(format!(
                "direction {:#04x} is not a single compass direction",
                self.direction
            ));
        }
        if !(-1.0..=1.0).contains(&self.offset) {
            return Err(format!("offset {} out of range", self.offset));
        }

        let record = self.timetable;
        let mut timetable = Timetable::new(
            WorldTime::from_seconds(record.spawn_time),
            WorldTime::from_seconds(record.arrival_time),
            WorldTime::from_seconds(record.departure_time),
            WorldTime::from_seconds(record.leave_time),
            record.spawn_location,
            record.preferred_track,
            record.leave_location,
            record.min_stop_duration,
        );
        // Only trains that were physically on the grid are saved, so every
        // loaded train comes back as present and en route.
        timetable.just_spawned();

        let mut train = Train::new(self.id, coord(self.tile), direction, self.length, timetable);
        train.offset_in_tile = self.offset;
        Ok(train)
    }
}
