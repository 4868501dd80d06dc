//! Named track areas and world exits — the hooks the timetable layer uses to
//! detect arrivals, departures, and trains leaving the world.

use rail_core::{TileCoord, TrackDirection};

/// A directed tile-to-tile boundary.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct TilePair {
    pub from: TileCoord,
    pub to: TileCoord,
}

impl TilePair {
    pub fn new(from: TileCoord, to: TileCoord) -> TilePair {
        TilePair { from, to }
    }
}

/// A named logical zone of the network.
///
/// A train crossing one of the entry points in the forward (`from` → `to`)
/// direction enters the area; crossing one in the reverse direction leaves
/// it.  Stopping points mark the boundaries where timetabled trains come to
/// a halt inside the area.
#[derive(Clone, Debug, Default)]
pub struct TrackArea {
    pub name: String,
    pub entry_points: Vec<TilePair>,
    pub stopping_points: Vec<TilePair>,
}

impl TrackArea {
    /// Does crossing `from` → `to` enter this area?
    pub fn is_entry(&self, from: TileCoord, to: TileCoord) -> bool {
        self.entry_points
            .iter()
            .any(|p| p.from == from && p.to == to)
    }

    /// Does crossing `from` → `to` leave this area?  (The entry pair matched
    /// in the opposite order.)
    pub fn is_departure(&self, from: TileCoord, to: TileCoord) -> bool {
        self.entry_points
            .iter()
            .any(|p| p.from == to && p.to == from)
    }

    /// Is `from` → `to` one of this area's stopping boundaries?
    pub fn is_stopping_point(&self, from: TileCoord, to: TileCoord) -> bool {
        self.stopping_points
            .iter()
            .any(|p| p.from == from && p.to == to)
    }
}

/// A spawn/despawn point at the edge of the world.  Trains spawn at
/// `location` moving in `spawn_direction` and leave the world through the
/// same tile.
#[derive(Clone, Debug)]
pub struct Exit {
    pub name: String,
    pub location: TileCoord,
    pub spawn_direction: TrackDirection,
}
