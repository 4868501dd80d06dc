//! A train: a point-like object with a trailing length.

use rail_core::{TileCoord, TrackDirection};

use crate::timetable::Timetable;

/// A single train.
///
/// The head of the train is at `tile` with a sub-tile `offset_in_tile`; the
/// body trails `length` meters behind it along the track, which the occupancy
/// pass marks `Occupied` every tick.
#[derive(Clone, Debug)]
pub struct Train {
    /// Name or identifier shown to the player.
    pub id: String,

    /// The tile the head is currently moving through.
    pub tile: TileCoord,

    /// Offset from the tile center along the direction of travel:
    /// 0 = at the center, +1 = about to leave, −1 = just entered.
    pub offset_in_tile: f32,

    /// Direction of travel.  While approaching a tile center this is the
    /// *opposite* of the half-segment the head occupies.
    pub direction: TrackDirection,

    /// Length of the train in meters.
    pub length: f32,

    pub timetable: Timetable,

    /// False while dwelling at a destination or after leaving the world.
    pub is_moving: bool,

    /// Cached index of the track area the head is inside, if any.
    pub(crate) current_area: Option<usize>,
}

impl Train {
    pub fn new(
        id: impl Into<String>,
        tile: TileCoord,
        direction: TrackDirection,
        length: f32,
        timetable: Timetable,
    ) -> Train {
        Train {
            id: id.into(),
            tile,
            offset_in_tile: 0.0,
            direction,
            length,
            timetable,
            is_moving: true,
            current_area: None,
        }
    }

    /// Index into [`World::track_areas`](crate::World::track_areas) of the
    /// area the head is currently inside.
    pub fn current_area(&self) -> Option<usize> {
        self.current_area
    }
}
