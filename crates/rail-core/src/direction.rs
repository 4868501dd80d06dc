//! The 8-way track direction bitmask and its vector algebra.
//!
//! # Design
//!
//! Every direction is an independent bit so a single byte can describe which
//! of the 8 compass directions a tile has track in ("this tile connects N and
//! SE").  A *path* through a tile is the union of exactly two opposite-ish
//! directions, except at dead ends where it is a single direction.
//!
//! The compass order N, NE, E, SE, S, SW, W, NW is canonical: valid-path
//! enumeration and the persistence format both depend on it.

use crate::error::{CoreError, CoreResult};

bitflags::bitflags! {
    /// A set of compass directions, one bit per direction.
    ///
    /// Single-bit values double as individual directions; several operations
    /// (`to_vector`, `opposite`, `half_tile_length`) require a single bit and
    /// panic otherwise.
    #[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Default)]
    pub struct TrackDirection: u8 {
        const N  = 1 << 0;
        const NE = 1 << 1;
        const E  = 1 << 2;
        const SE = 1 << 3;
        const S  = 1 << 4;
        const SW = 1 << 5;
        const W  = 1 << 6;
        const NW = 1 << 7;
    }
}

/// The canonical enumeration order for direction bits.
pub const COMPASS_ORDER: [TrackDirection; 8] = [
    TrackDirection::N,
    TrackDirection::NE,
    TrackDirection::E,
    TrackDirection::SE,
    TrackDirection::S,
    TrackDirection::SW,
    TrackDirection::W,
    TrackDirection::NW,
];

impl TrackDirection {
    /// Map one of the 8 unit/diagonal integer steps to its direction.
    ///
    /// North is +y, east is +x.
    ///
    /// # Panics
    /// Panics on any other vector — callers must only pass deltas between
    /// 8-neighbor tiles.
    pub fn from_vector(dx: i32, dy: i32) -> TrackDirection {
        match (dx, dy) {
            (0, 1) => TrackDirection::N,
            (1, 1) => TrackDirection::NE,
            (1, 0) => TrackDirection::E,
            (1, -1) => TrackDirection::SE,
            (0, -1) => TrackDirection::S,
            (-1, -1) => TrackDirection::SW,
            (-1, 0) => TrackDirection::W,
            (-1, 1) => TrackDirection::NW,
            _ => panic!("({dx}, {dy}) is not a direction between neighboring tiles"),
        }
    }

    /// The integer step this direction represents.
    ///
    /// # Panics
    /// Panics unless exactly one bit is set.
    pub fn to_vector(self) -> (i32, i32) {
        match self {
            TrackDirection::N => (0, 1),
            TrackDirection::NE => (1, 1),
            TrackDirection::E => (1, 0),
            TrackDirection::SE => (1, -1),
            TrackDirection::S => (0, -1),
            TrackDirection::SW => (-1, -1),
            TrackDirection::W => (-1, 0),
            TrackDirection::NW => (-1, 1),
            _ => panic!("{self:?} is not a single direction"),
        }
    }

    /// N↔S, NE↔SW, E↔W, SE↔NW.
    ///
    /// Opposite bits are 4 apart in the compass order, so this is a plain
    /// bit rotation and also works on multi-bit masks.
    #[inline]
    pub fn opposite(self) -> TrackDirection {
        TrackDirection::from_bits_retain(self.bits().rotate_left(4))
    }

    /// Euclidean distance from the tile center to its edge in this direction:
    /// 0.5 for cardinal directions, 0.5·√2 for diagonals.
    ///
    /// # Panics
    /// Panics unless exactly one bit is set.
    pub fn half_tile_length(self) -> f32 {
        match self {
            TrackDirection::N | TrackDirection::E | TrackDirection::S | TrackDirection::W => 0.5,
            TrackDirection::NE
            | TrackDirection::SE
            | TrackDirection::SW
            | TrackDirection::NW => 0.5 * std::f32::consts::SQRT_2,
            _ => panic!("{self:?} is not a single direction"),
        }
    }

    /// True iff the mask holds exactly one direction — a tile whose connected
    /// directions form a dead end, or a single-direction path.
    #[inline]
    pub fn is_dead_end(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Iterate the set bits in compass order (N, NE, E, SE, S, SW, W, NW).
    pub fn existing(self) -> impl Iterator<Item = TrackDirection> {
        COMPASS_ORDER.into_iter().filter(move |d| self.contains(*d))
    }

    /// The 1–2-letter compass name ("N", "SW", …).
    ///
    /// # Panics
    /// Panics unless exactly one bit is set.
    pub fn compass_name(self) -> &'static str {
        match self {
            TrackDirection::N => "N",
            TrackDirection::NE => "NE",
            TrackDirection::E => "E",
            TrackDirection::SE => "SE",
            TrackDirection::S => "S",
            TrackDirection::SW => "SW",
            TrackDirection::W => "W",
            TrackDirection::NW => "NW",
            _ => panic!("{self:?} is not a single direction"),
        }
    }

    /// Parse a compass name produced by [`compass_name`](Self::compass_name).
    ///
    /// Unlike the vector conversions this is fed by persisted data, so an
    /// unknown name is a soft error, not a panic.
    pub fn from_compass(name: &str) -> CoreResult<TrackDirection> {
        match name {
            "N" => Ok(TrackDirection::N),
            "NE" => Ok(TrackDirection::NE),
            "E" => Ok(TrackDirection::E),
            "SE" => Ok(TrackDirection::SE),
            "S" => Ok(TrackDirection::S),
            "SW" => Ok(TrackDirection::SW),
            "W" => Ok(TrackDirection::W),
            "NW" => Ok(TrackDirection::NW),
            other => Err(CoreError::UnknownCompassName(other.to_owned())),
        }
    }

    /// Validate a persisted bitmask.
    pub fn from_persisted_bits(bits: u8) -> CoreResult<TrackDirection> {
        TrackDirection::from_bits(bits).ok_or(CoreError::InvalidDirectionBits(bits))
    }
}

/// True iff a path entering a tile along `from` may leave along `to`:
/// the two direction vectors must have a negative dot product (no U-turns or
/// reflex angles).
pub fn is_valid_turn(from: TrackDirection, to: TrackDirection) -> bool {
    let (x1, y1) = from.to_vector();
    let (x2, y2) = to.to_vector();
    x1 * x2 + y1 * y2 < 0
}
