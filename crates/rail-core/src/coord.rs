//! Integer tile coordinates.

use std::fmt;

use crate::direction::TrackDirection;

/// One cell of the track grid.  North is +y, east is +x.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
pub struct TileCoord {
    pub x: i32,
    pub y: i32,
}

impl TileCoord {
    #[inline]
    pub const fn new(x: i32, y: i32) -> TileCoord {
        TileCoord { x, y }
    }

    /// The neighboring coordinate one step in `direction`.
    ///
    /// # Panics
    /// Panics unless `direction` is a single bit.
    #[inline]
    pub fn offset(self, direction: TrackDirection) -> TileCoord {
        let (dx, dy) = direction.to_vector();
        TileCoord::new(self.x + dx, self.y + dy)
    }

    /// The direction from `self` to an 8-neighbor.
    ///
    /// # Panics
    /// Panics if `other` is not an 8-neighbor of `self`.
    #[inline]
    pub fn direction_to(self, other: TileCoord) -> TrackDirection {
        TrackDirection::from_vector(other.x - self.x, other.y - self.y)
    }

    /// True iff the two coordinates are distinct and within one step of each
    /// other on both axes.
    pub fn is_neighbor_of(self, other: TileCoord) -> bool {
        if self == other {
            return false;
        }
        (self.x - other.x).abs() <= 1 && (self.y - other.y).abs() <= 1
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
