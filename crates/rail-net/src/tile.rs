//! A single grid cell of track.

use rail_core::direction::is_valid_turn;
use rail_core::{TileCoord, TrackDirection};

/// Occupancy state of one directional half-segment of a tile.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TrackState {
    #[default]
    Free,
    /// Claimed by an opened route; no other route may cross it.
    Reserved,
    /// Physically covered by a train (recomputed from scratch every tick).
    Occupied,
}

/// One tile of the track grid.
///
/// A tile knows which of the 8 compass directions carry track, which of its
/// valid through-paths is currently selected (meaningful only for points),
/// and the occupancy state of each directional half-segment.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackTile {
    pub coord: TileCoord,

    /// Union of the directions this tile has track in.
    pub connected_directions: TrackDirection,

    /// Index into [`valid_paths`](Self::valid_paths).  Invariant: always less
    /// than the number of valid paths.
    pub selected_path: u32,

    /// Per-direction occupancy, indexed by bit position.
    state: [TrackState; 8],
}

impl TrackTile {
    pub fn new(coord: TileCoord, connected_directions: TrackDirection) -> TrackTile {
        TrackTile {
            coord,
            connected_directions,
            selected_path: 0,
            state: [TrackState::Free; 8],
        }
    }

    /// Occupancy of the half-segment running toward `direction`.
    ///
    /// # Panics
    /// Panics unless `direction` is a single bit.
    #[inline]
    pub fn state(&self, direction: TrackDirection) -> TrackState {
        self.state[Self::state_index(direction)]
    }

    /// # Panics
    /// Panics unless `direction` is a single bit.
    #[inline]
    pub fn set_state(&mut self, direction: TrackDirection, state: TrackState) {
        self.state[Self::state_index(direction)] = state;
    }

    /// True iff any of the 8 half-segments is in `state`.
    pub fn has_any(&self, state: TrackState) -> bool {
        self.state.contains(&state)
    }

    /// True iff `other` is an 8-neighbor and this tile has track toward it.
    pub fn is_connected_to(&self, other: &TrackTile) -> bool {
        self.coord.is_neighbor_of(other.coord)
            && self
                .connected_directions
                .contains(self.coord.direction_to(other.coord))
    }

    /// Enumerate the valid through-paths of this tile.
    ///
    /// Each path is the union of two connected directions forming a non-reflex
    /// turn; a dead-end tile has its single direction as the only path.  Paths
    /// are discovered by iterating `from` then `to` in compass order, keeping
    /// the first occurrence of each union — this order defines the index
    /// space of `selected_path` and must not change (it is persisted).
    pub fn valid_paths(&self) -> Vec<TrackDirection> {
        if self.connected_directions.is_dead_end() {
            return vec![self.connected_directions];
        }

        let mut result = Vec::new();
        for from in self.connected_directions.existing() {
            for to in self.connected_directions.existing() {
                if !is_valid_turn(from, to) {
                    continue;
                }
                let path = from | to;
                if result.contains(&path) {
                    continue;
                }
                result.push(path);
            }
        }
        result
    }

    fn state_index(direction: TrackDirection) -> usize {
        assert!(
            direction.bits().count_ones() == 1,
            "{direction:?} is not a single direction"
        );
        direction.bits().trailing_zeros() as usize
    }
}
