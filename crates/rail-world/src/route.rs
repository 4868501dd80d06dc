//! Route search and interlocking.
//!
//! A route runs from one signal to the next along the track graph.  Creating
//! a route is a pure search; opening it is the transactional part that aligns
//! points, reserves every segment, and clears the origin signal.

use rail_core::TileCoord;
use rail_net::{SignalLocation, SignalState, TrackState};

use crate::world::World;

/// A path between two signals, as found by
/// [`World::try_create_route`].
///
/// `tiles` lists every tile the route touches in travel order, starting with
/// `from.from_tile` and ending with `to.from_tile`.  The route stops at the
/// destination signal; the track beyond it belongs to the next block.
#[derive(Clone, Debug)]
pub struct Route {
    pub from: SignalLocation,
    pub to:   SignalLocation,
    pub tiles: Vec<TileCoord>,
}

impl World {
    /// Search for a path from signal `from` to signal `to`.
    ///
    /// The search walks valid turns only, never doubles back through a tile,
    /// and treats reaching `to.to_tile` as overshooting past the target
    /// signal (a dead branch).  Occupancy and point positions are ignored;
    /// they are checked when the route is opened.
    pub fn try_create_route(&self, from: SignalLocation, to: SignalLocation) -> Option<Route> {
        let mut tiles = vec![from.from_tile, from.to_tile];
        self.grid.get(from.to_tile)?;

        let mut visited = vec![false; self.grid.len()];
        if self.route_search(from.to_tile, from.from_tile, to, &mut visited, &mut tiles) {
            Some(Route { from, to, tiles })
        } else {
            None
        }
    }

    fn route_search(
        &self,
        current: TileCoord,
        previous: TileCoord,
        to: SignalLocation,
        visited: &mut [bool],
        tiles: &mut Vec<TileCoord>,
    ) -> bool {
        let Some(slot) = self.grid.slot(current) else {
            return false;
        };
        if visited[slot] {
            return false;
        }
        visited[slot] = true;

        if current == to.to_tile {
            // Ran past the target signal from behind.
            return false;
        }
        if current == to.from_tile {
            return true;
        }

        let back = current.direction_to(previous);
        for path in self.grid.by_slot(slot).valid_paths() {
            if path.is_dead_end() || !path.intersects(back) {
                continue;
            }
            let direction = path & !back;
            let next = current.offset(direction);

            tiles.push(next);
            if self.route_search(next, current, to, visited, tiles) {
                return true;
            }
            tiles.pop();
        }

        false
    }

    /// Try to open a previously created route.
    ///
    /// Checks every segment along the route for conflicting state first; on
    /// success, aligns each point to the route, marks every segment
    /// `Reserved` up to and including the half before the destination
    /// signal, and sets the origin signal to `Clear`.  Returns `false`
    /// without touching the world if any segment is already reserved or
    /// occupied.
    ///
    /// The outgoing half of the route's first tile is exempt from the state
    /// check: the train approaching the origin signal occupies it.
    ///
    /// # Panics
    /// Panics if a route tile no longer exists or the origin signal was
    /// removed; routes must be opened against the world they were created in.
    pub fn try_open_route(&mut self, route: &Route) -> bool {
        for (index, pair) in route.tiles.windows(2).enumerate() {
            let direction = pair[0].direction_to(pair[1]);

            let from = self
                .grid
                .get(pair[0])
                .unwrap_or_else(|| panic!("route tile {} vanished", pair[0]));
            let to = self
                .grid
                .get(pair[1])
                .unwrap_or_else(|| panic!("route tile {} vanished", pair[1]));

            if (from.state(direction) != TrackState::Free && index > 0)
                || to.state(direction.opposite()) != TrackState::Free
            {
                return false;
            }
        }

        for index in 0..route.tiles.len() - 1 {
            let from_coord = route.tiles[index];
            let to_coord = route.tiles[index + 1];
            let direction = from_coord.direction_to(to_coord);

            // The first tile sits behind the origin signal; the route never
            // crosses its center, so its point position is not ours to touch.
            if index != 0 && self.is_point(from_coord.x, from_coord.y) {
                let previous = route.tiles[index - 1];
                let incoming = from_coord.direction_to(previous);
                let through = incoming | direction;

                let tile = self.grid.get_mut(from_coord).unwrap_or_else(|| {
                    panic!("route tile {from_coord} vanished")
                });
                let position = tile
                    .valid_paths()
                    .iter()
                    .position(|path| *path == through)
                    .unwrap_or_else(|| {
                        panic!("route through {from_coord} does not follow a valid path")
                    });
                tile.selected_path = position as u32;
            }

            if index != 0 {
                let tile = self.grid.get_mut(from_coord).unwrap_or_else(|| {
                    panic!("route tile {from_coord} vanished")
                });
                tile.set_state(direction, TrackState::Reserved);
            }
            let tile = self.grid.get_mut(to_coord).unwrap_or_else(|| {
                panic!("route tile {to_coord} vanished")
            });
            tile.set_state(direction.opposite(), TrackState::Reserved);
        }

        // The half right before the destination signal is part of this block.
        let toward_signal = route.to.from_tile.direction_to(route.to.to_tile);
        let last = self.grid.get_mut(route.to.from_tile).unwrap_or_else(|| {
            panic!("route tile {} vanished", route.to.from_tile)
        });
        last.set_state(toward_signal, TrackState::Reserved);

        let signal = self
            .signals
            .get_mut(route.from)
            .unwrap_or_else(|| panic!("origin signal of route vanished"));
        signal.state = SignalState::Clear;

        true
    }
}
