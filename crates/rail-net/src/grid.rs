//! Arena of track tiles.
//!
//! Tiles live in an insertion-ordered `Vec` (the order is observable through
//! iteration and the persistence format) with an `FxHashMap` coordinate index
//! for O(1) lookup.  Tiles are created lazily and never removed, so slot
//! indices are stable — the route search uses them for its visited set.

use rustc_hash::FxHashMap;

use rail_core::TileCoord;

use crate::tile::TrackTile;

#[derive(Clone, Debug, Default)]
pub struct TileGrid {
    tiles: Vec<TrackTile>,
    index: FxHashMap<TileCoord, usize>,
}

impl TileGrid {
    pub fn new() -> TileGrid {
        TileGrid::default()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn get(&self, coord: TileCoord) -> Option<&TrackTile> {
        self.index.get(&coord).map(|&slot| &self.tiles[slot])
    }

    pub fn get_mut(&mut self, coord: TileCoord) -> Option<&mut TrackTile> {
        self.index.get(&coord).map(|&slot| &mut self.tiles[slot])
    }

    /// The stable slot index of a tile, if present.
    #[inline]
    pub fn slot(&self, coord: TileCoord) -> Option<usize> {
        self.index.get(&coord).copied()
    }

    #[inline]
    pub fn by_slot(&self, slot: usize) -> &TrackTile {
        &self.tiles[slot]
    }

    #[inline]
    pub fn by_slot_mut(&mut self, slot: usize) -> &mut TrackTile {
        &mut self.tiles[slot]
    }

    /// Fetch the tile at `coord`, creating an empty one if absent.
    pub fn get_or_insert(&mut self, coord: TileCoord) -> &mut TrackTile {
        let slot = *self.index.entry(coord).or_insert_with(|| {
            self.tiles
                .push(TrackTile::new(coord, rail_core::TrackDirection::empty()));
            self.tiles.len() - 1
        });
        &mut self.tiles[slot]
    }

    /// Replace the tile at the same coordinate, or append.  Persistence only.
    pub fn overwrite(&mut self, tile: TrackTile) {
        match self.index.get(&tile.coord) {
            Some(&slot) => self.tiles[slot] = tile,
            None => {
                self.index.insert(tile.coord, self.tiles.len());
                self.tiles.push(tile);
            }
        }
    }

    pub fn tiles(&self) -> &[TrackTile] {
        &self.tiles
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackTile> {
        self.tiles.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackTile> {
        self.tiles.iter_mut()
    }
}
