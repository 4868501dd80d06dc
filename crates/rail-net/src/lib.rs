//! `rail-net` — the static data model of the track network.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                  |
//! |------------|-----------------------------------------------------------|
//! | [`tile`]   | `TrackTile`, `TrackState`, valid-path enumeration         |
//! | [`grid`]   | `TileGrid` arena (insertion-ordered, coordinate-indexed)  |
//! | [`signal`] | `Signal`, `SignalLocation`, `SignalSet`                   |
//! | [`area`]   | `TrackArea`, `TilePair`, `Exit`                           |
//!
//! Everything here is plain data plus pure queries; the simulation dynamics
//! (routes, trains, occupancy propagation) live in `rail-world`.

pub mod area;
pub mod grid;
pub mod signal;
pub mod tile;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use area::{Exit, TilePair, TrackArea};
pub use grid::TileGrid;
pub use signal::{Signal, SignalKind, SignalLocation, SignalSet, SignalState};
pub use tile::{TrackState, TrackTile};
