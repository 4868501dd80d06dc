//! `rail-world` — the simulation heart of railsim.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                 |
//! |---------------|----------------------------------------------------------|
//! | [`world`]     | `World`: topology mutation, queries, the tick update     |
//! | [`route`]     | `Route`, route search, and two-phase route opening       |
//! | [`motion`]    | The shared track walker and occupancy flood fill         |
//! | [`train`]     | `Train`                                                  |
//! | [`timetable`] | `Timetable` state machine and scoring                    |
//! | [`observer`]  | `WorldObserver` event callbacks                          |
//!
//! The host game loop owns a single `World`, mutates it through the public
//! API, and calls [`World::update`] exactly once per tick.  Everything is
//! single-threaded and synchronous.

mod motion;
pub mod observer;
pub mod route;
pub mod timetable;
pub mod train;
pub mod world;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use observer::{NoopObserver, WorldObserver};
pub use route::Route;
pub use timetable::{Timetable, TimetableState};
pub use train::Train;
pub use world::{World, WorldConfig};
