//! `rail-core` — foundational types for the railsim simulation core.
//!
//! This crate is a dependency of every other `rail-*` crate.  It intentionally
//! has no `rail-*` dependencies and minimal external ones (only `bitflags`,
//! `log`, and `thiserror`).
//!
//! # What lives here
//!
//! | Module        | Contents                                                |
//! |---------------|---------------------------------------------------------|
//! | [`direction`] | `TrackDirection` bitmask and its vector algebra         |
//! | [`coord`]     | `TileCoord` integer grid coordinate                     |
//! | [`time`]      | `WorldTime` second-truncated simulation clock           |
//! | [`diag`]      | `Diagnostics` injected logging capability               |
//! | [`error`]     | `CoreError`, `CoreResult`                               |

pub mod coord;
pub mod diag;
pub mod direction;
pub mod error;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use coord::TileCoord;
pub use diag::{Diagnostics, LogDiagnostics, NullDiagnostics};
pub use direction::{COMPASS_ORDER, TrackDirection};
pub use error::{CoreError, CoreResult};
pub use time::WorldTime;
