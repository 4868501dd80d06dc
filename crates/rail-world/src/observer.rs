//! World observer trait for simulation-event callbacks.
//!
//! The timetable/scoring UI layer implements this to react to trains moving
//! through the network.  All methods have no-op defaults so implementors only
//! override what they care about.

use rail_core::WorldTime;
use rail_net::SignalLocation;

/// Callbacks invoked by [`World::update_with`](crate::World::update_with)
/// as trains cross boundaries and work their timetables.
pub trait WorldObserver {
    /// A train consumed a `Clear` signal while crossing its boundary (the
    /// signal has already been reset to `Danger`).
    fn on_signal_passed(&mut self, _train_id: &str, _location: SignalLocation) {}

    /// The head of a train crossed into a track area.
    fn on_area_entered(&mut self, _train_id: &str, _area_name: &str) {}

    /// The head of a train crossed out of a track area.
    fn on_area_left(&mut self, _train_id: &str, _area_name: &str) {}

    /// A timetabled train was placed into the world at its spawn exit.
    fn on_train_spawned(&mut self, _train_id: &str, _exit_name: &str, _time: WorldTime) {}

    /// A train halted at a stopping point of its preferred track.
    fn on_train_arrived(&mut self, _train_id: &str, _area_name: &str, _time: WorldTime) {}

    /// A dwelling train resumed its journey toward the exit.
    fn on_train_departed(&mut self, _train_id: &str, _area_name: &str, _time: WorldTime) {}

    /// A train reached its leave exit and left the world.
    fn on_train_left(&mut self, _train_id: &str, _time: WorldTime) {}
}

/// A [`WorldObserver`] that does nothing.  Used by [`World::update`](crate::World::update).
pub struct NoopObserver;

impl WorldObserver for NoopObserver {}
