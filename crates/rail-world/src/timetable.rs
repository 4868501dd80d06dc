//! Per-train timetables: the scoring layer's view of a train's life.
//!
//! A timetable is a small state machine:
//!
//! ```text
//! NotSpawned → MovingToDestination → StoppedAtDestination → MovingToExit → Left
//! ```
//!
//! Each transition at the player's command earns a score based on punctuality
//! and whether the train was routed to its preferred track.

use rail_core::WorldTime;

/// Where a timetabled train currently is in its life cycle.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TimetableState {
    #[default]
    NotSpawned,
    MovingToDestination,
    StoppedAtDestination,
    MovingToExit,
    Left,
}

#[derive(Clone, Debug)]
pub struct Timetable {
    spawn_time: WorldTime,
    arrival_time: WorldTime,
    departure_time: WorldTime,
    leave_time: WorldTime,

    spawn_location: String,
    preferred_track: String,
    leave_location: String,

    min_stop_duration: f32,

    stopping_time: f32,
    accumulated_score: u32,
    state: TimetableState,
}

impl Timetable {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        spawn_time: WorldTime,
        arrival_time: WorldTime,
        departure_time: WorldTime,
        leave_time: WorldTime,
        spawn_location: impl Into<String>,
        preferred_track: impl Into<String>,
        leave_location: impl Into<String>,
        min_stop_duration: f32,
    ) -> Timetable {
        Timetable {
            spawn_time,
            arrival_time,
            departure_time,
            leave_time,
            spawn_location: spawn_location.into(),
            preferred_track: preferred_track.into(),
            leave_location: leave_location.into(),
            min_stop_duration,
            stopping_time: 0.0,
            accumulated_score: 0,
            state: TimetableState::NotSpawned,
        }
    }

    /// A timetable for a train that is already in the world, never stops
    /// anywhere, and never leaves.  Used by the immediate spawn form.
    pub fn free_running() -> Timetable {
        let mut timetable = Timetable::new(
            WorldTime::default(),
            WorldTime::default(),
            WorldTime::default(),
            WorldTime::default(),
            "",
            "",
            "",
            0.0,
        );
        timetable.state = TimetableState::MovingToDestination;
        timetable
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn spawn_time(&self) -> WorldTime {
        self.spawn_time
    }

    pub fn arrival_time(&self) -> WorldTime {
        self.arrival_time
    }

    pub fn departure_time(&self) -> WorldTime {
        self.departure_time
    }

    pub fn leave_time(&self) -> WorldTime {
        self.leave_time
    }

    pub fn spawn_location(&self) -> &str {
        &self.spawn_location
    }

    pub fn preferred_track(&self) -> &str {
        &self.preferred_track
    }

    pub fn leave_location(&self) -> &str {
        &self.leave_location
    }

    pub fn min_stop_duration(&self) -> f32 {
        self.min_stop_duration
    }

    pub fn state(&self) -> TimetableState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.accumulated_score
    }

    /// True while the train physically exists on the track grid.
    pub fn is_present_in_world(&self) -> bool {
        matches!(
            self.state,
            TimetableState::MovingToDestination
                | TimetableState::StoppedAtDestination
                | TimetableState::MovingToExit
        )
    }

    // ── Transitions ───────────────────────────────────────────────────────

    pub fn just_spawned(&mut self) {
        self.state = TimetableState::MovingToDestination;
    }

    /// Should the train halt at a stopping point of `track_area_name`?
    pub fn should_stop(&self, track_area_name: &str) -> bool {
        self.preferred_track == track_area_name
    }

    pub fn just_arrived(&mut self, track_area_name: &str, now: WorldTime) {
        assert_eq!(self.state, TimetableState::MovingToDestination);

        let correct_track = track_area_name == self.preferred_track;
        self.add_score_for_action(self.arrival_time, now, correct_track);
        self.state = TimetableState::StoppedAtDestination;
    }

    /// May the train leave the platform?  Requires both the scheduled
    /// departure time to have passed and the minimum dwell to be served.
    pub fn should_depart(&self, now: WorldTime) -> bool {
        assert_eq!(self.state, TimetableState::StoppedAtDestination);
        now > self.departure_time && self.stopping_time > self.min_stop_duration
    }

    pub fn just_departed(&mut self, track_area_name: &str, now: WorldTime) {
        assert_eq!(self.state, TimetableState::StoppedAtDestination);

        let correct_track = track_area_name == self.preferred_track;
        self.add_score_for_action(self.departure_time, now, correct_track);
        self.state = TimetableState::MovingToExit;
    }

    pub fn just_left(&mut self, now: WorldTime) {
        assert_eq!(self.state, TimetableState::MovingToExit);

        self.add_score_for_action(self.leave_time, now, true);
        self.state = TimetableState::Left;
    }

    /// Advance the dwell timer while stopped at the destination.
    pub fn update(&mut self, delta_time: f32) {
        if self.state == TimetableState::StoppedAtDestination {
            self.stopping_time += delta_time;
        }
    }

    // ── Scoring ───────────────────────────────────────────────────────────

    fn add_score_for_action(&mut self, scheduled: WorldTime, actual: WorldTime, correct_track: bool) {
        const BASE_SCORE: u32 = 40;
        const WRONG_TRACK_SCORE: u32 = BASE_SCORE / 2;
        const DELAY_MODIFIER_PER_MINUTE: f32 = 0.08;
        const MIN_SCORE_MODIFIER: f32 = 0.4;

        let base = if correct_track { BASE_SCORE } else { WRONG_TRACK_SCORE };

        let delay_minutes = if actual > scheduled {
            (actual - scheduled).minutes()
        } else {
            0
        };
        let modifier =
            (1.0 - DELAY_MODIFIER_PER_MINUTE * delay_minutes as f32).max(MIN_SCORE_MODIFIER);

        self.accumulated_score += (base as f32 * modifier) as u32;
    }
}
