//! The in-world clock.
//!
//! # Design
//!
//! Time is stored as floating-point seconds since the start of the day, but
//! to users of the type the minimum unit is one second: all comparisons
//! truncate, so 01:59:59.9999 is *exactly equal* to 01:59:59.  Equality
//! additionally compares hour/minute/second components, which wrap at 24 h;
//! ordering uses the raw truncated second count and does not wrap.  Timetable
//! arithmetic depends on both quirks.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// A truncated-to-the-second simulation clock value.
#[derive(Copy, Clone, Debug, Default)]
pub struct WorldTime {
    seconds: f32,
}

impl WorldTime {
    pub fn from_seconds(seconds: f32) -> WorldTime {
        WorldTime { seconds }
    }

    pub fn from_hms(hours: u32, minutes: u32, seconds: u32) -> WorldTime {
        WorldTime::from_seconds((hours * 3600 + minutes * 60 + seconds) as f32)
    }

    /// Raw seconds since start, untruncated.  This is what gets persisted.
    #[inline]
    pub fn total_seconds(self) -> f32 {
        self.seconds
    }

    #[inline]
    pub fn seconds(self) -> u32 {
        self.seconds as u32 % 60
    }

    #[inline]
    pub fn minutes(self) -> u32 {
        self.seconds as u32 / 60 % 60
    }

    #[inline]
    pub fn hours(self) -> u32 {
        self.seconds as u32 / 3600 % 24
    }
}

impl PartialEq for WorldTime {
    fn eq(&self, other: &WorldTime) -> bool {
        self.seconds() == other.seconds()
            && self.minutes() == other.minutes()
            && self.hours() == other.hours()
    }
}

impl PartialOrd for WorldTime {
    fn partial_cmp(&self, other: &WorldTime) -> Option<std::cmp::Ordering> {
        (self.seconds as u32).partial_cmp(&(other.seconds as u32))
    }
}

impl Add for WorldTime {
    type Output = WorldTime;
    fn add(self, rhs: WorldTime) -> WorldTime {
        WorldTime::from_seconds(self.seconds + rhs.seconds)
    }
}

impl Sub for WorldTime {
    type Output = WorldTime;
    fn sub(self, rhs: WorldTime) -> WorldTime {
        WorldTime::from_seconds(self.seconds - rhs.seconds)
    }
}

impl Add<f32> for WorldTime {
    type Output = WorldTime;
    fn add(self, rhs: f32) -> WorldTime {
        WorldTime::from_seconds(self.seconds + rhs)
    }
}

impl Sub<f32> for WorldTime {
    type Output = WorldTime;
    fn sub(self, rhs: f32) -> WorldTime {
        WorldTime::from_seconds(self.seconds - rhs)
    }
}

impl AddAssign<f32> for WorldTime {
    fn add_assign(&mut self, rhs: f32) {
        self.seconds += rhs;
    }
}

impl SubAssign<f32> for WorldTime {
    fn sub_assign(&mut self, rhs: f32) {
        self.seconds -= rhs;
    }
}

impl fmt::Display for WorldTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours(),
            self.minutes(),
            self.seconds()
        )
    }
}
