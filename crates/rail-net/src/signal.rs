//! Signals: directional permission gates on tile boundaries.

use rustc_hash::FxHashMap;

use rail_core::TileCoord;

/// State of a signal.  `Clear` permits exactly one crossing, after which the
/// train resets it to `Danger`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SignalState {
    #[default]
    Danger,
    Clear,
}

impl SignalState {
    /// True iff a train may cross the boundary this signal guards.
    #[inline]
    pub fn permits_passage(self) -> bool {
        self == SignalState::Clear
    }

    /// The next state in the manual toggle cycle (Danger → Clear → Danger).
    #[inline]
    pub fn toggled(self) -> SignalState {
        match self {
            SignalState::Danger => SignalState::Clear,
            SignalState::Clear => SignalState::Danger,
        }
    }
}

/// Who operates the signal.  Manual signals change only through
/// `switch_signal`, route opening, and train passage; automatic signals
/// follow the occupancy of their block every tick.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum SignalKind {
    #[default]
    Manual,
    Automatic,
}

/// The ordered boundary a signal sits on.  A signal from A to B is distinct
/// from one from B to A.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub struct SignalLocation {
    pub from_tile: TileCoord,
    pub to_tile: TileCoord,
}

impl SignalLocation {
    pub fn new(from_tile: TileCoord, to_tile: TileCoord) -> SignalLocation {
        SignalLocation { from_tile, to_tile }
    }

    /// The two tiles must be distinct 8-neighbors.
    pub fn is_valid(self) -> bool {
        self.from_tile.is_neighbor_of(self.to_tile)
    }

    /// The same boundary in the opposite orientation.
    pub fn reversed(self) -> SignalLocation {
        SignalLocation {
            from_tile: self.to_tile,
            to_tile: self.from_tile,
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Signal {
    pub location: SignalLocation,
    pub state: SignalState,
    pub kind: SignalKind,
}

// ── SignalSet ─────────────────────────────────────────────────────────────────

/// Arena of signals, insertion-ordered with an index on the ordered location.
/// At most one signal per ordered `(from, to)` pair.
#[derive(Clone, Debug, Default)]
pub struct SignalSet {
    signals: Vec<Signal>,
    index: FxHashMap<SignalLocation, usize>,
}

impl SignalSet {
    pub fn new() -> SignalSet {
        SignalSet::default()
    }

    pub fn get(&self, location: SignalLocation) -> Option<&Signal> {
        self.index.get(&location).map(|&slot| &self.signals[slot])
    }

    pub fn get_mut(&mut self, location: SignalLocation) -> Option<&mut Signal> {
        self.index
            .get(&location)
            .map(|&slot| &mut self.signals[slot])
    }

    /// Insert a new signal.  Returns `false` (and leaves the set unchanged)
    /// if a signal already exists at the same ordered location.
    pub fn insert(&mut self, signal: Signal) -> bool {
        if self.index.contains_key(&signal.location) {
            return false;
        }
        self.index.insert(signal.location, self.signals.len());
        self.signals.push(signal);
        true
    }

    /// Replace the signal at the same location, or append.  Persistence only.
    pub fn overwrite(&mut self, signal: Signal) {
        match self.index.get(&signal.location) {
            Some(&slot) => self.signals[slot] = signal,
            None => {
                self.index.insert(signal.location, self.signals.len());
                self.signals.push(signal);
            }
        }
    }

    /// True iff a signal exists on the boundary between `a` and `b` in either
    /// orientation.  Signals act as track-circuit breakers for the occupancy
    /// flood fill regardless of which way they face.
    pub fn has_boundary(&self, a: TileCoord, b: TileCoord) -> bool {
        let forward = SignalLocation::new(a, b);
        self.index.contains_key(&forward) || self.index.contains_key(&forward.reversed())
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signal> {
        self.signals.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Signal> {
        self.signals.iter_mut()
    }
}
