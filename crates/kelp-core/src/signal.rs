//! Gesture signals
//!
//! The set of signals is closed: every stage (predicates, debounce, wire)
//! works over the same six names, indexed by `Signal`.

use std::fmt;
use std::ops::Index;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// A named gesture signal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Signal {
    /// Right wrist above the right shoulder
    RightHandUp,
    /// Left wrist above the left shoulder
    LeftHandUp,
    /// Both wrists close together
    PalmsTogetherPraying,
    /// Both wrists above their shoulders
    BothHandsUp,
    /// Closed fist on either hand
    Grab,
    /// Thumb up with the other fingers folded
    ThumbsUp,
}

impl Signal {
    /// Number of signals
    pub const COUNT: usize = 6;

    /// All signals in wire order
    pub fn all() -> &'static [Signal; Signal::COUNT] {
        &[
            Signal::RightHandUp,
            Signal::LeftHandUp,
            Signal::PalmsTogetherPraying,
            Signal::BothHandsUp,
            Signal::Grab,
            Signal::ThumbsUp,
        ]
    }

    /// Position in `SignalSet`
    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RightHandUp => "RightHandUp",
            Self::LeftHandUp => "LeftHandUp",
            Self::PalmsTogetherPraying => "PalmsTogetherPraying",
            Self::BothHandsUp => "BothHandsUp",
            Self::Grab => "Grab",
            Self::ThumbsUp => "ThumbsUp",
        }
    }

    /// Parse a wire key
    pub fn from_name(name: &str) -> Option<Signal> {
        Signal::all().iter().copied().find(|s| s.as_str() == name)
    }

    /// What the receiving application does with this signal
    pub fn action(&self) -> &'static str {
        match self {
            Self::RightHandUp => "rotate right",
            Self::LeftHandUp => "rotate left",
            Self::PalmsTogetherPraying => "move backward",
            Self::BothHandsUp => "move forward",
            Self::Grab => "grab",
            Self::ThumbsUp => "highlight trash",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One boolean per signal
///
/// Used both for per-frame candidates and for debounced active states.
/// Equality is value equality across every signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SignalSet([bool; Signal::COUNT]);

impl SignalSet {
    /// All signals false
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, signal: Signal) -> bool {
        self.0[signal.index()]
    }

    pub fn set(&mut self, signal: Signal, value: bool) {
        self.0[signal.index()] = value;
    }

    /// Builder-style `set`
    pub fn with(mut self, signal: Signal, value: bool) -> Self {
        self.set(signal, value);
        self
    }

    /// Iterate `(signal, value)` pairs in wire order
    pub fn iter(&self) -> impl Iterator<Item = (Signal, bool)> + '_ {
        Signal::all().iter().map(move |&s| (s, self.get(s)))
    }

    /// Signals currently true
    pub fn active(&self) -> impl Iterator<Item = Signal> + '_ {
        self.iter().filter(|(_, v)| *v).map(|(s, _)| s)
    }

    pub fn any(&self) -> bool {
        self.0.iter().any(|v| *v)
    }

    /// Signals whose value differs between `self` and `other`
    pub fn changed_from<'a>(&'a self, other: &'a SignalSet) -> impl Iterator<Item = Signal> + 'a {
        Signal::all()
            .iter()
            .copied()
            .filter(move |&s| self.get(s) != other.get(s))
    }
}

impl Index<Signal> for SignalSet {
    type Output = bool;

    fn index(&self, signal: Signal) -> &bool {
        &self.0[signal.index()]
    }
}

impl FromIterator<Signal> for SignalSet {
    fn from_iter<I: IntoIterator<Item = Signal>>(iter: I) -> Self {
        let mut set = SignalSet::new();
        for signal in iter {
            set.set(signal, true);
        }
        set
    }
}

impl Serialize for SignalSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Signal::COUNT))?;
        for (signal, value) in self.iter() {
            map.serialize_entry(signal.as_str(), &value)?;
        }
        map.end()
    }
}
