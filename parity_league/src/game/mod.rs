//! Even/odd game primitives.
//!
//! This module provides the pieces of the game that know nothing about
//! networking or scheduling:
//! - Participant identifiers and match sides
//! - The two enumerated parity choices and their parsing rules
//! - The random draw source
//! - The pure winner rule

pub mod choice;
pub mod draw;
pub mod rules;

pub use choice::{ChoiceError, ParityChoice};

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Maximum identifier length, in characters, kept after normalization.
pub const MAX_PARTICIPANT_ID_LENGTH: usize = 64;

/// Stable identifier of a league participant.
///
/// Whitespace is replaced with underscores so identifiers render cleanly in
/// standings tables and match ids.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub struct ParticipantId(String);

impl ParticipantId {
    pub fn new(s: &str) -> Self {
        let mut id: String = s
            .trim()
            .chars()
            .map(|c| if c.is_ascii_whitespace() { '_' } else { c })
            .collect();
        if let Some((end, _)) = id.char_indices().nth(MAX_PARTICIPANT_ID_LENGTH) {
            id.truncate(end);
        }
        Self(id)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl<'de> Deserialize<'de> for ParticipantId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(Self::new(&s))
    }
}

impl From<&str> for ParticipantId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ParticipantId {
    fn from(value: String) -> Self {
        Self::new(&value)
    }
}

/// One of the two seats in a match.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::A, Side::B];

    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::A => Self::B,
            Self::B => Self::A,
        }
    }

    /// Position of this side in `[side_a, side_b]` pairs.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::A => "side A",
            Self::B => "side B",
        };
        write!(f, "{repr}")
    }
}
