//! The two enumerated choices of the game.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// Errors produced when a submitted choice token is not usable.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum ChoiceError {
    #[error("empty choice")]
    Empty,
    #[error("unrecognized choice {0:?}, expected \"even\" or \"odd\"")]
    Unrecognized(String),
}

/// A participant's bet on the parity of the drawn value.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParityChoice {
    Even,
    Odd,
}

impl ParityChoice {
    /// Parity of a drawn value.
    #[must_use]
    pub const fn of(value: u32) -> Self {
        if value % 2 == 0 { Self::Even } else { Self::Odd }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Even => "even",
            Self::Odd => "odd",
        }
    }

    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Even => Self::Odd,
            Self::Odd => Self::Even,
        }
    }
}

impl fmt::Display for ParityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Tokens are matched exactly after trimming surrounding whitespace; any
/// other casing or spelling is an invalid submission.
impl FromStr for ParityChoice {
    type Err = ChoiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Err(ChoiceError::Empty),
            "even" => Ok(Self::Even),
            "odd" => Ok(Self::Odd),
            other => Err(ChoiceError::Unrecognized(other.to_string())),
        }
    }
}
