//! The winner rule.

use serde::{Deserialize, Serialize};

use super::{ParityChoice, Side};

/// Points awarded per match result.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Scoring {
    pub win: u32,
    pub draw: u32,
    pub loss: u32,
}

impl Default for Scoring {
    fn default() -> Self {
        Self {
            win: 3,
            draw: 1,
            loss: 0,
        }
    }
}

impl Scoring {
    /// Points for `[side_a, side_b]` when `winner` takes the match.
    #[must_use]
    pub const fn for_winner(&self, winner: Side) -> [u32; 2] {
        match winner {
            Side::A => [self.win, self.loss],
            Side::B => [self.loss, self.win],
        }
    }
}

/// Result of applying the winner rule to one match.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Evaluation {
    /// `None` when both sides chose the same parity.
    pub winner: Option<Side>,
    pub drawn: u32,
    pub parity: ParityChoice,
    /// Points for `[side_a, side_b]`.
    pub points: [u32; 2],
    pub reason: String,
}

/// Decides a match from the two choices and the drawn value.
///
/// Identical choices are a draw whatever the value. Otherwise the side whose
/// choice equals the parity of `drawn` wins.
#[must_use]
pub fn evaluate(
    choice_a: ParityChoice,
    choice_b: ParityChoice,
    drawn: u32,
    scoring: &Scoring,
) -> Evaluation {
    let parity = ParityChoice::of(drawn);

    if choice_a == choice_b {
        return Evaluation {
            winner: None,
            drawn,
            parity,
            points: [scoring.draw, scoring.draw],
            reason: format!("both sides chose {choice_a}; draw (drawn value {drawn})"),
        };
    }

    let winner = if choice_a == parity { Side::A } else { Side::B };
    Evaluation {
        winner: Some(winner),
        drawn,
        parity,
        points: scoring.for_winner(winner),
        reason: format!("drawn value {drawn} is {parity}; {winner} chose {parity}"),
    }
}
