//! Match state machine.
//!
//! The lifecycle is linear:
//!
//! ```text
//! WaitingForParticipants → CollectingChoices → DrawingValue → Evaluating → Finished
//!         └──────────────────────┴─────────────────────────────────────→ Aborted
//! ```
//!
//! Each state carries exactly the data known at that point, and
//! [`MatchState::next`] is the only way to move between them. Anything not in
//! the table above is a protocol violation.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{
    game::{ParityChoice, ParticipantId, Side, rules::Evaluation},
    schedule::MatchId,
};

/// Match errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("protocol violation: cannot apply {transition} while {from}")]
    IllegalTransition {
        from: MatchPhase,
        transition: &'static str,
    },

    #[error("match {match_id}: fixture puts {expected} on {side} but participant is {actual}")]
    ParticipantMismatch {
        match_id: MatchId,
        side: Side,
        expected: ParticipantId,
        actual: ParticipantId,
    },
}

/// State tag without payload, used for logging and history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    WaitingForParticipants,
    CollectingChoices,
    DrawingValue,
    Evaluating,
    Finished,
    Aborted,
}

impl MatchPhase {
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Finished | Self::Aborted)
    }
}

impl fmt::Display for MatchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let repr = match self {
            Self::WaitingForParticipants => "waiting for participants",
            Self::CollectingChoices => "collecting choices",
            Self::DrawingValue => "drawing value",
            Self::Evaluating => "evaluating",
            Self::Finished => "finished",
            Self::Aborted => "aborted",
        };
        write!(f, "{repr}")
    }
}

/// Final decision of a match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// `None` for a draw or a double forfeit
    pub winner: Option<Side>,
    /// Points for `[side_a, side_b]`
    pub points: [u32; 2],
    /// Human-readable explanation
    pub reason: String,
}

impl From<Evaluation> for Verdict {
    fn from(value: Evaluation) -> Self {
        Self {
            winner: value.winner,
            points: value.points,
            reason: value.reason,
        }
    }
}

/// Inputs that move a match forward
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    InvitationsAccepted,
    ChoicesCollected([ParityChoice; 2]),
    ValueDrawn(u32),
    Evaluated(Evaluation),
    /// One side never produced a valid choice
    TechnicalLoss {
        choices: [Option<ParityChoice>; 2],
        verdict: Verdict,
    },
    Abort(Verdict),
}

impl Transition {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::InvitationsAccepted => "invitations accepted",
            Self::ChoicesCollected(_) => "choices collected",
            Self::ValueDrawn(_) => "value drawn",
            Self::Evaluated(_) => "evaluated",
            Self::TechnicalLoss { .. } => "technical loss",
            Self::Abort(_) => "abort",
        }
    }
}

/// Current state of one match
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchState {
    WaitingForParticipants,
    CollectingChoices,
    DrawingValue {
        choices: [ParityChoice; 2],
    },
    Evaluating {
        choices: [ParityChoice; 2],
        drawn: u32,
    },
    Finished {
        choices: [Option<ParityChoice>; 2],
        drawn: Option<u32>,
        verdict: Verdict,
    },
    Aborted {
        verdict: Verdict,
    },
}

impl MatchState {
    #[must_use]
    pub const fn phase(&self) -> MatchPhase {
        match self {
            Self::WaitingForParticipants => MatchPhase::WaitingForParticipants,
            Self::CollectingChoices => MatchPhase::CollectingChoices,
            Self::DrawingValue { .. } => MatchPhase::DrawingValue,
            Self::Evaluating { .. } => MatchPhase::Evaluating,
            Self::Finished { .. } => MatchPhase::Finished,
            Self::Aborted { .. } => MatchPhase::Aborted,
        }
    }

    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.phase().is_terminal()
    }

    /// Compute the state reached by applying `transition`.
    ///
    /// # Errors
    ///
    /// `MatchError::IllegalTransition` if `transition` is not allowed from the
    /// current state. Terminal states accept nothing.
    pub fn next(&self, transition: Transition) -> Result<MatchState, MatchError> {
        let next = match (self, transition) {
            (Self::WaitingForParticipants, Transition::InvitationsAccepted) => {
                Self::CollectingChoices
            }
            (Self::CollectingChoices, Transition::ChoicesCollected(choices)) => {
                Self::DrawingValue { choices }
            }
            (Self::DrawingValue { choices }, Transition::ValueDrawn(drawn)) => Self::Evaluating {
                choices: *choices,
                drawn,
            },
            (Self::Evaluating { choices, drawn }, Transition::Evaluated(evaluation)) => {
                Self::Finished {
                    choices: [Some(choices[0]), Some(choices[1])],
                    drawn: Some(*drawn),
                    verdict: evaluation.into(),
                }
            }
            (Self::CollectingChoices, Transition::TechnicalLoss { choices, verdict }) => {
                Self::Finished {
                    choices,
                    drawn: None,
                    verdict,
                }
            }
            (
                Self::WaitingForParticipants | Self::CollectingChoices,
                Transition::Abort(verdict),
            ) => Self::Aborted { verdict },
            (state, transition) => {
                return Err(MatchError::IllegalTransition {
                    from: state.phase(),
                    transition: transition.name(),
                });
            }
        };
        Ok(next)
    }

    /// Verdict of a terminal state
    #[must_use]
    pub fn verdict(&self) -> Option<&Verdict> {
        match self {
            Self::Finished { verdict, .. } | Self::Aborted { verdict } => Some(verdict),
            _ => None,
        }
    }
}
