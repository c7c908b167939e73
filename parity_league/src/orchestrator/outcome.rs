//! Completed match events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{
    game::{ParityChoice, ParticipantId},
    schedule::MatchId,
};

/// Terminal status of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Decided by the rules or by a technical loss
    Finished,
    /// Stopped before any choice could be evaluated
    Aborted,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Finished => write!(f, "finished"),
            MatchStatus::Aborted => write!(f, "aborted"),
        }
    }
}

/// Per-participant view of a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

/// Event emitted exactly once when a match reaches a terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub match_id: MatchId,
    pub round: u32,
    pub side_a: ParticipantId,
    pub side_b: ParticipantId,
    pub status: MatchStatus,
    /// `None` for a draw or a double forfeit
    pub winner: Option<ParticipantId>,
    pub reason: String,
    pub choice_a: Option<ParityChoice>,
    pub choice_b: Option<ParityChoice>,
    pub drawn: Option<u32>,
    pub points_a: u32,
    pub points_b: u32,
    pub finished_at: DateTime<Utc>,
}

impl CompletedMatch {
    /// Drawn on the board (both sides made the same choice)
    pub fn is_draw(&self) -> bool {
        self.status == MatchStatus::Finished && self.winner.is_none()
    }

    /// Aborted with nobody winning
    pub fn is_double_forfeit(&self) -> bool {
        self.status == MatchStatus::Aborted && self.winner.is_none()
    }

    /// Won by default: one side never got as far as a valid choice
    pub fn is_technical_loss(&self) -> bool {
        self.winner.is_some() && self.drawn.is_none()
    }

    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.side_a == participant || &self.side_b == participant
    }

    pub fn opponent_of(&self, participant: &ParticipantId) -> Option<&ParticipantId> {
        if &self.side_a == participant {
            Some(&self.side_b)
        } else if &self.side_b == participant {
            Some(&self.side_a)
        } else {
            None
        }
    }

    pub fn points_for(&self, participant: &ParticipantId) -> Option<u32> {
        if &self.side_a == participant {
            Some(self.points_a)
        } else if &self.side_b == participant {
            Some(self.points_b)
        } else {
            None
        }
    }

    /// Result from `participant`'s point of view.
    ///
    /// A double forfeit counts as a loss for both sides.
    pub fn outcome_for(&self, participant: &ParticipantId) -> Option<Outcome> {
        if !self.involves(participant) {
            return None;
        }
        let outcome = match &self.winner {
            Some(winner) if winner == participant => Outcome::Win,
            Some(_) => Outcome::Loss,
            None if self.status == MatchStatus::Finished => Outcome::Draw,
            None => Outcome::Loss,
        };
        Some(outcome)
    }
}

impl fmt::Display for CompletedMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}-{} {} ({}: {})",
            self.match_id,
            self.side_a,
            self.points_a,
            self.points_b,
            self.side_b,
            self.status,
            self.reason
        )
    }
}
