//! Schedule data models.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::game::ParticipantId;

/// Match identifier, `R{round}M{index}`
pub type MatchId = String;

/// Build the identifier of the `index`-th match (1-based) of `round`.
#[must_use]
pub fn match_id(round: u32, index: usize) -> MatchId {
    format!("R{round}M{index}")
}

/// One pairing to be played
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    pub match_id: MatchId,
    pub round: u32,
    pub side_a: ParticipantId,
    pub side_b: ParticipantId,
}

impl Fixture {
    /// Whether `participant` plays in this fixture
    pub fn involves(&self, participant: &ParticipantId) -> bool {
        &self.side_a == participant || &self.side_b == participant
    }
}

/// Progress of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
    /// No match started yet
    Pending,
    /// Matches dispatched
    InProgress,
    /// Every match reached a terminal state
    Complete,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundStatus::Pending => write!(f, "pending"),
            RoundStatus::InProgress => write!(f, "in progress"),
            RoundStatus::Complete => write!(f, "complete"),
        }
    }
}

/// A set of fixtures in which every participant appears at most once
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    /// Round number (1-indexed)
    pub number: u32,
    pub fixtures: Vec<Fixture>,
    /// Participant sitting this round out (odd rosters only)
    pub bye: Option<ParticipantId>,
}

/// Ordered rounds covering the whole roster
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub rounds: Vec<Round>,
}

impl Schedule {
    /// Total number of fixtures across all rounds
    pub fn total_matches(&self) -> usize {
        self.rounds.iter().map(|round| round.fixtures.len()).sum()
    }

    /// All fixtures in schedule order
    pub fn fixtures(&self) -> impl Iterator<Item = &Fixture> {
        self.rounds.iter().flat_map(|round| round.fixtures.iter())
    }

    /// Get round by number
    pub fn round(&self, number: u32) -> Option<&Round> {
        self.rounds.iter().find(|round| round.number == number)
    }

    /// Look up a fixture by match id
    pub fn fixture(&self, match_id: &str) -> Option<&Fixture> {
        self.fixtures().find(|fixture| fixture.match_id == match_id)
    }
}
