//! League report models.

use serde::{Deserialize, Serialize};

use crate::{
    game::ParticipantId,
    orchestrator::CompletedMatch,
    schedule::RoundStatus,
    standings::StandingsEntry,
};

/// Progress of one round
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundSummary {
    pub number: u32,
    pub status: RoundStatus,
    /// Fixtures scheduled in this round
    pub matches: usize,
    pub bye: Option<ParticipantId>,
}

/// Everything a league produced so far
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueReport {
    pub rounds: Vec<RoundSummary>,
    /// Completed matches in schedule order
    pub events: Vec<CompletedMatch>,
    /// Final ranking, best first
    pub standings: Vec<StandingsEntry>,
}

impl LeagueReport {
    /// Whether every round has completed
    pub fn is_complete(&self) -> bool {
        self.rounds
            .iter()
            .all(|round| round.status == RoundStatus::Complete)
    }

    /// Leader of the table, if any match was played
    pub fn leader(&self) -> Option<&StandingsEntry> {
        self.standings.first()
    }

    /// Number of matches decided by the rules as a draw
    pub fn draws(&self) -> usize {
        self.events.iter().filter(|event| event.is_draw()).count()
    }

    /// Number of matches with a winner
    pub fn decisive(&self) -> usize {
        self.events.iter().filter(|event| event.winner.is_some()).count()
    }
}
