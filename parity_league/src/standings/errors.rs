//! Standings error types.

use thiserror::Error;

use crate::{game::ParticipantId, schedule::MatchId};

/// Standings errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StandingsError {
    /// Result for this match was already counted
    #[error("Duplicate result for match {0}")]
    DuplicateResult(MatchId),

    /// Event names a participant outside the roster
    #[error("Unknown participant {0}")]
    UnknownParticipant(ParticipantId),
}

/// Result type for standings operations
pub type StandingsResult<T> = Result<T, StandingsError>;
